//! Schema and registry validation.
//!
//! Validates structural invariants of command schemas and registries,
//! catching errors such as duplicate flags, unreachable flag names, and
//! command name collisions before a message is ever parsed against them.
//!
//! # Examples
//!
//! ```
//! use chat_command_core::*;
//!
//! let tag = CommandSchema::new("tag")
//!     .with_primary(FlagSchema::new("name", FlagType::String))
//!     .with_flag(FlagSchema::new("user", FlagType::User).with_alias("u"));
//! assert!(validate_schema(&tag).is_empty());
//!
//! // Invalid: alias collides with the primary flag
//! let bad = CommandSchema::new("tag")
//!     .with_primary(FlagSchema::new("name", FlagType::String))
//!     .with_flag(FlagSchema::new("user", FlagType::User).with_alias("name"));
//! assert!(!validate_schema(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandRegistry, CommandSchema, FlagSchema};

/// Schema/registry validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("schema command cannot be empty")]
    EmptyCommandName,
    /// A flag of the named command has an empty name.
    #[error("flag name cannot be empty in command: {0}")]
    EmptyFlagName(String),
    /// A flag name or alias can never be matched by a `-name` token.
    #[error("invalid flag name: {0}")]
    InvalidFlagName(String),
    /// Two flags of one command share a name or alias.
    #[error("duplicate flag in command: {0}")]
    DuplicateFlag(String),
    /// The primary flag is void and could never consume positional input.
    #[error("primary flag cannot be void in command: {0}")]
    VoidPrimary(String),
    /// Two commands of one registry share a name or alias.
    #[error("duplicate command in registry: {0}")]
    DuplicateCommand(String),
}

/// Validates a full command registry.
///
/// Checks for command name/alias collisions across the registry and
/// validates each schema individually.
///
/// # Examples
///
/// ```
/// use chat_command_core::*;
///
/// let registry = CommandRegistry::new(vec![
///     CommandSchema::new("tag").with_alias("faq"),
///     CommandSchema::new("faq"),
/// ]);
/// let errors = validate_registry(&registry);
/// assert_eq!(errors, vec![ValidationError::DuplicateCommand("faq".into())]);
/// ```
pub fn validate_registry(registry: &CommandRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut seen_commands: HashSet<&str> = HashSet::new();
    for schema in registry {
        errors.extend(validate_schema(schema));
        if !errors.is_empty() {
            return errors;
        }

        let names = std::iter::once(&schema.name).chain(schema.aliases.iter());
        for name in names {
            if !seen_commands.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateCommand(name.clone()));
                return errors;
            }
        }
    }

    errors
}

/// Validates a command schema.
///
/// Checks for an empty command name, a void primary flag, unmatchable flag
/// names, and name/alias collisions across the primary and named flags.
///
/// # Examples
///
/// ```
/// use chat_command_core::*;
///
/// let schema = CommandSchema::new("say")
///     .with_primary(FlagSchema::new("content", FlagType::String).required());
/// assert!(validate_schema(&schema).is_empty());
///
/// let schema = CommandSchema::new("say")
///     .with_primary(FlagSchema::new("loud", FlagType::Void));
/// assert_eq!(
///     validate_schema(&schema),
///     vec![ValidationError::VoidPrimary("say".into())]
/// );
/// ```
pub fn validate_schema(schema: &CommandSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if schema.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    if schema.primary.as_ref().is_some_and(|f| f.flag_type.is_void()) {
        errors.push(ValidationError::VoidPrimary(schema.name.clone()));
        return errors;
    }

    errors.extend(validate_flags(&schema.name, schema.all_flags()));
    errors
}

fn validate_flags<'a>(
    command: &str,
    flags: impl Iterator<Item = &'a FlagSchema>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for flag in flags {
        if flag.name.is_empty() {
            errors.push(ValidationError::EmptyFlagName(command.to_string()));
            return errors;
        }

        for name in std::iter::once(&flag.name).chain(flag.aliases.iter()) {
            if name.is_empty() || name.starts_with('-') || name.chars().any(char::is_whitespace)
            {
                errors.push(ValidationError::InvalidFlagName(name.clone()));
                return errors;
            }
            if !seen.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateFlag(name.clone()));
                return errors;
            }
        }
    }

    errors
}
