//! One-line help rendering for commands.
//!
//! Produces the usage listing shown by a bot's help command:
//!
//! ```text
//! tag|faq [the tag name] -user [mention a user]: Send a tag
//! ```

use crate::{CommandRegistry, CommandSchema};

/// Renders a single command as a one-line usage summary.
///
/// The command name is followed by its aliases (pipe-separated), the primary
/// flag's description in brackets, each named flag as `-name [description]`,
/// and finally the command description.
///
/// # Examples
///
/// ```
/// use chat_command_core::*;
///
/// let tag = CommandSchema::new("tag")
///     .with_alias("faq")
///     .with_description("Send a tag")
///     .with_primary(FlagSchema::new("name", FlagType::String).with_description("the tag name"))
///     .with_flag(FlagSchema::new("user", FlagType::User).with_description("mention a user"));
///
/// assert_eq!(
///     describe_short(&tag),
///     "tag|faq [the tag name] -user [mention a user]: Send a tag"
/// );
/// ```
pub fn describe_short(command: &CommandSchema) -> String {
    let mut result = command.name.clone();
    for alias in &command.aliases {
        result.push('|');
        result.push_str(alias);
    }

    if let Some(primary) = &command.primary {
        result.push_str(&format!(" [{}]", primary.description));
    }

    for flag in &command.flags {
        result.push_str(&format!(" -{} [{}]", flag.name, flag.description));
    }

    result.push_str(": ");
    result.push_str(&command.description);
    result
}

/// Renders every command of a registry, separated by blank lines.
pub fn describe_registry(registry: &CommandRegistry) -> String {
    registry
        .iter()
        .map(describe_short)
        .collect::<Vec<_>>()
        .join("\n\n")
}
