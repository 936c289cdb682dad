//! Adapter for platform-native structured commands.
//!
//! Reads the same [`CommandSchema`] as the text parser, but instead of
//! tokenizing a message it describes each command as a list of typed
//! options and maps option values the platform already parsed back into an
//! [`ArgumentMap`].

use std::sync::LazyLock;

use chat_command_core::{CommandSchema, FlagType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::{ParseError, ValueError};
use crate::readers::is_snowflake;
use crate::value::{ArgValue, ArgumentMap};

/// Platform rule for command and option names.
static STRUCTURED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-_a-z0-9]{1,32}$").expect("static regex must compile"));

const MAX_DESCRIPTION_LEN: usize = 100;

/// Reasons a schema cannot be registered as a structured command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuredError {
    /// A command or option name breaks the platform naming rule.
    #[error("invalid structured name: {0}")]
    InvalidName(String),
    /// A description is empty or longer than the platform allows.
    #[error("description of {0} must be 1-100 characters")]
    InvalidDescription(String),
}

/// Option kind on the structured surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Number,
    Boolean,
    User,
    Role,
    Channel,
}

impl From<FlagType> for OptionKind {
    fn from(flag_type: FlagType) -> Self {
        match flag_type {
            FlagType::String => Self::String,
            FlagType::Number => Self::Number,
            FlagType::User => Self::User,
            FlagType::Role => Self::Role,
            FlagType::Channel => Self::Channel,
            FlagType::Void => Self::Boolean,
        }
    }
}

/// One option of a structured command definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    pub required: bool,
}

/// A command as declared to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredCommand {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionDefinition>,
}

/// Describes a command schema as a structured command.
///
/// Every flag becomes an option of the matching kind. Required options are
/// moved in front of optional ones, keeping declaration order otherwise.
///
/// # Examples
///
/// ```
/// use chat_command_core::{CommandSchema, FlagSchema, FlagType};
/// use chat_command_parser::{OptionKind, structured_definition};
///
/// let tag = CommandSchema::new("tag")
///     .with_description("Send a tag")
///     .with_flag(FlagSchema::new("user", FlagType::User))
///     .with_primary(FlagSchema::new("name", FlagType::String).required());
///
/// let definition = structured_definition(&tag);
/// assert_eq!(definition.options[0].name, "name");
/// assert!(definition.options[0].required);
/// assert_eq!(definition.options[1].kind, OptionKind::User);
/// ```
pub fn structured_definition(schema: &CommandSchema) -> StructuredCommand {
    let mut options: Vec<OptionDefinition> = schema
        .all_flags()
        .map(|flag| OptionDefinition {
            name: flag.name.clone(),
            description: flag.description.clone(),
            kind: flag.flag_type.into(),
            required: flag.required && !flag.flag_type.is_void(),
        })
        .collect();
    options.sort_by_key(|option| !option.required);

    StructuredCommand {
        name: schema.name.clone(),
        description: schema.description.clone(),
        options,
    }
}

/// Checks that a schema can be declared on the structured surface.
///
/// Aliases are not checked since the structured surface has none.
pub fn check_structured(schema: &CommandSchema) -> Result<(), StructuredError> {
    check_entry(&schema.name, &schema.description)?;
    for flag in schema.all_flags() {
        check_entry(&flag.name, &flag.description)?;
    }
    Ok(())
}

/// Checks a command or option name against the platform naming rule:
/// 1-32 characters of lowercase ASCII letters, digits, `-` and `_`.
///
/// # Examples
///
/// ```
/// use chat_command_parser::check_structured_name;
///
/// assert!(check_structured_name("slow-mode").is_ok());
/// assert!(check_structured_name("SlowMode").is_err());
/// assert!(check_structured_name("").is_err());
/// ```
pub fn check_structured_name(name: &str) -> Result<(), StructuredError> {
    if STRUCTURED_NAME.is_match(name) {
        Ok(())
    } else {
        Err(StructuredError::InvalidName(name.to_string()))
    }
}

fn check_entry(name: &str, description: &str) -> Result<(), StructuredError> {
    check_structured_name(name)?;
    let len = description.chars().count();
    if len == 0 || len > MAX_DESCRIPTION_LEN {
        return Err(StructuredError::InvalidDescription(name.to_string()));
    }
    Ok(())
}

/// A value the platform delivered for one option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructuredValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl StructuredValue {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
        }
    }
}

/// An option as received with a structured invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredOption {
    pub name: String,
    #[serde(default)]
    pub value: Option<StructuredValue>,
}

impl StructuredOption {
    pub fn new(name: &str, value: StructuredValue) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value),
        }
    }
}

/// Builds an argument map from structured option values.
///
/// Options the command does not declare are ignored. Void flags without a
/// value stay `false` and other flags stay unset, exactly as after a text
/// parse. Required-ness is enforced by the platform and not rechecked.
///
/// # Examples
///
/// ```
/// use chat_command_core::{CommandSchema, FlagSchema, FlagType};
/// use chat_command_parser::{StructuredOption, StructuredValue, arguments_from_options};
///
/// let tag = CommandSchema::new("tag")
///     .with_primary(FlagSchema::new("name", FlagType::String).required())
///     .with_flag(FlagSchema::new("user", FlagType::User));
///
/// let options = [StructuredOption::new("name", StructuredValue::String("welcome".into()))];
/// let args = arguments_from_options(&tag, &options).unwrap();
/// assert_eq!(args.text("name"), Some("welcome"));
/// assert_eq!(args.get("user"), None);
/// ```
pub fn arguments_from_options(
    schema: &CommandSchema,
    options: &[StructuredOption],
) -> Result<ArgumentMap, ParseError> {
    let mut args = ArgumentMap::for_command(schema);

    for option in options {
        let Some(flag) = schema.all_flags().find(|flag| flag.name == option.name) else {
            continue;
        };
        let Some(value) = &option.value else {
            continue;
        };
        let value = convert(flag.flag_type, value).map_err(|err| {
            debug!(command = %schema.name, flag = %flag.name, error = %err, "Rejected option value");
            ParseError::InvalidValue(flag.name.clone())
        })?;
        args.set(&flag.name, value);
    }

    Ok(args)
}

fn convert(flag_type: FlagType, value: &StructuredValue) -> Result<ArgValue, ValueError> {
    match (flag_type, value) {
        (FlagType::String, StructuredValue::String(text)) => Ok(ArgValue::Text(text.clone())),
        (FlagType::Number, StructuredValue::Number(n)) => Ok(ArgValue::Number(*n)),
        (FlagType::Void, StructuredValue::Bool(b)) => Ok(ArgValue::Bool(*b)),
        (FlagType::User | FlagType::Role | FlagType::Channel, StructuredValue::String(id)) => {
            if is_snowflake(id) {
                Ok(ArgValue::Id(id.clone()))
            } else {
                Err(ValueError::UnknownEntity(id.clone()))
            }
        }
        (expected, found) => Err(ValueError::KindMismatch {
            expected: expected_name(expected),
            found: found.kind_name(),
        }),
    }
}

fn expected_name(flag_type: FlagType) -> &'static str {
    match flag_type {
        FlagType::String => "string",
        FlagType::Number => "number",
        FlagType::User => "user",
        FlagType::Role => "role",
        FlagType::Channel => "channel",
        FlagType::Void => "void",
    }
}

/// How a structured invocation is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStrategy {
    /// Reply directly.
    Immediate,
    /// Acknowledge at once, then edit the acknowledgement with the reply.
    Deferred,
}

impl ReplyStrategy {
    pub fn for_command(schema: &CommandSchema) -> Self {
        if schema.deferred {
            Self::Deferred
        } else {
            Self::Immediate
        }
    }
}
