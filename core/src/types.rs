//! Schema type definitions for chat command modeling.
//!
//! This module defines the data model shared by every input surface: the
//! free-text parser reads it to tokenize a message, and the structured
//! command adapter reads it to describe platform-native options. The types
//! are plain data, serialize with [`serde`], and are never mutated once a
//! [`CommandRegistry`] has been assembled.

use serde::{Deserialize, Serialize};

/// Version of the schema contract (semver).
///
/// Embedded in every [`SchemaPackage`](crate::SchemaPackage) to track
/// compatibility across schema versions.
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// Value type of a flag.
///
/// Decides which reader consumes the flag's value and how the structured
/// surface exposes it.
///
/// # Examples
///
/// ```
/// use chat_command_core::FlagType;
///
/// assert!(FlagType::Void.is_void());
/// assert!(FlagType::Role.is_entity());
/// assert!(!FlagType::Number.is_entity());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlagType {
    /// Free text, optionally quoted (the default).
    #[default]
    String,
    /// A finite decimal number.
    Number,
    /// A user, by id or mention.
    User,
    /// A role, by id, mention, or name.
    Role,
    /// A channel, by id, mention, or name.
    Channel,
    /// No value; presence alone sets the flag.
    Void,
}

impl FlagType {
    /// Returns `true` for flags that never consume a value.
    pub fn is_void(self) -> bool {
        self == FlagType::Void
    }

    /// Returns `true` for flags that resolve to a platform entity id.
    pub fn is_entity(self) -> bool {
        matches!(self, FlagType::User | FlagType::Role | FlagType::Channel)
    }
}

/// Schema for a command flag.
///
/// A flag has a unique name, optional aliases, a value type, and a
/// required marker. Whether a flag is the command's primary (positional)
/// flag is decided by where it is declared on the [`CommandSchema`].
///
/// # Examples
///
/// ```
/// use chat_command_core::{FlagSchema, FlagType};
///
/// let user = FlagSchema::new("user", FlagType::User)
///     .with_alias("u")
///     .with_description("mention a user");
/// assert!(user.matches("user"));
/// assert!(user.matches("u"));
/// assert!(!user.matches("U"));
/// assert!(!user.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagSchema {
    /// Flag name, unique within its command.
    pub name: String,
    /// Alternate names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Human-readable description, shown in help and structured options.
    #[serde(default)]
    pub description: String,
    /// Type of value this flag accepts.
    #[serde(rename = "type", default)]
    pub flag_type: FlagType,
    /// Whether a value must be supplied. Meaningless for void flags.
    #[serde(default)]
    pub required: bool,
}

impl FlagSchema {
    /// Creates an optional flag with no aliases or description.
    pub fn new(name: &str, flag_type: FlagType) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            description: String::new(),
            flag_type,
            required: false,
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Marks the flag as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Checks if `token` is this flag's name or one of its aliases.
    ///
    /// Matching is exact and case-sensitive.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|a| a == token)
    }
}

/// Complete schema for a chat command.
///
/// A command owns at most one primary flag, which can be supplied
/// positionally, and any number of named flags, which must be introduced
/// with `-name`. Flag names are unique across both groups.
///
/// # Examples
///
/// ```
/// use chat_command_core::*;
///
/// let tag = CommandSchema::new("tag")
///     .with_alias("faq")
///     .with_description("Send a tag")
///     .with_primary(FlagSchema::new("name", FlagType::String).required())
///     .with_flag(FlagSchema::new("user", FlagType::User).with_alias("u"));
///
/// assert!(tag.matches("faq"));
/// assert!(tag.takes_arguments());
/// assert_eq!(tag.find_flag("u").unwrap().name, "user");
/// assert_eq!(tag.find_flag("name").unwrap().name, "name");
/// let names: Vec<&str> = tag.all_flags().map(|f| f.name.as_str()).collect();
/// assert_eq!(names, vec!["name", "user"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// The command name typed after the prefix (e.g. "tag").
    pub name: String,
    /// Alternate command names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Short description of the command.
    #[serde(default)]
    pub description: String,
    /// The flag that may be supplied without a `-name` introducer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<FlagSchema>,
    /// Flags that must be introduced with `-name` or `-alias`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSchema>,
    /// Structured invocations acknowledge first and edit the reply later.
    #[serde(default)]
    pub deferred: bool,
}

impl CommandSchema {
    /// Creates a command schema with no flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_command_core::CommandSchema;
    ///
    /// let ping = CommandSchema::new("ping");
    /// assert_eq!(ping.name, "ping");
    /// assert!(!ping.takes_arguments());
    /// ```
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Sets the primary flag, replacing any previous one.
    pub fn with_primary(mut self, flag: FlagSchema) -> Self {
        self.primary = Some(flag);
        self
    }

    /// Adds a named flag.
    pub fn with_flag(mut self, flag: FlagSchema) -> Self {
        self.flags.push(flag);
        self
    }

    /// Marks the command as deferred on the structured surface.
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Checks if `name` is this command's name or one of its aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// Iterates over every declared flag: the primary first, then the named
    /// flags in declaration order.
    pub fn all_flags(&self) -> impl Iterator<Item = &FlagSchema> {
        self.primary.iter().chain(self.flags.iter())
    }

    /// Finds a flag of the combined set by name or alias.
    pub fn find_flag(&self, token: &str) -> Option<&FlagSchema> {
        self.all_flags().find(|f| f.matches(token))
    }

    /// Returns `true` if the command declares at least one flag.
    pub fn takes_arguments(&self) -> bool {
        self.primary.is_some() || !self.flags.is_empty()
    }
}

/// Ordered, immutable collection of command schemas.
///
/// Assembled once at startup and shared read-only afterwards. Lookups scan
/// in declaration order, so the first command claiming a name wins.
///
/// # Examples
///
/// ```
/// use chat_command_core::{CommandRegistry, CommandSchema};
///
/// let registry = CommandRegistry::new(vec![
///     CommandSchema::new("ping"),
///     CommandSchema::new("tag").with_alias("faq"),
/// ]);
///
/// assert_eq!(registry.find("faq").unwrap().name, "tag");
/// assert!(registry.find("Tag").is_none());
/// assert_eq!(registry.names(), vec!["ping", "tag"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandRegistry {
    commands: Vec<CommandSchema>,
}

impl CommandRegistry {
    /// Creates a registry from commands in declaration order.
    pub fn new(commands: Vec<CommandSchema>) -> Self {
        Self { commands }
    }

    /// Finds a command by exact name or alias.
    pub fn find(&self, name: &str) -> Option<&CommandSchema> {
        self.commands.iter().find(|c| c.matches(name))
    }

    /// Iterates over commands in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CommandSchema> {
        self.commands.iter()
    }

    /// Gets all command names.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns the number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Consumes the registry, returning its commands.
    pub fn into_commands(self) -> Vec<CommandSchema> {
        self.commands
    }
}

impl FromIterator<CommandSchema> for CommandRegistry {
    fn from_iter<I: IntoIterator<Item = CommandSchema>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CommandRegistry {
    type Item = &'a CommandSchema;
    type IntoIter = std::slice::Iter<'a, CommandSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
