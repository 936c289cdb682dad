//! Typed value readers built on the [`Scanner`].
//!
//! Each reader consumes one token and either returns a typed value or a
//! [`ValueError`]. Entity readers accept a bare snowflake or the platform's
//! mention syntax; roles and channels additionally fall back to an exact
//! name lookup through an [`EntityDirectory`].

use chat_command_core::FlagType;
use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::scanner::Scanner;
use crate::value::ArgValue;

const USER_MENTION: &str = "<@";
const ROLE_MENTION: &str = "<@&";
const CHANNEL_MENTION: &str = "<#";
const MENTION_CLOSE: char = '>';

/// Read-only name lookup for roles and channels of the current guild.
///
/// Implementations are snapshots; the parser never refreshes them.
pub trait EntityDirectory {
    /// Returns the id of the first role named exactly `name`.
    fn find_role(&self, name: &str) -> Option<String>;

    /// Returns the id of the first channel named exactly `name`.
    fn find_channel(&self, name: &str) -> Option<String>;
}

/// A named guild entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: String,
    pub name: String,
}

impl DirectoryEntry {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Snapshot of a guild's roles and channels.
///
/// # Examples
///
/// ```
/// use chat_command_parser::{DirectoryEntry, EntityDirectory, GuildDirectory};
///
/// let directory = GuildDirectory {
///     roles: vec![DirectoryEntry::new("42", "Moderators")],
///     channels: vec![DirectoryEntry::new("7", "support")],
/// };
/// assert_eq!(directory.find_role("Moderators").as_deref(), Some("42"));
/// assert_eq!(directory.find_role("moderators"), None);
/// assert_eq!(directory.find_channel("support").as_deref(), Some("7"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildDirectory {
    #[serde(default)]
    pub roles: Vec<DirectoryEntry>,
    #[serde(default)]
    pub channels: Vec<DirectoryEntry>,
}

impl EntityDirectory for GuildDirectory {
    fn find_role(&self, name: &str) -> Option<String> {
        find_entry(&self.roles, name)
    }

    fn find_channel(&self, name: &str) -> Option<String> {
        find_entry(&self.channels, name)
    }
}

fn find_entry(entries: &[DirectoryEntry], name: &str) -> Option<String> {
    entries
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.id.clone())
}

/// Reads one value of the given type.
///
/// Void flags consume nothing and always yield `true`.
pub fn read_value(
    scanner: &mut Scanner<'_>,
    flag_type: FlagType,
    directory: Option<&dyn EntityDirectory>,
) -> Result<ArgValue, ValueError> {
    match flag_type {
        FlagType::String => read_string(scanner).map(ArgValue::Text),
        FlagType::Number => read_number(scanner).map(ArgValue::Number),
        FlagType::User => read_user(scanner).map(ArgValue::Id),
        FlagType::Role => read_role(scanner, directory).map(ArgValue::Id),
        FlagType::Channel => read_channel(scanner, directory).map(ArgValue::Id),
        FlagType::Void => Ok(ArgValue::Bool(true)),
    }
}

/// Reads a quoted string or a bare word, verbatim.
pub fn read_string(scanner: &mut Scanner<'_>) -> Result<String, ValueError> {
    scanner.read_quoted_or_word()
}

/// Reads a word and coerces it to a finite number.
pub fn read_number(scanner: &mut Scanner<'_>) -> Result<f64, ValueError> {
    let word = scanner.read_word();
    match word.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(ValueError::NotANumber(word)),
    }
}

/// Reads a user id, either bare or as `<@id>` / `<@!id>`.
pub fn read_user(scanner: &mut Scanner<'_>) -> Result<String, ValueError> {
    let token = scanner.read_quoted_or_word()?;
    if is_snowflake(&token) {
        return Ok(token);
    }

    if let Some(inner) = strip_mention(&token, USER_MENTION) {
        let id = inner.strip_prefix('!').unwrap_or(inner);
        return snowflake_or_malformed(id, &token);
    }

    Err(ValueError::UnknownEntity(token))
}

/// Reads a role id, either bare, as `<@&id>`, or by exact role name.
pub fn read_role(
    scanner: &mut Scanner<'_>,
    directory: Option<&dyn EntityDirectory>,
) -> Result<String, ValueError> {
    let token = scanner.read_quoted_or_word()?;
    if is_snowflake(&token) {
        return Ok(token);
    }

    if let Some(inner) = strip_mention(&token, ROLE_MENTION) {
        return snowflake_or_malformed(inner, &token);
    }

    directory
        .and_then(|d| d.find_role(&token))
        .ok_or(ValueError::UnknownEntity(token))
}

/// Reads a channel id, either bare, as `<#id>`, or by exact channel name.
pub fn read_channel(
    scanner: &mut Scanner<'_>,
    directory: Option<&dyn EntityDirectory>,
) -> Result<String, ValueError> {
    let token = scanner.read_quoted_or_word()?;
    if is_snowflake(&token) {
        return Ok(token);
    }

    if let Some(inner) = strip_mention(&token, CHANNEL_MENTION) {
        return snowflake_or_malformed(inner, &token);
    }

    directory
        .and_then(|d| d.find_channel(&token))
        .ok_or(ValueError::UnknownEntity(token))
}

/// Returns `true` for a non-empty run of ASCII digits.
pub fn is_snowflake(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Strips `open` and the closing `>` from a mention-shaped token.
fn strip_mention<'t>(token: &'t str, open: &str) -> Option<&'t str> {
    token.strip_prefix(open)?.strip_suffix(MENTION_CLOSE)
}

fn snowflake_or_malformed(id: &str, token: &str) -> Result<String, ValueError> {
    if is_snowflake(id) {
        Ok(id.to_string())
    } else {
        Err(ValueError::MalformedMention(token.to_string()))
    }
}
