//! Command lookup: splits a line into command name and argument body.

use chat_command_core::{CommandRegistry, CommandSchema};

use crate::error::ParseError;
use crate::readers::EntityDirectory;
use crate::resolve::parse_arguments;
use crate::value::ArgumentMap;

/// A line whose first word named a registered command.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'r, 'l> {
    /// Index of the command in its registry.
    pub index: usize,
    /// The matched command.
    pub command: &'r CommandSchema,
    /// The word that matched, which may be an alias.
    pub name: &'l str,
    /// Everything after the first space.
    pub body: &'l str,
}

impl Invocation<'_, '_> {
    /// Parses the body against the matched command's flags.
    pub fn parse(&self, directory: Option<&dyn EntityDirectory>) -> Result<ArgumentMap, ParseError> {
        parse_arguments(self.command, self.body, directory)
    }
}

/// Splits a line at its first space into command name and argument body.
///
/// # Examples
///
/// ```
/// use chat_command_parser::split_invocation;
///
/// assert_eq!(split_invocation("tag welcome -u 1"), ("tag", "welcome -u 1"));
/// assert_eq!(split_invocation("ping"), ("ping", ""));
/// assert_eq!(split_invocation("ping "), ("ping", ""));
/// ```
pub fn split_invocation(line: &str) -> (&str, &str) {
    line.split_once(' ').unwrap_or((line, ""))
}

/// Finds the command named by the first word of `line`.
///
/// Matching is exact and case-sensitive against names and aliases. `None`
/// means the line is not a command at all, which callers must treat as a
/// silent no-op rather than an error.
///
/// # Examples
///
/// ```
/// use chat_command_core::{CommandRegistry, CommandSchema};
/// use chat_command_parser::lookup;
///
/// let registry = CommandRegistry::new(vec![CommandSchema::new("tag").with_alias("faq")]);
///
/// let invocation = lookup(&registry, "faq welcome").unwrap();
/// assert_eq!(invocation.command.name, "tag");
/// assert_eq!(invocation.body, "welcome");
///
/// assert!(lookup(&registry, "Tag welcome").is_none());
/// assert!(lookup(&registry, "hello there").is_none());
/// ```
pub fn lookup<'r, 'l>(registry: &'r CommandRegistry, line: &'l str) -> Option<Invocation<'r, 'l>> {
    let (name, body) = split_invocation(line);
    registry
        .iter()
        .enumerate()
        .find(|(_, command)| command.matches(name))
        .map(|(index, command)| Invocation {
            index,
            command,
            name,
            body,
        })
}
