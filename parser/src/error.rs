//! Error types for message parsing.
//!
//! [`ParseError`] is what a user sees: its `Display` output is the exact
//! reply text. [`ValueError`] explains why a single value was rejected and is
//! only logged; every variant reaches the user as
//! [`ParseError::InvalidValue`].

use thiserror::Error;

/// Terminal parse failures, one per message.
///
/// # Examples
///
/// ```
/// use chat_command_parser::ParseError;
///
/// let err = ParseError::MissingValue(vec!["name".into(), "user".into()]);
/// assert_eq!(err.to_string(), ":x: Missing value of `name`, `user`");
///
/// let err = ParseError::ExpectedFlag { position: 8 };
/// assert_eq!(err.to_string(), ":x: Expected flag at position 8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `-name` token matched no flag of the command.
    #[error(":x: Invalid flag `{0}`")]
    InvalidFlag(String),
    /// A positional token appeared where no primary flag could take it.
    #[error(":x: Expected flag at position {position}")]
    ExpectedFlag {
        /// Zero-based character offset of the token in the argument body.
        position: usize,
    },
    /// The value of the named flag could not be read.
    #[error(":x: Invalid value of `{0}`")]
    InvalidValue(String),
    /// Required flags left unset, in declaration order.
    #[error(":x: Missing value of {}", backticked(.0))]
    MissingValue(Vec<String>),
    /// Arguments were given to a command that declares no flags.
    #[error(":x: This command takes no arguments")]
    NoArguments,
}

/// Why a typed reader rejected its token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Input ended before the closing quote.
    #[error("unterminated quote")]
    UnterminatedQuote,
    /// Token is not a finite number.
    #[error("not a number: {0:?}")]
    NotANumber(String),
    /// Token looks like a mention but does not wrap a snowflake.
    #[error("malformed mention: {0:?}")]
    MalformedMention(String),
    /// Token is neither an id, a mention, nor a known name.
    #[error("unknown entity: {0:?}")]
    UnknownEntity(String),
    /// A structured option carried a value of the wrong kind.
    #[error("unexpected {found} value for a {expected} flag")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

fn backticked(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
