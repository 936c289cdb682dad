//! Flag parser and dispatcher for textual chat commands.
//!
//! Turns a message such as `tag welcome -u 123456789012345678` into a typed
//! [`ArgumentMap`] according to a [`CommandSchema`](chat_command_core::CommandSchema),
//! or into one user-facing [`ParseError`].
//!
//! - [`Scanner`] walks the argument body one character at a time, reading
//!   bare words and quoted strings with backslash escapes.
//! - The readers ([`read_value`] and friends) coerce tokens to strings,
//!   numbers, and user/role/channel ids, consulting an [`EntityDirectory`]
//!   for role and channel names.
//! - [`parse_arguments`] assigns tokens to the primary and named flags and
//!   reports missing required flags.
//! - [`lookup`] finds the command named by the first word of a line.
//! - The structured adapter ([`structured_definition`],
//!   [`arguments_from_options`]) serves platform-native commands from the
//!   same schemas.
//! - [`Dispatcher`] ties it together: prefix check, lookup, parse, handler
//!   call, and replies.
//!
//! # Example
//!
//! ```
//! use chat_command_core::{CommandRegistry, CommandSchema, FlagSchema, FlagType};
//! use chat_command_parser::{ParseError, lookup};
//!
//! let registry = CommandRegistry::new(vec![
//!     CommandSchema::new("tag")
//!         .with_primary(FlagSchema::new("name", FlagType::String).required())
//!         .with_flag(FlagSchema::new("user", FlagType::User).with_alias("u")),
//! ]);
//!
//! let args = lookup(&registry, "tag \"multi word name\"")
//!     .unwrap()
//!     .parse(None)
//!     .unwrap();
//! assert_eq!(args.text("name"), Some("multi word name"));
//! assert_eq!(args.get("user"), None);
//!
//! let err = lookup(&registry, "tag welcome -badflag hi")
//!     .unwrap()
//!     .parse(None)
//!     .unwrap_err();
//! assert_eq!(err, ParseError::InvalidFlag("badflag".into()));
//! assert_eq!(err.to_string(), ":x: Invalid flag `badflag`");
//! ```

mod dispatch;
mod error;
mod lookup;
mod readers;
mod resolve;
mod scanner;
mod structured;
mod value;

pub use dispatch::{
    CommandContext, CommandHandler, DispatchConfig, Dispatcher, DispatcherBuilder,
    FAILURE_NOTICE, Outcome, Responder,
};
pub use error::{ParseError, ValueError};
pub use lookup::{Invocation, lookup, split_invocation};
pub use readers::{
    DirectoryEntry, EntityDirectory, GuildDirectory, is_snowflake, read_channel, read_number,
    read_role, read_string, read_user, read_value,
};
pub use resolve::{FLAG_INTRODUCER, parse_arguments};
pub use scanner::{QUOTES, Scanner};
pub use structured::{
    OptionDefinition, OptionKind, ReplyStrategy, StructuredCommand, StructuredError,
    StructuredOption, StructuredValue, arguments_from_options, check_structured,
    check_structured_name, structured_definition,
};
pub use value::{ArgValue, ArgumentMap};
