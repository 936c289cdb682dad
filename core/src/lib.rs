//! Core schema types shared by every chat command input surface.
//!
//! This crate defines the foundational types for modeling chat commands:
//!
//! - [`CommandSchema`] — a command with its aliases, an optional positional
//!   primary flag, and named flags.
//! - [`FlagSchema`] — a typed flag with aliases and a required marker.
//! - [`FlagType`] — the value type a flag accepts.
//! - [`CommandRegistry`] — the immutable, ordered list of commands a bot
//!   answers to.
//! - [`SchemaPackage`] — a versioned bundle of command schemas for
//!   distribution.
//!
//! Validation ([`validate_schema`], [`validate_registry`]) catches structural
//! errors such as duplicate flags, unmatchable flag names, and command name
//! collisions.
//!
//! # Example
//!
//! ```
//! use chat_command_core::*;
//!
//! let registry = CommandRegistry::new(vec![
//!     CommandSchema::new("ping").with_description("Replies with pong!"),
//!     CommandSchema::new("tag")
//!         .with_alias("faq")
//!         .with_primary(FlagSchema::new("name", FlagType::String).required())
//!         .with_flag(FlagSchema::new("user", FlagType::User).with_alias("u")),
//! ]);
//!
//! assert_eq!(registry.find("faq").unwrap().name, "tag");
//! assert!(validate_registry(&registry).is_empty());
//! ```

mod describe;
mod package;
mod types;
mod validate;

pub use describe::{describe_registry, describe_short};
pub use package::SchemaPackage;
pub use types::*;
pub use validate::{ValidationError, validate_registry, validate_schema};
