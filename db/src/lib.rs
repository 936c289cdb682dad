//! Registry loading, bundling and configuration for chat command schemas.
//!
//! This crate loads command schemas from disk (directories of per-command
//! files or single bundles, in JSON or YAML) or from the built-in command
//! set compiled into the binary, validates them into a
//! [`CommandRegistry`](chat_command_core::CommandRegistry), and reads the
//! bot configuration and guild directory snapshots around them.
//!
//! # Quick start
//!
//! ```no_run
//! use chat_command_db::{BotConfig, LoadedRegistry, build_package};
//!
//! // Load schemas from a directory
//! let loaded = LoadedRegistry::from_dir("commands/").unwrap();
//! if let Some(tag) = loaded.registry().find("tag") {
//!     println!("tag has {} named flags", tag.flags.len());
//! }
//!
//! // Use the builder for fallback chains
//! let loaded = LoadedRegistry::builder()
//!     .from_dir("commands/")
//!     .from_bundle("commands.json")
//!     .build()
//!     .unwrap();
//!
//! // Package the registry for distribution
//! let package = build_package(loaded.registry(), "1.0.0", "2024-01-15T10:30:00Z").unwrap();
//!
//! // Or let the bot config drive everything
//! let config = BotConfig::load("bot.yaml").unwrap();
//! let registry = config.loader().build().unwrap().into_registry();
//! let directory = config.load_directory().unwrap();
//! ```

mod bundle;
mod bundled;
mod config;
mod error;
mod format;
mod loader;
mod snapshot;

pub use bundle::{build_package, bundle_hash, verify_package};
pub use config::{BotConfig, SourceConfig};
pub use error::{DatabaseError, Result};
pub use format::{DocumentFormat, read_document, write_document};
pub use loader::{LoadedRegistry, RegistryLoader, RegistrySource};
pub use snapshot::load_directory_snapshot;
