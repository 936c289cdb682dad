//! Guild directory snapshots on disk.
//!
//! A snapshot lists the roles and channels of one guild so role and channel
//! names can be resolved offline:
//!
//! ```yaml
//! roles:
//!   - id: "100"
//!     name: Moderators
//! channels:
//!   - id: "200"
//!     name: support
//! ```

use std::path::Path;

use chat_command_parser::GuildDirectory;
use tracing::info;

use crate::error::Result;
use crate::format::read_document;

/// Loads a [`GuildDirectory`] from a JSON or YAML file.
///
/// # Errors
///
/// Returns I/O, parse, or [`UnsupportedFormat`](crate::DatabaseError::UnsupportedFormat)
/// errors.
pub fn load_directory_snapshot(path: impl AsRef<Path>) -> Result<GuildDirectory> {
    let path = path.as_ref();
    let directory: GuildDirectory = read_document(path)?;
    info!(
        path = %path.display(),
        roles = directory.roles.len(),
        channels = directory.channels.len(),
        "Loaded directory snapshot"
    );
    Ok(directory)
}
