//! Built-in command schemas compiled into the binary.
//!
//! The embedded registry is the stock bot command set: `help`, `joke`,
//! `members`, `modrinth`, `ping`, `rory`, `say`, `stars` and `tag`.

use chat_command_core::CommandSchema;

use crate::error::Result;

const BUNDLED_SCHEMAS: &str = include_str!("../schemas/commands.yaml");

/// Parses the embedded schema list in declaration order.
pub(crate) fn load_bundled_schemas() -> Result<Vec<CommandSchema>> {
    Ok(serde_yaml::from_str(BUNDLED_SCHEMAS)?)
}
