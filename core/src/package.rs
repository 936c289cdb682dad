use serde::{Deserialize, Serialize};

use crate::{CommandRegistry, CommandSchema};

/// Serializable schema bundle used for distribution.
///
/// A package groups the command schemas of one bot with version metadata,
/// making it suitable for shipping a whole registry as a single JSON or YAML
/// file.
///
/// # Examples
///
/// ```
/// use chat_command_core::*;
///
/// let mut package = SchemaPackage::new("1.0.0", "2024-01-15T10:30:00Z");
/// package.name = Some("prism-bot".into());
/// package.schemas.push(CommandSchema::new("ping"));
/// package.schemas.push(CommandSchema::new("tag").with_alias("faq"));
///
/// assert_eq!(package.schema_count(), 2);
/// assert_eq!(package.to_registry().find("faq").unwrap().name, "tag");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaPackage {
    /// Schema contract version (populated from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Package format version (semver string).
    pub version: String,
    /// Optional package name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional package description.
    #[serde(default)]
    pub description: Option<String>,
    /// ISO-8601 timestamp for package creation.
    pub generated_at: String,
    /// Optional hash of deterministic bundle content.
    #[serde(default)]
    pub bundle_hash: Option<String>,
    /// Command schemas in registry order.
    pub schemas: Vec<CommandSchema>,
}

impl SchemaPackage {
    /// Creates a package with required fields.
    ///
    /// The `schema_version` is automatically set from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION).
    pub fn new(version: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            schema_version: Some(crate::SCHEMA_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            description: None,
            generated_at: generated_at.into(),
            bundle_hash: None,
            schemas: Vec::new(),
        }
    }

    /// Returns the number of schemas in this package.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Builds a registry from a copy of the packaged schemas.
    pub fn to_registry(&self) -> CommandRegistry {
        CommandRegistry::new(self.schemas.clone())
    }
}
