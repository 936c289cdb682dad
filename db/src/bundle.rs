//! Schema bundles: packaging a registry with a content hash.

use chat_command_core::{CommandRegistry, SchemaPackage};
use sha2::{Digest, Sha256};

use crate::error::{DatabaseError, Result};

/// Computes the SHA-256 hex digest of the package's schemas.
///
/// Only the schemas are hashed, as compact JSON in registry order, so
/// regenerating a bundle with a new timestamp keeps its hash.
///
/// # Examples
///
/// ```
/// use chat_command_core::{CommandSchema, SchemaPackage};
/// use chat_command_db::bundle_hash;
///
/// let mut a = SchemaPackage::new("1.0.0", "2024-01-01T00:00:00Z");
/// a.schemas.push(CommandSchema::new("ping"));
/// let mut b = a.clone();
/// b.generated_at = "2025-06-01T00:00:00Z".into();
///
/// let hash = bundle_hash(&a).unwrap();
/// assert_eq!(hash.len(), 64);
/// assert_eq!(hash, bundle_hash(&b).unwrap());
/// ```
pub fn bundle_hash(package: &SchemaPackage) -> Result<String> {
    let bytes = serde_json::to_vec(&package.schemas)?;
    let hash = Sha256::digest(&bytes);
    Ok(format!("{:x}", hash))
}

/// Packages a registry, stamping it with `generated_at` and its hash.
pub fn build_package(
    registry: &CommandRegistry,
    version: &str,
    generated_at: &str,
) -> Result<SchemaPackage> {
    let mut package = SchemaPackage::new(version, generated_at);
    package.schemas = registry.iter().cloned().collect();
    package.bundle_hash = Some(bundle_hash(&package)?);
    Ok(package)
}

/// Checks a package's recorded hash, if it carries one.
///
/// # Errors
///
/// Returns [`DatabaseError::InvalidChecksum`] when the recorded hash differs
/// from the hash of the packaged schemas.
pub fn verify_package(package: &SchemaPackage) -> Result<()> {
    let Some(expected) = &package.bundle_hash else {
        return Ok(());
    };
    let actual = bundle_hash(package)?;
    if &actual != expected {
        return Err(DatabaseError::InvalidChecksum(format!(
            "expected {expected}, found {actual}"
        )));
    }
    Ok(())
}
