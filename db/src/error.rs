//! Error types for registry loading and configuration.
//!
//! Provides a unified error type covering all failure modes: I/O,
//! serialization, unsupported file formats, checksum verification, and invalid
//! registries.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading registries, bundles, or configs.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is neither JSON nor YAML.
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The loaded commands do not form a valid registry.
    #[error("invalid registry: {0}")]
    Invalid(String),

    /// Bundle hash does not match the packaged schemas.
    #[error("invalid checksum: {0}")]
    InvalidChecksum(String),

    /// All configured loader sources failed.
    #[error("no registry sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`DatabaseError`].
pub type Result<T> = std::result::Result<T, DatabaseError>;
