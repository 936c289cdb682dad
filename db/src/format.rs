//! JSON/YAML document reading and writing, chosen by file extension.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DatabaseError, Result};

/// On-disk encoding of a schema, bundle, config, or snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detects the format from the extension: `.json`, `.yaml` or `.yml`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_command_db::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_path("tag.json"), Some(DocumentFormat::Json));
    /// assert_eq!(DocumentFormat::from_path("bot.yml"), Some(DocumentFormat::Yaml));
    /// assert_eq!(DocumentFormat::from_path("README.md"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Reads a document whose format is implied by its extension.
///
/// # Errors
///
/// Returns [`DatabaseError::UnsupportedFormat`] for unknown extensions, and
/// I/O or parse errors otherwise.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| DatabaseError::UnsupportedFormat(path.to_path_buf()))?;
    let reader = BufReader::new(File::open(path)?);
    let value = match format {
        DocumentFormat::Json => serde_json::from_reader(reader)?,
        DocumentFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(value)
}

/// Writes a document in the format implied by its extension.
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| DatabaseError::UnsupportedFormat(path.to_path_buf()))?;
    let writer = BufWriter::new(File::create(path)?);
    match format {
        DocumentFormat::Json => serde_json::to_writer_pretty(writer, value)?,
        DocumentFormat::Yaml => serde_yaml::to_writer(writer, value)?,
    }
    Ok(())
}
