//! Registry loading with builder pattern and fallback chains.
//!
//! Provides [`LoadedRegistry`] for a validated [`CommandRegistry`] that
//! remembers where it came from, and [`RegistryLoader`] for constructing one
//! from multiple sources with automatic fallback.
//!
//! # Loading patterns
//!
//! ```no_run
//! use chat_command_db::LoadedRegistry;
//!
//! // One schema per file: commands/ping.yaml, commands/tag.json, ...
//! let loaded = LoadedRegistry::from_dir("commands/").unwrap();
//! assert!(loaded.registry().find("tag").is_some());
//!
//! // A SchemaPackage bundle in JSON or YAML
//! let loaded = LoadedRegistry::from_bundle("commands.json").unwrap();
//!
//! // The built-in command set
//! let loaded = LoadedRegistry::bundled().unwrap();
//!
//! // Fallback chain
//! let loaded = LoadedRegistry::builder()
//!     .from_dir("commands/")
//!     .from_bundle("commands.json")
//!     .with_bundled()
//!     .build()
//!     .unwrap();
//! ```

use std::path::{Path, PathBuf};

use chat_command_core::{CommandRegistry, CommandSchema, SchemaPackage, validate_registry};
use tracing::{info, warn};

use crate::bundle::verify_package;
use crate::bundled::load_bundled_schemas;
use crate::error::{DatabaseError, Result};
use crate::format::{DocumentFormat, read_document};

/// Describes where a [`LoadedRegistry`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    /// A directory holding one command schema per JSON or YAML file.
    Directory(PathBuf),
    /// A single [`SchemaPackage`] file.
    Bundle(PathBuf),
    /// The schemas compiled into the binary.
    Bundled,
    /// A fallback chain of several sources.
    Multiple(Vec<RegistrySource>),
}

impl RegistrySource {
    /// Treats directories as schema directories and files as bundles.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::Directory(path)
        } else {
            Self::Bundle(path)
        }
    }
}

/// A validated registry together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedRegistry {
    registry: CommandRegistry,
    source: RegistrySource,
}

impl LoadedRegistry {
    /// Returns a new [`RegistryLoader`] for configuring a fallback chain.
    pub fn builder() -> RegistryLoader {
        RegistryLoader::new()
    }

    /// Loads every `*.json`, `*.yaml` and `*.yml` file of a directory as one
    /// [`CommandSchema`].
    ///
    /// Files are read in file-name order, which becomes registry order.
    /// Other files are skipped.
    ///
    /// # Errors
    ///
    /// Returns I/O or parse errors for unreadable files, and
    /// [`DatabaseError::Invalid`] if the schemas do not form a valid
    /// registry.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if !file_path.is_file() {
                continue;
            }
            if DocumentFormat::from_path(&file_path).is_some() {
                files.push(file_path);
            } else {
                warn!(path = %file_path.display(), "Skipping non-schema file");
            }
        }
        files.sort();

        let mut commands = Vec::with_capacity(files.len());
        for file_path in &files {
            let schema: CommandSchema = read_document(file_path)?;
            commands.push(schema);
        }

        let registry = checked(CommandRegistry::new(commands))?;
        info!(path = %path.display(), commands = registry.len(), "Loaded schema directory");
        Ok(Self {
            registry,
            source: RegistrySource::Directory(path.to_path_buf()),
        })
    }

    /// Loads a [`SchemaPackage`] file in JSON or YAML.
    ///
    /// # Errors
    ///
    /// Returns I/O or parse errors, [`DatabaseError::InvalidChecksum`] if the
    /// package hash does not match, and [`DatabaseError::Invalid`] if the
    /// schemas do not form a valid registry.
    pub fn from_bundle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let package: SchemaPackage = read_document(path)?;
        verify_package(&package)?;

        let registry = checked(CommandRegistry::new(package.schemas))?;
        info!(path = %path.display(), commands = registry.len(), "Loaded schema bundle");
        Ok(Self {
            registry,
            source: RegistrySource::Bundle(path.to_path_buf()),
        })
    }

    /// Loads the built-in command set compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::YamlError`] if the embedded schemas fail to
    /// parse, or [`DatabaseError::Invalid`] if they do not form a valid
    /// registry.
    pub fn bundled() -> Result<Self> {
        let registry = checked(CommandRegistry::new(load_bundled_schemas()?))?;
        info!(commands = registry.len(), "Loaded bundled schemas");
        Ok(Self {
            registry,
            source: RegistrySource::Bundled,
        })
    }

    /// Loads a single source.
    pub fn from_source(source: &RegistrySource) -> Result<Self> {
        match source {
            RegistrySource::Directory(path) => Self::from_dir(path),
            RegistrySource::Bundle(path) => Self::from_bundle(path),
            RegistrySource::Bundled => Self::bundled(),
            RegistrySource::Multiple(sources) => sources
                .iter()
                .cloned()
                .fold(RegistryLoader::new(), RegistryLoader::source)
                .build(),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> CommandRegistry {
        self.registry
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &RegistrySource {
        &self.source
    }
}

fn checked(registry: CommandRegistry) -> Result<CommandRegistry> {
    let errors = validate_registry(&registry);
    if errors.is_empty() {
        return Ok(registry);
    }
    let message = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(DatabaseError::Invalid(message))
}

/// Builder for constructing a [`LoadedRegistry`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful load
/// wins; if all fail, [`DatabaseError::NoSourcesAvailable`] is returned.
///
/// # Example
///
/// ```no_run
/// use chat_command_db::LoadedRegistry;
///
/// let loaded = LoadedRegistry::builder()
///     .from_dir("/etc/bot/commands/")
///     .from_bundle("/usr/share/bot/commands.json")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistryLoader {
    sources: Vec<RegistrySource>,
}

impl RegistryLoader {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory of schema files as a source.
    pub fn from_dir(self, path: impl Into<PathBuf>) -> Self {
        self.source(RegistrySource::Directory(path.into()))
    }

    /// Adds a [`SchemaPackage`] file as a source.
    pub fn from_bundle(self, path: impl Into<PathBuf>) -> Self {
        self.source(RegistrySource::Bundle(path.into()))
    }

    /// Adds the built-in command set as a source.
    pub fn with_bundled(self) -> Self {
        self.source(RegistrySource::Bundled)
    }

    pub fn source(mut self, source: RegistrySource) -> Self {
        self.sources.push(source);
        self
    }

    /// Attempts to load from configured sources in order.
    ///
    /// Returns the first successfully loaded registry. If all sources fail,
    /// returns [`DatabaseError::NoSourcesAvailable`].
    pub fn build(self) -> Result<LoadedRegistry> {
        for source in &self.sources {
            match LoadedRegistry::from_source(source) {
                Ok(mut loaded) => {
                    loaded.source = RegistrySource::Multiple(self.sources.clone());
                    return Ok(loaded);
                }
                Err(err) => warn!(?source, error = %err, "Registry source failed"),
            }
        }

        Err(DatabaseError::NoSourcesAvailable)
    }
}
