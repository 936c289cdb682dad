//! Bot configuration.
//!
//! Defines the YAML-serializable configuration that tells a bot which
//! prefixes it answers to, where its command registry lives, and which guild
//! directory snapshot to resolve names against.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! prefixes:
//!   - "!"
//!   - "?"
//! registry:
//!   - kind: directory
//!     path: commands
//!   - kind: bundle
//!     path: commands.json
//! directory: guild.yaml
//! ```
//!
//! Relative paths are resolved against the directory of the config file.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chat_command_parser::{DispatchConfig, GuildDirectory};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loader::{RegistryLoader, RegistrySource};
use crate::snapshot::load_directory_snapshot;

/// One registry source as written in the config file.
///
/// # Examples
///
/// ```
/// # use chat_command_db::SourceConfig;
/// let source: SourceConfig = serde_yaml::from_str("kind: bundle\npath: commands.json").unwrap();
/// assert_eq!(source, SourceConfig::Bundle { path: "commands.json".into() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// A directory with one schema per file.
    Directory { path: PathBuf },
    /// A schema bundle file.
    Bundle { path: PathBuf },
    /// The built-in command set.
    Bundled,
}

/// Top-level bot configuration.
///
/// # Examples
///
/// ```no_run
/// use chat_command_db::BotConfig;
///
/// let config = BotConfig::load("bot.yaml").unwrap();
/// let registry = config.loader().build().unwrap().into_registry();
/// println!("{} commands, prefixes {:?}", registry.len(), config.prefixes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Message prefixes; an empty list answers every message.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    /// Registry sources, tried in order until one loads.
    #[serde(default)]
    pub registry: Vec<SourceConfig>,
    /// Optional guild directory snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_prefixes() -> Vec<String> {
    DispatchConfig::default().prefixes
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            prefixes: default_prefixes(),
            registry: Vec::new(),
            directory: None,
            base_dir: None,
        }
    }
}

impl BotConfig {
    /// Loads configuration from a YAML file.
    ///
    /// Relative paths in the file are resolved against its parent directory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DatabaseError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::DatabaseError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        let base_dir = path.parent().map(Path::to_path_buf);
        Ok(config.with_base_dir(base_dir.unwrap_or_default()))
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DatabaseError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::DatabaseError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Sets the directory relative paths are resolved against.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Resolves a configured path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Message-surface settings for the dispatcher.
    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            prefixes: self.prefixes.clone(),
        }
    }

    /// A loader over the configured registry sources, in order.
    pub fn loader(&self) -> RegistryLoader {
        self.registry
            .iter()
            .map(|source| match source {
                SourceConfig::Directory { path } => RegistrySource::Directory(self.resolve(path)),
                SourceConfig::Bundle { path } => RegistrySource::Bundle(self.resolve(path)),
                SourceConfig::Bundled => RegistrySource::Bundled,
            })
            .fold(RegistryLoader::new(), RegistryLoader::source)
    }

    /// Loads the configured directory snapshot, if any.
    pub fn load_directory(&self) -> Result<Option<GuildDirectory>> {
        self.directory
            .as_deref()
            .map(|path| load_directory_snapshot(self.resolve(path)))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
prefixes:
  - "!"
  - "?"
registry:
  - kind: directory
    path: commands
  - kind: bundle
    path: /opt/bot/commands.json
directory: guild.yaml
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: BotConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.prefixes, vec!["!", "?"]);
        assert_eq!(
            config.registry,
            vec![
                SourceConfig::Directory {
                    path: "commands".into()
                },
                SourceConfig::Bundle {
                    path: "/opt/bot/commands.json".into()
                },
            ]
        );
        assert_eq!(config.directory, Some(PathBuf::from("guild.yaml")));
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: BotConfig = serde_yaml::from_str("version: \"1.0\"\n").unwrap();
        assert_eq!(config.prefixes, vec!["!"]);
        assert!(config.registry.is_empty());
        assert!(config.directory.is_none());
        assert!(config.load_directory().unwrap().is_none());
    }

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let config: BotConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let config = config.with_base_dir("/etc/bot");
        assert_eq!(
            config.resolve(Path::new("commands")),
            PathBuf::from("/etc/bot/commands")
        );
        assert_eq!(
            config.resolve(Path::new("/opt/bot/commands.json")),
            PathBuf::from("/opt/bot/commands.json")
        );
    }

    #[test]
    fn test_dispatch_config() {
        let config: BotConfig = serde_yaml::from_str("version: \"1.0\"\nprefixes: []\n").unwrap();
        assert!(config.dispatch_config().prefixes.is_empty());
        assert_eq!(config.dispatch_config().strip_prefix("ping"), Some("ping"));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bot.yaml");

        let config: BotConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        config.save(&path).unwrap();
        let loaded = BotConfig::load(&path).unwrap();

        assert_eq!(loaded.prefixes, config.prefixes);
        assert_eq!(loaded.registry, config.registry);
        assert_eq!(loaded.directory, config.directory);
        assert_eq!(
            loaded.resolve(Path::new("guild.yaml")),
            dir.path().join("guild.yaml")
        );
    }

    #[test]
    fn test_bundled_source() {
        let config: BotConfig = serde_yaml::from_str(
            "version: \"1.0\"\nregistry:\n  - kind: directory\n    path: /nonexistent/commands\n  - kind: bundled\n",
        )
        .unwrap();
        assert_eq!(config.registry[1], SourceConfig::Bundled);

        let registry = config.loader().build().unwrap().into_registry();
        assert!(registry.find("tag").is_some());
    }
}
