//! Configuration module for smartfiles
//!
//! Holds the library location and the browsing defaults. The file lives in the
//! user's config directory; `SMARTFILES_*` environment variables override it.

mod setup;

pub use setup::first_time_setup;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SMARTFILES";

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SmartFilesConfig {
    /// Directory holding `metadata/` and the blob directory
    pub library_root: Option<PathBuf>,

    /// Name of the blob directory under the library root
    pub files_dir: String,

    /// Number of items shown under "Recents"
    pub recents_limit: usize,

    /// Quiet period before a typed query is applied
    pub search_debounce_ms: u64,

    /// Fail listings on the first unreadable record instead of skipping it
    pub strict_listing: bool,

    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,

    /// Suppress success notices by default
    pub quiet: bool,
}

impl Default for SmartFilesConfig {
    fn default() -> Self {
        Self {
            library_root: None,
            files_dir: "files".to_string(),
            recents_limit: crate::search::DEFAULT_RECENTS_LIMIT,
            search_debounce_ms: 300,
            strict_listing: false,
            log_level: "warn".to_string(),
            quiet: false,
        }
    }
}

impl SmartFilesConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("smartfiles").join("config.toml"))
    }

    /// Library location used when none is configured
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system data directory cannot be determined.
    pub fn default_library_root() -> Result<PathBuf, ConfigError> {
        dirs::data_local_dir()
            .map(|dir| dir.join("smartfiles"))
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
            return Ok(config);
        }
        Self::load_from(&path)
    }

    /// Load configuration from `path`, layered with the environment
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or an override cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_layered(path, None)
    }

    fn load_layered(path: &Path, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Effective library root
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no root is configured and the system data
    /// directory cannot be determined.
    pub fn library_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.library_root {
            Some(root) => Ok(root.clone()),
            None => Self::default_library_root(),
        }
    }

    /// Load configuration, running first-time setup if the file doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            first_time_setup()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SmartFilesConfig::default();
        assert!(config.library_root.is_none());
        assert_eq!(config.files_dir, "files");
        assert_eq!(config.recents_limit, 20);
        assert_eq!(config.search_debounce_ms, 300);
        assert!(!config.strict_listing);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SmartFilesConfig::load_layered(&dir.path().join("none.toml"), Some(HashMap::new())).unwrap();
        assert_eq!(config, SmartFilesConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = SmartFilesConfig {
            library_root: Some(dir.path().join("library")),
            recents_limit: 5,
            strict_listing: true,
            ..SmartFilesConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = SmartFilesConfig::load_layered(&path, Some(HashMap::new())).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.library_root().unwrap(), dir.path().join("library"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "recents_limit = 3\n").unwrap();

        let config = SmartFilesConfig::load_layered(&path, Some(HashMap::new())).unwrap();
        assert_eq!(config.recents_limit, 3);
        assert_eq!(config.files_dir, "files");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "recents_limit = 3\nfiles_dir = \"blobs\"\n").unwrap();

        let env = HashMap::from([
            ("SMARTFILES_RECENTS_LIMIT".to_string(), "50".to_string()),
            ("SMARTFILES_STRICT_LISTING".to_string(), "true".to_string()),
        ]);
        let config = SmartFilesConfig::load_layered(&path, Some(env)).unwrap();
        assert_eq!(config.recents_limit, 50);
        assert!(config.strict_listing);
        assert_eq!(config.files_dir, "blobs");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "recents_limit = \"many\"\n").unwrap();

        assert!(SmartFilesConfig::load_layered(&path, Some(HashMap::new())).is_err());
    }
}
