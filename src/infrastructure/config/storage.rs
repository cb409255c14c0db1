//! Gallery settings file on disk.

use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no platform config directory for picsum-gallery")]
    ConfigDirNotFound,
    #[error("config file io: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode default settings: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Owns the directory holding `config.toml`.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigDirNotFound`] when the platform has no
    /// per-user config location.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> Result<(), ConfigError> {
        if !self.config_dir.exists() {
            info!(dir = ?self.config_dir, "Creating gallery config directory");
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Reads the gallery settings from `--config` if given, otherwise from
    /// `config.toml` in the config directory.
    ///
    /// A missing file is seeded with [`AppConfig::default`]. A file that does
    /// not parse is kept as is and the defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the defaults
    /// cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let config_path = match path_override {
            Some(path) => path.to_path_buf(),
            None => {
                self.ensure_config_dir()?;
                self.config_dir.join(CONFIG_FILE_NAME)
            }
        };

        if !config_path.exists() {
            return Self::seed_defaults(&config_path);
        }

        let content = fs::read_to_string(&config_path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => {
                debug!(path = ?config_path, "Loaded gallery settings");
                Ok(config)
            }
            Err(e) => {
                warn!(path = ?config_path, error = %e, "Malformed config, falling back to defaults");
                Ok(AppConfig::default())
            }
        }
    }

    fn seed_defaults(path: &Path) -> Result<AppConfig, ConfigError> {
        info!(path = ?path, "Writing default gallery settings");
        let defaults = AppConfig::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::write_atomic(path, &toml::to_string_pretty(&defaults)?)?;
        Ok(defaults)
    }

    /// Replaces `path` through a sibling temp file.
    fn write_atomic(path: &Path, content: &str) -> Result<(), ConfigError> {
        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("config path has no parent directory"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
