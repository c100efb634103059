//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment (`STASHER_DATA_DIR`)
//! 4. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$STASHER_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/stasher/config.toml`
//! 3. `<config_dir>/stasher/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use stasher::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("Data root: {:?}", config.data_dir());
//! println!("Follow symlinks: {}", config.follow_symlinks());
//! ```

pub mod schema;

pub use schema::{ApplyConfig, ReloadConfig, ReloadHook, StasherConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::atomic;
use crate::core::paths::StasherPaths;
use crate::core::types::ConflictPolicy;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "STASHER_CONFIG";

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "STASHER_DATA_DIR";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {message}")]
    WriteError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("no user config or data directory on this platform")]
    NoUserDir,
}

/// Effective configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (defaults if no file was found)
    pub file: StasherConfig,
    /// Path the file was loaded from
    loaded_from: Option<PathBuf>,
    /// `STASHER_DATA_DIR` at load time
    env_data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// fails validation. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let env_data_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        match Self::find_config_file() {
            Some(path) => {
                let mut config = Self::load_from(&path)?;
                config.env_data_dir = env_data_dir;
                Ok(config)
            }
            None => {
                debug!("no config file found, using defaults");
                Ok(Self {
                    env_data_dir,
                    ..Self::default()
                })
            }
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let file = Self::read_config(path)?;
        file.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(Self {
            file,
            loaded_from: Some(path.to_path_buf()),
            env_data_dir: None,
        })
    }

    fn find_config_file() -> Option<PathBuf> {
        // 1. Check $STASHER_CONFIG
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/stasher/config.toml
        if let Some(xdg_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("stasher/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check the platform config dir
        Self::config_path().ok().filter(|path| path.exists())
    }

    fn read_config(path: &Path) -> Result<StasherConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Canonical config path: `<config_dir>/stasher/config.toml`.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoUserDir)?;
        Ok(dir.join("stasher").join("config.toml"))
    }

    /// Write a config file atomically.
    pub fn write(path: &Path, config: &StasherConfig) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        atomic::write_atomic(path, contents.as_bytes()).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Data root: environment, then config file, then the platform default.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.env_data_dir {
            return Ok(dir.clone());
        }
        if let Some(dir) = &self.file.data_dir {
            return Ok(dir.clone());
        }
        StasherPaths::default_root().ok_or(ConfigError::NoUserDir)
    }

    /// Whether copies follow symlinks.
    ///
    /// Defaults to `true` if not configured.
    pub fn follow_symlinks(&self) -> bool {
        self.file.follow_symlinks.unwrap_or(true)
    }

    /// Conflict policy for apply.
    ///
    /// Defaults to `Overwrite` if not configured.
    pub fn apply_conflict(&self) -> ConflictPolicy {
        self.file
            .apply
            .as_ref()
            .and_then(|a| a.conflict)
            .unwrap_or_default()
    }

    /// Reload hooks, falling back to the built-in defaults.
    pub fn reload_hooks(&self) -> Vec<ReloadHook> {
        match &self.file.reload {
            Some(reload) => reload.hooks.clone(),
            None => ReloadHook::defaults(),
        }
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();

        assert!(config.follow_symlinks());
        assert_eq!(config.apply_conflict(), ConflictPolicy::Overwrite);
        assert_eq!(config.reload_hooks(), ReloadHook::defaults());
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            data_dir = "/srv/stasher"
            follow_symlinks = false

            [apply]
            conflict = "skip"

            [reload]
            hooks = []
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/srv/stasher"));
        assert!(!config.follow_symlinks());
        assert_eq!(config.apply_conflict(), ConflictPolicy::Skip);
        assert!(config.reload_hooks().is_empty());
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn env_data_dir_overrides_file() {
        let config = Config {
            file: StasherConfig {
                data_dir: Some(PathBuf::from("/from/file")),
                ..Default::default()
            },
            loaded_from: None,
            env_data_dir: Some(PathBuf::from("/from/env")),
        };

        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/from/env"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "unknown_field = true").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "data_dir = \"relative\"").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn write_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stasher").join("config.toml");

        Config::write(&path, &StasherConfig::starter()).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.file, StasherConfig::starter());
    }
}
