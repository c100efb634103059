//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: `data_dir` must be absolute
//! and every reload hook needs a program.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::ConflictPolicy;

/// User configuration.
///
/// # Example
///
/// ```toml
/// data_dir = "/home/u/.local/share/stasher"
/// follow_symlinks = true
///
/// [apply]
/// conflict = "overwrite"
///
/// [[reload.hooks]]
/// program = "hyprctl"
/// args = ["reload"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StasherConfig {
    /// Override for the data root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Follow symlinks when copying (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_symlinks: Option<bool>,

    /// Apply defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply: Option<ApplyConfig>,

    /// Reload hooks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload: Option<ReloadConfig>,
}

impl StasherConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.data_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue(format!(
                    "data_dir must be an absolute path, got '{}'",
                    dir.display()
                )));
            }
        }

        if let Some(reload) = &self.reload {
            for hook in &reload.hooks {
                hook.validate()?;
            }
        }

        Ok(())
    }

    /// The configuration written by `stasher config init`.
    pub fn starter() -> Self {
        Self {
            data_dir: None,
            follow_symlinks: Some(true),
            apply: Some(ApplyConfig {
                conflict: Some(ConflictPolicy::Overwrite),
            }),
            reload: Some(ReloadConfig {
                hooks: ReloadHook::defaults(),
            }),
        }
    }
}

/// `[apply]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApplyConfig {
    /// What to do with files that exist at the destination
    pub conflict: Option<ConflictPolicy>,
}

/// `[reload]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReloadConfig {
    /// Commands run after applying a stash
    pub hooks: Vec<ReloadHook>,
}

/// An external command notified after configs change on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReloadHook {
    /// Executable name or path
    pub program: String,
    /// Arguments
    #[serde(default)]
    pub args: Vec<String>,
}

impl ReloadHook {
    /// Create a hook from a program and its arguments.
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Window manager reload and status bar refresh.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("hyprctl", &["reload"]),
            Self::new("killall", &["-SIGUSR2", "waybar"]),
        ]
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "reload hook program cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for ReloadHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: StasherConfig = toml::from_str(
            r#"
            data_dir = "/srv/stasher"
            follow_symlinks = false

            [apply]
            conflict = "skip"

            [[reload.hooks]]
            program = "swaymsg"
            args = ["reload"]
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());

        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/stasher")));
        assert_eq!(config.follow_symlinks, Some(false));
        assert_eq!(
            config.apply.unwrap().conflict,
            Some(ConflictPolicy::Skip)
        );
        assert_eq!(
            config.reload.unwrap().hooks,
            vec![ReloadHook::new("swaymsg", &["reload"])]
        );
    }

    #[test]
    fn relative_data_dir_rejected() {
        let config = StasherConfig {
            data_dir: Some(PathBuf::from("relative/dir")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_hook_program_rejected() {
        let config = StasherConfig {
            reload: Some(ReloadConfig {
                hooks: vec![ReloadHook::new("  ", &[])],
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn starter_round_trips_through_toml() {
        let text = toml::to_string_pretty(&StasherConfig::starter()).unwrap();
        let parsed: StasherConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, StasherConfig::starter());
    }

    #[test]
    fn hook_display() {
        assert_eq!(
            ReloadHook::new("killall", &["-SIGUSR2", "waybar"]).to_string(),
            "killall -SIGUSR2 waybar"
        );
    }
}
