//! Configuration file support for the planner.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/garmin-planner/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub connect: ConnectConfig,

    #[serde(default)]
    pub import: ImportConfig,
}

/// Workout service connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the workout service; obtaining it is up to the user
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConnectConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The access token, or a configuration error explaining where to put it
    pub fn require_token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("connect.access_token is not set; add it to the config file".into())
            })
    }
}

/// Import behaviour defaults
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ImportConfig {
    /// Delete remote workouts with the same name before importing
    #[serde(default)]
    pub delete_same_name: bool,
}

// Default value functions
fn default_base_url() -> String {
    "https://connectapi.garmin.com".into()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from `path`, or defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from(".config"))
        });
        base.join("garmin-planner").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.connect.base_url, "https://connectapi.garmin.com");
        assert_eq!(config.connect.timeout_secs, 30);
        assert!(config.connect.access_token.is_none());
        assert!(!config.import.delete_same_name);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[connect]
access_token = "abc123"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.connect.require_token().unwrap(), "abc123");
        assert_eq!(config.connect.timeout(), Duration::from_secs(30)); // default
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let config = Config::default();
        assert!(matches!(config.connect.require_token(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.connect.access_token = Some("  ".into());
        assert!(config.connect.require_token().is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.connect.timeout_secs, 30);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.import.delete_same_name = true;
        config.connect.timeout_secs = 5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.import.delete_same_name);
        assert_eq!(loaded.connect.timeout_secs, 5);
    }
}
