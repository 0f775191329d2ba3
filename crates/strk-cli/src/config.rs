//! CLI configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strk_sdk::ClientConfig;

/// CLI configuration, stored as TOML under `~/.strk`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Ledger and wait settings
    #[serde(flatten)]
    pub client: ClientConfig,
    /// Account that unique deployments are bound to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_address: Option<String>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".strk"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from file or return default
    pub fn load() -> Self {
        let Some(path) = Self::config_path().filter(|p| p.exists()) else {
            return Self::default();
        };

        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<(), std::io::Error> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "Cannot determine config path")
        })?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        std::fs::write(path, content)
    }
}
