use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::config::types::Config;

/// Longest accepted refresh period: one day.
const MAX_UPDATE_INTERVAL_SECONDS: u64 = 86_400;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/cortina-medals/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("cortina-medals").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The base URL is an http(s) URL
    /// - The endpoint is not empty
    /// - The refresh interval and all timeouts are non-zero
    /// - The refresh interval is at most one day
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!("API base URL '{}' must start with http:// or https://", base_url),
            });
        }

        if self.api.endpoint.trim().trim_matches('/').is_empty() {
            return Err(ConfigError::ValidationError {
                message: "API endpoint must not be empty".to_string(),
            });
        }

        if self.defaults.update_interval_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "update_interval_seconds must be greater than zero".to_string(),
            });
        }

        if self.defaults.update_interval_seconds > MAX_UPDATE_INTERVAL_SECONDS {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "update_interval_seconds must be at most {} (one day)",
                    MAX_UPDATE_INTERVAL_SECONDS
                ),
            });
        }

        let timeouts = [
            ("timeout_seconds", self.defaults.timeout_seconds),
            ("connect_timeout_seconds", self.defaults.connect_timeout_seconds),
            ("probe_timeout_seconds", self.defaults.probe_timeout_seconds),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ValidationError {
                message: format!("{} must be greater than zero", name),
            });
        }

        Ok(())
    }

    /// Refresh period of the coordinator.
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.defaults.update_interval_seconds)
    }
}
