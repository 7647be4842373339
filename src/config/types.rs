use serde::{Deserialize, Serialize};

use crate::api::Locale;

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Default settings for the integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Locale used when none is given on the command line.
    #[serde(default = "default_locale")]
    pub locale: Locale,
    /// Refresh period of the coordinator in seconds (default: 300).
    #[serde(default = "default_update_interval")]
    pub update_interval_seconds: u64,
    /// Total timeout of a refresh request in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 10).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Total timeout of the setup probe in seconds (default: 10).
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u32,
}

/// Upstream medal standings API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without the locale segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path segment appended after the locale (e.g., "medals").
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

fn default_locale() -> Locale {
    Locale::English
}

fn default_update_interval() -> u64 {
    300
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    10
}

fn default_probe_timeout() -> u32 {
    10
}

fn default_base_url() -> String {
    "https://www.olympics.com/wmr-owg2026/competition/api".to_string()
}

fn default_endpoint() -> String {
    "medals".to_string()
}

fn default_user_agent() -> String {
    format!("cortina-medals/{}", env!("CARGO_PKG_VERSION"))
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            update_interval_seconds: default_update_interval(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            probe_timeout_seconds: default_probe_timeout(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            api: ApiConfig::default(),
        }
    }
}
