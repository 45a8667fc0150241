//! Configuration management for flowscope.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `flowscope.toml` file
//! 3. User config `~/.config/flowscope/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

use crate::component::KindSet;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// NiFi server connection.
    pub server: ServerConfig,

    /// Snapshot traversal settings.
    pub traversal: TraversalConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./flowscope.toml` (project local)
    /// 2. `~/.config/flowscope/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::from_file(LOCAL_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var("FLOWSCOPE_SERVER_URL") {
            self.server.url = url;
        }
        if let Ok(prefix) = std::env::var("FLOWSCOPE_API_PREFIX") {
            self.server.api_prefix = prefix;
        }
        if let Ok(token) = std::env::var("FLOWSCOPE_TOKEN") {
            self.server.token = Some(token);
        }
        if let Ok(insecure) = std::env::var("FLOWSCOPE_INSECURE") {
            self.server.insecure = parse_bool(&insecure).ok_or_else(|| {
                ConfigError::Invalid(format!("FLOWSCOPE_INSECURE is not a boolean: {}", insecure))
            })?;
        }
        if let Ok(secs) = std::env::var("FLOWSCOPE_TIMEOUT_SECS") {
            self.server.timeout_secs = parse_number("FLOWSCOPE_TIMEOUT_SECS", &secs)?;
        }
        if let Ok(depth) = std::env::var("FLOWSCOPE_MAX_DEPTH") {
            self.traversal.max_depth = parse_number("FLOWSCOPE_MAX_DEPTH", &depth)?;
        }
        Ok(())
    }

    /// Check values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.url.trim().is_empty() {
            return Err(ConfigError::Invalid("server.url must not be empty".to_string()));
        }
        if self.traversal.max_depth == 0 {
            return Err(ConfigError::Invalid("traversal.max_depth must be at least 1".to_string()));
        }
        self.traversal.kind_set().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} is not a number: {}", name, value)))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// NiFi server connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the NiFi instance, without the API prefix.
    pub url: String,

    /// Path prefix of the REST API.
    pub api_prefix: String,

    /// Bearer token (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Skip TLS certificate verification.
    pub insecure: bool,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            token: None, // Load from env
            insecure: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Snapshot traversal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Descend into nested process groups.
    pub recursive: bool,

    /// Deepest nesting accepted before the response is rejected.
    pub max_depth: usize,

    /// Kind tags to list, e.g. `["processor", "inputport"]`.
    pub kinds: Vec<String>,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: DEFAULT_MAX_DEPTH,
            kinds: DEFAULT_KINDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TraversalConfig {
    /// Parse the configured kind tags.
    pub fn kind_set(&self) -> Result<KindSet, String> {
        KindSet::from_tags(&self.kinds)
    }
}
