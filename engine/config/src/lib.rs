#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! schema-cache configuration
//!
//! Loads and saves the TOML file that specifies:
//! - Registry connection settings (URL, timeout, basic auth)
//! - Cache and codec-creation switches
//! - Logging configuration
//! - Key and value payload formats
//!
//! Every section is optional in the file; missing fields take the values of
//! [`Config::default`].

use std::path::{Path, PathBuf};

use codec::SerdeFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Registry URL used when none is configured.
pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:8081";

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the configuration file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// The configuration parsed but its values are unusable
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry connection settings
    pub registry: RegistryConfig,
    /// Cache behaviour
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Payload formats
    pub serde: SerdeConfig,
}

/// Registry connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the schema registry
    pub url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Basic-auth user
    pub username: Option<String>,
    /// Basic-auth password
    pub password: Option<String>,
    /// Bearer token, exclusive with `username`
    pub token: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            username: None,
            password: None,
            token: None,
        }
    }
}

/// Cache behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Retain fetched schemas in the dual index
    pub enabled: bool,
    /// Build payload codecs for resolved schemas
    pub codec_creation: bool,
}

impl Default for CacheConfig {
    fn default() -> Self { Self { enabled: true, codec_creation: false } }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (debug, info, warn, error)
    pub level: String,
    /// Log file path (optional)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

/// Payload formats for message keys and values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerdeConfig {
    /// Key codec
    pub key_format: SerdeFormat,
    /// Value codec
    pub value_format: SerdeFormat,
}

impl Default for SerdeConfig {
    fn default() -> Self { Self { key_format: SerdeFormat::String, value_format: SerdeFormat::Avro } }
}

impl Config {
    /// Load and validate configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/schema-cache/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("schema-cache");
        Ok(config_dir.join("config.toml"))
    }

    /// Checks values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.url.trim().is_empty() {
            return Err(ConfigError::Invalid("registry.url must not be empty".to_string()));
        }
        if self.registry.timeout_secs == 0 {
            return Err(ConfigError::Invalid("registry.timeout_secs must be positive".to_string()));
        }
        if self.registry.password.is_some() && self.registry.username.is_none() {
            return Err(ConfigError::Invalid(
                "registry.password is set without registry.username".to_string(),
            ));
        }
        if self.registry.token.is_some() && self.registry.username.is_some() {
            return Err(ConfigError::Invalid(
                "registry.token and registry.username are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}
