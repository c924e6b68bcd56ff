//! Configuration management for blogmill
//!
//! This module handles loading and validating configuration from
//! environment variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ops::OpsConfig;
use crate::rotation::TriggerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Post store configuration
    pub storage: StorageConfig,

    /// Rotation trigger configuration
    pub rotation: RotationConfig,

    /// Operational server configuration
    pub server: OpsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Post store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path
    pub sqlite_path: PathBuf,
}

/// Rotation-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Daily firing time (24h format, e.g., "09:00"), local time
    pub post_time: String,

    /// Run a rotation immediately when the trigger loop starts
    pub run_on_startup: bool,

    /// Create generated posts as published instead of draft
    pub publish: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let sqlite_path = std::env::var("BLOGMILL_SQLITE_PATH")
            .unwrap_or_else(|_| String::from("data/posts.db"))
            .into();

        let post_time =
            std::env::var("BLOGMILL_POST_TIME").unwrap_or_else(|_| String::from("09:00"));

        let run_on_startup = std::env::var("BLOGMILL_RUN_ON_STARTUP")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let publish = std::env::var("BLOGMILL_PUBLISH")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let bind_address = std::env::var("BLOGMILL_BIND_ADDRESS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| "0.0.0.0:8080".parse().unwrap());

        let log_level =
            std::env::var("BLOGMILL_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("BLOGMILL_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        let config = Self {
            storage: StorageConfig { sqlite_path },
            rotation: RotationConfig {
                post_time,
                run_on_startup,
                publish,
            },
            server: OpsConfig {
                bind_address,
                ..OpsConfig::default()
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.trigger_config()
            .validate()
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;

        if self.storage.sqlite_path.as_os_str().is_empty() {
            anyhow::bail!("sqlite_path must not be empty");
        }

        Ok(())
    }

    /// Trigger configuration derived from the rotation section
    pub fn trigger_config(&self) -> TriggerConfig {
        TriggerConfig {
            post_time: self.rotation.post_time.clone(),
            run_on_startup: self.rotation.run_on_startup,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                sqlite_path: PathBuf::from("data/posts.db"),
            },
            rotation: RotationConfig {
                post_time: String::from("09:00"),
                run_on_startup: false,
                publish: false,
            },
            server: OpsConfig::default(),
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_post_time_rejected() {
        let mut config = Config::default();
        config.rotation.post_time = String::from("9 in the morning");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trigger_config_conversion() {
        let mut config = Config::default();
        config.rotation.post_time = String::from("21:30");
        config.rotation.run_on_startup = true;

        let trigger = config.trigger_config();
        assert_eq!(trigger.post_time, "21:30");
        assert!(trigger.run_on_startup);
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            [storage]
            sqlite_path = "custom/posts.db"

            [rotation]
            post_time = "07:15"
            run_on_startup = true
            publish = false

            [server]
            bind_address = "127.0.0.1:9090"
            enable_cors = false
            enable_request_logging = true

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.rotation.post_time, "07:15");
        assert_eq!(config.server.bind_address.port(), 9090);
        assert_eq!(config.logging.level, "debug");
    }
}
