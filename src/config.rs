// Configuration File Support
//
// TOML configuration with environment variable overrides. The bare `PORT`
// variable is honored for compatibility with existing deployments of this
// activity; everything else uses the BRIDGE_ prefix.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Port the host-facing HTTP server listens on
    pub port: u16,

    /// Timeout in seconds for the outbound webhook call
    pub webhook_timeout_secs: u64,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            webhook_timeout_secs: 5,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file path.
    ///
    /// A missing file yields the defaults. Environment variable overrides are
    /// applied after the file, then the result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the resulting configuration is invalid.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file from {:?}", path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file from {:?}", path))?;
            tracing::info!("Loaded configuration from {:?}", path);
            config
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        let config = config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from defaults and environment only.
    pub fn from_env() -> Result<Self> {
        let config = Self::default().apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    ///
    /// Environment variables take precedence over config file values:
    /// - PORT
    /// - BRIDGE_LOG_LEVEL
    /// - BRIDGE_LOG_FORMAT
    /// - BRIDGE_WEBHOOK_TIMEOUT_SECS
    fn apply_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse::<u16>() {
                if port > 0 {
                    self.port = port;
                }
            }
        }

        if let Ok(level) = std::env::var("BRIDGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BRIDGE_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Ok(timeout) = std::env::var("BRIDGE_WEBHOOK_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                if timeout > 0 {
                    self.webhook_timeout_secs = timeout;
                }
            }
        }

        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            ),
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => anyhow::bail!(
                "Invalid log format: {}. Must be one of: json, pretty, compact",
                self.logging.format
            ),
        }

        if self.port == 0 {
            anyhow::bail!("Listening port must be > 0");
        }

        if self.webhook_timeout_secs == 0 {
            anyhow::bail!("Webhook timeout must be at least 1 second");
        }
        if self.webhook_timeout_secs > 60 {
            anyhow::bail!("Webhook timeout must be <= 60 seconds");
        }

        Ok(())
    }

    /// Convert log level string to tracing::Level
    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .to_lowercase()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse log level: {}", e))
    }
}
