//! Toolkit Configuration
//!
//! Features:
//! - Sensible defaults
//! - Environment variable overrides
//! - JSON config files
//! - Configuration validation

use crate::error::{Error, Result};
use crate::state::ValidationPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_FORMATS: [&str; 2] = ["pretty", "json"];

/// Complete toolkit configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Snapshot validation configuration
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, json)
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject snapshots where allocation exceeds max demand
    pub enforce_max_claim: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enforce_max_claim: true,
        }
    }
}

impl From<&ValidationConfig> for ValidationPolicy {
    fn from(config: &ValidationConfig) -> Self {
        ValidationPolicy {
            enforce_max_claim: config.enforce_max_claim,
        }
    }
}

impl ToolkitConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("DEADLOCK_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        if let Ok(format) = std::env::var("DEADLOCK_LOG_FORMAT") {
            self.logging.format = format.to_lowercase();
        }
        if let Ok(enforce) = std::env::var("DEADLOCK_ENFORCE_MAX_CLAIM") {
            self.validation.enforce_max_claim = enforce
                .parse()
                .map_err(|_| {
                    Error::ConfigError(format!("Invalid DEADLOCK_ENFORCE_MAX_CLAIM: {}", enforce))
                })?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::ConfigError(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            )));
        }

        if !VALID_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(Error::ConfigError(format!(
                "Invalid log format: {}. Must be one of: {}",
                self.logging.format,
                VALID_FORMATS.join(", ")
            )));
        }

        Ok(())
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy::from(&self.validation)
    }

    pub fn is_json_logging(&self) -> bool {
        self.logging.format == "json"
    }
}

/// Configuration builder for programmatic setup
pub struct ConfigBuilder {
    config: ToolkitConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ToolkitConfig::default(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_log_format(mut self, format: impl Into<String>) -> Self {
        self.config.logging.format = format.into();
        self
    }

    pub fn with_enforce_max_claim(mut self, enforce: bool) -> Self {
        self.config.validation.enforce_max_claim = enforce;
        self
    }

    pub fn build(self) -> Result<ToolkitConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ToolkitConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.is_json_logging());
        assert!(config.validation_policy().enforce_max_claim);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_log_level("debug")
            .with_log_format("json")
            .with_enforce_max_claim(false)
            .build()
            .unwrap();

        assert!(config.is_json_logging());
        assert_eq!(config.validation_policy(), ValidationPolicy::permissive());
    }

    #[test]
    fn test_validation_rejects_unknown_level() {
        assert!(ConfigBuilder::new().with_log_level("loud").build().is_err());
        assert!(ConfigBuilder::new().with_log_format("xml").build().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"validation": {"enforce_max_claim": false}}"#;
        let config: ToolkitConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(!config.validation.enforce_max_claim);
    }

    // Only test in this crate that touches the DEADLOCK_* variables
    #[test]
    fn test_env_overrides() {
        std::env::set_var("DEADLOCK_LOG_LEVEL", "DEBUG");
        std::env::set_var("DEADLOCK_LOG_FORMAT", "json");
        std::env::set_var("DEADLOCK_ENFORCE_MAX_CLAIM", "false");

        let config = ToolkitConfig::from_env();

        std::env::set_var("DEADLOCK_ENFORCE_MAX_CLAIM", "maybe");
        let bad_bool = ToolkitConfig::from_env();

        std::env::remove_var("DEADLOCK_LOG_LEVEL");
        std::env::remove_var("DEADLOCK_LOG_FORMAT");
        std::env::remove_var("DEADLOCK_ENFORCE_MAX_CLAIM");

        let config = config.unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.is_json_logging());
        assert_eq!(config.validation_policy(), ValidationPolicy::permissive());

        assert!(matches!(bad_bool, Err(Error::ConfigError(ref msg)) if msg.contains("maybe")));
    }
}
