//! Configuration management for conf2vmrule
//!
//! Handles loading and validating rule settings from YAML files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::rule::Severity;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Generated rule document settings
    #[serde(default)]
    pub rule: RuleSettings,
}

/// Constants stamped into every generated rule document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSettings {
    /// Document `apiVersion`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Document `kind`
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Label referenced in the description annotation (`{{ $labels.<host_label> }}`)
    #[serde(default = "default_host_label")]
    pub host_label: String,

    /// Severity of the single rule emitted when a check has no thresholds
    #[serde(default = "default_fallback_severity")]
    pub fallback_severity: Severity,

    /// Service name used when the definition has no `apply Service` line
    #[serde(default = "default_service_name")]
    pub default_service_name: String,
}

// Default value functions
fn default_api_version() -> String {
    "operator.victoriametrics.com/v1beta1".to_string()
}

fn default_kind() -> String {
    "VMRule".to_string()
}

fn default_host_label() -> String {
    "hostname".to_string()
}

fn default_fallback_severity() -> Severity {
    Severity::Info
}

fn default_service_name() -> String {
    "unnamed_service".to_string()
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            host_label: default_host_label(),
            fallback_severity: default_fallback_severity(),
            default_service_name: default_service_name(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes to unit, not to a mapping
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration when a path is given, defaults otherwise
    pub fn load_optional<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        let rule = &self.rule;

        if rule.api_version.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "rule.api_version must not be empty".to_string(),
            ));
        }

        if rule.kind.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "rule.kind must not be empty".to_string(),
            ));
        }

        if !is_valid_label_name(&rule.host_label) {
            return Err(ConfigError::ValidationError(format!(
                "rule.host_label '{}' is not a valid label name",
                rule.host_label
            )));
        }

        if rule.default_service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "rule.default_service_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
