//! Error types for conf2vmrule
//!
//! Query cleaning itself never fails; these errors cover the converter and
//! the command-line surface around it.

use std::path::PathBuf;
use thiserror::Error;

/// Check-to-rule conversion errors
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Neither thresholds nor a query to alert on
    #[error(
        "No thresholds (warning/critical) and no query found in check definition '{service}'"
    )]
    NoQueryOrThresholds { service: String },
}

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Conversion error for a specific input
    #[error("Failed to convert {path}: {source}")]
    Convert {
        path: PathBuf,
        #[source]
        source: ConvertError,
    },

    /// File read or write failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output serialization failure
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid combination of command-line arguments
    #[error("Usage error: {0}")]
    Usage(String),
}

impl AppError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
