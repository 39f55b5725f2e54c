//! conf2vmrule library
//!
//! This crate converts Icinga `check_prometheus_metric` service definitions
//! into VictoriaMetrics `VMRule` documents. The interesting part is
//! [`query::clean_query`], which strips label matchers bound to environment
//! placeholders (`%HOST%`, `{{env}}`, `$job`, `${dc}`) from the check query.

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod rule;
pub mod runner;

pub use query::clean_query;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging subsystem
///
/// Logs go to stderr; stdout is reserved for generated documents.
///
/// # Arguments
/// * `level` - Log level string (trace, debug, info, warn, error)
///
/// # Errors
/// Returns an error if the logging system fails to initialize
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
