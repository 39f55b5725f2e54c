//! CLI argument parsing for conf2vmrule
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `<CONF_PATH>...`: One or more Icinga `.conf` service definitions
//! - `--output` / `-o`: Write the result to this file (single input only)
//! - `--write` / `-w`: Write each result next to its input, extension swapped
//! - `--config` / `-c`: Rule settings file (env: CONF2VMRULE_CONFIG)
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: CONF2VMRULE_LOG_LEVEL)
//! - `--output-format`: Output format (yaml/json)
//!
//! Without `--output` or `--write` the rules are printed to stdout.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::rule::DocumentFormat;

/// conf2vmrule - Convert Icinga Prometheus checks into VMRule documents
///
/// Reads `check_prometheus_metric` service definitions, strips label
/// matchers that reference environment placeholders from the query,
/// and emits one alerting rule per threshold.
#[derive(Parser, Debug)]
#[command(name = "conf2vmrule")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Icinga .conf files to convert
    #[arg(value_name = "CONF_PATH", required = true)]
    pub conf_paths: Vec<PathBuf>,

    /// Write the result to this path (overwrites if it exists)
    #[arg(short, long, value_name = "FILE", conflicts_with = "write")]
    pub output: Option<PathBuf>,

    /// Write each result next to its input with a .yaml (or .json) extension
    #[arg(short, long)]
    pub write: bool,

    /// Path to the rule settings file
    #[arg(short, long, value_name = "FILE", env = "CONF2VMRULE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "warn",
        env = "CONF2VMRULE_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warn level - default
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// VMRule YAML document
    Yaml,
    /// JSON rendering of the same document
    Json,
}

impl OutputFormat {
    /// File extension used by `--write`
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl From<OutputFormat> for DocumentFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => DocumentFormat::Yaml,
            OutputFormat::Json => DocumentFormat::Json,
        }
    }
}
