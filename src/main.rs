//! conf2vmrule - Icinga Prometheus check to VMRule converter
//!
//! Converts `check_prometheus_metric` service definitions into
//! VictoriaMetrics alerting rules.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use conf2vmrule::{cli::Cli, runner};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    conf2vmrule::init_logging(&cli.log_level.to_string())?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        inputs = cli.conf_paths.len(),
        "Starting conf2vmrule"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    runner::run(&cli, &mut out)?;

    Ok(())
}
