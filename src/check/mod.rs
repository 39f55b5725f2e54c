//! Icinga check definition input
//!
//! Reads the handful of fields a `check_prometheus_metric` service carries
//! and reduces Icinga threshold ranges to plain alert thresholds.

pub mod parser;
pub mod threshold;

pub use parser::{CheckDefinition, CheckField};
pub use threshold::parse_threshold;
