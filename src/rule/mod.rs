//! VMRule generation
//!
//! Turns a parsed check definition into a VictoriaMetrics `VMRule` document
//! and renders it as YAML or JSON.

pub mod builder;
pub mod formatter;
pub mod model;

pub use builder::{metric_to_slug, metric_to_words, Conversion, RuleBuilder};
pub use formatter::{DocumentFormat, RuleFormatter};
pub use model::{
    AlertRule, Annotations, Metadata, RuleGroup, RuleLabels, RuleSpec, Severity, VmRule,
};
