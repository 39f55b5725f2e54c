//! Check definition to VMRule conversion

use crate::check::{parse_threshold, CheckDefinition};
use crate::config::RuleSettings;
use crate::error::ConvertError;
use crate::query::clean_query;

use super::model::{
    AlertRule, Annotations, Metadata, RuleGroup, RuleLabels, RuleSpec, Severity, VmRule,
};

/// Result of converting one check definition
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Metric name the rules were named after
    pub metric_name: String,
    pub document: VmRule,
}

/// Resource name form of a metric name: `Disk_Usage` → `disk-usage`
pub fn metric_to_slug(name: &str) -> String {
    name.trim().to_lowercase().replace('_', "-")
}

/// Human-readable form of a metric name: `Disk_Usage` → `disk usage`
pub fn metric_to_words(name: &str) -> String {
    name.trim().to_lowercase().replace('_', " ")
}

/// Builds rule documents from parsed check definitions
#[derive(Debug, Clone, Default)]
pub struct RuleBuilder {
    settings: RuleSettings,
}

impl RuleBuilder {
    pub fn new(settings: RuleSettings) -> Self {
        Self { settings }
    }

    /// Parse `.conf` text and convert it
    pub fn convert_text(&self, conf_text: &str) -> Result<Conversion, ConvertError> {
        self.convert(&CheckDefinition::parse(conf_text))
    }

    /// Convert a parsed check definition into a rule document
    ///
    /// # Errors
    /// Returns [`ConvertError::NoQueryOrThresholds`] when the definition has
    /// neither a warning nor a critical threshold and no query.
    pub fn convert(&self, check: &CheckDefinition) -> Result<Conversion, ConvertError> {
        let service_name = check.service_name.clone().unwrap_or_else(|| {
            tracing::warn!(
                fallback = %self.settings.default_service_name,
                "No service name found, using fallback"
            );
            self.settings.default_service_name.clone()
        });
        let metric_name = non_blank(&check.metric_name).unwrap_or_else(|| {
            tracing::warn!(
                service = %service_name,
                "No metric name found, using service name"
            );
            service_name.clone()
        });

        let query = non_blank(&check.query);
        let expr = match &query {
            Some(query) => {
                let cleaned = clean_query(query);
                if cleaned != *query {
                    tracing::info!(original = %query, cleaned = %cleaned, "Cleaned query");
                }
                cleaned.trim().to_string()
            }
            None => metric_name.clone(),
        };

        let thresholds = [
            (Severity::Warning, parse_threshold(check.warning.as_deref())),
            (Severity::Critical, parse_threshold(check.critical.as_deref())),
        ];

        let mut rules: Vec<AlertRule> = thresholds
            .into_iter()
            .filter_map(|(severity, threshold)| {
                let threshold = threshold?;
                let expr = format!("{} > {}", expr, threshold);
                Some(self.alert_rule(&metric_name, expr, severity))
            })
            .collect();

        if rules.is_empty() {
            if query.is_none() {
                return Err(ConvertError::NoQueryOrThresholds {
                    service: service_name,
                });
            }
            tracing::warn!(
                metric = %metric_name,
                severity = %self.settings.fallback_severity,
                "No thresholds found, emitting bare query rule"
            );
            rules.push(self.alert_rule(&metric_name, expr, self.settings.fallback_severity));
        }

        let slug = metric_to_slug(&metric_name);
        let document = VmRule {
            api_version: self.settings.api_version.clone(),
            kind: self.settings.kind.clone(),
            metadata: Metadata { name: slug.clone() },
            spec: RuleSpec {
                groups: vec![RuleGroup { name: slug, rules }],
            },
        };

        Ok(Conversion {
            metric_name,
            document,
        })
    }

    fn alert_rule(&self, metric_name: &str, expr: String, severity: Severity) -> AlertRule {
        let words = metric_to_words(metric_name);
        AlertRule {
            alert: metric_name.to_string(),
            annotations: Annotations {
                description: format!(
                    "{} at {{{{ $value }}}} from {{{{ $labels.{} }}}}",
                    words, self.settings.host_label
                ),
                summary: words,
            },
            expr,
            labels: RuleLabels { severity },
        }
    }
}

/// Blank field values count as absent
fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.trim().is_empty()).map(String::from)
}
