//! `.conf` service definition parser
//!
//! Only the fields needed to build an alert rule are extracted; the rest of
//! the Icinga DSL is ignored. Values may be double- or single-quoted and may
//! span several lines.

use once_cell::sync::Lazy;
use regex::Regex;

static SERVICE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"apply\s+Service\s+"([^"]+)""#).expect("service name pattern is valid")
});

static FIELD_RES: Lazy<Vec<(CheckField, Regex)>> = Lazy::new(|| {
    CheckField::ALL
        .iter()
        .map(|field| {
            let pattern = format!(
                r#"(?s)vars\.{}\s*=\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')"#,
                regex::escape(field.key())
            );
            let re = Regex::new(&pattern).expect("field pattern is valid");
            (*field, re)
        })
        .collect()
});

/// Service variables read from a check definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckField {
    MetricName,
    MetricQuery,
    Warning,
    Critical,
}

impl CheckField {
    pub const ALL: [CheckField; 4] = [
        CheckField::MetricName,
        CheckField::MetricQuery,
        CheckField::Warning,
        CheckField::Critical,
    ];

    /// Variable name below `vars.`
    pub fn key(&self) -> &'static str {
        match self {
            CheckField::MetricName => "check_prometheus_metric_name",
            CheckField::MetricQuery => "check_prometheus_metric_query",
            CheckField::Warning => "check_prometheus_metric_warning",
            CheckField::Critical => "check_prometheus_metric_critical",
        }
    }

    /// Extract the first assignment of this field from `text`
    pub fn extract(&self, text: &str) -> Option<String> {
        let re = FIELD_RES
            .iter()
            .find_map(|(field, re)| (field == self).then_some(re))?;
        let caps = re.captures(text)?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| unescape(m.as_str()))
    }
}

impl std::fmt::Display for CheckField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vars.{}", self.key())
    }
}

/// Raw values pulled out of a `.conf` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckDefinition {
    /// Name from `apply Service "<name>"`
    pub service_name: Option<String>,
    pub metric_name: Option<String>,
    pub query: Option<String>,
    pub warning: Option<String>,
    pub critical: Option<String>,
}

impl CheckDefinition {
    /// Parse a check definition; missing fields are left as `None`
    pub fn parse(text: &str) -> Self {
        let service_name = SERVICE_NAME_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        let definition = Self {
            service_name,
            metric_name: CheckField::MetricName.extract(text),
            query: CheckField::MetricQuery.extract(text),
            warning: CheckField::Warning.extract(text),
            critical: CheckField::Critical.extract(text),
        };

        tracing::debug!(
            service = ?definition.service_name,
            metric = ?definition.metric_name,
            has_query = definition.query.is_some(),
            warning = ?definition.warning,
            critical = ?definition.critical,
            "Parsed check definition"
        );

        definition
    }
}

/// Undo one level of `\"`, `\'` and `\\` escaping; other escapes stay as written
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '"' | '\'' | '\\') {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }

    out
}
