//! VMRule document output
//!
//! YAML is written by hand so the layout stays stable and the expression is
//! emitted as a literal block scalar:
//!
//! ```text
//! apiVersion: operator.victoriametrics.com/v1beta1
//! kind: VMRule
//! metadata:
//!   name: <slug>
//! spec:
//!   groups:
//!   - name: <slug>
//!     rules:
//!     - alert: <metric>
//!       annotations:
//!         summary: "<words>"
//!         description: "<words> at {{ $value }} from {{ $labels.hostname }}"
//!       expr: |
//!         <expr> > <threshold>
//!       labels:
//!         severity: warning
//! ```
//!
//! JSON output goes through `serde_json` on the same model.

use super::model::{AlertRule, VmRule};

/// Output encoding of a rule document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

/// Rule document formatter
#[derive(Debug, Clone, Default)]
pub struct RuleFormatter {
    format: DocumentFormat,
}

impl RuleFormatter {
    pub fn new(format: DocumentFormat) -> Self {
        Self { format }
    }

    /// Render a single document
    pub fn format(&self, document: &VmRule) -> Result<String, serde_json::Error> {
        match self.format {
            DocumentFormat::Yaml => Ok(Self::format_yaml(document)),
            DocumentFormat::Json => {
                let mut json = serde_json::to_string_pretty(document)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Render several documents as one stream
    ///
    /// YAML documents are separated by `---`; JSON documents become an array.
    pub fn format_all(&self, documents: &[VmRule]) -> Result<String, serde_json::Error> {
        match (self.format, documents) {
            (_, [single]) => self.format(single),
            (DocumentFormat::Yaml, _) => Ok(documents
                .iter()
                .map(Self::format_yaml)
                .collect::<Vec<_>>()
                .join("---\n")),
            (DocumentFormat::Json, _) => {
                let mut json = serde_json::to_string_pretty(documents)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Render a document as YAML text
    pub fn format_yaml(document: &VmRule) -> String {
        let mut output = String::with_capacity(512);

        output.push_str(&format!("apiVersion: {}\n", scalar(&document.api_version)));
        output.push_str(&format!("kind: {}\n", scalar(&document.kind)));
        output.push_str("metadata:\n");
        output.push_str(&format!("  name: {}\n", scalar(&document.metadata.name)));
        output.push_str("spec:\n");
        output.push_str("  groups:\n");

        for group in &document.spec.groups {
            output.push_str(&format!("  - name: {}\n", scalar(&group.name)));
            output.push_str("    rules:\n");
            for rule in &group.rules {
                Self::push_rule(&mut output, rule);
            }
        }

        output
    }

    fn push_rule(output: &mut String, rule: &AlertRule) {
        output.push_str(&format!("    - alert: {}\n", scalar(&rule.alert)));
        output.push_str("      annotations:\n");
        output.push_str(&format!(
            "        summary: {}\n",
            quoted(&rule.annotations.summary)
        ));
        output.push_str(&format!(
            "        description: {}\n",
            quoted(&rule.annotations.description)
        ));
        output.push_str("      expr: |\n");
        for line in rule.expr.lines() {
            if line.trim().is_empty() {
                output.push('\n');
            } else {
                output.push_str("        ");
                output.push_str(line);
                output.push('\n');
            }
        }
        output.push_str("      labels:\n");
        output.push_str(&format!("        severity: {}\n", rule.labels.severity));
    }
}

/// Plain scalar when it is safe to leave unquoted, double-quoted otherwise
fn scalar(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'))
        && !value.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
        && value.parse::<f64>().is_err()
        && !matches!(
            value.to_lowercase().as_str(),
            "true" | "false" | "null" | "yes" | "no" | "on" | "off" | "~"
        );
    if plain {
        value.to_string()
    } else {
        quoted(value)
    }
}

/// YAML double-quoted scalar
///
/// Escapes backslash, double-quote, newline, and other control characters.
fn quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04X}", c as u32)),
            _ => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::model::{Annotations, Metadata, RuleGroup, RuleLabels, RuleSpec, Severity};

    fn document(expr: &str) -> VmRule {
        VmRule {
            api_version: "operator.victoriametrics.com/v1beta1".to_string(),
            kind: "VMRule".to_string(),
            metadata: Metadata {
                name: "disk-usage".to_string(),
            },
            spec: RuleSpec {
                groups: vec![RuleGroup {
                    name: "disk-usage".to_string(),
                    rules: vec![AlertRule {
                        alert: "disk_usage".to_string(),
                        annotations: Annotations {
                            summary: "disk usage".to_string(),
                            description: "disk usage at {{ $value }} from {{ $labels.hostname }}"
                                .to_string(),
                        },
                        expr: expr.to_string(),
                        labels: RuleLabels {
                            severity: Severity::Warning,
                        },
                    }],
                }],
            },
        }
    }

    #[test]
    fn test_format_yaml_layout() {
        let output = RuleFormatter::format_yaml(&document(r#"up{job="a"} > 5"#));
        let expected = r#"apiVersion: operator.victoriametrics.com/v1beta1
kind: VMRule
metadata:
  name: disk-usage
spec:
  groups:
  - name: disk-usage
    rules:
    - alert: disk_usage
      annotations:
        summary: "disk usage"
        description: "disk usage at {{ $value }} from {{ $labels.hostname }}"
      expr: |
        up{job="a"} > 5
      labels:
        severity: warning
"#;
        assert_eq!(output, expected);
    }

    #[test]
    fn test_yaml_is_parseable() {
        let output = RuleFormatter::format_yaml(&document("sum(\n  up\n) > 1"));
        let parsed: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();
        let rule = &parsed["spec"]["groups"][0]["rules"][0];
        assert_eq!(rule["expr"].as_str(), Some("sum(\n  up\n) > 1\n"));
        assert_eq!(rule["labels"]["severity"].as_str(), Some("warning"));
        assert_eq!(parsed["apiVersion"].as_str(), Some("operator.victoriametrics.com/v1beta1"));
    }

    #[test]
    fn test_format_json() {
        let output = RuleFormatter::new(DocumentFormat::Json)
            .format(&document("up > 1"))
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["kind"], "VMRule");
        assert_eq!(parsed["spec"]["groups"][0]["rules"][0]["expr"], "up > 1");
        assert_eq!(
            parsed["spec"]["groups"][0]["rules"][0]["labels"]["severity"],
            "warning"
        );
    }

    #[test]
    fn test_format_all_yaml_separator() {
        let output = RuleFormatter::default()
            .format_all(&[document("a"), document("b")])
            .unwrap();
        assert_eq!(output.matches("---\n").count(), 1);
        assert_eq!(output.matches("kind: VMRule").count(), 2);
    }

    #[test]
    fn test_format_all_json_array() {
        let output = RuleFormatter::new(DocumentFormat::Json)
            .format_all(&[document("a"), document("b")])
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_scalar_quoting() {
        assert_eq!(scalar("disk_usage"), "disk_usage");
        assert_eq!(scalar("Disk Usage"), "\"Disk Usage\"");
        assert_eq!(scalar("yes"), "\"yes\"");
        assert_eq!(scalar("a: b"), "\"a: b\"");
        assert_eq!(scalar(""), "\"\"");
        assert_eq!(scalar("42"), "\"42\"");
        assert_eq!(scalar("0x1F"), "\"0x1F\"");
        assert_eq!(scalar("node/disk-usage.v2"), "node/disk-usage.v2");
    }

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(quoted(r#"say "hi"\"#), r#""say \"hi\"\\""#);
        assert_eq!(quoted("a\nb"), r#""a\nb""#);
        assert_eq!(quoted("a\tb\r"), r#""a\u0009b\u000D""#);
    }

    #[test]
    fn test_alert_names_survive_yaml_parse() {
        let names = [
            "plain_name",
            "a#b",
            "a #b",
            "a: b",
            "*ref",
            "&anchor",
            "!tag",
            "%x",
            "@x",
            "`x",
            "- x",
            "? x",
            "[x]",
            "{x}",
            "|x",
            ">x",
            "yes",
            "Null",
            "~",
            "42",
            "0x1F",
            "1_000",
            "1e3",
            ".inf",
            "a\"b",
            r"a\b",
            " padded ",
            "tab\tname",
            "cr\rname",
            "multi\nline",
            "",
        ];
        for name in names {
            let mut doc = document("up > 1");
            doc.spec.groups[0].rules[0].alert = name.to_string();

            let output = RuleFormatter::format_yaml(&doc);
            let parsed: serde_yaml::Value = serde_yaml::from_str(&output)
                .unwrap_or_else(|e| panic!("alert {:?}: {}\n{}", name, e, output));
            let alert = &parsed["spec"]["groups"][0]["rules"][0]["alert"];
            assert_eq!(alert.as_str(), Some(name), "alert {:?}", name);
        }
    }
}
