//! Query cleaning
//!
//! Removes label matchers whose values are templating placeholders from a
//! metric query, so a check written for one environment becomes a portable
//! alerting expression.
//!
//! # Pipeline
//!
//! ```text
//! expression ─▶ Scanner ─▶ label block ─▶ split_matchers ─▶ classify ─▶ rebuild
//!                  │                                                      │
//!                  └──────────── literal text ◀───────────────────────────┘
//! ```
//!
//! Recognised placeholders: `%NAME%`, `{{NAME}}`, `$NAME`, `${NAME}`.
//!
//! Cleaning never fails. Anything it cannot make sense of (unparseable
//! matchers, nested blocks, unterminated quotes or braces) is copied through
//! unchanged.

pub mod lexer;
pub mod matcher;
pub mod rebuild;
pub mod scanner;
pub mod splitter;

pub use lexer::{CharClass, Lexer, QuoteState};
pub use matcher::{
    classify, find_placeholder, has_placeholder, unquote, MatchOp, Matcher, Placeholder,
    PlaceholderKind, Verdict,
};
pub use rebuild::{clean_block, rebuild, Rebuilt};
pub use scanner::{normalize_brace_whitespace, Scanner};
pub use splitter::split_matchers;

/// Strip placeholder-valued label matchers from a query expression
///
/// # Example
///
/// ```
/// use conf2vmrule::query::clean_query;
///
/// assert_eq!(
///     clean_query(r#"up{job="api", instance="%HOST%:9100"}"#),
///     r#"up{job="api"}"#
/// );
/// assert_eq!(
///     clean_query(r#"rate(requests_total{env="${ENV}"}[5m])"#),
///     "rate(requests_total[5m])"
/// );
/// ```
pub fn clean_query(expression: &str) -> String {
    Scanner::new(expression).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_normalized() {
        assert_eq!(clean_query(r#"foo{a="1",b="2"}"#), r#"foo{a="1", b="2"}"#);
    }

    #[test]
    fn test_quoted_comma_single_matcher() {
        assert_eq!(clean_query(r#"metric{label="a,b"}"#), r#"metric{label="a,b"}"#);
        assert_eq!(
            clean_query(r#"metric{label="a,b", x="$X"}"#),
            r#"metric{label="a,b"}"#
        );
    }

    #[test]
    fn test_all_placeholder_forms_removed() {
        assert_eq!(
            clean_query(r#"m{a="%A%", b="{{B}}", c="$C", d="${D}"}"#),
            "m"
        );
    }

    #[test]
    fn test_placeholder_in_single_quotes() {
        assert_eq!(
            clean_query("node_load1{hostname='%HOSTNAME%', job='node'}"),
            "node_load1{job='node'}"
        );
    }

    #[test]
    fn test_empty_block_removed() {
        assert_eq!(clean_query("up{}"), "up");
        assert_eq!(clean_query("up{ }"), "up");
    }

    #[test]
    fn test_inner_whitespace_normalized() {
        assert_eq!(
            clean_query(r#"up{ job="api" , instance="%HOST%" }"#),
            r#"up{job="api"}"#
        );
    }

    #[test]
    fn test_regex_operators_kept() {
        assert_eq!(
            clean_query(r#"http_requests_total{code=~"5..", method!~"GET|HEAD", env!="$ENV"}"#),
            r#"http_requests_total{code=~"5..", method!~"GET|HEAD"}"#
        );
    }

    #[test]
    fn test_unparseable_fragment_kept() {
        assert_eq!(
            clean_query(r#"m{"quoted"="x", a="%A%"}"#),
            r#"m{"quoted"="x"}"#
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            r#"up{job="api", instance="%HOST%:9100"}"#,
            r#"rate(requests_total{env="${ENV}"}[5m])"#,
            r#"foo{a="1",b="2"}"#,
            r#"foo{a="1"} + bar{b="{{X}}"}"#,
            r#"sum by (job) (rate(x{ a = "1" , b = "2" }[1m]))"#,
            r#"foo{a="%X%", b{c="1"}}"#,
            r#"m{a="x\"y", b='z'}"#,
        ];
        for input in inputs {
            let once = clean_query(input);
            assert_eq!(clean_query(&once), once, "input: {}", input);
        }
    }

    #[test]
    fn test_escaped_trailing_space_keeps_block_closed() {
        assert_eq!(clean_query(r"m{a=x\ }"), r"m{a=x\ }");
        assert_eq!(clean_query(r#"m{a=x\ , b="%B%"}"#), r"m{a=x\ }");
    }

    #[test]
    fn test_multiline_query() {
        assert_eq!(
            clean_query("sum(\n  rate(x{a=\"1\",\n b=\"%B%\"}[5m])\n)"),
            "sum(\n  rate(x{a=\"1\"}[5m])\n)"
        );
    }
}
