//! Label matcher classification
//!
//! Parses a single `key OP value` fragment and decides whether it survives
//! cleaning. Matchers whose value carries a templating placeholder are
//! environment specific and get dropped; everything else, including
//! fragments that do not parse, is kept as written.

use once_cell::sync::Lazy;
use regex::Regex;

/// `%NAME%`, `{{NAME}}`, `${NAME}` and `$NAME`
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<percent>%[^%]+%)|(?P<mustache>\{\{[^}]+\}\})|(?P<braced>\$\{[^}]+\})|(?P<dollar>\$[A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("placeholder pattern is valid")
});

/// `key OP value`, operators ordered so the two-character forms win
static MATCHER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(=~|!~|!=|=)\s*(.+?)\s*$")
        .expect("matcher pattern is valid")
});

/// Placeholder syntax recognised inside matcher values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// `%NAME%` (Icinga macro)
    Percent,
    /// `{{NAME}}`
    Mustache,
    /// `${NAME}`
    BracedDollar,
    /// `$NAME`
    Dollar,
}

impl PlaceholderKind {
    /// Short name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderKind::Percent => "percent",
            PlaceholderKind::Mustache => "mustache",
            PlaceholderKind::BracedDollar => "braced_dollar",
            PlaceholderKind::Dollar => "dollar",
        }
    }
}

impl std::fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A placeholder occurrence found in a string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub kind: PlaceholderKind,
    pub token: &'a str,
}

/// Find the first placeholder token in `s`
pub fn find_placeholder(s: &str) -> Option<Placeholder<'_>> {
    let caps = PLACEHOLDER_RE.captures(s)?;
    [
        ("percent", PlaceholderKind::Percent),
        ("mustache", PlaceholderKind::Mustache),
        ("braced", PlaceholderKind::BracedDollar),
        ("dollar", PlaceholderKind::Dollar),
    ]
    .into_iter()
    .find_map(|(group, kind)| {
        caps.name(group).map(|m| Placeholder {
            kind,
            token: m.as_str(),
        })
    })
}

/// Whether `s` contains any placeholder token
pub fn has_placeholder(s: &str) -> bool {
    PLACEHOLDER_RE.is_match(s)
}

/// Label matching operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `=~`
    RegexMatch,
    /// `!~`
    RegexNotMatch,
}

impl MatchOp {
    /// Parse an operator token
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "=" => Some(MatchOp::Equal),
            "!=" => Some(MatchOp::NotEqual),
            "=~" => Some(MatchOp::RegexMatch),
            "!~" => Some(MatchOp::RegexNotMatch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOp::Equal => "=",
            MatchOp::NotEqual => "!=",
            MatchOp::RegexMatch => "=~",
            MatchOp::RegexNotMatch => "!~",
        }
    }
}

impl std::fmt::Display for MatchOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed label matcher borrowing from the original fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher<'a> {
    pub key: &'a str,
    pub op: MatchOp,
    /// Trimmed value as written, quotes included
    pub value: &'a str,
}

impl<'a> Matcher<'a> {
    /// Parse `key OP value`; `None` when the fragment has another shape
    pub fn parse(fragment: &'a str) -> Option<Self> {
        let caps = MATCHER_RE.captures(fragment)?;
        let key = caps.get(1)?.as_str();
        let op = MatchOp::parse(caps.get(2)?.as_str())?;
        let value = caps.get(3)?.as_str();
        Some(Self { key, op, value })
    }

    /// Value with one layer of matching quotes removed
    pub fn unquoted_value(&self) -> &'a str {
        unquote(self.value)
    }
}

/// Strip one layer of matching `"` or `'` if they wrap the whole string
pub fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Keep/drop decision for one matcher fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Drop,
}

/// Classify a matcher fragment
///
/// Fragments that do not parse as `key OP value` are always kept.
pub fn classify(fragment: &str) -> Verdict {
    let Some(matcher) = Matcher::parse(fragment) else {
        tracing::trace!(fragment, "Unrecognized matcher syntax, keeping as-is");
        return Verdict::Keep;
    };

    match find_placeholder(matcher.unquoted_value()) {
        Some(placeholder) => {
            tracing::debug!(
                label = matcher.key,
                op = %matcher.op,
                placeholder = placeholder.token,
                kind = %placeholder.kind,
                "Dropping label matcher with placeholder value"
            );
            Verdict::Drop
        }
        None => Verdict::Keep,
    }
}
