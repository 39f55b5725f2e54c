//! Label block splitting
//!
//! Divides the interior of a `{...}` block into matcher fragments on commas
//! that sit outside quoted regions.

use super::lexer::{CharClass, Lexer};

/// Split a label block interior into trimmed, non-empty matcher fragments
///
/// # Example
///
/// ```
/// use conf2vmrule::query::split_matchers;
///
/// let parts = split_matchers(r#"job="api", path="/a,b""#);
/// assert_eq!(parts, vec![r#"job="api""#, r#"path="/a,b""#]);
/// ```
pub fn split_matchers(interior: &str) -> Vec<&str> {
    let mut lexer = Lexer::new();
    let mut parts = Vec::new();
    let mut start = 0;

    for (i, c) in interior.char_indices() {
        if lexer.feed(c) == CharClass::Structural && c == ',' {
            parts.push(trim_fragment(&interior[start..i]));
            start = i + 1;
        }
    }
    parts.push(trim_fragment(&interior[start..]));

    parts.retain(|p| !p.is_empty());
    parts
}

/// Trim surrounding whitespace, keeping a trailing character that a
/// backslash escapes
fn trim_fragment(fragment: &str) -> &str {
    let trimmed = fragment.trim_start();
    let end = trimmed.trim_end().len();

    let backslashes = trimmed[..end]
        .chars()
        .rev()
        .take_while(|c| *c == '\\')
        .count();
    if backslashes % 2 == 1 {
        if let Some(escaped) = trimmed[end..].chars().next() {
            return &trimmed[..end + escaped.len_utf8()];
        }
    }
    &trimmed[..end]
}
