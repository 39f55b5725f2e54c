//! Icinga threshold ranges
//!
//! Icinga expresses thresholds as ranges (`10`, `0:10`, `5:`, `~:10`). An
//! alert rule only needs the value the metric is compared against, which is
//! the upper bound when there is one.

/// Reduce an Icinga range to the alert threshold
///
/// Returns `None` for a missing or blank value.
///
/// # Example
///
/// ```
/// use conf2vmrule::check::parse_threshold;
///
/// assert_eq!(parse_threshold(Some("0:10000000000")).as_deref(), Some("10000000000"));
/// assert_eq!(parse_threshold(Some("42")).as_deref(), Some("42"));
/// assert_eq!(parse_threshold(None), None);
/// ```
pub fn parse_threshold(raw: Option<&str>) -> Option<String> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }

    let threshold = match s.split_once(':') {
        Some((left, right)) => {
            let right = right.trim();
            if right.is_empty() || right == "~" {
                left.trim()
            } else {
                right
            }
        }
        None => s,
    };

    Some(threshold.to_string())
}
