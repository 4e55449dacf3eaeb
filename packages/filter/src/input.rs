//! Coercion of raw filter values from the frontend.
//!
//! Dropdowns and sliders send whatever JSON they hold: `null`, a single
//! number, a numeric string, an `"All"` sentinel, or a list of any of
//! these. Anything that is not an integer is dropped.

use std::collections::BTreeSet;

use serde_json::Value;

/// Parses a decile selection. An empty set means "no filter".
#[must_use]
pub fn parse_deciles(value: &Value) -> BTreeSet<i64> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_int).collect(),
        Value::String(s) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") => {
            BTreeSet::new()
        }
        other => as_int(other).into_iter().collect(),
    }
}

/// Parses a rank percentage, clamped to 0-100. `None` means "no filter".
#[must_use]
pub fn parse_percent(value: &Value) -> Option<i64> {
    as_int(value).map(|p| p.clamp(0, 100))
}

#[allow(clippy::cast_possible_truncation)]
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_inputs_mean_no_filter() {
        assert!(parse_deciles(&json!(null)).is_empty());
        assert!(parse_deciles(&json!("")).is_empty());
        assert!(parse_deciles(&json!("All")).is_empty());
        assert!(parse_deciles(&json!([])).is_empty());
    }

    #[test]
    fn singular_and_plural_inputs() {
        assert_eq!(parse_deciles(&json!(3)), BTreeSet::from([3]));
        assert_eq!(parse_deciles(&json!("4")), BTreeSet::from([4]));
        assert_eq!(
            parse_deciles(&json!([1, "2", 2, 5.0])),
            BTreeSet::from([1, 2, 5])
        );
    }

    #[test]
    fn non_numeric_entries_are_dropped() {
        assert_eq!(
            parse_deciles(&json!(["x", 7, null, {"a": 1}, 2.5])),
            BTreeSet::from([7])
        );
        assert!(parse_deciles(&json!("seven")).is_empty());
        assert!(parse_deciles(&json!(true)).is_empty());
    }

    #[test]
    fn percent_parsing() {
        assert_eq!(parse_percent(&json!(null)), None);
        assert_eq!(parse_percent(&json!("abc")), None);
        assert_eq!(parse_percent(&json!(40)), Some(40));
        assert_eq!(parse_percent(&json!("15")), Some(15));
        assert_eq!(parse_percent(&json!(140)), Some(100));
        assert_eq!(parse_percent(&json!(-5)), Some(0));
    }
}
