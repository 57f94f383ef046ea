use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::models::{FieldValue, SplitSample};

/// Return the value only when it carries data: `null` and blank strings count
/// as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        v => Some(v),
    }
}

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Parses epoch-second fields found in spreadsheet rows.
pub struct TimestampProcessor;

impl TimestampProcessor {
    /// Coerce an epoch-seconds value into a UTC [`DateTime`].
    ///
    /// Handles:
    /// * JSON number  → whole seconds (fractional part truncated).
    /// * JSON string  → the same, after numeric parsing.
    ///
    /// Anything else, or an out-of-range epoch, is kept as
    /// [`FieldValue::Uncoerced`].
    pub fn from_epoch(value: Option<&Value>) -> FieldValue<DateTime<Utc>> {
        let Some(raw) = present(value) else {
            return FieldValue::Missing;
        };
        match NumberCoercer::to_f64(Some(raw)) {
            FieldValue::Parsed(secs) => match DateTime::from_timestamp(secs.trunc() as i64, 0) {
                Some(dt) => FieldValue::Parsed(dt),
                None => FieldValue::Uncoerced(raw.clone()),
            },
            _ => FieldValue::Uncoerced(raw.clone()),
        }
    }
}

// ── NumberCoercer ─────────────────────────────────────────────────────────────

/// Coerces loosely-typed cells into numbers.
pub struct NumberCoercer;

impl NumberCoercer {
    /// Coerce into a finite `f64`. Numeric strings are accepted.
    pub fn to_f64(value: Option<&Value>) -> FieldValue<f64> {
        let Some(raw) = present(value) else {
            return FieldValue::Missing;
        };
        let parsed = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(f) if f.is_finite() => FieldValue::Parsed(f),
            _ => FieldValue::Uncoerced(raw.clone()),
        }
    }

    /// Coerce into an `i64`. Integral floats (`1500.0`) are accepted, anything
    /// with a fractional part is not.
    pub fn to_i64(value: Option<&Value>) -> FieldValue<i64> {
        let Some(raw) = present(value) else {
            return FieldValue::Missing;
        };
        let parsed = match raw {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            _ => None,
        };
        match parsed {
            Some(i) => FieldValue::Parsed(i),
            None => FieldValue::Uncoerced(raw.clone()),
        }
    }

    /// Coerce a text cell, trimming whitespace.
    pub fn to_text(value: Option<&Value>) -> FieldValue<String> {
        let Some(raw) = present(value) else {
            return FieldValue::Missing;
        };
        match raw {
            Value::String(s) => FieldValue::Parsed(s.trim().to_string()),
            other => FieldValue::Uncoerced(other.clone()),
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

// ── SplitParser ───────────────────────────────────────────────────────────────

/// Reads the nested split list attached to a run.
pub struct SplitParser;

impl SplitParser {
    /// Parse a split list that may arrive already structured (an array) or as
    /// embedded JSON text.
    ///
    /// Never fails: unparseable text or a non-array payload yields no splits,
    /// and individual entries without numeric `moving_time` / `distance` are
    /// skipped.
    pub fn parse(value: Option<&Value>) -> Vec<SplitSample> {
        let Some(raw) = present(value) else {
            return Vec::new();
        };

        let owned;
        let items = match raw {
            Value::Array(items) => items,
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Array(items)) => {
                    owned = items;
                    &owned
                }
                Ok(_) => {
                    warn!("SplitParser: split payload is not a list, ignoring");
                    return Vec::new();
                }
                Err(e) => {
                    warn!("SplitParser: could not parse split payload: {}", e);
                    return Vec::new();
                }
            },
            _ => return Vec::new(),
        };

        items.iter().filter_map(Self::parse_one).collect()
    }

    fn parse_one(item: &Value) -> Option<SplitSample> {
        let moving_time = NumberCoercer::to_f64(item.get("moving_time")).get()?;
        let distance = NumberCoercer::to_f64(item.get("distance")).get()?;
        Some(SplitSample {
            moving_time,
            distance,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use serde_json::json;

    // ── TimestampProcessor ───────────────────────────────────────────────────

    #[test]
    fn test_from_epoch_number() {
        let v = json!(1_704_067_200.0);
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            TimestampProcessor::from_epoch(Some(&v)),
            FieldValue::Parsed(expected)
        );
    }

    #[test]
    fn test_from_epoch_numeric_string_truncates_fraction() {
        let v = json!("1704067200.9");
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(TimestampProcessor::from_epoch(Some(&v)).get(), Some(expected));
    }

    #[test]
    fn test_from_epoch_garbage_kept_raw() {
        let v = json!("yesterday");
        assert_eq!(
            TimestampProcessor::from_epoch(Some(&v)),
            FieldValue::Uncoerced(json!("yesterday"))
        );
    }

    #[test]
    fn test_from_epoch_missing_and_blank() {
        assert_eq!(TimestampProcessor::from_epoch(None), FieldValue::Missing);
        assert_eq!(
            TimestampProcessor::from_epoch(Some(&json!(""))),
            FieldValue::Missing
        );
        assert_eq!(
            TimestampProcessor::from_epoch(Some(&Value::Null)),
            FieldValue::Missing
        );
    }

    // ── NumberCoercer ────────────────────────────────────────────────────────

    #[test]
    fn test_to_f64_accepts_numbers_and_numeric_strings() {
        assert_eq!(NumberCoercer::to_f64(Some(&json!(12.5))).get(), Some(12.5));
        assert_eq!(NumberCoercer::to_f64(Some(&json!(" 7 "))).get(), Some(7.0));
    }

    #[test]
    fn test_to_f64_rejects_non_finite_text() {
        assert_eq!(
            NumberCoercer::to_f64(Some(&json!("NaN"))),
            FieldValue::Uncoerced(json!("NaN"))
        );
        assert_eq!(
            NumberCoercer::to_f64(Some(&json!(true))),
            FieldValue::Uncoerced(json!(true))
        );
    }

    #[test]
    fn test_to_i64_integral_values_only() {
        assert_eq!(NumberCoercer::to_i64(Some(&json!(1500))).get(), Some(1500));
        assert_eq!(NumberCoercer::to_i64(Some(&json!(1500.0))).get(), Some(1500));
        assert_eq!(NumberCoercer::to_i64(Some(&json!("1512"))).get(), Some(1512));
        assert!(!NumberCoercer::to_i64(Some(&json!(1500.5))).is_parsed());
        assert!(!NumberCoercer::to_i64(Some(&json!("abc"))).is_parsed());
    }

    #[test]
    fn test_to_text() {
        assert_eq!(
            NumberCoercer::to_text(Some(&json!(" win "))).parsed(),
            Some(&"win".to_string())
        );
        assert_eq!(NumberCoercer::to_text(Some(&json!(""))), FieldValue::Missing);
    }

    // ── SplitParser ──────────────────────────────────────────────────────────

    #[test]
    fn test_split_parser_structured_array() {
        let v = json!([
            {"moving_time": 240.0, "distance": 1000.0},
            {"moving_time": 100.0, "distance": 500.0}
        ]);
        let splits = SplitParser::parse(Some(&v));
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].moving_time, 240.0);
        assert_eq!(splits[1].distance, 500.0);
    }

    #[test]
    fn test_split_parser_embedded_json_text() {
        let v = json!(r#"[{"moving_time": 250, "distance": 1002.3, "split": 1}]"#);
        let splits = SplitParser::parse(Some(&v));
        assert_eq!(
            splits,
            vec![SplitSample {
                moving_time: 250.0,
                distance: 1002.3
            }]
        );
    }

    #[test]
    fn test_split_parser_bad_text_is_empty() {
        assert!(SplitParser::parse(Some(&json!("[{broken"))).is_empty());
        assert!(SplitParser::parse(Some(&json!(r#"{"moving_time": 1}"#))).is_empty());
        assert!(SplitParser::parse(Some(&json!(42))).is_empty());
        assert!(SplitParser::parse(None).is_empty());
    }

    #[test]
    fn test_split_parser_skips_incomplete_entries() {
        let v = json!([
            {"moving_time": 240.0},
            {"distance": 1000.0},
            "not-a-split",
            {"moving_time": "245", "distance": "998"}
        ]);
        let splits = SplitParser::parse(Some(&v));
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].moving_time, 245.0);
    }
}
