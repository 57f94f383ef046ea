//! Spreadsheet grid decoding.
//!
//! Turns the value grid returned by a sheet range (header row followed by data
//! rows) into one [`RawRecord`] per data row, applying the loose typing rules
//! the downstream normalizers expect.

use serde_json::{Number, Value};
use tracker_core::models::RawRecord;
use tracing::debug;

/// Header whose cells carry embedded JSON rather than scalar values.
pub const SPLITS_HEADER: &str = "SplitsMetric";

// ── Public API ────────────────────────────────────────────────────────────────

/// Decode a grid into records keyed by the header row.
///
/// * Header cells that are not strings are named `Column<i>`.
/// * Cells missing from short rows, and `null` cells, become `""`.
/// * `TRUE` / `FALSE` (any case) become booleans.
/// * Numeric strings become numbers, except under [`SPLITS_HEADER`], where
///   JSON text is parsed into its structure instead.
///
/// An empty grid, or one with only a header row, yields no records.
pub fn decode_rows(grid: &[Vec<Value>]) -> Vec<RawRecord> {
    let Some((header_row, rows)) = grid.split_first() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Value::String(s) => s.clone(),
            _ => format!("Column{}", i),
        })
        .collect();

    let records: Vec<RawRecord> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), decode_cell(header, row.get(i))))
                .collect()
        })
        .collect();

    debug!(
        "Decoded {} rows with {} columns",
        records.len(),
        headers.len()
    );
    records
}

// ── Private ───────────────────────────────────────────────────────────────────

fn decode_cell(header: &str, cell: Option<&Value>) -> Value {
    let value = match cell {
        None | Some(Value::Null) => return Value::String(String::new()),
        Some(v) => v,
    };

    let Value::String(text) = value else {
        return value.clone();
    };

    if text.eq_ignore_ascii_case("TRUE") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("FALSE") {
        return Value::Bool(false);
    }
    if text.is_empty() {
        return value.clone();
    }

    if header == SPLITS_HEADER {
        return serde_json::from_str(text).unwrap_or_else(|_| value.clone());
    }

    text.trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| value.clone())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
