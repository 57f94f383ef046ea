//! Per-domain record normalization.
//!
//! Converts decoded [`RawRecord`]s into typed records. Each field is coerced
//! independently; failures are kept as [`FieldValue::Uncoerced`] so later
//! stages can treat them as absent without losing the raw value.

use tracker_core::data_processors::{NumberCoercer, SplitParser, TimestampProcessor};
use tracker_core::models::{ChessGameRecord, FieldValue, GameResult, RawRecord, RunRecord};
use tracing::debug;

/// Header names read from the running sheet.
pub mod run_fields {
    pub const START_DATE_EPOCH: &str = "StartDateEpoch";
    pub const MOVING_TIME: &str = "MovingTime";
    pub const DISTANCE: &str = "Distance";
    pub const SPLITS_METRIC: &str = "SplitsMetric";
}

/// Header names read from the chess sheet.
pub mod chess_fields {
    pub const START_TIME: &str = "startTime";
    pub const GAME_LENGTH: &str = "gameLength";
    pub const MY_RATING: &str = "myRating";
    pub const MY_ACCURACY: &str = "myAccuracy";
    pub const MY_RESULT: &str = "myResult";
}

// ── Running ───────────────────────────────────────────────────────────────────

/// Normalize one running row.
pub fn normalize_run(raw: &RawRecord) -> RunRecord {
    RunRecord {
        timestamp: TimestampProcessor::from_epoch(raw.get(run_fields::START_DATE_EPOCH)),
        moving_time: NumberCoercer::to_f64(raw.get(run_fields::MOVING_TIME)),
        distance: NumberCoercer::to_f64(raw.get(run_fields::DISTANCE)),
        splits: SplitParser::parse(raw.get(run_fields::SPLITS_METRIC)),
    }
}

/// Normalize every running row, preserving order.
pub fn normalize_runs(rows: &[RawRecord]) -> Vec<RunRecord> {
    let runs: Vec<RunRecord> = rows.iter().map(normalize_run).collect();
    log_unparsed_timestamps("runs", runs.iter().map(|r| &r.timestamp));
    runs
}

// ── Chess ─────────────────────────────────────────────────────────────────────

/// Normalize one chess row.
pub fn normalize_game(raw: &RawRecord) -> ChessGameRecord {
    ChessGameRecord {
        timestamp: TimestampProcessor::from_epoch(raw.get(chess_fields::START_TIME)),
        rating: NumberCoercer::to_i64(raw.get(chess_fields::MY_RATING)),
        result: NumberCoercer::to_text(raw.get(chess_fields::MY_RESULT))
            .map(|code| GameResult::parse(&code)),
        accuracy: NumberCoercer::to_f64(raw.get(chess_fields::MY_ACCURACY)),
        duration: NumberCoercer::to_f64(raw.get(chess_fields::GAME_LENGTH)),
    }
}

/// Normalize every chess row, preserving order.
pub fn normalize_games(rows: &[RawRecord]) -> Vec<ChessGameRecord> {
    let games: Vec<ChessGameRecord> = rows.iter().map(normalize_game).collect();
    log_unparsed_timestamps("games", games.iter().map(|g| &g.timestamp));
    games
}

fn log_unparsed_timestamps<'a, T: 'a>(
    kind: &str,
    timestamps: impl Iterator<Item = &'a FieldValue<T>>,
) {
    let unparsed = timestamps.filter(|ts| !ts.is_parsed()).count();
    if unparsed > 0 {
        debug!("{} {} have no usable timestamp", unparsed, kind);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone as _, Utc};
    use serde_json::{json, Value};

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    // ── normalize_run ────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_run_full_row() {
        let raw = record(json!({
            "StartDateEpoch": 1_704_067_200.0,
            "MovingTime": 1500.0,
            "Distance": "5012.4",
            "SplitsMetric": [{"distance": 1000.0, "moving_time": 290.0}],
            "Name": "Morning Run"
        }));
        let run = normalize_run(&raw);

        assert_eq!(
            run.timestamp.get(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(run.moving_time.get(), Some(1500.0));
        assert_eq!(run.distance.get(), Some(5012.4));
        assert_eq!(run.splits.len(), 1);
    }

    #[test]
    fn test_normalize_run_partial_failure_is_per_field() {
        let raw = record(json!({
            "StartDateEpoch": "soon",
            "MovingTime": 1500.0,
            "Distance": "",
            "SplitsMetric": "not json"
        }));
        let run = normalize_run(&raw);

        assert_eq!(run.timestamp, FieldValue::Uncoerced(json!("soon")));
        assert_eq!(run.moving_time.get(), Some(1500.0));
        assert_eq!(run.distance, FieldValue::Missing);
        assert!(run.splits.is_empty());
    }

    #[test]
    fn test_normalize_runs_preserves_order() {
        let rows = vec![
            record(json!({"MovingTime": 1.0})),
            record(json!({"MovingTime": 2.0})),
        ];
        let runs = normalize_runs(&rows);
        assert_eq!(runs[0].moving_time.get(), Some(1.0));
        assert_eq!(runs[1].moving_time.get(), Some(2.0));
    }

    // ── normalize_game ───────────────────────────────────────────────────────

    #[test]
    fn test_normalize_game_full_row() {
        let raw = record(json!({
            "startTime": "1718452800",
            "gameLength": 612.0,
            "myRating": 1512.0,
            "myAccuracy": "87.3",
            "myResult": "win",
            "opponent": "someone"
        }));
        let game = normalize_game(&raw);

        assert_eq!(
            game.timestamp.get(),
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap())
        );
        assert_eq!(game.duration.get(), Some(612.0));
        assert_eq!(game.rating.get(), Some(1512));
        assert_eq!(game.accuracy.get(), Some(87.3));
        assert_eq!(game.result.parsed(), Some(&GameResult::Win));
    }

    #[test]
    fn test_normalize_game_uncoercible_fields_kept_raw() {
        let raw = record(json!({
            "startTime": "",
            "myRating": "unrated",
            "myAccuracy": true,
            "myResult": 3
        }));
        let game = normalize_game(&raw);

        assert_eq!(game.timestamp, FieldValue::Missing);
        assert_eq!(game.rating, FieldValue::Uncoerced(json!("unrated")));
        assert_eq!(game.accuracy, FieldValue::Uncoerced(json!(true)));
        assert_eq!(game.result, FieldValue::Uncoerced(json!(3)));
        assert_eq!(game.duration, FieldValue::Missing);
    }
}
