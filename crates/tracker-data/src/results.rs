//! Response shapes served for each domain.
//!
//! The assembler functions are purely structural: they rename and pack
//! aggregator output, render the few human-readable strings and apply the
//! documented sentinels.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracker_core::formatting::{format_hours, format_signed};
use tracker_core::models::RawRecord;

use crate::chess::ChessStats;
use crate::running::RunningStats;

/// Rendered when the rating change per hour cannot be computed.
pub const NO_RATE_MESSAGE: &str = "no data";
/// Rendered when there is no timestamped game.
pub const NO_GAMES_MESSAGE: &str = "no games";

// ── Running ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphData {
    pub labels: Vec<DateTime<Utc>>,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningResult {
    pub graph_data: GraphData,
    pub number_of_runs: usize,
    pub fastest_run: f64,
    pub average_split: Option<f64>,
    pub fastest_split: Option<f64>,
    /// Milliseconds since the epoch; `0` when there are no runs.
    pub last_run: i64,
}

impl From<RunningStats> for RunningResult {
    fn from(stats: RunningStats) -> Self {
        Self {
            last_run: stats.last_run.map_or(0, |ts| ts.timestamp_millis()),
            number_of_runs: stats.run_count,
            fastest_run: stats.fastest_run,
            average_split: stats.average_split,
            fastest_split: stats.fastest_split,
            graph_data: GraphData {
                labels: stats.timestamps,
                data: stats.moving_times,
            },
        }
    }
}

// ── Chess ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatsByHour {
    pub labels_by_hour: Vec<u32>,
    /// Win rate per hour.
    pub data_by_hour: Vec<f64>,
    pub accuracy_by_hour: Vec<f64>,
    pub point_radius_array: Vec<u8>,
    #[serde(rename = "accpointRadiusArray")]
    pub acc_point_radius_array: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataByDay {
    pub labels: Vec<String>,
    pub graph_data: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChessResult {
    pub highest_rating: i64,
    pub num_games: usize,
    /// Total play time, e.g. `"12 hours"`.
    pub time_message: String,
    pub change_in_score_per_hour: String,
    pub time_since_last_game: String,
    pub game_stats_by_hour: GameStatsByHour,
    pub data_by_day: DataByDay,
    /// Milliseconds since the epoch; `0` when there is no timestamped game.
    pub date_of_last_game: i64,
}

impl From<ChessStats> for ChessResult {
    fn from(stats: ChessStats) -> Self {
        let game_stats_by_hour = GameStatsByHour {
            labels_by_hour: stats.hourly.iter().map(|b| b.hour).collect(),
            data_by_hour: stats.hourly.iter().map(|b| b.win_rate()).collect(),
            accuracy_by_hour: stats.hourly.iter().map(|b| b.mean_accuracy()).collect(),
            point_radius_array: stats.hourly.iter().map(|b| b.win_marker()).collect(),
            acc_point_radius_array: stats.hourly.iter().map(|b| b.accuracy_marker()).collect(),
        };

        let (labels, graph_data) = stats
            .daily_highs
            .into_iter()
            .map(|high| (high.label, high.highest_rating))
            .unzip();

        Self {
            highest_rating: stats.highest_rating,
            num_games: stats.game_count,
            time_message: format_hours(stats.total_play_seconds),
            change_in_score_per_hour: stats
                .change_per_hour
                .map_or_else(|| NO_RATE_MESSAGE.to_string(), format_signed),
            time_since_last_game: stats
                .time_since_last_game
                .unwrap_or_else(|| NO_GAMES_MESSAGE.to_string()),
            game_stats_by_hour,
            data_by_day: DataByDay { labels, graph_data },
            date_of_last_game: stats.last_game.map_or(0, |ts| ts.timestamp_millis()),
        }
    }
}

// ── DomainResult ──────────────────────────────────────────────────────────────

/// Output of one domain's pipeline. Serializes as the inner shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DomainResult {
    Running(RunningResult),
    Chess(ChessResult),
    /// Decoded rows of a domain without a statistics pipeline.
    PassThrough(Vec<RawRecord>),
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use serde_json::{json, Value};
    use tracker_core::time_utils::TimezoneHandler;

    use crate::chess::aggregate_games;
    use crate::running::aggregate_runs;

    fn keys(value: &Value) -> Vec<&str> {
        let mut keys: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_running_result_fields() {
        let result = DomainResult::Running(aggregate_runs(&[]).into());
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            keys(&value),
            vec![
                "averageSplit",
                "fastestRun",
                "fastestSplit",
                "graphData",
                "lastRun",
                "numberOfRuns"
            ]
        );
        assert_eq!(keys(&value["graphData"]), vec!["data", "labels"]);
        assert_eq!(value["averageSplit"], Value::Null);
        assert_eq!(value["lastRun"], json!(0));
    }

    #[test]
    fn test_running_result_labels_are_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap();
        let stats = RunningStats {
            timestamps: vec![ts],
            moving_times: vec![1500.0],
            run_count: 1,
            fastest_run: 1500.0,
            average_split: Some(290.5),
            fastest_split: Some(280.0),
            last_run: Some(ts),
        };
        let value = serde_json::to_value(RunningResult::from(stats)).unwrap();

        assert_eq!(value["graphData"]["labels"], json!(["2024-03-01T07:00:00Z"]));
        assert_eq!(value["graphData"]["data"], json!([1500.0]));
        assert_eq!(value["lastRun"], json!(ts.timestamp_millis()));
        assert_eq!(value["averageSplit"], json!(290.5));
    }

    #[test]
    fn test_chess_result_fields() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let stats = aggregate_games(&[], &TimezoneHandler::utc(), now);
        let value = serde_json::to_value(DomainResult::Chess(stats.into())).unwrap();

        assert_eq!(
            keys(&value),
            vec![
                "changeInScorePerHour",
                "dataByDay",
                "dateOfLastGame",
                "gameStatsByHour",
                "highestRating",
                "numGames",
                "timeMessage",
                "timeSinceLastGame"
            ]
        );
        assert_eq!(
            keys(&value["gameStatsByHour"]),
            vec![
                "accpointRadiusArray",
                "accuracyByHour",
                "dataByHour",
                "labelsByHour",
                "pointRadiusArray"
            ]
        );
        assert_eq!(keys(&value["dataByDay"]), vec!["graphData", "labels"]);
    }

    #[test]
    fn test_chess_result_sentinels_for_empty_history() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let result = ChessResult::from(aggregate_games(&[], &TimezoneHandler::utc(), now));

        assert_eq!(result.change_in_score_per_hour, NO_RATE_MESSAGE);
        assert_eq!(result.time_since_last_game, NO_GAMES_MESSAGE);
        assert_eq!(result.time_message, "0 hours");
        assert_eq!(result.date_of_last_game, 0);
        assert_eq!(result.game_stats_by_hour.labels_by_hour, (0..24).collect::<Vec<u32>>());
        assert_eq!(result.game_stats_by_hour.point_radius_array, vec![0; 24]);
        assert!(result.data_by_day.labels.is_empty());
    }

    #[test]
    fn test_pass_through_serializes_rows() {
        let row: RawRecord = serde_json::from_value(json!({"minutes": 12.0})).unwrap();
        let value = serde_json::to_value(DomainResult::PassThrough(vec![row])).unwrap();
        assert_eq!(value, json!([{"minutes": 12.0}]));
    }
}
