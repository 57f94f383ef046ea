//! Running statistics over chronologically sorted runs.

use chrono::{DateTime, Utc};
use tracker_core::models::RunRecord;
use tracing::debug;

// ── RunningStats ──────────────────────────────────────────────────────────────

/// Everything computed from one running history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningStats {
    /// Start of every participating run, in sorted order.
    pub timestamps: Vec<DateTime<Utc>>,
    /// Moving time of every participating run, parallel to `timestamps`.
    pub moving_times: Vec<f64>,
    /// Number of participating runs.
    pub run_count: usize,
    /// Minimum moving time; `0.0` when there are no runs.
    pub fastest_run: f64,
    /// Mean moving time of all kilometre splits, if any qualified.
    pub average_split: Option<f64>,
    /// Minimum moving time of all kilometre splits, if any qualified.
    pub fastest_split: Option<f64>,
    /// Start of the chronologically last run.
    pub last_run: Option<DateTime<Utc>>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Aggregate `runs`, which must already be sorted by timestamp.
///
/// A run participates in the series, count and fastest-run figures only when
/// it has both a timestamp and a moving time. Split statistics scan the
/// splits of every run.
pub fn aggregate_runs(runs: &[RunRecord]) -> RunningStats {
    let mut timestamps = Vec::with_capacity(runs.len());
    let mut moving_times = Vec::with_capacity(runs.len());

    for run in runs {
        if let (Some(ts), Some(moving_time)) = (run.timestamp.get(), run.moving_time.get()) {
            timestamps.push(ts);
            moving_times.push(moving_time);
        }
    }

    let skipped = runs.len() - timestamps.len();
    if skipped > 0 {
        debug!(
            "{} runs without a timestamp or moving time left out of the series",
            skipped
        );
    }

    let fastest_run = moving_times.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let (average_split, fastest_split) = split_stats(runs);

    RunningStats {
        run_count: timestamps.len(),
        last_run: timestamps.last().copied(),
        timestamps,
        moving_times,
        fastest_run,
        average_split,
        fastest_split,
    }
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Mean and minimum moving time over every qualifying kilometre split.
fn split_stats(runs: &[RunRecord]) -> (Option<f64>, Option<f64>) {
    let split_times: Vec<f64> = runs
        .iter()
        .flat_map(|run| run.splits.iter())
        .filter(|split| split.is_kilometre())
        .map(|split| split.moving_time)
        .collect();

    if split_times.is_empty() {
        return (None, None);
    }

    let average = split_times.iter().sum::<f64>() / split_times.len() as f64;
    let fastest = split_times.iter().copied().reduce(f64::min);
    (Some(average), fastest)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
