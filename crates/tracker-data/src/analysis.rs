//! Per-domain processing pipeline.
//!
//! Decoded rows go through normalize → sort → aggregate → assemble for the
//! analysed domains; every other domain passes its rows through untouched.

use chrono::{DateTime, Utc};
use tracker_core::models::{Domain, RawRecord};
use tracker_core::time_utils::TimezoneHandler;
use tracing::debug;

use crate::chess::aggregate_games;
use crate::normalizer::{normalize_games, normalize_runs};
use crate::results::{ChessResult, DomainResult, RunningResult};
use crate::running::aggregate_runs;
use crate::sorter::sort_by_timestamp;

// ── AnalysisContext ───────────────────────────────────────────────────────────

/// Environment an analysis runs in: the local timezone for day and hour
/// grouping, and the instant relative ages are measured from.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext {
    pub timezone: TimezoneHandler,
    pub now: DateTime<Utc>,
}

impl AnalysisContext {
    pub fn new(timezone: TimezoneHandler, now: DateTime<Utc>) -> Self {
        Self { timezone, now }
    }

    /// Context for `timezone` at the current instant.
    pub fn now_in(timezone: TimezoneHandler) -> Self {
        Self::new(timezone, Utc::now())
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Running pipeline.
pub fn process_running(rows: &[RawRecord]) -> RunningResult {
    let runs = sort_by_timestamp(normalize_runs(rows));
    let stats = aggregate_runs(&runs);
    debug!(
        "Running: {} rows, {} runs in series",
        rows.len(),
        stats.run_count
    );
    stats.into()
}

/// Chess pipeline.
pub fn process_chess(rows: &[RawRecord], ctx: &AnalysisContext) -> ChessResult {
    let games = sort_by_timestamp(normalize_games(rows));
    let stats = aggregate_games(&games, &ctx.timezone, ctx.now);
    debug!(
        "Chess: {} games, {} daily highs",
        stats.game_count,
        stats.daily_highs.len()
    );
    stats.into()
}

/// Run the pipeline that belongs to `domain`.
pub fn process(domain: Domain, rows: Vec<RawRecord>, ctx: &AnalysisContext) -> DomainResult {
    match domain {
        Domain::Running => DomainResult::Running(process_running(&rows)),
        Domain::Chess => DomainResult::Chess(process_chess(&rows, ctx)),
        _ => DomainResult::PassThrough(rows),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
