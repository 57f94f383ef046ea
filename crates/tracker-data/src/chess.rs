//! Chess statistics over chronologically sorted games.
//!
//! Produces the rating summary, one daily high per local calendar day, 24
//! hour-of-day buckets, a least-squares rating trend scaled to a per-hour rate
//! and the age of the most recent game.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use tracker_core::calculations::{rate_per_hour, TrendLine};
use tracker_core::formatting::{percentage, round_to};
use tracker_core::models::ChessGameRecord;
use tracker_core::time_utils::{time_ago, TimezoneHandler};
use tracing::debug;

/// Number of hour-of-day buckets.
pub const HOURS_PER_DAY: usize = 24;

/// Marker size telling a chart to draw a point.
pub const MARKER_VISIBLE: u8 = 3;
/// Marker size telling a chart to skip a point.
pub const MARKER_HIDDEN: u8 = 0;

// ── DailyHigh ─────────────────────────────────────────────────────────────────

/// The best rating reached on one local calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyHigh {
    pub day: NaiveDate,
    /// `dd/mm/yy` label of `day`.
    pub label: String,
    /// Start of the game that set the high.
    pub timestamp: DateTime<Utc>,
    pub highest_rating: i64,
}

// ── HourlyBucket ──────────────────────────────────────────────────────────────

/// Games played during one hour of the day, across the whole history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyBucket {
    pub hour: u32,
    pub games: usize,
    pub wins: usize,
    /// Games in this bucket that carried an accuracy figure.
    pub accuracy_samples: usize,
    pub accuracy_sum: f64,
}

impl HourlyBucket {
    fn new(hour: u32) -> Self {
        Self {
            hour,
            ..Self::default()
        }
    }

    fn add(&mut self, game: &ChessGameRecord) {
        self.games += 1;
        if game.result.parsed().is_some_and(|r| r.is_win()) {
            self.wins += 1;
        }
        if let Some(accuracy) = game.accuracy.get() {
            self.accuracy_samples += 1;
            self.accuracy_sum += accuracy;
        }
    }

    /// Win percentage, one decimal; `0.0` for an empty bucket.
    pub fn win_rate(&self) -> f64 {
        percentage(self.wins as f64, self.games as f64, 1)
    }

    /// Mean accuracy over all games in the bucket, one decimal. Games without
    /// an accuracy figure count as zero.
    pub fn mean_accuracy(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        round_to(self.accuracy_sum / self.games as f64, 1)
    }

    pub fn win_marker(&self) -> u8 {
        if self.games > 0 {
            MARKER_VISIBLE
        } else {
            MARKER_HIDDEN
        }
    }

    pub fn accuracy_marker(&self) -> u8 {
        if self.accuracy_samples > 0 {
            MARKER_VISIBLE
        } else {
            MARKER_HIDDEN
        }
    }
}

// ── ChessStats ────────────────────────────────────────────────────────────────

/// Everything computed from one chess history.
#[derive(Debug, Clone, PartialEq)]
pub struct ChessStats {
    /// Highest rating seen; `0` when no game has a rating.
    pub highest_rating: i64,
    pub game_count: usize,
    /// Ascending by day.
    pub daily_highs: Vec<DailyHigh>,
    /// Exactly [`HOURS_PER_DAY`] buckets, hour 0 first.
    pub hourly: Vec<HourlyBucket>,
    pub trend: TrendLine,
    /// Fitted rating at the last rated game's position minus the fitted
    /// rating at the first rated game's position.
    pub rating_delta: f64,
    pub total_play_seconds: f64,
    /// `None` when the total play time is not positive.
    pub change_per_hour: Option<f64>,
    pub last_game: Option<DateTime<Utc>>,
    /// `dd/mm/yyyy (N units ago)` for the last game.
    pub time_since_last_game: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Aggregate `games`, which must already be sorted by timestamp.
///
/// `tz` decides local days and hours; `now` anchors the relative age of the
/// last game.
pub fn aggregate_games(
    games: &[ChessGameRecord],
    tz: &TimezoneHandler,
    now: DateTime<Utc>,
) -> ChessStats {
    let highest_rating = games
        .iter()
        .filter_map(|g| g.rating.get())
        .max()
        .unwrap_or(0);

    // x is the game's position in the sorted history, so unrated games
    // leave gaps rather than shifting later games down.
    let ratings: Vec<(f64, f64)> = games
        .iter()
        .enumerate()
        .filter_map(|(i, g)| g.rating.get().map(|r| (i as f64, r as f64)))
        .collect();
    let trend = TrendLine::fit_points(&ratings);
    let rating_delta = trend.delta();

    let total_play_seconds: f64 = games.iter().filter_map(|g| g.duration.get()).sum();
    let change_per_hour = rate_per_hour(rating_delta, total_play_seconds);
    if change_per_hour.is_none() && !games.is_empty() {
        debug!("Total play time is zero, rating change per hour unavailable");
    }

    let last_game = games.iter().rev().find_map(|g| g.timestamp.get());
    let time_since_last_game =
        last_game.map(|ts| format!("{} ({})", tz.format_date(ts), time_ago(ts, now)));

    ChessStats {
        highest_rating,
        game_count: games.len(),
        daily_highs: daily_highs(games, tz),
        hourly: hourly_buckets(games, tz),
        trend,
        rating_delta,
        total_play_seconds,
        change_per_hour,
        last_game,
        time_since_last_game,
    }
}

/// One [`DailyHigh`] per local day, ascending.
///
/// Within a day a later game replaces the current high only with a strictly
/// greater rating, so the earliest game wins ties. Games without a timestamp
/// or rating are skipped.
pub fn daily_highs(games: &[ChessGameRecord], tz: &TimezoneHandler) -> Vec<DailyHigh> {
    let mut by_day: BTreeMap<NaiveDate, DailyHigh> = BTreeMap::new();

    for game in games {
        let (Some(ts), Some(rating)) = (game.timestamp.get(), game.rating.get()) else {
            continue;
        };
        let day = tz.local_date(ts);
        by_day
            .entry(day)
            .and_modify(|high| {
                if rating > high.highest_rating {
                    high.timestamp = ts;
                    high.highest_rating = rating;
                }
            })
            .or_insert_with(|| DailyHigh {
                day,
                label: tz.day_label(ts),
                timestamp: ts,
                highest_rating: rating,
            });
    }

    by_day.into_values().collect()
}

/// Fixed 24-slot hour-of-day aggregation of every timestamped game.
pub fn hourly_buckets(games: &[ChessGameRecord], tz: &TimezoneHandler) -> Vec<HourlyBucket> {
    let mut buckets: Vec<HourlyBucket> = (0..HOURS_PER_DAY as u32).map(HourlyBucket::new).collect();

    for game in games {
        if let Some(ts) = game.timestamp.get() {
            buckets[tz.local_hour(ts) as usize].add(game);
        }
    }

    buckets
}

// ── Tests ─────────────────────────────────────────────────────────────────────
