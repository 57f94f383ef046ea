use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::TrackerError;

/// One spreadsheet row keyed by header name, values typed loosely.
pub type RawRecord = serde_json::Map<String, Value>;

// ── Domain ────────────────────────────────────────────────────────────────────

/// Every activity log the tracker knows how to fetch.
///
/// Only [`Domain::Running`] and [`Domain::Chess`] are analysed; the rest are
/// served as decoded rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    Running,
    Chess,
    Driving,
    Spotify,
    Duolingo,
    Climbing,
    Cod,
    Dobble,
    Typing,
    Pushups,
}

impl Domain {
    /// All domains in refresh order.
    pub const ALL: [Domain; 10] = [
        Domain::Running,
        Domain::Chess,
        Domain::Driving,
        Domain::Spotify,
        Domain::Duolingo,
        Domain::Climbing,
        Domain::Cod,
        Domain::Dobble,
        Domain::Typing,
        Domain::Pushups,
    ];

    /// Cache / URL key of the domain.
    pub fn key(self) -> &'static str {
        match self {
            Domain::Running => "k5",
            Domain::Chess => "chess",
            Domain::Driving => "driving",
            Domain::Spotify => "spotify",
            Domain::Duolingo => "duolingo",
            Domain::Climbing => "climbing",
            Domain::Cod => "COD",
            Domain::Dobble => "dobble",
            Domain::Typing => "typing",
            Domain::Pushups => "pushups",
        }
    }

    /// Environment variable holding the spreadsheet id.
    pub fn spreadsheet_env(self) -> &'static str {
        match self {
            Domain::Running => "K5_SPREADSHEET_ID",
            Domain::Chess => "CHESS_SPREADSHEET_ID",
            Domain::Driving => "DRIVING_SPREADSHEET_ID",
            Domain::Spotify => "SPOTIFY_SPREADSHEET_ID",
            Domain::Duolingo => "DUOLINGO_SPREADSHEET_ID",
            Domain::Climbing => "CLIMBING_SPREADSHEET_ID",
            Domain::Cod => "COD_SPREADSHEET_ID",
            Domain::Dobble => "DOBBLE_SPREADSHEET_ID",
            Domain::Typing => "TYPING_SPREADSHEET_ID",
            Domain::Pushups => "PUSHUPS_SPREADSHEET_ID",
        }
    }

    /// A1-notation range read from the spreadsheet.
    pub fn range(self) -> &'static str {
        match self {
            Domain::Climbing => "DetailedRoutes!A1:Z",
            Domain::Cod => "AllGames!A1:Z",
            Domain::Dobble => "60!A1:Z",
            _ => "Sheet1!A1:Z",
        }
    }

    /// `true` for the domains that have a statistics pipeline.
    pub fn is_analysed(self) -> bool {
        matches!(self, Domain::Running | Domain::Chess)
    }

    /// Look a domain up by its key. Keys are case-sensitive.
    pub fn from_key(key: &str) -> Option<Domain> {
        Domain::ALL.into_iter().find(|d| d.key() == key)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Domain {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::from_key(s).ok_or_else(|| TrackerError::UnknownDomain(s.to_string()))
    }
}

// ── FieldValue ────────────────────────────────────────────────────────────────

/// Outcome of coercing one raw field into a semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T> {
    /// Coercion succeeded.
    Parsed(T),
    /// A value was present but could not be coerced; kept verbatim.
    Uncoerced(Value),
    /// The field was absent or empty.
    Missing,
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Missing
    }
}

impl<T> FieldValue<T> {
    /// Borrow the coerced value, treating anything else as absent.
    pub fn parsed(&self) -> Option<&T> {
        match self {
            FieldValue::Parsed(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, FieldValue::Parsed(_))
    }

    /// Transform a coerced value, leaving the other states untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldValue<U> {
        match self {
            FieldValue::Parsed(v) => FieldValue::Parsed(f(v)),
            FieldValue::Uncoerced(raw) => FieldValue::Uncoerced(raw),
            FieldValue::Missing => FieldValue::Missing,
        }
    }
}

impl<T: Copy> FieldValue<T> {
    /// Copy the coerced value out, if any.
    pub fn get(&self) -> Option<T> {
        self.parsed().copied()
    }
}

// ── Timestamped ───────────────────────────────────────────────────────────────

/// Any normalized record that may carry a timestamp.
pub trait Timestamped {
    /// The record's timestamp, or `None` when it could not be parsed.
    fn timestamp(&self) -> Option<DateTime<Utc>>;
}

// ── Running ───────────────────────────────────────────────────────────────────

/// Lower bound (inclusive) of a split's distance for it to count as 1 km.
pub const KM_SPLIT_MIN_DISTANCE: f64 = 900.0;
/// Upper bound (inclusive) of a split's distance for it to count as 1 km.
pub const KM_SPLIT_MAX_DISTANCE: f64 = 1100.0;

/// A single recorded sub-interval within a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSample {
    /// Seconds spent moving during the split.
    pub moving_time: f64,
    /// Distance covered, in metres.
    pub distance: f64,
}

impl SplitSample {
    /// Whether this split is a usable proxy for a one-kilometre pace.
    pub fn is_kilometre(&self) -> bool {
        self.moving_time > 0.0
            && self.distance >= KM_SPLIT_MIN_DISTANCE
            && self.distance <= KM_SPLIT_MAX_DISTANCE
    }
}

/// A normalized running log row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunRecord {
    /// Start of the run (from `StartDateEpoch`).
    pub timestamp: FieldValue<DateTime<Utc>>,
    /// Moving time in seconds (from `MovingTime`).
    pub moving_time: FieldValue<f64>,
    /// Distance in metres (from `Distance`).
    pub distance: FieldValue<f64>,
    /// Metric splits; empty when absent or unparseable.
    pub splits: Vec<SplitSample>,
}

impl Timestamped for RunRecord {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.get()
    }
}

// ── Chess ─────────────────────────────────────────────────────────────────────

/// Outcome of a chess game from the player's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Loss,
    Draw,
    /// A result code not recognised as any of the above.
    Other(String),
}

impl GameResult {
    /// Map a chess.com style result code onto a [`GameResult`].
    pub fn parse(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "win" => GameResult::Win,
            "loss" | "lose" | "checkmated" | "resigned" | "timeout" | "abandoned" => {
                GameResult::Loss
            }
            "draw" | "agreed" | "repetition" | "stalemate" | "insufficient" | "50move"
            | "timevsinsufficient" => GameResult::Draw,
            _ => GameResult::Other(code.to_string()),
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, GameResult::Win)
    }
}

/// A normalized chess log row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChessGameRecord {
    /// Game start (from `startTime`).
    pub timestamp: FieldValue<DateTime<Utc>>,
    /// Rating after the game (from `myRating`).
    pub rating: FieldValue<i64>,
    /// Result (from `myResult`).
    pub result: FieldValue<GameResult>,
    /// Accuracy percentage (from `myAccuracy`).
    pub accuracy: FieldValue<f64>,
    /// Game length in seconds (from `gameLength`).
    pub duration: FieldValue<f64>,
}

impl Timestamped for ChessGameRecord {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Domain ───────────────────────────────────────────────────────────────

    #[test]
    fn test_domain_keys_round_trip() {
        for domain in Domain::ALL {
            assert_eq!(Domain::from_key(domain.key()), Some(domain));
            assert_eq!(domain.key().parse::<Domain>().unwrap(), domain);
        }
    }

    #[test]
    fn test_domain_unknown_key() {
        assert!(Domain::from_key("cod").is_none(), "keys are case-sensitive");
        let err = "golf".parse::<Domain>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown domain: golf");
    }

    #[test]
    fn test_domain_ranges() {
        assert_eq!(Domain::Running.range(), "Sheet1!A1:Z");
        assert_eq!(Domain::Climbing.range(), "DetailedRoutes!A1:Z");
        assert_eq!(Domain::Cod.range(), "AllGames!A1:Z");
        assert_eq!(Domain::Dobble.range(), "60!A1:Z");
    }

    #[test]
    fn test_domain_is_analysed() {
        let analysed: Vec<Domain> = Domain::ALL.into_iter().filter(|d| d.is_analysed()).collect();
        assert_eq!(analysed, vec![Domain::Running, Domain::Chess]);
    }

    // ── FieldValue ───────────────────────────────────────────────────────────

    #[test]
    fn test_field_value_accessors() {
        let parsed: FieldValue<f64> = FieldValue::Parsed(4.5);
        let raw: FieldValue<f64> = FieldValue::Uncoerced(Value::String("n/a".into()));
        let missing: FieldValue<f64> = FieldValue::default();

        assert_eq!(parsed.get(), Some(4.5));
        assert!(parsed.is_parsed());
        assert_eq!(raw.get(), None);
        assert!(!raw.is_parsed());
        assert_eq!(missing, FieldValue::Missing);
    }

    // ── SplitSample ──────────────────────────────────────────────────────────

    #[test]
    fn test_split_kilometre_bounds_inclusive() {
        let at = |distance, moving_time| SplitSample {
            moving_time,
            distance,
        };
        assert!(at(900.0, 250.0).is_kilometre());
        assert!(at(1100.0, 250.0).is_kilometre());
        assert!(!at(899.9, 250.0).is_kilometre());
        assert!(!at(1100.1, 250.0).is_kilometre());
        assert!(!at(1000.0, 0.0).is_kilometre());
    }

    // ── GameResult ───────────────────────────────────────────────────────────

    #[test]
    fn test_game_result_parse() {
        assert_eq!(GameResult::parse("win"), GameResult::Win);
        assert_eq!(GameResult::parse("checkmated"), GameResult::Loss);
        assert_eq!(GameResult::parse("resigned"), GameResult::Loss);
        assert_eq!(GameResult::parse("stalemate"), GameResult::Draw);
        assert_eq!(GameResult::parse("agreed"), GameResult::Draw);
        assert_eq!(
            GameResult::parse("bughousepartnerlose"),
            GameResult::Other("bughousepartnerlose".to_string())
        );
        assert!(GameResult::parse("WIN").is_win());
    }
}
