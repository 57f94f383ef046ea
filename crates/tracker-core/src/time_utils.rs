use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Uses the `iana-time-zone` crate directly – no subprocess calls.
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Projects UTC timestamps onto the local calendar used for grouping and
/// display.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneHandler {
    default_tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler with the given IANA timezone name as the default.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { default_tz: tz }
    }

    /// Handler for UTC.
    pub fn utc() -> Self {
        Self { default_tz: Tz::UTC }
    }

    /// Validate that `tz_name` is a recognised IANA timezone identifier.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.parse::<Tz>().is_ok()
    }

    /// Local calendar date of `dt`.
    pub fn local_date(&self, dt: DateTime<Utc>) -> NaiveDate {
        dt.with_timezone(&self.default_tz).date_naive()
    }

    /// Local hour-of-day (0–23) of `dt`.
    pub fn local_hour(&self, dt: DateTime<Utc>) -> u32 {
        dt.with_timezone(&self.default_tz).hour()
    }

    /// Short day label, `dd/mm/yy`, in local time.
    pub fn day_label(&self, dt: DateTime<Utc>) -> String {
        dt.with_timezone(&self.default_tz)
            .format("%d/%m/%y")
            .to_string()
    }

    /// Full date, `dd/mm/yyyy`, in local time.
    pub fn format_date(&self, dt: DateTime<Utc>) -> String {
        dt.with_timezone(&self.default_tz)
            .format("%d/%m/%Y")
            .to_string()
    }
}

// ── Relative age ──────────────────────────────────────────────────────────────

const HOURS_PER_DAY: i64 = 24;
const DAYS_PER_MONTH: i64 = 30;
const MONTHS_PER_YEAR: i64 = 12;

/// Describe how long ago `then` was, relative to `now`.
///
/// * `< 24` hours → `"N hours ago"`
/// * `< 30` days → `"N days ago"`
/// * `< 12` months (of 30 days) → `"N months ago"`
/// * otherwise → `"N years ago"`
///
/// Every unit is truncated. Timestamps in the future count as 0 hours.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - then).num_hours().max(0);
    if hours < HOURS_PER_DAY {
        return format!("{} hours ago", hours);
    }

    let days = hours / HOURS_PER_DAY;
    if days < DAYS_PER_MONTH {
        return format!("{} days ago", days);
    }

    let months = days / DAYS_PER_MONTH;
    if months < MONTHS_PER_YEAR {
        return format!("{} months ago", months);
    }

    format!("{} years ago", months / MONTHS_PER_YEAR)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
