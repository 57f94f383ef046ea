/// Round `value` to `decimals` places, halves away from zero.
///
/// # Examples
///
/// ```
/// use tracker_core::formatting::round_to;
///
/// assert_eq!(round_to(66.666, 1), 66.7);
/// assert_eq!(round_to(0.25, 1), 0.3);
/// assert_eq!(round_to(-1.25, 1), -1.3);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use tracker_core::formatting::percentage;
///
/// assert_eq!(percentage(2.0, 3.0, 1), 66.7);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    round_to((part / whole) * 100.0, decimal_places)
}

/// Format a rate with an explicit sign and two decimals.
///
/// The sign is `-` only for negative values; zero is rendered as `+0.00`.
///
/// # Examples
///
/// ```
/// use tracker_core::formatting::format_signed;
///
/// assert_eq!(format_signed(12.346), "+12.35");
/// assert_eq!(format_signed(-0.5), "-0.50");
/// assert_eq!(format_signed(0.0), "+0.00");
/// ```
pub fn format_signed(value: f64) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    format!("{}{:.2}", sign, value.abs())
}

/// Render a number of seconds as whole hours, e.g. `"12 hours"`.
///
/// # Examples
///
/// ```
/// use tracker_core::formatting::format_hours;
///
/// assert_eq!(format_hours(5_400.0), "2 hours");
/// assert_eq!(format_hours(0.0), "0 hours");
/// ```
pub fn format_hours(seconds: f64) -> String {
    format!("{} hours", (seconds / 3600.0).round() as i64)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
