// ── TrendLine ─────────────────────────────────────────────────────────────────

/// A straight line `y = intercept + slope * x` fitted to a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    /// Number of points the line was fitted to.
    pub points: usize,
    /// Smallest `x` among the fitted points.
    pub x_first: f64,
    /// Largest `x` among the fitted points.
    pub x_last: f64,
}

impl TrendLine {
    /// Fit an ordinary least-squares line to `values`, using each value's
    /// 0-based position as `x`.
    pub fn fit(values: &[f64]) -> Self {
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, &y)| (i as f64, y))
            .collect();
        Self::fit_points(&points)
    }

    /// Fit an ordinary least-squares line to `(x, y)` points.
    ///
    /// Fewer than two points, or points sharing a single `x`, cannot define a
    /// slope; the line is then flat through the mean `y` (or through zero for
    /// no points).
    pub fn fit_points(points: &[(f64, f64)]) -> Self {
        let n = points.len() as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_xx = 0.0;
        let mut x_first = f64::INFINITY;
        let mut x_last = f64::NEG_INFINITY;
        for &(x, y) in points {
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_xx += x * x;
            x_first = x_first.min(x);
            x_last = x_last.max(x);
        }
        if points.is_empty() {
            x_first = 0.0;
            x_last = 0.0;
        }

        let denominator = n * sum_xx - sum_x * sum_x;
        if points.len() < 2 || denominator == 0.0 {
            let intercept = if points.is_empty() { 0.0 } else { sum_y / n };
            return Self {
                slope: 0.0,
                intercept,
                points: points.len(),
                x_first,
                x_last,
            };
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        Self {
            slope,
            intercept,
            points: points.len(),
            x_first,
            x_last,
        }
    }

    /// Fitted value at position `x`.
    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Fitted value at the last `x` minus the fitted value at the first.
    pub fn delta(&self) -> f64 {
        self.value_at(self.x_last) - self.value_at(self.x_first)
    }
}

// ── Rate per hour ─────────────────────────────────────────────────────────────

/// Scale `delta` (accumulated over `total_seconds`) to a per-hour rate.
///
/// Returns `None` when `total_seconds` is not positive or the result would not
/// be finite.
pub fn rate_per_hour(delta: f64, total_seconds: f64) -> Option<f64> {
    if total_seconds.is_nan() || total_seconds <= 0.0 {
        return None;
    }
    let rate = delta * (3600.0 / total_seconds);
    rate.is_finite().then_some(rate)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
