//! Piecewise-linear scoring primitives shared by every archetype scorer.
//!
//! A raw ratio is mapped onto 0-100 through three breakpoints: everything at
//! or below `low` scores 0, `mid` scores 50, `high` and above score 100, with
//! straight lines in between. A missing value scores a neutral 50.

/// Neutral score used for missing valuation inputs and unchanged trends.
pub const NEUTRAL_SCORE: f64 = 50.0;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Low/mid/high thresholds for one metric's normalization curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoints {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl Breakpoints {
    pub const fn new(low: f64, mid: f64, high: f64) -> Self {
        Self { low, mid, high }
    }

    pub fn normalize(&self, value: Option<f64>) -> f64 {
        normalize(value, self.low, self.mid, self.high)
    }
}

/// Map `value` onto 0-100. Requires `low < mid < high`.
pub fn normalize(value: Option<f64>, low: f64, mid: f64, high: f64) -> f64 {
    debug_assert!(low < mid && mid < high, "breakpoints must satisfy low < mid < high");

    let value = match value {
        Some(v) if !v.is_nan() => v,
        _ => return NEUTRAL_SCORE,
    };

    if value <= low {
        MIN_SCORE
    } else if value <= mid {
        (value - low) / (mid - low) * 50.0
    } else if value <= high {
        50.0 + (value - mid) / (high - mid) * 50.0
    } else {
        MAX_SCORE
    }
}

/// Quarter-over-quarter change, or 0.0 when either side is missing.
pub fn delta(current: Option<f64>, previous: Option<f64>) -> f64 {
    match (current, previous) {
        (Some(c), Some(p)) => c - p,
        _ => 0.0,
    }
}

/// Clamp a raw score into [0, 100]. NaN (e.g. from `inf - inf`) becomes `fallback`.
pub fn clamp_score(raw: f64, fallback: f64) -> f64 {
    if raw.is_nan() {
        return fallback;
    }
    raw.clamp(MIN_SCORE, MAX_SCORE)
}

/// Round to two decimal places, the precision scores are reported at.
/// Exact half-cent ties go to the even cent.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
