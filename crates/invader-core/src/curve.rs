//! Static soft-knee downward-expander curve.
//!
//! Maps a detected level in dB to a gain reduction in dB. Above the knee the
//! signal is left alone; below it every dB the level falls under the
//! threshold costs `1 - 1/ratio` dB of extra attenuation. Inside the knee a
//! quadratic blends the two so that both value and slope are continuous:
//!
//! ```text
//! reduction
//!    ^
//!    |\
//!    | \   slope -(1 - 1/R)
//!    |  \
//!    |   `.
//!    |     `-.______________  0
//!    +------|--T--|----------> level (dB)
//!        T-K/2   T+K/2
//! ```
//!
//! With a large ratio this approaches a hard gate; with `ratio = 1` the curve
//! is flat zero.

use crate::math::DB_FLOOR;

/// Lowest accepted threshold in dB.
pub const MIN_THRESHOLD_DB: f32 = -80.0;
/// Highest accepted threshold in dB.
pub const MAX_THRESHOLD_DB: f32 = 0.0;
/// Narrowest accepted knee in dB.
pub const MIN_KNEE_DB: f32 = 0.01;
/// Widest accepted knee in dB.
pub const MAX_KNEE_DB: f32 = 12.0;
/// Lowest accepted expansion ratio.
pub const MIN_RATIO: f32 = 1.0;
/// Highest accepted expansion ratio.
pub const MAX_RATIO: f32 = 20.0;

/// Soft-knee expander transfer curve.
///
/// # Example
///
/// ```rust
/// use invader_core::ExpanderCurve;
///
/// let curve = ExpanderCurve::new(-40.0, 6.0, 4.0);
/// assert_eq!(curve.gain_reduction_db(-20.0), 0.0);
/// // 20 dB under threshold at 4:1 → 15 dB of reduction
/// assert!((curve.gain_reduction_db(-60.0) - 15.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpanderCurve {
    threshold_db: f32,
    knee_db: f32,
    ratio: f32,
    /// `1 - 1/ratio`, cached
    slope: f32,
}

impl ExpanderCurve {
    /// Build a curve, clamping every argument into its valid range.
    ///
    /// Non-finite arguments fall back to the nearest sensible value
    /// (threshold 0 dB, knee [`MIN_KNEE_DB`], ratio [`MIN_RATIO`]).
    pub fn new(threshold_db: f32, knee_db: f32, ratio: f32) -> Self {
        let threshold_db = finite_or(threshold_db, MAX_THRESHOLD_DB)
            .clamp(MIN_THRESHOLD_DB, MAX_THRESHOLD_DB);
        let knee_db = finite_or(knee_db, MIN_KNEE_DB).clamp(MIN_KNEE_DB, MAX_KNEE_DB);
        let ratio = finite_or(ratio, MIN_RATIO).clamp(MIN_RATIO, MAX_RATIO);
        Self {
            threshold_db,
            knee_db,
            ratio,
            slope: 1.0 - 1.0 / ratio,
        }
    }

    /// Threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    /// Knee width in dB.
    pub fn knee_db(&self) -> f32 {
        self.knee_db
    }

    /// Expansion ratio.
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Gain reduction in dB (always `>= 0`) for a detected level in dB.
    ///
    /// Non-increasing in `level_db`. A NaN level is treated as silence.
    #[inline]
    pub fn gain_reduction_db(&self, level_db: f32) -> f32 {
        let level = if level_db.is_nan() { DB_FLOOR } else { level_db.max(DB_FLOOR) };
        let half_knee = self.knee_db * 0.5;
        let knee_top = self.threshold_db + half_knee;

        if level >= knee_top {
            0.0
        } else if level <= self.threshold_db - half_knee {
            (self.threshold_db - level) * self.slope
        } else {
            let depth = knee_top - level;
            self.slope * depth * depth / (2.0 * self.knee_db)
        }
    }
}

impl Default for ExpanderCurve {
    fn default() -> Self {
        Self::new(-40.0, 6.0, 4.0)
    }
}

#[inline]
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_reduction_above_knee() {
        let curve = ExpanderCurve::new(-30.0, 10.0, 8.0);
        for level in [-25.0, -20.0, -10.0, 0.0, 12.0] {
            assert_eq!(curve.gain_reduction_db(level), 0.0, "level {level}");
        }
    }

    #[test]
    fn full_expansion_below_knee() {
        let curve = ExpanderCurve::new(-30.0, 10.0, 8.0);
        for level in [-35.0, -50.0, -90.0] {
            let expected = (-30.0 - level) * (1.0 - 1.0 / 8.0);
            let got = curve.gain_reduction_db(level);
            assert!((got - expected).abs() < 1e-4, "level {level}: {got} vs {expected}");
        }
    }

    #[test]
    fn knee_edges_are_continuous() {
        let curve = ExpanderCurve::new(-40.0, 12.0, 20.0);
        let eps = 1e-3;
        for edge in [-46.0f32, -34.0] {
            let below = curve.gain_reduction_db(edge - eps);
            let above = curve.gain_reduction_db(edge + eps);
            assert!((below - above).abs() < 0.01, "jump at {edge}: {below} vs {above}");
        }
    }

    #[test]
    fn knee_midpoint_value() {
        // At the threshold the quadratic gives slope * K / 8
        let curve = ExpanderCurve::new(-40.0, 8.0, 2.0);
        let got = curve.gain_reduction_db(-40.0);
        assert!((got - 0.5).abs() < 1e-5, "got {got}");
    }

    #[test]
    fn unity_ratio_is_flat() {
        let curve = ExpanderCurve::new(-40.0, 6.0, 1.0);
        for level in [-200.0, -60.0, -40.0, 0.0] {
            assert_eq!(curve.gain_reduction_db(level), 0.0);
        }
    }

    #[test]
    fn arguments_are_clamped() {
        let curve = ExpanderCurve::new(10.0, 0.0, 0.5);
        assert_eq!(curve.threshold_db(), MAX_THRESHOLD_DB);
        assert_eq!(curve.knee_db(), MIN_KNEE_DB);
        assert_eq!(curve.ratio(), MIN_RATIO);

        let curve = ExpanderCurve::new(-500.0, 99.0, 1000.0);
        assert_eq!(curve.threshold_db(), MIN_THRESHOLD_DB);
        assert_eq!(curve.knee_db(), MAX_KNEE_DB);
        assert_eq!(curve.ratio(), MAX_RATIO);

        let curve = ExpanderCurve::new(f32::NAN, f32::INFINITY, f32::NAN);
        assert_eq!(curve.threshold_db(), MAX_THRESHOLD_DB);
        assert_eq!(curve.knee_db(), MIN_KNEE_DB);
        assert_eq!(curve.ratio(), MIN_RATIO);
    }

    #[test]
    fn nan_level_is_finite() {
        let curve = ExpanderCurve::default();
        let r = curve.gain_reduction_db(f32::NAN);
        assert!(r.is_finite() && r > 0.0);
        assert!(curve.gain_reduction_db(f32::NEG_INFINITY).is_finite());
    }
}
