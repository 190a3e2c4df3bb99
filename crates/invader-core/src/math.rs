//! Unit conversions shared by every stage of the gate.
//!
//! All functions are pure, allocation-free and `no_std` compatible.
//!
//! # Level Conversions
//!
//! - [`db_to_gain`] / [`gain_to_db`] - Convert between dB and linear gain
//!
//! # Time Constants
//!
//! - [`ms_to_coefficient`] - One-pole smoothing coefficient from a time in ms
//! - [`ms_to_samples`] - Time conversion used by tests and metering
//!
//! # Numerical Hygiene
//!
//! - [`flush_denormal`] - Keep recursive state out of the subnormal range
//! - [`sanitize`] - Replace non-finite values before they reach persisted state

use libm::{expf, logf};

/// Smallest linear gain considered by [`gain_to_db`] (≈ −200 dB).
pub const GAIN_FLOOR: f32 = 1e-10;

/// Level reported by [`gain_to_db`] for silence.
pub const DB_FLOOR: f32 = -200.0;

/// Convert decibels to linear gain.
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use invader_core::db_to_gain;
///
/// assert!((db_to_gain(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_gain(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Gains below [`GAIN_FLOOR`] (including zero and negative values) are
/// floored, so silence reads as [`DB_FLOOR`] instead of `-inf`.
///
/// # Example
/// ```rust
/// use invader_core::gain_to_db;
///
/// assert!((gain_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((gain_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert!(gain_to_db(0.0).is_finite());
/// ```
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    // 20 * log10(gain) = 20 * ln(gain) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    // `max` returns the non-NaN operand, so NaN also lands on the floor
    logf(gain.max(GAIN_FLOOR)) * FACTOR
}

/// One-pole smoothing coefficient for a time constant in milliseconds.
///
/// Used in the form `y += coeff * (target - y)`. After `ms` milliseconds
/// the step response has covered ~63.2% of the distance to the target:
///
/// ```text
/// coeff = 1 - exp(-1 / (ms * sample_rate / 1000))
/// ```
///
/// Returns exactly `1.0` (instantaneous) when `ms <= 0`, when the sample rate
/// is not positive, or when either argument is not finite. The result is
/// always in (0, 1].
///
/// # Example
/// ```rust
/// use invader_core::ms_to_coefficient;
///
/// let c = ms_to_coefficient(10.0, 48000.0);
/// assert!(c > 0.0 && c < 0.01);
/// assert_eq!(ms_to_coefficient(0.0, 48000.0), 1.0);
/// ```
#[inline]
pub fn ms_to_coefficient(ms: f32, sample_rate: f32) -> f32 {
    if !ms.is_finite() || !sample_rate.is_finite() || ms <= 0.0 || sample_rate <= 0.0 {
        return 1.0;
    }
    let samples = ms_to_samples(ms, sample_rate);
    let coeff = 1.0 - expf(-1.0 / samples);
    // Extremely long times underflow to 0 in f32; keep the stage moving.
    coeff.clamp(f32::MIN_POSITIVE, 1.0)
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats cause severe CPU slowdowns on most architectures.
/// Values below 1e-20 are replaced with zero, leaving margin before the
/// IEEE 754 subnormal range begins.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Return `value` if it is finite, otherwise `fallback`.
#[inline]
pub fn sanitize(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}
