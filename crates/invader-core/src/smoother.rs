//! Gain smoothing for click-free gating.
//!
//! The curve produces a target gain per sample; applying it directly would
//! modulate the audio at audio rate. [`GainSmoother`] eases toward the target
//! with a one-pole lowpass whose speed depends on direction: the attack
//! coefficient when the gain is falling (gate closing) and the release
//! coefficient when it is rising (gate opening).
//!
//! ```text
//! target < G:  G += attack_coeff  * (target - G)
//! target > G:  G += release_coeff * (target - G)
//! ```

use crate::envelope::clamp_coeff;
use crate::math::{db_to_gain, flush_denormal};

/// Direction-dependent one-pole smoother for the applied gain.
///
/// Starts fully open (`1.0`) and always stays within [0, 1].
///
/// # Example
///
/// ```rust
/// use invader_core::{GainSmoother, ms_to_coefficient};
///
/// let mut gain = GainSmoother::new(
///     ms_to_coefficient(1.0, 48000.0),
///     ms_to_coefficient(100.0, 48000.0),
/// );
/// for _ in 0..4800 {
///     gain.process(20.0); // 20 dB of reduction requested
/// }
/// assert!((gain.gain() - 0.1).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct GainSmoother {
    /// Current applied gain (linear)
    current: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl GainSmoother {
    /// Create a smoother with the given coefficients, starting at unity gain.
    pub fn new(attack_coeff: f32, release_coeff: f32) -> Self {
        let mut smoother = Self {
            current: 1.0,
            attack_coeff: 1.0,
            release_coeff: 1.0,
        };
        smoother.set_coefficients(attack_coeff, release_coeff);
        smoother
    }

    /// Replace the coefficients, keeping the current gain.
    pub fn set_coefficients(&mut self, attack_coeff: f32, release_coeff: f32) {
        self.attack_coeff = clamp_coeff(attack_coeff);
        self.release_coeff = clamp_coeff(release_coeff);
    }

    /// Attack and release coefficients as `(attack, release)`.
    pub fn coefficients(&self) -> (f32, f32) {
        (self.attack_coeff, self.release_coeff)
    }

    /// Advance one sample toward the gain for `reduction_db` and return it.
    ///
    /// Negative or NaN reductions are treated as zero (no amplification).
    #[inline]
    pub fn process(&mut self, reduction_db: f32) -> f32 {
        let reduction = if reduction_db > 0.0 { reduction_db } else { 0.0 };
        self.advance_to(db_to_gain(-reduction))
    }

    /// Advance one sample toward a linear target gain and return it.
    #[inline]
    pub fn advance_to(&mut self, target: f32) -> f32 {
        let target = if target.is_nan() { self.current } else { target.clamp(0.0, 1.0) };
        let coeff = if target < self.current {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        let next = self.current + coeff * (target - self.current);
        self.current = flush_denormal(next).clamp(0.0, 1.0);
        self.current
    }

    /// Current applied gain (linear).
    pub fn gain(&self) -> f32 {
        self.current
    }

    /// Return to unity gain.
    pub fn reset(&mut self) {
        self.current = 1.0;
    }
}

impl Default for GainSmoother {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}
