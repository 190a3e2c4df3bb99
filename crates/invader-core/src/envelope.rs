//! Envelope detector driving the gate decision.
//!
//! Tracks the amplitude of the pre-filtered signal with asymmetric one-pole
//! smoothing: rises are followed with the attack coefficient, falls with the
//! release coefficient. A fast attack lets the gate open as soon as signal
//! appears; a slow release keeps it from chattering while a note decays.

use crate::math::{flush_denormal, gain_to_db, ms_to_coefficient, sanitize};

/// Asymmetric peak envelope detector.
///
/// # Example
///
/// ```rust
/// use invader_core::EnvelopeDetector;
///
/// let mut env = EnvelopeDetector::new(48000.0, 1.0, 100.0);
/// for _ in 0..480 {
///     env.process(0.5);
/// }
/// assert!(env.level() > 0.49);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeDetector {
    /// Current envelope level (linear, never negative)
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl EnvelopeDetector {
    /// Create a detector with attack/release times in milliseconds.
    pub fn new(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        Self::with_coefficients(
            ms_to_coefficient(attack_ms, sample_rate),
            ms_to_coefficient(release_ms, sample_rate),
        )
    }

    /// Create a detector from precomputed smoothing coefficients.
    pub fn with_coefficients(attack_coeff: f32, release_coeff: f32) -> Self {
        let mut detector = Self {
            envelope: 0.0,
            attack_coeff: 1.0,
            release_coeff: 1.0,
        };
        detector.set_coefficients(attack_coeff, release_coeff);
        detector
    }

    /// Replace the smoothing coefficients, keeping the current level.
    ///
    /// Coefficients are clamped to (0, 1]; non-finite values become `1.0`.
    pub fn set_coefficients(&mut self, attack_coeff: f32, release_coeff: f32) {
        self.attack_coeff = clamp_coeff(attack_coeff);
        self.release_coeff = clamp_coeff(release_coeff);
    }

    /// Attack and release coefficients as `(attack, release)`.
    pub fn coefficients(&self) -> (f32, f32) {
        (self.attack_coeff, self.release_coeff)
    }

    /// Feed one sample and return the updated linear envelope.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let input_abs = input.abs();
        let coeff = if input_abs > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        let next = self.envelope + coeff * (input_abs - self.envelope);
        // Non-finite steps keep the previous level
        self.envelope = flush_denormal(sanitize(next, self.envelope).max(0.0));
        self.envelope
    }

    /// Current envelope level (linear).
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Current envelope level in dB (floored, never `-inf`).
    pub fn level_db(&self) -> f32 {
        gain_to_db(self.envelope)
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

/// Clamp a smoothing coefficient into (0, 1].
pub(crate) fn clamp_coeff(coeff: f32) -> f32 {
    if coeff.is_finite() {
        coeff.clamp(f32::MIN_POSITIVE, 1.0)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_attack() {
        let mut env = EnvelopeDetector::new(48000.0, 1.0, 100.0);

        let mut envelope = 0.0;
        for _ in 0..500 {
            envelope = env.process(1.0);
        }

        assert!(envelope > 0.6, "Envelope should rise, got {}", envelope);
    }

    #[test]
    fn test_envelope_release() {
        let mut env = EnvelopeDetector::new(48000.0, 1.0, 10.0);

        for _ in 0..5000 {
            env.process(1.0);
        }

        // 1000 samples at 48 kHz is ~2 release time constants, e^-2 ≈ 0.135
        let mut envelope = 0.0;
        for _ in 0..1000 {
            envelope = env.process(0.0);
        }

        assert!(envelope < 0.15, "Envelope should fall, got {}", envelope);
        assert!(envelope > 0.1, "Release should be gradual, got {}", envelope);
    }

    #[test]
    fn level_stays_finite_for_any_input() {
        let mut env = EnvelopeDetector::new(48000.0, 1.0, 100.0);
        env.process(0.5);
        let before = env.level();

        env.process(f32::INFINITY);
        env.process(f32::NAN);
        assert_eq!(env.level(), before);

        env.process(f32::MAX);
        assert!(env.level().is_finite());
        assert!(env.level_db().is_finite());
    }

    #[test]
    fn rise_is_faster_than_fall() {
        let mut rising = EnvelopeDetector::new(48000.0, 1.0, 200.0);
        for _ in 0..48 {
            rising.process(1.0);
        }

        let mut falling = EnvelopeDetector::new(48000.0, 1.0, 200.0);
        for _ in 0..48000 {
            falling.process(1.0);
        }
        for _ in 0..48 {
            falling.process(0.0);
        }

        let risen = rising.level();
        let fallen = 1.0 - falling.level();
        assert!(risen > fallen * 10.0, "rise {risen} vs fall {fallen}");
    }

    #[test]
    fn test_envelope_rectifies() {
        let mut env = EnvelopeDetector::new(48000.0, 1.0, 100.0);
        let level = env.process(-0.5);
        assert!(level > 0.0);
    }

    #[test]
    fn level_db_is_finite_for_silence() {
        let env = EnvelopeDetector::new(48000.0, 1.0, 100.0);
        assert!(env.level_db().is_finite());
        assert!(env.level_db() < -190.0);
    }

    #[test]
    fn envelope_never_negative() {
        let mut env = EnvelopeDetector::with_coefficients(1.0, 1.0);
        for i in 0..1000 {
            let x = if i % 3 == 0 { -0.7 } else { 0.0 };
            assert!(env.process(x) >= 0.0);
        }
    }

    #[test]
    fn bad_coefficients_are_clamped() {
        let env = EnvelopeDetector::with_coefficients(f32::NAN, 5.0);
        assert_eq!(env.coefficients(), (1.0, 1.0));

        let env = EnvelopeDetector::with_coefficients(-1.0, 0.5);
        let (attack, release) = env.coefficients();
        assert!(attack > 0.0);
        assert_eq!(release, 0.5);
    }

    #[test]
    fn test_envelope_reset() {
        let mut env = EnvelopeDetector::new(48000.0, 1.0, 100.0);
        for _ in 0..100 {
            env.process(1.0);
        }
        env.reset();
        assert_eq!(env.level(), 0.0);
    }
}
