//! Detection pre-filter: one-pole high-pass and low-pass.
//!
//! The gate decides on a band-limited copy of the signal. Rumble and DC below
//! the high-pass corner and hiss above the low-pass corner would otherwise
//! hold the gate open on noise. The audio that reaches the output is never
//! filtered.
//!
//! Both sections share the one-pole lowpass difference equation
//!
//! ```text
//! lp[n] = x[n] + coeff * (lp[n-1] - x[n])
//! ```
//!
//! where `coeff = exp(-2π * freq / sample_rate)`. The high-pass is the
//! complement `x[n] - lp[n]`, so each section carries exactly one state value.
//!
//! Reference: Julius O. Smith III, "Introduction to Digital Filters with
//! Audio Applications", Section: One-Pole Filter.

use crate::math::{flush_denormal, sanitize};
use libm::expf;

/// Default detection high-pass corner in Hz.
pub const DEFAULT_HIGHPASS_HZ: f32 = 60.0;

/// Default detection low-pass corner in Hz.
pub const DEFAULT_LOWPASS_HZ: f32 = 4000.0;

/// Lowest accepted corner frequency in Hz.
pub const MIN_CORNER_HZ: f32 = 1.0;

/// Highest accepted corner as a fraction of the sample rate.
pub const MAX_CORNER_RATIO: f32 = 0.45;

/// Clamp a corner frequency to `[MIN_CORNER_HZ, MAX_CORNER_RATIO * sample_rate]`.
///
/// Non-finite corners fall back to `fallback`.
pub fn clamp_corner(freq_hz: f32, sample_rate: f32, fallback: f32) -> f32 {
    let freq = if freq_hz.is_finite() { freq_hz } else { fallback };
    let max = (sample_rate * MAX_CORNER_RATIO).max(MIN_CORNER_HZ);
    freq.clamp(MIN_CORNER_HZ, max)
}

/// One-pole (6 dB/oct) filter section.
///
/// # Invariants
///
/// - `coeff` is in (0, 1) for any positive corner below Nyquist
/// - `state` is flushed to zero when below 1e-20 (denormal protection)
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    freq: f32,
}

impl OnePole {
    /// Create a new one-pole section.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `freq_hz` - Corner frequency in Hz
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
            freq: freq_hz,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Set the corner frequency and recalculate the coefficient.
    ///
    /// The filter state is kept, so the change is click-free.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq = freq_hz;
        self.recalculate_coeff();
    }

    /// Corner frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Current pole coefficient.
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// Process one sample as a lowpass.
    ///
    /// State that overflows is cleared rather than carried forward.
    #[inline]
    pub fn process_lowpass(&mut self, input: f32) -> f32 {
        let next = input + self.coeff * (self.state - input);
        self.state = flush_denormal(sanitize(next, 0.0));
        self.state
    }

    /// Process one sample as a highpass (input minus its lowpass).
    #[inline]
    pub fn process_highpass(&mut self, input: f32) -> f32 {
        input - self.process_lowpass(input)
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    fn recalculate_coeff(&mut self) {
        self.coeff = expf(-core::f32::consts::TAU * self.freq / self.sample_rate);
    }
}

/// High-pass followed by low-pass, feeding the envelope detector.
#[derive(Debug, Clone)]
pub struct PreFilter {
    highpass: OnePole,
    lowpass: OnePole,
    sample_rate: f32,
}

impl PreFilter {
    /// Create the detection filter with the given corners.
    ///
    /// Corners are clamped with [`clamp_corner`].
    pub fn new(sample_rate: f32, highpass_hz: f32, lowpass_hz: f32) -> Self {
        let highpass_hz = clamp_corner(highpass_hz, sample_rate, DEFAULT_HIGHPASS_HZ);
        let lowpass_hz = clamp_corner(lowpass_hz, sample_rate, DEFAULT_LOWPASS_HZ);
        Self {
            highpass: OnePole::new(sample_rate, highpass_hz),
            lowpass: OnePole::new(sample_rate, lowpass_hz),
            sample_rate,
        }
    }

    /// Move both corners, keeping filter state.
    pub fn set_corners(&mut self, highpass_hz: f32, lowpass_hz: f32) {
        self.highpass
            .set_frequency(clamp_corner(highpass_hz, self.sample_rate, DEFAULT_HIGHPASS_HZ));
        self.lowpass
            .set_frequency(clamp_corner(lowpass_hz, self.sample_rate, DEFAULT_LOWPASS_HZ));
    }

    /// High-pass corner in Hz (after clamping).
    pub fn highpass_hz(&self) -> f32 {
        self.highpass.frequency()
    }

    /// Low-pass corner in Hz (after clamping).
    pub fn lowpass_hz(&self) -> f32 {
        self.lowpass.frequency()
    }

    /// Pole coefficients as `(highpass, lowpass)`.
    pub fn coefficients(&self) -> (f32, f32) {
        (self.highpass.coeff(), self.lowpass.coeff())
    }

    /// Filter one detection sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let rumble_free = self.highpass.process_highpass(input);
        self.lowpass.process_lowpass(rumble_free)
    }

    /// Clear both filter states.
    pub fn reset(&mut self) {
        self.highpass.reset();
        self.lowpass.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::TAU;

    fn settled_peak(filter: &mut PreFilter, freq_hz: f32, sample_rate: f32) -> f32 {
        let total = sample_rate as usize;
        let mut peak = 0.0f32;
        for i in 0..total {
            let x = libm::sinf(TAU * freq_hz * i as f32 / sample_rate);
            let y = filter.process(x);
            if i > total / 2 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut lp = OnePole::new(48000.0, 1000.0);
        let mut out = 0.0;
        for _ in 0..48000 {
            out = lp.process_lowpass(1.0);
        }
        assert!((out - 1.0).abs() < 1e-4, "DC should pass through, got {out}");
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut hp = OnePole::new(48000.0, 60.0);
        let mut out = 1.0;
        for _ in 0..48000 {
            out = hp.process_highpass(1.0);
        }
        assert!(out.abs() < 1e-4, "DC should be removed, got {out}");
    }

    #[test]
    fn overflowing_state_is_cleared() {
        let mut hp = OnePole::new(48000.0, 60.0);
        for i in 0..8 {
            let input = if i % 2 == 0 { 3.0e38 } else { -3.0e38 };
            hp.process_highpass(input);
            assert!(hp.state.is_finite());
        }

        // A quiet signal afterwards is filtered normally.
        let mut lp = OnePole::new(48000.0, 1000.0);
        lp.process_lowpass(3.0e38);
        lp.process_lowpass(-3.0e38);
        let mut out = 0.0;
        for _ in 0..48000 {
            out = lp.process_lowpass(1.0);
        }
        assert!((out - 1.0).abs() < 1e-4, "got {out}");
    }

    #[test]
    fn lowpass_attenuates_nyquist() {
        let mut lp = OnePole::new(48000.0, 100.0);
        let mut sum = 0.0f32;
        for i in 0..4800 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            sum += lp.process_lowpass(input).abs();
        }
        let avg = sum / 4800.0;
        assert!(avg < 0.05, "Nyquist should be heavily attenuated, avg = {avg}");
    }

    #[test]
    fn prefilter_passes_midrange() {
        let mut filter = PreFilter::new(48000.0, DEFAULT_HIGHPASS_HZ, DEFAULT_LOWPASS_HZ);
        let peak = settled_peak(&mut filter, 1000.0, 48000.0);
        assert!(peak > 0.85 && peak <= 1.0, "1 kHz should pass, peak = {peak}");
    }

    #[test]
    fn prefilter_rejects_rumble_and_hiss() {
        let mut filter = PreFilter::new(48000.0, DEFAULT_HIGHPASS_HZ, DEFAULT_LOWPASS_HZ);
        let rumble = settled_peak(&mut filter, 5.0, 48000.0);
        assert!(rumble < 0.15, "5 Hz should be attenuated, peak = {rumble}");

        let mut filter = PreFilter::new(48000.0, DEFAULT_HIGHPASS_HZ, DEFAULT_LOWPASS_HZ);
        let hiss = settled_peak(&mut filter, 20000.0, 48000.0);
        assert!(hiss < 0.35, "20 kHz should be attenuated, peak = {hiss}");
    }

    #[test]
    fn corners_are_clamped() {
        let filter = PreFilter::new(8000.0, -10.0, 20000.0);
        assert_eq!(filter.highpass_hz(), MIN_CORNER_HZ);
        assert!((filter.lowpass_hz() - 3600.0).abs() < 1e-3);

        let filter = PreFilter::new(48000.0, f32::NAN, f32::INFINITY);
        assert_eq!(filter.highpass_hz(), DEFAULT_HIGHPASS_HZ);
        assert_eq!(filter.lowpass_hz(), DEFAULT_LOWPASS_HZ);
    }

    #[test]
    fn coefficients_in_unit_interval() {
        for &sr in &[8000.0f32, 44100.0, 48000.0, 96000.0, 192000.0] {
            let filter = PreFilter::new(sr, DEFAULT_HIGHPASS_HZ, DEFAULT_LOWPASS_HZ);
            let (hp, lp) = filter.coefficients();
            assert!(hp > 0.0 && hp < 1.0, "hp coeff {hp} at {sr}");
            assert!(lp > 0.0 && lp < 1.0, "lp coeff {lp} at {sr}");
        }
    }

    #[test]
    fn reset_clears_state() {
        let mut filter = PreFilter::new(48000.0, DEFAULT_HIGHPASS_HZ, DEFAULT_LOWPASS_HZ);
        filter.process(1.0);
        filter.process(1.0);
        filter.reset();
        assert_eq!(filter.process(0.0), 0.0);
    }
}
