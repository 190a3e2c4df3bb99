//! The noise-gate kernel: per-sample signal path and parameter staging.
//!
//! ```text
//!             ┌──────────────┐   ┌──────────┐   ┌───────┐   ┌──────────┐
//! in ─×in_gain┤ PreFilter    ├──►│ Envelope ├──►│ Curve ├──►│ Smoother │──┐ G
//!        │    └──────────────┘   └──────────┘   └───────┘   └──────────┘  │
//!        └───────────────────────────────────────────────────────────────(×)─×out_gain─► out
//! ```
//!
//! The kernel is bound to one sample rate. Every setter stores the
//! engineering value and calls [`Kernel::update_all`], which rederives the
//! curve and every coefficient; filter, envelope and gain state carry over,
//! so parameter moves are glitch-free. A sample-rate change means building a
//! new kernel.
//!
//! [`Kernel::process`] allocates nothing, takes no locks and performs no I/O.

use crate::curve::{
    ExpanderCurve, MAX_KNEE_DB, MAX_RATIO, MAX_THRESHOLD_DB, MIN_KNEE_DB, MIN_RATIO,
    MIN_THRESHOLD_DB,
};
use crate::envelope::EnvelopeDetector;
use crate::filter::{DEFAULT_HIGHPASS_HZ, DEFAULT_LOWPASS_HZ, PreFilter};
use crate::math::{db_to_gain, gain_to_db, ms_to_coefficient};
use crate::smoother::GainSmoother;

/// Sample rate used when the caller supplies an unusable one.
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

/// Shortest attack time in ms.
pub const MIN_ATTACK_MS: f32 = 1.0;
/// Longest attack time in ms.
pub const MAX_ATTACK_MS: f32 = 300.0;
/// Shortest release time in ms.
pub const MIN_RELEASE_MS: f32 = 10.0;
/// Longest release time in ms.
pub const MAX_RELEASE_MS: f32 = 1000.0;
/// Lowest input/output gain in dB.
pub const MIN_GAIN_DB: f32 = -20.0;
/// Highest input/output gain in dB.
pub const MAX_GAIN_DB: f32 = 20.0;

/// Detector input is limited to this magnitude (+120 dBFS).
const DETECTOR_HEADROOM: f32 = 1.0e6;

/// Coefficients derived by [`Kernel::update_all`], exposed for inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelCoefficients {
    /// Attack smoothing coefficient, shared by detector and smoother
    pub attack: f32,
    /// Release smoothing coefficient, shared by detector and smoother
    pub release: f32,
    /// High-pass pole coefficient
    pub highpass: f32,
    /// Low-pass pole coefficient
    pub lowpass: f32,
    /// Active expander curve
    pub curve: ExpanderCurve,
}

/// Single-channel noise-gate kernel.
///
/// # Example
///
/// ```rust
/// use invader_core::Kernel;
///
/// let mut kernel = Kernel::new(48000.0);
/// kernel.set_threshold_db(-50.0);
/// kernel.set_ratio(10.0);
///
/// let input = [0.0f32; 256];
/// let mut output = [0.0f32; 256];
/// kernel.process(&input, &mut output, 256);
/// ```
#[derive(Debug, Clone)]
pub struct Kernel {
    sample_rate: f32,

    enabled: bool,
    input_gain: f32,
    output_gain: f32,
    attack_ms: f32,
    release_ms: f32,
    knee_db: f32,
    ratio: f32,
    threshold_db: f32,
    highpass_hz: f32,
    lowpass_hz: f32,

    prefilter: PreFilter,
    detector: EnvelopeDetector,
    curve: ExpanderCurve,
    smoother: GainSmoother,
    /// Reduction requested on the most recent sample (metering)
    last_reduction_db: f32,
}

impl Kernel {
    /// Create a kernel with the default 60 Hz / 4 kHz detection filter.
    ///
    /// A non-finite or non-positive `sample_rate` falls back to
    /// [`DEFAULT_SAMPLE_RATE`].
    pub fn new(sample_rate: f32) -> Self {
        Self::with_prefilter(sample_rate, DEFAULT_HIGHPASS_HZ, DEFAULT_LOWPASS_HZ)
    }

    /// Create a kernel with explicit detection filter corners.
    pub fn with_prefilter(sample_rate: f32, highpass_hz: f32, lowpass_hz: f32) -> Self {
        let sample_rate = if sample_rate.is_finite() && sample_rate >= 1.0 {
            sample_rate
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!(sample_rate, "unusable sample rate, using {DEFAULT_SAMPLE_RATE}");
            DEFAULT_SAMPLE_RATE
        };

        let prefilter = PreFilter::new(sample_rate, highpass_hz, lowpass_hz);
        let mut kernel = Self {
            sample_rate,
            enabled: true,
            input_gain: 1.0,
            output_gain: 1.0,
            attack_ms: 10.0,
            release_ms: 100.0,
            knee_db: 6.0,
            ratio: 4.0,
            threshold_db: -40.0,
            highpass_hz: prefilter.highpass_hz(),
            lowpass_hz: prefilter.lowpass_hz(),
            prefilter,
            detector: EnvelopeDetector::with_coefficients(1.0, 1.0),
            curve: ExpanderCurve::default(),
            smoother: GainSmoother::default(),
            last_reduction_db: 0.0,
        };
        kernel.update_all();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            highpass_hz = kernel.highpass_hz,
            lowpass_hz = kernel.lowpass_hz,
            "kernel created"
        );

        kernel
    }

    /// Sample rate this kernel is bound to.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    // --- Parameter setters (engineering values) ---

    /// Enable or bypass gating. Bypassed, the gain eases back to unity.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.update_all();
    }

    /// Set input gain (linear), clamped to −20..+20 dB.
    pub fn set_input_gain(&mut self, gain: f32) {
        if let Some(gain) = clamp_gain(gain) {
            self.input_gain = gain;
        }
        self.update_all();
    }

    /// Set output gain (linear), clamped to −20..+20 dB.
    pub fn set_output_gain(&mut self, gain: f32) {
        if let Some(gain) = clamp_gain(gain) {
            self.output_gain = gain;
        }
        self.update_all();
    }

    /// Set attack time in ms (1–300).
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        if attack_ms.is_finite() {
            self.attack_ms = attack_ms.clamp(MIN_ATTACK_MS, MAX_ATTACK_MS);
        }
        self.update_all();
    }

    /// Set release time in ms (10–1000).
    pub fn set_release_ms(&mut self, release_ms: f32) {
        if release_ms.is_finite() {
            self.release_ms = release_ms.clamp(MIN_RELEASE_MS, MAX_RELEASE_MS);
        }
        self.update_all();
    }

    /// Set knee width in dB (0.01–12).
    pub fn set_knee_db(&mut self, knee_db: f32) {
        if knee_db.is_finite() {
            self.knee_db = knee_db.clamp(MIN_KNEE_DB, MAX_KNEE_DB);
        }
        self.update_all();
    }

    /// Set expansion ratio (1–20).
    pub fn set_ratio(&mut self, ratio: f32) {
        if ratio.is_finite() {
            self.ratio = ratio.clamp(MIN_RATIO, MAX_RATIO);
        }
        self.update_all();
    }

    /// Set threshold in dB (−80–0).
    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        if threshold_db.is_finite() {
            self.threshold_db = threshold_db.clamp(MIN_THRESHOLD_DB, MAX_THRESHOLD_DB);
        }
        self.update_all();
    }

    /// Move the detection filter corners. Non-finite values keep the old corner.
    pub fn set_prefilter_hz(&mut self, highpass_hz: f32, lowpass_hz: f32) {
        if highpass_hz.is_finite() {
            self.highpass_hz = highpass_hz;
        }
        if lowpass_hz.is_finite() {
            self.lowpass_hz = lowpass_hz;
        }
        self.update_all();
    }

    // --- Parameter getters ---

    /// Whether gating is active.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Input gain (linear).
    pub fn input_gain(&self) -> f32 {
        self.input_gain
    }

    /// Output gain (linear).
    pub fn output_gain(&self) -> f32 {
        self.output_gain
    }

    /// Attack time in ms.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Release time in ms.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Knee width in dB.
    pub fn knee_db(&self) -> f32 {
        self.knee_db
    }

    /// Expansion ratio.
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    /// Detection high-pass corner in Hz.
    pub fn highpass_hz(&self) -> f32 {
        self.highpass_hz
    }

    /// Detection low-pass corner in Hz.
    pub fn lowpass_hz(&self) -> f32 {
        self.lowpass_hz
    }

    /// Recompute the curve and every coefficient from the stored values.
    ///
    /// Idempotent: calling it again without a parameter change produces
    /// identical coefficients. Processing state is left untouched.
    pub fn update_all(&mut self) {
        let attack = ms_to_coefficient(self.attack_ms, self.sample_rate);
        let release = ms_to_coefficient(self.release_ms, self.sample_rate);

        self.prefilter.set_corners(self.highpass_hz, self.lowpass_hz);
        self.highpass_hz = self.prefilter.highpass_hz();
        self.lowpass_hz = self.prefilter.lowpass_hz();

        self.detector.set_coefficients(attack, release);
        self.smoother.set_coefficients(attack, release);
        self.curve = ExpanderCurve::new(self.threshold_db, self.knee_db, self.ratio);
    }

    /// Snapshot of everything [`update_all`](Self::update_all) derives.
    pub fn coefficients(&self) -> KernelCoefficients {
        let (attack, release) = self.detector.coefficients();
        let (highpass, lowpass) = self.prefilter.coefficients();
        KernelCoefficients {
            attack,
            release,
            highpass,
            lowpass,
            curve: self.curve,
        }
    }

    // --- Processing ---

    /// Process one sample through the full signal path.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let scaled = input * self.input_gain;
        if !scaled.is_finite() {
            // Drop the sample; persisted state never sees it.
            return 0.0;
        }

        let detect = scaled.clamp(-DETECTOR_HEADROOM, DETECTOR_HEADROOM);
        let filtered = self.prefilter.process(detect);
        self.detector.process(filtered);

        let reduction_db = if self.enabled {
            self.curve.gain_reduction_db(self.detector.level_db())
        } else {
            0.0
        };
        self.last_reduction_db = reduction_db;

        let gain = self.smoother.process(reduction_db);
        let output = scaled * gain * self.output_gain;
        if output.is_finite() { output } else { 0.0 }
    }

    /// Process `frame_count` samples from `input` into `output`.
    ///
    /// Processing stops early if either buffer is shorter than
    /// `frame_count`; samples beyond that are left untouched.
    pub fn process(&mut self, input: &[f32], output: &mut [f32], frame_count: usize) {
        for (inp, out) in input
            .iter()
            .zip(output.iter_mut())
            .take(frame_count)
        {
            *out = self.process_sample(*inp);
        }
    }

    /// Process a buffer in place.
    pub fn process_in_place(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    // --- Metering ---

    /// Current detector level in dB.
    pub fn envelope_db(&self) -> f32 {
        self.detector.level_db()
    }

    /// Gain currently applied by the smoother (linear, in [0, 1]).
    pub fn gain(&self) -> f32 {
        self.smoother.gain()
    }

    /// Gain currently applied, in dB (≤ 0).
    pub fn gain_db(&self) -> f32 {
        gain_to_db(self.smoother.gain())
    }

    /// Reduction the curve requested for the most recent sample, in dB.
    pub fn gain_reduction_db(&self) -> f32 {
        self.last_reduction_db
    }

    /// Clear filter, envelope and gain state without touching parameters.
    pub fn reset(&mut self) {
        self.prefilter.reset();
        self.detector.reset();
        self.smoother.reset();
        self.last_reduction_db = 0.0;
    }
}

fn clamp_gain(gain: f32) -> Option<f32> {
    gain.is_finite()
        .then(|| gain.clamp(db_to_gain(MIN_GAIN_DB), db_to_gain(MAX_GAIN_DB)))
}
