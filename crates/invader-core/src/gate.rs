//! The host-facing noise gate.
//!
//! [`NoiseGate`] owns the raw parameter positions and one [`Kernel`]. Every
//! parameter write stores the normalized position and pushes the derived
//! engineering value into the kernel. A sample-rate change replaces the
//! kernel outright and replays every stored position into the new one, so
//! the sound after the change depends only on the parameters.

use crate::effect::Effect;
use crate::filter::{DEFAULT_HIGHPASS_HZ, DEFAULT_LOWPASS_HZ};
use crate::kernel::{DEFAULT_SAMPLE_RATE, Kernel};
use crate::param::{GateParam, GateParams};
use crate::response::init_tables;

/// Single-channel noise gate with normalized parameters.
///
/// # Example
///
/// ```rust
/// use invader_core::{Effect, GateParam, NoiseGate};
///
/// let mut gate = NoiseGate::new(48000.0);
/// gate.set_display(GateParam::ThresholdDb, -50.0);
/// gate.set_param(GateParam::Ratio, 1.0);
///
/// let input = [0.0f32; 64];
/// let mut output = [0.0f32; 64];
/// gate.process_block(&input, &mut output);
/// ```
#[derive(Debug, Clone)]
pub struct NoiseGate {
    params: GateParams,
    kernel: Kernel,
}

impl NoiseGate {
    /// Create a gate at `sample_rate` with default parameters.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_prefilter(sample_rate, DEFAULT_HIGHPASS_HZ, DEFAULT_LOWPASS_HZ)
    }

    /// Create a gate with custom detection filter corners.
    pub fn with_prefilter(sample_rate: f32, highpass_hz: f32, lowpass_hz: f32) -> Self {
        init_tables();
        let mut gate = Self {
            params: GateParams::default(),
            kernel: Kernel::with_prefilter(sample_rate, highpass_hz, lowpass_hz),
        };
        gate.apply_all();
        gate
    }

    /// Sample rate of the current kernel.
    pub fn sample_rate(&self) -> f32 {
        self.kernel.sample_rate()
    }

    /// Raw normalized position of `param`.
    pub fn param(&self, param: GateParam) -> f32 {
        self.params.get(param)
    }

    /// All raw positions.
    pub fn params(&self) -> &GateParams {
        &self.params
    }

    /// Set a normalized position and forward it to the kernel.
    ///
    /// Non-finite values are ignored and `false` is returned; others are
    /// clamped to [0, 1].
    pub fn set_param(&mut self, param: GateParam, normalized: f32) -> bool {
        if !self.params.set(param, normalized) {
            #[cfg(feature = "tracing")]
            tracing::debug!(?param, normalized, "ignoring non-finite parameter value");
            return false;
        }
        self.apply(param);
        true
    }

    /// Replace every position at once.
    pub fn set_params(&mut self, params: &GateParams) {
        self.params = *params;
        self.apply_all();
    }

    /// Value of `param` in display units (dB for the gains).
    pub fn display(&self, param: GateParam) -> f32 {
        param.to_display(self.params.get(param))
    }

    /// Set `param` from a value in display units.
    pub fn set_display(&mut self, param: GateParam, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.set_param(param, param.from_display(value))
    }

    /// Restore every parameter to its default position.
    pub fn reset_params(&mut self) {
        self.set_params(&GateParams::default());
    }

    /// Rebuild the kernel at `sample_rate` and replay every parameter.
    ///
    /// Filter, envelope and gain state start fresh.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let highpass_hz = self.kernel.highpass_hz();
        let lowpass_hz = self.kernel.lowpass_hz();
        self.kernel = Kernel::with_prefilter(sample_rate, highpass_hz, lowpass_hz);
        self.apply_all();

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate = self.kernel.sample_rate(), "gate kernel rebuilt");
    }

    /// The kernel, for metering and inspection.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Current detector level in dB.
    pub fn envelope_db(&self) -> f32 {
        self.kernel.envelope_db()
    }

    /// Gain currently applied by the gate (linear).
    pub fn gain(&self) -> f32 {
        self.kernel.gain()
    }

    fn apply(&mut self, param: GateParam) {
        let plain = self.params.plain(param);
        let kernel = &mut self.kernel;
        match param {
            GateParam::Enabled => kernel.set_enabled(plain >= 0.5),
            GateParam::InputGain => kernel.set_input_gain(plain),
            GateParam::OutputGain => kernel.set_output_gain(plain),
            GateParam::AttackMs => kernel.set_attack_ms(plain),
            GateParam::ReleaseMs => kernel.set_release_ms(plain),
            GateParam::KneeDb => kernel.set_knee_db(plain),
            GateParam::Ratio => kernel.set_ratio(plain),
            GateParam::ThresholdDb => kernel.set_threshold_db(plain),
        }
    }

    fn apply_all(&mut self) {
        for param in GateParam::ALL {
            self.apply(param);
        }
    }
}

impl Default for NoiseGate {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl Effect for NoiseGate {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.kernel.process_sample(input)
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        let frames = input.len().min(output.len());
        self.kernel.process(input, output, frames);
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        self.kernel.process_in_place(buffer);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        NoiseGate::set_sample_rate(self, sample_rate);
    }

    fn reset(&mut self) {
        self.kernel.reset();
    }

    fn gain_reduction_db(&self) -> f32 {
        (-self.kernel.gain_db()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}

    #[test]
    fn gate_is_send() {
        assert_send::<NoiseGate>();
        assert_send::<Kernel>();
    }

    #[test]
    fn defaults_reach_kernel() {
        let gate = NoiseGate::new(48000.0);
        let kernel = gate.kernel();
        assert!(kernel.enabled());
        assert!((kernel.input_gain() - 1.0).abs() < 1e-6);
        assert!((kernel.threshold_db() + 43.7).abs() < 0.1);
        assert!((kernel.knee_db() - 3.01).abs() < 1e-5);
    }

    #[test]
    fn set_param_updates_kernel() {
        let mut gate = NoiseGate::new(48000.0);
        assert!(gate.set_param(GateParam::ThresholdDb, 0.0));
        assert_eq!(gate.kernel().threshold_db(), -80.0);
        assert!(gate.set_param(GateParam::Enabled, 0.2));
        assert!(!gate.kernel().enabled());
    }

    #[test]
    fn non_finite_param_is_ignored() {
        let mut gate = NoiseGate::new(48000.0);
        let before = gate.param(GateParam::Ratio);
        assert!(!gate.set_param(GateParam::Ratio, f32::NAN));
        assert_eq!(gate.param(GateParam::Ratio), before);
        assert!(!gate.set_display(GateParam::Ratio, f32::INFINITY));
    }

    #[test]
    fn display_values_roundtrip() {
        let mut gate = NoiseGate::new(48000.0);
        gate.set_display(GateParam::InputGain, 6.0);
        assert!((gate.display(GateParam::InputGain) - 6.0).abs() < 1e-4);
        gate.set_display(GateParam::ThresholdDb, -50.0);
        assert!((gate.display(GateParam::ThresholdDb) + 50.0).abs() < 0.05);
        gate.set_display(GateParam::AttackMs, 20.0);
        assert!((gate.kernel().attack_ms() - 20.0).abs() < 0.05);
    }

    #[test]
    fn sample_rate_change_rebuilds_and_replays() {
        let mut gate = NoiseGate::new(44100.0);
        gate.set_param(GateParam::ThresholdDb, 0.8);
        gate.set_param(GateParam::AttackMs, 0.6);
        for _ in 0..1000 {
            gate.process(0.5);
        }

        gate.set_sample_rate(96000.0);
        assert_eq!(gate.sample_rate(), 96000.0);
        assert_eq!(gate.gain(), 1.0);
        assert!(gate.envelope_db() < -190.0);

        let fresh = {
            let mut g = NoiseGate::new(96000.0);
            g.set_param(GateParam::ThresholdDb, 0.8);
            g.set_param(GateParam::AttackMs, 0.6);
            g
        };
        assert_eq!(gate.kernel().coefficients(), fresh.kernel().coefficients());
    }

    #[test]
    fn block_and_sample_paths_agree() {
        let mut a = NoiseGate::new(48000.0);
        let mut b = NoiseGate::new(48000.0);
        let input: [f32; 32] = core::array::from_fn(|i| if i % 4 == 0 { 0.3 } else { -0.01 });
        let mut output = [0.0; 32];
        a.process_block(&input, &mut output);
        for (inp, out) in input.iter().zip(output.iter()) {
            assert_eq!(*out, b.process(*inp));
        }
    }

    #[test]
    fn reduction_meter_is_non_negative() {
        let mut gate = NoiseGate::new(48000.0);
        assert_eq!(gate.gain_reduction_db(), 0.0);
        for _ in 0..48000 {
            gate.process(0.0);
        }
        assert!(gate.gain_reduction_db() > 20.0);
    }
}
