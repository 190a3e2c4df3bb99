//! Processing seam between the gate and whatever drives it.
//!
//! [`Effect`] is what the offline engine and the CLI hold on to. It is
//! object-safe, so drivers can keep a `Box<dyn Effect + Send>` and stay
//! ignorant of the concrete processor.

/// Mono audio processor driven one sample or one block at a time.
///
/// # Example
///
/// ```rust
/// use invader_core::Effect;
///
/// struct Gain(f32);
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.0
///     }
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///     fn reset(&mut self) {}
/// }
///
/// let mut gain = Gain(0.5);
/// let mut buffer = [1.0, -1.0];
/// gain.process_block_inplace(&mut buffer);
/// assert_eq!(buffer, [0.5, -0.5]);
/// ```
pub trait Effect {
    /// Process a single sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// `input` and `output` must have the same length.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Rebind the processor to a new sample rate.
    ///
    /// Implementations may discard internal state.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state without touching parameters.
    fn reset(&mut self);

    /// Added latency in samples.
    fn latency_samples(&self) -> usize {
        0
    }

    /// Gain reduction currently applied, in dB (≥ 0), for metering.
    ///
    /// Processors without dynamics report `0.0`.
    fn gain_reduction_db(&self) -> f32 {
        0.0
    }
}
