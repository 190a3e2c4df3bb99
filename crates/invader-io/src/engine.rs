//! Offline block processing engine.

use invader_core::Effect;

/// Block size used when none is given, in frames.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Gain reduction observed while processing, sampled once per block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReductionStats {
    /// Blocks processed.
    pub blocks: u64,
    /// Frames processed.
    pub frames: u64,
    /// Frame-weighted mean reduction in dB.
    pub mean_db: f32,
    /// Largest reduction seen at a block boundary, in dB.
    pub max_db: f32,
}

/// Runs one effect over whole buffers in fixed-size blocks, the way a
/// host audio callback would.
///
/// The effect is boxed with a `Send` bound so the engine can move to an
/// audio thread.
pub struct ProcessingEngine {
    effect: Box<dyn Effect + Send>,
    sample_rate: f32,
    block_size: usize,
    weighted_sum_db: f64,
    stats: ReductionStats,
}

impl ProcessingEngine {
    /// Create an engine around `effect`, binding it to `sample_rate`.
    pub fn new(mut effect: Box<dyn Effect + Send>, sample_rate: f32) -> Self {
        effect.set_sample_rate(sample_rate);
        Self {
            effect,
            sample_rate,
            block_size: DEFAULT_BLOCK_SIZE,
            weighted_sum_db: 0.0,
            stats: ReductionStats::default(),
        }
    }

    /// Set the block size in frames (at least 1).
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.set_block_size(block_size);
        self
    }

    /// Get the sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Rebind the effect to a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.effect.set_sample_rate(sample_rate);
    }

    /// Get the block size in frames.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Set the block size in frames (at least 1).
    pub fn set_block_size(&mut self, block_size: usize) {
        self.block_size = block_size.max(1);
    }

    /// The wrapped effect.
    pub fn effect(&self) -> &(dyn Effect + Send) {
        self.effect.as_ref()
    }

    /// The wrapped effect, mutably.
    pub fn effect_mut(&mut self) -> &mut (dyn Effect + Send) {
        self.effect.as_mut()
    }

    /// Latency of the wrapped effect in samples.
    pub fn latency_samples(&self) -> usize {
        self.effect.latency_samples()
    }

    /// Reduction statistics since creation or the last [`reset`](Self::reset).
    pub fn stats(&self) -> ReductionStats {
        self.stats
    }

    /// Clear effect state and statistics.
    pub fn reset(&mut self) {
        self.effect.reset();
        self.weighted_sum_db = 0.0;
        self.stats = ReductionStats::default();
    }

    /// Process one block. `output` must be at least as long as `input`.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert!(output.len() >= input.len());
        let len = input.len().min(output.len());
        self.effect.process_block(&input[..len], &mut output[..len]);
        self.record_block(len);
    }

    /// Process one block in place.
    pub fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        self.effect.process_block_inplace(buffer);
        self.record_block(buffer.len());
    }

    /// Process an entire buffer in blocks of [`block_size`](Self::block_size)
    /// and return the output.
    pub fn process_buffer(&mut self, input: &[f32]) -> Vec<f32> {
        self.process_buffer_with(input, |_| {})
    }

    /// Like [`process_buffer`](Self::process_buffer), calling `on_block` with
    /// the number of frames done after every block.
    pub fn process_buffer_with(
        &mut self,
        input: &[f32],
        mut on_block: impl FnMut(usize),
    ) -> Vec<f32> {
        let mut output = vec![0.0; input.len()];
        let block_size = self.block_size;
        let mut done = 0;

        for (in_chunk, out_chunk) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
            self.process_block(in_chunk, out_chunk);
            done += in_chunk.len();
            on_block(done);
        }

        tracing::debug!(
            frames = input.len(),
            block_size,
            mean_reduction_db = self.stats.mean_db,
            max_reduction_db = self.stats.max_db,
            "processed buffer"
        );
        output
    }

    fn record_block(&mut self, frames: usize) {
        if frames == 0 {
            return;
        }
        let reduction = self.effect.gain_reduction_db();
        self.weighted_sum_db += f64::from(reduction) * frames as f64;
        self.stats.blocks += 1;
        self.stats.frames += frames as u64;
        self.stats.mean_db = (self.weighted_sum_db / self.stats.frames as f64) as f32;
        self.stats.max_db = self.stats.max_db.max(reduction);
    }
}
