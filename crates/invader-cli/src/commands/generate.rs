//! Test signal generation: tone bursts over a noise floor.

use clap::Args;
use invader_core::db_to_gain;
use invader_io::{WavSpec, write_wav};
use std::f32::consts::PI;
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Duration in seconds
    #[arg(long, default_value = "4.0")]
    duration: f32,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Tone frequency in Hz
    #[arg(long, default_value = "440.0")]
    freq: f32,

    /// Length of each tone burst in milliseconds
    #[arg(long, default_value = "300.0")]
    burst_ms: f32,

    /// Silence (noise only) between bursts in milliseconds
    #[arg(long, default_value = "700.0")]
    gap_ms: f32,

    /// Tone peak level in dBFS
    #[arg(long, default_value = "-12.0", allow_hyphen_values = true)]
    tone_db: f32,

    /// Noise floor peak level in dBFS
    #[arg(long, default_value = "-60.0", allow_hyphen_values = true)]
    noise_db: f32,

    /// Noise generator seed
    #[arg(long, default_value = "1")]
    seed: u32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("--duration must be positive");
    }
    if args.sample_rate == 0 {
        anyhow::bail!("--sample-rate must be positive");
    }
    if !(args.burst_ms >= 0.0 && args.gap_ms >= 0.0) {
        anyhow::bail!("--burst-ms and --gap-ms must not be negative");
    }

    let signal = BurstSignal {
        sample_rate: args.sample_rate,
        duration_secs: args.duration,
        freq_hz: args.freq,
        burst_ms: args.burst_ms,
        gap_ms: args.gap_ms,
        tone_db: args.tone_db,
        noise_db: args.noise_db,
        seed: args.seed,
    };

    println!(
        "Generating {:.1}s of {} Hz bursts ({} ms on, {} ms off) at {:.1} dBFS over {:.1} dBFS noise...",
        args.duration, args.freq, args.burst_ms, args.gap_ms, args.tone_db, args.noise_db
    );
    let samples = signal.render();
    tracing::debug!(frames = samples.len(), seed = args.seed, "rendered burst signal");

    write_wav(&args.output, &samples, WavSpec::mono(args.sample_rate, args.bit_depth))?;
    println!("Saved to {}", args.output.display());

    Ok(())
}

/// Fade in/out at each burst edge, in milliseconds.
const FADE_MS: f32 = 5.0;

/// Periodic sine bursts over white noise.
#[derive(Debug, Clone)]
struct BurstSignal {
    sample_rate: u32,
    duration_secs: f32,
    freq_hz: f32,
    burst_ms: f32,
    gap_ms: f32,
    tone_db: f32,
    noise_db: f32,
    seed: u32,
}

impl BurstSignal {
    /// Render the whole signal.
    fn render(&self) -> Vec<f32> {
        let sr = self.sample_rate as f32;
        let len = (self.duration_secs * sr) as usize;
        let burst = ms_to_frames(self.burst_ms, sr);
        let period = burst + ms_to_frames(self.gap_ms, sr);
        let fade = ms_to_frames(FADE_MS, sr).min(burst / 2).max(1);
        let tone_amp = db_to_gain(self.tone_db);
        let noise_amp = db_to_gain(self.noise_db);
        let mut noise = XorShift32::new(self.seed);

        (0..len)
            .map(|i| {
                let pos = if period == 0 { burst } else { i % period };
                let tone = if pos < burst {
                    let edge = pos.min(burst - 1 - pos);
                    let envelope = if edge < fade {
                        0.5 - 0.5 * (PI * edge as f32 / fade as f32).cos()
                    } else {
                        1.0
                    };
                    tone_amp * envelope * (2.0 * PI * self.freq_hz * i as f32 / sr).sin()
                } else {
                    0.0
                };
                tone + noise_amp * noise.next_bipolar()
            })
            .collect()
    }
}

fn ms_to_frames(ms: f32, sample_rate: f32) -> usize {
    (ms * 0.001 * sample_rate).round() as usize
}

/// Small deterministic PRNG for the noise floor.
struct XorShift32(u32);

impl XorShift32 {
    fn new(seed: u32) -> Self {
        Self(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    /// Uniform value in [-1, 1].
    fn next_bipolar(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal() -> BurstSignal {
        BurstSignal {
            sample_rate: 48000,
            duration_secs: 2.0,
            freq_hz: 1000.0,
            burst_ms: 250.0,
            gap_ms: 750.0,
            tone_db: -6.0,
            noise_db: -60.0,
            seed: 7,
        }
    }

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
    }

    #[test]
    fn length_matches_duration() {
        assert_eq!(signal().render().len(), 96000);
    }

    #[test]
    fn bursts_stand_above_noise_floor() {
        let samples = signal().render();
        let tone_amp = db_to_gain(-6.0);
        let noise_amp = db_to_gain(-60.0);

        // Middle of the first burst.
        let burst_peak = peak(&samples[2400..9600]);
        assert!((burst_peak - tone_amp).abs() < 2.0 * noise_amp);

        // Gap between the first and second bursts.
        let gap_peak = peak(&samples[13000..47000]);
        assert!(gap_peak <= noise_amp * 1.0001);
        assert!(gap_peak > noise_amp * 0.5);

        // Second burst starts one period in.
        assert!(peak(&samples[50400..57600]) > tone_amp * 0.9);
    }

    #[test]
    fn burst_edges_are_faded() {
        let samples = signal().render();
        assert!(samples[0].abs() <= db_to_gain(-60.0) * 1.0001);
    }

    #[test]
    fn seed_controls_noise() {
        let a = signal().render();
        let b = signal().render();
        assert_eq!(a, b);

        let mut other = signal();
        other.seed = 8;
        assert_ne!(a, other.render());
    }

    #[test]
    fn zero_period_is_noise_only() {
        let mut s = signal();
        s.burst_ms = 0.0;
        s.gap_ms = 0.0;
        let samples = s.render();
        assert!(peak(&samples) <= db_to_gain(-60.0) * 1.0001);
    }
}
