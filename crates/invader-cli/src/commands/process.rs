//! File-based gate processing command.

use super::common::{apply_overrides, format_value, load_preset, parse_key_val};
use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use invader_config::GateSettings;
use invader_core::{GateParam, NoiseGate, gain_to_db};
use invader_io::{DEFAULT_BLOCK_SIZE, ProcessingEngine, WavSpec, read_wav, write_wav};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or TOML file to start from
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter override, applied after the preset (e.g., "threshold_db=-50")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Processing block size
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("--bit-depth must be 16, 24 or 32 (got {})", args.bit_depth);
    }

    println!("Reading {}...", args.input.display());
    let (samples, spec) =
        read_wav(&args.input).with_context(|| format!("failed to read {}", args.input.display()))?;
    let sample_rate = spec.sample_rate as f32;

    println!(
        "  {} samples, {} Hz, {:.2}s",
        samples.len(),
        spec.sample_rate,
        samples.len() as f32 / sample_rate
    );
    if spec.channels > 1 {
        println!("  {} channels mixed down to mono", spec.channels);
    }

    let base = match &args.preset {
        Some(name) => {
            let preset = load_preset(name)?;
            println!("Loading preset: {}", preset.name);
            preset.params
        }
        None => GateSettings::default(),
    };
    let settings = apply_overrides(base, &args.param)?;

    let mut gate = NoiseGate::new(sample_rate);
    settings.apply_to(&mut gate);
    print_settings(&gate);
    tracing::info!(
        threshold_db = settings.threshold_db,
        ratio = settings.ratio,
        block_size = args.block_size,
        "gate configured"
    );

    let mut engine =
        ProcessingEngine::new(Box::new(gate), sample_rate).with_block_size(args.block_size);

    println!("Processing in {}-sample blocks...", args.block_size);
    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    let output = engine.process_buffer_with(&samples, |done| pb.set_position(done as u64));
    pb.finish_with_message("done");

    let reduction = engine.stats();
    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        gain_to_db(rms(&samples)),
        gain_to_db(peak(&samples))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        gain_to_db(rms(&output)),
        gain_to_db(peak(&output))
    );
    println!(
        "  Gain reduction: avg {:.1} dB, max {:.1} dB",
        reduction.mean_db, reduction.max_db
    );

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, WavSpec::mono(spec.sample_rate, args.bit_depth))
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

fn print_settings(gate: &NoiseGate) {
    println!("Gate:");
    for param in GateParam::ALL {
        println!(
            "  {:12} {}",
            param.descriptor().name,
            format_value(param, gate.display(param))
        );
    }
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_of_simple_signals() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&[0.5, -0.5, 0.5, -0.5]) - 0.5).abs() < 1e-6);
        assert_eq!(peak(&[0.1, -0.9, 0.3]), 0.9);
        // Silence reports the shared dB floor.
        assert!((gain_to_db(rms(&[0.0; 4])) + 200.0).abs() < 1e-3);
        assert!((gain_to_db(peak(&[0.5, -0.25])) + 6.0206).abs() < 1e-3);
    }
}
