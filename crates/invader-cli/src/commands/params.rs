//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use super::common::{format_value, unit_label};
use clap::Args;
use invader_config::lookup_param;
use invader_core::GateParam;

#[derive(Args)]
pub struct ParamsArgs {
    /// Show details for a single parameter key
    #[arg(value_name = "PARAM")]
    param: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    match &args.param {
        Some(key) => show_param(lookup_param(key)?),
        None => list_params(),
    }
    Ok(())
}

fn list_params() {
    println!("Gate Parameters");
    println!("===============");
    println!();
    println!(
        "  {:16}  {:12}  {:6}  {:>10}  {:>10}  {:>10}",
        "Key", "Name", "Unit", "Min", "Max", "Default"
    );
    println!(
        "  {:16}  {:12}  {:6}  {:>10}  {:>10}  {:>10}",
        "---", "----", "----", "---", "---", "-------"
    );

    for param in GateParam::ALL {
        let desc = param.descriptor();
        println!(
            "  {:16}  {:12}  {:6}  {:>10}  {:>10}  {:>10}",
            desc.key,
            desc.name,
            unit_label(desc.unit),
            plain_number(param, desc.min),
            plain_number(param, desc.max),
            plain_number(param, desc.default),
        );
    }

    println!();
    println!("Override any of these with --param <key>=<value>, e.g.");
    println!("  invader process in.wav out.wav --param threshold_db=-50 --param ratio=8");
}

fn show_param(param: GateParam) {
    let desc = param.descriptor();
    println!("{}", desc.name);
    println!("{}", "=".repeat(desc.name.len()));
    println!();
    println!("  Key:        {}", desc.key);
    println!("  Unit:       {}", unit_label(desc.unit));
    println!("  Range:      {} to {}", format_value(param, desc.min), format_value(param, desc.max));
    println!("  Default:    {}", format_value(param, desc.default));
    println!("  Normalized: {:.3}", param.default_normalized());
    println!();
    println!("Example:");
    println!(
        "  invader process in.wav out.wav --param {}={}",
        desc.key,
        plain_number(param, desc.default)
    );
}

/// Bare number (or on/off) without a unit suffix.
fn plain_number(param: GateParam, value: f32) -> String {
    if param == GateParam::Enabled {
        format_value(param, value)
    } else {
        format!("{value:.2}")
    }
}
