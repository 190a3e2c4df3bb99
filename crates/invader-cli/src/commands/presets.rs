//! Preset management commands.
//!
//! Provides commands to list, show, and save gate presets.

use super::common::{apply_overrides, format_value, load_preset, parse_key_val};
use clap::{Args, Subcommand};
use invader_config::{
    GateSettings, Preset, ensure_user_presets_dir, factory_presets, list_user_presets,
    preset_name_from_path, user_config_dir, user_presets_dir,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,

        /// Print the raw TOML instead of a summary
        #[arg(long)]
        toml: bool,
    },

    /// Save gate settings as a user preset
    Save {
        /// Name for the new preset
        name: String,

        /// Preset to start from (defaults to every control at its default)
        #[arg(long)]
        from: Option<String>,

        /// Parameter override (e.g., "threshold_db=-50")
        #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
        param: Vec<(String, String)>,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Write to this file instead of the user presets directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite if the preset already exists
        #[arg(long)]
        force: bool,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => {
            list_presets(factory, user);
            Ok(())
        }
        PresetsCommand::Show { name, toml } => show_preset(&name, toml),
        PresetsCommand::Save {
            name,
            from,
            param,
            description,
            output,
            force,
        } => save_preset(SaveRequest {
            name: &name,
            from: from.as_deref(),
            overrides: &param,
            description: description.as_deref(),
            output,
            force,
        }),
        PresetsCommand::Paths => {
            show_paths();
            Ok(())
        }
    }
}

fn list_presets(factory_only: bool, user_only: bool) {
    let show_factory = !user_only;
    let show_user = !factory_only;

    if show_factory {
        println!("Factory Presets:");
        println!("================");
        for preset in factory_presets() {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:20} - {}", preset.name, desc);
        }
        println!();
    }

    if show_user {
        println!("User Presets:");
        println!("=============");
        let user_presets = list_user_presets();
        if user_presets.is_empty() {
            println!("  (none)");
            println!();
            println!("  Create a preset with: invader presets save <name> --param threshold_db=-50\n");
        } else {
            for path in user_presets {
                let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
                match Preset::load(&path) {
                    Ok(preset) => {
                        let desc = preset.description.as_deref().unwrap_or("");
                        println!("  {name:20} - {desc}");
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "unreadable preset");
                        println!("  {name:20} - (error loading)");
                    }
                }
            }
        }
        println!();
    }
}

fn show_preset(name: &str, raw: bool) -> anyhow::Result<()> {
    let preset = load_preset(name)?;

    if raw {
        print!("{}", preset.to_toml()?);
        return Ok(());
    }

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();

    if let Some(desc) = &preset.description {
        println!("Description: {desc}");
        println!();
    }

    println!("Sample Rate: {} Hz", preset.sample_rate);
    println!();

    println!("Parameters:");
    for (param, value) in preset.params.iter() {
        println!("  {:16} {}", param.key(), format_value(param, value));
    }

    if let Err(e) = preset.validate() {
        println!();
        println!("Warning: {e}");
    }

    Ok(())
}

struct SaveRequest<'a> {
    name: &'a str,
    from: Option<&'a str>,
    overrides: &'a [(String, String)],
    description: Option<&'a str>,
    output: Option<PathBuf>,
    force: bool,
}

fn save_preset(request: SaveRequest<'_>) -> anyhow::Result<()> {
    let name = request.name;
    if name.trim().is_empty() || name.contains(['/', '\\']) {
        anyhow::bail!("Invalid preset name '{name}'. Use --output to choose a path.");
    }

    let (base, sample_rate) = match request.from {
        Some(source) => {
            let preset = load_preset(source)?;
            (preset.params, preset.sample_rate)
        }
        None => (GateSettings::default(), Preset::default().sample_rate),
    };
    let settings = apply_overrides(base, request.overrides)?;

    let preset_path = match request.output {
        Some(path) => path,
        None => ensure_user_presets_dir()?.join(format!("{name}.toml")),
    };

    if preset_path.exists() && !request.force {
        anyhow::bail!(
            "Preset '{}' already exists at {}. Use --force to overwrite.",
            name,
            preset_path.display()
        );
    }

    let mut preset = Preset::new(name)
        .with_sample_rate(sample_rate)
        .with_settings(settings);
    if let Some(desc) = request.description {
        preset = preset.with_description(desc);
    }
    preset.validate()?;
    preset.save(&preset_path)?;

    tracing::info!(path = %preset_path.display(), "preset saved");
    println!("Saved preset '{}' to {}", name, preset_path.display());
    Ok(())
}

fn show_paths() {
    println!("Preset Directories:");
    println!("===================");
    println!();
    println!("User presets: {}", user_presets_dir().display());
    println!("Config dir:   {}", user_config_dir().display());
}
