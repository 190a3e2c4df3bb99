//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use invader_config::{
    ConfigError, GateParam, GateSettings, Preset, resolve_preset, validate_settings,
};
use invader_core::ParamUnit;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("Invalid parameter format: '{s}' (expected key=value)")),
    }
}

/// Load a preset by name or path.
///
/// Factory presets win, then an existing file path, then `<name>.toml` in
/// the user presets directory.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    match resolve_preset(name) {
        Err(ConfigError::PresetNotFound(_)) => anyhow::bail!(
            "Preset '{name}' not found. Use 'invader presets list' to see available presets."
        ),
        result => result.with_context(|| format!("failed to load preset '{name}'")),
    }
}

/// Apply `key=value` overrides to `settings`, then range-check the result.
pub fn apply_overrides(
    mut settings: GateSettings,
    overrides: &[(String, String)],
) -> anyhow::Result<GateSettings> {
    for (key, value) in overrides {
        settings
            .set_by_name(key, value)
            .with_context(|| format!("invalid --param {key}={value}"))?;
    }
    validate_settings(&settings)?;
    Ok(settings)
}

/// Short unit label for tables.
pub fn unit_label(unit: ParamUnit) -> &'static str {
    match unit {
        ParamUnit::Decibels => "dB",
        ParamUnit::Milliseconds => "ms",
        ParamUnit::Ratio => "ratio",
        ParamUnit::Toggle => "on/off",
    }
}

/// Format a display value with its unit.
pub fn format_value(param: GateParam, value: f32) -> String {
    match param.descriptor().unit {
        ParamUnit::Toggle => if value >= 0.5 { "on" } else { "off" }.to_string(),
        ParamUnit::Ratio => format!("{value:.2}:1"),
        unit => format!("{value:.2}{}", unit.suffix()),
    }
}
