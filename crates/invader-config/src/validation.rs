//! Parameter and preset validation.
//!
//! Settings arrive from hand-edited TOML files and `key=value` command-line
//! overrides. Everything here checks names against [`GateParam`] keys and
//! values against each parameter's display range before anything reaches a
//! gate.
//!
//! # Example
//!
//! ```rust
//! use invader_config::{GateSettings, validate_settings, ValidationError};
//!
//! let mut settings = GateSettings::default();
//! assert!(validate_settings(&settings).is_ok());
//!
//! settings.ratio = 50.0;
//! assert!(matches!(
//!     validate_settings(&settings),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use invader_core::{GateParam, ParamUnit};
use thiserror::Error;

use crate::preset::Preset;
use crate::settings::GateSettings;

/// Lowest sample rate a preset may request.
pub const MIN_SAMPLE_RATE: u32 = 8000;

/// Highest sample rate a preset may request.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown parameter name.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Resolve a parameter key, accepting the same spellings as [`GateParam::from_key`].
pub fn lookup_param(key: &str) -> ValidationResult<GateParam> {
    GateParam::from_key(key.trim()).ok_or_else(|| ValidationError::UnknownParameter(key.to_string()))
}

/// Check a display-unit value against `param`'s range.
pub fn validate_param_value(param: GateParam, value: f32) -> ValidationResult<()> {
    let descriptor = param.descriptor();
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            param: param.key().to_string(),
            reason: format!("{value} is not a finite number"),
        });
    }
    if value < descriptor.min || value > descriptor.max {
        return Err(ValidationError::OutOfRange {
            param: param.key().to_string(),
            value,
            min: descriptor.min,
            max: descriptor.max,
        });
    }
    Ok(())
}

/// Parse a textual value for `param` into display units.
///
/// Switches accept `true/false`, `on/off`, `yes/no` and `1/0`. A trailing
/// unit suffix (`dB`, `ms`, `:1`) is tolerated on numeric values.
pub fn parse_param_value(param: GateParam, text: &str) -> ValidationResult<f32> {
    let text = text.trim();
    let invalid = |reason: String| ValidationError::InvalidFormat {
        param: param.key().to_string(),
        reason,
    };

    if param.descriptor().unit == ParamUnit::Toggle {
        return match text.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(1.0),
            "false" | "off" | "no" | "0" => Ok(0.0),
            _ => Err(invalid(format!("expected on/off, got '{text}'"))),
        };
    }

    let lower = text.to_ascii_lowercase();
    let number = lower
        .strip_suffix("db")
        .or_else(|| lower.strip_suffix("ms"))
        .or_else(|| lower.strip_suffix(":1"))
        .unwrap_or(&lower)
        .trim();
    number
        .parse::<f32>()
        .map_err(|e| invalid(format!("'{text}': {e}")))
}

/// Parse and range-check a `key`/`value` pair.
pub fn validate_param(key: &str, text: &str) -> ValidationResult<(GateParam, f32)> {
    let param = lookup_param(key)?;
    let value = parse_param_value(param, text)?;
    validate_param_value(param, value)?;
    Ok((param, value))
}

/// Validate every value in `settings`.
///
/// All problems are collected; more than one is reported as
/// [`ValidationError::Multiple`].
pub fn validate_settings(settings: &GateSettings) -> ValidationResult<()> {
    let errors: Vec<ValidationError> = settings
        .iter()
        .filter_map(|(param, value)| validate_param_value(param, value).err())
        .collect();
    collect(errors)
}

/// Validate a preset's settings and sample rate.
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    let mut errors = Vec::new();
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&preset.sample_rate) {
        errors.push(ValidationError::OutOfRange {
            param: "sample_rate".to_string(),
            value: preset.sample_rate as f32,
            min: MIN_SAMPLE_RATE as f32,
            max: MAX_SAMPLE_RATE as f32,
        });
    }
    match validate_settings(&preset.params) {
        Ok(()) => {}
        Err(ValidationError::Multiple(inner)) => errors.extend(inner),
        Err(e) => errors.push(e),
    }
    collect(errors)
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
