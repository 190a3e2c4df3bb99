//! Configuration and preset management for the invader noise gate.
//!
//! # Features
//!
//! - **Settings**: [`GateSettings`] holds the eight controls in engineering units
//! - **Presets**: Load and save named settings as TOML
//! - **Validation**: Parameter names, value parsing and range checks
//! - **Factory Presets**: Built-in starting points
//! - **Paths**: Platform-specific user preset directory
//!
//! # Example
//!
//! ```rust,no_run
//! use invader_config::{Preset, GateSettings, user_presets_dir};
//!
//! let mut settings = GateSettings::default();
//! settings.set_by_name("threshold_db", "-50").unwrap();
//!
//! let preset = Preset::new("Booth")
//!     .with_description("Vocal booth with a noisy fan")
//!     .with_settings(settings);
//!
//! preset.save(user_presets_dir().join("booth.toml")).unwrap();
//!
//! let gate = Preset::load(user_presets_dir().join("booth.toml"))
//!     .unwrap()
//!     .build_gate(48000.0);
//! ```

mod error;
mod preset;
mod settings;

/// Platform-specific paths for presets.
pub mod paths;

/// Parameter and preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{FACTORY_PRESET_NAMES, factory_presets, get_factory_preset, is_factory_preset};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_user_presets, preset_name_from_path, resolve_preset,
    user_config_dir, user_presets_dir,
};
pub use preset::Preset;
pub use settings::GateSettings;
pub use validation::{
    ValidationError, ValidationResult, lookup_param, parse_param_value, validate_param,
    validate_param_value, validate_preset, validate_settings,
};

/// Re-export of the gate types presets configure.
pub use invader_core::{GateParam, NoiseGate};
