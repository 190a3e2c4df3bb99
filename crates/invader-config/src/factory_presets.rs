//! Factory presets bundled with the library.
//!
//! Built-in starting points that are always available without external
//! files. Each is stored as the same TOML a user preset would contain.

use crate::Preset;

/// Internal identifiers of the factory presets.
pub static FACTORY_PRESET_NAMES: &[&str] = &["default", "vocal", "drums", "guitar", "gentle"];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("vocal", VOCAL_PRESET),
    ("drums", DRUMS_PRESET),
    ("guitar", GUITAR_PRESET),
    ("gentle", GENTLE_PRESET),
];

/// Every control at its default position.
const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "Every control at its default position"
sample_rate = 48000
"#;

const VOCAL_PRESET: &str = r#"
name = "Vocal"
description = "Removes room tone and headphone bleed between phrases"
sample_rate = 48000

[params]
threshold_db = -48.0
ratio = 4.0
knee_db = 6.0
attack_ms = 3.0
release_ms = 180.0
"#;

const DRUMS_PRESET: &str = r#"
name = "Drums"
description = "Tight close-mic gating that keeps spill out of the toms"
sample_rate = 48000

[params]
threshold_db = -30.0
ratio = 20.0
knee_db = 1.0
attack_ms = 1.0
release_ms = 60.0
"#;

const GUITAR_PRESET: &str = r#"
name = "Guitar"
description = "Silences amp hiss and hum when the strings are muted"
sample_rate = 48000

[params]
threshold_db = -55.0
ratio = 12.0
knee_db = 3.0
attack_ms = 2.0
release_ms = 120.0
"#;

const GENTLE_PRESET: &str = r#"
name = "Gentle"
description = "Light downward expansion that lowers the noise floor without chopping tails"
sample_rate = 48000

[params]
threshold_db = -60.0
ratio = 2.0
knee_db = 12.0
attack_ms = 10.0
release_ms = 500.0
"#;

/// Load all factory presets.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use invader_config::get_factory_preset;
///
/// let preset = get_factory_preset("Drums").unwrap();
/// assert_eq!(preset.params.ratio, 20.0);
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    for (preset_name, toml) in FACTORY_PRESETS_TOML {
        if preset_name.to_lowercase() == name_lower {
            return Preset::from_toml(toml).ok();
        }
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Check if a name refers to a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
