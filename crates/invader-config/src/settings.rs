//! Gate settings in engineering units.

use invader_core::{GateParam, NoiseGate};
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationResult, validate_param};

/// The gate's eight controls in the units people type into a preset.
///
/// Gains are in dB, times in ms. Missing TOML keys fall back to the
/// parameter defaults.
///
/// ```toml
/// enabled = true
/// input_gain_db = 0.0
/// output_gain_db = 0.0
/// attack_ms = 2.0
/// release_ms = 120.0
/// knee_db = 6.0
/// ratio = 8.0
/// threshold_db = -45.0
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GateSettings {
    /// Gate on/off.
    pub enabled: bool,
    /// Input gain in dB (−20 to +20).
    pub input_gain_db: f32,
    /// Output gain in dB (−20 to +20).
    pub output_gain_db: f32,
    /// Attack time in ms (1 to 300).
    pub attack_ms: f32,
    /// Release time in ms (10 to 1000).
    pub release_ms: f32,
    /// Knee width in dB.
    pub knee_db: f32,
    /// Expansion ratio (1 to 20).
    pub ratio: f32,
    /// Threshold in dB (−80 to 0).
    pub threshold_db: f32,
}

impl Default for GateSettings {
    fn default() -> Self {
        let mut settings = Self {
            enabled: true,
            input_gain_db: 0.0,
            output_gain_db: 0.0,
            attack_ms: 0.0,
            release_ms: 0.0,
            knee_db: 0.0,
            ratio: 0.0,
            threshold_db: 0.0,
        };
        for param in GateParam::ALL {
            settings.set(param, param.descriptor().default);
        }
        settings
    }
}

impl GateSettings {
    /// Value of `param` in display units; the switch reads `1.0` or `0.0`.
    pub fn get(&self, param: GateParam) -> f32 {
        match param {
            GateParam::Enabled => {
                if self.enabled {
                    1.0
                } else {
                    0.0
                }
            }
            GateParam::InputGain => self.input_gain_db,
            GateParam::OutputGain => self.output_gain_db,
            GateParam::AttackMs => self.attack_ms,
            GateParam::ReleaseMs => self.release_ms,
            GateParam::KneeDb => self.knee_db,
            GateParam::Ratio => self.ratio,
            GateParam::ThresholdDb => self.threshold_db,
        }
    }

    /// Store a display-unit value without range checking.
    pub fn set(&mut self, param: GateParam, value: f32) {
        match param {
            GateParam::Enabled => self.enabled = value >= 0.5,
            GateParam::InputGain => self.input_gain_db = value,
            GateParam::OutputGain => self.output_gain_db = value,
            GateParam::AttackMs => self.attack_ms = value,
            GateParam::ReleaseMs => self.release_ms = value,
            GateParam::KneeDb => self.knee_db = value,
            GateParam::Ratio => self.ratio = value,
            GateParam::ThresholdDb => self.threshold_db = value,
        }
    }

    /// Parse, range-check and store a `key=value` override.
    ///
    /// ```rust
    /// use invader_config::GateSettings;
    ///
    /// let mut settings = GateSettings::default();
    /// settings.set_by_name("threshold_db", "-50").unwrap();
    /// assert_eq!(settings.threshold_db, -50.0);
    /// assert!(settings.set_by_name("threshold_db", "12").is_err());
    /// ```
    pub fn set_by_name(&mut self, key: &str, value: &str) -> ValidationResult<GateParam> {
        let (param, value) = validate_param(key, value)?;
        self.set(param, value);
        Ok(param)
    }

    /// Iterate `(param, display value)` in parameter order.
    pub fn iter(&self) -> impl Iterator<Item = (GateParam, f32)> + '_ {
        GateParam::ALL.into_iter().map(move |param| (param, self.get(param)))
    }

    /// Push every value into `gate`.
    ///
    /// Values outside a parameter's range are clamped by the gate.
    pub fn apply_to(&self, gate: &mut NoiseGate) {
        for (param, value) in self.iter() {
            gate.set_display(param, value);
        }
    }

    /// Read the current values back out of `gate`.
    pub fn from_gate(gate: &NoiseGate) -> Self {
        let mut settings = Self::default();
        for param in GateParam::ALL {
            settings.set(param, gate.display(param));
        }
        settings
    }
}
