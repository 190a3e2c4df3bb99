//! The gate's parameter set.
//!
//! Hosts talk to the gate in normalized positions in [0, 1]. Each
//! [`GateParam`] maps its position to the engineering value the kernel
//! consumes (linear gain, milliseconds, dB, ratio) and back again:
//!
//! | Param | Unit | Mapping from position `v` |
//! |-------|------|---------------------------|
//! | Enabled | on/off | `v >= 0.5` |
//! | Input Gain | dB | `-20 + 40v` (applied as linear gain) |
//! | Output Gain | dB | `-20 + 40v` (applied as linear gain) |
//! | Attack | ms | `1 + decade(v) * 299` |
//! | Release | ms | `10 + decade(v) * 990` |
//! | Knee | dB | `0.01 + 12v²` |
//! | Ratio | n:1 | `1 + decade(v) * 19` |
//! | Threshold | dB | `-octave(1 - v) * 80` |
//!
//! The warped curves ([`ResponseCurve`]) give the knob more travel at the
//! short-time, low-ratio and near-0 dB ends, where the ear is most sensitive.
//!
//! [`GateParams`] stores the raw positions. The raw value is the source of
//! truth; engineering values are always derived from it.

use crate::math::{db_to_gain, gain_to_db};
use crate::response::ResponseCurve;
use libm::sqrtf;

/// Unit a parameter is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamUnit {
    /// Decibels
    Decibels,
    /// Milliseconds
    Milliseconds,
    /// Expansion ratio (n:1)
    Ratio,
    /// On/off switch
    Toggle,
}

impl ParamUnit {
    /// Unit suffix for display.
    ///
    /// ```rust
    /// use invader_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::Toggle.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Ratio => ":1",
            ParamUnit::Toggle => "",
        }
    }
}

/// Display metadata for one parameter.
///
/// `min`, `max` and `default` are in display units (dB for the gains).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full name, e.g. "Threshold"
    pub name: &'static str,
    /// Short name for narrow displays (max 8 characters)
    pub short_name: &'static str,
    /// Stable key used in presets and on the command line
    pub key: &'static str,
    /// Display unit
    pub unit: ParamUnit,
    /// Lowest display value
    pub min: f32,
    /// Highest display value
    pub max: f32,
    /// Display value at the default position
    pub default: f32,
}

/// One of the gate's eight controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateParam {
    /// Gate on/off; off forces the reduction to 0 dB.
    Enabled,
    /// Gain applied before detection and output.
    InputGain,
    /// Gain applied after gating.
    OutputGain,
    /// Closing time constant.
    AttackMs,
    /// Opening time constant.
    ReleaseMs,
    /// Width of the soft knee.
    KneeDb,
    /// Expansion ratio below threshold.
    Ratio,
    /// Level under which expansion begins.
    ThresholdDb,
}

impl GateParam {
    /// Number of parameters.
    pub const COUNT: usize = 8;

    /// Every parameter in index order.
    pub const ALL: [GateParam; Self::COUNT] = [
        GateParam::Enabled,
        GateParam::InputGain,
        GateParam::OutputGain,
        GateParam::AttackMs,
        GateParam::ReleaseMs,
        GateParam::KneeDb,
        GateParam::Ratio,
        GateParam::ThresholdDb,
    ];

    /// Stable zero-based index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parameter at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Look a parameter up by its preset key (e.g. `"threshold_db"`).
    ///
    /// Matching ignores ASCII case; `-` is accepted in place of `_`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|param| {
            let expected = param.key();
            key.len() == expected.len()
                && key.bytes().zip(expected.bytes()).all(|(a, b)| {
                    let a = if a == b'-' { b'_' } else { a.to_ascii_lowercase() };
                    a == b
                })
        })
    }

    /// Stable key used in presets and on the command line.
    pub const fn key(self) -> &'static str {
        match self {
            GateParam::Enabled => "enabled",
            GateParam::InputGain => "input_gain_db",
            GateParam::OutputGain => "output_gain_db",
            GateParam::AttackMs => "attack_ms",
            GateParam::ReleaseMs => "release_ms",
            GateParam::KneeDb => "knee_db",
            GateParam::Ratio => "ratio",
            GateParam::ThresholdDb => "threshold_db",
        }
    }

    /// Default normalized position.
    pub const fn default_normalized(self) -> f32 {
        match self {
            GateParam::Enabled => 1.0,
            GateParam::InputGain | GateParam::OutputGain => 0.5,
            GateParam::AttackMs => 0.1,
            GateParam::ReleaseMs => 0.4,
            GateParam::KneeDb => 0.5,
            GateParam::Ratio => 0.4,
            GateParam::ThresholdDb => 0.3,
        }
    }

    /// Display metadata.
    pub fn descriptor(self) -> ParamDescriptor {
        let (name, short_name, unit) = match self {
            GateParam::Enabled => ("Enabled", "On", ParamUnit::Toggle),
            GateParam::InputGain => ("Input Gain", "In", ParamUnit::Decibels),
            GateParam::OutputGain => ("Output Gain", "Out", ParamUnit::Decibels),
            GateParam::AttackMs => ("Attack", "Attack", ParamUnit::Milliseconds),
            GateParam::ReleaseMs => ("Release", "Release", ParamUnit::Milliseconds),
            GateParam::KneeDb => ("Knee", "Knee", ParamUnit::Decibels),
            GateParam::Ratio => ("Ratio", "Ratio", ParamUnit::Ratio),
            GateParam::ThresholdDb => ("Threshold", "Thresh", ParamUnit::Decibels),
        };
        ParamDescriptor {
            name,
            short_name,
            key: self.key(),
            unit,
            min: self.to_display(0.0).min(self.to_display(1.0)),
            max: self.to_display(0.0).max(self.to_display(1.0)),
            default: self.to_display(self.default_normalized()),
        }
    }

    /// Engineering value the kernel consumes for position `normalized`.
    ///
    /// Gains come back linear; Enabled comes back as `1.0` or `0.0`.
    pub fn to_plain(self, normalized: f32) -> f32 {
        let v = clamp_normalized(normalized);
        match self {
            GateParam::Enabled => {
                if v >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            GateParam::InputGain | GateParam::OutputGain => db_to_gain(gain_db(v)),
            GateParam::AttackMs => 1.0 + ResponseCurve::Decade.get(v) * 299.0,
            GateParam::ReleaseMs => 10.0 + ResponseCurve::Decade.get(v) * 990.0,
            GateParam::KneeDb => 0.01 + 12.0 * v * v,
            GateParam::Ratio => 1.0 + ResponseCurve::Decade.get(v) * 19.0,
            GateParam::ThresholdDb => -ResponseCurve::Octave.get(1.0 - v) * 80.0,
        }
    }

    /// Inverse of [`to_plain`](Self::to_plain), clamped to [0, 1].
    ///
    /// A non-finite `plain` maps to the default position.
    pub fn to_normalized(self, plain: f32) -> f32 {
        if plain.is_nan() {
            return self.default_normalized();
        }
        let v = match self {
            GateParam::Enabled => {
                if plain >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            GateParam::InputGain | GateParam::OutputGain => (gain_to_db(plain) + 20.0) / 40.0,
            GateParam::AttackMs => ResponseCurve::Decade.inverse((plain - 1.0) / 299.0),
            GateParam::ReleaseMs => ResponseCurve::Decade.inverse((plain - 10.0) / 990.0),
            GateParam::KneeDb => sqrtf(((plain - 0.01) / 12.0).max(0.0)),
            GateParam::Ratio => ResponseCurve::Decade.inverse((plain - 1.0) / 19.0),
            GateParam::ThresholdDb => 1.0 - ResponseCurve::Octave.inverse(-plain / 80.0),
        };
        clamp_normalized(v)
    }

    /// Value in display units (dB for the gains, otherwise the plain value).
    pub fn to_display(self, normalized: f32) -> f32 {
        match self {
            GateParam::InputGain | GateParam::OutputGain => gain_db(clamp_normalized(normalized)),
            _ => self.to_plain(normalized),
        }
    }

    /// Position for a value in display units.
    pub fn from_display(self, value: f32) -> f32 {
        match self {
            GateParam::InputGain | GateParam::OutputGain => {
                if value.is_nan() {
                    self.default_normalized()
                } else {
                    clamp_normalized((value + 20.0) / 40.0)
                }
            }
            _ => self.to_normalized(value),
        }
    }
}

impl core::fmt::Display for GateParam {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.descriptor().name)
    }
}

/// Raw normalized positions for all eight parameters.
///
/// ```rust
/// use invader_core::{GateParam, GateParams};
///
/// let mut params = GateParams::default();
/// params.set(GateParam::Ratio, 1.5);
/// assert_eq!(params.get(GateParam::Ratio), 1.0);
/// assert!(!params.set(GateParam::Ratio, f32::NAN));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateParams {
    raw: [f32; GateParam::COUNT],
}

impl GateParams {
    /// Raw position of `param`.
    pub fn get(&self, param: GateParam) -> f32 {
        self.raw[param.index()]
    }

    /// Store a raw position, clamped to [0, 1].
    ///
    /// Returns `false` (and stores nothing) for a non-finite value.
    pub fn set(&mut self, param: GateParam, normalized: f32) -> bool {
        if !normalized.is_finite() {
            return false;
        }
        self.raw[param.index()] = normalized.clamp(0.0, 1.0);
        true
    }

    /// Engineering value derived from the stored position.
    pub fn plain(&self, param: GateParam) -> f32 {
        param.to_plain(self.get(param))
    }

    /// Iterate `(param, raw position)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (GateParam, f32)> + '_ {
        GateParam::ALL.iter().map(move |&param| (param, self.get(param)))
    }
}

impl Default for GateParams {
    fn default() -> Self {
        let mut raw = [0.0; GateParam::COUNT];
        for param in GateParam::ALL {
            raw[param.index()] = param.default_normalized();
        }
        Self { raw }
    }
}

#[inline]
fn gain_db(v: f32) -> f32 {
    -20.0 + 40.0 * v
}

#[inline]
fn clamp_normalized(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for (i, param) in GateParam::ALL.iter().enumerate() {
            assert_eq!(param.index(), i);
            assert_eq!(GateParam::from_index(i), Some(*param));
        }
        assert_eq!(GateParam::from_index(GateParam::COUNT), None);
    }

    #[test]
    fn key_lookup() {
        assert_eq!(GateParam::from_key("threshold_db"), Some(GateParam::ThresholdDb));
        assert_eq!(GateParam::from_key("Attack-MS"), Some(GateParam::AttackMs));
        assert_eq!(GateParam::from_key("threshold"), None);
        for param in GateParam::ALL {
            assert_eq!(GateParam::from_key(param.key()), Some(param));
        }
    }

    #[test]
    fn range_endpoints() {
        assert_eq!(GateParam::AttackMs.to_plain(0.0), 1.0);
        assert_eq!(GateParam::AttackMs.to_plain(1.0), 300.0);
        assert_eq!(GateParam::ReleaseMs.to_plain(0.0), 10.0);
        assert_eq!(GateParam::ReleaseMs.to_plain(1.0), 1000.0);
        assert_eq!(GateParam::Ratio.to_plain(0.0), 1.0);
        assert_eq!(GateParam::Ratio.to_plain(1.0), 20.0);
        assert_eq!(GateParam::ThresholdDb.to_plain(1.0), 0.0);
        assert_eq!(GateParam::ThresholdDb.to_plain(0.0), -80.0);
        assert!((GateParam::KneeDb.to_plain(0.0) - 0.01).abs() < 1e-6);
        assert!((GateParam::KneeDb.to_plain(1.0) - 12.01).abs() < 1e-4);
        assert!((GateParam::InputGain.to_plain(0.0) - 0.1).abs() < 1e-5);
        assert!((GateParam::OutputGain.to_plain(1.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn defaults_map_to_expected_values() {
        assert_eq!(GateParam::Enabled.to_plain(1.0), 1.0);
        assert!((GateParam::InputGain.to_plain(0.5) - 1.0).abs() < 1e-6);
        assert!((GateParam::KneeDb.to_plain(0.5) - 3.01).abs() < 1e-5);

        let attack = GateParam::AttackMs.to_plain(0.1);
        assert!((attack - 2.767).abs() < 0.01, "attack {attack}");
        let release = GateParam::ReleaseMs.to_plain(0.4);
        assert!((release - 63.1).abs() < 0.1, "release {release}");
        let threshold = GateParam::ThresholdDb.to_plain(0.3);
        assert!((threshold + 43.7).abs() < 0.1, "threshold {threshold}");
    }

    #[test]
    fn enabled_switches_at_half() {
        assert_eq!(GateParam::Enabled.to_plain(0.49), 0.0);
        assert_eq!(GateParam::Enabled.to_plain(0.5), 1.0);
        assert_eq!(GateParam::Enabled.to_normalized(0.0), 0.0);
        assert_eq!(GateParam::Enabled.to_normalized(1.0), 1.0);
    }

    #[test]
    fn normalized_inverts_plain() {
        for param in GateParam::ALL.into_iter().skip(1) {
            for i in 0..=20 {
                let v = i as f32 / 20.0;
                let back = param.to_normalized(param.to_plain(v));
                assert!((back - v).abs() < 1e-3, "{param:?} at {v}: got {back}");
            }
        }
    }

    #[test]
    fn display_roundtrip_for_gains() {
        assert_eq!(GateParam::InputGain.to_display(0.75), 10.0);
        assert_eq!(GateParam::InputGain.from_display(10.0), 0.75);
        assert_eq!(GateParam::OutputGain.from_display(99.0), 1.0);
        assert_eq!(GateParam::OutputGain.from_display(f32::NAN), 0.5);
    }

    #[test]
    fn descriptor_ranges() {
        let threshold = GateParam::ThresholdDb.descriptor();
        assert_eq!(threshold.min, -80.0);
        assert_eq!(threshold.max, 0.0);
        assert_eq!(threshold.key, "threshold_db");
        assert_eq!(threshold.unit, ParamUnit::Decibels);

        let gain = GateParam::InputGain.descriptor();
        assert_eq!((gain.min, gain.max, gain.default), (-20.0, 20.0, 0.0));

        for param in GateParam::ALL {
            let d = param.descriptor();
            assert!(d.min <= d.default && d.default <= d.max, "{param:?}");
            assert!(d.short_name.len() <= 8);
        }
    }

    #[test]
    fn bank_ignores_non_finite_and_clamps() {
        let mut params = GateParams::default();
        assert_eq!(params.get(GateParam::ThresholdDb), 0.3);
        assert!(!params.set(GateParam::ThresholdDb, f32::INFINITY));
        assert_eq!(params.get(GateParam::ThresholdDb), 0.3);
        assert!(params.set(GateParam::ThresholdDb, -4.0));
        assert_eq!(params.get(GateParam::ThresholdDb), 0.0);
        assert_eq!(params.plain(GateParam::ThresholdDb), -80.0);
        assert_eq!(params.iter().count(), GateParam::COUNT);
    }

    #[test]
    fn out_of_range_positions_clamp() {
        assert_eq!(GateParam::Ratio.to_plain(7.0), 20.0);
        assert_eq!(GateParam::Ratio.to_plain(-1.0), 1.0);
        assert_eq!(GateParam::Ratio.to_plain(f32::NAN), 1.0);
    }
}
