//! Response curves for warping linear control positions.
//!
//! A host knob moves linearly through [0, 1], but times, ratios and
//! thresholds are perceived logarithmically. The curves here bend the
//! control position so that a linear sweep covers a multi-decade or
//! multi-octave range evenly:
//!
//! | Curve | Formula | Midpoint `f(0.5)` |
//! |-------|---------|-------------------|
//! | [`ResponseCurve::Decade`] | `(10^(2x) - 1) / 99` | ≈ 0.0909 |
//! | [`ResponseCurve::Octave`] | `(4^x - 1) / 3` | ≈ 0.3333 |
//!
//! Both are monotonic increasing with `f(0) = 0` and `f(1) = 1`. The exact
//! shape is a tuning choice; nothing downstream depends on more than those
//! three properties.
//!
//! With the `std` feature each curve is sampled once into a
//! [`TABLE_SIZE`]-entry table (built on first use, or eagerly through
//! [`init_tables`]) and read back with linear interpolation. Without `std`
//! the closed form is evaluated directly.

use libm::{log10f, logf, powf};

/// Number of entries in each lookup table.
pub const TABLE_SIZE: usize = 4001;

/// Named response curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCurve {
    /// Two-decade exponential warp, for ranges spanning factors of ~100.
    Decade,
    /// Two-octave exponential warp, for gentler ranges.
    Octave,
}

impl ResponseCurve {
    /// Map a control position in [0, 1] through the curve.
    ///
    /// Out-of-range input is clamped; NaN maps to `0.0`.
    ///
    /// # Example
    /// ```rust
    /// use invader_core::ResponseCurve;
    ///
    /// assert_eq!(ResponseCurve::Decade.get(0.0), 0.0);
    /// assert_eq!(ResponseCurve::Decade.get(1.0), 1.0);
    /// assert!(ResponseCurve::Decade.get(0.5) < 0.5);
    /// ```
    #[inline]
    pub fn get(self, x: f32) -> f32 {
        let x = clamp_unit(x);

        #[cfg(feature = "std")]
        {
            lookup(self.table(), x)
        }

        #[cfg(not(feature = "std"))]
        {
            self.eval(x)
        }
    }

    /// Evaluate the closed form of the curve (no table).
    pub fn eval(self, x: f32) -> f32 {
        let x = clamp_unit(x);
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Decade => (powf(10.0, 2.0 * x) - 1.0) / 99.0,
            Self::Octave => (powf(4.0, x) - 1.0) / 3.0,
        }
    }

    /// Closed-form inverse: the control position that produces `y`.
    ///
    /// `curve.get(curve.inverse(y)) ≈ y` for `y` in [0, 1].
    pub fn inverse(self, y: f32) -> f32 {
        let y = clamp_unit(y);
        if y <= 0.0 {
            return 0.0;
        }
        if y >= 1.0 {
            return 1.0;
        }
        let x = match self {
            Self::Decade => log10f(99.0 * y + 1.0) / 2.0,
            Self::Octave => logf(3.0 * y + 1.0) / logf(4.0),
        };
        x.clamp(0.0, 1.0)
    }

    #[cfg(feature = "std")]
    fn table(self) -> &'static [f32; TABLE_SIZE] {
        use std::sync::OnceLock;

        static DECADE: OnceLock<[f32; TABLE_SIZE]> = OnceLock::new();
        static OCTAVE: OnceLock<[f32; TABLE_SIZE]> = OnceLock::new();

        let cell = match self {
            Self::Decade => &DECADE,
            Self::Octave => &OCTAVE,
        };
        cell.get_or_init(|| build_table(self))
    }
}

/// Build both lookup tables now instead of on first use.
///
/// Call from the control thread at startup so the first parameter change
/// never pays for table construction. A no-op without `std`.
pub fn init_tables() {
    #[cfg(feature = "std")]
    {
        let _ = ResponseCurve::Decade.table();
        let _ = ResponseCurve::Octave.table();

        #[cfg(feature = "tracing")]
        tracing::debug!("response tables ready: {TABLE_SIZE} entries per curve");
    }
}

#[cfg(feature = "std")]
fn build_table(curve: ResponseCurve) -> [f32; TABLE_SIZE] {
    let last = (TABLE_SIZE - 1) as f32;
    let mut table: [f32; TABLE_SIZE] = core::array::from_fn(|i| curve.eval(i as f32 / last));
    table[0] = 0.0;
    table[TABLE_SIZE - 1] = 1.0;
    table
}

#[cfg(feature = "std")]
#[inline]
fn lookup(table: &[f32; TABLE_SIZE], x: f32) -> f32 {
    let pos = x * (TABLE_SIZE - 1) as f32;
    let index = pos as usize;
    if index >= TABLE_SIZE - 1 {
        return table[TABLE_SIZE - 1];
    }
    let frac = pos - index as f32;
    let a = table[index];
    let b = table[index + 1];
    a + (b - a) * frac
}

#[inline]
fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [ResponseCurve; 2] = [ResponseCurve::Decade, ResponseCurve::Octave];

    #[test]
    fn endpoints_are_exact() {
        for curve in CURVES {
            assert_eq!(curve.get(0.0), 0.0, "{curve:?} f(0)");
            assert_eq!(curve.get(1.0), 1.0, "{curve:?} f(1)");
            assert_eq!(curve.eval(0.0), 0.0);
            assert_eq!(curve.eval(1.0), 1.0);
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for curve in CURVES {
            let mut prev = curve.get(0.0);
            for i in 1..=2000 {
                let y = curve.get(i as f32 / 2000.0);
                assert!(y >= prev, "{curve:?} decreased at step {i}: {prev} -> {y}");
                prev = y;
            }
        }
    }

    #[test]
    fn table_matches_closed_form() {
        for curve in CURVES {
            for i in 0..=997 {
                let x = i as f32 / 997.0;
                let diff = (curve.get(x) - curve.eval(x)).abs();
                assert!(diff < 1e-4, "{curve:?} at {x}: table vs closed form differ by {diff}");
            }
        }
    }

    #[test]
    fn known_midpoints() {
        assert!((ResponseCurve::Decade.eval(0.5) - 9.0 / 99.0).abs() < 1e-5);
        assert!((ResponseCurve::Octave.eval(0.5) - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        for curve in CURVES {
            assert_eq!(curve.get(-3.0), 0.0);
            assert_eq!(curve.get(7.0), 1.0);
            assert_eq!(curve.get(f32::NAN), 0.0);
        }
    }

    #[test]
    fn inverse_undoes_curve() {
        for curve in CURVES {
            for i in 0..=100 {
                let x = i as f32 / 100.0;
                let back = curve.inverse(curve.eval(x));
                assert!((back - x).abs() < 1e-3, "{curve:?}: {x} -> {back}");
            }
        }
    }

    #[test]
    fn deterministic_lookup() {
        init_tables();
        for curve in CURVES {
            assert_eq!(curve.get(0.123_456), curve.get(0.123_456));
        }
    }
}
