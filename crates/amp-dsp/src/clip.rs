//! Waveshaping: asymmetric soft clipping, bit crushing and wavefolding.
//!
//! # Clip shapes
//!
//! A [`ClipShape`] is described by four breakpoints on the input axis,
//! `maxlo <= satlo <= sathi <= maxhi`. Inputs between `satlo` and `sathi`
//! pass through untouched. Above `sathi` the selected [`ClipCurve`] bends the
//! signal toward `maxhi` and never exceeds it; below `satlo` the mirrored
//! curve bends toward `maxlo`.
//!
//! | Curve | Above `sat` (with `d = max - sat`, `u = (x - sat) / d`) |
//! |-------|------|
//! | `Hard` | `min(x, max)` |
//! | `Line` | `sat + (x - sat) / 2`, capped at `max` |
//! | `Poly` | parabola tangent at `sat`, flat at `max` from `2max - sat` |
//! | `Root` | `sat + d u / sqrt(1 + u²)` |
//! | `Log`  | `sat + d L / (1 + L)`, `L = ln(1 + u)` |
//!
//! Every curve is continuous at `sat` and monotonically non-decreasing.

use libm::{expf, fabsf, fmodf, logf, powf, roundf, sqrtf};

/// Saturation curve applied outside the linear region of a [`ClipShape`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClipCurve {
    /// Brick-wall limit.
    #[default]
    Hard,
    /// Half-slope segment, then a hard limit.
    Line,
    /// Quadratic knee.
    Poly,
    /// Algebraic sigmoid.
    Root,
    /// Logarithmic knee.
    Log,
}

impl ClipCurve {
    /// Parses a curve name (`hard`, `line`, `poly`, `root`, `log`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hard" => Some(Self::Hard),
            "line" => Some(Self::Line),
            "poly" => Some(Self::Poly),
            "root" => Some(Self::Root),
            "log" => Some(Self::Log),
            _ => None,
        }
    }

    /// The curve's name as accepted by [`ClipCurve::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Line => "line",
            Self::Poly => "poly",
            Self::Root => "root",
            Self::Log => "log",
        }
    }

    fn saturate(self, x: f32, sat: f32, max: f32) -> f32 {
        if x <= sat {
            return x;
        }
        let d = max - sat;
        if d <= 0.0 {
            return x.min(max);
        }
        match self {
            Self::Hard => x.min(max),
            Self::Line => (sat + (x - sat) * 0.5).min(max),
            Self::Poly => {
                let h = 2.0 * max - sat;
                if x > h {
                    max
                } else {
                    let a = 1.0 / (4.0 * (sat - max));
                    a * (x - h) * (x - h) + max
                }
            }
            Self::Root => {
                let u = (x - sat) / d;
                sat + d * u / sqrtf(1.0 + u * u)
            }
            Self::Log => {
                let l = logf(1.0 + (x - sat) / d);
                sat + d * l / (1.0 + l)
            }
        }
    }
}

/// Asymmetric clipper.
///
/// # Example
///
/// ```rust
/// use amp_dsp::{ClipCurve, ClipShape};
///
/// let clip = ClipShape::symmetric(ClipCurve::Hard, 0.8, 0.8);
/// assert_eq!(clip.process(0.5), 0.5);
/// assert_eq!(clip.process(1.0), 0.8);
/// assert_eq!(clip.process(-1.0), -0.8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipShape {
    /// Curve used on both sides.
    pub curve: ClipCurve,
    /// Lowest reachable output.
    pub maxlo: f32,
    /// Lower edge of the linear region.
    pub satlo: f32,
    /// Upper edge of the linear region.
    pub sathi: f32,
    /// Highest reachable output.
    pub maxhi: f32,
}

impl Default for ClipShape {
    fn default() -> Self {
        Self::symmetric(ClipCurve::Hard, 1.0, 1.0)
    }
}

impl ClipShape {
    /// Creates a shape from explicit breakpoints.
    pub fn new(curve: ClipCurve, maxlo: f32, satlo: f32, sathi: f32, maxhi: f32) -> Self {
        Self {
            curve,
            maxlo,
            satlo,
            sathi,
            maxhi,
        }
    }

    /// Creates a shape mirrored around zero: linear inside `±sat`, bounded by `±max`.
    pub fn symmetric(curve: ClipCurve, sat: f32, max: f32) -> Self {
        Self::new(curve, -max, -sat, sat, max)
    }

    /// Shapes one sample.
    #[inline]
    pub fn process(&self, x: f32) -> f32 {
        if x >= self.satlo {
            self.curve.saturate(x, self.sathi, self.maxhi)
        } else {
            -self.curve.saturate(-x, -self.satlo, -self.maxlo)
        }
    }
}

/// Quantizes `x` to steps of `2^-bits`.
///
/// ```rust
/// assert_eq!(amp_dsp::crush(0.3, 2.0), 0.25);
/// ```
#[inline]
pub fn crush(x: f32, bits: f32) -> f32 {
    let t = powf(2.0, bits);
    roundf(x * t) / t
}

/// Quantizes `|x|` on a logarithmic grid with `bits` steps per e-fold.
///
/// Zero maps to zero and the sign is preserved.
#[inline]
pub fn expcrush(x: f32, bits: f32) -> f32 {
    if x == 0.0 {
        return 0.0;
    }
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    sign * expf(roundf(bits * logf(fabsf(x))) / bits)
}

/// Folds `x` back into `[-limit, limit]` with a triangle transfer function.
///
/// ```rust
/// use amp_dsp::wrap;
///
/// assert!((wrap(0.5, 1.0) - 0.5).abs() < 1e-6);
/// assert!((wrap(1.5, 1.0) - 0.5).abs() < 1e-6);
/// assert!((wrap(-1.25, 1.0) + 0.75).abs() < 1e-6);
/// ```
#[inline]
pub fn wrap(x: f32, limit: f32) -> f32 {
    let period = 4.0 * limit;
    let v = x + limit;
    let mut m = fmodf(v, period);
    if m < 0.0 {
        m += period;
    }
    limit - fabsf(m - 2.0 * limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [ClipCurve; 5] = [
        ClipCurve::Hard,
        ClipCurve::Line,
        ClipCurve::Poly,
        ClipCurve::Root,
        ClipCurve::Log,
    ];

    #[test]
    fn linear_region_is_identity() {
        for curve in CURVES {
            let clip = ClipShape::new(curve, -1.0, -0.5, 0.4, 0.9);
            for x in [-0.5, -0.2, 0.0, 0.1, 0.4] {
                assert_eq!(clip.process(x), x, "{curve:?} at {x}");
            }
        }
    }

    #[test]
    fn outputs_stay_within_bounds() {
        for curve in CURVES {
            let clip = ClipShape::new(curve, -0.7, -0.3, 0.5, 0.9);
            for i in -200..=200 {
                let x = i as f32 * 0.05;
                let y = clip.process(x);
                assert!(y <= 0.9 + 1e-6 && y >= -0.7 - 1e-6, "{curve:?}({x}) = {y}");
            }
        }
    }

    #[test]
    fn curves_are_continuous_at_saturation() {
        for curve in CURVES {
            let clip = ClipShape::symmetric(curve, 0.5, 1.0);
            let below = clip.process(0.5);
            let above = clip.process(0.5 + 1e-4);
            assert!((above - below).abs() < 1e-3, "{curve:?}");
        }
    }

    #[test]
    fn poly_reaches_max_at_knee_end() {
        let clip = ClipShape::symmetric(ClipCurve::Poly, 0.5, 1.0);
        assert!((clip.process(1.5) - 1.0).abs() < 1e-6);
        assert_eq!(clip.process(3.0), 1.0);
    }

    #[test]
    fn degenerate_range_falls_back_to_hard() {
        let clip = ClipShape::symmetric(ClipCurve::Root, 0.8, 0.8);
        assert_eq!(clip.process(2.0), 0.8);
        assert_eq!(clip.process(-2.0), -0.8);
    }

    #[test]
    fn curve_names_round_trip() {
        for curve in CURVES {
            assert_eq!(ClipCurve::from_name(curve.name()), Some(curve));
        }
        assert_eq!(ClipCurve::from_name("tanh"), None);
    }

    #[test]
    fn crush_quantizes() {
        assert_eq!(crush(0.3, 1.0), 0.5);
        assert_eq!(crush(0.2, 1.0), 0.0);
        assert_eq!(crush(-0.3, 2.0), -0.25);
    }

    #[test]
    fn expcrush_preserves_sign_and_zero() {
        assert_eq!(expcrush(0.0, 4.0), 0.0);
        let a = expcrush(0.3, 4.0);
        let b = expcrush(-0.3, 4.0);
        assert_eq!(a, -b);
        assert!((a - 0.3).abs() < 0.05);
    }

    #[test]
    fn wrap_folds_periodically() {
        for x in [-0.9, -0.3, 0.0, 0.4, 0.99] {
            assert!((wrap(x, 1.0) - x).abs() < 1e-6);
            assert!((wrap(x + 4.0, 1.0) - x).abs() < 1e-5);
        }
        assert!((wrap(2.0, 1.0) - 0.0).abs() < 1e-6);
    }
}
