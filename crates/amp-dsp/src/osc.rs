//! Phase-driven oscillator shapes.
//!
//! Oscillators here are stateless functions of a phase `t` in `[0, 1)`.
//! The caller owns the phase and advances it with [`inc`] by [`step`] each
//! sample, which keeps phase continuous when the frequency changes.
//!
//! | Shape | Value at phase `t` |
//! |-------|--------------------|
//! | `sine` | `sin(2πt)` |
//! | `square` | `1` for `t < 0.5`, else `-1` |
//! | `saw` | rises from -1 to 1 over the cycle, starting at 0 |
//! | `rsaw` | falls from 1 to -1 over the cycle, starting at 0 |
//! | `tri` | `4(t + |t - 0.75| - |t - 0.25|) - 2`, starting at 0 |
//!
//! [`warp`] and [`unwarp`] bend the phase so the first half-cycle takes a
//! fraction `mid = (1 - v) / 2` of the period.

use core::f32::consts::PI;

use libm::{fabsf, floorf, fmodf, sinf};

/// Phase increment per sample for `freq` Hz at `rate`.
#[inline]
pub fn step(freq: f32, rate: f32) -> f32 {
    freq / rate
}

/// Advances a phase by `step`, wrapping into `[0, 1)`.
#[inline]
pub fn inc(t: f32, step: f32) -> f32 {
    let t = t + step;
    t - floorf(t)
}

/// Sine shape.
#[inline]
pub fn sine(t: f32) -> f32 {
    sinf(2.0 * PI * t)
}

/// Square shape.
#[inline]
pub fn square(t: f32) -> f32 {
    if t < 0.5 { 1.0 } else { -1.0 }
}

/// Rising saw shape.
#[inline]
pub fn saw(t: f32) -> f32 {
    fmodf(1.0 + 2.0 * t, 2.0) - 1.0
}

/// Falling saw shape.
#[inline]
pub fn rsaw(t: f32) -> f32 {
    fmodf(3.0 - 2.0 * t, 2.0) - 1.0
}

/// Triangle shape.
#[inline]
pub fn tri(t: f32) -> f32 {
    4.0 * (t + fabsf(t - 0.75) - fabsf(t - 0.25)) - 2.0
}

/// Bends phase `t` so the first half-cycle ends at `mid = (1 - v) / 2`.
///
/// `v = 0` is the identity. Inverse of [`unwarp`].
#[inline]
pub fn warp(t: f32, v: f32) -> f32 {
    let mid = 0.5 * (1.0 - v);
    if t < mid {
        t / (2.0 * mid)
    } else {
        (t - mid) / (1.0 - mid) / 2.0 + 0.5
    }
}

/// Inverse of [`warp`].
#[inline]
pub fn unwarp(t: f32, v: f32) -> f32 {
    let mid = 0.5 * (1.0 - v);
    if t < 0.5 {
        2.0 * mid * t
    } else {
        2.0 * (t - 0.5) * (1.0 - mid) + mid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inc_wraps_into_unit_interval() {
        assert!((inc(0.9, 0.2) - 0.1).abs() < 1e-6);
        assert!((inc(0.1, -0.2) - 0.9).abs() < 1e-6);
        assert_eq!(inc(0.0, 1.0), 0.0);
    }

    #[test]
    fn shapes_start_where_expected() {
        assert!(sine(0.0).abs() < 1e-6);
        assert_eq!(square(0.0), 1.0);
        assert_eq!(square(0.5), -1.0);
        assert!(saw(0.0).abs() < 1e-6);
        assert!(rsaw(0.0).abs() < 1e-6);
        assert!(tri(0.0).abs() < 1e-6);
    }

    #[test]
    fn shape_extremes() {
        assert!((sine(0.25) - 1.0).abs() < 1e-6);
        assert!((tri(0.25) - 1.0).abs() < 1e-6);
        assert!((tri(0.75) + 1.0).abs() < 1e-6);
        assert!((saw(0.4999) - 1.0).abs() < 1e-3);
        assert!((saw(0.5001) + 1.0).abs() < 1e-3);
        assert!((rsaw(0.25) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn shapes_are_bounded() {
        for i in 0..1000 {
            let t = i as f32 / 1000.0;
            for v in [sine(t), square(t), saw(t), rsaw(t), tri(t)] {
                assert!(v.abs() <= 1.0 + 1e-6, "t={t} v={v}");
            }
        }
    }

    #[test]
    fn warp_zero_is_identity() {
        for i in 0..10 {
            let t = i as f32 / 10.0;
            assert!((warp(t, 0.0) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn unwarp_inverts_warp() {
        for v in [-0.6, 0.0, 0.3, 0.8] {
            for i in 0..20 {
                let t = i as f32 / 20.0;
                let back = unwarp(warp(t, v), v);
                assert!((back - t).abs() < 1e-5, "v={v} t={t} back={back}");
            }
        }
    }

    #[test]
    fn warp_moves_midpoint() {
        let v = 0.5;
        let mid = 0.5 * (1.0 - v);
        assert!((warp(mid, v) - 0.5).abs() < 1e-6);
    }
}
