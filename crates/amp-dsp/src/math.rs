//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_amp`] / [`amp_to_db`] - Convert between dB and linear gain
//!
//! # Envelopes
//!
//! - [`decay`] - Per-sample multiplier that reaches a target fraction after a
//!   given number of samples
//!
//! # Utilities
//!
//! - [`clamp`], [`modulo`], [`modulo_i`], [`wet_dry_mix`], [`flush_denormal`]

use libm::{expf, floor, logf, powf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use amp_dsp::db_to_amp;
///
/// assert!((db_to_amp(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_amp(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_amp(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Input is floored at `1e-10` so silence maps to -200 dB instead of -inf.
#[inline]
pub fn amp_to_db(amp: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(amp.max(1e-10)) * FACTOR
}

/// Exponential decay constant.
///
/// Returns the per-sample multiplier `m` such that `m^len == 1 - target`,
/// i.e. a value multiplied by `m` every sample loses `target` of its size
/// after `len` samples. A non-positive `len` returns 0 (instant decay).
///
/// ```rust
/// use amp_dsp::decay;
///
/// let m = decay(0.5, 100.0);
/// let mut v = 1.0f32;
/// for _ in 0..100 {
///     v *= m;
/// }
/// assert!((v - 0.5).abs() < 1e-4);
/// ```
#[inline]
pub fn decay(target: f32, len: f32) -> f32 {
    if len > 0.0 {
        powf(1.0 - target, 1.0 / len)
    } else {
        0.0
    }
}

/// Clamp a value to a range.
#[inline]
pub fn clamp(x: f32, min: f32, max: f32) -> f32 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Floored modulus for floats: the result has the sign of `m`.
#[inline]
pub fn modulo(x: f64, m: f64) -> f64 {
    x - m * floor(x / m)
}

/// Floored modulus for integers: the result is always in `[0, m)` for `m > 0`.
#[inline]
pub fn modulo_i(x: i64, m: i64) -> i64 {
    x.rem_euclid(m)
}

/// Flush denormal values to zero.
///
/// Feedback paths (comb, all-pass, one-pole state) decay into the denormal
/// range during silence, which is very slow on most CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// Equivalent to `dry * (1 - mix) + wet * mix`.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_round_trip() {
        for db in [-60.0, -12.0, 0.0, 6.0] {
            let back = amp_to_db(db_to_amp(db));
            assert!((back - db).abs() < 1e-3, "db {db} came back as {back}");
        }
    }

    #[test]
    fn amp_to_db_floors_silence() {
        assert!((amp_to_db(0.0) + 200.0).abs() < 1e-3);
    }

    #[test]
    fn decay_zero_length_is_instant() {
        assert_eq!(decay(0.5, 0.0), 0.0);
        assert_eq!(decay(0.5, -3.0), 0.0);
    }

    #[test]
    fn modulo_is_floored() {
        assert!((modulo(-0.25, 1.0) - 0.75).abs() < 1e-12);
        assert!((modulo(2.5, 2.0) - 0.5).abs() < 1e-12);
        assert_eq!(modulo_i(-1, 4), 3);
        assert_eq!(modulo_i(9, 4), 1);
    }

    #[test]
    fn flush_denormal_zeroes_tiny_values() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }

    #[test]
    fn wet_dry_mix_endpoints() {
        assert_eq!(wet_dry_mix(0.2, 0.8, 0.0), 0.2);
        assert_eq!(wet_dry_mix(0.2, 0.8, 1.0), 0.8);
        assert!((wet_dry_mix(0.0, 1.0, 0.25) - 0.25).abs() < 1e-7);
    }
}
