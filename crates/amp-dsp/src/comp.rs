//! Feed-forward compressor.
//!
//! The detector is a peak follower with separate attack and release
//! smoothing. Above the threshold the follower level `e` is mapped to
//! `thresh + (e - thresh) / ratio` and the sample is scaled by the
//! resulting reduction:
//!
//! ```text
//! ctrl = e / (thresh + (e - thresh) * (1 / ratio))   (e > thresh)
//! ctrl = 1                                            (e <= thresh)
//! y    = x / ctrl
//! ```
//!
//! Attack and release are given in samples: the follower covers half the
//! distance to a new level in that many samples.

use crate::{decay, flush_denormal};

/// Threshold/ratio compressor.
///
/// # Example
///
/// ```rust
/// use amp_dsp::Compressor;
///
/// let mut comp = Compressor::new(10.0, 4800.0, 0.25, 4.0);
/// let mut y = 0.0;
/// for _ in 0..48000 {
///     y = comp.process(1.0);
/// }
/// // 0.25 + 0.75 / 4
/// assert!((y - 0.4375).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compressor {
    atk: f32,
    rel: f32,
    thresh: f32,
    ratio: f32,
    env: f32,
}

impl Compressor {
    /// Creates a compressor.
    ///
    /// # Arguments
    ///
    /// * `atk` - Attack half-time in samples
    /// * `rel` - Release half-time in samples
    /// * `thresh` - Threshold as linear amplitude
    /// * `ratio` - Compression ratio (>= 1)
    pub fn new(atk: f32, rel: f32, thresh: f32, ratio: f32) -> Self {
        Self {
            atk: 1.0 - decay(0.5, atk),
            rel: 1.0 - decay(0.5, rel),
            thresh,
            ratio: 1.0 / ratio.max(1.0),
            env: 0.0,
        }
    }

    /// Current follower level.
    pub fn level(&self) -> f32 {
        self.env
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let a = x.abs();
        let coeff = if a > self.env { self.atk } else { self.rel };
        self.env = flush_denormal(self.env + (a - self.env) * coeff);
        let e = self.env;
        if e <= self.thresh {
            x
        } else {
            let ctrl = e / (self.thresh + (e - self.thresh) * self.ratio);
            x / ctrl
        }
    }

    /// Zeroes the follower.
    pub fn reset(&mut self) {
        self.env = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_is_transparent() {
        let mut comp = Compressor::new(10.0, 100.0, 0.5, 4.0);
        for i in 0..1000 {
            let x = 0.3 * if i % 2 == 0 { 1.0 } else { -1.0 };
            assert_eq!(comp.process(x), x);
        }
    }

    #[test]
    fn ratio_one_is_transparent() {
        let mut comp = Compressor::new(1.0, 1.0, 0.1, 1.0);
        for _ in 0..1000 {
            let y = comp.process(0.9);
            assert!((y - 0.9).abs() < 1e-5);
        }
    }

    #[test]
    fn steady_state_follows_ratio() {
        let mut comp = Compressor::new(5.0, 500.0, 0.2, 2.0);
        let mut y = 0.0;
        for _ in 0..20000 {
            y = comp.process(0.8);
        }
        assert!((y - (0.2 + 0.6 / 2.0)).abs() < 1e-3, "got {y}");
    }

    #[test]
    fn zero_attack_tracks_instantly() {
        let mut comp = Compressor::new(0.0, 100.0, 0.5, 2.0);
        comp.process(1.0);
        assert_eq!(comp.level(), 1.0);
    }
}
