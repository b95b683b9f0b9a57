//! Volume tracking.
//!
//! The tracker rectifies the input, scales it by `π/2` so a full-scale sine
//! settles near its peak, and smooths the result with a one-pole lowpass.

use core::f32::consts::FRAC_PI_2;

use crate::Lowpass;

/// Smoothed absolute-value follower.
///
/// # Example
///
/// ```rust
/// use amp_dsp::VolumeTracker;
///
/// let mut vol = VolumeTracker::new(10.0, 48000.0);
/// for _ in 0..48000 {
///     vol.process(0.5);
/// }
/// assert!((vol.value() - 0.5 * core::f32::consts::FRAC_PI_2).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeTracker {
    lpf: Lowpass,
    v: f32,
}

impl VolumeTracker {
    /// Creates a tracker smoothing at `freq` Hz.
    pub fn new(freq: f32, rate: f32) -> Self {
        Self {
            lpf: Lowpass::new(freq, rate),
            v: 0.0,
        }
    }

    /// Moves the smoothing cutoff without disturbing the tracked level.
    #[inline]
    pub fn set_frequency(&mut self, freq: f32, rate: f32) {
        self.lpf.set_frequency(freq, rate);
    }

    /// Feeds one sample and returns the updated volume.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        self.v = self.lpf.process((x * FRAC_PI_2).abs());
        self.v
    }

    /// The most recent volume.
    #[inline]
    pub fn value(&self) -> f32 {
        self.v
    }

    /// Zeroes the tracker.
    pub fn reset(&mut self) {
        self.lpf.reset();
        self.v = 0.0;
    }
}
