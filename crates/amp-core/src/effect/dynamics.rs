//! Level followers: the volume tracker and the compressor.

use amp_dsp::{Compressor, VolumeTracker};

use crate::info::Info;
use crate::param::{Slot, Values};
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;

/// Replaces the signal with its smoothed volume.
///
/// The output is the lowpass of `|x * π/2|` with the cutoff taken from the
/// `freq` parameter, so a full-scale sine reads close to 1.
#[derive(Debug, Clone)]
pub struct Vol {
    tracker: VolumeTracker,
    freq: Slot,
    rate: f32,
}

impl Vol {
    /// Creates a follower smoothing at `freq` Hz.
    pub fn new(freq: Slot, rate: f32) -> Self {
        Self {
            tracker: VolumeTracker::default(),
            freq,
            rate,
        }
    }

    /// The most recent output.
    pub fn value(&self) -> f32 {
        self.tracker.value()
    }

    /// Forwards a pulse to the cutoff.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.freq.info(info);
    }

    /// Writes the tracked volume over `buf`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let (freq, cont) = self.freq.eval(time, queue);
        match freq {
            Values::Scalar(f) => {
                self.tracker.set_frequency(f, self.rate);
                for x in buf.iter_mut() {
                    *x = self.tracker.process(*x);
                }
            }
            Values::Buffer(f) => {
                for (x, &f) in buf.iter_mut().zip(f) {
                    self.tracker.set_frequency(f, self.rate);
                    *x = self.tracker.process(*x);
                }
            }
        }
        cont
    }
}

/// Threshold/ratio compressor with attack and release times in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comp {
    comp: Compressor,
}

impl Comp {
    /// Creates a compressor.
    ///
    /// `atk` and `rel` are the follower half-times in seconds; `thresh` is a
    /// linear amplitude and `ratio` is clamped to at least 1.
    pub fn new(atk: f32, rel: f32, thresh: f32, ratio: f32, rate: f32) -> Self {
        Self {
            comp: Compressor::new(atk * rate, rel * rate, thresh, ratio),
        }
    }

    /// Current follower level.
    pub fn level(&self) -> f32 {
        self.comp.level()
    }

    /// Ignores pulses.
    pub fn info(&mut self, _info: &mut Info<'_>) {}

    /// Compresses `buf` in place. Never asks to continue.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], _queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        for x in buf.iter_mut() {
            *x = self.comp.process(*x);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(len: usize) -> Vec<Time> {
        vec![Time::default(); len + 1]
    }

    #[test]
    fn vol_tracks_constant_level() {
        let mut v = Vol::new(10.0.into(), 48000.0);
        let mut buf = vec![-0.5; 48000];
        v.process(&mut buf, &times(48000), &mut Queue::new());
        let want = 0.5 * core::f32::consts::FRAC_PI_2;
        assert!((buf[47999] - want).abs() < 1e-3);
        assert_eq!(v.value(), buf[47999]);
    }

    #[test]
    fn vol_of_silence_is_zero() {
        let mut v = Vol::new(10.0.into(), 48000.0);
        let mut buf = vec![0.0; 256];
        assert!(!v.process(&mut buf, &times(256), &mut Queue::new()));
        assert_eq!(buf, vec![0.0; 256]);
    }

    #[test]
    fn comp_leaves_quiet_signal_alone() {
        let mut c = Comp::new(0.001, 0.1, 0.5, 4.0, 48000.0);
        let mut buf = vec![0.25; 4800];
        c.process(&mut buf, &times(4800), &mut Queue::new());
        assert!(buf.iter().all(|&x| (x - 0.25).abs() < 1e-6));
    }

    #[test]
    fn comp_reduces_loud_signal() {
        let mut c = Comp::new(0.0002, 0.1, 0.25, 4.0, 48000.0);
        let mut buf = vec![1.0; 48000];
        c.process(&mut buf, &times(48000), &mut Queue::new());
        assert!((buf[47999] - 0.4375).abs() < 1e-3);
    }
}
