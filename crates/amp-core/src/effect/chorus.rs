//! Modulated delay line with two feedback paths.

use amp_dsp::Ring;

use crate::info::Info;
use crate::param::Slot;
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;

/// Chorus built on a fractional read from a ring.
///
/// The delayed tap is read with linear interpolation
/// ([`Ring::get_interp`]), not the all-pass reader.
///
/// Per sample, with `d = clamp(delay, 0, 1)` as a fraction of the ring:
///
/// ```text
/// v   = ring[d * (len - 1)]
/// x   = in + fb1 * v
/// put   x + fb0 * v
/// out = x + depth * v
/// ```
#[derive(Debug, Clone)]
pub struct Chorus {
    ring: Ring,
    delay: Slot,
    depth: Slot,
    fb0: Slot,
    fb1: Slot,
}

impl Chorus {
    /// Creates a chorus with a `len`-second ring at `rate`.
    pub fn new(len: f64, rate: f32, delay: Slot, depth: Slot, fb0: Slot, fb1: Slot) -> Self {
        Self {
            ring: Ring::from_time(len, f64::from(rate)),
            delay,
            depth,
            fb0,
            fb1,
        }
    }

    /// Ring length in samples.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Forwards a pulse to every parameter.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.delay.info(info);
        self.depth.info(info);
        self.fb0.info(info);
        self.fb1.info(info);
    }

    /// Runs the chorus over `buf`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let (delay, c0) = self.delay.eval(time, queue);
        let (depth, c1) = self.depth.eval(time, queue);
        let (fb0, c2) = self.fb0.eval(time, queue);
        let (fb1, c3) = self.fb1.eval(time, queue);
        let span = (self.ring.len() - 1) as f32;

        for (i, s) in buf.iter_mut().enumerate() {
            let v = self.ring.get_interp(delay.at(i).clamp(0.0, 1.0) * span);
            let x = *s + fb1.at(i) * v;
            self.ring.put(x + fb0.at(i) * v);
            *s = x + depth.at(i) * v;
        }
        c0 | c1 | c2 | c3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(len: usize) -> Vec<Time> {
        vec![Time::default(); len + 1]
    }

    #[test]
    fn zero_depth_and_feedback_is_dry() {
        let mut c = Chorus::new(0.01, 1000.0, 0.5.into(), 0.0.into(), 0.0.into(), 0.0.into());
        let mut buf = [1.0, -0.5, 0.25, 0.0];
        c.process(&mut buf, &times(4), &mut Queue::new());
        assert_eq!(buf, [1.0, -0.5, 0.25, 0.0]);
    }

    #[test]
    fn full_delay_echoes_after_ring_length() {
        // Ten-sample ring read at its far end: the echo lands ten samples on.
        let mut c = Chorus::new(0.01, 1000.0, 1.0.into(), 1.0.into(), 0.0.into(), 0.0.into());
        assert_eq!(c.len(), 10);
        let mut buf = vec![0.0; 12];
        buf[0] = 1.0;
        c.process(&mut buf, &times(12), &mut Queue::new());
        assert_eq!(buf[0], 1.0);
        assert_eq!(buf[10], 1.0);
        assert!(buf[1..10].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn fractional_delay_splits_echo_linearly() {
        // Halfway along a ten-sample ring is 4.5 samples back.
        let mut c = Chorus::new(0.01, 1000.0, 0.5.into(), 1.0.into(), 0.0.into(), 0.0.into());
        let mut buf = vec![0.0; 8];
        buf[0] = 1.0;
        c.process(&mut buf, &times(8), &mut Queue::new());
        assert_eq!(buf, [1.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn delay_is_clamped() {
        let mut a = Chorus::new(0.01, 1000.0, 3.0.into(), 1.0.into(), 0.0.into(), 0.0.into());
        let mut b = Chorus::new(0.01, 1000.0, 1.0.into(), 1.0.into(), 0.0.into(), 0.0.into());
        let mut x = vec![0.0; 16];
        x[0] = 1.0;
        let mut y = x.clone();
        a.process(&mut x, &times(16), &mut Queue::new());
        b.process(&mut y, &times(16), &mut Queue::new());
        assert_eq!(x, y);
    }
}
