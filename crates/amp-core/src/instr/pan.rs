//! Stereo placement by level and delay.

use amp_dsp::Ring;

use super::check_stereo;
use crate::info::Info;
use crate::param::Slot;
use crate::queue::Queue;
use crate::time::Time;

#[derive(Debug, Clone)]
struct Side {
    vol: Slot,
    delay: Option<Ring>,
}

impl Side {
    fn new(vol: Slot, delay: f64, rate: f64) -> Self {
        let len = (delay * rate) as usize;
        Self {
            vol,
            delay: (len > 0).then(|| Ring::new(len)),
        }
    }

    fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        let (vol, cont) = self.vol.eval(time, queue);
        match &mut self.delay {
            Some(ring) => {
                for (i, x) in buf.iter_mut().enumerate() {
                    *x = vol.at(i) * ring.proc(*x);
                }
            }
            None => {
                for (i, x) in buf.iter_mut().enumerate() {
                    *x *= vol.at(i);
                }
            }
        }
        cont
    }
}

/// Scales each channel by its own volume and optionally delays it.
///
/// Delays are in seconds; one shorter than a sample disables the delay line
/// for that channel.
///
/// ```rust
/// use amp_core::{Pan, Queue, Time};
///
/// let mut pan = Pan::new(0.25.into(), 1.0.into(), 0.0, 2.0, 1.0);
/// let (mut l, mut r) = ([1.0, 2.0, 3.0], [1.0, 2.0, 3.0]);
/// pan.process(&mut l, &mut r, &[Time::default(); 4], &mut Queue::new());
/// assert_eq!(l, [0.25, 0.5, 0.75]);
/// assert_eq!(r, [0.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Pan {
    left: Side,
    right: Side,
}

impl Pan {
    /// Creates a pan with volumes `lvol`, `rvol` and delays `ldelay`, `rdelay`.
    pub fn new(lvol: Slot, rvol: Slot, ldelay: f64, rdelay: f64, rate: f64) -> Self {
        Self {
            left: Side::new(lvol, ldelay, rate),
            right: Side::new(rvol, rdelay, rate),
        }
    }

    /// Forwards a pulse to both volumes.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.left.vol.info(info);
        self.right.vol.info(info);
    }

    /// Applies level and delay to each channel.
    pub fn process(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        time: &[Time],
        queue: &mut Queue,
    ) -> bool {
        check_stereo(left.len(), right.len(), time.len());
        let lc = self.left.process(left, time, queue);
        let rc = self.right.process(right, time, queue);
        lc | rc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(len: usize) -> Vec<Time> {
        vec![Time::default(); len + 1]
    }

    #[test]
    fn delay_carries_across_blocks() {
        let mut pan = Pan::new(1.0.into(), 1.0.into(), 3.0, 0.0, 1.0);
        let mut l = [1.0, 2.0];
        let mut r = [0.0; 2];
        pan.process(&mut l, &mut r, &times(2), &mut Queue::new());
        assert_eq!(l, [0.0, 0.0]);
        let mut l = [3.0, 4.0];
        pan.process(&mut l, &mut r, &times(2), &mut Queue::new());
        assert_eq!(l, [0.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "channel lengths differ")]
    fn mismatched_channels_panic() {
        let mut pan = Pan::new(1.0.into(), 1.0.into(), 0.0, 0.0, 1.0);
        let mut l = [0.0; 2];
        let mut r = [0.0; 3];
        pan.process(&mut l, &mut r, &times(2), &mut Queue::new());
    }
}
