//! Adapters from mono effects to stereo instruments.

use super::check_stereo;
use crate::effect::Effect;
use crate::info::Info;
use crate::param::Slot;
use crate::queue::Queue;
use crate::scratch::scratch;
use crate::time::Time;

/// Runs an effect on one channel, leaving the other alone.
///
/// Channel 0 is left and 1 is right; any other index makes the instrument
/// a no-op.
///
/// ```rust
/// use amp_core::{Bias, Queue, Single, Time};
///
/// let mut single = Single::new(1, Bias::new(0.25.into()).into());
/// let (mut l, mut r) = ([0.0; 2], [0.0; 2]);
/// single.process(&mut l, &mut r, &[Time::default(); 3], &mut Queue::new());
/// assert_eq!((l, r), ([0.0; 2], [0.25; 2]));
/// ```
#[derive(Debug, Clone)]
pub struct Single {
    channel: usize,
    effect: Effect,
}

impl Single {
    /// Wraps `effect` to run on `channel`.
    pub fn new(channel: usize, effect: Effect) -> Self {
        Self { channel, effect }
    }

    /// The channel the effect runs on.
    pub fn channel(&self) -> usize {
        self.channel
    }

    /// Forwards a pulse to the effect.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.effect.info(info);
    }

    /// Runs the effect on the selected channel.
    pub fn process(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        time: &[Time],
        queue: &mut Queue,
    ) -> bool {
        check_stereo(left.len(), right.len(), time.len());
        match self.channel {
            0 => self.effect.process(left, time, queue),
            1 => self.effect.process(right, time, queue),
            _ => false,
        }
    }
}

/// Mixes both channels down, runs an effect and writes the result to both.
///
/// The mono input is `lvol * left + rvol * right`.
#[derive(Debug, Clone)]
pub struct Splice {
    lvol: Slot,
    rvol: Slot,
    effect: Effect,
    tmp: Vec<f32>,
}

impl Splice {
    /// Creates a splice weighting the channels by `lvol` and `rvol`.
    pub fn new(lvol: Slot, rvol: Slot, effect: Effect) -> Self {
        Self {
            lvol,
            rvol,
            effect,
            tmp: Vec::new(),
        }
    }

    /// Forwards a pulse to the weights and the effect.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.lvol.info(info);
        self.rvol.info(info);
        self.effect.info(info);
    }

    /// Renders the effect on the mono sum.
    pub fn process(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        time: &[Time],
        queue: &mut Queue,
    ) -> bool {
        check_stereo(left.len(), right.len(), time.len());
        let tmp = scratch(&mut self.tmp, left.len());
        let (lvol, c0) = self.lvol.eval(time, queue);
        let (rvol, c1) = self.rvol.eval(time, queue);
        for (i, t) in tmp.iter_mut().enumerate() {
            *t = lvol.at(i) * left[i] + rvol.at(i) * right[i];
        }
        let c2 = self.effect.process(tmp, time, queue);
        left.copy_from_slice(tmp);
        right.copy_from_slice(tmp);
        c0 | c1 | c2
    }
}
