//! Small modules: noise, note frequency, key filter and products.

use super::Module;
use crate::info::Info;
use crate::param::Slot;
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;

/// Uniform white noise in `[-1, 1)`.
///
/// Deterministic: every new generator starts from the same seed, and a copy
/// continues the sequence of its original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Noise {
    state: u32,
}

impl Default for Noise {
    fn default() -> Self {
        Self::new()
    }
}

impl Noise {
    /// Creates a generator with seed 1.
    pub fn new() -> Self {
        Self { state: 1 }
    }

    /// Numerical Recipes LCG, upper 16 bits, in `[0, 1)`.
    #[inline]
    fn next_random(&mut self) -> f32 {
        self.state = self
            .state
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        let upper = (self.state >> 16) as u16;
        f32::from(upper) / 65_536.0
    }

    /// Ignores pulses.
    pub fn info(&mut self, _info: &mut Info<'_>) {}

    /// Fills `buf` with noise. Never asks to continue.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], _queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        for x in buf.iter_mut() {
            *x = 2.0 * self.next_random() - 1.0;
        }
        false
    }
}

/// Outputs the frequency of the most recent note times a multiplier.
///
/// Silent (0 Hz) until the first note.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Trig {
    mul: f32,
    freq: f32,
}

impl Trig {
    /// Creates a note-frequency source.
    pub fn new(mul: f32) -> Self {
        Self { mul, freq: 0.0 }
    }

    /// Current output frequency.
    pub fn freq(&self) -> f32 {
        self.freq
    }

    /// Latches the frequency of each note.
    pub fn info(&mut self, info: &mut Info<'_>) {
        if let Info::Note(note) = info {
            self.freq = note.freq * self.mul;
        }
    }

    /// Fills `buf` with the latched frequency.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], _queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        buf.fill(self.freq);
        false
    }
}

/// Passes through only the notes of one key.
///
/// Notes for other keys are dropped before reaching the child; every other
/// pulse is forwarded unchanged.
#[derive(Debug, Clone)]
pub struct Shot {
    dev: u16,
    key: u16,
    module: Box<Module>,
}

impl Shot {
    /// Wraps `module` so it hears only `key`.
    pub fn new(dev: u16, key: u16, module: Module) -> Self {
        Self {
            dev,
            key,
            module: Box::new(module),
        }
    }

    /// Device the shot was built for.
    pub fn dev(&self) -> u16 {
        self.dev
    }

    /// Key the shot listens to.
    pub fn key(&self) -> u16 {
        self.key
    }

    /// Forwards pulses, filtering notes by key.
    pub fn info(&mut self, info: &mut Info<'_>) {
        if matches!(info, Info::Note(note) if note.key != self.key) {
            return;
        }
        self.module.info(info);
    }

    /// Runs the child.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        self.module.process(buf, time, queue)
    }
}

/// Product of two parameters.
#[derive(Debug, Clone)]
pub struct Mul {
    left: Slot,
    right: Slot,
}

impl Mul {
    /// Creates `left * right`.
    pub fn new(left: Slot, right: Slot) -> Self {
        Self { left, right }
    }

    /// Forwards pulses to both operands.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.left.info(info);
        self.right.info(info);
    }

    /// `buf[i] = left[i] * right[i]`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let (left, lc) = self.left.eval(time, queue);
        for (i, x) in buf.iter_mut().enumerate() {
            *x = left.at(i);
        }
        let (right, rc) = self.right.eval(time, queue);
        for (i, x) in buf.iter_mut().enumerate() {
            *x *= right.at(i);
        }
        lc | rc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::Note;
    use crate::module::Ramp;

    fn times(len: usize) -> Vec<Time> {
        vec![Time::default(); len + 1]
    }

    fn note(key: u16, freq: f32) -> Note {
        Note {
            init: true,
            delay: 0,
            key,
            freq,
            vel: 1.0,
        }
    }

    #[test]
    fn noise_is_bounded_and_repeatable() {
        let mut a = Noise::new();
        let mut b = Noise::new();
        let mut x = [0.0; 512];
        let mut y = [0.0; 512];
        assert!(!a.process(&mut x, &times(512), &mut Queue::new()));
        b.process(&mut y, &times(512), &mut Queue::new());
        assert_eq!(x, y);
        assert!(x.iter().all(|v| (-1.0..1.0).contains(v)));
        assert!(x.iter().any(|v| *v < -0.5) && x.iter().any(|v| *v > 0.5));
    }

    #[test]
    fn trig_latches_note_frequency() {
        let mut t = Trig::new(2.0);
        let mut buf = [1.0; 3];
        t.process(&mut buf, &times(3), &mut Queue::new());
        assert_eq!(buf, [0.0; 3]);
        t.info(&mut Info::Note(&note(69, 440.0)));
        t.process(&mut buf, &times(3), &mut Queue::new());
        assert_eq!(buf, [880.0; 3]);
    }

    #[test]
    fn shot_drops_other_keys() {
        let mut shot = Shot::new(0, 60, Module::from(Trig::new(1.0)));
        shot.info(&mut Info::Note(&note(61, 100.0)));
        let mut buf = [0.0; 2];
        shot.process(&mut buf, &times(2), &mut Queue::new());
        assert_eq!(buf, [0.0; 2]);
        shot.info(&mut Info::Note(&note(60, 200.0)));
        shot.process(&mut buf, &times(2), &mut Queue::new());
        assert_eq!(buf, [200.0; 2]);
    }

    #[test]
    fn mul_combines_constant_and_module() {
        let ramp = Module::from(Ramp::new(12000.0.into(), 48000.0));
        let mut m = Mul::new(4.0.into(), ramp.into());
        let mut buf = [0.0; 4];
        m.process(&mut buf, &times(4), &mut Queue::new());
        assert_eq!(buf, [1.0, 2.0, 3.0, 0.0]);
    }
}
