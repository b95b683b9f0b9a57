//! Effect containers and wiring adapters.

use amp_dsp::clamp;

use super::Effect;
use crate::info::Info;
use crate::module::Module;
use crate::param::Slot;
use crate::queue::Queue;
use crate::scratch::{check_block, scratch};
use crate::time::Time;

/// Effects run one after another on the same buffer.
///
/// The chain keeps going as long as any child reports it will; finished
/// children are not removed.
///
/// ```rust
/// use amp_core::{Chain, Clip, Effect, Gain, Queue, Time};
///
/// let mut chain = Chain::new();
/// chain.append(Gain::new(0.5.into()).into());
/// chain.append(Clip::hard(0.8).into());
///
/// let mut buf = [1.0; 10];
/// let time = [Time::default(); 11];
/// chain.process(&mut buf, &time, &mut Queue::new());
/// assert_eq!(buf, [0.5; 10]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Chain {
    children: Vec<Effect>,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `effect` at the end.
    pub fn append(&mut self, effect: Effect) {
        self.children.push(effect);
    }

    /// Adds `effect` at the front.
    pub fn prepend(&mut self, effect: Effect) {
        self.children.insert(0, effect);
    }

    /// Removes and returns the child at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Effect> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the chain has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in processing order.
    pub fn children(&self) -> &[Effect] {
        &self.children
    }

    /// Forwards a pulse to every child.
    pub fn info(&mut self, info: &mut Info<'_>) {
        for child in &mut self.children {
            child.info(info);
        }
    }

    /// Runs every child on `buf` in order.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let mut cont = false;
        for child in &mut self.children {
            cont |= child.process(buf, time, queue);
        }
        cont
    }
}

impl FromIterator<Effect> for Chain {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

/// Effects run side by side.
///
/// Each child sees its own copy of the input. A child's output is blended
/// with the input by its mix ratio (`1` is fully wet) and the results of all
/// children are summed.
#[derive(Debug, Clone, Default)]
pub struct Section {
    children: Vec<(f32, Effect)>,
    input: Vec<f32>,
    output: Vec<f32>,
    tmp: Vec<f32>,
}

impl Section {
    /// Creates an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `effect` at the end with mix ratio `mix`.
    pub fn append(&mut self, mix: f32, effect: Effect) {
        self.children.push((mix, effect));
    }

    /// Adds `effect` at the front with mix ratio `mix`.
    pub fn prepend(&mut self, mix: f32, effect: Effect) {
        self.children.insert(0, (mix, effect));
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the section has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Forwards a pulse to every child.
    pub fn info(&mut self, info: &mut Info<'_>) {
        for (_, child) in &mut self.children {
            child.info(info);
        }
    }

    /// Replaces `buf` with the sum of the children's blended outputs.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let len = buf.len();
        let input = scratch(&mut self.input, len);
        input.copy_from_slice(buf);
        let output = scratch(&mut self.output, len);
        output.fill(0.0);
        let tmp = scratch(&mut self.tmp, len);

        let mut cont = false;
        for (mix, child) in &mut self.children {
            tmp.copy_from_slice(input);
            cont |= child.process(tmp, time, queue);
            if *mix == 1.0 {
                for (o, &t) in output.iter_mut().zip(tmp.iter()) {
                    *o += t;
                }
            } else {
                let m = *mix;
                for ((o, &t), &x) in output.iter_mut().zip(tmp.iter()).zip(input.iter()) {
                    *o += m * t + (1.0 - m) * x;
                }
            }
        }
        buf.copy_from_slice(output);
        cont
    }
}

/// Two branches run on copies of the input and multiplied together.
///
/// Typically one branch carries the signal and the other an envelope.
#[derive(Debug, Clone)]
pub struct Gate {
    left: Box<Effect>,
    right: Box<Effect>,
    tmp: Vec<f32>,
}

impl Gate {
    /// Creates a gate from its two branches.
    pub fn new(left: Effect, right: Effect) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
            tmp: Vec::new(),
        }
    }

    /// Forwards a pulse to both branches.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.left.info(info);
        self.right.info(info);
    }

    /// Replaces `buf` with `left(buf) * right(buf)`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let right = scratch(&mut self.tmp, buf.len());
        right.copy_from_slice(buf);
        let mut cont = self.left.process(buf, time, queue);
        cont |= self.right.process(right, time, queue);
        for (l, &r) in buf.iter_mut().zip(right.iter()) {
            *l *= r;
        }
        cont
    }
}

/// Blends a child's output with its input.
///
/// The ratio is clamped to `[0, 1]` per sample; `1` is fully wet.
#[derive(Debug, Clone)]
pub struct Mix {
    effect: Box<Effect>,
    ratio: Slot,
    tmp: Vec<f32>,
}

impl Mix {
    /// Wraps `effect` with a wet ratio.
    pub fn new(effect: Effect, ratio: Slot) -> Self {
        Self {
            effect: Box::new(effect),
            ratio,
            tmp: Vec::new(),
        }
    }

    /// Forwards a pulse to the child and the ratio.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.effect.info(info);
        self.ratio.info(info);
    }

    /// Replaces `buf` with `r * effect(buf) + (1 - r) * buf`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let wet = scratch(&mut self.tmp, buf.len());
        wet.copy_from_slice(buf);
        let mut cont = self.effect.process(wet, time, queue);
        let (ratio, rc) = self.ratio.eval(time, queue);
        cont |= rc;
        for (i, (x, &w)) in buf.iter_mut().zip(wet.iter()).enumerate() {
            let r = clamp(ratio.at(i), 0.0, 1.0);
            *x = r * w + (1.0 - r) * *x;
        }
        cont
    }
}

/// Adds a module's output to the buffer.
#[derive(Debug, Clone)]
pub struct Gen {
    module: Box<Module>,
    tmp: Vec<f32>,
}

impl Gen {
    /// Wraps a generator module.
    pub fn new(module: Module) -> Self {
        Self {
            module: Box::new(module),
            tmp: Vec::new(),
        }
    }

    /// Forwards a pulse to the module.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.module.info(info);
    }

    /// Adds the module's block to `buf`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let tmp = scratch(&mut self.tmp, buf.len());
        let cont = self.module.process(tmp, time, queue);
        for (x, &g) in buf.iter_mut().zip(tmp.iter()) {
            *x += g;
        }
        cont
    }
}

/// Reports whether the buffer holds anything above the noise floor.
///
/// Audio passes through untouched; the continuation flag is `true` when
/// any sample exceeds [`Cont::THRESHOLD`] in magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cont;

impl Cont {
    /// Magnitude treated as silence.
    pub const THRESHOLD: f32 = 1e-6;

    /// Creates a detector.
    pub fn new() -> Self {
        Self
    }

    /// Ignores pulses.
    pub fn info(&mut self, _info: &mut Info<'_>) {}

    /// Returns whether `buf` is audible.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], _queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        buf.iter().any(|x| x.abs() > Self::THRESHOLD)
    }
}
