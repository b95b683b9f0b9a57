//! Stateless per-sample effects.
//!
//! Each of these applies a pure function to every sample, parameterized by
//! one or more [`Slot`]s. The continuation flag is the OR of the parameters'
//! flags: a stateless effect has no tail of its own.

use amp_dsp::{ClipCurve, ClipShape, crush, expcrush, wrap};

use crate::info::Info;
use crate::param::Slot;
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;

/// Multiplies by a parameter.
#[derive(Debug, Clone)]
pub struct Gain {
    scale: Slot,
}

impl Gain {
    /// Creates a gain stage.
    pub fn new(scale: Slot) -> Self {
        Self { scale }
    }

    /// Forwards a pulse to the parameter.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.scale.info(info);
    }

    /// `buf[i] *= scale[i]`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let (scale, cont) = self.scale.eval(time, queue);
        for (i, x) in buf.iter_mut().enumerate() {
            *x *= scale.at(i);
        }
        cont
    }
}

/// Adds a parameter.
#[derive(Debug, Clone)]
pub struct Bias {
    value: Slot,
}

impl Bias {
    /// Creates an offset stage.
    pub fn new(value: Slot) -> Self {
        Self { value }
    }

    /// Forwards a pulse to the parameter.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.value.info(info);
    }

    /// `buf[i] += value[i]`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let (value, cont) = self.value.eval(time, queue);
        for (i, x) in buf.iter_mut().enumerate() {
            *x += value.at(i);
        }
        cont
    }
}

/// Maps `[inlo, inhi]` linearly onto `[outlo, outhi]`.
///
/// ```rust
/// use amp_core::{Queue, Scale, Time};
///
/// let mut scale = Scale::new((-1.0).into(), 1.0.into(), 0.0.into(), 10.0.into());
/// let mut buf = [-1.0, 0.0, 1.0];
/// scale.process(&mut buf, &[Time::default(); 4], &mut Queue::new());
/// assert_eq!(buf, [0.0, 5.0, 10.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Scale {
    inlo: Slot,
    inhi: Slot,
    outlo: Slot,
    outhi: Slot,
}

impl Scale {
    /// Creates a range mapping.
    pub fn new(inlo: Slot, inhi: Slot, outlo: Slot, outhi: Slot) -> Self {
        Self {
            inlo,
            inhi,
            outlo,
            outhi,
        }
    }

    /// Forwards a pulse to every parameter.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.inlo.info(info);
        self.inhi.info(info);
        self.outlo.info(info);
        self.outhi.info(info);
    }

    /// Rescales every sample.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let (inlo, c0) = self.inlo.eval(time, queue);
        let (inhi, c1) = self.inhi.eval(time, queue);
        let (outlo, c2) = self.outlo.eval(time, queue);
        let (outhi, c3) = self.outhi.eval(time, queue);
        for (i, x) in buf.iter_mut().enumerate() {
            let (il, ih, ol, oh) = (inlo.at(i), inhi.at(i), outlo.at(i), outhi.at(i));
            *x = ((oh - ol) * *x + (ol * ih - oh * il)) / (ih - il);
        }
        c0 | c1 | c2 | c3
    }
}

/// Per-sample math operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MathOp {
    /// `e^x`.
    #[default]
    Exp,
    /// Frequency to period, `1 / x`.
    Hz2Sec,
}

impl MathOp {
    /// Looks up an operation by name (`"exp"`, `"hz2sec"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "exp" => Some(MathOp::Exp),
            "hz2sec" => Some(MathOp::Hz2Sec),
            _ => None,
        }
    }
}

/// Applies a [`MathOp`] to every sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Math {
    op: MathOp,
}

impl Math {
    /// Creates a math stage.
    pub fn new(op: MathOp) -> Self {
        Self { op }
    }

    /// Ignores pulses.
    pub fn info(&mut self, _info: &mut Info<'_>) {}

    /// Applies the operation.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], _queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        match self.op {
            MathOp::Exp => buf.iter_mut().for_each(|x| *x = libm::expf(*x)),
            MathOp::Hz2Sec => buf.iter_mut().for_each(|x| *x = 1.0 / *x),
        }
        false
    }
}

/// Saturation through a fixed [`ClipShape`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clip {
    shape: ClipShape,
}

impl Clip {
    /// Creates a clipper from a shape.
    pub fn new(shape: ClipShape) -> Self {
        Self { shape }
    }

    /// A symmetric hard clipper at `±max`.
    pub fn hard(max: f32) -> Self {
        Self::new(ClipShape::symmetric(ClipCurve::Hard, max, max))
    }

    /// The shape in use.
    pub fn shape(&self) -> &ClipShape {
        &self.shape
    }

    /// Ignores pulses.
    pub fn info(&mut self, _info: &mut Info<'_>) {}

    /// Shapes every sample.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], _queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        for x in buf.iter_mut() {
            *x = self.shape.process(*x);
        }
        false
    }
}

/// Quantizes to `2^bits` steps per unit.
#[derive(Debug, Clone)]
pub struct Crush {
    bits: Slot,
}

impl Crush {
    /// Creates a bit crusher.
    pub fn new(bits: Slot) -> Self {
        Self { bits }
    }

    /// Forwards a pulse to the parameter.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.bits.info(info);
    }

    /// Quantizes every sample.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let (bits, cont) = self.bits.eval(time, queue);
        for (i, x) in buf.iter_mut().enumerate() {
            *x = crush(*x, bits.at(i).max(1e-10));
        }
        cont
    }
}

/// Quantizes the logarithm of the magnitude.
#[derive(Debug, Clone)]
pub struct Expcrush {
    bits: Slot,
}

impl Expcrush {
    /// Creates a logarithmic crusher.
    pub fn new(bits: Slot) -> Self {
        Self { bits }
    }

    /// Forwards a pulse to the parameter.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.bits.info(info);
    }

    /// Quantizes every sample.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let (bits, cont) = self.bits.eval(time, queue);
        for (i, x) in buf.iter_mut().enumerate() {
            *x = expcrush(*x, bits.at(i));
        }
        cont
    }
}

/// Folds the signal back into `±limit`.
#[derive(Debug, Clone)]
pub struct Wrap {
    limit: Slot,
}

impl Wrap {
    /// Creates a folder.
    pub fn new(limit: Slot) -> Self {
        Self { limit }
    }

    /// Forwards a pulse to the parameter.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.limit.info(info);
    }

    /// Folds every sample.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let (limit, cont) = self.limit.eval(time, queue);
        for (i, x) in buf.iter_mut().enumerate() {
            *x = wrap(*x, limit.at(i));
        }
        cont
    }
}
