//! Node parameters.
//!
//! A [`Param`] is where a node gets a tunable value from:
//!
//! | Variant | Source | Evaluated |
//! |---------|--------|-----------|
//! | [`Param::Flt`] | constant | never changes |
//! | [`Param::Ctrl`] | [`Handler`] fed by `Info::Action` | once per block |
//! | [`Param::Module`] | sub-module | per sample |
//!
//! Constants and handlers are "fast": they yield one scalar per block.
//! Modules are "slow" and fill a buffer. Nodes never branch on the variant
//! themselves; they hold a [`Slot`] and read the result through [`Values`],
//! which hides whether a scalar or a buffer came back.

use crate::event::Event;
use crate::handler::Handler;
use crate::info::Info;
use crate::module::Module;
use crate::queue::Queue;
use crate::scratch::scratch;
use crate::time::Time;

/// A value source for a node.
#[derive(Debug, Clone)]
pub enum Param {
    /// A constant.
    Flt(f32),
    /// A handler and its last value.
    Ctrl {
        /// Last value produced by the handler.
        value: f32,
        /// The handler.
        handler: Handler,
    },
    /// A module rendered per sample.
    Module(Box<Module>),
}

impl From<f32> for Param {
    fn from(v: f32) -> Self {
        Param::Flt(v)
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Flt(v as f32)
    }
}

impl From<Module> for Param {
    fn from(m: Module) -> Self {
        Param::module(m)
    }
}

impl From<Handler> for Param {
    fn from(h: Handler) -> Self {
        Param::ctrl(h)
    }
}

impl Param {
    /// A constant parameter.
    pub fn flt(v: f32) -> Self {
        Param::Flt(v)
    }

    /// A handler parameter, seeded by querying the handler's current value.
    pub fn ctrl(mut handler: Handler) -> Self {
        let value = handler.process(&Event::QUERY);
        Param::Ctrl { value, handler }
    }

    /// A module parameter.
    pub fn module(module: Module) -> Self {
        Param::Module(Box::new(module))
    }

    /// True for parameters that produce one value per block.
    #[inline]
    pub fn is_fast(&self) -> bool {
        matches!(self, Param::Flt(_) | Param::Ctrl { .. })
    }

    /// The block value of a fast parameter.
    #[inline]
    pub fn scalar(&self) -> Option<f32> {
        match self {
            Param::Flt(v) | Param::Ctrl { value: v, .. } => Some(*v),
            Param::Module(_) => None,
        }
    }

    /// Delivers a pulse. Handlers pick up actions; modules get everything.
    pub fn info(&mut self, info: &mut Info<'_>) {
        match self {
            Param::Flt(_) => {}
            Param::Ctrl { value, handler } => {
                if let Info::Action(action) = info {
                    *value = handler.process(&action.event);
                }
            }
            Param::Module(module) => module.info(info),
        }
    }

    /// Fills `buf` with the parameter's values for this block.
    ///
    /// Always correct regardless of variant; fast parameters just repeat
    /// their scalar and return `false`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        match self {
            Param::Flt(v) | Param::Ctrl { value: v, .. } => {
                buf.fill(*v);
                false
            }
            Param::Module(module) => module.process(buf, time, queue),
        }
    }
}

/// Per-block values of a parameter.
#[derive(Debug, Clone, Copy)]
pub enum Values<'a> {
    /// The same value for every sample.
    Scalar(f32),
    /// One value per sample.
    Buffer(&'a [f32]),
}

impl Values<'_> {
    /// Value at sample `i`.
    #[inline]
    pub fn at(&self, i: usize) -> f32 {
        match self {
            Values::Scalar(v) => *v,
            Values::Buffer(b) => b[i],
        }
    }
}

/// A parameter with its own scratch buffer.
///
/// The buffer only grows; it is sized lazily to the largest block seen.
#[derive(Debug, Clone)]
pub struct Slot {
    param: Param,
    buf: Vec<f32>,
}

impl From<Param> for Slot {
    fn from(param: Param) -> Self {
        Slot::new(param)
    }
}

impl From<f32> for Slot {
    fn from(v: f32) -> Self {
        Slot::new(Param::Flt(v))
    }
}

impl From<f64> for Slot {
    fn from(v: f64) -> Self {
        Slot::new(Param::from(v))
    }
}

impl From<Module> for Slot {
    fn from(m: Module) -> Self {
        Slot::new(Param::module(m))
    }
}

impl Slot {
    /// Wraps a parameter.
    pub fn new(param: Param) -> Self {
        Self {
            param,
            buf: Vec::new(),
        }
    }

    /// The wrapped parameter.
    pub fn param(&self) -> &Param {
        &self.param
    }

    /// Replaces the wrapped parameter.
    pub fn set(&mut self, param: Param) {
        self.param = param;
    }

    /// Forwards a pulse to the parameter.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.param.info(info);
    }

    /// Evaluates the parameter for a block of `time.len() - 1` samples.
    ///
    /// Returns the values and the parameter's continuation flag.
    pub fn eval(&mut self, time: &[Time], queue: &mut Queue) -> (Values<'_>, bool) {
        let len = time.len().saturating_sub(1);
        match &mut self.param {
            Param::Flt(v) | Param::Ctrl { value: v, .. } => (Values::Scalar(*v), false),
            Param::Module(module) => {
                let cont = module.process(scratch(&mut self.buf, len), time, queue);
                (Values::Buffer(&self.buf[..len]), cont)
            }
        }
    }
}
