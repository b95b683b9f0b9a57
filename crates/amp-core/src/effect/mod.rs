//! Effects: nodes that transform a mono buffer in place.
//!
//! Every effect has the same two entry points:
//!
//! - `info(&mut self, &mut Info)` receives pulses; containers forward them to
//!   every child, leaves forward them to their parameters.
//! - `process(&mut self, buf, time, queue) -> bool` transforms `buf` (length
//!   `len`) given the block's `len + 1` sample boundaries in `time`, and
//!   returns whether the effect may still produce output in later blocks.
//!
//! Copying an effect is `Clone` (always a deep copy: rings, filter state,
//! recorded tracks and children are duplicated) and deleting one is `Drop`.
//!
//! # Containers
//!
//! | Effect | Behavior |
//! |--------|----------|
//! | [`Chain`] | children in order, in place |
//! | [`Section`] | children in parallel on copies of the input, weighted and summed |
//! | [`Gate`] | two branches on copies of the input, multiplied |
//! | [`Mix`] | wet/dry blend around one child |
//! | [`Gen`] | adds a module's output |
//!
//! # Leaves
//!
//! Gain, bias, range scaling, math, clipping, crushing, folding, volume
//! tracking, compression, reverberator taps, chorus, filters, a silence
//! detector, a track store and a looper.

mod basic;
mod chorus;
mod container;
mod dynamics;
mod filt;
mod looper;
mod reverb;

pub use basic::{Bias, Clip, Crush, Expcrush, Gain, Math, MathOp, Scale, Wrap};
pub use chorus::Chorus;
pub use container::{Chain, Cont, Gate, Gen, Mix, Section};
pub use dynamics::{Comp, Vol};
pub use filt::{Filt, FiltKind};
pub use looper::{LOOPER_HEADS, Looper};
pub use reverb::{Reverb, ReverbKind};

use crate::info::Info;
use crate::queue::Queue;
use crate::time::Time;
use crate::track::Track;

/// The effect node kinds.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Sequential container.
    Chain(Chain),
    /// Weighted parallel container.
    Section(Section),
    /// Product of two branches.
    Gate(Gate),
    /// Wet/dry blend around a child.
    Mix(Mix),
    /// Adds a module's output.
    Gen(Gen),
    /// Silence detector.
    Cont(Cont),
    /// Multiplies by a parameter.
    Gain(Gain),
    /// Adds a parameter.
    Bias(Bias),
    /// Linear range mapping.
    Scale(Box<Scale>),
    /// Per-sample math.
    Math(Math),
    /// Volume follower.
    Vol(Vol),
    /// Saturation.
    Clip(Clip),
    /// Bit crusher.
    Crush(Crush),
    /// Logarithmic crusher.
    Expcrush(Expcrush),
    /// Triangle fold.
    Wrap(Wrap),
    /// Compressor.
    Comp(Comp),
    /// Reverberator tap.
    Reverb(Box<Reverb>),
    /// Modulated delay.
    Chorus(Box<Chorus>),
    /// Filter.
    Filt(Box<Filt>),
    /// Recorder with overdubbed playback heads.
    Looper(Box<Looper>),
    /// Sample store; passes audio through untouched.
    Track(Track),
}

macro_rules! dispatch {
    ($self:ident, $e:ident => $body:expr) => {
        match $self {
            Effect::Chain($e) => $body,
            Effect::Section($e) => $body,
            Effect::Gate($e) => $body,
            Effect::Mix($e) => $body,
            Effect::Gen($e) => $body,
            Effect::Cont($e) => $body,
            Effect::Gain($e) => $body,
            Effect::Bias($e) => $body,
            Effect::Scale($e) => $body,
            Effect::Math($e) => $body,
            Effect::Vol($e) => $body,
            Effect::Clip($e) => $body,
            Effect::Crush($e) => $body,
            Effect::Expcrush($e) => $body,
            Effect::Wrap($e) => $body,
            Effect::Comp($e) => $body,
            Effect::Reverb($e) => $body,
            Effect::Chorus($e) => $body,
            Effect::Filt($e) => $body,
            Effect::Looper($e) => $body,
            Effect::Track(_) => Default::default(),
        }
    };
}

impl Effect {
    /// Delivers a pulse.
    pub fn info(&mut self, info: &mut Info<'_>) {
        dispatch!(self, e => e.info(info))
    }

    /// Transforms `buf` for one block.
    ///
    /// # Panics
    ///
    /// Panics unless `time.len() == buf.len() + 1`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        dispatch!(self, e => e.process(buf, time, queue))
    }

    /// Short kind name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::Chain(_) => "chain",
            Effect::Section(_) => "section",
            Effect::Gate(_) => "gate",
            Effect::Mix(_) => "mix",
            Effect::Gen(_) => "gen",
            Effect::Cont(_) => "cont",
            Effect::Gain(_) => "gain",
            Effect::Bias(_) => "bias",
            Effect::Scale(_) => "scale",
            Effect::Math(_) => "math",
            Effect::Vol(_) => "vol",
            Effect::Clip(_) => "clip",
            Effect::Crush(_) => "crush",
            Effect::Expcrush(_) => "expcrush",
            Effect::Wrap(_) => "wrap",
            Effect::Comp(_) => "comp",
            Effect::Reverb(_) => "reverb",
            Effect::Chorus(_) => "chorus",
            Effect::Filt(_) => "filt",
            Effect::Looper(_) => "looper",
            Effect::Track(_) => "track",
        }
    }
}

macro_rules! impl_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Effect {
            fn from(e: $ty) -> Self {
                Effect::$variant(e)
            }
        })*
    };
}

macro_rules! impl_from_boxed {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Effect {
            fn from(e: $ty) -> Self {
                Effect::$variant(Box::new(e))
            }
        })*
    };
}

impl_from!(
    Chain => Chain,
    Section => Section,
    Gate => Gate,
    Mix => Mix,
    Gen => Gen,
    Cont => Cont,
    Gain => Gain,
    Bias => Bias,
    Math => Math,
    Vol => Vol,
    Clip => Clip,
    Crush => Crush,
    Expcrush => Expcrush,
    Wrap => Wrap,
    Comp => Comp,
    Track => Track,
);

impl_from_boxed!(
    Scale => Scale,
    Reverb => Reverb,
    Chorus => Chorus,
    Filt => Filt,
    Looper => Looper,
);
