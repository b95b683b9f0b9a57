//! A tagged union over every node kind.
//!
//! [`Boxed`] is how nodes cross a boundary that does not know their kind in
//! advance, such as a configuration loader handing back "some node". Inside
//! the graph nodes are always held by their concrete kind.

use crate::clock::Clock;
use crate::effect::Effect;
use crate::handler::Handler;
use crate::info::Info;
use crate::instr::Instr;
use crate::module::Module;
use crate::param::Param;
use crate::seq::Seq;

/// The kind of a [`Boxed`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxKind {
    /// A clock.
    Clock,
    /// An event handler.
    Handler,
    /// An effect.
    Effect,
    /// An instrument.
    Instr,
    /// A module.
    Module,
    /// A sequencer.
    Seq,
}

impl BoxKind {
    /// Lowercase name, for messages.
    pub fn name(self) -> &'static str {
        match self {
            BoxKind::Clock => "clock",
            BoxKind::Handler => "handler",
            BoxKind::Effect => "effect",
            BoxKind::Instr => "instr",
            BoxKind::Module => "module",
            BoxKind::Seq => "seq",
        }
    }
}

impl core::fmt::Display for BoxKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of any kind.
///
/// ```rust
/// use amp_core::{BoxKind, Boxed, Gain};
///
/// let boxed = Boxed::from(Gain::new(0.5.into()));
/// assert_eq!(boxed.kind(), BoxKind::Effect);
/// assert!(boxed.clone().into_effect().is_ok());
/// assert_eq!(boxed.into_module().unwrap_err().kind(), BoxKind::Effect);
/// ```
#[derive(Debug, Clone)]
pub enum Boxed {
    /// A clock.
    Clock(Clock),
    /// An event handler.
    Handler(Handler),
    /// An effect.
    Effect(Effect),
    /// An instrument.
    Instr(Instr),
    /// A module.
    Module(Module),
    /// A sequencer.
    Seq(Seq),
}

impl Boxed {
    /// The kind of the held node.
    pub fn kind(&self) -> BoxKind {
        match self {
            Boxed::Clock(_) => BoxKind::Clock,
            Boxed::Handler(_) => BoxKind::Handler,
            Boxed::Effect(_) => BoxKind::Effect,
            Boxed::Instr(_) => BoxKind::Instr,
            Boxed::Module(_) => BoxKind::Module,
            Boxed::Seq(_) => BoxKind::Seq,
        }
    }

    /// Delivers a pulse to the held node.
    pub fn info(&mut self, info: &mut Info<'_>) {
        match self {
            Boxed::Clock(n) => n.info(info),
            Boxed::Handler(n) => n.info(info),
            Boxed::Effect(n) => n.info(info),
            Boxed::Instr(n) => n.info(info),
            Boxed::Module(n) => n.info(info),
            Boxed::Seq(n) => n.info(info),
        }
    }

    /// The clock, or the box back if it holds something else.
    pub fn into_clock(self) -> Result<Clock, Boxed> {
        match self {
            Boxed::Clock(n) => Ok(n),
            other => Err(other),
        }
    }

    /// The handler, or the box back if it holds something else.
    pub fn into_handler(self) -> Result<Handler, Boxed> {
        match self {
            Boxed::Handler(n) => Ok(n),
            other => Err(other),
        }
    }

    /// The effect, or the box back if it holds something else.
    pub fn into_effect(self) -> Result<Effect, Boxed> {
        match self {
            Boxed::Effect(n) => Ok(n),
            other => Err(other),
        }
    }

    /// The instrument, or the box back if it holds something else.
    pub fn into_instr(self) -> Result<Instr, Boxed> {
        match self {
            Boxed::Instr(n) => Ok(n),
            other => Err(other),
        }
    }

    /// The module, or the box back if it holds something else.
    pub fn into_module(self) -> Result<Module, Boxed> {
        match self {
            Boxed::Module(n) => Ok(n),
            other => Err(other),
        }
    }

    /// The sequencer, or the box back if it holds something else.
    pub fn into_seq(self) -> Result<Seq, Boxed> {
        match self {
            Boxed::Seq(n) => Ok(n),
            other => Err(other),
        }
    }

    /// A parameter from a module or handler, or the box back.
    pub fn into_param(self) -> Result<Param, Boxed> {
        match self {
            Boxed::Module(m) => Ok(Param::module(m)),
            Boxed::Handler(h) => Ok(Param::ctrl(h)),
            other => Err(other),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Boxed {
            fn from(n: $ty) -> Self {
                Boxed::$variant(n.into())
            }
        })*
    };
}

impl_from!(
    Clock => Clock,
    crate::clock::Basic => Clock,
    Handler => Handler,
    crate::handler::Ctrl => Handler,
    Effect => Effect,
    crate::effect::Gain => Effect,
    crate::effect::Chain => Effect,
    Instr => Instr,
    Module => Module,
    Seq => Seq,
);
