//! Modules: nodes that generate a mono buffer.
//!
//! A module overwrites `buf` with `len` fresh samples on every call to
//! `process`. Modules are used three ways: as signal sources inside an
//! instrument or a [`Gen`](crate::Gen) effect, as voices inside a [`Synth`],
//! and as per-sample parameters through [`Param::Module`](crate::Param).
//!
//! Voice modules react to [`Info::Note`] pulses: a note with `init` set
//! restarts them (phase reset, envelope attack) and `vel == 0` releases them.
//!
//! | Module | Output |
//! |--------|--------|
//! | [`Osc`] | a waveform of a phase module |
//! | [`Ramp`] | a phase in `[0, 1)` advancing at a frequency |
//! | [`Trig`] | the frequency of the last note, scaled |
//! | [`Warp`] | a phase bent by a distortion amount |
//! | [`Shot`] | its child, fed only one key's notes |
//! | [`Mul`] | the product of two parameters |
//! | [`Noise`] | white noise |
//! | [`Fold`] | sum or product of parameters |
//! | [`Patch`] | a module run through an effect |
//! | [`Adsr`] | an exponential envelope |
//! | [`Synth`] | a polyphonic pool of voices |
//! | [`Sample`] | velocity-layered one-shot playback |
//! | [`Piano`] | per-key velocity-layered playback |

mod adsr;
mod basic;
mod fold;
mod osc;
mod sample;
mod synth;

pub use adsr::Adsr;
pub use basic::{Mul, Noise, Shot, Trig};
pub use fold::{Fold, FoldOp, Patch};
pub use osc::{Osc, OscShape, Ramp, Warp};
pub use sample::{PIANO_KEYS, PIANO_RELEASE, PIANO_VOICES, Piano, Sample};
pub use synth::Synth;

use crate::info::Info;
use crate::queue::Queue;
use crate::time::Time;

/// The module node kinds.
#[derive(Debug, Clone)]
pub enum Module {
    /// Waveform oscillator.
    Osc(Osc),
    /// Phase ramp.
    Ramp(Ramp),
    /// Note frequency.
    Trig(Trig),
    /// Phase distortion.
    Warp(Warp),
    /// Single-key voice.
    Shot(Shot),
    /// Product of two parameters.
    Mul(Box<Mul>),
    /// White noise.
    Noise(Noise),
    /// Sum or product of parameters.
    Fold(Fold),
    /// Module through an effect.
    Patch(Patch),
    /// Envelope.
    Adsr(Adsr),
    /// Voice pool.
    Synth(Synth),
    /// Sample player.
    Sample(Sample),
    /// Per-key sample player.
    Piano(Box<Piano>),
}

macro_rules! dispatch {
    ($self:ident, $m:ident => $body:expr) => {
        match $self {
            Module::Osc($m) => $body,
            Module::Ramp($m) => $body,
            Module::Trig($m) => $body,
            Module::Warp($m) => $body,
            Module::Shot($m) => $body,
            Module::Mul($m) => $body,
            Module::Noise($m) => $body,
            Module::Fold($m) => $body,
            Module::Patch($m) => $body,
            Module::Adsr($m) => $body,
            Module::Synth($m) => $body,
            Module::Sample($m) => $body,
            Module::Piano($m) => $body,
        }
    };
}

impl Module {
    /// Delivers a pulse.
    pub fn info(&mut self, info: &mut Info<'_>) {
        dispatch!(self, m => m.info(info))
    }

    /// Fills `buf` for one block.
    ///
    /// # Panics
    ///
    /// Panics unless `time.len() == buf.len() + 1`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        dispatch!(self, m => m.process(buf, time, queue))
    }

    /// Short kind name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Module::Osc(_) => "osc",
            Module::Ramp(_) => "ramp",
            Module::Trig(_) => "trig",
            Module::Warp(_) => "warp",
            Module::Shot(_) => "shot",
            Module::Mul(_) => "mul",
            Module::Noise(_) => "noise",
            Module::Fold(_) => "fold",
            Module::Patch(_) => "patch",
            Module::Adsr(_) => "adsr",
            Module::Synth(_) => "synth",
            Module::Sample(_) => "sample",
            Module::Piano(_) => "piano",
        }
    }
}

macro_rules! impl_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Module {
            fn from(m: $ty) -> Self {
                Module::$variant(m)
            }
        })*
    };
}

impl_from!(
    Osc => Osc,
    Ramp => Ramp,
    Trig => Trig,
    Warp => Warp,
    Shot => Shot,
    Noise => Noise,
    Fold => Fold,
    Patch => Patch,
    Adsr => Adsr,
    Synth => Synth,
    Sample => Sample,
);

impl From<Mul> for Module {
    fn from(m: Mul) -> Self {
        Module::Mul(Box::new(m))
    }
}

impl From<Piano> for Module {
    fn from(m: Piano) -> Self {
        Module::Piano(Box::new(m))
    }
}
