//! Instruments: nodes that render a stereo pair.
//!
//! An instrument processes `left` and `right` buffers of the same length in
//! place. Effects and modules reach the stereo world through [`Single`]
//! (one channel) and [`Splice`] (mono sum fed back to both channels);
//! [`Mixer`] and [`Series`] compose instruments, [`Inject`] runs a sequencer
//! into a private copy of the queue, and [`Pan`] places a signal between the
//! channels.

mod inject;
mod mixer;
mod pan;
mod single;

pub use inject::Inject;
pub use mixer::{Mixer, Series};
pub use pan::Pan;
pub use single::{Single, Splice};

use crate::info::Info;
use crate::queue::Queue;
use crate::time::Time;

/// The instrument node kinds.
#[derive(Debug, Clone)]
pub enum Instr {
    /// Parallel sum of instruments.
    Mixer(Mixer),
    /// Instruments in place, in order.
    Series(Series),
    /// An effect on one channel.
    Single(Box<Single>),
    /// An effect on the weighted mono sum.
    Splice(Box<Splice>),
    /// A sequencer wired into an instrument.
    Inject(Box<Inject>),
    /// Per-channel volume and delay.
    Pan(Box<Pan>),
}

macro_rules! dispatch {
    ($self:ident, $i:ident => $body:expr) => {
        match $self {
            Instr::Mixer($i) => $body,
            Instr::Series($i) => $body,
            Instr::Single($i) => $body,
            Instr::Splice($i) => $body,
            Instr::Inject($i) => $body,
            Instr::Pan($i) => $body,
        }
    };
}

impl Instr {
    /// Delivers a pulse.
    pub fn info(&mut self, info: &mut Info<'_>) {
        dispatch!(self, i => i.info(info))
    }

    /// Renders one block into `left` and `right`.
    ///
    /// # Panics
    ///
    /// Panics unless both channels have the same length and
    /// `time.len() == left.len() + 1`.
    pub fn process(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        time: &[Time],
        queue: &mut Queue,
    ) -> bool {
        dispatch!(self, i => i.process(left, right, time, queue))
    }

    /// Short kind name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Instr::Mixer(_) => "mixer",
            Instr::Series(_) => "series",
            Instr::Single(_) => "single",
            Instr::Splice(_) => "splice",
            Instr::Inject(_) => "inject",
            Instr::Pan(_) => "pan",
        }
    }
}

impl From<Mixer> for Instr {
    fn from(i: Mixer) -> Self {
        Instr::Mixer(i)
    }
}

impl From<Series> for Instr {
    fn from(i: Series) -> Self {
        Instr::Series(i)
    }
}

impl From<Single> for Instr {
    fn from(i: Single) -> Self {
        Instr::Single(Box::new(i))
    }
}

impl From<Splice> for Instr {
    fn from(i: Splice) -> Self {
        Instr::Splice(Box::new(i))
    }
}

impl From<Inject> for Instr {
    fn from(i: Inject) -> Self {
        Instr::Inject(Box::new(i))
    }
}

impl From<Pan> for Instr {
    fn from(i: Pan) -> Self {
        Instr::Pan(Box::new(i))
    }
}

/// Checks the stereo block shape.
#[inline]
pub(crate) fn check_stereo(left: usize, right: usize, time: usize) {
    assert!(
        left == right,
        "channel lengths differ (left {left}, right {right})"
    );
    crate::scratch::check_block(left, time);
}
