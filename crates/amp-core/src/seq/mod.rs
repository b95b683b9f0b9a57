//! Sequencers: nodes that turn the timeline into actions.
//!
//! A sequencer reads the block's `len + 1` sample boundaries and adds the
//! actions that fall inside the block to the queue, or rewrites the actions
//! already queued. Sequencers run before the instrument they feed, either
//! at the top of the graph or wired in through an [`Inject`](crate::Inject).
//!
//! | Sequencer | Behavior |
//! |-----------|----------|
//! | [`Sched`] | looping list of `(time, event)` pairs |
//! | [`Repeat`] | wraps the bar number around a child |
//! | [`Toggle`] | turns momentary keys into latching ones |
//! | [`Enable`] | runs a child only while a key is held |
//! | [`Merge`] | runs several sequencers in order |

mod gate;
mod sched;

pub use gate::{Enable, Toggle};
pub use sched::{Repeat, Sched};

use crate::info::Info;
use crate::queue::Queue;
use crate::time::Time;

/// The sequencer node kinds.
#[derive(Debug, Clone)]
pub enum Seq {
    /// Looping schedule.
    Sched(Sched),
    /// Bar wrap around a child.
    Repeat(Box<Repeat>),
    /// Latching keys.
    Toggle(Toggle),
    /// Key-gated child.
    Enable(Box<Enable>),
    /// Several sequencers in order.
    Merge(Merge),
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $body:expr) => {
        match $self {
            Seq::Sched($s) => $body,
            Seq::Repeat($s) => $body,
            Seq::Toggle($s) => $body,
            Seq::Enable($s) => $body,
            Seq::Merge($s) => $body,
        }
    };
}

impl Seq {
    /// Delivers a pulse.
    pub fn info(&mut self, info: &mut Info<'_>) {
        dispatch!(self, s => s.info(info))
    }

    /// Sequences one block of `time.len() - 1` samples.
    ///
    /// # Panics
    ///
    /// Panics if `time` is empty.
    pub fn process(&mut self, time: &[Time], queue: &mut Queue) -> bool {
        dispatch!(self, s => s.process(time, queue))
    }

    /// Short kind name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Seq::Sched(_) => "sched",
            Seq::Repeat(_) => "repeat",
            Seq::Toggle(_) => "toggle",
            Seq::Enable(_) => "enable",
            Seq::Merge(_) => "merge",
        }
    }
}

impl From<Sched> for Seq {
    fn from(s: Sched) -> Self {
        Seq::Sched(s)
    }
}

impl From<Repeat> for Seq {
    fn from(s: Repeat) -> Self {
        Seq::Repeat(Box::new(s))
    }
}

impl From<Toggle> for Seq {
    fn from(s: Toggle) -> Self {
        Seq::Toggle(s)
    }
}

impl From<Enable> for Seq {
    fn from(s: Enable) -> Self {
        Seq::Enable(Box::new(s))
    }
}

impl From<Merge> for Seq {
    fn from(s: Merge) -> Self {
        Seq::Merge(s)
    }
}

/// Sequencers run one after another on the same queue.
///
/// Later sequencers see the actions added by earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Merge {
    children: Vec<Seq>,
}

impl Merge {
    /// Creates an empty merge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `seq` at the end.
    pub fn append(&mut self, seq: Seq) {
        self.children.push(seq);
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the merge has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Forwards a pulse to every child.
    pub fn info(&mut self, info: &mut Info<'_>) {
        for child in &mut self.children {
            child.info(info);
        }
    }

    /// Runs every child in order.
    pub fn process(&mut self, time: &[Time], queue: &mut Queue) -> bool {
        let mut cont = false;
        for child in &mut self.children {
            cont |= child.process(time, queue);
        }
        cont
    }
}

impl FromIterator<Seq> for Merge {
    fn from_iter<I: IntoIterator<Item = Seq>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

/// Block length of a sequencer call.
#[inline]
pub(crate) fn block_len(time: &[Time]) -> usize {
    assert!(!time.is_empty(), "time must hold len + 1 entries");
    time.len() - 1
}
