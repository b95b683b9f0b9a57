//! Information pulses broadcast down the graph.
//!
//! [`Info`] is how the driver talks to nodes outside of block processing:
//! lifecycle notifications, actions that have come due, note starts for voice
//! modules and clock transport requests. Containers forward every pulse to
//! all of their children in order; leaves react to the variants they care
//! about and ignore the rest.
//!
//! Variants that carry `&mut` data are queries: whichever node can answer
//! (normally the clock) writes into the referenced value.

use crate::queue::Action;
use crate::time::{Loc, Time};

/// A note start or release delivered to a voice module.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Note {
    /// True when the voice was idle before this note.
    pub init: bool,
    /// Sample offset of the note inside the block.
    pub delay: usize,
    /// Key number.
    pub key: u16,
    /// Frequency in Hz.
    pub freq: f32,
    /// Velocity in `[0, 1]`; zero is a release.
    pub vel: f32,
}

/// Transport position written back by clocks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Seek {
    /// Sample index.
    pub idx: i64,
    /// Musical position of `idx`.
    pub time: Time,
}

impl Seek {
    /// A request to move to `bar` (fractional bars allowed through `beat`).
    pub fn to(bar: i32, beat: f64) -> Self {
        Self {
            idx: 0,
            time: Time::new(bar, beat),
        }
    }
}

/// A pulse delivered through `info`.
#[derive(Debug)]
pub enum Info<'a> {
    /// The graph was built and is about to run.
    Init,
    /// A batch of configuration changes was applied.
    Commit,
    /// An action came due.
    Action(&'a Action),
    /// A note for a voice module.
    Note(&'a Note),
    /// Query the current position in bars.
    Tell(&'a mut f64),
    /// Query the current location.
    Loc(&'a mut Loc),
    /// Move the transport to the position in the seek record.
    Seek(&'a mut Seek),
    /// Start the transport.
    Start(&'a mut Seek),
    /// Stop the transport.
    Stop(&'a mut Seek),
}
