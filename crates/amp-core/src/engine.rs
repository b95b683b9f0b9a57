//! Block rendering driver.
//!
//! [`Engine`] owns the top of a graph: one clock, an optional sequencer and
//! one instrument, plus the action queue they share. Each call to
//! [`process`](Engine::process) renders one stereo block:
//!
//! 1. the clock fills the block's `len + 1` sample boundaries,
//! 2. the sequencer (if any) adds the actions that fall inside the block,
//! 3. every action due inside the block is delivered as [`Info::Action`],
//! 4. the instrument renders the block,
//! 5. the delivered actions are drained and later ones move `len` earlier.
//!
//! ```rust
//! use amp_core::{Basic, Engine, Event, Gen, Instr, Module, Single, Synth, Trig};
//!
//! let voice = Module::from(Trig::new(1.0));
//! let synth = Synth::new(0, 0, 1, voice);
//! let instr = Instr::from(Single::new(0, Gen::new(synth.into()).into()));
//! let mut engine = Engine::new(Basic::new(120.0, 4.0, 48000.0).into(), instr);
//!
//! engine.push(2, Event::new(0, 69, 65535));
//! let (mut l, mut r) = ([0.0; 4], [0.0; 4]);
//! engine.process(&mut l, &mut r);
//! assert_eq!(l, [0.0, 0.0, 440.0, 440.0]);
//! ```

use crate::clock::Clock;
use crate::event::Event;
use crate::info::{Info, Seek};
use crate::instr::Instr;
use crate::queue::Queue;
use crate::seq::Seq;
use crate::time::Time;

/// Drives a clock, a sequencer and an instrument block by block.
#[derive(Debug, Clone)]
pub struct Engine {
    clock: Clock,
    seq: Option<Seq>,
    instr: Instr,
    queue: Queue,
    time: Vec<Time>,
}

impl Engine {
    /// Plays `instr` on the timeline of `clock`.
    pub fn new(clock: Clock, instr: Instr) -> Self {
        Self {
            clock,
            seq: None,
            instr,
            queue: Queue::new(),
            time: Vec::new(),
        }
    }

    /// Runs `seq` ahead of the instrument every block.
    pub fn with_seq(mut self, seq: Seq) -> Self {
        self.seq = Some(seq);
        self
    }

    /// The clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The instrument.
    pub fn instr(&self) -> &Instr {
        &self.instr
    }

    /// Mutable access to the instrument, for edits between blocks.
    pub fn instr_mut(&mut self) -> &mut Instr {
        &mut self.instr
    }

    /// Actions still pending.
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Sample boundaries of the last rendered block.
    pub fn last_time(&self) -> &[Time] {
        &self.time
    }

    /// Schedules `event` `delay` samples into the next block.
    ///
    /// Returns `false` if the queue is full and the event was dropped.
    pub fn push(&mut self, delay: usize, event: Event) -> bool {
        self.queue.add(delay, event)
    }

    /// Delivers a pulse to every node in order: clock, sequencer,
    /// instrument.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.clock.info(info);
        if let Some(seq) = &mut self.seq {
            seq.info(info);
        }
        self.instr.info(info);
    }

    /// Tells every node the graph is about to run.
    pub fn init(&mut self) {
        self.info(&mut Info::Init);
    }

    /// Moves the transport; returns the position the clock settled on.
    pub fn seek(&mut self, bar: i32, beat: f64) -> Seek {
        let mut seek = Seek::to(bar, beat);
        self.info(&mut Info::Seek(&mut seek));
        tracing::debug!(
            idx = seek.idx,
            bar = seek.time.bar,
            beat = seek.time.beat,
            "engine seek"
        );
        seek
    }

    /// Starts the transport.
    pub fn start(&mut self) -> Seek {
        let mut seek = Seek::default();
        self.info(&mut Info::Start(&mut seek));
        tracing::debug!(idx = seek.idx, "engine start");
        seek
    }

    /// Stops the transport.
    pub fn stop(&mut self) -> Seek {
        let mut seek = Seek::default();
        self.info(&mut Info::Stop(&mut seek));
        tracing::debug!(idx = seek.idx, "engine stop");
        seek
    }

    /// Renders one block into `left` and `right`, starting from silence.
    ///
    /// Returns the instrument's continuation flag.
    ///
    /// # Panics
    ///
    /// Panics if the channels differ in length.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) -> bool {
        assert_eq!(left.len(), right.len(), "channel lengths differ");
        let len = left.len();
        left.fill(0.0);
        right.fill(0.0);
        self.time.resize(len + 1, Time::default());
        self.clock.process(&mut self.time);

        let mut cont = false;
        if let Some(seq) = &mut self.seq {
            cont |= seq.process(&self.time, &mut self.queue);
        }
        for action in self.queue.actions() {
            if action.delay < len {
                self.instr.info(&mut Info::Action(action));
            }
        }
        cont |= self.instr.process(left, right, &self.time, &mut self.queue);
        tracing::trace!(
            len,
            idx = self.time[0].idx,
            actions = self.queue.len(),
            cont,
            "engine block"
        );
        self.queue.drain_block(len);
        cont
    }

    /// Renders `left` and `right` in blocks of at most `block` samples.
    ///
    /// # Panics
    ///
    /// Panics if `block` is zero or the channels differ in length.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], block: usize) -> bool {
        assert!(block > 0, "block size must be positive");
        assert_eq!(left.len(), right.len(), "channel lengths differ");
        let mut cont = false;
        for (l, r) in left.chunks_mut(block).zip(right.chunks_mut(block)) {
            cont = self.process(l, r);
        }
        cont
    }
}
