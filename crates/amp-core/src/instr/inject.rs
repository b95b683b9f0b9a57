//! Wiring a sequencer into an instrument.

use super::{Instr, check_stereo};
use crate::info::Info;
use crate::queue::Queue;
use crate::seq::Seq;
use crate::time::Time;

/// Runs a sequencer into a private copy of the queue and plays an
/// instrument from it.
///
/// The instrument sees everything already queued plus what the sequencer
/// added; the outer queue is left untouched, so injected actions stay local
/// to this branch of the graph.
///
/// ```rust
/// use amp_core::{Event, Inject, Instr, Module, Queue, Sched, Single, Gen, Synth, Time, Trig};
///
/// let sched: Sched = [(Time::new(0, 0.5), Event::new(0, 69, 65535))].into_iter().collect();
/// let voice = Module::from(Trig::new(1.0));
/// let synth = Synth::new(0, 0, 1, voice);
/// let instr = Instr::from(Single::new(0, Gen::new(synth.into()).into()));
/// let mut inject = Inject::new(sched.into(), instr);
///
/// let time: Vec<Time> = (0..=4).map(|i| Time::new(0, f64::from(i) * 0.25)).collect();
/// let (mut l, mut r) = ([0.0; 4], [0.0; 4]);
/// let mut queue = Queue::new();
/// inject.process(&mut l, &mut r, &time, &mut queue);
/// assert_eq!(l, [0.0, 0.0, 440.0, 440.0]);
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Inject {
    seq: Seq,
    instr: Instr,
    local: Queue,
}

impl Inject {
    /// Feeds `instr` from `seq`.
    pub fn new(seq: Seq, instr: Instr) -> Self {
        Self {
            seq,
            instr,
            local: Queue::new(),
        }
    }

    /// Forwards a pulse to the sequencer and the instrument.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.seq.info(info);
        self.instr.info(info);
    }

    /// Sequences into a copy of `queue`, then renders the instrument.
    pub fn process(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        time: &[Time],
        queue: &mut Queue,
    ) -> bool {
        check_stereo(left.len(), right.len(), time.len());
        self.local.copy_from(queue);
        let sc = self.seq.process(time, &mut self.local);
        let ic = self.instr.process(left, right, time, &mut self.local);
        sc | ic
    }
}
