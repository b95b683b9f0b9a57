//! Sequencers that rewrite or gate the queue by key.

use super::{Seq, block_len};
use crate::event::Id;
use crate::info::Info;
use crate::queue::Queue;
use crate::time::Time;

/// Turns momentary keys into latching ones.
///
/// A press (`val > 0`) on a listed key flips its state: the first press
/// passes through, the second is rewritten to a release. Releases on listed
/// keys are removed. Other actions are untouched.
///
/// ```rust
/// use amp_core::{Event, Id, Queue, Time, Toggle};
///
/// let mut toggle = Toggle::new([Id::new(0, 60)]);
/// let mut queue = Queue::new();
/// queue.add(0, Event::new(0, 60, 100));
/// queue.add(1, Event::new(0, 60, 0));
/// queue.add(2, Event::new(0, 60, 100));
/// toggle.process(&[Time::default(); 4], &mut queue);
///
/// let vals: Vec<u16> = queue.actions().iter().map(|a| a.event.val).collect();
/// assert_eq!(vals, [100, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Toggle {
    keys: Vec<(Id, bool)>,
}

impl Toggle {
    /// Latches every id in `ids`, all initially off.
    pub fn new(ids: impl IntoIterator<Item = Id>) -> Self {
        Self {
            keys: ids.into_iter().map(|id| (id, false)).collect(),
        }
    }

    /// Latched state of `id`, if it is listed.
    pub fn state(&self, id: Id) -> Option<bool> {
        self.keys.iter().find(|(k, _)| *k == id).map(|&(_, on)| on)
    }

    /// Ignores pulses.
    pub fn info(&mut self, _info: &mut Info<'_>) {}

    /// Rewrites the queued actions of listed keys.
    ///
    /// Continues while any key is latched on.
    pub fn process(&mut self, time: &[Time], queue: &mut Queue) -> bool {
        block_len(time);
        let mut i = 0;
        while let Some(event) = queue.event_mut(i) {
            let Some((_, on)) = self.keys.iter_mut().find(|(id, _)| id.matches(event)) else {
                i += 1;
                continue;
            };
            if event.val > 0 {
                *on = !*on;
                if !*on {
                    event.val = 0;
                }
                i += 1;
            } else {
                queue.remove(i);
            }
        }
        self.keys.iter().any(|&(_, on)| on)
    }
}

/// Runs a child sequencer only while a key is held.
///
/// A press on the id opens the gate and a release closes it, sample
/// accurately: the child runs on the part of the block where the gate is
/// open, and its actions are shifted to land where that part starts.
#[derive(Debug, Clone)]
pub struct Enable {
    id: Id,
    on: bool,
    seq: Seq,
    tmp: Queue,
    edges: Vec<(usize, bool)>,
}

impl Enable {
    /// Gates `seq` on `id`, initially closed.
    pub fn new(id: Id, seq: Seq) -> Self {
        Self {
            id,
            on: false,
            seq,
            tmp: Queue::new(),
            edges: Vec::new(),
        }
    }

    /// True while the gate is open.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Forwards a pulse to the child.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.seq.info(info);
    }

    fn run(&mut self, time: &[Time], start: usize, end: usize, queue: &mut Queue) -> bool {
        if start >= end {
            return false;
        }
        self.tmp.clear();
        let cont = self.seq.process(&time[start..=end], &mut self.tmp);
        queue.merge_from(&self.tmp, start);
        cont
    }

    /// Runs the child over the open parts of the block.
    pub fn process(&mut self, time: &[Time], queue: &mut Queue) -> bool {
        let len = block_len(time);
        let mut cont = false;
        let mut idx = 0;
        self.edges.clear();
        for a in queue.actions() {
            if a.delay < len && self.id.matches(&a.event) {
                self.edges.push((a.delay, a.event.val > 0));
            }
        }
        for k in 0..self.edges.len() {
            let (i, on) = self.edges[k];
            if on == self.on {
                continue;
            }
            if self.on {
                cont |= self.run(time, idx, i, queue);
            }
            idx = i;
            self.on = on;
        }
        if self.on {
            cont |= self.run(time, idx, len, queue);
        }
        cont | self.on
    }
}
