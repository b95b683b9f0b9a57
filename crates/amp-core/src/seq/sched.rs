//! Timeline schedules.

use super::{Seq, block_len};
use crate::event::Event;
use crate::info::Info;
use crate::queue::Queue;
use crate::time::Time;

/// A sorted, looping list of events at musical times.
///
/// A cursor walks the list as the timeline advances. Each sample, every
/// entry from the cursor onward whose time lies in `[time[i], time[i + 1])`
/// is queued at sample `i`; the cursor wraps to the front after the last
/// entry, so a timeline that wraps (see [`Repeat`]) replays the list.
/// Nothing is emitted while the timeline is stopped. When a block does not
/// start where the previous one ended (a seek, or a gated child resuming)
/// the cursor first jumps to the first entry at or after the new position.
///
/// Entries at the same time keep the order they were added in.
///
/// ```rust
/// use amp_core::{Event, Queue, Sched, Time};
///
/// let mut sched = Sched::new();
/// sched.add(Time::new(0, 1.0), Event::new(0, 60, 65535));
///
/// let time: Vec<Time> = (0..=4).map(|i| Time::new(0, f64::from(i) * 0.5)).collect();
/// let mut queue = Queue::new();
/// sched.process(&time, &mut queue);
/// assert_eq!(queue.actions()[0].delay, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sched {
    entries: Vec<(Time, Event)>,
    cur: usize,
    last: Option<Time>,
}

impl Sched {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `event` at `time`, after any entry at the same time.
    pub fn add(&mut self, time: Time, event: Event) {
        let at = self.entries.partition_point(|(t, _)| t.cmp_loc(&time) <= 0);
        if at < self.cur {
            self.cur += 1;
        }
        self.entries.insert(at, (time, event));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in time order.
    pub fn entries(&self) -> &[(Time, Event)] {
        &self.entries
    }

    /// A seek makes the next block resynchronize the cursor.
    pub fn info(&mut self, info: &mut Info<'_>) {
        if matches!(info, Info::Seek(_)) {
            self.last = None;
        }
    }

    fn resync(&mut self, now: &Time) {
        self.cur = self
            .entries
            .iter()
            .position(|(t, _)| t.cmp_loc(now) >= 0)
            .unwrap_or(0);
    }

    /// Queues the entries that fall inside the block.
    ///
    /// Continues while anything is scheduled.
    pub fn process(&mut self, time: &[Time], queue: &mut Queue) -> bool {
        let len = block_len(time);
        let n = self.entries.len();
        if n == 0 || time[0].is_equal(&time[len]) {
            return n > 0;
        }
        if !matches!(&self.last, Some(last) if last.is_equal(&time[0])) {
            self.resync(&time[0]);
        }
        self.last = Some(time[len]);
        for i in 0..len {
            let start = self.cur;
            let mut cur = start;
            loop {
                let (t, event) = &self.entries[cur];
                if !t.between(&time[i], &time[i + 1]) {
                    break;
                }
                queue.add(i, *event);
                cur = (cur + 1) % n;
                if cur == start {
                    break;
                }
            }
            self.cur = cur;
        }
        true
    }
}

impl FromIterator<(Time, Event)> for Sched {
    fn from_iter<I: IntoIterator<Item = (Time, Event)>>(iter: I) -> Self {
        let mut sched = Sched::new();
        for (time, event) in iter {
            sched.add(time, event);
        }
        sched
    }
}

/// Runs a child on a timeline whose bar wraps into `[0, len)`.
///
/// The bar is offset by `off` before wrapping, so `off` shifts where in the
/// pattern playback starts.
#[derive(Debug, Clone)]
pub struct Repeat {
    off: i32,
    len: i32,
    seq: Seq,
    tmp: Vec<Time>,
}

impl Repeat {
    /// Wraps `seq` every `len` bars.
    ///
    /// # Panics
    ///
    /// Panics if `len` is not positive.
    pub fn new(off: i32, len: i32, seq: Seq) -> Self {
        assert!(len > 0, "repeat length must be positive");
        Self {
            off,
            len,
            seq,
            tmp: Vec::new(),
        }
    }

    /// Forwards a pulse to the child.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.seq.info(info);
    }

    /// Runs the child on the wrapped timeline.
    pub fn process(&mut self, time: &[Time], queue: &mut Queue) -> bool {
        block_len(time);
        self.tmp.clear();
        self.tmp
            .extend(time.iter().map(|t| t.repeat(self.off, self.len)));
        self.seq.process(&self.tmp, queue)
    }
}
