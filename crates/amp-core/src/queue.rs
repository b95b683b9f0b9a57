//! The per-block action queue.
//!
//! An [`Action`] is an [`Event`] due at a sample offset (`delay`) inside the
//! current block. Sequencers add actions, instruments and modules read the
//! ones due at each sample, and the driver drops what was consumed at the end
//! of the block with [`Queue::drain_block`], carrying later actions forward.
//!
//! The queue is kept sorted by delay. Actions due on the same sample stay in
//! the order they were added, so ties are resolved by insertion order.
//!
//! Capacity is fixed at [`QUEUE_CAPACITY`] so adding never allocates during
//! processing; an action added to a full queue is dropped and logged.

use crate::event::Event;

/// Maximum number of pending actions.
pub const QUEUE_CAPACITY: usize = 64;

/// An event due `delay` samples into the current block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Action {
    /// Sample offset from the start of the block.
    pub delay: usize,
    /// The event to deliver.
    pub event: Event,
}

impl Action {
    /// Creates an action.
    pub const fn new(delay: usize, event: Event) -> Self {
        Self { delay, event }
    }
}

/// Sorted, bounded list of pending actions.
#[derive(Debug, Clone)]
pub struct Queue {
    actions: Vec<Action>,
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    /// Creates an empty queue with its full capacity reserved.
    pub fn new() -> Self {
        Self {
            actions: Vec::with_capacity(QUEUE_CAPACITY),
        }
    }

    /// Schedules `event` at `delay`, after any action already due then.
    ///
    /// Returns `false` and drops the action when the queue is full.
    pub fn add(&mut self, delay: usize, event: Event) -> bool {
        if self.actions.len() >= QUEUE_CAPACITY {
            tracing::warn!(delay, ?event, "action queue full, dropping action");
            return false;
        }
        let at = self.actions.partition_point(|a| a.delay <= delay);
        self.actions.insert(at, Action::new(delay, event));
        true
    }

    /// Number of pending actions.
    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when nothing is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// All pending actions in delivery order.
    #[inline]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Actions due exactly at sample `i`, in insertion order.
    pub fn at(&self, i: usize) -> &[Action] {
        let start = self.actions.partition_point(|a| a.delay < i);
        let end = self.actions.partition_point(|a| a.delay <= i);
        &self.actions[start..end]
    }

    /// Iterator over the events due at sample `i`.
    pub fn events_at(&self, i: usize) -> impl Iterator<Item = &Event> {
        self.at(i).iter().map(|a| &a.event)
    }

    /// Mutable access to the action at `index`.
    ///
    /// Only the event may be changed; the delay is fixed once queued.
    pub fn event_mut(&mut self, index: usize) -> Option<&mut Event> {
        self.actions.get_mut(index).map(|a| &mut a.event)
    }

    /// Removes and returns the action at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Action {
        self.actions.remove(index)
    }

    /// Discards every pending action.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Replaces the contents with a copy of `other`, reusing storage.
    pub fn copy_from(&mut self, other: &Queue) {
        self.actions.clear();
        self.actions.extend_from_slice(&other.actions);
    }

    /// Replaces the contents with the actions of `other` due in
    /// `start..end`, moved `start` samples earlier.
    pub fn copy_window(&mut self, other: &Queue, start: usize, end: usize) {
        self.actions.clear();
        let from = other.actions.partition_point(|a| a.delay < start);
        let to = other.actions.partition_point(|a| a.delay < end);
        self.actions.extend(
            other.actions[from..to]
                .iter()
                .map(|a| Action::new(a.delay - start, a.event)),
        );
    }

    /// Drops actions due inside a block of `len` samples and moves the rest
    /// `len` samples earlier.
    pub fn drain_block(&mut self, len: usize) {
        self.actions.retain(|a| a.delay >= len);
        for a in &mut self.actions {
            a.delay -= len;
        }
    }

    /// Copies every action of `other` into this queue, `offset` samples
    /// later.
    ///
    /// Returns `false` if any action was dropped.
    pub fn merge_from(&mut self, other: &Queue, offset: usize) -> bool {
        let mut ok = true;
        for a in &other.actions {
            ok &= self.add(a.delay + offset, a.event);
        }
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(key: u16) -> Event {
        Event::new(0, key, 1)
    }

    #[test]
    fn keeps_actions_sorted_by_delay() {
        let mut q = Queue::new();
        q.add(10, ev(1));
        q.add(2, ev(2));
        q.add(5, ev(3));
        let delays: Vec<usize> = q.actions().iter().map(|a| a.delay).collect();
        assert_eq!(delays, [2, 5, 10]);
    }

    #[test]
    fn same_sample_ties_keep_insertion_order() {
        let mut q = Queue::new();
        q.add(3, ev(1));
        q.add(1, ev(9));
        q.add(3, ev(2));
        q.add(3, ev(3));
        let keys: Vec<u16> = q.events_at(3).map(|e| e.key).collect();
        assert_eq!(keys, [1, 2, 3]);
        assert_eq!(q.at(1).len(), 1);
        assert!(q.at(0).is_empty());
        assert!(q.at(4).is_empty());
    }

    #[test]
    fn full_queue_drops_and_reports() {
        let mut q = Queue::new();
        for i in 0..QUEUE_CAPACITY {
            assert!(q.add(i, ev(0)));
        }
        assert!(!q.add(0, ev(1)));
        assert_eq!(q.len(), QUEUE_CAPACITY);
        assert!(q.events_at(0).all(|e| e.key == 0));
    }

    #[test]
    fn drain_block_carries_later_actions() {
        let mut q = Queue::new();
        q.add(0, ev(1));
        q.add(63, ev(2));
        q.add(64, ev(3));
        q.add(100, ev(4));
        q.drain_block(64);
        let left: Vec<(usize, u16)> = q.actions().iter().map(|a| (a.delay, a.event.key)).collect();
        assert_eq!(left, [(0, 3), (36, 4)]);
    }

    #[test]
    fn remove_and_edit() {
        let mut q = Queue::new();
        q.add(1, ev(1));
        q.add(2, ev(2));
        if let Some(e) = q.event_mut(1) {
            e.val = 0;
        }
        assert_eq!(q.remove(0).event.key, 1);
        assert_eq!(q.actions()[0].event.val, 0);
        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn copy_window_shifts_to_window_start() {
        let mut q = Queue::new();
        q.add(1, ev(1));
        q.add(4, ev(2));
        q.add(4, ev(3));
        q.add(7, ev(4));
        q.add(8, ev(5));
        let mut w = Queue::new();
        w.add(0, ev(9));
        w.copy_window(&q, 4, 8);
        let left: Vec<(usize, u16)> = w.actions().iter().map(|a| (a.delay, a.event.key)).collect();
        assert_eq!(left, [(0, 2), (0, 3), (3, 4)]);
        w.copy_window(&q, 9, 12);
        assert!(w.is_empty());
    }

    #[test]
    fn merge_from_offsets_delays() {
        let mut a = Queue::new();
        a.add(4, ev(1));
        let mut b = Queue::new();
        b.add(0, ev(2));
        b.add(4, ev(3));
        assert!(a.merge_from(&b, 4));
        let keys: Vec<u16> = a.events_at(4).map(|e| e.key).collect();
        assert_eq!(keys, [1, 2]);
        assert_eq!(a.at(8)[0].event.key, 3);
    }
}
