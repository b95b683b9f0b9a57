//! Event handlers.
//!
//! A [`Handler`] turns control events into a scalar. It is pulled, not
//! pushed: whoever receives an event calls [`Handler::process`] and gets the
//! handler's value back. Events not addressed to the handler leave the value
//! unchanged, so between events the last computed value is returned.

use crate::event::{Event, Id};
use crate::info::Info;

/// Event-to-value mapping nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Handler {
    /// Maps one controller onto a linear or exponential range.
    Ctrl(Ctrl),
}

impl Handler {
    /// Forwards a pulse. Handlers keep no transport state.
    pub fn info(&mut self, _info: &mut Info<'_>) {}

    /// Feeds an event and returns the handler's value.
    pub fn process(&mut self, event: &Event) -> f32 {
        match self {
            Handler::Ctrl(ctrl) => ctrl.process(event),
        }
    }
}

impl From<Ctrl> for Handler {
    fn from(ctrl: Ctrl) -> Self {
        Handler::Ctrl(ctrl)
    }
}

/// A controller mapped onto `[low, high]`.
///
/// With `exp` set the mapping is `low * (high / low)^v`, otherwise
/// `low + (high - low) * v`, where `v` is the event value scaled to `[0, 1]`.
/// Feeding [`Event::QUERY`] just reads the current value.
///
/// ```rust
/// use amp_core::{Ctrl, Event};
///
/// let mut cutoff = Ctrl::new(1000.0, 100.0, 10000.0, true, 0, 74);
/// assert_eq!(cutoff.process(&Event::QUERY), 1000.0);
/// let v = cutoff.process(&Event::new(0, 74, 65535));
/// assert!((v - 10000.0).abs() < 1e-2);
/// assert_eq!(cutoff.process(&Event::new(0, 1, 0)), v);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ctrl {
    val: f32,
    low: f32,
    high: f32,
    exp: bool,
    id: Id,
}

impl Ctrl {
    /// Creates a controller on device `dev`, key `key`, starting at `val`.
    pub fn new(val: f32, low: f32, high: f32, exp: bool, dev: u16, key: u16) -> Self {
        Self {
            val,
            low,
            high,
            exp,
            id: Id::new(dev, key),
        }
    }

    /// Current value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.val
    }

    /// Address this controller listens to.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Updates the value if `event` is addressed here and returns it.
    pub fn process(&mut self, event: &Event) -> f32 {
        if self.id.matches(event) {
            let v = event.velocity();
            self.val = if self.exp {
                self.low * libm::powf(self.high / self.low, v)
            } else {
                self.low + (self.high - self.low) * v
            };
        }
        self.val
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_mapping_spans_range() {
        let mut c = Ctrl::new(0.25, -1.0, 1.0, false, 2, 7);
        assert_eq!(c.process(&Event::QUERY), 0.25);
        assert_eq!(c.process(&Event::new(2, 7, 0)), -1.0);
        assert_eq!(c.process(&Event::new(2, 7, 65535)), 1.0);
        assert!(c.process(&Event::new(2, 7, 32768)).abs() < 1e-4);
    }

    #[test]
    fn exponential_mapping_is_geometric() {
        let mut c = Ctrl::new(20.0, 20.0, 20000.0, true, 0, 1);
        let mid = c.process(&Event::new(0, 1, 32768));
        // Geometric mean of the range.
        assert!((mid - 632.4).abs() < 1.0, "got {mid}");
    }

    #[test]
    fn unmatched_events_keep_value() {
        let mut h = Handler::from(Ctrl::new(0.0, 0.0, 10.0, false, 0, 1));
        let v = h.process(&Event::new(0, 1, 65535));
        assert_eq!(h.process(&Event::new(1, 1, 0)), v);
        assert_eq!(h.process(&Event::new(0, 2, 0)), v);
    }
}
