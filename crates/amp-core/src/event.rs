//! Control events.
//!
//! Every control message in the graph is an [`Event`]: a device number, a
//! key number and a 16-bit value. Notes, controllers and triggers all use the
//! same shape; a note with value 0 is a release.

/// A device/key/value control message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Event {
    /// Device number.
    pub dev: u16,
    /// Key (note or controller) number.
    pub key: u16,
    /// Value, `0..=65535`.
    pub val: u16,
}

impl Event {
    /// Sentinel used to seed a handler with its current value.
    pub const QUERY: Event = Event {
        dev: u16::MAX,
        key: u16::MAX,
        val: u16::MAX / 2,
    };

    /// Creates an event.
    pub const fn new(dev: u16, key: u16, val: u16) -> Self {
        Self { dev, key, val }
    }

    /// The device/key pair this event is addressed to.
    pub const fn id(&self) -> Id {
        Id {
            dev: self.dev,
            key: self.key,
        }
    }

    /// Value scaled to `[0, 1]`.
    ///
    /// ```rust
    /// use amp_core::Event;
    ///
    /// assert_eq!(Event::new(0, 60, 65535).velocity(), 1.0);
    /// assert_eq!(Event::new(0, 60, 0).velocity(), 0.0);
    /// ```
    #[inline]
    pub fn velocity(&self) -> f32 {
        velocity(self.val)
    }
}

/// Scales a raw event value to `[0, 1]`.
#[inline]
pub fn velocity(val: u16) -> f32 {
    f32::from(val) / f32::from(u16::MAX)
}

/// A device/key address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id {
    /// Device number.
    pub dev: u16,
    /// Key number.
    pub key: u16,
}

impl Id {
    /// Creates an address.
    pub const fn new(dev: u16, key: u16) -> Self {
        Self { dev, key }
    }

    /// True when `event` is addressed to this id.
    #[inline]
    pub fn matches(&self, event: &Event) -> bool {
        event.dev == self.dev && event.key == self.key
    }
}
