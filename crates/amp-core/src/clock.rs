//! Clocks.
//!
//! A clock is the only node that advances time. Each block it fills the
//! `len + 1` sample boundaries with [`Time`] values; everything downstream
//! reads those. A stopped clock repeats its current position, which makes
//! every sample boundary compare equal.

use crate::info::{Info, Seek};
use crate::time::Time;

/// Timeline sources.
#[derive(Debug, Clone, PartialEq)]
pub enum Clock {
    /// Constant tempo clock.
    Basic(Basic),
}

impl Clock {
    /// Answers transport pulses.
    pub fn info(&mut self, info: &mut Info<'_>) {
        match self {
            Clock::Basic(c) => c.info(info),
        }
    }

    /// Fills `time` for a block of `time.len() - 1` samples.
    pub fn process(&mut self, time: &mut [Time]) {
        match self {
            Clock::Basic(c) => c.process(time),
        }
    }
}

impl From<Basic> for Clock {
    fn from(c: Basic) -> Self {
        Clock::Basic(c)
    }
}

/// A constant tempo clock.
///
/// ```rust
/// use amp_core::{Basic, Time};
///
/// let mut clock = Basic::new(120.0, 4.0, 48000.0);
/// clock.set_running(true);
/// let mut time = [Time::default(); 5];
/// clock.process(&mut time);
/// assert_eq!(time[4].idx, 4);
/// assert_eq!(clock.index(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Basic {
    bpm: f64,
    nbeats: f64,
    rate: f64,
    run: bool,
    idx: i64,
}

impl Basic {
    /// Creates a stopped clock at index 0.
    pub fn new(bpm: f64, nbeats: f64, rate: f64) -> Self {
        Self {
            bpm,
            nbeats,
            rate,
            run: false,
            idx: 0,
        }
    }

    /// Tempo in beats per minute.
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Beats per bar.
    pub fn nbeats(&self) -> f64 {
        self.nbeats
    }

    /// Current sample index.
    pub fn index(&self) -> i64 {
        self.idx
    }

    /// True while the clock advances.
    pub fn is_running(&self) -> bool {
        self.run
    }

    /// Starts or stops the clock.
    pub fn set_running(&mut self, run: bool) {
        self.run = run;
    }

    /// Current position.
    pub fn now(&self) -> Time {
        Time::calc(self.idx, self.bpm, self.nbeats, self.rate)
    }

    /// Moves to a fractional bar position.
    pub fn seek(&mut self, bar: f64) {
        self.idx = (bar / self.bpm * self.nbeats * 60.0 * self.rate).round() as i64;
    }

    fn bars(&self) -> f64 {
        let now = self.now();
        f64::from(now.bar) + now.beat / self.nbeats
    }

    fn answer(&self, seek: &mut Seek) {
        seek.idx = self.idx;
        seek.time = self.now();
    }

    /// Handles `Seek`, `Start`, `Stop`, `Tell` and `Loc`.
    pub fn info(&mut self, info: &mut Info<'_>) {
        match info {
            Info::Seek(seek) => {
                let target = f64::from(seek.time.bar) + seek.time.beat / self.nbeats;
                self.seek(target);
                self.answer(seek);
                tracing::debug!(bar = target, idx = self.idx, "clock seek");
            }
            Info::Start(seek) => {
                self.run = true;
                self.answer(seek);
                tracing::debug!(idx = self.idx, "clock start");
            }
            Info::Stop(seek) => {
                self.run = false;
                self.answer(seek);
                tracing::debug!(idx = self.idx, "clock stop");
            }
            Info::Tell(bars) => **bars = self.bars(),
            Info::Loc(loc) => **loc = self.now().loc(),
            _ => {}
        }
    }

    /// Fills the block's sample boundaries and advances when running.
    ///
    /// # Panics
    ///
    /// Panics if `time` is empty.
    pub fn process(&mut self, time: &mut [Time]) {
        assert!(!time.is_empty(), "time must hold len + 1 entries");
        let len = time.len() - 1;
        if self.run {
            for (i, t) in time.iter_mut().enumerate() {
                *t = Time::calc(self.idx + i as i64, self.bpm, self.nbeats, self.rate);
            }
            self.idx += len as i64;
        } else {
            time.fill(self.now());
        }
    }
}
