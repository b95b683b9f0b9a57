//! Timeline positions.
//!
//! A [`Time`] pairs an absolute sample index with its musical position
//! (`bar`, `beat`). Clocks fill one `Time` per sample boundary, so a block of
//! `len` samples is described by a `&[Time]` of length `len + 1`: sample `i`
//! spans `time[i]..time[i + 1]`.
//!
//! Musical comparison only looks at `bar` and `beat`. Two times with equal
//! positions but different indices compare equal, which is what a stopped
//! clock produces.

use core::cmp::Ordering;

use amp_dsp::{modulo, modulo_i};

/// Tolerance used by [`Loc::near`].
pub const LOC_EPSILON: f64 = 1e-5;

/// A sample index and its bar/beat position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    /// Absolute sample index.
    pub idx: i64,
    /// Bar number.
    pub bar: i32,
    /// Beat within the bar, in `[0, nbeats)`.
    pub beat: f64,
}

impl Time {
    /// A time at `bar` and `beat` with index 0.
    pub fn new(bar: i32, beat: f64) -> Self {
        Self { idx: 0, bar, beat }
    }

    /// Computes the position of sample `idx` for a tempo of `bpm` with
    /// `nbeats` beats per bar at sample rate `rate`.
    ///
    /// ```rust
    /// use amp_core::Time;
    ///
    /// // 120 bpm at 48 kHz: one beat every 24000 samples.
    /// let t = Time::calc(24000 * 5, 120.0, 4.0, 48000.0);
    /// assert_eq!(t.bar, 1);
    /// assert!((t.beat - 1.0).abs() < 1e-9);
    /// ```
    pub fn calc(idx: i64, bpm: f64, nbeats: f64, rate: f64) -> Self {
        let total = idx as f64 * bpm / (rate * 60.0);
        let bar = (total / nbeats).floor();
        Self {
            idx,
            bar: bar as i32,
            beat: total - bar * nbeats,
        }
    }

    /// Compares musical positions.
    ///
    /// Returns `±2` when the bars differ, `±1` when only the beats differ
    /// and `0` when both match. The sign follows `self - other`.
    pub fn cmp_loc(&self, other: &Time) -> i32 {
        match self.bar.cmp(&other.bar) {
            Ordering::Greater => 2,
            Ordering::Less => -2,
            Ordering::Equal => {
                if self.beat > other.beat {
                    1
                } else if self.beat < other.beat {
                    -1
                } else {
                    0
                }
            }
        }
    }

    /// True when bar and beat both match, ignoring the index.
    pub fn is_equal(&self, other: &Time) -> bool {
        self.cmp_loc(other) == 0
    }

    /// True when `self` lies in `[left, right)`.
    ///
    /// When `left` is not before `right` the interval wraps around, so the
    /// test becomes `self >= left || self < right`.
    pub fn between(&self, left: &Time, right: &Time) -> bool {
        if left.cmp_loc(right) < 0 {
            left.cmp_loc(self) <= 0 && self.cmp_loc(right) < 0
        } else {
            left.cmp_loc(self) <= 0 || self.cmp_loc(right) < 0
        }
    }

    /// Offsets the bar by `off` and wraps it into `[0, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is not positive.
    pub fn repeat(mut self, off: i32, len: i32) -> Self {
        assert!(len > 0, "repeat length must be positive");
        self.bar = (self.bar + off).rem_euclid(len);
        self
    }

    /// Wraps each field by the matching field of `m` when that field is
    /// positive.
    pub fn modulo(mut self, m: &Time) -> Self {
        if m.idx > 0 {
            self.idx = modulo_i(self.idx, m.idx);
        }
        if m.bar > 0 {
            self.bar = self.bar.rem_euclid(m.bar);
        }
        if m.beat > 0.0 {
            self.beat = modulo(self.beat, m.beat);
        }
        self
    }

    /// The bar/beat part of this time.
    pub fn loc(&self) -> Loc {
        Loc {
            bar: self.bar,
            beat: self.beat,
        }
    }
}

/// A musical location without a sample index.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Loc {
    /// Bar number.
    pub bar: i32,
    /// Beat within the bar.
    pub beat: f64,
}

impl Loc {
    /// Creates a location.
    pub fn new(bar: i32, beat: f64) -> Self {
        Self { bar, beat }
    }

    /// Location of grid step `idx` with `ndivs` steps per beat and `nbeats`
    /// beats per bar.
    pub fn from_idx(idx: u32, ndivs: u32, nbeats: u32) -> Self {
        let per_bar = ndivs * nbeats;
        let bar = idx / per_bar;
        Self {
            bar: bar as i32,
            beat: f64::from(idx - per_bar * bar) / f64::from(ndivs),
        }
    }

    /// Orders two locations, bar first.
    pub fn compare(&self, other: &Loc) -> Ordering {
        self.bar
            .cmp(&other.bar)
            .then(self.beat.total_cmp(&other.beat))
    }

    /// True when both locations share a bar and their beats differ by less
    /// than [`LOC_EPSILON`].
    pub fn near(&self, other: &Loc) -> bool {
        self.bar == other.bar && (self.beat - other.beat).abs() < LOC_EPSILON
    }
}
