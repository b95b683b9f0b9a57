//! Ring buffer delay line.
//!
//! A fixed-capacity circular buffer of samples with a monotonically advancing
//! write position. It is the delay core shared by every reverberator tap and
//! by the chorus and pan nodes.
//!
//! # Indexing
//!
//! | Call | Returns |
//! |------|---------|
//! | `get(0)` | The most recent `put` |
//! | `get(k)` | The value written `k` puts before the most recent |
//! | `get(len - 1)` / `last()` | The oldest retained value (next to be overwritten) |
//!
//! So after `put(1.0), put(2.0), put(3.0), put(4.0)` on a ring of length 4,
//! `get(0) == 4.0`, `get(3) == 1.0` and `last() == 1.0`.
//!
//! # Fractional reads
//!
//! [`Ring::get_interp`] linearly interpolates between neighbouring integer
//! delays. [`Ring::get_allpass`] runs the integer-delayed stream through a
//! first-order all-pass interpolator instead, which has flat magnitude
//! response and no zipper noise when the delay is modulated.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use libm::floorf;

use crate::flush_denormal;

/// State of the all-pass fractional delay interpolator.
///
/// One value per independent read position; keep it next to the [`Ring`] it
/// reads from and pass it to every [`Ring::get_allpass`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FracState {
    s: f32,
}

impl FracState {
    /// Creates a zeroed interpolator state.
    pub const fn new() -> Self {
        Self { s: 0.0 }
    }

    /// Resets the state to zero.
    pub fn reset(&mut self) {
        self.s = 0.0;
    }
}

/// Fixed-capacity circular sample buffer.
///
/// The buffer is allocated once at construction and never reallocates.
///
/// # Example
///
/// ```rust
/// use amp_dsp::Ring;
///
/// let mut ring = Ring::new(4);
/// for v in [1.0, 2.0, 3.0, 4.0] {
///     ring.put(v);
/// }
/// assert_eq!(ring.get(0), 4.0);
/// assert_eq!(ring.get(3), 1.0);
/// assert_eq!(ring.last(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    buf: Vec<f32>,
    pos: usize,
}

impl Ring {
    /// Creates a zeroed ring holding `len` samples.
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "ring length must be > 0");
        Self {
            buf: vec![0.0; len],
            pos: 0,
        }
    }

    /// Creates a ring long enough for `seconds` of audio at `rate`.
    ///
    /// Always at least one sample long.
    pub fn from_time(seconds: f64, rate: f64) -> Self {
        let len = (seconds * rate) as usize;
        Self::new(len.max(1))
    }

    /// Number of samples the ring holds.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Always false; a ring holds at least one sample.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Overwrites the oldest slot with `v` and advances the write position.
    #[inline]
    pub fn put(&mut self, v: f32) {
        self.buf[self.pos] = v;
        self.pos = (self.pos + 1) % self.buf.len();
    }

    /// The oldest retained sample, equivalent to `get(len - 1)`.
    #[inline]
    pub fn last(&self) -> f32 {
        self.buf[self.pos]
    }

    /// Reads the oldest sample, then writes `x` in its place.
    ///
    /// This is a pure delay of `len` samples.
    #[inline]
    pub fn proc(&mut self, x: f32) -> f32 {
        let y = self.last();
        self.put(x);
        y
    }

    /// The value written `k` puts before the most recent one.
    ///
    /// # Panics
    ///
    /// Panics if `k >= len`.
    #[inline]
    pub fn get(&self, k: usize) -> f32 {
        let len = self.buf.len();
        assert!(k < len, "ring read {k} out of range for length {len}");
        self.buf[(self.pos + len - 1 - k) % len]
    }

    /// Linearly interpolated read at a fractional delay `k`.
    ///
    /// `k` is clamped to `[0, len - 1]`.
    #[inline]
    pub fn get_interp(&self, k: f32) -> f32 {
        let max = (self.buf.len() - 1) as f32;
        let k = k.clamp(0.0, max);
        let k0 = floorf(k);
        let frac = k - k0;
        let i = k0 as usize;
        let a = self.get(i);
        let b = self.get((i + 1).min(self.buf.len() - 1));
        a + (b - a) * frac
    }

    /// All-pass interpolated read at a fractional delay `k`.
    ///
    /// Splits `k` into an integer tap `floor(k - 0.25)` and a fractional part
    /// `d = k - floor(k - 0.25)` in `(0.25, 1.25]`, then filters the integer
    /// tap through `y = s + n*v` with `v = x - n*s` and `n = (1 - d) / (1 + d)`.
    /// Keeping `d` away from 0 keeps the all-pass coefficient away from its
    /// unstable pole.
    ///
    /// Call exactly once per sample per read position so `state` follows the
    /// delayed stream.
    ///
    /// # Panics
    ///
    /// Panics if `k <= 0.25` or the integer tap falls outside the ring.
    #[inline]
    pub fn get_allpass(&self, k: f32, state: &mut FracState) -> f32 {
        assert!(k > 0.25, "all-pass delay {k} must exceed 0.25 samples");
        let base = floorf(k - 0.25);
        let d = k - base;
        let n = (1.0 - d) / (1.0 + d);
        let x = self.get(base as usize);
        let v = x - n * state.s;
        let y = state.s + n * v;
        state.s = flush_denormal(v);
        y
    }

    /// Zeroes every sample and rewinds the write position.
    pub fn clear(&mut self) {
        self.buf.fill(0.0);
        self.pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_zero_is_most_recent_write() {
        let mut ring = Ring::new(4);
        for v in [1.0, 2.0, 3.0, 4.0] {
            ring.put(v);
        }
        assert_eq!(ring.get(0), 4.0);
        assert_eq!(ring.get(1), 3.0);
        assert_eq!(ring.get(2), 2.0);
        assert_eq!(ring.get(3), 1.0);
    }

    #[test]
    fn last_is_oldest_and_evicted_next() {
        let mut ring = Ring::new(3);
        for v in [1.0, 2.0, 3.0] {
            ring.put(v);
        }
        assert_eq!(ring.last(), 1.0);
        assert_eq!(ring.last(), ring.get(2));
        ring.put(4.0);
        assert_eq!(ring.last(), 2.0);
        assert_eq!(ring.get(0), 4.0);
    }

    #[test]
    fn proc_delays_by_length() {
        let mut ring = Ring::new(5);
        let out: Vec<f32> = (0..10).map(|i| ring.proc(i as f32 + 1.0)).collect();
        assert_eq!(&out[..5], &[0.0; 5]);
        assert_eq!(&out[5..], &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    #[should_panic]
    fn get_out_of_range_panics() {
        let ring = Ring::new(4);
        let _ = ring.get(4);
    }

    #[test]
    #[should_panic]
    fn zero_length_panics() {
        let _ = Ring::new(0);
    }

    #[test]
    fn interp_matches_integer_reads() {
        let mut ring = Ring::new(8);
        for v in 0..8 {
            ring.put(v as f32);
        }
        assert_eq!(ring.get_interp(2.0), ring.get(2));
        let half = ring.get_interp(2.5);
        assert!((half - 0.5 * (ring.get(2) + ring.get(3))).abs() < 1e-6);
    }

    #[test]
    fn interp_clamps_range() {
        let mut ring = Ring::new(4);
        for v in [1.0, 2.0, 3.0, 4.0] {
            ring.put(v);
        }
        assert_eq!(ring.get_interp(-1.0), 4.0);
        assert_eq!(ring.get_interp(10.0), 1.0);
    }

    #[test]
    fn allpass_integer_delay_is_exact() {
        // d == 1 gives n == 0, so the output is the tap one sample later.
        let mut ring = Ring::new(16);
        let mut state = FracState::new();
        let mut out = Vec::new();
        for i in 0..12 {
            ring.put(i as f32);
            out.push(ring.get_allpass(3.0, &mut state));
        }
        // floor(3.0 - 0.25) = 2, d = 1: output is get(2) delayed by one more sample.
        for i in 4..12 {
            assert!((out[i] - (i as f32 - 3.0)).abs() < 1e-6, "i={i} out={}", out[i]);
        }
    }

    #[test]
    fn allpass_recurrence_first_samples() {
        let mut ring = Ring::new(4);
        let mut state = FracState::new();
        ring.put(1.0);
        // k = 0.5: base = floor(0.25) = 0, d = 0.5, n = 1/3
        let n = (1.0 - 0.5) / (1.0 + 0.5);
        let y0 = ring.get_allpass(0.5, &mut state);
        assert!((y0 - n * 1.0).abs() < 1e-6);
        ring.put(0.0);
        let v0 = 1.0f32;
        let v1 = 0.0 - n * v0;
        let y1 = ring.get_allpass(0.5, &mut state);
        assert!((y1 - (v0 + n * v1)).abs() < 1e-6);
    }

    #[test]
    #[should_panic]
    fn allpass_rejects_short_delay() {
        let ring = Ring::new(4);
        let mut state = FracState::new();
        let _ = ring.get_allpass(0.25, &mut state);
    }

    #[test]
    fn clear_resets_contents() {
        let mut ring = Ring::new(4);
        ring.put(1.0);
        ring.clear();
        assert_eq!(ring.get(0), 0.0);
        assert_eq!(ring.last(), 0.0);
    }

    #[test]
    fn from_time_rounds_down_but_never_zero() {
        assert_eq!(Ring::from_time(0.5, 10.0).len(), 5);
        assert_eq!(Ring::from_time(0.0, 48000.0).len(), 1);
    }
}
