//! Ring-backed reverberator taps.
//!
//! A [`Reverberator`] owns one [`Ring`] plus the filter state its feedback
//! variants need. Each tap is a method; the caller picks one and calls it
//! once per sample. The ring length sets the delay of the fixed taps.
//!
//! | Tap | Recurrence (`v` is the oldest ring sample) |
//! |-----|-------------|
//! | [`delay`](Reverberator::delay) | `y = v`, `put(x)` |
//! | [`allpass`](Reverberator::allpass) | `w = x - g v`, `y = v + g w`, `put(w)` |
//! | [`comb`](Reverberator::comb) | `y = v`, `put(x + g v)` |
//! | [`lpcf`](Reverberator::lpcf) | `y = v`, `put(x + g lpf(v))` |
//! | [`bpcf`](Reverberator::bpcf) | `y = v`, `put(x + g bpf(v))` |
//!
//! The varying taps `vcomb`, `vlpcf` and `vbpcf` take the delay in samples
//! per call and read it with the all-pass fractional interpolator, so the
//! delay can be swept without zipper noise. The delay is clamped to
//! `[1.2501, len]` samples.
//!
//! Feedback depth and wet/dry mixing are not handled here: `g` is passed in
//! by the owning node and mixing belongs to the containers above it.

use crate::{Bandpass, FracState, Lowpass, Ring};

/// Ring buffer plus the feedback filter state of every tap variant.
///
/// # Example
///
/// ```rust
/// use amp_dsp::Reverberator;
///
/// let mut comb = Reverberator::new(3);
/// let out: Vec<f32> = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
///     .iter()
///     .map(|&x| comb.comb(x, 0.5))
///     .collect();
/// assert_eq!(out, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Reverberator {
    ring: Ring,
    lpf: Lowpass,
    bpf: Bandpass,
    frac: FracState,
}

impl Reverberator {
    /// Creates a reverberator with a `len`-sample ring.
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    pub fn new(len: usize) -> Self {
        Self {
            ring: Ring::new(len),
            lpf: Lowpass::default(),
            bpf: Bandpass::default(),
            frac: FracState::new(),
        }
    }

    /// Creates a reverberator holding `seconds` of audio at `rate`.
    pub fn from_time(seconds: f64, rate: f64) -> Self {
        let len = ((seconds * rate) as usize).max(1);
        Self::new(len)
    }

    /// Ring length in samples.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Always false; the ring holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Sets the feedback lowpass used by [`lpcf`](Self::lpcf) and [`vlpcf`](Self::vlpcf).
    #[inline]
    pub fn set_lowpass(&mut self, freq: f32, rate: f32) {
        self.lpf.set_frequency(freq, rate);
    }

    /// Sets the feedback band used by [`bpcf`](Self::bpcf) and [`vbpcf`](Self::vbpcf).
    #[inline]
    pub fn set_bandpass(&mut self, low: f32, high: f32, rate: f32) {
        self.bpf.set_band(low, high, rate);
    }

    /// Pure delay of `len` samples.
    #[inline]
    pub fn delay(&mut self, x: f32) -> f32 {
        self.ring.proc(x)
    }

    /// Schroeder all-pass with gain `g`.
    #[inline]
    pub fn allpass(&mut self, x: f32, g: f32) -> f32 {
        let v = self.ring.last();
        let w = x - g * v;
        self.ring.put(w);
        v + g * w
    }

    /// Feedback comb with gain `g`.
    #[inline]
    pub fn comb(&mut self, x: f32, g: f32) -> f32 {
        let v = self.ring.last();
        self.ring.put(x + g * v);
        v
    }

    /// Feedback comb with a lowpass in the feedback path.
    #[inline]
    pub fn lpcf(&mut self, x: f32, g: f32) -> f32 {
        let v = self.ring.last();
        let f = self.lpf.process(v);
        self.ring.put(x + g * f);
        v
    }

    /// Feedback comb with a band-pass in the feedback path.
    #[inline]
    pub fn bpcf(&mut self, x: f32, g: f32) -> f32 {
        let v = self.ring.last();
        let f = self.bpf.process(v);
        self.ring.put(x + g * f);
        v
    }

    #[inline]
    fn varying(&mut self, delay: f32) -> f32 {
        let max = (self.ring.len() - 1) as f32;
        let k = (delay - 1.0).clamp(0.2501, max.max(0.2501));
        self.ring.get_allpass(k, &mut self.frac)
    }

    /// Feedback comb with a fractional delay of `delay` samples.
    #[inline]
    pub fn vcomb(&mut self, x: f32, delay: f32, g: f32) -> f32 {
        let v = self.varying(delay);
        self.ring.put(x + g * v);
        v
    }

    /// Lowpass feedback comb with a fractional delay of `delay` samples.
    #[inline]
    pub fn vlpcf(&mut self, x: f32, delay: f32, g: f32) -> f32 {
        let v = self.varying(delay);
        let f = self.lpf.process(v);
        self.ring.put(x + g * f);
        v
    }

    /// Band-pass feedback comb with a fractional delay of `delay` samples.
    #[inline]
    pub fn vbpcf(&mut self, x: f32, delay: f32, g: f32) -> f32 {
        let v = self.varying(delay);
        let f = self.bpf.process(v);
        self.ring.put(x + g * f);
        v
    }

    /// Clears the ring and every filter state.
    pub fn reset(&mut self) {
        self.ring.clear();
        self.lpf.reset();
        self.bpf.reset();
        self.frac.reset();
    }
}
