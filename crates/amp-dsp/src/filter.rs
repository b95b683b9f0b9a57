//! Recursive filters built from trapezoidal-integrated one-pole sections.
//!
//! Every filter keeps its coefficient and its state together and is driven
//! one sample at a time. Coefficients can be recomputed every sample with
//! `set_frequency` when the cutoff is modulated; the state carries over.
//!
//! # Difference equations
//!
//! With `g = tan(π f / rate)`:
//!
//! ```text
//! lowpass:   y = (g x + s) / (1 + g)          s += 2 g (x - y)
//! highpass:  h = g / (1 + g)
//!            y = (x - s) / (1 + h)            s += 2 h y
//! ```
//!
//! [`Bandpass`] cascades a highpass into a lowpass (two state variables),
//! [`Bandpass2`] is a resonant two-pole state-variable band-pass, and
//! [`Moog`] chains four lowpass stages inside a resonance feedback loop.

use core::f32::consts::PI;

use libm::{atanf, tanf};

use crate::flush_denormal;

#[inline]
fn warp(freq: f32, rate: f32) -> f32 {
    tanf(freq * PI / rate)
}

/// One-pole lowpass filter.
///
/// # Example
///
/// ```rust
/// use amp_dsp::Lowpass;
///
/// let mut lp = Lowpass::new(1000.0, 48000.0);
/// let y = lp.process(1.0);
/// assert!(y > 0.0 && y < 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lowpass {
    g: f32,
    s: f32,
}

impl Lowpass {
    /// Creates a lowpass with cutoff `freq` Hz at sample rate `rate`.
    pub fn new(freq: f32, rate: f32) -> Self {
        Self {
            g: warp(freq, rate),
            s: 0.0,
        }
    }

    /// Recomputes the coefficient, keeping the state.
    #[inline]
    pub fn set_frequency(&mut self, freq: f32, rate: f32) {
        self.g = warp(freq, rate);
    }

    /// Cutoff frequency recovered from the coefficient.
    pub fn frequency(&self, rate: f32) -> f32 {
        atanf(self.g) * rate / PI
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let g = self.g;
        let y = (g * x + self.s) / (1.0 + g);
        self.s = flush_denormal(self.s + 2.0 * g * (x - y));
        y
    }

    /// Zeroes the state.
    pub fn reset(&mut self) {
        self.s = 0.0;
    }
}

/// One-pole highpass filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Highpass {
    g: f32,
    s: f32,
}

impl Highpass {
    /// Creates a highpass with cutoff `freq` Hz at sample rate `rate`.
    pub fn new(freq: f32, rate: f32) -> Self {
        let mut hp = Self { g: 0.0, s: 0.0 };
        hp.set_frequency(freq, rate);
        hp
    }

    /// Recomputes the coefficient, keeping the state.
    #[inline]
    pub fn set_frequency(&mut self, freq: f32, rate: f32) {
        let w = warp(freq, rate);
        self.g = w / (1.0 + w);
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = (x - self.s) / (1.0 + self.g);
        self.s = flush_denormal(self.s + 2.0 * self.g * y);
        y
    }

    /// Zeroes the state.
    pub fn reset(&mut self) {
        self.s = 0.0;
    }
}

/// Band-pass built from a highpass at `low` into a lowpass at `high`.
///
/// Carries two state variables, one per stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bandpass {
    hp: Highpass,
    lp: Lowpass,
}

impl Bandpass {
    /// Creates a band-pass passing `low..high` Hz.
    pub fn new(low: f32, high: f32, rate: f32) -> Self {
        Self {
            hp: Highpass::new(low, rate),
            lp: Lowpass::new(high, rate),
        }
    }

    /// Recomputes both edges, keeping the state.
    #[inline]
    pub fn set_band(&mut self, low: f32, high: f32, rate: f32) {
        self.hp.set_frequency(low, rate);
        self.lp.set_frequency(high, rate);
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        self.lp.process(self.hp.process(x))
    }

    /// Zeroes both stages.
    pub fn reset(&mut self) {
        self.hp.reset();
        self.lp.reset();
    }
}

/// Resonant two-pole band-pass (trapezoidal state-variable form).
///
/// `quality` sets the bandwidth: higher values ring longer. Peak gain at the
/// center frequency is unity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bandpass2 {
    g: f32,
    k: f32,
    s1: f32,
    s2: f32,
}

impl Bandpass2 {
    /// Creates a band-pass centred on `freq` Hz.
    pub fn new(freq: f32, quality: f32, rate: f32) -> Self {
        let mut bp = Self::default();
        bp.set_frequency(freq, quality, rate);
        bp
    }

    /// Recomputes the coefficients, keeping the state.
    #[inline]
    pub fn set_frequency(&mut self, freq: f32, quality: f32, rate: f32) {
        self.g = warp(freq, rate);
        self.k = 1.0 / quality.max(1e-3);
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let (g, k) = (self.g, self.k);
        let hp = (x - (k + g) * self.s1 - self.s2) / (1.0 + k * g + g * g);
        let bp = g * hp + self.s1;
        self.s1 = flush_denormal(g * hp + bp);
        let lp = g * bp + self.s2;
        self.s2 = flush_denormal(g * bp + lp);
        k * bp
    }

    /// Zeroes the state.
    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }
}

/// Four-stage ladder lowpass with resonance feedback.
///
/// The feedback is resolved without a unit delay by solving for the ladder
/// input from the current stage states.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moog {
    g: f32,
    r: f32,
    s: [f32; 4],
}

impl Moog {
    /// Creates a ladder filter with cutoff `freq` and resonance `res` (0 to ~4).
    pub fn new(freq: f32, res: f32, rate: f32) -> Self {
        Self {
            g: warp(freq, rate),
            r: res,
            s: [0.0; 4],
        }
    }

    /// Recomputes the coefficients, keeping the state.
    #[inline]
    pub fn set_frequency(&mut self, freq: f32, res: f32, rate: f32) {
        self.g = warp(freq, rate);
        self.r = res;
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let g = self.g;
        let s = &mut self.s;
        let t1 = g * g * g * s[0] + g * g * s[1] + g * s[2] + s[3];
        let t2 = g * g * g * g;
        let mut x = (x - self.r * t1) / (1.0 + self.r * t2);
        for st in s.iter_mut() {
            let y = (g * x + *st) / (1.0 + g);
            *st = flush_denormal(*st + 2.0 * g * (x - y));
            x = y;
        }
        x
    }

    /// Zeroes all four stages.
    pub fn reset(&mut self) {
        self.s = [0.0; 4];
    }
}
