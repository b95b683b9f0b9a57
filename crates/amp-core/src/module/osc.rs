//! Phase sources and oscillators.
//!
//! Oscillators do not own a phase accumulator. A [`Ramp`] produces the phase
//! and an [`Osc`] shapes it, so a [`Warp`] can sit between them and the same
//! ramp can drive any waveform.

use amp_dsp::osc;

use super::Module;
use crate::info::Info;
use crate::param::Slot;
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;

/// Waveform applied by an [`Osc`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OscShape {
    /// `sin(2πt)`.
    #[default]
    Sine,
    /// Triangle.
    Tri,
    /// `1` for the first half-cycle, `-1` after.
    Square,
    /// Rising saw.
    Saw,
    /// Falling saw.
    Rsaw,
    /// A single `1` per cycle, `0` elsewhere.
    Impulse,
}

impl OscShape {
    /// Looks up a shape by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sine" => OscShape::Sine,
            "tri" => OscShape::Tri,
            "square" => OscShape::Square,
            "saw" => OscShape::Saw,
            "rsaw" => OscShape::Rsaw,
            "impulse" => OscShape::Impulse,
            _ => return None,
        })
    }
}

/// Shapes a phase module into a waveform.
///
/// ```rust
/// use amp_core::{Module, Osc, OscShape, Queue, Ramp, Time};
///
/// // 12 kHz at 48 kHz: a quarter cycle per sample.
/// let ramp = Ramp::new(12000.0.into(), 48000.0);
/// let mut osc = Osc::new(OscShape::Square, Module::from(ramp));
/// let mut buf = [0.0; 4];
/// osc.process(&mut buf, &[Time::default(); 5], &mut Queue::new());
/// assert_eq!(buf, [1.0, -1.0, -1.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Osc {
    shape: OscShape,
    phase: Box<Module>,
    reset: bool,
}

impl Osc {
    /// Creates an oscillator reading its phase from `phase`.
    pub fn new(shape: OscShape, phase: Module) -> Self {
        Self {
            shape,
            phase: Box::new(phase),
            reset: true,
        }
    }

    /// The waveform.
    pub fn shape(&self) -> OscShape {
        self.shape
    }

    /// A note start re-arms the impulse; every pulse reaches the phase.
    pub fn info(&mut self, info: &mut Info<'_>) {
        if matches!(info, Info::Note(note) if note.init) {
            self.reset = true;
        }
        self.phase.info(info);
    }

    /// Renders the phase into `buf` and shapes it in place.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let cont = self.phase.process(buf, time, queue);
        let shape: fn(f32) -> f32 = match self.shape {
            OscShape::Sine => osc::sine,
            OscShape::Tri => osc::tri,
            OscShape::Square => osc::square,
            OscShape::Saw => osc::saw,
            OscShape::Rsaw => osc::rsaw,
            OscShape::Impulse => {
                // Fires once on entering the first quarter, re-arms in the last.
                for x in buf.iter_mut() {
                    let t = *x;
                    *x = 0.0;
                    if self.reset {
                        if t < 0.25 {
                            *x = 1.0;
                            self.reset = false;
                        }
                    } else if t > 0.75 {
                        self.reset = true;
                    }
                }
                return cont;
            }
        };
        for x in buf.iter_mut() {
            *x = shape(*x);
        }
        cont
    }
}

/// A phase in `[0, 1)` advancing by `freq / rate` per sample.
///
/// The phase is incremented before it is written, so a fresh ramp's first
/// sample is one step in.
#[derive(Debug, Clone)]
pub struct Ramp {
    freq: Slot,
    rate: f32,
    v: f32,
}

impl Ramp {
    /// Creates a ramp at `freq` Hz for sample rate `rate`.
    pub fn new(freq: Slot, rate: f32) -> Self {
        Self { freq, rate, v: 0.0 }
    }

    /// Current phase.
    pub fn phase(&self) -> f32 {
        self.v
    }

    /// A note start rewinds the phase; pulses reach the frequency.
    pub fn info(&mut self, info: &mut Info<'_>) {
        if matches!(info, Info::Note(note) if note.init) {
            self.v = 0.0;
        }
        self.freq.info(info);
    }

    /// Writes `len` phase values.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let (freq, cont) = self.freq.eval(time, queue);
        let mut v = self.v;
        for (i, x) in buf.iter_mut().enumerate() {
            v = osc::inc(v, osc::step(freq.at(i), self.rate));
            *x = v;
        }
        self.v = v;
        cont
    }
}

/// Bends a phase so its first half-cycle takes `(1 - dist) / 2` of the period.
///
/// The bend is centered on the rising zero crossing: the phase is shifted a
/// quarter cycle forward, warped, and shifted back, leaving values in
/// `[-0.25, 0.75)`.
#[derive(Debug, Clone)]
pub struct Warp {
    phase: Box<Module>,
    dist: Slot,
}

impl Warp {
    /// Creates a warp of `phase` by `dist` in `(-1, 1)`.
    pub fn new(phase: Module, dist: Slot) -> Self {
        Self {
            phase: Box::new(phase),
            dist,
        }
    }

    /// Forwards pulses to the phase and the distortion.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.phase.info(info);
        self.dist.info(info);
    }

    /// Renders the phase and bends it in place.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let mut cont = self.phase.process(buf, time, queue);
        let (dist, dc) = self.dist.eval(time, queue);
        cont |= dc;
        for (i, x) in buf.iter_mut().enumerate() {
            *x = osc::warp(libm::fmodf(*x + 0.25, 1.0), dist.at(i)) - 0.25;
        }
        cont
    }
}
