//! Parameterized filters.

use amp_dsp::{Bandpass2, Highpass, Lowpass, Moog};

use crate::info::Info;
use crate::param::{Slot, Values};
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;

/// Filter response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiltKind {
    /// One-pole lowpass.
    Lpf,
    /// One-pole highpass.
    Hpf,
    /// Resonant two-pole band-pass.
    Bpf,
    /// Four-stage ladder lowpass.
    Moog,
}

impl FiltKind {
    /// Looks up a response by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "lpf" => FiltKind::Lpf,
            "hpf" => FiltKind::Hpf,
            "bpf" => FiltKind::Bpf,
            "moog" => FiltKind::Moog,
            _ => return None,
        })
    }

    /// The name accepted by [`from_name`](Self::from_name).
    pub fn name(self) -> &'static str {
        match self {
            FiltKind::Lpf => "lpf",
            FiltKind::Hpf => "hpf",
            FiltKind::Bpf => "bpf",
            FiltKind::Moog => "moog",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Lpf(Lowpass),
    Hpf(Highpass),
    Bpf(Bandpass2),
    Moog(Moog),
}

impl State {
    #[inline]
    fn tune(&mut self, freq: f32, aux: f32, rate: f32) {
        match self {
            State::Lpf(f) => f.set_frequency(freq, rate),
            State::Hpf(f) => f.set_frequency(freq, rate),
            State::Bpf(f) => f.set_frequency(freq, aux, rate),
            State::Moog(f) => f.set_frequency(freq, aux, rate),
        }
    }

    #[inline]
    fn process(&mut self, x: f32) -> f32 {
        match self {
            State::Lpf(f) => f.process(x),
            State::Hpf(f) => f.process(x),
            State::Bpf(f) => f.process(x),
            State::Moog(f) => f.process(x),
        }
    }
}

/// A filter whose cutoff (and quality or resonance) are parameters.
///
/// When every parameter is fast the coefficients are computed once per
/// block; otherwise they are recomputed every sample. Filter state survives
/// coefficient changes.
///
/// ```rust
/// use amp_core::{Filt, Queue, Time};
///
/// let mut lpf = Filt::lpf(100.0.into(), 48000.0);
/// let mut buf = vec![1.0; 48000];
/// lpf.process(&mut buf, &vec![Time::default(); 48001], &mut Queue::new());
/// assert!((buf[47999] - 1.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct Filt {
    kind: FiltKind,
    state: State,
    rate: f32,
    freq: Slot,
    aux: Slot,
}

impl Filt {
    fn new(kind: FiltKind, freq: Slot, aux: Slot, rate: f32) -> Self {
        let state = match kind {
            FiltKind::Lpf => State::Lpf(Lowpass::default()),
            FiltKind::Hpf => State::Hpf(Highpass::default()),
            FiltKind::Bpf => State::Bpf(Bandpass2::default()),
            FiltKind::Moog => State::Moog(Moog::default()),
        };
        Self {
            kind,
            state,
            rate,
            freq,
            aux,
        }
    }

    /// Lowpass at `freq` Hz.
    pub fn lpf(freq: Slot, rate: f32) -> Self {
        Self::new(FiltKind::Lpf, freq, 0.0.into(), rate)
    }

    /// Highpass at `freq` Hz.
    pub fn hpf(freq: Slot, rate: f32) -> Self {
        Self::new(FiltKind::Hpf, freq, 0.0.into(), rate)
    }

    /// Band-pass centred on `freq` Hz with quality `qual`.
    pub fn bpf(freq: Slot, qual: Slot, rate: f32) -> Self {
        Self::new(FiltKind::Bpf, freq, qual, rate)
    }

    /// Ladder lowpass at `freq` Hz with resonance `res`.
    pub fn moog(freq: Slot, res: Slot, rate: f32) -> Self {
        Self::new(FiltKind::Moog, freq, res, rate)
    }

    /// The response.
    pub fn kind(&self) -> FiltKind {
        self.kind
    }

    /// Forwards a pulse to the parameters.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.freq.info(info);
        self.aux.info(info);
    }

    /// Filters `buf` in place.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let rate = self.rate;
        let (freq, c0) = self.freq.eval(time, queue);
        let (aux, c1) = self.aux.eval(time, queue);

        if let (Values::Scalar(f), Values::Scalar(a)) = (freq, aux) {
            self.state.tune(f, a, rate);
            for x in buf.iter_mut() {
                *x = self.state.process(*x);
            }
        } else {
            for (i, x) in buf.iter_mut().enumerate() {
                self.state.tune(freq.at(i), aux.at(i), rate);
                *x = self.state.process(*x);
            }
        }
        c0 | c1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Module, Ramp};

    fn times(len: usize) -> Vec<Time> {
        vec![Time::default(); len + 1]
    }

    fn sine(freq: f32, rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (core::f32::consts::TAU * freq * i as f32 / rate).sin())
            .collect()
    }

    fn peak(buf: &[f32]) -> f32 {
        buf.iter().fold(0.0f32, |m, x| m.max(x.abs()))
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut f = Filt::hpf(50.0.into(), 48000.0);
        let mut buf = vec![1.0; 48000];
        f.process(&mut buf, &times(48000), &mut Queue::new());
        assert!(buf[47999].abs() < 1e-3);
    }

    #[test]
    fn lowpass_attenuates_high_tones() {
        let mut f = Filt::lpf(200.0.into(), 48000.0);
        let mut buf = sine(8000.0, 48000.0, 4800);
        f.process(&mut buf, &times(4800), &mut Queue::new());
        assert!(peak(&buf[2400..]) < 0.1);
    }

    #[test]
    fn bandpass_passes_center() {
        let mut f = Filt::bpf(1000.0.into(), 2.0.into(), 48000.0);
        let mut buf = sine(1000.0, 48000.0, 9600);
        f.process(&mut buf, &times(9600), &mut Queue::new());
        assert!((peak(&buf[4800..]) - 1.0).abs() < 0.05);
    }

    #[test]
    fn moog_is_stable_at_high_resonance() {
        let mut f = Filt::moog(1000.0.into(), 3.5.into(), 48000.0);
        let mut buf = sine(500.0, 48000.0, 48000);
        f.process(&mut buf, &times(48000), &mut Queue::new());
        assert!(buf.iter().all(|x| x.is_finite()));
        assert!(peak(&buf) < 10.0);
    }

    #[test]
    fn module_cutoff_continues_from_parameter() {
        let sweep = Module::from(Ramp::new(1.0.into(), 48000.0));
        let mut f = Filt::lpf(Slot::from(sweep), 48000.0);
        let mut buf = vec![1.0; 64];
        assert!(!f.process(&mut buf, &times(64), &mut Queue::new()));
        assert!(buf.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn names_round_trip() {
        for kind in [FiltKind::Lpf, FiltKind::Hpf, FiltKind::Bpf, FiltKind::Moog] {
            assert_eq!(FiltKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(FiltKind::from_name("peak"), None);
    }
}
