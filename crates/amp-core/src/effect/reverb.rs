//! Reverberator taps as effects.
//!
//! Each [`Reverb`] wraps one [`Reverberator`] and applies a single tap per
//! sample. Larger reverbs are built by combining taps in chains and sections.

use amp_dsp::Reverberator;

use crate::info::Info;
use crate::param::{Slot, Values};
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;

/// Tap applied by a [`Reverb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverbKind {
    /// `gain * delayed`.
    Delay,
    /// Schroeder all-pass.
    Allpass,
    /// Feedback comb.
    Comb,
    /// Comb with a lowpass in the feedback path.
    Lpcf,
    /// Comb with a band-pass in the feedback path.
    Bpcf,
    /// Comb with a varying fractional delay.
    Vcomb,
    /// Lowpass comb with a varying fractional delay.
    Vlpcf,
    /// Band-pass comb with a varying fractional delay.
    Vbpcf,
}

impl ReverbKind {
    /// Looks up a tap by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "delay" => ReverbKind::Delay,
            "allpass" => ReverbKind::Allpass,
            "comb" => ReverbKind::Comb,
            "lpcf" => ReverbKind::Lpcf,
            "bpcf" => ReverbKind::Bpcf,
            "vcomb" => ReverbKind::Vcomb,
            "vlpcf" => ReverbKind::Vlpcf,
            "vbpcf" => ReverbKind::Vbpcf,
            _ => return None,
        })
    }

    /// True for taps whose delay is a parameter.
    pub fn is_varying(self) -> bool {
        matches!(
            self,
            ReverbKind::Vcomb | ReverbKind::Vlpcf | ReverbKind::Vbpcf
        )
    }
}

/// A single reverberator tap.
///
/// `len` is the ring length in seconds: the fixed delay of the plain taps and
/// the maximum delay of the varying ones. The varying taps read their delay
/// in seconds from the `delay` parameter. `low` is the cutoff of lowpass
/// taps and the lower edge of band-pass taps; `high` is the upper edge.
///
/// ```rust
/// use amp_core::{Queue, Reverb, Time};
///
/// // Four samples of delay at 4 Hz.
/// let mut tap = Reverb::delay(1.0, 0.5.into(), 4.0);
/// let mut buf = [1.0, 2.0, 3.0, 4.0, 0.0, 0.0];
/// tap.process(&mut buf, &[Time::default(); 7], &mut Queue::new());
/// assert_eq!(buf, [0.0, 0.0, 0.0, 0.0, 0.5, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Reverb {
    kind: ReverbKind,
    rev: Reverberator,
    rate: f32,
    gain: Slot,
    low: Slot,
    high: Slot,
    delay: Slot,
}

impl Reverb {
    /// Creates a tap with a `len`-second ring and every parameter at zero.
    pub fn new(kind: ReverbKind, len: f64, rate: f32) -> Self {
        Self {
            kind,
            rev: Reverberator::from_time(len, f64::from(rate)),
            rate,
            gain: 0.0.into(),
            low: 0.0.into(),
            high: 0.0.into(),
            delay: 0.0.into(),
        }
    }

    /// A pure delay scaled by `gain`.
    pub fn delay(len: f64, gain: Slot, rate: f32) -> Self {
        Self::new(ReverbKind::Delay, len, rate).with_gain(gain)
    }

    /// An all-pass.
    pub fn allpass(len: f64, gain: Slot, rate: f32) -> Self {
        Self::new(ReverbKind::Allpass, len, rate).with_gain(gain)
    }

    /// A feedback comb.
    pub fn comb(len: f64, gain: Slot, rate: f32) -> Self {
        Self::new(ReverbKind::Comb, len, rate).with_gain(gain)
    }

    /// A lowpass feedback comb with cutoff `freq`.
    pub fn lpcf(len: f64, gain: Slot, freq: Slot, rate: f32) -> Self {
        Self::new(ReverbKind::Lpcf, len, rate)
            .with_gain(gain)
            .with_band(freq, 0.0.into())
    }

    /// A band-pass feedback comb passing `[low, high]`.
    pub fn bpcf(len: f64, gain: Slot, low: Slot, high: Slot, rate: f32) -> Self {
        Self::new(ReverbKind::Bpcf, len, rate)
            .with_gain(gain)
            .with_band(low, high)
    }

    /// Sets the feedback or output gain.
    pub fn with_gain(mut self, gain: Slot) -> Self {
        self.gain = gain;
        self
    }

    /// Sets the filter cutoff (`low`) and upper band edge (`high`).
    pub fn with_band(mut self, low: Slot, high: Slot) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    /// Sets the delay, in seconds, of a varying tap.
    pub fn with_delay(mut self, delay: Slot) -> Self {
        self.delay = delay;
        self
    }

    /// The tap kind.
    pub fn kind(&self) -> ReverbKind {
        self.kind
    }

    /// Forwards a pulse to every parameter.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.gain.info(info);
        self.low.info(info);
        self.high.info(info);
        self.delay.info(info);
    }

    /// Runs the tap over `buf`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let rate = self.rate;
        let (gain, c0) = self.gain.eval(time, queue);
        let (low, c1) = self.low.eval(time, queue);
        let (high, c2) = self.high.eval(time, queue);
        let (delay, c3) = self.delay.eval(time, queue);
        let rev = &mut self.rev;

        let lowpass = matches!(self.kind, ReverbKind::Lpcf | ReverbKind::Vlpcf);
        let bandpass = matches!(self.kind, ReverbKind::Bpcf | ReverbKind::Vbpcf);
        let fixed_filter = matches!((low, high), (Values::Scalar(_), Values::Scalar(_)));
        if fixed_filter {
            if lowpass {
                rev.set_lowpass(low.at(0), rate);
            } else if bandpass {
                rev.set_bandpass(low.at(0), high.at(0), rate);
            }
        }

        for (i, x) in buf.iter_mut().enumerate() {
            if !fixed_filter {
                if lowpass {
                    rev.set_lowpass(low.at(i), rate);
                } else if bandpass {
                    rev.set_bandpass(low.at(i), high.at(i), rate);
                }
            }
            let g = gain.at(i);
            *x = match self.kind {
                ReverbKind::Delay => g * rev.delay(*x),
                ReverbKind::Allpass => rev.allpass(*x, g),
                ReverbKind::Comb => rev.comb(*x, g),
                ReverbKind::Lpcf => rev.lpcf(*x, g),
                ReverbKind::Bpcf => rev.bpcf(*x, g),
                ReverbKind::Vcomb => rev.vcomb(*x, delay.at(i) * rate, g),
                ReverbKind::Vlpcf => rev.vlpcf(*x, delay.at(i) * rate, g),
                ReverbKind::Vbpcf => rev.vbpcf(*x, delay.at(i) * rate, g),
            };
        }
        c0 | c1 | c2 | c3
    }
}
