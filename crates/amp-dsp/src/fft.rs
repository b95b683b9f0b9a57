//! Magnitude/phase FFT helpers and spectral peak picking.
//!
//! [`Fft`] caches forward and inverse plans for one size and works in polar
//! form: [`Fft::forward`] returns magnitude and phase per bin, and
//! [`Fft::inverse`] rebuilds a real signal from them. The inverse is scaled by
//! `1 / size` so a forward/inverse pair is the identity.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{FftPlanner, num_complex::Complex};

/// Cached FFT plans for one transform size.
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    ifft: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl core::fmt::Debug for Fft {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fft").field("size", &self.size).finish()
    }
}

impl Fft {
    /// Plans transforms of `size` points.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        #[cfg(feature = "tracing")]
        tracing::debug!(size, "planning fft");
        Self {
            fft: planner.plan_fft_forward(size),
            ifft: planner.plan_fft_inverse(size),
            size,
        }
    }

    /// Transform size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of a real signal into `(magnitude, phase)` per bin.
    ///
    /// Input shorter than the size is zero padded, longer input truncated.
    /// Every bin is returned, not just the positive half.
    pub fn forward(&self, input: &[f32]) -> (Vec<f32>, Vec<f32>) {
        let mut buffer: Vec<Complex<f32>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));
        self.fft.process(&mut buffer);
        buffer.iter().map(|c| (c.norm(), c.arg())).unzip()
    }

    /// Inverse transform from magnitude and phase back to a real signal.
    ///
    /// # Panics
    ///
    /// Panics if `mag` and `phase` are not both `size` long.
    pub fn inverse(&self, mag: &[f32], phase: &[f32]) -> Vec<f32> {
        assert_eq!(mag.len(), self.size, "magnitude length mismatch");
        assert_eq!(phase.len(), self.size, "phase length mismatch");
        let mut buffer: Vec<Complex<f32>> = mag
            .iter()
            .zip(phase)
            .map(|(&m, &p)| Complex::from_polar(m, p))
            .collect();
        self.ifft.process(&mut buffer);
        let scale = 1.0 / self.size as f32;
        buffer.iter().map(|c| c.re * scale).collect()
    }
}

/// Center frequency of bin `idx` for a `size`-point transform at `rate`.
#[inline]
pub fn fft_freq(idx: usize, rate: f32, size: usize) -> f32 {
    idx as f32 * rate / size as f32
}

/// Multiplies `buf` by a Blackman window (`α = 0.16`).
pub fn blackman(buf: &mut [f32]) {
    let n = buf.len();
    if n < 2 {
        return;
    }
    let a = 0.16;
    let (a0, a1, a2) = ((1.0 - a) / 2.0, 0.5, a / 2.0);
    let denom = (n - 1) as f32;
    for (i, x) in buf.iter_mut().enumerate() {
        let t = i as f32 / denom;
        *x *= a0 - a1 * (2.0 * PI * t).cos() + a2 * (4.0 * PI * t).cos();
    }
}

/// A spectral peak.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tone {
    /// Frequency in Hz.
    pub freq: f32,
    /// Magnitude.
    pub mag: f32,
}

/// Returns the `n` loudest bins of a magnitude spectrum, sorted by frequency.
///
/// Only the lower half of the spectrum (up to Nyquist) is searched.
pub fn peaks(mag: &[f32], rate: f32, n: usize) -> Vec<Tone> {
    let size = mag.len();
    let mut tones: Vec<Tone> = mag
        .iter()
        .take(size / 2 + 1)
        .enumerate()
        .map(|(i, &m)| Tone {
            freq: fft_freq(i, rate, size),
            mag: m,
        })
        .collect();
    tones.sort_by(|a, b| b.mag.total_cmp(&a.mag));
    tones.truncate(n);
    tones.sort_by(|a, b| a.freq.total_cmp(&b.freq));
    tones
}
