//! Sample-rate conversion for decoded buffers.
//!
//! Buffers handed to the graph are converted once, when they are loaded, to
//! the engine's sample rate. Conversion is nearest-neighbour: cheap, and the
//! rates involved are normally identical or close.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use libm::{ceil, roundf};

/// Length of a `len`-sample buffer after conversion from `inrate` to `outrate`.
///
/// Rounds up, so no input sample is lost.
///
/// ```rust
/// assert_eq!(amp_dsp::rerate(100, 48000, 44100), 109);
/// assert_eq!(amp_dsp::rerate(100, 44100, 44100), 100);
/// ```
pub fn rerate(len: usize, outrate: u32, inrate: u32) -> usize {
    ceil(len as f64 * f64::from(outrate) / f64::from(inrate)) as usize
}

/// Converts `input` from `inrate` to `outrate` by nearest-index lookup.
///
/// Output positions whose source index falls past the end are zero.
pub fn resample_nearest(input: &[f32], inrate: u32, outrate: u32) -> Vec<f32> {
    if inrate == outrate {
        return input.to_vec();
    }
    let len = rerate(input.len(), outrate, inrate);
    let ratio = inrate as f32 / outrate as f32;
    (0..len)
        .map(|i| {
            let idx = roundf(ratio * i as f32) as usize;
            input.get(idx).copied().unwrap_or(0.0)
        })
        .collect()
}
