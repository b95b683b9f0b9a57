//! Property-based tests for amp-dsp primitives.
//!
//! Ring round-trips, clip continuity/monotonicity/bounds and block-size
//! independence of the stateful filters and reverberators.

use amp_dsp::{ClipCurve, ClipShape, Lowpass, Moog, Reverberator, Ring};
use proptest::prelude::*;

fn curve(i: usize) -> ClipCurve {
    match i % 5 {
        0 => ClipCurve::Hard,
        1 => ClipCurve::Line,
        2 => ClipCurve::Poly,
        3 => ClipCurve::Root,
        _ => ClipCurve::Log,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Writing `len` values and reading `get(k)` returns them newest first.
    #[test]
    fn ring_reads_back_in_reverse_write_order(
        values in prop::collection::vec(-1.0f32..1.0, 1..64),
    ) {
        let mut ring = Ring::new(values.len());
        for &v in &values {
            ring.put(v);
        }
        for (k, &v) in values.iter().rev().enumerate() {
            prop_assert_eq!(ring.get(k), v);
        }
        prop_assert_eq!(ring.last(), values[0]);
    }

    /// Inside the linear region every curve is the identity.
    #[test]
    fn clip_identity_below_threshold(
        variant in 0usize..5,
        sat in 0.05f32..1.0,
        extra in 0.0f32..1.0,
        frac in -1.0f32..=1.0,
    ) {
        let clip = ClipShape::symmetric(curve(variant), sat, sat + extra);
        let x = frac * sat;
        prop_assert_eq!(clip.process(x), x);
    }

    /// Output is non-decreasing and stays within `[maxlo, maxhi]`.
    #[test]
    fn clip_monotonic_and_bounded(
        variant in 0usize..5,
        sat in 0.05f32..1.0,
        extra in 0.0f32..1.0,
        a in -10.0f32..10.0,
        b in -10.0f32..10.0,
    ) {
        let max = sat + extra;
        let clip = ClipShape::symmetric(curve(variant), sat, max);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (ylo, yhi) = (clip.process(lo), clip.process(hi));
        prop_assert!(ylo <= yhi + 1e-6, "{:?}: f({lo})={ylo} > f({hi})={yhi}", curve(variant));
        prop_assert!(yhi <= max + 1e-5 && ylo >= -max - 1e-5);
    }

    /// Splitting a signal into blocks never changes a filter's output.
    #[test]
    fn filters_are_block_size_independent(
        input in prop::collection::vec(-1.0f32..1.0, 1..256),
        split in 1usize..64,
    ) {
        let mut whole = Moog::new(800.0, 1.5, 48000.0);
        let expected: Vec<f32> = input.iter().map(|&x| whole.process(x)).collect();

        let mut parts = Moog::new(800.0, 1.5, 48000.0);
        let mut got = Vec::with_capacity(input.len());
        for chunk in input.chunks(split) {
            got.extend(chunk.iter().map(|&x| parts.process(x)));
        }
        prop_assert_eq!(got, expected);
    }

    /// The same holds for reverberator taps, which carry ring and filter state.
    #[test]
    fn reverb_is_block_size_independent(
        input in prop::collection::vec(-1.0f32..1.0, 1..256),
        split in 1usize..64,
        len in 2usize..40,
    ) {
        let run = |chunks: usize| {
            let mut r = Reverberator::new(len);
            r.set_lowpass(2000.0, 48000.0);
            let mut out = Vec::new();
            for chunk in input.chunks(chunks) {
                for &x in chunk {
                    out.push(r.lpcf(x, 0.6));
                }
            }
            out
        };
        prop_assert_eq!(run(input.len()), run(split));
    }

    /// Below a quarter of the rate the lowpass never overshoots its input.
    #[test]
    fn lowpass_is_stable(
        freq in 20.0f32..12000.0,
        input in prop::array::uniform32(-1.0f32..=1.0),
    ) {
        let mut lp = Lowpass::new(freq, 48000.0);
        for &x in &input {
            let y = lp.process(x);
            prop_assert!(y.is_finite() && y.abs() <= 1.0 + 1e-4);
        }
    }
}
