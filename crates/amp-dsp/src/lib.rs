//! amp DSP - numeric building blocks for the amp node graph
//!
//! This crate holds the stateless and stateful per-sample primitives that the
//! leaf nodes of `amp-core` are built from. Nothing in here knows about the
//! node graph, events or timing: every type is a plain struct with `new` /
//! `process` / `reset` methods, and every function is pure.
//!
//! # Contents
//!
//! ## Delay lines
//!
//! - [`Ring`] - Fixed-capacity circular buffer with integer, linear and
//!   all-pass fractional reads
//! - [`FracState`] - State carried by the all-pass fractional read
//!
//! ## Filters
//!
//! - [`Lowpass`] / [`Highpass`] - One-pole trapezoidal filters
//! - [`Bandpass`] - Highpass into lowpass cascade (two state variables)
//! - [`Bandpass2`] - Resonant two-pole band-pass
//! - [`Moog`] - Four-stage ladder with resonance feedback
//!
//! ## Reverberators
//!
//! - [`Reverberator`] - Ring-backed delay, all-pass, comb, low/band-pass comb
//!   and their varying (fractional delay) versions
//!
//! ## Dynamics & Analysis
//!
//! - [`VolumeTracker`] - Smoothed absolute-value follower
//! - [`Compressor`] - Threshold/ratio compressor with attack and release
//! - [`fft`] - Magnitude/phase transforms and windows (requires `std`)
//!
//! ## Nonlinearities
//!
//! - [`ClipCurve`] / [`ClipShape`] - Hard, line, quadratic, root and log saturation
//! - [`crush`], [`expcrush`], [`wrap`] - Quantizers and folding
//!
//! ## Oscillator math
//!
//! - [`osc`] - Phase stepping, waveforms and phase warping
//!
//! # no_std Support
//!
//! Disable the default `std` feature to use the crate on targets without an
//! allocator-backed standard library. The [`fft`] module is only available
//! with `std`.
//!
//! ```toml
//! [dependencies]
//! amp-dsp = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod clip;
pub mod comp;
#[cfg(feature = "std")]
pub mod fft;
pub mod filter;
pub mod math;
pub mod osc;
pub mod resample;
pub mod reverb;
pub mod ring;
pub mod vol;

pub use clip::{ClipCurve, ClipShape, crush, expcrush, wrap};
pub use comp::Compressor;
pub use filter::{Bandpass, Bandpass2, Highpass, Lowpass, Moog};
pub use math::{
    amp_to_db, clamp, db_to_amp, decay, flush_denormal, modulo, modulo_i, wet_dry_mix,
};
pub use resample::{rerate, resample_nearest};
pub use reverb::Reverberator;
pub use ring::{FracState, Ring};
pub use vol::VolumeTracker;
