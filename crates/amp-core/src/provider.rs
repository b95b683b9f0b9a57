//! Decoded sample buffers and where they come from.
//!
//! Sample-playback nodes never read files. They are handed [`SampleBuf`]s,
//! immutable reference-counted PCM buffers, by a [`BufferProvider`] when they
//! are built. Several playback nodes (and copies of them) may share one
//! buffer; it is released when the last holder is dropped.
//!
//! [`MemoryProvider`] is a registry of buffers already in memory, keyed by
//! path and channel. Loading from disk is left to the embedding application,
//! which registers what it decodes.

use std::collections::HashMap;
use std::sync::Arc;

use amp_dsp::resample_nearest;
use thiserror::Error;

/// Errors reported by a [`BufferProvider`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Nothing is registered under the path.
    #[error("sample buffer not found: {path} (channel {channel})")]
    NotFound {
        /// Requested path.
        path: String,
        /// Requested channel.
        channel: usize,
    },
    /// The path exists but has no such channel.
    #[error("{path} has {available} channel(s), channel {channel} requested")]
    InvalidChannel {
        /// Requested path.
        path: String,
        /// Requested channel.
        channel: usize,
        /// Channels available.
        available: usize,
    },
    /// The source cannot be decoded by this provider.
    #[error("unsupported sample source: {0}")]
    Unsupported(String),
}

/// An immutable, shared PCM buffer.
///
/// Cloning is cheap and shares the samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuf {
    data: Arc<[f32]>,
}

impl SampleBuf {
    /// Takes ownership of `samples`.
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            data: samples.into(),
        }
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the buffer holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The samples.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    /// Sample at `idx`, or 0 past the end.
    #[inline]
    pub fn get(&self, idx: usize) -> f32 {
        self.data.get(idx).copied().unwrap_or(0.0)
    }

    /// Number of holders sharing this buffer.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.data)
    }
}

impl From<Vec<f32>> for SampleBuf {
    fn from(samples: Vec<f32>) -> Self {
        Self::new(samples)
    }
}

/// A source of decoded sample buffers.
pub trait BufferProvider {
    /// Returns channel `channel` of `path` at sample rate `rate`.
    fn load(&self, path: &str, channel: usize, rate: u32) -> Result<SampleBuf, ProviderError>;
}

#[derive(Debug, Clone)]
struct Entry {
    rate: u32,
    channels: Vec<SampleBuf>,
}

/// In-memory buffer registry.
///
/// Buffers are converted to the requested rate on load and the converted
/// copies are not cached; the registered originals are shared.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    entries: HashMap<String, Entry>,
}

impl MemoryProvider {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the channels of `path`, recorded at `rate`.
    pub fn insert(&mut self, path: impl Into<String>, rate: u32, channels: Vec<Vec<f32>>) {
        let path = path.into();
        tracing::debug!(%path, rate, channels = channels.len(), "registering sample buffer");
        self.entries.insert(
            path,
            Entry {
                rate,
                channels: channels.into_iter().map(SampleBuf::new).collect(),
            },
        );
    }

    /// True if `path` is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }
}

impl BufferProvider for MemoryProvider {
    fn load(&self, path: &str, channel: usize, rate: u32) -> Result<SampleBuf, ProviderError> {
        let entry = self.entries.get(path).ok_or_else(|| ProviderError::NotFound {
            path: path.to_owned(),
            channel,
        })?;
        let buf = entry
            .channels
            .get(channel)
            .ok_or_else(|| ProviderError::InvalidChannel {
                path: path.to_owned(),
                channel,
                available: entry.channels.len(),
            })?;
        tracing::debug!(path, channel, rate, "loading sample buffer");
        if entry.rate == rate {
            Ok(buf.clone())
        } else {
            Ok(SampleBuf::new(resample_nearest(
                buf.samples(),
                entry.rate,
                rate,
            )))
        }
    }
}
