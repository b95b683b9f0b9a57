//! Segmented sample store for recorders and loopers.
//!
//! A [`Track`] is an unbounded sample array indexed by absolute position.
//! Storage is split into [`SEGMENT_LEN`]-sample segments kept in an ordered
//! map; a segment is allocated (zeroed) the first time any sample in it is
//! written and is never freed until the track is. Reading a region that was
//! never written yields silence.
//!
//! ```rust
//! use amp_core::Track;
//!
//! let mut track = Track::new();
//! track.write(&[0.5; 10], 4090);
//! let mut buf = [1.0; 12];
//! track.read(&mut buf, 4088);
//! assert_eq!(buf[..2], [0.0, 0.0]);
//! assert_eq!(buf[2..], [0.5; 10]);
//! assert_eq!(track.segments(), 2);
//! ```

use std::collections::BTreeMap;

/// Samples per segment.
pub const SEGMENT_LEN: usize = 4096;

/// Lazily allocated, segmented sample storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    segments: BTreeMap<i64, Box<[f32; SEGMENT_LEN]>>,
}

fn split(idx: i64) -> (i64, usize) {
    let seg = SEGMENT_LEN as i64;
    (idx.div_euclid(seg), idx.rem_euclid(seg) as usize)
}

impl Track {
    /// Creates an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated segments.
    pub fn segments(&self) -> usize {
        self.segments.len()
    }

    /// Copies `buf.len()` samples starting at `idx` into `buf`.
    ///
    /// Unwritten regions read as zero.
    pub fn read(&self, buf: &mut [f32], idx: i64) {
        let mut done = 0;
        while done < buf.len() {
            let (seg, off) = split(idx + done as i64);
            let n = (SEGMENT_LEN - off).min(buf.len() - done);
            let out = &mut buf[done..done + n];
            match self.segments.get(&seg) {
                Some(data) => out.copy_from_slice(&data[off..off + n]),
                None => out.fill(0.0),
            }
            done += n;
        }
    }

    /// Stores `buf` starting at `idx`, allocating segments as needed.
    pub fn write(&mut self, buf: &[f32], idx: i64) {
        let mut done = 0;
        while done < buf.len() {
            let (seg, off) = split(idx + done as i64);
            let n = (SEGMENT_LEN - off).min(buf.len() - done);
            let data = self
                .segments
                .entry(seg)
                .or_insert_with(|| Box::new([0.0; SEGMENT_LEN]));
            data[off..off + n].copy_from_slice(&buf[done..done + n]);
            done += n;
        }
    }

    /// Sample at `idx`.
    pub fn get(&self, idx: i64) -> f32 {
        let (seg, off) = split(idx);
        self.segments.get(&seg).map_or(0.0, |d| d[off])
    }

    /// Stores one sample at `idx`.
    pub fn set(&mut self, idx: i64, v: f32) {
        self.write(&[v], idx);
    }

    /// Frees every segment.
    pub fn clear(&mut self) {
        self.segments.clear();
    }
}
