//! Loop recorder with overdubbed playback heads.
//!
//! A recording starts when an event addressed to the record id arrives with
//! a non-zero value, and stops on a zero value or when the track is full.
//! The position of the start, wrapped by the loop modulus, marks the loop
//! boundary. Every time the wrapped timeline crosses that boundary a new
//! playback head starts at the beginning of the recording, so a recording
//! longer than the loop overlaps itself. Heads are kept newest first in a
//! ring of [`LOOPER_HEADS`] slots; the oldest is overwritten.

use crate::event::Id;
use crate::info::Info;
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;
use crate::track::Track;

/// Number of concurrent playback heads.
pub const LOOPER_HEADS: usize = 16;

/// Records its input and plays it back over itself at the loop boundary.
#[derive(Debug, Clone)]
pub struct Looper {
    track: Track,
    len: usize,
    rec: Id,
    modulo: Time,
    on: bool,
    wr: usize,
    off: Option<Time>,
    sel: usize,
    rd: [Option<usize>; LOOPER_HEADS],
}

impl Looper {
    /// Creates a looper holding at most `len` samples.
    ///
    /// `modulo` is the loop length on the timeline (see [`Time::modulo`]);
    /// `rec` addresses the record trigger.
    pub fn new(len: usize, modulo: Time, rec: Id) -> Self {
        Self {
            track: Track::new(),
            len,
            rec,
            modulo,
            on: false,
            wr: 0,
            off: None,
            sel: 0,
            rd: [None; LOOPER_HEADS],
        }
    }

    /// True while recording.
    pub fn is_recording(&self) -> bool {
        self.on
    }

    /// Number of samples recorded.
    pub fn recorded(&self) -> usize {
        self.wr
    }

    /// Number of heads still playing.
    pub fn playing(&self) -> usize {
        self.rd
            .iter()
            .filter(|r| matches!(r, Some(p) if *p < self.wr))
            .count()
    }

    /// Ignores pulses; the trigger is read from the queue.
    pub fn info(&mut self, _info: &mut Info<'_>) {}

    /// Records and overdubs in place. Never asks to continue.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let mut left = time[0].modulo(&self.modulo);
        for (i, x) in buf.iter_mut().enumerate() {
            let right = time[i + 1].modulo(&self.modulo);
            let trigger = queue
                .at(i)
                .iter()
                .find(|a| self.rec.matches(&a.event))
                .map(|a| a.event.val);

            match trigger {
                Some(val) if val > 0 => {
                    tracing::debug!(sample = i, "looper recording");
                    self.on = true;
                    self.wr = 0;
                    self.off = Some(left);
                    self.sel = 0;
                    self.rd = [None; LOOPER_HEADS];
                }
                Some(_) => {
                    tracing::debug!(sample = i, recorded = self.wr, "looper stopped");
                    self.on = false;
                }
                None => {
                    let crossed = matches!(&self.off, Some(off) if off.between(&left, &right));
                    if !left.is_equal(&right) && crossed && self.wr > 0 {
                        self.sel = (self.sel + LOOPER_HEADS - 1) % LOOPER_HEADS;
                        self.rd[self.sel] = Some(0);
                    }
                }
            }

            if self.on {
                if self.wr < self.len {
                    self.track.set(self.wr as i64, *x);
                    self.wr += 1;
                } else {
                    self.on = false;
                }
            }

            for j in 0..LOOPER_HEADS {
                let idx = (j + self.sel) % LOOPER_HEADS;
                match self.rd[idx] {
                    Some(pos) if pos < self.wr => {
                        *x += self.track.get(pos as i64);
                        self.rd[idx] = Some(pos + 1);
                    }
                    _ => break,
                }
            }

            left = right;
        }
        false
    }
}
