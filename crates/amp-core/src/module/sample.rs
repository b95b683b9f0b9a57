//! Sample playback modules.
//!
//! Both players hold [`SampleBuf`]s shared with the provider they were
//! loaded from and with any copies of the player. Buffers are organized in
//! velocity layers, each holding one or more round-robin alternatives that
//! are cycled through on successive hits.

use crate::event::Event;
use crate::info::Info;
use crate::provider::SampleBuf;
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;

/// Number of keys a [`Piano`] maps.
pub const PIANO_KEYS: usize = 128;

/// Simultaneous voices of a [`Piano`].
pub const PIANO_VOICES: usize = 24;

/// Per-sample gain multiplier applied to a released piano voice.
pub const PIANO_RELEASE: f32 = 0.9998;

/// Piano voices quieter than this are stopped.
const PIANO_SILENCE: f32 = 0.001;

/// Round-robin alternatives for one velocity layer.
#[derive(Debug, Clone, Default)]
struct Layer {
    bufs: Vec<SampleBuf>,
    rr: usize,
}

impl Layer {
    fn new(bufs: Vec<SampleBuf>) -> Self {
        Self { bufs, rr: 0 }
    }

    /// The next buffer in rotation.
    fn advance(&mut self) -> Option<SampleBuf> {
        let buf = self.bufs.get(self.rr)?.clone();
        self.rr = (self.rr + 1) % self.bufs.len();
        Some(buf)
    }
}

/// A buffer being played back.
#[derive(Debug, Clone)]
struct Play {
    buf: SampleBuf,
    idx: usize,
    vol: f32,
}

impl Play {
    fn new(buf: SampleBuf) -> Self {
        Self {
            buf,
            idx: 0,
            vol: 1.0,
        }
    }

    fn is_done(&self) -> bool {
        self.idx >= self.buf.len()
    }
}

/// One-shot sample player with velocity layers.
///
/// Every event with a nonzero value starts the next play slot at full
/// volume, picking the layer by velocity. Starting a slot also turns the
/// previous slot into a decaying tail: its volume is multiplied by `decay`
/// once and then on every sample.
#[derive(Debug, Clone)]
pub struct Sample {
    dev: Option<u16>,
    decay: f32,
    layers: Vec<Layer>,
    plays: Vec<Option<Play>>,
    cur: usize,
}

impl Sample {
    /// Creates a player with `n` play slots.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn new(n: usize, decay: f32) -> Self {
        assert!(n > 0, "a sample player needs at least one play slot");
        Self {
            dev: None,
            decay,
            layers: Vec::new(),
            plays: vec![None; n],
            cur: 0,
        }
    }

    /// Restricts triggering to events from `dev`.
    pub fn with_dev(mut self, dev: u16) -> Self {
        self.dev = Some(dev);
        self
    }

    /// Adds a velocity layer above the existing ones.
    pub fn add_layer(&mut self, bufs: Vec<SampleBuf>) {
        self.layers.push(Layer::new(bufs));
    }

    /// Number of velocity layers.
    pub fn layers(&self) -> usize {
        self.layers.len()
    }

    fn trigger(&mut self, event: &Event) {
        if event.val == 0 || self.layers.is_empty() || self.dev.is_some_and(|d| d != event.dev) {
            return;
        }
        let n = self.layers.len();
        let layer = ((event.velocity() * n as f32) as usize).min(n - 1);
        let Some(buf) = self.layers[layer].advance() else {
            return;
        };
        let slots = self.plays.len();
        if let Some(prev) = &mut self.plays[(self.cur + slots - 1) % slots] {
            prev.vol *= self.decay;
        }
        self.plays[self.cur] = Some(Play::new(buf));
        self.cur = (self.cur + 1) % slots;
    }

    /// Ignores pulses; triggering comes from the queue.
    pub fn info(&mut self, _info: &mut Info<'_>) {}

    /// Renders every playing slot. Continues while any slot has samples left.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        for (i, out) in buf.iter_mut().enumerate() {
            for a in queue.at(i) {
                self.trigger(&a.event);
            }
            let mut v = 0.0;
            for play in self.plays.iter_mut().flatten() {
                if play.is_done() {
                    continue;
                }
                v += play.vol * play.buf.get(play.idx);
                play.idx += 1;
                if play.vol < 1.0 {
                    play.vol *= self.decay;
                }
            }
            *out = v;
        }
        self.plays.iter().flatten().any(|p| !p.is_done())
    }
}

#[derive(Debug, Clone, Default)]
struct PianoKey {
    layers: Vec<Layer>,
}

#[derive(Debug, Clone)]
struct PianoVoice {
    play: Play,
    key: u16,
    mul: f32,
}

/// Per-key sampled instrument.
///
/// Each of the [`PIANO_KEYS`] keys has its own velocity layers. A note-on
/// takes the quietest of the [`PIANO_VOICES`] voices; a note-off lets the
/// key's voice ring out, multiplying its gain by [`PIANO_RELEASE`] per
/// sample until it falls silent.
#[derive(Debug, Clone)]
pub struct Piano {
    dev: u16,
    keys: Vec<PianoKey>,
    voices: Vec<Option<PianoVoice>>,
}

impl Piano {
    /// Creates a piano listening to `dev`, with no samples mapped.
    pub fn new(dev: u16) -> Self {
        Self {
            dev,
            keys: vec![PianoKey::default(); PIANO_KEYS],
            voices: vec![None; PIANO_VOICES],
        }
    }

    /// Adds a velocity layer to `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not below [`PIANO_KEYS`].
    pub fn add_layer(&mut self, key: u16, bufs: Vec<SampleBuf>) {
        self.keys[usize::from(key)].layers.push(Layer::new(bufs));
    }

    /// Number of velocity layers mapped to `key`.
    pub fn layers(&self, key: u16) -> usize {
        self.keys.get(usize::from(key)).map_or(0, |k| k.layers.len())
    }

    /// Number of voices currently sounding.
    pub fn active(&self) -> usize {
        self.voices.iter().flatten().count()
    }

    fn trigger(&mut self, event: &Event) {
        if event.dev != self.dev {
            return;
        }
        let Some(key) = self.keys.get_mut(usize::from(event.key)) else {
            return;
        };
        let n = key.layers.len();
        if n == 0 {
            return;
        }
        if event.val == 0 {
            for voice in self.voices.iter_mut().flatten() {
                if voice.key == event.key && voice.mul == 1.0 {
                    voice.mul = PIANO_RELEASE;
                }
            }
            return;
        }
        let layer = (usize::from(event.val) / ((usize::from(u16::MAX) + n) / n)).min(n - 1);
        let Some(buf) = key.layers[layer].advance() else {
            return;
        };
        let slot = self
            .voices
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| vol(a.as_ref()).total_cmp(&vol(b.as_ref())))
            .map_or(0, |(i, _)| i);
        if let Some(old) = &self.voices[slot] {
            tracing::trace!(key = old.key, voice = slot, "stealing piano voice");
        }
        self.voices[slot] = Some(PianoVoice {
            play: Play::new(buf),
            key: event.key,
            mul: 1.0,
        });
    }

    /// Ignores pulses; notes come from the queue.
    pub fn info(&mut self, _info: &mut Info<'_>) {}

    /// Renders every sounding voice. Continues while any voice sounds.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        for (i, out) in buf.iter_mut().enumerate() {
            for a in queue.at(i) {
                self.trigger(&a.event);
            }
            let mut v = 0.0;
            for slot in &mut self.voices {
                let Some(voice) = slot.as_mut() else { continue };
                v += voice.play.vol * voice.play.buf.get(voice.play.idx);
                voice.play.idx += 1;
                voice.play.vol *= voice.mul;
                if voice.play.is_done() || voice.play.vol < PIANO_SILENCE {
                    *slot = None;
                }
            }
            *out = v;
        }
        self.active() > 0
    }
}

fn vol(voice: Option<&PianoVoice>) -> f32 {
    voice.map_or(0.0, |v| v.play.vol)
}
