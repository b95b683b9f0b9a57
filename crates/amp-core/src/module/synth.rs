//! Polyphonic voice pool.

use super::Module;
use crate::info::{Info, Note};
use crate::key::key_freq;
use crate::queue::{Action, Queue};
use crate::scratch::{check_block, scratch};
use crate::time::Time;

#[derive(Debug, Clone)]
struct Voice {
    module: Module,
    key: Option<u16>,
    pos: usize,
}

/// A fixed pool of copies of one voice module, played by queued actions.
///
/// Each action from the synth's device (and key, unless listening to all
/// keys) goes to the voice already holding that key, or to a free voice. The
/// voice is rendered up to the action's sample before it receives the note,
/// so notes start sample-accurately inside the block. Each rendered stretch
/// sees only the actions due inside it, with delays counted from its first
/// sample. A voice is freed when
/// its module stops continuing. Actions with no voice available are dropped.
///
/// ```rust
/// use amp_core::{Adsr, Event, Module, Queue, Synth, Time};
///
/// let voice = Module::from(Adsr::new(0.0, 1.0, 0.001, 0.1, 0.5, 0.1, 48000.0));
/// let mut synth = Synth::new(0, 0, 4, voice);
///
/// let mut queue = Queue::new();
/// queue.add(8, Event::new(0, 60, 65535));
/// let mut buf = [0.0; 16];
/// assert!(synth.process(&mut buf, &[Time::default(); 17], &mut queue));
/// assert!(buf[..8].iter().all(|&x| x == 0.0));
/// assert!(buf[8] > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Synth {
    dev: u16,
    key: u16,
    voices: Vec<Voice>,
    pending: Vec<Action>,
    window: Queue,
    tmp: Vec<f32>,
}

impl Synth {
    /// Creates a pool of `n` copies of `module`.
    ///
    /// `key == 0` listens to every key of `dev`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    pub fn new(dev: u16, key: u16, n: usize, module: Module) -> Self {
        assert!(n > 0, "a synth needs at least one voice");
        let voices = (0..n)
            .map(|_| Voice {
                module: module.clone(),
                key: None,
                pos: 0,
            })
            .collect();
        Self {
            dev,
            key,
            voices,
            pending: Vec::new(),
            window: Queue::new(),
            tmp: Vec::new(),
        }
    }

    /// Number of voices.
    pub fn voices(&self) -> usize {
        self.voices.len()
    }

    /// Number of voices currently sounding.
    pub fn active(&self) -> usize {
        self.voices.iter().filter(|v| v.key.is_some()).count()
    }

    fn accepts(&self, action: &Action) -> bool {
        action.event.dev == self.dev && (self.key == 0 || action.event.key == self.key)
    }

    /// Forwards lifecycle pulses to every voice.
    ///
    /// Notes are generated from the queue, so actions and notes from outside
    /// are not forwarded.
    pub fn info(&mut self, info: &mut Info<'_>) {
        if matches!(info, Info::Action(_) | Info::Note(_)) {
            return;
        }
        for v in &mut self.voices {
            v.module.info(info);
        }
    }

    /// Renders every sounding voice into `buf`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let len = buf.len();
        buf.fill(0.0);
        self.pending.clear();
        for a in queue.actions() {
            if a.delay < len && self.accepts(a) {
                self.pending.push(*a);
            }
        }
        for v in &mut self.voices {
            v.pos = 0;
        }
        let tmp = scratch(&mut self.tmp, len);
        let window = &mut self.window;

        for a in &self.pending {
            let key = a.event.key;
            let (idx, init) = match self.voices.iter().position(|v| v.key == Some(key)) {
                Some(i) => (i, false),
                None => match self.voices.iter().position(|v| v.key.is_none()) {
                    Some(i) => (i, true),
                    None => {
                        tracing::trace!(key, "no free voice, dropping note");
                        continue;
                    }
                },
            };
            let voice = &mut self.voices[idx];
            if init {
                tracing::trace!(key, voice = idx, "voice allocated");
            } else {
                render(voice, a.delay, buf, tmp, time, queue, window);
            }
            voice.key = Some(key);
            voice.pos = a.delay;
            let note = Note {
                init,
                delay: a.delay,
                key,
                freq: key_freq(key),
                vel: a.event.velocity(),
            };
            voice.module.info(&mut Info::Note(&note));
        }

        let mut cont = false;
        for voice in &mut self.voices {
            if voice.key.is_some() {
                render(voice, len, buf, tmp, time, queue, window);
                cont |= voice.key.is_some();
            }
        }
        cont
    }
}

/// Renders `voice` from its position up to `end`, adding into `buf`.
fn render(
    voice: &mut Voice,
    end: usize,
    buf: &mut [f32],
    tmp: &mut [f32],
    time: &[Time],
    queue: &Queue,
    window: &mut Queue,
) {
    let start = voice.pos;
    if start >= end || voice.key.is_none() {
        return;
    }
    window.copy_window(queue, start, end);
    let out = &mut tmp[start..end];
    let cont = voice.module.process(out, &time[start..=end], window);
    for (b, &x) in buf[start..end].iter_mut().zip(out.iter()) {
        *b += x;
    }
    voice.pos = end;
    if !cont {
        tracing::trace!(key = ?voice.key, "voice released");
        voice.key = None;
    }
}
