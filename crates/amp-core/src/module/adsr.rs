//! Exponential attack/decay/sustain/release envelope.
//!
//! The envelope works in the multiplicative domain with a floor of `0.01`:
//! every stage multiplies the level by a per-sample factor until it reaches
//! its target, then the target moves to the next stage. The output is the
//! level minus the floor, so silence is exactly zero.
//!
//! ```text
//! attack   0.01 -> peak          factor 100^(1 / (atk * rate))
//! decay    peak -> peak * sus    factor sus^(1 / (decay * rate))
//! release  level -> 0.01         factor (0.01 / sus)^(1 / (rel * rate))
//! ```
//!
//! A note with `vel > 0` sets the peak to `min + (max - min) * vel`; a note
//! with `vel == 0` releases.

use crate::info::Info;
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;

const FLOOR: f64 = 0.01;

/// Note-driven envelope generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    min: f64,
    max: f64,
    sus: f64,
    atk: f64,
    decay: f64,
    rel: f64,
    released: bool,
    v: f64,
    target: [f64; 2],
}

impl Adsr {
    /// Creates an envelope.
    ///
    /// # Arguments
    ///
    /// * `min`, `max` - Peak level at velocity 0 and 1
    /// * `atk`, `decay`, `rel` - Stage times in seconds
    /// * `sus` - Sustain as a fraction of the peak, floored at 0.01
    /// * `rate` - Sample rate
    pub fn new(min: f64, max: f64, atk: f64, decay: f64, sus: f64, rel: f64, rate: f64) -> Self {
        let sus = sus.max(FLOOR);
        let rel_target = if sus == FLOOR { FLOOR } else { FLOOR / sus };
        Self {
            min,
            max,
            sus,
            atk: 100f64.powf(1.0 / (atk * rate)),
            decay: sus.powf(1.0 / (decay * rate)),
            rel: rel_target.powf(1.0 / (rel * rate)),
            released: false,
            v: FLOOR,
            target: [FLOOR; 2],
        }
    }

    /// Current output level.
    pub fn level(&self) -> f32 {
        (self.v - FLOOR) as f32
    }

    /// Starts or releases on notes.
    pub fn info(&mut self, info: &mut Info<'_>) {
        if let Info::Note(note) = info {
            let vel = if note.vel > 0.0 {
                self.released = false;
                self.min + (self.max - self.min) * f64::from(note.vel)
            } else {
                self.released = true;
                0.0
            };
            self.target = [vel.max(FLOOR), (vel * self.sus).max(FLOOR)];
        }
    }

    /// Renders the envelope. Continues while above the floor.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], _queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let mut v = self.v;
        for x in buf.iter_mut() {
            if v < self.target[0] {
                v *= self.atk;
                if v >= self.target[0] {
                    v = self.target[0];
                    self.target[0] = self.target[1];
                }
            } else if v > self.target[0] {
                v *= if self.released { self.rel } else { self.decay };
                if v <= self.target[0] {
                    v = self.target[0];
                    self.target[0] = self.target[1];
                }
            }
            *x = (v - FLOOR) as f32;
        }
        self.v = v;
        v > FLOOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::Note;

    fn times(len: usize) -> Vec<Time> {
        vec![Time::default(); len + 1]
    }

    fn note(vel: f32) -> Note {
        Note {
            init: vel > 0.0,
            vel,
            ..Note::default()
        }
    }

    #[test]
    fn idle_envelope_is_silent() {
        let mut env = Adsr::new(0.0, 1.0, 0.01, 0.1, 0.5, 0.1, 1000.0);
        let mut buf = [1.0; 16];
        assert!(!env.process(&mut buf, &times(16), &mut Queue::new()));
        assert_eq!(buf, [0.0; 16]);
    }

    #[test]
    fn stages_reach_peak_sustain_and_floor() {
        let rate = 1000.0;
        let mut env = Adsr::new(0.0, 1.0, 0.01, 0.1, 0.5, 0.1, rate);
        env.info(&mut Info::Note(&note(1.0)));

        // Attack takes 10 samples to climb from 0.01 to 1.
        let mut buf = vec![0.0; 10];
        assert!(env.process(&mut buf, &times(10), &mut Queue::new()));
        assert!((env.level() - 0.99).abs() < 1e-6);
        assert!(buf.windows(2).all(|w| w[0] <= w[1]));

        // Decay settles on the sustain level.
        let mut buf = vec![0.0; 200];
        env.process(&mut buf, &times(200), &mut Queue::new());
        assert!((env.level() - 0.49).abs() < 1e-6);

        // Release falls back to silence and stops.
        env.info(&mut Info::Note(&note(0.0)));
        let mut buf = vec![0.0; 200];
        assert!(!env.process(&mut buf, &times(200), &mut Queue::new()));
        assert_eq!(env.level(), 0.0);
        assert!(buf.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn velocity_scales_peak() {
        let mut env = Adsr::new(0.5, 1.0, 0.01, 0.1, 1.0, 0.1, 1000.0);
        env.info(&mut Info::Note(&note(0.5)));
        let mut buf = vec![0.0; 50];
        env.process(&mut buf, &times(50), &mut Queue::new());
        assert!((env.level() - 0.74).abs() < 1e-6);
    }
}
