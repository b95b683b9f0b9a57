//! Instrument containers.

use super::{Instr, check_stereo};
use crate::info::Info;
use crate::queue::Queue;
use crate::scratch::scratch;
use crate::time::Time;

/// Instruments rendered side by side and summed.
///
/// Every child starts from a copy of the incoming channels, so no child
/// hears another's output.
#[derive(Debug, Clone, Default)]
pub struct Mixer {
    children: Vec<Instr>,
    input: [Vec<f32>; 2],
    output: [Vec<f32>; 2],
}

impl Mixer {
    /// Creates an empty mixer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `instr` at the end.
    pub fn append(&mut self, instr: Instr) {
        self.children.push(instr);
    }

    /// Adds `instr` at the front.
    pub fn prepend(&mut self, instr: Instr) {
        self.children.insert(0, instr);
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the mixer has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Forwards a pulse to every child.
    pub fn info(&mut self, info: &mut Info<'_>) {
        for child in &mut self.children {
            child.info(info);
        }
    }

    /// Sums the children's output into the channels.
    pub fn process(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        time: &[Time],
        queue: &mut Queue,
    ) -> bool {
        check_stereo(left.len(), right.len(), time.len());
        let len = left.len();
        let [in_l, in_r] = &mut self.input;
        let in_l = scratch(in_l, len);
        let in_r = scratch(in_r, len);
        in_l.copy_from_slice(left);
        in_r.copy_from_slice(right);
        let [out_l, out_r] = &mut self.output;
        let out_l = scratch(out_l, len);
        let out_r = scratch(out_r, len);
        out_l.fill(0.0);
        out_r.fill(0.0);

        let mut cont = false;
        for child in &mut self.children {
            left.copy_from_slice(in_l);
            right.copy_from_slice(in_r);
            cont |= child.process(left, right, time, queue);
            for (o, x) in out_l.iter_mut().zip(left.iter()) {
                *o += x;
            }
            for (o, x) in out_r.iter_mut().zip(right.iter()) {
                *o += x;
            }
        }
        left.copy_from_slice(out_l);
        right.copy_from_slice(out_r);
        cont
    }
}

impl FromIterator<Instr> for Mixer {
    fn from_iter<I: IntoIterator<Item = Instr>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// Instruments run one after another on the same channels.
#[derive(Debug, Clone, Default)]
pub struct Series {
    children: Vec<Instr>,
}

impl Series {
    /// Creates an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `instr` at the end.
    pub fn append(&mut self, instr: Instr) {
        self.children.push(instr);
    }

    /// Adds `instr` at the front.
    pub fn prepend(&mut self, instr: Instr) {
        self.children.insert(0, instr);
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the series has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Forwards a pulse to every child.
    pub fn info(&mut self, info: &mut Info<'_>) {
        for child in &mut self.children {
            child.info(info);
        }
    }

    /// Runs every child in order.
    pub fn process(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
        time: &[Time],
        queue: &mut Queue,
    ) -> bool {
        check_stereo(left.len(), right.len(), time.len());
        let mut cont = false;
        for child in &mut self.children {
            cont |= child.process(left, right, time, queue);
        }
        cont
    }
}

impl FromIterator<Instr> for Series {
    fn from_iter<I: IntoIterator<Item = Instr>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Bias, Gain};
    use crate::instr::Single;

    fn times(len: usize) -> Vec<Time> {
        vec![Time::default(); len + 1]
    }

    #[test]
    fn mixer_children_hear_the_same_input() {
        let mut m = Mixer::new();
        m.append(Single::new(0, Gain::new(2.0.into()).into()).into());
        m.append(Single::new(1, Bias::new(1.0.into()).into()).into());
        let mut l = [1.0; 3];
        let mut r = [0.5; 3];
        m.process(&mut l, &mut r, &times(3), &mut Queue::new());
        // left: 2 * 1 + 1, right: 0.5 + 1.5
        assert_eq!(l, [3.0; 3]);
        assert_eq!(r, [2.0; 3]);
    }

    #[test]
    fn empty_mixer_is_silent() {
        let mut m = Mixer::new();
        let mut l = [1.0; 4];
        let mut r = [1.0; 4];
        assert!(!m.process(&mut l, &mut r, &times(4), &mut Queue::new()));
        assert_eq!(l, [0.0; 4]);
        assert_eq!(r, [0.0; 4]);
    }

    #[test]
    fn series_runs_in_order() {
        let series: Series = [
            Instr::from(Single::new(0, Bias::new(1.0.into()).into())),
            Instr::from(Single::new(0, Gain::new(3.0.into()).into())),
        ]
        .into_iter()
        .collect();
        let mut l = [0.0; 2];
        let mut r = [0.0; 2];
        series.clone().process(&mut l, &mut r, &times(2), &mut Queue::new());
        assert_eq!(l, [3.0; 2]);
        assert_eq!(r, [0.0; 2]);
        assert_eq!(series.len(), 2);
    }
}
