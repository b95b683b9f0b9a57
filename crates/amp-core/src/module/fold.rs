//! Module combinators.

use super::Module;
use crate::effect::Effect;
use crate::info::Info;
use crate::param::Slot;
use crate::queue::Queue;
use crate::scratch::check_block;
use crate::time::Time;

/// How a [`Fold`] combines its parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FoldOp {
    /// Sum, starting from 0.
    #[default]
    Add,
    /// Product, starting from 1.
    Mul,
}

/// Sum or product of any number of parameters.
///
/// An empty fold outputs the identity of its operation.
///
/// ```rust
/// use amp_core::{Fold, Queue, Time};
///
/// let mut sum = Fold::sum([0.25.into(), 0.5.into()]);
/// let mut buf = [0.0; 2];
/// sum.process(&mut buf, &[Time::default(); 3], &mut Queue::new());
/// assert_eq!(buf, [0.75; 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Fold {
    op: FoldOp,
    params: Vec<Slot>,
}

impl Fold {
    /// Creates an empty fold.
    pub fn new(op: FoldOp) -> Self {
        Self {
            op,
            params: Vec::new(),
        }
    }

    /// A sum of `params`.
    pub fn sum(params: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            op: FoldOp::Add,
            params: params.into_iter().collect(),
        }
    }

    /// A product of `params`.
    pub fn product(params: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            op: FoldOp::Mul,
            params: params.into_iter().collect(),
        }
    }

    /// The operation.
    pub fn op(&self) -> FoldOp {
        self.op
    }

    /// Adds a parameter at the end.
    pub fn append(&mut self, param: Slot) {
        self.params.push(param);
    }

    /// Adds a parameter at the front.
    pub fn prepend(&mut self, param: Slot) {
        self.params.insert(0, param);
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Forwards a pulse to every parameter.
    pub fn info(&mut self, info: &mut Info<'_>) {
        for p in &mut self.params {
            p.info(info);
        }
    }

    /// Combines every parameter into `buf`.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        check_block(buf.len(), time.len());
        let mut cont = false;
        match self.op {
            FoldOp::Add => {
                buf.fill(0.0);
                for p in &mut self.params {
                    let (v, c) = p.eval(time, queue);
                    cont |= c;
                    for (i, x) in buf.iter_mut().enumerate() {
                        *x += v.at(i);
                    }
                }
            }
            FoldOp::Mul => {
                buf.fill(1.0);
                for p in &mut self.params {
                    let (v, c) = p.eval(time, queue);
                    cont |= c;
                    for (i, x) in buf.iter_mut().enumerate() {
                        *x *= v.at(i);
                    }
                }
            }
        }
        cont
    }
}

/// A module's output run through an effect.
#[derive(Debug, Clone)]
pub struct Patch {
    input: Box<Module>,
    effect: Box<Effect>,
}

impl Patch {
    /// Feeds `input` into `effect`.
    pub fn new(input: Module, effect: Effect) -> Self {
        Self {
            input: Box::new(input),
            effect: Box::new(effect),
        }
    }

    /// Forwards a pulse to the module, then the effect.
    pub fn info(&mut self, info: &mut Info<'_>) {
        self.input.info(info);
        self.effect.info(info);
    }

    /// Renders the module and processes it in place.
    pub fn process(&mut self, buf: &mut [f32], time: &[Time], queue: &mut Queue) -> bool {
        let mut cont = self.input.process(buf, time, queue);
        cont |= self.effect.process(buf, time, queue);
        cont
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Clip, Gain};
    use crate::module::{Noise, Ramp};

    fn times(len: usize) -> Vec<Time> {
        vec![Time::default(); len + 1]
    }

    #[test]
    fn empty_folds_output_identity() {
        let mut buf = [5.0; 3];
        Fold::new(FoldOp::Add).process(&mut buf, &times(3), &mut Queue::new());
        assert_eq!(buf, [0.0; 3]);
        Fold::new(FoldOp::Mul).process(&mut buf, &times(3), &mut Queue::new());
        assert_eq!(buf, [1.0; 3]);
    }

    #[test]
    fn product_mixes_scalars_and_buffers() {
        let ramp = Module::from(Ramp::new(12000.0.into(), 48000.0));
        let mut f = Fold::product([2.0.into(), ramp.into()]);
        f.prepend(0.5.into());
        assert_eq!(f.len(), 3);
        let mut buf = [0.0; 4];
        f.process(&mut buf, &times(4), &mut Queue::new());
        assert_eq!(buf, [0.25, 0.5, 0.75, 0.0]);
    }

    #[test]
    fn patch_applies_effect_to_module() {
        let mut chain = crate::effect::Chain::new();
        chain.append(Gain::new(4.0.into()).into());
        chain.append(Clip::hard(1.0).into());
        let mut p = Patch::new(Module::from(Noise::new()), chain.into());
        let mut buf = [0.0; 256];
        p.process(&mut buf, &times(256), &mut Queue::new());
        assert!(buf.iter().all(|x| x.abs() <= 1.0));
        assert!(buf.iter().any(|x| x.abs() == 1.0));
    }
}
