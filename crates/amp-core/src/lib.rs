//! amp core - the node graph and its block processing protocol
//!
//! A performance is rendered by a tree of nodes sharing one virtual
//! timeline. Every node kind is a closed enum over its concrete nodes:
//!
//! - [`Clock`] - fills each block's sample boundaries with [`Time`] values
//! - [`Seq`] - turns the timeline into [`Event`]s on the action [`Queue`]
//! - [`Instr`] - renders a stereo block, reading the queue
//! - [`Effect`] - transforms a mono buffer in place
//! - [`Module`] - generates a mono buffer from nothing
//! - [`Handler`] - maps an event to a control value
//!
//! [`Boxed`] holds a node of any kind; [`Engine`] drives a clock, a
//! sequencer and an instrument block by block.
//!
//! # The block protocol
//!
//! A block of `len` samples comes with `len + 1` [`Time`] entries, the
//! boundaries of each sample, so a node can tell exactly which musical
//! positions fall inside sample `i`. Every `process` call returns a
//! continuation flag: `false` means the node will only produce silence (or
//! pass audio through) until something new happens. Containers never prune
//! on it.
//!
//! Pulses that are not audio (lifecycle, actions that came due, notes for
//! voice modules, transport requests) travel through `info` as an [`Info`].
//!
//! # Parameters
//!
//! Numeric inputs of nodes are [`Param`]s: a constant, a [`Handler`] fed by
//! actions, or a whole [`Module`] producing one value per sample. A node
//! holds them in [`Slot`]s, which evaluate to a scalar when possible and to
//! a buffer otherwise.
//!
//! # Example
//!
//! ```rust
//! use amp_core::{Basic, Engine, Event, Gen, Instr, Module, Sched, Single, Synth, Time, Trig};
//!
//! let sched: Sched = [(Time::new(0, 0.0), Event::new(0, 69, 65535))]
//!     .into_iter()
//!     .collect();
//! let synth = Synth::new(0, 0, 4, Module::from(Trig::new(1.0)));
//! let instr = Instr::from(Single::new(0, Gen::new(synth.into()).into()));
//!
//! let mut engine = Engine::new(Basic::new(120.0, 4.0, 48000.0).into(), instr)
//!     .with_seq(sched.into());
//! engine.start();
//!
//! let (mut left, mut right) = (vec![0.0; 64], vec![0.0; 64]);
//! engine.process(&mut left, &mut right);
//! assert_eq!(left[0], 440.0);
//! ```

pub mod boxed;
pub mod clock;
pub mod effect;
pub mod engine;
pub mod event;
pub mod handler;
pub mod info;
pub mod instr;
pub mod key;
pub mod module;
pub mod param;
pub mod provider;
pub mod queue;
pub mod seq;
pub mod time;
pub mod track;

mod scratch;

pub use boxed::{BoxKind, Boxed};
pub use clock::{Basic, Clock};
pub use effect::{
    Bias, Chain, Chorus, Clip, Comp, Cont, Crush, Effect, Expcrush, Filt, FiltKind, Gain, Gate,
    Gen, LOOPER_HEADS, Looper, Math, MathOp, Mix, Reverb, ReverbKind, Scale, Section, Vol, Wrap,
};
pub use engine::Engine;
pub use event::{Event, Id, velocity};
pub use handler::{Ctrl, Handler};
pub use info::{Info, Note, Seek};
pub use instr::{Inject, Instr, Mixer, Pan, Series, Single, Splice};
pub use key::{ival_maj, ival_min, key_freq, key_name, parse_key, scale_maj, scale_min};
pub use module::{
    Adsr, Fold, FoldOp, Module, Mul, Noise, Osc, OscShape, PIANO_KEYS, PIANO_RELEASE,
    PIANO_VOICES, Patch, Piano, Ramp, Sample, Shot, Synth, Trig, Warp,
};
pub use param::{Param, Slot, Values};
pub use provider::{BufferProvider, MemoryProvider, ProviderError, SampleBuf};
pub use queue::{Action, QUEUE_CAPACITY, Queue};
pub use seq::{Enable, Merge, Repeat, Sched, Seq, Toggle};
pub use time::{LOC_EPSILON, Loc, Time};
pub use track::{SEGMENT_LEN, Track};

pub use amp_dsp::{ClipCurve, ClipShape};
