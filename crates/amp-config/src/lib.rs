//! Patch files and node construction for the amp node graph.
//!
//! This crate is the only place a node can fail to be built. It provides:
//!
//! - **Records**: serde data for every node kind, read from TOML or JSON
//! - **Building**: `build_*` functions turning records into `amp-core` nodes
//! - **Validation**: parameter checks with errors naming the offending field
//! - **Patches**: a clock, a sequencer and an instrument in one file
//!
//! # Example
//!
//! ```rust
//! use amp_config::Patch;
//! use amp_core::MemoryProvider;
//!
//! let patch = Patch::from_toml(
//!     r#"
//!     name = "A4"
//!     sample_rate = 48000
//!
//!     [seq]
//!     type = "sched"
//!     events = [{ key = "a4" }]
//!
//!     [instr]
//!     type = "single"
//!     effect = { type = "gen", module = { type = "synth", voices = 2, module = { type = "trig" } } }
//!     "#,
//! )
//! .unwrap();
//!
//! let mut engine = patch.build_engine(&MemoryProvider::new()).unwrap();
//! engine.start();
//! let (mut left, mut right) = ([0.0; 16], [0.0; 16]);
//! engine.process(&mut left, &mut right);
//! assert_eq!(left[0], 440.0);
//! ```

mod error;
mod patch;

/// Node construction from configuration records.
pub mod build;

/// Configuration records, one per node kind.
pub mod record;

/// Parameter checks run before a node is constructed.
pub mod validation;

pub use build::{
    BuildContext, build_clock, build_ctrl, build_effect, build_handler, build_instr,
    build_module, build_node, build_param, build_seq, build_slot,
};
pub use error::ConfigError;
pub use patch::Patch;
pub use record::{
    ClockConfig, CtrlConfig, EffectConfig, HandlerConfig, IdConfig, InstrConfig, KeyConfig,
    LayerConfig, ModuleConfig, NodeConfig, ParamConfig, PianoKeyConfig, SchedEvent,
    SectionChild, SeqConfig,
};
pub use validation::ValidationResult;
