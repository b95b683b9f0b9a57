//! Patch file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use amp_core::{BufferProvider, Engine};

use crate::build::{BuildContext, build_clock, build_instr, build_seq};
use crate::error::ConfigError;
use crate::record::{ClockConfig, EffectConfig, InstrConfig, SeqConfig};
use crate::validation::check_positive;

/// A complete performance: a clock, an optional sequencer and an
/// instrument.
///
/// # TOML Format
///
/// ```toml
/// name = "Two notes"
/// sample_rate = 48000
///
/// [clock]
/// type = "basic"
/// bpm = 120.0
///
/// [seq]
/// type = "sched"
/// events = [{ key = "a4" }, { beat = 2.0, key = "a5" }]
///
/// [instr]
/// type = "single"
///
/// [instr.effect]
/// type = "gen"
/// module = { type = "synth", voices = 4, module = { type = "osc", freq = 440.0 } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patch {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate the nodes are built for (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// The clock.
    #[serde(default)]
    pub clock: ClockConfig,

    /// The top-level sequencer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<SeqConfig>,

    /// The instrument.
    pub instr: InstrConfig,
}

fn default_sample_rate() -> u32 {
    48000
}

impl Patch {
    /// Create a patch playing `instr` with a default clock and no sequencer.
    pub fn new(name: impl Into<String>, instr: InstrConfig) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            clock: ClockConfig::default(),
            seq: None,
            instr,
        }
    }

    /// Create a patch with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the clock.
    pub fn with_clock(mut self, clock: ClockConfig) -> Self {
        self.clock = clock;
        self
    }

    /// Set the top-level sequencer.
    pub fn with_seq(mut self, seq: SeqConfig) -> Self {
        self.seq = Some(seq);
        self
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let patch: Patch = toml::from_str(&content)?;
        tracing::debug!(name = %patch.name, path = %path.display(), "loaded patch");
        Ok(patch)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a patch from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the patch to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent.filter(|p| !p.exists()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Convert the patch to a JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the engine this patch describes, resolving sample buffers
    /// through `provider`.
    pub fn build_engine(&self, provider: &dyn BufferProvider) -> Result<Engine, ConfigError> {
        check_positive("patch", "sample_rate", f64::from(self.sample_rate))?;
        let ctx = BuildContext::new(self.sample_rate as f32, provider);
        let clock = build_clock(&self.clock, &ctx)?;
        let seq = self.seq.as_ref().map(|s| build_seq(s, &ctx)).transpose()?;
        let instr = build_instr(&self.instr, &ctx)?;
        tracing::debug!(name = %self.name, rate = self.sample_rate, "built patch");
        let engine = Engine::new(clock, instr);
        Ok(match seq {
            Some(seq) => engine.with_seq(seq),
            None => engine,
        })
    }

    /// Checks that every node of the patch can be built.
    pub fn validate(&self, provider: &dyn BufferProvider) -> Result<(), ConfigError> {
        self.build_engine(provider).map(drop)
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::new(
            "Untitled",
            InstrConfig::Single {
                channel: 0,
                effect: EffectConfig::Cont,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{KeyConfig, ModuleConfig, SchedEvent};
    use amp_core::MemoryProvider;

    fn synth_patch() -> Patch {
        let voice = ModuleConfig::Trig { mul: 1.0 };
        let synth = ModuleConfig::Synth {
            dev: 0,
            key: KeyConfig::Num(0),
            voices: 2,
            module: Box::new(voice),
        };
        Patch::new(
            "Trig",
            InstrConfig::Single {
                channel: 0,
                effect: EffectConfig::Gen {
                    module: Box::new(synth),
                },
            },
        )
        .with_sample_rate(4)
        .with_clock(ClockConfig::Basic {
            bpm: 60.0,
            nbeats: 4.0,
        })
        .with_seq(SeqConfig::Sched {
            events: vec![SchedEvent {
                bar: 0,
                beat: 1.0,
                dev: 0,
                key: KeyConfig::Name("a4".into()),
                val: 65535,
            }],
        })
    }

    #[test]
    fn test_patch_new() {
        let patch = Patch::default();
        assert_eq!(patch.name, "Untitled");
        assert!(patch.description.is_none());
        assert_eq!(patch.sample_rate, 48000);
        assert!(patch.seq.is_none());
    }

    #[test]
    fn test_patch_builder() {
        let patch = synth_patch().with_description("one note on beat 1");
        assert_eq!(patch.description.as_deref(), Some("one note on beat 1"));
        assert_eq!(patch.sample_rate, 4);
        assert!(patch.seq.is_some());
    }

    #[test]
    fn test_toml_roundtrip() {
        let patch = synth_patch();
        let toml = patch.to_toml().unwrap();
        assert!(toml.contains("type = \"synth\""), "{toml}");
        assert_eq!(Patch::from_toml(&toml).unwrap(), patch);
    }

    #[test]
    fn test_json_roundtrip() {
        let patch = synth_patch();
        let json = patch.to_json().unwrap();
        assert_eq!(Patch::from_json_str(&json).unwrap(), patch);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let patch = Patch::from_toml(
            r#"
            name = "Minimal"

            [instr]
            type = "single"
            effect = { type = "cont" }
            "#,
        )
        .unwrap();
        assert_eq!(patch.sample_rate, 48000);
        assert_eq!(patch.clock, ClockConfig::default());
    }

    #[test]
    fn test_build_engine_plays_schedule() {
        let mut engine = synth_patch().build_engine(&MemoryProvider::new()).unwrap();
        engine.start();
        let (mut l, mut r) = ([0.0; 8], [0.0; 8]);
        engine.process(&mut l, &mut r);
        // One beat is four samples.
        assert_eq!(l[..5], [0.0, 0.0, 0.0, 0.0, 440.0]);
        assert_eq!(r, [0.0; 8]);
    }

    #[test]
    fn test_zero_sample_rate_is_rejected() {
        let patch = synth_patch().with_sample_rate(0);
        assert!(matches!(
            patch.validate(&MemoryProvider::new()),
            Err(ConfigError::InvalidParameter { ref param, .. }) if param == "sample_rate"
        ));
    }
}
