//! Configuration records, one per node kind.
//!
//! Records mirror the node constructors of `amp-core` field for field and
//! are plain serde data: they can be read from TOML or JSON, compared and
//! written back. Turning a record into a node is done by [`crate::build`].
//!
//! Node records are internally tagged by `type`:
//!
//! ```toml
//! type = "reverb"
//! kind = "lpcf"
//! len = 0.03
//! gain = 0.8
//! low = 2000.0
//! ```

use serde::{Deserialize, Serialize};

/// A numeric node input.
///
/// A bare number is a constant, `{ ctrl = { .. } }` a control handler and
/// `{ module = { .. } }` a module producing one value per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamConfig {
    /// Constant value.
    Value(f64),
    /// Value set by incoming events.
    Ctrl {
        /// The handler.
        ctrl: CtrlConfig,
    },
    /// Value computed per sample.
    Module {
        /// The generating module.
        module: Box<ModuleConfig>,
    },
}

impl Default for ParamConfig {
    fn default() -> Self {
        ParamConfig::Value(0.0)
    }
}

impl From<f64> for ParamConfig {
    fn from(v: f64) -> Self {
        ParamConfig::Value(v)
    }
}

/// A key, given either as a number or as a note name such as `"a4"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyConfig {
    /// Key number.
    Num(u16),
    /// Note name.
    Name(String),
}

impl Default for KeyConfig {
    fn default() -> Self {
        KeyConfig::Num(0)
    }
}

impl From<u16> for KeyConfig {
    fn from(key: u16) -> Self {
        KeyConfig::Num(key)
    }
}

/// A control handler mapping event values onto `[low, high]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtrlConfig {
    /// Initial value; `low` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val: Option<f64>,
    /// Value for event value 0.
    #[serde(default)]
    pub low: f64,
    /// Value for event value 65535.
    #[serde(default = "one")]
    pub high: f64,
    /// Exponential instead of linear mapping.
    #[serde(default)]
    pub exp: bool,
    /// Device listened to.
    #[serde(default)]
    pub dev: u16,
    /// Key listened to.
    #[serde(default)]
    pub key: KeyConfig,
}

impl Default for CtrlConfig {
    fn default() -> Self {
        Self {
            val: None,
            low: 0.0,
            high: 1.0,
            exp: false,
            dev: 0,
            key: KeyConfig::default(),
        }
    }
}

/// An event address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdConfig {
    /// Device.
    #[serde(default)]
    pub dev: u16,
    /// Key.
    #[serde(default)]
    pub key: KeyConfig,
}

/// Clock records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClockConfig {
    /// Fixed tempo clock.
    Basic {
        /// Beats per minute.
        #[serde(default = "default_bpm")]
        bpm: f64,
        /// Beats per bar.
        #[serde(default = "default_nbeats")]
        nbeats: f64,
    },
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig::Basic {
            bpm: default_bpm(),
            nbeats: default_nbeats(),
        }
    }
}

/// Handler records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandlerConfig {
    /// Control handler.
    Ctrl(CtrlConfig),
}

/// One child of a section with its wet/dry blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionChild {
    /// Blend of the child's output with the section input.
    #[serde(default = "one_f32")]
    pub mix: f32,
    /// The child.
    pub effect: EffectConfig,
}

/// Effect records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectConfig {
    /// Children in series.
    Chain {
        /// Children, first applied first.
        #[serde(default)]
        effects: Vec<EffectConfig>,
    },
    /// Children in parallel, each blended with the input.
    Section {
        /// Children.
        #[serde(default)]
        children: Vec<SectionChild>,
    },
    /// Product of two branches.
    Gate {
        /// Signal branch.
        left: Box<EffectConfig>,
        /// Envelope branch.
        right: Box<EffectConfig>,
    },
    /// Wet/dry blend of one child.
    Mix {
        /// The child.
        effect: Box<EffectConfig>,
        /// Wet amount.
        #[serde(default)]
        ratio: ParamConfig,
    },
    /// Adds a module's output.
    Gen {
        /// The module.
        module: Box<ModuleConfig>,
    },
    /// Pass-through that keeps its parent running.
    Cont,
    /// Multiplies by a parameter.
    Gain {
        /// Factor.
        #[serde(default)]
        gain: ParamConfig,
    },
    /// Adds a parameter.
    Bias {
        /// Offset.
        #[serde(default)]
        bias: ParamConfig,
    },
    /// Maps `[inlo, inhi]` linearly onto `[outlo, outhi]`.
    Scale {
        /// Input low.
        #[serde(default)]
        inlo: ParamConfig,
        /// Input high.
        #[serde(default)]
        inhi: ParamConfig,
        /// Output low.
        #[serde(default)]
        outlo: ParamConfig,
        /// Output high.
        #[serde(default)]
        outhi: ParamConfig,
    },
    /// Pointwise function.
    Math {
        /// Function name (`exp` or `hz2sec`).
        op: String,
    },
    /// Envelope follower.
    Vol {
        /// Follower cutoff in Hz.
        #[serde(default)]
        freq: ParamConfig,
    },
    /// Waveshaping clipper.
    Clip {
        /// Curve name.
        #[serde(default = "default_curve")]
        curve: String,
        /// Where the curve leaves the identity.
        #[serde(default = "one_f32")]
        sat: f32,
        /// Output ceiling.
        #[serde(default = "one_f32")]
        max: f32,
    },
    /// Linear bit crusher.
    Crush {
        /// Bits kept.
        #[serde(default)]
        bits: ParamConfig,
    },
    /// Exponential bit crusher.
    Expcrush {
        /// Bits kept.
        #[serde(default)]
        bits: ParamConfig,
    },
    /// Wavefolder.
    Wrap {
        /// Fold limit.
        #[serde(default)]
        limit: ParamConfig,
    },
    /// Compressor.
    Comp {
        /// Attack time in seconds.
        atk: f32,
        /// Release time in seconds.
        rel: f32,
        /// Linear threshold.
        thresh: f32,
        /// Ratio, at least 1.
        #[serde(default = "one_f32")]
        ratio: f32,
    },
    /// Reverberator tap.
    Reverb {
        /// Tap name.
        kind: String,
        /// Ring length in seconds.
        len: f64,
        /// Feedback or output gain.
        #[serde(default)]
        gain: ParamConfig,
        /// Lowpass cutoff or lower band edge.
        #[serde(default, alias = "freq")]
        low: ParamConfig,
        /// Upper band edge.
        #[serde(default)]
        high: ParamConfig,
        /// Delay in seconds of a varying tap.
        #[serde(default)]
        delay: ParamConfig,
    },
    /// Modulated delay with feedback.
    Chorus {
        /// Ring length in seconds.
        len: f64,
        /// Delay position.
        #[serde(default)]
        delay: ParamConfig,
        /// Delay modulation depth.
        #[serde(default)]
        depth: ParamConfig,
        /// Feedback from the first tap.
        #[serde(default)]
        fb0: ParamConfig,
        /// Feedback from the second tap.
        #[serde(default)]
        fb1: ParamConfig,
    },
    /// Filter.
    Filt {
        /// Response name.
        kind: String,
        /// Cutoff or center in Hz.
        #[serde(default)]
        freq: ParamConfig,
        /// Resonance of `moog`, quality of `bpf`.
        #[serde(default, alias = "qual")]
        res: ParamConfig,
    },
    /// Loop recorder.
    Looper {
        /// Longest recording in seconds.
        len: f64,
        /// Loop length in bars.
        #[serde(default)]
        bars: i32,
        /// Loop length in beats.
        #[serde(default)]
        beats: f64,
        /// Device of the record trigger.
        #[serde(default)]
        dev: u16,
        /// Key of the record trigger.
        #[serde(default)]
        key: KeyConfig,
    },
    /// Shared recording track.
    Track,
}

/// One velocity layer of a sample player: paths played round robin.
pub type LayerConfig = Vec<String>;

/// Sample layers mapped to one piano key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PianoKeyConfig {
    /// Key.
    pub key: KeyConfig,
    /// Velocity layers, softest first.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

/// Module records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleConfig {
    /// Oscillator over a phase source.
    ///
    /// Either `freq` (a ramp is built for it) or `phase` is required.
    Osc {
        /// Waveform name.
        #[serde(default = "default_shape")]
        shape: String,
        /// Frequency in Hz.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        freq: Option<ParamConfig>,
        /// Phase source.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phase: Option<Box<ModuleConfig>>,
    },
    /// Phase ramp.
    Ramp {
        /// Frequency in Hz.
        #[serde(default)]
        freq: ParamConfig,
    },
    /// Note frequency while held.
    Trig {
        /// Frequency multiplier.
        #[serde(default = "one_f32")]
        mul: f32,
    },
    /// Phase distortion.
    Warp {
        /// Phase source.
        phase: Box<ModuleConfig>,
        /// Distortion amount.
        #[serde(default)]
        dist: ParamConfig,
    },
    /// Restarts a module on a key.
    Shot {
        /// Device.
        #[serde(default)]
        dev: u16,
        /// Key.
        #[serde(default)]
        key: KeyConfig,
        /// The module.
        module: Box<ModuleConfig>,
    },
    /// Product of two parameters.
    Mul {
        /// Left factor.
        #[serde(default)]
        left: ParamConfig,
        /// Right factor.
        #[serde(default)]
        right: ParamConfig,
    },
    /// White noise.
    Noise,
    /// Sum of parameters.
    Sum {
        /// Terms.
        #[serde(default)]
        params: Vec<ParamConfig>,
    },
    /// Product of parameters.
    Prod {
        /// Factors.
        #[serde(default)]
        params: Vec<ParamConfig>,
    },
    /// A module run through an effect.
    Patch {
        /// Source.
        input: Box<ModuleConfig>,
        /// Effect applied to the source.
        effect: Box<EffectConfig>,
    },
    /// Envelope.
    Adsr {
        /// Resting level.
        #[serde(default)]
        min: f64,
        /// Peak level.
        #[serde(default = "one")]
        max: f64,
        /// Attack in seconds.
        atk: f64,
        /// Decay in seconds.
        decay: f64,
        /// Sustain fraction.
        sus: f64,
        /// Release in seconds.
        rel: f64,
    },
    /// Polyphonic voice allocator.
    Synth {
        /// Device.
        #[serde(default)]
        dev: u16,
        /// Key listened to, 0 for every key.
        #[serde(default)]
        key: KeyConfig,
        /// Voice count.
        voices: usize,
        /// Voice template.
        module: Box<ModuleConfig>,
    },
    /// One-shot sample player.
    Sample {
        /// Play slots.
        #[serde(default = "default_slots")]
        slots: usize,
        /// Tail decay per sample.
        #[serde(default = "one_f32")]
        decay: f32,
        /// Device filter.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dev: Option<u16>,
        /// Channel read from each file.
        #[serde(default)]
        channel: usize,
        /// Velocity layers, softest first.
        #[serde(default)]
        layers: Vec<LayerConfig>,
    },
    /// Sampled piano.
    Piano {
        /// Device.
        #[serde(default)]
        dev: u16,
        /// Channel read from each file.
        #[serde(default)]
        channel: usize,
        /// Mapped keys.
        #[serde(default)]
        keys: Vec<PianoKeyConfig>,
    },
}

/// Instrument records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstrConfig {
    /// Children summed.
    Mixer {
        /// Children.
        #[serde(default)]
        instrs: Vec<InstrConfig>,
    },
    /// Children in series.
    Series {
        /// Children.
        #[serde(default)]
        instrs: Vec<InstrConfig>,
    },
    /// An effect on one channel.
    Single {
        /// Channel, 0 left and 1 right.
        #[serde(default)]
        channel: usize,
        /// The effect.
        effect: EffectConfig,
    },
    /// A mono effect spread over both channels.
    Splice {
        /// Left volume.
        #[serde(default = "one_param")]
        lvol: ParamConfig,
        /// Right volume.
        #[serde(default = "one_param")]
        rvol: ParamConfig,
        /// The effect.
        effect: EffectConfig,
    },
    /// A sequencer private to one child.
    Inject {
        /// The sequencer.
        seq: SeqConfig,
        /// The child.
        instr: Box<InstrConfig>,
    },
    /// Per-channel volume and delay.
    Pan {
        /// Left volume.
        #[serde(default = "one_param")]
        lvol: ParamConfig,
        /// Right volume.
        #[serde(default = "one_param")]
        rvol: ParamConfig,
        /// Left delay in seconds.
        #[serde(default)]
        ldelay: f64,
        /// Right delay in seconds.
        #[serde(default)]
        rdelay: f64,
    },
}

/// A scheduled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedEvent {
    /// Bar.
    #[serde(default)]
    pub bar: i32,
    /// Beat within the bar.
    #[serde(default)]
    pub beat: f64,
    /// Device.
    #[serde(default)]
    pub dev: u16,
    /// Key.
    pub key: KeyConfig,
    /// Value; 0 releases.
    #[serde(default = "default_val")]
    pub val: u16,
}

/// Sequencer records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeqConfig {
    /// Fixed schedule.
    Sched {
        /// Events in any order.
        #[serde(default)]
        events: Vec<SchedEvent>,
    },
    /// Wraps the bar of its child's timeline.
    Repeat {
        /// Bar offset.
        #[serde(default)]
        off: i32,
        /// Bars per repetition.
        #[serde(default = "one_i32")]
        len: i32,
        /// The child.
        seq: Box<SeqConfig>,
    },
    /// Latching keys.
    Toggle {
        /// Latched ids.
        #[serde(default)]
        ids: Vec<IdConfig>,
    },
    /// Gates a child on a key.
    Enable {
        /// Device.
        #[serde(default)]
        dev: u16,
        /// Key.
        #[serde(default)]
        key: KeyConfig,
        /// The child.
        seq: Box<SeqConfig>,
    },
    /// Children in order.
    Merge {
        /// Children.
        #[serde(default)]
        seqs: Vec<SeqConfig>,
    },
}

/// A record of any node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeConfig {
    /// A clock.
    Clock(ClockConfig),
    /// A handler.
    Handler(HandlerConfig),
    /// An effect.
    Effect(EffectConfig),
    /// A module.
    Module(ModuleConfig),
    /// An instrument.
    Instr(InstrConfig),
    /// A sequencer.
    Seq(SeqConfig),
}

fn one() -> f64 {
    1.0
}

fn one_f32() -> f32 {
    1.0
}

fn one_i32() -> i32 {
    1
}

fn one_param() -> ParamConfig {
    ParamConfig::Value(1.0)
}

fn default_bpm() -> f64 {
    120.0
}

fn default_nbeats() -> f64 {
    4.0
}

fn default_curve() -> String {
    "hard".to_string()
}

fn default_shape() -> String {
    "sine".to_string()
}

fn default_slots() -> usize {
    8
}

fn default_val() -> u16 {
    u16::MAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_accept_three_shapes() {
        let effect: EffectConfig = toml::from_str(
            r#"
            type = "scale"
            inlo = -1
            inhi = 1.0
            outlo = { ctrl = { low = 20.0, high = 200.0, dev = 1, key = "c4" } }
            outhi = { module = { type = "ramp", freq = 2.0 } }
            "#,
        )
        .unwrap();
        let EffectConfig::Scale {
            inlo,
            inhi,
            outlo,
            outhi,
        } = effect
        else {
            panic!("expected scale");
        };
        assert_eq!(inlo, ParamConfig::Value(-1.0));
        assert_eq!(inhi, ParamConfig::Value(1.0));
        let ParamConfig::Ctrl { ctrl } = outlo else {
            panic!("expected ctrl");
        };
        assert_eq!(ctrl.high, 200.0);
        assert_eq!(ctrl.key, KeyConfig::Name("c4".into()));
        assert!(matches!(
            outhi,
            ParamConfig::Module { ref module } if matches!(**module, ModuleConfig::Ramp { .. })
        ));
    }

    #[test]
    fn defaults_match_constructors() {
        let m: ModuleConfig = toml::from_str("type = \"trig\"").unwrap();
        assert_eq!(m, ModuleConfig::Trig { mul: 1.0 });

        let i: InstrConfig = toml::from_str(
            r#"
            type = "splice"
            effect = { type = "cont" }
            "#,
        )
        .unwrap();
        assert_eq!(
            i,
            InstrConfig::Splice {
                lvol: 1.0.into(),
                rvol: 1.0.into(),
                effect: EffectConfig::Cont,
            }
        );

        let s: SeqConfig = toml::from_str(
            r#"
            type = "sched"
            events = [{ key = "a4" }]
            "#,
        )
        .unwrap();
        let SeqConfig::Sched { events } = s else {
            panic!("expected sched");
        };
        assert_eq!(events[0].val, 65535);
        assert_eq!(events[0].bar, 0);
    }

    #[test]
    fn reverb_accepts_freq_for_low() {
        let e: EffectConfig = toml::from_str(
            r#"
            type = "reverb"
            kind = "lpcf"
            len = 0.03
            gain = 0.8
            freq = 2000.0
            "#,
        )
        .unwrap();
        assert!(matches!(
            e,
            EffectConfig::Reverb { low: ParamConfig::Value(f), .. } if f == 2000.0
        ));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let res: Result<EffectConfig, _> = toml::from_str("type = \"flanger\"");
        assert!(res.is_err());
    }

    #[test]
    fn nodes_are_tagged_by_kind() {
        let node: NodeConfig = serde_json::from_str(
            r#"{ "handler": { "type": "ctrl", "low": 1.0, "high": 10.0, "exp": true } }"#,
        )
        .unwrap();
        let NodeConfig::Handler(HandlerConfig::Ctrl(ctrl)) = node else {
            panic!("expected handler");
        };
        assert!(ctrl.exp);
        assert_eq!(ctrl.val, None);
    }
}
