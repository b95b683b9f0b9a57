//! Node construction from configuration records.
//!
//! Every `build_*` function checks its record and builds children before
//! the node that holds them, so a failure anywhere returns before anything
//! is linked into a parent. Sample-playback records resolve their buffers
//! through the [`BufferProvider`] in the [`BuildContext`].

use amp_core::{
    Adsr, Basic, Bias, Boxed, BufferProvider, Chain, Chorus, Clip, ClipCurve, ClipShape, Clock,
    Comp, Cont, Crush, Ctrl, Effect, Enable, Event, Expcrush, Filt, FiltKind, Fold, Gain, Gate,
    Gen, Handler, Id, Inject, Instr, Looper, Math, MathOp, Merge, Mix, Mixer, Module, Mul, Noise,
    Osc, OscShape, PIANO_KEYS, Pan, Param, Patch, Piano, Ramp, Repeat, Reverb, ReverbKind, Sample,
    SampleBuf, Scale, Sched, Section, Seq, Series, Shot, Single, Slot, Splice, Synth, Time, Toggle,
    Track, Trig, Vol, Warp, Wrap,
};

use crate::error::ConfigError;
use crate::record::{
    ClockConfig, CtrlConfig, EffectConfig, HandlerConfig, InstrConfig, LayerConfig,
    ModuleConfig, NodeConfig, ParamConfig, SeqConfig,
};
use crate::validation::{
    ValidationResult, check_clip, check_ctrl, check_delay, check_non_empty, check_non_negative,
    check_positive, check_ratio, check_ring, resolve_key, resolve_name,
};

/// What nodes are built against.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    /// Sample rate in Hz.
    pub rate: f32,
    /// Source of decoded sample buffers.
    pub provider: &'a dyn BufferProvider,
}

impl<'a> BuildContext<'a> {
    /// Creates a context at `rate`.
    pub fn new(rate: f32, provider: &'a dyn BufferProvider) -> Self {
        Self { rate, provider }
    }

    fn load_layer(
        &self,
        layer: &LayerConfig,
        channel: usize,
    ) -> ValidationResult<Vec<SampleBuf>> {
        layer
            .iter()
            .map(|path| {
                tracing::debug!(path = %path, channel, "loading sample buffer");
                self.provider
                    .load(path, channel, self.rate as u32)
                    .map_err(ConfigError::from)
            })
            .collect()
    }
}

impl std::fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("rate", &self.rate)
            .finish_non_exhaustive()
    }
}

/// Builds a clock.
pub fn build_clock(config: &ClockConfig, ctx: &BuildContext<'_>) -> ValidationResult<Clock> {
    match *config {
        ClockConfig::Basic { bpm, nbeats } => {
            check_positive("basic", "bpm", bpm)?;
            check_positive("basic", "nbeats", nbeats)?;
            tracing::debug!(bpm, nbeats, "built clock");
            Ok(Basic::new(bpm, nbeats, f64::from(ctx.rate)).into())
        }
    }
}

/// Builds a control handler.
pub fn build_ctrl(config: &CtrlConfig) -> ValidationResult<Ctrl> {
    check_ctrl(config)?;
    let key = resolve_key("ctrl", &config.key)?;
    let val = config.val.unwrap_or(config.low);
    Ok(Ctrl::new(
        val as f32,
        config.low as f32,
        config.high as f32,
        config.exp,
        config.dev,
        key,
    ))
}

/// Builds a handler.
pub fn build_handler(config: &HandlerConfig) -> ValidationResult<Handler> {
    match config {
        HandlerConfig::Ctrl(ctrl) => Ok(build_ctrl(ctrl)?.into()),
    }
}

/// Builds a parameter.
pub fn build_param(config: &ParamConfig, ctx: &BuildContext<'_>) -> ValidationResult<Param> {
    Ok(match config {
        ParamConfig::Value(v) => Param::from(*v),
        ParamConfig::Ctrl { ctrl } => Param::ctrl(build_ctrl(ctrl)?.into()),
        ParamConfig::Module { module } => Param::module(build_module(module, ctx)?),
    })
}

/// Builds a parameter slot.
pub fn build_slot(config: &ParamConfig, ctx: &BuildContext<'_>) -> ValidationResult<Slot> {
    build_param(config, ctx).map(Slot::from)
}

fn slots<const N: usize>(
    configs: [&ParamConfig; N],
    ctx: &BuildContext<'_>,
) -> ValidationResult<[Slot; N]> {
    let mut built = Vec::with_capacity(N);
    for config in configs {
        built.push(build_slot(config, ctx)?);
    }
    built
        .try_into()
        .map_err(|_| ConfigError::invalid("param", "count", "slot count mismatch"))
}

/// Builds an effect.
pub fn build_effect(config: &EffectConfig, ctx: &BuildContext<'_>) -> ValidationResult<Effect> {
    let rate = ctx.rate;
    let effect: Effect = match config {
        EffectConfig::Chain { effects } => effects
            .iter()
            .map(|e| build_effect(e, ctx))
            .collect::<ValidationResult<Chain>>()?
            .into(),
        EffectConfig::Section { children } => {
            let mut section = Section::new();
            for child in children {
                section.append(child.mix, build_effect(&child.effect, ctx)?);
            }
            section.into()
        }
        EffectConfig::Gate { left, right } => {
            Gate::new(build_effect(left, ctx)?, build_effect(right, ctx)?).into()
        }
        EffectConfig::Mix { effect, ratio } => {
            Mix::new(build_effect(effect, ctx)?, build_slot(ratio, ctx)?).into()
        }
        EffectConfig::Gen { module } => Gen::new(build_module(module, ctx)?).into(),
        EffectConfig::Cont => Cont::new().into(),
        EffectConfig::Gain { gain } => Gain::new(build_slot(gain, ctx)?).into(),
        EffectConfig::Bias { bias } => Bias::new(build_slot(bias, ctx)?).into(),
        EffectConfig::Scale {
            inlo,
            inhi,
            outlo,
            outhi,
        } => {
            let [inlo, inhi, outlo, outhi] = slots([inlo, inhi, outlo, outhi], ctx)?;
            Scale::new(inlo, inhi, outlo, outhi).into()
        }
        EffectConfig::Math { op } => {
            Math::new(resolve_name("math", "op", op, MathOp::from_name)?).into()
        }
        EffectConfig::Vol { freq } => Vol::new(build_slot(freq, ctx)?, rate).into(),
        EffectConfig::Clip { curve, sat, max } => {
            let curve = resolve_name("clip", "curve", curve, ClipCurve::from_name)?;
            check_clip(*sat, *max)?;
            Clip::new(ClipShape::symmetric(curve, *sat, *max)).into()
        }
        EffectConfig::Crush { bits } => Crush::new(build_slot(bits, ctx)?).into(),
        EffectConfig::Expcrush { bits } => Expcrush::new(build_slot(bits, ctx)?).into(),
        EffectConfig::Wrap { limit } => Wrap::new(build_slot(limit, ctx)?).into(),
        EffectConfig::Comp {
            atk,
            rel,
            thresh,
            ratio,
        } => {
            check_positive("comp", "atk", f64::from(*atk))?;
            check_positive("comp", "rel", f64::from(*rel))?;
            check_non_negative("comp", "thresh", f64::from(*thresh))?;
            check_ratio("comp", *ratio)?;
            Comp::new(*atk, *rel, *thresh, *ratio, rate).into()
        }
        EffectConfig::Reverb {
            kind,
            len,
            gain,
            low,
            high,
            delay,
        } => {
            let kind = resolve_name("reverb", "kind", kind, ReverbKind::from_name)?;
            check_ring("reverb", "len", *len, f64::from(rate))?;
            let [gain, low, high, delay] = slots([gain, low, high, delay], ctx)?;
            Reverb::new(kind, *len, rate)
                .with_gain(gain)
                .with_band(low, high)
                .with_delay(delay)
                .into()
        }
        EffectConfig::Chorus {
            len,
            delay,
            depth,
            fb0,
            fb1,
        } => {
            check_ring("chorus", "len", *len, f64::from(rate))?;
            let [delay, depth, fb0, fb1] = slots([delay, depth, fb0, fb1], ctx)?;
            Chorus::new(*len, rate, delay, depth, fb0, fb1).into()
        }
        EffectConfig::Filt { kind, freq, res } => {
            let kind = resolve_name("filt", "kind", kind, FiltKind::from_name)?;
            let freq = build_slot(freq, ctx)?;
            match kind {
                FiltKind::Lpf => Filt::lpf(freq, rate),
                FiltKind::Hpf => Filt::hpf(freq, rate),
                FiltKind::Bpf => Filt::bpf(freq, build_slot(res, ctx)?, rate),
                FiltKind::Moog => Filt::moog(freq, build_slot(res, ctx)?, rate),
            }
            .into()
        }
        EffectConfig::Looper {
            len,
            bars,
            beats,
            dev,
            key,
        } => {
            check_ring("looper", "len", *len, f64::from(rate))?;
            if *bars < 0 {
                return Err(ConfigError::invalid(
                    "looper",
                    "bars",
                    format!("must not be negative, got {bars}"),
                ));
            }
            check_non_negative("looper", "beats", *beats)?;
            let key = resolve_key("looper", key)?;
            let samples = (*len * f64::from(rate)) as usize;
            Looper::new(samples, Time::new(*bars, *beats), Id::new(*dev, key)).into()
        }
        EffectConfig::Track => Track::new().into(),
    };
    tracing::debug!(node = effect.kind(), "built effect");
    Ok(effect)
}

fn build_fold(
    node: &str,
    params: &[ParamConfig],
    ctx: &BuildContext<'_>,
) -> ValidationResult<Vec<Slot>> {
    check_non_empty(node, params)?;
    params.iter().map(|p| build_slot(p, ctx)).collect()
}

/// Builds a module.
pub fn build_module(config: &ModuleConfig, ctx: &BuildContext<'_>) -> ValidationResult<Module> {
    let rate = ctx.rate;
    let module: Module = match config {
        ModuleConfig::Osc { shape, freq, phase } => {
            let shape = resolve_name("osc", "shape", shape, OscShape::from_name)?;
            let phase = match (freq, phase) {
                (_, Some(phase)) => build_module(phase, ctx)?,
                (Some(freq), None) => Ramp::new(build_slot(freq, ctx)?, rate).into(),
                (None, None) => return Err(ConfigError::missing("osc", "freq")),
            };
            Osc::new(shape, phase).into()
        }
        ModuleConfig::Ramp { freq } => Ramp::new(build_slot(freq, ctx)?, rate).into(),
        ModuleConfig::Trig { mul } => Trig::new(*mul).into(),
        ModuleConfig::Warp { phase, dist } => {
            Warp::new(build_module(phase, ctx)?, build_slot(dist, ctx)?).into()
        }
        ModuleConfig::Shot { dev, key, module } => {
            let key = resolve_key("shot", key)?;
            Shot::new(*dev, key, build_module(module, ctx)?).into()
        }
        ModuleConfig::Mul { left, right } => {
            let [left, right] = slots([left, right], ctx)?;
            Mul::new(left, right).into()
        }
        ModuleConfig::Noise => Noise::new().into(),
        ModuleConfig::Sum { params } => Fold::sum(build_fold("sum", params, ctx)?).into(),
        ModuleConfig::Prod { params } => Fold::product(build_fold("prod", params, ctx)?).into(),
        ModuleConfig::Patch { input, effect } => {
            Patch::new(build_module(input, ctx)?, build_effect(effect, ctx)?).into()
        }
        ModuleConfig::Adsr {
            min,
            max,
            atk,
            decay,
            sus,
            rel,
        } => {
            check_positive("adsr", "atk", *atk)?;
            check_positive("adsr", "decay", *decay)?;
            check_positive("adsr", "rel", *rel)?;
            check_non_negative("adsr", "sus", *sus)?;
            Adsr::new(*min, *max, *atk, *decay, *sus, *rel, f64::from(rate)).into()
        }
        ModuleConfig::Synth {
            dev,
            key,
            voices,
            module,
        } => {
            check_positive("synth", "voices", *voices as f64)?;
            let key = resolve_key("synth", key)?;
            Synth::new(*dev, key, *voices, build_module(module, ctx)?).into()
        }
        ModuleConfig::Sample {
            slots,
            decay,
            dev,
            channel,
            layers,
        } => {
            check_positive("sample", "slots", *slots as f64)?;
            check_non_negative("sample", "decay", f64::from(*decay))?;
            let mut sample = Sample::new(*slots, *decay);
            if let Some(dev) = dev {
                sample = sample.with_dev(*dev);
            }
            for layer in layers {
                sample.add_layer(ctx.load_layer(layer, *channel)?);
            }
            sample.into()
        }
        ModuleConfig::Piano { dev, channel, keys } => {
            let mut piano = Piano::new(*dev);
            for mapped in keys {
                let key = resolve_key("piano", &mapped.key)?;
                if usize::from(key) >= PIANO_KEYS {
                    return Err(ConfigError::invalid(
                        "piano",
                        "key",
                        format!("{key} is past the last key"),
                    ));
                }
                for layer in &mapped.layers {
                    piano.add_layer(key, ctx.load_layer(layer, *channel)?);
                }
            }
            piano.into()
        }
    };
    tracing::debug!(node = module.kind(), "built module");
    Ok(module)
}

/// Builds an instrument.
pub fn build_instr(config: &InstrConfig, ctx: &BuildContext<'_>) -> ValidationResult<Instr> {
    let instr: Instr = match config {
        InstrConfig::Mixer { instrs } => {
            let mut mixer = Mixer::new();
            for child in instrs {
                mixer.append(build_instr(child, ctx)?);
            }
            mixer.into()
        }
        InstrConfig::Series { instrs } => {
            let mut series = Series::new();
            for child in instrs {
                series.append(build_instr(child, ctx)?);
            }
            series.into()
        }
        InstrConfig::Single { channel, effect } => {
            if *channel > 1 {
                return Err(ConfigError::invalid(
                    "single",
                    "channel",
                    format!("must be 0 or 1, got {channel}"),
                ));
            }
            Single::new(*channel, build_effect(effect, ctx)?).into()
        }
        InstrConfig::Splice { lvol, rvol, effect } => {
            let [lvol, rvol] = slots([lvol, rvol], ctx)?;
            Splice::new(lvol, rvol, build_effect(effect, ctx)?).into()
        }
        InstrConfig::Inject { seq, instr } => {
            Inject::new(build_seq(seq, ctx)?, build_instr(instr, ctx)?).into()
        }
        InstrConfig::Pan {
            lvol,
            rvol,
            ldelay,
            rdelay,
        } => {
            let rate = f64::from(ctx.rate);
            check_delay("pan", "ldelay", *ldelay, rate)?;
            check_delay("pan", "rdelay", *rdelay, rate)?;
            let [lvol, rvol] = slots([lvol, rvol], ctx)?;
            Pan::new(lvol, rvol, *ldelay, *rdelay, rate).into()
        }
    };
    tracing::debug!(node = instr.kind(), "built instrument");
    Ok(instr)
}

/// Builds a sequencer.
pub fn build_seq(config: &SeqConfig, ctx: &BuildContext<'_>) -> ValidationResult<Seq> {
    let seq: Seq = match config {
        SeqConfig::Sched { events } => {
            let mut sched = Sched::new();
            for e in events {
                check_non_negative("sched", "beat", e.beat)?;
                let key = resolve_key("sched", &e.key)?;
                sched.add(Time::new(e.bar, e.beat), Event::new(e.dev, key, e.val));
            }
            sched.into()
        }
        SeqConfig::Repeat { off, len, seq } => {
            check_positive("repeat", "len", f64::from(*len))?;
            Repeat::new(*off, *len, build_seq(seq, ctx)?).into()
        }
        SeqConfig::Toggle { ids } => {
            let ids = ids
                .iter()
                .map(|id| Ok(Id::new(id.dev, resolve_key("toggle", &id.key)?)))
                .collect::<ValidationResult<Vec<_>>>()?;
            Toggle::new(ids).into()
        }
        SeqConfig::Enable { dev, key, seq } => {
            let key = resolve_key("enable", key)?;
            Enable::new(Id::new(*dev, key), build_seq(seq, ctx)?).into()
        }
        SeqConfig::Merge { seqs } => seqs
            .iter()
            .map(|s| build_seq(s, ctx))
            .collect::<ValidationResult<Merge>>()?
            .into(),
    };
    tracing::debug!(node = seq.kind(), "built sequencer");
    Ok(seq)
}

/// Builds a node of any kind into a box.
pub fn build_node(config: &NodeConfig, ctx: &BuildContext<'_>) -> ValidationResult<Boxed> {
    Ok(match config {
        NodeConfig::Clock(c) => build_clock(c, ctx)?.into(),
        NodeConfig::Handler(h) => build_handler(h)?.into(),
        NodeConfig::Effect(e) => build_effect(e, ctx)?.into(),
        NodeConfig::Module(m) => build_module(m, ctx)?.into(),
        NodeConfig::Instr(i) => build_instr(i, ctx)?.into(),
        NodeConfig::Seq(s) => build_seq(s, ctx)?.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{KeyConfig, PianoKeyConfig, SectionChild};
    use amp_core::{MemoryProvider, Queue};

    const RATE: f32 = 48000.0;

    fn still(len: usize) -> Vec<Time> {
        vec![Time::default(); len + 1]
    }

    fn run(config: &EffectConfig, input: &[f32]) -> Vec<f32> {
        let provider = MemoryProvider::new();
        let ctx = BuildContext::new(RATE, &provider);
        let mut effect = build_effect(config, &ctx).unwrap();
        let mut buf = input.to_vec();
        let time = still(buf.len());
        effect.process(&mut buf, &time, &mut Queue::new());
        buf
    }

    #[test]
    fn chain_builds_in_order() {
        let config = EffectConfig::Chain {
            effects: vec![
                EffectConfig::Gain { gain: 0.5.into() },
                EffectConfig::Bias { bias: 1.0.into() },
            ],
        };
        assert_eq!(run(&config, &[2.0; 4]), [2.0; 4]);
    }

    #[test]
    fn section_keeps_mix() {
        let config = EffectConfig::Section {
            children: vec![SectionChild {
                mix: 0.5,
                effect: EffectConfig::Gain { gain: 3.0.into() },
            }],
        };
        // 0.5 * 3 + 0.5 * 1.
        assert_eq!(run(&config, &[1.0; 2]), [2.0; 2]);
    }

    #[test]
    fn clip_uses_the_named_curve() {
        let config = EffectConfig::Clip {
            curve: "hard".into(),
            sat: 0.8,
            max: 0.8,
        };
        assert_eq!(run(&config, &[1.0, -1.0, 0.5]), [0.8, -0.8, 0.5]);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let provider = MemoryProvider::new();
        let ctx = BuildContext::new(RATE, &provider);
        let bad = [
            EffectConfig::Math { op: "log".into() },
            EffectConfig::Filt {
                kind: "notch".into(),
                freq: 1000.0.into(),
                res: 0.0.into(),
            },
            EffectConfig::Reverb {
                kind: "plate".into(),
                len: 0.01,
                gain: 0.5.into(),
                low: 0.0.into(),
                high: 0.0.into(),
                delay: 0.0.into(),
            },
        ];
        for config in &bad {
            assert!(
                matches!(
                    build_effect(config, &ctx),
                    Err(ConfigError::InvalidParameter { .. })
                ),
                "{config:?}"
            );
        }
    }

    #[test]
    fn short_rings_are_rejected() {
        let provider = MemoryProvider::new();
        let ctx = BuildContext::new(RATE, &provider);
        let config = EffectConfig::Chorus {
            len: 1e-6,
            delay: 0.0.into(),
            depth: 0.0.into(),
            fb0: 0.0.into(),
            fb1: 0.0.into(),
        };
        let err = build_effect(&config, &ctx).unwrap_err();
        assert!(err.to_string().contains("shorter than one sample"), "{err}");
    }

    #[test]
    fn osc_needs_a_phase_source() {
        let provider = MemoryProvider::new();
        let ctx = BuildContext::new(RATE, &provider);
        let config = ModuleConfig::Osc {
            shape: "saw".into(),
            freq: None,
            phase: None,
        };
        assert!(matches!(
            build_module(&config, &ctx),
            Err(ConfigError::MissingField { ref field, .. }) if field == "freq"
        ));
    }

    #[test]
    fn empty_fold_is_rejected() {
        let provider = MemoryProvider::new();
        let ctx = BuildContext::new(RATE, &provider);
        let err = build_module(&ModuleConfig::Prod { params: vec![] }, &ctx).unwrap_err();
        assert_eq!(err.to_string(), "prod must not be empty");
    }

    #[test]
    fn ctrl_params_start_at_low() {
        let provider = MemoryProvider::new();
        let ctx = BuildContext::new(RATE, &provider);
        let param = ParamConfig::Ctrl {
            ctrl: CtrlConfig {
                low: 0.25,
                high: 2.0,
                ..CtrlConfig::default()
            },
        };
        let param = build_param(&param, &ctx).unwrap();
        assert_eq!(param.scalar(), Some(0.25));
    }

    #[test]
    fn piano_resolves_buffers_per_key() {
        let mut provider = MemoryProvider::new();
        provider.insert("c4.wav", 48000, vec![vec![0.5; 4]]);
        let ctx = BuildContext::new(RATE, &provider);
        let config = ModuleConfig::Piano {
            dev: 0,
            channel: 0,
            keys: vec![PianoKeyConfig {
                key: KeyConfig::Name("c4".into()),
                layers: vec![vec!["c4.wav".into()]],
            }],
        };
        let module = build_module(&config, &ctx).unwrap();
        assert_eq!(module.kind(), "piano");

        let missing = ModuleConfig::Piano {
            dev: 0,
            channel: 0,
            keys: vec![PianoKeyConfig {
                key: KeyConfig::Name("d4".into()),
                layers: vec![vec!["d4.wav".into()]],
            }],
        };
        assert!(matches!(
            build_module(&missing, &ctx),
            Err(ConfigError::Provider(_))
        ));
    }

    #[test]
    fn nodes_build_into_boxes() {
        let provider = MemoryProvider::new();
        let ctx = BuildContext::new(RATE, &provider);
        let boxed = build_node(&NodeConfig::Clock(ClockConfig::default()), &ctx).unwrap();
        assert!(matches!(boxed, Boxed::Clock(_)));
        let boxed = build_node(
            &NodeConfig::Handler(HandlerConfig::Ctrl(CtrlConfig::default())),
            &ctx,
        )
        .unwrap();
        assert!(boxed.into_param().is_ok());
    }
}
