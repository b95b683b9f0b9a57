//! Property-based tests for amp-core nodes.
//!
//! The core rendering contract: feeding a node `N` samples in one call or in
//! any sequence of smaller blocks gives the same output. Checked for stateful
//! leaves (oscillators, envelopes, reverberator taps, chorus, filters), for
//! parameter-driven nodes whose parameters are themselves modules, for the
//! delaying pan instrument and for schedules running on a clock.

use amp_core::{
    Adsr, Basic, Bias, Chorus, Effect, Event, Filt, Gain, Info, Instr, Module, Note, Osc, OscShape,
    Pan, Patch, Queue, Ramp, Reverb, ReverbKind, Sched, Time,
};
use proptest::prelude::*;

const RATE: f32 = 48000.0;

fn still(len: usize) -> Vec<Time> {
    vec![Time::default(); len + 1]
}

fn run_effect(mut effect: Effect, input: &[f32], block: usize) -> Vec<f32> {
    let mut out = input.to_vec();
    for chunk in out.chunks_mut(block) {
        effect.process(chunk, &still(chunk.len()), &mut Queue::new());
    }
    out
}

fn run_module(mut module: Module, len: usize, block: usize) -> Vec<f32> {
    let mut out = vec![0.0; len];
    for chunk in out.chunks_mut(block) {
        module.process(chunk, &still(chunk.len()), &mut Queue::new());
    }
    out
}

/// A phase ramp scaled into `[0, scale)`.
fn slow_ramp(freq: f32, scale: f32) -> Module {
    Patch::new(
        Ramp::new(freq.into(), RATE).into(),
        Gain::new(scale.into()).into(),
    )
    .into()
}

fn reverb_kind(i: usize) -> ReverbKind {
    match i % 4 {
        0 => ReverbKind::Comb,
        1 => ReverbKind::Allpass,
        2 => ReverbKind::Lpcf,
        _ => ReverbKind::Bpcf,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn oscillators_are_block_size_independent(
        freq in 20.0f32..5000.0,
        shape in 0usize..6,
        len in 1usize..512,
        block in 1usize..64,
    ) {
        let shape = ["sine", "tri", "square", "saw", "rsaw", "impulse"][shape];
        let make = || -> Module {
            Osc::new(
                OscShape::from_name(shape).unwrap(),
                Ramp::new(freq.into(), RATE).into(),
            )
            .into()
        };
        prop_assert_eq!(run_module(make(), len, block), run_module(make(), len, len));
    }

    #[test]
    fn envelope_is_block_size_independent(
        atk in 0.0001f64..0.005,
        decay in 0.0001f64..0.005,
        sus in 0.0f64..1.0,
        len in 1usize..1024,
        block in 1usize..64,
    ) {
        let make = || -> Module {
            let mut env = Adsr::new(0.0, 1.0, atk, decay, sus, 0.01, f64::from(RATE));
            let note = Note { init: true, delay: 0, key: 60, freq: 261.6, vel: 0.8 };
            env.info(&mut Info::Note(&note));
            env.into()
        };
        prop_assert_eq!(run_module(make(), len, block), run_module(make(), len, len));
    }

    #[test]
    fn reverb_taps_are_block_size_independent(
        input in prop::collection::vec(-1.0f32..1.0, 1..512),
        kind in 0usize..4,
        gain in -0.9f32..0.9,
        block in 1usize..64,
    ) {
        let make = || -> Effect {
            Reverb::new(reverb_kind(kind), 0.0005, RATE)
                .with_gain(gain.into())
                .with_band(300.0.into(), 3000.0.into())
                .into()
        };
        let whole = run_effect(make(), &input, input.len());
        prop_assert_eq!(run_effect(make(), &input, block), whole);
    }

    #[test]
    fn modulated_nodes_are_block_size_independent(
        input in prop::collection::vec(-1.0f32..1.0, 1..512),
        rate in 0.5f32..40.0,
        block in 1usize..64,
    ) {
        let vcomb = || -> Effect {
            Reverb::new(ReverbKind::Vcomb, 0.001, RATE)
                .with_gain(0.5.into())
                .with_delay(slow_ramp(rate, 0.0009).into())
                .into()
        };
        let whole = run_effect(vcomb(), &input, input.len());
        prop_assert_eq!(run_effect(vcomb(), &input, block), whole);

        let chorus = || -> Effect {
            Chorus::new(
                0.002,
                RATE,
                slow_ramp(rate, 1.0).into(),
                0.5.into(),
                0.3.into(),
                0.2.into(),
            )
            .into()
        };
        let whole = run_effect(chorus(), &input, input.len());
        prop_assert_eq!(run_effect(chorus(), &input, block), whole);

        let sweep = || -> Effect {
            let cutoff = Patch::new(slow_ramp(rate, 2000.0), Bias::new(200.0.into()).into());
            Filt::moog(Module::from(cutoff).into(), 0.8.into(), RATE).into()
        };
        let whole = run_effect(sweep(), &input, input.len());
        prop_assert_eq!(run_effect(sweep(), &input, block), whole);
    }

    #[test]
    fn delayed_pan_is_block_size_independent(
        input in prop::collection::vec(-1.0f32..1.0, 1..256),
        block in 1usize..32,
    ) {
        let run = |block: usize| {
            let pan = Pan::new(0.8.into(), 0.6.into(), 0.0002, 0.0, f64::from(RATE));
            let mut pan = Instr::from(pan);
            let mut l = input.clone();
            let mut r = input.clone();
            for (cl, cr) in l.chunks_mut(block).zip(r.chunks_mut(block)) {
                pan.process(cl, cr, &still(cl.len()), &mut Queue::new());
            }
            (l, r)
        };
        prop_assert_eq!(run(block), run(input.len()));
    }

    #[test]
    fn schedule_is_block_size_independent(
        steps in prop::collection::btree_set(0u16..16, 1..8),
        len in 1usize..96,
        block in 1usize..20,
    ) {
        let run = |block: usize| {
            let mut sched: Sched = steps
                .iter()
                .map(|&s| (Time::new(0, f64::from(s) * 0.25), Event::new(0, s, 1)))
                .collect();
            // One sample per quarter beat.
            let mut clock = Basic::new(60.0, 4.0, 4.0);
            clock.set_running(true);
            let mut fired = Vec::new();
            let mut pos = 0;
            while pos < len {
                let n = block.min(len - pos);
                let mut time = vec![Time::default(); n + 1];
                clock.process(&mut time);
                let mut queue = Queue::new();
                sched.process(&time, &mut queue);
                fired.extend(queue.actions().iter().map(|a| (pos + a.delay, a.event.key)));
                pos += n;
            }
            fired
        };
        prop_assert_eq!(run(block), run(len));
    }
}
