//! Integration tests for amp-core.
//!
//! Whole graphs driven through the public API: containers in order, silence
//! through untriggered voices, deep copies, sample buffers shared through a
//! provider and sequenced performances rendered by the engine.

use amp_core::{
    Adsr, Basic, Bias, BufferProvider, Chain, Clip, Effect, Engine, Event, Gain, Gen, Id, Inject,
    Instr, Looper, MemoryProvider, Mixer, Module, ProviderError, Queue, Repeat, Reverb, Sample,
    Sched, Section, Single, Synth, Time, Track, Trig,
};

/// `len + 1` boundaries of a stopped timeline.
fn still(len: usize) -> Vec<Time> {
    vec![Time::default(); len + 1]
}

/// Four samples per beat, four beats per bar.
fn slow_clock() -> Basic {
    Basic::new(60.0, 4.0, 4.0)
}

fn trig_synth(voices: usize) -> Module {
    Synth::new(0, 0, voices, Module::from(Trig::new(1.0))).into()
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn gain_then_clip_runs_in_order() {
    let mut chain: Effect = [
        Effect::from(Gain::new(0.5.into())),
        Effect::from(Clip::hard(0.8)),
    ]
    .into_iter()
    .collect::<Chain>()
    .into();
    let mut buf = [1.0; 10];
    chain.process(&mut buf, &still(10), &mut Queue::new());
    assert_eq!(buf, [0.5; 10]);
}

#[test]
fn clip_before_gain_changes_the_result() {
    let mut chain: Chain = [
        Effect::from(Clip::hard(0.8)),
        Effect::from(Gain::new(0.5.into())),
    ]
    .into_iter()
    .collect();
    let mut buf = [1.0; 4];
    chain.process(&mut buf, &still(4), &mut Queue::new());
    assert_eq!(buf, [0.4; 4]);
}

#[test]
fn untriggered_voices_stay_silent() {
    for len in [0, 1, 64, 44100] {
        let mut chain = Chain::new();
        chain.append(Gen::new(trig_synth(4)).into());
        chain.append(Gen::new(trig_synth(2)).into());
        let mut section = Section::new();
        section.append(1.0, Gen::new(trig_synth(1)).into());
        section.append(0.5, chain.clone().into());

        let mut a = vec![0.0; len];
        let mut b = vec![0.0; len];
        let time = still(len);
        assert!(!chain.process(&mut a, &time, &mut Queue::new()));
        assert!(!section.process(&mut b, &time, &mut Queue::new()));
        assert_eq!(a.len(), len);
        assert!(a.iter().chain(b.iter()).all(|&x| x == 0.0));
    }
}

#[test]
fn section_blends_each_child_with_the_input() {
    let mut section = Section::new();
    section.append(1.0, Gain::new(2.0.into()).into());
    section.append(0.25, Bias::new(1.0.into()).into());
    let mut buf = [1.0; 3];
    section.process(&mut buf, &still(3), &mut Queue::new());
    // 2.0 from the first child, 0.25 * 2.0 + 0.75 * 1.0 from the second.
    assert_eq!(buf, [3.25; 3]);
}

// ============================================================================
// Copies
// ============================================================================

const BLOCK: usize = 64;

/// Block `b` of a timeline running one beat per sample.
fn beats(b: usize) -> Vec<Time> {
    (0..=BLOCK)
        .map(|i| {
            let idx = b * BLOCK + i;
            Time {
                idx: idx as i64,
                bar: 0,
                beat: idx as f64,
            }
        })
        .collect()
}

/// Block 1 is silent so only carried state sounds in it.
fn block_input(b: usize) -> Vec<f32> {
    if b == 1 {
        return vec![0.0; BLOCK];
    }
    (0..BLOCK)
        .map(|i| (((i + 7 * b) * 37) % 11) as f32 / 11.0 - 0.5)
        .collect()
}

/// Notes and record triggers on device 0; later blocks disturb a copy.
fn block_queue(b: usize) -> Queue {
    let mut q = Queue::new();
    match b {
        0 => {
            q.add(3, Event::new(0, 60, 65535));
            q.add(3, Event::new(0, 10, 65535));
        }
        1 => {
            q.add(5, Event::new(0, 60, 0));
        }
        _ => {
            q.add(0, Event::new(0, 62, 65535));
            q.add(1, Event::new(0, 10, 65535));
            q.add(9, Event::new(0, 10, 0));
        }
    }
    q
}

fn adsr_synth() -> Module {
    Synth::new(0, 0, 2, Adsr::new(0.0, 1.0, 0.001, 0.01, 0.5, 0.1, 48000.0).into()).into()
}

fn comb_chain() -> Effect {
    [
        Effect::from(Reverb::comb(0.0005, 0.5.into(), 48000.0)),
        Effect::from(Gain::new(0.5.into())),
    ]
    .into_iter()
    .collect::<Chain>()
    .into()
}

/// Runs block 0, copies, drives the copy with other blocks, then checks
/// that block 1 of the original matches a node that was never copied.
fn assert_copies_independent<T: Clone>(
    make: impl Fn() -> T,
    run: impl Fn(&mut T, usize) -> Vec<f32>,
) {
    let mut reference = make();
    let want = vec![run(&mut reference, 0), run(&mut reference, 1)];
    assert!(want[1].iter().any(|&x| x != 0.0), "no state reaches block 1");

    let mut original = make();
    let first = run(&mut original, 0);
    let mut copy = original.clone();
    for b in 2..5 {
        run(&mut copy, b);
    }
    drop(copy);
    let second = run(&mut original, 1);
    assert_eq!(vec![first, second], want);
}

fn run_effect(effect: &mut Effect, b: usize) -> Vec<f32> {
    let mut buf = block_input(b);
    effect.process(&mut buf, &beats(b), &mut block_queue(b));
    buf
}

#[test]
fn copies_do_not_share_state() {
    assert_copies_independent(comb_chain, run_effect);
}

#[test]
fn nested_container_copies_do_not_share_state() {
    let make = || -> Effect {
        let mut inner = Section::new();
        inner.append(1.0, comb_chain());
        inner.append(0.5, Gen::new(adsr_synth()).into());
        let mut outer = Chain::new();
        outer.append(inner.into());
        outer.append(Reverb::comb(0.0003, 0.3.into(), 48000.0).into());
        outer.into()
    };
    assert_copies_independent(make, run_effect);
}

#[test]
fn looper_copies_do_not_share_state() {
    let make = || -> Effect { Looper::new(BLOCK, Time::new(0, 4.0), Id::new(0, 10)).into() };
    assert_copies_independent(make, run_effect);
}

#[test]
fn synth_copies_do_not_share_state() {
    assert_copies_independent(adsr_synth, |synth, b| {
        let mut buf = vec![0.0; BLOCK];
        synth.process(&mut buf, &beats(b), &mut block_queue(b));
        buf
    });
}

#[test]
fn mixer_copies_do_not_share_state() {
    let make = || -> Instr {
        let mut mixer = Mixer::new();
        mixer.append(Single::new(0, comb_chain()).into());
        let mut voiced = Chain::new();
        voiced.append(Gen::new(adsr_synth()).into());
        voiced.append(Reverb::comb(0.0003, 0.3.into(), 48000.0).into());
        mixer.append(Single::new(1, voiced.into()).into());
        mixer.into()
    };
    assert_copies_independent(make, |mixer, b| {
        let mut left = block_input(b);
        let mut right = block_input(b);
        mixer.process(&mut left, &mut right, &beats(b), &mut block_queue(b));
        left.extend(right);
        left
    });
}

#[test]
fn track_reads_silence_before_any_write() {
    let track = Track::new();
    let mut buf = [1.0; 50];
    track.read(&mut buf, 1000);
    assert_eq!(buf, [0.0; 50]);
    assert_eq!(track.segments(), 0);
}

// ============================================================================
// Sample buffers
// ============================================================================

#[test]
fn provider_buffers_are_shared_until_last_holder_drops() {
    let mut provider = MemoryProvider::new();
    provider.insert("kick.wav", 48000, vec![vec![1.0, 0.5, 0.25]]);
    let buf = provider.load("kick.wav", 0, 48000).unwrap();
    let probe = buf.clone();

    let mut sample = Sample::new(1, 0.5);
    sample.add_layer(vec![buf]);
    let instr = Instr::from(Single::new(0, Gen::new(sample.into()).into()));
    let mut engine = Engine::new(slow_clock().into(), instr);

    let before = probe.holders();
    let copy = engine.clone();
    assert_eq!(probe.holders(), before + 1);
    drop(copy);
    assert_eq!(probe.holders(), before);

    engine.push(1, Event::new(0, 36, 65535));
    let (mut l, mut r) = ([0.0; 6], [0.0; 6]);
    assert!(!engine.process(&mut l, &mut r));
    assert_eq!(l, [0.0, 1.0, 0.5, 0.25, 0.0, 0.0]);
    assert_eq!(r, [0.0; 6]);
}

#[test]
fn provider_reports_missing_buffers() {
    let mut provider = MemoryProvider::new();
    provider.insert("snare.wav", 44100, vec![vec![0.0; 8]]);
    assert!(matches!(
        provider.load("hat.wav", 0, 44100),
        Err(ProviderError::NotFound { .. })
    ));
    assert!(matches!(
        provider.load("snare.wav", 1, 44100),
        Err(ProviderError::InvalidChannel { available: 1, .. })
    ));
    // Loading at another rate converts the length.
    assert_eq!(provider.load("snare.wav", 0, 88200).unwrap().len(), 16);
}

// ============================================================================
// Performances
// ============================================================================

fn two_note_bar() -> Sched {
    [
        (Time::new(0, 0.0), Event::new(0, 69, 65535)),
        (Time::new(0, 2.0), Event::new(0, 81, 65535)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn repeated_bar_plays_every_bar() {
    let instr = Instr::from(Single::new(0, Gen::new(trig_synth(2)).into()));
    let seq = Repeat::new(0, 1, two_note_bar().into());
    let mut engine = Engine::new(slow_clock().into(), instr).with_seq(seq.into());
    engine.start();

    let (mut l, mut r) = (vec![0.0; 48], vec![0.0; 48]);
    engine.render(&mut l, &mut r, 5);
    for bar in 0..3 {
        assert_eq!(l[bar * 16], 440.0, "bar {bar}");
        assert!((l[bar * 16 + 8] - 880.0).abs() < 1e-3, "bar {bar}");
    }
}

#[test]
fn note_onsets_do_not_depend_on_block_size() {
    let run = |block: usize| {
        let instr = Instr::from(Single::new(0, Gen::new(trig_synth(2)).into()));
        let seq = Repeat::new(0, 1, two_note_bar().into());
        let mut engine = Engine::new(slow_clock().into(), instr).with_seq(seq.into());
        engine.start();
        let (mut l, mut r) = (vec![0.0; 40], vec![0.0; 40]);
        engine.render(&mut l, &mut r, block);
        // Where the second note first sounds.
        l.iter().position(|&x| x > 500.0)
    };
    assert_eq!(run(40), Some(8));
    assert_eq!(run(3), Some(8));
    assert_eq!(run(1), Some(8));
}

#[test]
fn stopped_transport_plays_nothing_from_the_schedule() {
    let instr = Instr::from(Single::new(0, Gen::new(trig_synth(1)).into()));
    let mut engine = Engine::new(slow_clock().into(), instr).with_seq(two_note_bar().into());
    let (mut l, mut r) = ([0.0; 32], [0.0; 32]);
    engine.render(&mut l, &mut r, 8);
    assert_eq!(l, [0.0; 32]);
}

#[test]
fn injected_sequence_stays_in_its_branch() {
    let inject = Inject::new(
        two_note_bar().into(),
        Single::new(0, Gen::new(trig_synth(1)).into()).into(),
    );
    let mut mixer = Mixer::new();
    mixer.append(inject.into());
    // Listens to the same device, but never sees the injected notes.
    mixer.append(Single::new(1, Gen::new(trig_synth(1)).into()).into());
    let mut engine = Engine::new(slow_clock().into(), mixer.into());
    engine.start();

    let (mut l, mut r) = ([0.0; 4], [0.0; 4]);
    engine.process(&mut l, &mut r);
    assert_eq!(l, [440.0; 4]);
    assert_eq!(r, [0.0; 4]);
    assert!(engine.queue().is_empty());
}

#[test]
fn seek_moves_both_clock_and_schedule() {
    let instr = Instr::from(Single::new(0, Gen::new(trig_synth(1)).into()));
    let mut engine = Engine::new(slow_clock().into(), instr).with_seq(two_note_bar().into());
    let seek = engine.seek(0, 1.0);
    assert_eq!(seek.idx, 4);
    engine.start();
    let (mut l, mut r) = ([0.0; 8], [0.0; 8]);
    engine.process(&mut l, &mut r);
    // Beat 2 is four samples after beat 1.
    assert_eq!(l[..4], [0.0; 4]);
    assert!((l[4] - 880.0).abs() < 1e-3);
}
