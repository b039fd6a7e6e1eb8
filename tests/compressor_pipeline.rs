//! End-to-end tests: frames cross a ring buffer, then run through the compressor.

mod helpers;

use approx::assert_relative_eq;
use helpers::tolerances::*;
use helpers::*;
use ostinato::prelude::*;
use ostinato::{DataFileSearch, PriorityOutcome};
use std::fs;
use std::thread;

#[test]
fn test_limiter_behind_ring_buffer() {
    const CHANNELS: usize = 2;
    const FRAMES: usize = 96_000;
    const BLOCK: usize = 256;

    let hot: Vec<f32> = generate_sine(220.0, TEST_SAMPLE_RATE as f64, FRAMES)
        .into_iter()
        .map(|s| s * 2.5)
        .collect();
    let source = interleave(&[hot.clone(), hot]);

    let (mut tx, mut rx) = RingBuffer::new(4 * BLOCK, CHANNELS * 4, true).unwrap().split();

    let mixer = thread::spawn(move || {
        let mut sent = 0;
        while sent < FRAMES {
            let n = tx.write_pod(&source[sent * CHANNELS..]);
            sent += n;
            if n == 0 {
                thread::yield_now();
            }
        }
    });

    let device = thread::spawn(move || {
        // level 0 leaves scheduling alone
        assert_eq!(RealtimePriority::new(0).request(), PriorityOutcome::Skipped);

        let mut limiter = CompressorSettings::limiter(CHANNELS, TEST_SAMPLE_RATE).build();
        let mut frames = vec![0.0f32; BLOCK * CHANNELS];
        let mut rendered: Vec<Vec<f32>> = vec![Vec::new(); CHANNELS];
        let mut done = 0;

        while done < FRAMES {
            let n = rx.read_pod(&mut frames[..]);
            if n == 0 {
                thread::yield_now();
                continue;
            }
            let mut block = deinterleave(&frames[..n * CHANNELS], CHANNELS);
            limiter.process(n, &mut block);
            for (out, ch) in rendered.iter_mut().zip(&block) {
                out.extend_from_slice(ch);
            }
            done += n;
        }
        (rendered, limiter.gain_reduction_db())
    });

    mixer.join().unwrap();
    let (rendered, reduction) = device.join().unwrap();

    assert_eq!(rendered[0].len(), FRAMES);
    assert_eq!(rendered[0], rendered[1]);
    // skip the first 100 ms while the automation settles
    let settled = &rendered[0][4800..];
    assert!(peak(settled) <= 1.0 + PERCEPTUAL_EPSILON, "peak {}", peak(settled));
    assert_has_audio(settled, 0.3);
    assert!(reduction > 0.0);
}

#[test]
fn test_look_ahead_latency_across_blocks() {
    let k = 37;
    let mut comp = Compressor::builder()
        .channels(1)
        .sample_rate(TEST_SAMPLE_RATE)
        .threshold_db(0.0)
        .look_ahead_seconds(k as f32 / TEST_SAMPLE_RATE)
        .build();
    assert_eq!(comp.look_ahead(), k);

    let position = 1000;
    let input = generate_impulse(4096, position, 0.5);
    let out = process_in_blocks(&mut comp, &[input], 100);

    assert_relative_eq!(out[0][position + k], 0.5, epsilon = FLOAT_EPSILON);
    let mut rest = out[0].clone();
    rest[position + k] = 0.0;
    assert_silence(&rest, FLOAT_EPSILON);
}

#[test]
fn test_block_size_does_not_change_output() {
    let settings = Compressor::builder()
        .channels(2)
        .sample_rate(TEST_SAMPLE_RATE)
        .threshold_db(-18.0)
        .ratio(6.0)
        .look_ahead_seconds(0.002)
        .hold_seconds(0.003)
        .auto(AutoFlags::NONE.attack(true).release(true).post_gain(true));

    let signals = vec![generate_noise(20_000, 1), generate_noise(20_000, 2)];
    let reference = process_in_blocks(&mut settings.build(), &signals, MAX_BLOCK_LENGTH);
    for block in [1, 17, 64, 500] {
        let out = process_in_blocks(&mut settings.build(), &signals, block);
        for (a, b) in out.iter().flatten().zip(reference.iter().flatten()) {
            assert_relative_eq!(a, b, epsilon = DSP_EPSILON);
        }
    }
}

#[test]
fn test_higher_ratio_lowers_rms_on_noise() {
    let signals = vec![generate_noise(48_000, 3)];
    let mut previous = f32::INFINITY;
    for ratio in [1.0, 1.5, 3.0, 10.0, 100.0] {
        let mut comp = Compressor::builder()
            .channels(1)
            .sample_rate(TEST_SAMPLE_RATE)
            .threshold_db(-12.0)
            .ratio(ratio)
            .build();
        let level = rms(&process_in_blocks(&mut comp, &signals, TEST_BUFFER_SIZE)[0]);
        assert!(level <= previous + FLOAT_EPSILON, "ratio {}: {} > {}", ratio, level, previous);
        previous = level;
    }
}

#[test]
fn test_silence_in_silence_out() {
    let mut comp = CompressorSettings::limiter(2, TEST_SAMPLE_RATE).build();
    let signals = vec![generate_silence(10_000), generate_dc(0.0, 10_000)];
    let out = process_in_blocks(&mut comp, &signals, TEST_BUFFER_SIZE);
    for ch in &out {
        assert_silence(ch, SILENCE_THRESHOLD);
        assert!(ch.iter().all(|&s| s == 0.0));
    }
}

#[test]
fn test_presets_found_by_data_file_search() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let root = tempfile::TempDir::new().unwrap();
    let presets = root.path().join("ostinato").join("presets");
    fs::create_dir_all(&presets).unwrap();

    let gentle = Compressor::builder().ratio(2.0).threshold_db(-24.0);
    let limiter = CompressorSettings::limiter(2, 48000.0);
    fs::write(presets.join("gentle.json"), serde_json::to_string(&gentle).unwrap()).unwrap();
    fs::write(presets.join("Limiter.JSON"), serde_json::to_string(&limiter).unwrap()).unwrap();
    fs::write(presets.join("readme.txt"), "not a preset").unwrap();

    let search = DataFileSearch::with_roots(root.path(), vec![root.path().to_path_buf()]);
    let found = search.find_in("json", "ostinato/presets");
    assert_eq!(found.len(), 2);

    let loaded: Vec<CompressorSettings> = found
        .iter()
        .map(|p| serde_json::from_str(&fs::read_to_string(p).unwrap()).unwrap())
        .collect();
    // sorted by file name: "Limiter.JSON" < "gentle.json"
    assert_eq!(loaded[0], limiter);
    assert_eq!(loaded[1], gentle);
    assert_eq!(loaded[0].build().look_ahead(), 48);
}

#[test]
fn test_engine_config_drives_priority_request() {
    let config: EngineConfig =
        serde_json::from_str(r#"{ "sample_rate": 48000.0, "rt_priority_level": 0 }"#).unwrap();
    config.validate().unwrap();
    assert_eq!(
        RealtimePriority::from_config(&config).request(),
        PriorityOutcome::Skipped
    );
}
