use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;

use palisade_core::config::PerceptionConfig;
use palisade_core::gesture::{GestureIntent, HandPose};
use palisade_core::queue::ActionQueue;
use palisade_core::types::GridCell;

use crate::classifier::{classify_pose, GestureClassifier};
use crate::detector::{frame_codes, DetectorAdapter, SyntheticOracle};
use crate::frame::{Backoff, Frame, FrameSource, SyntheticSource, SyntheticStep};
use crate::landmarks::synthetic;
use crate::pipeline::PerceptionPipeline;

fn test_config() -> PerceptionConfig {
    PerceptionConfig {
        debounce_frames: 3,
        confidence_floor: 0.6,
        release_threshold: 0.4,
        window_size: 5,
        cooldown_frames: 4,
        ..Default::default()
    }
}

fn pose_frame(code: u8, timestamp_us: u64, sequence: u64) -> Frame {
    Frame {
        data: Arc::from([code, 128, 64].as_slice()),
        timestamp_us,
        sequence,
    }
}

// ---- Static pose classification ----

#[test]
fn test_classify_pose_all_templates() {
    for (pose, expected) in [
        (HandPose::OpenPalm, HandPose::OpenPalm),
        (HandPose::Fist, HandPose::Fist),
        (HandPose::Pinch, HandPose::Pinch),
        (HandPose::Point, HandPose::Point),
    ] {
        let set = synthetic::landmark_set(pose, 0.9, 0, 0);
        let (classified, confidence) = classify_pose(&set).expect("template must classify");
        assert_eq!(classified, expected, "template for {pose:?}");
        assert!((confidence - 0.9).abs() < 1e-6);
    }
}

// ---- Debounce ----

#[test]
fn test_no_emission_below_debounce() {
    // Run-lengths 1 and 2 below a debounce of 3 must never emit.
    for run_length in 1..3u64 {
        let mut classifier = GestureClassifier::new(&test_config());
        for i in 0..run_length {
            let set = synthetic::landmark_set(HandPose::OpenPalm, 0.8, i * 1000, i);
            assert!(
                classifier.push(&set).is_none(),
                "no event before debounce (run {run_length}, frame {i})"
            );
        }
    }
}

#[test]
fn test_emission_at_debounce_exactly_once() {
    let mut classifier = GestureClassifier::new(&test_config());
    let mut events = Vec::new();
    for i in 0..6u64 {
        let set = synthetic::landmark_set(HandPose::OpenPalm, 0.8, i * 1000, i);
        events.extend(classifier.push(&set));
    }
    // Confirmed on frame 3; frames 4-6 hold the confirmed state silently.
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].intent, GestureIntent::OpenPalm);
    assert_eq!(events[0].timestamp_us, 2000);
}

#[test]
fn test_below_floor_confidence_never_emits() {
    let mut classifier = GestureClassifier::new(&test_config());
    for i in 0..10u64 {
        let set = synthetic::landmark_set(HandPose::OpenPalm, 0.5, i * 1000, i);
        assert!(classifier.push(&set).is_none());
    }
}

#[test]
fn test_dropped_frames_keep_classifier_idle() {
    // Absence of data is not a gesture.
    let mut classifier = GestureClassifier::new(&test_config());
    for i in 0..10u64 {
        classifier.note_dropped(i * 1000);
    }
    let set = synthetic::landmark_set(HandPose::Fist, 0.9, 11_000, 11);
    assert!(classifier.push(&set).is_none());
}

// ---- Confirmation and release interplay ----

#[test]
fn test_open_palm_confirms_and_single_fist_does_not_cancel() {
    let mut classifier = GestureClassifier::new(&test_config());

    let mut events = Vec::new();
    for i in 0..3u64 {
        let set = synthetic::landmark_set(HandPose::OpenPalm, 0.8, i * 1000, i);
        events.extend(classifier.push(&set));
    }
    assert_eq!(events.len(), 1, "exactly one OpenPalm event");
    assert_eq!(events[0].intent, GestureIntent::OpenPalm);

    // A single following Fist frame: debounce not met, no emission,
    // and the confirmed OpenPalm is not prematurely released.
    let fist = synthetic::landmark_set(HandPose::Fist, 0.8, 3000, 3);
    assert!(classifier.push(&fist).is_none());

    // OpenPalm still confirmed: further palm frames do not re-emit.
    for i in 4..7u64 {
        let set = synthetic::landmark_set(HandPose::OpenPalm, 0.8, i * 1000, i);
        assert!(classifier.push(&set).is_none());
    }
}

#[test]
fn test_sustained_fist_eventually_replaces_palm() {
    let mut classifier = GestureClassifier::new(&test_config());
    for i in 0..3u64 {
        let set = synthetic::landmark_set(HandPose::OpenPalm, 0.8, i * 1000, i);
        let _ = classifier.push(&set);
    }

    // Window size 5: the fist gains the majority on the third fist
    // frame, then needs three consecutive dominant frames to confirm.
    let mut events = Vec::new();
    for i in 3..8u64 {
        let set = synthetic::landmark_set(HandPose::Fist, 0.8, i * 1000, i);
        events.extend(classifier.push(&set));
    }
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].intent, GestureIntent::Fist);
}

// ---- Cooldown ----

#[test]
fn test_cooldown_blocks_rearm_after_release() {
    let config = PerceptionConfig {
        window_size: 3,
        debounce_frames: 2,
        cooldown_frames: 4,
        ..test_config()
    };
    let mut classifier = GestureClassifier::new(&config);

    let t = std::cell::Cell::new(0u64);
    let palm = |c: &mut GestureClassifier| {
        t.set(t.get() + 1000);
        let now = t.get();
        c.push(&synthetic::landmark_set(HandPose::OpenPalm, 0.8, now, now / 1000))
    };

    assert!(palm(&mut classifier).is_none());
    assert!(palm(&mut classifier).is_some(), "confirm at debounce 2");

    // Window empties out: gesture releases, cooldown starts.
    for _ in 0..3 {
        t.set(t.get() + 1000);
        classifier.note_dropped(t.get());
    }

    // Four pushes consumed by cooldown, then two to re-confirm.
    let mut events = Vec::new();
    for _ in 0..6 {
        events.extend(palm(&mut classifier));
    }
    assert_eq!(events.len(), 1, "exactly one re-confirmation after cooldown");
}

// ---- Intent payloads ----

#[test]
fn test_pinch_event_carries_strength() {
    let mut classifier = GestureClassifier::new(&test_config());
    let mut events = Vec::new();
    for i in 0..3u64 {
        let set = synthetic::landmark_set(HandPose::Pinch, 0.9, i * 1000, i);
        events.extend(classifier.push(&set));
    }
    assert_eq!(events.len(), 1);
    match events[0].intent {
        GestureIntent::Pinch { strength } => {
            assert!(strength > 0.8, "template pinch is nearly closed, got {strength}");
        }
        other => panic!("expected Pinch, got {other:?}"),
    }
}

#[test]
fn test_point_event_maps_fingertip_to_region() {
    let config = test_config();
    let mut classifier = GestureClassifier::new(&config);
    // Aim at normalized (0.5, 0.25): col 6 of 12, row 2 of 9.
    let aim = Vec2::new(0.5, 0.25);
    let mut events = Vec::new();
    for i in 0..3u64 {
        let set = synthetic::landmark_set_aimed(HandPose::Point, 0.9, i * 1000, i, aim);
        events.extend(classifier.push(&set));
    }
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].intent,
        GestureIntent::PointAt {
            region: GridCell::new(6, 2)
        }
    );
}

// ---- Detector adapter ----

#[test]
fn test_detector_normalizes_synthetic_frame() {
    let mut adapter = DetectorAdapter::new(SyntheticOracle::new(0.9), &test_config());
    let set = adapter
        .detect(&pose_frame(frame_codes::OPEN_PALM, 0, 0))
        .expect("open palm frame must detect");
    let (pose, _) = classify_pose(&set).unwrap();
    assert_eq!(pose, HandPose::OpenPalm);
}

#[test]
fn test_detector_no_hand_is_no_detection() {
    let mut adapter = DetectorAdapter::new(SyntheticOracle::new(0.9), &test_config());
    assert!(adapter.detect(&pose_frame(frame_codes::NO_HAND, 0, 0)).is_none());
}

#[test]
fn test_detector_enforces_confidence_floor() {
    let mut adapter = DetectorAdapter::new(SyntheticOracle::new(0.5), &test_config());
    assert!(adapter.detect(&pose_frame(frame_codes::FIST, 0, 0)).is_none());
}

#[test]
fn test_detector_drops_over_budget_inference() {
    let config = PerceptionConfig {
        inference_budget_ms: 5,
        ..test_config()
    };
    let mut oracle = SyntheticOracle::new(0.9);
    oracle.delay = Duration::from_millis(25);
    let mut adapter = DetectorAdapter::new(oracle, &config);

    assert!(adapter.detect(&pose_frame(frame_codes::FIST, 0, 0)).is_none());
    assert_eq!(adapter.over_budget_drops(), 1);

    // The next frame proceeds independently once the oracle is fast again.
    let mut fast = DetectorAdapter::new(SyntheticOracle::new(0.9), &config);
    assert!(fast.detect(&pose_frame(frame_codes::FIST, 1000, 1)).is_some());
}

// ---- Backoff ----

#[test]
fn test_backoff_doubles_to_cap_and_resets() {
    let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_millis(800));
    assert_eq!(backoff.on_failure(), Duration::from_millis(100));
    assert_eq!(backoff.on_failure(), Duration::from_millis(200));
    assert_eq!(backoff.on_failure(), Duration::from_millis(400));
    assert_eq!(backoff.on_failure(), Duration::from_millis(800));
    assert_eq!(backoff.on_failure(), Duration::from_millis(800), "capped");
    backoff.on_success();
    assert!(backoff.current().is_none());
    assert_eq!(backoff.on_failure(), Duration::from_millis(100));
}

// ---- Pipeline ----

#[test]
fn test_pipeline_emits_into_queue() {
    let config = test_config();
    let queue = Arc::new(ActionQueue::with_capacity(config.queue_capacity));
    let frames = (0..4u64)
        .map(|i| pose_frame(frame_codes::OPEN_PALM, i * 33_000, i))
        .collect();
    let source = SyntheticSource::from_frames(frames);
    let mut pipeline = PerceptionPipeline::new(
        &config,
        source,
        SyntheticOracle::new(0.8),
        Arc::clone(&queue),
    );

    while pipeline.step() {}

    let action = queue.pop().expect("one confirmed gesture");
    assert_eq!(action.event.intent, GestureIntent::OpenPalm);
    assert_eq!(
        action.deadline_us,
        action.event.timestamp_us + config.action_deadline_ms * 1000
    );
    assert!(queue.pop().is_none(), "exactly one event");
    assert_eq!(pipeline.stats().frames_processed, 4);
}

#[test]
fn test_pipeline_survives_source_loss() {
    let config = PerceptionConfig {
        backoff_base_ms: 1,
        backoff_cap_ms: 4,
        ..test_config()
    };
    let queue = Arc::new(ActionQueue::with_capacity(8));
    let mut steps = vec![SyntheticStep::Unavailable];
    for i in 0..3u64 {
        steps.push(SyntheticStep::Frame(pose_frame(
            frame_codes::FIST,
            (i + 1) * 33_000,
            i,
        )));
    }
    let source = SyntheticSource::new(steps);
    let mut pipeline =
        PerceptionPipeline::new(&config, source, SyntheticOracle::new(0.8), Arc::clone(&queue));

    // First step hits the lost device; later steps recover after backoff.
    for _ in 0..64 {
        let _ = pipeline.step();
        std::thread::sleep(Duration::from_millis(1));
    }

    assert_eq!(pipeline.stats().source_errors, 1);
    assert_eq!(pipeline.stats().frames_processed, 3);
    assert_eq!(queue.pop().expect("fist confirmed").event.intent, GestureIntent::Fist);
}

#[test]
fn test_pipeline_pause_resume_idempotent() {
    let config = test_config();
    let queue = Arc::new(ActionQueue::with_capacity(8));
    let frames = (0..2u64)
        .map(|i| pose_frame(frame_codes::OPEN_PALM, i * 33_000, i))
        .collect();
    let mut pipeline = PerceptionPipeline::new(
        &config,
        SyntheticSource::from_frames(frames),
        SyntheticOracle::new(0.8),
        queue,
    );

    pipeline.pause();
    pipeline.pause();
    assert!(pipeline.is_paused());
    assert!(!pipeline.step(), "paused pipeline processes nothing");

    pipeline.resume();
    pipeline.resume();
    assert!(!pipeline.is_paused());
    assert!(pipeline.step(), "frames flow again after resume");
}

// ---- Frame source contract ----

#[test]
fn test_synthetic_source_stop_releases() {
    let mut source =
        SyntheticSource::from_frames(vec![pose_frame(frame_codes::OPEN_PALM, 0, 0)]);
    source.stop();
    source.stop();
    assert!(matches!(
        source.acquire(Duration::from_millis(1)),
        Ok(None)
    ));
    source.start().unwrap();
    assert!(source.acquire(Duration::from_millis(1)).unwrap().is_some());
}
