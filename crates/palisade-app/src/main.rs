//! Headless demo: drives the full perception-to-simulation pipeline
//! with a scripted synthetic camera and logs the board state.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use palisade_app::Runtime;
use palisade_core::config::{PerceptionConfig, SimConfig};
use palisade_perception::detector::{frame_codes, SyntheticOracle};
use palisade_perception::frame::{Frame, SyntheticSource, SyntheticStep};

/// Scripted "camera feed": aim at a buildable cell, pinch to place a
/// tower, then lose the device briefly to exercise reacquisition.
fn demo_script() -> Vec<SyntheticStep> {
    let mut steps = Vec::new();
    let mut timestamp_us = 0u64;
    let mut sequence = 0u64;

    let mut frames = |steps: &mut Vec<SyntheticStep>, code: u8, aim: (u8, u8), count: usize| {
        for _ in 0..count {
            steps.push(SyntheticStep::Frame(Frame {
                data: Arc::from([code, aim.0, aim.1].as_slice()),
                timestamp_us,
                sequence,
            }));
            timestamp_us += 33_000;
            sequence += 1;
        }
    };

    // Point at roughly cell (3, 2) on the default 12x9 board, hold
    // long enough to debounce, then pinch to place.
    frames(&mut steps, frame_codes::POINT, (74, 64), 5);
    frames(&mut steps, frame_codes::PINCH, (74, 64), 5);
    steps.push(SyntheticStep::Unavailable);
    frames(&mut steps, frame_codes::NO_HAND, (0, 0), 3);
    // Cycle the selection, then trigger the shockwave.
    frames(&mut steps, frame_codes::OPEN_PALM, (0, 0), 8);
    frames(&mut steps, frame_codes::FIST, (0, 0), 8);
    steps
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let runtime = Runtime::start(
        SimConfig::default(),
        PerceptionConfig::default(),
        SyntheticSource::new(demo_script()),
        SyntheticOracle::new(0.85),
    );
    runtime.start_game();

    for _ in 0..30 {
        std::thread::sleep(Duration::from_millis(200));
        let snapshot = runtime.latest_snapshot();
        info!(
            tick = snapshot.time.tick,
            phase = ?snapshot.phase,
            towers = snapshot.towers.len(),
            enemies = snapshot.enemies.len(),
            currency = snapshot.economy.currency,
            lives = snapshot.economy.lives,
            "board state"
        );
        for event in &snapshot.feedback {
            info!(?event, "feedback");
        }
    }

    runtime.shutdown();
}
