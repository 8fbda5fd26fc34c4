//! Perception thread — runs the pipeline at camera/model cadence.
//!
//! Pausing releases the capture device without touching game state;
//! the simulation keeps its own clock and never blocks on this thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use palisade_perception::detector::LandmarkOracle;
use palisade_perception::frame::FrameSource;
use palisade_perception::PerceptionPipeline;

/// Idle sleep while paused or when no frame was ready.
const IDLE_SLEEP: Duration = Duration::from_millis(5);

/// Spawns the perception loop in a new thread.
pub fn spawn_perception_loop<S, O>(
    mut pipeline: PerceptionPipeline<S, O>,
    paused: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()>
where
    S: FrameSource + Send + 'static,
    O: LandmarkOracle + Send + 'static,
{
    std::thread::Builder::new()
        .name("palisade-perception".into())
        .spawn(move || {
            info!("perception loop started");
            loop {
                if shutdown.load(Ordering::Acquire) {
                    // Release the device deterministically on teardown.
                    pipeline.pause();
                    info!("perception loop shutting down");
                    return;
                }

                if paused.load(Ordering::Acquire) {
                    pipeline.pause();
                    std::thread::sleep(IDLE_SLEEP);
                    continue;
                }
                pipeline.resume();

                if !pipeline.step() {
                    std::thread::sleep(IDLE_SLEEP);
                }
            }
        })
        .expect("failed to spawn perception thread")
}
