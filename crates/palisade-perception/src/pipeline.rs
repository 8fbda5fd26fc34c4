//! The perception pipeline: acquire → detect → classify → enqueue.
//!
//! Runs on its own thread at camera/model cadence, fully decoupled
//! from the simulation clock. Every failure here degrades to "no new
//! input"; nothing on this path can fail the simulation.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use palisade_core::config::PerceptionConfig;
use palisade_core::queue::{ActionQueue, QueuedAction};

use crate::classifier::GestureClassifier;
use crate::detector::{DetectorAdapter, LandmarkOracle};
use crate::frame::{BackoffSource, FrameSource};

/// Running pipeline counters, for diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineStats {
    pub frames_processed: u64,
    pub frames_dropped: u64,
    pub detections: u64,
    pub events_emitted: u64,
    pub source_errors: u64,
}

pub struct PerceptionPipeline<S, O> {
    source: BackoffSource<S>,
    adapter: DetectorAdapter<O>,
    classifier: GestureClassifier,
    queue: Arc<ActionQueue>,
    frame_timeout: Duration,
    action_deadline_us: u64,
    paused: bool,
    stats: PipelineStats,
}

impl<S: FrameSource, O: LandmarkOracle> PerceptionPipeline<S, O> {
    pub fn new(config: &PerceptionConfig, source: S, oracle: O, queue: Arc<ActionQueue>) -> Self {
        Self {
            source: BackoffSource::new(
                source,
                Duration::from_millis(config.backoff_base_ms),
                Duration::from_millis(config.backoff_cap_ms),
            ),
            adapter: DetectorAdapter::new(oracle, config),
            classifier: GestureClassifier::new(config),
            queue,
            frame_timeout: Duration::from_millis(config.frame_timeout_ms),
            action_deadline_us: config.action_deadline_ms * 1000,
            paused: false,
            stats: PipelineStats::default(),
        }
    }

    /// Run one pipeline step. Returns true if a frame was processed.
    pub fn step(&mut self) -> bool {
        if self.paused {
            return false;
        }

        let frame = match self.source.acquire(self.frame_timeout) {
            Ok(Some(frame)) => frame,
            Ok(None) => return false,
            Err(err) => {
                self.stats.source_errors += 1;
                warn!(%err, "frame acquisition failed");
                return false;
            }
        };

        self.stats.frames_processed += 1;
        match self.adapter.detect(&frame) {
            Some(set) => {
                self.stats.detections += 1;
                if let Some(event) = self.classifier.push(&set) {
                    self.stats.events_emitted += 1;
                    self.queue.push(QueuedAction {
                        event,
                        deadline_us: event.timestamp_us + self.action_deadline_us,
                    });
                }
            }
            None => {
                self.stats.frames_dropped += 1;
                self.classifier.note_dropped(frame.timestamp_us);
            }
        }
        true
    }

    /// Stop frame acquisition and release the capture device.
    /// Idempotent; safe to call at any time.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.source.stop();
            info!("perception pipeline paused, device released");
        }
    }

    /// Re-acquire the device and resume. Idempotent.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            if let Err(err) = self.source.start() {
                // Reacquisition keeps retrying with backoff from here.
                warn!(%err, "device reacquisition failed on resume");
            }
            info!("perception pipeline resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }
}
