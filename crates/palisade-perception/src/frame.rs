//! Frame acquisition: the capture-device contract, a reacquisition
//! backoff policy, and a scripted source for tests and headless runs.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use palisade_core::errors::PerceptionError;

/// One captured camera frame. Owned by the frame source until handed
/// to the detector; dropped once landmarks are extracted.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Opaque pixel buffer.
    pub data: Arc<[u8]>,
    /// Monotonic capture timestamp, microseconds since pipeline start.
    pub timestamp_us: u64,
    /// Capture sequence number, strictly increasing.
    pub sequence: u64,
}

/// A capture device. Implementations hold exclusive ownership of the
/// underlying device while started and must release it in `stop`.
pub trait FrameSource {
    /// Deliver the next frame, waiting at most `timeout`.
    /// `Ok(None)` means no frame was ready. Frames arrive in capture
    /// order with monotonically increasing timestamps.
    fn acquire(&mut self, timeout: Duration) -> Result<Option<Frame>, PerceptionError>;

    /// Re-open the device after a `stop`. Idempotent.
    fn start(&mut self) -> Result<(), PerceptionError>;

    /// Release the device. Idempotent; safe to call at any time.
    fn stop(&mut self);
}

/// Exponential backoff schedule for device reacquisition.
/// Pure policy so the growth curve is testable without sleeping.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    cap: Duration,
    current: Option<Duration>,
}

impl Backoff {
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self {
            base,
            cap,
            current: None,
        }
    }

    /// Interval to wait after another failure. Doubles up to the cap.
    pub fn on_failure(&mut self) -> Duration {
        let next = match self.current {
            None => self.base,
            Some(current) => (current * 2).min(self.cap),
        };
        self.current = Some(next);
        next
    }

    /// Reset after a successful acquisition.
    pub fn on_success(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<Duration> {
        self.current
    }
}

/// Wraps a `FrameSource` with exponential-backoff reacquisition:
/// after `SourceUnavailable`, acquisition attempts are suppressed
/// until the backoff interval elapses, growing up to the cap.
pub struct BackoffSource<S> {
    inner: S,
    backoff: Backoff,
    retry_at: Option<Instant>,
    last_timestamp_us: u64,
}

impl<S: FrameSource> BackoffSource<S> {
    pub fn new(inner: S, base: Duration, cap: Duration) -> Self {
        Self {
            inner,
            backoff: Backoff::new(base, cap),
            retry_at: None,
            last_timestamp_us: 0,
        }
    }

    pub fn acquire(&mut self, timeout: Duration) -> Result<Option<Frame>, PerceptionError> {
        if let Some(retry_at) = self.retry_at {
            if Instant::now() < retry_at {
                return Ok(None);
            }
            self.retry_at = None;
        }

        match self.inner.acquire(timeout) {
            Ok(Some(frame)) => {
                debug_assert!(
                    frame.timestamp_us >= self.last_timestamp_us,
                    "frame timestamps must be monotonic"
                );
                self.last_timestamp_us = frame.timestamp_us;
                self.backoff.on_success();
                Ok(Some(frame))
            }
            Ok(None) => Ok(None),
            Err(err @ PerceptionError::SourceUnavailable(_)) => {
                let wait = self.backoff.on_failure();
                self.retry_at = Some(Instant::now() + wait);
                warn!(backoff_ms = wait.as_millis() as u64, "capture source lost, backing off");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn start(&mut self) -> Result<(), PerceptionError> {
        self.retry_at = None;
        self.inner.start()
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }
}

/// One scripted step of a `SyntheticSource`.
#[derive(Debug, Clone)]
pub enum SyntheticStep {
    /// Deliver a frame.
    Frame(Frame),
    /// Simulate a lost device for this acquisition.
    Unavailable,
    /// Deliver nothing (timeout elapses with no frame ready).
    Empty,
}

/// Deterministic scripted frame source for tests and headless runs.
pub struct SyntheticSource {
    steps: VecDeque<SyntheticStep>,
    running: bool,
}

impl SyntheticSource {
    pub fn new(steps: Vec<SyntheticStep>) -> Self {
        Self {
            steps: steps.into(),
            running: true,
        }
    }

    /// Source delivering the given frames in order.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self::new(frames.into_iter().map(SyntheticStep::Frame).collect())
    }

    /// Whether the script has been fully consumed.
    pub fn exhausted(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FrameSource for SyntheticSource {
    fn acquire(&mut self, _timeout: Duration) -> Result<Option<Frame>, PerceptionError> {
        if !self.running {
            return Ok(None);
        }
        match self.steps.pop_front() {
            Some(SyntheticStep::Frame(frame)) => Ok(Some(frame)),
            Some(SyntheticStep::Unavailable) => Err(PerceptionError::SourceUnavailable(
                "synthetic device lost".to_string(),
            )),
            Some(SyntheticStep::Empty) | None => Ok(None),
        }
    }

    fn start(&mut self) -> Result<(), PerceptionError> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            debug!("synthetic source stopped");
        }
        self.running = false;
    }
}
