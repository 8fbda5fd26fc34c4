//! Landmark detector adapter.
//!
//! Wraps an opaque, potentially slow, potentially failing perception
//! model and normalizes its positional output into the stable named
//! schema. Enforces a per-call latency budget (freshness over
//! completeness) and a confidence floor. Stateless across calls.

use std::time::{Duration, Instant};

use glam::Vec2;
use tracing::{debug, warn};

use palisade_core::config::PerceptionConfig;
use palisade_core::errors::PerceptionError;
use palisade_core::gesture::HandPose;

use crate::frame::Frame;
use crate::landmarks::{synthetic, Landmark, LandmarkId, LandmarkSet, RawLandmarks};

/// The opaque perception model. `Ok(None)` means no hand in frame.
pub trait LandmarkOracle {
    fn infer(&mut self, frame: &Frame) -> Result<Option<RawLandmarks>, PerceptionError>;
}

/// Raw joint numbering of the 21-point hand model the oracle emits.
mod raw_index {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_BASE: usize = 5;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_BASE: usize = 9;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;
    pub const POINT_COUNT: usize = 21;
}

/// Adapter from the oracle's raw output to `LandmarkSet`.
pub struct DetectorAdapter<O> {
    oracle: O,
    budget: Duration,
    confidence_floor: f32,
    over_budget_drops: u64,
}

impl<O: LandmarkOracle> DetectorAdapter<O> {
    pub fn new(oracle: O, config: &PerceptionConfig) -> Self {
        Self {
            oracle,
            budget: Duration::from_millis(config.inference_budget_ms),
            confidence_floor: config.confidence_floor,
            over_budget_drops: 0,
        }
    }

    /// Detect landmarks in one frame. Returns `None` for no-detection,
    /// sub-floor confidence, over-budget inference, or oracle failure;
    /// the frame is simply skipped and the next proceeds independently.
    pub fn detect(&mut self, frame: &Frame) -> Option<LandmarkSet> {
        let started = Instant::now();
        let raw = match self.oracle.infer(frame) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(sequence = frame.sequence, %err, "oracle failed, frame skipped");
                return None;
            }
        };

        let took = started.elapsed();
        if took > self.budget {
            self.over_budget_drops += 1;
            let err = PerceptionError::InferenceTimeout {
                budget_ms: self.budget.as_millis() as u64,
                took_ms: took.as_millis() as u64,
            };
            warn!(sequence = frame.sequence, %err, "stale inference abandoned");
            return None;
        }

        let set = self.normalize(&raw, frame)?;
        if set.aggregate_confidence() < self.confidence_floor {
            debug!(
                sequence = frame.sequence,
                confidence = set.aggregate_confidence(),
                "detection below confidence floor"
            );
            return None;
        }
        Some(set)
    }

    /// Frames dropped because inference overran the budget.
    pub fn over_budget_drops(&self) -> u64 {
        self.over_budget_drops
    }

    /// Map the raw positional array into the named schema.
    fn normalize(&self, raw: &RawLandmarks, frame: &Frame) -> Option<LandmarkSet> {
        if raw.points.len() < raw_index::POINT_COUNT {
            warn!(
                sequence = frame.sequence,
                points = raw.points.len(),
                "oracle emitted a truncated landmark array"
            );
            return None;
        }

        let pick = |idx: usize| -> Landmark {
            let [x, y, depth] = raw.points[idx];
            Landmark {
                position: Vec2::new(x, y),
                depth,
                confidence: raw.confidences.get(idx).copied().unwrap_or(1.0),
            }
        };

        let wrist = pick(raw_index::WRIST);
        let middle_base = pick(raw_index::MIDDLE_BASE);
        let palm_center = Landmark {
            position: (wrist.position + middle_base.position) * 0.5,
            depth: (wrist.depth + middle_base.depth) * 0.5,
            confidence: wrist.confidence.min(middle_base.confidence),
        };

        let mut points = [Landmark::default(); LandmarkId::COUNT];
        points[LandmarkId::Wrist.index()] = wrist;
        points[LandmarkId::PalmCenter.index()] = palm_center;
        points[LandmarkId::ThumbTip.index()] = pick(raw_index::THUMB_TIP);
        points[LandmarkId::IndexBase.index()] = pick(raw_index::INDEX_BASE);
        points[LandmarkId::IndexTip.index()] = pick(raw_index::INDEX_TIP);
        points[LandmarkId::MiddleBase.index()] = middle_base;
        points[LandmarkId::MiddleTip.index()] = pick(raw_index::MIDDLE_TIP);
        points[LandmarkId::RingTip.index()] = pick(raw_index::RING_TIP);
        points[LandmarkId::PinkyTip.index()] = pick(raw_index::PINKY_TIP);

        Some(LandmarkSet::new(points, frame.timestamp_us, frame.sequence))
    }
}

/// Frame-buffer encoding used by the synthetic oracle: byte 0 selects
/// the pose, bytes 1..3 encode the Point aim in 1/255ths of the image.
pub mod frame_codes {
    pub const NO_HAND: u8 = 0;
    pub const OPEN_PALM: u8 = 1;
    pub const FIST: u8 = 2;
    pub const PINCH: u8 = 3;
    pub const POINT: u8 = 4;
}

/// Deterministic oracle for tests and headless runs: decodes the pose
/// scripted into the frame buffer and emits the canonical 21-point
/// template for it.
pub struct SyntheticOracle {
    /// Confidence reported for every emitted point.
    pub confidence: f32,
    /// Artificial inference delay, for exercising the latency budget.
    pub delay: Duration,
}

impl SyntheticOracle {
    pub fn new(confidence: f32) -> Self {
        Self {
            confidence,
            delay: Duration::ZERO,
        }
    }
}

impl LandmarkOracle for SyntheticOracle {
    fn infer(&mut self, frame: &Frame) -> Result<Option<RawLandmarks>, PerceptionError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let pose = match frame.data.first().copied() {
            None | Some(frame_codes::NO_HAND) => return Ok(None),
            Some(frame_codes::OPEN_PALM) => HandPose::OpenPalm,
            Some(frame_codes::FIST) => HandPose::Fist,
            Some(frame_codes::PINCH) => HandPose::Pinch,
            Some(frame_codes::POINT) => HandPose::Point,
            Some(code) => {
                return Err(PerceptionError::DetectorFailure(format!(
                    "unknown frame code {code}"
                )))
            }
        };

        let aim = match (frame.data.get(1), frame.data.get(2)) {
            (Some(&x), Some(&y)) => Vec2::new(x as f32 / 255.0, y as f32 / 255.0),
            _ => Vec2::new(0.5, 0.25),
        };

        // Start every joint at the wrist, then place the named subset;
        // the classifier only reads named points.
        let named = synthetic::pose_points(pose, aim);
        let wrist = named[0].1;
        let mut points = vec![[wrist.x, wrist.y, 0.0]; raw_index::POINT_COUNT];
        for (id, position) in named {
            let idx = match id {
                LandmarkId::Wrist => raw_index::WRIST,
                LandmarkId::ThumbTip => raw_index::THUMB_TIP,
                LandmarkId::IndexBase => raw_index::INDEX_BASE,
                LandmarkId::IndexTip => raw_index::INDEX_TIP,
                LandmarkId::MiddleBase => raw_index::MIDDLE_BASE,
                LandmarkId::MiddleTip => raw_index::MIDDLE_TIP,
                LandmarkId::RingTip => raw_index::RING_TIP,
                LandmarkId::PinkyTip => raw_index::PINKY_TIP,
                // Derived by the adapter, not present in raw output.
                LandmarkId::PalmCenter => continue,
            };
            points[idx] = [position.x, position.y, 0.0];
        }

        Ok(Some(RawLandmarks {
            confidences: vec![self.confidence; points.len()],
            points,
        }))
    }
}
