//! Stable landmark schema.
//!
//! The detector adapter normalizes whatever positional arrays the
//! underlying model emits into this named schema, so the classifier
//! and everything downstream are isolated from model churn.

use glam::Vec2;

/// Named keypoints tracked on the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkId {
    Wrist,
    /// Midpoint between wrist and middle-finger base.
    PalmCenter,
    ThumbTip,
    IndexBase,
    IndexTip,
    MiddleBase,
    MiddleTip,
    RingTip,
    PinkyTip,
}

impl LandmarkId {
    pub const COUNT: usize = 9;

    pub const ALL: [LandmarkId; Self::COUNT] = [
        LandmarkId::Wrist,
        LandmarkId::PalmCenter,
        LandmarkId::ThumbTip,
        LandmarkId::IndexBase,
        LandmarkId::IndexTip,
        LandmarkId::MiddleBase,
        LandmarkId::MiddleTip,
        LandmarkId::RingTip,
        LandmarkId::PinkyTip,
    ];

    /// Stable storage index within a `LandmarkSet`.
    pub fn index(self) -> usize {
        match self {
            LandmarkId::Wrist => 0,
            LandmarkId::PalmCenter => 1,
            LandmarkId::ThumbTip => 2,
            LandmarkId::IndexBase => 3,
            LandmarkId::IndexTip => 4,
            LandmarkId::MiddleBase => 5,
            LandmarkId::MiddleTip => 6,
            LandmarkId::RingTip => 7,
            LandmarkId::PinkyTip => 8,
        }
    }
}

/// A single detected keypoint in normalized image coordinates
/// (x, y in [0,1], y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub position: Vec2,
    /// Relative depth from the camera plane (model-defined units).
    pub depth: f32,
    /// Detection confidence in [0,1].
    pub confidence: f32,
}

/// One frame's worth of named landmarks. Immutable after creation;
/// lives only long enough to produce zero or one gesture events.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LandmarkId::COUNT],
    /// Timestamp of the source frame (microseconds).
    pub timestamp_us: u64,
    /// Sequence number of the source frame.
    pub sequence: u64,
}

impl LandmarkSet {
    pub fn new(points: [Landmark; LandmarkId::COUNT], timestamp_us: u64, sequence: u64) -> Self {
        Self {
            points,
            timestamp_us,
            sequence,
        }
    }

    pub fn get(&self, id: LandmarkId) -> Landmark {
        self.points[id.index()]
    }

    /// Mean confidence across all keypoints.
    pub fn aggregate_confidence(&self) -> f32 {
        let sum: f32 = self.points.iter().map(|p| p.confidence).sum();
        sum / LandmarkId::COUNT as f32
    }
}

/// Raw, model-facing landmark output: positional arrays in whatever
/// order the perception model uses. Never leaves the detector adapter.
#[derive(Debug, Clone, Default)]
pub struct RawLandmarks {
    /// (x, y, depth) triples, indexed by the model's joint numbering.
    pub points: Vec<[f32; 3]>,
    /// Per-point confidence, parallel to `points`. May be shorter;
    /// missing entries default to 1.0.
    pub confidences: Vec<f32>,
}

/// Synthetic landmark geometry for tests and the headless demo.
pub mod synthetic {
    use super::*;
    use palisade_core::gesture::HandPose;

    /// Canonical named-point geometry for a pose, in normalized image
    /// coordinates. `aim` shifts the index fingertip for Point poses.
    pub fn pose_points(pose: HandPose, aim: Vec2) -> [(LandmarkId, Vec2); LandmarkId::COUNT] {
        let wrist = Vec2::new(0.5, 0.8);
        let palm = Vec2::new(0.5, 0.6);
        let index_base = Vec2::new(0.44, 0.48);
        let middle_base = Vec2::new(0.5, 0.47);

        // Fingertip positions: extended tips sit far from the palm,
        // curled tips sit within the fist radius.
        let (thumb, index, middle, ring, pinky) = match pose {
            HandPose::OpenPalm => (
                Vec2::new(0.28, 0.44),
                Vec2::new(0.42, 0.28),
                Vec2::new(0.50, 0.25),
                Vec2::new(0.58, 0.28),
                Vec2::new(0.68, 0.35),
            ),
            HandPose::Fist => (
                Vec2::new(0.42, 0.58),
                Vec2::new(0.47, 0.52),
                Vec2::new(0.50, 0.52),
                Vec2::new(0.53, 0.53),
                Vec2::new(0.56, 0.56),
            ),
            HandPose::Pinch => (
                Vec2::new(0.44, 0.38),
                Vec2::new(0.45, 0.39),
                Vec2::new(0.52, 0.30),
                Vec2::new(0.58, 0.32),
                Vec2::new(0.66, 0.38),
            ),
            HandPose::Point => (
                Vec2::new(0.46, 0.55),
                aim,
                Vec2::new(0.50, 0.53),
                Vec2::new(0.53, 0.54),
                Vec2::new(0.56, 0.56),
            ),
        };

        [
            (LandmarkId::Wrist, wrist),
            (LandmarkId::PalmCenter, palm),
            (LandmarkId::ThumbTip, thumb),
            (LandmarkId::IndexBase, index_base),
            (LandmarkId::IndexTip, index),
            (LandmarkId::MiddleBase, middle_base),
            (LandmarkId::MiddleTip, middle),
            (LandmarkId::RingTip, ring),
            (LandmarkId::PinkyTip, pinky),
        ]
    }

    /// Build a complete `LandmarkSet` for a pose at uniform confidence.
    pub fn landmark_set(
        pose: HandPose,
        confidence: f32,
        timestamp_us: u64,
        sequence: u64,
    ) -> LandmarkSet {
        landmark_set_aimed(pose, confidence, timestamp_us, sequence, Vec2::new(0.5, 0.25))
    }

    /// Like `landmark_set`, with an explicit index-fingertip position
    /// for Point poses.
    pub fn landmark_set_aimed(
        pose: HandPose,
        confidence: f32,
        timestamp_us: u64,
        sequence: u64,
        aim: Vec2,
    ) -> LandmarkSet {
        let mut points = [Landmark::default(); LandmarkId::COUNT];
        for (id, position) in pose_points(pose, aim) {
            points[id.index()] = Landmark {
                position,
                depth: 0.0,
                confidence,
            };
        }
        LandmarkSet::new(points, timestamp_us, sequence)
    }
}
