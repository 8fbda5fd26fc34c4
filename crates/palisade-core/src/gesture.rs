//! Gesture vocabulary: discrete hand poses and the events they produce.
//!
//! `GestureEvent` is the only value that crosses from the perception
//! pipeline into the simulation, via the action queue.

use serde::{Deserialize, Serialize};

use crate::types::GridCell;

/// Discrete hand pose classified from a single landmark set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandPose {
    /// All fingers extended.
    OpenPalm,
    /// All fingertips curled to the palm.
    Fist,
    /// Thumb and index fingertips together.
    Pinch,
    /// Index finger extended, others curled.
    Point,
}

impl HandPose {
    pub const ALL: [HandPose; 4] = [
        HandPose::OpenPalm,
        HandPose::Fist,
        HandPose::Pinch,
        HandPose::Point,
    ];

    /// Stable index for per-pose bookkeeping tables.
    pub fn index(self) -> usize {
        match self {
            HandPose::OpenPalm => 0,
            HandPose::Fist => 1,
            HandPose::Pinch => 2,
            HandPose::Point => 3,
        }
    }
}

/// Player intent decoded from a confirmed gesture (or touch fallback).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GestureIntent {
    /// Aim the placement cursor at a board region.
    PointAt { region: GridCell },
    /// Actuate at the cursor; strength is normalized pinch closure in [0,1].
    Pinch { strength: f32 },
    /// Cycle the selected tower kind.
    OpenPalm,
    /// Trigger the area ability at the cursor.
    Fist,
    /// Touch fallback: aim and actuate in one step.
    TapAt { cell: GridCell },
}

/// A confirmed gesture with the confidence and timestamp of the
/// landmark window that produced it. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub intent: GestureIntent,
    /// Aggregate confidence over the confirming window, in [0,1].
    pub confidence: f32,
    /// Monotonic pipeline timestamp (microseconds) of the newest
    /// landmark set in the confirming window.
    pub timestamp_us: u64,
}
