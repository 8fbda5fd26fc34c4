//! Gesture classifier.
//!
//! Converts the stream of landmark sets into discrete gesture events.
//! Per-set classification is a deterministic geometric rule (fingertip
//! distances); temporal smoothing is a bounded sliding window with a
//! majority vote; emission is gated by a per-gesture state machine
//! with debounce, release hysteresis, and a re-arm cooldown.

use std::collections::VecDeque;

use glam::Vec2;
use tracing::debug;

use palisade_core::config::PerceptionConfig;
use palisade_core::gesture::{GestureEvent, GestureIntent, HandPose};
use palisade_core::types::GridCell;

use crate::landmarks::{LandmarkId, LandmarkSet};

/// Thumb-to-index gap below which the hand reads as a pinch.
const PINCH_CLOSE_THRESHOLD: f32 = 0.06;

/// Gap at which a pinch counts as fully open (strength 0).
const PINCH_OPEN_SPAN: f32 = 0.25;

/// Fingertip-to-palm distance under which a finger counts as curled;
/// all five curled reads as a fist.
const FIST_THRESHOLD: f32 = 0.12;

/// Fingertip-to-palm distance beyond which a finger counts as extended.
const EXTEND_THRESHOLD: f32 = 0.18;

/// Classify the static pose of a single landmark set.
/// Returns the pose and the set's aggregate confidence.
pub fn classify_pose(set: &LandmarkSet) -> Option<(HandPose, f32)> {
    let palm = set.get(LandmarkId::PalmCenter).position;
    let thumb = set.get(LandmarkId::ThumbTip).position;
    let index = set.get(LandmarkId::IndexTip).position;
    let middle = set.get(LandmarkId::MiddleTip).position;
    let ring = set.get(LandmarkId::RingTip).position;
    let pinky = set.get(LandmarkId::PinkyTip).position;

    let confidence = set.aggregate_confidence();

    // Pinch first: thumb and index tips together override the
    // extended/curled reading of the remaining fingers.
    if thumb.distance(index) < PINCH_CLOSE_THRESHOLD {
        return Some((HandPose::Pinch, confidence));
    }

    let tip_dists = [
        thumb.distance(palm),
        index.distance(palm),
        middle.distance(palm),
        ring.distance(palm),
        pinky.distance(palm),
    ];

    if tip_dists.iter().all(|d| *d < FIST_THRESHOLD) {
        return Some((HandPose::Fist, confidence));
    }

    let [_, index_ext, middle_ext, ring_ext, pinky_ext] =
        tip_dists.map(|d| d > EXTEND_THRESHOLD);

    if index_ext && !middle_ext && !ring_ext && !pinky_ext {
        return Some((HandPose::Point, confidence));
    }
    if index_ext && middle_ext && ring_ext && pinky_ext {
        return Some((HandPose::OpenPalm, confidence));
    }

    None
}

/// Normalized pinch closure: 0 at an open span, 1 at contact.
fn pinch_strength(set: &LandmarkSet) -> f32 {
    let gap = set
        .get(LandmarkId::ThumbTip)
        .position
        .distance(set.get(LandmarkId::IndexTip).position);
    ((PINCH_OPEN_SPAN - gap) / PINCH_OPEN_SPAN).clamp(0.0, 1.0)
}

/// One window slot. `pose` is `None` for dropped or unclassifiable
/// frames; those dilute the vote but never count as a gesture.
#[derive(Debug, Clone, Copy)]
struct WindowSample {
    pose: Option<HandPose>,
    confidence: f32,
    timestamp_us: u64,
    pinch_strength: f32,
    index_tip: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackState {
    Idle,
    Candidate,
    Confirmed,
}

/// Per-gesture debounce track.
#[derive(Debug, Clone, Copy)]
struct PoseTrack {
    state: TrackState,
    /// Consecutive pushes in which this pose was the dominant vote.
    consecutive: u32,
    /// Pushes remaining before this pose may re-arm after release.
    cooldown_remaining: u32,
}

impl Default for PoseTrack {
    fn default() -> Self {
        Self {
            state: TrackState::Idle,
            consecutive: 0,
            cooldown_remaining: 0,
        }
    }
}

/// Result of the window vote.
struct Dominant {
    pose: HandPose,
    /// Mean confidence of the samples voting for the pose.
    confidence: f32,
    votes: usize,
}

pub struct GestureClassifier {
    window: VecDeque<WindowSample>,
    tracks: [PoseTrack; HandPose::ALL.len()],
    window_size: usize,
    debounce_frames: u32,
    cooldown_frames: u32,
    confidence_floor: f32,
    release_threshold: f32,
    board_cols: i32,
    board_rows: i32,
}

impl GestureClassifier {
    pub fn new(config: &PerceptionConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(config.window_size),
            tracks: Default::default(),
            window_size: config.window_size.max(1),
            debounce_frames: config.debounce_frames.max(1),
            cooldown_frames: config.cooldown_frames,
            confidence_floor: config.confidence_floor,
            release_threshold: config.release_threshold,
            board_cols: config.board_cols,
            board_rows: config.board_rows,
        }
    }

    /// Feed one landmark set; emits at most one gesture event.
    pub fn push(&mut self, set: &LandmarkSet) -> Option<GestureEvent> {
        let sample = match classify_pose(set) {
            Some((pose, confidence)) if confidence >= self.confidence_floor => WindowSample {
                pose: Some(pose),
                confidence,
                timestamp_us: set.timestamp_us,
                pinch_strength: pinch_strength(set),
                index_tip: set.get(LandmarkId::IndexTip).position,
            },
            _ => Self::invalid_sample(set.timestamp_us),
        };
        self.advance(sample)
    }

    /// Record a dropped frame so stale window contents age out.
    /// Absence of data is not a gesture.
    pub fn note_dropped(&mut self, timestamp_us: u64) {
        let _ = self.advance(Self::invalid_sample(timestamp_us));
    }

    fn invalid_sample(timestamp_us: u64) -> WindowSample {
        WindowSample {
            pose: None,
            confidence: 0.0,
            timestamp_us,
            pinch_strength: 0.0,
            index_tip: Vec2::ZERO,
        }
    }

    fn advance(&mut self, sample: WindowSample) -> Option<GestureEvent> {
        if self.window.len() == self.window_size {
            self.window.pop_front();
        }
        self.window.push_back(sample);

        let dominant = self.vote();

        let mut emitted = None;
        for pose in HandPose::ALL {
            let is_dominant = dominant
                .as_ref()
                .is_some_and(|d| d.pose == pose);
            let track = &mut self.tracks[pose.index()];

            match track.state {
                TrackState::Idle => {
                    if track.cooldown_remaining > 0 {
                        track.cooldown_remaining -= 1;
                    } else if is_dominant {
                        track.state = TrackState::Candidate;
                        track.consecutive = 1;
                        if track.consecutive >= self.debounce_frames {
                            track.state = TrackState::Confirmed;
                            emitted = Some(pose);
                        }
                    }
                }
                TrackState::Candidate => {
                    if is_dominant {
                        track.consecutive += 1;
                        if track.consecutive >= self.debounce_frames {
                            track.state = TrackState::Confirmed;
                            emitted = Some(pose);
                        }
                    } else {
                        track.state = TrackState::Idle;
                        track.consecutive = 0;
                    }
                }
                TrackState::Confirmed => {
                    let released = match &dominant {
                        Some(d) => d.pose != pose || d.confidence < self.release_threshold,
                        None => true,
                    };
                    if released {
                        track.state = TrackState::Idle;
                        track.consecutive = 0;
                        track.cooldown_remaining = self.cooldown_frames;
                        debug!(?pose, "gesture released");
                    }
                }
            }
        }

        // At most one pose can newly confirm per push (only the
        // dominant pose advances), so `emitted` holds zero or one.
        emitted.and_then(|pose| self.build_event(pose))
    }

    /// Majority vote over valid window samples. Ties break to the
    /// higher aggregate confidence; a persistent tie is no
    /// classification at all.
    fn vote(&self) -> Option<Dominant> {
        let mut tally: [(usize, f32); HandPose::ALL.len()] = Default::default();
        let mut valid = 0usize;
        for sample in &self.window {
            if let Some(pose) = sample.pose {
                let slot = &mut tally[pose.index()];
                slot.0 += 1;
                slot.1 += sample.confidence;
                valid += 1;
            }
        }
        if valid == 0 {
            return None;
        }

        let mut best: Option<Dominant> = None;
        let mut tied = false;
        for pose in HandPose::ALL {
            let (votes, conf_sum) = tally[pose.index()];
            if votes == 0 {
                continue;
            }
            let candidate = Dominant {
                pose,
                confidence: conf_sum / votes as f32,
                votes,
            };
            match &best {
                None => best = Some(candidate),
                Some(current) => {
                    if candidate.votes > current.votes {
                        best = Some(candidate);
                        tied = false;
                    } else if candidate.votes == current.votes {
                        if candidate.confidence > current.confidence {
                            best = Some(candidate);
                            tied = false;
                        } else if (candidate.confidence - current.confidence).abs() < f32::EPSILON {
                            tied = true;
                        }
                    }
                }
            }
        }
        if tied {
            return None;
        }
        best
    }

    /// Build the event for a newly confirmed pose from the samples
    /// that voted for it.
    fn build_event(&self, pose: HandPose) -> Option<GestureEvent> {
        let voters: Vec<&WindowSample> = self
            .window
            .iter()
            .filter(|s| s.pose == Some(pose))
            .collect();
        if voters.is_empty() {
            return None;
        }

        let confidence =
            voters.iter().map(|s| s.confidence).sum::<f32>() / voters.len() as f32;
        let timestamp_us = voters.iter().map(|s| s.timestamp_us).max().unwrap_or(0);

        let intent = match pose {
            HandPose::OpenPalm => GestureIntent::OpenPalm,
            HandPose::Fist => GestureIntent::Fist,
            HandPose::Pinch => {
                let strength = voters.iter().map(|s| s.pinch_strength).sum::<f32>()
                    / voters.len() as f32;
                GestureIntent::Pinch { strength }
            }
            HandPose::Point => {
                let mean_tip = voters.iter().map(|s| s.index_tip).sum::<Vec2>()
                    / voters.len() as f32;
                GestureIntent::PointAt {
                    region: self.map_region(mean_tip),
                }
            }
        };

        debug!(?intent, confidence, "gesture confirmed");
        Some(GestureEvent {
            intent,
            confidence,
            timestamp_us,
        })
    }

    /// Map a normalized fingertip position onto a board cell.
    fn map_region(&self, tip: Vec2) -> GridCell {
        let col = ((tip.x * self.board_cols as f32).floor() as i32)
            .clamp(0, self.board_cols - 1);
        let row = ((tip.y * self.board_rows as f32).floor() as i32)
            .clamp(0, self.board_rows - 1);
        GridCell::new(col, row)
    }
}
