//! Feedback events emitted by the simulation for UI and persistence
//! collaborators. Published inside each tick's snapshot.

use serde::{Deserialize, Serialize};

use crate::enums::{AbilityKind, RejectReason, TowerKind};
use crate::types::GridCell;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedbackEvent {
    /// A tower was placed and paid for.
    TowerPlaced { kind: TowerKind, cell: GridCell },
    /// The selected tower kind changed.
    TowerSelected { kind: TowerKind },
    /// A player command was rejected; simulation state unchanged.
    CommandRejected { reason: RejectReason },
    /// An ability fired at a cell.
    AbilityTriggered { kind: AbilityKind, cell: GridCell },
    /// A wave began spawning.
    WaveStarted { wave_index: u32 },
    /// An enemy was killed; reward credited.
    EnemySlain { enemy_id: u32, reward: u32 },
    /// An enemy reached the end of its path; a life was lost.
    EnemyLeaked { enemy_id: u32 },
    /// All waves cleared; emitted at the completing tick boundary.
    LevelComplete { level_index: u32 },
    /// Lives exhausted.
    LevelFailed { level_index: u32 },
    /// Economy totals at a wave/level boundary, for external saving.
    EconomySnapshot { currency: u32, lives: u32, tick: u64 },
    /// A tick was rolled back after an invariant violation.
    SimulationFaulted { detail: String },
}
