//! Enumeration types used throughout the game core.

use serde::{Deserialize, Serialize};

/// Tower archetype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Fast single-target tower, cheap, short range.
    #[default]
    Arrow,
    /// Slow heavy-damage tower, long range.
    Cannon,
    /// Medium tower that fires fast projectiles at high cadence.
    Frost,
}

impl TowerKind {
    /// Next kind in the selection cycle (OpenPalm cycles through these).
    pub fn next(self) -> TowerKind {
        match self {
            TowerKind::Arrow => TowerKind::Cannon,
            TowerKind::Cannon => TowerKind::Frost,
            TowerKind::Frost => TowerKind::Arrow,
        }
    }
}

/// Enemy archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, fragile runner.
    Runner,
    /// Slow, heavily armored walker.
    Armored,
    /// Mid-speed unit arriving in large numbers.
    Swarmer,
}

/// Paid ability triggered by gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Area damage burst centered on the cursor cell.
    Shockwave,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    /// All levels cleared.
    Victory,
    /// Lives exhausted.
    Defeat,
    /// Repeated simulation faults; engine refuses to advance.
    Halted,
}

/// Why a player command was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Tower cost exceeds current currency.
    InsufficientFunds,
    /// Target cell already holds a tower.
    CellOccupied,
    /// Target cell is outside the board.
    OutOfBounds,
    /// Target cell lies on the enemy path.
    OnPath,
    /// Gesture strength below the actuation threshold.
    WeakGesture,
    /// Command arrived while no level was active.
    NotActive,
}
