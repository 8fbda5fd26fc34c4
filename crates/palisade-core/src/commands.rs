//! Player commands applied at tick boundaries.
//!
//! Lifecycle commands arrive from the platform layer; gameplay
//! commands are produced inside the simulation by interpreting
//! confirmed gestures against the cursor and selection state.

use serde::{Deserialize, Serialize};

use crate::enums::{AbilityKind, TowerKind};
use crate::types::GridCell;

/// Commands from the platform/lifecycle layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start the first level from the main menu.
    StartGame,
    /// Freeze the simulation clock. Idempotent.
    Pause,
    /// Unfreeze the simulation clock. Idempotent.
    Resume,
    /// Set time scale (1.0 = normal, clamped to [0.25, 4.0]).
    SetTimeScale { scale: f64 },
}

/// A gameplay command decoded from a gesture, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoardCommand {
    MoveCursor { cell: GridCell },
    PlaceTower { kind: TowerKind, cell: GridCell },
    CycleTowerKind,
    TriggerAbility { kind: AbilityKind, cell: GridCell },
}
