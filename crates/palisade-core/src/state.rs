//! Board snapshot — the complete visible state published after each tick.
//!
//! Exactly one snapshot is "current"; the runtime swaps whole snapshots
//! so a reader never observes a partially written tick.

use serde::{Deserialize, Serialize};

use crate::enums::{EnemyKind, GamePhase, TowerKind};
use crate::events::FeedbackEvent;
use crate::types::{GridCell, Position, SimTime};

/// Complete game state published for the renderer after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub level_index: u32,
    /// Placement cursor, driven by PointAt/TapAt gestures.
    pub cursor: GridCell,
    /// Tower kind the next placement will build.
    pub selected_tower: TowerKind,
    pub towers: Vec<TowerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub economy: EconomyView,
    pub wave: WaveView,
    /// Feedback events raised during this tick.
    pub feedback: Vec<FeedbackEvent>,
    pub stats: StatsView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub kind: TowerKind,
    pub cell: GridCell,
    /// Ticks until the next shot (0 = ready).
    pub cooldown_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub position: Position,
    pub health: f32,
    pub max_health: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u32,
    pub position: Position,
    pub target_enemy: u32,
}

/// Currency and lives.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EconomyView {
    pub currency: u32,
    pub lives: u32,
}

/// Wave progression for the HUD.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WaveView {
    /// Index of the most recently started wave (0 before the first).
    pub current_wave: u32,
    pub total_waves: u32,
    /// Spawns not yet executed in this level.
    pub pending_spawns: u32,
}

/// Running statistics, including input-starvation counters from the
/// action queue.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatsView {
    pub enemies_slain: u32,
    pub enemies_leaked: u32,
    pub towers_built: u32,
    /// Gesture events applied to the board.
    pub gestures_applied: u64,
    /// Gesture events evicted by queue overflow.
    pub gestures_evicted: u64,
    /// Gesture events discarded past their delivery deadline.
    pub gestures_expired: u64,
    /// Ticks rolled back after invariant violations.
    pub faulted_ticks: u32,
}
