//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::{EnemyKind, TowerKind};
use crate::types::GridCell;

/// Marks an entity as a tower.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tower;

/// Marks an entity as an enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy;

/// Marks an entity as a projectile in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile;

/// Hit points. An enemy is alive while `current > 0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }
}

/// Tower state resolved from its profile at placement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerState {
    pub kind: TowerKind,
    pub cell: GridCell,
    /// Acquisition radius in world units.
    pub range: f32,
    /// Damage per projectile.
    pub damage: f32,
    /// Ticks between shots.
    pub cooldown_ticks: u32,
    /// Ticks until the next shot is allowed.
    pub cooldown_remaining: u32,
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
}

/// Enemy identity and lifecycle flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyState {
    /// Stable id assigned at spawn, unique within a level.
    pub id: u32,
    pub kind: EnemyKind,
    /// Currency granted on kill.
    pub reward: u32,
    /// Set exactly once when health reaches zero.
    pub slain: bool,
    /// Set when the enemy reaches the end of its path.
    pub leaked: bool,
}

/// Waypoint-path follower.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PathFollower {
    /// Index of the path this enemy walks (into the level's path list).
    pub path_index: usize,
    /// Next waypoint to reach.
    pub next_waypoint: usize,
    /// Walking speed in world units per second.
    pub speed: f32,
}

/// Projectile flight state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileState {
    /// Stable id assigned at launch, unique within a level.
    pub id: u32,
    /// Stable id of the enemy this projectile homes on.
    pub target_enemy: u32,
    pub damage: f32,
    /// Flight speed in world units per second.
    pub speed: f32,
    /// Ticks of flight remaining before the projectile expires.
    pub lifetime_remaining: u32,
    /// Set when the target is gone or the lifetime ran out.
    pub expired: bool,
}
