//! Tuning parameters and profile tables.

use crate::enums::{AbilityKind, EnemyKind, TowerKind};

/// Default simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick at the default tick rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Board ---

/// Default board width in cells.
pub const BOARD_COLS: i32 = 12;

/// Default board height in cells.
pub const BOARD_ROWS: i32 = 9;

// --- Projectiles ---

/// Proximity at which a projectile hits its target (world units).
pub const PROJECTILE_HIT_RADIUS: f32 = 0.25;

/// Maximum projectile flight time in ticks before it expires.
pub const PROJECTILE_LIFETIME_TICKS: u32 = 120;

// --- Abilities ---

/// Minimum pinch closure for a placement actuation.
pub const MIN_PINCH_STRENGTH: f32 = 0.5;

// --- Collision ---

/// Spatial grid bucket size in world units. At least twice the hit
/// radius so a 3x3 neighborhood always covers a hit circle.
pub const SPATIAL_BUCKET_SIZE: f32 = 1.0;

// --- Action queue ---

/// Default bounded queue capacity.
pub const ACTION_QUEUE_CAPACITY: usize = 16;

/// Default delivery deadline for queued gestures (milliseconds).
pub const ACTION_DEADLINE_MS: u64 = 500;

// --- Perception defaults ---

/// Default frame acquisition timeout (milliseconds).
pub const FRAME_TIMEOUT_MS: u64 = 50;

/// Default inference latency budget (milliseconds).
pub const INFERENCE_BUDGET_MS: u64 = 40;

/// Default confidence floor below which a detection is discarded.
pub const CONFIDENCE_FLOOR: f32 = 0.6;

/// Default release threshold for a confirmed gesture.
pub const RELEASE_THRESHOLD: f32 = 0.4;

/// Default sliding-window size in landmark sets.
pub const WINDOW_SIZE: usize = 5;

/// Default consecutive-frame debounce count.
pub const DEBOUNCE_FRAMES: u32 = 3;

/// Default cooldown in frames before a released gesture can re-arm.
pub const COOLDOWN_FRAMES: u32 = 8;

/// Default reacquisition backoff base (milliseconds).
pub const BACKOFF_BASE_MS: u64 = 100;

/// Default reacquisition backoff cap (milliseconds).
pub const BACKOFF_CAP_MS: u64 = 3200;

// --- Faults ---

/// Consecutive tick faults before the engine halts.
pub const MAX_CONSECUTIVE_FAULTS: u32 = 3;

// --- Profiles ---

/// Static tuning for a tower kind.
#[derive(Debug, Clone, Copy)]
pub struct TowerProfile {
    pub cost: u32,
    pub range: f32,
    pub damage: f32,
    pub cooldown_ticks: u32,
    pub projectile_speed: f32,
}

/// Static tuning for an enemy kind.
#[derive(Debug, Clone, Copy)]
pub struct EnemyProfile {
    pub max_health: f32,
    pub speed: f32,
    pub reward: u32,
}

/// Static tuning for an ability.
#[derive(Debug, Clone, Copy)]
pub struct AbilityProfile {
    pub cost: u32,
    pub radius: f32,
    pub damage: f32,
}

pub fn tower_profile(kind: TowerKind) -> TowerProfile {
    match kind {
        TowerKind::Arrow => TowerProfile {
            cost: 50,
            range: 2.5,
            damage: 10.0,
            cooldown_ticks: 20,
            projectile_speed: 8.0,
        },
        TowerKind::Cannon => TowerProfile {
            cost: 120,
            range: 3.5,
            damage: 40.0,
            cooldown_ticks: 60,
            projectile_speed: 5.0,
        },
        TowerKind::Frost => TowerProfile {
            cost: 80,
            range: 2.0,
            damage: 6.0,
            cooldown_ticks: 10,
            projectile_speed: 10.0,
        },
    }
}

pub fn enemy_profile(kind: EnemyKind) -> EnemyProfile {
    match kind {
        EnemyKind::Runner => EnemyProfile {
            max_health: 30.0,
            speed: 1.8,
            reward: 8,
        },
        EnemyKind::Armored => EnemyProfile {
            max_health: 150.0,
            speed: 0.7,
            reward: 25,
        },
        EnemyKind::Swarmer => EnemyProfile {
            max_health: 50.0,
            speed: 1.2,
            reward: 12,
        },
    }
}

pub fn ability_profile(kind: AbilityKind) -> AbilityProfile {
    match kind {
        AbilityKind::Shockwave => AbilityProfile {
            cost: 60,
            radius: 2.0,
            damage: 35.0,
        },
    }
}
