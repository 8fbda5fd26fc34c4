//! Entity spawn factories.
//!
//! Creates tower, enemy, and projectile entities with their component
//! bundles. Spawn-time tuning is resolved from the profile tables so
//! systems never consult them again.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use palisade_core::components::*;
use palisade_core::config::LevelConfig;
use palisade_core::constants::{enemy_profile, tower_profile, PROJECTILE_LIFETIME_TICKS};
use palisade_core::enums::{EnemyKind, TowerKind};
use palisade_core::types::{GridCell, Position, Velocity};

/// Spawn a tower at the given cell. Validation happens in the intent
/// system; this factory assumes the cell is legal.
pub fn spawn_tower(world: &mut World, kind: TowerKind, cell: GridCell) -> hecs::Entity {
    let profile = tower_profile(kind);
    world.spawn((
        Tower,
        cell.center(),
        TowerState {
            kind,
            cell,
            range: profile.range,
            damage: profile.damage,
            cooldown_ticks: profile.cooldown_ticks,
            cooldown_remaining: 0,
            projectile_speed: profile.projectile_speed,
        },
    ))
}

/// Spawn an enemy at the head of its path, with a small seeded lateral
/// offset so stacked spawns do not overlap exactly.
pub fn spawn_enemy(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    level: &LevelConfig,
    kind: EnemyKind,
    path_index: usize,
    id: u32,
) -> hecs::Entity {
    let profile = enemy_profile(kind);
    let start = level.paths[path_index][0].center();
    let jitter: f32 = rng.gen_range(-0.15..0.15);
    let position = Position::new(start.0.x, start.0.y + jitter);

    world.spawn((
        Enemy,
        position,
        Velocity::default(),
        Health::full(profile.max_health),
        EnemyState {
            id,
            kind,
            reward: profile.reward,
            slain: false,
            leaked: false,
        },
        PathFollower {
            path_index,
            next_waypoint: 1,
            speed: profile.speed,
        },
    ))
}

/// Spawn a projectile homing on an enemy.
pub fn spawn_projectile(
    world: &mut World,
    id: u32,
    origin: Position,
    target_enemy: u32,
    damage: f32,
    speed: f32,
) -> hecs::Entity {
    world.spawn((
        Projectile,
        origin,
        ProjectileState {
            id,
            target_enemy,
            damage,
            speed,
            lifetime_remaining: PROJECTILE_LIFETIME_TICKS,
            expired: false,
        },
    ))
}
