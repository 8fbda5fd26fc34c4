//! Component-bundle backup for the transactional tick.
//!
//! The hecs `World` is not `Clone`, but every live entity here is a
//! small plain-data bundle, so a full copy per tick is cheap at this
//! scale. On an invariant violation the engine clears the world and
//! respawns from the backup; entity ids are not stable across a
//! restore, which is safe because nothing holds `hecs::Entity` across
//! ticks — projectiles reference targets by stable enemy id.

use hecs::World;

use palisade_core::components::*;
use palisade_core::types::{Position, Velocity};

#[derive(Debug, Clone, Default)]
pub struct WorldBackup {
    towers: Vec<(Position, TowerState)>,
    enemies: Vec<(Position, Velocity, Health, EnemyState, PathFollower)>,
    projectiles: Vec<(Position, ProjectileState)>,
}

/// Capture all live component bundles.
pub fn capture(world: &World) -> WorldBackup {
    let towers = world
        .query::<(&Position, &TowerState)>()
        .iter()
        .map(|(_, (pos, state))| (*pos, state.clone()))
        .collect();

    let enemies = world
        .query::<(&Position, &Velocity, &Health, &EnemyState, &PathFollower)>()
        .iter()
        .map(|(_, (pos, vel, health, state, follower))| {
            (*pos, *vel, *health, state.clone(), *follower)
        })
        .collect();

    let projectiles = world
        .query::<(&Position, &ProjectileState)>()
        .iter()
        .map(|(_, (pos, state))| (*pos, state.clone()))
        .collect();

    WorldBackup {
        towers,
        enemies,
        projectiles,
    }
}

/// Clear the world and respawn every backed-up bundle.
pub fn restore(world: &mut World, backup: &WorldBackup) {
    world.clear();
    for (pos, state) in &backup.towers {
        world.spawn((Tower, *pos, state.clone()));
    }
    for (pos, vel, health, state, follower) in &backup.enemies {
        world.spawn((Enemy, *pos, *vel, *health, state.clone(), *follower));
    }
    for (pos, state) in &backup.projectiles {
        world.spawn((Projectile, *pos, state.clone()));
    }
}
