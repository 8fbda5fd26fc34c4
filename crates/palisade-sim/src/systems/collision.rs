//! Collision and resolution.
//!
//! Coarse uniform spatial grid over live enemies, rebuilt each tick;
//! projectiles resolve against the 3x3 bucket neighborhood around
//! them. Resolution order within a tick: damage application, then
//! removal marking, then (in the economy system) reward accrual — the
//! first resolved projectile gets the kill credit and later hits
//! against a dead enemy are no-ops.

use std::collections::HashMap;

use hecs::{Entity, World};

use palisade_core::components::{EnemyState, Health, ProjectileState};
use palisade_core::constants::{PROJECTILE_HIT_RADIUS, SPATIAL_BUCKET_SIZE};
use palisade_core::types::Position;

/// One projectile-enemy contact resolved this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub enemy_id: u32,
    pub projectile_id: u32,
    /// True for the single hit that brought the enemy to zero health.
    pub lethal: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    pub hits: Vec<Hit>,
}

fn bucket(pos: &Position) -> (i32, i32) {
    (
        (pos.0.x / SPATIAL_BUCKET_SIZE).floor() as i32,
        (pos.0.y / SPATIAL_BUCKET_SIZE).floor() as i32,
    )
}

pub fn run(world: &mut World) -> CollisionReport {
    let mut report = CollisionReport::default();

    // Index live enemies into the grid.
    let mut grid: HashMap<(i32, i32), Vec<(Entity, u32, Position)>> = HashMap::new();
    for (entity, (pos, state)) in world.query::<(&Position, &EnemyState)>().iter() {
        if state.slain || state.leaked {
            continue;
        }
        grid.entry(bucket(pos))
            .or_default()
            .push((entity, state.id, *pos));
    }

    // Gather in-flight projectiles, ordered by launch id so kill
    // credit is deterministic when several hit in the same tick.
    let mut projectiles: Vec<(Entity, u32, Position, f32, u32)> = world
        .query::<(&Position, &ProjectileState)>()
        .iter()
        .filter(|(_, (_, state))| !state.expired)
        .map(|(entity, (pos, state))| {
            (entity, state.id, *pos, state.damage, state.target_enemy)
        })
        .collect();
    projectiles.sort_by_key(|&(_, id, _, _, _)| id);

    for (proj_entity, proj_id, proj_pos, damage, target_id) in projectiles {
        let (bx, by) = bucket(&proj_pos);
        let mut contact: Option<(Entity, u32, f32)> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(cell) = grid.get(&(bx + dx, by + dy)) else {
                    continue;
                };
                for &(enemy_entity, enemy_id, enemy_pos) in cell {
                    let dist = proj_pos.range_to(&enemy_pos);
                    if dist > PROJECTILE_HIT_RADIUS {
                        continue;
                    }
                    let better = match contact {
                        None => true,
                        Some((_, current_id, current_dist)) => {
                            // Prefer the homing target, then the nearest,
                            // then the lowest id.
                            let is_target = enemy_id == target_id;
                            let current_is_target = current_id == target_id;
                            is_target && !current_is_target
                                || is_target == current_is_target
                                    && (dist < current_dist
                                        || dist == current_dist && enemy_id < current_id)
                        }
                    };
                    if better {
                        contact = Some((enemy_entity, enemy_id, dist));
                    }
                }
            }
        }

        let Some((enemy_entity, enemy_id, _)) = contact else {
            continue;
        };

        // The projectile is consumed by the contact either way.
        if let Ok(mut state) = world.get::<&mut ProjectileState>(proj_entity) {
            state.expired = true;
        }

        let mut lethal = false;
        {
            let Ok(mut enemy_state) = world.get::<&mut EnemyState>(enemy_entity) else {
                continue;
            };
            if enemy_state.slain {
                // Already killed earlier this tick; no-op contact.
                report.hits.push(Hit {
                    enemy_id,
                    projectile_id: proj_id,
                    lethal: false,
                });
                continue;
            }
            if let Ok(mut health) = world.get::<&mut Health>(enemy_entity) {
                health.current -= damage;
                if health.current <= 0.0 {
                    health.current = 0.0;
                    enemy_state.slain = true;
                    lethal = true;
                }
            }
        }

        report.hits.push(Hit {
            enemy_id,
            projectile_id: proj_id,
            lethal,
        });
    }

    report
}
