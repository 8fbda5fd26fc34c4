//! Tower target acquisition and firing.
//!
//! Towers prefer the enemy furthest along its path within range
//! (ties break to the lowest enemy id, keeping selection
//! deterministic), fire one projectile per cooldown cycle, and stay
//! quiet with no target in range.

use hecs::World;

use palisade_core::components::{EnemyState, PathFollower, TowerState};
use palisade_core::types::Position;

use crate::world_setup;

struct Candidate {
    id: u32,
    position: Position,
    progress: usize,
}

pub fn run(world: &mut World, next_projectile_id: &mut u32) {
    // Gather live enemies once; towers only need id/position/progress.
    let candidates: Vec<Candidate> = world
        .query::<(&Position, &EnemyState, &PathFollower)>()
        .iter()
        .filter(|(_, (_, state, _))| !state.slain && !state.leaked)
        .map(|(_, (pos, state, follower))| Candidate {
            id: state.id,
            position: *pos,
            progress: follower.next_waypoint,
        })
        .collect();

    // Decide shots under a shared borrow, then spawn.
    let mut shots: Vec<(Position, u32, f32, f32)> = Vec::new();
    for (_entity, (pos, tower)) in world.query_mut::<(&Position, &mut TowerState)>() {
        if tower.cooldown_remaining > 0 {
            tower.cooldown_remaining -= 1;
            continue;
        }

        let target = candidates
            .iter()
            .filter(|c| pos.range_to(&c.position) <= tower.range)
            .max_by(|a, b| {
                a.progress
                    .cmp(&b.progress)
                    .then(b.id.cmp(&a.id))
            });

        if let Some(target) = target {
            shots.push((*pos, target.id, tower.damage, tower.projectile_speed));
            tower.cooldown_remaining = tower.cooldown_ticks;
        }
    }

    for (origin, target_id, damage, speed) in shots {
        let id = *next_projectile_id;
        *next_projectile_id += 1;
        world_setup::spawn_projectile(world, id, origin, target_id, damage, speed);
    }
}
