//! Projectile flight: homing kinematics and lifetime accounting.

use std::collections::HashMap;

use hecs::World;

use palisade_core::components::{EnemyState, Projectile, ProjectileState};
use palisade_core::types::Position;

pub fn run(world: &mut World, dt: f32) {
    // Current positions of live targets, by stable enemy id.
    let targets: HashMap<u32, Position> = world
        .query::<(&Position, &EnemyState)>()
        .iter()
        .filter(|(_, (_, state))| !state.slain && !state.leaked)
        .map(|(_, (pos, state))| (state.id, *pos))
        .collect();

    for (_entity, (pos, state, _)) in
        world.query_mut::<(&mut Position, &mut ProjectileState, &Projectile)>()
    {
        if state.expired {
            continue;
        }

        if state.lifetime_remaining == 0 {
            state.expired = true;
            continue;
        }
        state.lifetime_remaining -= 1;

        match targets.get(&state.target_enemy) {
            Some(target) => {
                let step = state.speed * dt;
                let dist = pos.range_to(target);
                if dist <= step {
                    pos.0 = target.0;
                } else {
                    pos.0 += pos.toward(target) * step;
                }
            }
            // Target already dead or leaked; nothing left to chase.
            None => state.expired = true,
        }
    }
}
