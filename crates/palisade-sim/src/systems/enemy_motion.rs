//! Enemy path-following.
//!
//! Each enemy walks between waypoint cell centers at its profile
//! speed. Velocity is recomputed toward the next waypoint and
//! integrated into Position each tick; reaching the final waypoint
//! marks the enemy as leaked for the economy and cleanup systems.

use hecs::World;

use palisade_core::components::{EnemyState, PathFollower};
use palisade_core::config::LevelConfig;
use palisade_core::types::{Position, Velocity};

/// Arrival tolerance as a fraction of one tick's travel: prevents
/// orbiting a waypoint that integration never lands on exactly.
const ARRIVAL_FACTOR: f32 = 0.6;

pub fn run(world: &mut World, level: &LevelConfig, dt: f32) {
    for (_entity, (pos, vel, follower, state)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut PathFollower, &mut EnemyState)>()
    {
        if state.slain || state.leaked {
            vel.0 = glam::Vec2::ZERO;
            continue;
        }

        let path = &level.paths[follower.path_index];
        if follower.next_waypoint >= path.len() {
            state.leaked = true;
            continue;
        }

        let target = path[follower.next_waypoint].center();
        let step = follower.speed * dt;

        vel.0 = pos.toward(&target) * follower.speed;
        pos.0 += vel.0 * dt;

        if pos.range_to(&target) <= step * ARRIVAL_FACTOR {
            pos.0 = target.0;
            follower.next_waypoint += 1;
            if follower.next_waypoint >= path.len() {
                state.leaked = true;
            }
        }
    }
}
