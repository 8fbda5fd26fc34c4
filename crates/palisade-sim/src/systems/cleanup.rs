//! Cleanup system: removes entities whose lifecycle ended this tick.
//! Uses a pre-allocated buffer to avoid per-tick allocation.

use hecs::{Entity, World};

use palisade_core::components::{Enemy, EnemyState, Projectile, ProjectileState};
use palisade_core::config::LevelConfig;
use palisade_core::types::Position;

/// Margin beyond the board edge before a projectile counts as
/// out of bounds.
const OOB_MARGIN: f32 = 2.0;

pub fn run(world: &mut World, level: &LevelConfig, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    // Enemies that were slain or leaked.
    for (entity, (state, _)) in world.query_mut::<(&EnemyState, &Enemy)>() {
        if state.slain || state.leaked {
            despawn_buffer.push(entity);
        }
    }

    // Projectiles that expired (hit, lost target, or ran out of time).
    for (entity, (state, _)) in world.query_mut::<(&ProjectileState, &Projectile)>() {
        if state.expired {
            despawn_buffer.push(entity);
        }
    }

    // Projectiles that left the board.
    let max_x = level.board_cols as f32 + OOB_MARGIN;
    let max_y = level.board_rows as f32 + OOB_MARGIN;
    for (entity, (pos, _)) in world.query_mut::<(&Position, &Projectile)>() {
        if pos.0.x < -OOB_MARGIN || pos.0.x > max_x || pos.0.y < -OOB_MARGIN || pos.0.y > max_y {
            despawn_buffer.push(entity);
        }
    }

    despawn_buffer.sort_unstable_by_key(|entity| entity.to_bits());
    despawn_buffer.dedup();
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
