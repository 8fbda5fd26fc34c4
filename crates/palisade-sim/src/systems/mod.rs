//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for
//! read-only). They do not own state — all cross-tick state lives in
//! components or on the engine.

pub mod cleanup;
pub mod collision;
pub mod economy;
pub mod enemy_motion;
pub mod intent;
pub mod projectile;
pub mod snapshot;
pub mod targeting;
pub mod wave_spawner;
