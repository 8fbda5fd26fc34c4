//! Simulation engine for PALISADE.
//!
//! Owns the hecs ECS world, runs systems at a fixed logical tick rate,
//! and produces `BoardSnapshot`s for the rendering side. Completely
//! headless (no capture or windowing dependency), enabling
//! deterministic testing.

pub mod backup;
pub mod economy;
pub mod engine;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use palisade_core as core;
