//! PALISADE headless runtime.
//!
//! Wires the perception pipeline and the simulation engine together:
//! one thread per clock, connected only by the bounded action queue,
//! with the latest snapshot published through an atomically swapped
//! cell for the rendering side to read.

pub mod game_loop;
pub mod perception_loop;
pub mod runtime;

pub use palisade_core as core;
pub use runtime::Runtime;
