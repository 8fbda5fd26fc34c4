//! Core types and definitions for the PALISADE game core.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, gesture events, commands, state snapshots, feedback
//! events, the action queue, configuration, and constants.
//! It has no dependency on any capture device or runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod errors;
pub mod events;
pub mod gesture;
pub mod queue;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
