//! Game loop thread — runs the simulation engine at the configured
//! tick rate and publishes snapshots.
//!
//! The engine is created inside the thread because it's cleaner for
//! ownership. Lifecycle commands arrive via `mpsc` channel; gesture
//! input is drained from the action queue once per tick; snapshots go
//! out through the shared snapshot cell.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use palisade_core::commands::PlayerCommand;
use palisade_core::config::SimConfig;
use palisade_core::queue::ActionQueue;
use palisade_sim::engine::SimulationEngine;

use crate::runtime::SnapshotCell;

/// Commands sent from the runtime handle to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A lifecycle command to forward to the simulation engine.
    Player(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Nominal duration of one tick at 1x speed.
pub fn tick_duration(tick_rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / tick_rate.max(1) as u64)
}

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop(
    config: SimConfig,
    queue: Arc<ActionQueue>,
    snapshot_cell: Arc<SnapshotCell>,
    epoch: Instant,
    cmd_rx: mpsc::Receiver<LoopCommand>,
) -> std::thread::JoinHandle<()> {
    std::thread::Builder::new()
        .name("palisade-game-loop".into())
        .spawn(move || {
            run_game_loop(config, &queue, &snapshot_cell, epoch, cmd_rx);
        })
        .expect("failed to spawn game loop thread")
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    queue: &ActionQueue,
    snapshot_cell: &SnapshotCell,
    epoch: Instant,
    cmd_rx: mpsc::Receiver<LoopCommand>,
) {
    let nominal_tick = tick_duration(config.tick_rate);
    let mut engine = SimulationEngine::new(config);
    let mut next_tick_time = Instant::now();
    info!("game loop started");

    loop {
        // 1. Drain all pending lifecycle commands.
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Player(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::Shutdown) => {
                    info!("game loop shutting down");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Drain gesture input; stale entries are dropped here.
        let now_us = epoch.elapsed().as_micros() as u64;
        engine.queue_gestures(queue.drain_ready(now_us));
        engine.record_queue_stats(queue.stats());

        // 3. Advance one tick (engine handles pause semantics internally).
        let snapshot = engine.tick();

        // 4. Publish the snapshot for the rendering side.
        snapshot_cell.publish(snapshot);

        // 5. Sleep until the next tick, adjusting for time_scale.
        let time_scale = engine.time_scale();
        let effective_tick = if time_scale > 0.001 {
            nominal_tick.div_f64(time_scale)
        } else {
            nominal_tick
        };

        next_tick_time += effective_tick;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick * 2 {
            // Too far behind: reset to avoid a catch-up spiral.
            next_tick_time = now;
        }
    }
}
