//! Runtime handle shared with the platform layer.
//!
//! Owns the two worker threads, the bounded action queue between
//! them, and the published-snapshot cell. `pause`/`resume` are
//! idempotent and safe to call at any time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Instant;

use tracing::info;

use palisade_core::commands::PlayerCommand;
use palisade_core::config::{PerceptionConfig, SimConfig};
use palisade_core::gesture::{GestureEvent, GestureIntent};
use palisade_core::queue::{ActionQueue, QueuedAction};
use palisade_core::state::BoardSnapshot;
use palisade_core::types::GridCell;
use palisade_perception::detector::LandmarkOracle;
use palisade_perception::frame::FrameSource;
use palisade_perception::PerceptionPipeline;

use crate::game_loop::{self, LoopCommand};
use crate::perception_loop;

/// Single-writer, multi-reader snapshot handoff. The writer swaps a
/// whole `Arc` under a briefly-held lock, so a reader never observes
/// a partially written tick.
#[derive(Default)]
pub struct SnapshotCell {
    latest: Mutex<Arc<BoardSnapshot>>,
}

impl SnapshotCell {
    pub fn publish(&self, snapshot: BoardSnapshot) {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        *latest = Arc::new(snapshot);
    }

    pub fn latest(&self) -> Arc<BoardSnapshot> {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&latest)
    }
}

/// Handle to a running PALISADE core.
pub struct Runtime {
    queue: Arc<ActionQueue>,
    snapshot_cell: Arc<SnapshotCell>,
    paused: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    cmd_tx: mpsc::Sender<LoopCommand>,
    epoch: Instant,
    action_deadline_us: u64,
    handles: Vec<std::thread::JoinHandle<()>>,
}

impl Runtime {
    /// Start both worker threads with the given capture source and
    /// perception oracle.
    pub fn start<S, O>(
        sim_config: SimConfig,
        perception_config: PerceptionConfig,
        source: S,
        oracle: O,
    ) -> Self
    where
        S: FrameSource + Send + 'static,
        O: LandmarkOracle + Send + 'static,
    {
        let queue = Arc::new(ActionQueue::with_capacity(perception_config.queue_capacity));
        let snapshot_cell = Arc::new(SnapshotCell::default());
        let paused = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));
        let epoch = Instant::now();
        let action_deadline_us = perception_config.action_deadline_ms * 1000;

        let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

        let pipeline =
            PerceptionPipeline::new(&perception_config, source, oracle, Arc::clone(&queue));

        let handles = vec![
            game_loop::spawn_game_loop(
                sim_config,
                Arc::clone(&queue),
                Arc::clone(&snapshot_cell),
                epoch,
                cmd_rx,
            ),
            perception_loop::spawn_perception_loop(
                pipeline,
                Arc::clone(&paused),
                Arc::clone(&shutdown),
            ),
        ];

        Self {
            queue,
            snapshot_cell,
            paused,
            shutdown,
            cmd_tx,
            epoch,
            action_deadline_us,
            handles,
        }
    }

    /// Latest published snapshot. Never blocks the simulation writer
    /// for longer than a pointer swap.
    pub fn latest_snapshot(&self) -> Arc<BoardSnapshot> {
        self.snapshot_cell.latest()
    }

    /// Microseconds since the runtime epoch (the pipeline clock).
    pub fn now_us(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }

    pub fn send_command(&self, command: PlayerCommand) {
        let _ = self.cmd_tx.send(LoopCommand::Player(command));
    }

    pub fn start_game(&self) {
        self.send_command(PlayerCommand::StartGame);
    }

    /// Stop frame acquisition (releasing the device) and freeze the
    /// simulation clock. Idempotent.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
        self.send_command(PlayerCommand::Pause);
        info!("runtime paused");
    }

    /// Re-acquire the device and resume ticking from the frozen
    /// state. Idempotent.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.send_command(PlayerCommand::Resume);
        info!("runtime resumed");
    }

    /// Touch fallback: inject a tap through the same action queue so
    /// the simulation's input contract stays uniform.
    pub fn inject_touch(&self, cell: GridCell) {
        let timestamp_us = self.now_us();
        self.queue.push(QueuedAction {
            event: GestureEvent {
                intent: GestureIntent::TapAt { cell },
                confidence: 1.0,
                timestamp_us,
            },
            deadline_us: timestamp_us + self.action_deadline_us,
        });
    }

    /// Shut both threads down and wait for them.
    pub fn shutdown(self) {
        self.shutdown.store(true, Ordering::Release);
        let _ = self.cmd_tx.send(LoopCommand::Shutdown);
        for handle in self.handles {
            let _ = handle.join();
        }
        info!("runtime stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc as StdArc;
    use std::time::Duration;

    use palisade_core::enums::{GamePhase, TowerKind};
    use palisade_perception::detector::{frame_codes, SyntheticOracle};
    use palisade_perception::frame::{Frame, SyntheticSource};

    fn pose_frames(code: u8, count: u64, start_us: u64) -> Vec<Frame> {
        (0..count)
            .map(|i| Frame {
                data: StdArc::from([code, 128, 64].as_slice()),
                timestamp_us: start_us + i * 33_000,
                sequence: i,
            })
            .collect()
    }

    fn wait_for<F: Fn(&BoardSnapshot) -> bool>(
        runtime: &Runtime,
        deadline: Duration,
        predicate: F,
    ) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if predicate(&runtime.latest_snapshot()) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn test_snapshot_cell_swaps_whole_snapshots() {
        let cell = SnapshotCell::default();
        assert_eq!(cell.latest().time.tick, 0);

        let mut snapshot = BoardSnapshot::default();
        snapshot.time.tick = 7;
        cell.publish(snapshot);
        assert_eq!(cell.latest().time.tick, 7);
    }

    #[test]
    fn test_loop_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<LoopCommand>();
        tx.send(LoopCommand::Player(PlayerCommand::StartGame)).unwrap();
        tx.send(LoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            commands[0],
            LoopCommand::Player(PlayerCommand::StartGame)
        ));
        assert!(matches!(commands[1], LoopCommand::Shutdown));
    }

    #[test]
    fn test_gesture_reaches_simulation_end_to_end() {
        // Three OpenPalm frames confirm one gesture, which cycles the
        // selected tower kind from Arrow to Cannon.
        let source = SyntheticSource::from_frames(pose_frames(frame_codes::OPEN_PALM, 3, 0));
        let runtime = Runtime::start(
            SimConfig::default(),
            PerceptionConfig::default(),
            source,
            SyntheticOracle::new(0.8),
        );
        runtime.start_game();

        assert!(
            wait_for(&runtime, Duration::from_secs(3), |snap| {
                snap.phase == GamePhase::Active && snap.selected_tower == TowerKind::Cannon
            }),
            "OpenPalm gesture should cycle the tower selection"
        );
        runtime.shutdown();
    }

    #[test]
    fn test_touch_fallback_places_tower() {
        let source = SyntheticSource::from_frames(Vec::new());
        let runtime = Runtime::start(
            SimConfig::default(),
            PerceptionConfig::default(),
            source,
            SyntheticOracle::new(0.8),
        );
        runtime.start_game();
        assert!(wait_for(&runtime, Duration::from_secs(3), |snap| {
            snap.phase == GamePhase::Active
        }));

        runtime.inject_touch(GridCell::new(3, 2));
        assert!(
            wait_for(&runtime, Duration::from_secs(3), |snap| {
                snap.towers.len() == 1
            }),
            "touch fallback should place a tower through the queue"
        );
        runtime.shutdown();
    }

    #[test]
    fn test_pause_freezes_ticks_and_resume_continues() {
        let source = SyntheticSource::from_frames(Vec::new());
        let runtime = Runtime::start(
            SimConfig::default(),
            PerceptionConfig::default(),
            source,
            SyntheticOracle::new(0.8),
        );
        runtime.start_game();
        assert!(wait_for(&runtime, Duration::from_secs(3), |snap| {
            snap.time.tick > 5
        }));

        runtime.pause();
        runtime.pause(); // idempotent
        // Let the pause command land, then verify the clock is frozen.
        std::thread::sleep(Duration::from_millis(100));
        let frozen = runtime.latest_snapshot().time.tick;
        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(runtime.latest_snapshot().time.tick, frozen);
        assert_eq!(runtime.latest_snapshot().phase, GamePhase::Paused);

        runtime.resume();
        runtime.resume(); // idempotent
        assert!(
            wait_for(&runtime, Duration::from_secs(3), |snap| {
                snap.time.tick > frozen
            }),
            "ticking resumes from the frozen state"
        );
        runtime.shutdown();
    }

    #[test]
    fn test_tick_duration() {
        assert_eq!(
            game_loop::tick_duration(30).as_nanos(),
            (1_000_000_000u64 / 30) as u128
        );
    }
}
