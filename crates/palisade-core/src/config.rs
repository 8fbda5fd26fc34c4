//! Immutable configuration supplied at simulation start.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::enums::EnemyKind;
use crate::types::GridCell;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Logical tick rate in Hz.
    pub tick_rate: u32,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    /// Consecutive faulted ticks before the engine halts.
    pub max_consecutive_faults: u32,
    /// Levels played in order.
    pub levels: Vec<LevelConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: constants::TICK_RATE,
            time_scale: 1.0,
            max_consecutive_faults: constants::MAX_CONSECUTIVE_FAULTS,
            levels: LevelConfig::default_campaign(),
        }
    }
}

impl SimConfig {
    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }
}

/// Configuration for the perception pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceptionConfig {
    /// Frame acquisition timeout (milliseconds).
    pub frame_timeout_ms: u64,
    /// Inference latency budget (milliseconds); over-budget results
    /// are abandoned and the frame dropped.
    pub inference_budget_ms: u64,
    /// Detections with aggregate confidence below this are discarded.
    pub confidence_floor: f32,
    /// A confirmed gesture releases when window confidence drops below this.
    pub release_threshold: f32,
    /// Sliding-window size in landmark sets.
    pub window_size: usize,
    /// Consecutive classified frames required to confirm a gesture.
    pub debounce_frames: u32,
    /// Frames after release before the same gesture can re-arm.
    pub cooldown_frames: u32,
    /// Reacquisition backoff base interval (milliseconds).
    pub backoff_base_ms: u64,
    /// Reacquisition backoff cap (milliseconds).
    pub backoff_cap_ms: u64,
    /// Bounded action queue capacity.
    pub queue_capacity: usize,
    /// Delivery deadline for queued gestures (milliseconds).
    pub action_deadline_ms: u64,
    /// Board dimensions the pointing fingertip maps onto.
    pub board_cols: i32,
    pub board_rows: i32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            frame_timeout_ms: constants::FRAME_TIMEOUT_MS,
            inference_budget_ms: constants::INFERENCE_BUDGET_MS,
            confidence_floor: constants::CONFIDENCE_FLOOR,
            release_threshold: constants::RELEASE_THRESHOLD,
            window_size: constants::WINDOW_SIZE,
            debounce_frames: constants::DEBOUNCE_FRAMES,
            cooldown_frames: constants::COOLDOWN_FRAMES,
            backoff_base_ms: constants::BACKOFF_BASE_MS,
            backoff_cap_ms: constants::BACKOFF_CAP_MS,
            queue_capacity: constants::ACTION_QUEUE_CAPACITY,
            action_deadline_ms: constants::ACTION_DEADLINE_MS,
            board_cols: constants::BOARD_COLS,
            board_rows: constants::BOARD_ROWS,
        }
    }
}

/// One spawn instruction within a wave.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnInstruction {
    pub enemy: EnemyKind,
    /// Ticks after the wave starts at which this enemy spawns.
    pub offset_ticks: u64,
    /// Index into the level's path list; the enemy spawns at that
    /// path's first waypoint.
    pub path: usize,
}

/// Ordered spawn schedule for one wave. Immutable once a level starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDescriptor {
    /// Tick (from level start) at which this wave begins.
    pub start_tick: u64,
    pub spawns: Vec<SpawnInstruction>,
}

impl WaveDescriptor {
    pub fn total_spawns(&self) -> u32 {
        self.spawns.len() as u32
    }
}

/// Static description of one level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub board_cols: i32,
    pub board_rows: i32,
    /// Enemy walking paths as waypoint cells; enemies move between
    /// cell centers. Towers may not be placed on path cells.
    pub paths: Vec<Vec<GridCell>>,
    pub waves: Vec<WaveDescriptor>,
    pub starting_currency: u32,
    pub starting_lives: u32,
}

impl LevelConfig {
    /// Total enemies across all waves.
    pub fn total_spawns(&self) -> u32 {
        self.waves.iter().map(WaveDescriptor::total_spawns).sum()
    }

    /// Whether a cell lies on any enemy path.
    pub fn is_path_cell(&self, cell: GridCell) -> bool {
        self.paths.iter().any(|path| {
            path.windows(2).any(|seg| {
                // A path segment covers every cell between consecutive
                // waypoints (segments are axis-aligned).
                let (a, b) = (seg[0], seg[1]);
                if a.col == b.col {
                    cell.col == a.col
                        && cell.row >= a.row.min(b.row)
                        && cell.row <= a.row.max(b.row)
                } else {
                    cell.row == a.row
                        && cell.col >= a.col.min(b.col)
                        && cell.col <= a.col.max(b.col)
                }
            })
        })
    }

    /// Default 2-level campaign with escalating waves.
    pub fn default_campaign() -> Vec<LevelConfig> {
        let path: Vec<GridCell> = vec![
            GridCell::new(0, 4),
            GridCell::new(5, 4),
            GridCell::new(5, 1),
            GridCell::new(9, 1),
            GridCell::new(9, 7),
            GridCell::new(11, 7),
        ];

        let level_one = LevelConfig {
            name: "Outskirts".to_string(),
            board_cols: constants::BOARD_COLS,
            board_rows: constants::BOARD_ROWS,
            paths: vec![path.clone()],
            waves: vec![
                WaveDescriptor {
                    start_tick: 60,
                    spawns: spaced_spawns(EnemyKind::Runner, 4, 30),
                },
                WaveDescriptor {
                    start_tick: 450,
                    spawns: spaced_spawns(EnemyKind::Swarmer, 5, 20),
                },
            ],
            starting_currency: 120,
            starting_lives: 10,
        };

        let level_two = LevelConfig {
            name: "Gatehouse".to_string(),
            board_cols: constants::BOARD_COLS,
            board_rows: constants::BOARD_ROWS,
            paths: vec![path],
            waves: vec![
                WaveDescriptor {
                    start_tick: 60,
                    spawns: spaced_spawns(EnemyKind::Swarmer, 6, 20),
                },
                WaveDescriptor {
                    start_tick: 400,
                    spawns: spaced_spawns(EnemyKind::Armored, 3, 60),
                },
                WaveDescriptor {
                    start_tick: 900,
                    spawns: {
                        let mut s = spaced_spawns(EnemyKind::Runner, 6, 15);
                        s.extend(spaced_spawns(EnemyKind::Armored, 2, 90));
                        // The spawner consumes instructions in order.
                        s.sort_by_key(|i| i.offset_ticks);
                        s
                    },
                },
            ],
            starting_currency: 0,
            starting_lives: 10,
        };

        vec![level_one, level_two]
    }
}

fn spaced_spawns(enemy: EnemyKind, count: u64, gap_ticks: u64) -> Vec<SpawnInstruction> {
    (0..count)
        .map(|i| SpawnInstruction {
            enemy,
            offset_ticks: i * gap_ticks,
            path: 0,
        })
        .collect()
}
