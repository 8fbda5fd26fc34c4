//! Simulation engine — the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, interprets gesture
//! input, runs all systems at a fixed logical tick, and produces
//! `BoardSnapshot`s. Completely headless, enabling deterministic
//! testing. Each tick is transactional: state is backed up before
//! systems run and restored if the post-tick invariant check fails.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, warn};

use palisade_core::commands::PlayerCommand;
use palisade_core::components::{Enemy, EnemyState, Health, TowerState};
use palisade_core::config::{LevelConfig, SimConfig};
use palisade_core::enums::{GamePhase, TowerKind};
use palisade_core::errors::SimulationFault;
use palisade_core::events::FeedbackEvent;
use palisade_core::gesture::GestureEvent;
use palisade_core::queue::QueueStats;
use palisade_core::state::{BoardSnapshot, EconomyView, StatsView, WaveView};
use palisade_core::types::{GridCell, SimTime};

use crate::backup::{self, WorldBackup};
use crate::economy::{Economy, ScoreState};
use crate::systems;
use crate::systems::snapshot::SnapshotHeader;
use crate::systems::wave_spawner::WaveProgress;

/// Everything a faulted tick must roll back to.
struct TickBackup {
    world: WorldBackup,
    economy: Economy,
    score: ScoreState,
    cursor: GridCell,
    selected_tower: TowerKind,
    wave_progress: WaveProgress,
    next_enemy_id: u32,
    next_projectile_id: u32,
    rng: ChaCha8Rng,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    config: SimConfig,
    time_scale: f64,
    rng: ChaCha8Rng,

    level_index: usize,
    level_start_tick: u64,
    wave_progress: WaveProgress,

    cursor: GridCell,
    selected_tower: TowerKind,
    economy: Economy,
    score: ScoreState,

    next_enemy_id: u32,
    next_projectile_id: u32,

    pending_gestures: Vec<GestureEvent>,
    command_queue: VecDeque<PlayerCommand>,
    feedback: Vec<FeedbackEvent>,
    despawn_buffer: Vec<hecs::Entity>,

    gestures_applied: u64,
    queue_stats: QueueStats,
    consecutive_faults: u32,
    faulted_ticks: u32,

    #[cfg(test)]
    force_fault: bool,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let time_scale = config.time_scale;
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            config,
            time_scale,
            rng,
            level_index: 0,
            level_start_tick: 0,
            wave_progress: WaveProgress::default(),
            cursor: GridCell::default(),
            selected_tower: TowerKind::default(),
            economy: Economy::default(),
            score: ScoreState::default(),
            next_enemy_id: 0,
            next_projectile_id: 0,
            pending_gestures: Vec::new(),
            command_queue: VecDeque::new(),
            feedback: Vec::new(),
            despawn_buffer: Vec::new(),
            gestures_applied: 0,
            queue_stats: QueueStats::default(),
            consecutive_faults: 0,
            faulted_ticks: 0,
            #[cfg(test)]
            force_fault: false,
        }
    }

    /// Queue a lifecycle command for the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue gesture events drained from the action queue.
    pub fn queue_gestures(&mut self, events: impl IntoIterator<Item = GestureEvent>) {
        self.pending_gestures.extend(events);
    }

    /// Record the action queue's drop counters for the next snapshot.
    pub fn record_queue_stats(&mut self, stats: QueueStats) {
        self.queue_stats = stats;
    }

    /// Advance the simulation by one tick and return the snapshot.
    pub fn tick(&mut self) -> BoardSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let tick_backup = self.capture_backup();
            self.run_systems();

            #[cfg(test)]
            if self.force_fault {
                self.corrupt_world_for_test();
            }

            match self.check_invariants() {
                Ok(()) => {
                    self.consecutive_faults = 0;
                    self.time.advance(self.config.dt());
                    self.evaluate_end_conditions();
                }
                Err(fault) => {
                    warn!(%fault, "tick rolled back");
                    self.restore_backup(tick_backup);
                    self.feedback.clear();
                    self.feedback.push(FeedbackEvent::SimulationFaulted {
                        detail: fault.to_string(),
                    });
                    self.consecutive_faults += 1;
                    self.faulted_ticks += 1;
                    if self.consecutive_faults >= self.config.max_consecutive_faults {
                        error!(
                            faults = self.consecutive_faults,
                            "repeated simulation faults, halting"
                        );
                        self.phase = GamePhase::Halted;
                    }
                }
            }
        }

        self.build_snapshot()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn economy(&self) -> Economy {
        self.economy
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn cursor(&self) -> GridCell {
        self.cursor
    }

    pub fn selected_tower(&self) -> TowerKind {
        self.selected_tower
    }

    /// Process all queued lifecycle commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame => {
                if self.phase == GamePhase::MainMenu && !self.config.levels.is_empty() {
                    self.time = SimTime::default();
                    self.level_index = 0;
                    self.economy = Economy::default();
                    self.score = ScoreState::default();
                    self.next_enemy_id = 0;
                    self.next_projectile_id = 0;
                    self.consecutive_faults = 0;
                    self.enter_level(0);
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.25, 4.0);
            }
        }
    }

    /// Reset per-level state. Currency pools across levels; lives reset.
    fn enter_level(&mut self, index: usize) {
        let level = &self.config.levels[index];
        self.level_index = index;
        self.level_start_tick = self.time.tick;
        self.wave_progress = WaveProgress::for_level(level);
        self.economy.credit(level.starting_currency);
        self.economy.lives = level.starting_lives;
        self.cursor = GridCell::new(level.board_cols / 2, level.board_rows / 2);
        self.selected_tower = TowerKind::default();
        self.world.clear();
        debug!(level = index, name = %level.name, "level started");
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let level = &self.config.levels[self.level_index];
        let level_tick = self.time.tick - self.level_start_tick;
        let dt = self.config.dt() as f32;

        // 1. Gesture intents -> validated board commands
        let applied = systems::intent::run(
            &mut self.world,
            &mut self.pending_gestures,
            level,
            &mut self.cursor,
            &mut self.selected_tower,
            &mut self.economy,
            &mut self.score,
            &mut self.feedback,
        );
        self.gestures_applied += applied;
        // 2. Wave spawning
        systems::wave_spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.wave_progress,
            level,
            level_tick,
            &mut self.next_enemy_id,
            &mut self.feedback,
        );
        // 3. Enemy path-following
        systems::enemy_motion::run(&mut self.world, level, dt);
        // 4. Tower targeting and firing
        systems::targeting::run(&mut self.world, &mut self.next_projectile_id);
        // 5. Projectile flight
        systems::projectile::run(&mut self.world, dt);
        // 6. Collision & resolution
        let report = systems::collision::run(&mut self.world);
        if report.hits.iter().any(|h| h.lethal) {
            debug!(hits = report.hits.len(), "projectile contacts resolved");
        }
        // 7. Economy deltas (rewards, leaks)
        systems::economy::run(
            &mut self.world,
            &mut self.economy,
            &mut self.score,
            &mut self.feedback,
        );
        // 8. Cleanup (slain, leaked, expired, OOB)
        systems::cleanup::run(&mut self.world, level, &mut self.despawn_buffer);
    }

    fn capture_backup(&self) -> TickBackup {
        TickBackup {
            world: backup::capture(&self.world),
            economy: self.economy,
            score: self.score,
            cursor: self.cursor,
            selected_tower: self.selected_tower,
            wave_progress: self.wave_progress.clone(),
            next_enemy_id: self.next_enemy_id,
            next_projectile_id: self.next_projectile_id,
            rng: self.rng.clone(),
        }
    }

    fn restore_backup(&mut self, tick_backup: TickBackup) {
        backup::restore(&mut self.world, &tick_backup.world);
        self.economy = tick_backup.economy;
        self.score = tick_backup.score;
        self.cursor = tick_backup.cursor;
        self.selected_tower = tick_backup.selected_tower;
        self.wave_progress = tick_backup.wave_progress;
        self.next_enemy_id = tick_backup.next_enemy_id;
        self.next_projectile_id = tick_backup.next_projectile_id;
        self.rng = tick_backup.rng;
    }

    /// Verify the data-model invariants after a tick's systems ran.
    fn check_invariants(&self) -> Result<(), SimulationFault> {
        // Every alive enemy holds positive health.
        for (_entity, (health, state)) in
            self.world.query::<(&Health, &EnemyState)>().iter()
        {
            if !state.slain && health.current <= 0.0 {
                return Err(SimulationFault {
                    invariant: "enemy-health-positive",
                    tick: self.time.tick,
                    detail: format!("enemy {} alive at {} hp", state.id, health.current),
                });
            }
        }

        // Every tower occupies a unique, in-bounds cell.
        let level = &self.config.levels[self.level_index];
        let mut cells: Vec<GridCell> = self
            .world
            .query::<&TowerState>()
            .iter()
            .map(|(_, tower)| tower.cell)
            .collect();
        cells.sort_by_key(|c| (c.row, c.col));
        for pair in cells.windows(2) {
            if pair[0] == pair[1] {
                return Err(SimulationFault {
                    invariant: "tower-cell-unique",
                    tick: self.time.tick,
                    detail: format!("duplicate tower at {:?}", pair[0]),
                });
            }
        }
        if let Some(cell) = cells
            .iter()
            .find(|c| !c.in_bounds(level.board_cols, level.board_rows))
        {
            return Err(SimulationFault {
                invariant: "tower-cell-in-bounds",
                tick: self.time.tick,
                detail: format!("tower outside board at {cell:?}"),
            });
        }

        Ok(())
    }

    /// Evaluate level completion and defeat at the tick boundary.
    fn evaluate_end_conditions(&mut self) {
        if self.phase != GamePhase::Active {
            return;
        }

        if self.economy.lives == 0 {
            self.feedback.push(FeedbackEvent::LevelFailed {
                level_index: self.level_index as u32,
            });
            self.push_economy_snapshot();
            self.phase = GamePhase::Defeat;
            return;
        }

        let level = &self.config.levels[self.level_index];
        if level.waves.is_empty() || !self.wave_progress.all_spawned(level) {
            return;
        }
        let alive = {
            let mut query = self.world.query::<&Enemy>();
            query.iter().count()
        };
        if alive > 0 {
            return;
        }

        self.feedback.push(FeedbackEvent::LevelComplete {
            level_index: self.level_index as u32,
        });
        self.push_economy_snapshot();

        if self.level_index + 1 >= self.config.levels.len() {
            self.phase = GamePhase::Victory;
        } else {
            self.enter_level(self.level_index + 1);
        }
    }

    fn push_economy_snapshot(&mut self) {
        self.feedback.push(FeedbackEvent::EconomySnapshot {
            currency: self.economy.currency,
            lives: self.economy.lives,
            tick: self.time.tick,
        });
    }

    fn build_snapshot(&mut self) -> BoardSnapshot {
        let wave = match self.config.levels.get(self.level_index) {
            Some(level) => WaveView {
                current_wave: self.wave_progress.current_wave(),
                total_waves: level.waves.len() as u32,
                pending_spawns: self.wave_progress.pending_spawns(level),
            },
            None => WaveView::default(),
        };

        let header = SnapshotHeader {
            time: self.time,
            phase: self.phase,
            level_index: self.level_index as u32,
            cursor: self.cursor,
            selected_tower: self.selected_tower,
            economy: EconomyView {
                currency: self.economy.currency,
                lives: self.economy.lives,
            },
            wave,
            stats: StatsView {
                enemies_slain: self.score.enemies_slain,
                enemies_leaked: self.score.enemies_leaked,
                towers_built: self.score.towers_built,
                gestures_applied: self.gestures_applied,
                gestures_evicted: self.queue_stats.evicted,
                gestures_expired: self.queue_stats.expired,
                faulted_ticks: self.faulted_ticks,
            },
        };

        let feedback = std::mem::take(&mut self.feedback);
        systems::snapshot::build_snapshot(&self.world, header, feedback)
    }

    // --- Test support ---

    /// Spawn an enemy directly at a position (bypasses the wave
    /// scheduler), returning its stable id.
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        kind: palisade_core::enums::EnemyKind,
        position: palisade_core::types::Position,
        health: f32,
    ) -> u32 {
        use palisade_core::components::PathFollower;
        use palisade_core::types::Velocity;

        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        let profile = palisade_core::constants::enemy_profile(kind);
        self.world.spawn((
            Enemy,
            position,
            Velocity::default(),
            Health {
                current: health,
                max: health,
            },
            EnemyState {
                id,
                kind,
                reward: profile.reward,
                slain: false,
                leaked: false,
            },
            PathFollower {
                path_index: 0,
                next_waypoint: 1,
                speed: 0.0,
            },
        ));
        id
    }

    /// Spawn a projectile directly (bypasses targeting), returning its id.
    #[cfg(test)]
    pub fn spawn_test_projectile(
        &mut self,
        position: palisade_core::types::Position,
        target_enemy: u32,
        damage: f32,
    ) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        crate::world_setup::spawn_projectile(
            &mut self.world,
            id,
            position,
            target_enemy,
            damage,
            0.0,
        );
        id
    }

    /// Force every subsequent tick to violate an invariant, exercising
    /// rollback and the halt path.
    #[cfg(test)]
    pub fn force_fault(&mut self, on: bool) {
        self.force_fault = on;
    }

    #[cfg(test)]
    fn corrupt_world_for_test(&mut self) {
        for (_entity, (health, state)) in
            self.world.query_mut::<(&mut Health, &mut EnemyState)>()
        {
            health.current = -1.0;
            state.slain = false;
            break;
        }
    }
}
