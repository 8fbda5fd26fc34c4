//! Wave spawning system — executes the level's spawn schedule.
//!
//! A pure function of the immutable wave descriptors and the elapsed
//! level tick: the same descriptor and tick sequence always produce
//! identical spawn timing. The only randomness is the lateral spawn
//! jitter drawn from the engine's seeded RNG.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use palisade_core::config::LevelConfig;
use palisade_core::events::FeedbackEvent;

use crate::world_setup;

/// Per-wave execution progress. The descriptors themselves stay
/// immutable in the level config.
#[derive(Debug, Clone, Default)]
pub struct WaveProgress {
    pub waves: Vec<WaveState>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WaveState {
    pub started: bool,
    /// Index of the next spawn instruction not yet executed.
    pub next_spawn: usize,
}

impl WaveProgress {
    pub fn for_level(level: &LevelConfig) -> Self {
        Self {
            waves: vec![WaveState::default(); level.waves.len()],
        }
    }

    /// Whether every instruction in every wave has spawned.
    pub fn all_spawned(&self, level: &LevelConfig) -> bool {
        self.waves
            .iter()
            .zip(&level.waves)
            .all(|(state, wave)| state.next_spawn >= wave.spawns.len())
    }

    /// Spawns not yet executed in this level.
    pub fn pending_spawns(&self, level: &LevelConfig) -> u32 {
        self.waves
            .iter()
            .zip(&level.waves)
            .map(|(state, wave)| (wave.spawns.len() - state.next_spawn) as u32)
            .sum()
    }

    /// 1-based index of the most recently started wave (0 = none yet).
    pub fn current_wave(&self) -> u32 {
        self.waves.iter().filter(|w| w.started).count() as u32
    }
}

/// Check the schedule and execute any due spawn instructions.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    progress: &mut WaveProgress,
    level: &LevelConfig,
    level_tick: u64,
    next_enemy_id: &mut u32,
    feedback: &mut Vec<FeedbackEvent>,
) {
    for (index, (state, wave)) in progress.waves.iter_mut().zip(&level.waves).enumerate() {
        if !state.started && level_tick >= wave.start_tick {
            state.started = true;
            debug!(wave = index, tick = level_tick, "wave started");
            feedback.push(FeedbackEvent::WaveStarted {
                wave_index: index as u32,
            });
        }
        if !state.started {
            continue;
        }

        // Instructions are ordered by offset; execute all that are due.
        while state.next_spawn < wave.spawns.len() {
            let instruction = &wave.spawns[state.next_spawn];
            if level_tick < wave.start_tick + instruction.offset_ticks {
                break;
            }
            let id = *next_enemy_id;
            *next_enemy_id += 1;
            world_setup::spawn_enemy(world, rng, level, instruction.enemy, instruction.path, id);
            state.next_spawn += 1;
        }
    }
}
