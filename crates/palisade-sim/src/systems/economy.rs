//! Economy accrual: kill rewards and leak penalties.
//!
//! Runs after collision resolution and before cleanup, so every slain
//! or leaked enemy is visited exactly once — the entity is despawned
//! later in the same tick.

use hecs::World;

use palisade_core::components::EnemyState;
use palisade_core::events::FeedbackEvent;

use crate::economy::{Economy, ScoreState};

pub fn run(
    world: &mut World,
    economy: &mut Economy,
    score: &mut ScoreState,
    feedback: &mut Vec<FeedbackEvent>,
) {
    for (_entity, state) in world.query_mut::<&EnemyState>() {
        if state.slain {
            economy.credit(state.reward);
            score.enemies_slain += 1;
            feedback.push(FeedbackEvent::EnemySlain {
                enemy_id: state.id,
                reward: state.reward,
            });
        } else if state.leaked {
            economy.lose_life();
            score.enemies_leaked += 1;
            feedback.push(FeedbackEvent::EnemyLeaked { enemy_id: state.id });
        }
    }
}
