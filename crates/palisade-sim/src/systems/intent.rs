//! Intent interpretation — turns confirmed gestures into validated
//! board commands.
//!
//! Invalid commands are surfaced as `CommandRejected` feedback and
//! never fail the tick. The cursor and tower selection live on the
//! engine so every gesture's effect is observable in the snapshot.

use hecs::World;
use tracing::debug;

use palisade_core::commands::BoardCommand;
use palisade_core::components::{EnemyState, Health, TowerState};
use palisade_core::config::LevelConfig;
use palisade_core::constants::{ability_profile, tower_profile, MIN_PINCH_STRENGTH};
use palisade_core::enums::{AbilityKind, RejectReason, TowerKind};
use palisade_core::events::FeedbackEvent;
use palisade_core::gesture::{GestureEvent, GestureIntent};
use palisade_core::types::{GridCell, Position};

use crate::economy::{Economy, ScoreState};
use crate::world_setup;

/// Decode a gesture into a board command against the current cursor
/// and selection.
fn decode(
    intent: GestureIntent,
    cursor: GridCell,
    selected: TowerKind,
) -> Result<BoardCommand, RejectReason> {
    match intent {
        GestureIntent::PointAt { region } => Ok(BoardCommand::MoveCursor { cell: region }),
        GestureIntent::Pinch { strength } => {
            if strength < MIN_PINCH_STRENGTH {
                Err(RejectReason::WeakGesture)
            } else {
                Ok(BoardCommand::PlaceTower {
                    kind: selected,
                    cell: cursor,
                })
            }
        }
        GestureIntent::OpenPalm => Ok(BoardCommand::CycleTowerKind),
        GestureIntent::Fist => Ok(BoardCommand::TriggerAbility {
            kind: AbilityKind::Shockwave,
            cell: cursor,
        }),
        GestureIntent::TapAt { cell } => Ok(BoardCommand::PlaceTower {
            kind: selected,
            cell,
        }),
    }
}

/// Apply all pending gestures. Returns the number applied.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    gestures: &mut Vec<GestureEvent>,
    level: &LevelConfig,
    cursor: &mut GridCell,
    selected: &mut TowerKind,
    economy: &mut Economy,
    score: &mut ScoreState,
    feedback: &mut Vec<FeedbackEvent>,
) -> u64 {
    let pending = std::mem::take(gestures);
    let mut applied = 0u64;

    for gesture in pending {
        applied += 1;
        match decode(gesture.intent, *cursor, *selected) {
            Ok(command) => apply_command(
                world, command, level, cursor, selected, economy, score, feedback,
            ),
            Err(reason) => {
                feedback.push(FeedbackEvent::CommandRejected { reason });
            }
        }
    }
    applied
}

#[allow(clippy::too_many_arguments)]
fn apply_command(
    world: &mut World,
    command: BoardCommand,
    level: &LevelConfig,
    cursor: &mut GridCell,
    selected: &mut TowerKind,
    economy: &mut Economy,
    score: &mut ScoreState,
    feedback: &mut Vec<FeedbackEvent>,
) {
    match command {
        BoardCommand::MoveCursor { cell } => {
            *cursor = GridCell::new(
                cell.col.clamp(0, level.board_cols - 1),
                cell.row.clamp(0, level.board_rows - 1),
            );
        }
        BoardCommand::CycleTowerKind => {
            *selected = selected.next();
            feedback.push(FeedbackEvent::TowerSelected { kind: *selected });
        }
        BoardCommand::PlaceTower { kind, cell } => {
            if let Err(reason) = validate_placement(world, level, kind, cell, economy) {
                feedback.push(FeedbackEvent::CommandRejected { reason });
                return;
            }
            let cost = tower_profile(kind).cost;
            // Affordability was validated; the debit cannot fail here.
            let _ = economy.try_spend(cost);
            world_setup::spawn_tower(world, kind, cell);
            *cursor = cell;
            score.towers_built += 1;
            debug!(?kind, ?cell, cost, "tower placed");
            feedback.push(FeedbackEvent::TowerPlaced { kind, cell });
        }
        BoardCommand::TriggerAbility { kind, cell } => {
            let profile = ability_profile(kind);
            if !economy.try_spend(profile.cost) {
                feedback.push(FeedbackEvent::CommandRejected {
                    reason: RejectReason::InsufficientFunds,
                });
                return;
            }
            apply_shockwave(world, cell, profile.radius, profile.damage);
            feedback.push(FeedbackEvent::AbilityTriggered { kind, cell });
        }
    }
}

fn validate_placement(
    world: &World,
    level: &LevelConfig,
    kind: TowerKind,
    cell: GridCell,
    economy: &Economy,
) -> Result<(), RejectReason> {
    if !cell.in_bounds(level.board_cols, level.board_rows) {
        return Err(RejectReason::OutOfBounds);
    }
    if level.is_path_cell(cell) {
        return Err(RejectReason::OnPath);
    }
    let occupied = world
        .query::<&TowerState>()
        .iter()
        .any(|(_, tower)| tower.cell == cell);
    if occupied {
        return Err(RejectReason::CellOccupied);
    }
    if economy.currency < tower_profile(kind).cost {
        return Err(RejectReason::InsufficientFunds);
    }
    Ok(())
}

/// Area damage centered on a cell. Kills here carry no projectile
/// credit; the slain flag is still set exactly once.
fn apply_shockwave(world: &mut World, cell: GridCell, radius: f32, damage: f32) {
    let center = cell.center();
    for (_entity, (pos, health, state)) in
        world.query_mut::<(&Position, &mut Health, &mut EnemyState)>()
    {
        if state.slain || state.leaked {
            continue;
        }
        if pos.range_to(&center) <= radius {
            health.current -= damage;
            if health.current <= 0.0 {
                health.current = 0.0;
                state.slain = true;
            }
        }
    }
}
