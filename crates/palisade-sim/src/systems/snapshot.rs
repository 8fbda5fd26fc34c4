//! Snapshot system: queries the ECS world and builds a complete
//! `BoardSnapshot`. Read-only — it never modifies the world.

use hecs::World;

use palisade_core::components::{EnemyState, Health, ProjectileState, TowerState};
use palisade_core::enums::{GamePhase, TowerKind};
use palisade_core::state::*;
use palisade_core::types::{GridCell, Position, SimTime};

/// Engine-owned scalars copied into the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotHeader {
    pub time: SimTime,
    pub phase: GamePhase,
    pub level_index: u32,
    pub cursor: GridCell,
    pub selected_tower: TowerKind,
    pub economy: EconomyView,
    pub wave: WaveView,
    pub stats: StatsView,
}

/// Build a complete snapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    header: SnapshotHeader,
    feedback: Vec<palisade_core::events::FeedbackEvent>,
) -> BoardSnapshot {
    BoardSnapshot {
        time: header.time,
        phase: header.phase,
        level_index: header.level_index,
        cursor: header.cursor,
        selected_tower: header.selected_tower,
        towers: build_towers(world),
        enemies: build_enemies(world),
        projectiles: build_projectiles(world),
        economy: header.economy,
        wave: header.wave,
        feedback,
        stats: header.stats,
    }
}

fn build_towers(world: &World) -> Vec<TowerView> {
    let mut towers: Vec<TowerView> = world
        .query::<&TowerState>()
        .iter()
        .map(|(_, tower)| TowerView {
            kind: tower.kind,
            cell: tower.cell,
            cooldown_remaining: tower.cooldown_remaining,
        })
        .collect();
    towers.sort_by_key(|t| (t.cell.row, t.cell.col));
    towers
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Position, &Health, &EnemyState)>()
        .iter()
        .map(|(_, (pos, health, state))| EnemyView {
            id: state.id,
            kind: state.kind,
            position: *pos,
            health: health.current,
            max_health: health.max,
        })
        .collect();
    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Position, &ProjectileState)>()
        .iter()
        .map(|(_, (pos, state))| ProjectileView {
            id: state.id,
            position: *pos,
            target_enemy: state.target_enemy,
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);
    projectiles
}
