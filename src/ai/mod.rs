//! Scripted AI: plans a queue of actions, then replays it through the
//! command surface
//!
//! Planning is a snapshot pass over the faction's units that have not yet
//! acted. Each unit gets at most one action: strike an adjacent enemy,
//! else work toward a capture, else march on the nearest enemy
//! headquarters. A shared reservation set keeps two units in the same
//! pass from picking the same destination. A build pass then spends
//! whatever treasury and action budget remain. Execution goes through
//! [`GameState::execute`] action by action, so the bot obeys exactly the
//! validation a human does, and the turn ends when the queue runs dry.

pub mod policy;

pub use policy::{BotPolicy, BuildContext, Difficulty, StandardPolicy};

use ahash::AHashSet;

use crate::catalog::unit::UnitKind;
use crate::command::Command;
use crate::core::error::Result;
use crate::core::types::{Coord, FactionId, UnitId};
use crate::movement;
use crate::state::GameState;
use crate::turn::Phase;
use crate::unit::Unit;

/// One queued bot decision, plain data only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    Attack { unit: UnitId, target: Coord },
    Capture { unit: UnitId },
    Move { unit: UnitId, to: Coord },
    Build { at: Coord, kind: UnitKind },
}

/// Plan the current faction's whole turn
pub fn plan_turn(state: &mut GameState, policy: &dyn BotPolicy) -> Vec<PlannedAction> {
    let faction = state.current_faction();
    let mut plan = Vec::new();
    let mut reserved: AHashSet<Coord> = AHashSet::new();

    for id in state.units.faction_ids(faction) {
        let unit = state.units.get(id).expect("faction id listing stale");
        if unit.has_acted {
            continue;
        }
        if policy.should_skip(&mut state.rng) {
            continue;
        }
        let unit = state.units.get(id).unwrap();

        if let Some(target) = adjacent_enemy(state, unit) {
            plan.push(PlannedAction::Attack { unit: id, target });
            continue;
        }

        if unit.stats().can_capture {
            let tile = state.board.tile(unit.pos).expect("unit off the board");
            if tile.terrain.capturable() && tile.owner != Some(faction) {
                plan.push(PlannedAction::Capture { unit: id });
                continue;
            }
            if let Some(goal) = nearest_capturable(state, unit) {
                if let Some(to) = step_toward(state, unit, goal, &reserved) {
                    reserved.insert(to);
                    plan.push(PlannedAction::Move { unit: id, to });
                    continue;
                }
            }
        }

        let goal = nearest_enemy_hq(state, unit).unwrap_or_else(|| state.board.center());
        if let Some(to) = step_toward(state, unit, goal, &reserved) {
            reserved.insert(to);
            plan.push(PlannedAction::Move { unit: id, to });
        }
    }

    plan_builds(state, policy, &mut plan);
    plan
}

/// Queue production on every idle structure the budget stretches to
fn plan_builds(state: &mut GameState, policy: &dyn BotPolicy, plan: &mut Vec<PlannedAction>) {
    let faction = state.current_faction();
    let mut money = state.money(faction);
    let mut actions = state.turn.actions_left;

    let own_units = state.units.faction_count(faction);
    let enemy_units = state.units.len() - own_units;
    let own_infantry = state
        .units
        .iter()
        .filter(|u| u.faction == faction && u.kind == UnitKind::Infantry)
        .count();
    let context = BuildContext {
        own_units,
        enemy_units,
        own_infantry,
    };

    let sites: Vec<(Coord, crate::catalog::terrain::Terrain)> = state
        .board
        .iter()
        .filter(|(_, tile)| {
            tile.terrain.capturable() && tile.owner == Some(faction) && tile.occupant.is_none()
        })
        .map(|(coord, tile)| (coord, tile.terrain))
        .collect();

    for (at, terrain) in sites {
        if actions == 0 {
            break;
        }
        let affordable: Vec<UnitKind> = UnitKind::ALL
            .into_iter()
            .filter(|kind| kind.buildable_at(terrain))
            .filter(|kind| {
                let stats = kind.stats();
                money >= stats.cost && actions >= stats.action_cost
            })
            .collect();
        let Some(kind) = policy.preferred_build(&affordable, context, &mut state.rng) else {
            continue;
        };
        let stats = kind.stats();
        money -= stats.cost;
        actions -= stats.action_cost;
        plan.push(PlannedAction::Build { at, kind });
    }
}

/// First adjacent visible enemy, in fixed neighbor order
fn adjacent_enemy(state: &GameState, unit: &Unit) -> Option<Coord> {
    for neighbor in unit.pos.neighbors() {
        let Some(occupant) = state.board.tile(neighbor).and_then(|t| t.occupant) else {
            continue;
        };
        let other = state.units.get(occupant).expect("occupant not in registry");
        if other.faction != unit.faction && !other.hidden_from(unit.faction) {
            return Some(neighbor);
        }
    }
    None
}

/// Closest capturable structure the faction does not hold
fn nearest_capturable(state: &GameState, unit: &Unit) -> Option<Coord> {
    state
        .board
        .iter()
        .filter(|(_, tile)| tile.terrain.capturable() && tile.owner != Some(unit.faction))
        .map(|(coord, _)| coord)
        .min_by_key(|coord| (unit.pos.distance(coord), coord.y, coord.x))
}

/// Closest headquarters held by anyone else
fn nearest_enemy_hq(state: &GameState, unit: &Unit) -> Option<Coord> {
    state
        .board
        .headquarters()
        .into_iter()
        .filter(|(_, owner)| *owner != Some(unit.faction))
        .map(|(coord, _)| coord)
        .min_by_key(|coord| (unit.pos.distance(coord), coord.y, coord.x))
}

/// Reachable destination closest to the goal, skipping reservations
fn step_toward(
    state: &GameState,
    unit: &Unit,
    goal: Coord,
    reserved: &AHashSet<Coord>,
) -> Option<Coord> {
    movement::reachable_tiles(&state.board, &state.units, unit)
        .into_iter()
        .filter(|coord| !reserved.contains(coord))
        .filter(|&coord| {
            state
                .board
                .tile(coord)
                .is_some_and(|tile| tile.occupant.is_none())
        })
        .min_by_key(|coord| (coord.distance(&goal), coord.y, coord.x))
}

/// Run a whole bot turn: plan, replay the queue, end the turn
///
/// Every queued action goes through the same command surface a human
/// uses; an action the board has since invalidated is skipped, not
/// forced. Pacing between actions is the caller's concern (the policy's
/// decision latency is available for that).
pub fn run_turn(state: &mut GameState, policy: &dyn BotPolicy) -> Result<()> {
    let faction = state.current_faction();
    let plan = plan_turn(state, policy);
    tracing::debug!(target: "ironfront", %faction, actions = plan.len(), "bot plan ready");

    for action in plan {
        if state.turn.phase == Phase::GameOver {
            return Ok(());
        }
        if let Err(error) = dispatch(state, faction, action) {
            tracing::debug!(target: "ironfront", %error, "bot action skipped");
        }
    }

    if state.turn.phase == Phase::Playing {
        state.execute(faction, Command::EndTurn)?;
    }
    Ok(())
}

/// Translate one planned action into commands
fn dispatch(state: &mut GameState, faction: FactionId, action: PlannedAction) -> Result<()> {
    match action {
        PlannedAction::Attack { unit, target } => {
            let at = unit_pos(state, unit)?;
            state.execute(faction, Command::SelectUnit(at))?;
            state.execute(faction, Command::Attack(target))?;
        }
        PlannedAction::Capture { unit } => {
            let at = unit_pos(state, unit)?;
            state.execute(faction, Command::SelectUnit(at))?;
            state.execute(faction, Command::Capture)?;
        }
        PlannedAction::Move { unit, to } => {
            let at = unit_pos(state, unit)?;
            state.execute(faction, Command::SelectUnit(at))?;
            state.execute(faction, Command::Move(to))?;
        }
        PlannedAction::Build { at, kind } => {
            state.execute(faction, Command::SelectBuildTile(at))?;
            state.execute(faction, Command::Build(kind))?;
        }
    }
    Ok(())
}

fn unit_pos(state: &GameState, id: UnitId) -> Result<Coord> {
    state
        .units
        .get(id)
        .map(|unit| unit.pos)
        .ok_or_else(|| crate::core::error::EngineError::InvalidSelection("unit lost".into()))
}
