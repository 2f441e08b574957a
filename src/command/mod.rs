//! The command surface
//!
//! Every mutation of a running match comes through [`GameState::execute`]
//! as a [`Command`], whether a human front-end or the AI issued it. A
//! command either fully applies or fails without touching state, and
//! either way the outcome lands in the event stream as a log line.

use serde::{Deserialize, Serialize};

use crate::capture::{self, CaptureOutcome};
use crate::catalog::unit::{Domain, UnitKind};
use crate::combat;
use crate::core::error::{EngineError, Result};
use crate::core::types::{Coord, FactionId, UnitId};
use crate::movement;
use crate::state::GameState;
use crate::turn::{self, Phase, Selection};

/// A single player or AI action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    SelectUnit(Coord),
    SelectBuildTile(Coord),
    Move(Coord),
    Attack(Coord),
    Capture,
    Wait,
    Build(UnitKind),
    LoadCargo,
    UnloadCargo,
    ToggleSubmerge,
    CancelSelection,
    EndTurn,
}

impl GameState {
    /// Validate and apply one command for `faction`
    ///
    /// Returns the log line describing what happened. Commands from the
    /// non-active faction and commands after the match ended are rejected
    /// outright. Failures are also reported on the event stream.
    pub fn execute(&mut self, faction: FactionId, command: Command) -> Result<String> {
        if self.turn.phase == Phase::GameOver {
            return Err(EngineError::GameOver);
        }
        if faction != self.turn.current_faction {
            return Err(EngineError::OutOfTurn);
        }

        tracing::debug!(target: "ironfront", ?command, %faction, "executing");

        let result = match command {
            Command::SelectUnit(at) => select_unit(self, at),
            Command::SelectBuildTile(at) => select_build_tile(self, at),
            Command::Move(to) => move_unit(self, to),
            Command::Attack(target) => attack(self, target),
            Command::Capture => capture_structure(self),
            Command::Wait => wait(self),
            Command::Build(kind) => build(self, kind),
            Command::LoadCargo => load_cargo(self),
            Command::UnloadCargo => unload_cargo(self),
            Command::ToggleSubmerge => toggle_submerge(self),
            Command::CancelSelection => cancel_selection(self),
            Command::EndTurn => Ok(turn::end_turn(self)),
        };

        match result {
            Ok(line) => {
                self.log(line.clone());
                Ok(line)
            }
            Err(error) => {
                self.log(error.to_string());
                Err(error)
            }
        }
    }
}

/// The selected unit, verified alive, owned, and still able to act
fn selected_unit(state: &GameState) -> Result<UnitId> {
    let Selection::Unit(id) = state.turn.selection else {
        return Err(EngineError::InvalidSelection("no unit selected".into()));
    };
    let unit = state
        .units
        .get(id)
        .ok_or_else(|| EngineError::InvalidSelection("selected unit no longer exists".into()))?;
    if unit.faction != state.turn.current_faction {
        return Err(EngineError::InvalidSelection(
            "unit belongs to another faction".into(),
        ));
    }
    if unit.has_acted {
        return Err(EngineError::InvalidSelection(
            "unit has already acted this turn".into(),
        ));
    }
    Ok(id)
}

fn require_actions(state: &GameState, needed: u32) -> Result<()> {
    if state.turn.actions_left < needed {
        return Err(EngineError::InsufficientResources(format!(
            "need {} action points, have {}",
            needed, state.turn.actions_left
        )));
    }
    Ok(())
}

fn select_unit(state: &mut GameState, at: Coord) -> Result<String> {
    let tile = state
        .board
        .tile(at)
        .ok_or_else(|| EngineError::InvalidSelection(format!("{at} is off the board")))?;
    let id = tile
        .occupant
        .ok_or_else(|| EngineError::InvalidSelection(format!("no unit at {at}")))?;
    let unit = state.units.get(id).expect("occupant not in registry");
    // A hidden submarine is not selectable knowledge
    if unit.hidden_from(state.turn.current_faction) {
        return Err(EngineError::InvalidSelection(format!("no unit at {at}")));
    }
    if unit.faction != state.turn.current_faction {
        return Err(EngineError::InvalidSelection(
            "cannot select an enemy unit".into(),
        ));
    }
    if unit.has_acted {
        return Err(EngineError::InvalidSelection(
            "unit has already acted this turn".into(),
        ));
    }
    let name = unit.kind.name();
    state.turn.selection = Selection::Unit(id);
    Ok(format!("Selected {name} at {at}"))
}

fn select_build_tile(state: &mut GameState, at: Coord) -> Result<String> {
    let faction = state.turn.current_faction;
    let tile = state
        .board
        .tile(at)
        .ok_or_else(|| EngineError::InvalidSelection(format!("{at} is off the board")))?;
    if !tile.terrain.capturable() {
        return Err(EngineError::NotCapturable(at));
    }
    if tile.owner != Some(faction) {
        return Err(EngineError::InvalidSelection(
            "structure is not owned by the acting faction".into(),
        ));
    }
    if tile.occupant.is_some() {
        return Err(EngineError::OccupiedTarget(at));
    }
    let name = tile.terrain.name();
    state.turn.selection = Selection::BuildTile(at);
    Ok(format!("Selected {name} at {at}. Choose a unit to build"))
}

fn move_unit(state: &mut GameState, to: Coord) -> Result<String> {
    let id = selected_unit(state)?;
    require_actions(state, 1)?;

    let unit = state.units.get(id).unwrap();
    let faction = unit.faction;
    let reachable = movement::reachable_tiles(&state.board, &state.units, unit);
    if !reachable.contains(&to) {
        return Err(EngineError::IllegalDestination(to));
    }

    // A submerged enemy submarine reads as an empty tile. Entering it is
    // intercepted: the submarine surfaces and fires first, and the move
    // never happens.
    if let Some(lurker) = state.board.tile(to).and_then(|tile| tile.occupant) {
        let occupant = state.units.get(lurker).expect("occupant not in registry");
        if occupant.hidden_from(faction) {
            return ambush_move(state, lurker, id);
        }
    }

    apply_move(state, id, to);
    state.turn.actions_left -= 1;
    let unit = state.units.get_mut(id).unwrap();
    unit.has_acted = true;
    let name = unit.kind.name();
    state.turn.selection = Selection::None;
    Ok(format!(
        "{name} moved to {to} - Actions remaining: {}",
        state.turn.actions_left
    ))
}

/// Reposition a unit without spending anything; shared by move and the
/// relocating half of move-then-attack
fn apply_move(state: &mut GameState, id: UnitId, to: Coord) {
    let unit = state.units.get_mut(id).unwrap();
    let from = unit.pos;
    unit.pos = to;
    capture::reset_if_departed(unit);
    state.board.clear_occupant(from, id);
    state.board.place_occupant(to, id);
}

/// A surfaced submarine strikes the unit that tried to sail through it
fn ambush_move(state: &mut GameState, submarine: UnitId, mover: UnitId) -> Result<String> {
    let sub = state.units.get_mut(submarine).unwrap();
    sub.submerged = false;
    let sub_name = sub.kind.name();

    let mover_unit = state.units.get(mover).unwrap();
    let mover_name = mover_unit.kind.name();
    let mover_terrain = state.board.tile(mover_unit.pos).unwrap().terrain;

    let attacker = state.units.get(submarine).unwrap();
    let defender = state.units.get(mover).unwrap();
    let damage = combat::compute_damage(attacker, defender, mover_terrain, &mut state.rng);

    let defender = state.units.get_mut(mover).unwrap();
    defender.health -= damage;
    let destroyed = defender.health <= 0;
    if destroyed {
        state.destroy_unit(mover);
    }

    state.turn.selection = Selection::None;
    turn::run_victory_check(state);
    Ok(if destroyed {
        format!("{sub_name} surfaces and destroys the approaching {mover_name}!")
    } else {
        format!(
            "{sub_name} surfaces and ambushes the approaching {mover_name} for {damage} damage!"
        )
    })
}

fn attack(state: &mut GameState, target: Coord) -> Result<String> {
    let id = selected_unit(state)?;
    require_actions(state, 1)?;

    let attacker = state.units.get(id).unwrap();
    let faction = attacker.faction;

    let defender_id = state
        .board
        .tile(target)
        .and_then(|tile| tile.occupant)
        .filter(|&occupant| {
            let unit = state.units.get(occupant).expect("occupant not in registry");
            unit.faction != faction && !unit.hidden_from(faction)
        })
        .ok_or_else(|| EngineError::InvalidSelection(format!("no target at {target}")))?;

    let adjacent = movement::attackable_tiles(&state.board, attacker).contains(&target);
    if !adjacent {
        // Move into an attack position first, then strike: two actions
        let approach =
            movement::find_approach_for_attack(&state.board, &state.units, attacker, target)
                .ok_or(EngineError::IllegalDestination(target))?;
        require_actions(state, 2)?;
        apply_move(state, id, approach);
        state.turn.actions_left -= 1;
    }

    state.turn.actions_left -= 1;
    let report = combat::resolve_attack(state, id, defender_id);
    if !report.attacker_destroyed {
        state.units.get_mut(id).unwrap().has_acted = true;
    }
    state.turn.selection = Selection::None;
    turn::run_victory_check(state);

    let mut line = format!("Attack hits for {} damage", report.damage);
    if report.defender_destroyed {
        line.push_str("; the defender is destroyed");
    }
    if let Some(counter) = report.counter_damage {
        line.push_str(&format!("; counter-attack deals {counter} damage"));
        if report.attacker_destroyed {
            line.push_str("; the attacker is destroyed");
        }
    }
    line.push_str(&format!(
        " - Actions remaining: {}",
        state.turn.actions_left
    ));
    Ok(line)
}

fn capture_structure(state: &mut GameState) -> Result<String> {
    let id = selected_unit(state)?;
    require_actions(state, 1)?;

    let outcome = capture::advance_capture(state, id)?;
    state.turn.actions_left -= 1;
    let unit = state.units.get_mut(id).unwrap();
    unit.has_acted = true;
    let name = unit.kind.name();
    state.turn.selection = Selection::None;

    match outcome {
        CaptureOutcome::Captured { terrain } => {
            turn::run_victory_check(state);
            Ok(format!(
                "{name} captured the {}! Actions remaining: {}",
                terrain.name(),
                state.turn.actions_left
            ))
        }
        CaptureOutcome::Progress { remaining } => Ok(format!(
            "{name} capturing... {remaining} more needed. Actions remaining: {}",
            state.turn.actions_left
        )),
    }
}

fn wait(state: &mut GameState) -> Result<String> {
    let id = selected_unit(state)?;
    require_actions(state, 1)?;

    state.turn.actions_left -= 1;
    let unit = state.units.get_mut(id).unwrap();
    unit.has_acted = true;
    let name = unit.kind.name();
    state.turn.selection = Selection::None;
    Ok(format!(
        "{name} waits. Actions remaining: {}",
        state.turn.actions_left
    ))
}

fn build(state: &mut GameState, kind: UnitKind) -> Result<String> {
    let Selection::BuildTile(at) = state.turn.selection else {
        return Err(EngineError::InvalidSelection(
            "no production tile selected".into(),
        ));
    };
    let faction = state.turn.current_faction;

    // Re-validate the tile; state may have shifted since selection
    let tile = state
        .board
        .tile(at)
        .expect("selected production tile off the board");
    if !tile.terrain.capturable() || tile.owner != Some(faction) {
        return Err(EngineError::InvalidSelection(
            "structure is not owned by the acting faction".into(),
        ));
    }
    if tile.occupant.is_some() {
        return Err(EngineError::OccupiedTarget(at));
    }
    if !kind.buildable_at(tile.terrain) {
        return Err(EngineError::InvalidSelection(format!(
            "{} cannot be built at a {}",
            kind.name(),
            tile.terrain.name()
        )));
    }

    let stats = kind.stats();
    if state.money(faction) < stats.cost {
        return Err(EngineError::InsufficientResources(format!(
            "need {} money, have {}",
            stats.cost,
            state.money(faction)
        )));
    }
    require_actions(state, stats.action_cost)?;

    state.spawn_unit(kind, faction, at)?;
    *state.money_mut(faction) -= stats.cost;
    state.turn.actions_left -= stats.action_cost;
    state.turn.selection = Selection::None;
    Ok(format!(
        "Built {} for {} - Money: {}, Actions: {}",
        kind.name(),
        stats.cost,
        state.money(faction),
        state.turn.actions_left
    ))
}

fn load_cargo(state: &mut GameState) -> Result<String> {
    let id = selected_unit(state)?;
    require_actions(state, 1)?;

    let transport = state.units.get(id).unwrap();
    let stats = transport.stats();
    if stats.transport_capacity == 0 {
        return Err(EngineError::InvalidSelection(
            "unit cannot carry cargo".into(),
        ));
    }
    let faction = transport.faction;
    let load = transport.cargo_load();

    // First adjacent friendly land unit that still fits
    let mut saw_candidate = false;
    let mut chosen = None;
    for neighbor in transport.pos.neighbors() {
        let Some(occupant) = state.board.tile(neighbor).and_then(|t| t.occupant) else {
            continue;
        };
        let unit = state.units.get(occupant).expect("occupant not in registry");
        if unit.faction != faction || unit.stats().domain != Domain::Land {
            continue;
        }
        saw_candidate = true;
        if load + unit.stats().cargo_size <= stats.transport_capacity {
            chosen = Some(occupant);
            break;
        }
    }
    let Some(passenger_id) = chosen else {
        return Err(EngineError::InvalidSelection(if saw_candidate {
            "transport is full or the adjacent units are too large".into()
        } else {
            "no adjacent unit to load".into()
        }));
    };

    let passenger = state.units.remove(passenger_id).unwrap();
    state.board.clear_occupant(passenger.pos, passenger_id);
    let name = passenger.kind.name();
    state.units.get_mut(id).unwrap().cargo.push(passenger);
    state.turn.actions_left -= 1;
    Ok(format!(
        "{name} loaded aboard - Actions remaining: {}",
        state.turn.actions_left
    ))
}

fn unload_cargo(state: &mut GameState) -> Result<String> {
    let id = selected_unit(state)?;
    require_actions(state, 1)?;

    let transport = state.units.get(id).unwrap();
    if transport.stats().transport_capacity == 0 {
        return Err(EngineError::InvalidSelection(
            "unit cannot carry cargo".into(),
        ));
    }
    if transport.cargo.is_empty() {
        return Err(EngineError::InvalidSelection("no cargo aboard".into()));
    }

    // First empty adjacent tile off the sea lanes
    let mut blocked_shore = None;
    let mut landing = None;
    for neighbor in transport.pos.neighbors() {
        let Some(tile) = state.board.tile(neighbor) else {
            continue;
        };
        if tile.terrain.is_water() {
            continue;
        }
        if tile.occupant.is_some() {
            blocked_shore.get_or_insert(neighbor);
            continue;
        }
        landing = Some(neighbor);
        break;
    }
    let Some(landing) = landing else {
        return Err(match blocked_shore {
            Some(coord) => EngineError::OccupiedTarget(coord),
            None => {
                EngineError::InvalidSelection("must be adjacent to land to unload".into())
            }
        });
    };

    let mut passenger = state.units.get_mut(id).unwrap().cargo.remove(0);
    passenger.pos = landing;
    passenger.has_acted = true;
    capture::reset_if_departed(&mut passenger);
    let passenger_id = passenger.id;
    let name = passenger.kind.name();
    state.units.reinsert(passenger);
    state.board.place_occupant(landing, passenger_id);
    state.turn.actions_left -= 1;
    Ok(format!(
        "{name} unloaded at {landing} - Actions remaining: {}",
        state.turn.actions_left
    ))
}

fn toggle_submerge(state: &mut GameState) -> Result<String> {
    let id = selected_unit(state)?;
    require_actions(state, 1)?;

    let unit = state.units.get_mut(id).unwrap();
    if !unit.stats().can_submerge {
        return Err(EngineError::InvalidSelection("unit cannot submerge".into()));
    }
    unit.submerged = !unit.submerged;
    unit.has_acted = true;
    let name = unit.kind.name();
    let verb = if unit.submerged { "submerged" } else { "surfaced" };
    state.turn.actions_left -= 1;
    state.turn.selection = Selection::None;
    Ok(format!(
        "{name} {verb} - Actions remaining: {}",
        state.turn.actions_left
    ))
}

fn cancel_selection(state: &mut GameState) -> Result<String> {
    state.turn.selection = Selection::None;
    Ok("Selection cancelled".into())
}
