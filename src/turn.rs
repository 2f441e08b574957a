//! Turn rotation, economy, and victory evaluation

use serde::{Deserialize, Serialize};

use crate::catalog::terrain::Terrain;
use crate::core::types::{Coord, FactionId, UnitId};
use crate::events::GameEvent;
use crate::state::GameState;

/// Whether the match is still being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Playing,
    GameOver,
}

/// What the active faction currently has picked out
///
/// A unit and a build tile are never selected at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Unit(UnitId),
    BuildTile(Coord),
}

/// Control-flow state for the running match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    pub current_faction: FactionId,
    pub turn: u32,
    pub actions_left: u32,
    pub phase: Phase,
    pub selection: Selection,
}

impl TurnState {
    pub fn new(actions_per_turn: u32) -> Self {
        Self {
            current_faction: FactionId(1),
            turn: 1,
            actions_left: actions_per_turn,
            phase: Phase::Playing,
            selection: Selection::None,
        }
    }
}

/// Why the match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryReason {
    #[serde(rename = "all-headquarters-captured")]
    AllHeadquartersCaptured,
    #[serde(rename = "turn-limit-score")]
    TurnLimitScore,
}

impl std::fmt::Display for VictoryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VictoryReason::AllHeadquartersCaptured => write!(f, "all-headquarters-captured"),
            VictoryReason::TurnLimitScore => write!(f, "turn-limit-score"),
        }
    }
}

/// Terminal result of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victory {
    pub winning_faction: FactionId,
    pub reason: VictoryReason,
}

/// Standing score used when the turn limit ends the match
///
/// Headquarters count for 100, cities 20, each unit 10, and every full
/// hundred of banked money one more point.
pub fn score(state: &GameState, faction: FactionId) -> u32 {
    let mut total = 0;
    for (_, tile) in state.board.iter() {
        if tile.owner == Some(faction) {
            match tile.terrain {
                Terrain::Hq => total += 100,
                Terrain::City => total += 20,
                _ => {}
            }
        }
    }
    total += state.units.faction_count(faction) as u32 * 10;
    total += state.money(faction) / 100;
    total
}

/// Evaluate the victory conditions against the current state
///
/// The turn limit is checked first; otherwise a faction that owns every
/// headquarters on the board wins outright. Score ties resolve to the
/// lowest faction number.
pub fn check_victory(state: &GameState) -> Option<Victory> {
    if let Some(limit) = state.config.turn_limit {
        if state.turn.turn > limit {
            let winner = (1..=state.config.factions)
                .map(FactionId)
                .max_by_key(|&f| (score(state, f), std::cmp::Reverse(f)))
                .expect("at least two factions");
            return Some(Victory {
                winning_faction: winner,
                reason: VictoryReason::TurnLimitScore,
            });
        }
    }

    let hqs = state.board.headquarters();
    if hqs.is_empty() {
        return None;
    }
    for faction in (1..=state.config.factions).map(FactionId) {
        if hqs.iter().all(|(_, owner)| *owner == Some(faction)) {
            return Some(Victory {
                winning_faction: faction,
                reason: VictoryReason::AllHeadquartersCaptured,
            });
        }
    }
    None
}

/// Run the victory check and, on a result, end the match
///
/// Idempotent once the game is over.
pub fn run_victory_check(state: &mut GameState) -> Option<Victory> {
    if state.turn.phase == Phase::GameOver {
        return None;
    }
    let victory = check_victory(state)?;
    state.turn.phase = Phase::GameOver;
    state.push_event(GameEvent::Victory {
        winning_faction: victory.winning_faction,
        reason: victory.reason,
    });
    state.log(format!(
        "Game over! Faction {} wins ({})",
        victory.winning_faction, victory.reason
    ));
    Some(victory)
}

/// Close out the active faction's turn and hand control to the next
///
/// The faction ending its turn has its units' acted flags cleared and is
/// the one paid this turn's income. Factions rotate in numeric order; the
/// turn counter ticks when control wraps back to faction 1. The new
/// faction starts with a full action pool.
pub fn end_turn(state: &mut GameState) -> String {
    let ending = state.turn.current_faction;

    for unit in state.units.iter_mut() {
        if unit.faction == ending {
            unit.has_acted = false;
        }
    }

    let income = state.config.income_per_turn;
    *state.money_mut(ending) += income;

    let next = if ending.0 >= state.config.factions {
        FactionId(1)
    } else {
        FactionId(ending.0 + 1)
    };
    state.turn.current_faction = next;
    if next == FactionId(1) {
        state.turn.turn += 1;
    }
    state.turn.actions_left = state.config.actions_per_turn;
    state.turn.selection = Selection::None;

    state.push_event(GameEvent::TurnStarted {
        faction: next,
        turn: state.turn.turn,
    });
    run_victory_check(state);

    format!(
        "Faction {}'s turn begins. Actions: {}, Money: {}",
        next,
        state.turn.actions_left,
        state.money(next)
    )
}
