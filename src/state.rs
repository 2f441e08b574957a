//! The game state aggregate
//!
//! One value owns everything a match mutates: board, unit registry,
//! faction treasuries, turn control state, the deterministic rng, and the
//! outbound event buffer. Command handlers receive it explicitly; there
//! is no ambient state anywhere in the engine.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::Board;
use crate::catalog::terrain::Terrain;
use crate::catalog::unit::UnitKind;
use crate::core::config::GameConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{Coord, FactionId, Money, UnitId};
use crate::events::{build_snapshot, GameEvent, StateSnapshot};
use crate::movement;
use crate::turn::{Selection, TurnState};
use crate::unit::UnitRegistry;

#[derive(Debug)]
pub struct GameState {
    pub board: Board,
    pub units: UnitRegistry,
    /// Treasury per faction, indexed by `FactionId::index`
    pub money: Vec<Money>,
    pub config: GameConfig,
    pub turn: TurnState,
    pub rng: ChaCha8Rng,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Start a match on a generated board
    ///
    /// The board arrives from an external generator with terrain and
    /// initial structure ownership already painted; units are placed
    /// afterwards through [`GameState::spawn_unit`].
    pub fn new(board: Board, config: GameConfig) -> std::result::Result<Self, String> {
        config.validate()?;
        Ok(Self {
            board,
            units: UnitRegistry::new(),
            money: vec![config.starting_money; config.factions as usize],
            turn: TurnState::new(config.actions_per_turn),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            events: Vec::new(),
        })
    }

    pub fn current_faction(&self) -> FactionId {
        self.turn.current_faction
    }

    pub fn money(&self, faction: FactionId) -> Money {
        self.money[faction.index()]
    }

    pub fn money_mut(&mut self, faction: FactionId) -> &mut Money {
        &mut self.money[faction.index()]
    }

    /// Create a unit on the board (initial placement and the build command)
    ///
    /// The tile must be empty and traversable by the unit's domain.
    pub fn spawn_unit(&mut self, kind: UnitKind, faction: FactionId, at: Coord) -> Result<UnitId> {
        let tile = self
            .board
            .tile(at)
            .ok_or(EngineError::IllegalDestination(at))?;
        if tile.occupant.is_some() {
            return Err(EngineError::OccupiedTarget(at));
        }
        if movement::terrain_cost(kind, tile.terrain).is_none() {
            return Err(EngineError::IllegalDestination(at));
        }
        let id = self.units.spawn(kind, faction, at);
        self.board.place_occupant(at, id);
        Ok(id)
    }

    /// Remove a unit from play, cargo and all
    ///
    /// Board reference and registry record go together; carried units are
    /// stored inside the carrier and are destroyed with it.
    pub fn destroy_unit(&mut self, id: UnitId) {
        let Some(unit) = self.units.remove(id) else {
            panic!("destroying a unit that is not registered");
        };
        self.board.clear_occupant(unit.pos, id);
        if self.turn.selection == Selection::Unit(id) {
            self.turn.selection = Selection::None;
        }
        if !unit.cargo.is_empty() {
            self.log(format!(
                "{} units lost with the {}",
                unit.cargo.len(),
                unit.kind.name()
            ));
        }
        self.push_event(GameEvent::UnitDestroyed {
            unit: id,
            kind: unit.kind,
            faction: unit.faction,
            at: unit.pos,
        });
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn push_capture_event(&mut self, faction: FactionId, terrain: Terrain, at: Coord) {
        self.push_event(GameEvent::StructureCaptured {
            faction,
            terrain,
            at,
        });
    }

    /// Append a line to the outbound message log
    pub fn log(&mut self, message: String) {
        tracing::debug!(target: "ironfront", "{message}");
        self.events.push(GameEvent::Log { message });
    }

    /// Events accumulated so far (mainly for tests)
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand the buffered events to the presentation layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshot the match as seen by `viewer`
    ///
    /// With a viewer, other factions' submerged submarines are omitted.
    /// `None` produces an omniscient snapshot.
    pub fn snapshot(&self, viewer: Option<FactionId>) -> StateSnapshot {
        build_snapshot(
            &self.board,
            &self.units,
            &self.money,
            self.turn.current_faction,
            self.turn.turn,
            self.turn.actions_left,
            self.turn.phase,
            viewer,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::terrain::Terrain;

    fn state() -> GameState {
        GameState::new(Board::new(6, 6), GameConfig::default()).unwrap()
    }

    #[test]
    fn test_new_state_funds_all_factions() {
        let state = state();
        assert_eq!(state.money(FactionId(1)), 2000);
        assert_eq!(state.money(FactionId(2)), 2000);
    }

    #[test]
    fn test_spawn_rejects_occupied_and_wrong_domain() {
        let mut state = state();
        let at = Coord::new(2, 2);
        state.spawn_unit(UnitKind::Infantry, FactionId(1), at).unwrap();
        assert_eq!(
            state.spawn_unit(UnitKind::Tank, FactionId(1), at),
            Err(EngineError::OccupiedTarget(at))
        );
        // No ship on plains
        assert!(state
            .spawn_unit(UnitKind::Battleship, FactionId(1), Coord::new(3, 3))
            .is_err());
    }

    #[test]
    fn test_destroy_clears_board_and_registry() {
        let mut state = state();
        let at = Coord::new(2, 2);
        let id = state.spawn_unit(UnitKind::Infantry, FactionId(1), at).unwrap();
        state.destroy_unit(id);
        assert!(state.units.get(id).is_none());
        assert_eq!(state.board.tile(at).unwrap().occupant, None);
    }

    #[test]
    fn test_snapshot_hides_enemy_submarines() {
        let mut state = state();
        state.board.set_terrain(Coord::new(0, 0), Terrain::Water);
        let sub = state
            .spawn_unit(UnitKind::Submarine, FactionId(2), Coord::new(0, 0))
            .unwrap();
        state.units.get_mut(sub).unwrap().submerged = true;

        let seen_by_enemy = state.snapshot(Some(FactionId(1)));
        assert!(seen_by_enemy.units.is_empty());
        assert_eq!(seen_by_enemy.tiles[0].occupant, None);

        let seen_by_owner = state.snapshot(Some(FactionId(2)));
        assert_eq!(seen_by_owner.units.len(), 1);

        let omniscient = state.snapshot(None);
        assert_eq!(omniscient.units.len(), 1);
    }
}
