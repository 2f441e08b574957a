//! Outbound events and state snapshots
//!
//! Everything a presentation layer needs flows through these types; the
//! engine never draws and never blocks on input.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::catalog::terrain::Terrain;
use crate::catalog::unit::UnitKind;
use crate::core::types::{Coord, FactionId, Money, UnitId};
use crate::turn::{Phase, VictoryReason};
use crate::unit::{Unit, UnitRegistry};

/// One entry in the outbound event stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// Human-readable line for the message log
    Log { message: String },
    UnitDestroyed {
        unit: UnitId,
        kind: UnitKind,
        faction: FactionId,
        at: Coord,
    },
    StructureCaptured {
        faction: FactionId,
        terrain: Terrain,
        at: Coord,
    },
    TurnStarted { faction: FactionId, turn: u32 },
    /// Terminal event; no further commands will be accepted
    Victory {
        winning_faction: FactionId,
        reason: VictoryReason,
    },
}

/// A unit as a presentation layer sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub kind: UnitKind,
    pub faction: FactionId,
    pub pos: Coord,
    pub health: i32,
    pub max_health: i32,
    pub has_acted: bool,
    pub capture_progress: u8,
    pub cargo_count: usize,
    pub submerged: bool,
}

impl UnitSnapshot {
    fn of(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            kind: unit.kind,
            faction: unit.faction,
            pos: unit.pos,
            health: unit.health,
            max_health: unit.stats().max_health,
            has_acted: unit.has_acted,
            capture_progress: unit.capture_progress,
            cargo_count: unit.cargo.len(),
            submerged: unit.submerged,
        }
    }
}

/// A tile as a presentation layer sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub coord: Coord,
    pub terrain: Terrain,
    pub owner: Option<FactionId>,
    pub occupant: Option<UnitId>,
}

/// Full game snapshot for rendering
///
/// Built for a viewing faction: submerged submarines of other factions
/// are omitted entirely, exactly as the board should be drawn. Pass no
/// viewer for an omniscient snapshot (testing, spectators).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileSnapshot>,
    pub units: Vec<UnitSnapshot>,
    pub money: Vec<(FactionId, Money)>,
    pub current_faction: FactionId,
    pub turn: u32,
    pub actions_left: u32,
    pub phase: Phase,
}

pub(crate) fn build_snapshot(
    board: &Board,
    registry: &UnitRegistry,
    money: &[Money],
    current_faction: FactionId,
    turn: u32,
    actions_left: u32,
    phase: Phase,
    viewer: Option<FactionId>,
) -> StateSnapshot {
    let hidden = |unit: &Unit| viewer.is_some_and(|v| unit.hidden_from(v));

    let mut units: Vec<UnitSnapshot> = registry
        .iter()
        .filter(|u| !hidden(u))
        .map(UnitSnapshot::of)
        .collect();
    units.sort_by_key(|u| u.id);

    let tiles = board
        .iter()
        .map(|(coord, tile)| {
            let occupant = tile.occupant.filter(|id| {
                registry.get(*id).map_or(false, |unit| !hidden(unit))
            });
            TileSnapshot {
                coord,
                terrain: tile.terrain,
                owner: tile.owner,
                occupant,
            }
        })
        .collect();

    StateSnapshot {
        width: board.width(),
        height: board.height(),
        tiles,
        units,
        money: money
            .iter()
            .enumerate()
            .map(|(i, &m)| (FactionId(i as u8 + 1), m))
            .collect(),
        current_faction,
        turn,
        actions_left,
        phase,
    }
}
