//! Movement range and attack range computation
//!
//! Respects terrain costs, unit domain, and occupancy. All admissibility
//! questions go through [`tile_entry`] so the range search and the AI's
//! approach finder can never disagree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};

use crate::board::Board;
use crate::catalog::terrain::{Terrain, IMPASSABLE};
use crate::catalog::unit::{Domain, UnitKind};
use crate::core::types::Coord;
use crate::unit::{Unit, UnitRegistry};

/// Cost infantry pays to wade through a water tile
const FORD_COST: u32 = 2;

/// Cost ships pay per step on the sea lanes
const SEA_LANE_COST: u32 = 1;

/// How a moving unit may use a tile it can enter
#[derive(Debug, Clone, Copy)]
pub struct TileEntry {
    /// Movement points consumed by stepping onto the tile
    pub cost: u32,
    /// Whether the unit may end its move here (false over friendly units)
    pub can_stop: bool,
}

/// Terrain admissibility and pricing for one unit kind, ignoring occupancy
pub(crate) fn terrain_cost(kind: UnitKind, terrain: Terrain) -> Option<u32> {
    match kind.stats().domain {
        Domain::Water => terrain.is_water().then_some(SEA_LANE_COST),
        Domain::Land => {
            let cost = terrain.movement_cost();
            if cost < IMPASSABLE {
                Some(cost)
            } else if terrain == Terrain::Water && kind == UnitKind::Infantry {
                Some(FORD_COST)
            } else {
                None
            }
        }
    }
}

/// Can `unit` enter the tile at `coord`, and on what terms?
///
/// Returns `None` for out-of-bounds tiles, terrain the unit's domain
/// forbids, and tiles held by a visible enemy. Friendly occupants allow
/// passage but forbid stopping. Submerged enemy submarines are hidden and
/// read as empty; the move command deals with the consequences.
pub fn tile_entry(
    board: &Board,
    registry: &UnitRegistry,
    unit: &Unit,
    coord: Coord,
) -> Option<TileEntry> {
    let tile = board.tile(coord)?;
    let cost = terrain_cost(unit.kind, tile.terrain)?;

    let can_stop = match tile.occupant {
        None => true,
        Some(id) => {
            let occupant = registry
                .get(id)
                .unwrap_or_else(|| panic!("tile {coord} references a dead unit"));
            debug_assert_eq!(occupant.pos, coord, "unit position out of sync with board");
            if occupant.hidden_from(unit.faction) {
                true
            } else if occupant.faction == unit.faction {
                false
            } else {
                return None;
            }
        }
    };

    Some(TileEntry { cost, can_stop })
}

/// Node in the frontier heap, ordered cheapest-first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierNode {
    coord: Coord,
    cost: u32,
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; tie-break on coord for determinism
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// All tiles the unit can end a move on this turn
///
/// Cost-relaxing frontier search: a tile is settled only once no cheaper
/// entry remains, so competing paths through mixed terrain always price a
/// tile at its true minimum. Total cost is capped at the unit's movement
/// budget, inclusive. The origin is never part of the result, and neither
/// are tiles the unit may only pass through.
pub fn reachable_tiles(board: &Board, registry: &UnitRegistry, unit: &Unit) -> AHashSet<Coord> {
    let budget = unit.stats().movement;

    let mut best: AHashMap<Coord, u32> = AHashMap::new();
    let mut heap = BinaryHeap::new();
    best.insert(unit.pos, 0);
    heap.push(FrontierNode {
        coord: unit.pos,
        cost: 0,
    });

    while let Some(node) = heap.pop() {
        if node.cost > *best.get(&node.coord).unwrap_or(&u32::MAX) {
            continue; // stale entry, already relaxed cheaper
        }
        for neighbor in node.coord.neighbors() {
            let Some(entry) = tile_entry(board, registry, unit, neighbor) else {
                continue;
            };
            let total = node.cost + entry.cost;
            if total > budget {
                continue;
            }
            if total < *best.get(&neighbor).unwrap_or(&u32::MAX) {
                best.insert(neighbor, total);
                heap.push(FrontierNode {
                    coord: neighbor,
                    cost: total,
                });
            }
        }
    }

    best.keys()
        .copied()
        .filter(|&coord| coord != unit.pos)
        .filter(|&coord| {
            tile_entry(board, registry, unit, coord).is_some_and(|entry| entry.can_stop)
        })
        .collect()
}

/// Tiles the unit can strike: the in-bounds orthogonal neighbors
///
/// Every unit fights at arm's length here regardless of its listed attack
/// range; the range stat stays in the catalog unused by combat.
pub fn attackable_tiles(board: &Board, unit: &Unit) -> Vec<Coord> {
    unit.pos
        .neighbors()
        .into_iter()
        .filter(|&coord| board.in_bounds(coord))
        .collect()
}

/// Find a tile to relocate to from which the target can be struck
///
/// Scans the unit's reachable set in coordinate order and returns the
/// first unoccupied tile adjacent to the target, so move-then-attack can
/// resolve in one player action.
pub fn find_approach_for_attack(
    board: &Board,
    registry: &UnitRegistry,
    unit: &Unit,
    target: Coord,
) -> Option<Coord> {
    let mut candidates: Vec<Coord> = reachable_tiles(board, registry, unit)
        .into_iter()
        .filter(|coord| coord.distance(&target) == 1)
        .filter(|&coord| {
            board
                .tile(coord)
                .is_some_and(|tile| tile.occupant.is_none())
        })
        .collect();
    candidates.sort();
    candidates.first().copied()
}
