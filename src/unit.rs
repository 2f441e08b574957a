//! Unit records and the registry of live units

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::unit::{UnitKind, UnitStats};
use crate::core::types::{Coord, FactionId, UnitId};

/// A live unit
///
/// Stats are read from the catalog through [`Unit::stats`]; only mutable
/// battle state lives on the record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub faction: FactionId,
    pub pos: Coord,
    pub health: i32,
    /// Set once the unit has moved, attacked, or otherwise spent its turn
    pub has_acted: bool,
    /// Progress toward taking the structure at `capture_target` (0-3)
    pub capture_progress: u8,
    pub capture_target: Option<Coord>,
    /// Units riding aboard (removed from board and registry while carried)
    pub cargo: Vec<Unit>,
    pub submerged: bool,
}

impl Unit {
    pub fn new(id: UnitId, kind: UnitKind, faction: FactionId, pos: Coord) -> Self {
        Self {
            id,
            kind,
            faction,
            pos,
            health: kind.stats().max_health,
            has_acted: false,
            capture_progress: 0,
            capture_target: None,
            cargo: Vec::new(),
            submerged: false,
        }
    }

    pub fn stats(&self) -> UnitStats {
        self.kind.stats()
    }

    /// Fraction of health remaining, used to scale attack power
    pub fn health_fraction(&self) -> f64 {
        self.health as f64 / self.stats().max_health as f64
    }

    /// Cargo space currently used aboard this unit
    pub fn cargo_load(&self) -> u32 {
        self.cargo.iter().map(|u| u.stats().cargo_size).sum()
    }

    /// Is this unit hidden from the given faction?
    pub fn hidden_from(&self, viewer: FactionId) -> bool {
        self.submerged && self.faction != viewer
    }
}

/// The authoritative collection of live units
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRegistry {
    units: AHashMap<UnitId, Unit>,
    next_id: u32,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id and register a fresh unit
    pub fn spawn(&mut self, kind: UnitKind, faction: FactionId, pos: Coord) -> UnitId {
        self.next_id += 1;
        let id = UnitId(self.next_id);
        self.units.insert(id, Unit::new(id, kind, faction, pos));
        id
    }

    /// Re-register a unit that kept its identity while carried as cargo
    pub fn reinsert(&mut self, unit: Unit) {
        debug_assert!(!self.units.contains_key(&unit.id));
        self.units.insert(unit.id, unit);
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        self.units.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.values_mut()
    }

    /// Ids of a faction's units in allocation order (stable across runs)
    pub fn faction_ids(&self, faction: FactionId) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self
            .units
            .values()
            .filter(|u| u.faction == faction)
            .map(|u| u.id)
            .collect();
        ids.sort();
        ids
    }

    pub fn faction_count(&self, faction: FactionId) -> usize {
        self.units.values().filter(|u| u.faction == faction).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_assigns_fresh_ids() {
        let mut registry = UnitRegistry::new();
        let a = registry.spawn(UnitKind::Infantry, FactionId(1), Coord::new(0, 0));
        let b = registry.spawn(UnitKind::Tank, FactionId(1), Coord::new(1, 0));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_new_unit_at_full_health() {
        let unit = Unit::new(UnitId(1), UnitKind::Tank, FactionId(1), Coord::new(0, 0));
        assert_eq!(unit.health, unit.stats().max_health);
        assert!((unit.health_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_faction_ids_sorted() {
        let mut registry = UnitRegistry::new();
        let a = registry.spawn(UnitKind::Infantry, FactionId(1), Coord::new(0, 0));
        registry.spawn(UnitKind::Infantry, FactionId(2), Coord::new(1, 0));
        let c = registry.spawn(UnitKind::Infantry, FactionId(1), Coord::new(2, 0));
        assert_eq!(registry.faction_ids(FactionId(1)), vec![a, c]);
    }

    #[test]
    fn test_cargo_load_sums_sizes() {
        let mut transport = Unit::new(
            UnitId(1),
            UnitKind::Transport,
            FactionId(1),
            Coord::new(0, 0),
        );
        transport
            .cargo
            .push(Unit::new(UnitId(2), UnitKind::Infantry, FactionId(1), Coord::new(0, 0)));
        transport
            .cargo
            .push(Unit::new(UnitId(3), UnitKind::Tank, FactionId(1), Coord::new(0, 0)));
        assert_eq!(transport.cargo_load(), 3);
    }

    #[test]
    fn test_submerged_hidden_from_enemies_only() {
        let mut sub = Unit::new(
            UnitId(1),
            UnitKind::Submarine,
            FactionId(1),
            Coord::new(0, 0),
        );
        sub.submerged = true;
        assert!(sub.hidden_from(FactionId(2)));
        assert!(!sub.hidden_from(FactionId(1)));
    }
}
