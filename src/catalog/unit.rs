//! Unit kinds and their stat blocks

use serde::{Deserialize, Serialize};

use crate::catalog::terrain::Terrain;
use crate::core::types::Money;

/// Whether a unit travels over land or the sea lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Land,
    Water,
}

/// Kind of unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Infantry,   // Cheap, captures structures, fords water
    Tank,       // Fast striker
    Artillery,  // Slow, hard hitting
    Transport,  // Carries land units across water
    Battleship, // Heavy naval gun platform
    Submarine,  // Can submerge to hide
}

/// Stat block for a unit kind
#[derive(Debug, Clone, Copy)]
pub struct UnitStats {
    pub max_health: i32,
    pub movement: u32,
    pub attack_range: u32,
    pub attack_power: i32,
    pub defense: i32,
    pub cost: Money,
    /// Action points spent to produce this unit at a structure
    pub action_cost: u32,
    pub can_capture: bool,
    pub domain: Domain,
    /// Space this unit takes aboard a transport
    pub cargo_size: u32,
    /// Total cargo space offered (0 for non-carriers)
    pub transport_capacity: u32,
    pub can_submerge: bool,
}

impl UnitKind {
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Infantry,
        UnitKind::Tank,
        UnitKind::Artillery,
        UnitKind::Transport,
        UnitKind::Battleship,
        UnitKind::Submarine,
    ];

    /// Get the stat block for this unit kind
    pub fn stats(&self) -> UnitStats {
        match self {
            UnitKind::Infantry => UnitStats {
                max_health: 100,
                movement: 3,
                attack_range: 1,
                attack_power: 55,
                defense: 60,
                cost: 800,
                action_cost: 1,
                can_capture: true,
                domain: Domain::Land,
                cargo_size: 1,
                transport_capacity: 0,
                can_submerge: false,
            },
            UnitKind::Tank => UnitStats {
                max_health: 100,
                movement: 4,
                attack_range: 1,
                attack_power: 85,
                defense: 70,
                cost: 2500,
                action_cost: 1,
                can_capture: false,
                domain: Domain::Land,
                cargo_size: 2,
                transport_capacity: 0,
                can_submerge: false,
            },
            UnitKind::Artillery => UnitStats {
                max_health: 100,
                movement: 1,
                attack_range: 3,
                attack_power: 90,
                defense: 50,
                cost: 2000,
                action_cost: 1,
                can_capture: false,
                domain: Domain::Land,
                cargo_size: 2,
                transport_capacity: 0,
                can_submerge: false,
            },
            UnitKind::Transport => UnitStats {
                max_health: 100,
                movement: 5,
                attack_range: 0,
                attack_power: 0,
                defense: 40,
                cost: 3000,
                action_cost: 2,
                can_capture: false,
                domain: Domain::Water,
                cargo_size: 1,
                transport_capacity: 4,
                can_submerge: false,
            },
            UnitKind::Battleship => UnitStats {
                max_health: 100,
                movement: 3,
                attack_range: 4,
                attack_power: 95,
                defense: 80,
                cost: 4500,
                action_cost: 3,
                can_capture: false,
                domain: Domain::Water,
                cargo_size: 1,
                transport_capacity: 0,
                can_submerge: false,
            },
            UnitKind::Submarine => UnitStats {
                max_health: 100,
                movement: 4,
                attack_range: 1,
                attack_power: 75,
                defense: 60,
                cost: 3500,
                action_cost: 2,
                can_capture: false,
                domain: Domain::Water,
                cargo_size: 1,
                transport_capacity: 0,
                can_submerge: true,
            },
        }
    }

    /// Can a structure of the given terrain produce this unit?
    ///
    /// Cities and headquarters build land units, sea ports build ships.
    pub fn buildable_at(&self, terrain: Terrain) -> bool {
        match self.stats().domain {
            Domain::Land => matches!(terrain, Terrain::City | Terrain::Hq),
            Domain::Water => terrain == Terrain::SeaPort,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Infantry => "Infantry",
            UnitKind::Tank => "Tank",
            UnitKind::Artillery => "Artillery",
            UnitKind::Transport => "Transport",
            UnitKind::Battleship => "Battleship",
            UnitKind::Submarine => "Submarine",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_infantry_captures() {
        for kind in UnitKind::ALL {
            assert_eq!(kind.stats().can_capture, kind == UnitKind::Infantry);
        }
    }

    #[test]
    fn test_domains() {
        assert_eq!(UnitKind::Tank.stats().domain, Domain::Land);
        assert_eq!(UnitKind::Battleship.stats().domain, Domain::Water);
    }

    #[test]
    fn test_build_gating() {
        assert!(UnitKind::Infantry.buildable_at(Terrain::City));
        assert!(UnitKind::Infantry.buildable_at(Terrain::Hq));
        assert!(!UnitKind::Infantry.buildable_at(Terrain::SeaPort));
        assert!(UnitKind::Submarine.buildable_at(Terrain::SeaPort));
        assert!(!UnitKind::Submarine.buildable_at(Terrain::City));
        assert!(!UnitKind::Tank.buildable_at(Terrain::Plains));
    }

    #[test]
    fn test_transport_is_unarmed_carrier() {
        let stats = UnitKind::Transport.stats();
        assert_eq!(stats.attack_power, 0);
        assert!(stats.transport_capacity > 0);
        assert_eq!(UnitKind::Tank.stats().transport_capacity, 0);
    }

    #[test]
    fn test_only_submarine_submerges() {
        for kind in UnitKind::ALL {
            assert_eq!(kind.stats().can_submerge, kind == UnitKind::Submarine);
        }
    }
}
