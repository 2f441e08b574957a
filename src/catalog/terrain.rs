//! Terrain kinds and their effects
//!
//! Terrain shapes movement pricing, combat defense, and which tiles can
//! change hands through capture.

use serde::{Deserialize, Serialize};

/// Movement cost marking terrain a land unit cannot normally enter
pub const IMPASSABLE: u32 = 999;

/// Terrain kind for a board tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Plains, // Open ground, no bonuses
    Forest,  // Slows movement, light cover
    City,    // Capturable, builds land units
    Hq,      // Capturable, losing every one loses the game
    Water,   // Impassable for most land units
    SeaPort, // Capturable, builds ships, traversable by both domains
}

impl Terrain {
    /// Defense bonus granted to a defender standing here
    pub fn defense_bonus(&self) -> i32 {
        match self {
            Terrain::Plains => 0,
            Terrain::Forest => 1,
            Terrain::City => 2,
            Terrain::Hq => 3,
            Terrain::Water => 0,
            Terrain::SeaPort => 1,
        }
    }

    /// Movement cost for land units ([`IMPASSABLE`] = cannot enter)
    pub fn movement_cost(&self) -> u32 {
        match self {
            Terrain::Plains => 1,
            Terrain::Forest => 2,
            Terrain::City => 1,
            Terrain::Hq => 1,
            Terrain::Water => IMPASSABLE,
            Terrain::SeaPort => 1,
        }
    }

    /// Can this tile change ownership via capture?
    pub fn capturable(&self) -> bool {
        matches!(self, Terrain::City | Terrain::Hq | Terrain::SeaPort)
    }

    /// Is this tile part of the sea lanes ships travel on?
    pub fn is_water(&self) -> bool {
        matches!(self, Terrain::Water | Terrain::SeaPort)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Terrain::Plains => "Plains",
            Terrain::Forest => "Forest",
            Terrain::City => "City",
            Terrain::Hq => "Headquarters",
            Terrain::Water => "Water",
            Terrain::SeaPort => "Sea Port",
        }
    }
}
