//! Board: the tile grid and its occupancy invariants
//!
//! The board owns every tile. Tiles hold a non-owning back-reference to
//! their occupant so position lookups are O(1); the registry remains the
//! authority on unit data. A tile's occupant and that unit's position must
//! always agree - disagreement is a programming error and asserts.

use serde::{Deserialize, Serialize};

use crate::catalog::terrain::Terrain;
use crate::core::types::{Coord, FactionId, UnitId};

/// A single board tile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    /// Owning faction, meaningful only for capturable terrain
    pub owner: Option<FactionId>,
    /// Back-reference to the occupying unit
    pub occupant: Option<UnitId>,
}

impl Tile {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            owner: None,
            occupant: None,
        }
    }
}

/// The full board grid, row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Board {
    /// Create a board of open plains
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be positive");
        Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn center(&self) -> Coord {
        Coord::new(self.width / 2, self.height / 2)
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    fn index(&self, coord: Coord) -> usize {
        (coord.y * self.width + coord.x) as usize
    }

    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        if self.in_bounds(coord) {
            Some(&self.tiles[self.index(coord)])
        } else {
            None
        }
    }

    pub fn tile_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        if self.in_bounds(coord) {
            let idx = self.index(coord);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    /// Set the terrain of a tile (map setup)
    pub fn set_terrain(&mut self, coord: Coord, terrain: Terrain) {
        if let Some(tile) = self.tile_mut(coord) {
            tile.terrain = terrain;
        }
    }

    /// Set the owner of a tile (map setup and capture transfer)
    pub fn set_owner(&mut self, coord: Coord, owner: Option<FactionId>) {
        if let Some(tile) = self.tile_mut(coord) {
            tile.owner = owner;
        }
    }

    /// Record a unit entering a tile. The tile must be empty.
    pub fn place_occupant(&mut self, coord: Coord, unit: UnitId) {
        let tile = self
            .tile_mut(coord)
            .unwrap_or_else(|| panic!("placement outside the board at {coord}"));
        assert!(
            tile.occupant.is_none(),
            "tile {coord} already holds a unit"
        );
        tile.occupant = Some(unit);
    }

    /// Record a unit leaving a tile. The tile must hold exactly that unit.
    pub fn clear_occupant(&mut self, coord: Coord, unit: UnitId) {
        let tile = self
            .tile_mut(coord)
            .unwrap_or_else(|| panic!("removal outside the board at {coord}"));
        assert_eq!(
            tile.occupant,
            Some(unit),
            "tile {coord} does not hold the departing unit"
        );
        tile.occupant = None;
    }

    /// Iterate every tile with its coordinate, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Tile)> {
        let width = self.width;
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            let coord = Coord::new(i as i32 % width, i as i32 / width);
            (coord, tile)
        })
    }

    /// Coordinates of every headquarters tile
    pub fn headquarters(&self) -> Vec<(Coord, Option<FactionId>)> {
        self.iter()
            .filter(|(_, tile)| tile.terrain == Terrain::Hq)
            .map(|(coord, tile)| (coord, tile.owner))
            .collect()
    }
}
