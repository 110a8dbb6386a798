//! Level definitions consumed by the world
//!
//! A level is described in grid cells; the world converts cells to world
//! positions when it instantiates entities. Where a definition comes from
//! (file, built-in table, generator) is not the simulation's concern.

use serde::{Deserialize, Serialize};

use crate::cell_in_map;
use crate::consts::MAP_CELLS;
use crate::error::LevelError;

/// A grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An interior wall placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallCell {
    pub x: i32,
    pub y: i32,
    pub breakable: bool,
}

/// Everything needed to populate a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    pub player: Option<Cell>,
    pub base: Option<Cell>,
    pub enemies: Vec<Cell>,
    pub walls: Vec<WallCell>,
}

/// Name given to the fallback arena
pub const DEFAULT_LEVEL_NAME: &str = "Default Level";

impl Default for LevelDefinition {
    /// Bordered empty arena with the base at the bottom center and the
    /// player just above and to its left. No enemies.
    fn default() -> Self {
        Self {
            name: DEFAULT_LEVEL_NAME.to_string(),
            player: Some(Cell::new(5, MAP_CELLS - 3)),
            base: Some(Cell::new(6, MAP_CELLS - 2)),
            enemies: Vec::new(),
            walls: Vec::new(),
        }
    }
}

impl LevelDefinition {
    /// Check that the level is playable: it has a player start and a base,
    /// both inside the map. Enemies and walls off the map do not make a
    /// level unplayable; the world skips them at load.
    pub fn validate(&self) -> Result<(), LevelError> {
        let Some(player) = self.player else {
            return Err(LevelError::MissingPlayer {
                name: self.name.clone(),
            });
        };
        let Some(base) = self.base else {
            return Err(LevelError::MissingBase {
                name: self.name.clone(),
            });
        };

        for (what, cell) in [("player", player), ("base", base)] {
            if !cell_in_map(cell.x, cell.y) {
                return Err(LevelError::CellOutOfBounds {
                    what,
                    x: cell.x,
                    y: cell.y,
                    cells: MAP_CELLS,
                });
            }
        }

        Ok(())
    }
}
