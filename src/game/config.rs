use serde::{Deserialize, Serialize};

use super::state::Position;

/// Configuration for the playing field and scoring rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the playing field in field units
    pub field_width: i32,
    /// Height of the playing field in field units
    pub field_height: i32,
    /// Side of one grid cell; every move shifts the head by this amount
    pub cell_size: i32,

    /// Smallest weight a food item can carry
    pub min_food_weight: u32,
    /// Largest weight a food item can carry
    pub max_food_weight: u32,
    /// Score needed per level: level N is left once score >= N * this
    pub points_per_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 400,
            field_height: 400,
            cell_size: 10,
            min_food_weight: 1,
            max_food_weight: 5,
            points_per_level: 10,
        }
    }
}

impl GameConfig {
    /// Number of cell columns
    pub fn columns(&self) -> i32 {
        self.field_width / self.cell_size
    }

    /// Number of cell rows
    pub fn rows(&self) -> i32 {
        self.field_height / self.cell_size
    }

    /// Whether `pos` is a cell of the field: inside it and on the cell grid
    pub fn is_cell(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.field_width
            && pos.y >= 0
            && pos.y < self.field_height
            && pos.x % self.cell_size == 0
            && pos.y % self.cell_size == 0
    }

    /// Score at which the given level is left
    pub fn level_threshold(&self, level: u32) -> u32 {
        level * self.points_per_level
    }
}
