use std::time::Duration;

use super::state::Position;

/// Static description of one level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelDef {
    /// Ticks per second
    pub speed: u32,
    /// Cells the snake must not enter
    pub walls: Vec<Position>,
    /// How long a food item stays before it is respawned elsewhere
    pub food_timeout: Duration,
}

impl LevelDef {
    pub fn is_wall(&self, pos: Position) -> bool {
        self.walls.contains(&pos)
    }
}

/// Level number to definition mapping, numbered from 1
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    levels: Vec<LevelDef>,
}

impl LevelTable {
    /// Highest defined level
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn contains(&self, level: u32) -> bool {
        level >= 1 && level <= self.max_level()
    }

    /// Clamp any level number into `1..=max_level`
    pub fn clamp(&self, level: u32) -> u32 {
        level.clamp(1, self.max_level())
    }

    /// Definition for `level`, clamped into the defined range
    pub fn get(&self, level: u32) -> &LevelDef {
        &self.levels[(self.clamp(level) - 1) as usize]
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelDef {
                    speed: 10,
                    walls: Vec::new(),
                    food_timeout: Duration::from_secs(5),
                },
                LevelDef {
                    speed: 13,
                    walls: vec![
                        Position::new(100, 100),
                        Position::new(100, 110),
                        Position::new(100, 120),
                    ],
                    food_timeout: Duration::from_secs(4),
                },
                LevelDef {
                    speed: 16,
                    walls: vec![
                        Position::new(200, 200),
                        Position::new(200, 210),
                        Position::new(210, 200),
                        Position::new(210, 210),
                    ],
                    food_timeout: Duration::from_secs(3),
                },
            ],
        }
    }
}
