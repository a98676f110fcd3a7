use serde::{Deserialize, Serialize};

use super::PersistenceError;
use crate::game::{Direction, Food, GameConfig, LevelTable, Phase, Position, Session, Snake};

/// A user's unlocked level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub username: String,
    pub current_level: u32,
}

impl UserProgress {
    /// Progress of a user who has never played
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            current_level: 1,
        }
    }
}

/// Everything needed to resume a paused session exactly.
///
/// Field names follow the on-disk JSON layout; positions are stored as
/// `[x, y]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub username: String,
    pub score: u32,
    pub level: u32,
    /// Head first
    pub snake_body: Vec<(i32, i32)>,
    pub snake_direction: Direction,
    pub food_x: i32,
    pub food_y: i32,
    pub food_weight: u32,
    /// Seconds since the UNIX epoch at which the food appeared
    pub food_timer: f64,
    pub speed: u32,
}

impl SessionSnapshot {
    pub fn capture(username: &str, session: &Session) -> Self {
        Self {
            username: username.to_string(),
            score: session.score,
            level: session.level,
            snake_body: session.snake.body.iter().map(|&pos| pos.into()).collect(),
            snake_direction: session.snake.direction,
            food_x: session.food.position.x,
            food_y: session.food.position.y,
            food_weight: session.food.weight,
            food_timer: session.food.spawned_at,
            speed: session.speed,
        }
    }

    /// Rebuild a playing session.
    ///
    /// Fails with [`PersistenceError::Invalid`] when the record names a
    /// level the table does not define or holds values no session can have,
    /// such as a snake or food cell outside the field grid.
    pub fn restore(
        &self,
        levels: &LevelTable,
        config: &GameConfig,
    ) -> Result<Session, PersistenceError> {
        if !levels.contains(self.level) {
            return Err(PersistenceError::Invalid(format!(
                "level {} is not defined",
                self.level
            )));
        }
        if self.snake_body.is_empty() {
            return Err(PersistenceError::Invalid("snake body is empty".into()));
        }
        if self.speed == 0 {
            return Err(PersistenceError::Invalid("speed is zero".into()));
        }
        if !(config.min_food_weight..=config.max_food_weight).contains(&self.food_weight) {
            return Err(PersistenceError::Invalid(format!(
                "food weight {} is out of range",
                self.food_weight
            )));
        }
        if let Some(&(x, y)) = self
            .snake_body
            .iter()
            .find(|&&cell| !config.is_cell(Position::from(cell)))
        {
            return Err(PersistenceError::Invalid(format!(
                "snake cell ({x}, {y}) is off the field"
            )));
        }
        if !config.is_cell(Position::new(self.food_x, self.food_y)) {
            return Err(PersistenceError::Invalid(format!(
                "food cell ({}, {}) is off the field",
                self.food_x, self.food_y
            )));
        }

        Ok(Session {
            snake: Snake {
                body: self.snake_body.iter().copied().map(Position::from).collect(),
                direction: self.snake_direction,
            },
            food: Food {
                position: Position::new(self.food_x, self.food_y),
                weight: self.food_weight,
                spawned_at: self.food_timer,
            },
            score: self.score,
            level: self.level,
            speed: self.speed,
            phase: Phase::Playing,
        })
    }
}
