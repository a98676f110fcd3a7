use super::{
    action::Direction,
    config::GameConfig,
    levels::LevelTable,
    state::{CollisionType, Food, Phase, Position, Session, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Weight of the food eaten this step, if any
    pub ate_food: Option<u32>,
    /// New level if this step crossed a level threshold
    pub level_up: Option<u32>,
    /// Whether uneaten food timed out and moved this step
    pub food_respawned: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// The snake filled every free cell, leaving nowhere to place food
    pub board_full: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the session is over after this step
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all session logic.
///
/// Time is passed in as seconds since the UNIX epoch so that the food timer
/// survives a save/load cycle and tests can drive the clock.
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    levels: LevelTable,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create a new game engine with the default level table
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, LevelTable::default(), StdRng::from_entropy())
    }

    /// Create an engine with a reproducible food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, LevelTable::default(), StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, levels: LevelTable, rng: R) -> Self {
        Self { config, levels, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    /// Start a fresh session at `level` (clamped into the level table)
    pub fn new_session(&mut self, level: u32, now: f64) -> Session {
        let level = self.levels.clamp(level);
        let snake = Snake::new(self.spawn_position(level), Direction::Right);
        // A one-cell snake leaves a free cell on any playable field.
        let food = self.spawn_food(&snake.body, level, now).unwrap_or(Food {
            position: snake.head().moved_in_direction(Direction::Right, self.config.cell_size),
            weight: self.config.min_food_weight,
            spawned_at: now,
        });

        Session {
            snake,
            food,
            score: 0,
            level,
            speed: self.levels.get(level).speed,
            phase: Phase::Playing,
        }
    }

    /// Advance a playing session by one tick.
    ///
    /// `direction` is the pending direction change, if any. A change that
    /// would put the head onto the second segment is ignored.
    pub fn step(
        &mut self,
        session: &mut Session,
        direction: Option<Direction>,
        now: f64,
    ) -> StepResult {
        if !session.is_playing() {
            return StepResult {
                terminated: session.is_over(),
                info: StepInfo::default(),
            };
        }

        let cell = self.config.cell_size;
        if let Some(new_direction) = direction {
            if !session.snake.reverses_into_body(new_direction, cell) {
                session.snake.direction = new_direction;
            }
        }

        let new_head = session
            .snake
            .head()
            .moved_in_direction(session.snake.direction, cell);
        session.snake.push_head(new_head);

        let mut info = StepInfo::default();

        if new_head == session.food.position {
            let weight = session.food.weight;
            session.score = session.score.saturating_add(weight);
            info.ate_food = Some(weight);

            if session.score >= self.config.level_threshold(session.level) {
                let next = self.levels.clamp(session.level + 1);
                if next > session.level {
                    session.level = next;
                    session.speed = self.levels.get(next).speed;
                    info.level_up = Some(next);
                    info!(level = next, score = session.score, "level up");
                }
            }

            match self.spawn_food(&session.snake.body, session.level, now) {
                Some(food) => session.food = food,
                None => {
                    session.phase = Phase::GameOver;
                    info.board_full = true;
                    info!(score = session.score, "board full");

                    return StepResult {
                        terminated: true,
                        info,
                    };
                }
            }
        } else {
            session.snake.pop_tail();
        }

        if let Some(collision_type) = self.check_collision(session, new_head) {
            session.phase = Phase::GameOver;
            info.collision_type = Some(collision_type);
            info!(?collision_type, score = session.score, "game over");

            return StepResult {
                terminated: true,
                info,
            };
        }

        let timeout = self.levels.get(session.level).food_timeout.as_secs_f64();
        if session.food.age(now) > timeout {
            if let Some(food) = self.spawn_food(&session.snake.body, session.level, now) {
                session.food = food;
                info.food_respawned = true;
                debug!(position = ?session.food.position, "food timed out");
            }
        }

        StepResult {
            terminated: false,
            info,
        }
    }

    /// Check if a position is within the playing field
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.config.field_width
            && pos.y >= 0
            && pos.y < self.config.field_height
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, session: &Session, pos: Position) -> Option<CollisionType> {
        if !self.is_in_bounds(pos) {
            return Some(CollisionType::OutOfBounds);
        }

        if session.snake.collides_with_body(pos) {
            return Some(CollisionType::SelfCollision);
        }

        if self.levels.get(session.level).is_wall(pos) {
            return Some(CollisionType::Wall);
        }

        None
    }

    /// Spawn food on a random cell that is neither body nor wall.
    ///
    /// Returns `None` when no such cell is left.
    pub fn spawn_food(&mut self, occupied: &[Position], level: u32, now: f64) -> Option<Food> {
        let walls = &self.levels.get(level).walls;
        let cell = self.config.cell_size;
        let columns = self.config.columns();
        let rows = self.config.rows();
        let is_free = |pos: &Position| !occupied.contains(pos) && !walls.contains(pos);

        let sampled = (0..columns * rows)
            .map(|_| {
                let x = self.rng.gen_range(0..columns) * cell;
                let y = self.rng.gen_range(0..rows) * cell;
                Position::new(x, y)
            })
            .find(is_free);

        // Crowded boards: fall back to the first free cell in row-major order.
        let position = match sampled {
            Some(pos) => pos,
            None => (0..rows)
                .flat_map(|row| (0..columns).map(move |col| Position::new(col * cell, row * cell)))
                .find(is_free)?,
        };

        let weight = self
            .rng
            .gen_range(self.config.min_food_weight..=self.config.max_food_weight);

        Some(Food {
            position,
            weight,
            spawned_at: now,
        })
    }

    /// Starting cell for a fresh snake: the field centre, or the first cell
    /// after it (row-major, wrapping) where the snake and the cell ahead of
    /// it are free.
    fn spawn_position(&self, level: u32) -> Position {
        let def = self.levels.get(level);
        let cell = self.config.cell_size;
        let columns = self.config.columns();
        let total = columns * self.config.rows();
        let centre = (self.config.rows() / 2) * columns + columns / 2;

        let is_free = |pos: Position| self.is_in_bounds(pos) && !def.is_wall(pos);

        (0..total)
            .map(|offset| {
                let index = (centre + offset) % total;
                Position::new((index % columns) * cell, (index / columns) * cell)
            })
            .find(|&pos| is_free(pos) && is_free(pos.moved_in_direction(Direction::Right, cell)))
            .unwrap_or(Position::new((columns / 2) * cell, (self.config.rows() / 2) * cell))
    }
}
