use super::action::Direction;

/// A position on the playing field, in field units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell of `step` units in a direction
    pub fn moved_in_direction(&self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * step, dy * step)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Position> for (i32, i32) {
    fn from(pos: Position) -> Self {
        (pos.x, pos.y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a one-cell snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
        }
    }

    /// Get the head position.
    ///
    /// A live snake always has at least one segment; restoring a saved game
    /// rejects an empty body.
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Whether heading in `direction` would put the head onto the second
    /// segment. A one-cell snake can turn anywhere.
    pub fn reverses_into_body(&self, direction: Direction, step: i32) -> bool {
        match self.body.get(1) {
            Some(&neck) => self.head().moved_in_direction(direction, step) == neck,
            None => false,
        }
    }

    /// Prepend a new head
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Drop the last segment
    pub fn pop_tail(&mut self) -> Option<Position> {
        if self.body.len() > 1 {
            self.body.pop()
        } else {
            None
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (never true for a live snake)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A food item waiting to be eaten
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    pub position: Position,
    /// Score awarded when eaten
    pub weight: u32,
    /// Seconds since the UNIX epoch at which the item appeared
    pub spawned_at: f64,
}

impl Food {
    /// Seconds the item has been on the field at time `now`
    pub fn age(&self, now: f64) -> f64 {
        now - self.spawned_at
    }
}

/// Type of collision that ended a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the playing field
    OutOfBounds,
    /// Head entered a wall cell of the current level
    Wall,
    /// Head ran into the body
    SelfCollision,
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
    GameOver,
}

/// Complete state of one game session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub snake: Snake,
    pub food: Food,
    pub score: u32,
    pub level: u32,
    /// Ticks per second, taken from the level table
    pub speed: u32,
    pub phase: Phase,
}

impl Session {
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Pause a playing session. Returns true if the phase changed.
    pub fn pause(&mut self) -> bool {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
            true
        } else {
            false
        }
    }

    /// Resume a paused session. Returns true if the phase changed.
    pub fn resume(&mut self) -> bool {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
            true
        } else {
            false
        }
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            snake: Snake::new(Position::new(200, 200), Direction::Right),
            food: Food {
                position: Position::new(50, 50),
                weight: 1,
                spawned_at: 0.0,
            },
            score: 0,
            level: 1,
            speed: 10,
            phase: Phase::Playing,
        }
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(50, 50);
        assert_eq!(pos.moved_by(10, 0), Position::new(60, 50));
        assert_eq!(pos.moved_in_direction(Direction::Left, 10), Position::new(40, 50));
        assert_eq!(pos.moved_in_direction(Direction::Down, 10), Position::new(50, 60));
        assert_eq!(pos.moved_in_direction(Direction::Up, 10), Position::new(50, 40));
    }

    #[test]
    fn test_snake_head_and_tail() {
        let mut snake = Snake::new(Position::new(50, 50), Direction::Right);
        assert_eq!(snake.head(), snake.tail());

        snake.push_head(Position::new(60, 50));
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(60, 50));
        assert_eq!(snake.tail(), Position::new(50, 50));

        assert_eq!(snake.pop_tail(), Some(Position::new(50, 50)));
        assert_eq!(snake.pop_tail(), None);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_reversal_detection() {
        let mut snake = Snake::new(Position::new(60, 50), Direction::Right);
        assert!(!snake.reverses_into_body(Direction::Left, 10));

        snake.body.push(Position::new(50, 50));
        assert!(snake.reverses_into_body(Direction::Left, 10));
        assert!(!snake.reverses_into_body(Direction::Up, 10));
    }

    #[test]
    fn test_collision_detection() {
        let mut snake = Snake::new(Position::new(50, 50), Direction::Right);
        snake.body.push(Position::new(40, 50));
        assert!(!snake.collides_with_body(Position::new(50, 50))); // head
        assert!(snake.collides_with_body(Position::new(40, 50))); // body
        assert!(!snake.collides_with_body(Position::new(100, 100))); // empty
    }

    #[test]
    fn test_pause_and_resume() {
        let mut state = session();
        assert!(!state.resume());
        assert!(state.pause());
        assert!(state.is_paused());
        assert!(!state.pause());
        assert!(state.resume());
        assert!(state.is_playing());

        state.phase = Phase::GameOver;
        assert!(!state.pause());
        assert!(state.is_over());
    }

    #[test]
    fn test_food_age() {
        let food = Food {
            position: Position::new(0, 0),
            weight: 2,
            spawned_at: 100.0,
        };
        assert_eq!(food.age(103.5), 3.5);
    }
}
