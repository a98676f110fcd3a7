use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the unit delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A discrete command produced by the input source.
///
/// Keys outside this grammar never become a command; the input handler
/// returns `None` for them and they are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the game immediately
    Quit,
    /// Pause a running session, or resume a paused one
    TogglePause,
    /// Request a direction change for the next tick
    Move(Direction),
    /// Start a fresh session (after game over, or instead of a saved game)
    Restart,
    /// Confirm a prompt (start the game, resume a saved game)
    Confirm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_direction_serializes_uppercase() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"LEFT\"");

        let parsed: Direction = serde_json::from_str("\"DOWN\"").unwrap();
        assert_eq!(parsed, Direction::Down);
    }
}
