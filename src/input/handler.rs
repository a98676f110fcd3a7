use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction};

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Map a key press to a command. Keys outside the game's grammar map to
    /// `None` and are ignored by the caller.
    pub fn handle_key_event(&self, key: KeyEvent) -> Option<Command> {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let command = match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Command::Move(Direction::Up),
            KeyCode::Down => Command::Move(Direction::Down),
            KeyCode::Left => Command::Move(Direction::Left),
            KeyCode::Right => Command::Move(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Command::Move(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Command::Move(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Command::Move(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Command::Move(Direction::Right),

            // Controls
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => Command::TogglePause,
            KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
            KeyCode::Char('n') | KeyCode::Char('N') => Command::Restart,
            KeyCode::Enter => Command::Confirm,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,

            _ => return None,
        };

        Some(command)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
