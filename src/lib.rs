//! Level Snake - a terminal Snake game with levels and saved progress
//!
//! This library provides:
//! - Core session logic: movement, scoring, levels, walls, timed food (game module)
//! - Progress and pause/resume persistence behind a store trait (persistence module)
//! - Keyboard commands (input module)
//! - TUI rendering (render module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod persistence;
pub mod render;
