//! Core game logic module for Snake
//!
//! This module contains the session state machine without any I/O or
//! rendering dependencies. Persistence and input plug in from outside.

pub mod action;
pub mod config;
pub mod engine;
pub mod levels;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use levels::{LevelDef, LevelTable};
pub use state::{CollisionType, Food, Phase, Position, Session, Snake};
