//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The only outside collaborator is the [`ScoreStore`](crate::store::ScoreStore)
//! the simulation reads its best score from.

pub mod action;
pub mod config;
pub mod placement;
pub mod simulation;
pub mod state;

// Re-export commonly used types
pub use action::{Heading, Signal};
pub use config::{ConfigError, GameConfig, MAX_GRID_SIDE, SpecialFoodConfig};
pub use simulation::{GridSimulation, Snapshot, StepOutcome, TickEvent};
pub use state::{Cell, Collision, FoodItem, FoodKind, GameState, Phase, Snake};
