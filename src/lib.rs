//! Arcade Snake - a tick-driven Snake game with levels, walls and special food
//!
//! This library provides:
//! - Core simulation (game module)
//! - Best score persistence (store module)
//! - TUI rendering and key mapping (render, input modules)
//! - The interactive terminal session (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod store;
