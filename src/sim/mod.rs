//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per display frame, no wall-clock time
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::rect_intersect;
pub use state::{Difficulty, GamePhase, GameState, Obstacle, Player, Rect, RngState, Viewport};
pub use tick::{TickInput, autopilot_target, game_over, spawn_obstacle, start, tick};
