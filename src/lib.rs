//! Dodge - a falling-block arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `platform`: Input and frame scheduling
//! - `renderer`: Renderer seam and WebGPU pipeline
//! - `hud`: Score and status text
//! - `driver`: The game loop tying them together

pub mod driver;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use driver::GameLoop;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    use crate::sim::Viewport;

    /// Nominal display refresh (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Headless demo viewport
    pub const DEMO_VIEWPORT: Viewport = Viewport::new(800, 600);
    /// Headless demo length (two minutes at 60 Hz)
    pub const DEMO_FRAMES: u64 = 2 * 60 * 60;
}
