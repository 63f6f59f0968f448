//! Rendering
//!
//! The simulation never draws. Each frame the game loop hands a borrowed
//! [`FrameView`] to a [`Renderer`]; WebGPU is one implementation.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;

use crate::sim::{GamePhase, GameState, Obstacle, Rect, Viewport};

/// Everything a renderer may read for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub player: Rect,
    pub obstacles: &'a [Obstacle],
    pub viewport: Viewport,
    pub phase: GamePhase,
}

impl<'a> FrameView<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self {
            player: state.player.rect(),
            obstacles: &state.obstacles,
            viewport: state.viewport,
            phase: state.phase,
        }
    }
}

/// Draws frames. Holds no game state of its own.
pub trait Renderer {
    fn render(&mut self, frame: &FrameView<'_>);

    /// Called when the viewport changes size (CSS pixels and device pixel ratio)
    fn resize(&mut self, _viewport: Viewport, _pixel_ratio: f64) {}
}

/// Renderer that draws nothing and counts frames (headless runs and tests)
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
    /// Obstacle count seen on the most recent frame
    pub last_obstacles: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &FrameView<'_>) {
        self.frames += 1;
        self.last_obstacles = frame.obstacles.len();
    }
}
