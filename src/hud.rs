//! HUD text
//!
//! Score, best score, status message and FPS; the platform decides where to show them.

use crate::sim::{GamePhase, GameState};

pub const MENU_MESSAGE: &str = "Dodge the falling blocks. Use ← → or touch to move.";
pub const PLAYING_MESSAGE: &str = "Use ← → or touch to move. Press R to restart.";

/// Status line for the current phase
pub fn status_message(phase: GamePhase, score: u64) -> String {
    match phase {
        GamePhase::Menu => MENU_MESSAGE.to_string(),
        GamePhase::Playing => PLAYING_MESSAGE.to_string(),
        GamePhase::GameOver => format!("Game Over — Score: {} — Press R to restart", score),
    }
}

pub fn score_text(score: u64) -> String {
    format!("Score: {}", score)
}

pub fn best_text(best_score: u64) -> String {
    format!("Best: {}", best_score)
}

/// `--` until the counter has a full window
pub fn fps_text(fps: u32) -> String {
    if fps == 0 {
        "FPS: --".to_string()
    } else {
        format!("FPS: {}", fps)
    }
}

/// Text shown on the HUD for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HudText {
    pub score: String,
    pub best: String,
    pub message: String,
    pub fps: String,
}

impl HudText {
    pub fn for_state(state: &GameState, fps: u32) -> Self {
        Self {
            score: score_text(state.score),
            best: best_text(state.best_score),
            message: status_message(state.phase, state.score),
            fps: fps_text(fps),
        }
    }
}

/// Frames per second over a sliding window of 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame timestamp in milliseconds
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the next slot to be overwritten
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                let span = (self.frame_times.len() - 1) as f64;
                self.fps = (span * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
