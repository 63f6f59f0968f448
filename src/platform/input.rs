//! Keyboard and pointer input
//!
//! Folds platform events into the flags the simulation reads once per frame.

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    /// Start a new run after game over
    Restart,
    /// Toggle demo mode
    Autopilot,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "r" | "R" => Some(Key::Restart),
            "i" | "I" => Some(Key::Autopilot),
            _ => None,
        }
    }
}

/// Current input snapshot
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    pointer_down: bool,
    pointer_x: Option<f32>,
    /// One-shot, cleared by [`InputState::end_frame`]
    restart: bool,
    autopilot: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Restart => self.restart = true,
            Key::Autopilot => {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Restart | Key::Autopilot => {}
        }
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.pointer_down = true;
        self.pointer_x = Some(x);
    }

    /// Tracked only while a pointer is down
    pub fn pointer_move(&mut self, x: f32) {
        if self.pointer_down {
            self.pointer_x = Some(x);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer_down = false;
        self.pointer_x = None;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Input for the next simulation step
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            pointer_x: self.pointer_x,
            restart: self.restart,
            autopilot: self.autopilot,
        }
    }

    /// Clear one-shot inputs after the frame consumed them
    pub fn end_frame(&mut self) {
        self.restart = false;
    }
}
