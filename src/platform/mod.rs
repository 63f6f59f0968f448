//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events
//! - Frame scheduling

pub mod input;
pub mod scheduler;

pub use input::{InputState, Key};
#[cfg(target_arch = "wasm32")]
pub use scheduler::AnimationFrame;
pub use scheduler::{FixedFrames, FrameCallback, Scheduler};
