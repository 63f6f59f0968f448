//! Frame scheduling
//!
//! The game loop never calls the platform's frame primitive directly; it hands
//! a callback to a [`Scheduler`], which decides when frames happen.

use std::ops::ControlFlow;

/// Called once per frame with a timestamp in milliseconds
pub type FrameCallback = Box<dyn FnMut(f64) -> ControlFlow<()>>;

/// Drives a frame callback until it breaks or the scheduler runs out
pub trait Scheduler {
    fn run(self, frame: FrameCallback);
}

/// Runs a fixed number of frames back to back with synthetic timestamps
#[derive(Debug, Clone, Copy)]
pub struct FixedFrames {
    pub frames: u64,
    /// Synthetic time step between frames
    pub frame_ms: f64,
}

impl FixedFrames {
    pub fn new(frames: u64) -> Self {
        Self {
            frames,
            frame_ms: crate::consts::FRAME_MS,
        }
    }
}

impl Scheduler for FixedFrames {
    fn run(self, mut frame: FrameCallback) {
        for i in 0..self.frames {
            if frame(i as f64 * self.frame_ms).is_break() {
                log::debug!("Frame loop stopped after {} of {} frames", i + 1, self.frames);
                return;
            }
        }
    }
}

/// Browser display refresh via `requestAnimationFrame`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFrame;

#[cfg(target_arch = "wasm32")]
impl Scheduler for AnimationFrame {
    fn run(self, frame: FrameCallback) {
        request_animation_frame(std::rc::Rc::new(std::cell::RefCell::new(frame)));
    }
}

#[cfg(target_arch = "wasm32")]
fn request_animation_frame(frame: std::rc::Rc<std::cell::RefCell<FrameCallback>>) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Some(window) = web_sys::window() else {
        log::error!("No window; frame loop not started");
        return;
    };
    let closure = Closure::once(move |time: f64| {
        let flow = {
            let mut callback = frame.borrow_mut();
            (*callback)(time)
        };
        if flow.is_continue() {
            request_animation_frame(frame);
        }
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}
