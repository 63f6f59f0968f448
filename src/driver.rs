//! Game loop
//!
//! Owns the game state, the input snapshot and a renderer. One [`GameLoop::frame`]
//! is one simulation step followed by one render pass.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::hud::{FpsCounter, HudText};
use crate::platform::{InputState, Scheduler};
use crate::renderer::{FrameView, Renderer};
use crate::sim::{GamePhase, GameState, Viewport, start, tick};

pub struct GameLoop<R: Renderer> {
    pub state: GameState,
    pub input: InputState,
    pub renderer: R,
    pub fps: FpsCounter,
    hud: HudText,
    hud_dirty: bool,
    last_phase: GamePhase,
}

impl<R: Renderer> GameLoop<R> {
    pub fn new(state: GameState, renderer: R) -> Self {
        let hud = HudText::for_state(&state, 0);
        let last_phase = state.phase;
        Self {
            state,
            input: InputState::new(),
            renderer,
            fps: FpsCounter::default(),
            hud,
            hud_dirty: true,
            last_phase,
        }
    }

    /// Begin a run regardless of the current phase
    pub fn start(&mut self) {
        start(&mut self.state);
        self.input.end_frame();
        self.refresh_hud();
    }

    /// Viewport changed (CSS pixels, plus device pixel ratio for the surface)
    pub fn resize(&mut self, viewport: Viewport, pixel_ratio: f64) {
        self.state.resize(viewport.width, viewport.height);
        self.renderer.resize(viewport, pixel_ratio);
    }

    /// Advance one frame: simulate, then render
    pub fn frame(&mut self, time: f64) {
        let input = self.input.snapshot();
        tick(&mut self.state, &input);
        self.input.end_frame();

        self.fps.record(time);

        let phase = self.state.phase;
        if phase != self.last_phase {
            log::info!("Phase {:?} -> {:?}", self.last_phase, phase);
            self.last_phase = phase;
        }

        self.renderer.render(&FrameView::new(&self.state));
        self.refresh_hud();
    }

    /// HUD text, if it changed since the last call
    pub fn take_hud_update(&mut self) -> Option<&HudText> {
        if self.hud_dirty {
            self.hud_dirty = false;
            Some(&self.hud)
        } else {
            None
        }
    }

    fn refresh_hud(&mut self) {
        let hud = HudText::for_state(&self.state, self.fps.fps());
        if hud != self.hud {
            self.hud = hud;
            self.hud_dirty = true;
        }
    }
}

impl<R: Renderer + 'static> GameLoop<R> {
    /// Hand the loop to a scheduler. `after_frame` runs after every frame and
    /// may stop the loop.
    pub fn drive<S, F>(game: Rc<RefCell<Self>>, scheduler: S, mut after_frame: F)
    where
        S: Scheduler,
        F: FnMut(&mut Self) -> ControlFlow<()> + 'static,
    {
        scheduler.run(Box::new(move |time| {
            let mut g = game.borrow_mut();
            g.frame(time);
            after_frame(&mut *g)
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{FixedFrames, Key};
    use crate::renderer::NullRenderer;
    use crate::tuning::Tuning;

    fn game() -> GameLoop<NullRenderer> {
        let tuning = Tuning {
            initial_spawn_interval: 1_000_000,
            ..Default::default()
        };
        GameLoop::new(
            GameState::new(9, Viewport::new(800, 600), tuning).unwrap(),
            NullRenderer::default(),
        )
    }

    #[test]
    fn test_frame_renders_even_outside_play() {
        let mut g = game();
        g.frame(0.0);
        assert_eq!(g.state.phase, GamePhase::Menu);
        assert_eq!(g.renderer.frames, 1);
        assert_eq!(g.state.frames, 0);
    }

    #[test]
    fn test_input_reaches_simulation() {
        let mut g = game();
        g.start();
        g.input.key_down(Key::Left);
        g.frame(0.0);
        assert_eq!(g.state.player.pos.x, 368.0);
    }

    #[test]
    fn test_restart_key_consumed_once() {
        let mut g = game();
        g.start();
        crate::sim::game_over(&mut g.state);

        g.input.key_down(Key::Restart);
        g.frame(0.0);
        assert_eq!(g.state.phase, GamePhase::Playing);
        assert!(!g.input.snapshot().restart);
    }

    #[test]
    fn test_hud_updates_only_on_change() {
        let mut g = game();
        assert!(g.take_hud_update().is_some());
        assert!(g.take_hud_update().is_none());

        g.start();
        let hud = g.take_hud_update().cloned();
        assert_eq!(hud.map(|h| h.message), Some(crate::hud::PLAYING_MESSAGE.to_string()));

        g.frame(0.0);
        assert!(g.take_hud_update().is_none());

        g.state.score = 1;
        g.frame(16.0);
        assert_eq!(g.take_hud_update().map(|h| h.score.clone()), Some("Score: 1".to_string()));
    }

    #[test]
    fn test_resize_reaches_state() {
        let mut g = game();
        g.resize(Viewport::new(320, 240), 2.0);
        assert_eq!(g.state.viewport, Viewport::new(320, 240));
    }

    #[test]
    fn test_drive_with_fixed_frames() {
        let mut g = game();
        g.start();
        let game = Rc::new(RefCell::new(g));

        GameLoop::drive(game.clone(), FixedFrames::new(600), |_| ControlFlow::Continue(()));

        let g = game.borrow();
        assert_eq!(g.renderer.frames, 600);
        assert_eq!(g.state.frames, 600);
        assert_eq!(g.state.difficulty.speed_multiplier, 1.25);
    }

    #[test]
    fn test_drive_stops_when_asked() {
        let mut g = game();
        g.start();
        let game = Rc::new(RefCell::new(g));

        GameLoop::drive(game.clone(), FixedFrames::new(600), |g| {
            if g.state.frames == 10 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(game.borrow().renderer.frames, 10);
    }

    #[test]
    fn test_hud_reports_fps_once_window_fills() {
        let mut g = game();
        g.start();
        for i in 1..=120 {
            g.frame(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(g.fps.fps(), 60);
        assert_eq!(g.take_hud_update().map(|h| h.fps.clone()), Some("FPS: 60".to_string()));
    }

    #[test]
    fn test_hud_shows_best_after_game_over() {
        let mut g = game();
        g.start();
        g.state.score = 4;
        crate::sim::game_over(&mut g.state);
        g.frame(0.0);
        let hud = g.take_hud_update().cloned();
        assert_eq!(hud.map(|h| h.best), Some("Best: 4".to_string()));
    }
}
