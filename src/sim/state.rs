//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended by a collision, waiting for restart
    GameOver,
}

/// Axis-aligned rectangle, top-left origin, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame while a direction key is held
    pub speed: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(tuning.player_width, tuning.player_height),
            speed: tuning.player_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Place the player centered horizontally, `bottom_offset` above the bottom edge
    pub fn center_in(&mut self, viewport: Viewport, bottom_offset: f32) {
        let view = viewport.size();
        self.pos = Vec2::new(view.x / 2.0 - self.size.x / 2.0, view.y - bottom_offset);
    }

    /// Highest legal x for the current viewport (never negative)
    #[inline]
    pub fn max_x(&self, viewport: Viewport) -> f32 {
        (viewport.size().x - self.size.x).max(0.0)
    }

    /// Keep the paddle fully inside the viewport horizontally
    pub fn clamp_to(&mut self, viewport: Viewport) {
        self.pos.x = self.pos.x.clamp(0.0, self.max_x(viewport));
    }

    /// Ease toward a pointer so the paddle's center ends up under it
    pub fn follow_pointer(&mut self, pointer_x: f32, smoothing: f32) {
        let target_x = pointer_x - self.size.x / 2.0;
        self.pos.x += (target_x - self.pos.x) * smoothing;
    }
}

/// A falling block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Base fall speed in pixels per frame
    pub vy: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Advance one frame under the current fall-speed multiplier
    #[inline]
    pub fn fall(&mut self, speed_multiplier: f32) {
        self.pos.y += self.vy * speed_multiplier;
    }
}

/// Difficulty knobs that ramp during a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Frames between obstacle spawns
    pub spawn_interval: u32,
    /// Scales every obstacle's fall speed
    pub speed_multiplier: f32,
}

impl Difficulty {
    pub fn baseline(tuning: &Tuning) -> Self {
        Self {
            spawn_interval: tuning.initial_spawn_interval,
            speed_multiplier: tuning.base_speed_multiplier,
        }
    }
}

/// RNG state wrapper for serialization
///
/// Each spawn draws from a fresh generator derived from the run seed and a
/// draw counter, so the stream is reproducible without storing PCG internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Generator for the next draw
    pub fn next_rng(&mut self) -> Pcg32 {
        let mixed = self
            .seed
            .wrapping_add(self.draws.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.draws += 1;
        Pcg32::seed_from_u64(mixed)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the obstacle stream derives from
    pub seed: u64,
    pub rng_state: RngState,
    pub phase: GamePhase,
    pub score: u64,
    /// Best score seen since the process started
    pub best_score: u64,
    /// Frames simulated in the current run
    pub frames: u64,
    /// Frames since the last spawn
    pub spawn_timer: u32,
    pub difficulty: Difficulty,
    pub viewport: Viewport,
    pub player: Player,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub tuning: Tuning,
    /// Runs started since creation
    pub runs: u32,
    next_id: u32,
}

impl GameState {
    /// Create a state in the menu phase. Call [`super::start`] to play.
    ///
    /// The tuning is validated here so the simulation never divides by a zero period.
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;

        let mut player = Player::new(&tuning);
        player.center_in(viewport, tuning.player_bottom_offset);

        Ok(Self {
            seed,
            rng_state: RngState::new(seed),
            phase: GamePhase::Menu,
            score: 0,
            best_score: 0,
            frames: 0,
            spawn_timer: 0,
            difficulty: Difficulty::baseline(&tuning),
            viewport,
            player,
            obstacles: Vec::new(),
            tuning,
            runs: 0,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the viewport; clamping uses the new size from the next frame on
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        log::debug!("Viewport resized to {}x{}", width, height);
    }

    /// Whether the obstacle has fallen far enough below the viewport to score
    #[inline]
    pub fn is_past_bottom(&self, obstacle: &Obstacle) -> bool {
        obstacle.pos.y > self.viewport.size().y + self.tuning.despawn_margin
    }
}
