//! Data-driven game balance
//!
//! Every gameplay constant lives here so balance can be changed without a
//! rebuild. Loaded from LocalStorage on web, from a JSON file on native.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning rejected by validation or parsing
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{name} must be positive (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} range is inverted ({min} > {max})")]
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{name} must be at least 1 frame")]
    ZeroPeriod { name: &'static str },
    #[error("pointer_smoothing must be in (0, 1] (got {0})")]
    Smoothing(f32),
}

/// Inclusive-exclusive `[min, max)` range used for randomized obstacle properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a unit sample in `[0, 1)` onto the span
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + t * (self.max - self.min)
    }

    fn check(&self, name: &'static str) -> Result<(), TuningError> {
        if self.min > self.max {
            return Err(TuningError::InvertedRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Horizontal pixels per frame while a direction key is held
    pub player_speed: f32,
    /// Distance from the bottom edge to the player's top edge at start
    pub player_bottom_offset: f32,
    /// Fraction of the remaining distance covered per frame when following a pointer
    pub pointer_smoothing: f32,

    // === Obstacles ===
    pub obstacle_width: Span,
    pub obstacle_height: Span,
    /// Base fall speed in pixels per frame, before the difficulty multiplier
    pub obstacle_speed: Span,
    /// Spawn height (negative = above the top edge)
    pub obstacle_spawn_y: f32,
    /// How far below the bottom edge an obstacle travels before it is scored
    pub despawn_margin: f32,

    // === Difficulty ===
    pub initial_spawn_interval: u32,
    pub min_spawn_interval: u32,
    pub spawn_interval_step: u32,
    /// Frames between spawn interval reductions
    pub spawn_ramp_frames: u64,
    pub base_speed_multiplier: f32,
    pub speed_multiplier_step: f32,
    /// Frames between fall-speed multiplier increases
    pub speed_ramp_frames: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_width: 48.0,
            player_height: 12.0,
            player_speed: 8.0,
            player_bottom_offset: 80.0,
            pointer_smoothing: 0.25,

            obstacle_width: Span::new(24.0, 72.0),
            obstacle_height: Span::new(18.0, 38.0),
            obstacle_speed: Span::new(2.0, 3.6),
            obstacle_spawn_y: -20.0,
            despawn_margin: 50.0,

            initial_spawn_interval: 60,
            min_spawn_interval: 20,
            spawn_interval_step: 4,
            spawn_ramp_frames: 300,
            base_speed_multiplier: 1.0,
            speed_multiplier_step: 0.25,
            speed_ramp_frames: 600,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        for (name, value) in [
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("obstacle_width.min", self.obstacle_width.min),
            ("obstacle_height.min", self.obstacle_height.min),
            ("obstacle_speed.min", self.obstacle_speed.min),
            ("base_speed_multiplier", self.base_speed_multiplier),
        ] {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { name, value });
            }
        }

        self.obstacle_width.check("obstacle_width")?;
        self.obstacle_height.check("obstacle_height")?;
        self.obstacle_speed.check("obstacle_speed")?;

        if self.initial_spawn_interval == 0 {
            return Err(TuningError::ZeroPeriod {
                name: "initial_spawn_interval",
            });
        }
        if self.min_spawn_interval == 0 {
            return Err(TuningError::ZeroPeriod {
                name: "min_spawn_interval",
            });
        }
        if self.spawn_ramp_frames == 0 {
            return Err(TuningError::ZeroPeriod {
                name: "spawn_ramp_frames",
            });
        }
        if self.speed_ramp_frames == 0 {
            return Err(TuningError::ZeroPeriod {
                name: "speed_ramp_frames",
            });
        }

        if !(self.pointer_smoothing > 0.0 && self.pointer_smoothing <= 1.0) {
            return Err(TuningError::Smoothing(self.pointer_smoothing));
        }

        Ok(())
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dodge_tuning";

    /// Environment variable naming a tuning JSON file (native only)
    #[allow(dead_code)]
    const ENV_VAR: &'static str = "DODGE_TUNING";

    /// Parse stored JSON, falling back to defaults on any error
    fn from_json_or_default(json: &str, source: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", source);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning from {}: {}", source, e);
                Self::default()
            }
        }
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                return Self::from_json_or_default(&json, "LocalStorage");
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Load tuning from the file named by `DODGE_TUNING`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json_or_default(&json, &path),
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }
}
