//! Per-frame simulation step
//!
//! One call to [`tick`] advances the game by exactly one display frame:
//! difficulty ramp, player movement, spawning, falling, scoring, collision.

use rand::Rng;

use super::collision::rect_intersect;
use super::state::{Difficulty, GamePhase, GameState, Obstacle, Player};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Left direction key held
    pub left: bool,
    /// Right direction key held
    pub right: bool,
    /// Horizontal pointer/touch coordinate while a pointer is down
    pub pointer_x: Option<f32>,
    /// Restart key pressed since the last tick (honored only after game over)
    pub restart: bool,
    /// Demo mode - the game steers the player itself
    pub autopilot: bool,
}

/// Begin a new run from any phase
pub fn start(state: &mut GameState) {
    state.obstacles.clear();
    state.spawn_timer = 0;
    state.frames = 0;
    state.difficulty = Difficulty::baseline(&state.tuning);
    state.score = 0;
    state.phase = GamePhase::Playing;
    state.player = Player::new(&state.tuning);
    state
        .player
        .center_in(state.viewport, state.tuning.player_bottom_offset);
    state.runs += 1;

    log::info!(
        "Run {} started ({}x{})",
        state.runs,
        state.viewport.width,
        state.viewport.height
    );
}

/// End the current run. Only [`start`] leaves this phase.
pub fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.best_score = state.best_score.max(state.score);
    log::info!(
        "Game over after {} frames - score {} (best {})",
        state.frames,
        state.score,
        state.best_score
    );
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart && state.phase == GamePhase::GameOver {
        start(state);
        return;
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.frames += 1;
    ramp_difficulty(state);

    // Demo mode overrides manual steering
    let mut input = input.clone();
    if input.autopilot {
        input.left = false;
        input.right = false;
        input.pointer_x = Some(autopilot_target(state));
    }
    move_player(state, &input);

    state.spawn_timer += 1;
    if state.spawn_timer >= state.difficulty.spawn_interval {
        state.spawn_timer = 0;
        spawn_obstacle(state);
    }

    update_obstacles(state);
}

fn ramp_difficulty(state: &mut GameState) {
    let tuning = &state.tuning;
    let difficulty = &mut state.difficulty;

    if state.frames % tuning.speed_ramp_frames == 0 {
        difficulty.speed_multiplier += tuning.speed_multiplier_step;
        log::debug!(
            "Frame {}: fall speed x{:.2}",
            state.frames,
            difficulty.speed_multiplier
        );
    }

    if state.frames % tuning.spawn_ramp_frames == 0
        && difficulty.spawn_interval > tuning.min_spawn_interval
    {
        difficulty.spawn_interval = difficulty
            .spawn_interval
            .saturating_sub(tuning.spawn_interval_step)
            .max(tuning.min_spawn_interval);
        log::debug!(
            "Frame {}: spawn every {} frames",
            state.frames,
            difficulty.spawn_interval
        );
    }
}

fn move_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    if input.left {
        player.pos.x -= player.speed;
    }
    if input.right {
        player.pos.x += player.speed;
    }
    if let Some(pointer_x) = input.pointer_x {
        player.follow_pointer(pointer_x, state.tuning.pointer_smoothing);
    }

    player.clamp_to(state.viewport);
}

/// Drop one obstacle with randomized size, column and fall speed
pub fn spawn_obstacle(state: &mut GameState) {
    let tuning = &state.tuning;
    let (width_span, height_span, speed_span) = (
        tuning.obstacle_width,
        tuning.obstacle_height,
        tuning.obstacle_speed,
    );
    let spawn_y = tuning.obstacle_spawn_y;
    let view_width = state.viewport.size().x;

    let mut rng = state.rng_state.next_rng();
    let w = width_span.lerp(rng.random::<f32>());
    let x = rng.random::<f32>() * (view_width - w).max(0.0);
    let h = height_span.lerp(rng.random::<f32>());
    let vy = speed_span.lerp(rng.random::<f32>());

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        pos: glam::Vec2::new(x, spawn_y),
        size: glam::Vec2::new(w, h),
        vy,
    });
    log::trace!("Spawned obstacle {} at x={:.1} ({:.1}x{:.1})", id, x, w, h);
}

/// Fall, score, and collide. Newest obstacles are visited first.
fn update_obstacles(state: &mut GameState) {
    let player = state.player.rect();
    let speed_multiplier = state.difficulty.speed_multiplier;

    for i in (0..state.obstacles.len()).rev() {
        state.obstacles[i].fall(speed_multiplier);

        if state.is_past_bottom(&state.obstacles[i]) {
            state.obstacles.remove(i);
            state.score += 1;
        } else if rect_intersect(&state.obstacles[i].rect(), &player) {
            log::debug!("Obstacle {} hit the player", state.obstacles[i].id);
            game_over(state);
            return;
        }
    }
}

/// Pointer position that steers the player out of the nearest falling threat
pub fn autopilot_target(state: &GameState) -> f32 {
    let player = state.player.rect();
    let view_width = state.viewport.size().x;
    let lane = player.size.x * 0.5;
    // Wider than the lane so the player does not drift straight back in
    let clearance = player.size.x;

    // Lowest obstacle still above the player's bottom edge and in its lane
    let threat = state
        .obstacles
        .iter()
        .map(Obstacle::rect)
        .filter(|o| o.top() < player.bottom())
        .filter(|o| o.right() + lane > player.left() && o.left() - lane < player.right())
        .max_by(|a, b| {
            a.top()
                .partial_cmp(&b.top())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(threat) = threat else {
        return view_width / 2.0;
    };

    let max_x = state.player.max_x(state.viewport);
    let left = threat.left() - player.size.x - clearance;
    let right = threat.right() + clearance;

    let target_x = [left, right]
        .into_iter()
        .filter(|x| (0.0..=max_x).contains(x))
        .min_by(|a, b| {
            (a - player.left())
                .abs()
                .partial_cmp(&(b - player.left()).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or_else(|| {
            // Neither side fits; run toward the wider gap
            let threat_center = threat.left() + threat.size.x / 2.0;
            if threat_center > view_width / 2.0 {
                0.0
            } else {
                max_x
            }
        });

    target_x + player.size.x / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::{Span, Tuning};
    use glam::Vec2;

    /// Tuning that never spawns on its own
    fn calm() -> Tuning {
        Tuning {
            initial_spawn_interval: 1_000_000,
            ..Default::default()
        }
    }

    /// Default spawn cadence, but obstacles never get near the player
    fn slow() -> Tuning {
        Tuning {
            obstacle_speed: Span::new(0.01, 0.02),
            ..Default::default()
        }
    }

    fn playing(tuning: Tuning) -> GameState {
        let mut state = GameState::new(12345, Viewport::new(800, 600), tuning).unwrap();
        start(&mut state);
        state
    }

    fn run(state: &mut GameState, frames: u64) {
        let input = TickInput::default();
        for _ in 0..frames {
            tick(state, &input);
        }
    }

    fn obstacle(state: &mut GameState, x: f32, y: f32, w: f32, h: f32, vy: f32) {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            vy,
        });
    }

    #[test]
    fn test_start_resets_everything() {
        let mut state = playing(calm());
        obstacle(&mut state, 0.0, 0.0, 10.0, 10.0, 1.0);
        state.score = 5;
        state.frames = 900;
        state.spawn_timer = 7;
        state.difficulty.speed_multiplier = 2.0;
        state.player.pos.x = 3.0;
        game_over(&mut state);

        start(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.frames, 0);
        assert_eq!(state.spawn_timer, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.difficulty, Difficulty::baseline(&state.tuning));
        assert_eq!(state.player.pos, Vec2::new(376.0, 520.0));
        assert_eq!(state.best_score, 5);
    }

    #[test]
    fn test_start_from_menu() {
        let mut state = GameState::new(1, Viewport::new(800, 600), calm()).unwrap();
        start(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.runs, 1);
    }

    #[test]
    fn test_tick_is_noop_in_menu() {
        let mut state = GameState::new(1, Viewport::new(800, 600), Tuning::default()).unwrap();
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &input);
        }
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.frames, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.player.pos.x, 376.0);
    }

    #[test]
    fn test_speed_ramp_every_600_frames() {
        let mut state = playing(calm());

        run(&mut state, 599);
        assert_eq!(state.difficulty.speed_multiplier, 1.0);

        run(&mut state, 1);
        assert_eq!(state.frames, 600);
        assert_eq!(state.difficulty.speed_multiplier, 1.25);

        run(&mut state, 599);
        assert_eq!(state.difficulty.speed_multiplier, 1.25);

        run(&mut state, 1);
        assert_eq!(state.difficulty.speed_multiplier, 1.5);
    }

    #[test]
    fn test_spawn_interval_ramp_has_floor() {
        let mut state = playing(slow());

        run(&mut state, 299);
        assert_eq!(state.difficulty.spawn_interval, 60);

        run(&mut state, 1);
        assert_eq!(state.difficulty.spawn_interval, 56);

        // 60 -> 20 takes ten steps, then it holds
        run(&mut state, 3300);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.difficulty.spawn_interval, 20);
    }

    #[test]
    fn test_spawn_on_interval() {
        let mut state = playing(slow());

        run(&mut state, 59);
        assert!(state.obstacles.is_empty());

        run(&mut state, 1);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawn_timer, 0);

        let o = &state.obstacles[0];
        assert!((24.0..=72.0).contains(&o.size.x));
        assert!((18.0..=38.0).contains(&o.size.y));
        assert!((0.01..=0.02).contains(&o.vy));
        assert!(o.pos.x >= 0.0 && o.pos.x <= 800.0 - o.size.x);
        // Spawned at -20 and already fell once this frame
        assert!((o.pos.y - (-20.0 + o.vy)).abs() < 1e-5);
    }

    #[test]
    fn test_obstacle_past_bottom_scores_once() {
        let mut state = playing(calm());
        // Bottom edge 600 + margin 50 = 650
        obstacle(&mut state, 0.0, 649.0, 10.0, 10.0, 2.0);
        obstacle(&mut state, 0.0, 640.0, 10.0, 10.0, 2.0);
        obstacle(&mut state, 0.0, 648.0, 10.0, 10.0, 2.0);

        run(&mut state, 1);
        assert_eq!(state.score, 1);
        assert_eq!(state.obstacles.len(), 2);

        // 642 -> 644 stays, 650 is not past 650
        assert!(state.obstacles.iter().all(|o| o.pos.y <= 650.0));

        run(&mut state, 1);
        assert_eq!(state.score, 2);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_collision_ends_game_and_freezes_obstacles() {
        let mut state = playing(calm());
        obstacle(&mut state, 0.0, 100.0, 10.0, 10.0, 3.0);
        obstacle(&mut state, 380.0, 500.0, 20.0, 20.0, 2.0);

        run(&mut state, 1);
        assert_eq!(state.phase, GamePhase::GameOver);

        let frames = state.frames;
        let snapshot: Vec<Vec2> = state.obstacles.iter().map(|o| o.pos).collect();

        run(&mut state, 30);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.frames, frames);
        let after: Vec<Vec2> = state.obstacles.iter().map(|o| o.pos).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn test_keys_move_and_clamp() {
        let mut state = playing(calm());

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left);
        assert_eq!(state.player.pos.x, 368.0);
        for _ in 0..100 {
            tick(&mut state, &left);
        }
        assert_eq!(state.player.pos.x, 0.0);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &right);
        }
        assert_eq!(state.player.pos.x, 752.0);
    }

    #[test]
    fn test_pointer_follow_is_smoothed() {
        let mut state = playing(calm());
        let input = TickInput {
            pointer_x: Some(24.0),
            ..Default::default()
        };

        // Target x is 0; a quarter of the 376px gap per frame
        tick(&mut state, &input);
        assert!((state.player.pos.x - 282.0).abs() < 1e-4);
        tick(&mut state, &input);
        assert!((state.player.pos.x - 211.5).abs() < 1e-4);
    }

    #[test]
    fn test_resize_reclamps_next_frame() {
        let mut state = playing(calm());
        state.player.pos.x = 752.0;

        state.resize(400, 600);
        run(&mut state, 1);
        assert_eq!(state.player.pos.x, 352.0);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut state = playing(calm());
        state.score = 4;
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };

        tick(&mut state, &restart);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 4);
        assert_eq!(state.frames, 1);

        game_over(&mut state);
        tick(&mut state, &restart);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.frames, 0);
        assert_eq!(state.runs, 2);
    }

    #[test]
    fn test_restart_ignored_in_menu() {
        let mut state = GameState::new(1, Viewport::new(800, 600), calm()).unwrap();
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = playing(slow());
        let mut state2 = playing(slow());

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                pointer_x: Some(600.0),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for frame in 0..600 {
            let input = &inputs[frame % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
        for (a, b) in state1.obstacles.iter().zip(&state2.obstacles) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.size, b.size);
        }
        assert_eq!(state1.player.pos, state2.player.pos);
    }

    #[test]
    fn test_autopilot_steps_out_of_the_lane() {
        let mut state = playing(calm());
        obstacle(&mut state, 370.0, 300.0, 60.0, 20.0, 2.0);

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input);
        }

        assert_eq!(state.phase, GamePhase::Playing);
        let player = state.player.rect();
        assert!(player.right() < 370.0 || player.left() > 430.0);
    }

    #[test]
    fn test_autopilot_centers_when_clear() {
        let state = playing(calm());
        assert_eq!(autopilot_target(&state), 400.0);
    }
}
