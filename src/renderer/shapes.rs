//! Shape generation for 2D primitives
//!
//! All coordinates are viewport pixels (origin top-left, y down). The
//! pipeline maps them to clip space.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::FrameView;
use super::vertex::{Vertex, colors};
use crate::sim::Rect;

/// Corner radius used for the player and obstacles
pub const CORNER_RADIUS: f32 = 6.0;
/// Arc segments per rounded corner
pub const CORNER_SEGMENTS: u32 = 4;
/// Ground line sits this far above the bottom edge
pub const GROUND_OFFSET: f32 = 60.0;
pub const GROUND_THICKNESS: f32 = 2.0;

/// Generate vertices for a filled axis-aligned rectangle (two triangles)
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0, x1, y1) = (r.left(), r.top(), r.right(), r.bottom());
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled rounded rectangle
///
/// Triangle fan from the center over an outline of four corner arcs. The
/// radius shrinks to fit rectangles smaller than two radii.
pub fn rounded_rect(r: &Rect, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let radius = radius.min(r.size.x / 2.0).min(r.size.y / 2.0).max(0.0);
    if radius == 0.0 || segments == 0 {
        return rect(r, color);
    }

    // Corner centers with their starting angle, clockwise on screen
    let corners = [
        (Vec2::new(r.left() + radius, r.top() + radius), PI),
        (Vec2::new(r.right() - radius, r.top() + radius), PI + FRAC_PI_2),
        (Vec2::new(r.right() - radius, r.bottom() - radius), 0.0),
        (Vec2::new(r.left() + radius, r.bottom() - radius), FRAC_PI_2),
    ];

    let mut outline = Vec::with_capacity(corners.len() * (segments as usize + 1));
    for (center, start) in corners {
        for i in 0..=segments {
            let theta = start + (i as f32 / segments as f32) * FRAC_PI_2;
            outline.push(center + radius * Vec2::new(theta.cos(), theta.sin()));
        }
    }

    let center = r.pos + r.size / 2.0;
    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for i in 0..outline.len() {
        let a = outline[i];
        let b = outline[(i + 1) % outline.len()];
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

/// Generate every vertex for one frame, in draw order
pub fn scene(frame: &FrameView<'_>) -> Vec<Vertex> {
    let view = frame.viewport.size();
    let per_rect = 4 * (CORNER_SEGMENTS as usize + 1) * 3;
    let mut vertices = Vec::with_capacity((frame.obstacles.len() + 1) * per_rect + 6);

    vertices.extend(rounded_rect(
        &frame.player,
        CORNER_RADIUS,
        colors::PLAYER,
        CORNER_SEGMENTS,
    ));

    for obstacle in frame.obstacles {
        vertices.extend(rounded_rect(
            &obstacle.rect(),
            CORNER_RADIUS,
            colors::OBSTACLE,
            CORNER_SEGMENTS,
        ));
    }

    let ground = Rect::new(0.0, view.y - GROUND_OFFSET, view.x, GROUND_THICKNESS);
    vertices.extend(rect(&ground, colors::GROUND));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameState, Viewport, start};
    use crate::tuning::Tuning;

    fn inside(v: &Vertex, r: &Rect) -> bool {
        let eps = 1e-3;
        v.position[0] >= r.left() - eps
            && v.position[0] <= r.right() + eps
            && v.position[1] >= r.top() - eps
            && v.position[1] <= r.bottom() + eps
    }

    #[test]
    fn test_rounded_rect_stays_inside_bounds() {
        let r = Rect::new(10.0, 20.0, 48.0, 12.0);
        let vertices = rounded_rect(&r, CORNER_RADIUS, colors::PLAYER, CORNER_SEGMENTS);
        assert_eq!(vertices.len(), 4 * (CORNER_SEGMENTS as usize + 1) * 3);
        assert!(vertices.iter().all(|v| inside(v, &r)));
    }

    #[test]
    fn test_rounded_rect_touches_each_edge() {
        let r = Rect::new(0.0, 0.0, 40.0, 30.0);
        let vertices = rounded_rect(&r, 6.0, colors::OBSTACLE, 4);
        let xs = vertices.iter().map(|v| v.position[0]);
        let max_x = xs.clone().fold(f32::MIN, f32::max);
        let min_x = xs.fold(f32::MAX, f32::min);
        assert!((max_x - 40.0).abs() < 1e-3);
        assert!(min_x.abs() < 1e-3);
    }

    #[test]
    fn test_radius_shrinks_for_thin_rects() {
        let r = Rect::new(0.0, 0.0, 4.0, 4.0);
        let vertices = rounded_rect(&r, CORNER_RADIUS, colors::OBSTACLE, CORNER_SEGMENTS);
        assert!(vertices.iter().all(|v| inside(v, &r)));
    }

    #[test]
    fn test_zero_radius_is_plain_quad() {
        let r = Rect::new(0.0, 0.0, 4.0, 4.0);
        assert_eq!(rounded_rect(&r, 0.0, colors::OBSTACLE, 4).len(), 6);
    }

    #[test]
    fn test_scene_draws_player_obstacles_and_ground() {
        let mut state = GameState::new(3, Viewport::new(800, 600), Tuning::default()).unwrap();
        start(&mut state);
        crate::sim::spawn_obstacle(&mut state);
        crate::sim::spawn_obstacle(&mut state);

        let frame = FrameView::new(&state);
        let vertices = scene(&frame);
        let per_rect = 4 * (CORNER_SEGMENTS as usize + 1) * 3;
        assert_eq!(vertices.len(), 3 * per_rect + 6);

        assert_eq!(vertices[0].color, colors::PLAYER);
        assert_eq!(vertices[per_rect].color, colors::OBSTACLE);
        let ground = &vertices[vertices.len() - 6..];
        assert!(ground.iter().all(|v| v.color == colors::GROUND));
        assert!(ground.iter().any(|v| v.position[1] == 540.0));
    }
}
