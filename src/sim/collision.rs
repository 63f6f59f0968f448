//! Collision detection
//!
//! Everything in the game is an axis-aligned rectangle, so a single AABB test
//! covers player/obstacle contact.

use super::state::Rect;

/// Check whether two rectangles overlap
///
/// Two rectangles intersect unless one lies entirely to the left, right,
/// above or below the other. Shared edges count as contact.
#[inline]
pub fn rect_intersect(a: &Rect, b: &Rect) -> bool {
    !(b.left() > a.right() || b.right() < a.left() || b.top() > a.bottom() || b.bottom() < a.top())
}
