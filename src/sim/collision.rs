//! Collision tests for axis-aligned tanks, walls and point-sized bullets
//!
//! Everything in both games is either an axis-aligned box (tanks, walls,
//! the base) or a circle (barrels, mines). Bullets are treated as points.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box described by its center and full extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn square(center: Vec2, side: f32) -> Self {
        Self::new(center, Vec2::splat(side))
    }

    #[inline]
    pub fn half(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half()
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half()
    }

    /// Strict containment: a point exactly on an edge is outside
    pub fn contains(&self, p: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y
    }
}

/// Point inside circle (strict)
#[inline]
pub fn circle_contains(center: Vec2, radius: f32, p: Vec2) -> bool {
    center.distance(p) < radius
}

/// Reflect a projectile that entered `rect` this frame.
///
/// Uses the pre-move position to find which face was crossed: the axis on
/// which the projectile was still outside the box is the one that flips.
/// A projectile that was already inside (fired from within a wall) flips
/// its dominant component.
pub fn reflect_off_rect(vel: Vec2, prev_pos: Vec2, rect: &Rect) -> Vec2 {
    let (min, max) = (rect.min(), rect.max());
    let outside_x = prev_pos.x <= min.x || prev_pos.x >= max.x;
    let outside_y = prev_pos.y <= min.y || prev_pos.y >= max.y;
    let flip_x = match (outside_x, outside_y) {
        (true, false) => true,
        (false, true) => false,
        _ => vel.x.abs() > vel.y.abs(),
    };
    if flip_x {
        Vec2::new(-vel.x, vel.y)
    } else {
        Vec2::new(vel.x, -vel.y)
    }
}

/// Point on the face of `rect` that `pos` leaves through when travelling
/// along the dominant axis of `vel`
pub fn exit_point(pos: Vec2, vel: Vec2, rect: &Rect) -> Vec2 {
    let (min, max) = (rect.min(), rect.max());
    if vel.x.abs() > vel.y.abs() {
        Vec2::new(if vel.x > 0.0 { max.x } else { min.x }, pos.y)
    } else {
        Vec2::new(pos.x, if vel.y > 0.0 { max.y } else { min.y })
    }
}

/// Outside the playfield `[0, size]` on either axis
#[inline]
pub fn out_of_bounds(p: Vec2, size: Vec2) -> bool {
    p.x < 0.0 || p.x > size.x || p.y < 0.0 || p.y > size.y
}
