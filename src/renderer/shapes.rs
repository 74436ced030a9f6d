//! Triangle-list shape generation in playfield pixels

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::{Direction, Rect};

/// Two triangles covering the quad `a b c d` (in winding order)
fn quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));

    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(d.x, d.y, color));
}

/// Filled axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, r: &Rect, color: [f32; 4]) {
    let min = r.min();
    let max = r.max();
    quad(
        out,
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        color,
    );
}

/// Rectangle border drawn inside the rect's edges
pub fn rect_outline(out: &mut Vec<Vertex>, r: &Rect, width: f32, color: [f32; 4]) {
    let min = r.min();
    let max = r.max();
    let w = width.min(r.size.x / 2.0).min(r.size.y / 2.0);
    let edges = [
        // top, bottom, left, right
        (Vec2::new(min.x, min.y), Vec2::new(max.x, min.y + w)),
        (Vec2::new(min.x, max.y - w), Vec2::new(max.x, max.y)),
        (Vec2::new(min.x, min.y + w), Vec2::new(min.x + w, max.y - w)),
        (Vec2::new(max.x - w, min.y + w), Vec2::new(max.x, max.y - w)),
    ];
    for (lo, hi) in edges {
        rect(out, &Rect::new((lo + hi) / 2.0, hi - lo), color);
    }
}

/// Thick line segment
pub fn segment(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(out, from + perp, to + perp, to - perp, from - perp, color);
}

/// Generate vertices for a filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Circle whose color blends from `inner` at the center to `outer` at the rim
pub fn radial_gradient(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    inner: [f32; 4],
    outer: [f32; 4],
    segments: u32,
) {
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, inner));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            outer,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            outer,
        ));
    }
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    out.reserve((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let (s1, c1) = theta1.sin_cos();
        let (s2, c2) = theta2.sin_cos();
        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        quad(out, inner1, outer1, outer2, inner2, color);
    }
}

/// Map a point from a tank's local frame (forward is -y) to screen space
pub fn orient(local: Vec2, facing: Direction) -> Vec2 {
    match facing {
        Direction::Up => local,
        Direction::Down => -local,
        Direction::Left => Vec2::new(local.y, -local.x),
        Direction::Right => Vec2::new(-local.y, local.x),
    }
}

/// Rectangle given in a tank's local frame, rotated to `facing`
pub fn oriented_rect(
    out: &mut Vec<Vertex>,
    origin: Vec2,
    local: &Rect,
    facing: Direction,
    color: [f32; 4],
) {
    let min = local.min();
    let max = local.max();
    let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)]
        .map(|c| origin + orient(c, facing));
    quad(out, corners[0], corners[1], corners[2], corners[3], color);
}

/// Colors for one tank
#[derive(Debug, Clone, Copy)]
pub struct TankPaint {
    pub body: [f32; 4],
    pub turret: [f32; 4],
    pub tracks: [f32; 4],
}

/// Square tank body with side tracks and a barrel pointing along `facing`
pub fn tank(out: &mut Vec<Vertex>, pos: Vec2, size: f32, facing: Direction, paint: TankPaint) {
    let half = size / 2.0;
    let barrel_len = size * 0.4;
    oriented_rect(out, pos, &Rect::square(Vec2::ZERO, size), facing, paint.body);
    for side in [-1.0, 1.0] {
        oriented_rect(
            out,
            pos,
            &Rect::new(Vec2::new(side * half, 0.0), Vec2::new(6.0, size)),
            facing,
            paint.tracks,
        );
    }
    oriented_rect(
        out,
        pos,
        &Rect::new(
            Vec2::new(0.0, -half - barrel_len / 2.0 + 5.0),
            Vec2::new(8.0, barrel_len + 5.0),
        ),
        facing,
        paint.turret,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_is_two_triangles_inside_bounds() {
        let mut out = Vec::new();
        let r = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0));
        rect(&mut out, &r, [1.0; 4]);
        assert_eq!(out.len(), 6);
        for v in &out {
            assert!((8.0..=12.0).contains(&v.position[0]));
            assert!((17.0..=23.0).contains(&v.position[1]));
        }
    }

    #[test]
    fn test_circle_vertex_count() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 5.0, [1.0; 4], 12);
        assert_eq!(out.len(), 36);
        ring(&mut out, Vec2::ZERO, 3.0, 5.0, [1.0; 4], 12);
        assert_eq!(out.len(), 36 + 72);
    }

    #[test]
    fn test_orient_forward() {
        let forward = Vec2::new(0.0, -1.0);
        for dir in Direction::ALL {
            let v = orient(forward, dir);
            assert!((v - dir.vector()).length() < 1e-6, "{:?}", dir);
        }
    }

    #[test]
    fn test_tank_barrel_points_forward() {
        let paint = TankPaint {
            body: [0.0; 4],
            turret: [1.0; 4],
            tracks: [0.5; 4],
        };
        let mut out = Vec::new();
        tank(&mut out, Vec2::new(100.0, 100.0), 40.0, Direction::Right, paint);
        let barrel_max_x = out
            .iter()
            .filter(|v| v.color == [1.0; 4])
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert!(barrel_max_x > 120.0);
    }
}
