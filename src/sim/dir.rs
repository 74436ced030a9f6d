//! Four-way facing shared by every tank, turret and projectile
//!
//! Screen coordinates: origin top-left, +y points down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in input priority order (up > down > left > right)
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector in screen space
    #[inline]
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Grid step as (dcol, drow)
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Index into [`Direction::ALL`]; handy for uniform random picks
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Horizontal direction pointing from `from_x` towards `to_x`
    pub fn horizontal_towards(from_x: f32, to_x: f32) -> Self {
        if to_x < from_x {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// Dominant-axis direction of a displacement (ties go vertical)
    pub fn dominant(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_match_grid_steps() {
        for dir in Direction::ALL {
            assert!((dir.vector().length() - 1.0).abs() < 1e-6);
            let (dc, dr) = dir.step();
            assert_eq!(dir.vector(), Vec2::new(dc as f32, dr as f32));
        }
    }

    #[test]
    fn test_dominant_axis() {
        assert_eq!(Direction::dominant(Vec2::new(10.0, 3.0)), Direction::Right);
        assert_eq!(Direction::dominant(Vec2::new(-10.0, 3.0)), Direction::Left);
        assert_eq!(Direction::dominant(Vec2::new(2.0, -5.0)), Direction::Up);
        // Tie resolves vertically
        assert_eq!(Direction::dominant(Vec2::new(4.0, 4.0)), Direction::Down);
    }

    #[test]
    fn test_horizontal_towards() {
        assert_eq!(Direction::horizontal_towards(100.0, 20.0), Direction::Left);
        assert_eq!(Direction::horizontal_towards(100.0, 200.0), Direction::Right);
    }
}
