//! Movement strategies
//!
//! Two policies, picked per actor:
//! - [`ContinuousMotion`]: direct velocity integration, clamped to bounds.
//! - [`GridMotion`]: cell-to-cell moves committed up front and interpolated
//!   over several frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::dir::Direction;

/// Inclusive clamp region for an actor's center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        // Inverted regions (tiny playfield) resolve to `max` rather than panic
        p.max(self.min).min(self.max)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Free movement at a fixed speed per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousMotion {
    /// Pixels per frame
    pub speed: f32,
}

impl ContinuousMotion {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Move one frame along `dir` (if any), then clamp into `bounds`
    pub fn step(&self, pos: &mut Vec2, dir: Option<Direction>, bounds: &Bounds) {
        if let Some(dir) = dir {
            *pos += dir.vector() * self.speed;
        }
        *pos = bounds.clamp(*pos);
    }
}

/// Integer tile coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn offset(self, dir: Direction) -> Self {
        let (dc, dr) = dir.step();
        Self::new(self.col + dc, self.row + dr)
    }

    /// Pixel center of this cell
    pub fn center(self, tile_size: f32) -> Vec2 {
        Vec2::new(
            (self.col as f32 + 0.5) * tile_size,
            (self.row as f32 + 0.5) * tile_size,
        )
    }

    /// Cell containing a pixel position (may be outside the grid)
    pub fn containing(p: Vec2, tile_size: f32) -> Self {
        Self::new(
            (p.x / tile_size).floor() as i32,
            (p.y / tile_size).floor() as i32,
        )
    }
}

/// Result of asking a grid actor to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRequest {
    /// Move committed; actor is now interpolating
    Started,
    /// Target cell is out of bounds, solid, or occupied
    Blocked,
    /// Actor is still mid-transition; request ignored
    Busy,
}

/// Tile-locked movement state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMotion {
    /// Logical cell (the destination while moving)
    pub cell: Cell,
    /// Cell being vacated while moving; equals `cell` at rest
    pub from: Cell,
    /// Pixel center of `cell`
    pub target: Vec2,
    pub moving: bool,
}

impl GridMotion {
    pub fn new(cell: Cell, tile_size: f32) -> Self {
        Self {
            cell,
            from: cell,
            target: cell.center(tile_size),
            moving: false,
        }
    }

    /// Commit a move to the neighbouring cell if `is_free` allows it
    pub fn request<F>(&mut self, dir: Direction, tile_size: f32, is_free: F) -> MoveRequest
    where
        F: Fn(Cell) -> bool,
    {
        if self.moving {
            return MoveRequest::Busy;
        }
        let next = self.cell.offset(dir);
        if !is_free(next) {
            return MoveRequest::Blocked;
        }
        self.from = self.cell;
        self.cell = next;
        self.target = next.center(tile_size);
        self.moving = true;
        MoveRequest::Started
    }

    /// Interpolate toward the target, snapping once within one step
    pub fn advance(&mut self, pos: &mut Vec2, speed: f32) {
        if !self.moving {
            return;
        }
        let delta = self.target - *pos;
        if delta.length() <= speed {
            *pos = self.target;
            self.moving = false;
            self.from = self.cell;
        } else {
            *pos += delta.normalize_or_zero() * speed;
        }
    }

    /// Whether this actor blocks `cell` (its destination, or the cell it is leaving)
    pub fn occupies(&self, cell: Cell) -> bool {
        self.cell == cell || (self.moving && self.from == cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: f32 = 32.0;

    #[test]
    fn test_continuous_step_and_clamp() {
        let motion = ContinuousMotion::new(4.0);
        let bounds = Bounds::new(Vec2::new(20.0, 100.0), Vec2::new(380.0, 500.0));
        let mut pos = Vec2::new(22.0, 300.0);

        motion.step(&mut pos, Some(Direction::Left), &bounds);
        assert_eq!(pos, Vec2::new(20.0, 300.0));

        motion.step(&mut pos, Some(Direction::Down), &bounds);
        assert_eq!(pos, Vec2::new(20.0, 304.0));

        // No input still clamps
        let mut outside = Vec2::new(1000.0, -5.0);
        motion.step(&mut outside, None, &bounds);
        assert_eq!(outside, Vec2::new(380.0, 100.0));
    }

    #[test]
    fn test_grid_request_then_snap() {
        let start = Cell::new(2, 2);
        let mut motion = GridMotion::new(start, TILE);
        let mut pos = start.center(TILE);

        assert_eq!(motion.request(Direction::Right, TILE, |_| true), MoveRequest::Started);
        assert!(motion.moving);
        assert_eq!(motion.cell, Cell::new(3, 2));
        // Second request while moving is ignored
        assert_eq!(motion.request(Direction::Down, TILE, |_| true), MoveRequest::Busy);

        // 32px at 3px/frame: 10 partial steps, then a snap on the 11th
        for _ in 0..10 {
            motion.advance(&mut pos, 3.0);
            assert!(motion.moving);
        }
        motion.advance(&mut pos, 3.0);
        assert!(!motion.moving);
        assert_eq!(pos, Cell::new(3, 2).center(TILE));
        assert_eq!(motion.from, motion.cell);
    }

    #[test]
    fn test_grid_blocked_request_leaves_state() {
        let mut motion = GridMotion::new(Cell::new(0, 0), TILE);
        let before = motion;
        assert_eq!(
            motion.request(Direction::Up, TILE, |c| c.row >= 0),
            MoveRequest::Blocked
        );
        assert_eq!(motion, before);
    }

    #[test]
    fn test_grid_occupies_both_cells_mid_move() {
        let mut motion = GridMotion::new(Cell::new(5, 5), TILE);
        motion.request(Direction::Up, TILE, |_| true);
        assert!(motion.occupies(Cell::new(5, 5)));
        assert!(motion.occupies(Cell::new(5, 4)));
        assert!(!motion.occupies(Cell::new(5, 6)));
    }

    #[test]
    fn test_cell_containing() {
        assert_eq!(Cell::containing(Vec2::new(33.0, 5.0), TILE), Cell::new(1, 0));
        assert_eq!(Cell::containing(Vec2::new(-1.0, 5.0), TILE), Cell::new(-1, 0));
    }
}
