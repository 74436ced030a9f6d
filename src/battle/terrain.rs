//! Procedural level terrain
//!
//! Each level stamps a growing number of small patterns onto an empty grid,
//! then guarantees the base is walled in and the spawn points are open.

use rand::Rng;
use serde::Serialize;

use super::grid::{Tile, TileGrid};
use crate::sim::{Cell, Direction};
use crate::tuning::BattleTuning;

/// Fixed landmarks derived from the grid size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub base: Cell,
    /// Brick ring around the base (left, right and the three cells above)
    pub shield: [Cell; 5],
    pub player_spawn: Cell,
    pub enemy_spawns: [Cell; 3],
}

impl Layout {
    pub fn for_grid(cols: i32, rows: i32) -> Self {
        let mid = cols / 2;
        let bottom = rows - 1;
        Self {
            base: Cell::new(mid, bottom),
            shield: [
                Cell::new(mid - 1, bottom - 1),
                Cell::new(mid, bottom - 1),
                Cell::new(mid + 1, bottom - 1),
                Cell::new(mid - 1, bottom),
                Cell::new(mid + 1, bottom),
            ],
            player_spawn: Cell::new(mid - 2, bottom),
            enemy_spawns: [Cell::new(0, 0), Cell::new(mid, 0), Cell::new(cols - 1, 0)],
        }
    }

    /// Base and shield cells, never overwritten by patterns or clearing
    pub fn is_protected(&self, cell: Cell) -> bool {
        cell == self.base || self.shield.contains(&cell)
    }
}

/// Terrain stamps placed at random anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// 2x2 brick block
    BrickCluster,
    /// Three steel tiles in a line
    SteelLine { vertical: bool },
    /// 2x2 water pool
    WaterPatch,
    Tree,
}

impl Pattern {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        match rng.random_range(0..4) {
            0 => Pattern::BrickCluster,
            1 => Pattern::SteelLine {
                vertical: rng.random_bool(0.5),
            },
            2 => Pattern::WaterPatch,
            _ => Pattern::Tree,
        }
    }

    pub fn tile(self) -> Tile {
        match self {
            Pattern::BrickCluster => Tile::Brick,
            Pattern::SteelLine { .. } => Tile::Steel,
            Pattern::WaterPatch => Tile::Water,
            Pattern::Tree => Tile::Tree,
        }
    }

    /// Cells covered when anchored at `anchor` (top-left)
    pub fn cells(self, anchor: Cell) -> Vec<Cell> {
        match self {
            Pattern::BrickCluster | Pattern::WaterPatch => vec![
                anchor,
                anchor.offset(Direction::Right),
                anchor.offset(Direction::Down),
                anchor.offset(Direction::Down).offset(Direction::Right),
            ],
            Pattern::SteelLine { vertical } => {
                let dir = if vertical { Direction::Down } else { Direction::Right };
                vec![anchor, anchor.offset(dir), anchor.offset(dir).offset(dir)]
            }
            Pattern::Tree => vec![anchor],
        }
    }
}

/// Patterns stamped for `level` (1-based)
pub fn pattern_count(level: u32, tuning: &BattleTuning) -> u32 {
    tuning.base_patterns + level * tuning.patterns_per_level
}

/// Rebuild `grid` for `level`
pub fn generate<R: Rng>(
    grid: &mut TileGrid,
    layout: &Layout,
    level: u32,
    tuning: &BattleTuning,
    rng: &mut R,
) {
    grid.fill(Tile::Empty);
    grid.set(layout.base, Tile::Base);
    for cell in layout.shield {
        grid.set(cell, Tile::Brick);
    }

    // Anchors avoid the spawn row and the two rows holding the base
    let rows = grid.rows();
    let count = pattern_count(level, tuning);
    for _ in 0..count {
        let pattern = Pattern::random(rng);
        let anchor = Cell::new(
            rng.random_range(0..grid.cols()),
            rng.random_range(1..(rows - 2).max(2)),
        );
        for cell in pattern.cells(anchor) {
            if grid.get(cell) == Some(Tile::Empty) && cell.row < rows - 2 {
                grid.set(cell, pattern.tile());
            }
        }
    }

    for cell in safe_zone(layout) {
        if !layout.is_protected(cell) {
            grid.set(cell, Tile::Empty);
        }
    }

    log::info!(
        "Level {} terrain: {} patterns, {} brick, {} steel, {} water, {} trees",
        level,
        count,
        grid.count(Tile::Brick),
        grid.count(Tile::Steel),
        grid.count(Tile::Water),
        grid.count(Tile::Tree)
    );
}

/// Cells kept clear so every tank can leave its spawn point
fn safe_zone(layout: &Layout) -> Vec<Cell> {
    let spawn = layout.player_spawn;
    let mut cells = vec![
        spawn,
        spawn.offset(Direction::Up),
        spawn.offset(Direction::Left),
        spawn.offset(Direction::Right),
    ];
    for s in layout.enemy_spawns {
        cells.push(s);
        cells.push(s.offset(Direction::Down));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn build(level: u32, seed: u64) -> (TileGrid, Layout) {
        let tuning = BattleTuning::default();
        let mut grid = TileGrid::new(tuning.cols, tuning.rows);
        let layout = Layout::for_grid(tuning.cols, tuning.rows);
        let mut rng = Pcg32::seed_from_u64(seed);
        generate(&mut grid, &layout, level, &tuning, &mut rng);
        (grid, layout)
    }

    #[test]
    fn test_layout_13x13() {
        let layout = Layout::for_grid(13, 13);
        assert_eq!(layout.base, Cell::new(6, 12));
        assert_eq!(layout.player_spawn, Cell::new(4, 12));
        assert_eq!(layout.enemy_spawns[2], Cell::new(12, 0));
        assert!(layout.is_protected(Cell::new(5, 11)));
        assert!(!layout.is_protected(Cell::new(4, 12)));
    }

    #[test]
    fn test_base_always_walled_in() {
        for seed in 0..20 {
            let (grid, layout) = build(5, seed);
            assert_eq!(grid.get(layout.base), Some(Tile::Base));
            assert_eq!(grid.count(Tile::Base), 1);
            for cell in layout.shield {
                assert_eq!(grid.get(cell), Some(Tile::Brick));
            }
        }
    }

    #[test]
    fn test_spawns_clear() {
        for seed in 0..20 {
            let (grid, layout) = build(5, seed);
            assert!(grid.is_passable(layout.player_spawn));
            for spawn in layout.enemy_spawns {
                assert_eq!(grid.get(spawn), Some(Tile::Empty));
                assert_eq!(grid.get(spawn.offset(Direction::Down)), Some(Tile::Empty));
            }
        }
    }

    #[test]
    fn test_more_patterns_each_level() {
        let tuning = BattleTuning::default();
        assert_eq!(pattern_count(1, &tuning), 8);
        assert_eq!(pattern_count(5, &tuning), 16);

        let filled = |level: u32| -> usize {
            (0..30)
                .map(|seed| {
                    let (grid, _) = build(level, seed);
                    grid.tiles()
                        .iter()
                        .filter(|t| !matches!(t, Tile::Empty | Tile::Base))
                        .count()
                })
                .sum()
        };
        assert!(filled(5) > filled(1));
    }

    #[test]
    fn test_patterns_stay_above_base_rows() {
        for seed in 0..20 {
            let (grid, layout) = build(5, seed);
            for (cell, tile) in grid.iter() {
                if cell.row >= 11 && !layout.is_protected(cell) {
                    assert_eq!(tile, Tile::Empty, "{:?}", cell);
                }
            }
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        assert_eq!(build(3, 77).0, build(3, 77).0);
    }
}
