//! Tile map for the grid battle

use serde::{Deserialize, Serialize};

use crate::sim::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    /// Blocks tanks, destroyed by one bullet
    Brick,
    /// Blocks tanks and bullets permanently
    Steel,
    /// Blocks tanks, bullets fly over
    Water,
    /// Decorative cover, passable by everything
    Tree,
    /// The player's base; any bullet here ends the game
    Base,
}

impl Tile {
    /// Whether a tank may enter this tile
    pub fn is_passable(self) -> bool {
        matches!(self, Tile::Empty | Tile::Tree)
    }

    /// Whether a bullet entering this tile is stopped
    pub fn stops_bullets(self) -> bool {
        matches!(self, Tile::Brick | Tile::Steel | Tile::Base)
    }
}

/// Row-major tile grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGrid {
    cols: i32,
    rows: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(cols: i32, rows: i32) -> Self {
        let len = (cols.max(0) * rows.max(0)) as usize;
        Self {
            cols,
            rows,
            tiles: vec![Tile::Empty; len],
        }
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.cols).contains(&cell.col) && (0..self.rows).contains(&cell.row)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.row * self.cols + cell.col) as usize)
    }

    /// Tile at `cell`, `None` outside the grid
    pub fn get(&self, cell: Cell) -> Option<Tile> {
        self.index(cell).map(|i| self.tiles[i])
    }

    /// Overwrite a tile; returns false outside the grid
    pub fn set(&mut self, cell: Cell, tile: Tile) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Whether a tank may stand on `cell` (terrain only, ignores other tanks)
    pub fn is_passable(&self, cell: Cell) -> bool {
        self.get(cell).is_some_and(Tile::is_passable)
    }

    /// Cells in row-major order with their tiles
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        self.tiles.iter().enumerate().map(move |(i, &tile)| {
            let i = i as i32;
            (Cell::new(i % self.cols, i / self.cols), tile)
        })
    }
}
