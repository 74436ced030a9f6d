//! Grid battle entity store

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::grid::TileGrid;
use super::terrain::{self, Layout};
use crate::phase::{Phase, PhaseEvent};
use crate::sim::{Cell, Direction, Explosion, FrameCooldown, GridMotion, Projectile, Rect};
use crate::tuning::BattleTuning;

/// Enemy archetypes; the armored share grows with the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Armored,
}

impl EnemyKind {
    pub fn hp(self) -> u32 {
        match self {
            EnemyKind::Armored => 3,
            _ => 1,
        }
    }

    /// Pixels per frame
    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Fast => 2.0,
            _ => 1.0,
        }
    }

    pub fn score(self) -> u64 {
        match self {
            EnemyKind::Basic => 100,
            EnemyKind::Fast => 200,
            EnemyKind::Armored => 300,
        }
    }

    /// Roll a kind for `level` (1-based)
    pub fn roll<R: Rng>(rng: &mut R, level: u32) -> Self {
        let armored = (0.1 * level as f64).min(0.4);
        let roll: f64 = rng.random();
        if roll < armored {
            EnemyKind::Armored
        } else if roll < armored + 0.25 {
            EnemyKind::Fast
        } else {
            EnemyKind::Basic
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TankKind {
    Player,
    Enemy(EnemyKind),
}

/// A tile-locked tank
#[derive(Debug, Clone, Serialize)]
pub struct Tank {
    pub id: u32,
    pub kind: TankKind,
    pub pos: Vec2,
    pub facing: Direction,
    pub motion: GridMotion,
    /// Pixels per frame
    pub speed: f32,
    pub hp: u32,
    pub fire: FrameCooldown,
}

impl Tank {
    pub fn player(id: u32, cell: Cell, tuning: &BattleTuning) -> Self {
        Self {
            id,
            kind: TankKind::Player,
            pos: cell.center(tuning.tile_size),
            facing: Direction::Up,
            motion: GridMotion::new(cell, tuning.tile_size),
            speed: tuning.player_speed,
            hp: 1,
            fire: FrameCooldown::new(tuning.player_fire_frames),
        }
    }

    pub fn enemy(id: u32, kind: EnemyKind, cell: Cell, tuning: &BattleTuning) -> Self {
        Self {
            id,
            kind: TankKind::Enemy(kind),
            pos: cell.center(tuning.tile_size),
            facing: Direction::Down,
            motion: GridMotion::new(cell, tuning.tile_size),
            speed: kind.speed(),
            hp: kind.hp(),
            fire: FrameCooldown::new(tuning.enemy_fire_frames),
        }
    }

    /// Hit box, slightly inside the tile
    pub fn rect(&self, tile_size: f32) -> Rect {
        Rect::square(self.pos, tile_size - 4.0)
    }
}

/// Complete grid battle context
#[derive(Debug, Clone)]
pub struct BattleState {
    pub tuning: BattleTuning,
    pub layout: Layout,
    pub grid: TileGrid,
    pub phase: Phase,
    pub frame: u64,
    /// 1-based level
    pub level: u32,
    pub score: u64,
    pub lives: u32,
    pub player: Tank,
    pub enemies: Vec<Tank>,
    pub bullets: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    /// Enemies still to enter this level
    pub enemies_to_spawn: u32,
    /// Frames until the next spawn attempt
    pub spawn_timer: u32,
    pub base_destroyed: bool,
    pub rng: Pcg32,
    next_id: u32,
}

impl BattleState {
    pub fn new(tuning: BattleTuning, seed: u64) -> Self {
        let layout = Layout::for_grid(tuning.cols, tuning.rows);
        let mut state = Self {
            grid: TileGrid::new(tuning.cols, tuning.rows),
            player: Tank::player(0, layout.player_spawn, &tuning),
            layout,
            tuning,
            phase: Phase::Menu,
            frame: 0,
            level: 1,
            score: 0,
            lives: 0,
            enemies: Vec::new(),
            bullets: Vec::new(),
            explosions: Vec::new(),
            enemies_to_spawn: 0,
            spawn_timer: 0,
            base_destroyed: false,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.lives = state.tuning.player_lives;
        // Show level 1 terrain behind the menu
        terrain::generate(
            &mut state.grid,
            &state.layout,
            1,
            &state.tuning,
            &mut state.rng,
        );
        state
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn playfield(&self) -> Vec2 {
        self.tuning.playfield()
    }

    pub fn tile_size(&self) -> f32 {
        self.tuning.tile_size
    }

    /// Enemies a level sends in total
    pub fn enemies_for_level(&self, level: u32) -> u32 {
        self.tuning.enemies_base + level * self.tuning.enemies_per_level
    }

    /// Fresh campaign from level 1
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = self.tuning.player_lives;
        self.level = 1;
        self.base_destroyed = false;
        self.start_level();
    }

    /// Regenerate terrain and queue the current level's enemies
    pub fn start_level(&mut self) {
        terrain::generate(
            &mut self.grid,
            &self.layout,
            self.level,
            &self.tuning,
            &mut self.rng,
        );
        self.enemies.clear();
        self.respawn_player();
        self.bullets.clear();
        self.explosions.clear();
        self.enemies_to_spawn = self.enemies_for_level(self.level);
        self.spawn_timer = 0;
        log::info!(
            "Level {} of {}: {} enemies incoming",
            self.level,
            self.tuning.max_levels,
            self.enemies_to_spawn
        );
    }

    /// Put the player back at its spawn, or the nearest free cell if a tank
    /// is parked there
    pub fn respawn_player(&mut self) {
        let id = self.player.id;
        let cell = self.free_cell_near(self.layout.player_spawn, id);
        self.player = Tank::player(id, cell, &self.tuning);
    }

    /// Closest passable cell to `origin` (by ring) that no tank but `except` holds
    fn free_cell_near(&self, origin: Cell, except: u32) -> Cell {
        let reach = self.grid.cols().max(self.grid.rows());
        (0..reach)
            .flat_map(|r| {
                (-r..=r)
                    .flat_map(move |dr| (-r..=r).map(move |dc| (dc, dr)))
                    .filter(move |(dc, dr)| dc.abs().max(dr.abs()) == r)
                    .map(move |(dc, dr)| Cell::new(origin.col + dc, origin.row + dr))
            })
            .find(|&c| self.grid.is_passable(c) && !self.occupied(c, except))
            .unwrap_or(origin)
    }

    /// Whether any tank other than `except` blocks `cell`
    pub fn occupied(&self, cell: Cell, except: u32) -> bool {
        std::iter::once(&self.player)
            .chain(&self.enemies)
            .any(|t| t.id != except && t.motion.occupies(cell))
    }

    pub fn transition(&mut self, event: PhaseEvent) -> bool {
        match self.phase.next(event) {
            Some(next) => {
                log::info!(
                    "Battle phase {} -> {} ({:?}, level {})",
                    self.phase.as_str(),
                    next.as_str(),
                    event,
                    self.level
                );
                self.phase = next;
                true
            }
            None => false,
        }
    }

    pub fn player_health(&self) -> f32 {
        if self.tuning.player_lives == 0 {
            0.0
        } else {
            self.lives as f32 / self.tuning.player_lives as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_kinds() {
        assert_eq!(EnemyKind::Armored.hp(), 3);
        assert_eq!(EnemyKind::Fast.speed(), 2.0);
        assert_eq!(EnemyKind::Basic.score(), 100);
        assert_eq!(EnemyKind::Armored.score(), 300);
    }

    #[test]
    fn test_armored_share_grows() {
        let mut rng = Pcg32::seed_from_u64(8);
        let armored = |rng: &mut Pcg32, level| {
            (0..1000)
                .filter(|_| EnemyKind::roll(rng, level) == EnemyKind::Armored)
                .count()
        };
        let early = armored(&mut rng, 1);
        let late = armored(&mut rng, 5);
        assert!(early < 200, "level 1 armored = {early}");
        assert!(late > 300, "level 5 armored = {late}");
    }

    #[test]
    fn test_new_state_is_menu_with_terrain() {
        let s = BattleState::new(BattleTuning::default(), 1);
        assert_eq!(s.phase, Phase::Menu);
        assert_eq!(s.lives, 3);
        assert_eq!(s.player.motion.cell, Cell::new(4, 12));
        assert_eq!(s.player.pos, Vec2::new(144.0, 400.0));
        assert_eq!(s.grid.get(s.layout.base), Some(super::super::grid::Tile::Base));
    }

    #[test]
    fn test_start_level_queues_enemies() {
        let mut s = BattleState::new(BattleTuning::default(), 2);
        s.reset();
        assert_eq!(s.enemies_to_spawn, 6);
        s.level = 3;
        s.start_level();
        assert_eq!(s.enemies_to_spawn, 10);
    }

    #[test]
    fn test_occupied_ignores_self() {
        let mut s = BattleState::new(BattleTuning::default(), 3);
        let spawn = s.layout.player_spawn;
        assert!(s.occupied(spawn, 99));
        assert!(!s.occupied(spawn, s.player.id));
        let id = s.next_entity_id();
        s.enemies
            .push(Tank::enemy(id, EnemyKind::Basic, Cell::new(0, 0), &s.tuning));
        assert!(s.occupied(Cell::new(0, 0), 0));
    }

    #[test]
    fn test_respawn_avoids_parked_enemy() {
        let mut s = BattleState::new(BattleTuning::default(), 4);
        s.grid.fill(super::super::grid::Tile::Empty);
        let spawn = s.layout.player_spawn;
        let id = s.next_entity_id();
        s.enemies
            .push(Tank::enemy(id, EnemyKind::Basic, spawn, &s.tuning));

        s.respawn_player();

        let cell = s.player.motion.cell;
        assert_ne!(cell, spawn);
        assert!(!s.occupied(cell, s.player.id));
        assert_eq!((cell.col - spawn.col).abs().max((cell.row - spawn.row).abs()), 1);

        s.enemies.clear();
        s.respawn_player();
        assert_eq!(s.player.motion.cell, spawn);
    }
}
