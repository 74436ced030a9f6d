//! Survival entity store
//!
//! Every list the simulation touches lives in [`SurvivalState`]; the loop
//! driver owns it and hands it to `tick` by exclusive reference.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::input::Upgrade;
use crate::phase::{Phase, PhaseEvent};
use crate::sim::{
    Bounds, ContinuousMotion, Direction, Explosion, MillisCooldown, Projectile, Rect,
};
use crate::tuning::SurvivalTuning;

pub const PLAYER_SIZE: f32 = 40.0;
pub const ENEMY_SIZE: f32 = 35.0;
pub const TURRET_SIZE: f32 = 40.0;
pub const WALL_SIZE: Vec2 = Vec2::new(50.0, 20.0);
pub const BARREL_RADIUS: f32 = 15.0;
pub const MINE_RADIUS: f32 = 15.0;
pub const BASE_SIZE: f32 = 40.0;
/// Base center sits this far above the bottom edge
pub const BASE_OFFSET: f32 = 40.0;
pub const BULLET_RADIUS: f32 = 4.0;

/// The player's tank
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub facing: Direction,
    pub hp: u32,
    pub max_hp: u32,
    pub motion: ContinuousMotion,
    pub bullet_speed: f32,
    pub fire: MillisCooldown,
    /// Ricochet charges given to every new bullet
    pub ricochet: u32,
    pub moving: bool,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &SurvivalTuning) -> Self {
        Self {
            pos,
            facing: Direction::Up,
            hp: tuning.player_max_hp,
            max_hp: tuning.player_max_hp,
            motion: ContinuousMotion::new(tuning.player_speed),
            bullet_speed: tuning.player_bullet_speed,
            fire: MillisCooldown::new(tuning.player_fire_interval_ms),
            ricochet: 0,
            moving: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, PLAYER_SIZE)
    }

    pub fn apply_upgrade(&mut self, upgrade: Upgrade, tuning: &SurvivalTuning) {
        match upgrade {
            Upgrade::BulletSpeed => {
                self.bullet_speed *= tuning.bullet_speed_multiplier;
                self.fire.interval_ms = (self.fire.interval_ms - tuning.fire_interval_step_ms)
                    .max(tuning.fire_interval_floor_ms);
            }
            Upgrade::Armor => {
                self.max_hp += 1;
                self.hp = self.max_hp;
            }
            Upgrade::Ricochet => self.ricochet += 1,
        }
    }
}

/// Protected structure at the bottom of the screen
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Base {
    pub hp: u32,
    pub max_hp: u32,
}

impl Base {
    pub fn new(max_hp: u32) -> Self {
        Self { hp: max_hp, max_hp }
    }
}

/// A roaming enemy tank
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub facing: Direction,
    pub hp: u32,
    /// Pixels per frame
    pub speed: f32,
    pub fire: MillisCooldown,
    /// Frames since the last direction change
    pub move_timer: u32,
    /// Frames until the next direction change
    pub move_delay: u32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, ENEMY_SIZE)
    }
}

/// A stationary gun that fires along the dominant axis toward the player
#[derive(Debug, Clone, Serialize)]
pub struct Turret {
    pub id: u32,
    pub pos: Vec2,
    pub facing: Direction,
    pub hp: u32,
    pub fire: MillisCooldown,
}

impl Turret {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, TURRET_SIZE)
    }
}

/// A drifting contact mine
#[derive(Debug, Clone, Serialize)]
pub struct Mine {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    /// Heading in radians
    pub angle: f32,
}

impl Mine {
    /// Drift one frame, bouncing off the playfield edges
    pub fn drift(&mut self, playfield: Vec2) {
        self.pos += Vec2::new(self.angle.cos(), self.angle.sin()) * self.speed;
        let r = self.radius;
        if self.pos.x < r || self.pos.x > playfield.x - r {
            self.angle = std::f32::consts::PI - self.angle;
        }
        if self.pos.y < r || self.pos.y > playfield.y - r {
            self.angle = -self.angle;
        }
        self.pos = Bounds::new(Vec2::splat(r), playfield - Vec2::splat(r)).clamp(self.pos);
    }
}

/// Explosive barrel, detonates when shot
#[derive(Debug, Clone, Serialize)]
pub struct Barrel {
    pub pos: Vec2,
    pub radius: f32,
}

/// Wall material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WallKind {
    /// Loses one hit point per bullet
    Brick { hp: u32 },
    /// Ignores bullets until softened by an explosion
    Steel,
}

#[derive(Debug, Clone, Serialize)]
pub struct Wall {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: WallKind,
}

impl Wall {
    pub fn brick(pos: Vec2, hp: u32) -> Self {
        Self {
            pos,
            size: WALL_SIZE,
            kind: WallKind::Brick { hp },
        }
    }

    pub fn steel(pos: Vec2) -> Self {
        Self {
            pos,
            size: WALL_SIZE,
            kind: WallKind::Steel,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn is_steel(&self) -> bool {
        self.kind == WallKind::Steel
    }

    /// Apply one bullet hit; returns true when the wall is destroyed
    pub fn take_hit(&mut self) -> bool {
        match &mut self.kind {
            WallKind::Brick { hp } => {
                *hp = hp.saturating_sub(1);
                *hp == 0
            }
            WallKind::Steel => false,
        }
    }

    /// Blast damage turns steel into one-hit brick
    pub fn soften(&mut self) -> bool {
        if self.is_steel() {
            self.kind = WallKind::Brick { hp: 1 };
            true
        } else {
            false
        }
    }
}

/// Complete survival game context
#[derive(Debug, Clone)]
pub struct SurvivalState {
    pub tuning: SurvivalTuning,
    /// Playfield size in pixels
    pub playfield: Vec2,
    /// Accumulated simulated milliseconds (drives fire cooldowns)
    pub clock_ms: f64,
    /// Simulated frames
    pub frame: u64,
    pub phase: Phase,
    /// 1-based wave number
    pub wave: u32,
    pub score: u64,
    pub xp: u32,
    pub player: Player,
    pub base: Base,
    pub bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub turrets: Vec<Turret>,
    pub mines: Vec<Mine>,
    pub walls: Vec<Wall>,
    pub barrels: Vec<Barrel>,
    pub explosions: Vec<Explosion>,
    pub rng: Pcg32,
    next_id: u32,
}

impl SurvivalState {
    pub fn new(playfield: Vec2, tuning: SurvivalTuning, seed: u64) -> Self {
        let spawn = Self::spawn_point_for(playfield, &tuning);
        Self {
            player: Player::new(spawn, &tuning),
            base: Base::new(tuning.base_max_hp),
            tuning,
            playfield,
            clock_ms: 0.0,
            frame: 0,
            phase: Phase::Menu,
            wave: 1,
            score: 0,
            xp: 0,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            turrets: Vec::new(),
            mines: Vec::new(),
            walls: Vec::new(),
            barrels: Vec::new(),
            explosions: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_point_for(playfield: Vec2, tuning: &SurvivalTuning) -> Vec2 {
        Vec2::new(playfield.x / 2.0, playfield.y - tuning.player_spawn_offset)
    }

    pub fn player_spawn(&self) -> Vec2 {
        Self::spawn_point_for(self.playfield, &self.tuning)
    }

    /// Region the player's center is clamped to
    pub fn player_bounds(&self) -> Bounds {
        let half = PLAYER_SIZE / 2.0;
        Bounds::new(
            Vec2::new(half, self.tuning.bound_top),
            Vec2::new(self.playfield.x - half, self.playfield.y - self.tuning.bound_bottom),
        )
    }

    pub fn base_rect(&self) -> Rect {
        Rect::square(
            Vec2::new(self.playfield.x / 2.0, self.playfield.y - BASE_OFFSET),
            BASE_SIZE,
        )
    }

    /// Fresh run: wave 1, zero score, full-health default player and base
    pub fn reset(&mut self) {
        self.wave = 1;
        self.score = 0;
        self.xp = 0;
        self.player = Player::new(self.player_spawn(), &self.tuning);
        self.base = Base::new(self.tuning.base_max_hp);
        self.clear_transients();
        self.enemies.clear();
        self.turrets.clear();
        self.walls.clear();
        self.barrels.clear();
        self.mines.clear();
    }

    /// Drop projectiles and cosmetic effects
    pub fn clear_transients(&mut self) {
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.explosions.clear();
    }

    /// Apply a phase event; returns whether the phase changed
    pub fn transition(&mut self, event: PhaseEvent) -> bool {
        match self.phase.next(event) {
            Some(next) => {
                log::info!(
                    "Survival phase {} -> {} ({:?}, wave {})",
                    self.phase.as_str(),
                    next.as_str(),
                    event,
                    self.wave
                );
                self.phase = next;
                true
            }
            None => false,
        }
    }

    /// Playfield resized by the host
    pub fn resize(&mut self, playfield: Vec2) {
        self.playfield = playfield;
        if self.phase == Phase::Menu {
            self.player.pos = self.player_spawn();
        }
    }

    pub fn player_health(&self) -> f32 {
        fraction(self.player.hp, self.player.max_hp)
    }

    pub fn base_health(&self) -> f32 {
        fraction(self.base.hp, self.base.max_hp)
    }
}

fn fraction(value: u32, max: u32) -> f32 {
    if max == 0 {
        0.0
    } else {
        value as f32 / max as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SurvivalState {
        SurvivalState::new(Vec2::new(480.0, 800.0), SurvivalTuning::default(), 7)
    }

    #[test]
    fn test_new_state_defaults() {
        let s = state();
        assert_eq!(s.phase, Phase::Menu);
        assert_eq!(s.wave, 1);
        assert_eq!(s.player.pos, Vec2::new(240.0, 650.0));
        assert_eq!(s.player.hp, 3);
        assert_eq!(s.base.hp, 5);
        assert_eq!(s.player_health(), 1.0);
    }

    #[test]
    fn test_player_bounds() {
        let b = state().player_bounds();
        assert_eq!(b.min, Vec2::new(20.0, 100.0));
        assert_eq!(b.max, Vec2::new(460.0, 700.0));
    }

    #[test]
    fn test_upgrades() {
        let tuning = SurvivalTuning::default();
        let mut p = Player::new(Vec2::ZERO, &tuning);

        p.apply_upgrade(Upgrade::BulletSpeed, &tuning);
        assert_eq!(p.bullet_speed, 10.0);
        assert_eq!(p.fire.interval_ms, 350.0);
        for _ in 0..10 {
            p.apply_upgrade(Upgrade::BulletSpeed, &tuning);
        }
        assert_eq!(p.fire.interval_ms, 200.0);

        p.hp = 1;
        p.apply_upgrade(Upgrade::Armor, &tuning);
        assert_eq!((p.hp, p.max_hp), (4, 4));

        p.apply_upgrade(Upgrade::Ricochet, &tuning);
        p.apply_upgrade(Upgrade::Ricochet, &tuning);
        assert_eq!(p.ricochet, 2);
    }

    #[test]
    fn test_wall_hits() {
        let mut brick = Wall::brick(Vec2::ZERO, 2);
        assert!(!brick.take_hit());
        assert!(brick.take_hit());

        let mut steel = Wall::steel(Vec2::ZERO);
        for _ in 0..10 {
            assert!(!steel.take_hit());
        }
        assert!(steel.soften());
        assert!(!steel.soften());
        assert!(steel.take_hit());
    }

    #[test]
    fn test_mine_bounces_off_edges() {
        let mut mine = Mine {
            pos: Vec2::new(16.0, 100.0),
            radius: MINE_RADIUS,
            speed: 2.0,
            angle: std::f32::consts::PI, // heading left
        };
        mine.drift(Vec2::new(480.0, 800.0));
        // Reflected to head right and kept inside
        assert!(mine.angle.cos() > 0.9);
        assert!(mine.pos.x >= MINE_RADIUS);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut s = state();
        s.wave = 4;
        s.score = 900;
        s.player.max_hp = 6;
        s.player.ricochet = 2;
        s.walls.push(Wall::steel(Vec2::ZERO));
        s.reset();
        assert_eq!(s.wave, 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.player.max_hp, 3);
        assert_eq!(s.player.ricochet, 0);
        assert!(s.walls.is_empty());
    }
}
