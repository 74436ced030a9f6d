//! Projectiles and fire-rate limiting
//!
//! The survival game meters shots by wall-clock milliseconds, the grid game
//! by frame counts. Either way an actor emits at most one projectile per
//! cooldown window.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::dir::Direction;

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Hostile,
}

impl Faction {
    pub fn opposes(self, other: Faction) -> bool {
        self != other
    }
}

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    /// Obstacle hits this projectile survives by reflecting
    pub ricochet: u32,
    pub owner: Faction,
}

impl Projectile {
    /// Spawn at the shooter's edge (half its extent along `dir`)
    pub fn fire(
        origin: Vec2,
        half_extent: f32,
        dir: Direction,
        speed: f32,
        owner: Faction,
    ) -> Self {
        Self {
            pos: origin + dir.vector() * half_extent,
            vel: dir.vector() * speed,
            ricochet: 0,
            owner,
        }
    }

    pub fn with_ricochet(mut self, charges: u32) -> Self {
        self.ricochet = charges;
        self
    }

    /// Integrate one frame; returns the position before the move
    pub fn advance(&mut self) -> Vec2 {
        let prev = self.pos;
        self.pos += self.vel;
        prev
    }
}

/// Wall-clock fire limiter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MillisCooldown {
    pub interval_ms: f64,
    /// Time of the last shot; `None` means ready immediately
    pub last_fire_ms: Option<f64>,
}

impl MillisCooldown {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
        }
    }

    /// Cooldown whose first window ends at `first_ready_ms`
    pub fn delayed(interval_ms: f64, first_ready_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: Some(first_ready_ms - interval_ms),
        }
    }

    pub fn is_ready(&self, now_ms: f64) -> bool {
        match self.last_fire_ms {
            Some(last) => now_ms - last >= self.interval_ms,
            None => true,
        }
    }

    /// Consume the window if ready
    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if self.is_ready(now_ms) {
            self.last_fire_ms = Some(now_ms);
            true
        } else {
            false
        }
    }
}

/// Frame-count fire limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCooldown {
    pub frames: u32,
    pub remaining: u32,
}

impl FrameCooldown {
    pub fn new(frames: u32) -> Self {
        Self {
            frames,
            remaining: 0,
        }
    }

    /// Count down one frame
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn try_fire(&mut self) -> bool {
        if self.is_ready() {
            self.remaining = self.frames;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_offsets_by_half_extent() {
        let p = Projectile::fire(
            Vec2::new(100.0, 100.0),
            20.0,
            Direction::Left,
            8.0,
            Faction::Player,
        );
        assert_eq!(p.pos, Vec2::new(80.0, 100.0));
        assert_eq!(p.vel, Vec2::new(-8.0, 0.0));
    }

    #[test]
    fn test_advance_returns_previous_position() {
        let mut p = Projectile::fire(Vec2::ZERO, 0.0, Direction::Down, 5.0, Faction::Hostile);
        let prev = p.advance();
        assert_eq!(prev, Vec2::ZERO);
        assert_eq!(p.pos, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_millis_cooldown_one_shot_per_window() {
        let mut cd = MillisCooldown::new(400.0);
        assert!(cd.try_fire(0.0));
        assert!(!cd.try_fire(16.0));
        assert!(!cd.try_fire(399.0));
        assert!(cd.try_fire(400.0));
        assert!(!cd.try_fire(401.0));
    }

    #[test]
    fn test_millis_cooldown_delayed_start() {
        let mut cd = MillisCooldown::delayed(2500.0, 1200.0);
        assert!(!cd.try_fire(1199.0));
        assert!(cd.try_fire(1200.0));
    }

    #[test]
    fn test_frame_cooldown() {
        let mut cd = FrameCooldown::new(3);
        assert!(cd.try_fire());
        assert!(!cd.try_fire());
        cd.tick();
        cd.tick();
        assert!(!cd.try_fire());
        cd.tick();
        assert!(cd.try_fire());
    }

    #[test]
    fn test_faction_opposition() {
        assert!(Faction::Player.opposes(Faction::Hostile));
        assert!(!Faction::Hostile.opposes(Faction::Hostile));
    }
}
