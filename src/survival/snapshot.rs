//! Read-only view of the survival game handed to the renderer and HUD

use glam::Vec2;
use serde::Serialize;

use super::state::{Barrel, Base, Enemy, Mine, Player, SurvivalState, Turret, Wall};
use crate::phase::Phase;
use crate::sim::{Explosion, Projectile, Rect};

#[derive(Debug, Clone, Serialize)]
pub struct SurvivalSnapshot {
    pub phase: Phase,
    pub frame: u64,
    pub playfield: Vec2,
    pub wave: u32,
    pub score: u64,
    pub xp: u32,
    pub player: Player,
    pub base: Base,
    pub base_rect: Rect,
    /// Health fractions in [0, 1] for the HUD bars
    pub player_health: f32,
    pub base_health: f32,
    pub enemies: Vec<Enemy>,
    pub turrets: Vec<Turret>,
    pub mines: Vec<Mine>,
    pub walls: Vec<Wall>,
    pub barrels: Vec<Barrel>,
    pub bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
}

impl From<&SurvivalState> for SurvivalSnapshot {
    fn from(state: &SurvivalState) -> Self {
        Self {
            phase: state.phase,
            frame: state.frame,
            playfield: state.playfield,
            wave: state.wave,
            score: state.score,
            xp: state.xp,
            player: state.player.clone(),
            base: state.base,
            base_rect: state.base_rect(),
            player_health: state.player_health(),
            base_health: state.base_health(),
            enemies: state.enemies.clone(),
            turrets: state.turrets.clone(),
            mines: state.mines.clone(),
            walls: state.walls.clone(),
            barrels: state.barrels.clone(),
            bullets: state.bullets.clone(),
            enemy_bullets: state.enemy_bullets.clone(),
            explosions: state.explosions.clone(),
        }
    }
}
