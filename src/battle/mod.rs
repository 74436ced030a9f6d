//! Grid tank battle
//!
//! Tile-locked tanks on a 13x13 map. Destroy every enemy of a level while
//! keeping the base alive; clearing the last level wins the campaign.

pub mod ai;
pub mod grid;
pub mod state;
pub mod terrain;
pub mod tick;

use glam::Vec2;
use serde::Serialize;

pub use grid::{Tile, TileGrid};
pub use state::{BattleState, EnemyKind, Tank, TankKind};

use crate::game::{Arcade, Snapshot};
use crate::input::{Action, DirectionFlags};
use crate::phase::{Phase, PhaseEvent};
use crate::sim::{Cell, Explosion, Projectile};
use crate::tuning::BattleTuning;

/// Read-only view of the battle for the renderer and HUD
#[derive(Debug, Clone, Serialize)]
pub struct BattleSnapshot {
    pub phase: Phase,
    pub frame: u64,
    pub level: u32,
    pub max_levels: u32,
    pub score: u64,
    pub lives: u32,
    /// Lives as a fraction of the starting count
    pub player_health: f32,
    /// Queued plus on-field enemies
    pub enemies_remaining: u32,
    pub base_destroyed: bool,
    pub playfield: Vec2,
    pub tile_size: f32,
    pub grid: TileGrid,
    pub base: Cell,
    pub player: Tank,
    pub enemies: Vec<Tank>,
    pub bullets: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
}

impl From<&BattleState> for BattleSnapshot {
    fn from(s: &BattleState) -> Self {
        Self {
            phase: s.phase,
            frame: s.frame,
            level: s.level,
            max_levels: s.tuning.max_levels,
            score: s.score,
            lives: s.lives,
            player_health: s.player_health(),
            enemies_remaining: s.enemies_to_spawn + s.enemies.len() as u32,
            base_destroyed: s.base_destroyed,
            playfield: s.playfield(),
            tile_size: s.tile_size(),
            grid: s.grid.clone(),
            base: s.layout.base,
            player: s.player.clone(),
            enemies: s.enemies.clone(),
            bullets: s.bullets.clone(),
            explosions: s.explosions.clone(),
        }
    }
}

/// Grid battle driven through [`Arcade`]
pub struct BattleGame {
    state: BattleState,
}

impl BattleGame {
    pub fn new(tuning: BattleTuning, seed: u64) -> Self {
        Self {
            state: BattleState::new(tuning, seed),
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BattleState {
        &mut self.state
    }
}

impl Arcade for BattleGame {
    fn handle(&mut self, action: Action) {
        match action {
            Action::Start => {
                if self.state.transition(PhaseEvent::Start) {
                    self.state.reset();
                }
            }
            Action::Restart => {
                self.state.transition(PhaseEvent::Restart);
            }
            // No upgrades between battle levels
            Action::ChooseUpgrade(_) => {}
        }
    }

    fn step(&mut self, input: &DirectionFlags, dt_ms: f64) -> Snapshot {
        tick::tick(&mut self.state, input, dt_ms);
        self.snapshot()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Battle(BattleSnapshot::from(&self.state))
    }

    fn phase(&self) -> Phase {
        self.state.phase
    }

    fn playfield(&self) -> Vec2 {
        self.state.playfield()
    }
}
