//! Continuous survival shooter
//!
//! Waves of enemy tanks drift down a free-movement playfield while the
//! player's tank auto-fires. Clearing a wave offers one of three upgrades.

pub mod ai;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;

use glam::Vec2;

pub use snapshot::SurvivalSnapshot;
pub use state::SurvivalState;

use crate::game::{Arcade, Snapshot};
use crate::input::{Action, DirectionFlags};
use crate::phase::{Phase, PhaseEvent};
use crate::tuning::SurvivalTuning;

/// Survival game driven through [`Arcade`]
pub struct SurvivalGame {
    state: SurvivalState,
}

impl SurvivalGame {
    pub fn new(playfield: Vec2, tuning: SurvivalTuning, seed: u64) -> Self {
        Self {
            state: SurvivalState::new(playfield, tuning, seed),
        }
    }

    pub fn state(&self) -> &SurvivalState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SurvivalState {
        &mut self.state
    }

    fn start(&mut self) {
        if self.state.transition(PhaseEvent::Start) {
            self.state.reset();
            wave::spawn_wave(&mut self.state);
        }
    }

    fn choose_upgrade(&mut self, upgrade: crate::input::Upgrade) {
        let s = &mut self.state;
        if s.phase != Phase::Upgrade {
            return;
        }
        s.player.apply_upgrade(upgrade, &s.tuning);
        log::info!("Upgrade chosen: {:?}", upgrade);
        s.wave += 1;
        s.xp = 0;
        s.clear_transients();
        s.mines.clear();
        s.player.pos = s.player_spawn();
        s.transition(PhaseEvent::UpgradeChosen);
        wave::spawn_wave(s);
    }
}

impl Arcade for SurvivalGame {
    fn handle(&mut self, action: Action) {
        match action {
            Action::Start => self.start(),
            Action::Restart => {
                self.state.transition(PhaseEvent::Restart);
            }
            Action::ChooseUpgrade(upgrade) => self.choose_upgrade(upgrade),
        }
    }

    fn step(&mut self, input: &DirectionFlags, dt_ms: f64) -> Snapshot {
        tick::tick(&mut self.state, input, dt_ms);
        self.snapshot()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Survival(SurvivalSnapshot::from(&self.state))
    }

    fn phase(&self) -> Phase {
        self.state.phase
    }

    fn playfield(&self) -> Vec2 {
        self.state.playfield
    }

    fn resize(&mut self, playfield: Vec2) {
        self.state.resize(playfield);
    }
}
