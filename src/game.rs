//! Common surface of both games as seen by the loop driver

use glam::Vec2;
use serde::Serialize;

use crate::battle::{BattleGame, BattleSnapshot};
use crate::input::{Action, DirectionFlags};
use crate::phase::Phase;
use crate::survival::{SurvivalGame, SurvivalSnapshot};
use crate::tuning::Tuning;

/// A playable game the driver can step and draw
pub trait Arcade {
    /// Apply a discrete menu/flow action
    fn handle(&mut self, action: Action);

    /// Advance one frame and return the resulting view
    fn step(&mut self, input: &DirectionFlags, dt_ms: f64) -> Snapshot;

    fn snapshot(&self) -> Snapshot;

    fn phase(&self) -> Phase;

    /// Playfield size in pixels
    fn playfield(&self) -> Vec2;

    /// Host surface changed size; fixed-size games ignore this
    fn resize(&mut self, _playfield: Vec2) {}
}

/// Per-frame render/HUD view of either game
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Snapshot {
    Survival(SurvivalSnapshot),
    Battle(BattleSnapshot),
}

impl Snapshot {
    pub fn phase(&self) -> Phase {
        match self {
            Snapshot::Survival(s) => s.phase,
            Snapshot::Battle(b) => b.phase,
        }
    }

    pub fn playfield(&self) -> Vec2 {
        match self {
            Snapshot::Survival(s) => s.playfield,
            Snapshot::Battle(b) => b.playfield,
        }
    }

    pub fn hud(&self) -> Hud {
        match self {
            Snapshot::Survival(s) => Hud {
                phase: s.phase,
                score: s.score,
                stage_label: "Wave",
                stage: s.wave,
                xp: Some(s.xp),
                lives: None,
                player_health: s.player_health,
                base_health: s.base_health,
            },
            Snapshot::Battle(b) => Hud {
                phase: b.phase,
                score: b.score,
                stage_label: "Level",
                stage: b.level,
                xp: None,
                lives: Some(b.lives),
                player_health: b.player_health,
                base_health: if b.base_destroyed { 0.0 } else { 1.0 },
            },
        }
    }
}

/// Numbers the presentation layer writes into the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub phase: Phase,
    pub score: u64,
    pub stage_label: &'static str,
    pub stage: u32,
    pub xp: Option<u32>,
    pub lives: Option<u32>,
    pub player_health: f32,
    pub base_health: f32,
}

/// Which game to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GameMode {
    #[default]
    Survival,
    Battle,
}

impl GameMode {
    /// Parse a `?mode=battle` style query string; anything else is survival
    pub fn from_query(query: &str) -> Self {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "mode")
            .and_then(|(_, value)| Self::from_name(value))
            .unwrap_or_default()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "survival" | "shooter" => Some(GameMode::Survival),
            "battle" | "grid" => Some(GameMode::Battle),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Survival => "survival",
            GameMode::Battle => "battle",
        }
    }
}

/// Build the selected game. `viewport` sizes the survival playfield; the
/// battle grid has a fixed size from its tuning.
pub fn create(mode: GameMode, tuning: &Tuning, viewport: Vec2, seed: u64) -> Box<dyn Arcade> {
    log::info!(
        "Creating {} game ({:.0}x{:.0}, seed {})",
        mode.as_str(),
        viewport.x,
        viewport.y,
        seed
    );
    match mode {
        GameMode::Survival => Box::new(SurvivalGame::new(viewport, tuning.survival.clone(), seed)),
        GameMode::Battle => Box::new(BattleGame::new(tuning.battle.clone(), seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;

    #[test]
    fn test_mode_from_query() {
        assert_eq!(GameMode::from_query(""), GameMode::Survival);
        assert_eq!(GameMode::from_query("?mode=battle"), GameMode::Battle);
        assert_eq!(GameMode::from_query("?debug=1&mode=Grid"), GameMode::Battle);
        assert_eq!(GameMode::from_query("?mode=survival"), GameMode::Survival);
        assert_eq!(GameMode::from_query("?mode=chess"), GameMode::Survival);
    }

    #[test]
    fn test_both_games_through_trait() {
        let tuning = Tuning::default();
        for mode in [GameMode::Survival, GameMode::Battle] {
            let mut game = create(mode, &tuning, Vec2::new(480.0, 800.0), 1);
            assert_eq!(game.phase(), Phase::Menu);

            // Menu is inert
            let before = game.snapshot().hud();
            game.step(&DirectionFlags::default(), FRAME_MS);
            assert_eq!(game.snapshot().hud(), before);

            game.handle(Action::Start);
            assert_eq!(game.phase(), Phase::Playing);
            let snap = game.step(&DirectionFlags::default(), FRAME_MS);
            assert_eq!(snap.phase(), Phase::Playing);
            assert_eq!(snap.hud().stage, 1);
            assert_eq!(snap.hud().player_health, 1.0);
        }
    }

    #[test]
    fn test_hud_labels() {
        let tuning = Tuning::default();
        let survival = create(GameMode::Survival, &tuning, Vec2::new(480.0, 800.0), 1);
        let hud = survival.snapshot().hud();
        assert_eq!(hud.stage_label, "Wave");
        assert!(hud.xp.is_some() && hud.lives.is_none());

        let battle = create(GameMode::Battle, &tuning, Vec2::new(480.0, 800.0), 1);
        let hud = battle.snapshot().hud();
        assert_eq!(hud.stage_label, "Level");
        assert_eq!(hud.lives, Some(3));
        assert_eq!(battle.playfield(), Vec2::new(416.0, 416.0));
    }
}
