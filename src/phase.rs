//! Top-level game mode state machine
//!
//! ```text
//! Menu --Start--> Playing --WaveCleared--> Upgrade --UpgradeChosen--> Playing
//! Playing --PlayerDefeated|BaseDestroyed--> GameOver --Restart--> Menu
//! Playing --CampaignWon--> Victory --Restart--> Menu
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Title/menu screen
    #[default]
    Menu,
    /// Simulation running
    Playing,
    /// Survival only: waiting for an upgrade choice
    Upgrade,
    /// Battle only: every level cleared
    Victory,
    /// Player or base destroyed
    GameOver,
}

/// Inputs to the phase machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    WaveCleared,
    UpgradeChosen,
    PlayerDefeated,
    BaseDestroyed,
    CampaignWon,
    Restart,
}

impl Phase {
    /// Transition for `event`, or `None` if the event is ignored here
    pub fn next(self, event: PhaseEvent) -> Option<Phase> {
        use PhaseEvent::*;
        match (self, event) {
            (Phase::Menu, Start) => Some(Phase::Playing),
            (Phase::Playing, WaveCleared) => Some(Phase::Upgrade),
            (Phase::Upgrade, UpgradeChosen) => Some(Phase::Playing),
            (Phase::Playing, PlayerDefeated | BaseDestroyed) => Some(Phase::GameOver),
            (Phase::Playing, CampaignWon) => Some(Phase::Victory),
            (Phase::GameOver | Phase::Victory, Restart) => Some(Phase::Menu),
            _ => None,
        }
    }

    /// Whether the simulation step does any work in this phase
    pub fn is_simulating(self) -> bool {
        self == Phase::Playing
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver | Phase::Victory)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Menu => "menu",
            Phase::Playing => "playing",
            Phase::Upgrade => "upgrade",
            Phase::Victory => "victory",
            Phase::GameOver => "gameover",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_survival() {
        let p = Phase::Menu;
        let p = p.next(PhaseEvent::Start).unwrap();
        assert_eq!(p, Phase::Playing);
        let p = p.next(PhaseEvent::WaveCleared).unwrap();
        assert_eq!(p, Phase::Upgrade);
        let p = p.next(PhaseEvent::UpgradeChosen).unwrap();
        assert_eq!(p, Phase::Playing);
        let p = p.next(PhaseEvent::BaseDestroyed).unwrap();
        assert_eq!(p, Phase::GameOver);
        assert_eq!(p.next(PhaseEvent::Restart), Some(Phase::Menu));
    }

    #[test]
    fn test_terminal_phases_only_exit_to_menu() {
        for terminal in [Phase::GameOver, Phase::Victory] {
            assert!(terminal.is_terminal());
            assert!(!terminal.is_simulating());
            assert_eq!(terminal.next(PhaseEvent::Start), None);
            assert_eq!(terminal.next(PhaseEvent::WaveCleared), None);
            assert_eq!(terminal.next(PhaseEvent::Restart), Some(Phase::Menu));
        }
    }

    #[test]
    fn test_ignored_events() {
        assert_eq!(Phase::Menu.next(PhaseEvent::Restart), None);
        assert_eq!(Phase::Playing.next(PhaseEvent::Start), None);
        assert_eq!(Phase::Upgrade.next(PhaseEvent::WaveCleared), None);
        assert_eq!(Phase::Playing.next(PhaseEvent::CampaignWon), Some(Phase::Victory));
    }
}
