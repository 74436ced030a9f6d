//! Input sampling
//!
//! Held directional flags (last sampled value wins, no queue) plus discrete
//! one-shot actions for menu flow.

use serde::{Deserialize, Serialize};

use crate::sim::Direction;

/// Four held directional buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionFlags {
    pub fn only(dir: Direction) -> Self {
        let mut flags = Self::default();
        flags.set(dir, true);
        flags
    }

    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Single active direction; conflicts resolve up > down > left > right
    pub fn resolve(&self) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&dir| self.is_held(dir))
    }
}

/// Permanent stat modifier offered after a survival wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Upgrade {
    /// Faster bullets and a shorter fire interval
    BulletSpeed,
    /// +1 max health and a full heal
    Armor,
    /// +1 ricochet charge per bullet
    Ricochet,
}

impl Upgrade {
    pub const ALL: [Upgrade; 3] = [Upgrade::BulletSpeed, Upgrade::Armor, Upgrade::Ricochet];

    /// Parse the `data-upgrade` attribute used by the upgrade buttons
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "bulletSpeed" | "bullet_speed" => Some(Upgrade::BulletSpeed),
            "armor" => Some(Upgrade::Armor),
            "ricochet" => Some(Upgrade::Ricochet),
            _ => None,
        }
    }
}

/// Discrete menu/flow events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Start,
    Restart,
    ChooseUpgrade(Upgrade),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_priority() {
        let mut flags = DirectionFlags::default();
        assert_eq!(flags.resolve(), None);

        flags.right = true;
        assert_eq!(flags.resolve(), Some(Direction::Right));
        flags.left = true;
        assert_eq!(flags.resolve(), Some(Direction::Left));
        flags.down = true;
        assert_eq!(flags.resolve(), Some(Direction::Down));
        flags.up = true;
        assert_eq!(flags.resolve(), Some(Direction::Up));
    }

    #[test]
    fn test_set_and_clear() {
        let mut flags = DirectionFlags::only(Direction::Left);
        assert!(flags.left && flags.any());
        flags.set(Direction::Left, false);
        assert!(!flags.any());
        flags.set(Direction::Up, true);
        flags.clear();
        assert_eq!(flags, DirectionFlags::default());
    }

    #[test]
    fn test_upgrade_from_attr() {
        assert_eq!(Upgrade::from_attr("bulletSpeed"), Some(Upgrade::BulletSpeed));
        assert_eq!(Upgrade::from_attr("armor"), Some(Upgrade::Armor));
        assert_eq!(Upgrade::from_attr("ricochet"), Some(Upgrade::Ricochet));
        assert_eq!(Upgrade::from_attr("laser"), None);
    }
}
