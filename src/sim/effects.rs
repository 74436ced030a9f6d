//! Cosmetic explosion effects (no gameplay influence)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How an explosion effect ages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FxLifetime {
    /// Alpha decays by `fade` per frame; gone at zero
    Fade { alpha: f32, fade: f32 },
    /// Fixed number of frames
    Frames { frame: u32, total: u32 },
}

/// A growing, fading blast ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    /// Radius growth per frame
    pub growth: f32,
    pub life: FxLifetime,
}

impl Explosion {
    pub fn fading(pos: Vec2, growth: f32, fade: f32) -> Self {
        Self {
            pos,
            radius: 0.0,
            growth,
            life: FxLifetime::Fade { alpha: 1.0, fade },
        }
    }

    pub fn framed(pos: Vec2, growth: f32, total: u32) -> Self {
        Self {
            pos,
            radius: 0.0,
            growth,
            life: FxLifetime::Frames { frame: 0, total },
        }
    }

    /// Age one frame; returns false once expired
    pub fn advance(&mut self) -> bool {
        self.radius += self.growth;
        match &mut self.life {
            FxLifetime::Fade { alpha, fade } => {
                *alpha -= *fade;
                *alpha > 0.0
            }
            FxLifetime::Frames { frame, total } => {
                *frame += 1;
                *frame < *total
            }
        }
    }

    /// Opacity in [0, 1] for rendering
    pub fn alpha(&self) -> f32 {
        match self.life {
            FxLifetime::Fade { alpha, .. } => alpha.clamp(0.0, 1.0),
            FxLifetime::Frames { frame, total } => {
                if total == 0 {
                    0.0
                } else {
                    1.0 - frame as f32 / total as f32
                }
            }
        }
    }
}

/// Age every effect and drop the expired ones
pub fn advance_all(effects: &mut Vec<Explosion>) {
    effects.retain_mut(|fx| fx.advance());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fading_explosion_lifetime() {
        // 1.0 alpha at 0.25/frame: alive after 3 frames, gone on the 4th
        let mut fx = Explosion::fading(Vec2::ZERO, 3.0, 0.25);
        assert!(fx.advance());
        assert!(fx.advance());
        assert!(fx.advance());
        assert!(!fx.advance());
        assert_eq!(fx.radius, 12.0);
    }

    #[test]
    fn test_framed_explosion_lifetime() {
        let mut effects = vec![Explosion::framed(Vec2::ZERO, 2.0, 3)];
        advance_all(&mut effects);
        assert_eq!(effects.len(), 1);
        assert!((effects[0].alpha() - 2.0 / 3.0).abs() < 1e-6);
        advance_all(&mut effects);
        advance_all(&mut effects);
        assert!(effects.is_empty());
    }
}
