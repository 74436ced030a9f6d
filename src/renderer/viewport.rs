//! Playfield to surface mapping

use glam::Vec2;

/// Uniform scale that fits the playfield inside the surface, centered with
/// letterbox bars on the long axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    /// Surface pixels before the playfield starts
    pub offset: Vec2,
    /// Surface size in pixels
    pub surface: Vec2,
}

impl Viewport {
    pub fn fit(playfield: Vec2, surface: Vec2) -> Self {
        let scale = if playfield.x > 0.0 && playfield.y > 0.0 {
            (surface.x / playfield.x).min(surface.y / playfield.y)
        } else {
            1.0
        };
        Self {
            scale,
            offset: (surface - playfield * scale) / 2.0,
            surface,
        }
    }

    /// Playfield pixel (y down) to normalized device coordinates (y up)
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        let px = self.offset + p * self.scale;
        Vec2::new(
            px.x / self.surface.x * 2.0 - 1.0,
            1.0 - px.y / self.surface.y * 2.0,
        )
    }
}
