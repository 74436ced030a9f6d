//! Vertex type and palette for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in playfield pixels (y down) with RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Replace a color's alpha
pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.039, 0.039, 0.039, 1.0];
    pub const GRID_LINE: [f32; 4] = [0.29, 0.871, 0.502, 0.1];
    pub const LETTERBOX: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    pub const BASE_PLATFORM: [f32; 4] = [0.118, 0.227, 0.373, 1.0];
    pub const BASE: [f32; 4] = [0.29, 0.871, 0.502, 1.0];
    pub const BASE_EDGE: [f32; 4] = [0.133, 0.773, 0.369, 1.0];
    pub const BASE_RUBBLE: [f32; 4] = [0.3, 0.3, 0.3, 1.0];

    pub const STEEL: [f32; 4] = [0.392, 0.455, 0.545, 1.0];
    pub const STEEL_EDGE: [f32; 4] = [0.58, 0.639, 0.722, 1.0];
    pub const BRICK: [f32; 4] = [0.573, 0.251, 0.055, 1.0];
    pub const BRICK_EDGE: [f32; 4] = [0.706, 0.325, 0.035, 1.0];
    pub const WATER: [f32; 4] = [0.114, 0.306, 0.847, 1.0];
    pub const TREE: [f32; 4] = [0.082, 0.502, 0.239, 0.85];

    pub const BARREL: [f32; 4] = [0.863, 0.149, 0.149, 1.0];
    pub const BARREL_MARK: [f32; 4] = [0.984, 0.749, 0.141, 1.0];
    pub const MINE: [f32; 4] = [0.961, 0.62, 0.043, 1.0];
    pub const MINE_SPIKE: [f32; 4] = [0.471, 0.208, 0.059, 1.0];
    pub const TURRET: [f32; 4] = [0.486, 0.227, 0.929, 1.0];
    pub const TURRET_GUN: [f32; 4] = [0.357, 0.129, 0.714, 1.0];

    pub const PLAYER_BODY: [f32; 4] = [0.29, 0.871, 0.502, 1.0];
    pub const PLAYER_TURRET: [f32; 4] = [0.133, 0.773, 0.369, 1.0];
    pub const PLAYER_TRACKS: [f32; 4] = [0.086, 0.396, 0.204, 1.0];
    pub const ENEMY_BODY: [f32; 4] = [0.863, 0.149, 0.149, 1.0];
    pub const ENEMY_TURRET: [f32; 4] = [0.6, 0.106, 0.106, 1.0];
    pub const ENEMY_TRACKS: [f32; 4] = [0.498, 0.114, 0.114, 1.0];
    pub const FAST_BODY: [f32; 4] = [0.976, 0.451, 0.086, 1.0];
    pub const ARMORED_BODY: [f32; 4] = [0.631, 0.631, 0.667, 1.0];
    pub const HP_PIP: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub const BULLET: [f32; 4] = [0.984, 0.749, 0.141, 1.0];
    pub const ENEMY_BULLET: [f32; 4] = [0.937, 0.267, 0.267, 1.0];
    pub const BLAST_CORE: [f32; 4] = [0.984, 0.749, 0.141, 1.0];
    pub const BLAST_EDGE: [f32; 4] = [0.937, 0.267, 0.267, 1.0];
}
