//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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

/// Colors standing in for textures
pub mod colors {
    pub const PLATFORM: [f32; 4] = [0.45, 0.3, 0.18, 1.0];
    pub const PLATFORM_TOP: [f32; 4] = [0.35, 0.75, 0.3, 1.0];
    pub const COIN: [f32; 4] = [1.0, 0.82, 0.2, 1.0];
    pub const ENEMY: [f32; 4] = [0.85, 0.2, 0.25, 1.0];
    pub const FLAG_POLE: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
    pub const FLAG: [f32; 4] = [0.2, 0.6, 1.0, 1.0];
    pub const PLAYER: [f32; 4] = [0.95, 0.55, 0.2, 1.0];
    pub const PLAYER_EYE: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
    pub const BG1: [f32; 4] = [0.53, 0.8, 0.95, 1.0];
    pub const BG2: [f32; 4] = [0.95, 0.7, 0.5, 1.0];
    pub const BG3: [f32; 4] = [0.2, 0.15, 0.35, 1.0];
    /// Drawn where a texture failed to load
    pub const MISSING: [f32; 4] = [0.1, 0.9, 0.2, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];

    /// Color for a texture key
    pub fn for_texture(key: &str) -> [f32; 4] {
        match key {
            "platform" => PLATFORM,
            "coin" => COIN,
            "enemy" => ENEMY,
            "flag" => FLAG,
            "player" => PLAYER,
            "bg1" => BG1,
            "bg2" => BG2,
            "bg3" => BG3,
            _ => MISSING,
        }
    }

    /// Scale RGB, keep alpha
    pub fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
        [
            (color[0] * factor).min(1.0),
            (color[1] * factor).min(1.0),
            (color[2] * factor).min(1.0),
            color[3],
        ]
    }
}
