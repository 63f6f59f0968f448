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

/// Colors for game elements, sRGB-encoded as written in hex
pub mod colors {
    /// #071023
    pub const BACKGROUND: [f32; 4] = [7.0 / 255.0, 16.0 / 255.0, 35.0 / 255.0, 1.0];
    /// #29d5ff
    pub const PLAYER: [f32; 4] = [41.0 / 255.0, 213.0 / 255.0, 1.0, 1.0];
    /// #ff7b7b
    pub const OBSTACLE: [f32; 4] = [1.0, 123.0 / 255.0, 123.0 / 255.0, 1.0];
    pub const GROUND: [f32; 4] = [1.0, 1.0, 1.0, 0.03];

    /// Decode one sRGB channel to linear light
    #[inline]
    pub fn srgb_to_linear(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    /// Linear color for an sRGB render target; alpha is already linear
    pub fn to_linear([r, g, b, a]: [f32; 4]) -> [f32; 4] {
        [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
    }
}
