//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::Color;

/// Screen-space vertex: position in viewport pixels (y down) and RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Fixed colors for scenery that is not described by level data
pub mod colors {
    use crate::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const SHADOW: Color = [0.0, 0.0, 0.0, 0.15];
    pub const SUN: Color = [1.0, 0.92, 0.23, 1.0];
    pub const SUN_GLOW: Color = [1.0, 0.95, 0.5, 0.25];
    pub const CLOUD: Color = [1.0, 1.0, 1.0, 0.9];
    pub const BIRD: Color = [0.2, 0.2, 0.25, 1.0];
    pub const WINDOW: Color = [0.53, 0.81, 0.92, 1.0];
    pub const CHIMNEY: Color = [0.55, 0.27, 0.07, 1.0];
    pub const FENCE: Color = [0.85, 0.72, 0.53, 1.0];
    pub const PIPE_RIM: Color = [0.18, 0.49, 0.2, 1.0];
    pub const RIVER: Color = [0.25, 0.6, 0.9, 0.85];
    pub const RIVER_FOAM: Color = [0.85, 0.95, 1.0, 0.6];
    pub const CODE_GLOW: Color = [0.2, 0.9, 0.6, 0.9];
    pub const MACHINE: Color = [0.47, 0.56, 0.61, 1.0];
    pub const MACHINE_LIGHT: Color = [0.3, 1.0, 0.4, 1.0];
    pub const CONVEYOR: Color = [0.26, 0.26, 0.26, 1.0];
    pub const SMOKESTACK: Color = [0.55, 0.43, 0.39, 1.0];
    pub const SMOKE: Color = [0.75, 0.75, 0.75, 0.35];
    pub const POST: Color = [0.55, 0.43, 0.39, 1.0];
    pub const TOWER: Color = [0.62, 0.62, 0.62, 1.0];
    pub const TOWER_LIGHT: Color = [1.0, 0.2, 0.2, 1.0];
    pub const SIGNAL: Color = [1.0, 0.84, 0.0, 1.0];
    pub const SPARKLE: Color = [1.0, 0.98, 0.75, 1.0];
    pub const BRICK_MORTAR: Color = [0.0, 0.0, 0.0, 0.18];
    pub const METAL_RIVET: Color = [0.38, 0.49, 0.55, 1.0];
    pub const SPIKES: Color = [0.62, 0.62, 0.65, 1.0];
    pub const LASER: Color = [1.0, 0.1, 0.2, 0.9];
    pub const LASER_GLOW: Color = [1.0, 0.3, 0.3, 0.25];
    pub const LASER_EMITTER: Color = [0.3, 0.3, 0.35, 1.0];
    pub const WIND: Color = [0.67, 0.73, 1.0, 0.35];
    pub const SIGN_POST: Color = [0.47, 0.33, 0.28, 1.0];
    pub const SIGN_BOARD: Color = [0.93, 0.84, 0.65, 1.0];
    pub const NPC: Color = [0.16, 0.16, 0.3, 1.0];
    pub const NPC_MARKER: Color = [1.0, 0.84, 0.0, 1.0];
    pub const PORTAL_OUTER: Color = [0.55, 0.2, 0.95, 0.8];
    pub const PORTAL_INNER: Color = [0.0, 0.94, 1.0, 0.6];
    pub const TRAIL: Color = [0.55, 0.43, 0.39, 1.0];
    pub const EYE: Color = [1.0, 1.0, 1.0, 1.0];
}
