use cgmath::{InnerSpace, Matrix4, Vector4};

use crate::common::EPSILON;
use crate::node::LightNode;

/// Maximum number of lights submitted to the device per frame.
pub const MAX_LIGHTS: usize = 8;

/// Light type discriminant, shared with shaders.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LightType {
    Point = 0,
    Directional = 1,
    Spot = 2,
}

/// GPU-compatible representation of a single light.
///
/// Laid out for WGSL/GLSL std140-style uniform alignment: vec3 fields need
/// 16-byte alignment, so scalars are grouped up front and each vec3 is
/// followed by explicit padding.
///
/// # Memory layout (64 bytes)
///
/// | Offset | Size | Field      |
/// |--------|------|------------|
/// | 0      | 4    | light_type |
/// | 4      | 4    | radius     |
/// | 8      | 4    | intensity  |
/// | 12     | 4    | _padding0  |
/// | 16     | 12   | position   |
/// | 28     | 4    | _padding1  |
/// | 32     | 12   | direction  |
/// | 44     | 4    | _padding2  |
/// | 48     | 16   | color      |
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    light_type: u32,
    radius: f32,
    intensity: f32,
    _padding0: u32,
    position: [f32; 3],
    _padding1: f32,
    direction: [f32; 3],
    _padding2: f32,
    color: [f32; 4],
}

impl LightUniform {
    /// Packs a light node for upload, resolving position and direction from
    /// the node's world transform.
    ///
    /// The rest-pose light direction is (0, -1, 0); directional and spot
    /// lights aim it with the node's rotation.
    pub fn from_node(light: &LightNode, world: &Matrix4<f32>) -> Self {
        let position = world.w.truncate();

        let aimed = (world * Vector4::new(0.0, -1.0, 0.0, 0.0)).truncate();
        let direction = if aimed.magnitude2() < EPSILON {
            // Zero scale on an ancestor collapses the direction; keep the
            // rest pose rather than producing NaNs.
            [0.0, -1.0, 0.0]
        } else {
            aimed.normalize().into()
        };

        Self {
            light_type: light.light_type as u32,
            radius: light.radius,
            intensity: light.intensity,
            _padding0: 0,
            position: position.into(),
            _padding1: 0.0,
            direction,
            _padding2: 0.0,
            color: [light.color.r, light.color.g, light.color.b, light.color.a],
        }
    }

    pub fn light_type(&self) -> u32 {
        self.light_type
    }

    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    pub fn direction(&self) -> [f32; 3] {
        self.direction
    }
}

/// GPU-compatible array of lights with a live count.
///
/// # Memory layout (528 bytes)
///
/// | Offset | Size   | Field       |
/// |--------|--------|-------------|
/// | 0      | 4      | light_count |
/// | 4      | 12     | _padding    |
/// | 16     | 64 * 8 | lights      |
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsArrayUniform {
    pub light_count: u32,
    _padding: [u32; 3],
    pub lights: [LightUniform; MAX_LIGHTS],
}

impl LightsArrayUniform {
    pub fn new() -> Self {
        bytemuck::Zeroable::zeroed()
    }

    /// Packs up to [`MAX_LIGHTS`] lights; extras are dropped in order.
    pub fn from_lights(lights: &[LightUniform]) -> Self {
        let mut uniform = Self::new();
        uniform.light_count = lights.len().min(MAX_LIGHTS) as u32;
        for (slot, light) in uniform
            .lights
            .iter_mut()
            .zip(lights.iter().take(MAX_LIGHTS))
        {
            *slot = *light;
        }
        uniform
    }
}

impl Default for LightsArrayUniform {
    fn default() -> Self {
        Self::new()
    }
}
