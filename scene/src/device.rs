//! The render submission contract between the scene domain and a GPU
//! backend.
//!
//! The forward renderer drives a [`RenderDevice`] once per frame; concrete
//! implementations translate these calls into graphics-API state. The scene
//! crate itself stays device-free — [`RecordingDevice`] is the reference
//! implementation, used headless and in tests.

use cgmath::Matrix4;

use crate::common::RgbaColor;
use crate::light::LightsArrayUniform;
use crate::material::{Material, MaterialId};
use crate::mesh::MeshId;

/// Backend interface for one frame of forward-rendered submission.
///
/// Calls arrive in frame order: `clear`, then camera and lights, then
/// interleaved material binds and mesh draws, with `set_depth_test(false)`
/// bracketing any overlay geometry at the end of the frame.
pub trait RenderDevice {
    /// Clears color and depth targets.
    fn clear(&mut self, color: RgbaColor);

    /// Uploads the view and projection matrices for subsequent draws.
    fn set_camera(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>);

    /// Uploads the packed light array for subsequent draws.
    fn set_lights(&mut self, lights: &LightsArrayUniform);

    /// Binds a material's shader state and textures for the next draw.
    fn bind_material(&mut self, material: &Material);

    /// Submits one mesh with its resolved model (world) matrix.
    fn draw_mesh(&mut self, mesh: MeshId, model: Matrix4<f32>);

    /// Toggles depth testing; disabled for overlay passes so gizmo handles
    /// are never occluded by scene geometry.
    fn set_depth_test(&mut self, enabled: bool);
}

/// One recorded submission call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Clear(RgbaColor),
    SetCamera {
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
    },
    SetLights {
        count: u32,
    },
    BindMaterial(MaterialId),
    DrawMesh {
        mesh: MeshId,
        model: Matrix4<f32>,
    },
    SetDepthTest(bool),
}

/// A [`RenderDevice`] that records every call instead of talking to a GPU.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub commands: Vec<RenderCommand>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mesh ids drawn this frame, in submission order.
    pub fn drawn_meshes(&self) -> Vec<MeshId> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::DrawMesh { mesh, .. } => Some(*mesh),
                _ => None,
            })
            .collect()
    }

    /// The material ids bound this frame, in submission order.
    pub fn bound_materials(&self) -> Vec<MaterialId> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::BindMaterial(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl RenderDevice for RecordingDevice {
    fn clear(&mut self, color: RgbaColor) {
        self.commands.push(RenderCommand::Clear(color));
    }

    fn set_camera(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>) {
        self.commands.push(RenderCommand::SetCamera { view, projection });
    }

    fn set_lights(&mut self, lights: &LightsArrayUniform) {
        self.commands.push(RenderCommand::SetLights {
            count: lights.light_count,
        });
    }

    fn bind_material(&mut self, material: &Material) {
        self.commands.push(RenderCommand::BindMaterial(material.id));
    }

    fn draw_mesh(&mut self, mesh: MeshId, model: Matrix4<f32>) {
        self.commands.push(RenderCommand::DrawMesh { mesh, model });
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.commands.push(RenderCommand::SetDepthTest(enabled));
    }
}
