//! The forward renderer: one submission pass over the scene per frame.
//!
//! The renderer never mutates the graph — transforms are refreshed before
//! traversal, then every visible mesh node is submitted with its resolved
//! world matrix between its material's begin/end bracket. Gizmo and other
//! diagnostic geometry render in a separate unlit overlay pass with depth
//! testing off, so handles are never incorrectly occluded.

use cgmath::{EuclideanSpace, Matrix4};
use log::warn;

use crate::scene::{
    LightUniform, LightsArrayUniform, NodeId, RenderDevice, Scene, DEFAULT_MATERIAL_ID,
};

pub struct ForwardRenderer;

impl ForwardRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders one frame of `scene` into `device`.
    ///
    /// Frame order: refresh transforms and camera matrices, clear, upload
    /// camera and lights, draw the sky backdrop, then depth-first submit
    /// every visible mesh node. A scene without an active camera clears and
    /// stops.
    pub fn render_scene(
        &mut self,
        device: &mut dyn RenderDevice,
        scene: &mut Scene,
        viewport: (u32, u32),
    ) {
        // Keep the camera's aspect in step with the viewport before its
        // projection is rebuilt.
        if let Some(camera_id) = scene.active_camera() {
            if let Some(camera) = scene
                .node_mut(camera_id)
                .and_then(|node| node.as_camera_mut())
            {
                camera.aspect = viewport.0 as f32 / viewport.1.max(1) as f32;
            }
        }
        scene.refresh_matrices();

        device.clear(scene.environment().clear_color);

        let Some(camera_id) = scene.active_camera() else {
            warn!("render_scene with no active camera");
            return;
        };
        let Some(camera) = scene.node(camera_id).and_then(|node| node.as_camera()) else {
            warn!("active camera {} is not a camera node", camera_id);
            return;
        };
        device.set_camera(camera.view_matrix(), camera.projection_matrix());

        self.upload_lights(device, scene);
        self.render_sky(device, scene, camera_id);
        self.render_node(device, scene, scene.root());
    }

    /// Packs the light index into one uniform upload.
    fn upload_lights(&self, device: &mut dyn RenderDevice, scene: &Scene) {
        let uniforms: Vec<LightUniform> = scene
            .lights()
            .iter()
            .filter_map(|&light_id| {
                let light = scene.node(light_id)?.as_light()?;
                let world = scene.node_world_transform(light_id);
                Some(LightUniform::from_node(light, &world))
            })
            .collect();
        device.set_lights(&LightsArrayUniform::from_lights(&uniforms));
    }

    /// Draws the environment backdrop centered on the camera, depth test
    /// off, so any scene geometry renders over it.
    fn render_sky(&self, device: &mut dyn RenderDevice, scene: &Scene, camera_id: NodeId) {
        let environment = scene.environment();
        let Some(material) = scene.get_material(environment.sky_material) else {
            return;
        };

        let camera_position = scene.node_world_position(camera_id);
        let model =
            Matrix4::from_translation(camera_position.to_vec()) * Matrix4::from_scale(100.0);

        device.set_depth_test(false);
        material.begin(device);
        device.draw_mesh(environment.sky_mesh, model);
        material.end(device);
        device.set_depth_test(true);
    }

    /// Submits one node and recurses into its children. An invisible node
    /// hides its whole subtree.
    fn render_node(&self, device: &mut dyn RenderDevice, scene: &Scene, node_id: NodeId) {
        let Some(node) = scene.node(node_id) else {
            return;
        };
        if !node.visible() {
            return;
        }

        if let Some(mesh_ref) = node.as_mesh() {
            if scene.get_mesh(mesh_ref.mesh).is_some() {
                let material_id = mesh_ref.material.unwrap_or(DEFAULT_MATERIAL_ID);
                // Unassigned or missing materials fall back to the default
                // rather than failing the frame.
                let material = scene
                    .get_material(material_id)
                    .or_else(|| scene.get_material(DEFAULT_MATERIAL_ID));
                match material {
                    Some(material) => {
                        material.begin(device);
                        device.draw_mesh(mesh_ref.mesh, scene.node_world_transform(node_id));
                        material.end(device);
                    }
                    None => warn!("no material available for node {}", node_id),
                }
            } else {
                warn!("node {} references missing mesh {}", node_id, mesh_ref.mesh);
            }
        }

        for &child in node.children() {
            self.render_node(device, scene, child);
        }
    }

    /// Renders an overlay fragment (e.g. the gizmo) unlit on top of the
    /// frame. Uses the camera already uploaded by `render_scene`.
    pub fn render_overlay(&mut self, device: &mut dyn RenderDevice, overlay: &Scene) {
        overlay.recompute_transforms();
        device.set_depth_test(false);
        self.render_node(device, overlay, overlay.root());
        device.set_depth_test(true);
    }
}

impl Default for ForwardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{
        CameraData, LightNode, Material, Mesh, RecordingDevice, RenderCommand,
    };
    use cgmath::Point3;

    const VIEWPORT: (u32, u32) = (800, 600);

    fn scene_with_camera() -> Scene {
        let mut scene = Scene::new();
        let camera = scene.create_camera_node("camera", CameraData::new());
        scene
            .node_mut(camera)
            .unwrap()
            .set_position(Point3::new(0.0, 0.0, 5.0));
        scene.set_camera(camera).unwrap();
        scene
    }

    fn add_cube(scene: &mut Scene, material: Option<u32>) -> (u32, NodeId) {
        let mesh = scene.add_mesh(Mesh::cube(1.0));
        let node = scene.create_mesh_node("cube", mesh, material);
        scene.add_child(scene.root(), node).unwrap();
        (mesh, node)
    }

    #[test]
    fn test_frame_order_clear_camera_lights_first() {
        let mut scene = scene_with_camera();
        add_cube(&mut scene, None);

        let mut device = RecordingDevice::new();
        ForwardRenderer::new().render_scene(&mut device, &mut scene, VIEWPORT);

        assert!(matches!(device.commands[0], RenderCommand::Clear(_)));
        assert!(matches!(device.commands[1], RenderCommand::SetCamera { .. }));
        assert!(matches!(device.commands[2], RenderCommand::SetLights { .. }));
    }

    #[test]
    fn test_no_camera_clears_and_stops() {
        let mut scene = Scene::new();
        add_cube(&mut scene, None);

        let mut device = RecordingDevice::new();
        ForwardRenderer::new().render_scene(&mut device, &mut scene, VIEWPORT);

        assert_eq!(device.commands.len(), 1);
        assert!(matches!(device.commands[0], RenderCommand::Clear(_)));
    }

    #[test]
    fn test_mesh_without_material_uses_default() {
        let mut scene = scene_with_camera();
        let (mesh, _node) = add_cube(&mut scene, None);

        let mut device = RecordingDevice::new();
        ForwardRenderer::new().render_scene(&mut device, &mut scene, VIEWPORT);

        assert!(device.drawn_meshes().contains(&mesh));
        assert!(device.bound_materials().contains(&DEFAULT_MATERIAL_ID));
    }

    #[test]
    fn test_missing_material_id_falls_back_to_default() {
        let mut scene = scene_with_camera();
        let (_mesh, node) = add_cube(&mut scene, Some(9999));
        let _ = node;

        let mut device = RecordingDevice::new();
        ForwardRenderer::new().render_scene(&mut device, &mut scene, VIEWPORT);

        assert!(device.bound_materials().contains(&DEFAULT_MATERIAL_ID));
    }

    #[test]
    fn test_assigned_material_bound_around_draw() {
        let mut scene = scene_with_camera();
        let material = scene.add_material(Material::standard());
        let (mesh, _node) = add_cube(&mut scene, Some(material));

        let mut device = RecordingDevice::new();
        ForwardRenderer::new().render_scene(&mut device, &mut scene, VIEWPORT);

        // The bind for this material comes immediately before its draw.
        let commands = &device.commands;
        let bind_at = commands
            .iter()
            .position(|c| *c == RenderCommand::BindMaterial(material))
            .unwrap();
        assert!(matches!(
            commands[bind_at + 1],
            RenderCommand::DrawMesh { mesh: m, .. } if m == mesh
        ));
    }

    #[test]
    fn test_draw_uses_resolved_world_matrix() {
        let mut scene = scene_with_camera();
        let (mesh, node) = add_cube(&mut scene, None);
        scene
            .node_mut(node)
            .unwrap()
            .set_position(Point3::new(2.0, 0.0, 0.0));

        let mut device = RecordingDevice::new();
        ForwardRenderer::new().render_scene(&mut device, &mut scene, VIEWPORT);

        let model = device
            .commands
            .iter()
            .find_map(|c| match c {
                RenderCommand::DrawMesh { mesh: m, model } if *m == mesh => Some(*model),
                _ => None,
            })
            .unwrap();
        assert!((model.w.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_invisible_subtree_skipped_sibling_drawn() {
        let mut scene = scene_with_camera();
        let (hidden_mesh, hidden) = add_cube(&mut scene, None);
        let (visible_mesh, _visible) = add_cube(&mut scene, None);
        scene.node_mut(hidden).unwrap().set_visible(false);

        let mut device = RecordingDevice::new();
        ForwardRenderer::new().render_scene(&mut device, &mut scene, VIEWPORT);

        let drawn = device.drawn_meshes();
        assert!(!drawn.contains(&hidden_mesh));
        assert!(drawn.contains(&visible_mesh));
    }

    #[test]
    fn test_lights_uploaded_with_count() {
        let mut scene = scene_with_camera();
        let light = scene.create_light_node("light", LightNode::default());
        scene.add_child(scene.root(), light).unwrap();

        let mut device = RecordingDevice::new();
        ForwardRenderer::new().render_scene(&mut device, &mut scene, VIEWPORT);

        assert!(device
            .commands
            .iter()
            .any(|c| matches!(c, RenderCommand::SetLights { count: 1 })));
    }

    #[test]
    fn test_overlay_pass_brackets_depth_test() {
        let mut overlay = Scene::new();
        let mesh = overlay.add_mesh(Mesh::cube(1.0));
        let node = overlay.create_mesh_node("handle", mesh, None);
        overlay.add_child(overlay.root(), node).unwrap();

        let mut device = RecordingDevice::new();
        ForwardRenderer::new().render_overlay(&mut device, &overlay);

        assert_eq!(device.commands.first(), Some(&RenderCommand::SetDepthTest(false)));
        assert_eq!(device.commands.last(), Some(&RenderCommand::SetDepthTest(true)));
        assert!(device.drawn_meshes().contains(&mesh));
    }

    #[test]
    fn test_rendering_does_not_mutate_graph() {
        let mut scene = scene_with_camera();
        let (_mesh, node) = add_cube(&mut scene, None);
        let before = scene.node(node).unwrap().position();
        let count_before = scene.node_count();

        let mut device = RecordingDevice::new();
        ForwardRenderer::new().render_scene(&mut device, &mut scene, VIEWPORT);

        assert_eq!(scene.node(node).unwrap().position(), before);
        assert_eq!(scene.node_count(), count_before);
    }
}
