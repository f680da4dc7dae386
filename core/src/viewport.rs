//! The editor viewport: glue between pointer input, picking, selection,
//! camera controllers, the gizmo, and the renderer.
//!
//! The host window layer feeds raw pointer and wheel events in; the
//! viewport turns them into selection changes and node manipulation, and
//! renders the scene plus the gizmo overlay once per redraw.

use cgmath::Point3;
use log::debug;

use crate::camera_controller::{
    CameraController, EditorCameraController, OrbitalCameraController,
};
use crate::common::Ray;
use crate::gizmo::TranslationGizmo;
use crate::input::MouseButton;
use crate::picking::{pick_ray, pick_with_ray};
use crate::renderer::ForwardRenderer;
use crate::scene::{CameraData, NodeId, RenderDevice, Scene};
use crate::selection::SelectionManager;

/// Which camera controller is active.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CameraMode {
    /// Free-look editor camera.
    Free,
    /// Arc-ball orbit around a pivot.
    Orbital,
}

/// Selection change produced by a pick, for hierarchy/property UI sync.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected(NodeId),
    Cleared,
}

/// Per-viewport editor state.
///
/// Owns the editor camera node id, both camera controllers, the selection,
/// and the translation gizmo. One instance per viewport surface.
pub struct EditorViewport {
    width: u32,
    height: u32,
    camera: NodeId,
    mode: CameraMode,
    free_controller: EditorCameraController,
    orbital_controller: OrbitalCameraController,
    pub selection: SelectionManager,
    pub gizmo: TranslationGizmo,
    renderer: ForwardRenderer,
    prev_mouse: (f32, f32),
}

impl EditorViewport {
    /// Creates the viewport and its editor camera, and makes that camera
    /// the scene's active camera.
    pub fn new(scene: &mut Scene, width: u32, height: u32) -> Self {
        let camera = scene.create_camera_node("Editor Camera", CameraData::new());
        scene
            .node_mut(camera)
            .unwrap()
            .set_position(Point3::new(0.0, 5.0, 5.0));
        // The node was created as a camera just above.
        scene.set_camera(camera).unwrap();

        let mut free_controller = EditorCameraController::new();
        free_controller.set_camera(scene, camera);
        let orbital_controller = OrbitalCameraController::new();

        Self {
            width,
            height,
            camera,
            mode: CameraMode::Free,
            free_controller,
            orbital_controller,
            selection: SelectionManager::new(),
            gizmo: TranslationGizmo::new(),
            renderer: ForwardRenderer::new(),
            prev_mouse: (0.0, 0.0),
        }
    }

    pub fn camera(&self) -> NodeId {
        self.camera
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.mode
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Switches to the free-look controller.
    pub fn set_free_camera_mode(&mut self, scene: &mut Scene) {
        self.mode = CameraMode::Free;
        self.orbital_controller.reset_mouse_states();
        self.free_controller.set_camera(scene, self.camera);
    }

    /// Switches to the arc-ball controller.
    pub fn set_arc_ball_camera_mode(&mut self, scene: &mut Scene) {
        self.mode = CameraMode::Orbital;
        self.free_controller.reset_mouse_states();
        self.orbital_controller.set_camera(scene, self.camera);
    }

    fn controller_mut(&mut self) -> &mut dyn CameraController {
        match self.mode {
            CameraMode::Free => &mut self.free_controller,
            CameraMode::Orbital => &mut self.orbital_controller,
        }
    }

    /// The pick ray under the pointer, with the camera's aspect synced to
    /// this viewport and its matrices refreshed.
    fn pointer_ray(&self, scene: &mut Scene, x: f32, y: f32) -> Option<Ray> {
        if let Some(camera) = scene
            .node_mut(self.camera)
            .and_then(|node| node.as_camera_mut())
        {
            camera.aspect = self.width as f32 / self.height.max(1) as f32;
        }
        scene.refresh_matrices();
        pick_ray(scene, (self.width, self.height), (x, y))
    }

    // ========== Pointer event routing ==========

    /// Pointer press. A left press first tries to grab a gizmo handle for
    /// the current primary selection, then falls back to object picking;
    /// the returned event reports any selection change.
    pub fn on_mouse_press(
        &mut self,
        scene: &mut Scene,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> Option<SelectionEvent> {
        self.prev_mouse = (x, y);
        self.controller_mut().on_mouse_down(button);

        if button != MouseButton::Left {
            return None;
        }
        let ray = self.pointer_ray(scene, x, y)?;

        if let Some(target) = self.selection.primary() {
            if scene.contains_node(target) && self.gizmo.begin_drag(target, &ray) {
                return None;
            }
        }

        match pick_with_ray(scene, &ray) {
            Some(result) => {
                debug!("selected node {}", result.node);
                self.selection.set(result.node);
                self.gizmo.sync_to(scene, result.node);
                Some(SelectionEvent::Selected(result.node))
            }
            None => {
                self.selection.clear();
                Some(SelectionEvent::Cleared)
            }
        }
    }

    /// Pointer move: drives an active gizmo drag, otherwise the camera
    /// controller and handle hovering.
    pub fn on_mouse_move(&mut self, scene: &mut Scene, x: f32, y: f32) {
        let dx = x - self.prev_mouse.0;
        let dy = y - self.prev_mouse.1;
        self.prev_mouse = (x, y);

        if self.gizmo.is_dragging() {
            if let Some(ray) = self.pointer_ray(scene, x, y) {
                self.gizmo.drag_move(scene, &ray);
            }
            return;
        }

        self.controller_mut().on_mouse_move(scene, dx, dy);

        if !self.selection.is_empty() {
            if let Some(ray) = self.pointer_ray(scene, x, y) {
                self.gizmo.update_hover(&ray);
            }
        }
    }

    /// Pointer release ends any gizmo drag.
    pub fn on_mouse_release(&mut self, _scene: &mut Scene, button: MouseButton, x: f32, y: f32) {
        self.prev_mouse = (x, y);
        self.controller_mut().on_mouse_up(button);

        if button == MouseButton::Left {
            self.gizmo.end_drag();
        }
    }

    pub fn on_mouse_wheel(&mut self, scene: &mut Scene, delta: f32) {
        self.controller_mut().on_mouse_wheel(scene, delta);
    }

    /// Deletes every selected node and clears the selection.
    pub fn delete_selected(&mut self, scene: &mut Scene) {
        for node in self.selection.nodes().to_vec() {
            if let Err(error) = scene.remove_node(node) {
                debug!("delete of node {} skipped: {}", node, error);
            }
        }
        self.selection.clear();
        self.gizmo.end_drag();
    }

    /// Renders the scene and, with a live selection, the gizmo overlay.
    pub fn render(&mut self, device: &mut dyn RenderDevice, scene: &mut Scene) {
        self.renderer
            .render_scene(device, scene, (self.width, self.height));

        if let Some(target) = self.selection.primary() {
            if scene.contains_node(target) {
                self.gizmo.sync_to(scene, target);
                self.gizmo
                    .scale_for_camera(scene.node_world_position(self.camera));
                self.renderer.render_overlay(device, self.gizmo.fragment());
            } else {
                // The selected node vanished since last frame; drop the
                // stale reference instead of following it.
                self.selection.remove(target);
            }
        }
    }
}
