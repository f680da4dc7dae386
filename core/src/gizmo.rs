//! The translation gizmo: three axis handles and the drag state machine
//! that converts handle hits into axis-constrained node translation.
//!
//! The gizmo is not part of the persistent scene. It owns a small scene
//! fragment of exactly three handle meshes, picked with the same ray
//! machinery as regular objects but restricted to the handle set, and
//! rendered as an overlay pass after the main scene.

use cgmath::{MetricSpace, Point3, Vector3};
use log::debug;

use crate::common::{Plane, Ray, RgbaColor};
use crate::picking::pick_nodes_with_ray;
use crate::scene::{Material, Mesh, NodeId, Scene};

/// Handle node names; hits resolve to an axis by name.
const HANDLE_X: &str = "axis__x";
const HANDLE_Y: &str = "axis__y";
const HANDLE_Z: &str = "axis__z";

/// The translation axis a handle constrains dragging to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    fn from_handle_name(name: &str) -> Option<Self> {
        match name {
            HANDLE_X => Some(Self::X),
            HANDLE_Y => Some(Self::Y),
            HANDLE_Z => Some(Self::Z),
            _ => None,
        }
    }

    /// The drag plane normal for this axis.
    ///
    /// The Y handle drags in the XY plane (normal +Z); the X and Z handles
    /// drag in the ground plane (normal +Y). Each plane contains its axis,
    /// so the constrained component survives the projection.
    fn plane_normal(self) -> Vector3<f32> {
        match self {
            Self::Y => Vector3::new(0.0, 0.0, 1.0),
            Self::X | Self::Z => Vector3::new(0.0, 1.0, 0.0),
        }
    }

    /// Zeroes the offset components not aligned with this axis.
    fn constrain(self, offset: Vector3<f32>) -> Vector3<f32> {
        match self {
            Self::X => Vector3::new(offset.x, 0.0, 0.0),
            Self::Y => Vector3::new(0.0, offset.y, 0.0),
            Self::Z => Vector3::new(0.0, 0.0, offset.z),
        }
    }
}

/// Drag interaction state.
#[derive(Debug, Copy, Clone)]
enum DragState {
    Idle,
    HandleHovered {
        axis: GizmoAxis,
    },
    Dragging {
        axis: GizmoAxis,
        target: NodeId,
        plane: Plane,
        last_hit: Point3<f32>,
    },
}

/// A camera-relative translation gizmo with `axis__x`/`axis__y`/`axis__z`
/// handle meshes.
///
/// Created once per viewport and kept for its lifetime; per-frame mutation
/// is limited to the drag state and the fragment root's transform.
pub struct TranslationGizmo {
    fragment: Scene,
    handles: [NodeId; 3],
    state: DragState,
    last_selected: Option<NodeId>,
}

impl TranslationGizmo {
    pub fn new() -> Self {
        let mut fragment = Scene::new();
        let root = fragment.root();

        let handles = [
            Self::build_handle(
                &mut fragment,
                HANDLE_X,
                Vector3::new(0.4, 0.06, 0.06),
                Point3::new(0.55, 0.0, 0.0),
                RgbaColor::RED,
            ),
            Self::build_handle(
                &mut fragment,
                HANDLE_Y,
                Vector3::new(0.06, 0.4, 0.06),
                Point3::new(0.0, 0.55, 0.0),
                RgbaColor::GREEN,
            ),
            Self::build_handle(
                &mut fragment,
                HANDLE_Z,
                Vector3::new(0.06, 0.06, 0.4),
                Point3::new(0.0, 0.0, 0.55),
                RgbaColor::BLUE,
            ),
        ];
        for handle in handles {
            // Handles are siblings under the fragment root; attaching within
            // the private fragment cannot fail.
            fragment.add_child(root, handle).unwrap();
        }
        fragment.recompute_transforms();

        Self {
            fragment,
            handles,
            state: DragState::Idle,
            last_selected: None,
        }
    }

    fn build_handle(
        fragment: &mut Scene,
        name: &str,
        half_extents: Vector3<f32>,
        offset: Point3<f32>,
        color: RgbaColor,
    ) -> NodeId {
        let mesh = fragment.add_mesh(Mesh::cuboid(half_extents));
        let material = fragment.add_material(Material::color(color));
        let node = fragment.create_mesh_node(name, mesh, Some(material));
        fragment.node_mut(node).unwrap().set_position(offset);
        node
    }

    /// The gizmo's scene fragment, for the overlay render pass.
    pub fn fragment(&self) -> &Scene {
        &self.fragment
    }

    /// The node most recently targeted for dragging.
    pub fn last_selected(&self) -> Option<NodeId> {
        self.last_selected
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn hovered_axis(&self) -> Option<GizmoAxis> {
        match self.state {
            DragState::HandleHovered { axis } => Some(axis),
            _ => None,
        }
    }

    /// The gizmo's reference position (fragment root).
    pub fn position(&self) -> Point3<f32> {
        self.fragment
            .node(self.fragment.root())
            .expect("fragment root exists")
            .position()
    }

    /// Moves the gizmo to the target node's world position.
    pub fn sync_to(&mut self, scene: &Scene, target: NodeId) {
        let position = scene.node_world_position(target);
        let root = self.fragment.root();
        self.fragment.node_mut(root).unwrap().set_position(position);
        self.fragment.recompute_transforms();
        self.last_selected = Some(target);
    }

    /// Scales the handles with camera distance so the gizmo keeps a roughly
    /// constant screen size.
    pub fn scale_for_camera(&mut self, camera_position: Point3<f32>) {
        let distance = self.position().distance(camera_position);
        let scale = (distance / 10.0).max(0.5);
        let root = self.fragment.root();
        self.fragment
            .node_mut(root)
            .unwrap()
            .set_scale(Vector3::new(scale, scale, scale));
        self.fragment.recompute_transforms();
    }

    /// Hover test against the three handles.
    ///
    /// Idle ⇄ HandleHovered transitions only; an active drag is never
    /// disturbed by hover updates.
    pub fn update_hover(&mut self, ray: &Ray) -> Option<GizmoAxis> {
        if self.is_dragging() {
            return None;
        }

        match self.pick_handle(ray) {
            Some((axis, _hit)) => {
                self.state = DragState::HandleHovered { axis };
                Some(axis)
            }
            None => {
                self.state = DragState::Idle;
                None
            }
        }
    }

    /// Starts dragging `target` if the ray hits a handle.
    ///
    /// The hit handle selects the drag plane orientation; the plane passes
    /// through the hit point, which becomes the first delta reference.
    pub fn begin_drag(&mut self, target: NodeId, ray: &Ray) -> bool {
        let Some((axis, hit_point)) = self.pick_handle(ray) else {
            return false;
        };

        let plane = Plane::new(axis.plane_normal(), hit_point);
        self.state = DragState::Dragging {
            axis,
            target,
            plane,
            last_hit: hit_point,
        };
        self.last_selected = Some(target);
        debug!("gizmo drag started on {:?} axis", axis);
        true
    }

    /// One pointer-move step of an active drag.
    ///
    /// Intersects the fresh pick ray with the stored drag plane, constrains
    /// the delta to the active axis, and applies it to both the dragged node
    /// and the gizmo itself. A ray parallel to the plane skips the frame; a
    /// target that has been removed from the scene cancels the drag.
    pub fn drag_move(&mut self, scene: &mut Scene, ray: &Ray) {
        let DragState::Dragging {
            axis,
            target,
            plane,
            last_hit,
        } = self.state
        else {
            return;
        };

        if !scene.contains_node(target) {
            debug!("gizmo drag target {} removed; cancelling drag", target);
            self.state = DragState::Idle;
            return;
        }

        // Parallel ray: no intersection this frame, keep state unchanged.
        let Some(hit) = plane.intersect_ray(ray) else {
            return;
        };

        let offset = axis.constrain(hit - last_hit);
        if let Some(node) = scene.node_mut(target) {
            node.translate(offset);
        }
        let root = self.fragment.root();
        self.fragment.node_mut(root).unwrap().translate(offset);
        self.fragment.recompute_transforms();

        self.state = DragState::Dragging {
            axis,
            target,
            plane,
            last_hit: hit,
        };
    }

    /// Pointer release: back to idle.
    pub fn end_drag(&mut self) {
        if self.is_dragging() {
            debug!("gizmo drag ended");
        }
        self.state = DragState::Idle;
    }

    /// Picks the nearest handle under the ray, resolving it to an axis.
    fn pick_handle(&self, ray: &Ray) -> Option<(GizmoAxis, Point3<f32>)> {
        let result = pick_nodes_with_ray(&self.fragment, ray, &self.handles)?;
        let name = &self.fragment.node(result.node)?.name;
        GizmoAxis::from_handle_name(name).map(|axis| (axis, result.hit_point))
    }
}

impl Default for TranslationGizmo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeKind;

    /// A ray straight down -Z through (x, y), starting well in front.
    fn ray_toward(x: f32, y: f32) -> Ray {
        Ray::new(Point3::new(x, y, 10.0), Vector3::new(0.0, 0.0, -1.0))
    }

    fn scene_with_node() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let node = scene.create_node("target", NodeKind::Empty);
        scene.add_child(scene.root(), node).unwrap();
        (scene, node)
    }

    // ========================================================================
    // Handle picking and hover
    // ========================================================================

    #[test]
    fn test_hover_x_handle() {
        let mut gizmo = TranslationGizmo::new();
        // Through the X handle's center.
        let axis = gizmo.update_hover(&ray_toward(0.55, 0.0));
        assert_eq!(axis, Some(GizmoAxis::X));
        assert_eq!(gizmo.hovered_axis(), Some(GizmoAxis::X));
    }

    #[test]
    fn test_hover_miss_returns_to_idle() {
        let mut gizmo = TranslationGizmo::new();
        gizmo.update_hover(&ray_toward(0.55, 0.0));
        let axis = gizmo.update_hover(&ray_toward(5.0, 5.0));
        assert_eq!(axis, None);
        assert_eq!(gizmo.hovered_axis(), None);
    }

    #[test]
    fn test_hover_z_handle_down_axis() {
        let mut gizmo = TranslationGizmo::new();
        // Straight down -Z just off the origin: only the Z handle lies
        // under this ray.
        let axis = gizmo.update_hover(&Ray::new(
            Point3::new(0.02, 0.0, 10.0),
            Vector3::new(0.0, 0.0, -1.0),
        ));
        assert_eq!(axis, Some(GizmoAxis::Z));
    }

    #[test]
    fn test_hover_nearest_of_two_handles_wins() {
        let mut gizmo = TranslationGizmo::new();
        // A diagonal ray in the XY plane that pierces the X handle first
        // (around x ≈ 0.8) and the Y handle afterwards (around y ≈ 0.8).
        let axis = gizmo.update_hover(&Ray::new(
            Point3::new(1.8, -1.0, 0.0),
            Vector3::new(-1.0, 1.0, 0.0),
        ));
        assert_eq!(axis, Some(GizmoAxis::X));
    }

    // ========================================================================
    // Drag state machine
    // ========================================================================

    #[test]
    fn test_drag_x_axis_constrained() {
        let (mut scene, target) = scene_with_node();
        let mut gizmo = TranslationGizmo::new();
        gizmo.sync_to(&scene, target);

        assert!(gizmo.begin_drag(target, &ray_toward(0.55, 0.0)));
        assert!(gizmo.is_dragging());

        // The X drag plane has normal (0,1,0) through the hit point. A ray
        // from above lands on it 3 units further along X and 2 along Z; the
        // constraint keeps only the X component.
        let drag_ray = Ray::new(
            Point3::new(0.55 + 3.0, 10.0, 2.0),
            Vector3::new(0.0, -1.0, 0.0),
        );
        gizmo.drag_move(&mut scene, &drag_ray);

        let position = scene.node(target).unwrap().position();
        assert!((position.x - 3.0).abs() < 0.01);
        assert!(position.y.abs() < 0.01);
        assert!(position.z.abs() < 0.01);
        assert!((gizmo.position().x - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_drag_accumulates_deltas() {
        let (mut scene, target) = scene_with_node();
        let mut gizmo = TranslationGizmo::new();
        gizmo.sync_to(&scene, target);
        assert!(gizmo.begin_drag(target, &ray_toward(0.55, 0.0)));

        let step = |x: f32| {
            Ray::new(Point3::new(x, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0))
        };
        gizmo.drag_move(&mut scene, &step(1.55));
        gizmo.drag_move(&mut scene, &step(2.55));

        let position = scene.node(target).unwrap().position();
        assert!((position.x - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_drag_y_axis_uses_z_plane() {
        let (mut scene, target) = scene_with_node();
        let mut gizmo = TranslationGizmo::new();
        gizmo.sync_to(&scene, target);

        // Hit the Y handle with a ray down -Z (the handle sits at y=0.55).
        assert!(gizmo.begin_drag(target, &ray_toward(0.0, 0.55)));

        // Drag plane normal is (0,0,1) through the hit on the handle's
        // front face. Move 2 units up.
        let drag_ray = Ray::new(
            Point3::new(0.0, 0.55 + 2.0, 10.0),
            Vector3::new(0.0, 0.0, -1.0),
        );
        gizmo.drag_move(&mut scene, &drag_ray);

        let position = scene.node(target).unwrap().position();
        assert!(position.x.abs() < 0.01);
        assert!((position.y - 2.0).abs() < 0.01);
        assert!(position.z.abs() < 0.01);
    }

    #[test]
    fn test_parallel_ray_skips_frame() {
        let (mut scene, target) = scene_with_node();
        let mut gizmo = TranslationGizmo::new();
        gizmo.sync_to(&scene, target);
        assert!(gizmo.begin_drag(target, &ray_toward(0.55, 0.0)));

        // X drag plane normal is (0,1,0); a horizontal ray is parallel.
        let parallel = Ray::new(Point3::new(0.0, 0.0, 10.0), Vector3::new(1.0, 0.0, 0.0));
        gizmo.drag_move(&mut scene, &parallel);

        // No movement, no state corruption; the drag continues.
        assert!(gizmo.is_dragging());
        let position = scene.node(target).unwrap().position();
        assert!(position.x.abs() < 0.01);
    }

    #[test]
    fn test_removed_target_cancels_drag() {
        let (mut scene, target) = scene_with_node();
        let mut gizmo = TranslationGizmo::new();
        gizmo.sync_to(&scene, target);
        assert!(gizmo.begin_drag(target, &ray_toward(0.55, 0.0)));

        scene.remove_node(target).unwrap();

        let drag_ray = Ray::new(Point3::new(3.0, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        gizmo.drag_move(&mut scene, &drag_ray);

        assert!(!gizmo.is_dragging());
    }

    #[test]
    fn test_release_returns_to_idle() {
        let (mut scene, target) = scene_with_node();
        let mut gizmo = TranslationGizmo::new();
        gizmo.sync_to(&scene, target);
        assert!(gizmo.begin_drag(target, &ray_toward(0.55, 0.0)));

        gizmo.end_drag();
        assert!(!gizmo.is_dragging());
        assert_eq!(gizmo.last_selected(), Some(target));
        let _ = scene;
    }

    #[test]
    fn test_begin_drag_requires_handle_hit() {
        let (scene, target) = scene_with_node();
        let mut gizmo = TranslationGizmo::new();
        gizmo.sync_to(&scene, target);

        assert!(!gizmo.begin_drag(target, &ray_toward(5.0, 5.0)));
        assert!(!gizmo.is_dragging());
    }

    // ========================================================================
    // Gizmo placement
    // ========================================================================

    #[test]
    fn test_sync_to_follows_target_world_position() {
        let (mut scene, target) = scene_with_node();
        scene
            .node_mut(target)
            .unwrap()
            .set_position(Point3::new(4.0, 5.0, 6.0));

        let mut gizmo = TranslationGizmo::new();
        gizmo.sync_to(&scene, target);
        assert_eq!(gizmo.position(), Point3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_scale_for_camera_grows_with_distance() {
        let (scene, target) = scene_with_node();
        let mut gizmo = TranslationGizmo::new();
        gizmo.sync_to(&scene, target);

        gizmo.scale_for_camera(Point3::new(0.0, 0.0, 30.0));
        let root = gizmo.fragment.root();
        let scale = gizmo.fragment.node(root).unwrap().scale();
        assert!((scale.x - 3.0).abs() < 0.01);

        // Never vanishes up close.
        gizmo.scale_for_camera(Point3::new(0.0, 0.0, 0.1));
        let scale = gizmo.fragment.node(root).unwrap().scale();
        assert!((scale.x - 0.5).abs() < 0.01);
    }
}
