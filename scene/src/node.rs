use std::cell::Cell;
use std::sync::atomic::{AtomicU32, Ordering};

use cgmath::{EuclideanSpace, Matrix4, Point3, Quaternion, Vector3};

use crate::camera::CameraData;
use crate::common::RgbaColor;
use crate::light::LightType;
use crate::material::MaterialId;
use crate::mesh::MeshId;

/// Unique identifier for a node.
///
/// Ids are handed out by a process-wide counter and never reused, so a stale
/// id held by a controller or gizmo can be detected rather than silently
/// resolving to a different node.
pub type NodeId = u32;

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);

fn allocate_node_id() -> NodeId {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Payload of a Mesh-kind node: shared geometry plus an optional material.
///
/// A node without a material renders with the scene's default material.
#[derive(Debug, Clone, Copy)]
pub struct MeshNode {
    pub mesh: MeshId,
    pub material: Option<MaterialId>,
}

/// Payload of a Light-kind node.
#[derive(Debug, Clone, Copy)]
pub struct LightNode {
    pub light_type: LightType,
    /// Falloff radius; also the radius of the picking proxy sphere.
    pub radius: f32,
    pub color: RgbaColor,
    pub intensity: f32,
}

impl Default for LightNode {
    fn default() -> Self {
        Self {
            light_type: LightType::Point,
            radius: 5.0,
            color: RgbaColor::WHITE,
            intensity: 0.2,
        }
    }
}

/// Per-kind node data, fixed at construction.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Empty,
    Mesh(MeshNode),
    Light(LightNode),
    Camera(CameraData),
}

/// A single entity in the scene hierarchy.
///
/// A node owns its local transform and is linked to parent and children by
/// id; the [`crate::Scene`] arena owns the nodes themselves and keeps the
/// links consistent. The cached world transform is only valid after a
/// recompute pass (`Scene::recompute_transforms` or the lazy
/// `Scene::node_world_transform`).
#[derive(Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,

    position: Point3<f32>,
    rotation: Quaternion<f32>,
    scale: Vector3<f32>,

    parent: Option<NodeId>,
    children: Vec<NodeId>,

    visible: bool,
    kind: NodeKind,

    cached_world_transform: Cell<Option<Matrix4<f32>>>,
}

impl Node {
    /// Creates a detached node with an identity transform.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: allocate_node_id(),
            name: name.into(),
            position: Point3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            parent: None,
            children: Vec::new(),
            visible: true,
            kind,
            cached_world_transform: Cell::new(None),
        }
    }

    // ========== Transform ==========

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
        self.mark_transform_dirty();
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Quaternion<f32>) {
        self.rotation = rotation;
        self.mark_transform_dirty();
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
        self.mark_transform_dirty();
    }

    /// Offsets the local position.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.set_position(self.position + offset);
    }

    /// The local transform matrix, composed as translation * rotation * scale.
    pub fn compute_local_transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position.to_vec())
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// The cached world transform, if a recompute pass has run since the
    /// last local-transform change anywhere on this node's root path.
    pub fn cached_world_transform(&self) -> Option<Matrix4<f32>> {
        self.cached_world_transform.get()
    }

    pub(crate) fn set_cached_world_transform(&self, transform: Matrix4<f32>) {
        self.cached_world_transform.set(Some(transform));
    }

    pub fn mark_transform_dirty(&self) {
        self.cached_world_transform.set(None);
    }

    pub fn transform_dirty(&self) -> bool {
        self.cached_world_transform.get().is_none()
    }

    // ========== Hierarchy links (kept consistent by Scene) ==========

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
        self.mark_transform_dirty();
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|&id| id != child);
    }

    // ========== Visibility ==========

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    // ========== Kind access ==========

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, NodeKind::Light(_))
    }

    pub fn is_camera(&self) -> bool {
        matches!(self.kind, NodeKind::Camera(_))
    }

    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut MeshNode> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&LightNode> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut LightNode> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_camera(&self) -> Option<&CameraData> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut CameraData> {
        match &mut self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}
