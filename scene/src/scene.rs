use std::collections::HashMap;

use cgmath::{EuclideanSpace, Matrix4, Point3, SquareMatrix};
use log::debug;

use crate::camera::CameraData;
use crate::common::RgbaColor;
use crate::environment::Environment;
use crate::error::SceneError;
use crate::material::{Material, MaterialId, DEFAULT_MATERIAL_ID};
use crate::mesh::{Mesh, MeshId};
use crate::node::{LightNode, MeshNode, Node, NodeId, NodeKind};
use crate::texture::{Texture, TextureId};

/// The scene: an arena of nodes forming a single-rooted hierarchy, plus the
/// shared resources (meshes, materials, textures) they reference.
///
/// Ownership flows strictly Scene → nodes and parent → child; all
/// back-references (child → parent, controllers/gizmos → node) are plain
/// [`NodeId`]s validated on use.
///
/// The scene also maintains a flat light index: every Light-kind node that
/// is currently attached (reachable from the root) appears in it exactly
/// once. Attach and detach keep the index consistent by walking the whole
/// affected subtree, so nested lights never leak stale entries.
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    lights: Vec<NodeId>,
    active_camera: Option<NodeId>,

    pub meshes: HashMap<MeshId, Mesh>,
    pub materials: HashMap<MaterialId, Material>,
    pub textures: HashMap<TextureId, Texture>,
    environment: Environment,

    next_mesh_id: MeshId,
    next_material_id: MaterialId,
    next_texture_id: TextureId,
}

impl Scene {
    /// Creates a scene with its root node ("Scene"), the fallback material,
    /// and the default environment resources.
    pub fn new() -> Self {
        let root = Node::new("Scene", NodeKind::Empty);
        let root_id = root.id;

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);

        let mut materials = HashMap::new();
        let mut fallback = Material::color(RgbaColor::MAGENTA);
        fallback.id = DEFAULT_MATERIAL_ID;
        materials.insert(DEFAULT_MATERIAL_ID, fallback);

        let sky_material_id: MaterialId = 0;
        let mut sky_material = Material::color(RgbaColor::new(0.25, 0.28, 0.35, 1.0));
        sky_material.id = sky_material_id;
        materials.insert(sky_material_id, sky_material);

        let mut meshes = HashMap::new();
        let sky_mesh_id: MeshId = 0;
        let mut sky = Mesh::cube(1.0);
        sky.id = sky_mesh_id;
        meshes.insert(sky_mesh_id, sky);

        Self {
            nodes,
            root: root_id,
            lights: Vec::new(),
            active_camera: None,
            meshes,
            materials,
            textures: HashMap::new(),
            environment: Environment::new(sky_mesh_id, sky_material_id),
            next_mesh_id: sky_mesh_id + 1,
            next_material_id: sky_material_id + 1,
            next_texture_id: 0,
        }
    }

    // ========== Node access ==========

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The light index: ids of all attached Light-kind nodes.
    pub fn lights(&self) -> &[NodeId] {
        &self.lights
    }

    // ========== Node factories ==========

    /// Creates a detached node; attach it with [`Scene::add_child`].
    pub fn create_node(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let node = Node::new(name, kind);
        let id = node.id;
        debug!("created node {} \"{}\"", id, node.name);
        self.nodes.insert(id, node);
        id
    }

    pub fn create_empty(&mut self, name: impl Into<String>) -> NodeId {
        self.create_node(name, NodeKind::Empty)
    }

    pub fn create_mesh_node(
        &mut self,
        name: impl Into<String>,
        mesh: MeshId,
        material: Option<MaterialId>,
    ) -> NodeId {
        self.create_node(name, NodeKind::Mesh(MeshNode { mesh, material }))
    }

    pub fn create_light_node(&mut self, name: impl Into<String>, light: LightNode) -> NodeId {
        self.create_node(name, NodeKind::Light(light))
    }

    pub fn create_camera_node(&mut self, name: impl Into<String>, camera: CameraData) -> NodeId {
        self.create_node(name, NodeKind::Camera(camera))
    }

    // ========== Hierarchy ==========

    /// Links `child` under `parent`.
    ///
    /// Rejects (without mutation) a child that already has a different
    /// parent — detach it first — and links that would form a cycle. When
    /// the parent is attached, every Light-kind node in the child's subtree
    /// is registered in the light index.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let current_parent = self
            .nodes
            .get(&child)
            .ok_or(SceneError::NodeNotFound(child))?
            .parent();
        match current_parent {
            Some(existing) if existing == parent => return Ok(()),
            Some(existing) => {
                return Err(SceneError::AlreadyParented {
                    child,
                    parent: existing,
                })
            }
            None => {}
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::WouldCycle { child, parent });
        }

        self.nodes.get_mut(&parent).unwrap().add_child(child);
        self.nodes.get_mut(&child).unwrap().set_parent(Some(parent));

        if self.is_attached(parent) {
            self.register_subtree_lights(child);
        }
        Ok(())
    }

    /// Unlinks `child` from `parent`, keeping the detached subtree alive in
    /// the arena so it can be re-attached. Every Light-kind node in the
    /// subtree leaves the light index.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let child_parent = self
            .nodes
            .get(&child)
            .ok_or(SceneError::NodeNotFound(child))?
            .parent();
        if child_parent != Some(parent) {
            return Err(SceneError::NotAChild { child, parent });
        }

        if self.is_attached(child) {
            self.unregister_subtree_lights(child);
        }
        self.nodes.get_mut(&parent).unwrap().remove_child(child);
        self.nodes.get_mut(&child).unwrap().set_parent(None);
        Ok(())
    }

    /// Unlinks a node from its parent; a no-op for already-detached nodes.
    pub fn remove_from_parent(&mut self, node: NodeId) -> Result<(), SceneError> {
        let parent = self
            .nodes
            .get(&node)
            .ok_or(SceneError::NodeNotFound(node))?
            .parent();
        match parent {
            Some(parent) => self.remove_child(parent, node),
            None => Ok(()),
        }
    }

    /// Detaches and destroys a node and all of its descendants.
    ///
    /// Dangling references are cleaned up defensively: the active camera and
    /// light index drop any entry inside the destroyed subtree.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), SceneError> {
        if node == self.root {
            return Err(SceneError::CannotRemoveRoot);
        }
        self.remove_from_parent(node)?;
        self.destroy_subtree(node);
        Ok(())
    }

    fn destroy_subtree(&mut self, node: NodeId) {
        let Some(current) = self.nodes.get(&node) else {
            return;
        };
        let children: Vec<NodeId> = current.children().to_vec();
        for child in children {
            self.destroy_subtree(child);
        }

        if self.active_camera == Some(node) {
            self.active_camera = None;
        }
        self.lights.retain(|&light| light != node);
        self.nodes.remove(&node);
        debug!("destroyed node {}", node);
    }

    /// True when `node` is reachable from the scene root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        node == self.root || self.is_ancestor(self.root, node)
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent());
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent());
        }
        false
    }

    fn register_subtree_lights(&mut self, node: NodeId) {
        let Some(current) = self.nodes.get(&node) else {
            return;
        };
        let children: Vec<NodeId> = current.children().to_vec();
        if current.is_light() && !self.lights.contains(&node) {
            self.lights.push(node);
            debug!("registered light {}", node);
        }
        for child in children {
            self.register_subtree_lights(child);
        }
    }

    fn unregister_subtree_lights(&mut self, node: NodeId) {
        let Some(current) = self.nodes.get(&node) else {
            return;
        };
        let children: Vec<NodeId> = current.children().to_vec();
        if current.is_light() {
            self.lights.retain(|&light| light != node);
            debug!("unregistered light {}", node);
        }
        for child in children {
            self.unregister_subtree_lights(child);
        }
    }

    // ========== Camera ==========

    /// Replaces the active camera reference. The camera node does not need
    /// to be attached to the hierarchy.
    pub fn set_camera(&mut self, camera: NodeId) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get(&camera)
            .ok_or(SceneError::NodeNotFound(camera))?;
        if !node.is_camera() {
            return Err(SceneError::NotACamera(camera));
        }
        self.active_camera = Some(camera);
        Ok(())
    }

    pub fn active_camera(&self) -> Option<NodeId> {
        self.active_camera
    }

    pub fn clear_camera(&mut self) {
        self.active_camera = None;
    }

    // ========== Per-frame update ==========

    /// One frame tick: recomputes world transforms, then refreshes the
    /// active camera's matrices from its now-current transform.
    ///
    /// `_dt` is carried for animation hooks owned by external collaborators.
    pub fn update(&mut self, _dt: f32) {
        self.refresh_matrices();
    }

    /// Recomputes transforms and the active camera's view/projection.
    ///
    /// Picking calls this immediately before building a ray: pointer input
    /// can arrive between frames, after the camera moved but before the next
    /// render tick.
    pub fn refresh_matrices(&mut self) {
        self.recompute_transforms();
        if let Some(camera_id) = self.active_camera {
            // Cameras may live outside the hierarchy, so resolve the
            // transform lazily rather than relying on the root pass.
            let world = self.node_world_transform(camera_id);
            if let Some(camera) = self
                .nodes
                .get_mut(&camera_id)
                .and_then(|node| node.as_camera_mut())
            {
                camera.update_matrices(&world);
            }
        }
    }

    /// Depth-first pre-order recompute of every attached node's world
    /// transform: the root's global equals its local, every other node's
    /// global is its parent's global times its local.
    pub fn recompute_transforms(&self) {
        self.recompute_subtree(self.root, Matrix4::identity());
    }

    fn recompute_subtree(&self, node_id: NodeId, parent_world: Matrix4<f32>) {
        let Some(node) = self.nodes.get(&node_id) else {
            return;
        };
        let world = parent_world * node.compute_local_transform();
        node.set_cached_world_transform(world);
        for &child in node.children() {
            self.recompute_subtree(child, world);
        }
    }

    /// The world transform of one node, computed on demand.
    ///
    /// Walks the root path and reuses cached transforms until the first
    /// stale ancestor; everything below a recomputed ancestor is recomputed
    /// too, so a cached child can never combine with a newer parent.
    ///
    /// Panics on an unknown id — callers hold ids they got from this scene.
    pub fn node_world_transform(&self, node_id: NodeId) -> Matrix4<f32> {
        let mut path = Vec::new();
        let mut current = node_id;
        loop {
            path.push(current);
            let node = self.nodes.get(&current).expect("node id not found in scene");
            match node.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        path.reverse();

        let mut world = Matrix4::identity();
        let mut ancestor_recomputed = false;
        for &id in &path {
            let node = self.nodes.get(&id).expect("node id not found in scene");
            match node.cached_world_transform() {
                Some(cached) if !ancestor_recomputed => world = cached,
                _ => {
                    world = world * node.compute_local_transform();
                    node.set_cached_world_transform(world);
                    ancestor_recomputed = true;
                }
            }
        }
        world
    }

    /// The world-space position of one node.
    pub fn node_world_position(&self, node_id: NodeId) -> Point3<f32> {
        Point3::from_vec(self.node_world_transform(node_id).w.truncate())
    }

    // ========== Resources ==========

    pub fn add_mesh(&mut self, mut mesh: Mesh) -> MeshId {
        let id = self.next_mesh_id;
        self.next_mesh_id += 1;
        mesh.id = id;
        self.meshes.insert(id, mesh);
        id
    }

    pub fn get_mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(&id)
    }

    pub fn add_material(&mut self, mut material: Material) -> MaterialId {
        let id = self.next_material_id;
        self.next_material_id += 1;
        material.id = id;
        self.materials.insert(id, material);
        id
    }

    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn get_material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(&id)
    }

    pub fn add_texture(&mut self, mut texture: Texture) -> TextureId {
        let id = self.next_texture_id;
        self.next_texture_id += 1;
        texture.id = id;
        self.textures.insert(id, texture);
        id
    }

    pub fn get_texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(&id)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
