//! Ray-based picking: screen point → world ray → nearest intersected node.
//!
//! Two narrow phases feed one candidate list: mesh nodes are tested
//! triangle-by-triangle in their local space, and every indexed light is
//! tested as a bounding sphere of its configured radius. The two passes are
//! siblings — the light sweep never recurses into node subtrees.

use cgmath::{MetricSpace, Point3, SquareMatrix};
use log::{debug, warn};

use crate::common::Ray;
use crate::scene::{NodeId, Scene};

/// Intersections farther than this many world units from the ray origin are
/// not detected. A deliberate range limit, not a numeric artifact.
pub const MAX_PICK_DISTANCE: f32 = 512.0;

/// One resolved pick candidate.
#[derive(Debug, Clone)]
pub struct PickResult {
    pub node: NodeId,
    /// World-space hit location.
    pub hit_point: Point3<f32>,
    /// Squared distance from the ray origin. All comparisons happen on the
    /// squared value; take the root only for display.
    pub distance_sqrd: f32,
}

impl PickResult {
    /// Actual distance, for UI and diagnostics.
    pub fn distance(&self) -> f32 {
        self.distance_sqrd.sqrt()
    }
}

/// Picks the nearest node under a screen point.
///
/// Forces a transform and camera-matrix refresh first: pointer input can
/// arrive between frames, after the camera moved but before the next render
/// tick, and picking against last frame's matrices selects the wrong node.
///
/// Returns `None` with no active camera, a degenerate camera transform, or
/// no intersected node — callers treat `None` as "clear the selection".
pub fn pick(scene: &mut Scene, viewport: (u32, u32), screen: (f32, f32)) -> Option<PickResult> {
    scene.refresh_matrices();
    let ray = pick_ray(scene, viewport, screen)?;
    pick_with_ray(scene, &ray)
}

/// Builds the world-space pick ray for a screen point from the active
/// camera. Camera matrices must already be current.
pub fn pick_ray(scene: &Scene, viewport: (u32, u32), screen: (f32, f32)) -> Option<Ray> {
    let Some(camera_id) = scene.active_camera() else {
        warn!("picking requested with no active camera");
        return None;
    };
    let camera = scene.node(camera_id)?.as_camera()?;
    camera.screen_to_ray(screen.0, screen.1, viewport.0, viewport.1)
}

/// Picks the nearest node along a world-space ray: all mesh nodes in the
/// hierarchy plus every indexed light's proxy sphere.
pub fn pick_with_ray(scene: &Scene, ray: &Ray) -> Option<PickResult> {
    let mut candidates = Vec::new();
    collect_mesh_hits_recursive(scene, scene.root(), ray, &mut candidates);
    collect_light_hits(scene, ray, &mut candidates);
    resolve(candidates)
}

/// Picks the nearest among an explicit set of mesh nodes only — used to
/// test gizmo handles without considering the rest of their scene.
pub fn pick_nodes_with_ray(scene: &Scene, ray: &Ray, nodes: &[NodeId]) -> Option<PickResult> {
    let mut candidates = Vec::new();
    for &node in nodes {
        collect_mesh_hits(scene, node, ray, &mut candidates);
    }
    resolve(candidates)
}

fn collect_mesh_hits_recursive(
    scene: &Scene,
    node_id: NodeId,
    ray: &Ray,
    out: &mut Vec<PickResult>,
) {
    let Some(node) = scene.node(node_id) else {
        return;
    };
    collect_mesh_hits(scene, node_id, ray, out);
    for &child in node.children() {
        collect_mesh_hits_recursive(scene, child, ray, out);
    }
}

/// Narrow phase for one mesh node: transform the ray into local space, test
/// every triangle, map hits back to world space.
fn collect_mesh_hits(scene: &Scene, node_id: NodeId, ray: &Ray, out: &mut Vec<PickResult>) {
    let Some(node) = scene.node(node_id) else {
        return;
    };
    let Some(mesh_ref) = node.as_mesh() else {
        return;
    };
    let Some(mesh) = scene.get_mesh(mesh_ref.mesh) else {
        warn!("node {} references missing mesh {}", node_id, mesh_ref.mesh);
        return;
    };

    let world = scene.node_world_transform(node_id);
    let Some(world_to_local) = world.invert() else {
        // Zero scale somewhere up the chain; nothing visible to hit.
        return;
    };
    let local_ray = ray.transform(&world_to_local);

    // Broad phase against the mesh bounds before per-triangle tests.
    match mesh.bounding() {
        Some(bounds) if bounds.intersects_ray(&local_ray).is_some() => {}
        _ => return,
    }

    for hit in mesh.intersect_ray(&local_ray) {
        let world_point = Point3::from_homogeneous(world * hit.hit_point.to_homogeneous());
        let distance_sqrd = ray.origin.distance2(world_point);
        if distance_sqrd <= MAX_PICK_DISTANCE * MAX_PICK_DISTANCE {
            out.push(PickResult {
                node: node_id,
                hit_point: world_point,
                distance_sqrd,
            });
        }
    }
}

/// Narrow phase for lights: each indexed light is a sphere of its radius.
fn collect_light_hits(scene: &Scene, ray: &Ray, out: &mut Vec<PickResult>) {
    for &light_id in scene.lights() {
        let Some(node) = scene.node(light_id) else {
            continue;
        };
        let Some(light) = node.as_light() else {
            continue;
        };

        let center = scene.node_world_position(light_id);
        if let Some(t) = ray.intersect_sphere(center, light.radius) {
            let hit_point = ray.point_at(t);
            let distance_sqrd = ray.origin.distance2(hit_point);
            if distance_sqrd <= MAX_PICK_DISTANCE * MAX_PICK_DISTANCE {
                out.push(PickResult {
                    node: light_id,
                    hit_point,
                    distance_sqrd,
                });
            }
        }
    }
}

/// Nearest-wins resolution on squared distance. The strict comparison keeps
/// the first-encountered candidate on ties, i.e. traversal order.
fn resolve(candidates: Vec<PickResult>) -> Option<PickResult> {
    let mut best: Option<PickResult> = None;
    for candidate in candidates {
        let closer = match &best {
            Some(current) => candidate.distance_sqrd < current.distance_sqrd,
            None => true,
        };
        if closer {
            best = Some(candidate);
        }
    }

    if let Some(result) = &best {
        debug!(
            "pick hit node {} at distance {:.3}",
            result.node,
            result.distance()
        );
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CameraData, LightNode, Mesh, NodeId};
    use cgmath::{Point3, Vector3};

    /// Scene with an active camera at `position` looking down -Z.
    fn scene_with_camera(position: Point3<f32>) -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let camera = scene.create_camera_node("camera", CameraData::new());
        scene.node_mut(camera).unwrap().set_position(position);
        scene.set_camera(camera).unwrap();
        scene.refresh_matrices();
        (scene, camera)
    }

    fn add_cube_at(scene: &mut Scene, position: Point3<f32>, size: f32) -> NodeId {
        let mesh = scene.add_mesh(Mesh::cube(size));
        let node = scene.create_mesh_node("cube", mesh, None);
        scene.node_mut(node).unwrap().set_position(position);
        scene.add_child(scene.root(), node).unwrap();
        node
    }

    const VIEWPORT: (u32, u32) = (800, 600);
    const CENTER: (f32, f32) = (400.0, 300.0);

    // ========================================================================
    // End-to-end picking
    // ========================================================================

    #[test]
    fn test_pick_empty_scene_returns_none() {
        let (mut scene, _camera) = scene_with_camera(Point3::new(0.0, 0.0, 5.0));
        assert!(pick(&mut scene, VIEWPORT, CENTER).is_none());
    }

    #[test]
    fn test_pick_no_camera_returns_none() {
        let mut scene = Scene::new();
        add_cube_at(&mut scene, Point3::new(0.0, 0.0, 0.0), 1.0);
        assert!(pick(&mut scene, VIEWPORT, CENTER).is_none());
    }

    #[test]
    fn test_pick_unit_cube_front_face() {
        let (mut scene, _camera) = scene_with_camera(Point3::new(0.0, 0.0, 5.0));
        let cube = add_cube_at(&mut scene, Point3::new(0.0, 0.0, 0.0), 1.0);

        let result = pick(&mut scene, VIEWPORT, CENTER).unwrap();
        assert_eq!(result.node, cube);
        assert!(result.hit_point.x.abs() < 0.001);
        assert!(result.hit_point.y.abs() < 0.001);
        assert!((result.hit_point.z - 0.5).abs() < 0.001);
        assert!((result.distance() - 4.5).abs() < 0.001);
    }

    #[test]
    fn test_pick_nearest_of_two_cubes() {
        let (mut scene, _camera) = scene_with_camera(Point3::new(0.0, 0.0, 5.0));
        let _far = add_cube_at(&mut scene, Point3::new(0.0, 0.0, -10.0), 1.0);
        let near = add_cube_at(&mut scene, Point3::new(0.0, 0.0, 0.0), 1.0);

        let result = pick(&mut scene, VIEWPORT, CENTER).unwrap();
        assert_eq!(result.node, near);
    }

    #[test]
    fn test_pick_refreshes_stale_camera() {
        let (mut scene, camera) = scene_with_camera(Point3::new(0.0, 0.0, 5.0));
        let cube = add_cube_at(&mut scene, Point3::new(50.0, 0.0, 0.0), 1.0);

        // Move the camera after the last refresh; pick must see the move.
        scene
            .node_mut(camera)
            .unwrap()
            .set_position(Point3::new(50.0, 0.0, 5.0));

        let result = pick(&mut scene, VIEWPORT, CENTER).unwrap();
        assert_eq!(result.node, cube);
    }

    #[test]
    fn test_pick_beyond_max_distance_not_detected() {
        let (mut scene, _camera) = scene_with_camera(Point3::new(0.0, 0.0, 0.0));
        add_cube_at(&mut scene, Point3::new(0.0, 0.0, -600.0), 1.0);

        assert!(pick(&mut scene, VIEWPORT, CENTER).is_none());
    }

    #[test]
    fn test_pick_scaled_and_rotated_mesh() {
        let (mut scene, _camera) = scene_with_camera(Point3::new(0.0, 0.0, 10.0));
        let cube = add_cube_at(&mut scene, Point3::new(0.0, 0.0, 0.0), 1.0);
        {
            let node = scene.node_mut(cube).unwrap();
            node.set_scale(Vector3::new(4.0, 4.0, 4.0));
            node.set_rotation(cgmath::Quaternion::new(0.9238795, 0.0, 0.38268343, 0.0));
        }

        let result = pick(&mut scene, VIEWPORT, CENTER).unwrap();
        assert_eq!(result.node, cube);
        // Scaled 4x, the cube's surface sits in front of z = 0.
        assert!(result.hit_point.z > 0.0);
    }

    // ========================================================================
    // Light proxy spheres
    // ========================================================================

    #[test]
    fn test_pick_light_by_proxy_sphere() {
        let (mut scene, _camera) = scene_with_camera(Point3::new(0.0, 0.0, 20.0));
        let light = scene.create_light_node("light", LightNode::default());
        scene.add_child(scene.root(), light).unwrap();

        let result = pick(&mut scene, VIEWPORT, CENTER).unwrap();
        assert_eq!(result.node, light);
        // Default radius 5: the front of the sphere is at z = 5.
        assert!((result.hit_point.z - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_mesh_in_front_of_light_wins() {
        let (mut scene, _camera) = scene_with_camera(Point3::new(0.0, 0.0, 20.0));
        let light = scene.create_light_node("light", LightNode::default());
        scene.add_child(scene.root(), light).unwrap();
        let cube = add_cube_at(&mut scene, Point3::new(0.0, 0.0, 12.0), 1.0);

        let result = pick(&mut scene, VIEWPORT, CENTER).unwrap();
        assert_eq!(result.node, cube);
        let _ = light;
    }

    #[test]
    fn test_detached_light_not_pickable() {
        let (mut scene, _camera) = scene_with_camera(Point3::new(0.0, 0.0, 20.0));
        let light = scene.create_light_node("light", LightNode::default());
        scene.add_child(scene.root(), light).unwrap();
        scene.remove_from_parent(light).unwrap();

        assert!(pick(&mut scene, VIEWPORT, CENTER).is_none());
    }

    // ========================================================================
    // Restricted subset picking
    // ========================================================================

    #[test]
    fn test_pick_subset_ignores_other_nodes() {
        let (mut scene, _camera) = scene_with_camera(Point3::new(0.0, 0.0, 5.0));
        let front = add_cube_at(&mut scene, Point3::new(0.0, 0.0, 2.0), 1.0);
        let behind = add_cube_at(&mut scene, Point3::new(0.0, 0.0, -2.0), 1.0);

        let ray = pick_ray(&scene, VIEWPORT, CENTER).unwrap();
        let result = pick_nodes_with_ray(&scene, &ray, &[behind]).unwrap();
        assert_eq!(result.node, behind);
        let _ = front;
    }

    #[test]
    fn test_pick_subset_nearest_wins() {
        let (mut scene, _camera) = scene_with_camera(Point3::new(0.0, 0.0, 5.0));
        let near = add_cube_at(&mut scene, Point3::new(0.0, 0.0, 2.0), 1.0);
        let far = add_cube_at(&mut scene, Point3::new(0.0, 0.0, -2.0), 1.0);

        let ray = pick_ray(&scene, VIEWPORT, CENTER).unwrap();
        let result = pick_nodes_with_ray(&scene, &ray, &[far, near]).unwrap();
        assert_eq!(result.node, near);
    }
}
