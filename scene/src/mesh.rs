use std::cell::Cell;

use anyhow::{bail, Result};
use cgmath::{Point3, Vector3};

use crate::common::{Aabb, Ray};

/// Unique identifier for a mesh resource, assigned by the scene.
pub type MeshId = u32;

/// Vertex layout shared with the GPU: 32 bytes per vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

/// One ray/triangle intersection in local mesh space.
#[derive(Debug, Clone)]
pub struct MeshHit {
    /// Ray parameter of the hit (local space).
    pub distance: f32,
    /// Hit location in local mesh space.
    pub hit_point: Point3<f32>,
    /// Index of the hit triangle (index buffer position / 3).
    pub triangle_index: usize,
}

/// Shared, indexed triangle geometry.
///
/// Meshes live in the scene's resource map and may be referenced by any
/// number of Mesh-kind nodes. Geometry is immutable after construction;
/// the bounding box is computed lazily and cached.
#[derive(Clone)]
pub struct Mesh {
    pub id: MeshId,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    cached_bounds: Cell<Option<Aabb>>,
}

impl Mesh {
    /// Builds a mesh from raw buffers, as produced by an external loader.
    ///
    /// Fails on corrupt buffers: an index count that is not a multiple of
    /// three, or an index past the end of the vertex buffer. These are the
    /// unrecoverable conditions the caller should surface as fatal.
    pub fn from_raw(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            bail!(
                "index buffer length {} is not a multiple of 3",
                indices.len()
            );
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            bail!(
                "index {} out of range for {} vertices",
                bad,
                vertices.len()
            );
        }

        Ok(Self {
            id: 0,
            vertices,
            indices,
            cached_bounds: Cell::new(None),
        })
    }

    /// An axis-aligned box with the given half extents, centered at the
    /// origin. 24 vertices (4 per face, for per-face normals), 12 triangles.
    pub fn cuboid(half_extents: Vector3<f32>) -> Self {
        let (hx, hy, hz) = (half_extents.x, half_extents.y, half_extents.z);

        // Per face: outward normal and four corners, counter-clockwise
        // seen from outside.
        type Face = ([f32; 3], [[f32; 3]; 4]);
        let faces: [Face; 6] = [
            // +Z
            (
                [0.0, 0.0, 1.0],
                [
                    [-hx, -hy, hz],
                    [hx, -hy, hz],
                    [hx, hy, hz],
                    [-hx, hy, hz],
                ],
            ),
            // -Z
            (
                [0.0, 0.0, -1.0],
                [
                    [hx, -hy, -hz],
                    [-hx, -hy, -hz],
                    [-hx, hy, -hz],
                    [hx, hy, -hz],
                ],
            ),
            // +X
            (
                [1.0, 0.0, 0.0],
                [
                    [hx, -hy, hz],
                    [hx, -hy, -hz],
                    [hx, hy, -hz],
                    [hx, hy, hz],
                ],
            ),
            // -X
            (
                [-1.0, 0.0, 0.0],
                [
                    [-hx, -hy, -hz],
                    [-hx, -hy, hz],
                    [-hx, hy, hz],
                    [-hx, hy, -hz],
                ],
            ),
            // +Y
            (
                [0.0, 1.0, 0.0],
                [
                    [-hx, hy, hz],
                    [hx, hy, hz],
                    [hx, hy, -hz],
                    [-hx, hy, -hz],
                ],
            ),
            // -Y
            (
                [0.0, -1.0, 0.0],
                [
                    [-hx, -hy, -hz],
                    [hx, -hy, -hz],
                    [hx, -hy, hz],
                    [-hx, -hy, hz],
                ],
            ),
        ];
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let base = vertices.len() as u32;
            for (corner, uv) in corners.iter().zip(uvs) {
                vertices.push(Vertex {
                    position: *corner,
                    tex_coords: uv,
                    normal,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            id: 0,
            vertices,
            indices,
            cached_bounds: Cell::new(None),
        }
    }

    /// A cube with the given edge length, centered at the origin.
    pub fn cube(size: f32) -> Self {
        let half = size * 0.5;
        Self::cuboid(Vector3::new(half, half, half))
    }

    /// A square quad in the XZ plane with normal +Y, centered at the origin.
    pub fn plane(size: f32) -> Self {
        let half = size * 0.5;
        let normal = [0.0, 1.0, 0.0];
        let vertices = vec![
            Vertex {
                position: [-half, 0.0, half],
                tex_coords: [0.0, 0.0],
                normal,
            },
            Vertex {
                position: [half, 0.0, half],
                tex_coords: [1.0, 0.0],
                normal,
            },
            Vertex {
                position: [half, 0.0, -half],
                tex_coords: [1.0, 1.0],
                normal,
            },
            Vertex {
                position: [-half, 0.0, -half],
                tex_coords: [0.0, 1.0],
                normal,
            },
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];

        Self {
            id: 0,
            vertices,
            indices,
            cached_bounds: Cell::new(None),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local-space bounding box; `None` for empty geometry. Cached.
    pub fn bounding(&self) -> Option<Aabb> {
        if let Some(bounds) = self.cached_bounds.get() {
            return Some(bounds);
        }

        let positions: Vec<Point3<f32>> = self
            .vertices
            .iter()
            .map(|v| Point3::from(v.position))
            .collect();
        let bounds = Aabb::from_points(&positions);
        if let Some(bounds) = bounds {
            self.cached_bounds.set(Some(bounds));
        }
        bounds
    }

    /// Tests a local-space ray against every triangle.
    ///
    /// Returns all intersections, unsorted; callers sort or select by
    /// distance.
    pub fn intersect_ray(&self, ray: &Ray) -> Vec<MeshHit> {
        let mut hits = Vec::new();

        for triangle_index in 0..self.triangle_count() {
            let i0 = self.indices[triangle_index * 3] as usize;
            let i1 = self.indices[triangle_index * 3 + 1] as usize;
            let i2 = self.indices[triangle_index * 3 + 2] as usize;

            let v0 = Point3::from(self.vertices[i0].position);
            let v1 = Point3::from(self.vertices[i1].position);
            let v2 = Point3::from(self.vertices[i2].position);

            if let Some((t, _u, _v)) = ray.intersect_triangle(v0, v1, v2) {
                hits.push(MeshHit {
                    distance: t,
                    hit_point: ray.point_at(t),
                    triangle_index,
                });
            }
        }

        hits
    }
}
