use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

use crate::ray::Ray;
use crate::EPSILON;

/// A plane given by a unit normal and a signed distance from the origin.
///
/// The plane equation is `normal · point + distance = 0`.
#[derive(Debug, Copy, Clone)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub distance: f32,
}

impl Plane {
    /// Builds a plane from a normal and any point on the plane.
    /// The normal is normalized automatically.
    pub fn new(normal: Vector3<f32>, point: Point3<f32>) -> Self {
        let normal = normal.normalize();
        let distance = -normal.dot(point.to_vec());
        Self { normal, distance }
    }

    /// Signed distance from a point to the plane: positive on the normal
    /// side, zero on the plane, negative on the opposite side.
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(point.to_vec()) + self.distance
    }

    /// Intersects a ray with the plane.
    ///
    /// Solves `normal · (origin + t * direction) + distance = 0`. Returns
    /// `None` when the ray is parallel to the plane (|denominator| below
    /// [`EPSILON`]) or the intersection lies behind the ray origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Point3<f32>> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = -(self.normal.dot(ray.origin.to_vec()) + self.distance) / denom;
        if t < 0.0 {
            return None;
        }

        Some(ray.point_at(t))
    }
}
