use cgmath::{InnerSpace, Matrix4, Point3, Vector3};

use crate::EPSILON;

/// A ray with an origin point and a normalized direction.
#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray; the direction is normalized automatically.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// The point at parameter `t` along the ray (`origin + t * direction`).
    pub fn point_at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Transforms the ray by a 4x4 matrix.
    ///
    /// The origin transforms as a point (w = 1), the direction as a vector
    /// (w = 0). The resulting direction is re-normalized, so `t` parameters
    /// are not comparable across spaces when the matrix contains scale.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let origin = Point3::from_homogeneous(matrix * self.origin.to_homogeneous());
        let direction = (matrix * self.direction.extend(0.0)).truncate();
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Möller-Trumbore ray/triangle intersection.
    ///
    /// The test is double-sided. Returns `Some((t, u, v))` with the ray
    /// parameter and the barycentric coordinates of the hit, or `None` when
    /// the ray is parallel to the triangle plane, the hit lies outside the
    /// triangle, or the hit is behind the ray origin.
    pub fn intersect_triangle(
        &self,
        v0: Point3<f32>,
        v1: Point3<f32>,
        v2: Point3<f32>,
    ) -> Option<(f32, f32, f32)> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = self.direction.cross(edge2);
        let det = edge1.dot(h);

        // Near-zero determinant: ray lies in or parallel to the triangle plane.
        if det > -EPSILON && det < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = self.origin - v0;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * self.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        if t > EPSILON {
            Some((t, u, v))
        } else {
            None
        }
    }

    /// Ray/sphere intersection.
    ///
    /// Returns the smallest positive ray parameter, or `None` when the ray
    /// misses the sphere or the sphere lies entirely behind the origin. A ray
    /// starting inside the sphere hits the far side.
    pub fn intersect_sphere(&self, center: Point3<f32>, radius: f32) -> Option<f32> {
        // Direction is unit length, so the quadratic's `a` coefficient is 1.
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let near = -b - sqrt_disc;
        if near > EPSILON {
            return Some(near);
        }
        let far = -b + sqrt_disc;
        if far > EPSILON {
            return Some(far);
        }
        None
    }
}
