use cgmath::{Matrix4, Point3};

use crate::ray::Ray;
use crate::EPSILON;

/// An axis-aligned bounding box.
#[derive(Debug, Copy, Clone)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all of `points`; `None` for an empty slice.
    pub fn from_points(points: &[Point3<f32>]) -> Option<Self> {
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;

        for point in &points[1..] {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            min.z = min.z.min(point.z);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
            max.z = max.z.max(point.z);
        }

        Some(Self { min, max })
    }

    /// The eight corner points of the box.
    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (min, max) = (self.min, self.max);
        [
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(min.x, max.y, max.z),
            Point3::new(max.x, max.y, max.z),
        ]
    }

    /// Transforms the box by a matrix.
    ///
    /// All eight corners are transformed and re-bounded, so the result stays
    /// axis-aligned under rotation (and grows accordingly).
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners: Vec<Point3<f32>> = self
            .corners()
            .iter()
            .map(|corner| Point3::from_homogeneous(matrix * corner.to_homogeneous()))
            .collect();

        // Eight corners in, so from_points cannot fail.
        Self::from_points(&corners).unwrap()
    }

    /// Smallest box containing both boxes.
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Slab-method ray/box test.
    ///
    /// Returns the entry parameter, `Some(0.0)` when the origin is inside,
    /// or `None` when the ray misses or the box is behind the origin.
    pub fn intersects_ray(&self, ray: &Ray) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        let origins = [ray.origin.x, ray.origin.y, ray.origin.z];
        let dirs = [ray.direction.x, ray.direction.y, ray.direction.z];
        let mins = [self.min.x, self.min.y, self.min.z];
        let maxs = [self.max.x, self.max.y, self.max.z];

        for axis in 0..3 {
            if dirs[axis].abs() < EPSILON {
                // Parallel to this slab: must already be between the planes.
                if origins[axis] < mins[axis] || origins[axis] > maxs[axis] {
                    return None;
                }
            } else {
                let inv = 1.0 / dirs[axis];
                let mut t1 = (mins[axis] - origins[axis]) * inv;
                let mut t2 = (maxs[axis] - origins[axis]) * inv;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                tmin = tmin.max(t1);
                tmax = tmax.min(t2);
                if tmin > tmax {
                    return None;
                }
            }
        }

        if tmin >= 0.0 {
            Some(tmin)
        } else if tmax >= 0.0 {
            Some(0.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Rad, Vector3};

    fn unit_box() -> Aabb {
        Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_from_points() {
        let bounds = Aabb::from_points(&[
            Point3::new(1.0, -2.0, 3.0),
            Point3::new(-1.0, 5.0, 0.0),
            Point3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();

        assert_eq!(bounds.min, Point3::new(-1.0, -2.0, -4.0));
        assert_eq!(bounds.max, Point3::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_merge() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(-2.0, 0.5, 0.0), Point3::new(0.0, 3.0, 0.5));
        let merged = a.merge(&b);

        assert_eq!(merged.min, Point3::new(-2.0, 0.0, 0.0));
        assert_eq!(merged.max, Point3::new(1.0, 3.0, 1.0));
    }

    #[test]
    fn test_transform_rotation_grows_bounds() {
        let bounds = unit_box();
        let rotated = bounds.transform(&Matrix4::from_angle_z(Rad(std::f32::consts::FRAC_PI_4)));

        // A rotated cube's AABB expands to sqrt(2) in the rotation plane.
        assert!((rotated.max.x - 2.0_f32.sqrt()).abs() < 0.001);
        assert!((rotated.max.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_hit() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let t = unit_box().intersects_ray(&ray).unwrap();
        assert!((t - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_miss() {
        let ray = Ray::new(Point3::new(0.0, 3.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(unit_box().intersects_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_origin_inside() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(unit_box().intersects_ray(&ray), Some(0.0));
    }

    #[test]
    fn test_ray_box_behind() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(unit_box().intersects_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_parallel_slab_inside() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(unit_box().intersects_ray(&ray).is_some());
    }
}
