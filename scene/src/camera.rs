use cgmath::{
    perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3, Vector4,
};

use crate::common::{Ray, EPSILON};

/// Camera parameters and derived matrices carried by a Camera-kind node.
///
/// The view and projection matrices are valid only after
/// [`CameraData::update_matrices`] ran against the node's current world
/// transform. `Scene::update` refreshes the active camera every frame, and
/// picking forces a refresh before building a ray, because pointer input can
/// arrive between frames at a camera position the last render never saw.
#[derive(Debug, Clone)]
pub struct CameraData {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,

    view: Matrix4<f32>,
    projection: Matrix4<f32>,
}

impl CameraData {
    pub fn new() -> Self {
        Self {
            fovy: 45.0,
            aspect: 1.0,
            znear: 0.1,
            zfar: 1000.0,
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
        }
    }

    /// Recomputes view and projection from the camera node's world transform.
    ///
    /// The view matrix is the inverse of the world transform; a degenerate
    /// (non-invertible) transform leaves the view at identity.
    pub fn update_matrices(&mut self, world: &Matrix4<f32>) {
        self.view = world.invert().unwrap_or_else(Matrix4::identity);
        self.projection = perspective(
            Deg(self.fovy),
            self.aspect.max(EPSILON),
            self.znear,
            self.zfar,
        );
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    /// Converts a screen-space point into a world-space ray.
    ///
    /// The point goes through normalized device coordinates, then the inverse
    /// projection into eye space, then the inverse view into world space. The
    /// ray originates at the camera's world position. Returns `None` when a
    /// matrix is not invertible (degenerate camera transform).
    ///
    /// Screen coordinates are pixels with the origin at the top-left;
    /// NDC is the usual [-1, 1] with Y up.
    pub fn screen_to_ray(
        &self,
        screen_x: f32,
        screen_y: f32,
        width: u32,
        height: u32,
    ) -> Option<Ray> {
        let ndc_x = (screen_x / width.max(1) as f32) * 2.0 - 1.0;
        let ndc_y = 1.0 - (screen_y / height.max(1) as f32) * 2.0;

        let inv_projection = self.projection.invert()?;
        let inv_view = self.view.invert()?;

        // Unproject onto the near plane in eye space; the w-divide restores
        // the perspective depth.
        let near = inv_projection * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        if near.w.abs() < EPSILON {
            return None;
        }
        let eye_dir = Vector3::new(near.x / near.w, near.y / near.w, near.z / near.w);

        let direction = (inv_view * eye_dir.extend(0.0)).truncate();
        if direction.magnitude2() < EPSILON {
            return None;
        }
        let origin = Point3::from_vec(inv_view.w.truncate());

        Some(Ray::new(origin, direction))
    }
}

impl Default for CameraData {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU uniform layout for the camera: one combined view-projection matrix.
///
/// `#[repr(C)]` + `Pod` for direct upload into a 64-byte uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn from_camera(camera: &CameraData) -> Self {
        Self {
            view_proj: (camera.projection_matrix() * camera.view_matrix()).into(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
