//! Pure orientation helpers shared by camera controllers and gizmos.

use cgmath::{Deg, InnerSpace, Quaternion, Rotation, Rotation3, Vector3};

/// The local X axis (right) of an orientation, in world space.
pub fn local_axis_x(rotation: Quaternion<f32>) -> Vector3<f32> {
    rotation.rotate_vector(Vector3::unit_x())
}

/// The local Y axis (up) of an orientation, in world space.
pub fn local_axis_y(rotation: Quaternion<f32>) -> Vector3<f32> {
    rotation.rotate_vector(Vector3::unit_y())
}

/// The local Z axis of an orientation, in world space.
///
/// Cameras look along -Z, so the forward direction is the negation of this.
pub fn local_axis_z(rotation: Quaternion<f32>) -> Vector3<f32> {
    rotation.rotate_vector(Vector3::unit_z())
}

/// All three local axes (right, up, z) of an orientation, in world space.
pub fn local_axes(rotation: Quaternion<f32>) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
    (
        local_axis_x(rotation),
        local_axis_y(rotation),
        local_axis_z(rotation),
    )
}

/// Builds an orientation from Euler angles in degrees.
///
/// Rotations apply in roll (Z), pitch (X), yaw (Y) order, i.e. the result
/// is `yaw * pitch * roll`.
pub fn quat_from_euler_degrees(pitch: f32, yaw: f32, roll: f32) -> Quaternion<f32> {
    Quaternion::from_angle_y(Deg(yaw))
        * Quaternion::from_angle_x(Deg(pitch))
        * Quaternion::from_angle_z(Deg(roll))
}

/// Extracts the pitch and yaw (in degrees) of an orientation, ignoring roll.
///
/// Derived from the rotated forward vector, so any roll component of the
/// input is discarded. The inverse of [`quat_from_euler_degrees`] for
/// roll-free orientations.
pub fn pitch_yaw_from_rotation(rotation: Quaternion<f32>) -> (f32, f32) {
    let forward = rotation.rotate_vector(-Vector3::unit_z()).normalize();

    let pitch = forward.y.clamp(-1.0, 1.0).asin().to_degrees();
    let yaw = (-forward.x).atan2(-forward.z).to_degrees();
    (pitch, yaw)
}
