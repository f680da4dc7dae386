//! Camera controllers: pointer/wheel input to camera-node transforms.
//!
//! Controllers bind to exactly one camera node at a time and mutate it
//! through the scene; they hold no owning reference, only the node id.

use cgmath::{InnerSpace, Point3, Rotation, Vector3};
use log::debug;

use crate::common::transform_ops::{pitch_yaw_from_rotation, quat_from_euler_degrees};
use crate::input::MouseButton;
use crate::scene::{NodeId, Scene};

/// Which pointer buttons are currently held.
#[derive(Debug, Default, Copy, Clone)]
pub struct MouseButtonStates {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl MouseButtonStates {
    pub fn press(&mut self, button: MouseButton) {
        match button {
            MouseButton::Left => self.left = true,
            MouseButton::Middle => self.middle = true,
            MouseButton::Right => self.right = true,
            MouseButton::Other(_) => {}
        }
    }

    pub fn release(&mut self, button: MouseButton) {
        match button {
            MouseButton::Left => self.left = false,
            MouseButton::Middle => self.middle = false,
            MouseButton::Right => self.right = false,
            MouseButton::Other(_) => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Common capability set of all camera controllers.
pub trait CameraController {
    /// Binds the controller to a camera node, deriving whatever internal
    /// state it needs from the camera's current transform.
    fn set_camera(&mut self, scene: &mut Scene, camera: NodeId);

    fn camera(&self) -> Option<NodeId>;

    fn on_mouse_down(&mut self, button: MouseButton);

    fn on_mouse_up(&mut self, button: MouseButton);

    /// Pointer moved by (dx, dy) pixels since the last event.
    fn on_mouse_move(&mut self, scene: &mut Scene, dx: f32, dy: f32);

    /// Wheel scrolled by `delta` notches (positive away from the user).
    fn on_mouse_wheel(&mut self, scene: &mut Scene, delta: f32);

    /// Clears held-button state, e.g. when the pointer leaves the viewport.
    fn reset_mouse_states(&mut self);
}

// ============================================================================
// Free/editor controller
// ============================================================================

/// First-person style controller for the editor camera.
///
/// Tracks button state on the common input hooks; orientation and movement
/// changes happen through the explicit [`EditorCameraController::look`] and
/// [`EditorCameraController::translate_local`] calls so the host can map
/// them onto its own key bindings.
pub struct EditorCameraController {
    camera: Option<NodeId>,
    buttons: MouseButtonStates,
    look_speed: f32,
    linear_speed: f32,
    yaw: f32,
    pitch: f32,
}

impl EditorCameraController {
    pub fn new() -> Self {
        Self {
            camera: None,
            buttons: MouseButtonStates::default(),
            look_speed: 0.2,
            linear_speed: 0.1,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn look_speed(&self) -> f32 {
        self.look_speed
    }

    pub fn set_look_speed(&mut self, speed: f32) {
        self.look_speed = speed;
    }

    pub fn linear_speed(&self) -> f32 {
        self.linear_speed
    }

    pub fn set_linear_speed(&mut self, speed: f32) {
        self.linear_speed = speed;
    }

    pub fn buttons(&self) -> MouseButtonStates {
        self.buttons
    }

    /// Turns the camera by (dx, dy) pixels of look input.
    pub fn look(&mut self, scene: &mut Scene, dx: f32, dy: f32) {
        let Some(camera) = self.camera else {
            return;
        };
        self.yaw -= dx * self.look_speed;
        self.pitch -= dy * self.look_speed;
        self.pitch = self.pitch.clamp(-89.0, 89.0);

        if let Some(node) = scene.node_mut(camera) {
            node.set_rotation(quat_from_euler_degrees(self.pitch, self.yaw, 0.0));
        }
    }

    /// Moves the camera along its own axes, scaled by the linear speed.
    pub fn translate_local(&mut self, scene: &mut Scene, offset: Vector3<f32>) {
        let Some(camera) = self.camera else {
            return;
        };
        if let Some(node) = scene.node_mut(camera) {
            let world_offset = node.rotation().rotate_vector(offset) * self.linear_speed;
            node.translate(world_offset);
        }
    }
}

impl Default for EditorCameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController for EditorCameraController {
    fn set_camera(&mut self, scene: &mut Scene, camera: NodeId) {
        self.camera = Some(camera);
        if let Some(node) = scene.node(camera) {
            let (pitch, yaw) = pitch_yaw_from_rotation(node.rotation());
            self.pitch = pitch;
            self.yaw = yaw;
        }
    }

    fn camera(&self) -> Option<NodeId> {
        self.camera
    }

    fn on_mouse_down(&mut self, button: MouseButton) {
        self.buttons.press(button);
    }

    fn on_mouse_up(&mut self, button: MouseButton) {
        self.buttons.release(button);
    }

    fn on_mouse_move(&mut self, _scene: &mut Scene, _dx: f32, _dy: f32) {
        // Button state only; look input is routed through `look` explicitly.
    }

    fn on_mouse_wheel(&mut self, _scene: &mut Scene, _delta: f32) {}

    fn reset_mouse_states(&mut self) {
        self.buttons.reset();
    }
}

// ============================================================================
// Orbital controller
// ============================================================================

/// Default distance from the pivot when binding to a camera.
const DEFAULT_PIVOT_DISTANCE: f32 = 15.0;
/// Pixels of pointer movement per degree of orbit.
const ORBIT_PIXELS_PER_DEGREE: f32 = 10.0;
/// Pivot pan distance per pixel of middle-button drag.
const PAN_DRAG_SPEED: f32 = 0.01;
/// Distance change per wheel notch.
const ZOOM_SPEED: f32 = 0.01;

/// Arc-ball controller: the camera orbits a pivot point at a set distance.
pub struct OrbitalCameraController {
    camera: Option<NodeId>,
    buttons: MouseButtonStates,
    pivot: Point3<f32>,
    dist_from_pivot: f32,
    /// Orbit angles in degrees.
    yaw: f32,
    pitch: f32,
}

impl OrbitalCameraController {
    pub fn new() -> Self {
        Self {
            camera: None,
            buttons: MouseButtonStates::default(),
            pivot: Point3::new(0.0, 0.0, 0.0),
            dist_from_pivot: DEFAULT_PIVOT_DISTANCE,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn pivot(&self) -> Point3<f32> {
        self.pivot
    }

    pub fn distance_from_pivot(&self) -> f32 {
        self.dist_from_pivot
    }

    pub fn buttons(&self) -> MouseButtonStates {
        self.buttons
    }

    /// Writes the orbit state back to the camera node:
    /// position = pivot + rotation × (0, 0, distance), rotation from
    /// (pitch, yaw) with no roll.
    fn update_camera_transform(&self, scene: &mut Scene) {
        let Some(camera) = self.camera else {
            return;
        };
        let Some(node) = scene.node_mut(camera) else {
            debug!("orbital controller camera {} no longer exists", camera);
            return;
        };

        let rotation = quat_from_euler_degrees(self.pitch, self.yaw, 0.0);
        let offset = rotation.rotate_vector(Vector3::unit_z()) * self.dist_from_pivot;
        node.set_position(self.pivot + offset);
        node.set_rotation(rotation);
    }
}

impl Default for OrbitalCameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController for OrbitalCameraController {
    /// Derives the pivot from the camera's forward vector at the default
    /// distance, and the orbit angles from its rotation (roll is discarded).
    fn set_camera(&mut self, scene: &mut Scene, camera: NodeId) {
        self.camera = Some(camera);

        let Some(node) = scene.node(camera) else {
            return;
        };
        let position = node.position();
        let rotation = node.rotation();

        let forward = rotation.rotate_vector(-Vector3::unit_z()).normalize();
        self.pivot = position + forward * self.dist_from_pivot;

        let (pitch, yaw) = pitch_yaw_from_rotation(rotation);
        self.pitch = pitch;
        self.yaw = yaw;

        self.update_camera_transform(scene);
    }

    fn camera(&self) -> Option<NodeId> {
        self.camera
    }

    fn on_mouse_down(&mut self, button: MouseButton) {
        self.buttons.press(button);
    }

    fn on_mouse_up(&mut self, button: MouseButton) {
        self.buttons.release(button);
    }

    fn on_mouse_move(&mut self, scene: &mut Scene, dx: f32, dy: f32) {
        if self.buttons.right {
            self.yaw += dx / ORBIT_PIXELS_PER_DEGREE;
            self.pitch += dy / ORBIT_PIXELS_PER_DEGREE;
        }

        if self.buttons.middle {
            // Pan the pivot in the camera's local XY plane.
            let rotation = quat_from_euler_degrees(self.pitch, self.yaw, 0.0);
            let offset = rotation.rotate_vector(Vector3::new(
                dx * PAN_DRAG_SPEED,
                -dy * PAN_DRAG_SPEED,
                0.0,
            ));
            self.pivot += offset;
        }

        self.update_camera_transform(scene);
    }

    fn on_mouse_wheel(&mut self, scene: &mut Scene, delta: f32) {
        self.dist_from_pivot -= delta * ZOOM_SPEED;
        if self.dist_from_pivot < 0.0 {
            self.dist_from_pivot = 0.0;
        }
        self.update_camera_transform(scene);
    }

    fn reset_mouse_states(&mut self) {
        self.buttons.reset();
    }
}
