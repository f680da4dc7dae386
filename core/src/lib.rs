pub use prism_common as common;
pub use prism_scene as scene;

pub mod camera_controller;
pub mod gizmo;
pub mod input;
pub mod logging;
pub mod picking;
pub mod renderer;
pub mod selection;
pub mod viewport;

pub use camera_controller::{
    CameraController, EditorCameraController, MouseButtonStates, OrbitalCameraController,
};
pub use gizmo::{GizmoAxis, TranslationGizmo};
pub use input::{ElementState, MouseButton, MouseScrollDelta};
pub use picking::{pick, pick_nodes_with_ray, pick_with_ray, PickResult, MAX_PICK_DISTANCE};
pub use renderer::ForwardRenderer;
pub use selection::SelectionManager;
pub use viewport::{CameraMode, EditorViewport, SelectionEvent};
