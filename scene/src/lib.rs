pub use prism_common as common;

pub mod camera;
pub mod device;
pub mod environment;
pub mod error;
pub mod light;
pub mod material;
pub mod mesh;
pub mod node;
pub mod scene;
pub mod texture;
pub mod tree;

pub use camera::{CameraData, CameraUniform};
pub use device::{RecordingDevice, RenderCommand, RenderDevice};
pub use environment::Environment;
pub use error::SceneError;
pub use light::{LightType, LightUniform, LightsArrayUniform, MAX_LIGHTS};
pub use material::{
    ColorMaterial, DefaultMaterial, Material, MaterialId, MaterialKind, TextureSlots,
    DEFAULT_MATERIAL_ID,
};
pub use mesh::{Mesh, MeshHit, MeshId, Vertex};
pub use node::{LightNode, MeshNode, Node, NodeId, NodeKind};
pub use scene::Scene;
pub use texture::{Texture, TextureId};
pub use tree::TreeVisitor;
