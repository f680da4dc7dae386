use crate::common::RgbaColor;
use crate::material::MaterialId;
use crate::mesh::MeshId;
use crate::texture::TextureId;

/// Default backdrop resources owned by the scene.
///
/// The sky mesh and its material are created with the scene; the sky
/// texture is supplied by the host's resource loader when one is available.
/// Until then the flat sky material over the clear color is the fallback
/// for empty backgrounds.
#[derive(Debug, Clone)]
pub struct Environment {
    pub sky_mesh: MeshId,
    pub sky_material: MaterialId,
    pub sky_texture: Option<TextureId>,
    pub clear_color: RgbaColor,
}

impl Environment {
    pub fn new(sky_mesh: MeshId, sky_material: MaterialId) -> Self {
        Self {
            sky_mesh,
            sky_material,
            sky_texture: None,
            clear_color: RgbaColor::new(0.3, 0.3, 0.3, 1.0),
        }
    }
}
