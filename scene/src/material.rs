use bitflags::bitflags;

use crate::common::RgbaColor;
use crate::device::RenderDevice;
use crate::texture::TextureId;

/// The id of the fallback material every scene owns.
///
/// Lives at a sentinel id (`u32::MAX`) so it can never collide with
/// sequentially assigned user materials. Mesh nodes without a material are
/// drawn with it; its magenta face color makes unassigned surfaces obvious.
pub const DEFAULT_MATERIAL_ID: MaterialId = u32::MAX;

/// Unique identifier for a material resource, assigned by the scene.
pub type MaterialId = u32;

bitflags! {
    /// Which optional texture slots a [`DefaultMaterial`] has active.
    ///
    /// Mirrors the per-slot `use*Tex` shader uniforms: a backend binds only
    /// the textures whose flag is set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureSlots: u32 {
        const DIFFUSE = 1 << 0;
        const SPECULAR = 1 << 1;
        const NORMAL = 1 << 2;
        const REFLECTION = 1 << 3;
    }
}

/// Unlit flat-color shading state.
#[derive(Debug, Clone)]
pub struct ColorMaterial {
    color: RgbaColor,
}

impl ColorMaterial {
    pub fn new(color: RgbaColor) -> Self {
        Self { color }
    }

    pub fn color(&self) -> RgbaColor {
        self.color
    }

    pub fn set_color(&mut self, color: RgbaColor) {
        self.color = color;
    }
}

/// Lit shading state with optional texture slots.
///
/// Scalar parameters apply whether or not the corresponding texture slot is
/// active; textures modulate them.
#[derive(Debug, Clone)]
pub struct DefaultMaterial {
    diffuse_color: RgbaColor,
    ambient_color: RgbaColor,
    specular_color: RgbaColor,
    shininess: f32,
    texture_scale: f32,
    normal_intensity: f32,
    reflection_influence: f32,

    diffuse_texture: Option<TextureId>,
    specular_texture: Option<TextureId>,
    normal_texture: Option<TextureId>,
    reflection_texture: Option<TextureId>,
    slots: TextureSlots,
}

impl DefaultMaterial {
    pub fn new() -> Self {
        Self {
            diffuse_color: RgbaColor::WHITE,
            ambient_color: RgbaColor::BLACK,
            specular_color: RgbaColor::from_rgb8(200, 200, 200),
            shininess: 100.0,
            texture_scale: 1.0,
            normal_intensity: 1.0,
            reflection_influence: 0.0,
            diffuse_texture: None,
            specular_texture: None,
            normal_texture: None,
            reflection_texture: None,
            slots: TextureSlots::empty(),
        }
    }

    // ========== Scalar parameters ==========

    pub fn diffuse_color(&self) -> RgbaColor {
        self.diffuse_color
    }

    pub fn set_diffuse_color(&mut self, color: RgbaColor) {
        self.diffuse_color = color;
    }

    pub fn ambient_color(&self) -> RgbaColor {
        self.ambient_color
    }

    pub fn set_ambient_color(&mut self, color: RgbaColor) {
        self.ambient_color = color;
    }

    pub fn specular_color(&self) -> RgbaColor {
        self.specular_color
    }

    pub fn set_specular_color(&mut self, color: RgbaColor) {
        self.specular_color = color;
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn set_shininess(&mut self, shininess: f32) {
        self.shininess = shininess;
    }

    pub fn texture_scale(&self) -> f32 {
        self.texture_scale
    }

    pub fn set_texture_scale(&mut self, scale: f32) {
        self.texture_scale = scale;
    }

    pub fn normal_intensity(&self) -> f32 {
        self.normal_intensity
    }

    pub fn set_normal_intensity(&mut self, intensity: f32) {
        self.normal_intensity = intensity;
    }

    pub fn reflection_influence(&self) -> f32 {
        self.reflection_influence
    }

    pub fn set_reflection_influence(&mut self, influence: f32) {
        self.reflection_influence = influence;
    }

    // ========== Texture slots ==========

    pub fn diffuse_texture(&self) -> Option<TextureId> {
        self.diffuse_texture
    }

    pub fn set_diffuse_texture(&mut self, texture: Option<TextureId>) {
        self.diffuse_texture = texture;
        self.slots.set(TextureSlots::DIFFUSE, texture.is_some());
    }

    pub fn specular_texture(&self) -> Option<TextureId> {
        self.specular_texture
    }

    pub fn set_specular_texture(&mut self, texture: Option<TextureId>) {
        self.specular_texture = texture;
        self.slots.set(TextureSlots::SPECULAR, texture.is_some());
    }

    pub fn normal_texture(&self) -> Option<TextureId> {
        self.normal_texture
    }

    pub fn set_normal_texture(&mut self, texture: Option<TextureId>) {
        self.normal_texture = texture;
        self.slots.set(TextureSlots::NORMAL, texture.is_some());
    }

    pub fn reflection_texture(&self) -> Option<TextureId> {
        self.reflection_texture
    }

    pub fn set_reflection_texture(&mut self, texture: Option<TextureId>) {
        self.reflection_texture = texture;
        self.slots.set(TextureSlots::REFLECTION, texture.is_some());
    }

    /// The set of active texture slots.
    pub fn active_slots(&self) -> TextureSlots {
        self.slots
    }

    /// Active (slot, texture) pairs, in slot order, for backend binding.
    pub fn texture_bindings(&self) -> Vec<(TextureSlots, TextureId)> {
        [
            (TextureSlots::DIFFUSE, self.diffuse_texture),
            (TextureSlots::SPECULAR, self.specular_texture),
            (TextureSlots::NORMAL, self.normal_texture),
            (TextureSlots::REFLECTION, self.reflection_texture),
        ]
        .into_iter()
        .filter_map(|(slot, texture)| texture.map(|id| (slot, id)))
        .collect()
    }
}

impl Default for DefaultMaterial {
    fn default() -> Self {
        Self::new()
    }
}

/// Shading-state variant.
#[derive(Debug, Clone)]
pub enum MaterialKind {
    Color(ColorMaterial),
    Default(DefaultMaterial),
}

/// A material resource: an id plus variant shading state.
///
/// Materials expose a begin/end bracket around each draw: `begin` hands the
/// material to the device so it can bind shader state and textures, `end`
/// closes the bracket.
#[derive(Debug, Clone)]
pub struct Material {
    pub id: MaterialId,
    kind: MaterialKind,
}

impl Material {
    /// A flat-color material.
    pub fn color(color: RgbaColor) -> Self {
        Self {
            id: 0,
            kind: MaterialKind::Color(ColorMaterial::new(color)),
        }
    }

    /// A lit material with default parameters.
    pub fn standard() -> Self {
        Self {
            id: 0,
            kind: MaterialKind::Default(DefaultMaterial::new()),
        }
    }

    pub fn kind(&self) -> &MaterialKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut MaterialKind {
        &mut self.kind
    }

    pub fn as_color(&self) -> Option<&ColorMaterial> {
        match &self.kind {
            MaterialKind::Color(color) => Some(color),
            _ => None,
        }
    }

    pub fn as_color_mut(&mut self) -> Option<&mut ColorMaterial> {
        match &mut self.kind {
            MaterialKind::Color(color) => Some(color),
            _ => None,
        }
    }

    pub fn as_default(&self) -> Option<&DefaultMaterial> {
        match &self.kind {
            MaterialKind::Default(default) => Some(default),
            _ => None,
        }
    }

    pub fn as_default_mut(&mut self) -> Option<&mut DefaultMaterial> {
        match &mut self.kind {
            MaterialKind::Default(default) => Some(default),
            _ => None,
        }
    }

    /// Binds this material's shader state and textures for the next draw.
    pub fn begin(&self, device: &mut dyn RenderDevice) {
        device.bind_material(self);
    }

    /// Closes the begin/end bracket.
    ///
    /// Placeholder: state is currently overwritten by the next `begin`, so
    /// there is nothing to unbind yet.
    pub fn end(&self, _device: &mut dyn RenderDevice) {}
}
