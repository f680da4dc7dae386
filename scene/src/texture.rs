use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;

/// Unique identifier for a texture resource, assigned by the scene.
pub type TextureId = u32;

/// An opaque, shareable texture handle.
///
/// Path-based textures defer decoding until the pixels are first needed, so
/// building a scene stays cheap; backends and material UI only pass the id
/// around.
#[derive(Clone)]
pub struct Texture {
    pub id: TextureId,
    source: Option<PathBuf>,
    image: Option<DynamicImage>,
}

impl Texture {
    /// A texture that will be decoded from `path` on first access.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            id: 0,
            source: Some(path.as_ref().to_path_buf()),
            image: None,
        }
    }

    /// A texture from already-decoded pixels.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            id: 0,
            source: None,
            image: Some(image),
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    /// The decoded pixels, loading from the source path on first call.
    ///
    /// A texture with neither pixels nor a source path, or a path that fails
    /// to decode, is unrecoverable and surfaces as an error.
    pub fn image(&mut self) -> Result<&DynamicImage> {
        if self.image.is_none() {
            let path = self
                .source
                .as_ref()
                .context("texture has neither pixel data nor a source path")?;
            let decoded = image::open(path)
                .with_context(|| format!("failed to load texture {}", path.display()))?;
            self.image = Some(decoded);
        }

        // Just populated above if it was empty.
        Ok(self.image.as_ref().unwrap())
    }

    /// Width and height of the decoded pixels, if loaded.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|image| (image.width(), image.height()))
    }
}
