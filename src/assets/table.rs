use crate::data::{LayerKind, Origin, SpriteOrigins};
use crate::error::{RenderError, Result};
use image::RgbaImage;
use std::collections::HashMap;

/// Every image and origin a render needs, resolved before the first draw.
#[derive(Debug)]
pub struct AssetTable {
    background: Option<RgbaImage>,
    ground_origins: SpriteOrigins,
    object_origins: SpriteOrigins,
    images: HashMap<(LayerKind, u32), RgbaImage>,
}

impl AssetTable {
    pub fn new(ground_origins: SpriteOrigins, object_origins: SpriteOrigins) -> Self {
        Self {
            background: None,
            ground_origins,
            object_origins,
            images: HashMap::new(),
        }
    }

    pub fn with_background(mut self, image: RgbaImage) -> Self {
        self.background = Some(image);
        self
    }

    pub fn insert_image(&mut self, kind: LayerKind, asset_id: u32, image: RgbaImage) {
        self.images.insert((kind, asset_id), image);
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn origins(&self, kind: LayerKind) -> &SpriteOrigins {
        match kind {
            LayerKind::Ground => &self.ground_origins,
            LayerKind::Object => &self.object_origins,
        }
    }

    /// Image and origin for a sprite; a miss aborts the render.
    pub fn sprite(&self, kind: LayerKind, asset_id: u32) -> Result<(&RgbaImage, Origin)> {
        let origin = self.origins(kind).origin(asset_id)?;
        let image = self
            .images
            .get(&(kind, asset_id))
            .ok_or_else(|| RenderError::asset(kind, asset_id, "image was not resolved"))?;
        Ok((image, origin))
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}
