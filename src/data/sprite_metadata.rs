use crate::data::layer::LayerKind;
use crate::error::{RenderError, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Anchor of a sprite, added to the cell's pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
struct MetadataDocument {
    sprites: HashMap<String, Origin>,
}

/// Immutable origin table for one asset namespace.
#[derive(Debug, Clone)]
pub struct SpriteOrigins {
    kind: LayerKind,
    origins: HashMap<u32, Origin>,
}

impl SpriteOrigins {
    pub fn new(kind: LayerKind, origins: HashMap<u32, Origin>) -> Self {
        Self { kind, origins }
    }

    /// Parse a `{"sprites": {"<id>": {"x": .., "y": ..}}}` metadata document
    pub fn from_json(kind: LayerKind, bytes: &[u8]) -> Result<Self> {
        let doc: MetadataDocument = serde_json::from_slice(bytes)
            .map_err(|e| RenderError::asset(kind, 0, format!("unreadable {} metadata: {}", kind, e)))?;

        let origins = doc
            .sprites
            .into_iter()
            .map(|(key, origin)| {
                key.parse::<u32>()
                    .map(|id| (id, origin))
                    .map_err(|_| RenderError::asset(kind, 0, format!("invalid sprite key {:?} in metadata", key)))
            })
            .collect::<Result<HashMap<u32, Origin>>>()?;

        log::info!("Loaded {} {} sprite origins", origins.len(), kind);

        Ok(Self { kind, origins })
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Id 0 means "no sprite" and never resolves.
    pub fn origin(&self, asset_id: u32) -> Result<Origin> {
        if asset_id == 0 {
            return Err(RenderError::asset(self.kind, asset_id, "id 0 is not a sprite"));
        }
        self.origins
            .get(&asset_id)
            .copied()
            .ok_or_else(|| RenderError::asset(self.kind, asset_id, "no origin in sprite metadata"))
    }
}
