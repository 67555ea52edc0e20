use crate::data::layer::{LayerRole, LayerSprite};
use crate::error::{RenderError, Result};
use crate::rendering::grid::{CELL_HEIGHT, CELL_WIDTH};
use serde::{Deserialize, Deserializer};
use std::num::NonZeroU32;

/// Accepts `true`/`false` as well as the `0`/`1` integers some map documents carry.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        None => false,
    })
}

fn deserialize_cells<'de, D>(deserializer: D) -> std::result::Result<Vec<CellDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CellDescriptor>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDescriptor {
    /// Identifier declared by the map document. Informational only: positions
    /// always come from the cell's index in `cellsData`.
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub layer_ground_num: u32,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub layer_ground_flip: bool,
    #[serde(default)]
    pub layer_ground_rot: u8,
    #[serde(default)]
    pub layer_object1_num: u32,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub layer_object1_flip: bool,
    #[serde(default)]
    pub layer_object1_rot: u8,
    #[serde(default)]
    pub layer_object2_num: u32,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub layer_object2_flip: bool,
}

impl CellDescriptor {
    /// The sprite drawn for `role` at this cell, or `None` when the asset id is 0.
    pub fn layer(&self, role: LayerRole) -> Option<LayerSprite> {
        let sprite = match role {
            LayerRole::Ground => LayerSprite {
                asset_id: self.layer_ground_num,
                flip: self.layer_ground_flip,
                rotation_steps: self.layer_ground_rot,
            },
            LayerRole::Object1 => LayerSprite {
                asset_id: self.layer_object1_num,
                flip: self.layer_object1_flip,
                rotation_steps: self.layer_object1_rot,
            },
            LayerRole::Object2 => LayerSprite {
                asset_id: self.layer_object2_num,
                flip: self.layer_object2_flip,
                rotation_steps: 0,
            },
        };

        (sprite.asset_id > 0).then_some(sprite)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDescriptor {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub background_num: u32,
    #[serde(default, rename = "cellsData", deserialize_with = "deserialize_cells")]
    pub cells: Vec<CellDescriptor>,
}

impl MapDescriptor {
    /// Parse a map document. Anything that is not a map document counts as "no data".
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let map: MapDescriptor = serde_json::from_slice(bytes)
            .map_err(|e| RenderError::DataNotFound(format!("unreadable map document: {}", e)))?;
        map.validate()?;
        Ok(map)
    }

    /// Reject maps that cannot produce an image, before anything is drawn.
    pub fn validate(&self) -> Result<()> {
        if self.cells.is_empty() {
            return Err(RenderError::DataNotFound("map has no cells".to_string()));
        }
        if self.width < 2 || self.height < 2 {
            return Err(RenderError::DataNotFound(format!(
                "map dimensions {}x{} produce an empty image",
                self.width, self.height
            )));
        }
        self.raster_size()?;
        Ok(())
    }

    pub fn cells_per_row(&self) -> Result<NonZeroU32> {
        NonZeroU32::new(self.width)
            .ok_or_else(|| RenderError::DataNotFound("map width is zero".to_string()))
    }

    /// Output image size: one cell narrower and one row shorter than the map.
    pub fn raster_size(&self) -> Result<(u32, u32)> {
        let width = self.width.saturating_sub(1).checked_mul(CELL_WIDTH);
        let height = self.height.saturating_sub(1).checked_mul(CELL_HEIGHT);
        width.zip(height).ok_or_else(|| {
            RenderError::DataNotFound(format!(
                "map dimensions {}x{} exceed the largest image size",
                self.width, self.height
            ))
        })
    }

    pub fn background(&self) -> Option<u32> {
        (self.background_num > 0).then_some(self.background_num)
    }

    /// Cells carrying a sprite for `role`, as (positional index, sprite), ascending.
    pub fn layer_sprites(&self, role: LayerRole) -> impl Iterator<Item = (usize, LayerSprite)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, cell)| cell.layer(role).map(|sprite| (index, sprite)))
    }

    /// Number of cells whose declared id differs from their position in the list.
    pub fn mismatched_cell_ids(&self) -> usize {
        self.cells
            .iter()
            .enumerate()
            .filter(|(index, cell)| matches!(cell.id, Some(id) if id as usize != *index))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": 7411,
        "width": 15,
        "height": 17,
        "backgroundNum": 0,
        "cellsData": [
            {"id": 0, "layerGroundNum": 12, "layerGroundFlip": true, "layerGroundRot": 2,
             "layerObject1Num": 0, "layerObject1Flip": false, "layerObject1Rot": 0,
             "layerObject2Num": 55, "layerObject2Flip": 1, "movement": 4},
            {"id": 1, "layerGroundNum": 0},
            {"id": 5, "layerObject1Num": 3, "layerObject1Rot": 1}
        ]
    }"#;

    #[test]
    fn test_parse_map_document() {
        let map = MapDescriptor::from_json(SAMPLE.as_bytes()).unwrap();
        assert_eq!(map.width, 15);
        assert_eq!(map.height, 17);
        assert_eq!(map.background(), None);
        assert_eq!(map.cells.len(), 3);
        assert_eq!(map.raster_size().unwrap(), (14 * 53, 16 * 27));

        let first = &map.cells[0];
        assert_eq!(
            first.layer(LayerRole::Ground),
            Some(LayerSprite { asset_id: 12, flip: true, rotation_steps: 2 })
        );
        assert_eq!(first.layer(LayerRole::Object1), None);
        assert_eq!(
            first.layer(LayerRole::Object2),
            Some(LayerSprite { asset_id: 55, flip: true, rotation_steps: 0 })
        );
    }

    #[test]
    fn test_layer_sprites_use_positional_index() {
        let map = MapDescriptor::from_json(SAMPLE.as_bytes()).unwrap();
        let object1: Vec<_> = map.layer_sprites(LayerRole::Object1).collect();
        assert_eq!(object1.len(), 1);
        assert_eq!(object1[0].0, 2);
        assert_eq!(object1[0].1.rotation_steps, 1);
        assert_eq!(map.mismatched_cell_ids(), 1);
    }

    #[test]
    fn test_empty_or_missing_cells_is_data_not_found() {
        for doc in [
            r#"{"width": 15, "height": 17, "backgroundNum": 0, "cellsData": []}"#,
            r#"{"width": 15, "height": 17, "cellsData": null}"#,
            r#"{"width": 15, "height": 17}"#,
            r#"{}"#,
            "",
        ] {
            let err = MapDescriptor::from_json(doc.as_bytes()).unwrap_err();
            assert!(matches!(err, RenderError::DataNotFound(_)), "{}: {:?}", doc, err);
        }
    }

    #[test]
    fn test_degenerate_dimensions_rejected() {
        let doc = r#"{"width": 1, "height": 17, "cellsData": [{"layerGroundNum": 1}]}"#;
        let err = MapDescriptor::from_json(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, RenderError::DataNotFound(_)));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        for doc in [
            r#"{"width": 90000000, "height": 2, "cellsData": [{"layerGroundNum": 1}]}"#,
            r#"{"width": 2, "height": 4294967295, "cellsData": [{"layerGroundNum": 1}]}"#,
        ] {
            let err = MapDescriptor::from_json(doc.as_bytes()).unwrap_err();
            assert!(matches!(err, RenderError::DataNotFound(_)), "{}: {:?}", doc, err);
        }

        let map = MapDescriptor {
            width: 90_000_000,
            height: 2,
            background_num: 0,
            cells: vec![CellDescriptor::default()],
        };
        assert!(matches!(map.raster_size(), Err(RenderError::DataNotFound(_))));
    }
}
