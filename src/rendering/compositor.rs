use crate::assets::AssetTable;
use crate::data::{LayerKind, LayerRole, MapDescriptor};
use crate::error::{RenderError, Result};
use crate::rendering::grid::{cell_pixel, project};
use crate::rendering::transform::{prepare, DrawTransform};
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::num::NonZeroU32;

/// Compositing stages, strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    BackgroundDrawn,
    GroundPassDone,
    Object1PassDone,
    Object2PassDone,
    Finalized,
}

impl Stage {
    fn after(role: LayerRole) -> Self {
        match role {
            LayerRole::Ground => Stage::GroundPassDone,
            LayerRole::Object1 => Stage::Object1PassDone,
            LayerRole::Object2 => Stage::Object2PassDone,
        }
    }
}

/// Draws a map into a single raster it owns for the whole render.
pub struct LayerCompositor<'a> {
    map: &'a MapDescriptor,
    assets: &'a AssetTable,
    cells_per_row: NonZeroU32,
    raster: RgbaImage,
    stage: Stage,
}

impl<'a> LayerCompositor<'a> {
    pub fn new(map: &'a MapDescriptor, assets: &'a AssetTable) -> Result<Self> {
        map.validate()?;
        let cells_per_row = map.cells_per_row()?;
        let (width, height) = map.raster_size()?;

        Ok(Self {
            map,
            assets,
            cells_per_row,
            raster: RgbaImage::new(width, height),
            stage: Stage::Init,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage {:?} after {:?}", next, self.stage);
        log::debug!("Compositor stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    /// Stretch the background over the whole raster
    fn draw_background(&mut self) -> Result<()> {
        let assets = self.assets;
        if let Some(asset_id) = self.map.background() {
            let background = assets
                .background()
                .ok_or_else(|| RenderError::asset(LayerKind::Ground, asset_id, "background image was not resolved"))?;
            let (width, height) = self.raster.dimensions();
            let stretched = imageops::resize(background, width, height, FilterType::Triangle);
            imageops::overlay(&mut self.raster, &stretched, 0, 0);
        }
        self.advance(Stage::BackgroundDrawn);
        Ok(())
    }

    /// Draw every cell's sprite for one layer, by ascending cell index.
    fn draw_pass(&mut self, role: LayerRole) -> Result<usize> {
        let (map, assets) = (self.map, self.assets);
        let kind = role.kind();
        let mut drawn = 0;

        for (index, sprite) in map.layer_sprites(role) {
            let (image, origin) = assets.sprite(kind, sprite.asset_id)?;
            let base = cell_pixel(project(index, self.cells_per_row));
            let transform = DrawTransform::new(base, origin, sprite, role);
            let prepared = prepare(image, &transform);
            imageops::overlay(&mut self.raster, prepared.image.as_ref(), prepared.x, prepared.y);
            drawn += 1;
        }

        log::info!("Drew {} {} sprites", drawn, role);
        self.advance(Stage::after(role));
        Ok(drawn)
    }

    /// Run background, ground, object-1 and object-2 in order and freeze the result.
    pub fn render(mut self) -> Result<FinishedRaster> {
        self.draw_background()?;
        for role in LayerRole::DRAW_ORDER {
            self.draw_pass(role)?;
        }
        self.advance(Stage::Finalized);

        Ok(FinishedRaster { image: self.raster })
    }
}

/// A fully composited raster. No further drawing is possible.
#[derive(Debug)]
pub struct FinishedRaster {
    image: RgbaImage,
}

impl FinishedRaster {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CellDescriptor, Origin, SpriteOrigins};
    use image::Rgba;
    use std::collections::HashMap;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn map(width: u32, height: u32, background_num: u32, cells: Vec<CellDescriptor>) -> MapDescriptor {
        MapDescriptor { width, height, background_num, cells }
    }

    fn origins(kind: LayerKind, entries: &[(u32, f64, f64)]) -> SpriteOrigins {
        SpriteOrigins::new(
            kind,
            entries.iter().map(|&(id, x, y)| (id, Origin { x, y })).collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn test_single_ground_sprite_end_to_end() {
        let map = map(
            2,
            2,
            0,
            vec![CellDescriptor { layer_ground_num: 7, ..Default::default() }],
        );

        let mut assets = AssetTable::new(origins(LayerKind::Ground, &[(7, 4.0, 2.0)]), origins(LayerKind::Object, &[]));
        assets.insert_image(LayerKind::Ground, 7, RgbaImage::from_pixel(5, 3, RED));

        let raster = LayerCompositor::new(&map, &assets).unwrap().render().unwrap();
        assert_eq!(raster.dimensions(), (53, 27));

        let img = raster.image();
        assert_eq!(*img.get_pixel(4, 2), RED);
        assert_eq!(*img.get_pixel(8, 4), RED);
        assert_eq!(img.get_pixel(3, 2)[3], 0);
        assert_eq!(img.get_pixel(9, 2)[3], 0);
        assert_eq!(img.get_pixel(4, 5)[3], 0);
    }

    #[test]
    fn test_later_layers_occlude_earlier_ones() {
        let map = map(
            3,
            3,
            0,
            vec![CellDescriptor {
                layer_ground_num: 1,
                layer_object1_num: 1,
                layer_object2_num: 2,
                ..Default::default()
            }],
        );

        let mut assets = AssetTable::new(
            origins(LayerKind::Ground, &[(1, 0.0, 0.0)]),
            origins(LayerKind::Object, &[(1, 0.0, 0.0), (2, 0.0, 0.0)]),
        );
        // ground and object ids collide but are separate sprites
        assets.insert_image(LayerKind::Ground, 1, RgbaImage::from_pixel(10, 10, RED));
        assets.insert_image(LayerKind::Object, 1, RgbaImage::from_pixel(10, 10, GREEN));
        assets.insert_image(LayerKind::Object, 2, RgbaImage::from_pixel(4, 4, BLUE));

        let raster = LayerCompositor::new(&map, &assets).unwrap().render().unwrap();
        let img = raster.image();
        assert_eq!(*img.get_pixel(1, 1), BLUE);
        assert_eq!(*img.get_pixel(6, 6), GREEN);
    }

    #[test]
    fn test_flipped_marker_lands_in_mirrored_column() {
        // cell 1 of a 3-wide map sits at x = 53
        let mut marker = RgbaImage::new(5, 1);
        marker.put_pixel(1, 0, WHITE);

        let cells = vec![
            CellDescriptor::default(),
            CellDescriptor { layer_object2_num: 9, layer_object2_flip: true, ..Default::default() },
        ];
        let map = map(3, 2, 0, cells);
        let mut assets = AssetTable::new(origins(LayerKind::Ground, &[]), origins(LayerKind::Object, &[(9, 0.0, 0.0)]));
        assets.insert_image(LayerKind::Object, 9, marker);

        let raster = LayerCompositor::new(&map, &assets).unwrap().render().unwrap();
        let img = raster.image();
        // unflipped the marker would be at 53 + 1; mirrored it is at 53 + 5 - 1 - 1
        assert_eq!(*img.get_pixel(56, 0), WHITE);
        assert_eq!(img.get_pixel(54, 0)[3], 0);
    }

    #[test]
    fn test_odd_row_sprite_is_staggered() {
        // index 2 of a 2-wide map is the first cell of row 1
        let cells = vec![
            CellDescriptor::default(),
            CellDescriptor::default(),
            CellDescriptor { layer_ground_num: 3, ..Default::default() },
        ];
        let map = map(2, 3, 0, cells);
        let mut assets = AssetTable::new(origins(LayerKind::Ground, &[(3, 0.0, 0.0)]), origins(LayerKind::Object, &[]));
        assets.insert_image(LayerKind::Ground, 3, RgbaImage::from_pixel(1, 1, RED));

        let raster = LayerCompositor::new(&map, &assets).unwrap().render().unwrap();
        // (26.5, 13.5) snaps to (26, 13)
        assert_eq!(*raster.image().get_pixel(26, 13), RED);
    }

    #[test]
    fn test_background_fills_raster_under_sprites() {
        let map = map(
            3,
            2,
            4,
            vec![CellDescriptor { layer_ground_num: 1, ..Default::default() }],
        );
        let mut assets = AssetTable::new(origins(LayerKind::Ground, &[(1, 0.0, 0.0)]), origins(LayerKind::Object, &[]))
            .with_background(RgbaImage::from_pixel(8, 8, GREEN));
        assets.insert_image(LayerKind::Ground, 1, RgbaImage::from_pixel(2, 2, RED));

        let raster = LayerCompositor::new(&map, &assets).unwrap().render().unwrap();
        let img = raster.image();
        assert_eq!(img.dimensions(), (106, 27));
        assert_eq!(*img.get_pixel(0, 0), RED);
        assert_eq!(*img.get_pixel(105, 26), GREEN);
        assert_eq!(*img.get_pixel(50, 10), GREEN);
    }

    #[test]
    fn test_missing_sprite_aborts_render() {
        let map = map(
            2,
            2,
            0,
            vec![CellDescriptor { layer_object1_num: 8, ..Default::default() }],
        );
        let assets = AssetTable::new(origins(LayerKind::Ground, &[]), origins(LayerKind::Object, &[(8, 0.0, 0.0)]));

        let err = LayerCompositor::new(&map, &assets).unwrap().render().unwrap_err();
        assert!(matches!(
            err,
            RenderError::AssetResolutionFailure { kind: LayerKind::Object, asset_id: 8, .. }
        ));
    }

    #[test]
    fn test_empty_map_is_rejected_before_drawing() {
        let map = map(15, 17, 0, Vec::new());
        let assets = AssetTable::new(origins(LayerKind::Ground, &[]), origins(LayerKind::Object, &[]));
        assert!(matches!(LayerCompositor::new(&map, &assets), Err(RenderError::DataNotFound(_))));
    }

    #[test]
    fn test_finished_raster_encodes_png() {
        let map = map(2, 2, 0, vec![CellDescriptor::default()]);
        let assets = AssetTable::new(origins(LayerKind::Ground, &[]), origins(LayerKind::Object, &[]));
        let compositor = LayerCompositor::new(&map, &assets).unwrap();
        assert_eq!(compositor.stage(), Stage::Init);

        let bytes = compositor.render().unwrap().encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (53, 27));
    }
}
