pub mod compositor;
pub mod grid;
pub mod transform;

pub use compositor::{FinishedRaster, LayerCompositor, Stage};
pub use grid::{cell_pixel, project, GridPos, PixelPos};
pub use transform::{prepare, rotate_about_center, DrawTransform, PreparedSprite};
