pub mod layer;
pub mod map_data;
pub mod sprite_metadata;

pub use layer::{LayerKind, LayerRole, LayerSprite};
pub use map_data::{CellDescriptor, MapDescriptor};
pub use sprite_metadata::{Origin, SpriteOrigins};
