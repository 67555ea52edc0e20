use std::fmt;

/// Asset namespace. Ground and object ids are numbered independently and collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Ground,
    Object,
}

impl LayerKind {
    /// Path segment on the gfx server and in the disk cache
    pub fn dir_name(&self) -> &'static str {
        match self {
            LayerKind::Ground => "ground",
            LayerKind::Object => "object",
        }
    }

    /// Relative path of the sprite metadata document for this namespace
    pub fn metadata_path(&self) -> String {
        format!("{0}/{0}.json", self.dir_name())
    }

    /// Relative path of a single sprite image
    pub fn image_path(&self, asset_id: u32) -> String {
        format!("{}/{}.png", self.dir_name(), asset_id)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The three per-cell drawable layers, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRole {
    Ground,
    Object1,
    Object2,
}

impl LayerRole {
    pub const DRAW_ORDER: [LayerRole; 3] = [LayerRole::Ground, LayerRole::Object1, LayerRole::Object2];

    pub fn kind(&self) -> LayerKind {
        match self {
            LayerRole::Ground => LayerKind::Ground,
            LayerRole::Object1 | LayerRole::Object2 => LayerKind::Object,
        }
    }

    /// Object-2 sprites are never rotated
    pub fn supports_rotation(&self) -> bool {
        !matches!(self, LayerRole::Object2)
    }
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerRole::Ground => f.write_str("ground"),
            LayerRole::Object1 => f.write_str("object-1"),
            LayerRole::Object2 => f.write_str("object-2"),
        }
    }
}

/// One drawable entry of a cell: which sprite, mirrored or not, how many quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSprite {
    pub asset_id: u32,
    pub flip: bool,
    pub rotation_steps: u8,
}
