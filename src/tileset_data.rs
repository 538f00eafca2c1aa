use crate::map_data::ObjectGroupData;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Orthogonal,
}

/// Order in which the sheet's tiles are addressed. Only `RightDown` is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderOrder {
    #[default]
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

impl RenderOrder {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "right-down" => Some(Self::RightDown),
            "right-up" => Some(Self::RightUp),
            "left-down" => Some(Self::LeftDown),
            "left-up" => Some(Self::LeftUp),
            _ => None,
        }
    }
}

/// Parsed static description of one tileset image sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TileSetData {
    pub name: String,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    pub columns: u32,
    #[serde(rename = "tilecount")]
    pub tile_count: u32,
    #[serde(rename = "image")]
    pub image_name: String,
    pub orientation: Orientation,
    pub order: RenderOrder,
    #[serde(rename = "tiles", skip_serializing_if = "Vec::is_empty")]
    pub tile_objects: Vec<TileObjectRef>,
}

/// Per-tile metadata: collision shapes and animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TileObjectRef {
    /// Local tile index
    pub id: u32,
    #[serde(rename = "objectgroup", skip_serializing_if = "Option::is_none")]
    pub object_group: Option<ObjectGroupData>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub animation: Vec<AnimationFrame>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnimationFrame {
    #[serde(rename = "tileid")]
    pub tile_id: u32,
    /// Milliseconds
    pub duration: u32,
}
