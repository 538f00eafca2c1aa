use macroquad::prelude::*;
use serde::Serialize;

/// Parsed static description of a Tiled map. Immutable after decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TileMapData {
    pub name: String,
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    pub layers: Vec<LayerData>,    // draw order: array order
    pub tilesets: Vec<TileSetRef>, // firstgid is unique per map
}

/// Layer kind as given by the `type` key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LayerKind {
    #[default]
    #[serde(rename = "tilelayer")]
    Tile,
    #[serde(rename = "objectgroup")]
    ObjectGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerData {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub id: i32,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "offsetx", skip_serializing_if = "is_zero")]
    pub offset_x: f32,
    #[serde(rename = "offsety", skip_serializing_if = "is_zero")]
    pub offset_y: f32,
    pub width: u32,
    pub height: u32,
    pub opacity: f32,
    pub visible: bool,
    /// Row-major raw GIDs, flip flags included. Empty for object layers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u32>,
    /// Named rectangles. Empty for tile layers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<TileObjectData>,
}

fn is_zero(v: &f32) -> bool {
    *v == 0.0
}

impl Default for LayerData {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: LayerKind::Tile,
            id: 0,
            x: 0,
            y: 0,
            offset_x: 0.0,
            offset_y: 0.0,
            width: 0,
            height: 0,
            opacity: 1.0,
            visible: false,
            data: Vec::new(),
            objects: Vec::new(),
        }
    }
}

impl LayerData {
    /// World offset of the layer's first cell.
    pub fn offset(&self) -> Vec2 {
        vec2(self.x as f32 + self.offset_x, self.y as f32 + self.offset_y)
    }

    pub fn is_tile_layer(&self) -> bool {
        self.kind == LayerKind::Tile
    }

    pub fn is_object_group(&self) -> bool {
        self.kind == LayerKind::ObjectGroup
    }
}

/// A named world-space rectangle: actor spawn point or collision shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TileObjectData {
    pub id: u32,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TileObjectData {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn half_extents(&self) -> Vec2 {
        vec2(self.width / 2.0, self.height / 2.0)
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.x, self.y) + self.half_extents()
    }
}

/// Collision shapes attached to one tile of a tileset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectGroupData {
    pub objects: Vec<TileObjectData>,
}

/// Reference from a map to an external tileset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TileSetRef {
    /// Source file name with its extension stripped, used as registry key
    pub source: String,
    #[serde(rename = "firstgid")]
    pub first_gid: u32,
}
