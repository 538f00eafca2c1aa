use crate::assets::AssetSource;
use crate::backend::{TextureId, TextureLoader};
use crate::error::{DecodeIssue, MapError};
use crate::loader::json_loader::decode_tileset;
use crate::map_data::ObjectGroupData;
use crate::tileset_data::{RenderOrder, TileSetData};
use macroquad::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Index of a [`TileSet`] inside its [`TileSetManager`](crate::TileSetManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSetId(pub u32);

/// Resolved runtime view of one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub tile_set: TileSetId,
    pub tile_id: u32,
    pub texture: Option<TextureId>,
    pub sub_rect: Option<Rect>,
    pub animation: Option<Animation>,
}

impl Tile {
    pub fn is_animated(&self) -> bool {
        self.animation.as_ref().is_some_and(|a| !a.frames.is_empty())
    }

    /// The tile to display after `elapsed_ms` on a looping clock: the current
    /// animation frame, or the tile itself.
    pub fn frame_at(&self, elapsed_ms: u64) -> &Tile {
        self.animation
            .as_ref()
            .and_then(|a| a.frame_at(elapsed_ms))
            .unwrap_or(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrameTile {
    pub tile: Tile,
    pub duration_ms: u32,
}

/// Ordered, looping frame sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animation {
    pub frames: Vec<AnimationFrameTile>,
}

impl Animation {
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.duration_ms as u64).sum()
    }

    pub fn frame_at(&self, elapsed_ms: u64) -> Option<&Tile> {
        let total = self.total_duration_ms();
        if total == 0 {
            return self.frames.first().map(|f| &f.tile);
        }
        let mut t = elapsed_ms % total;
        for frame in &self.frames {
            let d = frame.duration_ms as u64;
            if t < d {
                return Some(&frame.tile);
            }
            t -= d;
        }
        self.frames.last().map(|f| &f.tile)
    }
}

/// A loaded tileset asset.
#[derive(Debug, Clone)]
pub struct TileSet {
    id: TileSetId,
    pub name: String,
    pub texture: Option<TextureId>,
    pub data: TileSetData,
    /// Collision shapes by local tile id
    pub objects: HashMap<u32, ObjectGroupData>,
    /// Resolved animations by local tile id
    pub animations: HashMap<u32, Animation>,
    pub decode_issues: Vec<DecodeIssue>,
}

impl TileSet {
    /// Reads, decodes and textures the tileset called `name`.
    pub fn load(
        id: TileSetId,
        name: &str,
        assets: &dyn AssetSource,
        textures: &mut dyn TextureLoader,
    ) -> Result<Self, MapError> {
        let json = assets.read(name)?;
        let decoded = decode_tileset(&json);
        for issue in &decoded.issues {
            warn!("tileset '{name}': {issue}");
        }

        let texture = texture_for_image(&decoded.value.image_name, textures);
        if texture.is_none() {
            debug!("tileset '{name}' has no texture (image '{}')", decoded.value.image_name);
        }

        Ok(Self::from_data(id, name, decoded.value, texture).with_issues(decoded.issues))
    }

    /// Builds a tileset from already-decoded data.
    pub fn from_data(
        id: TileSetId,
        name: &str,
        data: TileSetData,
        texture: Option<TextureId>,
    ) -> Self {
        let mut ts = Self {
            id,
            name: name.to_owned(),
            texture,
            data,
            objects: HashMap::new(),
            animations: HashMap::new(),
            decode_issues: Vec::new(),
        };

        let mut animations = HashMap::new();
        for object in &ts.data.tile_objects {
            if let Some(group) = &object.object_group {
                ts.objects.insert(object.id, group.clone());
            }
            if !object.animation.is_empty() {
                let frames = object
                    .animation
                    .iter()
                    .map(|f| AnimationFrameTile {
                        tile: ts.base_tile(f.tile_id),
                        duration_ms: f.duration,
                    })
                    .collect();
                animations.insert(object.id, Animation { frames });
            }
        }
        ts.animations = animations;
        ts
    }

    fn with_issues(mut self, issues: Vec<DecodeIssue>) -> Self {
        self.decode_issues = issues;
        self
    }

    pub fn id(&self) -> TileSetId {
        self.id
    }

    /// Atlas rectangle of `local_id`. `None` for unsupported orders or a zero column count.
    pub fn sub_rect(&self, local_id: u32) -> Option<Rect> {
        let d = &self.data;
        if d.order != RenderOrder::RightDown || d.columns == 0 {
            return None;
        }
        let col = local_id % d.columns;
        let row = local_id / d.columns;
        let (w, h) = (d.tile_width as f32, d.tile_height as f32);
        Some(Rect::new(col as f32 * w, row as f32 * h, w, h))
    }

    fn base_tile(&self, local_id: u32) -> Tile {
        Tile {
            tile_set: self.id,
            tile_id: local_id,
            texture: self.texture,
            sub_rect: self.sub_rect(local_id),
            animation: None,
        }
    }

    /// Tile at `local_id`, with its animation attached when it has one.
    /// No bounds check against the sheet size.
    pub fn get_tile(&self, local_id: u32) -> Tile {
        Tile {
            animation: self.animations.get(&local_id).cloned(),
            ..self.base_tile(local_id)
        }
    }

    pub fn object_group(&self, local_id: u32) -> Option<&ObjectGroupData> {
        self.objects.get(&local_id)
    }
}

/// Splits `image` into base and extension; loads only when there is exactly one `.`.
fn texture_for_image(image: &str, textures: &mut dyn TextureLoader) -> Option<TextureId> {
    let mut parts = image.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(base), Some(ext), None) if !base.is_empty() => textures.load_texture(base, ext),
        _ => None,
    }
}
