use crate::actor::Actor;
use crate::backend::{DrawTarget, TileQuad};
use crate::gid::Gid;
use crate::map_data::LayerData;
use crate::tileset::Tile;
use macroquad::prelude::*;

/// One occupied-or-empty grid position of a tile layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub column: u32,
    pub row: u32,
    pub gid: Gid,
    /// Top-left corner in world pixels, layer offset included
    pub world: Vec2,
}

/// Runtime wrapper around one layer of a map.
#[derive(Debug, Clone)]
pub struct TileMapLayer {
    pub index: usize,
    pub data: LayerData,
}

impl TileMapLayer {
    pub fn new(index: usize, data: LayerData) -> Self {
        Self { index, data }
    }

    /// Every cell in row-major order, wrapping after `map_width` cells.
    pub fn cells(&self, map_width: u32, tile_size: Vec2) -> impl Iterator<Item = Cell> + '_ {
        let width = map_width.max(1);
        let origin = self.data.offset();
        self.data.data.iter().enumerate().map(move |(i, &raw)| {
            let column = i as u32 % width;
            let row = i as u32 / width;
            Cell {
                column,
                row,
                gid: Gid(raw),
                world: origin + vec2(column as f32, row as f32) * tile_size,
            }
        })
    }

    /// Non-empty cells only.
    pub fn occupied_cells(
        &self,
        map_width: u32,
        tile_size: Vec2,
    ) -> impl Iterator<Item = Cell> + '_ {
        self.cells(map_width, tile_size).filter(|c| !c.gid.is_empty())
    }
}

/// Everything that takes part in a map's draw traversal.
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    TileLayer(&'a TileMapLayer),
    /// Object layers are not rendered
    ObjectLayer(&'a TileMapLayer),
    Actor(&'a Actor),
}

impl<'a> Drawable<'a> {
    pub fn for_layer(layer: &'a TileMapLayer) -> Self {
        if layer.data.is_object_group() {
            Drawable::ObjectLayer(layer)
        } else {
            Drawable::TileLayer(layer)
        }
    }
}

/// Per-frame placement: screen = (offset + world) * zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub offset: Vec2,
    pub zoom: f32,
    pub elapsed_ms: u64,
}

impl View {
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        (self.offset + world) * self.zoom
    }

    /// Emits `tile` (or its current animation frame) at `world`. Untextured tiles draw nothing.
    pub fn draw_tile(
        &self,
        target: &mut dyn DrawTarget,
        tile: &Tile,
        world: Vec2,
        flip_x: bool,
        flip_y: bool,
        opacity: f32,
    ) {
        let frame = tile.frame_at(self.elapsed_ms);
        let Some(texture) = frame.texture else {
            return;
        };
        target.draw_textured_quad(&TileQuad {
            texture,
            position: self.to_screen(world),
            scale: self.zoom,
            sub_rect: frame.sub_rect,
            flip_x,
            flip_y,
            opacity,
        });
    }
}
