use crate::backend::DrawTarget;
use crate::layer::View;
use crate::map_data::TileObjectData;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::tileset::Tile;
use macroquad::prelude::*;
use std::collections::HashMap;

/// Index of an actor within its map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub usize);

/// A dynamic entity spawned from a named map object.
///
/// `x`/`y` is the top-left corner in world pixels. Once bound to a body the
/// position follows the body on every draw.
#[derive(Debug, Clone, Default)]
pub struct Actor {
    pub object_data: Option<TileObjectData>,
    pub x: f32,
    pub y: f32,
    pub body: Option<BodyHandle>,
    tiles: HashMap<String, Tile>,
    current_tile: Option<String>,
    default_tile: Option<String>,
}

impl Actor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the actor to its spawn rectangle and creates a dynamic body of the same size.
    pub fn set_object_data(
        &mut self,
        object_data: TileObjectData,
        world: &mut dyn PhysicsWorld,
        ppm: f32,
    ) {
        self.x = object_data.x;
        self.y = object_data.y;
        self.body = Some(world.create_dynamic_body(
            object_data.center() / ppm,
            object_data.half_extents() / ppm,
        ));
        self.object_data = Some(object_data);
    }

    pub fn add_named_tile(&mut self, name: impl Into<String>, tile: Tile, make_default: bool) {
        let name = name.into();
        if make_default {
            self.current_tile = Some(name.clone());
            self.default_tile = Some(name.clone());
        }
        self.tiles.insert(name, tile);
    }

    /// Switches the displayed tile. Returns false if no tile has that name.
    pub fn set_current_tile(&mut self, name: &str) -> bool {
        if !self.tiles.contains_key(name) {
            return false;
        }
        self.current_tile = Some(name.to_owned());
        true
    }

    pub fn reset_tile(&mut self) {
        self.current_tile = self.default_tile.clone();
    }

    pub fn tile(&self, name: &str) -> Option<&Tile> {
        self.tiles.get(name)
    }

    pub fn current_tile(&self) -> Option<&Tile> {
        self.current_tile.as_deref().and_then(|n| self.tiles.get(n))
    }

    pub fn current_tile_name(&self) -> Option<&str> {
        self.current_tile.as_deref()
    }

    pub fn default_tile_name(&self) -> Option<&str> {
        self.default_tile.as_deref()
    }

    pub fn position(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    pub fn set_velocity(&self, world: &mut dyn PhysicsWorld, velocity: Vec2) {
        if let Some(body) = self.body {
            world.set_linear_velocity(body, velocity);
        }
    }

    /// Pulls the top-left position from the body's center.
    pub fn sync_from_body(&mut self, world: &dyn PhysicsWorld, ppm: f32) {
        let Some(center) = self.body.and_then(|b| world.body_position(b)) else {
            return;
        };
        let half = self
            .object_data
            .as_ref()
            .map_or(Vec2::ZERO, TileObjectData::half_extents);
        let top_left = center * ppm - half;
        self.x = top_left.x;
        self.y = top_left.y;
    }

    pub fn draw(&self, target: &mut dyn DrawTarget, view: &View) {
        if let Some(tile) = self.current_tile() {
            view.draw_tile(target, tile, self.position(), false, false, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::SimpleWorld;
    use crate::tileset::TileSetId;

    fn tile(id: u32) -> Tile {
        Tile {
            tile_set: TileSetId(0),
            tile_id: id,
            texture: None,
            sub_rect: None,
            animation: None,
        }
    }

    fn spawn() -> TileObjectData {
        TileObjectData {
            id: 1,
            name: "player".into(),
            x: 32.0,
            y: 64.0,
            width: 16.0,
            height: 32.0,
        }
    }

    #[test]
    fn object_data_creates_centered_dynamic_body() {
        let mut world = SimpleWorld::default();
        let mut actor = Actor::new();
        actor.set_object_data(spawn(), &mut world, 16.0);

        assert_eq!(actor.position(), vec2(32.0, 64.0));
        let body = actor.body.expect("body");
        assert_eq!(world.body_position(body), Some(vec2(2.5, 5.0)));
        assert_eq!(
            world.body_def(body).map(|d| d.half_extents),
            Some(vec2(0.5, 1.0))
        );
    }

    #[test]
    fn sync_from_body_restores_top_left() {
        let mut world = SimpleWorld::default();
        let mut actor = Actor::new();
        actor.set_object_data(spawn(), &mut world, 16.0);
        actor.x = 0.0;
        actor.sync_from_body(&world, 16.0);
        assert_eq!(actor.position(), vec2(32.0, 64.0));
    }

    #[test]
    fn named_tiles_and_default() {
        let mut actor = Actor::new();
        actor.add_named_tile("idle", tile(1), true);
        actor.add_named_tile("jump", tile(2), false);
        assert_eq!(actor.current_tile().map(|t| t.tile_id), Some(1));

        assert!(actor.set_current_tile("jump"));
        assert_eq!(actor.current_tile().map(|t| t.tile_id), Some(2));
        assert!(!actor.set_current_tile("swim"));

        actor.reset_tile();
        assert_eq!(actor.current_tile_name(), Some("idle"));
    }

    #[test]
    fn actor_without_default_has_no_current_tile() {
        let mut actor = Actor::new();
        actor.add_named_tile("idle", tile(1), false);
        assert!(actor.current_tile().is_none());
        assert!(actor.body.is_none());
    }
}
