//! Tiled JSON tile maps for Macroquad: lenient map/tileset loading, a shared
//! tileset registry, layered tile drawing with animated tiles, and actors
//! bound to a physics world.

mod actor;
mod assets;
mod backend;
mod config;
mod error;
pub mod gid;
mod layer;
mod loader {
    pub mod json_loader;
}
mod map;
mod map_data;
mod physics;
mod tileset;
mod tileset_data;
mod tileset_manager;

pub use actor::{Actor, ActorId};
pub use assets::{AssetSource, DirAssets, MemoryAssets};
pub use backend::{
    DrawTarget, HeadlessTextures, MacroquadBackend, QuadRecorder, TextureId, TextureLoader,
    TileQuad,
};
pub use config::{PhysicsConfig, TileMapConfig};
pub use error::{DecodeIssue, MapError};
pub use gid::Gid;
pub use layer::{Cell, Drawable, TileMapLayer, View};
pub use loader::json_loader::{
    decode_map, decode_tileset, encode_map, encode_tileset, normalize_source, read_map_file,
    read_tileset_file, Decoded,
};
pub use map::{resolve_gid, MapState, StaticBody, TileMap};
pub use map_data::{LayerData, LayerKind, ObjectGroupData, TileMapData, TileObjectData, TileSetRef};
pub use physics::{BodyDef, BodyHandle, BodyKind, PhysicsWorld, SimpleWorld};
pub use tileset::{Animation, AnimationFrameTile, Tile, TileSet, TileSetId};
pub use tileset_data::{AnimationFrame, Orientation, RenderOrder, TileObjectRef, TileSetData};
pub use tileset_manager::{Registration, TileSetManager};
