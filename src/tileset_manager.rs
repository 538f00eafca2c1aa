use crate::assets::AssetSource;
use crate::backend::TextureLoader;
use crate::error::MapError;
use crate::tileset::{Tile, TileSet, TileSetId};
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of [`TileSetManager::add_tile_set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added(TileSetId),
    AlreadyExists(TileSetId),
}

impl Registration {
    pub fn id(self) -> TileSetId {
        match self {
            Registration::Added(id) | Registration::AlreadyExists(id) => id,
        }
    }
}

/// Registry of loaded tilesets, shared by every map loaded through it.
///
/// Each source name is loaded at most once; later registrations only bump its
/// reference count. Tilesets live as long as the manager. Registration takes
/// `&mut self`, so callers sharing a manager across threads put it behind a
/// mutex.
pub struct TileSetManager {
    assets: Box<dyn AssetSource>,
    tile_sets: Vec<TileSet>,
    by_name: HashMap<String, TileSetId>,
    /// Registrations per tileset. Never decremented: there is no release,
    /// so this counts how many loads asked for the tileset, not live holders.
    ref_counts: Vec<usize>,
}

impl TileSetManager {
    pub fn new(assets: impl AssetSource + 'static) -> Self {
        Self {
            assets: Box::new(assets),
            tile_sets: Vec::new(),
            by_name: HashMap::new(),
            ref_counts: Vec::new(),
        }
    }

    pub fn assets(&self) -> &dyn AssetSource {
        self.assets.as_ref()
    }

    /// Loads and registers `name` unless it is already present.
    pub fn add_tile_set(
        &mut self,
        name: &str,
        textures: &mut dyn TextureLoader,
    ) -> Result<Registration, MapError> {
        if let Some(&id) = self.by_name.get(name) {
            self.ref_counts[id.0 as usize] += 1;
            debug!("tileset '{name}' already loaded");
            return Ok(Registration::AlreadyExists(id));
        }

        let id = TileSetId(self.tile_sets.len() as u32);
        let tile_set = TileSet::load(id, name, self.assets.as_ref(), textures)?;
        info!(
            "loaded tileset '{name}' ({} tiles with metadata)",
            tile_set.data.tile_objects.len()
        );

        self.tile_sets.push(tile_set);
        self.ref_counts.push(1);
        self.by_name.insert(name.to_owned(), id);
        Ok(Registration::Added(id))
    }

    /// `None` if `tile_set_name` was never registered.
    pub fn get_tile(&self, tile_set_name: &str, local_id: u32) -> Option<Tile> {
        self.tile_set_by_name(tile_set_name)
            .map(|ts| ts.get_tile(local_id))
    }

    pub fn tile_set(&self, id: TileSetId) -> Option<&TileSet> {
        self.tile_sets.get(id.0 as usize)
    }

    pub fn tile_set_by_name(&self, name: &str) -> Option<&TileSet> {
        self.by_name.get(name).and_then(|&id| self.tile_set(id))
    }

    /// Times `name` was registered; 0 if it never was.
    pub fn ref_count(&self, name: &str) -> usize {
        self.by_name
            .get(name)
            .map_or(0, |id| self.ref_counts[id.0 as usize])
    }

    pub fn len(&self) -> usize {
        self.tile_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tile_sets.is_empty()
    }
}
