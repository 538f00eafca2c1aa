use crate::actor::{Actor, ActorId};
use crate::backend::{DrawTarget, TextureLoader};
use crate::config::TileMapConfig;
use crate::error::{DecodeIssue, MapError};
use crate::gid::Gid;
use crate::layer::{Drawable, TileMapLayer, View};
use crate::loader::json_loader::decode_map;
use crate::map_data::*;
use crate::physics::{BodyHandle, PhysicsWorld, SimpleWorld};
use crate::tileset::Tile;
use crate::tileset_manager::TileSetManager;
use macroquad::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    Unloaded,
    /// Layers built and tiles resolved
    Loaded,
    /// Physics initialized; drawable
    Ready,
}

/// Static collision body of one tile placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticBody {
    pub layer: usize,
    pub column: u32,
    pub row: u32,
    /// Masked GID of the placed tile
    pub gid: u32,
    pub body: BodyHandle,
}

/// The tileset with the largest `first_gid` not above `gid`, and the local id within it.
pub fn resolve_gid(tilesets: &[TileSetRef], gid: u32) -> Option<(&TileSetRef, u32)> {
    tilesets
        .iter()
        .filter(|t| t.first_gid <= gid)
        .max_by_key(|t| t.first_gid)
        .map(|t| (t, gid - t.first_gid))
}

/// A loaded Tiled map: layers, resolved tiles, physics bodies and actors.
pub struct TileMap<W: PhysicsWorld = SimpleWorld> {
    file_name: String,
    config: TileMapConfig,
    state: MapState,
    data: Option<TileMapData>,
    decode_issues: Vec<DecodeIssue>,
    layers: Vec<TileMapLayer>,
    tiles: HashMap<u32, Tile>,
    shapes: HashMap<u32, ObjectGroupData>,
    actors: Vec<Actor>,
    static_bodies: Vec<StaticBody>,
    physics: W,
    ppm: f32,
    clock: f64,
    pub offset_x: f32,
    pub offset_y: f32,
    pub zoom: f32,
}

impl TileMap<SimpleWorld> {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self::with_config(file_name, TileMapConfig::default())
    }

    pub fn with_config(file_name: impl Into<String>, config: TileMapConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!("{e}; invalid values fall back to defaults on load");
        }
        let physics = SimpleWorld::new(config.physics.gravity());
        Self::with_physics(file_name, config, physics)
    }
}

impl<W: PhysicsWorld> TileMap<W> {
    pub fn with_physics(file_name: impl Into<String>, config: TileMapConfig, physics: W) -> Self {
        Self {
            file_name: file_name.into(),
            state: MapState::Unloaded,
            data: None,
            decode_issues: Vec::new(),
            layers: Vec::new(),
            tiles: HashMap::new(),
            shapes: HashMap::new(),
            actors: Vec::new(),
            static_bodies: Vec::new(),
            physics,
            ppm: 0.0,
            clock: 0.0,
            offset_x: config.offset_x,
            offset_y: config.offset_y,
            zoom: config.zoom,
            config,
        }
    }

    /// Reads and decodes the map, then resolves its tiles and sets up physics.
    ///
    /// Fails with [`MapError::NotFound`] when the map resource is missing; the
    /// map then stays [`MapState::Unloaded`]. Malformed fields never fail the
    /// load, they are reported through [`decode_issues`](Self::decode_issues).
    /// Loading an already loaded map returns its data unchanged.
    pub fn load(
        &mut self,
        manager: &mut TileSetManager,
        textures: &mut dyn TextureLoader,
    ) -> Result<&TileMapData, MapError> {
        if self.state == MapState::Unloaded {
            let json = manager.assets().read(&self.file_name).inspect_err(|e| {
                warn!("map '{}' not loaded: {e}", self.file_name);
            })?;

            let decoded = decode_map(&json);
            for issue in &decoded.issues {
                warn!("map '{}': {issue}", self.file_name);
            }

            let configured = self.config.ppm.filter(|p| *p > 0.0 && p.is_finite());
            if configured.is_none() && self.config.ppm.is_some() {
                warn!("map '{}': ignoring ppm {:?}", self.file_name, self.config.ppm);
            }
            self.ppm = match configured {
                Some(ppm) => ppm,
                None if decoded.value.tile_height > 0 => decoded.value.tile_height as f32,
                None => 1.0,
            };
            self.data = Some(decoded.value);
            self.decode_issues = decoded.issues;

            self.init_layers_and_tiles(manager, textures);
            self.init_physics();
            info!(
                "loaded map '{}': {} layers, {} tiles, {} static bodies",
                self.file_name,
                self.layers.len(),
                self.tiles.len(),
                self.static_bodies.len()
            );
        } else {
            debug!("map '{}' already loaded", self.file_name);
        }

        self.data.as_ref().ok_or_else(|| MapError::NotFound {
            name: self.file_name.clone(),
        })
    }

    /// Registers the map's tilesets, wraps its layers and resolves every
    /// distinct GID in the tile layers exactly once. Runs once per map; later
    /// calls leave tiles, registrations and bodies untouched.
    pub fn init_layers_and_tiles(
        &mut self,
        manager: &mut TileSetManager,
        textures: &mut dyn TextureLoader,
    ) {
        if self.state != MapState::Unloaded {
            debug!("map '{}': layers already initialized", self.file_name);
            return;
        }
        let Some(data) = self.data.as_ref() else {
            return;
        };

        for r in &data.tilesets {
            match manager.add_tile_set(&r.source, textures) {
                Ok(reg) => debug!("map '{}': tileset '{}' {:?}", self.file_name, r.source, reg),
                Err(e) => warn!("map '{}': tileset '{}' unavailable: {e}", self.file_name, r.source),
            }
        }

        self.layers = data
            .layers
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, l)| TileMapLayer::new(i, l))
            .collect();

        self.tiles.clear();
        self.shapes.clear();
        let mut seen = HashSet::new();
        for layer in self.layers.iter().filter(|l| l.data.is_tile_layer()) {
            for &raw in &layer.data.data {
                let gid = Gid(raw).clean();
                if gid == 0 || !seen.insert(gid) {
                    continue;
                }
                let Some((r, local)) = resolve_gid(&data.tilesets, gid) else {
                    warn!("map '{}': no tileset for gid {gid}", self.file_name);
                    continue;
                };
                let Some(tile) = manager.get_tile(&r.source, local) else {
                    continue;
                };
                if let Some(group) = manager
                    .tile_set(tile.tile_set)
                    .and_then(|ts| ts.object_group(local))
                {
                    self.shapes.insert(gid, group.clone());
                }
                self.tiles.insert(gid, tile);
            }
        }

        self.state = MapState::Loaded;
    }

    /// Creates static bodies for every collision rectangle of every placed
    /// tile in the visible tile layers. Each placement gets its own bodies.
    pub fn init_physics(&mut self) {
        if self.state != MapState::Loaded {
            debug!("map '{}': physics init skipped in state {:?}", self.file_name, self.state);
            return;
        }
        let Some(data) = self.data.as_ref() else {
            return;
        };
        let tile_size = vec2(data.tile_width as f32, data.tile_height as f32);
        let ppm = self.ppm;

        self.static_bodies.clear();
        for layer in &self.layers {
            if !layer.data.is_tile_layer() || !layer.data.visible {
                continue;
            }
            for cell in layer.occupied_cells(data.width, tile_size) {
                let gid = cell.gid.clean();
                let Some(group) = self.shapes.get(&gid) else {
                    continue;
                };
                for o in &group.objects {
                    let center = cell.world + o.center();
                    let body = self
                        .physics
                        .create_static_body(center / ppm, o.half_extents() / ppm);
                    self.static_bodies.push(StaticBody {
                        layer: layer.index,
                        column: cell.column,
                        row: cell.row,
                        gid,
                        body,
                    });
                }
            }
        }

        self.state = MapState::Ready;
    }

    /// Spawns an actor at the object called `name`. The actor is added even
    /// when no such object exists; it then has no body.
    pub fn create_actor(&mut self, name: &str) -> ActorId {
        let mut actor = Actor::new();
        match self.get_object(name).cloned() {
            Some(object) => actor.set_object_data(object, &mut self.physics, self.ppm),
            None => debug!("map '{}': no object named '{name}'", self.file_name),
        }
        self.actors.push(actor);
        ActorId(self.actors.len() - 1)
    }

    /// First object named `name`, in layer order then object order.
    pub fn get_object(&self, name: &str) -> Option<&TileObjectData> {
        self.layers
            .iter()
            .filter(|l| l.data.is_object_group())
            .flat_map(|l| l.data.objects.iter())
            .find(|o| o.name == name)
    }

    /// Draw traversal order: layers as listed, then actors.
    pub fn drawables(&self) -> Vec<Drawable<'_>> {
        self.layers
            .iter()
            .map(Drawable::for_layer)
            .chain(self.actors.iter().map(Drawable::Actor))
            .collect()
    }

    /// Steps physics by one fixed step, then draws tile layers and actors.
    /// Does nothing until the map is [`MapState::Ready`].
    pub fn draw(&mut self, target: &mut dyn DrawTarget) {
        if self.state != MapState::Ready {
            return;
        }

        let step = &self.config.physics;
        self.physics
            .step(step.time_step, step.velocity_iterations, step.position_iterations);
        self.clock += step.time_step as f64;

        for actor in &mut self.actors {
            actor.sync_from_body(&self.physics, self.ppm);
        }

        let view = self.view();
        for drawable in self.drawables() {
            match drawable {
                Drawable::TileLayer(layer) => self.draw_layer(target, layer, &view),
                Drawable::ObjectLayer(_) => {}
                Drawable::Actor(actor) => actor.draw(target, &view),
            }
        }
    }

    fn draw_layer(&self, target: &mut dyn DrawTarget, layer: &TileMapLayer, view: &View) {
        let Some(data) = self.data.as_ref() else {
            return;
        };
        if !layer.data.visible {
            return;
        }
        let tile_size = vec2(data.tile_width as f32, data.tile_height as f32);
        for cell in layer.occupied_cells(data.width, tile_size) {
            if let Some(tile) = self.tiles.get(&cell.gid.clean()) {
                view.draw_tile(
                    target,
                    tile,
                    cell.world,
                    cell.gid.flip_h(),
                    cell.gid.flip_v(),
                    layer.data.opacity,
                );
            }
        }
    }

    pub fn view(&self) -> View {
        View {
            offset: vec2(self.offset_x, self.offset_y),
            zoom: self.zoom,
            elapsed_ms: (self.clock * 1000.0) as u64,
        }
    }

    /// The tileset reference and local id `gid` resolves to in this map.
    pub fn resolve_gid(&self, gid: u32) -> Option<(&TileSetRef, u32)> {
        let data = self.data.as_ref()?;
        resolve_gid(&data.tilesets, Gid(gid).clean())
    }

    /// Overrides the pixels-per-meter scale. Only effective before [`load`](Self::load);
    /// a value that is not positive falls back to the tile height.
    pub fn set_ppm(&mut self, ppm: f32) {
        self.config.ppm = Some(ppm);
    }

    pub fn ppm(&self) -> f32 {
        self.ppm
    }

    pub fn state(&self) -> MapState {
        self.state
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn config(&self) -> &TileMapConfig {
        &self.config
    }

    pub fn data(&self) -> Option<&TileMapData> {
        self.data.as_ref()
    }

    pub fn decode_issues(&self) -> &[DecodeIssue] {
        &self.decode_issues
    }

    pub fn layers(&self) -> &[TileMapLayer] {
        &self.layers
    }

    pub fn tile(&self, gid: u32) -> Option<&Tile> {
        self.tiles.get(&Gid(gid).clean())
    }

    pub fn tiles(&self) -> &HashMap<u32, Tile> {
        &self.tiles
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0)
    }

    /// Sets an actor's body velocity in physics units per second.
    pub fn set_actor_velocity(&mut self, id: ActorId, velocity: Vec2) {
        if let Some(actor) = self.actors.get(id.0) {
            actor.set_velocity(&mut self.physics, velocity);
        }
    }

    pub fn static_bodies(&self) -> &[StaticBody] {
        &self.static_bodies
    }

    pub fn bodies_for_gid(&self, gid: u32) -> impl Iterator<Item = &StaticBody> + '_ {
        let gid = Gid(gid).clean();
        self.static_bodies.iter().filter(move |b| b.gid == gid)
    }

    pub fn physics(&self) -> &W {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut W {
        &mut self.physics
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.view().elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::backend::{HeadlessTextures, QuadRecorder, TextureId};
    use crate::gid::FLIP_H;

    const MAP: &str = r#"{
      "name":"test",
      "width":3, "height":2,
      "tilewidth":16, "tileheight":16,
      "layers":[
        {"type":"tilelayer","name":"ground","visible":true,"width":3,"height":2,
         "data":[1,0,2,0,3,0]},
        {"type":"tilelayer","name":"deco","visible":true,"width":3,"height":2,
         "data":[75,0,0,201,75,0]},
        {"type":"objectgroup","name":"spawns","visible":true,"objects":[
          {"id":1,"name":"spawn1","x":16,"y":0,"width":16,"height":16},
          {"id":2,"name":"chest","x":0,"y":0,"width":8,"height":8}
        ]},
        {"type":"objectgroup","name":"more","visible":true,"objects":[
          {"id":3,"name":"spawn1","x":99,"y":99,"width":16,"height":16}
        ]}
      ],
      "tilesets":[
        {"firstgid":1,"source":"a.json"},
        {"firstgid":50,"source":"b.json"},
        {"firstgid":200,"source":"c.json"}
      ]
    }"#;

    const SHEET_A: &str = r#"{"name":"a","tilewidth":16,"tileheight":16,"columns":4,"image":"a.png",
      "tiles":[
        {"id":1,"animation":[{"tileid":1,"duration":100},{"tileid":2,"duration":100}]}
      ]}"#;
    const SHEET_B: &str = r#"{"name":"b","tilewidth":16,"tileheight":16,"columns":8,"image":"b.png",
      "tiles":[
        {"id":25,"objectgroup":{"objects":[{"name":"solid","x":0,"y":8,"width":16,"height":8}]}}
      ]}"#;
    const SHEET_C: &str = r#"{"name":"c","tilewidth":16,"tileheight":16,"columns":8,"image":"c.png"}"#;

    fn manager(map: &str) -> TileSetManager {
        TileSetManager::new(
            MemoryAssets::new()
                .with("test", map)
                .with("a", SHEET_A)
                .with("b", SHEET_B)
                .with("c", SHEET_C),
        )
    }

    fn loaded(config: TileMapConfig) -> (TileMap, TileSetManager) {
        let mut m = manager(MAP);
        let mut textures = HeadlessTextures::default();
        let mut map = TileMap::with_config("test", config);
        map.load(&mut m, &mut textures).expect("map loads");
        (map, m)
    }

    #[test]
    fn resolve_gid_picks_largest_first_gid_not_above() {
        let refs = vec![
            TileSetRef { source: "a".into(), first_gid: 1 },
            TileSetRef { source: "c".into(), first_gid: 200 },
            TileSetRef { source: "b".into(), first_gid: 50 },
        ];
        let (r, local) = resolve_gid(&refs, 75).expect("resolves");
        assert_eq!((r.source.as_str(), local), ("b", 25));
        assert_eq!(resolve_gid(&refs, 49).map(|(r, l)| (r.source.as_str(), l)), Some(("a", 48)));
        assert_eq!(resolve_gid(&refs, 200).map(|(_, l)| l), Some(0));
        assert!(resolve_gid(&refs[1..], 10).is_none());
    }

    #[test]
    fn load_resolves_each_distinct_gid_once() {
        let (map, m) = loaded(TileMapConfig::default());
        assert_eq!(map.state(), MapState::Ready);
        assert_eq!(map.layers().len(), 4);

        let mut gids: Vec<u32> = map.tiles().keys().copied().collect();
        gids.sort_unstable();
        assert_eq!(gids, vec![1, 2, 3, 75, 201]);

        let t = map.tile(75).expect("cached");
        assert_eq!(t.tile_id, 25);
        assert_eq!(Some(t.tile_set), m.tile_set_by_name("b").map(|ts| ts.id()));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn tilesets_are_shared_between_maps() {
        let mut m = manager(MAP);
        let mut textures = HeadlessTextures::default();
        let mut first = TileMap::new("test");
        let mut second = TileMap::new("test");
        first.load(&mut m, &mut textures).expect("first");
        second.load(&mut m, &mut textures).expect("second");

        assert_eq!(m.len(), 3);
        assert_eq!(m.ref_count("a"), 2);
        assert_eq!(textures.loaded.len(), 3);
    }

    #[test]
    fn missing_map_stays_unloaded() {
        let mut m = manager(MAP);
        let mut textures = HeadlessTextures::default();
        let mut map = TileMap::new("nowhere");
        let err = map.load(&mut m, &mut textures).err().expect("not found");
        assert!(matches!(err, MapError::NotFound { .. }));
        assert_eq!(map.state(), MapState::Unloaded);
        assert!(map.layers().is_empty());
        assert!(map.tiles().is_empty());
        assert!(map.data().is_none());
    }

    #[test]
    fn ppm_defaults_to_tile_height_unless_configured() {
        let (map, _) = loaded(TileMapConfig::default());
        assert_eq!(map.ppm(), 16.0);

        let (map, _) = loaded(TileMapConfig {
            ppm: Some(32.0),
            ..Default::default()
        });
        assert_eq!(map.ppm(), 32.0);
    }

    #[test]
    fn every_placement_of_a_solid_tile_gets_its_own_body() {
        let (map, _) = loaded(TileMapConfig::default());
        let bodies: Vec<&StaticBody> = map.bodies_for_gid(75).collect();
        assert_eq!(bodies.len(), 2);
        assert_eq!((bodies[0].column, bodies[0].row), (0, 0));
        assert_eq!((bodies[1].column, bodies[1].row), (1, 1));
        assert_ne!(bodies[0].body, bodies[1].body);
        assert_eq!(map.static_bodies().len(), 2);

        // rect (0,8,16,8) in cell (1,1): center (16+8, 16+12) / 16
        let pos = map.physics().body_position(bodies[1].body).expect("body");
        assert_eq!(pos, vec2(1.5, 1.75));
        let half = map.physics().body_def(bodies[1].body).expect("def").half_extents;
        assert_eq!(half, vec2(0.5, 0.25));
    }

    #[test]
    fn invisible_layers_get_no_bodies_and_no_draws() {
        let hidden = MAP.replace(
            r#""name":"deco","visible":true"#,
            r#""name":"deco","visible":false"#,
        );
        let mut m = manager(&hidden);
        let mut textures = HeadlessTextures::default();
        let mut map = TileMap::new("test");
        map.load(&mut m, &mut textures).expect("loads");
        assert!(map.static_bodies().is_empty());

        let mut rec = QuadRecorder::default();
        map.draw(&mut rec);
        assert_eq!(rec.quads.len(), 3);
    }

    #[test]
    fn get_object_returns_first_match_in_layer_order() {
        let (map, _) = loaded(TileMapConfig::default());
        let o = map.get_object("spawn1").expect("found");
        assert_eq!(o.id, 1);
        assert!(map.get_object("ghost").is_none());
    }

    #[test]
    fn create_actor_always_appends() {
        let (mut map, _) = loaded(TileMapConfig::default());
        let before = map.physics().body_count();

        let hero = map.create_actor("spawn1");
        let ghost = map.create_actor("ghost");

        assert_eq!(map.actors().len(), 2);
        assert!(map.actor(hero).and_then(|a| a.body).is_some());
        assert!(map.actor(ghost).and_then(|a| a.body).is_none());
        assert_eq!(map.physics().body_count(), before + 1);
    }

    #[test]
    fn draw_emits_cells_row_major_with_zoom_and_offset() {
        let (mut map, _) = loaded(TileMapConfig::default());
        map.zoom = 2.0;
        map.offset_x = 10.0;

        let mut rec = QuadRecorder::default();
        map.draw(&mut rec);

        // ground: 3 tiles, deco: 3 tiles
        assert_eq!(rec.quads.len(), 6);
        let ground: Vec<Vec2> = rec.quads[..3].iter().map(|q| q.position).collect();
        assert_eq!(
            ground,
            vec![vec2(20.0, 0.0), vec2(84.0, 0.0), vec2(52.0, 32.0)]
        );
        assert!(rec.quads.iter().all(|q| q.scale == 2.0));
        assert_eq!(rec.quads[0].texture, TextureId(0));
        assert_eq!(rec.quads[3].sub_rect, Some(Rect::new(16.0, 48.0, 16.0, 16.0)));
    }

    #[test]
    fn animated_tiles_advance_with_the_physics_clock() {
        let (mut map, _) = loaded(TileMapConfig::default());
        let mut rec = QuadRecorder::default();

        map.draw(&mut rec);
        // gid 2 is local 1 in "a": animated 1 -> 2
        let first = rec.quads[1].sub_rect;
        assert_eq!(first, Some(Rect::new(16.0, 0.0, 16.0, 16.0)));

        for _ in 0..6 {
            rec.quads.clear();
            map.draw(&mut rec);
        }
        assert!(map.elapsed_ms() >= 100);
        assert_eq!(rec.quads[1].sub_rect, Some(Rect::new(32.0, 0.0, 16.0, 16.0)));
    }

    #[test]
    fn flipped_gids_share_the_cached_tile() {
        let flipped = MAP.replace("[1,0,2,0,3,0]", &format!("[{},0,0,0,0,0]", 3 | FLIP_H));
        let mut m = manager(&flipped);
        let mut textures = HeadlessTextures::default();
        let mut map = TileMap::new("test");
        map.load(&mut m, &mut textures).expect("loads");

        assert!(map.tiles().contains_key(&3));
        let mut rec = QuadRecorder::default();
        map.draw(&mut rec);
        assert!(rec.quads[0].flip_x);
        assert!(!rec.quads[0].flip_y);
    }

    #[test]
    fn draw_before_load_is_a_no_op() {
        let mut map = TileMap::new("test");
        let mut rec = QuadRecorder::default();
        map.draw(&mut rec);
        assert!(rec.quads.is_empty());
        assert_eq!(map.elapsed_ms(), 0);
    }

    #[test]
    fn actors_draw_last_and_follow_their_body() {
        let (mut map, _) = loaded(TileMapConfig::default());
        let hero = map.create_actor("spawn1");
        let tile = map.tile(3).cloned().expect("tile");
        map.actor_mut(hero).expect("actor").add_named_tile("idle", tile, true);

        let kinds: Vec<bool> = map
            .drawables()
            .iter()
            .map(|d| matches!(d, Drawable::Actor(_)))
            .collect();
        assert_eq!(kinds, vec![false, false, false, false, true]);

        let mut rec = QuadRecorder::default();
        map.draw(&mut rec);
        assert_eq!(rec.quads.len(), 7);
        let y_after_one = map.actor(hero).expect("actor").y;
        assert!(y_after_one > 0.0);
        assert_eq!(rec.quads[6].position, vec2(16.0, y_after_one));
    }

    #[test]
    fn decode_issues_are_kept_on_the_map() {
        let sloppy = MAP.replace(r#""tilewidth":16, "tileheight":16"#, r#""tilewidth":"16", "tileheight":16"#);
        let mut m = manager(&sloppy);
        let mut textures = HeadlessTextures::default();
        let mut map = TileMap::new("test");
        map.load(&mut m, &mut textures).expect("still loads");
        assert_eq!(map.decode_issues().len(), 1);
        assert_eq!(map.decode_issues()[0].path, "tilewidth");
        assert_eq!(map.state(), MapState::Ready);
    }

    #[test]
    fn zero_ppm_falls_back_to_tile_height() {
        let mut m = manager(MAP);
        let mut textures = HeadlessTextures::default();
        let mut map = TileMap::new("test");
        map.set_ppm(0.0);
        map.load(&mut m, &mut textures).expect("loads");
        assert_eq!(map.ppm(), 16.0);

        let hero = map.create_actor("spawn1");
        let body = map.actor(hero).and_then(|a| a.body).expect("body");
        assert!(map.physics().body_position(body).is_some_and(|p| p.is_finite()));
        for b in map.static_bodies() {
            assert!(map.physics().body_position(b.body).is_some_and(|p| p.is_finite()));
        }
    }

    #[test]
    fn invalid_configured_ppm_is_ignored() {
        let (map, _) = loaded(TileMapConfig {
            ppm: Some(-4.0),
            ..Default::default()
        });
        assert_eq!(map.ppm(), 16.0);

        let (map, _) = loaded(TileMapConfig {
            ppm: Some(f32::NAN),
            ..Default::default()
        });
        assert_eq!(map.ppm(), 16.0);
    }

    #[test]
    fn every_world_body_is_tracked_after_repeated_init() {
        let mut m = manager(MAP);
        let mut textures = HeadlessTextures::default();
        let mut map = TileMap::new("test");
        map.load(&mut m, &mut textures).expect("loads");
        map.create_actor("spawn1");
        assert_eq!(map.physics().body_count(), map.static_bodies().len() + 1);

        map.init_layers_and_tiles(&mut m, &mut textures);
        map.init_physics();
        map.load(&mut m, &mut textures).expect("reload is a no-op");

        assert_eq!(map.static_bodies().len(), 2);
        assert_eq!(map.physics().body_count(), map.static_bodies().len() + 1);
        assert_eq!(m.ref_count("a"), 1);
        assert_eq!(map.state(), MapState::Ready);
    }
}
