// src/loader/json_loader.rs
use crate::error::{DecodeIssue, MapError};
use crate::map_data::*;
use crate::tileset_data::*;
use serde_json::{Map as JsonObject, Value as JsonValue};
use std::path::Path;

/// Best-effort decode result: the value plus every field that kept its default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub issues: Vec<DecodeIssue>,
}

impl<T> Decoded<T> {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

fn type_name(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Reads fields of one JSON object. A missing or null key yields `None`
/// silently; a key of the wrong type yields `None` and records an issue.
struct FieldReader<'v, 'i> {
    obj: Option<&'v JsonObject<String, JsonValue>>,
    path: String,
    issues: &'i mut Vec<DecodeIssue>,
}

impl<'v, 'i> FieldReader<'v, 'i> {
    fn new(value: &'v JsonValue, path: String, issues: &'i mut Vec<DecodeIssue>) -> Self {
        let obj = value.as_object();
        if obj.is_none() {
            let at = if path.is_empty() { "$".to_owned() } else { path.clone() };
            issues.push(DecodeIssue::new(
                at,
                format!("expected object, found {}", type_name(value)),
            ));
        }
        Self { obj, path, issues }
    }

    fn field(&self, key: &str) -> Option<&'v JsonValue> {
        self.obj?.get(key).filter(|v| !v.is_null())
    }

    fn mismatch(&mut self, key: &str, expected: &str, found: &JsonValue) {
        self.issues.push(DecodeIssue::new(
            join(&self.path, key),
            format!("expected {expected}, found {}", type_name(found)),
        ));
    }

    fn string(&mut self, key: &str) -> Option<String> {
        let v = self.field(key)?;
        match v.as_str() {
            Some(s) => Some(s.to_owned()),
            None => {
                self.mismatch(key, "string", v);
                None
            }
        }
    }

    fn bool(&mut self, key: &str) -> Option<bool> {
        let v = self.field(key)?;
        match v.as_bool() {
            Some(b) => Some(b),
            None => {
                self.mismatch(key, "bool", v);
                None
            }
        }
    }

    fn f32(&mut self, key: &str) -> Option<f32> {
        let v = self.field(key)?;
        match v.as_f64() {
            Some(n) => Some(n as f32),
            None => {
                self.mismatch(key, "number", v);
                None
            }
        }
    }

    fn i32(&mut self, key: &str) -> Option<i32> {
        let v = self.field(key)?;
        match number_as_i64(v).and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                self.mismatch(key, "integer", v);
                None
            }
        }
    }

    fn u32(&mut self, key: &str) -> Option<u32> {
        let v = self.field(key)?;
        match number_as_i64(v).and_then(|n| u32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                self.mismatch(key, "unsigned integer", v);
                None
            }
        }
    }

    fn array(&mut self, key: &str) -> Option<&'v Vec<JsonValue>> {
        let v = self.field(key)?;
        match v.as_array() {
            Some(a) => Some(a),
            None => {
                self.mismatch(key, "array", v);
                None
            }
        }
    }

    fn child_path(&self, key: &str, index: usize) -> String {
        format!("{}[{index}]", join(&self.path, key))
    }
}

/// Integers, or floats truncated toward zero (Tiled writes some ints as floats).
fn number_as_i64(v: &JsonValue) -> Option<i64> {
    v.as_i64()
        .or_else(|| v.as_u64().and_then(|n| i64::try_from(n).ok()))
        .or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
}

/// Registry key for a tileset source: everything before the first `.`.
pub fn normalize_source(source: &str) -> String {
    source.split('.').next().unwrap_or(source).to_owned()
}

fn parse_root(json: &str, issues: &mut Vec<DecodeIssue>) -> Option<JsonValue> {
    match serde_json::from_str::<JsonValue>(json) {
        Ok(v) => Some(v),
        Err(e) => {
            issues.push(DecodeIssue::new("$", format!("malformed JSON: {e}")));
            None
        }
    }
}

fn objects_from_array(r: &mut FieldReader<'_, '_>, key: &str) -> Vec<TileObjectData> {
    let Some(arr) = r.array(key) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(arr.len());
    for (i, v) in arr.iter().enumerate() {
        let path = r.child_path(key, i);
        if let Some(obj) = object_from_value(v, path, &mut *r.issues) {
            out.push(obj);
        }
    }
    out
}

fn object_from_value(
    v: &JsonValue,
    path: String,
    issues: &mut Vec<DecodeIssue>,
) -> Option<TileObjectData> {
    let mut r = FieldReader::new(v, path, issues);
    r.obj?;
    Some(TileObjectData {
        id: r.u32("id").unwrap_or_default(),
        name: r.string("name").unwrap_or_default(),
        x: r.f32("x").unwrap_or_default(),
        y: r.f32("y").unwrap_or_default(),
        width: r.f32("width").unwrap_or_default(),
        height: r.f32("height").unwrap_or_default(),
    })
}

fn layer_from_value(
    v: &JsonValue,
    path: String,
    issues: &mut Vec<DecodeIssue>,
) -> Option<LayerData> {
    let mut r = FieldReader::new(v, path, issues);
    r.obj?;

    let kind = match r.string("type").as_deref() {
        Some("tilelayer") | None => LayerKind::Tile,
        Some("objectgroup") => LayerKind::ObjectGroup,
        Some(other) => {
            let path = join(&r.path, "type");
            r.issues.push(DecodeIssue::new(
                path,
                format!("unsupported layer type '{other}', treated as tile layer"),
            ));
            LayerKind::Tile
        }
    };

    let mut data = Vec::new();
    if let Some(cells) = r.array("data") {
        data.reserve(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            // keep the cell so row-major positions stay aligned
            let gid = cell.as_u64().and_then(|n| u32::try_from(n).ok());
            if gid.is_none() {
                let path = r.child_path("data", i);
                r.issues.push(DecodeIssue::new(
                    path,
                    format!("expected GID, found {}", type_name(cell)),
                ));
            }
            data.push(gid.unwrap_or(0));
        }
    }

    let defaults = LayerData::default();
    Some(LayerData {
        name: r.string("name").unwrap_or_default(),
        kind,
        id: r.i32("id").unwrap_or_default(),
        x: r.i32("x").unwrap_or_default(),
        y: r.i32("y").unwrap_or_default(),
        offset_x: r.f32("offsetx").unwrap_or_default(),
        offset_y: r.f32("offsety").unwrap_or_default(),
        width: r.u32("width").unwrap_or_default(),
        height: r.u32("height").unwrap_or_default(),
        opacity: r.f32("opacity").unwrap_or(defaults.opacity),
        visible: r.bool("visible").unwrap_or(defaults.visible),
        data,
        objects: objects_from_array(&mut r, "objects"),
    })
}

fn tileset_ref_from_value(
    v: &JsonValue,
    path: String,
    issues: &mut Vec<DecodeIssue>,
) -> Option<TileSetRef> {
    let mut r = FieldReader::new(v, path, issues);
    r.obj?;
    Some(TileSetRef {
        source: r.string("source").map(|s| normalize_source(&s)).unwrap_or_default(),
        first_gid: r.u32("firstgid").unwrap_or_default(),
    })
}

fn map_from_value(v: &JsonValue, issues: &mut Vec<DecodeIssue>) -> TileMapData {
    let mut r = FieldReader::new(v, String::new(), issues);

    let mut layers = Vec::new();
    if let Some(arr) = r.array("layers") {
        for (i, l) in arr.iter().enumerate() {
            let path = r.child_path("layers", i);
            if let Some(layer) = layer_from_value(l, path, &mut *r.issues) {
                layers.push(layer);
            }
        }
    }

    let mut tilesets = Vec::new();
    if let Some(arr) = r.array("tilesets") {
        for (i, t) in arr.iter().enumerate() {
            let path = r.child_path("tilesets", i);
            if let Some(ts) = tileset_ref_from_value(t, path, &mut *r.issues) {
                tilesets.push(ts);
            }
        }
    }

    TileMapData {
        name: r.string("name").unwrap_or_default(),
        width: r.u32("width").unwrap_or_default(),
        height: r.u32("height").unwrap_or_default(),
        tile_width: r.u32("tilewidth").unwrap_or_default(),
        tile_height: r.u32("tileheight").unwrap_or_default(),
        layers,
        tilesets,
    }
}

fn tile_object_ref_from_value(
    v: &JsonValue,
    path: String,
    issues: &mut Vec<DecodeIssue>,
) -> Option<TileObjectRef> {
    let mut r = FieldReader::new(v, path, issues);
    r.obj?;

    let mut object_group = None;
    if let Some(g) = r.field("objectgroup") {
        let path = join(&r.path, "objectgroup");
        let mut gr = FieldReader::new(g, path, &mut *r.issues);
        if gr.obj.is_some() {
            object_group = Some(ObjectGroupData {
                objects: objects_from_array(&mut gr, "objects"),
            });
        }
    }

    let mut animation = Vec::new();
    if let Some(frames) = r.array("animation") {
        for (i, f) in frames.iter().enumerate() {
            let path = r.child_path("animation", i);
            let mut fr = FieldReader::new(f, path, &mut *r.issues);
            if fr.obj.is_none() {
                continue;
            }
            animation.push(AnimationFrame {
                tile_id: fr.u32("tileid").unwrap_or_default(),
                duration: fr.u32("duration").unwrap_or_default(),
            });
        }
    }

    Some(TileObjectRef {
        id: r.u32("id").unwrap_or_default(),
        object_group,
        animation,
    })
}

fn tileset_from_value(v: &JsonValue, issues: &mut Vec<DecodeIssue>) -> TileSetData {
    let mut r = FieldReader::new(v, String::new(), issues);

    let orientation = match r.string("orientation").as_deref() {
        Some("orthogonal") | None => Orientation::Orthogonal,
        Some(other) => {
            r.issues.push(DecodeIssue::new(
                "orientation",
                format!("unsupported orientation '{other}'"),
            ));
            Orientation::default()
        }
    };

    let order = match r.string("order") {
        None => RenderOrder::default(),
        Some(name) => RenderOrder::from_name(&name).unwrap_or_else(|| {
            r.issues.push(DecodeIssue::new(
                "order",
                format!("unknown render order '{name}'"),
            ));
            RenderOrder::default()
        }),
    };

    let mut tile_objects = Vec::new();
    if let Some(arr) = r.array("tiles") {
        for (i, t) in arr.iter().enumerate() {
            let path = r.child_path("tiles", i);
            if let Some(tile) = tile_object_ref_from_value(t, path, &mut *r.issues) {
                tile_objects.push(tile);
            }
        }
    }

    TileSetData {
        name: r.string("name").unwrap_or_default(),
        tile_width: r.u32("tilewidth").unwrap_or_default(),
        tile_height: r.u32("tileheight").unwrap_or_default(),
        columns: r.u32("columns").unwrap_or_default(),
        tile_count: r.u32("tilecount").unwrap_or_default(),
        image_name: r.string("image").unwrap_or_default(),
        orientation,
        order,
        tile_objects,
    }
}

/// Decodes a Tiled map document. Never fails: malformed input yields a
/// default-valued map and the reasons in `issues`.
pub fn decode_map(json: &str) -> Decoded<TileMapData> {
    let mut issues = Vec::new();
    let value = parse_root(json, &mut issues)
        .map(|root| map_from_value(&root, &mut issues))
        .unwrap_or_default();
    Decoded { value, issues }
}

/// Decodes a Tiled tileset document, see [`decode_map`].
pub fn decode_tileset(json: &str) -> Decoded<TileSetData> {
    let mut issues = Vec::new();
    let value = parse_root(json, &mut issues)
        .map(|root| tileset_from_value(&root, &mut issues))
        .unwrap_or_default();
    Decoded { value, issues }
}

pub fn encode_map(map: &TileMapData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(map)
}

pub fn encode_tileset(tileset: &TileSetData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tileset)
}

fn read_file(p: &Path) -> Result<String, MapError> {
    std::fs::read_to_string(p).map_err(|source| MapError::Io {
        path: p.to_path_buf(),
        source,
    })
}

pub fn read_map_file(path: impl AsRef<Path>) -> Result<Decoded<TileMapData>, MapError> {
    Ok(decode_map(&read_file(path.as_ref())?))
}

pub fn read_tileset_file(path: impl AsRef<Path>) -> Result<Decoded<TileSetData>, MapError> {
    Ok(decode_tileset(&read_file(path.as_ref())?))
}
