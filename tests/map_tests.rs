// tests/map_tests.rs

use macroquad_tilemap::{decode_map, encode_map, LayerKind, TileMapData};

const JSON_WITH_EXTRA: &str = r#"
{
  "width":1, "height":1,
  "tilewidth":8, "tileheight":8,
  "dummyField": "ignored",
  "layers": [
    {
      "name":"L",
      "data":[0],
      "opacity": 0.5,
      "properties": []
    }
  ]
}
"#;

#[test]
fn load_ignores_extra_fields() {
    let decoded = decode_map(JSON_WITH_EXTRA);
    assert!(decoded.is_clean());
    assert_eq!(decoded.value.layers[0].name, "L");
    assert_eq!(decoded.value.layers[0].data, vec![0]);
    assert_eq!(decoded.value.layers[0].opacity, 0.5);
}

const EMPTY_NAME_JSON: &str = r#"
{
  "width":1,"height":1,"tilewidth":8,"tileheight":8,
  "layers":[ { "name":"", "data":[1] } ]
}
"#;

#[test]
fn load_allows_empty_layer_name() {
    let map = decode_map(EMPTY_NAME_JSON).value;
    assert_eq!(map.layers[0].name, "");
    assert_eq!(map.layers[0].kind, LayerKind::Tile);
}

#[test]
fn wrong_root_type_yields_default_map() {
    let decoded = decode_map("[1, 2, 3]");
    assert_eq!(decoded.value, TileMapData::default());
    assert_eq!(decoded.issues[0].path, "$");
}

#[test]
fn layer_order_survives_round_trip() {
    let json = r#"{
      "layers":[
        {"name":"back","type":"tilelayer","visible":true,"data":[1]},
        {"name":"spawns","type":"objectgroup","visible":true,
         "objects":[{"id":1,"name":"p","x":1,"y":2,"width":3,"height":4}]},
        {"name":"front","type":"tilelayer","visible":false,"data":[2]}
      ]
    }"#;
    let map = decode_map(json).value;
    let again = decode_map(&encode_map(&map).unwrap()).value;
    let names: Vec<&str> = again.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["back", "spawns", "front"]);
    assert_eq!(again, map);
}
