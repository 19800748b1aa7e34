use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub type TileId = u32;

/// Tile id reserved for empty cells.
pub const EMPTY_TILE: TileId = 0;

const COLLISION_PROPERTY: &str = "collision";
const ROLE_PROPERTY: &str = "role";
const TILE_LAYER_KIND: &str = "tilelayer";

#[derive(Debug, Error)]
pub enum TileMapError {
    #[error("failed to read map file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse map document at {at}: {source}")]
    Parse {
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("map tile size must be non-zero, got {tile_width}x{tile_height}")]
    ZeroTileSize { tile_width: u32, tile_height: u32 },
    #[error("map of {width}x{height} tiles at {tile_width}x{tile_height} px is too large")]
    TooLarge {
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    },
    #[error("layer '{layer}' is {actual_width}x{actual_height}, map is {expected_width}x{expected_height}")]
    LayerShape {
        layer: String,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("layer '{layer}' has {actual} tiles, expected {expected}")]
    DataLength {
        layer: String,
        expected: usize,
        actual: usize,
    },
}

/// What a layer is used for. Resolved once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerRole {
    Ground,
    Objects,
    Spawn,
}

impl LayerRole {
    const ALL: [LayerRole; 3] = [LayerRole::Ground, LayerRole::Objects, LayerRole::Spawn];

    const fn slot(self) -> usize {
        match self {
            LayerRole::Ground => 0,
            LayerRole::Objects => 1,
            LayerRole::Spawn => 2,
        }
    }

    /// Positional fallback used when neither a `role` property nor a known name matches.
    const fn fallback_index(self) -> usize {
        self.slot()
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "ground" | "floor" => Some(LayerRole::Ground),
            "collision" | "objects" | "obstacles" => Some(LayerRole::Objects),
            "spawn" | "spawns" | "markers" => Some(LayerRole::Spawn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileProperties {
    pub collision: bool,
}

/// One tile layer stored column-major: `tiles[x][y]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: String,
    width: u32,
    height: u32,
    tiles: Vec<Vec<TileId>>,
}

impl Layer {
    /// Builds a layer from row-major data (`index = y * width + x`).
    fn from_row_major(
        name: String,
        width: u32,
        height: u32,
        data: &[TileId],
    ) -> Result<Self, TileMapError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(TileMapError::DataLength {
                layer: name,
                expected,
                actual: data.len(),
            });
        }
        let mut tiles = vec![vec![EMPTY_TILE; height as usize]; width as usize];
        for (index, tile) in data.iter().copied().enumerate() {
            let x = index % width as usize;
            let y = index / width as usize;
            tiles[x][y] = tile;
        }
        Ok(Self {
            name,
            width,
            height,
            tiles,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile(&self, x: u32, y: u32) -> Option<TileId> {
        self.tiles
            .get(x as usize)
            .and_then(|column| column.get(y as usize))
            .copied()
    }

    /// Signed lookup; anything outside the grid is `None`.
    pub fn tile_signed(&self, x: i64, y: i64) -> Option<TileId> {
        if x < 0 || y < 0 {
            return None;
        }
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.tile(x, y)
    }

    /// Cells in row-major order, the same order as the source document.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, TileId)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .map(move |(x, y)| (x, y, self.tiles[x as usize][y as usize]))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    tile_width: u32,
    tile_height: u32,
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    role_layers: [Option<usize>; 3],
    tile_properties: HashMap<TileId, TileProperties>,
}

impl TileMap {
    pub fn load(path: &Path) -> Result<Self, TileMapError> {
        let raw = fs::read_to_string(path).map_err(|source| TileMapError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            width = map.width,
            height = map.height,
            tile_width = map.tile_width,
            tile_height = map.tile_height,
            layer_count = map.layers.len(),
            collision_tile_count = map.collision_tile_ids().count(),
            "map_loaded"
        );
        Ok(map)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TileMapError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let document = serde_path_to_error::deserialize::<_, MapDocument>(&mut deserializer)
            .map_err(|error| {
                let at = error.path().to_string();
                TileMapError::Parse {
                    at,
                    source: error.into_inner(),
                }
            })?;
        Self::from_document(document)
    }

    fn from_document(document: MapDocument) -> Result<Self, TileMapError> {
        if document.tilewidth == 0 || document.tileheight == 0 {
            return Err(TileMapError::ZeroTileSize {
                tile_width: document.tilewidth,
                tile_height: document.tileheight,
            });
        }
        let pixel_width = document.width.checked_mul(document.tilewidth);
        let pixel_height = document.height.checked_mul(document.tileheight);
        if pixel_width.is_none() || pixel_height.is_none() {
            return Err(TileMapError::TooLarge {
                width: document.width,
                height: document.height,
                tile_width: document.tilewidth,
                tile_height: document.tileheight,
            });
        }

        let mut layers = Vec::new();
        let mut declared_roles = Vec::new();
        for layer in document.layers {
            if !layer.kind.is_empty() && layer.kind != TILE_LAYER_KIND {
                debug!(layer = layer.name.as_str(), kind = layer.kind.as_str(), "map_layer_skipped");
                continue;
            }
            let width = layer.width.unwrap_or(document.width);
            let height = layer.height.unwrap_or(document.height);
            if width != document.width || height != document.height {
                return Err(TileMapError::LayerShape {
                    layer: layer.name,
                    expected_width: document.width,
                    expected_height: document.height,
                    actual_width: width,
                    actual_height: height,
                });
            }
            let role = layer
                .properties
                .iter()
                .find(|property| property.name == ROLE_PROPERTY)
                .and_then(|property| property.value.as_str())
                .and_then(LayerRole::from_label)
                .or_else(|| LayerRole::from_label(&layer.name));
            declared_roles.push(role);
            layers.push(Layer::from_row_major(layer.name, width, height, &layer.data)?);
        }

        let role_layers = resolve_role_layers(&declared_roles);
        let tile_properties = collect_tile_properties(&document.tilesets);

        Ok(Self {
            tile_width: document.tilewidth,
            tile_height: document.tileheight,
            width: document.width,
            height: document.height,
            layers,
            role_layers,
            tile_properties,
        })
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_width(&self) -> f32 {
        (self.width * self.tile_width) as f32
    }

    pub fn pixel_height(&self) -> f32 {
        (self.height * self.tile_height) as f32
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, role: LayerRole) -> Option<&Layer> {
        self.role_layers[role.slot()].and_then(|index| self.layers.get(index))
    }

    pub fn layer_index(&self, role: LayerRole) -> Option<usize> {
        self.role_layers[role.slot()]
    }

    pub fn tile_properties(&self, tile: TileId) -> Option<TileProperties> {
        self.tile_properties.get(&tile).copied()
    }

    pub fn is_collidable(&self, tile: TileId) -> bool {
        self.tile_properties(tile)
            .map(|properties| properties.collision)
            .unwrap_or(false)
    }

    pub fn collision_tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tile_properties
            .iter()
            .filter(|(_, properties)| properties.collision)
            .map(|(tile, _)| *tile)
    }

    /// World-space top-left corner of a cell.
    pub fn cell_origin(&self, x: u32, y: u32) -> (f32, f32) {
        ((x * self.tile_width) as f32, (y * self.tile_height) as f32)
    }

    /// Cell containing a world-space point. May lie outside the grid.
    pub fn cell_at(&self, world_x: f32, world_y: f32) -> (i64, i64) {
        (
            (world_x / self.tile_width as f32).floor() as i64,
            (world_y / self.tile_height as f32).floor() as i64,
        )
    }

    /// First cell of the role's layer holding `tile`, scanning in document order.
    pub fn find_first(&self, role: LayerRole, tile: TileId) -> Option<(u32, u32)> {
        self.layer(role)?
            .cells()
            .find(|(_, _, id)| *id == tile)
            .map(|(x, y, _)| (x, y))
    }
}

fn resolve_role_layers(declared: &[Option<LayerRole>]) -> [Option<usize>; 3] {
    let mut role_layers = [None; 3];
    for (index, role) in declared.iter().enumerate() {
        if let Some(role) = role {
            if role_layers[role.slot()].is_none() {
                role_layers[role.slot()] = Some(index);
            }
        }
    }
    for role in LayerRole::ALL {
        if role_layers[role.slot()].is_some() {
            continue;
        }
        let index = role.fallback_index();
        let claimed = role_layers.iter().any(|slot| *slot == Some(index));
        if index < declared.len() && declared[index].is_none() && !claimed {
            role_layers[role.slot()] = Some(index);
        } else {
            warn!(role = ?role, "map_layer_role_unresolved");
        }
    }
    role_layers
}

fn collect_tile_properties(tilesets: &[TilesetDocument]) -> HashMap<TileId, TileProperties> {
    let mut properties = HashMap::new();
    for tileset in tilesets {
        for tile in &tileset.tiles {
            let collision = tile
                .properties
                .iter()
                .filter(|property| property.name == COLLISION_PROPERTY)
                .any(|property| property_is_truthy(&property.value));
            properties.insert(
                tileset.firstgid + tile.id,
                TileProperties { collision },
            );
        }
    }
    properties
}

/// A property counts as set unless its value is explicitly false.
fn property_is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::String(text) => !text.trim().eq_ignore_ascii_case("false"),
        _ => true,
    }
}

#[derive(Debug, Deserialize)]
struct MapDocument {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    tilesets: Vec<TilesetDocument>,
    layers: Vec<LayerDocument>,
}

fn default_firstgid() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct TilesetDocument {
    #[serde(default = "default_firstgid")]
    firstgid: u32,
    #[serde(default)]
    tiles: Vec<TileDocument>,
}

#[derive(Debug, Deserialize)]
struct TileDocument {
    id: u32,
    #[serde(default)]
    properties: Vec<PropertyDocument>,
}

#[derive(Debug, Deserialize)]
struct PropertyDocument {
    name: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct LayerDocument {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    data: Vec<TileId>,
    #[serde(default)]
    properties: Vec<PropertyDocument>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    fn map_from(value: serde_json::Value) -> TileMap {
        TileMap::from_json_str(&value.to_string()).expect("map")
    }

    #[test]
    fn row_major_data_lands_in_column_major_layer() {
        let data = [1, 2, 3, 4, 5, 6];
        let map = map_from(json!({
            "tilewidth": 16, "tileheight": 16, "width": 3, "height": 2,
            "layers": [{ "data": data }]
        }));
        let layer = &map.layers()[0];
        for y in 0..2u32 {
            for x in 0..3u32 {
                assert_eq!(
                    layer.tile(x, y),
                    Some(data[(y * 3 + x) as usize]),
                    "x={x} y={y}"
                );
            }
        }
        assert_eq!(layer.tile(3, 0), None);
        assert_eq!(layer.tile(0, 2), None);
    }

    #[test]
    fn collision_ids_are_shifted_by_firstgid() {
        let map = map_from(json!({
            "tilewidth": 16, "tileheight": 16, "width": 1, "height": 1,
            "tilesets": [{
                "tiles": [
                    { "id": 15, "properties": [{ "name": "collision", "type": "bool", "value": true }] },
                    { "id": 3, "properties": [{ "name": "light", "value": "yes" }] }
                ]
            }],
            "layers": [{ "data": [0] }]
        }));
        assert!(map.is_collidable(16));
        assert!(!map.is_collidable(15));
        assert!(!map.is_collidable(4));
        assert_eq!(map.tile_properties(4), Some(TileProperties { collision: false }));
        assert_eq!(map.tile_properties(99), None);
    }

    #[test]
    fn explicit_false_collision_property_is_not_collidable() {
        let map = map_from(json!({
            "tilewidth": 8, "tileheight": 8, "width": 1, "height": 1,
            "tilesets": [{
                "firstgid": 101,
                "tiles": [
                    { "id": 0, "properties": [{ "name": "collision", "value": false }] },
                    { "id": 1, "properties": [{ "name": "collision", "value": "false" }] },
                    { "id": 2, "properties": [{ "name": "collision", "value": "" }] }
                ]
            }],
            "layers": [{ "data": [0] }]
        }));
        assert!(!map.is_collidable(101));
        assert!(!map.is_collidable(102));
        assert!(map.is_collidable(103));
    }

    #[test]
    fn roles_resolve_by_name_before_position() {
        let map = map_from(json!({
            "tilewidth": 16, "tileheight": 16, "width": 1, "height": 1,
            "layers": [
                { "name": "spawn", "data": [10] },
                { "name": "ground", "data": [1] },
                { "name": "Obstacles", "data": [16] }
            ]
        }));
        assert_eq!(map.layer_index(LayerRole::Spawn), Some(0));
        assert_eq!(map.layer_index(LayerRole::Ground), Some(1));
        assert_eq!(map.layer_index(LayerRole::Objects), Some(2));
    }

    #[test]
    fn role_property_wins_over_name() {
        let map = map_from(json!({
            "tilewidth": 16, "tileheight": 16, "width": 1, "height": 1,
            "layers": [
                { "name": "Tile Layer 1", "data": [1] },
                { "name": "ground", "data": [2],
                  "properties": [{ "name": "role", "type": "string", "value": "objects" }] }
            ]
        }));
        assert_eq!(map.layer_index(LayerRole::Objects), Some(1));
        assert_eq!(map.layer_index(LayerRole::Ground), Some(0));
        assert_eq!(map.layer_index(LayerRole::Spawn), None);
    }

    #[test]
    fn unnamed_layers_fall_back_to_positional_roles() {
        let map = map_from(json!({
            "tilewidth": 16, "tileheight": 16, "width": 1, "height": 1,
            "layers": [
                { "name": "Tile Layer 1", "data": [1] },
                { "name": "Tile Layer 2", "data": [2] },
                { "name": "Tile Layer 3", "data": [3] }
            ]
        }));
        assert_eq!(map.layer_index(LayerRole::Ground), Some(0));
        assert_eq!(map.layer_index(LayerRole::Objects), Some(1));
        assert_eq!(map.layer_index(LayerRole::Spawn), Some(2));
        assert_eq!(map.layer(LayerRole::Spawn).and_then(|l| l.tile(0, 0)), Some(3));
    }

    #[test]
    fn object_groups_are_skipped() {
        let map = map_from(json!({
            "tilewidth": 16, "tileheight": 16, "width": 1, "height": 1,
            "layers": [
                { "type": "tilelayer", "data": [1] },
                { "type": "objectgroup", "name": "notes" }
            ]
        }));
        assert_eq!(map.layers().len(), 1);
    }

    #[test]
    fn short_layer_data_is_rejected() {
        let err = TileMap::from_json_str(
            &json!({
                "tilewidth": 16, "tileheight": 16, "width": 2, "height": 2,
                "layers": [{ "name": "ground", "data": [1, 2, 3] }]
            })
            .to_string(),
        )
        .expect_err("short data");
        assert!(matches!(
            err,
            TileMapError::DataLength { expected: 4, actual: 3, .. }
        ));
    }

    #[test]
    fn mismatched_layer_shape_is_rejected() {
        let err = TileMap::from_json_str(
            &json!({
                "tilewidth": 16, "tileheight": 16, "width": 2, "height": 2,
                "layers": [{ "width": 1, "height": 4, "data": [1, 2, 3, 4] }]
            })
            .to_string(),
        )
        .expect_err("bad shape");
        assert!(matches!(err, TileMapError::LayerShape { .. }));
    }

    #[test]
    fn parse_errors_carry_the_json_path() {
        let err = TileMap::from_json_str(
            r#"{"tilewidth":16,"tileheight":16,"width":1,"height":1,"layers":[{"data":["x"]}]}"#,
        )
        .expect_err("bad data");
        match err {
            TileMapError::Parse { at, .. } => assert!(at.starts_with("layers[0].data"), "{at}"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let err = TileMap::from_json_str(
            &json!({ "tilewidth": 0, "tileheight": 16, "width": 1, "height": 1, "layers": [] })
                .to_string(),
        )
        .expect_err("zero tile");
        assert!(matches!(err, TileMapError::ZeroTileSize { .. }));
    }

    #[test]
    fn pixel_size_overflow_is_rejected() {
        let err = TileMap::from_json_str(
            &json!({ "tilewidth": 70000, "tileheight": 16, "width": 70000, "height": 0, "layers": [] })
                .to_string(),
        )
        .expect_err("too large");
        assert!(matches!(err, TileMapError::TooLarge { width: 70000, .. }));
    }

    #[test]
    fn load_reads_from_disk_and_reports_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("map.json");
        let mut file = fs::File::create(&path).expect("create");
        write!(
            file,
            "{}",
            json!({
                "tilewidth": 16, "tileheight": 16, "width": 2, "height": 1,
                "layers": [{ "data": [1, 1] }]
            })
        )
        .expect("write");

        let map = TileMap::load(&path).expect("load");
        assert_eq!((map.width(), map.height()), (2, 1));
        assert_eq!(map.pixel_width(), 32.0);

        let missing = TileMap::load(&dir.path().join("missing.json")).expect_err("missing");
        assert!(matches!(missing, TileMapError::Read { .. }));
    }

    #[test]
    fn find_first_scans_in_document_order() {
        let map = map_from(json!({
            "tilewidth": 16, "tileheight": 16, "width": 3, "height": 2,
            "layers": [
                { "name": "ground", "data": [1, 1, 1, 1, 1, 1] },
                { "name": "objects", "data": [0, 0, 0, 0, 0, 0] },
                { "name": "spawn", "data": [0, 0, 0, 10, 0, 10] }
            ]
        }));
        assert_eq!(map.find_first(LayerRole::Spawn, 10), Some((0, 1)));
        assert_eq!(map.find_first(LayerRole::Spawn, 11), None);
        assert_eq!(map.cell_origin(0, 1), (0.0, 16.0));
        assert_eq!(map.cell_at(-0.5, 31.9), (-1, 1));
    }
}
