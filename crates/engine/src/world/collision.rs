use tracing::warn;

use super::rect::Rect;
use super::tilemap::{LayerRole, TileMap};

/// World-space blocking boxes, one per collidable cell of the objects layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionIndex {
    rects: Vec<Rect>,
}

impl CollisionIndex {
    pub fn from_rects(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    pub fn from_map(map: &TileMap) -> Self {
        let Some(layer) = map.layer(LayerRole::Objects) else {
            warn!("collision_layer_missing");
            return Self::default();
        };
        let tile_width = map.tile_width() as f32;
        let tile_height = map.tile_height() as f32;
        let rects = layer
            .cells()
            .filter(|(_, _, tile)| map.is_collidable(*tile))
            .map(|(x, y, _)| {
                let (world_x, world_y) = map.cell_origin(x, y);
                Rect::new(world_x, world_y, tile_width, tile_height)
            })
            .collect();
        Self { rects }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// First blocking box overlapping `bounds`, in build order.
    pub fn first_hit(&self, bounds: &Rect) -> Option<&Rect> {
        self.rects.iter().find(|rect| bounds.overlaps(rect))
    }

    pub fn blocks(&self, bounds: &Rect) -> bool {
        self.first_hit(bounds).is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builds_one_rect_per_collidable_objects_cell() {
        let map = TileMap::from_json_str(
            &json!({
                "tilewidth": 16, "tileheight": 8, "width": 3, "height": 2,
                "tilesets": [{ "tiles": [
                    { "id": 15, "properties": [{ "name": "collision", "value": true }] }
                ]}],
                "layers": [
                    { "name": "ground", "data": [16, 16, 16, 16, 16, 16] },
                    { "name": "objects", "data": [0, 16, 0, 4, 0, 16] }
                ]
            })
            .to_string(),
        )
        .expect("map");

        let index = CollisionIndex::from_map(&map);
        assert_eq!(
            index.rects(),
            &[
                Rect::new(16.0, 0.0, 16.0, 8.0),
                Rect::new(32.0, 8.0, 16.0, 8.0),
            ]
        );
    }

    #[test]
    fn missing_objects_layer_gives_empty_index() {
        let map = TileMap::from_json_str(
            &json!({
                "tilewidth": 16, "tileheight": 16, "width": 1, "height": 1,
                "layers": [{ "name": "ground", "data": [1] }]
            })
            .to_string(),
        )
        .expect("map");
        assert!(CollisionIndex::from_map(&map).is_empty());
    }

    #[test]
    fn edge_contact_does_not_block() {
        let index = CollisionIndex::from_rects(vec![Rect::new(16.0, 0.0, 16.0, 16.0)]);
        assert!(!index.blocks(&Rect::new(0.0, 0.0, 16.0, 16.0)));
        assert!(index.blocks(&Rect::new(1.0, 0.0, 16.0, 16.0)));
    }
}
