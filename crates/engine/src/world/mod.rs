mod collision;
mod events;
mod movement;
mod player;
mod rect;
mod tilemap;

pub use collision::CollisionIndex;
pub use events::{EventManager, MeetEvent, ProximityEvent, RegionEvent};
pub use movement::{resolve_move, MoveOutcome, WorldBounds};
pub use player::{Direction, Player};
pub use rect::Rect;
pub use tilemap::{Layer, LayerRole, TileId, TileMap, TileMapError, TileProperties, EMPTY_TILE};
