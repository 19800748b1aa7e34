use super::collision::CollisionIndex;
use super::player::{Direction, Player};
use super::tilemap::TileMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn of_map(map: &TileMap) -> Self {
        Self {
            width: map.pixel_width(),
            height: map.pixel_height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Blocked,
    OutOfBounds,
    Ignored,
}

/// Moves the player one step of `speed` pixels, or not at all.
///
/// The world edge is checked first. Then the full step is tried against every
/// blocking box; the first overlap cancels the move and leaves facing untouched.
/// A clear path commits through [`Player::move_in`], which also records facing.
pub fn resolve_move(
    player: &mut Player,
    direction: Direction,
    collisions: &CollisionIndex,
    bounds: WorldBounds,
) -> MoveOutcome {
    if player.dead() || direction == Direction::None {
        return MoveOutcome::Ignored;
    }
    if !within_bounds(player, direction, bounds) {
        return MoveOutcome::OutOfBounds;
    }

    let (dx, dy) = direction.delta();
    let step_x = dx * player.speed();
    let step_y = dy * player.speed();
    player.nudge(step_x, step_y);
    let blocked = collisions.blocks(&player.bounds());
    player.nudge(-step_x, -step_y);
    if blocked {
        return MoveOutcome::Blocked;
    }

    player.move_in(direction);
    MoveOutcome::Moved
}

fn within_bounds(player: &Player, direction: Direction, bounds: WorldBounds) -> bool {
    let rect = player.bounds();
    match direction {
        Direction::None => true,
        Direction::Up => rect.y > 0.0,
        Direction::Down => rect.y + rect.height < bounds.height,
        Direction::Left => rect.x > 0.0,
        Direction::Right => rect.x + rect.width < bounds.width,
    }
}
