use engine::{Direction, Player, TileId};

pub(crate) const PLANT_FIRST: TileId = 4;
const PLANT_FRAMES: u32 = 4;
const PLANT_SPEED_PER_TICK: f32 = 0.05;
pub(crate) const PLAYER_BACK: TileId = 8;
pub(crate) const PLAYER_FORWARD: TileId = 10;
pub(crate) const PLAYER_LEFT: TileId = 12;
pub(crate) const PLAYER_RIGHT: TileId = 14;

/// Spawn layer cells holding this id mark where the player starts.
pub(crate) const SPAWN_MARKER: TileId = PLAYER_FORWARD;

/// Sprite for the player's current heading and walk frame. A player standing
/// still shows the static forward sprite.
pub(crate) fn player_sprite(player: &Player) -> TileId {
    let first = match player.facing() {
        Direction::None => return PLAYER_FORWARD,
        Direction::Up => PLAYER_BACK,
        Direction::Down => PLAYER_FORWARD,
        Direction::Left => PLAYER_LEFT,
        Direction::Right => PLAYER_RIGHT,
    };
    first + player.walk_frame() as TileId
}

/// Looping run of consecutive tile ids standing in for one map tile.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TileAnimation {
    first: TileId,
    frames: u32,
    speed: f32,
    phase: f32,
}

impl TileAnimation {
    pub(crate) fn new(first: TileId, frames: u32, speed: f32) -> Self {
        Self {
            first,
            frames: frames.max(1),
            speed,
            phase: 0.0,
        }
    }

    pub(crate) fn plant() -> Self {
        Self::new(PLANT_FIRST, PLANT_FRAMES, PLANT_SPEED_PER_TICK)
    }

    pub(crate) fn advance(&mut self) {
        self.phase = (self.phase + self.speed) % self.frames as f32;
    }

    pub(crate) fn current(&self) -> TileId {
        self.first + (self.phase as u32).min(self.frames - 1)
    }

    /// The frame to draw in place of `tile`, or `tile` itself when it is not animated.
    pub(crate) fn resolve(&self, tile: TileId) -> TileId {
        if tile == self.first {
            self.current()
        } else {
            tile
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_player_uses_forward_sprite() {
        let player = Player::new(16.0, 16.0, 4.0);
        assert_eq!(player_sprite(&player), PLAYER_FORWARD);
    }

    #[test]
    fn walking_player_alternates_frames() {
        let mut player = Player::new(16.0, 16.0, 4.0);
        player.move_in(Direction::Left);
        assert_eq!(player_sprite(&player), PLAYER_LEFT);
        for _ in 0..11 {
            player.update();
        }
        assert_eq!(player_sprite(&player), PLAYER_LEFT + 1);

        player.move_in(Direction::Up);
        assert!([PLAYER_BACK, PLAYER_BACK + 1].contains(&player_sprite(&player)));
    }

    #[test]
    fn plant_cycles_through_four_frames() {
        let mut plant = TileAnimation::plant();
        let mut seen = Vec::new();
        for _ in 0..80 {
            let current = plant.current();
            if seen.last() != Some(&current) {
                seen.push(current);
            }
            plant.advance();
        }
        assert_eq!(seen, vec![4, 5, 6, 7]);
        assert_eq!(plant.resolve(1), 1);
        assert_eq!(plant.resolve(PLANT_FIRST), plant.current());
    }
}
