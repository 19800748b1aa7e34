#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Camera locked on the player: the player's top-left corner always lands on
/// the same screen pixel, everything else is drawn relative to it.
#[derive(Debug, Clone, Copy)]
pub struct PlayerCamera {
    scale: f32,
    center_x: f32,
    center_y: f32,
}

impl PlayerCamera {
    pub fn new(viewport: Viewport, tile_width: u32, tile_height: u32, scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            scale,
            center_x: (viewport.width as f32 / 2.0 - tile_width as f32 / 2.0) / scale,
            center_y: (viewport.height as f32 / 2.0 - tile_height as f32 / 2.0) / scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn world_to_screen(&self, world: (f32, f32), player: (f32, f32)) -> (i32, i32) {
        let x = ((world.0 - player.0) + self.center_x) * self.scale;
        let y = ((world.1 - player.1) + self.center_y) * self.scale;
        (x.round() as i32, y.round() as i32)
    }

    pub fn player_screen(&self) -> (i32, i32) {
        (
            (self.center_x * self.scale).round() as i32,
            (self.center_y * self.scale).round() as i32,
        )
    }
}
