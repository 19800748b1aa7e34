use super::rect::Rect;

const ANIMATION_SPEED_PER_TICK: f32 = 0.1;
const WALK_FRAME_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in world axes (y grows downwards).
    pub fn delta(self) -> (f32, f32) {
        match self {
            Direction::None => (0.0, 0.0),
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    name: String,
    bounds: Rect,
    speed: f32,
    facing: Direction,
    dead: bool,
    walk_phase: f32,
}

impl Player {
    pub fn new(width: f32, height: f32, speed: f32) -> Self {
        Self {
            name: String::new(),
            bounds: Rect::new(0.0, 0.0, width, height),
            speed,
            facing: Direction::None,
            dead: false,
            walk_phase: 0.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn x(&self) -> f32 {
        self.bounds.x
    }

    pub fn y(&self) -> f32 {
        self.bounds.y
    }

    /// Records `direction` as the facing and steps `speed` pixels along it.
    /// Knows nothing about collisions.
    pub fn move_in(&mut self, direction: Direction) {
        self.facing = direction;
        let (dx, dy) = direction.delta();
        self.bounds.x += dx * self.speed;
        self.bounds.y += dy * self.speed;
    }

    pub(crate) fn nudge(&mut self, dx: f32, dy: f32) {
        self.bounds.x += dx;
        self.bounds.y += dy;
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.bounds.x = x;
        self.bounds.y = y;
    }

    /// Advances the walk animation while the player is heading somewhere.
    pub fn update(&mut self) {
        if self.facing == Direction::None {
            return;
        }
        self.walk_phase = (self.walk_phase + ANIMATION_SPEED_PER_TICK) % WALK_FRAME_COUNT as f32;
    }

    pub fn walk_frame(&self) -> usize {
        (self.walk_phase as usize).min(WALK_FRAME_COUNT - 1)
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn reset(&mut self) {
        self.dead = false;
    }

    pub fn dead(&self) -> bool {
        self.dead
    }

    pub fn set_dead(&mut self, dead: bool) {
        self.dead = dead;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
