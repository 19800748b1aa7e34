/// Logical keys the frame driver tracks. Physical keys map onto these in the loop runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputKey {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Quit,
    Journal,
    Menu,
}

const KEY_COUNT: usize = 8;

impl InputKey {
    pub const ALL: [InputKey; KEY_COUNT] = [
        InputKey::Up,
        InputKey::Down,
        InputKey::Left,
        InputKey::Right,
        InputKey::Confirm,
        InputKey::Quit,
        InputKey::Journal,
        InputKey::Menu,
    ];

    const fn index(self) -> usize {
        match self {
            InputKey::Up => 0,
            InputKey::Down => 1,
            InputKey::Left => 2,
            InputKey::Right => 3,
            InputKey::Confirm => 4,
            InputKey::Quit => 5,
            InputKey::Journal => 6,
            InputKey::Menu => 7,
        }
    }
}

/// "Is key K down right now" capability.
pub trait KeySource {
    fn is_key_down(&self, key: InputKey) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyStates {
    down: [bool; KEY_COUNT],
}

impl KeyStates {
    pub fn set(&mut self, key: InputKey, is_down: bool) {
        self.down[key.index()] = is_down;
    }

    pub fn is_down(&self, key: InputKey) -> bool {
        self.down[key.index()]
    }

    pub fn any_down(&self) -> bool {
        self.down.iter().any(|down| *down)
    }
}

impl KeySource for KeyStates {
    fn is_key_down(&self, key: InputKey) -> bool {
        self.is_down(key)
    }
}

/// Everything a game sees of the platform input for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    keys: KeyStates,
    cursor_position_px: Option<(f32, f32)>,
    left_mouse_down: bool,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_key_down(mut self, key: InputKey, is_down: bool) -> Self {
        self.keys.set(key, is_down);
        self
    }

    pub fn with_keys(mut self, keys: KeyStates) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<(f32, f32)>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_left_mouse_down(mut self, left_mouse_down: bool) -> Self {
        self.left_mouse_down = left_mouse_down;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn keys(&self) -> KeyStates {
        self.keys
    }

    pub fn cursor_position_px(&self) -> Option<(f32, f32)> {
        self.cursor_position_px
    }

    pub fn left_mouse_down(&self) -> bool {
        self.left_mouse_down
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

impl KeySource for InputSnapshot {
    fn is_key_down(&self, key: InputKey) -> bool {
        self.keys.is_down(key)
    }
}
