mod game;
mod input;
mod key_events;
mod loop_runner;
mod rendering;
mod stager;

pub use game::{Game, GameCommand};
pub use input::{InputKey, InputSnapshot, KeySource, KeyStates};
pub use key_events::KeyEventManager;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{
    text_width, wrap_text, AtlasError, Frame, PlayerCamera, Renderer, Rgba, TileAtlas, Viewport,
    GLYPH_ADVANCE, LINE_ADVANCE, TEXT_SCALE,
};
pub use stager::{Stage, StageChangeHook, Stager};
