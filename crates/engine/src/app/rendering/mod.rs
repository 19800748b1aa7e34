mod atlas;
mod camera;
mod frame;
mod renderer;

pub use atlas::{AtlasError, TileAtlas};
pub use camera::{PlayerCamera, Viewport};
pub use frame::{text_width, wrap_text, Frame, Rgba, GLYPH_ADVANCE, LINE_ADVANCE, TEXT_SCALE};
pub use renderer::Renderer;
