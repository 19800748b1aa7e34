use super::rendering::Frame;
use super::InputSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Continue,
    Quit,
}

/// What the loop runner drives: one `update` per fixed tick, one `draw` per
/// presented frame.
pub trait Game {
    fn update(&mut self, input: &InputSnapshot) -> GameCommand;
    fn draw(&mut self, frame: &mut Frame<'_>);

    /// Replaces the window title when `Some`.
    fn title(&self) -> Option<String> {
        None
    }

    fn shutdown(&mut self) {}
}
