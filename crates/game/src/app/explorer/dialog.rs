use std::collections::VecDeque;

use engine::{text_width, wrap_text, Frame, Rgba, LINE_ADVANCE};

pub(crate) const CONTINUE_HINT: &str = "Press Enter to continue";

const MAX_TEXT_WIDTH: i32 = 800;
const PANEL_PADDING: i32 = 50;
const HINT_BOTTOM_MARGIN: i32 = 30;
const PANEL_COLOR: Rgba = [20, 24, 32, 200];
const PANEL_BORDER_COLOR: Rgba = [200, 200, 200, 255];
const TEXT_COLOR: Rgba = [240, 240, 240, 255];
const HINT_COLOR: Rgba = [110, 110, 110, 255];

/// Pages waiting to be read. Events firing while a page is open queue behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Dialog {
    pages: VecDeque<String>,
}

impl Dialog {
    pub(crate) fn push(&mut self, text: impl Into<String>) {
        self.pages.push_back(text.into());
    }

    pub(crate) fn text(&self) -> &str {
        self.pages.front().map(String::as_str).unwrap_or_default()
    }

    /// Drops the current page. Returns `true` while more pages remain.
    pub(crate) fn advance(&mut self) -> bool {
        self.pages.pop_front();
        !self.pages.is_empty()
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        let max_width = MAX_TEXT_WIDTH.min(frame.width() as i32 - PANEL_PADDING * 4);
        let lines = wrap_text(self.text(), max_width.max(1));
        let text_block_width = lines.iter().map(|line| text_width(line)).max().unwrap_or(0);
        let panel_width = text_block_width + PANEL_PADDING * 2;
        let panel_height = lines.len() as i32 * LINE_ADVANCE + PANEL_PADDING * 2;
        let panel_x = (frame.width() as i32 - panel_width) / 2;
        let panel_y = (frame.height() as i32 - panel_height) / 2;

        frame.fill_rect(panel_x, panel_y, panel_width, panel_height, PANEL_COLOR);
        frame.outline_rect(panel_x, panel_y, panel_width, panel_height, PANEL_BORDER_COLOR);
        frame.draw_lines(
            panel_x + PANEL_PADDING,
            panel_y + PANEL_PADDING,
            &lines,
            TEXT_COLOR,
        );
        draw_hint(frame, CONTINUE_HINT, HINT_COLOR);
    }
}

/// Centred line near the bottom edge of the frame.
pub(crate) fn draw_hint(frame: &mut Frame<'_>, hint: &str, color: Rgba) {
    let x = (frame.width() as i32 - text_width(hint)) / 2;
    let y = frame.height() as i32 - HINT_BOTTOM_MARGIN - LINE_ADVANCE;
    frame.draw_text(x, y, hint, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_read_in_order() {
        let mut dialog = Dialog::default();
        assert_eq!(dialog.text(), "");
        dialog.push("first");
        dialog.push("second");
        assert_eq!(dialog.text(), "first");
        assert!(dialog.advance());
        assert_eq!(dialog.text(), "second");
        assert!(!dialog.advance());
        assert!(!dialog.advance());
    }

    #[test]
    fn draws_panel_behind_text() {
        let mut dialog = Dialog::default();
        dialog.push("The parachute is torn.");
        assert_eq!(dialog.text(), "The parachute is torn.");

        let mut pixels = vec![255u8; 400 * 300 * 4];
        let mut frame = Frame::new(&mut pixels, 400, 300);
        dialog.draw(&mut frame);

        let center = frame.pixel(200, 150).expect("center");
        assert_ne!(center, [255, 255, 255, 255]);
        assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    }
}
