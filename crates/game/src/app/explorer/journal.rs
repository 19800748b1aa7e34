use engine::{Frame, InputSnapshot, Rgba, TileAtlas, TileId, LINE_ADVANCE, TEXT_SCALE};

use super::actions::GameAction;

const ORIGIN_X: i32 = 50;
const ORIGIN_Y: i32 = 50;
const ITEM_HEIGHT: i32 = 50;
const PADDING: i32 = 10;
const RIGHT_MARGIN: i32 = 50;
const IMAGE_WIDTH: i32 = 40;
const TEXT_OFFSET_X: i32 = 50;

const BACKGROUND_COLOR: Rgba = [0, 0, 0, 200];
const HOVER_COLOR: Rgba = [50, 50, 50, 255];
const SELECTED_COLOR: Rgba = [100, 100, 100, 255];
const TEXT_COLOR: Rgba = [255, 255, 255, 255];
const EMPTY_TEXT: &str = "Journal is empty";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JournalRecord {
    pub(crate) image: TileId,
    pub(crate) description: String,
    pub(crate) replay: GameAction,
}

/// Discovered lore, newest last, with pointer hover/press tracking.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal {
    records: Vec<JournalRecord>,
    hovered: Option<usize>,
    pressed: Option<usize>,
    mouse_was_down: bool,
}

impl Journal {
    pub(crate) fn push(&mut self, record: JournalRecord) {
        self.records.push(record);
    }

    pub(crate) fn records(&self) -> &[JournalRecord] {
        &self.records
    }

    #[cfg(test)]
    pub(crate) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub(crate) fn reset_pointer(&mut self) {
        self.hovered = None;
        self.pressed = None;
        self.mouse_was_down = false;
    }

    /// Tracks the pointer and returns the replay action of a record clicked
    /// this tick. Holding the button down does not repeat the replay.
    pub(crate) fn update(&mut self, input: &InputSnapshot) -> Option<GameAction> {
        let (screen_width, _) = input.window_size();
        self.hovered = input
            .cursor_position_px()
            .and_then(|cursor| self.record_at(cursor, screen_width));

        let mouse_down = input.left_mouse_down();
        let just_pressed = mouse_down && !self.mouse_was_down;
        self.mouse_was_down = mouse_down;
        if !mouse_down {
            self.pressed = None;
            return None;
        }
        if !just_pressed {
            return None;
        }
        let index = self.hovered?;
        self.pressed = Some(index);
        Some(self.records[index].replay.clone())
    }

    pub(crate) fn record_at(&self, cursor: (f32, f32), screen_width: u32) -> Option<usize> {
        let (x, y) = cursor;
        let left = ORIGIN_X as f32;
        let right = (ORIGIN_X + panel_width(screen_width)) as f32;
        if x < left || x > right {
            return None;
        }
        (0..self.records.len()).find(|index| {
            let top = item_top(*index) as f32;
            y >= top && y <= top + ITEM_HEIGHT as f32
        })
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>, atlas: &TileAtlas) {
        let width = panel_width(frame.width());
        let rows = self.records.len().max(1) as i32;
        let height = rows * (ITEM_HEIGHT + PADDING) + PADDING;
        frame.fill_rect(ORIGIN_X, ORIGIN_Y, width, height, BACKGROUND_COLOR);

        let text_x = ORIGIN_X + PADDING + TEXT_OFFSET_X;
        let text_dy = (ITEM_HEIGHT - (LINE_ADVANCE - 2 * TEXT_SCALE)) / 2;
        if self.records.is_empty() {
            frame.draw_text(text_x, item_top(0) + text_dy, EMPTY_TEXT, TEXT_COLOR);
            return;
        }

        for (index, record) in self.records.iter().enumerate() {
            let top = item_top(index);
            let highlight = if self.pressed == Some(index) {
                Some(SELECTED_COLOR)
            } else if self.hovered == Some(index) {
                Some(HOVER_COLOR)
            } else {
                None
            };
            if let Some(color) = highlight {
                frame.fill_rect(ORIGIN_X + PADDING, top, width - PADDING * 2, ITEM_HEIGHT, color);
            }

            let scale = (IMAGE_WIDTH as f32 / atlas.tile_width() as f32)
                .min(ITEM_HEIGHT as f32 / atlas.tile_height() as f32);
            frame.draw_tile(atlas, record.image, ORIGIN_X + PADDING, top, scale);

            let first_line = record.description.lines().next().unwrap_or_default();
            frame.draw_text(text_x, top + text_dy, first_line, TEXT_COLOR);
        }
    }
}

fn panel_width(screen_width: u32) -> i32 {
    (screen_width as i32 - ORIGIN_X - RIGHT_MARGIN).max(0)
}

fn item_top(index: usize) -> i32 {
    ORIGIN_Y + PADDING + index as i32 * (ITEM_HEIGHT + PADDING)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn record(description: &str) -> JournalRecord {
        JournalRecord {
            image: 1,
            description: description.to_string(),
            replay: GameAction::ShowDialog(Rc::from(description)),
        }
    }

    fn pointer(x: f32, y: f32, down: bool) -> InputSnapshot {
        InputSnapshot::empty()
            .with_window_size((800, 600))
            .with_cursor_position_px(Some((x, y)))
            .with_left_mouse_down(down)
    }

    #[test]
    fn hit_test_follows_item_layout() {
        let mut journal = Journal::default();
        journal.push(record("first"));
        journal.push(record("second"));

        assert_eq!(journal.record_at((60.0, 60.0), 800), Some(0));
        assert_eq!(journal.record_at((60.0, 110.0), 800), Some(0));
        assert_eq!(journal.record_at((60.0, 115.0), 800), None);
        assert_eq!(journal.record_at((60.0, 120.0), 800), Some(1));
        assert_eq!(journal.record_at((40.0, 60.0), 800), None);
        assert_eq!(journal.record_at((751.0, 60.0), 800), None);
        assert_eq!(journal.record_at((60.0, 200.0), 800), None);
    }

    #[test]
    fn click_replays_once_per_press() {
        let mut journal = Journal::default();
        journal.push(record("first"));

        assert_eq!(journal.update(&pointer(100.0, 80.0, false)), None);
        assert_eq!(journal.hovered(), Some(0));

        let replay = journal.update(&pointer(100.0, 80.0, true));
        assert_eq!(replay, Some(GameAction::ShowDialog(Rc::from("first"))));
        assert_eq!(journal.update(&pointer(100.0, 80.0, true)), None);

        journal.update(&pointer(100.0, 80.0, false));
        assert!(journal.update(&pointer(100.0, 80.0, true)).is_some());
    }

    #[test]
    fn click_outside_records_does_nothing() {
        let mut journal = Journal::default();
        journal.push(record("first"));
        assert_eq!(journal.update(&pointer(10.0, 10.0, true)), None);
        assert_eq!(journal.hovered(), None);
        assert_eq!(journal.update(&InputSnapshot::empty()), None);
    }

    #[test]
    fn empty_journal_draws_placeholder_panel() {
        let atlas = TileAtlas::from_rgba(1, 1, vec![255; 4], 1, 1).expect("atlas");
        let mut pixels = vec![0u8; 200 * 100 * 4];
        let mut frame = Frame::new(&mut pixels, 200, 100);
        Journal::default().draw(&mut frame, &atlas);

        assert_eq!(frame.pixel(55, 55), Some([0, 0, 0, 255]));
        let text_row = item_top(0) + (ITEM_HEIGHT - (LINE_ADVANCE - 2 * TEXT_SCALE)) / 2;
        let lit = (0..200).any(|x| {
            (text_row..text_row + LINE_ADVANCE).any(|y| frame.pixel(x, y) == Some(TEXT_COLOR))
        });
        assert!(lit);
    }
}
