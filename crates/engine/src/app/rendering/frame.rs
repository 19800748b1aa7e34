use super::atlas::TileAtlas;
use crate::world::TileId;

pub type Rgba = [u8; 4];

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
pub const TEXT_SCALE: i32 = 2;
pub const GLYPH_ADVANCE: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;
pub const LINE_ADVANCE: i32 = (GLYPH_HEIGHT + 2) * TEXT_SCALE;

/// Software RGBA canvas over a borrowed pixel buffer. All drawing is clipped.
pub struct Frame<'a> {
    pixels: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    pub fn new(pixels: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        let offset = self.offset_of(x, y)?;
        let mut color = [0u8; 4];
        color.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(color)
    }

    pub fn clear(&mut self, color: Rgba) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    /// Alpha-blends `color` over the frame.
    pub fn fill_rect(&mut self, x: i32, y: i32, rect_width: i32, rect_height: i32, color: Rgba) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = x.saturating_add(rect_width).min(self.width as i32);
        let end_y = y.saturating_add(rect_height).min(self.height as i32);
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.blend_pixel(px, py, color);
            }
        }
    }

    pub fn outline_rect(&mut self, x: i32, y: i32, rect_width: i32, rect_height: i32, color: Rgba) {
        if rect_width <= 1 || rect_height <= 1 {
            return;
        }
        self.fill_rect(x, y, rect_width, 1, color);
        self.fill_rect(x, y + rect_height - 1, rect_width, 1, color);
        self.fill_rect(x, y, 1, rect_height, color);
        self.fill_rect(x + rect_width - 1, y, 1, rect_height, color);
    }

    /// Draws one line of text; characters without a glyph render as spaces.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgba) {
        let mut cursor_x = x;
        for ch in text.chars() {
            if let Some(rows) = glyph_rows(ch) {
                self.draw_glyph(cursor_x, y, rows, color);
            }
            cursor_x += GLYPH_ADVANCE;
        }
    }

    pub fn draw_lines(&mut self, x: i32, y: i32, lines: &[String], color: Rgba) {
        for (index, line) in lines.iter().enumerate() {
            self.draw_text(x, y + index as i32 * LINE_ADVANCE, line, color);
        }
    }

    /// Blits an atlas tile with nearest-neighbour scaling. Returns `false` when
    /// the atlas has no cell for `tile`.
    pub fn draw_tile(&mut self, atlas: &TileAtlas, tile: TileId, x: i32, y: i32, scale: f32) -> bool {
        if !atlas.contains(tile) {
            return false;
        }
        let scale = normalized_scale(scale);
        let out_width = (atlas.tile_width() as f32 * scale).round().max(1.0) as i32;
        let out_height = (atlas.tile_height() as f32 * scale).round().max(1.0) as i32;
        let inv_scale = scale.recip();

        let draw_left = x.max(0);
        let draw_top = y.max(0);
        let draw_right = x.saturating_add(out_width).min(self.width as i32);
        let draw_bottom = y.saturating_add(out_height).min(self.height as i32);
        for out_y in draw_top..draw_bottom {
            let src_y = (((out_y - y) as f32) * inv_scale).floor() as u32;
            for out_x in draw_left..draw_right {
                let src_x = (((out_x - x) as f32) * inv_scale).floor() as u32;
                let Some(color) = atlas.sample(tile, src_x, src_y) else {
                    continue;
                };
                if color[3] == 0 {
                    continue;
                }
                self.blend_pixel(out_x, out_y, color);
            }
        }
        true
    }

    fn draw_glyph(&mut self, x: i32, y: i32, rows: [u8; GLYPH_HEIGHT as usize], color: Rgba) {
        for (row_index, row_bits) in rows.iter().enumerate() {
            let glyph_y = y + row_index as i32 * TEXT_SCALE;
            for col in 0..GLYPH_WIDTH {
                if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                    continue;
                }
                let glyph_x = x + col * TEXT_SCALE;
                self.fill_rect(glyph_x, glyph_y, TEXT_SCALE, TEXT_SCALE, color);
            }
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        let Some(offset) = self.offset_of(x, y) else {
            return;
        };
        let dst = &mut self.pixels[offset..offset + 4];
        let alpha = color[3] as u32;
        if alpha == 255 {
            dst.copy_from_slice(&color);
            return;
        }
        for channel in 0..3 {
            let blended = (color[channel] as u32 * alpha + dst[channel] as u32 * (255 - alpha)) / 255;
            dst[channel] = blended as u8;
        }
        dst[3] = 255;
    }

    fn offset_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        (offset + 4 <= self.pixels.len()).then_some(offset)
    }
}

pub fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * GLYPH_ADVANCE
}

/// Greedy word wrap to a pixel width. Explicit newlines always break.
pub fn wrap_text(text: &str, max_width_px: i32) -> Vec<String> {
    let max_chars = (max_width_px / GLYPH_ADVANCE).max(1) as usize;
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

fn normalized_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

fn glyph_rows(ch: char) -> Option<[u8; GLYPH_HEIGHT as usize]> {
    match ch {
        ' '..='~' => Some(FONT_3X5[ch as usize - ' ' as usize]),
        _ => None,
    }
}

/// Printable ASCII, 3x5 cells, one row per byte (low three bits).
const FONT_3X5: [[u8; 5]; 95] = [
    [0b000, 0b000, 0b000, 0b000, 0b000], // space
    [0b010, 0b010, 0b010, 0b000, 0b010], // '!'
    [0b101, 0b101, 0b000, 0b000, 0b000], // '"'
    [0b101, 0b111, 0b101, 0b111, 0b101], // '#'
    [0b111, 0b110, 0b111, 0b011, 0b111], // '$'
    [0b101, 0b001, 0b010, 0b100, 0b101], // '%'
    [0b010, 0b101, 0b010, 0b101, 0b011], // '&'
    [0b010, 0b010, 0b000, 0b000, 0b000], // "'"
    [0b001, 0b010, 0b010, 0b010, 0b001], // '('
    [0b100, 0b010, 0b010, 0b010, 0b100], // ')'
    [0b000, 0b101, 0b010, 0b101, 0b000], // '*'
    [0b000, 0b010, 0b111, 0b010, 0b000], // '+'
    [0b000, 0b000, 0b000, 0b010, 0b100], // ','
    [0b000, 0b000, 0b111, 0b000, 0b000], // '-'
    [0b000, 0b000, 0b000, 0b000, 0b010], // '.'
    [0b001, 0b001, 0b010, 0b100, 0b100], // '/'
    [0b111, 0b101, 0b101, 0b101, 0b111], // '0'
    [0b010, 0b110, 0b010, 0b010, 0b111], // '1'
    [0b111, 0b001, 0b111, 0b100, 0b111], // '2'
    [0b111, 0b001, 0b111, 0b001, 0b111], // '3'
    [0b101, 0b101, 0b111, 0b001, 0b001], // '4'
    [0b111, 0b100, 0b111, 0b001, 0b111], // '5'
    [0b111, 0b100, 0b111, 0b101, 0b111], // '6'
    [0b111, 0b001, 0b010, 0b010, 0b010], // '7'
    [0b111, 0b101, 0b111, 0b101, 0b111], // '8'
    [0b111, 0b101, 0b111, 0b001, 0b111], // '9'
    [0b000, 0b010, 0b000, 0b010, 0b000], // ':'
    [0b000, 0b010, 0b000, 0b010, 0b100], // ';'
    [0b001, 0b010, 0b100, 0b010, 0b001], // '<'
    [0b000, 0b111, 0b000, 0b111, 0b000], // '='
    [0b100, 0b010, 0b001, 0b010, 0b100], // '>'
    [0b111, 0b001, 0b011, 0b000, 0b010], // '?'
    [0b111, 0b101, 0b111, 0b100, 0b111], // '@'
    [0b010, 0b101, 0b111, 0b101, 0b101], // 'A'
    [0b110, 0b101, 0b110, 0b101, 0b110], // 'B'
    [0b111, 0b100, 0b100, 0b100, 0b111], // 'C'
    [0b110, 0b101, 0b101, 0b101, 0b110], // 'D'
    [0b111, 0b100, 0b110, 0b100, 0b111], // 'E'
    [0b111, 0b100, 0b110, 0b100, 0b100], // 'F'
    [0b111, 0b100, 0b101, 0b101, 0b111], // 'G'
    [0b101, 0b101, 0b111, 0b101, 0b101], // 'H'
    [0b111, 0b010, 0b010, 0b010, 0b111], // 'I'
    [0b111, 0b001, 0b001, 0b101, 0b111], // 'J'
    [0b101, 0b101, 0b110, 0b101, 0b101], // 'K'
    [0b100, 0b100, 0b100, 0b100, 0b111], // 'L'
    [0b101, 0b111, 0b111, 0b101, 0b101], // 'M'
    [0b101, 0b111, 0b111, 0b111, 0b101], // 'N'
    [0b111, 0b101, 0b101, 0b101, 0b111], // 'O'
    [0b110, 0b101, 0b110, 0b100, 0b100], // 'P'
    [0b111, 0b101, 0b101, 0b111, 0b001], // 'Q'
    [0b110, 0b101, 0b110, 0b101, 0b101], // 'R'
    [0b111, 0b100, 0b111, 0b001, 0b111], // 'S'
    [0b111, 0b010, 0b010, 0b010, 0b010], // 'T'
    [0b101, 0b101, 0b101, 0b101, 0b111], // 'U'
    [0b101, 0b101, 0b101, 0b101, 0b010], // 'V'
    [0b101, 0b101, 0b111, 0b111, 0b101], // 'W'
    [0b101, 0b101, 0b010, 0b101, 0b101], // 'X'
    [0b101, 0b101, 0b010, 0b010, 0b010], // 'Y'
    [0b111, 0b001, 0b010, 0b100, 0b111], // 'Z'
    [0b110, 0b100, 0b100, 0b100, 0b110], // '['
    [0b100, 0b100, 0b010, 0b001, 0b001], // '\\'
    [0b011, 0b001, 0b001, 0b001, 0b011], // ']'
    [0b010, 0b101, 0b000, 0b000, 0b000], // '^'
    [0b000, 0b000, 0b000, 0b000, 0b111], // '_'
    [0b100, 0b010, 0b000, 0b000, 0b000], // '`'
    [0b000, 0b111, 0b001, 0b111, 0b111], // 'a'
    [0b100, 0b100, 0b110, 0b101, 0b110], // 'b'
    [0b000, 0b111, 0b100, 0b100, 0b111], // 'c'
    [0b001, 0b001, 0b111, 0b101, 0b111], // 'd'
    [0b000, 0b111, 0b110, 0b100, 0b111], // 'e'
    [0b011, 0b100, 0b110, 0b100, 0b100], // 'f'
    [0b000, 0b111, 0b101, 0b111, 0b001], // 'g'
    [0b100, 0b100, 0b110, 0b101, 0b101], // 'h'
    [0b010, 0b000, 0b010, 0b010, 0b010], // 'i'
    [0b001, 0b000, 0b001, 0b101, 0b010], // 'j'
    [0b100, 0b101, 0b110, 0b101, 0b101], // 'k'
    [0b100, 0b100, 0b100, 0b100, 0b111], // 'l'
    [0b000, 0b110, 0b111, 0b101, 0b101], // 'm'
    [0b000, 0b110, 0b101, 0b101, 0b101], // 'n'
    [0b000, 0b111, 0b101, 0b101, 0b111], // 'o'
    [0b000, 0b110, 0b101, 0b110, 0b100], // 'p'
    [0b000, 0b111, 0b101, 0b111, 0b001], // 'q'
    [0b000, 0b110, 0b101, 0b100, 0b100], // 'r'
    [0b000, 0b111, 0b110, 0b001, 0b111], // 's'
    [0b010, 0b111, 0b010, 0b010, 0b011], // 't'
    [0b000, 0b101, 0b101, 0b101, 0b111], // 'u'
    [0b000, 0b101, 0b101, 0b101, 0b010], // 'v'
    [0b000, 0b101, 0b101, 0b111, 0b010], // 'w'
    [0b000, 0b101, 0b010, 0b010, 0b101], // 'x'
    [0b000, 0b101, 0b101, 0b111, 0b001], // 'y'
    [0b000, 0b111, 0b001, 0b010, 0b111], // 'z'
    [0b011, 0b010, 0b110, 0b010, 0b011], // '{'
    [0b010, 0b010, 0b010, 0b010, 0b010], // '|'
    [0b110, 0b010, 0b011, 0b010, 0b110], // '}'
    [0b000, 0b011, 0b110, 0b000, 0b000], // '~'
];

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(width: u32, height: u32) -> Vec<u8> {
        vec![0; (width * height * 4) as usize]
    }

    #[test]
    fn fill_rect_is_clipped_to_the_frame() {
        let mut pixels = buffer(4, 4);
        let mut frame = Frame::new(&mut pixels, 4, 4);
        frame.fill_rect(-2, -2, 4, 4, [255, 0, 0, 255]);
        assert_eq!(frame.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(frame.pixel(4, 0), None);
    }

    #[test]
    fn translucent_fill_blends_with_background() {
        let mut pixels = buffer(1, 1);
        let mut frame = Frame::new(&mut pixels, 1, 1);
        frame.clear([200, 200, 200, 255]);
        frame.fill_rect(0, 0, 1, 1, [0, 0, 0, 128]);
        let [r, g, b, a] = frame.pixel(0, 0).expect("pixel");
        assert!((99..=101).contains(&r), "r={r}");
        assert_eq!((r, r, 255), (g, b, a));
    }

    #[test]
    fn text_outside_the_frame_is_safe() {
        let mut pixels = buffer(8, 8);
        let mut frame = Frame::new(&mut pixels, 8, 8);
        frame.draw_text(-100, -100, "HELLO", [255; 4]);
        frame.draw_text(6, 6, "WORLD", [255; 4]);
        frame.draw_text(0, 0, "\u{0416}", [255; 4]);
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn glyph_table_covers_printable_ascii() {
        for code in 32u8..=126u8 {
            assert!(glyph_rows(char::from(code)).is_some());
        }
        assert_eq!(glyph_rows(' '), Some([0; 5]));
        assert!(glyph_rows('\n').is_none());
    }

    #[test]
    fn wrap_text_breaks_on_words_and_newlines() {
        let lines = wrap_text("one two three\nfour", GLYPH_ADVANCE * 8);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert_eq!(text_width("abc"), GLYPH_ADVANCE * 3);
    }

    #[test]
    fn draw_tile_scales_atlas_cells() {
        let rgba: Vec<u8> = [[10, 20, 30, 255], [0, 0, 0, 0]]
            .iter()
            .flat_map(|px| px.iter().copied())
            .collect();
        let atlas = TileAtlas::from_rgba(2, 1, rgba, 1, 1).expect("atlas");
        let mut pixels = buffer(4, 4);
        let mut frame = Frame::new(&mut pixels, 4, 4);

        assert!(frame.draw_tile(&atlas, 1, 1, 1, 2.0));
        assert_eq!(frame.pixel(1, 1), Some([10, 20, 30, 255]));
        assert_eq!(frame.pixel(2, 2), Some([10, 20, 30, 255]));
        assert_eq!(frame.pixel(3, 3), Some([0, 0, 0, 0]));

        assert!(frame.draw_tile(&atlas, 2, 0, 0, 1.0));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 0]));
        assert!(!frame.draw_tile(&atlas, 3, 0, 0, 1.0));
        assert!(!frame.draw_tile(&atlas, 0, 0, 0, 1.0));
    }
}
