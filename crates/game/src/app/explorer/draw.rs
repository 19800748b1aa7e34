use engine::{
    text_width, wrap_text, Frame, PlayerCamera, Rgba, Stage, Viewport, EMPTY_TILE, LINE_ADVANCE,
};
use tracing::warn;

use super::dialog::{draw_hint, CONTINUE_HINT};
use super::sprites::{player_sprite, SPAWN_MARKER};
use super::ExplorerGame;

pub(super) const BACKGROUND_COLOR: Rgba = [0xf7, 0xf9, 0xb9, 0xff];
const TITLE_COLOR: Rgba = [48, 52, 64, 255];
const BODY_COLOR: Rgba = [64, 68, 80, 255];
const HINT_COLOR: Rgba = [130, 130, 130, 255];
const DEBUG_COLOR: Rgba = [30, 30, 30, 255];
const PANEL_COLOR: Rgba = [0, 0, 0, 190];
const PANEL_TEXT_COLOR: Rgba = [240, 240, 240, 255];
const INTRO_MAX_WIDTH: i32 = 800;
const SCREEN_MARGIN: i32 = 100;
const DEBUG_ORIGIN: (i32, i32) = (4, 4);
const PANEL_PADDING: i32 = 24;

impl ExplorerGame {
    pub(super) fn draw_stage(&mut self, frame: &mut Frame<'_>) {
        frame.clear(BACKGROUND_COLOR);
        match self.state.stager.stage() {
            Stage::MainMenu => draw_main_menu(frame),
            Stage::Scene => draw_intro(frame, &self.intro),
            Stage::Game => self.draw_world(frame),
            Stage::Dialog => {
                self.draw_world(frame);
                self.state.dialog.draw(frame);
            }
            Stage::Journal => {
                self.draw_world(frame);
                self.state.journal.draw(frame, &self.atlas);
            }
            Stage::Menu => {
                self.draw_world(frame);
                draw_panel(
                    frame,
                    &[
                        "MENU",
                        "",
                        "Enter - Settings",
                        "Tab - Back to the game",
                        "Esc - Quit",
                    ],
                );
            }
            Stage::Settings => {
                self.draw_world(frame);
                let speed = format!("Player speed: {}", self.state.player.speed());
                let scale = format!("Map scale: {}", self.map_scale);
                let name = format!("Explorer: {}", self.state.player.name());
                draw_panel(
                    frame,
                    &[
                        "SETTINGS",
                        "",
                        name.as_str(),
                        speed.as_str(),
                        scale.as_str(),
                        "",
                        "Enter/Tab - Back",
                    ],
                );
            }
        }
    }

    /// Every layer in order around a camera locked on the player. Spawn
    /// marker cells are where the player sprite goes.
    fn draw_world(&mut self, frame: &mut Frame<'_>) {
        let state = &self.state;
        let map = &state.map;
        let viewport = Viewport {
            width: frame.width(),
            height: frame.height(),
        };
        let camera = PlayerCamera::new(viewport, map.tile_width(), map.tile_height(), self.map_scale);
        let player_position = (state.player.x(), state.player.y());
        let player_tile = player_sprite(&state.player);
        let (player_screen_x, player_screen_y) = camera.player_screen();
        let mut player_drawn = false;

        for layer in map.layers() {
            for (x, y, tile) in layer.cells() {
                if tile == EMPTY_TILE {
                    continue;
                }
                let drawn = if tile == SPAWN_MARKER {
                    player_drawn = true;
                    frame.draw_tile(
                        &self.atlas,
                        player_tile,
                        player_screen_x,
                        player_screen_y,
                        camera.scale(),
                    )
                } else {
                    let (screen_x, screen_y) =
                        camera.world_to_screen(map.cell_origin(x, y), player_position);
                    frame.draw_tile(
                        &self.atlas,
                        state.plant.resolve(tile),
                        screen_x,
                        screen_y,
                        camera.scale(),
                    )
                };
                if !drawn && self.warned_tiles.insert(tile) {
                    warn!(tile, layer = layer.name(), "unknown_tile_skipped");
                }
            }
        }
        if !player_drawn {
            frame.draw_tile(
                &self.atlas,
                player_tile,
                player_screen_x,
                player_screen_y,
                camera.scale(),
            );
        }

        let debug_line = format!("Player {:.0}x{:.0}", player_position.0, player_position.1);
        frame.draw_text(DEBUG_ORIGIN.0, DEBUG_ORIGIN.1, &debug_line, DEBUG_COLOR);
    }
}

fn draw_main_menu(frame: &mut Frame<'_>) {
    let title = "THE LONELY EXPLORER";
    let center_y = frame.height() as i32 / 2;
    draw_centered(frame, center_y - LINE_ADVANCE * 2, title, TITLE_COLOR);
    draw_centered(frame, center_y, "Press Enter to start", BODY_COLOR);
    draw_centered(frame, center_y + LINE_ADVANCE, "Esc to quit", HINT_COLOR);
}

fn draw_intro(frame: &mut Frame<'_>, intro: &str) {
    let max_width = INTRO_MAX_WIDTH.min(frame.width() as i32 - SCREEN_MARGIN * 2);
    let lines = wrap_text(intro, max_width.max(1));
    let block_width = lines.iter().map(|line| text_width(line)).max().unwrap_or(0);
    let block_height = lines.len() as i32 * LINE_ADVANCE;
    let x = (frame.width() as i32 - block_width) / 2;
    let y = (frame.height() as i32 - block_height) / 2;
    frame.draw_lines(x, y, &lines, BODY_COLOR);
    draw_hint(frame, CONTINUE_HINT, HINT_COLOR);
}

fn draw_panel(frame: &mut Frame<'_>, lines: &[&str]) {
    let width = lines.iter().map(|line| text_width(line)).max().unwrap_or(0) + PANEL_PADDING * 2;
    let height = lines.len() as i32 * LINE_ADVANCE + PANEL_PADDING * 2;
    let x = (frame.width() as i32 - width) / 2;
    let y = (frame.height() as i32 - height) / 2;
    frame.fill_rect(x, y, width, height, PANEL_COLOR);
    for (index, line) in lines.iter().enumerate() {
        frame.draw_text(
            x + PANEL_PADDING,
            y + PANEL_PADDING + index as i32 * LINE_ADVANCE,
            line,
            PANEL_TEXT_COLOR,
        );
    }
}

fn draw_centered(frame: &mut Frame<'_>, y: i32, text: &str, color: Rgba) {
    let x = (frame.width() as i32 - text_width(text)) / 2;
    frame.draw_text(x, y, text, color);
}
