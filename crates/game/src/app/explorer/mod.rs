mod actions;
mod dialog;
mod draw;
mod journal;
mod sprites;
mod story;

use std::collections::HashSet;
use std::rc::Rc;

use engine::{
    CollisionIndex, EventManager, Frame, Game, GameCommand, InputKey, InputSnapshot,
    KeyEventManager, LayerRole, MeetEvent, Player, Rect, RegionEvent, Stage, Stager, TileAtlas,
    TileId, TileMap, WorldBounds,
};
use tracing::{info, warn};

use super::config::GameConfig;
use actions::GameAction;
use dialog::Dialog;
use journal::Journal;
use sprites::{TileAnimation, SPAWN_MARKER};
pub(crate) use story::{Story, StoryError};
use story::Trigger;

const TRACKED_KEYS: [InputKey; 8] = [
    InputKey::Up,
    InputKey::Down,
    InputKey::Left,
    InputKey::Right,
    InputKey::Confirm,
    InputKey::Quit,
    InputKey::Journal,
    InputKey::Menu,
];

/// World and UI state that actions mutate.
#[derive(Debug)]
pub(crate) struct ExplorerState {
    map: TileMap,
    collisions: CollisionIndex,
    bounds: WorldBounds,
    player: Player,
    spawn: (f32, f32),
    stager: Stager,
    journal: Journal,
    dialog: Dialog,
    plant: TileAnimation,
    quit_requested: bool,
}

impl ExplorerState {
    fn respawn(&mut self) {
        self.player.reset();
        self.player.set_position(self.spawn.0, self.spawn.1);
        info!(x = self.spawn.0, y = self.spawn.1, "player_respawned");
    }
}

/// Per-tick orchestration: key dispatch, then the active stage's own update.
pub(crate) struct ExplorerGame {
    state: ExplorerState,
    keys: KeyEventManager<GameAction>,
    events: EventManager<GameAction>,
    atlas: TileAtlas,
    intro: String,
    map_scale: f32,
    warned_tiles: HashSet<TileId>,
}

impl ExplorerGame {
    pub(crate) fn new(config: &GameConfig, map: TileMap, atlas: TileAtlas, story: Story) -> Self {
        let collisions = CollisionIndex::from_map(&map);
        let bounds = WorldBounds::of_map(&map);

        let mut player = Player::new(
            map.tile_width() as f32,
            map.tile_height() as f32,
            config.player_speed,
        );
        player.set_name(config.player_name.as_str());
        let spawn = match map.find_first(LayerRole::Spawn, SPAWN_MARKER) {
            Some((x, y)) => map.cell_origin(x, y),
            None => {
                warn!(marker = SPAWN_MARKER, "spawn_marker_missing");
                (0.0, 0.0)
            }
        };
        player.set_position(spawn.0, spawn.1);

        let mut stager = Stager::new(config.start_stage);
        stager.set_on_change(|from, to| info!(%from, %to, "stage_changed"));

        let events = build_events(&story, &map);
        info!(
            player = player.name(),
            spawn_x = spawn.0,
            spawn_y = spawn.1,
            collision_count = collisions.len(),
            event_count = events.len(),
            start_stage = %config.start_stage,
            "game_ready"
        );

        Self {
            state: ExplorerState {
                map,
                collisions,
                bounds,
                player,
                spawn,
                stager,
                journal: Journal::default(),
                dialog: Dialog::default(),
                plant: TileAnimation::plant(),
                quit_requested: false,
            },
            keys: build_key_bindings(),
            events,
            atlas,
            intro: story.intro,
            map_scale: config.map_scale,
            warned_tiles: HashSet::new(),
        }
    }

    fn run(&mut self, actions: Vec<GameAction>) {
        for action in actions {
            action.execute(&mut self.state);
        }
    }
}

impl Game for ExplorerGame {
    fn update(&mut self, input: &InputSnapshot) -> GameCommand {
        let actions = self.keys.update(input);
        self.run(actions);

        match self.state.stager.stage() {
            Stage::Game => {
                self.state.player.update();
                self.state.plant.advance();
                let fired = self.events.update(&self.state.player, &self.state.map);
                self.run(fired);
            }
            Stage::Journal => {
                if let Some(replay) = self.state.journal.update(input) {
                    replay.execute(&mut self.state);
                }
            }
            _ => {}
        }

        if self.state.quit_requested {
            GameCommand::Quit
        } else {
            GameCommand::Continue
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        self.draw_stage(frame);
    }

    fn title(&self) -> Option<String> {
        match self.state.stager.stage() {
            Stage::Game => None,
            stage => Some(format!("The Lonely Explorer - {stage}")),
        }
    }

    fn shutdown(&mut self) {
        info!(
            journal_records = self.state.journal.records().len(),
            pending_events = self.events.pending(),
            "game_shutdown"
        );
    }
}

fn build_key_bindings() -> KeyEventManager<GameAction> {
    use engine::Direction;

    let mut keys = KeyEventManager::new(TRACKED_KEYS);
    keys.add_press_event(InputKey::Up, GameAction::Move(Direction::Up));
    keys.add_press_event(InputKey::Down, GameAction::Move(Direction::Down));
    keys.add_press_event(InputKey::Left, GameAction::Move(Direction::Left));
    keys.add_press_event(InputKey::Right, GameAction::Move(Direction::Right));
    keys.add_pressed_event(InputKey::Confirm, GameAction::Confirm);
    keys.add_pressed_event(InputKey::Quit, GameAction::Quit);
    keys.add_pressed_event(InputKey::Journal, GameAction::ToggleJournal);
    keys.add_pressed_event(InputKey::Menu, GameAction::ToggleMenu);
    keys.set_default_event(GameAction::Halt);
    keys
}

fn build_events(story: &Story, map: &TileMap) -> EventManager<GameAction> {
    let tile_width = map.tile_width() as f32;
    let tile_height = map.tile_height() as f32;
    let mut events = EventManager::new();
    for event in &story.events {
        let action = GameAction::Discover(Rc::new(event.clone()));
        match &event.trigger {
            Trigger::Meet { tiles } => {
                events.add_event(MeetEvent::new(tiles.iter().copied(), action));
            }
            Trigger::Region {
                x,
                y,
                width,
                height,
            } => {
                let area = Rect::new(
                    *x as f32 * tile_width,
                    *y as f32 * tile_height,
                    *width as f32 * tile_width,
                    *height as f32 * tile_height,
                );
                events.add_event(RegionEvent::new(area, action));
            }
        }
    }
    events
}
