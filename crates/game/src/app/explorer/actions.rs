use std::rc::Rc;

use engine::{resolve_move, Direction, MoveOutcome, Stage, Stager};
use tracing::{debug, info};

use super::journal::JournalRecord;
use super::story::StoryEvent;
use super::ExplorerState;

/// Everything a key binding, a proximity event or a journal record can ask
/// the game to do. Each variant decides for itself which stages it acts in.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GameAction {
    Move(Direction),
    /// Nothing tracked is held: the player stops walking.
    Halt,
    Confirm,
    ToggleJournal,
    ToggleMenu,
    Quit,
    Discover(Rc<StoryEvent>),
    ShowDialog(Rc<str>),
}

impl GameAction {
    pub(crate) fn execute(self, state: &mut ExplorerState) {
        match self {
            GameAction::Move(direction) => {
                if state.stager.stage() != Stage::Game {
                    return;
                }
                let outcome = resolve_move(
                    &mut state.player,
                    direction,
                    &state.collisions,
                    state.bounds,
                );
                if outcome != MoveOutcome::Moved {
                    debug!(?direction, ?outcome, "move_rejected");
                }
            }
            GameAction::Halt => state.player.move_in(Direction::None),
            GameAction::Confirm => confirm(state),
            GameAction::ToggleJournal => match state.stager.stage() {
                Stage::Game => {
                    state.journal.reset_pointer();
                    state.stager.set_stage(Stage::Journal);
                }
                Stage::Journal => return_to(&mut state.stager, Stage::Game),
                _ => {}
            },
            GameAction::ToggleMenu => match state.stager.stage() {
                Stage::Game => state.stager.set_stage(Stage::Menu),
                Stage::Menu | Stage::Journal => return_to(&mut state.stager, Stage::Game),
                Stage::Settings => return_to(&mut state.stager, Stage::Menu),
                _ => {}
            },
            GameAction::Quit => {
                info!(stage = %state.stager.stage(), "quit_requested");
                state.quit_requested = true;
            }
            GameAction::Discover(event) => {
                info!(event = event.id.as_str(), "discovery");
                if let Some(entry) = &event.journal {
                    state.journal.push(JournalRecord {
                        image: entry.image,
                        description: entry.description.clone(),
                        replay: GameAction::ShowDialog(Rc::from(event.dialog.as_str())),
                    });
                }
                if event.kills_player {
                    state.player.set_dead(true);
                    info!(event = event.id.as_str(), "player_died");
                }
                open_dialog(state, event.dialog.as_str());
            }
            GameAction::ShowDialog(text) => open_dialog(state, &text),
        }
    }
}

fn confirm(state: &mut ExplorerState) {
    match state.stager.stage() {
        Stage::MainMenu => state.stager.set_stage(Stage::Scene),
        Stage::Scene => state.stager.set_stage(Stage::Game),
        Stage::Menu => state.stager.set_stage(Stage::Settings),
        Stage::Settings => return_to(&mut state.stager, Stage::Menu),
        Stage::Dialog => {
            if state.dialog.advance() {
                return;
            }
            state.stager.recovery_last_stage();
            if state.player.dead() {
                state.respawn();
            }
        }
        Stage::Journal | Stage::Game => {}
    }
}

fn open_dialog(state: &mut ExplorerState, text: &str) {
    state.dialog.push(text);
    if state.stager.stage() != Stage::Dialog {
        state.stager.set_stage(Stage::Dialog);
    }
}

/// Steps back through the single-slot history when it leads to `target`,
/// otherwise jumps there directly. A dialog replayed from the journal leaves
/// the history pointing at the dialog, which must not be reopened.
fn return_to(stager: &mut Stager, target: Stage) {
    if stager.last_stage() == target {
        stager.recovery_last_stage();
    } else {
        stager.set_stage(target);
    }
}
