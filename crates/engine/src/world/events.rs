use std::collections::BTreeSet;

use tracing::debug;

use super::player::Player;
use super::rect::Rect;
use super::tilemap::{LayerRole, TileId, TileMap};

/// A one-shot trigger evaluated against the player every Game tick.
pub trait ProximityEvent<A> {
    fn check(&self, player: &Player, map: &TileMap) -> bool;
    /// Hands out the bound action and marks the event done.
    fn fire(&mut self) -> A;
    fn is_done(&self) -> bool;
    fn kind(&self) -> &'static str;
}

/// Action plus completion flag shared by every event variant.
#[derive(Debug, Clone)]
struct OneShot<A> {
    action: A,
    done: bool,
}

impl<A: Clone> OneShot<A> {
    fn new(action: A) -> Self {
        Self {
            action,
            done: false,
        }
    }

    fn fire(&mut self) -> A {
        self.done = true;
        self.action.clone()
    }
}

/// Satisfied when the player's cell or one of its four orthogonal neighbours
/// on the objects layer holds one of the trigger ids. The player's cell is the
/// one containing the top-left corner of its box.
#[derive(Debug, Clone)]
pub struct MeetEvent<A> {
    whom: BTreeSet<TileId>,
    state: OneShot<A>,
}

impl<A: Clone> MeetEvent<A> {
    pub fn new(whom: impl IntoIterator<Item = TileId>, action: A) -> Self {
        Self {
            whom: whom.into_iter().collect(),
            state: OneShot::new(action),
        }
    }

    pub fn trigger_tiles(&self) -> &BTreeSet<TileId> {
        &self.whom
    }
}

const NEIGHBOURHOOD: [(i64, i64); 5] = [(0, 0), (1, 0), (0, 1), (-1, 0), (0, -1)];

impl<A: Clone> ProximityEvent<A> for MeetEvent<A> {
    fn check(&self, player: &Player, map: &TileMap) -> bool {
        let Some(layer) = map.layer(LayerRole::Objects) else {
            return false;
        };
        let (cell_x, cell_y) = map.cell_at(player.x(), player.y());
        // Cells outside the grid are skipped rather than clamped.
        NEIGHBOURHOOD.iter().any(|(dx, dy)| {
            layer
                .tile_signed(cell_x + dx, cell_y + dy)
                .is_some_and(|tile| self.whom.contains(&tile))
        })
    }

    fn fire(&mut self) -> A {
        self.state.fire()
    }

    fn is_done(&self) -> bool {
        self.state.done
    }

    fn kind(&self) -> &'static str {
        "meet"
    }
}

/// Satisfied when the player's box overlaps a world-space area.
#[derive(Debug, Clone)]
pub struct RegionEvent<A> {
    area: Rect,
    state: OneShot<A>,
}

impl<A: Clone> RegionEvent<A> {
    pub fn new(area: Rect, action: A) -> Self {
        Self {
            area,
            state: OneShot::new(action),
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }
}

impl<A: Clone> ProximityEvent<A> for RegionEvent<A> {
    fn check(&self, player: &Player, _map: &TileMap) -> bool {
        player.bounds().overlaps(&self.area)
    }

    fn fire(&mut self) -> A {
        self.state.fire()
    }

    fn is_done(&self) -> bool {
        self.state.done
    }

    fn kind(&self) -> &'static str {
        "region"
    }
}

/// Runs registered events in order; each fires at most once.
pub struct EventManager<A> {
    events: Vec<Box<dyn ProximityEvent<A>>>,
}

impl<A> Default for EventManager<A> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<A> EventManager<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_events(&mut self, events: Vec<Box<dyn ProximityEvent<A>>>) {
        self.events = events;
    }

    pub fn add_event(&mut self, event: impl ProximityEvent<A> + 'static) {
        self.events.push(Box::new(event));
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.events.iter().filter(|event| !event.is_done()).count()
    }

    /// Checks every pending event and returns the actions of those that fired
    /// this tick, in registration order.
    pub fn update(&mut self, player: &Player, map: &TileMap) -> Vec<A> {
        let mut fired = Vec::new();
        for (index, event) in self.events.iter_mut().enumerate() {
            if event.is_done() {
                continue;
            }
            if event.check(player, map) {
                debug!(index, kind = event.kind(), "event_fired");
                fired.push(event.fire());
            }
        }
        fired
    }
}

impl<A> std::fmt::Debug for EventManager<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("events", &self.events.len())
            .field("pending", &self.pending())
            .finish()
    }
}
