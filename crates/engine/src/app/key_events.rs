use std::collections::HashMap;

use tracing::{debug, warn};

use super::input::{InputKey, KeySource};

#[derive(Debug, Clone)]
struct KeyBinding<A> {
    press: Option<A>,
    pressed: Option<A>,
}

impl<A> Default for KeyBinding<A> {
    fn default() -> Self {
        Self {
            press: None,
            pressed: None,
        }
    }
}

/// Turns per-tick key down-state into dispatched actions.
///
/// - a *press* action is emitted on every tick its key is held;
/// - a *pressed* action is emitted once, on the tick the key goes from up to down;
/// - the *default* action is emitted on ticks where no tracked key is down.
///
/// Only keys passed to [`KeyEventManager::new`] are polled; bindings for anything else are inert.
#[derive(Debug, Clone)]
pub struct KeyEventManager<A> {
    tracked: Vec<InputKey>,
    bindings: HashMap<InputKey, KeyBinding<A>>,
    default_action: Option<A>,
    was_down: Vec<bool>,
}

impl<A: Clone> KeyEventManager<A> {
    pub fn new(tracked: impl IntoIterator<Item = InputKey>) -> Self {
        let mut keys: Vec<InputKey> = Vec::new();
        for key in tracked {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        let was_down = vec![false; keys.len()];
        Self {
            tracked: keys,
            bindings: HashMap::new(),
            default_action: None,
            was_down,
        }
    }

    pub fn tracked_keys(&self) -> &[InputKey] {
        &self.tracked
    }

    pub fn add_press_event(&mut self, key: InputKey, action: A) {
        self.warn_if_untracked(key);
        let binding = self.bindings.entry(key).or_default();
        if binding.press.replace(action).is_some() {
            debug!(key = ?key, "press_binding_replaced");
        }
    }

    pub fn add_pressed_event(&mut self, key: InputKey, action: A) {
        self.warn_if_untracked(key);
        let binding = self.bindings.entry(key).or_default();
        if binding.pressed.replace(action).is_some() {
            debug!(key = ?key, "pressed_binding_replaced");
        }
    }

    pub fn set_default_event(&mut self, action: A) {
        self.default_action = Some(action);
    }

    /// Polls every tracked key once and returns the actions to run this tick.
    pub fn update(&mut self, keys: &impl KeySource) -> Vec<A> {
        let mut dispatched = Vec::new();
        let mut any_down = false;

        for (index, key) in self.tracked.iter().copied().enumerate() {
            let is_down = keys.is_key_down(key);
            let was_down = self.was_down[index];
            self.was_down[index] = is_down;
            if !is_down {
                continue;
            }
            any_down = true;

            let Some(binding) = self.bindings.get(&key) else {
                continue;
            };
            if let Some(action) = &binding.press {
                dispatched.push(action.clone());
            }
            if !was_down {
                if let Some(action) = &binding.pressed {
                    dispatched.push(action.clone());
                }
            }
        }

        if !any_down {
            if let Some(action) = &self.default_action {
                dispatched.push(action.clone());
            }
        }

        dispatched
    }

    fn warn_if_untracked(&self, key: InputKey) {
        if !self.tracked.contains(&key) {
            warn!(key = ?key, "binding_for_untracked_key");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::input::KeyStates;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Probe {
        Held(InputKey),
        Edge(InputKey),
        Idle,
    }

    fn down(keys: &[InputKey]) -> KeyStates {
        let mut states = KeyStates::default();
        for key in keys {
            states.set(*key, true);
        }
        states
    }

    fn manager_with(tracked: &[InputKey]) -> KeyEventManager<Probe> {
        let mut manager = KeyEventManager::new(tracked.iter().copied());
        for key in tracked {
            manager.add_press_event(*key, Probe::Held(*key));
            manager.add_pressed_event(*key, Probe::Edge(*key));
        }
        manager.set_default_event(Probe::Idle);
        manager
    }

    fn count(actions: &[Probe], probe: Probe) -> usize {
        actions.iter().filter(|action| **action == probe).count()
    }

    #[test]
    fn held_key_fires_press_every_tick_and_pressed_once() {
        let mut manager = manager_with(&[InputKey::Right]);
        let mut all = Vec::new();
        for _ in 0..3 {
            all.extend(manager.update(&down(&[InputKey::Right])));
        }
        assert_eq!(count(&all, Probe::Held(InputKey::Right)), 3);
        assert_eq!(count(&all, Probe::Edge(InputKey::Right)), 1);
        assert_eq!(count(&all, Probe::Idle), 0);
    }

    #[test]
    fn pressed_fires_on_first_tick_only() {
        let mut manager = manager_with(&[InputKey::Confirm]);
        let first = manager.update(&down(&[InputKey::Confirm]));
        let second = manager.update(&down(&[InputKey::Confirm]));
        assert_eq!(count(&first, Probe::Edge(InputKey::Confirm)), 1);
        assert_eq!(count(&second, Probe::Edge(InputKey::Confirm)), 0);
    }

    #[test]
    fn release_and_repress_fires_pressed_again() {
        let mut manager = manager_with(&[InputKey::Confirm]);
        let mut edges = 0;
        for states in [
            down(&[InputKey::Confirm]),
            down(&[InputKey::Confirm]),
            down(&[]),
            down(&[InputKey::Confirm]),
        ] {
            edges += count(&manager.update(&states), Probe::Edge(InputKey::Confirm));
        }
        assert_eq!(edges, 2);
    }

    #[test]
    fn default_fires_once_per_idle_tick() {
        let mut manager = manager_with(&[InputKey::Up, InputKey::Down]);
        let mut idle = 0;
        for _ in 0..5 {
            idle += count(&manager.update(&down(&[])), Probe::Idle);
        }
        assert_eq!(idle, 5);

        let busy = manager.update(&down(&[InputKey::Up]));
        assert_eq!(count(&busy, Probe::Idle), 0);
    }

    #[test]
    fn tracked_key_without_bindings_still_suppresses_default() {
        let mut manager: KeyEventManager<Probe> =
            KeyEventManager::new([InputKey::Up, InputKey::Menu]);
        manager.set_default_event(Probe::Idle);
        let actions = manager.update(&down(&[InputKey::Menu]));
        assert!(actions.is_empty());
    }

    #[test]
    fn untracked_keys_are_inert() {
        let mut manager: KeyEventManager<Probe> = KeyEventManager::new([InputKey::Up]);
        manager.add_press_event(InputKey::Journal, Probe::Held(InputKey::Journal));
        manager.set_default_event(Probe::Idle);

        let actions = manager.update(&down(&[InputKey::Journal]));
        assert_eq!(actions, vec![Probe::Idle]);
    }

    #[test]
    fn simultaneous_keys_fire_independently() {
        let mut manager = manager_with(&[InputKey::Up, InputKey::Left]);
        let actions = manager.update(&down(&[InputKey::Up, InputKey::Left]));
        assert_eq!(count(&actions, Probe::Held(InputKey::Up)), 1);
        assert_eq!(count(&actions, Probe::Held(InputKey::Left)), 1);
        assert_eq!(count(&actions, Probe::Edge(InputKey::Up)), 1);
        assert_eq!(count(&actions, Probe::Edge(InputKey::Left)), 1);
    }

    #[test]
    fn dispatch_is_independent_of_key_declaration_order() {
        let forward = [InputKey::Up, InputKey::Left, InputKey::Confirm];
        let mut reversed = forward;
        reversed.reverse();
        let mut a = manager_with(&forward);
        let mut b = manager_with(&reversed);

        for states in [
            down(&[InputKey::Up, InputKey::Confirm]),
            down(&[InputKey::Up, InputKey::Left, InputKey::Confirm]),
            down(&[]),
            down(&[InputKey::Left]),
        ] {
            let mut left = a.update(&states);
            let mut right = b.update(&states);
            left.sort();
            right.sort();
            assert_eq!(left, right);
        }
    }

    #[test]
    fn duplicate_tracked_keys_are_polled_once() {
        let mut manager = manager_with(&[InputKey::Up, InputKey::Up]);
        assert_eq!(manager.tracked_keys(), &[InputKey::Up]);
        let actions = manager.update(&down(&[InputKey::Up]));
        assert_eq!(count(&actions, Probe::Held(InputKey::Up)), 1);
    }
}
