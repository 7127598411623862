//! Input state tracker.
//!
//! Maps raw DOM key names to the handful of logical keys the game cares
//! about and remembers which ones are currently held.

use crate::sim::TickInput;

/// Logical keys understood by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Cancel,
    Restart,
}

impl Key {
    /// Map a `KeyboardEvent.key` value; unknown keys yield `None`
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            " " | "Spacebar" => Some(Key::Fire),
            "Escape" | "Esc" => Some(Key::Cancel),
            "Enter" | "r" | "R" => Some(Key::Restart),
            _ => None,
        }
    }

    /// Keys that would otherwise scroll the page
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::Left | Key::Right | Key::Up | Key::Down | Key::Fire
        )
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of currently held keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputTracker {
    held: u8,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press. Returns true if the key was not already held.
    pub fn press(&mut self, key: Key) -> bool {
        let fresh = !self.is_held(key);
        self.held |= key.bit();
        fresh
    }

    pub fn release(&mut self, key: Key) {
        self.held &= !key.bit();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held & key.bit() != 0
    }

    /// Forget everything (view closed, focus lost)
    pub fn release_all(&mut self) {
        self.held = 0;
    }

    /// Snapshot the held flags the simulation consumes
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            up: self.is_held(Key::Up),
            down: self.is_held(Key::Down),
            fire: self.is_held(Key::Fire),
        }
    }
}

/// Whether the browser's default action for `key` should be suppressed.
/// Only navigation keys, and only while the game view is active.
pub fn should_suppress_default(key: Option<Key>, game_active: bool) -> bool {
    game_active && key.is_some_and(|k| k.is_navigation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_mapping() {
        assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom("d"), Some(Key::Right));
        assert_eq!(Key::from_dom(" "), Some(Key::Fire));
        assert_eq!(Key::from_dom("Escape"), Some(Key::Cancel));
        assert_eq!(Key::from_dom("Enter"), Some(Key::Restart));
        assert_eq!(Key::from_dom("q"), None);
        assert_eq!(Key::from_dom("Shift"), None);
    }

    #[test]
    fn test_press_and_release() {
        let mut input = InputTracker::new();
        assert!(input.press(Key::Left));
        assert!(!input.press(Key::Left));
        assert!(input.press(Key::Fire));
        assert!(input.is_held(Key::Left));

        let snapshot = input.tick_input();
        assert!(snapshot.left && snapshot.fire && !snapshot.right);

        input.release(Key::Left);
        assert!(!input.is_held(Key::Left));
        assert!(input.is_held(Key::Fire));

        input.release_all();
        assert_eq!(input, InputTracker::new());
    }

    #[test]
    fn test_suppression_scoped_to_active_game() {
        assert!(should_suppress_default(Some(Key::Down), true));
        assert!(!should_suppress_default(Some(Key::Down), false));
        assert!(!should_suppress_default(Some(Key::Cancel), true));
        assert!(!should_suppress_default(None, true));
    }
}
