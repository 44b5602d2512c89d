//! Keyboard level state and the edge-event log
//!
//! The step function reads key *levels*; only press/release *edges* go into
//! the [`InputLog`].

use serde::{Deserialize, Serialize};

use crate::consts::MAX_REPLAY_EVENTS;

/// Key code (SDL scancode numbering)
pub type KeyCode = u16;

/// Size of the key-code space. Codes at or above this are ignored.
pub const KEY_COUNT: usize = 350;

/// Scancodes the game and host care about
pub mod keys {
    use super::KeyCode;

    pub const L: KeyCode = 15;
    pub const R: KeyCode = 21;
    pub const S: KeyCode = 22;
    pub const W: KeyCode = 26;
    pub const SPACE: KeyCode = 44;
    pub const RIGHT: KeyCode = 79;
    pub const LEFT: KeyCode = 80;
    pub const DOWN: KeyCode = 81;
    pub const UP: KeyCode = 82;
}

/// Dense held/not-held vector over the whole key-code space
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    keys: [bool; KEY_COUNT],
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }
}

impl std::fmt::Debug for InputState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let held: Vec<usize> = (0..KEY_COUNT).filter(|&k| self.keys[k]).collect();
        f.debug_struct("InputState").field("held", &held).finish()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key's level. Returns true if this was an edge (the level changed).
    pub fn set(&mut self, key: KeyCode, pressed: bool) -> bool {
        match self.keys.get_mut(usize::from(key)) {
            Some(level) if *level != pressed => {
                *level = pressed;
                true
            }
            _ => false,
        }
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.keys.get(usize::from(key)).copied().unwrap_or(false)
    }

    /// Release every key
    pub fn clear(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn held_count(&self) -> usize {
        self.keys.iter().filter(|&&k| k).count()
    }
}

/// One press/release edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub frame: u32,
    pub key: KeyCode,
    pub pressed: bool,
}

/// Bounded log of input edges
#[derive(Debug, Clone)]
pub struct InputLog {
    events: Vec<InputEvent>,
    capacity: usize,
}

impl Default for InputLog {
    fn default() -> Self {
        Self::with_capacity(MAX_REPLAY_EVENTS)
    }
}

impl InputLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an edge. Drops it (returning false) once the log is full.
    pub fn push(&mut self, event: InputEvent) -> bool {
        if self.events.len() >= self.capacity {
            log::warn!(
                "Input log full ({} events), dropping edge for key {}",
                self.capacity,
                event.key
            );
            return false;
        }
        self.events.push(event);
        true
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_edges_only() {
        let mut input = InputState::new();
        assert!(input.set(keys::SPACE, true));
        assert!(!input.set(keys::SPACE, true));
        assert!(input.is_down(keys::SPACE));
        assert!(input.set(keys::SPACE, false));
        assert!(!input.set(keys::SPACE, false));
    }

    #[test]
    fn test_out_of_range_keys_are_ignored() {
        let mut input = InputState::new();
        assert!(!input.set(KEY_COUNT as KeyCode, true));
        assert!(!input.set(u16::MAX, true));
        assert!(!input.is_down(u16::MAX));
        assert_eq!(input.held_count(), 0);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut input = InputState::new();
        input.set(keys::UP, true);
        input.set(keys::W, true);
        assert_eq!(input.held_count(), 2);
        input.clear();
        assert_eq!(input, InputState::default());
    }

    #[test]
    fn test_log_drops_when_full() {
        let mut log = InputLog::with_capacity(2);
        let edge = |frame| InputEvent {
            frame,
            key: keys::UP,
            pressed: true,
        };
        assert!(log.push(edge(0)));
        assert!(log.push(edge(1)));
        assert!(!log.push(edge(2)));
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[1].frame, 1);
    }
}
