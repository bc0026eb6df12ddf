//! Keyboard state with edge-triggered presses.
//!
//! `is_just_pressed(key)` stays true until the next `end_frame()`. The main
//! loop calls `end_frame()` only after at least one fixed simulation step has
//! consumed the edges, so a jump pressed on a frame with zero simulation steps
//! is still seen by the following step.
//!
//! OS key repeat never produces a second press: a key must be released before
//! it can be pressed again, which is what the held set tracks.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Jump.
    Space,
    /// Quit.
    Escape,
    /// Toggle the debug overlay.
    F3,
    /// Restart the run.
    R,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Drop every held key, e.g. when the window loses focus and releases
    /// will never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
