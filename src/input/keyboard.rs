//! Held-key tracking on top of crossterm key events.
//!
//! Terminals that support the kitty keyboard protocol report key releases;
//! most others only report presses and auto-repeats. A key therefore counts
//! as held until its release arrives or its hold window passes without a
//! repeat. Terminals wait longer before the first auto-repeat than between
//! repeats, so a fresh press gets `FIRST_REPEAT_WINDOW_MS` and every later
//! repeat gets `HOLD_WINDOW_MS`.

use super::controls::{BoundKey, ControlState, KeyBindings};
use crossterm::event::{KeyEvent, KeyEventKind};
use std::collections::HashMap;

/// How long a key stays held after a repeat event.
pub const HOLD_WINDOW_MS: u64 = 180;

/// How long a fresh press stays held while waiting for the first repeat.
pub const FIRST_REPEAT_WINDOW_MS: u64 = 600;

#[derive(Debug, Clone, Copy)]
struct Hold {
    last_ms: u64,
    repeating: bool,
}

impl Hold {
    fn window(&self) -> u64 {
        if self.repeating {
            HOLD_WINDOW_MS
        } else {
            FIRST_REPEAT_WINDOW_MS
        }
    }
}

#[derive(Debug, Default)]
pub struct KeyboardState {
    holds: HashMap<BoundKey, Hold>,
    /// Set once any release event is seen; switches off the hold window.
    releases_reported: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a crossterm key event at `now_ms`.
    pub fn handle_event(&mut self, event: &KeyEvent, now_ms: u64) {
        let Some(key) = BoundKey::from_key_code(event.code) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                // Without release reporting, auto-repeats arrive as presses.
                let repeating = event.kind == KeyEventKind::Repeat || self.is_held(key, now_ms);
                self.holds.insert(
                    key,
                    Hold {
                        last_ms: now_ms,
                        repeating,
                    },
                );
            }
            KeyEventKind::Release => {
                self.releases_reported = true;
                self.holds.remove(&key);
            }
        }
    }

    pub fn is_held(&self, key: BoundKey, now_ms: u64) -> bool {
        match self.holds.get(&key) {
            Some(hold) if self.releases_reported => hold.last_ms <= now_ms,
            Some(hold) => now_ms.saturating_sub(hold.last_ms) < hold.window(),
            None => false,
        }
    }

    pub fn controls(&self, bindings: &KeyBindings, now_ms: u64) -> ControlState {
        bindings.controls(|k| self.is_held(k, now_ms))
    }

    /// Forget every held key (screen changes, focus loss).
    pub fn clear(&mut self) {
        self.holds.clear();
    }
}
