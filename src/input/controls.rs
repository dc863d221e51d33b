//! Per-frame button state and per-player key bindings.

use crate::fighter::moves::AttackButton;
use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

/// Buttons held this frame, produced by the keyboard or by the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub crouch: bool,
    pub block: bool,
    pub r: bool,
    pub e: bool,
    pub t: bool,
    pub y: bool,
}

impl ControlState {
    /// Nothing held (used to freeze fighters between rounds).
    pub const NONE: ControlState = ControlState {
        left: false,
        right: false,
        jump: false,
        crouch: false,
        block: false,
        r: false,
        e: false,
        t: false,
        y: false,
    };

    pub fn attack(&self, button: AttackButton) -> bool {
        match button {
            AttackButton::R => self.r,
            AttackButton::E => self.e,
            AttackButton::T => self.t,
            AttackButton::Y => self.y,
        }
    }

    pub fn set_attack(&mut self, button: AttackButton, held: bool) {
        match button {
            AttackButton::R => self.r = held,
            AttackButton::E => self.e = held,
            AttackButton::T => self.t = held,
            AttackButton::Y => self.y = held,
        }
    }

    pub fn any_attack(&self) -> bool {
        self.r || self.e || self.t || self.y
    }
}

/// A bindable key. Kept separate from `KeyCode` so bindings serialize cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundKey {
    Char(char),
    Left,
    Right,
    Up,
    Down,
}

impl BoundKey {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char(c) => Some(BoundKey::Char(c.to_ascii_lowercase())),
            KeyCode::Left => Some(BoundKey::Left),
            KeyCode::Right => Some(BoundKey::Right),
            KeyCode::Up => Some(BoundKey::Up),
            KeyCode::Down => Some(BoundKey::Down),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            BoundKey::Char(c) => c.to_ascii_uppercase().to_string(),
            BoundKey::Left => "←".to_string(),
            BoundKey::Right => "→".to_string(),
            BoundKey::Up => "↑".to_string(),
            BoundKey::Down => "↓".to_string(),
        }
    }
}

/// Key bindings for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left: BoundKey,
    pub right: BoundKey,
    pub jump: BoundKey,
    pub crouch: BoundKey,
    pub block: BoundKey,
    pub attack_r: BoundKey,
    pub attack_e: BoundKey,
    pub attack_t: BoundKey,
    pub attack_y: BoundKey,
}

impl KeyBindings {
    pub fn player_one() -> Self {
        Self {
            left: BoundKey::Char('a'),
            right: BoundKey::Char('d'),
            jump: BoundKey::Char('w'),
            crouch: BoundKey::Char('s'),
            block: BoundKey::Char('f'),
            attack_r: BoundKey::Char('r'),
            attack_e: BoundKey::Char('e'),
            attack_t: BoundKey::Char('t'),
            attack_y: BoundKey::Char('y'),
        }
    }

    pub fn player_two() -> Self {
        Self {
            left: BoundKey::Left,
            right: BoundKey::Right,
            jump: BoundKey::Up,
            crouch: BoundKey::Down,
            block: BoundKey::Char('0'),
            attack_r: BoundKey::Char('1'),
            attack_e: BoundKey::Char('2'),
            attack_t: BoundKey::Char('3'),
            attack_y: BoundKey::Char('4'),
        }
    }

    pub fn all(&self) -> [BoundKey; 9] {
        [
            self.left,
            self.right,
            self.jump,
            self.crouch,
            self.block,
            self.attack_r,
            self.attack_e,
            self.attack_t,
            self.attack_y,
        ]
    }

    /// Build a control state from a "is this key held" predicate.
    pub fn controls(&self, held: impl Fn(BoundKey) -> bool) -> ControlState {
        ControlState {
            left: held(self.left),
            right: held(self.right),
            jump: held(self.jump),
            crouch: held(self.crouch),
            block: held(self.block),
            r: held(self.attack_r),
            e: held(self.attack_e),
            t: held(self.attack_t),
            y: held(self.attack_y),
        }
    }

    /// Returns the first key bound twice, if any.
    pub fn duplicate_key(&self) -> Option<BoundKey> {
        let keys = self.all();
        keys.iter()
            .enumerate()
            .find(|(i, k)| keys[i + 1..].contains(k))
            .map(|(_, k)| *k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_are_unique() {
        assert_eq!(KeyBindings::player_one().duplicate_key(), None);
        assert_eq!(KeyBindings::player_two().duplicate_key(), None);
    }

    #[test]
    fn test_duplicate_detected() {
        let mut b = KeyBindings::player_one();
        b.attack_y = BoundKey::Char('r');
        assert_eq!(b.duplicate_key(), Some(BoundKey::Char('r')));
    }

    #[test]
    fn test_controls_from_predicate() {
        let b = KeyBindings::player_two();
        let c = b.controls(|k| k == BoundKey::Left || k == BoundKey::Char('3'));
        assert!(c.left && c.t);
        assert!(!c.right && !c.r && !c.block);
    }

    #[test]
    fn test_key_code_lowercases() {
        assert_eq!(
            BoundKey::from_key_code(KeyCode::Char('W')),
            Some(BoundKey::Char('w'))
        );
        assert_eq!(BoundKey::from_key_code(KeyCode::Enter), None);
    }

    #[test]
    fn test_attack_accessors() {
        let mut c = ControlState::NONE;
        c.set_attack(AttackButton::Y, true);
        assert!(c.attack(AttackButton::Y));
        assert!(c.any_attack());
        assert!(!ControlState::NONE.any_attack());
    }
}
