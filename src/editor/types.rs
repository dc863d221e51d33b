//! Hitbox editor state.

use crate::combat::hitbox::HitboxDb;
use crate::core::Rect;
use crate::fighter::PlayerSlot;
use std::path::PathBuf;

/// Which box list the mouse and keys edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxMode {
    Push,
    Hurt,
    Hit,
}

impl BoxMode {
    pub fn label(self) -> &'static str {
        match self {
            BoxMode::Push => "PUSH",
            BoxMode::Hurt => "HURT",
            BoxMode::Hit => "HIT",
        }
    }
}

/// What a held mouse button is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    /// Rubber-banding a new box from `start`.
    Drawing { start: (i32, i32), rect: Rect },
    /// Dragging the selected box; `offset` is the grab point inside it.
    Moving { offset: (i32, i32) },
}

#[derive(Debug, Clone)]
pub struct HitboxEditor {
    pub mode: BoxMode,
    pub active_player: PlayerSlot,
    /// Index into the current mode's list (always 0 for the pushbox).
    pub selected: Option<usize>,
    pub drag: DragState,
    /// Edits land here; the fight only sees them after a save.
    pub working: HitboxDb,
    pub path: PathBuf,
    /// Result of the last save, shown in the help bar.
    pub status: Option<String>,
}

impl HitboxEditor {
    pub fn new(path: PathBuf, db: &HitboxDb) -> Self {
        Self {
            mode: BoxMode::Hurt,
            active_player: PlayerSlot::P1,
            selected: None,
            drag: DragState::Idle,
            working: db.clone(),
            path,
            status: None,
        }
    }

    /// Start a fresh editing session from the live database.
    pub fn reset_from(&mut self, db: &HitboxDb) {
        self.working = db.clone();
        self.selected = None;
        self.drag = DragState::Idle;
        self.status = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }
}
