//! Selectable characters and their animation sheets.

use crate::core::constants::*;
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playable characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterId {
    Nate,
    Scorpion,
    Connor,
    Blake,
}

impl CharacterId {
    pub const ALL: [CharacterId; 4] = [
        CharacterId::Nate,
        CharacterId::Scorpion,
        CharacterId::Connor,
        CharacterId::Blake,
    ];

    /// Lowercase id used in the hitbox database and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            CharacterId::Nate => "nate",
            CharacterId::Scorpion => "scorpion",
            CharacterId::Connor => "connor",
            CharacterId::Blake => "blake",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CharacterId::Nate => "Nate",
            CharacterId::Scorpion => "Scorpion",
            CharacterId::Connor => "Connor",
            CharacterId::Blake => "Blake",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Animation frame counts for this character.
    pub fn sheet(self) -> AnimSheet {
        match self {
            CharacterId::Nate => AnimSheet::BASE,
            CharacterId::Scorpion => AnimSheet {
                intro: 26,
                idle: 9,
                medium_attack_y: 9,
                high_hit: 5,
                end_win: 14,
                ..AnimSheet::BASE
            },
            CharacterId::Connor => AnimSheet {
                intro: 18,
                idle: 6,
                move_fwd: 9,
                move_back: 9,
                medium_attack_e: 7,
                low_attack_r: 7,
                ..AnimSheet::BASE
            },
            CharacterId::Blake => AnimSheet {
                intro: 22,
                idle: 8,
                medium_attack_t: 6,
                high_move: 5,
                end_lose: 8,
                ..AnimSheet::BASE
            },
        }
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CharacterId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| GameError::UnknownCharacter(s.to_string()))
    }
}

/// Frame counts for every animation a fighter plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimSheet {
    pub intro: usize,
    pub idle: usize,
    pub move_fwd: usize,
    pub move_back: usize,
    pub medium_block1: usize,
    pub medium_block2: usize,
    pub medium_attack_r: usize,
    pub medium_attack_e: usize,
    pub medium_attack_t: usize,
    pub medium_attack_y: usize,
    pub medium_hit: usize,
    pub low_idle: usize,
    pub low_move: usize,
    pub low_block: usize,
    pub low_attack_r: usize,
    pub low_hit: usize,
    pub high_move: usize,
    pub high_attack: usize,
    pub high_hit: usize,
    pub end_win: usize,
    pub end_lose: usize,
}

impl AnimSheet {
    pub const BASE: AnimSheet = AnimSheet {
        intro: 20,
        idle: 8,
        move_fwd: 8,
        move_back: 8,
        medium_block1: 3,
        medium_block2: 3,
        medium_attack_r: 5,
        medium_attack_e: 6,
        medium_attack_t: 5,
        medium_attack_y: 10,
        medium_hit: 4,
        low_idle: 4,
        low_move: 6,
        low_block: 2,
        low_attack_r: 6,
        low_hit: 3,
        high_move: 6,
        high_attack: 3,
        high_hit: 4,
        end_win: 12,
        end_lose: 10,
    };
}

// Character select grid: 2 rows x 5 columns, first four boxes are playable.
pub const SELECT_COLS: usize = 5;
pub const SELECT_ROWS: usize = 2;
pub const SELECT_BOXES: usize = SELECT_COLS * SELECT_ROWS;

/// Character occupying a select-grid box, if unlocked.
pub fn character_for_box(index: usize) -> Option<CharacterId> {
    CharacterId::ALL.get(index).copied()
}

/// Move the select cursor by `(dx, dy)` within the grid, clamping at edges.
pub fn move_select_cursor(index: usize, dx: i32, dy: i32) -> usize {
    let row = (index / SELECT_COLS) as i32;
    let col = (index % SELECT_COLS) as i32;
    let row = (row + dy).clamp(0, SELECT_ROWS as i32 - 1);
    let col = (col + dx).clamp(0, SELECT_COLS as i32 - 1);
    (row as usize) * SELECT_COLS + col as usize
}

/// Playback rate for each animation group.
pub fn fps_for(group: AnimGroup) -> u32 {
    match group {
        AnimGroup::Intro | AnimGroup::End => INTRO_FPS,
        AnimGroup::Idle => IDLE_FPS,
        AnimGroup::Move => MOVE_FPS,
        AnimGroup::Block => BLOCK_FPS,
        AnimGroup::Attack => ATTACK_FPS,
        AnimGroup::Hit => HIT_FPS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimGroup {
    Intro,
    Idle,
    Move,
    Block,
    Attack,
    Hit,
    End,
}
