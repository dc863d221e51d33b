//! Fighter state: body, health, stance machines, timers and animations.

use super::anim::FrameAnim;
use super::moves::{AttackButton, MoveKey};
use super::roster::{fps_for, AnimGroup, AnimSheet, CharacterId};
use crate::core::constants::*;
use crate::core::Rect;
use crate::input::ControlState;
use serde::{Deserialize, Serialize};

/// Which side of the screen a fighter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    P1,
    P2,
}

impl PlayerSlot {
    pub fn other(self) -> Self {
        match self {
            PlayerSlot::P1 => PlayerSlot::P2,
            PlayerSlot::P2 => PlayerSlot::P1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerSlot::P1 => "P1",
            PlayerSlot::P2 => "P2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    /// Standing.
    Medium,
    /// Crouching.
    Low,
    /// Airborne, knocked down, or recovering from an air attack.
    High,
}

/// Sub-state shared by the medium and low stance machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundState {
    Idle,
    MoveFwd,
    MoveBack,
    Block,
    Hit,
    Attack(AttackButton),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirState {
    Move,
    Attack,
    Hit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndState {
    Win,
    Lose,
}

/// The two medium block animations; one is picked at random per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockVariant {
    First,
    Second,
}

/// Every animation a fighter owns.
#[derive(Debug, Clone)]
pub struct FighterAnims {
    pub intro: FrameAnim,
    pub end_win: FrameAnim,
    pub end_lose: FrameAnim,
    pub medium_idle: FrameAnim,
    pub medium_move_fwd: FrameAnim,
    pub medium_move_back: FrameAnim,
    pub medium_block1: FrameAnim,
    pub medium_block2: FrameAnim,
    pub attack_r: FrameAnim,
    pub attack_e: FrameAnim,
    pub attack_t: FrameAnim,
    pub attack_y: FrameAnim,
    pub medium_hit: FrameAnim,
    pub low_idle: FrameAnim,
    pub low_move: FrameAnim,
    pub low_block: FrameAnim,
    pub low_attack_r: FrameAnim,
    pub low_hit: FrameAnim,
    pub high_move: FrameAnim,
    pub high_attack: FrameAnim,
    pub high_hit: FrameAnim,
}

impl FighterAnims {
    pub fn from_sheet(sheet: &AnimSheet) -> Self {
        let anim = |frames: usize, group: AnimGroup, looping: bool| {
            FrameAnim::new(frames, fps_for(group), looping)
        };
        Self {
            intro: anim(sheet.intro, AnimGroup::Intro, false),
            end_win: anim(sheet.end_win, AnimGroup::End, false),
            end_lose: anim(sheet.end_lose, AnimGroup::End, false),
            medium_idle: anim(sheet.idle, AnimGroup::Idle, true),
            medium_move_fwd: anim(sheet.move_fwd, AnimGroup::Move, true),
            medium_move_back: anim(sheet.move_back, AnimGroup::Move, true),
            medium_block1: anim(sheet.medium_block1, AnimGroup::Block, false),
            medium_block2: anim(sheet.medium_block2, AnimGroup::Block, false),
            attack_r: anim(sheet.medium_attack_r, AnimGroup::Attack, false),
            attack_e: anim(sheet.medium_attack_e, AnimGroup::Attack, false),
            attack_t: anim(sheet.medium_attack_t, AnimGroup::Attack, false),
            attack_y: anim(sheet.medium_attack_y, AnimGroup::Attack, false),
            medium_hit: anim(sheet.medium_hit, AnimGroup::Hit, false),
            low_idle: anim(sheet.low_idle, AnimGroup::Idle, true),
            low_move: anim(sheet.low_move, AnimGroup::Move, true),
            low_block: anim(sheet.low_block, AnimGroup::Block, false),
            low_attack_r: anim(sheet.low_attack_r, AnimGroup::Attack, false),
            low_hit: anim(sheet.low_hit, AnimGroup::Hit, false),
            high_move: anim(sheet.high_move, AnimGroup::Move, true),
            high_attack: anim(sheet.high_attack, AnimGroup::Attack, false),
            high_hit: anim(sheet.high_hit, AnimGroup::Hit, false),
        }
    }

    pub fn medium_attack(&self, button: AttackButton) -> &FrameAnim {
        match button {
            AttackButton::R => &self.attack_r,
            AttackButton::E => &self.attack_e,
            AttackButton::T => &self.attack_t,
            AttackButton::Y => &self.attack_y,
        }
    }

    pub fn medium_attack_mut(&mut self, button: AttackButton) -> &mut FrameAnim {
        match button {
            AttackButton::R => &mut self.attack_r,
            AttackButton::E => &mut self.attack_e,
            AttackButton::T => &mut self.attack_t,
            AttackButton::Y => &mut self.attack_y,
        }
    }

    pub fn all_mut(&mut self) -> [&mut FrameAnim; 21] {
        [
            &mut self.intro,
            &mut self.end_win,
            &mut self.end_lose,
            &mut self.medium_idle,
            &mut self.medium_move_fwd,
            &mut self.medium_move_back,
            &mut self.medium_block1,
            &mut self.medium_block2,
            &mut self.attack_r,
            &mut self.attack_e,
            &mut self.attack_t,
            &mut self.attack_y,
            &mut self.medium_hit,
            &mut self.low_idle,
            &mut self.low_move,
            &mut self.low_block,
            &mut self.low_attack_r,
            &mut self.low_hit,
            &mut self.high_move,
            &mut self.high_attack,
            &mut self.high_hit,
        ]
    }
}

/// One fighter on the stage.
#[derive(Debug, Clone)]
pub struct Fighter {
    pub character: CharacterId,
    pub slot: PlayerSlot,
    /// Body rectangle; feet sit on the stage ground line.
    pub rect: Rect,
    pub health: i32,
    pub score: u32,
    /// How many 10-health steps this fighter has lost this round.
    pub tens_lost: i32,
    pub facing_right: bool,

    pub stance: Stance,
    pub medium_state: GroundState,
    pub low_state: GroundState,
    pub air_state: AirState,
    pub end_state: Option<EndState>,
    pub anims: FighterAnims,
    pub block_variant: BlockVariant,

    pub is_blocking: bool,
    pub is_attacking: bool,
    pub is_hit: bool,
    pub in_air: bool,

    // Jump
    pub vy: f64,
    /// Horizontal speed committed at takeoff.
    pub jump_dx: i32,
    pub air_attack_used: bool,
    pub air_attack_damage_done: bool,
    pub air_was_hit: bool,

    // Timers (simulation ms, exclusive deadlines)
    pub air_land_recover_until: u64,
    pub knockdown_until: u64,
    pub hitstun_until: u64,
    pub blockstun_until: u64,
    /// Block cannot be released before this time.
    pub forced_block_until: u64,

    // Ground attacks
    pub active_attack: Option<AttackButton>,
    /// Set when the attack button is no longer held during the attack.
    pub release_pending: bool,
    pub damage_done_this_cycle: bool,

    /// Previous frame's controls for press-edge detection.
    pub prev: ControlState,
}

impl Fighter {
    pub fn new(character: CharacterId, slot: PlayerSlot, x: i32, ground_y: i32) -> Self {
        let mut rect = Rect::new(x, 0, PLAYER_W, PLAYER_H);
        rect.set_bottom(ground_y);
        Self {
            character,
            slot,
            rect,
            health: MAX_HEALTH,
            score: 0,
            tens_lost: 0,
            facing_right: slot == PlayerSlot::P1,
            stance: Stance::Medium,
            medium_state: GroundState::Idle,
            low_state: GroundState::Idle,
            air_state: AirState::Move,
            end_state: None,
            anims: FighterAnims::from_sheet(&character.sheet()),
            block_variant: BlockVariant::First,
            is_blocking: false,
            is_attacking: false,
            is_hit: false,
            in_air: false,
            vy: 0.0,
            jump_dx: 0,
            air_attack_used: false,
            air_attack_damage_done: false,
            air_was_hit: false,
            air_land_recover_until: 0,
            knockdown_until: 0,
            hitstun_until: 0,
            blockstun_until: 0,
            forced_block_until: 0,
            active_attack: None,
            release_pending: false,
            damage_done_this_cycle: false,
            prev: ControlState::NONE,
        }
    }

    pub fn name(&self) -> &'static str {
        self.character.name()
    }

    pub fn flip(&self) -> bool {
        !self.facing_right
    }

    pub fn is_knocked_down(&self, now_ms: u64) -> bool {
        now_ms < self.knockdown_until
    }

    pub fn in_hitstun(&self, now_ms: u64) -> bool {
        now_ms < self.hitstun_until
    }

    pub fn in_blockstun(&self, now_ms: u64) -> bool {
        now_ms < self.blockstun_until
    }

    pub fn stunned(&self, now_ms: u64) -> bool {
        self.in_hitstun(now_ms) || self.in_blockstun(now_ms)
    }

    pub fn is_ko(&self) -> bool {
        self.health <= 0
    }

    /// Move-table key for the attack currently in progress.
    pub fn current_move_key(&self) -> Option<MoveKey> {
        if self.in_air {
            return Some(MoveKey::Air);
        }
        match (self.stance, self.active_attack) {
            (Stance::Low, Some(AttackButton::R)) => Some(MoveKey::LowR),
            (Stance::Medium, Some(button)) => Some(MoveKey::Medium(button)),
            _ => None,
        }
    }

    /// `(anim_key, frame_index)` of what the fighter is showing right now.
    ///
    /// These keys index the hitbox database.
    pub fn current_frame_info(&self, now_ms: u64) -> (&'static str, usize) {
        match self.current_anim_slot(now_ms) {
            Some((key, anim)) => (key, anim.index),
            None => ("unknown", 0),
        }
    }

    fn current_anim_slot(&self, now_ms: u64) -> Option<(&'static str, &FrameAnim)> {
        let a = &self.anims;
        match self.end_state {
            Some(EndState::Win) => return Some(("end_win", &a.end_win)),
            Some(EndState::Lose) => return Some(("end_lose", &a.end_lose)),
            None => {}
        }

        if self.in_air || self.stance == Stance::High {
            if !self.in_air && self.is_knocked_down(now_ms) {
                if !a.high_hit.done && self.air_state == AirState::Hit {
                    return Some(("high_hit", &a.high_hit));
                }
                return Some(("high_knockdown", &a.high_hit));
            }
            return Some(match self.air_state {
                AirState::Hit => ("high_hit", &a.high_hit),
                AirState::Attack => ("high_attack", &a.high_attack),
                AirState::Move => ("high_move", &a.high_move),
            });
        }

        if self.stance == Stance::Low {
            return match self.low_state {
                GroundState::Idle => Some(("low_idle", &a.low_idle)),
                GroundState::MoveFwd | GroundState::MoveBack => Some(("low_move", &a.low_move)),
                GroundState::Block => Some(("low_block", &a.low_block)),
                GroundState::Hit => Some(("low_hit", &a.low_hit)),
                GroundState::Attack(AttackButton::R) => Some(("low_attack_r", &a.low_attack_r)),
                GroundState::Attack(_) => None,
            };
        }

        Some(match self.medium_state {
            GroundState::Idle => ("med_idle", &a.medium_idle),
            GroundState::MoveFwd => ("med_move_fwd", &a.medium_move_fwd),
            GroundState::MoveBack => ("med_move_back", &a.medium_move_back),
            GroundState::Block => ("med_block", self.medium_block_anim()),
            GroundState::Hit => ("med_hit", &a.medium_hit),
            GroundState::Attack(AttackButton::R) => ("med_attack_r", &a.attack_r),
            GroundState::Attack(AttackButton::E) => ("med_attack_e", &a.attack_e),
            GroundState::Attack(AttackButton::T) => ("med_attack_t", &a.attack_t),
            GroundState::Attack(AttackButton::Y) => ("med_attack_y", &a.attack_y),
        })
    }

    /// Mutable handle on the animation `current_frame_info` reports (editor stepping).
    pub fn current_anim_mut(&mut self, now_ms: u64) -> Option<&mut FrameAnim> {
        let (key, _) = self.current_frame_info(now_ms);
        let variant = self.block_variant;
        let a = &mut self.anims;
        let anim = match key {
            "end_win" => &mut a.end_win,
            "end_lose" => &mut a.end_lose,
            "high_hit" | "high_knockdown" => &mut a.high_hit,
            "high_attack" => &mut a.high_attack,
            "high_move" => &mut a.high_move,
            "low_idle" => &mut a.low_idle,
            "low_move" => &mut a.low_move,
            "low_block" => &mut a.low_block,
            "low_hit" => &mut a.low_hit,
            "low_attack_r" => &mut a.low_attack_r,
            "med_idle" => &mut a.medium_idle,
            "med_move_fwd" => &mut a.medium_move_fwd,
            "med_move_back" => &mut a.medium_move_back,
            "med_block" => match variant {
                BlockVariant::First => &mut a.medium_block1,
                BlockVariant::Second => &mut a.medium_block2,
            },
            "med_hit" => &mut a.medium_hit,
            "med_attack_r" => &mut a.attack_r,
            "med_attack_e" => &mut a.attack_e,
            "med_attack_t" => &mut a.attack_t,
            "med_attack_y" => &mut a.attack_y,
            _ => return None,
        };
        Some(anim)
    }

    pub fn medium_block_anim(&self) -> &FrameAnim {
        match self.block_variant {
            BlockVariant::First => &self.anims.medium_block1,
            BlockVariant::Second => &self.anims.medium_block2,
        }
    }

    pub fn medium_block_anim_mut(&mut self) -> &mut FrameAnim {
        match self.block_variant {
            BlockVariant::First => &mut self.anims.medium_block1,
            BlockVariant::Second => &mut self.anims.medium_block2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fighter_stands_on_ground() {
        let f = Fighter::new(CharacterId::Nate, PlayerSlot::P1, P1_START_X, 520);
        assert_eq!(f.rect.bottom(), 520);
        assert_eq!(f.rect.w, PLAYER_W);
        assert_eq!(f.health, MAX_HEALTH);
        assert!(f.facing_right);
        assert_eq!(f.current_frame_info(0), ("med_idle", 0));
    }

    #[test]
    fn test_p2_faces_left() {
        let f = Fighter::new(CharacterId::Blake, PlayerSlot::P2, P2_START_X, 520);
        assert!(f.flip());
        assert_eq!(f.name(), "blake");
    }

    #[test]
    fn test_frame_info_keys() {
        let mut f = Fighter::new(CharacterId::Nate, PlayerSlot::P1, 0, 520);
        f.stance = Stance::Low;
        f.low_state = GroundState::MoveBack;
        assert_eq!(f.current_frame_info(0).0, "low_move");

        f.stance = Stance::Medium;
        f.medium_state = GroundState::Attack(AttackButton::T);
        assert_eq!(f.current_frame_info(0).0, "med_attack_t");

        f.end_state = Some(EndState::Lose);
        assert_eq!(f.current_frame_info(0).0, "end_lose");
    }

    #[test]
    fn test_knockdown_frame_key() {
        let mut f = Fighter::new(CharacterId::Nate, PlayerSlot::P1, 0, 520);
        f.stance = Stance::High;
        f.air_state = AirState::Hit;
        f.knockdown_until = 1000;
        f.anims.high_hit.done = true;
        assert_eq!(f.current_frame_info(500).0, "high_knockdown");
        f.anims.high_hit.done = false;
        assert_eq!(f.current_frame_info(500).0, "high_hit");
    }

    #[test]
    fn test_current_anim_mut_matches_frame_info() {
        let mut f = Fighter::new(CharacterId::Nate, PlayerSlot::P1, 0, 520);
        f.medium_state = GroundState::Block;
        f.block_variant = BlockVariant::Second;
        f.current_anim_mut(0).unwrap().index = 2;
        assert_eq!(f.anims.medium_block2.index, 2);
        assert_eq!(f.current_frame_info(0), ("med_block", 2));
    }

    #[test]
    fn test_move_key_for_stance() {
        let mut f = Fighter::new(CharacterId::Nate, PlayerSlot::P1, 0, 520);
        f.active_attack = Some(AttackButton::R);
        assert_eq!(f.current_move_key(), Some(MoveKey::Medium(AttackButton::R)));
        f.stance = Stance::Low;
        assert_eq!(f.current_move_key(), Some(MoveKey::LowR));
        f.in_air = true;
        assert_eq!(f.current_move_key(), Some(MoveKey::Air));
    }
}
