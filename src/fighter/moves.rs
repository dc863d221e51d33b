//! Authored move data (damage, height, stun and knockback per attack).

use serde::{Deserialize, Serialize};

/// The four attack buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackButton {
    R,
    E,
    T,
    Y,
}

impl AttackButton {
    pub const ALL: [AttackButton; 4] = [
        AttackButton::R,
        AttackButton::E,
        AttackButton::T,
        AttackButton::Y,
    ];

    pub fn letter(self) -> char {
        match self {
            AttackButton::R => 'r',
            AttackButton::E => 'e',
            AttackButton::T => 't',
            AttackButton::Y => 'y',
        }
    }
}

/// Where an attack lands; decides which block stance covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Height {
    High,
    Mid,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveData {
    pub damage: i32,
    pub height: Height,
    pub hitstun_ms: u64,
    pub blockstun_ms: u64,
    pub knockback_px: i32,
    /// 0 = no knockdown.
    pub knockdown_ms: u64,
}

impl MoveData {
    const fn new(
        damage: i32,
        height: Height,
        hitstun_ms: u64,
        blockstun_ms: u64,
        knockback_px: i32,
    ) -> Self {
        Self {
            damage,
            height,
            hitstun_ms,
            blockstun_ms,
            knockback_px,
            knockdown_ms: 0,
        }
    }

    /// Pushback applied to a defender that blocks this move.
    pub fn block_pushback(&self) -> i32 {
        (self.knockback_px / 2).max(6)
    }
}

/// Which attack is being performed, keyed by stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Medium(AttackButton),
    LowR,
    Air,
}

pub const AIR_ATTACK: MoveData = MoveData::new(10, Height::High, 240, 160, 22);

/// Look up the move table. Low stance only has the R attack.
pub fn move_data(key: MoveKey) -> MoveData {
    match key {
        MoveKey::Medium(AttackButton::R) => MoveData::new(4, Height::Mid, 160, 120, 10),
        MoveKey::Medium(AttackButton::E) => MoveData::new(8, Height::High, 220, 150, 16),
        MoveKey::Medium(AttackButton::T) => MoveData::new(6, Height::Mid, 180, 130, 14),
        MoveKey::Medium(AttackButton::Y) => MoveData::new(10, Height::High, 260, 170, 20),
        MoveKey::LowR => MoveData {
            knockdown_ms: 550,
            ..MoveData::new(11, Height::Low, 220, 160, 18)
        },
        MoveKey::Air => AIR_ATTACK,
    }
}

/// Frame on which an attack deals damage, clamped to the animation length.
pub fn active_frame_index(key: MoveKey, frame_count: usize) -> usize {
    let last = frame_count.saturating_sub(1);
    match key {
        MoveKey::Medium(_) => 4.min(last),
        MoveKey::LowR => last,
        MoveKey::Air => 1.min(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medium_table() {
        let e = move_data(MoveKey::Medium(AttackButton::E));
        assert_eq!(e.damage, 8);
        assert_eq!(e.height, Height::High);
        assert_eq!(e.hitstun_ms, 220);
        assert_eq!(e.knockdown_ms, 0);
    }

    #[test]
    fn test_sweep_knocks_down() {
        let sweep = move_data(MoveKey::LowR);
        assert_eq!(sweep.height, Height::Low);
        assert_eq!(sweep.damage, 11);
        assert_eq!(sweep.knockdown_ms, 550);
    }

    #[test]
    fn test_block_pushback_floor() {
        let jab = move_data(MoveKey::Medium(AttackButton::R));
        assert_eq!(jab.block_pushback(), 6);
        assert_eq!(AIR_ATTACK.block_pushback(), 11);
    }

    #[test]
    fn test_active_frames() {
        assert_eq!(active_frame_index(MoveKey::Medium(AttackButton::Y), 10), 4);
        assert_eq!(active_frame_index(MoveKey::Medium(AttackButton::R), 3), 2);
        assert_eq!(active_frame_index(MoveKey::LowR, 6), 5);
        assert_eq!(active_frame_index(MoveKey::Air, 3), 1);
    }
}
