//! CPU opponent: spacing, blocking and attack selection scaled by difficulty.
//!
//! The controller emits a fresh `ControlState` every frame. Attack and block
//! buttons are only pressed on think frames, so each press is a clean edge;
//! walking is held between thinks so movement keeps its normal speed.

use crate::fighter::moves::AttackButton;
use crate::fighter::Fighter;
use crate::input::ControlState;
use rand::seq::SliceRandom;
use rand::Rng;

/// Match-level facts the CPU reacts to.
#[derive(Debug, Clone, Copy)]
pub struct NpcView {
    pub now_ms: u64,
    pub round: u32,
    pub p1_wins: u32,
    pub p2_wins: u32,
    /// Only drive inputs while the round is live.
    pub fighting: bool,
}

#[derive(Debug, Clone)]
pub struct NpcController {
    /// Difficulty slider, 0..=1.
    base: f64,
    next_think: u64,
    next_attack: u64,
    next_block: u64,
    move_hold_until: u64,
    /// -1 left, +1 right, 0 none.
    hold_dir: i32,
    last_attack: Option<AttackButton>,
    combo_until: u64,
    last_opp_health: i32,
}

impl NpcController {
    pub fn new(base_difficulty: f64) -> Self {
        Self {
            base: base_difficulty.clamp(0.0, 1.0),
            next_think: 0,
            next_attack: 0,
            next_block: 0,
            move_hold_until: 0,
            hold_dir: 0,
            last_attack: None,
            combo_until: 0,
            last_opp_health: crate::core::constants::MAX_HEALTH,
        }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn set_base(&mut self, base_difficulty: f64) {
        self.base = base_difficulty.clamp(0.0, 1.0);
    }

    /// Effective difficulty for this think: a curved slider plus later-round
    /// ramp and rubber band toward the player who is ahead.
    pub fn effective_difficulty<R: Rng>(&self, view: &NpcView, rng: &mut R) -> f64 {
        let base = self.base.clamp(0.0, 1.0).powf(0.70);
        let mut adapt = f64::from(view.round.saturating_sub(1)) * 0.08;
        adapt += (f64::from(view.p1_wins) - f64::from(view.p2_wins)) * 0.10;
        adapt += rng.gen_range(-0.03..=0.03);
        (base + adapt).clamp(0.05, 0.98)
    }

    /// Buttons for this frame. `me` is the CPU's fighter.
    pub fn controls<R: Rng>(
        &mut self,
        me: &Fighter,
        opp: &Fighter,
        view: NpcView,
        rng: &mut R,
    ) -> ControlState {
        let mut keys = ControlState::NONE;
        if !view.fighting {
            return keys;
        }
        let now = view.now_ms;

        if now < self.move_hold_until {
            self.apply_hold(&mut keys);
        }

        let diff = self.effective_difficulty(&view, rng);
        let error = (1.0 - diff).powi(2);
        let think_ms = ((260.0 - 210.0 * diff) as u64).max(55);

        if opp.health < self.last_opp_health {
            self.combo_until = now + (650.0 + 550.0 * diff) as u64;
        }
        self.last_opp_health = opp.health;

        if now < self.next_think {
            return keys;
        }
        self.next_think = now + think_ms;

        let dx = opp.rect.center_x() - me.rect.center_x();
        let dist = dx.abs();
        let toward = if dx > 0 { 1 } else { -1 };

        self.plan_movement(now, dist, toward, diff, error, rng);
        keys.left = false;
        keys.right = false;
        self.apply_hold(&mut keys);

        self.plan_block(&mut keys, me, opp, now, dist, diff, error, rng);
        self.plan_attack(&mut keys, opp, now, dist, diff, error, rng);

        tracing::trace!(diff, dist, hold = self.hold_dir, "npc think");
        keys
    }

    fn apply_hold(&self, keys: &mut ControlState) {
        match self.hold_dir {
            d if d < 0 => keys.left = true,
            d if d > 0 => keys.right = true,
            _ => {}
        }
    }

    /// Hover inside a strike band rather than walking to point-blank range.
    fn plan_movement<R: Rng>(
        &mut self,
        now: u64,
        dist: i32,
        toward: i32,
        diff: f64,
        error: f64,
        rng: &mut R,
    ) {
        self.hold_dir = 0;
        let in_combo = now < self.combo_until;

        let mut optimal_min = 95 + (20.0 * (1.0 - diff)) as i32;
        let mut optimal_max = 150 + (10.0 * (1.0 - diff)) as i32;
        if in_combo {
            optimal_min = (optimal_min - 15).max(70);
            optimal_max = (optimal_max - 15).max(optimal_min + 25);
        }

        let attack_ready_soon = now + 120 >= self.next_attack;
        let far_gap = optimal_max + if diff < 0.45 { 95 } else { 75 };

        let hold = |base: f64, spread: f64| now + (base + spread * error) as u64;

        if dist > far_gap {
            self.hold_dir = toward;
            self.move_hold_until = hold(200.0, 160.0);
        } else if dist > optimal_max {
            self.hold_dir = toward;
            let step = if attack_ready_soon { 110.0 } else { 85.0 };
            self.move_hold_until = hold(step, 80.0);
        } else if dist < optimal_min {
            self.hold_dir = -toward;
            self.move_hold_until = hold(95.0, 90.0);
        } else if diff > 0.70 && rng.gen_bool(0.22) {
            if !attack_ready_soon && rng.gen::<f64>() < 0.35 + 0.25 * diff {
                // Back off while on cooldown to bait a whiff
                self.hold_dir = -toward;
                self.move_hold_until = hold(70.0, 60.0);
            } else if attack_ready_soon
                && dist > (optimal_min + optimal_max) / 2
                && rng.gen_bool(0.55)
            {
                self.hold_dir = toward;
                self.move_hold_until = hold(60.0, 50.0);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_block<R: Rng>(
        &mut self,
        keys: &mut ControlState,
        me: &Fighter,
        opp: &Fighter,
        now: u64,
        dist: i32,
        diff: f64,
        error: f64,
        rng: &mut R,
    ) {
        if now < self.next_block || dist >= 190 {
            return;
        }
        let opp_stunned = opp.hitstun_until > now;
        let me_stunned = me.hitstun_until > now;

        if !me_stunned && opp.is_attacking && !opp_stunned {
            let chance = (0.18 + 0.78 * diff) * (1.0 - 0.85 * error);
            if rng.gen::<f64>() < chance {
                keys.block = true;
                let hold_ms = if diff > 0.75 {
                    220.0 - 120.0 * diff
                } else {
                    260.0 - 110.0 * diff
                };
                self.next_block = now + hold_ms as u64;
            }
        } else {
            self.next_block = now + (300.0 - 110.0 * diff) as u64;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_attack<R: Rng>(
        &mut self,
        keys: &mut ControlState,
        opp: &Fighter,
        now: u64,
        dist: i32,
        diff: f64,
        error: f64,
        rng: &mut R,
    ) {
        let in_combo = now < self.combo_until;
        let opp_in_hitstun = opp.hitstun_until > now;
        let opp_in_blockstun = opp.blockstun_until > now;
        let pressure = in_combo || opp_in_hitstun;

        let mut aggression = 0.20 + 0.55 * diff;
        if pressure {
            aggression += 0.20 + 0.15 * diff;
        }
        if opp_in_blockstun && rng.gen::<f64>() < 0.20 + 0.30 * diff {
            aggression *= 0.65;
        }

        if now < self.next_attack || dist >= 175 || keys.block {
            return;
        }
        if rng.gen::<f64>() >= aggression * (1.0 - 0.55 * error) {
            return;
        }

        let weighted = attack_weights(dist, diff);
        let Some(mut which) = pick_weighted(&weighted, rng) else {
            return;
        };
        // Avoid repeats unless pressing a combo
        if !in_combo && self.last_attack == Some(which) && rng.gen::<f64>() < 0.70 - 0.35 * diff {
            which = pick_weighted(&weighted, rng).unwrap_or(which);
        }

        keys.set_attack(which, true);
        self.last_attack = Some(which);

        let base_cd = match which {
            AttackButton::R => 520,
            AttackButton::E => 560,
            AttackButton::T => 650,
            AttackButton::Y => 760,
        };
        let combo_bonus = if pressure {
            180 + (120.0 * diff) as i64
        } else {
            0
        };
        let cd = base_cd - (260.0 * diff) as i64 - combo_bonus + rng.gen_range(-60..=60);
        self.next_attack = now + cd.max(120) as u64;
    }
}

/// Move preference by distance: jabs up close, body blows mid-range, kicks at the edge.
pub fn attack_weights(dist: i32, diff: f64) -> [(AttackButton, u32); 4] {
    use AttackButton::*;
    if dist < 90 {
        [(R, 4), (E, 3), (T, 2), (Y, 1)]
    } else if dist < 130 {
        [(T, if diff > 0.70 { 5 } else { 4 }), (R, 2), (E, 2), (Y, 2)]
    } else {
        [(Y, if diff > 0.70 { 6 } else { 5 }), (T, 3), (R, 1), (E, 1)]
    }
}

fn pick_weighted<R: Rng>(weighted: &[(AttackButton, u32)], rng: &mut R) -> Option<AttackButton> {
    weighted
        .choose_weighted(rng, |&(_, w)| w)
        .ok()
        .map(|&(button, _)| button)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::roster::CharacterId;
    use crate::fighter::PlayerSlot;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighters(cpu_x: i32, human_x: i32) -> (Fighter, Fighter) {
        let cpu = Fighter::new(CharacterId::Scorpion, PlayerSlot::P2, cpu_x, 520);
        let human = Fighter::new(CharacterId::Nate, PlayerSlot::P1, human_x, 520);
        (cpu, human)
    }

    fn view(now_ms: u64) -> NpcView {
        NpcView {
            now_ms,
            round: 1,
            p1_wins: 0,
            p2_wins: 0,
            fighting: true,
        }
    }

    #[test]
    fn test_idle_outside_fighting() {
        let (cpu, human) = fighters(660, 40);
        let mut npc = NpcController::new(0.9);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let v = NpcView {
            fighting: false,
            ..view(1000)
        };
        assert_eq!(npc.controls(&cpu, &human, v, &mut rng), ControlState::NONE);
    }

    #[test]
    fn test_walks_toward_distant_opponent() {
        let (cpu, human) = fighters(660, 40);
        let mut npc = NpcController::new(0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let keys = npc.controls(&cpu, &human, view(1000), &mut rng);
        assert!(keys.left);
        assert!(!keys.right);
        assert!(!keys.any_attack());
    }

    #[test]
    fn test_movement_held_between_thinks() {
        let (cpu, human) = fighters(660, 40);
        let mut npc = NpcController::new(0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        npc.controls(&cpu, &human, view(1000), &mut rng);
        // Next frame is before the next think but within the hold
        let keys = npc.controls(&cpu, &human, view(1016), &mut rng);
        assert!(keys.left);
    }

    #[test]
    fn test_backs_off_when_too_close() {
        let (cpu, human) = fighters(300, 260);
        let mut npc = NpcController::new(0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let keys = npc.controls(&cpu, &human, view(1000), &mut rng);
        // Opponent is to the left, so backing off means walking right
        assert!(keys.right);
    }

    #[test]
    fn test_attacks_at_close_range_eventually() {
        let (cpu, human) = fighters(380, 260);
        let mut npc = NpcController::new(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let attacked = (0..200u64)
            .map(|i| npc.controls(&cpu, &human, view(1000 + i * 16), &mut rng))
            .any(|k| k.any_attack());
        assert!(attacked);
    }

    #[test]
    fn test_attack_only_pressed_on_think_frame() {
        let (cpu, human) = fighters(380, 260);
        let mut npc = NpcController::new(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let frames: Vec<ControlState> = (0..200u64)
            .map(|i| npc.controls(&cpu, &human, view(1000 + i * 16), &mut rng))
            .collect();
        for pair in frames.windows(2) {
            assert!(
                !(pair[0].any_attack() && pair[1].any_attack()),
                "attack buttons are released the frame after a press"
            );
        }
    }

    #[test]
    fn test_blocks_incoming_attacks_at_high_difficulty() {
        let (cpu, mut human) = fighters(380, 260);
        human.is_attacking = true;
        let mut npc = NpcController::new(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let blocked = (0..100u64)
            .map(|i| npc.controls(&cpu, &human, view(1000 + i * 16), &mut rng))
            .any(|k| k.block);
        assert!(blocked);
    }

    #[test]
    fn test_difficulty_clamped_and_rubber_banded() {
        let npc = NpcController::new(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let v = NpcView {
            round: 3,
            p1_wins: 1,
            ..view(0)
        };
        assert_eq!(npc.effective_difficulty(&v, &mut rng), 0.98);

        let easy = NpcController::new(0.0);
        let d = easy.effective_difficulty(&view(0), &mut rng);
        assert!((0.05..=0.08).contains(&d));
    }

    #[test]
    fn test_set_base_clamps() {
        let mut npc = NpcController::new(2.0);
        assert_eq!(npc.base(), 1.0);
        npc.set_base(-1.0);
        assert_eq!(npc.base(), 0.0);
    }

    #[test]
    fn test_weights_favor_kicks_at_range() {
        let w = attack_weights(160, 0.8);
        assert_eq!(w[0], (AttackButton::Y, 6));
        let w = attack_weights(50, 0.8);
        assert_eq!(w[0], (AttackButton::R, 4));
    }
}
