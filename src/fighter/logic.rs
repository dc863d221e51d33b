//! Per-frame fighter state machine: jump physics, stance, block, attacks and movement.

use super::anim::FrameAnim;
use super::moves::{active_frame_index, move_data, AttackButton, Height, MoveKey, AIR_ATTACK};
use super::types::{AirState, BlockVariant, EndState, Fighter, GroundState, Stance};
use crate::combat::resolve::deal_damage;
use crate::core::constants::*;
use crate::core::SimContext;
use crate::game::events::MatchEvent;
use crate::input::ControlState;
use rand::Rng;

impl Fighter {
    /// Advance this fighter by one simulation step.
    pub fn update(&mut self, controls: ControlState, opponent: &mut Fighter, ctx: &mut SimContext) {
        self.step(controls, opponent, ctx);
        self.prev = controls;
    }

    fn step(&mut self, controls: ControlState, opponent: &mut Fighter, ctx: &mut SimContext) {
        let now = ctx.now_ms;
        match self.end_state {
            Some(EndState::Win) => {
                self.anims.end_win.update(now);
                return;
            }
            Some(EndState::Lose) => {
                self.anims.end_lose.update(now);
                return;
            }
            None => {}
        }

        self.update_jump(controls, ctx);

        // Knockdown holds the high-hit animation until the timer expires
        if self.is_knocked_down(now) {
            self.stance = Stance::High;
            if self.air_state == AirState::Hit && !self.anims.high_hit.done {
                self.anims.high_hit.update(now);
            }
            return;
        }

        if !self.in_air
            && self.stance == Stance::High
            && now >= self.knockdown_until
            && now >= self.air_land_recover_until
        {
            self.stance = Stance::Medium;
            self.air_state = AirState::Move;
            self.air_was_hit = false;
            self.air_land_recover_until = 0;
            self.air_attack_damage_done = false;
        }

        self.update_stance(controls, now);

        if self.stance == Stance::High {
            self.update_high(controls, opponent, ctx);
            return;
        }

        if self.is_hit {
            self.update_hit_anim(now);
            return;
        }

        self.update_block(controls, ctx);
        if !self.is_blocking {
            self.update_attacks(controls, ctx);
        }
        self.update_movement(controls, now);
        self.update_state_anim(opponent, ctx);
    }

    // ── Jump ────────────────────────────────────────────────────────

    fn update_jump(&mut self, controls: ControlState, ctx: &mut SimContext) {
        let now = ctx.now_ms;
        if self.is_knocked_down(now) {
            self.in_air = false;
            self.vy = 0.0;
            self.jump_dx = 0;
            return;
        }

        if self.stunned(now) && !self.in_air {
            self.update_reaction_anim(now);
            return;
        }

        let jump_pressed = controls.jump && !self.prev.jump;
        if !self.in_air
            && jump_pressed
            && !self.is_hit
            && !self.is_blocking
            && !self.is_attacking
            && self.rect.bottom() >= ctx.ground_y
        {
            self.start_jump(controls, now);
        }

        if !self.in_air {
            return;
        }

        if self.is_blocking {
            self.end_block(now);
        }

        if self.jump_dx != 0 {
            self.rect.x += self.jump_dx;
            self.rect.clamp_x(0, WORLD_WIDTH);
        }

        self.rect.y += self.vy as i32;
        self.vy += GRAVITY;

        if self.rect.bottom() >= ctx.ground_y {
            self.rect.set_bottom(ctx.ground_y);
            self.in_air = false;
            self.vy = 0.0;
            self.jump_dx = 0;

            if self.air_was_hit {
                self.knockdown_until = now + KNOCKDOWN_MS;
                self.air_was_hit = false;
                self.air_state = AirState::Hit;
                return;
            }

            // Landing from the flop: hold its last frame briefly
            if self.air_state == AirState::Attack {
                self.air_land_recover_until = now + AIR_ATTACK_LAND_STUN_MS;
                return;
            }

            self.air_state = AirState::Move;
        }
    }

    /// Direction is committed at takeoff.
    fn start_jump(&mut self, controls: ControlState, now: u64) {
        self.jump_dx = match (controls.left, controls.right) {
            (true, false) => -JUMP_HSPEED,
            (false, true) => JUMP_HSPEED,
            _ => 0,
        };
        self.in_air = true;
        self.vy = JUMP_VY;
        self.air_attack_used = false;
        self.air_attack_damage_done = false;
        self.air_was_hit = false;
        self.air_land_recover_until = 0;
        self.air_state = AirState::Move;
        self.anims.high_move.reset(now);
    }

    /// Keep a grounded reaction (hit or block) animating while stunned.
    fn update_reaction_anim(&mut self, now: u64) {
        match self.ground_state() {
            GroundState::Hit => self.update_hit_anim(now),
            GroundState::Block => self.update_block_anim(now),
            _ => {
                self.idle_anim_mut().update(now);
            }
        }
    }

    // ── Stance ──────────────────────────────────────────────────────

    fn update_stance(&mut self, controls: ControlState, now: u64) {
        if self.stunned(now) || self.is_knocked_down(now) || self.is_hit {
            return;
        }

        let next = if self.in_air
            || now < self.air_land_recover_until
            || now < self.knockdown_until
        {
            Stance::High
        } else if controls.crouch {
            Stance::Low
        } else {
            Stance::Medium
        };

        if next == self.stance {
            return;
        }
        // An attack started in one stance has no animation in the other
        if self.is_attacking {
            self.end_attack(now);
        }
        self.stance = next;
        if self.is_blocking && next != Stance::High {
            self.set_ground_state(GroundState::Block, now);
            self.current_block_anim_mut().reset(now);
        }
    }

    // ── Airborne / high stance ──────────────────────────────────────

    fn update_high(&mut self, controls: ControlState, opponent: &mut Fighter, ctx: &mut SimContext) {
        let now = ctx.now_ms;

        if !self.in_air && now < self.air_land_recover_until {
            self.air_state = AirState::Attack;
            return;
        }

        let r_pressed = controls.r && !self.prev.r;
        if self.in_air && !self.air_attack_used && r_pressed && self.air_state == AirState::Move {
            self.air_state = AirState::Attack;
            self.air_attack_used = true;
            self.air_attack_damage_done = false;
            self.anims.high_attack.reset(now);
            ctx.emit(MatchEvent::Whoosh { attacker: self.slot });
            return;
        }

        match self.air_state {
            AirState::Hit => {
                self.anims.high_hit.update(now);
            }
            AirState::Attack => {
                let (advanced, _) = self.anims.high_attack.update(now);
                let anim = &self.anims.high_attack;
                let active = active_frame_index(MoveKey::Air, anim.frame_count);
                if advanced && !self.air_attack_damage_done && anim.index == active {
                    self.air_attack_damage_done = true;
                    deal_damage(self, opponent, AIR_ATTACK, true, ctx);
                }
            }
            AirState::Move => {
                self.anims.high_move.update(now);
            }
        }
    }

    fn set_high_state(&mut self, state: AirState, now: u64) {
        if state == self.air_state {
            return;
        }
        self.air_state = state;
        match state {
            AirState::Move => self.anims.high_move.reset(now),
            AirState::Attack => self.anims.high_attack.reset(now),
            AirState::Hit => self.anims.high_hit.reset(now),
        }
    }

    // ── Ground state machines ───────────────────────────────────────

    fn ground_state(&self) -> GroundState {
        if self.stance == Stance::Low {
            self.low_state
        } else {
            self.medium_state
        }
    }

    fn set_ground_state(&mut self, state: GroundState, now: u64) {
        if self.stance == Stance::Low {
            self.set_low_state(state, now);
        } else {
            self.set_medium_state(state, now);
        }
    }

    fn set_medium_state(&mut self, state: GroundState, now: u64) {
        if state == self.medium_state {
            return;
        }
        self.medium_state = state;
        let a = &mut self.anims;
        match state {
            GroundState::Idle => a.medium_idle.reset(now),
            GroundState::MoveFwd => a.medium_move_fwd.reset(now),
            GroundState::MoveBack => a.medium_move_back.reset(now),
            GroundState::Hit => a.medium_hit.reset(now),
            // Non-looping attacks must be rewound before they can replay
            GroundState::Attack(_) => {
                for button in AttackButton::ALL {
                    a.medium_attack_mut(button).reset(now);
                }
            }
            GroundState::Block => {}
        }
    }

    fn set_low_state(&mut self, state: GroundState, now: u64) {
        if state == self.low_state {
            return;
        }
        self.low_state = state;
        let a = &mut self.anims;
        match state {
            GroundState::Idle => a.low_idle.reset(now),
            GroundState::MoveFwd | GroundState::MoveBack => a.low_move.reset(now),
            GroundState::Attack(AttackButton::R) => a.low_attack_r.reset(now),
            GroundState::Hit => a.low_hit.reset(now),
            GroundState::Attack(_) | GroundState::Block => {}
        }
    }

    fn idle_anim_mut(&mut self) -> &mut FrameAnim {
        if self.stance == Stance::Low {
            &mut self.anims.low_idle
        } else {
            &mut self.anims.medium_idle
        }
    }

    fn update_state_anim(&mut self, opponent: &mut Fighter, ctx: &mut SimContext) {
        let now = ctx.now_ms;
        let low = self.stance == Stance::Low;
        match self.ground_state() {
            GroundState::Idle => {
                self.idle_anim_mut().update(now);
            }
            GroundState::MoveFwd if low => {
                self.anims.low_move.update(now);
            }
            GroundState::MoveBack if low => {
                self.anims.low_move.update(now);
            }
            GroundState::MoveFwd => {
                self.anims.medium_move_fwd.update(now);
            }
            GroundState::MoveBack => {
                self.anims.medium_move_back.update(now);
            }
            GroundState::Block => self.update_block_anim(now),
            GroundState::Hit => self.update_hit_anim(now),
            GroundState::Attack(_) => self.update_attack_anim(opponent, ctx),
        }
    }

    // ── Block ───────────────────────────────────────────────────────

    /// Standing covers high and mid; crouching covers low and mid.
    pub fn block_is_correct(&self, height: Height) -> bool {
        match self.stance {
            Stance::Medium => matches!(height, Height::High | Height::Mid),
            Stance::Low => matches!(height, Height::Low | Height::Mid),
            Stance::High => false,
        }
    }

    fn update_block(&mut self, controls: ControlState, ctx: &mut SimContext) {
        let now = ctx.now_ms;
        if self.in_air || self.stance == Stance::High {
            if self.is_blocking {
                self.end_block(now);
            }
            return;
        }

        if controls.block {
            if !self.is_blocking && !self.is_hit {
                self.begin_block(ctx);
            }
        } else {
            // Block cannot be released during blockstun
            if now < self.forced_block_until {
                return;
            }
            if self.is_blocking {
                self.end_block(now);
            }
        }
    }

    fn begin_block(&mut self, ctx: &mut SimContext) {
        let now = ctx.now_ms;
        if self.stance != Stance::Low {
            self.block_variant = if ctx.rng.gen_bool(0.5) {
                BlockVariant::First
            } else {
                BlockVariant::Second
            };
        }
        self.current_block_anim_mut().reset(now);
        self.is_blocking = true;
        self.cancel_attack();
        self.set_ground_state(GroundState::Block, now);
    }

    /// Keep the fighter in block after absorbing a hit, even if the button was let go.
    pub fn hold_block_state(&mut self, now: u64) {
        self.is_blocking = true;
        self.set_ground_state(GroundState::Block, now);
    }

    fn end_block(&mut self, now: u64) {
        self.is_blocking = false;
        self.set_ground_state(GroundState::Idle, now);
    }

    fn current_block_anim_mut(&mut self) -> &mut FrameAnim {
        if self.stance == Stance::Low {
            &mut self.anims.low_block
        } else {
            self.medium_block_anim_mut()
        }
    }

    fn update_block_anim(&mut self, now: u64) {
        self.current_block_anim_mut().update(now);
    }

    // ── Hit reaction ────────────────────────────────────────────────

    /// Enter the grounded hit reaction immediately.
    pub fn trigger_hit(&mut self, now: u64) {
        self.is_hit = true;
        if !self.in_air && self.stance == Stance::High {
            self.stance = Stance::Medium;
            self.air_land_recover_until = 0;
            self.air_state = AirState::Move;
        }
        self.is_blocking = false;
        self.cancel_attack();
        self.set_ground_state(GroundState::Hit, now);
    }

    /// Hit while airborne: play the air hit and fall into a knockdown on landing.
    pub fn trigger_air_hit(&mut self, now: u64) {
        self.air_was_hit = true;
        self.is_blocking = false;
        self.cancel_attack();
        self.set_high_state(AirState::Hit, now);
    }

    fn update_hit_anim(&mut self, now: u64) {
        let in_hitstun = self.in_hitstun(now);
        let anim = if self.stance == Stance::Low {
            &mut self.anims.low_hit
        } else {
            &mut self.anims.medium_hit
        };
        anim.update(now);
        if anim.done && !in_hitstun {
            self.is_hit = false;
            self.set_ground_state(GroundState::Idle, now);
        }
    }

    // ── Attacks ─────────────────────────────────────────────────────

    fn update_attacks(&mut self, controls: ControlState, ctx: &mut SimContext) {
        let prev = self.prev;
        let pressed = |button: AttackButton| controls.attack(button) && !prev.attack(button);

        if !self.is_hit && !self.is_blocking && !self.is_attacking {
            if pressed(AttackButton::R) {
                self.begin_attack(AttackButton::R, ctx);
            } else if self.stance == Stance::Medium {
                let next = [AttackButton::E, AttackButton::T, AttackButton::Y]
                    .into_iter()
                    .find(|&b| pressed(b));
                if let Some(button) = next {
                    self.begin_attack(button, ctx);
                }
            }
        }

        if self.is_attacking {
            if let Some(active) = self.active_attack {
                let held = if self.stance == Stance::Low {
                    controls.r
                } else {
                    controls.attack(active)
                };
                self.release_pending = !held;
            }
        }
    }

    fn begin_attack(&mut self, button: AttackButton, ctx: &mut SimContext) {
        let now = ctx.now_ms;
        if self.stunned(now) || self.is_knocked_down(now) || self.is_hit {
            return;
        }
        // Low stance only has the sweep
        if self.stance == Stance::Low && button != AttackButton::R {
            return;
        }

        self.is_attacking = true;
        self.is_blocking = false;
        self.active_attack = Some(button);
        self.release_pending = false;
        self.damage_done_this_cycle = false;
        self.set_ground_state(GroundState::Attack(button), now);
        ctx.emit(MatchEvent::Whoosh { attacker: self.slot });
    }

    fn cancel_attack(&mut self) {
        self.is_attacking = false;
        self.active_attack = None;
        self.release_pending = false;
        self.damage_done_this_cycle = false;
    }

    fn end_attack(&mut self, now: u64) {
        self.cancel_attack();
        self.set_ground_state(GroundState::Idle, now);
    }

    fn attack_anim_mut(&mut self) -> Option<&mut FrameAnim> {
        match (self.stance, self.active_attack) {
            (Stance::Low, Some(AttackButton::R)) => Some(&mut self.anims.low_attack_r),
            (Stance::Medium, Some(button)) => Some(self.anims.medium_attack_mut(button)),
            _ => None,
        }
    }

    /// Damage lands once per cycle, on the move's active frame.
    fn update_attack_anim(&mut self, opponent: &mut Fighter, ctx: &mut SimContext) {
        let now = ctx.now_ms;
        let Some(key) = self.current_move_key() else {
            self.end_attack(now);
            return;
        };
        let Some(anim) = self.attack_anim_mut() else {
            self.end_attack(now);
            return;
        };

        let (advanced, _) = anim.update(now);
        let index = anim.index;
        let active = active_frame_index(key, anim.frame_count);
        let done = anim.done;

        if advanced && !self.damage_done_this_cycle && index == active {
            self.damage_done_this_cycle = true;
            deal_damage(self, opponent, move_data(key), false, ctx);
        }

        if done && self.is_attacking {
            self.end_attack(now);
        }
    }

    // ── Movement ────────────────────────────────────────────────────

    fn update_movement(&mut self, controls: ControlState, now: u64) {
        if self.stunned(now) || self.is_knocked_down(now) {
            return;
        }
        if self.is_hit || self.is_blocking || self.is_attacking || self.stance == Stance::High {
            return;
        }

        let dx = match (controls.left, controls.right) {
            (true, false) => -MOVE_SPEED,
            (false, true) => MOVE_SPEED,
            _ => 0,
        };
        if dx == 0 {
            self.set_ground_state(GroundState::Idle, now);
            return;
        }

        self.rect.x += dx;
        self.rect.clamp_x(0, WORLD_WIDTH);

        let forward = (dx > 0) == self.facing_right;
        let state = if forward {
            GroundState::MoveFwd
        } else {
            GroundState::MoveBack
        };
        self.set_ground_state(state, now);
    }

    // ── Match flow hooks ────────────────────────────────────────────

    /// Face the opponent: right iff our center is not past theirs.
    pub fn update_facing(&mut self, opponent: &Fighter) {
        self.facing_right = self.rect.center_x() <= opponent.rect.center_x();
    }

    pub fn set_end_state(&mut self, state: Option<EndState>, now: u64) {
        self.end_state = state;
        match state {
            Some(EndState::Win) => self.anims.end_win.reset(now),
            Some(EndState::Lose) => self.anims.end_lose.reset(now),
            None => {}
        }
    }

    /// Full health, back on the start mark, every transient state cleared.
    /// Score carries over between rounds.
    pub fn reset_for_round(&mut self, x: i32, ground_y: i32, now: u64) {
        self.health = MAX_HEALTH;
        self.tens_lost = 0;
        self.rect.x = x;
        self.rect.set_bottom(ground_y);

        self.stance = Stance::Medium;
        self.medium_state = GroundState::Idle;
        self.low_state = GroundState::Idle;
        self.air_state = AirState::Move;
        self.set_end_state(None, now);

        self.is_blocking = false;
        self.is_hit = false;
        self.in_air = false;
        self.cancel_attack();

        self.vy = 0.0;
        self.jump_dx = 0;
        self.air_attack_used = false;
        self.air_attack_damage_done = false;
        self.air_was_hit = false;

        self.air_land_recover_until = 0;
        self.knockdown_until = 0;
        self.hitstun_until = 0;
        self.blockstun_until = 0;
        self.forced_block_until = 0;
        self.prev = ControlState::NONE;

        for anim in self.anims.all_mut() {
            anim.reset(now);
        }
    }

    /// Restart every animation clock at `now` (after time was frozen).
    pub fn resync_anims(&mut self, now: u64) {
        for anim in self.anims.all_mut() {
            anim.resync(now);
        }
    }
}
