//! Attack resolution: contact tests, block/hit outcomes and body spacing.

use super::hitbox::HitboxDb;
use crate::core::constants::*;
use crate::core::{Rect, SimContext};
use crate::fighter::moves::{Height, MoveData};
use crate::fighter::{Fighter, Stance};
use crate::game::events::MatchEvent;

/// What happened when an attack reached its active frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// No contact, or a high attack passing over a crouching opponent.
    Whiff,
    Blocked,
    Hit { damage: i32 },
}

/// Does the attacker's current frame connect with the defender?
///
/// Uses hit boxes against hurt boxes when both fighters have them, otherwise
/// a reach rectangle just beyond the attacker's front edge against the
/// defender's body.
pub fn attack_hits(attacker: &Fighter, defender: &Fighter, db: &HitboxDb, now_ms: u64) -> bool {
    let a = db.world_boxes(attacker, now_ms);
    let d = db.world_boxes(defender, now_ms);
    if !a.hit.is_empty() && !d.hurt.is_empty() {
        return a
            .hit
            .iter()
            .any(|h| d.hurt.iter().any(|u| h.colliderect(u)));
    }

    let body = attacker.rect;
    let reach = if attacker.facing_right {
        Rect::new(body.right(), body.y, ATTACK_RANGE_PAD, body.h)
    } else {
        Rect::new(body.left() - ATTACK_RANGE_PAD, body.y, ATTACK_RANGE_PAD, body.h)
    };
    reach.colliderect(&defender.rect)
}

/// Apply a move to the defender if it connects.
///
/// `airborne_attack` marks the jump attack: it is blocked by any grounded
/// block and never whiffs over crouchers.
pub fn deal_damage(
    attacker: &mut Fighter,
    defender: &mut Fighter,
    md: MoveData,
    airborne_attack: bool,
    ctx: &mut SimContext,
) -> AttackOutcome {
    let now = ctx.now_ms;
    if !attack_hits(attacker, defender, ctx.hitboxes, now) {
        return AttackOutcome::Whiff;
    }

    if !airborne_attack
        && md.height == Height::High
        && defender.stance == Stance::Low
        && !defender.in_air
    {
        return AttackOutcome::Whiff;
    }

    let blocked = if airborne_attack {
        defender.is_blocking && !defender.in_air
    } else {
        defender.is_blocking && defender.block_is_correct(md.height)
    };

    let push_dir = if attacker.facing_right { 1 } else { -1 };

    if blocked {
        defender.blockstun_until = defender.blockstun_until.max(now + md.blockstun_ms);
        defender.forced_block_until = defender.forced_block_until.max(now + md.blockstun_ms);
        defender.hold_block_state(now);
        defender.rect.x += push_dir * md.block_pushback();
        defender.rect.clamp_x(0, WORLD_WIDTH);
        ctx.emit(MatchEvent::Block {
            attacker: attacker.slot,
            defender: defender.slot,
        });
        tracing::trace!(attacker = ?attacker.slot, "attack blocked");
        return AttackOutcome::Blocked;
    }

    let pre_health = defender.health;
    defender.health = (defender.health - md.damage).max(0);
    let damage = pre_health - defender.health;

    if damage > 0 {
        ctx.emit(MatchEvent::Hit {
            attacker: attacker.slot,
            defender: defender.slot,
            damage,
        });
        ctx.emit(MatchEvent::DamageTaken {
            defender: defender.slot,
        });

        let new_tens_lost = (MAX_HEALTH - defender.health) / 10;
        if new_tens_lost > defender.tens_lost {
            attacker.score += (new_tens_lost - defender.tens_lost) as u32 * SCORE_PER_TEN_HEALTH;
        }
        defender.tens_lost = defender.tens_lost.max(new_tens_lost);
    }

    defender.hitstun_until = defender.hitstun_until.max(now + md.hitstun_ms);
    if defender.in_air {
        defender.trigger_air_hit(now);
    } else {
        defender.trigger_hit(now);
    }

    defender.rect.x += push_dir * md.knockback_px;
    defender.rect.clamp_x(0, WORLD_WIDTH);

    if md.knockdown_ms > 0 && !defender.in_air {
        defender.knockdown_until = defender.knockdown_until.max(now + md.knockdown_ms);
    }

    tracing::debug!(
        attacker = ?attacker.slot,
        damage,
        health = defender.health,
        "attack landed"
    );
    AttackOutcome::Hit { damage }
}

/// Separate overlapping fighters horizontally.
///
/// Uses pushboxes when present (body rectangles otherwise) and splits the
/// overlap between both fighters, then clamps them to the stage.
pub fn resolve_pushboxes(p1: &mut Fighter, p2: &mut Fighter, db: &HitboxDb, now_ms: u64) {
    let r1 = db.world_boxes(p1, now_ms).push.unwrap_or(p1.rect);
    let r2 = db.world_boxes(p2, now_ms).push.unwrap_or(p2.rect);
    if !r1.colliderect(&r2) {
        return;
    }
    let overlap = r1.right().min(r2.right()) - r1.left().max(r2.left());
    if overlap <= 0 {
        return;
    }

    let half = overlap / 2;
    if p1.rect.center_x() < p2.rect.center_x() {
        p1.rect.x -= half;
        p2.rect.x += overlap - half;
    } else {
        p1.rect.x += overlap - half;
        p2.rect.x -= half;
    }
    p1.rect.clamp_x(0, WORLD_WIDTH);
    p2.rect.clamp_x(0, WORLD_WIDTH);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::moves::{move_data, AttackButton, MoveKey};
    use crate::fighter::roster::CharacterId;
    use crate::fighter::{GroundState, PlayerSlot};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const GROUND: i32 = 520;

    fn pair(p1_x: i32, p2_x: i32) -> (Fighter, Fighter) {
        let mut p1 = Fighter::new(CharacterId::Nate, PlayerSlot::P1, p1_x, GROUND);
        let mut p2 = Fighter::new(CharacterId::Scorpion, PlayerSlot::P2, p2_x, GROUND);
        p1.update_facing(&p2);
        p2.update_facing(&p1);
        (p1, p2)
    }

    /// Put the attacker on the active frame of a medium attack.
    fn on_active_frame(f: &mut Fighter, button: AttackButton) {
        f.is_attacking = true;
        f.active_attack = Some(button);
        f.medium_state = GroundState::Attack(button);
        f.anims.medium_attack_mut(button).index = 4;
    }

    fn run<F: FnOnce(&mut SimContext) -> R, R>(db: &HitboxDb, events: &mut Vec<MatchEvent>, f: F) -> R {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ctx = SimContext {
            now_ms: 1000,
            ground_y: GROUND,
            hitboxes: db,
            events,
            rng: &mut rng,
        };
        f(&mut ctx)
    }

    #[test]
    fn test_reach_fallback_without_boxes() {
        let db = HitboxDb::empty();
        let (p1, p2) = pair(100, 410);
        // 10 units beyond the right edge: inside the 20-unit reach
        assert!(attack_hits(&p1, &p2, &db, 0));
        let (p1, p2) = pair(100, 430);
        assert!(!attack_hits(&p1, &p2, &db, 0));
    }

    #[test]
    fn test_hitbox_contact_uses_boxes() {
        let db = HitboxDb::builtin();
        let (mut p1, p2) = pair(100, 200);
        on_active_frame(&mut p1, AttackButton::R);
        assert!(attack_hits(&p1, &p2, &db, 0));

        let (mut p1, p2) = pair(100, 400);
        on_active_frame(&mut p1, AttackButton::R);
        assert!(!attack_hits(&p1, &p2, &db, 0));
    }

    #[test]
    fn test_hit_applies_damage_score_and_knockback() {
        let db = HitboxDb::builtin();
        let (mut p1, mut p2) = pair(100, 240);
        on_active_frame(&mut p1, AttackButton::Y);
        let mut events = Vec::new();
        let md = move_data(MoveKey::Medium(AttackButton::Y));
        let outcome = run(&db, &mut events, |ctx| deal_damage(&mut p1, &mut p2, md, false, ctx));

        assert_eq!(outcome, AttackOutcome::Hit { damage: 10 });
        assert_eq!(p2.health, 90);
        assert_eq!(p1.score, 200);
        assert_eq!(p2.tens_lost, 1);
        assert_eq!(p2.rect.x, 260);
        assert!(p2.is_hit);
        assert_eq!(p2.hitstun_until, 1260);
        assert!(events.contains(&MatchEvent::DamageTaken { defender: PlayerSlot::P2 }));
    }

    #[test]
    fn test_score_counts_thresholds_crossed() {
        let db = HitboxDb::builtin();
        let (mut p1, mut p2) = pair(100, 240);
        p2.health = 95;
        p2.tens_lost = 0;
        on_active_frame(&mut p1, AttackButton::E);
        let md = move_data(MoveKey::Medium(AttackButton::E));
        let mut events = Vec::new();
        run(&db, &mut events, |ctx| deal_damage(&mut p1, &mut p2, md, false, ctx));
        // 95 -> 87 crosses 90 once
        assert_eq!(p1.score, 200);
        assert_eq!(p2.tens_lost, 1);
    }

    #[test]
    fn test_standing_block_stops_high() {
        let db = HitboxDb::builtin();
        let (mut p1, mut p2) = pair(100, 240);
        on_active_frame(&mut p1, AttackButton::E);
        p2.is_blocking = true;
        p2.medium_state = GroundState::Block;
        let md = move_data(MoveKey::Medium(AttackButton::E));
        let mut events = Vec::new();
        let outcome = run(&db, &mut events, |ctx| deal_damage(&mut p1, &mut p2, md, false, ctx));

        assert_eq!(outcome, AttackOutcome::Blocked);
        assert_eq!(p2.health, MAX_HEALTH);
        assert_eq!(p2.blockstun_until, 1150);
        assert_eq!(p2.forced_block_until, 1150);
        assert_eq!(p2.rect.x, 248);
        assert!(matches!(events[0], MatchEvent::Block { .. }));
    }

    #[test]
    fn test_high_whiffs_over_crouch() {
        let db = HitboxDb::empty();
        let (mut p1, mut p2) = pair(100, 400);
        on_active_frame(&mut p1, AttackButton::E);
        p2.stance = Stance::Low;
        let md = move_data(MoveKey::Medium(AttackButton::E));
        let mut events = Vec::new();
        let outcome = run(&db, &mut events, |ctx| deal_damage(&mut p1, &mut p2, md, false, ctx));
        assert_eq!(outcome, AttackOutcome::Whiff);
        assert!(events.is_empty());
    }

    #[test]
    fn test_crouch_block_does_not_cover_high() {
        let mut f = Fighter::new(CharacterId::Nate, PlayerSlot::P1, 0, GROUND);
        f.stance = Stance::Low;
        assert!(!f.block_is_correct(Height::High));
        assert!(f.block_is_correct(Height::Mid));
        assert!(f.block_is_correct(Height::Low));
    }

    #[test]
    fn test_sweep_knocks_down_grounded_defender() {
        let db = HitboxDb::empty();
        let (mut p1, mut p2) = pair(100, 400);
        let md = move_data(MoveKey::LowR);
        let mut events = Vec::new();
        run(&db, &mut events, |ctx| deal_damage(&mut p1, &mut p2, md, false, ctx));
        assert_eq!(p2.knockdown_until, 1550);
        assert_eq!(p2.health, 89);
    }

    #[test]
    fn test_knockback_clamped_to_stage() {
        let db = HitboxDb::empty();
        let (mut p1, mut p2) = pair(400, 700);
        let md = move_data(MoveKey::Medium(AttackButton::Y));
        let mut events = Vec::new();
        run(&db, &mut events, |ctx| deal_damage(&mut p1, &mut p2, md, false, ctx));
        assert_eq!(p2.rect.x, WORLD_WIDTH - PLAYER_W);
    }

    #[test]
    fn test_pushboxes_split_overlap() {
        let db = HitboxDb::builtin();
        // Pushboxes at 110..190 local: p1 [210,290], p2 [260,340] -> overlap 30
        let (mut p1, mut p2) = pair(100, 150);
        resolve_pushboxes(&mut p1, &mut p2, &db, 0);
        assert_eq!(p1.rect.x, 85);
        assert_eq!(p2.rect.x, 165);
    }

    #[test]
    fn test_pushboxes_clamped_at_wall() {
        let db = HitboxDb::empty();
        let (mut p1, mut p2) = pair(0, 100);
        resolve_pushboxes(&mut p1, &mut p2, &db, 0);
        assert_eq!(p1.rect.x, 0);
        assert_eq!(p2.rect.x, 200);
    }
}
