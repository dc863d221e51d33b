//! Integration test: fighters trading blows through the match loop
//!
//! Drives `tick_match` with hand-built controls in two-player mode and checks
//! contact, blocking, whiffs, scoring and the events the sound board hears.

use mkultra::combat::HitboxDb;
use mkultra::core::constants::{MAX_HEALTH, SIM_STEP_MS};
use mkultra::fighter::{CharacterId, PlayerSlot, Stance};
use mkultra::game::{process_input, tick_match, GameMode, Match, MatchEvent, MatchInput};
use mkultra::input::ControlState;
use mkultra::stage::Stage;

fn versus() -> Match {
    let mut m = Match::new(
        GameMode::Double,
        CharacterId::Nate,
        CharacterId::Nate,
        Stage::default_stage(),
        HitboxDb::builtin(),
        0.5,
        1,
    );
    process_input(&mut m, MatchInput::Skip);
    m.drain_events();
    m
}

fn held(f: impl FnOnce(&mut ControlState)) -> ControlState {
    let mut c = ControlState::NONE;
    f(&mut c);
    c
}

fn step(m: &mut Match, p1: ControlState, p2: ControlState, frames: usize) {
    for _ in 0..frames {
        tick_match(m, SIM_STEP_MS, p1, p2);
    }
}

/// Walk P1 right until the bodies are just short of touching.
fn close_in(m: &mut Match, p2: ControlState) {
    let right = held(|c| c.right = true);
    for _ in 0..300 {
        if m.p2().rect.x - m.p1().rect.x <= 85 {
            break;
        }
        tick_match(m, SIM_STEP_MS, right, p2);
    }
    assert!(m.p2().rect.x - m.p1().rect.x <= 85, "fighters never met");
    // Settle into idle before attacking.
    step(m, ControlState::NONE, p2, 4);
    m.drain_events();
}

/// Tap an attack for one frame, then let the animation play out.
fn tap(m: &mut Match, attack: ControlState, p2: ControlState) {
    step(m, attack, p2, 1);
    step(m, ControlState::NONE, p2, 60);
}

// =============================================================================
// Contact
// =============================================================================

#[test]
fn test_walk_in_and_jab_lands() {
    let mut m = versus();
    close_in(&mut m, ControlState::NONE);

    tap(&mut m, held(|c| c.r = true), ControlState::NONE);

    assert_eq!(m.p2().health, MAX_HEALTH - 4);
    let events = m.drain_events();
    assert!(events.contains(&MatchEvent::Whoosh {
        attacker: PlayerSlot::P1
    }));
    assert!(events.contains(&MatchEvent::Hit {
        attacker: PlayerSlot::P1,
        defender: PlayerSlot::P2,
        damage: 4
    }));
    assert!(events.contains(&MatchEvent::DamageTaken {
        defender: PlayerSlot::P2
    }));
}

#[test]
fn test_jab_from_across_the_stage_whiffs() {
    let mut m = versus();
    tap(&mut m, held(|c| c.r = true), ControlState::NONE);
    assert_eq!(m.p2().health, MAX_HEALTH);
    let events = m.drain_events();
    assert!(events.contains(&MatchEvent::Whoosh {
        attacker: PlayerSlot::P1
    }));
    assert!(!events.iter().any(|e| matches!(e, MatchEvent::Hit { .. })));
}

#[test]
fn test_score_counts_every_ten_health() {
    let mut m = versus();
    close_in(&mut m, ControlState::NONE);

    // Three jabs: 12 damage crosses one ten-health mark.
    for _ in 0..3 {
        close_in(&mut m, ControlState::NONE);
        tap(&mut m, held(|c| c.r = true), ControlState::NONE);
    }
    assert_eq!(m.p2().health, MAX_HEALTH - 12);
    assert_eq!(m.p1().score, 200);
    assert_eq!(m.p2().score, 0);
}

// =============================================================================
// Defence
// =============================================================================

#[test]
fn test_standing_block_stops_mid_attack() {
    let mut m = versus();
    let block = held(|c| c.block = true);
    close_in(&mut m, block);
    assert!(m.p2().is_blocking);

    let before = m.p2().rect.x;
    tap(&mut m, held(|c| c.r = true), block);

    assert_eq!(m.p2().health, MAX_HEALTH);
    assert!(m.p2().rect.x > before, "blocked hit still pushes back");
    assert!(m.drain_events().contains(&MatchEvent::Block {
        attacker: PlayerSlot::P1,
        defender: PlayerSlot::P2
    }));
}

#[test]
fn test_high_attack_passes_over_a_crouch() {
    let mut m = versus();
    let crouch = held(|c| c.crouch = true);
    close_in(&mut m, crouch);
    assert_eq!(m.p2().stance, Stance::Low);

    tap(&mut m, held(|c| c.e = true), crouch);

    assert_eq!(m.p2().health, MAX_HEALTH);
    assert!(!m
        .drain_events()
        .iter()
        .any(|e| matches!(e, MatchEvent::Hit { .. } | MatchEvent::Block { .. })));
}
