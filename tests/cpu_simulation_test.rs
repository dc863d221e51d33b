//! Integration test: CPU opponent and the headless simulator
//!
//! The CPU must press the attack on a standing target in single-player mode,
//! and batches of CPU-vs-CPU matches must be reproducible from their seed.

use mkultra::combat::HitboxDb;
use mkultra::core::constants::MAX_HEALTH;
use mkultra::fighter::CharacterId;
use mkultra::game::{process_input, tick_match, GameMode, Match, MatchEvent, MatchInput};
use mkultra::input::ControlState;
use mkultra::simulator::{run_simulation, simulate_match, SimConfig};
use mkultra::stage::Stage;

// =============================================================================
// CPU opponent
// =============================================================================

#[test]
fn test_cpu_closes_in_and_damages_an_idle_player() {
    let mut m = Match::new(
        GameMode::Single,
        CharacterId::Nate,
        CharacterId::Blake,
        Stage::default_stage(),
        HitboxDb::builtin(),
        0.9,
        21,
    );
    process_input(&mut m, MatchInput::Skip);

    let mut events = Vec::new();
    for _ in 0..(20_000 / 16) {
        tick_match(&mut m, 16, ControlState::NONE, ControlState::NONE);
        events.extend(m.drain_events());
        if m.p1().health < MAX_HEALTH {
            break;
        }
    }

    assert!(m.p1().health < MAX_HEALTH);
    assert!(events.iter().any(|e| matches!(e, MatchEvent::Whoosh { .. })));
    assert!(events.iter().any(|e| matches!(e, MatchEvent::Hit { .. })));
}

// =============================================================================
// Simulator
// =============================================================================

fn config(num_matches: u32) -> SimConfig {
    SimConfig {
        num_matches,
        seed: 100,
        difficulty: 0.7,
        ..SimConfig::default()
    }
    .with_characters("connor", "blake")
    .unwrap()
}

#[test]
fn test_simulation_is_reproducible_from_seed() {
    let db = HitboxDb::builtin();
    let a = run_simulation(&config(3), &db);
    let b = run_simulation(&config(3), &db);
    assert_eq!(a.to_json(), b.to_json());
    assert_eq!(a.matches, 3);
    assert_eq!(a.p1_wins + a.p2_wins + a.draws + a.unfinished, 3);
    assert_eq!(a.total_rounds, a.ko_rounds + a.time_rounds + a.draw_rounds);
}

#[test]
fn test_batch_uses_consecutive_seeds() {
    let db = HitboxDb::builtin();
    let cfg = config(2);
    let report = run_simulation(&cfg, &db);

    let first = simulate_match(&cfg, &db, 100);
    let second = simulate_match(&cfg, &db, 101);
    assert_eq!(report.total_rounds, first.rounds + second.rounds);
    let dealt = (first.damage_dealt[0] + second.damage_dealt[0]) as f64 / 2.0;
    assert!((report.avg_damage[0] - dealt).abs() < 1e-9);
}

#[test]
fn test_json_report_names_the_matchup() {
    let report = run_simulation(&config(1), &HitboxDb::builtin());
    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(json["p1"], "connor");
    assert_eq!(json["p2"], "blake");
    assert_eq!(json["matches"], 1);
    assert_eq!(json["seed"], 100);
}
