//! Headless CPU-vs-CPU matches on the same `tick_match` the game uses.
//!
//! Both fighters are driven by their own `NpcController`; the match itself
//! runs in two-player mode so neither side gets the built-in CPU.

use super::config::SimConfig;
use super::report::SimReport;
use crate::ai::{NpcController, NpcView};
use crate::combat::HitboxDb;
use crate::core::constants::SIM_STEP_MS;
use crate::fighter::PlayerSlot;
use crate::game::{
    process_input, slot_index, tick_match, GameMode, Match, MatchEvent, MatchInput, MatchPhase,
    RoundEndReason,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Outcome of one simulated match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchStats {
    pub winner: Option<PlayerSlot>,
    pub rounds: u32,
    pub ko_rounds: u32,
    pub time_rounds: u32,
    pub draw_rounds: u32,
    /// Damage dealt by P1 and P2.
    pub damage_dealt: [i64; 2],
    pub steps: u64,
    /// False when the step cap ran out first.
    pub finished: bool,
}

impl MatchStats {
    fn record(&mut self, event: &MatchEvent) {
        match *event {
            MatchEvent::Hit {
                attacker, damage, ..
            } => {
                self.damage_dealt[slot_index(attacker)] += i64::from(damage);
            }
            MatchEvent::RoundEnd { reason, .. } => {
                self.rounds += 1;
                match reason {
                    RoundEndReason::Ko => self.ko_rounds += 1,
                    RoundEndReason::Time => self.time_rounds += 1,
                    RoundEndReason::Draw => self.draw_rounds += 1,
                }
            }
            MatchEvent::MatchEnd { winner } => {
                self.winner = winner;
                self.finished = true;
            }
            _ => {}
        }
    }
}

fn view_for(m: &Match) -> NpcView {
    NpcView {
        now_ms: m.clock_ms,
        round: m.round,
        p1_wins: m.wins[0],
        p2_wins: m.wins[1],
        fighting: m.phase == MatchPhase::Fighting,
    }
}

/// Play one match to completion (or the step cap).
pub fn simulate_match(config: &SimConfig, hitboxes: &HitboxDb, seed: u64) -> MatchStats {
    let mut m = Match::new(
        GameMode::Double,
        config.p1,
        config.p2,
        config.stage.clone(),
        hitboxes.clone(),
        config.difficulty,
        seed,
    );
    // Separate stream so CPU decisions never shift the match's own rolls.
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5EED_CAFE);
    let mut p1_cpu = NpcController::new(config.difficulty);
    let mut p2_cpu = NpcController::new(config.difficulty);
    let mut stats = MatchStats::default();

    process_input(&mut m, MatchInput::Skip);

    while stats.steps < config.max_steps_per_match {
        let view = view_for(&m);
        let p1 = p1_cpu.controls(m.p1(), m.p2(), view, &mut rng);
        let p2 = p2_cpu.controls(m.p2(), m.p1(), view, &mut rng);
        tick_match(&mut m, SIM_STEP_MS, p1, p2);
        stats.steps += 1;

        for event in m.drain_events() {
            stats.record(&event);
        }
        if m.phase == MatchPhase::MatchOver {
            break;
        }
    }

    if !stats.finished {
        tracing::warn!(seed, steps = stats.steps, "match hit the step cap");
    }
    tracing::debug!(
        seed,
        winner = stats.winner.map(PlayerSlot::label).unwrap_or("none"),
        rounds = stats.rounds,
        "match simulated"
    );
    stats
}

/// Run every match in the batch and aggregate a report.
pub fn run_simulation(config: &SimConfig, hitboxes: &HitboxDb) -> SimReport {
    let matches: Vec<MatchStats> = (0..config.num_matches)
        .map(|i| simulate_match(config, hitboxes, config.seed.wrapping_add(u64::from(i))))
        .collect();
    SimReport::from_matches(config, &matches)
}
