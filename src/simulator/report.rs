//! Simulation report generation.

use super::config::SimConfig;
use super::runner::MatchStats;
use crate::fighter::{CharacterId, PlayerSlot};
use crate::game::slot_index;

/// Aggregated results from a batch of simulated matches.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub p1: CharacterId,
    pub p2: CharacterId,
    pub stage: String,
    pub difficulty: f64,
    pub seed: u64,

    pub matches: u32,
    pub p1_wins: u32,
    pub p2_wins: u32,
    pub draws: u32,
    /// Matches that hit the step cap.
    pub unfinished: u32,

    pub total_rounds: u32,
    pub ko_rounds: u32,
    pub time_rounds: u32,
    pub draw_rounds: u32,

    /// Average damage dealt per match by P1 and P2.
    pub avg_damage: [f64; 2],
    pub avg_rounds_per_match: f64,
    pub avg_match_seconds: f64,
}

impl SimReport {
    pub fn from_matches(config: &SimConfig, matches: &[MatchStats]) -> Self {
        let count = matches.len() as u32;
        let denom = f64::from(count.max(1));
        let wins_for = |slot: PlayerSlot| {
            matches
                .iter()
                .filter(|m| m.finished && m.winner == Some(slot))
                .count() as u32
        };
        let sum = |f: fn(&MatchStats) -> u32| matches.iter().map(f).sum::<u32>();
        let avg_damage_for = |slot: PlayerSlot| {
            matches
                .iter()
                .map(|m| m.damage_dealt[slot_index(slot)] as f64)
                .sum::<f64>()
                / denom
        };

        let total_rounds = sum(|m| m.rounds);
        let total_steps: u64 = matches.iter().map(|m| m.steps).sum();

        Self {
            p1: config.p1,
            p2: config.p2,
            stage: config.stage.name.clone(),
            difficulty: config.difficulty,
            seed: config.seed,
            matches: count,
            p1_wins: wins_for(PlayerSlot::P1),
            p2_wins: wins_for(PlayerSlot::P2),
            draws: matches.iter().filter(|m| m.finished && m.winner.is_none()).count() as u32,
            unfinished: matches.iter().filter(|m| !m.finished).count() as u32,
            total_rounds,
            ko_rounds: sum(|m| m.ko_rounds),
            time_rounds: sum(|m| m.time_rounds),
            draw_rounds: sum(|m| m.draw_rounds),
            avg_damage: [avg_damage_for(PlayerSlot::P1), avg_damage_for(PlayerSlot::P2)],
            avg_rounds_per_match: f64::from(total_rounds) / denom,
            avg_match_seconds: total_steps as f64 * crate::core::constants::SIM_STEP_MS as f64
                / 1000.0
                / denom,
        }
    }

    fn pct(&self, n: u32) -> f64 {
        f64::from(n) / f64::from(self.matches.max(1)) * 100.0
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "{} (P1) vs {} (P2) on {}, difficulty {:.2}, seed {}\n",
            self.p1.display_name(),
            self.p2.display_name(),
            self.stage,
            self.difficulty,
            self.seed
        ));
        report.push_str(&format!("Matches: {}\n\n", self.matches));

        report.push_str("── RESULTS ──────────────────────────────────────────────────────\n");
        for (label, n) in [
            ("P1 wins", self.p1_wins),
            ("P2 wins", self.p2_wins),
            ("Draws", self.draws),
            ("Unfinished", self.unfinished),
        ] {
            let pct = self.pct(n);
            let bar = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  {:<11} {:>5} {:>5.1}% {}\n", label, n, pct, bar));
        }
        report.push('\n');

        report.push_str("── ROUNDS ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Total rounds:      {}\n", self.total_rounds));
        report.push_str(&format!("  KO:                {}\n", self.ko_rounds));
        report.push_str(&format!("  Time over:         {}\n", self.time_rounds));
        report.push_str(&format!("  Draw:              {}\n", self.draw_rounds));
        report.push_str(&format!(
            "  Avg rounds/match:  {:.2}\n",
            self.avg_rounds_per_match
        ));
        report.push_str(&format!(
            "  Avg match length:  {:.1}s\n\n",
            self.avg_match_seconds
        ));

        report.push_str("── DAMAGE ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg P1 damage:     {:.1}\n", self.avg_damage[0]));
        report.push_str(&format!("  Avg P2 damage:     {:.1}\n", self.avg_damage[1]));

        if self.unfinished > 0 {
            report.push_str(&format!(
                "\n  ⚠️  {} match(es) hit the step cap\n",
                self.unfinished
            ));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl serde::Serialize for SimReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("SimReport", 18)?;
        state.serialize_field("p1", &self.p1)?;
        state.serialize_field("p2", &self.p2)?;
        state.serialize_field("stage", &self.stage)?;
        state.serialize_field("difficulty", &self.difficulty)?;
        state.serialize_field("seed", &self.seed)?;
        state.serialize_field("matches", &self.matches)?;
        state.serialize_field("p1_wins", &self.p1_wins)?;
        state.serialize_field("p2_wins", &self.p2_wins)?;
        state.serialize_field("draws", &self.draws)?;
        state.serialize_field("unfinished", &self.unfinished)?;
        state.serialize_field("total_rounds", &self.total_rounds)?;
        state.serialize_field("ko_rounds", &self.ko_rounds)?;
        state.serialize_field("time_rounds", &self.time_rounds)?;
        state.serialize_field("draw_rounds", &self.draw_rounds)?;
        state.serialize_field("avg_p1_damage", &self.avg_damage[0])?;
        state.serialize_field("avg_p2_damage", &self.avg_damage[1])?;
        state.serialize_field("avg_rounds_per_match", &self.avg_rounds_per_match)?;
        state.serialize_field("p1_win_rate", &self.pct(self.p1_wins))?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(winner: Option<PlayerSlot>, finished: bool, damage: [i64; 2]) -> MatchStats {
        MatchStats {
            winner,
            rounds: 2,
            ko_rounds: 1,
            time_rounds: 1,
            draw_rounds: 0,
            damage_dealt: damage,
            steps: 6250,
            finished,
        }
    }

    #[test]
    fn test_report_generation() {
        let matches = vec![
            stats(Some(PlayerSlot::P1), true, [200, 40]),
            stats(Some(PlayerSlot::P2), true, [100, 200]),
            stats(None, true, [0, 0]),
            stats(None, false, [60, 60]),
        ];
        let report = SimReport::from_matches(&SimConfig::default(), &matches);
        assert_eq!(report.matches, 4);
        assert_eq!(report.p1_wins, 1);
        assert_eq!(report.p2_wins, 1);
        assert_eq!(report.draws, 1);
        assert_eq!(report.unfinished, 1);
        assert_eq!(report.total_rounds, 8);
        assert_eq!(report.ko_rounds, 4);
        assert!((report.avg_damage[0] - 90.0).abs() < 1e-9);
        assert!((report.avg_damage[1] - 75.0).abs() < 1e-9);
        // 6250 steps of 16 ms.
        assert!((report.avg_match_seconds - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_and_json_output() {
        let matches = vec![stats(Some(PlayerSlot::P1), true, [200, 40])];
        let report = SimReport::from_matches(&SimConfig::default(), &matches);

        let text = report.to_text();
        assert!(text.contains("Nate (P1) vs Scorpion (P2)"));
        assert!(text.contains("P1 wins"));
        assert!(!text.contains("step cap"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["p1"], "nate");
        assert_eq!(json["p1_wins"], 1);
        assert_eq!(json["p1_win_rate"], 100.0);
    }
}
