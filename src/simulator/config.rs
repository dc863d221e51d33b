//! Simulation configuration.

use crate::error::{GameError, Result};
use crate::fighter::CharacterId;
use crate::stage::Stage;

/// Configuration for a batch of CPU-vs-CPU matches.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of matches to play
    pub num_matches: u32,

    /// Base seed; match `i` uses `seed + i`
    pub seed: u64,

    /// Difficulty slider shared by both CPUs
    pub difficulty: f64,

    pub p1: CharacterId,
    pub p2: CharacterId,
    pub stage: Stage,

    /// Step cap per match before it is abandoned
    pub max_steps_per_match: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_matches: 100,
            seed: 42,
            difficulty: 0.5,
            p1: CharacterId::Nate,
            p2: CharacterId::Scorpion,
            stage: Stage::default_stage(),
            // Three full-length rounds plus intros and round-over pauses fit well inside this.
            max_steps_per_match: 30_000,
        }
    }
}

impl SimConfig {
    pub fn with_characters(mut self, p1: &str, p2: &str) -> Result<Self> {
        self.p1 = CharacterId::from_name(p1).ok_or_else(|| GameError::UnknownCharacter(p1.to_string()))?;
        self.p2 = CharacterId::from_name(p2).ok_or_else(|| GameError::UnknownCharacter(p2.to_string()))?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_matches == 0 {
            return Err(GameError::Config("--matches must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.difficulty) {
            return Err(GameError::Config(format!(
                "difficulty {} is outside 0.0..=1.0",
                self.difficulty
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_characters_accepts_any_case() {
        let config = SimConfig::default().with_characters("BLAKE", "connor").unwrap();
        assert_eq!(config.p1, CharacterId::Blake);
        assert_eq!(config.p2, CharacterId::Connor);
    }

    #[test]
    fn test_unknown_character_is_an_error() {
        let err = SimConfig::default().with_characters("nate", "goro").unwrap_err();
        assert!(matches!(err, GameError::UnknownCharacter(name) if name == "goro"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SimConfig::default().validate().is_ok());
        let zero = SimConfig {
            num_matches: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
        let hard = SimConfig {
            difficulty: 1.5,
            ..Default::default()
        };
        assert!(hard.validate().is_err());
    }
}
