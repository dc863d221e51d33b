//! Game configuration.
//!
//! Read from `~/.mkultra/config.json` when present, then overridden by
//! `MKULTRA_*` environment variables (a `.env` file is loaded first by the
//! binaries).

use crate::error::{GameError, Result};
use crate::input::KeyBindings;
use crate::stage::DEFAULT_STAGE;
use crate::utils::persistence::{data_path, load_json_or_default};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Hitbox database read at startup and written by the editor.
    pub hitbox_path: PathBuf,
    /// Folder scanned for stage images.
    pub stages_dir: PathBuf,
    /// Sound root; `None` looks for `./sounds`.
    pub sound_dir: Option<PathBuf>,
    /// Starting CPU difficulty in `[0, 1]`.
    pub difficulty: f64,
    pub default_stage: String,
    /// Ring the terminal bell when an attack connects.
    pub bell_on_hit: bool,
    pub p1_keys: KeyBindings,
    pub p2_keys: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hitbox_path: PathBuf::from("hitboxes_nate.json"),
            stages_dir: PathBuf::from("stages"),
            sound_dir: None,
            difficulty: 0.5,
            default_stage: DEFAULT_STAGE.to_string(),
            bell_on_hit: false,
            p1_keys: KeyBindings::player_one(),
            p2_keys: KeyBindings::player_two(),
        }
    }
}

impl GameConfig {
    /// Load the config file (defaults if missing or invalid), then apply
    /// environment overrides.
    pub fn load_or_default() -> Self {
        let mut config: GameConfig = match data_path(CONFIG_FILE) {
            Ok(path) => load_json_or_default(&path),
            Err(e) => {
                tracing::warn!(error = %e, "no config directory, using defaults");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Apply `MKULTRA_*` overrides from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("MKULTRA_HITBOX_PATH") {
            self.hitbox_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("MKULTRA_STAGES_DIR") {
            self.stages_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("MKULTRA_SOUND_DIR") {
            self.sound_dir = Some(PathBuf::from(dir));
        }

        if let Some(raw) = lookup("MKULTRA_DIFFICULTY") {
            match raw.parse::<f64>() {
                Ok(d) if (0.0..=1.0).contains(&d) => self.difficulty = d,
                Ok(_) => tracing::warn!("MKULTRA_DIFFICULTY must be 0.0-1.0, using {}", self.difficulty),
                Err(_) => tracing::warn!("Invalid MKULTRA_DIFFICULTY '{}', using {}", raw, self.difficulty),
            }
        }

        if let Some(stage) = lookup("MKULTRA_STAGE") {
            if stage.trim().is_empty() {
                tracing::warn!("MKULTRA_STAGE is empty, using {}", self.default_stage);
            } else {
                self.default_stage = stage.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.difficulty) {
            return Err(GameError::Config(format!(
                "difficulty {} is outside 0.0-1.0",
                self.difficulty
            )));
        }
        if self.hitbox_path.as_os_str().is_empty() {
            return Err(GameError::Config("hitbox_path cannot be empty".to_string()));
        }
        for (label, keys) in [("p1_keys", &self.p1_keys), ("p2_keys", &self.p2_keys)] {
            if let Some(key) = keys.duplicate_key() {
                return Err(GameError::Config(format!("{label} binds {} twice", key.label())));
            }
        }
        if let Some(shared) = self.p1_keys.all().iter().find(|k| self.p2_keys.all().contains(k)) {
            return Err(GameError::Config(format!(
                "{} is bound for both players",
                shared.label()
            )));
        }
        Ok(())
    }
}
