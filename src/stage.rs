//! Stages: where the floor is, and which stages the select screen offers.

use crate::core::constants::DEFAULT_GROUND_Y;
use crate::error::{GameError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_STAGE: &str = "MirabookaBusStation2";

/// Stage select shows a 2x2 grid.
pub const STAGE_SELECT_COLS: usize = 2;
pub const STAGE_SELECT_MAX: usize = 4;

const STAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Stages with a tuned floor line. Anything else stands on the default.
const KNOWN_STAGES: [(&str, i32); 3] = [
    ("ThePit", 550),
    ("MirabookaBusStation", DEFAULT_GROUND_Y),
    ("BusStation", 560),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub name: String,
    /// Walkway line where fighters' feet land.
    pub ground_y: i32,
    /// Background image, when discovered on disk.
    pub image: Option<PathBuf>,
}

impl Stage {
    /// Stage with the floor line for `name` (default floor for unknown names).
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ground_y: ground_y_for(name),
            image: None,
        }
    }

    /// A built-in stage by name (case-insensitive), or the default stage name.
    pub fn from_name(name: &str) -> Result<Self> {
        if name.eq_ignore_ascii_case(DEFAULT_STAGE) {
            return Ok(Self::named(DEFAULT_STAGE));
        }
        KNOWN_STAGES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(known, _)| Self::named(known))
            .ok_or_else(|| GameError::UnknownStage(name.to_string()))
    }

    pub fn default_stage() -> Self {
        Self::named(DEFAULT_STAGE)
    }

    /// Built-in stages in select-screen order.
    pub fn builtin_list() -> Vec<Stage> {
        KNOWN_STAGES
            .iter()
            .map(|(name, _)| Self::named(name))
            .chain(std::iter::once(Self::default_stage()))
            .collect()
    }
}

pub fn ground_y_for(name: &str) -> i32 {
    KNOWN_STAGES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|&(_, y)| y)
        .unwrap_or(DEFAULT_GROUND_Y)
}

/// Stage images in `dir`, sorted case-insensitively by name.
pub fn scan_stage_dir(dir: &Path) -> Vec<Stage> {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "stage directory not readable");
        return Vec::new();
    };

    let mut stages: Vec<Stage> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| STAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?.to_string();
            Some(Stage {
                ground_y: ground_y_for(&stem),
                name: stem,
                image: Some(path),
            })
        })
        .collect();

    stages.sort_by_key(|s| s.name.to_lowercase());
    stages
}

/// Stages for the select screen: discovered images, else the built-in list,
/// capped to the grid size.
pub fn discover_stages(dir: &Path) -> Vec<Stage> {
    let mut stages = scan_stage_dir(dir);
    if stages.is_empty() {
        stages = Stage::builtin_list();
    }
    stages.truncate(STAGE_SELECT_MAX);
    tracing::info!(count = stages.len(), "stages available");
    stages
}

/// Move the stage-select cursor inside a 2x2 grid of `count` entries.
pub fn move_stage_cursor(index: usize, dx: i32, dy: i32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let cols = STAGE_SELECT_COLS as i32;
    let col = (index as i32 % cols + dx).clamp(0, cols - 1);
    let row = (index as i32 / cols + dy).max(0);
    let next = (row * cols + col) as usize;
    if next < count {
        next
    } else {
        index.min(count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ground_lines() {
        assert_eq!(Stage::named("ThePit").ground_y, 550);
        assert_eq!(Stage::named("BusStation").ground_y, 560);
        assert_eq!(Stage::named("MirabookaBusStation").ground_y, 520);
        assert_eq!(Stage::default_stage().ground_y, 520);
        assert_eq!(Stage::named("Somewhere").ground_y, DEFAULT_GROUND_Y);
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(Stage::from_name("thepit").unwrap().name, "ThePit");
        assert_eq!(Stage::from_name("mirabookabusstation2").unwrap().name, DEFAULT_STAGE);
        assert!(matches!(Stage::from_name("moon"), Err(GameError::UnknownStage(_))));
    }

    #[test]
    fn test_missing_dir_falls_back_to_builtin() {
        let stages = discover_stages(Path::new("/definitely/not/a/stage/dir"));
        assert_eq!(stages.len(), 4);
        assert_eq!(stages[0].name, "ThePit");
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = std::env::temp_dir().join(format!("mkultra_stages_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for name in ["zeta.PNG", "Alpha.jpg", "busStation.gif", "notes.txt", "mid.jpeg", "extra.png"] {
            fs::write(dir.join(name), b"x").unwrap();
        }

        let all = scan_stage_dir(&dir);
        let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "busStation", "extra", "mid", "zeta"]);

        let offered = discover_stages(&dir);
        assert_eq!(offered.len(), STAGE_SELECT_MAX);
        assert!(offered[0].image.is_some());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_stage_cursor_grid() {
        assert_eq!(move_stage_cursor(0, 1, 0, 4), 1);
        assert_eq!(move_stage_cursor(1, 1, 0, 4), 1);
        assert_eq!(move_stage_cursor(1, 0, 1, 4), 3);
        assert_eq!(move_stage_cursor(2, 0, 1, 4), 2);
        assert_eq!(move_stage_cursor(0, 0, 1, 3), 2);
        assert_eq!(move_stage_cursor(1, 0, 1, 3), 1);
    }
}
