//! Per-animation-frame push/hurt/hit boxes.
//!
//! File layout (one object per fighter name, then animation key, then the
//! frame index as a string):
//!
//! ```json
//! { "nate": { "med_idle": { "0": {
//!     "push": [110, 40, 80, 320],
//!     "hurt": [[105, 30, 90, 330]],
//!     "hit": []
//! } } } }
//! ```
//!
//! Boxes are stored facing right in fighter-local coordinates and mirrored
//! at lookup time when the fighter faces left.

use crate::core::geometry::{local_to_world, BoxRect, Rect};
use crate::error::Result;
use crate::fighter::moves::{active_frame_index, AttackButton, MoveKey};
use crate::fighter::roster::CharacterId;
use crate::fighter::Fighter;
use crate::utils::persistence::{load_json, save_json};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Boxes for a single animation frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameBoxes {
    #[serde(default)]
    pub push: Option<BoxRect>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hurt: Vec<BoxRect>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hit: Vec<BoxRect>,
}

impl FrameBoxes {
    pub fn is_empty(&self) -> bool {
        self.push.is_none() && self.hurt.is_empty() && self.hit.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<BoxRect>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<BoxRect>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Frame index (as string) -> boxes.
pub type FrameTable = BTreeMap<String, FrameBoxes>;
/// Animation key -> frames.
pub type AnimTable = BTreeMap<String, FrameTable>;

/// World-space boxes for a fighter's current frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldBoxes {
    pub push: Option<Rect>,
    pub hurt: Vec<Rect>,
    pub hit: Vec<Rect>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitboxDb {
    fighters: BTreeMap<String, AnimTable>,
}

impl HitboxDb {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a hitbox file layered over the built-in boxes.
    ///
    /// Animations present in the file replace the built-in ones. A missing
    /// file yields the built-in boxes; an unreadable one is logged and ignored.
    pub fn load(path: &Path) -> Self {
        let mut db = Self::builtin();
        if !path.is_file() {
            tracing::info!(path = %path.display(), "no hitbox file, using built-in boxes");
            return db;
        }
        match load_json::<HitboxDb>(path) {
            Ok(file) => {
                tracing::info!(path = %path.display(), fighters = file.fighters.len(), "loaded hitbox file");
                db.overlay(file);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid hitbox file, using built-in boxes");
            }
        }
        db
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(path, self)?;
        tracing::info!(path = %path.display(), "saved hitbox file");
        Ok(())
    }

    /// Replace whole animations with the ones in `other`.
    pub fn overlay(&mut self, other: HitboxDb) {
        for (name, anims) in other.fighters {
            let entry = self.fighters.entry(name).or_default();
            for (anim_key, frames) in anims {
                entry.insert(anim_key, frames);
            }
        }
    }

    pub fn fighter_names(&self) -> impl Iterator<Item = &str> {
        self.fighters.keys().map(String::as_str)
    }

    pub fn anim(&self, name: &str, anim_key: &str) -> Option<&FrameTable> {
        self.fighters.get(name)?.get(anim_key)
    }

    /// Exact frame entry, without fallbacks.
    pub fn frame(&self, name: &str, anim_key: &str, frame: usize) -> Option<&FrameBoxes> {
        self.anim(name, anim_key)?.get(&frame.to_string())
    }

    /// Local boxes for a frame, with fallbacks:
    /// exact frame, else frame "0", else the nearest frame below, else the smallest.
    /// Crouch-walk frames borrow the crouch-idle pushbox.
    pub fn local_boxes(&self, name: &str, anim_key: &str, frame: usize) -> FrameBoxes {
        let Some(table) = self.anim(name, anim_key) else {
            return FrameBoxes::default();
        };
        let Some(found) = lookup_frame(table, frame) else {
            return FrameBoxes::default();
        };
        let mut boxes = found.clone();

        if anim_key == "low_move" {
            if let Some(idle_push) = self.anim(name, "low_idle").and_then(first_frame).and_then(|f| f.push) {
                boxes.push = Some(idle_push);
            }
        }
        boxes
    }

    pub fn world_boxes(&self, fighter: &Fighter, now_ms: u64) -> WorldBoxes {
        let (anim_key, frame) = fighter.current_frame_info(now_ms);
        let local = self.local_boxes(fighter.name(), anim_key, frame);
        let flip = fighter.flip();
        WorldBoxes {
            push: local.push.map(|b| local_to_world(b, &fighter.rect, flip)),
            hurt: local
                .hurt
                .iter()
                .map(|b| local_to_world(*b, &fighter.rect, flip))
                .collect(),
            hit: local
                .hit
                .iter()
                .map(|b| local_to_world(*b, &fighter.rect, flip))
                .collect(),
        }
    }

    /// Exact frame entry, created empty if missing.
    pub fn ensure_entry(&mut self, name: &str, anim_key: &str, frame: usize) -> &mut FrameBoxes {
        self.fighters
            .entry(name.to_string())
            .or_default()
            .entry(anim_key.to_string())
            .or_default()
            .entry(frame.to_string())
            .or_default()
    }

    /// Copy the previous frame's boxes into `frame` if it has none.
    ///
    /// Returns true when something was copied.
    pub fn copy_prev_frame(&mut self, name: &str, anim_key: &str, frame: usize) -> bool {
        if frame == 0 {
            return false;
        }
        let prev = self.ensure_entry(name, anim_key, frame - 1).clone();
        let cur = self.ensure_entry(name, anim_key, frame);
        if !cur.is_empty() {
            return false;
        }
        *cur = prev;
        true
    }

    /// Default boxes for every character, so fights work without an authored file.
    pub fn builtin() -> Self {
        let mut db = Self::empty();
        for character in CharacterId::ALL {
            let sheet = character.sheet();
            let name = character.name();

            let standing = FrameBoxes {
                push: Some(STAND_PUSH),
                hurt: vec![STAND_HURT],
                hit: vec![],
            };
            let crouching = FrameBoxes {
                push: Some(CROUCH_PUSH),
                hurt: vec![CROUCH_HURT],
                hit: vec![],
            };
            let airborne = FrameBoxes {
                push: Some(AIR_PUSH),
                hurt: vec![AIR_HURT],
                hit: vec![],
            };
            let prone = FrameBoxes {
                push: Some(PRONE_PUSH),
                hurt: vec![PRONE_HURT],
                hit: vec![],
            };

            for key in [
                "med_idle",
                "med_move_fwd",
                "med_move_back",
                "med_block",
                "med_hit",
                "end_win",
                "end_lose",
            ] {
                db.set_frame(name, key, 0, standing.clone());
            }
            for key in ["low_idle", "low_move", "low_block", "low_hit"] {
                db.set_frame(name, key, 0, crouching.clone());
            }
            for key in ["high_move", "high_hit"] {
                db.set_frame(name, key, 0, airborne.clone());
            }
            db.set_frame(name, "high_knockdown", 0, prone);

            let medium_attacks = [
                (AttackButton::R, "med_attack_r", sheet.medium_attack_r, JAB_HIT),
                (AttackButton::E, "med_attack_e", sheet.medium_attack_e, HIGH_PUNCH_HIT),
                (AttackButton::T, "med_attack_t", sheet.medium_attack_t, BODY_HIT),
                (AttackButton::Y, "med_attack_y", sheet.medium_attack_y, HIGH_KICK_HIT),
            ];
            for (button, key, frames, hit) in medium_attacks {
                db.set_attack(name, key, &standing, active_frame_index(MoveKey::Medium(button), frames), hit);
            }
            db.set_attack(
                name,
                "low_attack_r",
                &crouching,
                active_frame_index(MoveKey::LowR, sheet.low_attack_r),
                SWEEP_HIT,
            );
            db.set_attack(
                name,
                "high_attack",
                &airborne,
                active_frame_index(MoveKey::Air, sheet.high_attack),
                AIR_HIT,
            );
        }
        db
    }

    fn set_frame(&mut self, name: &str, anim_key: &str, frame: usize, boxes: FrameBoxes) {
        *self.ensure_entry(name, anim_key, frame) = boxes;
    }

    fn set_attack(&mut self, name: &str, anim_key: &str, body: &FrameBoxes, active: usize, hit: BoxRect) {
        self.set_frame(name, anim_key, 0, body.clone());
        let mut active_boxes = body.clone();
        active_boxes.hit.push(hit);
        self.set_frame(name, anim_key, active, active_boxes);
    }
}

fn numeric_keys(table: &FrameTable) -> Vec<usize> {
    let mut keys: Vec<usize> = table.keys().filter_map(|k| k.parse().ok()).collect();
    keys.sort_unstable();
    keys
}

fn lookup_frame(table: &FrameTable, frame: usize) -> Option<&FrameBoxes> {
    if let Some(f) = table.get(&frame.to_string()) {
        return Some(f);
    }
    if let Some(f) = table.get("0") {
        return Some(f);
    }
    let keys = numeric_keys(table);
    let nearest = keys
        .iter()
        .copied()
        .filter(|&k| k <= frame)
        .max()
        .or_else(|| keys.first().copied())?;
    table.get(&nearest.to_string())
}

fn first_frame(table: &FrameTable) -> Option<&FrameBoxes> {
    if let Some(f) = table.get("0") {
        return Some(f);
    }
    let keys = numeric_keys(table);
    table.get(&keys.first()?.to_string())
}

// Built-in box templates (local, facing right, body 300x360)
const STAND_PUSH: BoxRect = [110, 40, 80, 320];
const STAND_HURT: BoxRect = [105, 30, 90, 330];
const CROUCH_PUSH: BoxRect = [110, 150, 80, 210];
const CROUCH_HURT: BoxRect = [100, 150, 100, 210];
const AIR_PUSH: BoxRect = [110, 60, 80, 220];
const AIR_HURT: BoxRect = [100, 60, 100, 220];
const PRONE_PUSH: BoxRect = [60, 280, 180, 80];
const PRONE_HURT: BoxRect = [60, 270, 200, 90];

const JAB_HIT: BoxRect = [180, 100, 70, 60];
const HIGH_PUNCH_HIT: BoxRect = [185, 40, 85, 60];
const BODY_HIT: BoxRect = [180, 110, 90, 70];
const HIGH_KICK_HIT: BoxRect = [190, 30, 95, 70];
const SWEEP_HIT: BoxRect = [170, 300, 120, 50];
const AIR_HIT: BoxRect = [170, 150, 110, 120];

#[cfg(test)]
mod tests {
    use super::*;

    fn table(frames: &[(usize, BoxRect)]) -> HitboxDb {
        let mut db = HitboxDb::empty();
        for &(frame, push) in frames {
            db.ensure_entry("nate", "med_idle", frame).push = Some(push);
        }
        db
    }

    #[test]
    fn test_exact_frame_wins() {
        let db = table(&[(0, [0, 0, 1, 1]), (3, [3, 3, 3, 3])]);
        assert_eq!(db.local_boxes("nate", "med_idle", 3).push, Some([3, 3, 3, 3]));
    }

    #[test]
    fn test_frame_zero_fallback() {
        let db = table(&[(0, [0, 0, 1, 1]), (3, [3, 3, 3, 3])]);
        assert_eq!(db.local_boxes("nate", "med_idle", 5).push, Some([0, 0, 1, 1]));
    }

    #[test]
    fn test_nearest_below_then_smallest() {
        let db = table(&[(2, [2, 2, 2, 2]), (6, [6, 6, 6, 6])]);
        assert_eq!(db.local_boxes("nate", "med_idle", 5).push, Some([2, 2, 2, 2]));
        assert_eq!(db.local_boxes("nate", "med_idle", 9).push, Some([6, 6, 6, 6]));
        assert_eq!(db.local_boxes("nate", "med_idle", 1).push, Some([2, 2, 2, 2]));
    }

    #[test]
    fn test_missing_anim_is_empty() {
        let db = HitboxDb::empty();
        assert!(db.local_boxes("nate", "med_idle", 0).is_empty());
    }

    #[test]
    fn test_low_move_uses_low_idle_push() {
        let mut db = HitboxDb::empty();
        db.ensure_entry("nate", "low_idle", 0).push = Some([1, 2, 3, 4]);
        let walk = db.ensure_entry("nate", "low_move", 0);
        walk.push = Some([9, 9, 9, 9]);
        walk.hurt = vec![[5, 5, 5, 5]];
        let boxes = db.local_boxes("nate", "low_move", 0);
        assert_eq!(boxes.push, Some([1, 2, 3, 4]));
        assert_eq!(boxes.hurt, vec![[5, 5, 5, 5]]);
    }

    #[test]
    fn test_parses_legacy_json_with_nulls() {
        let json = r#"{"nate": {"med_idle": {"0": {"push": null, "hurt": null}}}}"#;
        let db: HitboxDb = serde_json::from_str(json).unwrap();
        let f = db.frame("nate", "med_idle", 0).unwrap();
        assert!(f.is_empty());
    }

    #[test]
    fn test_copy_prev_only_into_empty_frame() {
        let mut db = HitboxDb::empty();
        db.ensure_entry("nate", "med_hit", 0).hurt = vec![[1, 1, 1, 1]];
        assert!(db.copy_prev_frame("nate", "med_hit", 1));
        assert_eq!(db.frame("nate", "med_hit", 1).unwrap().hurt, vec![[1, 1, 1, 1]]);

        db.ensure_entry("nate", "med_hit", 2).hit = vec![[7, 7, 7, 7]];
        assert!(!db.copy_prev_frame("nate", "med_hit", 2));
        assert!(db.frame("nate", "med_hit", 2).unwrap().hurt.is_empty());
        assert!(!db.copy_prev_frame("nate", "med_hit", 0));
    }

    #[test]
    fn test_builtin_covers_roster() {
        let db = HitboxDb::builtin();
        for c in CharacterId::ALL {
            assert!(db.local_boxes(c.name(), "med_idle", 3).push.is_some());
            assert!(!db.local_boxes(c.name(), "high_move", 0).hurt.is_empty());
            let sheet = c.sheet();
            let sweep = db.local_boxes(c.name(), "low_attack_r", sheet.low_attack_r - 1);
            assert_eq!(sweep.hit.len(), 1);
            // Non-active frames have no hit box
            assert!(db.local_boxes(c.name(), "med_attack_y", 1).hit.is_empty());
            assert_eq!(db.local_boxes(c.name(), "med_attack_y", 4).hit.len(), 1);
        }
    }

    #[test]
    fn test_overlay_replaces_whole_animation() {
        let mut db = HitboxDb::builtin();
        let mut file = HitboxDb::empty();
        file.ensure_entry("nate", "med_idle", 2).push = Some([0, 0, 10, 10]);
        db.overlay(file);
        assert!(db.frame("nate", "med_idle", 0).is_none());
        assert_eq!(db.local_boxes("nate", "med_idle", 0).push, Some([0, 0, 10, 10]));
        // Other animations keep their built-in boxes
        assert!(db.frame("nate", "low_idle", 0).is_some());
    }
}
