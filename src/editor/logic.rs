//! Hitbox editor actions.
//!
//! The editor works on the exact frame entry of the active fighter's current
//! animation frame. Coordinates arriving here are already in world units.

use super::types::{BoxMode, DragState, HitboxEditor};
use crate::combat::hitbox::WorldBoxes;
use crate::core::geometry::{local_to_world, world_to_local};
use crate::core::Rect;
use crate::fighter::PlayerSlot;
use crate::game::logic::set_editor_active;
use crate::game::Match;

/// Nudge distance with Shift held.
pub const NUDGE_FAST: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorInput {
    SetMode(BoxMode),
    SwitchPlayer,
    /// Step the current animation frame (`,` / `.`).
    StepFrame(i32),
    CopyPrev,
    Nudge { dx: i32, dy: i32 },
    Delete,
    Save,
    Exit,
    MouseDown { x: i32, y: i32 },
    MouseDrag { x: i32, y: i32 },
    MouseUp { x: i32, y: i32 },
}

/// The frame entry being edited.
struct Target {
    name: &'static str,
    anim_key: &'static str,
    frame: usize,
    body: Rect,
    flip: bool,
}

fn target(ed: &HitboxEditor, m: &Match) -> Target {
    let f = m.fighter(ed.active_player);
    let (anim_key, frame) = f.current_frame_info(m.clock_ms);
    Target {
        name: f.name(),
        anim_key,
        frame,
        body: f.rect,
        flip: f.flip(),
    }
}

/// World-space boxes of `slot`'s exact current frame in the working copy.
pub fn editor_world_boxes(ed: &HitboxEditor, m: &Match, slot: PlayerSlot) -> WorldBoxes {
    let f = m.fighter(slot);
    let (anim_key, frame) = f.current_frame_info(m.clock_ms);
    let Some(boxes) = ed.working.frame(f.name(), anim_key, frame) else {
        return WorldBoxes::default();
    };
    let flip = f.flip();
    let to_world = |b: &[i32; 4]| local_to_world(*b, &f.rect, flip);
    WorldBoxes {
        push: boxes.push.as_ref().map(to_world),
        hurt: boxes.hurt.iter().map(to_world).collect(),
        hit: boxes.hit.iter().map(to_world).collect(),
    }
}

fn mode_rects(ed: &HitboxEditor, m: &Match) -> Vec<Rect> {
    let boxes = editor_world_boxes(ed, m, ed.active_player);
    match ed.mode {
        BoxMode::Push => boxes.push.into_iter().collect(),
        BoxMode::Hurt => boxes.hurt,
        BoxMode::Hit => boxes.hit,
    }
}

/// The box arrows and drags act on: the pushbox in push mode, else the selection.
fn grabbed_rect(ed: &HitboxEditor, m: &Match) -> Option<Rect> {
    let rects = mode_rects(ed, m);
    match ed.mode {
        BoxMode::Push => rects.first().copied(),
        _ => ed.selected.and_then(|i| rects.get(i).copied()),
    }
}

fn write_grabbed(ed: &mut HitboxEditor, m: &Match, world: Rect) {
    let t = target(ed, m);
    let local = world_to_local(&world, &t.body, t.flip);
    let selected = ed.selected;
    let entry = ed.working.ensure_entry(t.name, t.anim_key, t.frame);
    let list = match ed.mode {
        BoxMode::Push => {
            entry.push = Some(local);
            return;
        }
        BoxMode::Hurt => &mut entry.hurt,
        BoxMode::Hit => &mut entry.hit,
    };
    if let Some(slot) = selected.and_then(|i| list.get_mut(i)) {
        *slot = local;
    }
}

fn commit_new(ed: &mut HitboxEditor, m: &Match, world: Rect) {
    let t = target(ed, m);
    let local = world_to_local(&world, &t.body, t.flip);
    let entry = ed.working.ensure_entry(t.name, t.anim_key, t.frame);
    let index = match ed.mode {
        BoxMode::Push => {
            entry.push = Some(local);
            0
        }
        BoxMode::Hurt => {
            entry.hurt.push(local);
            entry.hurt.len() - 1
        }
        BoxMode::Hit => {
            entry.hit.push(local);
            entry.hit.len() - 1
        }
    };
    ed.selected = Some(index);
}

fn delete_grabbed(ed: &mut HitboxEditor, m: &Match) {
    let t = target(ed, m);
    let selected = ed.selected.take();
    let entry = ed.working.ensure_entry(t.name, t.anim_key, t.frame);
    let list = match ed.mode {
        BoxMode::Push => {
            entry.push = None;
            return;
        }
        BoxMode::Hurt => &mut entry.hurt,
        BoxMode::Hit => &mut entry.hit,
    };
    if let Some(i) = selected.filter(|&i| i < list.len()) {
        list.remove(i);
    }
}

fn step_frame(ed: &mut HitboxEditor, m: &mut Match, delta: i32) {
    let now = m.clock_ms;
    if let Some(anim) = m.fighter_mut(ed.active_player).current_anim_mut(now) {
        anim.step(delta);
    }
    ed.selected = None;
    let t = target(ed, m);
    if ed.working.copy_prev_frame(t.name, t.anim_key, t.frame) {
        tracing::debug!(anim = t.anim_key, frame = t.frame, "copied previous frame boxes");
    }
}

fn save(ed: &mut HitboxEditor, m: &mut Match) {
    match ed.working.save(&ed.path) {
        Ok(()) => {
            m.hitboxes = ed.working.clone();
            ed.status = Some(format!("saved {}", ed.path.display()));
        }
        Err(e) => {
            tracing::warn!(error = %e, "hitbox save failed");
            ed.status = Some(format!("save failed: {e}"));
        }
    }
}

/// Apply an editor action. Returns false when the editor is not open.
pub fn process_input(ed: &mut HitboxEditor, m: &mut Match, input: EditorInput) -> bool {
    if !m.editor_active {
        return false;
    }

    match input {
        EditorInput::SetMode(mode) => {
            ed.mode = mode;
            ed.selected = None;
        }
        EditorInput::SwitchPlayer => {
            ed.active_player = ed.active_player.other();
            ed.selected = None;
        }
        EditorInput::StepFrame(delta) => step_frame(ed, m, delta),
        EditorInput::CopyPrev => {
            let t = target(ed, m);
            ed.working.copy_prev_frame(t.name, t.anim_key, t.frame);
        }
        EditorInput::Nudge { dx, dy } => {
            if let Some(mut r) = grabbed_rect(ed, m) {
                r.x += dx;
                r.y += dy;
                write_grabbed(ed, m, r);
            }
        }
        EditorInput::Delete => delete_grabbed(ed, m),
        EditorInput::Save => save(ed, m),
        EditorInput::Exit => {
            ed.drag = DragState::Idle;
            ed.selected = None;
            set_editor_active(m, false);
        }
        EditorInput::MouseDown { x, y } => {
            let rects = mode_rects(ed, m);
            match rects.iter().position(|r| r.collidepoint(x, y)) {
                Some(i) => {
                    let r = rects[i];
                    ed.selected = Some(i);
                    ed.drag = DragState::Moving {
                        offset: (x - r.x, y - r.y),
                    };
                }
                None => {
                    ed.selected = None;
                    ed.drag = DragState::Drawing {
                        start: (x, y),
                        rect: Rect::new(x, y, 1, 1),
                    };
                }
            }
        }
        EditorInput::MouseDrag { x, y } => match ed.drag {
            DragState::Drawing { start, .. } => {
                ed.drag = DragState::Drawing {
                    start,
                    rect: Rect::from_corners(start.0, start.1, x, y),
                };
            }
            DragState::Moving { offset } => {
                if let Some(r) = grabbed_rect(ed, m) {
                    write_grabbed(ed, m, Rect::new(x - offset.0, y - offset.1, r.w, r.h));
                }
            }
            DragState::Idle => return false,
        },
        EditorInput::MouseUp { x, y } => {
            let drag = std::mem::replace(&mut ed.drag, DragState::Idle);
            match drag {
                DragState::Drawing { start, .. } => {
                    commit_new(ed, m, Rect::from_corners(start.0, start.1, x, y));
                }
                DragState::Moving { .. } => {}
                DragState::Idle => return false,
            }
        }
    }
    true
}

/// First help line: who, which animation frame, which box list.
pub fn status_line(ed: &HitboxEditor, m: &Match) -> String {
    let t = target(ed, m);
    format!(
        "EDITOR: {} anim={} frame={} mode={}",
        ed.active_player.label(),
        t.anim_key,
        t.frame,
        ed.mode.label()
    )
}

pub const HELP_LINE: &str = "F2 toggle | TAB switch | 1 push 2 hurt 3 hit | , . step | drag to draw | drag box to move | arrows nudge (shift=5) | DEL delete | C copy prev | Ctrl+S save | Esc exit";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::hitbox::HitboxDb;
    use crate::fighter::CharacterId;
    use crate::game::{GameMode, MatchPhase};
    use crate::stage::Stage;
    use std::path::PathBuf;

    fn setup() -> (HitboxEditor, Match) {
        let db = HitboxDb::builtin();
        let mut m = Match::new(
            GameMode::Double,
            CharacterId::Nate,
            CharacterId::Nate,
            Stage::default_stage(),
            db.clone(),
            0.5,
            7,
        );
        m.phase = MatchPhase::Fighting;
        set_editor_active(&mut m, true);
        let path = std::env::temp_dir().join(format!("mkultra_editor_{}.json", std::process::id()));
        (HitboxEditor::new(path, &db), m)
    }

    // P1 body sits at (40, 160); the standing hurt box is [105, 30, 90, 330].

    #[test]
    fn test_inactive_editor_ignores_input() {
        let (mut ed, mut m) = setup();
        set_editor_active(&mut m, false);
        assert!(!process_input(&mut ed, &mut m, EditorInput::SwitchPlayer));
        assert_eq!(ed.active_player, PlayerSlot::P1);
    }

    #[test]
    fn test_mode_and_player_switch_clear_selection() {
        let (mut ed, mut m) = setup();
        ed.selected = Some(0);
        process_input(&mut ed, &mut m, EditorInput::SetMode(BoxMode::Hit));
        assert_eq!(ed.mode, BoxMode::Hit);
        assert_eq!(ed.selected, None);

        ed.selected = Some(0);
        process_input(&mut ed, &mut m, EditorInput::SwitchPlayer);
        assert_eq!(ed.active_player, PlayerSlot::P2);
        assert_eq!(ed.selected, None);
    }

    #[test]
    fn test_click_selects_and_drag_moves_box() {
        let (mut ed, mut m) = setup();
        process_input(&mut ed, &mut m, EditorInput::MouseDown { x: 150, y: 200 });
        assert_eq!(ed.selected, Some(0));
        assert_eq!(ed.drag, DragState::Moving { offset: (5, 10) });

        process_input(&mut ed, &mut m, EditorInput::MouseDrag { x: 160, y: 180 });
        process_input(&mut ed, &mut m, EditorInput::MouseUp { x: 160, y: 180 });
        assert_eq!(ed.drag, DragState::Idle);

        let boxes = ed.working.frame("nate", "med_idle", 0).unwrap();
        assert_eq!(boxes.hurt, vec![[115, 10, 90, 330]]);
        // The live database is untouched until a save.
        assert_eq!(m.hitboxes.frame("nate", "med_idle", 0).unwrap().hurt, vec![[105, 30, 90, 330]]);
    }

    #[test]
    fn test_draw_new_hit_box() {
        let (mut ed, mut m) = setup();
        process_input(&mut ed, &mut m, EditorInput::SetMode(BoxMode::Hit));
        process_input(&mut ed, &mut m, EditorInput::MouseDown { x: 300, y: 250 });
        process_input(&mut ed, &mut m, EditorInput::MouseDrag { x: 260, y: 270 });
        assert_eq!(
            ed.drag,
            DragState::Drawing {
                start: (300, 250),
                rect: Rect::new(260, 250, 40, 20)
            }
        );
        process_input(&mut ed, &mut m, EditorInput::MouseUp { x: 260, y: 270 });

        let boxes = ed.working.frame("nate", "med_idle", 0).unwrap();
        assert_eq!(boxes.hit, vec![[220, 90, 40, 20]]);
        assert_eq!(ed.selected, Some(0));
    }

    #[test]
    fn test_drawing_on_mirrored_fighter_stores_right_facing_box() {
        let (mut ed, mut m) = setup();
        process_input(&mut ed, &mut m, EditorInput::SwitchPlayer);
        process_input(&mut ed, &mut m, EditorInput::SetMode(BoxMode::Hit));
        let body = m.p2().rect;
        assert!(m.p2().flip());

        process_input(&mut ed, &mut m, EditorInput::MouseDown { x: body.x + 10, y: body.y + 50 });
        process_input(&mut ed, &mut m, EditorInput::MouseUp { x: body.x + 40, y: body.y + 60 });

        let boxes = ed.working.frame("nate", "med_idle", 0).unwrap();
        assert_eq!(boxes.hit, vec![[body.w - 40, 50, 30, 10]]);
    }

    #[test]
    fn test_nudge_push_box_and_fast_nudge() {
        let (mut ed, mut m) = setup();
        process_input(&mut ed, &mut m, EditorInput::SetMode(BoxMode::Push));
        process_input(&mut ed, &mut m, EditorInput::Nudge { dx: NUDGE_FAST, dy: -1 });
        let boxes = ed.working.frame("nate", "med_idle", 0).unwrap();
        assert_eq!(boxes.push, Some([115, 39, 80, 320]));
    }

    #[test]
    fn test_nudge_without_selection_does_nothing() {
        let (mut ed, mut m) = setup();
        process_input(&mut ed, &mut m, EditorInput::Nudge { dx: 1, dy: 0 });
        let boxes = ed.working.frame("nate", "med_idle", 0).unwrap();
        assert_eq!(boxes.hurt, vec![[105, 30, 90, 330]]);
    }

    #[test]
    fn test_delete_selected_and_push() {
        let (mut ed, mut m) = setup();
        ed.selected = Some(0);
        process_input(&mut ed, &mut m, EditorInput::Delete);
        assert!(ed.working.frame("nate", "med_idle", 0).unwrap().hurt.is_empty());
        assert_eq!(ed.selected, None);

        process_input(&mut ed, &mut m, EditorInput::SetMode(BoxMode::Push));
        process_input(&mut ed, &mut m, EditorInput::Delete);
        assert_eq!(ed.working.frame("nate", "med_idle", 0).unwrap().push, None);
    }

    #[test]
    fn test_step_frame_copies_previous_boxes() {
        let (mut ed, mut m) = setup();
        assert!(ed.working.frame("nate", "med_idle", 1).is_none());
        process_input(&mut ed, &mut m, EditorInput::StepFrame(1));
        assert_eq!(m.p1().current_frame_info(m.clock_ms), ("med_idle", 1));
        assert_eq!(
            ed.working.frame("nate", "med_idle", 1),
            ed.working.frame("nate", "med_idle", 0)
        );

        process_input(&mut ed, &mut m, EditorInput::StepFrame(-2));
        let last = m.p1().anims.medium_idle.last_index();
        assert_eq!(m.p1().current_frame_info(m.clock_ms), ("med_idle", last));
    }

    #[test]
    fn test_save_replaces_live_database() {
        let (mut ed, mut m) = setup();
        ed.selected = Some(0);
        process_input(&mut ed, &mut m, EditorInput::Delete);
        process_input(&mut ed, &mut m, EditorInput::Save);

        assert!(m.hitboxes.frame("nate", "med_idle", 0).unwrap().hurt.is_empty());
        assert!(ed.status.as_deref().unwrap_or("").starts_with("saved"));
        let reloaded = HitboxDb::load(&ed.path);
        assert!(reloaded.frame("nate", "med_idle", 0).unwrap().hurt.is_empty());
        let _ = std::fs::remove_file(&ed.path);
    }

    #[test]
    fn test_save_failure_keeps_live_database() {
        let (mut ed, mut m) = setup();
        ed.path = PathBuf::from("/proc/definitely/not/writable/hitboxes.json");
        ed.selected = Some(0);
        process_input(&mut ed, &mut m, EditorInput::Delete);
        process_input(&mut ed, &mut m, EditorInput::Save);

        assert_eq!(m.hitboxes.frame("nate", "med_idle", 0).unwrap().hurt.len(), 1);
        assert!(ed.status.as_deref().unwrap_or("").starts_with("save failed"));
    }

    #[test]
    fn test_exit_unfreezes_match() {
        let (mut ed, mut m) = setup();
        process_input(&mut ed, &mut m, EditorInput::Exit);
        assert!(!m.editor_active);
    }

    #[test]
    fn test_status_line() {
        let (ed, m) = setup();
        assert_eq!(status_line(&ed, &m), "EDITOR: P1 anim=med_idle frame=0 mode=HURT");
    }
}
