//! Integration test: hitbox files and the in-fight editor
//!
//! Covers loading authored files over the built-in boxes, and an editing
//! session through the app that saves to disk and carries into the next fight.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mkultra::app::{App, Screen};
use mkultra::audio::{RecordingSink, SoundBoard};
use mkultra::combat::HitboxDb;
use mkultra::config::GameConfig;
use mkultra::editor::{BoxMode, EditorInput};
use mkultra::stage::Stage;
use std::fs;
use std::path::PathBuf;

fn temp_file(tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("mkultra_hitbox_{}_{}.json", tag, std::process::id()));
    let _ = fs::remove_file(&path);
    path
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_missing_file_uses_builtin_boxes() {
    let db = HitboxDb::load(&temp_file("missing"));
    assert_eq!(db, HitboxDb::builtin());
}

#[test]
fn test_file_animation_replaces_builtin_and_keeps_the_rest() {
    let path = temp_file("overlay");
    fs::write(
        &path,
        r#"{ "nate": { "med_idle": {
            "0": { "push": [100, 40, 100, 320], "hurt": null, "hit": [] },
            "3": { "push": null, "hurt": [[90, 20, 120, 340]] }
        } } }"#,
    )
    .unwrap();

    let db = HitboxDb::load(&path);
    let idle = db.frame("nate", "med_idle", 0).unwrap();
    assert_eq!(idle.push, Some([100, 40, 100, 320]));
    assert!(idle.hurt.is_empty(), "null lists load as empty");
    assert_eq!(
        db.frame("nate", "med_idle", 3).unwrap().hurt,
        vec![[90, 20, 120, 340]]
    );

    // Animations absent from the file still come from the built-in set.
    let builtin = HitboxDb::builtin();
    assert_eq!(
        db.frame("nate", "low_idle", 0),
        builtin.frame("nate", "low_idle", 0)
    );
    assert_eq!(
        db.frame("scorpion", "med_idle", 0),
        builtin.frame("scorpion", "med_idle", 0)
    );
    let _ = fs::remove_file(&path);
}

#[test]
fn test_invalid_file_falls_back_to_builtin() {
    let path = temp_file("invalid");
    fs::write(&path, "{ not json").unwrap();
    assert_eq!(HitboxDb::load(&path), HitboxDb::builtin());
    let _ = fs::remove_file(&path);
}

// =============================================================================
// Editing session through the app
// =============================================================================

fn app_saving_to(path: PathBuf) -> App {
    let config = GameConfig {
        hitbox_path: path.clone(),
        ..GameConfig::default()
    };
    App::new(
        config,
        HitboxDb::load(&path),
        Stage::builtin_list(),
        SoundBoard::new(None, RecordingSink::default()),
        3,
    )
}

/// Double mode, Nate vs Nate, straight past the intro.
fn fight(app: &mut App) {
    app.handle_key(press(KeyCode::Down), 0);
    for _ in 0..4 {
        app.handle_key(press(KeyCode::Enter), 0);
    }
    assert_eq!(app.screen, Screen::Fight);
    app.handle_key(press(KeyCode::Char(' ')), 0);
}

#[test]
fn test_drawn_box_is_saved_and_used_by_the_next_fight() {
    let path = temp_file("session");
    let mut app = app_saving_to(path.clone());
    fight(&mut app);

    app.handle_key(press(KeyCode::F(2)), 0);
    assert!(app.editor_active());
    app.handle_key(press(KeyCode::Char('3')), 0);
    assert_eq!(app.editor.mode, BoxMode::Hit);

    // P1 stands at (40, 160) facing right.
    app.handle_mouse(EditorInput::MouseDown { x: 300, y: 250 });
    app.handle_mouse(EditorInput::MouseDrag { x: 280, y: 260 });
    app.handle_mouse(EditorInput::MouseUp { x: 260, y: 270 });
    assert_eq!(app.editor.selected, Some(0));

    // Not saved yet: the live boxes are unchanged.
    let live = &app.fight.as_ref().unwrap().hitboxes;
    assert!(live.frame("nate", "med_idle", 0).unwrap().hit.is_empty());

    app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL), 0);
    assert!(path.is_file());
    assert!(app.editor.status.as_deref().unwrap_or("").starts_with("saved"));

    let on_disk = HitboxDb::load(&path);
    assert_eq!(
        on_disk.frame("nate", "med_idle", 0).unwrap().hit,
        vec![[220, 90, 40, 20]]
    );
    assert_eq!(app.hitboxes, on_disk);

    // Leave the editor and the fight, then start another one.
    app.handle_key(press(KeyCode::Esc), 0);
    assert!(!app.editor_active());
    app.handle_key(press(KeyCode::Char('p')), 0);
    app.handle_key(press(KeyCode::Up), 0);
    app.handle_key(press(KeyCode::Enter), 0);
    assert_eq!(app.screen, Screen::Title { selected: 0 });

    fight(&mut app);
    let next = &app.fight.as_ref().unwrap().hitboxes;
    assert_eq!(
        next.frame("nate", "med_idle", 0).unwrap().hit,
        vec![[220, 90, 40, 20]]
    );
    let _ = fs::remove_file(&path);
}

#[test]
fn test_reopening_editor_discards_unsaved_edits() {
    let path = temp_file("discard");
    let mut app = app_saving_to(path.clone());
    fight(&mut app);

    app.handle_key(press(KeyCode::F(2)), 0);
    app.handle_key(press(KeyCode::Char('1')), 0);
    app.handle_key(press(KeyCode::Right), 0);
    assert_eq!(
        app.editor.working.frame("nate", "med_idle", 0).unwrap().push,
        Some([111, 40, 80, 320])
    );

    app.handle_key(press(KeyCode::F(2)), 0);
    app.handle_key(press(KeyCode::F(2)), 0);
    assert_eq!(
        app.editor.working.frame("nate", "med_idle", 0).unwrap().push,
        Some([110, 40, 80, 320])
    );
    assert!(!path.exists());
}
