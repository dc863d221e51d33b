pub mod editor_overlay;
pub mod fight_scene;
pub mod game_common;
pub mod hud;
pub mod menu_scene;
pub mod overlays;

use crate::app::{App, Screen};
use ratatui::Frame;

/// Draw whichever screen the app is on.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.size();
    match app.screen {
        Screen::Title { selected } => menu_scene::render_title(frame, area, selected),
        Screen::CharSelect { picker, cursor } => {
            menu_scene::render_char_select(frame, area, picker, cursor, app.difficulty)
        }
        Screen::StageSelect { cursor } => {
            menu_scene::render_stage_select(frame, area, &app.stages, cursor)
        }
        Screen::Fight => fight_scene::render_fight(frame, area, app),
    }
}
