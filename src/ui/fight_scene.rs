//! Fight screen: playfield, HUD, overlays.
//!
//! The 1000x600 world is scaled onto the terminal cells of the playfield.
//! Fighters are drawn from their hurt boxes (body rect when a frame has none)
//! and active hit boxes are shaded on top.

use super::editor_overlay::render_editor_overlay;
use super::game_common::{
    create_game_layout, game_layout, hint, render_status_bar, GameLayout, KeyHint, StatusBar,
};
use super::hud::render_hud;
use super::overlays::{render_pause_overlay, render_result_overlay};
use crate::app::App;
use crate::core::constants::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::core::Rect as WorldRect;
use crate::editor::HitboxEditor;
use crate::fighter::{Fighter, PlayerSlot};
use crate::game::{remaining_seconds, Match, MatchPhase};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub const HUD_HEIGHT: u16 = 3;

pub fn fighter_color(slot: PlayerSlot) -> Color {
    match slot {
        PlayerSlot::P1 => Color::Blue,
        PlayerSlot::P2 => Color::Red,
    }
}

/// Layout of the fight screen for a terminal of `area`.
pub fn fight_layout(area: Rect) -> GameLayout {
    game_layout(area, HUD_HEIGHT)
}

/// World point under a terminal cell, or `None` outside the playfield.
pub fn cell_to_world(field: Rect, col: u16, row: u16) -> Option<(i32, i32)> {
    if field.width == 0 || field.height == 0 {
        return None;
    }
    if col < field.x || row < field.y || col >= field.x + field.width || row >= field.y + field.height {
        return None;
    }
    let cx = i64::from(col - field.x);
    let cy = i64::from(row - field.y);
    let w = i64::from(field.width);
    let h = i64::from(field.height);
    // Centre of the cell.
    let x = (2 * cx + 1) * i64::from(WORLD_WIDTH) / (2 * w);
    let y = (2 * cy + 1) * i64::from(WORLD_HEIGHT) / (2 * h);
    Some((x as i32, y as i32))
}

/// Character grid the playfield is painted into before it becomes a paragraph.
pub struct CellCanvas {
    width: usize,
    height: usize,
    cells: Vec<(char, Color)>,
}

impl CellCanvas {
    pub fn new(width: u16, height: u16) -> Self {
        let width = width as usize;
        let height = height as usize;
        Self {
            width,
            height,
            cells: vec![(' ', Color::Reset); width * height],
        }
    }

    fn col_for(&self, x: i32) -> i64 {
        i64::from(x) * self.width as i64 / i64::from(WORLD_WIDTH)
    }

    fn row_for(&self, y: i32) -> i64 {
        i64::from(y) * self.height as i64 / i64::from(WORLD_HEIGHT)
    }

    /// Cell span covered by a world rectangle (at least one cell).
    fn span(&self, r: &WorldRect) -> Option<(usize, usize, usize, usize)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let c0 = self.col_for(r.left());
        let c1 = self.col_for(r.right() - 1).max(c0);
        let r0 = self.row_for(r.top());
        let r1 = self.row_for(r.bottom() - 1).max(r0);
        let max_c = self.width as i64 - 1;
        let max_r = self.height as i64 - 1;
        if c1 < 0 || r1 < 0 || c0 > max_c || r0 > max_r {
            return None;
        }
        Some((
            c0.clamp(0, max_c) as usize,
            c1.clamp(0, max_c) as usize,
            r0.clamp(0, max_r) as usize,
            r1.clamp(0, max_r) as usize,
        ))
    }

    pub fn set(&mut self, col: usize, row: usize, ch: char, color: Color) {
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = (ch, color);
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<(char, Color)> {
        (col < self.width && row < self.height).then(|| self.cells[row * self.width + col])
    }

    pub fn fill_rect(&mut self, r: &WorldRect, ch: char, color: Color) {
        let Some((c0, c1, r0, r1)) = self.span(r) else {
            return;
        };
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.set(col, row, ch, color);
            }
        }
    }

    pub fn outline_rect(&mut self, r: &WorldRect, color: Color) {
        let Some((c0, c1, r0, r1)) = self.span(r) else {
            return;
        };
        for col in c0..=c1 {
            self.set(col, r0, '─', color);
            self.set(col, r1, '─', color);
        }
        for row in r0..=r1 {
            self.set(c0, row, '│', color);
            self.set(c1, row, '│', color);
        }
        self.set(c0, r0, '┌', color);
        self.set(c1, r0, '┐', color);
        self.set(c0, r1, '└', color);
        self.set(c1, r1, '┘', color);
    }

    /// Fill every row from world `y` down.
    pub fn floor(&mut self, y: i32, color: Color) {
        let row0 = self.row_for(y).clamp(0, self.height as i64) as usize;
        for row in row0..self.height {
            let ch = if row == row0 { '▀' } else { '░' };
            for col in 0..self.width {
                self.set(col, row, ch, color);
            }
        }
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        let width = self.width.max(1);
        self.cells
            .chunks(width)
            .map(|row| {
                Line::from(
                    row.iter()
                        .map(|&(ch, color)| Span::styled(ch.to_string(), Style::default().fg(color)))
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }
}

fn paint_fighter(canvas: &mut CellCanvas, m: &Match, fighter: &Fighter) {
    let boxes = m.hitboxes.world_boxes(fighter, m.clock_ms);
    let color = fighter_color(fighter.slot);
    let shade = if fighter.stunned(m.clock_ms) { '▓' } else { '█' };
    if boxes.hurt.is_empty() {
        canvas.fill_rect(&fighter.rect, shade, color);
    } else {
        for r in &boxes.hurt {
            canvas.fill_rect(r, shade, color);
        }
    }
    if fighter.is_attacking || fighter.air_state == crate::fighter::AirState::Attack {
        for r in &boxes.hit {
            canvas.fill_rect(r, '▒', Color::Yellow);
        }
    }
}

/// Paint the stage floor and both fighters.
pub fn paint_playfield(m: &Match, width: u16, height: u16) -> CellCanvas {
    let mut canvas = CellCanvas::new(width, height);
    canvas.floor(m.ground_y(), Color::DarkGray);
    // P1 is painted last and wins overlapping cells.
    paint_fighter(&mut canvas, m, m.p2());
    paint_fighter(&mut canvas, m, m.p1());
    canvas
}

pub fn render_fight(frame: &mut Frame, area: Rect, app: &App) {
    let Some(m) = app.fight.as_ref() else {
        return;
    };
    let title = format!(" MK Ultra | {} ", m.stage.name);
    let layout = create_game_layout(frame, area, &title, Color::Red, HUD_HEIGHT);

    render_hud(frame, layout.hud, m);

    let field = layout.content;
    let mut canvas = paint_playfield(m, field.width, field.height);
    if m.editor_active {
        render_editor_overlay(&mut canvas, &app.editor, m);
    }
    frame.render_widget(Paragraph::new(canvas.into_lines()), field);

    match m.phase {
        MatchPhase::Paused => render_pause_overlay(frame, field, &m.pause, &app.config),
        MatchPhase::RoundOver | MatchPhase::MatchOver => render_result_overlay(frame, field, m),
        _ => {}
    }

    render_fight_status(frame, layout.status_bar, m, &app.editor);
}

fn render_fight_status(frame: &mut Frame, area: Rect, m: &Match, editor: &HitboxEditor) {
    if m.editor_active {
        super::editor_overlay::render_editor_help(frame, area, editor, m);
        return;
    }
    const INTRO: &[KeyHint] = &[hint("Space", "Skip"), hint("Esc", "Title")];
    const FIGHTING: &[KeyHint] = &[hint("P", "Pause"), hint("F2", "Hitbox editor")];
    const PAUSED: &[KeyHint] = &[hint("Up/Down", "Select"), hint("Enter", "Confirm"), hint("Esc", "Resume")];
    const ROUND_OVER: &[KeyHint] = &[hint("Enter", "Continue")];
    const MATCH_OVER: &[KeyHint] = &[hint("Enter", "Rematch"), hint("Esc", "Title")];

    let (message, color, hints) = match m.phase {
        MatchPhase::Intro => ("Get ready", Color::Yellow, INTRO),
        MatchPhase::Fighting => ("FIGHT", Color::Red, FIGHTING),
        MatchPhase::Paused => ("Paused", Color::White, PAUSED),
        MatchPhase::RoundOver => ("Round over", Color::Yellow, ROUND_OVER),
        MatchPhase::MatchOver => ("Match over", Color::Yellow, MATCH_OVER),
    };
    let detail = format!(
        "{}  round {}  {}s",
        m.stage.name,
        m.round,
        remaining_seconds(m)
    );
    render_status_bar(
        frame,
        area,
        &StatusBar {
            message,
            color,
            detail,
            hints,
        },
    );
}
