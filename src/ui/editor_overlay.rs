//! Hitbox editor overlay: box outlines over the frozen playfield plus help lines.

use super::fight_scene::CellCanvas;
use crate::editor::{editor_world_boxes, status_line, BoxMode, DragState, HitboxEditor, HELP_LINE};
use crate::fighter::PlayerSlot;
use crate::game::Match;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn mode_color(mode: BoxMode) -> Color {
    match mode {
        BoxMode::Push => Color::White,
        BoxMode::Hurt => Color::Green,
        BoxMode::Hit => Color::Red,
    }
}

/// Outline every box of both fighters; the selected box of the active player is yellow.
pub fn render_editor_overlay(canvas: &mut CellCanvas, editor: &HitboxEditor, m: &Match) {
    for slot in [PlayerSlot::P1, PlayerSlot::P2] {
        let boxes = editor_world_boxes(editor, m, slot);
        let active = slot == editor.active_player;
        let is_selected =
            |mode: BoxMode, i: usize| active && editor.mode == mode && editor.selected == Some(i);

        if let Some(r) = boxes.push {
            let color = if is_selected(BoxMode::Push, 0) {
                Color::Yellow
            } else {
                mode_color(BoxMode::Push)
            };
            canvas.outline_rect(&r, color);
        }
        for (mode, list) in [(BoxMode::Hurt, &boxes.hurt), (BoxMode::Hit, &boxes.hit)] {
            for (i, r) in list.iter().enumerate() {
                let color = if is_selected(mode, i) {
                    Color::Yellow
                } else {
                    mode_color(mode)
                };
                canvas.outline_rect(r, color);
            }
        }
    }

    if let DragState::Drawing { rect, .. } = editor.drag {
        canvas.outline_rect(&rect, mode_color(editor.mode));
    }
}

pub fn render_editor_help(frame: &mut Frame, area: Rect, editor: &HitboxEditor, m: &Match) {
    if area.height == 0 {
        return;
    }
    let mut first = status_line(editor, m);
    if let Some(status) = &editor.status {
        first.push_str("  ");
        first.push_str(status);
    }
    let lines = vec![
        Line::from(Span::styled(first, Style::default().fg(mode_color(editor.mode)))),
        Line::from(Span::styled(HELP_LINE, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), area);
}
