//! Title, character select and stage select screens.

use super::game_common::{centered_rect, hint, render_status_bar, StatusBar};
use crate::app::{Picker, TitleItem};
use crate::fighter::roster::{character_for_box, SELECT_BOXES, SELECT_COLS, SELECT_ROWS};
use crate::stage::{Stage, STAGE_SELECT_COLS};
use crate::utils::build_info::version_line;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const TITLE_ART: [&str; 5] = [
    "█▄ ▄█ █ ▄▀   █  █ █   ▀█▀ █▀▄ ▄▀▄",
    "█ ▀ █ █▀▄    █  █ █    █  █▀▄ █▀█",
    "▀   ▀ ▀  ▀   ▀▀▀▀ ▀▀▀  ▀  ▀ ▀ ▀ ▀",
    "",
    "",
];

fn screen_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

pub fn render_title(frame: &mut Frame, area: Rect, selected: usize) {
    frame.render_widget(Clear, area);
    let block = screen_block(" MK Ultra ", Color::Red);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let mut lines: Vec<Line> = TITLE_ART
        .iter()
        .map(|l| Line::from(Span::styled(*l, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))))
        .collect();
    for (i, item) in TitleItem::ALL.iter().enumerate() {
        let style = if i == selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let label = if i == selected {
            format!("> {} <", item.label())
        } else {
            item.label().to_string()
        };
        lines.push(Line::from(Span::styled(label, style)));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(version_line(), Style::default().fg(Color::DarkGray))));

    let content = centered_rect(chunks[0], chunks[0].width, lines.len() as u16);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), content);

    render_status_bar(
        frame,
        chunks[1],
        &StatusBar {
            message: "Select a mode",
            color: Color::Yellow,
            detail: String::new(),
            hints: &[hint("Up/Down", "Move"), hint("Enter", "Select"), hint("Esc", "Quit")],
        },
    );
}

/// Difficulty as a percentage with a small bar, e.g. `55% [#####-----]`.
pub fn difficulty_label(difficulty: f64) -> String {
    let pct = (difficulty * 100.0).round() as i32;
    let filled = (difficulty * 10.0).round().clamp(0.0, 10.0) as usize;
    format!("{}% [{}{}]", pct, "#".repeat(filled), "-".repeat(10 - filled))
}

pub fn render_char_select(frame: &mut Frame, area: Rect, picker: Picker, cursor: usize, difficulty: f64) {
    frame.render_widget(Clear, area);
    let title = format!(" Choose your fighter ({}) ", picker.label());
    let block = screen_block(&title, Color::Cyan);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2), Constraint::Length(2)])
        .split(inner);

    let grid = centered_rect(chunks[0], (SELECT_COLS * 14) as u16, (SELECT_ROWS * 5) as u16);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, SELECT_ROWS as u32); SELECT_ROWS])
        .split(grid);
    for (r, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, SELECT_COLS as u32); SELECT_COLS])
            .split(*row_area);
        for (c, cell) in cols.iter().enumerate() {
            let index = r * SELECT_COLS + c;
            if index >= SELECT_BOXES {
                continue;
            }
            let selected = index == cursor;
            let (label, color) = match character_for_box(index) {
                Some(character) => (character.display_name(), Color::White),
                None => ("locked", Color::DarkGray),
            };
            let border = if selected { Color::Yellow } else { color };
            let text_style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border));
            let text = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(label, text_style))])
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(text, *cell);
        }
    }

    if picker == Picker::Cpu {
        let line = Line::from(vec![
            Span::styled("CPU difficulty: ", Style::default().fg(Color::Yellow)),
            Span::styled(difficulty_label(difficulty), Style::default().fg(Color::White)),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), chunks[1]);
    }

    let mut hints = vec![hint("Arrows", "Move"), hint("Enter", "Pick"), hint("Esc", "Back")];
    if picker == Picker::Cpu {
        hints.push(hint("B/N", "Difficulty"));
    }
    let character = character_for_box(cursor).map_or("locked", |c| c.display_name());
    render_status_bar(
        frame,
        chunks[2],
        &StatusBar {
            message: &format!("{} picks", picker.label()),
            color: Color::Cyan,
            detail: character.to_string(),
            hints: &hints,
        },
    );
}

pub fn render_stage_select(frame: &mut Frame, area: Rect, stages: &[Stage], cursor: usize) {
    frame.render_widget(Clear, area);
    let block = screen_block(" Choose a stage ", Color::Magenta);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let grid_rows = stages.len().div_ceil(STAGE_SELECT_COLS).max(1);
    let grid = centered_rect(chunks[0], 60, (grid_rows * 5) as u16);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, grid_rows as u32); grid_rows])
        .split(grid);
    for (r, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, STAGE_SELECT_COLS as u32); STAGE_SELECT_COLS])
            .split(*row_area);
        for (c, cell) in cols.iter().enumerate() {
            let index = r * STAGE_SELECT_COLS + c;
            let Some(stage) = stages.get(index) else {
                continue;
            };
            let selected = index == cursor;
            let color = if selected { Color::Yellow } else { Color::White };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color));
            let text = Paragraph::new(vec![
                Line::from(Span::styled(stage.name.clone(), Style::default().fg(color))),
                Line::from(Span::styled(
                    format!("floor {}", stage.ground_y),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(text, *cell);
        }
    }

    render_status_bar(
        frame,
        chunks[1],
        &StatusBar {
            message: "Where do you fight?",
            color: Color::Magenta,
            detail: format!("{}/{}", (cursor + 1).min(stages.len()), stages.len()),
            hints: &[hint("Arrows", "Move"), hint("Enter", "Fight"), hint("Esc", "Back")],
        },
    );
}
