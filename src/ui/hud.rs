//! Fight HUD: scores over health bars, round timer, round label, win tallies.

use super::fight_scene::fighter_color;
use crate::core::constants::MAX_HEALTH;
use crate::fighter::Fighter;
use crate::game::{remaining_seconds, wins_to_roman, Match};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const TEXT_RED: Color = Color::LightRed;

/// Score as shown above the health bar (at least four digits).
pub fn format_score(score: u32) -> String {
    format!("{:04}", score)
}

/// Text health bar `width` cells wide, right-aligned when it drains toward the centre.
pub fn health_bar(health: i32, width: usize, drain_left: bool) -> String {
    let health = health.clamp(0, MAX_HEALTH) as usize;
    let filled = (health * width + MAX_HEALTH as usize - 1) / MAX_HEALTH as usize;
    let filled = filled.min(width);
    let empty = width - filled;
    if drain_left {
        format!("{}{}", "░".repeat(empty), "█".repeat(filled))
    } else {
        format!("{}{}", "█".repeat(filled), "░".repeat(empty))
    }
}

fn fighter_column(f: &Fighter, wins: u32, width: u16, right_side: bool) -> Vec<Line<'static>> {
    let bar_width = width.saturating_sub(2) as usize;
    let color = fighter_color(f.slot);
    vec![
        Line::from(Span::styled(
            format!("{}  {}", f.character.display_name(), format_score(f.score)),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            health_bar(f.health, bar_width, right_side),
            Style::default().fg(color),
        )),
        Line::from(Span::styled(
            wins_to_roman(wins),
            Style::default().fg(TEXT_RED).add_modifier(Modifier::BOLD),
        )),
    ]
}

pub fn render_hud(frame: &mut Frame, area: Rect, m: &Match) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(42),
            Constraint::Percentage(16),
            Constraint::Percentage(42),
        ])
        .split(area);

    let left = Paragraph::new(fighter_column(m.p1(), m.wins[0], chunks[0].width, false))
        .alignment(Alignment::Center);
    frame.render_widget(left, chunks[0]);

    let right = Paragraph::new(fighter_column(m.p2(), m.wins[1], chunks[2].width, true))
        .alignment(Alignment::Center);
    frame.render_widget(right, chunks[2]);

    let centre = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{:02}", remaining_seconds(m)),
            Style::default().fg(TEXT_RED).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("ROUND {}", m.round),
            Style::default().fg(TEXT_RED),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(centre, chunks[1]);
}
