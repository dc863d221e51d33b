//! Pause menu and round/match result overlays drawn over the playfield.

use super::game_common::{centered_rect, render_result_banner, GameResultType};
use crate::config::GameConfig;
use crate::fighter::PlayerSlot;
use crate::game::{GameMode, Match, MatchPhase, PauseItem, PauseMenu, PauseView, RoundEndReason};
use crate::input::KeyBindings;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn bindings_line(label: &str, keys: &KeyBindings) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow)),
        Span::raw(format!(
            "move {}/{}  jump {}  crouch {}  block {}  attacks {} {} {} {}",
            keys.left.label(),
            keys.right.label(),
            keys.jump.label(),
            keys.crouch.label(),
            keys.block.label(),
            keys.attack_r.label(),
            keys.attack_e.label(),
            keys.attack_t.label(),
            keys.attack_y.label(),
        )),
    ])
}

pub fn render_pause_overlay(frame: &mut Frame, area: Rect, pause: &PauseMenu, config: &GameConfig) {
    let (width, height) = match pause.view {
        PauseView::Main => (30, 8),
        PauseView::Options => (70, 8),
    };
    let modal = centered_rect(area, width, height);
    frame.render_widget(Clear, modal);

    let title = match pause.view {
        PauseView::Main => " PAUSED ",
        PauseView::Options => " OPTIONS ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let lines: Vec<Line> = match pause.view {
        PauseView::Main => {
            let mut lines = vec![Line::from("")];
            for (i, item) in PauseItem::ALL.iter().enumerate() {
                let style = if i == pause.selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                lines.push(Line::from(Span::styled(item.label(), style)));
            }
            lines
        }
        PauseView::Options => vec![
            Line::from(""),
            bindings_line("P1", &config.p1_keys),
            bindings_line("P2", &config.p2_keys),
            Line::from(""),
            Line::from(Span::styled("[Esc/Enter] Back", Style::default().fg(Color::DarkGray))),
        ],
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Result type from P1's point of view in single player, neutral otherwise.
fn result_type(m: &Match, winner: Option<PlayerSlot>) -> GameResultType {
    match (winner, m.mode) {
        (None, _) => GameResultType::Draw,
        (Some(PlayerSlot::P2), GameMode::Single) => GameResultType::Loss,
        (Some(_), _) => GameResultType::Win,
    }
}

pub fn render_result_overlay(frame: &mut Frame, area: Rect, m: &Match) {
    if m.phase == MatchPhase::MatchOver {
        let winner = m.match_winner();
        let (title, message) = match winner {
            Some(slot) => (
                format!("{} wins", m.fighter(slot).name()),
                format!("{} loses", m.fighter(slot.other()).name()),
            ),
            None => ("draw".to_string(), format!("{} - {}", m.wins[0], m.wins[1])),
        };
        render_result_banner(
            frame,
            area,
            result_type(m, winner),
            &title,
            &message,
            "[Enter] Rematch  [Esc] Title",
        );
        return;
    }

    let Some(result) = m.last_result else {
        return;
    };
    let (title, message) = match (result.reason, result.winner) {
        (RoundEndReason::Draw, _) | (_, None) => ("draw".to_string(), "replaying round"),
        (reason, Some(slot)) => (
            format!("{} wins", m.fighter(slot).name()),
            if reason == RoundEndReason::Time { "time over" } else { "" },
        ),
    };
    render_result_banner(frame, area, result_type(m, result.winner), &title, message, "");
}
