//! Shared UI components: screen frame, status bar, result overlay.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Layout areas returned by `game_layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLayout {
    /// HUD strip at the top, inside the outer border.
    pub hud: Rect,
    /// Main content area (the playfield).
    pub content: Rect,
    /// Status bar area (2 lines) at the bottom, inside the outer border.
    pub status_bar: Rect,
}

/// Split a screen into HUD, content and a 2-line status bar inside a border.
///
/// ```text
/// ┌─ Title ─────────────────────────┐
/// │ [hud]                           │
/// │   [content area]                │
/// │ [status bar - 2 lines]          │
/// └─────────────────────────────────┘
/// ```
///
/// Pure so that mouse coordinates can be mapped without a frame.
pub fn game_layout(area: Rect, hud_height: u16) -> GameLayout {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(hud_height),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(inner);

    GameLayout {
        hud: chunks[0],
        content: chunks[1],
        status_bar: chunks[2],
    }
}

/// Clear `area`, draw the titled outer border and return the layout inside it.
pub fn create_game_layout(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
    hud_height: u16,
) -> GameLayout {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    frame.render_widget(block, area);

    game_layout(area, hud_height)
}

/// One key hint in the status bar, drawn as a keycap followed by its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

pub const fn hint(key: &'static str, action: &'static str) -> KeyHint {
    KeyHint { key, action }
}

impl KeyHint {
    /// Cells taken by ` key ` plus ` action `.
    fn width(&self) -> usize {
        self.key.chars().count() + self.action.chars().count() + 4
    }
}

/// Bottom bar of every screen.
///
/// Line 1 is the message on the left and `detail` (round clock, difficulty,
/// page) on the right. Line 2 packs key hints from the left and drops the
/// ones that do not fit, so narrow terminals keep the first bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBar<'a> {
    pub message: &'a str,
    pub color: Color,
    pub detail: String,
    pub hints: &'a [KeyHint],
}

/// How many leading hints fit in `width` cells.
pub fn hints_that_fit(hints: &[KeyHint], width: u16) -> usize {
    let mut used = 0;
    hints
        .iter()
        .take_while(|h| {
            used += h.width();
            used <= width as usize
        })
        .count()
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, bar: &StatusBar) {
    if area.height == 0 {
        return;
    }
    let top = Rect { height: 1, ..area };
    let message = Span::styled(
        bar.message,
        Style::default().fg(bar.color).add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(Line::from(message)), top);
    if !bar.detail.is_empty() {
        let detail = Paragraph::new(bar.detail.as_str())
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Right);
        frame.render_widget(detail, top);
    }

    if area.height < 2 {
        return;
    }
    let keycap = Style::default().fg(Color::Black).bg(Color::Gray);
    let action = Style::default().fg(Color::DarkGray);
    let spans: Vec<Span> = bar.hints[..hints_that_fit(bar.hints, area.width)]
        .iter()
        .flat_map(|h| {
            [
                Span::styled(format!(" {} ", h.key), keycap),
                Span::styled(format!(" {} ", h.action), action),
            ]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect {
            y: area.y + 1,
            height: 1,
            ..area
        },
    );
}

/// Result type for the shared overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResultType {
    Win,
    Loss,
    Draw,
}

impl GameResultType {
    pub fn color(self) -> Color {
        match self {
            GameResultType::Win => Color::Green,
            GameResultType::Loss => Color::Red,
            GameResultType::Draw => Color::Yellow,
        }
    }
}

/// Centered `width` x `height` box inside `area`.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Render a centered result banner that leaves the playfield visible around it.
pub fn render_result_banner(
    frame: &mut Frame,
    area: Rect,
    result_type: GameResultType,
    title: &str,
    message: &str,
    hint: &str,
) {
    let banner = centered_rect(area, 40, 7);
    frame.render_widget(Clear, banner);

    let title_color = result_type.color();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(title_color));
    let inner = block.inner(banner);
    frame.render_widget(block, banner);

    let mut lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::White))),
    ];
    if !hint.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(text, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_layout_fills_inner_area() {
        let layout = game_layout(Rect::new(0, 0, 80, 30), 3);
        assert_eq!(layout.hud, Rect::new(1, 1, 78, 3));
        assert_eq!(layout.content, Rect::new(1, 4, 78, 23));
        assert_eq!(layout.status_bar, Rect::new(1, 27, 78, 2));
    }

    #[test]
    fn test_hints_drop_from_the_end_when_narrow() {
        let hints = [hint("Enter", "Fight"), hint("Esc", "Back")];
        // " Enter " + " Fight " = 14 cells, " Esc " + " Back " = 11 cells.
        assert_eq!(hints_that_fit(&hints, 80), 2);
        assert_eq!(hints_that_fit(&hints, 25), 2);
        assert_eq!(hints_that_fit(&hints, 24), 1);
        assert_eq!(hints_that_fit(&hints, 13), 0);
        assert_eq!(hints_that_fit(&[], 80), 0);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        assert_eq!(centered_rect(Rect::new(0, 0, 80, 24), 40, 7), Rect::new(20, 8, 40, 7));
        assert_eq!(centered_rect(Rect::new(2, 2, 10, 4), 40, 7), Rect::new(2, 2, 10, 4));
    }
}
