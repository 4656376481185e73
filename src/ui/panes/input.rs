//! Input line rendering with the mode tabs in its title

use crate::history::Mode;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the input line for `mode`
pub fn render_input_pane(frame: &mut Frame, area: Rect, mode: Mode, input: &str) {
    let mut title = vec![Span::raw(" ")];
    for candidate in Mode::ALL {
        let style = if candidate == mode {
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.comment)
        };
        title.push(Span::styled(format!(" {} ", candidate), style));
        title.push(Span::raw(" "));
    }

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(DEFAULT_THEME.border_focused)
                .add_modifier(Modifier::BOLD),
        );

    let cursor = Span::styled(
        "█",
        Style::default()
            .fg(DEFAULT_THEME.secondary)
            .add_modifier(Modifier::SLOW_BLINK),
    );
    let line = if input.is_empty() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(DEFAULT_THEME.secondary)),
            cursor,
            Span::styled(
                format!(" {}", mode.placeholder()),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
        ])
    } else {
        let mut spans = vec![Span::styled("> ", Style::default().fg(DEFAULT_THEME.secondary))];
        spans.extend(super::steps::highlight_step(input).spans);
        spans.push(cursor);
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}
