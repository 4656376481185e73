//! Steps pane rendering with expression highlighting
//!
//! Shows the trace of the selected history entry up to the current step,
//! numbering each line and marking the current one. When the last step is
//! reached and the computation failed, the error follows the trace.

use crate::history::HistoryEntry;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const FUNCTION_NAMES: [&str; 5] = ["sin", "cos", "tan", "log", "diff"];

/// Split one rendered step into styled spans
pub fn highlight_step(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];
        let run_end = |pred: &dyn Fn(char) -> bool| {
            let mut j = i;
            while j < chars.len() && pred(chars[j].1) {
                j += 1;
            }
            (j, chars.get(j).map_or(line.len(), |(at, _)| *at))
        };

        if c.is_ascii_digit() || c == '.' {
            let (next, end) = run_end(&|c| c.is_ascii_digit() || c == '.');
            spans.push(Span::styled(
                &line[start..end],
                Style::default().fg(DEFAULT_THEME.number),
            ));
            i = next;
        } else if c.is_ascii_alphabetic() {
            let (next, end) = run_end(&|c| c.is_ascii_alphabetic());
            let word = &line[start..end];
            let style = if FUNCTION_NAMES.contains(&word) {
                Style::default().fg(DEFAULT_THEME.function)
            } else if word.len() == 1 {
                Style::default().fg(DEFAULT_THEME.variable)
            } else {
                // Prefixes such as "Expression:" and solution messages
                Style::default().fg(DEFAULT_THEME.comment)
            };
            spans.push(Span::styled(word, style));
            i = next;
        } else {
            let style = match c {
                '+' | '-' | '*' | '/' | '^' | '=' | '!' => {
                    Style::default().fg(DEFAULT_THEME.operator)
                }
                '(' | ')' | '[' | ']' | '{' | '}' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(&line[start..start + c.len_utf8()], style));
            i += 1;
        }
    }

    Line::from(spans)
}

/// Render the steps pane
pub fn render_steps_pane(
    frame: &mut Frame,
    area: Rect,
    entry: Option<&HistoryEntry>,
    current_step: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Steps ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let Some(entry) = entry else {
        let paragraph = Paragraph::new("(type a request and press Enter)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let at_end = current_step + 1 >= entry.steps.len();
    let mut lines: Vec<Line> = entry
        .steps
        .iter()
        .enumerate()
        .take(current_step + 1)
        .map(|(idx, step)| {
            let is_current = idx == current_step;
            let (num_style, base) = if is_current {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.current_line_bg),
                )
            } else {
                (Style::default().fg(DEFAULT_THEME.comment), Style::default())
            };

            let mut content = highlight_step(step);
            for span in &mut content.spans {
                span.style = span.style.patch(base);
            }
            let marker = if is_current { "▶" } else { " " };
            let mut spans = vec![Span::styled(format!("{}{:3} ", marker, idx), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    if at_end {
        if let Err(err) = &entry.outcome {
            lines.push(Line::from(Span::styled(
                format!(" {}: {} ", err.category(), err),
                Style::default()
                    .bg(DEFAULT_THEME.error)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )));
        }
    }

    // Keep the current step on screen
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let total = lines.len();
    *scroll_offset = total.saturating_sub(visible_height);

    let visible: Vec<Line> = lines.into_iter().skip(*scroll_offset).collect();
    frame.render_widget(Paragraph::new(visible).block(block), area);
}
