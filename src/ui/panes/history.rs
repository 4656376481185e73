//! History pane rendering

use crate::history::History;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the history pane, newest entry last
pub fn render_history_pane(
    frame: &mut Frame,
    area: Rect,
    history: &History,
    selected: Option<usize>,
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
        .title(format!(" History ({}/{}) ", history.len(), history.limit()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if history.is_empty() {
        let paragraph = Paragraph::new("(no history)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let all_items: Vec<ListItem> = history
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let mut style = Style::default().fg(if entry.is_error() {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            });
            if selected == Some(idx) {
                style = style
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD);
            }
            ListItem::new(format!("[{}] {}", entry.mode, entry.summary())).style(style)
        })
        .collect();

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Scroll only as far as needed to show the selection
    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        if let Some(selected) = selected {
            if selected < *scroll_offset {
                *scroll_offset = selected;
            } else if selected >= *scroll_offset + visible_height {
                *scroll_offset = selected + 1 - visible_height;
            }
        }
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
