//! Sidebar widget for the TUI.
//!
//! Lists the query menu with the selected entry highlighted.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

/// Query menu.
pub struct Sidebar<'a> {
    labels: &'a [String],
    selected: usize,
    focused: bool,
}

impl<'a> Sidebar<'a> {
    /// Creates a new sidebar widget.
    pub fn new(labels: &'a [String], selected: usize, focused: bool) -> Self {
        Self {
            labels,
            selected,
            focused,
        }
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Select Query ");

        let items: Vec<ListItem> = self
            .labels
            .iter()
            .map(|label| ListItem::new(label.as_str()))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(if self.labels.is_empty() {
            None
        } else {
            Some(self.selected)
        });
        StatefulWidget::render(list, area, buf, &mut state);
    }
}
