//! Status bar: total-record metric and key hints.

use crate::tui::app::TotalState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const KEY_HINTS: &str = "↑/↓ select  Enter run  t total  Tab focus  q quit";

/// Bottom status line.
pub struct StatusBar<'a> {
    total: Option<&'a TotalState>,
}

impl<'a> StatusBar<'a> {
    pub fn new(total: Option<&'a TotalState>) -> Self {
        Self { total }
    }

    fn metric(&self) -> Span<'static> {
        match self.total {
            Some(TotalState::Loaded(n)) => Span::styled(
                format!(" Total Records: {n} "),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Some(TotalState::Failed(e)) => Span::styled(
                format!(" Total Records: unavailable ({e}) "),
                Style::default().fg(Color::Red),
            ),
            None => Span::styled(
                " Total Records: press t ",
                Style::default().fg(Color::DarkGray),
            ),
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            self.metric(),
            Span::raw(" "),
            Span::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;

    fn render(total: Option<&TotalState>) -> String {
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(total).render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn test_metric_states() {
        assert!(render(None).contains("press t"));
        assert!(render(Some(&TotalState::Loaded(1234))).contains("Total Records: 1234"));
        assert!(render(Some(&TotalState::Failed("timeout".into()))).contains("unavailable"));
    }
}
