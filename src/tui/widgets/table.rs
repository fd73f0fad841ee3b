//! Result grid for the results pane.
//!
//! Column widths follow the widest cell, numbers are right-aligned and NULLs
//! are dimmed. A one-line footer reports the row count and query time.

use crate::db::{TabularResult, Value};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, StatefulWidget, Table, TableState, Widget},
};

const MAX_COLUMN_WIDTH: usize = 40;
const MIN_COLUMN_WIDTH: usize = 4;

/// A query result drawn as a scrollable grid.
pub struct ResultTable<'a> {
    result: &'a TabularResult,
    /// First data row to draw.
    offset: usize,
}

impl<'a> ResultTable<'a> {
    pub fn new(result: &'a TabularResult) -> Self {
        Self { result, offset: 0 }
    }

    /// Skips the first `offset` data rows.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Display width of each column, clamped to a sane range.
    fn column_widths(&self) -> Vec<usize> {
        self.result
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let widest_value = self
                    .result
                    .rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|value| value.to_display_string().chars().count())
                    .max()
                    .unwrap_or(0);
                column
                    .name
                    .chars()
                    .count()
                    .max(widest_value)
                    .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    fn footer(&self) -> Line<'static> {
        let rows = self.result.row_count;
        Line::from(Span::styled(
            format!(
                "{rows} row{} returned ({}ms)",
                if rows == 1 { "" } else { "s" },
                self.result.execution_time.as_millis()
            ),
            Style::default().fg(Color::DarkGray),
        ))
    }
}

/// Shortens `s` to `width` characters, ending in an ellipsis when cut.
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut kept: String = s.chars().take(width.saturating_sub(1)).collect();
    kept.push('…');
    kept
}

fn value_cell(value: &Value, width: usize) -> Cell<'static> {
    let text = fit(&value.to_display_string(), width);
    let line = if value.is_numeric() {
        Line::from(text).alignment(Alignment::Right)
    } else {
        Line::from(text)
    };
    let style = if value.is_null() {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    } else {
        Style::default()
    };
    Cell::from(line).style(style)
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.result.columns.is_empty() {
            Line::from(Span::styled(
                "(empty result)",
                Style::default().fg(Color::DarkGray),
            ))
            .render(area, buf);
            return;
        }

        let [grid_area, footer_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let widths = self.column_widths();
        let header = Row::new(
            self.result
                .columns
                .iter()
                .zip(&widths)
                .map(|(column, &width)| Cell::from(fit(&column.name, width))),
        )
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.result.rows.iter().map(|row| {
            Row::new(
                row.iter()
                    .zip(&widths)
                    .map(|(value, &width)| value_cell(value, width)),
            )
        });

        let table = Table::new(rows, widths.iter().map(|&w| Constraint::Length(w as u16)))
            .header(header)
            .column_spacing(2)
            .flex(Flex::Start);
        let mut state = TableState::default().with_offset(self.offset);
        StatefulWidget::render(table, grid_area, buf, &mut state);

        self.footer().render(footer_area, buf);
    }
}
