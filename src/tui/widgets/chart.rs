//! Bar chart widget for aggregate results.
//!
//! Each category row becomes a group of horizontal bars, one per numeric
//! series, coloured by series.

use crate::db::TabularResult;
use crate::present::ChartHint;
use ratatui::{
    buffer::Buffer,
    layout::{Direction, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget},
};

const SERIES_COLORS: [Color; 4] = [Color::Cyan, Color::Yellow, Color::Magenta, Color::Green];

fn series_color(index: usize) -> Color {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Bar chart over the numeric series of a result.
pub struct ResultChart<'a> {
    result: &'a TabularResult,
    hint: &'a ChartHint,
}

impl<'a> ResultChart<'a> {
    pub fn new(result: &'a TabularResult, hint: &'a ChartHint) -> Self {
        Self { result, hint }
    }

    /// One group per category. Values are scaled to integers on a scale
    /// shared by all series; the text on each bar shows the real value.
    fn groups(&self) -> Vec<BarGroup<'a>> {
        let rows = self.hint.groups(self.result);
        let scale = bar_scale(
            rows.iter()
                .flat_map(|(_, values)| values.iter().flatten().copied()),
        );
        let several = self.hint.series_columns.len() > 1;

        rows.into_iter()
            .map(|(label, values)| {
                let bars: Vec<Bar<'a>> = values
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, value)| {
                        let value = value?;
                        let color = series_color(i);
                        let bar = Bar::default()
                            .value((value.max(0.0) * scale).round() as u64)
                            .text_value(format_value(value))
                            .style(Style::default().fg(color))
                            .value_style(Style::default().fg(Color::Black).bg(color));
                        Some(match self.hint.series_columns.get(i) {
                            Some(series) if several => bar.label(Line::from(series.clone())),
                            _ => bar,
                        })
                    })
                    .collect();
                BarGroup::default().label(Line::from(label)).bars(&bars)
            })
            .collect()
    }

    /// Series names in their bar colours, followed by the category column.
    fn title(&self) -> Line<'a> {
        if self.hint.series_columns.is_empty() {
            return Line::from(" Chart ");
        }
        let mut spans = vec![Span::raw(" ")];
        for (i, series) in self.hint.series_columns.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(", "));
            }
            spans.push(Span::styled(series.clone(), Style::default().fg(series_color(i))));
        }
        spans.push(Span::raw(format!(" by {} ", self.hint.category_column)));
        Line::from(spans)
    }
}

/// Integers chart as-is; fractional values are scaled up to keep precision.
fn bar_scale(values: impl Iterator<Item = f64>) -> f64 {
    let mut values = values;
    if values.any(|v| v.fract() != 0.0) {
        100.0
    } else {
        1.0
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

impl Widget for ResultChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(self.title());

        let groups = self.groups();
        if groups.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "Nothing to chart",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block)
            .render(area, buf);
            return;
        }

        let mut chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .group_gap(1);
        for group in groups {
            chart = chart.data(group);
        }
        chart.render(area, buf);
    }
}
