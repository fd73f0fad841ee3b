//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, Focus, Shown};
use super::widgets::{
    chart::ResultChart, header::Header, sidebar::Sidebar, status::StatusBar, table::ResultTable,
};
use crate::present::RenderInstruction;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Content (menu + results)
            Constraint::Length(1), // Status
        ])
        .split(frame.area());

    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_layout[1]);

    frame.render_widget(
        Header::new(&app.connection_info, app.is_processing),
        main_layout[0],
    );
    frame.render_widget(
        Sidebar::new(&app.labels, app.selected, app.focus == Focus::Menu),
        content_layout[0],
    );
    render_results(frame, content_layout[1], app);
    frame.render_widget(StatusBar::new(app.total.as_ref()), main_layout[2]);
}

/// Renders the result panel: table, optional chart, or a notice.
fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.focus == Focus::Results {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let Some(Shown { label, instruction }) = &app.shown else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Results ");
        let hint = Paragraph::new(Line::from(Span::styled(
            "Select a query and press Enter.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {label} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match instruction {
        RenderInstruction::ShowTable { result, chart } => {
            let table = ResultTable::new(result).offset(app.result_scroll);
            match chart {
                Some(hint) => {
                    let split = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                        .split(inner);
                    frame.render_widget(table, split[0]);
                    frame.render_widget(ResultChart::new(result, hint), split[1]);
                }
                None => frame.render_widget(table, inner),
            }
        }
        other => {
            let style = if other.is_error() {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Yellow)
            };
            let notice = Paragraph::new(Line::from(Span::styled(
                other.message().unwrap_or_default(),
                style,
            )))
            .wrap(Wrap { trim: true });
            frame.render_widget(notice, inner);
        }
    }
}
