//! Application state for the TUI.
//!
//! Pure state and key handling; all database work happens in the runner,
//! driven by the [`Action`] a key press returns.

use crate::present::RenderInstruction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Menu,
    Results,
}

impl Focus {
    /// Cycles to the next focus panel.
    pub fn next(self) -> Self {
        match self {
            Self::Menu => Self::Results,
            Self::Results => Self::Menu,
        }
    }
}

/// Work the runner must do in response to input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Run the query behind this label.
    Run(String),
    /// Fetch the total-record metric.
    ShowTotal,
    Quit,
}

/// State of the total-record metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TotalState {
    Loaded(i64),
    Failed(String),
}

/// The query currently on screen.
#[derive(Debug, Clone)]
pub struct Shown {
    pub label: String,
    pub instruction: RenderInstruction,
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus panel.
    pub focus: Focus,
    /// Menu labels in display order.
    pub labels: Vec<String>,
    /// Index of the highlighted menu entry.
    pub selected: usize,
    /// Last query result.
    pub shown: Option<Shown>,
    /// Total-record metric, once requested.
    pub total: Option<TotalState>,
    /// Scroll offset of the result table, in rows.
    pub result_scroll: usize,
    /// True while a query is running.
    pub is_processing: bool,
    /// Display string for the connection.
    pub connection_info: String,
}

impl App {
    /// Creates the state for a menu.
    pub fn new(labels: Vec<String>, connection_info: impl Into<String>) -> Self {
        Self {
            running: true,
            focus: Focus::default(),
            labels,
            selected: 0,
            shown: None,
            total: None,
            result_scroll: 0,
            is_processing: false,
            connection_info: connection_info.into(),
        }
    }

    /// The highlighted label.
    pub fn selected_label(&self) -> Option<&str> {
        self.labels.get(self.selected).map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.labels.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.labels.len().saturating_sub(1);
    }

    /// Shows a new result and resets the table scroll.
    pub fn show(&mut self, label: impl Into<String>, instruction: RenderInstruction) {
        self.shown = Some(Shown {
            label: label.into(),
            instruction,
        });
        self.result_scroll = 0;
    }

    pub fn set_total(&mut self, total: TotalState) {
        self.total = Some(total);
    }

    fn scroll_down(&mut self, rows: usize) {
        let max = self
            .shown
            .as_ref()
            .and_then(|s| s.instruction.result())
            .map(|r| r.row_count.saturating_sub(1))
            .unwrap_or(0);
        self.result_scroll = (self.result_scroll + rows).min(max);
    }

    fn scroll_up(&mut self, rows: usize) {
        self.result_scroll = self.result_scroll.saturating_sub(rows);
    }

    /// Applies a key press and returns the work it asks for.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.running = false;
            return Action::Quit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                Action::Quit
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                Action::None
            }
            KeyCode::Char('t') => Action::ShowTotal,
            KeyCode::Enter => match self.selected_label() {
                Some(label) => Action::Run(label.to_string()),
                None => Action::None,
            },
            KeyCode::Up | KeyCode::Char('k') => {
                match self.focus {
                    Focus::Menu => self.select_previous(),
                    Focus::Results => self.scroll_up(1),
                }
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                match self.focus {
                    Focus::Menu => self.select_next(),
                    Focus::Results => self.scroll_down(1),
                }
                Action::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.select_first();
                Action::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.select_last();
                Action::None
            }
            KeyCode::PageDown => {
                self.scroll_down(10);
                Action::None
            }
            KeyCode::PageUp => {
                self.scroll_up(10);
                Action::None
            }
            _ => Action::None,
        }
    }
}
