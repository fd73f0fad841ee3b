//! Terminal User Interface for quake-glance.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod events;
mod ui;
pub mod widgets;

pub use app::{Action, App, TotalState};
pub use events::{Event, EventHandler};

use crate::app::Dashboard;
use crate::error::{GlanceError, Result};
use crate::present::RenderInstruction;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::info;

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| GlanceError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| GlanceError::internal(format!("Failed to enter alternate screen: {e}")))?;

        Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| GlanceError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| GlanceError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| GlanceError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| GlanceError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    fn draw(&mut self, app: &App) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| GlanceError::internal(format!("Failed to draw: {e}")))?;
        Ok(())
    }

    /// Runs the event loop until the user quits.
    pub async fn run(&mut self, dashboard: &Dashboard) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let labels = dashboard.labels().into_iter().map(String::from).collect();
        let mut app = App::new(labels, dashboard.connection_info());

        let result = self.run_event_loop(&mut app, dashboard).await;

        let _ = panic::take_hook();

        result
    }

    async fn run_event_loop(&mut self, app: &mut App, dashboard: &Dashboard) -> Result<()> {
        while app.running {
            self.draw(app)?;

            let Event::Key(key) = self.event_handler.next_async().await? else {
                continue;
            };

            match app.handle_key(key) {
                Action::Run(label) => {
                    app.is_processing = true;
                    self.draw(app)?;
                    let instruction = match dashboard.run(&label).await {
                        Ok(instruction) => instruction,
                        Err(e) => RenderInstruction::ShowError(e.to_string()),
                    };
                    app.show(label, instruction);
                    app.is_processing = false;
                }
                Action::ShowTotal => {
                    app.is_processing = true;
                    self.draw(app)?;
                    let total = match dashboard.total_count().await {
                        Ok(n) => TotalState::Loaded(n),
                        Err(e) => TotalState::Failed(e.to_string()),
                    };
                    app.set_total(total);
                    app.is_processing = false;
                }
                Action::Quit => info!("Quitting"),
                Action::None => {}
            }
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the TUI against `dashboard`.
pub async fn run(dashboard: &Dashboard) -> Result<()> {
    let mut tui = Tui::new()?;
    tui.run(dashboard).await
}
