//! Terminal user interface.
//!
//! Provides the main TUI application loop using ratatui and crossterm, and the
//! action runner shared with headless mode.

pub mod app;
mod events;
pub mod headless;
pub mod text;
mod ui;
pub mod widgets;

pub use app::{Action, App};
pub use events::{Event, EventHandler};

use crate::app::Session;
use crate::config::ConnectionConfig;
use crate::error::{ChatError, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::future::Future;
use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;
use tracing::{info, warn};

/// How often the screen is redrawn while an action is in flight.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Draws one frame of the UI.
pub fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &App) -> Result<()> {
    terminal
        .draw(|frame| ui::render(frame, app))
        .map_err(|e| ChatError::internal(format!("Failed to draw: {e}")))?;
    Ok(())
}

/// Carries out the work a key press requested.
///
/// The session call is awaited to completion. `redraw` runs once before it
/// starts and then on a timer so the spinner keeps moving.
pub async fn perform<F>(
    app: &mut App,
    session: &mut Session,
    action: Action,
    mut redraw: F,
) -> Result<()>
where
    F: FnMut(&App) -> Result<()>,
{
    match action {
        Action::None => {}
        Action::Connect(config) => {
            info!(target_db = %config.display_string(), "Connecting");
            app.begin_connect();
            let status = drive(session.connect(&config), app, &mut redraw).await?;
            app.finish_connect(status, session.connection_label());
        }
        Action::Ask(question) => {
            app.begin_ask();
            let outcome = drive(session.ask(&question), app, &mut redraw).await?;
            app.finish_ask(&outcome);
        }
    }
    Ok(())
}

async fn drive<T, F>(work: impl Future<Output = T>, app: &App, redraw: &mut F) -> Result<T>
where
    F: FnMut(&App) -> Result<()>,
{
    redraw(app)?;

    tokio::pin!(work);
    let mut ticker = tokio::time::interval(REDRAW_INTERVAL);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            output = &mut work => return Ok(output),
            _ = ticker.tick() => redraw(app)?,
        }
    }
}

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
            .map_err(|e| ChatError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| ChatError::internal(format!("Failed to enter alternate screen: {e}")))?;

        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
            .map_err(|e| ChatError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| ChatError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| ChatError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| ChatError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the event loop until the user quits.
    pub async fn run(&mut self, app: &mut App, session: &mut Session) -> Result<()> {
        // Restore the terminal before the panic message is printed.
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let result = self.run_event_loop(app, session).await;

        if let Err(e) = session.close().await {
            warn!("Error closing database connection: {}", e);
        }

        let _ = panic::take_hook();

        result
    }

    async fn run_event_loop(&mut self, app: &mut App, session: &mut Session) -> Result<()> {
        while app.running {
            draw(&mut self.terminal, app)?;

            let Event::Key(key) = self.event_handler.next()? else {
                continue;
            };

            let action = app.handle_key(key);
            let terminal = &mut self.terminal;
            perform(app, session, action, |app| draw(terminal, app)).await?;
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive TUI with the form prefilled from `prefill`.
pub async fn run_async(prefill: &ConnectionConfig, mut session: Session) -> Result<()> {
    let mut app = App::new(prefill);
    let mut tui = Tui::new()?;
    info!("TUI started");
    tui.run(&mut app, &mut session).await
}
