//! Headless mode for scripted runs and screen tests.
//!
//! Runs the same App and Session as the interactive TUI against an in-memory
//! terminal, executing scripted events and capturing the final screen.

mod events;
mod output;

pub use events::{parse_size, Assertion, Event, EventParser};
pub use output::{HeadlessOutput, OutputFormat, ScreenRenderer};

use crate::app::Session;
use crate::config::ConnectionConfig;
use crate::error::{ChatError, Result};
use crate::tui::app::App;
use crate::tui::{draw, perform};
use crossterm::event::{KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    /// Output format.
    pub output_format: OutputFormat,
    /// Whether to stop on first assertion failure.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<PathBuf>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
        }
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen content as text.
    pub screen: String,
    /// Screen lines for JSON output.
    pub screen_lines: Vec<String>,
    /// Number of events executed.
    pub events_executed: usize,
    /// Total execution duration.
    pub duration: Duration,
    /// Number of assertions passed.
    pub assertions_passed: usize,
    /// Number of assertions failed.
    pub assertions_failed: usize,
    /// Application state snapshot.
    pub state: HeadlessState,
}

impl HeadlessResult {
    /// Returns the process exit code for this run.
    pub fn exit_code(&self) -> i32 {
        if self.assertions_failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Snapshot of application state for JSON output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HeadlessState {
    /// Current input text.
    pub input_text: String,
    /// Current focus.
    pub focus: String,
    /// Whether the app is processing.
    pub is_processing: bool,
    /// Number of messages in chat.
    pub message_count: usize,
    /// Whether the app is still running.
    pub running: bool,
    /// Whether a database connection is active.
    pub is_connected: bool,
}

impl HeadlessState {
    fn from_app(app: &App) -> Self {
        Self {
            input_text: app.input.text.clone(),
            focus: format!("{:?}", app.focus),
            is_processing: app.is_processing,
            message_count: app.messages.len(),
            running: app.running,
            is_connected: app.is_connected,
        }
    }
}

/// Runs the TUI in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    session: Session,
    events: Vec<Event>,
    assertions_passed: usize,
    assertions_failed: usize,
}

impl HeadlessRunner {
    /// Creates a new headless runner.
    pub fn new(config: HeadlessConfig, prefill: &ConnectionConfig, session: Session) -> Result<Self> {
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend)
            .map_err(|e| ChatError::internal(format!("Failed to create test terminal: {e}")))?;

        Ok(Self {
            config,
            terminal,
            app: App::new(prefill),
            session,
            events: Vec::new(),
            assertions_passed: 0,
            assertions_failed: 0,
        })
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.events = EventParser::new().parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file, or stdin when `path` is `-`.
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            std::io::read_to_string(std::io::stdin())
                .map_err(|e| ChatError::internal(format!("Failed to read stdin: {e}")))?
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| ChatError::internal(format!("Failed to read script file: {e}")))?
        };

        self.load_events(&content)
    }

    /// Runs the scripted events and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        let start_time = Instant::now();
        draw(&mut self.terminal, &self.app)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in events {
            debug!(event = %event, "Headless event");

            match event {
                Event::Key(key) => self.press(key).await?,
                Event::Type(text) => {
                    for c in text.chars() {
                        self.press(KeyEvent::new(
                            crossterm::event::KeyCode::Char(c),
                            KeyModifiers::empty(),
                        ))
                        .await?;
                    }
                }
                Event::Wait(duration) => tokio::time::sleep(duration).await,
                Event::Resize(w, h) => self.terminal.backend_mut().resize(w, h),
                Event::Assert(assertion) => {
                    let screen = self.render_screen()?;
                    if assertion.check(&screen) {
                        self.assertions_passed += 1;
                    } else {
                        warn!(assertion = ?assertion, "Assertion failed");
                        self.assertions_failed += 1;
                        if self.config.fail_fast {
                            events_executed += 1;
                            break;
                        }
                    }
                }
            }

            events_executed += 1;
            draw(&mut self.terminal, &self.app)?;

            if !self.app.running {
                break;
            }
        }

        let screen = self.render_screen()?;
        let screen_lines = screen.lines().map(String::from).collect();

        if let Err(e) = self.session.close().await {
            warn!("Error closing database connection: {}", e);
        }

        Ok(HeadlessResult {
            screen,
            screen_lines,
            events_executed,
            duration: start_time.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.assertions_failed,
            state: HeadlessState::from_app(&self.app),
        })
    }

    async fn press(&mut self, key: KeyEvent) -> Result<()> {
        let action = self.app.handle_key(key);
        let terminal = &mut self.terminal;
        perform(&mut self.app, &mut self.session, action, |app| draw(terminal, app)).await
    }

    /// Renders the current screen to a string.
    fn render_screen(&mut self) -> Result<String> {
        draw(&mut self.terminal, &self.app)?;
        Ok(ScreenRenderer::render(self.terminal.backend().buffer()))
    }
}

/// Runs a headless script and writes the formatted result.
///
/// Returns the process exit code: 1 when any assertion failed.
pub async fn run_headless(
    config: HeadlessConfig,
    prefill: &ConnectionConfig,
    session: Session,
    events: Option<&str>,
    script: Option<&str>,
) -> Result<i32> {
    let mut runner = HeadlessRunner::new(config.clone(), prefill, session)?;

    if let Some(events) = events {
        runner.load_events(events)?;
    } else if let Some(path) = script {
        runner.load_script(path)?;
    }

    let result = runner.run().await?;
    let output = HeadlessOutput::new(config.output_format).format(&result);

    match config.output_file {
        Some(ref path) => std::fs::write(path, &output)
            .map_err(|e| ChatError::internal(format!("Failed to write output file: {e}")))?,
        None => print!("{}", output),
    }

    Ok(result.exit_code())
}
