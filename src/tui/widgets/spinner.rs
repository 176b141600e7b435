//! Spinner widget for the TUI.
//!
//! Animated indicator shown in the header while a connect or a question is
//! in flight.

use std::time::Instant;

/// Braille spinner frames for connecting.
const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Dot animation frames for LLM thinking.
const DOT_FRAMES: &[&str] = &["", ".", "..", "..."];

/// Animation speed in milliseconds per frame.
const FRAME_DURATION_MS: u128 = 100;

/// Type of spinner animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerType {
    Braille,
    Dots,
}

/// Spinner state for animated indicators.
#[derive(Debug, Clone)]
pub struct Spinner {
    spinner_type: SpinnerType,
    start_time: Instant,
    label: String,
}

impl Spinner {
    /// Creates a new spinner with the given type and label.
    pub fn new(spinner_type: SpinnerType, label: impl Into<String>) -> Self {
        Self {
            spinner_type,
            start_time: Instant::now(),
            label: label.into(),
        }
    }

    /// Spinner shown while a question is answered.
    pub fn thinking() -> Self {
        Self::new(SpinnerType::Dots, "Thinking")
    }

    /// Spinner shown while connecting to the database.
    pub fn connecting() -> Self {
        Self::new(SpinnerType::Braille, "Connecting to database")
    }

    /// Returns the current frame of the animation.
    pub fn frame(&self) -> &'static str {
        let elapsed_ms = self.start_time.elapsed().as_millis();
        let frame_index = (elapsed_ms / FRAME_DURATION_MS) as usize;

        match self.spinner_type {
            SpinnerType::Braille => BRAILLE_FRAMES[frame_index % BRAILLE_FRAMES.len()],
            SpinnerType::Dots => DOT_FRAMES[frame_index % DOT_FRAMES.len()],
        }
    }

    /// Returns the display string for the spinner.
    pub fn display(&self) -> String {
        match self.spinner_type {
            SpinnerType::Braille => format!("{} {}", self.frame(), self.label),
            SpinnerType::Dots => format!("{}{}", self.label, self.frame()),
        }
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }
}
