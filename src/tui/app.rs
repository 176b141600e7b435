//! Application state for the TUI.
//!
//! Contains the main App struct and related types for managing UI state.
//! The App never talks to the database or the LLM itself: key handling
//! yields an [`Action`] that the event loop carries out against the session.

use crate::app::{AskOutcome, ConnectStatus, FAILURE_WARNINGS};
use crate::config::ConnectionConfig;
use crate::llm::types::GREETING;
use crate::tui::text::find_word_start_backward;
use crate::tui::widgets::spinner::Spinner;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A field of the connection form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Host,
    Port,
    User,
    Password,
    Database,
}

impl FormField {
    /// All fields in display order.
    pub const ALL: [FormField; 5] = [
        Self::Host,
        Self::Port,
        Self::User,
        Self::Password,
        Self::Database,
    ];

    /// Returns the field label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Host => "Host",
            Self::Port => "Port",
            Self::User => "User",
            Self::Password => "Password",
            Self::Database => "Database",
        }
    }

    /// Returns the help text shown next to the focused field.
    pub fn help(self) -> &'static str {
        match self {
            Self::Host => "Name of Host",
            Self::Port => "Port Number",
            Self::User => "Name of user",
            Self::Password => "Information is removed after every session",
            Self::Database => "Name of the Database",
        }
    }
}

/// Which element currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// A field of the connection form.
    Field(FormField),
    /// The Connect button.
    Connect,
    /// The message input.
    Input,
    /// The chat panel (scrolling).
    Chat,
}

impl Default for Focus {
    fn default() -> Self {
        Self::Field(FormField::Host)
    }
}

impl Focus {
    /// Cycles to the next focusable element.
    pub fn next(self) -> Self {
        match self {
            Self::Field(FormField::Host) => Self::Field(FormField::Port),
            Self::Field(FormField::Port) => Self::Field(FormField::User),
            Self::Field(FormField::User) => Self::Field(FormField::Password),
            Self::Field(FormField::Password) => Self::Field(FormField::Database),
            Self::Field(FormField::Database) => Self::Connect,
            Self::Connect => Self::Input,
            Self::Input => Self::Chat,
            Self::Chat => Self::Field(FormField::Host),
        }
    }

    /// Cycles to the previous focusable element.
    pub fn prev(self) -> Self {
        match self {
            Self::Field(FormField::Host) => Self::Chat,
            Self::Field(FormField::Port) => Self::Field(FormField::Host),
            Self::Field(FormField::User) => Self::Field(FormField::Port),
            Self::Field(FormField::Password) => Self::Field(FormField::User),
            Self::Field(FormField::Database) => Self::Field(FormField::Password),
            Self::Connect => Self::Field(FormField::Database),
            Self::Input => Self::Connect,
            Self::Chat => Self::Input,
        }
    }

    /// Returns true if focus is somewhere in the sidebar.
    pub fn in_sidebar(self) -> bool {
        matches!(self, Self::Field(_) | Self::Connect)
    }
}

/// A message in the chat panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessage {
    /// A question typed by the user.
    Human(String),
    /// An answer from the assistant.
    Assistant(String),
    /// The SQL behind the preceding answer, shown as a caption.
    Sql(String),
    /// A warning shown when a question could not be answered.
    Warning(String),
}

impl ChatMessage {
    /// Returns the label shown above the message, if any.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Human(_) => Some("Human"),
            Self::Assistant(_) => Some("AI"),
            Self::Sql(_) | Self::Warning(_) => None,
        }
    }

    /// Returns the message text.
    pub fn text(&self) -> &str {
        match self {
            Self::Human(t) | Self::Assistant(t) | Self::Sql(t) | Self::Warning(t) => t,
        }
    }
}

/// Single-line text editing state.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    /// Current input text.
    pub text: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl InputState {
    /// Creates a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an input prefilled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.text.insert(idx, c);
        self.cursor += 1;
    }

    /// Inserts a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert(c);
        }
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.text.remove(idx);
        }
    }

    /// Deletes the character at the cursor (delete key).
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let idx = self.byte_index(self.cursor);
            self.text.remove(idx);
        }
    }

    /// Deletes the word before the cursor (Ctrl+W).
    pub fn delete_word(&mut self) {
        let start = find_word_start_backward(&self.text, self.cursor);
        let from = self.byte_index(start);
        let to = self.byte_index(self.cursor);
        self.text.replace_range(from..to, "");
        self.cursor = start;
    }

    /// Moves the cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor to the start of the input.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the end of the input.
    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Clears the input and returns the previous text.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// Clears the input.
    pub fn clear(&mut self) {
        self.take();
    }

    /// Returns true if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Applies an editing key. Returns false if the key is not an edit.
    fn edit(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('w') if ctrl => self.delete_word(),
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char(c) if !ctrl => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => return false,
        }
        true
    }
}

/// The sidebar connection form.
#[derive(Debug, Default, Clone)]
pub struct SidebarForm {
    pub host: InputState,
    pub port: InputState,
    pub user: InputState,
    pub password: InputState,
    pub database: InputState,
    /// Outcome of the last connect attempt.
    pub status: Option<ConnectStatus>,
}

impl SidebarForm {
    /// Creates a form prefilled from a connection config.
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            host: InputState::with_text(&config.host),
            port: InputState::with_text(&config.port),
            user: InputState::with_text(&config.user),
            password: InputState::with_text(&config.password),
            database: InputState::with_text(&config.database),
            status: None,
        }
    }

    /// Returns the state of a field.
    pub fn field(&self, field: FormField) -> &InputState {
        match field {
            FormField::Host => &self.host,
            FormField::Port => &self.port,
            FormField::User => &self.user,
            FormField::Password => &self.password,
            FormField::Database => &self.database,
        }
    }

    /// Returns the mutable state of a field.
    pub fn field_mut(&mut self, field: FormField) -> &mut InputState {
        match field {
            FormField::Host => &mut self.host,
            FormField::Port => &mut self.port,
            FormField::User => &mut self.user,
            FormField::Password => &mut self.password,
            FormField::Database => &mut self.database,
        }
    }

    /// Builds a connection config from the current values.
    pub fn to_config(&self) -> ConnectionConfig {
        ConnectionConfig::new(
            self.host.text.trim(),
            self.port.text.trim(),
            self.user.text.as_str(),
            self.password.text.as_str(),
            self.database.text.trim(),
        )
    }
}

/// Work the event loop must carry out after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do.
    None,
    /// Open a connection with the form values.
    Connect(ConnectionConfig),
    /// Answer a question.
    Ask(String),
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus.
    pub focus: Focus,
    /// Message input state.
    pub input: InputState,
    /// Sidebar form state.
    pub form: SidebarForm,
    /// Chat messages.
    pub messages: Vec<ChatMessage>,
    /// Chat scroll offset (lines from bottom).
    pub chat_scroll: usize,
    /// Database connection info for display.
    pub connection_info: Option<String>,
    /// Whether a database connection is active.
    pub is_connected: bool,
    /// Whether a connect or a question is in flight.
    pub is_processing: bool,
    /// Spinner shown in the header while processing.
    pub spinner: Option<Spinner>,
}

impl App {
    /// Creates a new App with the form prefilled.
    pub fn new(prefill: &ConnectionConfig) -> Self {
        Self {
            running: true,
            focus: Focus::default(),
            input: InputState::new(),
            form: SidebarForm::from_config(prefill),
            messages: vec![ChatMessage::Assistant(GREETING.to_string())],
            chat_scroll: 0,
            connection_info: None,
            is_connected: false,
            is_processing: false,
            spinner: None,
        }
    }

    /// Adds a message to the chat and scrolls to the bottom.
    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.chat_scroll = 0;
    }

    /// Handles a key press and returns the work it requests.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
                return Action::None;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Action::None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return Action::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Field(field) => self.handle_field_key(field, key),
            Focus::Connect => self.handle_connect_key(key),
            Focus::Input => self.handle_input_key(key),
            Focus::Chat => {
                self.handle_chat_key(key);
                Action::None
            }
        }
    }

    fn handle_field_key(&mut self, field: FormField, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::Up => self.focus = self.focus.prev(),
            _ => {
                self.form.field_mut(field).edit(key);
            }
        }
        Action::None
    }

    fn handle_connect_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Action::Connect(self.form.to_config()),
            KeyCode::Up => {
                self.focus = self.focus.prev();
                Action::None
            }
            KeyCode::Down => {
                self.focus = self.focus.next();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Esc => {
                self.input.clear();
                Action::None
            }
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown => {
                self.handle_chat_key(key);
                Action::None
            }
            _ => {
                self.input.edit(key);
                Action::None
            }
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.chat_scroll = self.chat_scroll.saturating_add(1),
            KeyCode::Down => self.chat_scroll = self.chat_scroll.saturating_sub(1),
            KeyCode::PageUp => self.chat_scroll = self.chat_scroll.saturating_add(10),
            KeyCode::PageDown => self.chat_scroll = self.chat_scroll.saturating_sub(10),
            // Clamped during render.
            KeyCode::Home => self.chat_scroll = usize::MAX,
            KeyCode::End => self.chat_scroll = 0,
            _ => {}
        }
    }

    /// Takes the input text as a question.
    ///
    /// Blank input is discarded without producing work.
    pub fn submit_input(&mut self) -> Action {
        let text = self.input.take();
        if text.trim().is_empty() {
            return Action::None;
        }
        self.add_message(ChatMessage::Human(text.clone()));
        Action::Ask(text)
    }

    /// Marks the start of a connect attempt.
    pub fn begin_connect(&mut self) {
        self.is_processing = true;
        self.spinner = Some(Spinner::connecting());
    }

    /// Marks the start of a question.
    pub fn begin_ask(&mut self) {
        self.is_processing = true;
        self.spinner = Some(Spinner::thinking());
    }

    /// Records the outcome of a connect attempt.
    pub fn finish_connect(&mut self, status: ConnectStatus, label: Option<&str>) {
        self.is_processing = false;
        self.spinner = None;
        if status.is_connected() {
            self.is_connected = true;
            self.connection_info = label.map(str::to_string);
            self.focus = Focus::Input;
        }
        self.form.status = Some(status);
    }

    /// Records the outcome of a question.
    pub fn finish_ask(&mut self, outcome: &AskOutcome) {
        self.is_processing = false;
        self.spinner = None;
        match outcome {
            AskOutcome::Ignored => {}
            AskOutcome::Answered { response, sql } => {
                self.add_message(ChatMessage::Assistant(response.clone()));
                self.add_message(ChatMessage::Sql(sql.clone()));
            }
            AskOutcome::Failed { .. } => {
                for warning in FAILURE_WARNINGS {
                    self.add_message(ChatMessage::Warning(warning.to_string()));
                }
            }
        }
    }
}
