//! Core session for chat-mysql.
//!
//! Coordinates the connection manager, the LLM client and the conversation
//! log to answer one question at a time.

use std::time::Instant;
use tracing::{info, warn};

use crate::config::ConnectionConfig;
use crate::connection::ConnectionManager;
use crate::db::{DatabaseClient, MockDatabaseClient};
use crate::error::{ChatError, Result};
use crate::llm::{
    fail_closed, generate_response, generate_sql, ConversationLog, LlmClient, MockLlmClient,
};

/// Status line shown after a successful connect.
pub const CONNECTED_MESSAGE: &str = "Connected to database!";

/// First warning shown when a question could not be answered.
pub const APOLOGY_WARNING: &str = "I am Sorry. It looks like I made some mistake while trying to form logic or execute the correct logic. Please Try Again. I will try my best";

/// Second warning shown when a question could not be answered.
pub const TIP_WARNING: &str = "Tip: Either Check the Prompt or Try to Improve it.";

/// Both warnings, in display order.
pub const FAILURE_WARNINGS: [&str; 2] = [APOLOGY_WARNING, TIP_WARNING];

/// Where connections are opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DbBackend {
    /// A real MySQL server.
    #[default]
    MySql,
    /// The in-memory Chinook mock; the form is still validated.
    Mock,
}

/// Processing state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for input.
    #[default]
    Idle,
    /// A question is being answered.
    Processing,
}

/// Outcome of a connect attempt, ready for the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectStatus {
    /// Connected; carries the success message.
    Connected(String),
    /// Not connected; carries the driver's error text.
    Failed(String),
}

impl ConnectStatus {
    /// Returns the text to show under the Connect button.
    pub fn text(&self) -> &str {
        match self {
            Self::Connected(text) | Self::Failed(text) => text,
        }
    }

    /// Returns true for a successful connect.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}

/// Outcome of a submitted question.
#[derive(Debug)]
pub enum AskOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// The question was answered.
    Answered {
        /// Narrated answer, also appended to the log.
        response: String,
        /// SQL text that produced the answer, shown as a caption.
        sql: String,
    },
    /// Something in the pipeline failed; the question stays unanswered.
    Failed {
        /// The first error encountered.
        error: ChatError,
    },
}

/// The per-user session.
///
/// Owns the single database connection, the LLM client and the
/// conversation log. Questions are answered one at a time.
pub struct Session {
    connections: ConnectionManager,
    llm: Box<dyn LlmClient>,
    log: ConversationLog,
    state: SessionState,
    backend: DbBackend,
}

impl Session {
    /// Creates a disconnected session using the given LLM client.
    pub fn new(llm: Box<dyn LlmClient>) -> Self {
        Self {
            connections: ConnectionManager::new(),
            llm,
            log: ConversationLog::new(),
            state: SessionState::Idle,
            backend: DbBackend::MySql,
        }
    }

    /// Creates a session with a mock LLM and no connection.
    pub fn with_mock_llm() -> Self {
        Self::new(Box::new(MockLlmClient::new()))
    }

    /// Sets where the Connect button opens connections.
    pub fn with_backend(mut self, backend: DbBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Installs an already-opened database client.
    pub async fn attach(&mut self, db: Box<dyn DatabaseClient>, label: impl Into<String>) {
        self.connections.replace(db, label).await;
    }

    /// Opens a connection from the form values.
    ///
    /// On failure any previous connection stays active.
    pub async fn connect(&mut self, config: &ConnectionConfig) -> ConnectStatus {
        let result = match self.backend {
            DbBackend::MySql => self.connections.connect(config).await,
            DbBackend::Mock => self.connect_mock(config).await,
        };

        match result {
            Ok(()) => ConnectStatus::Connected(CONNECTED_MESSAGE.to_string()),
            Err(e) => {
                warn!("Connect failed: {e}");
                ConnectStatus::Failed(connect_error_text(e))
            }
        }
    }

    async fn connect_mock(&mut self, config: &ConnectionConfig) -> Result<()> {
        config.to_connection_string()?;
        self.connections
            .replace(Box::new(MockDatabaseClient::chinook()), config.display_string())
            .await;
        Ok(())
    }

    /// Answers a question.
    ///
    /// Appends the question to the log, then runs schema introspection, SQL
    /// generation, execution and narration in order. Once the SQL has run the
    /// question is answered: a narration error becomes the answer text.
    pub async fn ask(&mut self, question: &str) -> AskOutcome {
        if question.trim().is_empty() {
            return AskOutcome::Ignored;
        }

        self.log.push_human(question);
        self.state = SessionState::Processing;
        let start = Instant::now();

        let outcome = match self.answer(question).await {
            Ok((response, sql)) => {
                self.log.push_assistant(response.clone());
                info!(duration_ms = start.elapsed().as_millis(), "Question answered");
                AskOutcome::Answered { response, sql }
            }
            Err(error) => {
                warn!(category = error.category(), "Question failed: {error}");
                AskOutcome::Failed { error }
            }
        };

        self.state = SessionState::Idle;
        outcome
    }

    async fn answer(&self, question: &str) -> Result<(String, String)> {
        let schema = self.connections.schema_text().await?;
        let sql = generate_sql(self.llm.as_ref(), &schema, &self.log, question).await?;
        let result = self.connections.run(&sql).await?;
        info!(rows = result.row_count(), "Query executed");

        // A failed narration still answers the question with the error text.
        let response = fail_closed(
            generate_response(
                self.llm.as_ref(),
                &schema,
                &self.log,
                question,
                &sql,
                &result.format_for_llm(),
            )
            .await,
        );

        Ok((response, sql))
    }

    /// Returns the conversation log.
    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Returns the current processing state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true when a database connection is active.
    pub fn is_connected(&self) -> bool {
        self.connections.is_connected()
    }

    /// Returns the label of the active connection.
    pub fn connection_label(&self) -> Option<&str> {
        self.connections.current_label()
    }

    /// Closes the database connection.
    pub async fn close(&mut self) -> Result<()> {
        self.connections.close().await
    }
}

/// Strips the category prefix so the sidebar shows the driver's own text.
fn connect_error_text(error: ChatError) -> String {
    match error {
        ChatError::Connection(msg) => msg,
        other => other.to_string(),
    }
}
