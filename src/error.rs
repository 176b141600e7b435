//! Error types for chat-mysql.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for chat-mysql operations.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Database connection errors (bad credentials, unreachable host, unknown database).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, permissions, missing objects).
    #[error("Query error: {0}")]
    Query(String),

    /// LLM transport or API errors (network failures, auth, bad responses).
    #[error("An error occurred: {0}")]
    Llm(String),

    /// The LLM answered without any text.
    #[error("no response generated")]
    EmptyResponse,

    /// Configuration errors (invalid config file, missing secrets, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal failures, unexpected states).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChatError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Llm(_) | Self::EmptyResponse => "LLM Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns true if the error came from the LLM adapter.
    pub fn is_llm(&self) -> bool {
        matches!(self, Self::Llm(_) | Self::EmptyResponse)
    }
}

/// Result type alias using ChatError.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_connection() {
        let err = ChatError::connection("Access denied for user 'root'@'localhost'");
        assert_eq!(
            err.to_string(),
            "Connection error: Access denied for user 'root'@'localhost'"
        );
        assert_eq!(err.category(), "Connection Error");
    }

    #[test]
    fn test_error_display_query() {
        let err = ChatError::query("Table 'chinook.Artists' doesn't exist");
        assert_eq!(
            err.to_string(),
            "Query error: Table 'chinook.Artists' doesn't exist"
        );
        assert_eq!(err.category(), "Query Error");
    }

    #[test]
    fn test_error_display_llm() {
        let err = ChatError::llm("Request timed out");
        assert_eq!(err.to_string(), "An error occurred: Request timed out");
        assert_eq!(err.category(), "LLM Error");
        assert!(err.is_llm());
    }

    #[test]
    fn test_error_display_empty_response() {
        let err = ChatError::EmptyResponse;
        assert_eq!(err.to_string(), "no response generated");
        assert!(err.is_llm());
    }

    #[test]
    fn test_error_display_config() {
        let err = ChatError::config("GEMINI_API_KEY is not set");
        assert_eq!(
            err.to_string(),
            "Configuration error: GEMINI_API_KEY is not set"
        );
        assert_eq!(err.category(), "Configuration Error");
        assert!(!err.is_llm());
    }

    #[test]
    fn test_error_display_internal() {
        let err = ChatError::internal("unexpected state");
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.category(), "Internal Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChatError>();
    }
}
