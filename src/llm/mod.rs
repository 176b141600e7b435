//! LLM integration for chat-mysql.
//!
//! Provides the client trait, the Gemini and mock implementations, the prompt
//! templates and the two generation steps built on them.

pub mod chain;
pub mod factory;
pub mod gemini;
pub mod mock;
pub mod prompt;
pub mod types;

pub use chain::{generate_response, generate_sql};
pub use factory::create_client;
pub use gemini::{GeminiClient, GeminiConfig};
pub use mock::MockLlmClient;
pub use types::{ConversationLog, GenerationConfig, Role, Turn, GENERATION_CONFIG};

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::Result;

/// Trait for LLM clients that can generate completions.
///
/// Implementations must be thread-safe (Send + Sync) to support async operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends a single prompt and returns the generated text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Collapses an LLM result into plain text.
///
/// Errors become their display text (`"An error occurred: ..."` or
/// `"no response generated"`), for callers that only deal in strings.
pub fn fail_closed(result: Result<String>) -> String {
    result.unwrap_or_else(|e| e.to_string())
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Google Gemini
    #[default]
    Gemini,
    /// Mock client for testing (no API key required)
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Mock => "mock",
        }
    }

    /// Returns true if the provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Gemini)
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown LLM provider: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
