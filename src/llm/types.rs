//! Conversation types for LLM communication.
//!
//! Defines the turn log shared by the chat panel and both prompts, and the
//! fixed decoding parameters sent with every request.

use serde::{Deserialize, Serialize};

/// Greeting every conversation starts with.
pub const GREETING: &str = "Hello! I'm a MySQL assistant. Ask me anything about your database.";

/// Author of a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions.
    Human,
    /// The assistant's narrated answers.
    Assistant,
}

impl Role {
    /// Returns the label used in prompts and on screen.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "Human",
            Self::Assistant => "Assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced the turn.
    pub role: Role,
    /// The turn's text.
    pub content: String,
}

impl Turn {
    /// Creates a new turn with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a human turn.
    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Role::Human, content)
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// The ordered, append-only log of turns in a session.
///
/// Starts with the greeting and is never truncated; the whole log goes into
/// both prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    /// Creates a log holding only the greeting.
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::assistant(GREETING)],
        }
    }

    /// Appends a human turn.
    pub fn push_human(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::human(content));
    }

    /// Appends an assistant turn.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    /// Returns all turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Returns the number of turns, greeting included.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false: the greeting is never removed.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Serializes the log for the prompts, one `Role: content` line per turn.
    pub fn format_for_prompt(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoding parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

/// The fixed configuration used for both SQL generation and narration.
pub const GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.2,
    top_p: 1.0,
    top_k: 1,
    max_output_tokens: 3000,
};
