//! Mock LLM client for testing.
//!
//! Provides deterministic responses without network access.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{ChatError, Result};
use crate::llm::LlmClient;

/// What the mock does when it runs out of queued responses.
#[derive(Debug, Clone)]
enum Fallback {
    /// Answer SQL prompts with a query and narration prompts with a summary.
    Canned,
    /// Fail every call with an API error.
    Fail(String),
    /// Answer without any text.
    Empty,
}

/// Mock LLM client that returns canned responses.
///
/// Queued responses are returned first, in order. After that the client
/// answers SQL prompts with a simple query and narration prompts with a
/// sentence quoting the SQL result.
#[derive(Debug)]
pub struct MockLlmClient {
    queued: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    fallback: Fallback,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::with_fallback(Fallback::Canned)
    }

    /// Creates a client whose calls fail with an API error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_fallback(Fallback::Fail(message.into()))
    }

    /// Creates a client whose calls return no text.
    pub fn empty() -> Self {
        Self::with_fallback(Fallback::Empty)
    }

    fn with_fallback(fallback: Fallback) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            fallback,
        }
    }

    /// Queues a response returned by the next unanswered call.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        if let Ok(mut queued) = self.queued.lock() {
            queued.push_back(response.into());
        }
        self
    }

    /// Returns every prompt received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    /// Generates a response for a prompt when nothing is queued.
    fn canned_response(prompt: &str) -> String {
        if prompt.trim_end().ends_with("SQL Query:") {
            let question = prompt
                .rsplit("Question:")
                .next()
                .unwrap_or_default()
                .to_lowercase();

            if question.contains("album") {
                return "SELECT Title FROM Album LIMIT 10;".to_string();
            }
            if question.contains("how many") || question.contains("count") {
                return "SELECT COUNT(*) FROM Artist;".to_string();
            }
            return "SELECT Name FROM Artist LIMIT 10;".to_string();
        }

        let result = prompt
            .rsplit("SQL Response:")
            .next()
            .map(str::trim)
            .unwrap_or_default();

        if result.is_empty() {
            "The query returned no rows.".to_string()
        } else {
            format!("Here is what I found: {result}")
        }
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let queued = self.queued.lock().ok().and_then(|mut q| q.pop_front());
        if let Some(response) = queued {
            return Ok(response);
        }

        match &self.fallback {
            Fallback::Canned => Ok(Self::canned_response(prompt)),
            Fallback::Fail(message) => Err(ChatError::llm(message.clone())),
            Fallback::Empty => Err(ChatError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompt::{build_response_prompt, build_sql_prompt};
    use crate::llm::types::ConversationLog;

    #[tokio::test]
    async fn test_queued_responses_come_first() {
        let client = MockLlmClient::new()
            .with_response("SELECT 1;")
            .with_response("One.");

        assert_eq!(client.complete("a").await.unwrap(), "SELECT 1;");
        assert_eq!(client.complete("b").await.unwrap(), "One.");
        assert_eq!(client.prompts(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_canned_sql_for_sql_prompt() {
        let client = MockLlmClient::new();
        let prompt = build_sql_prompt("", &ConversationLog::new(), "Show me some albums");

        let sql = client.complete(&prompt).await.unwrap();
        assert_eq!(sql, "SELECT Title FROM Album LIMIT 10;");
    }

    #[tokio::test]
    async fn test_canned_narration_quotes_result() {
        let client = MockLlmClient::new();
        let prompt = build_response_prompt(
            "",
            &ConversationLog::new(),
            "Name artists",
            "SELECT Name FROM Artist LIMIT 10;",
            "[('AC/DC',)]",
        );

        let text = client.complete(&prompt).await.unwrap();
        assert_eq!(text, "Here is what I found: [('AC/DC',)]");
    }

    #[tokio::test]
    async fn test_failing_client() {
        let client = MockLlmClient::failing("quota exceeded");
        let err = client.complete("anything").await.unwrap_err();
        assert_eq!(err.to_string(), "An error occurred: quota exceeded");
    }

    #[tokio::test]
    async fn test_empty_client() {
        let client = MockLlmClient::empty();
        let err = client.complete("anything").await.unwrap_err();
        assert_eq!(err.to_string(), "no response generated");
    }
}
