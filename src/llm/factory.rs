//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients.

use crate::config::LlmConfig;
use crate::error::{ChatError, Result};
use crate::llm::{GeminiClient, GeminiConfig, LlmClient, LlmProvider, MockLlmClient};

/// Creates an LLM client for the given provider.
///
/// Gemini requires `api_key`; the mock provider ignores it. Model and request
/// timeout come from `config`.
pub fn create_client(
    provider: LlmProvider,
    api_key: Option<String>,
    config: &LlmConfig,
) -> Result<Box<dyn LlmClient>> {
    match provider {
        LlmProvider::Gemini => {
            let key = api_key.ok_or_else(|| {
                ChatError::config(
                    "No Gemini API key configured. Set GEMINI_API_KEY or store it in the keyring.",
                )
            })?;
            let gemini = GeminiConfig::new(key, &config.model).with_timeout(config.timeout_secs);
            Ok(Box::new(GeminiClient::new(gemini)?))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}
