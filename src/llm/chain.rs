//! The two LLM steps of a question.
//!
//! `generate_sql` turns a question into SQL text; `generate_response` turns
//! the SQL and its result into a narrated answer.

use std::time::Instant;
use tracing::{debug, info};

use crate::error::Result;
use crate::llm::prompt::{build_response_prompt, build_sql_prompt};
use crate::llm::types::ConversationLog;
use crate::llm::LlmClient;

/// Asks the model for a SQL statement answering `question`.
///
/// The returned text is not parsed or validated.
pub async fn generate_sql(
    llm: &dyn LlmClient,
    schema: &str,
    history: &ConversationLog,
    question: &str,
) -> Result<String> {
    let prompt = build_sql_prompt(schema, history, question);
    debug!(prompt_len = prompt.len(), "Generating SQL");

    let start = Instant::now();
    let sql = llm.complete(&prompt).await?;

    info!(
        duration_ms = start.elapsed().as_millis(),
        sql_len = sql.len(),
        "SQL generated"
    );
    Ok(sql)
}

/// Asks the model to narrate `sql_result` for the user.
pub async fn generate_response(
    llm: &dyn LlmClient,
    schema: &str,
    history: &ConversationLog,
    question: &str,
    sql: &str,
    sql_result: &str,
) -> Result<String> {
    let prompt = build_response_prompt(schema, history, question, sql, sql_result);
    debug!(prompt_len = prompt.len(), "Generating response");

    let start = Instant::now();
    let response = llm.complete(&prompt).await?;

    info!(
        duration_ms = start.elapsed().as_millis(),
        response_len = response.len(),
        "Response generated"
    );
    Ok(response)
}
