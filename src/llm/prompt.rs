//! Prompt construction for LLM requests.
//!
//! Builds the two prompts of a question: one asking for a bare SQL
//! statement, one asking for a narration of that statement's result.

use crate::llm::types::ConversationLog;

/// Template asking the model for a single SQL statement.
const SQL_PROMPT_TEMPLATE: &str = r#"You are a data analyst at a company. You are interacting with a user who is asking you questions about the company's database.
Based on the table schema below, write a SQL query that would answer the user's question. Take the conversation history into account.

<SCHEMA>{schema}</SCHEMA>

Conversation History: {chat_history}

Write only the SQL query and nothing else. Do not wrap the SQL query in any other text, not even backticks.

For example:
Question: which 3 artists have the most tracks?
SQL Query: SELECT ArtistId, COUNT(*) as track_count FROM Track GROUP BY ArtistId ORDER BY track_count DESC LIMIT 3;
Question: Name 10 artists
SQL Query: SELECT Name FROM Artist LIMIT 10;

Your turn:

Question: {question}
SQL Query:"#;

/// Template asking the model to narrate a query result.
const RESPONSE_PROMPT_TEMPLATE: &str = r#"You are a data analyst at a company. You are interacting with a user who is asking you questions about the company's database.
Based on the table schema below, question, sql query, and sql response, write a natural language response. Take the conversation history into account.
<SCHEMA>{schema}</SCHEMA>

Conversation History: {chat_history}
User question: {question}
SQL Query: <SQL>{sql}</SQL>
SQL Response: {response}"#;

/// Builds the SQL generation prompt.
pub fn build_sql_prompt(schema: &str, history: &ConversationLog, question: &str) -> String {
    render(
        SQL_PROMPT_TEMPLATE,
        &[
            ("schema", schema),
            ("chat_history", &history.format_for_prompt()),
            ("question", question),
        ],
    )
}

/// Builds the narration prompt from the question, SQL and its raw result.
pub fn build_response_prompt(
    schema: &str,
    history: &ConversationLog,
    question: &str,
    sql: &str,
    sql_result: &str,
) -> String {
    render(
        RESPONSE_PROMPT_TEMPLATE,
        &[
            ("schema", schema),
            ("chat_history", &history.format_for_prompt()),
            ("question", question),
            ("sql", sql),
            ("response", sql_result),
        ],
    )
}

/// Fills `{name}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so braces in schema text or
/// user questions come through untouched.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
