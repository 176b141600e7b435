//! Session flow tests against the mock database and mock LLM.

use chat_mysql::app::{AskOutcome, DbBackend, Session, APOLOGY_WARNING, TIP_WARNING};
use chat_mysql::config::ConnectionConfig;
use chat_mysql::db::{ColumnInfo, FailingDatabaseClient, MockDatabaseClient, QueryResult, Value};
use chat_mysql::llm::{fail_closed, generate_sql, ConversationLog, MockLlmClient, Role};
use chat_mysql::tui::app::{App, ChatMessage};
use pretty_assertions::assert_eq;

const ARTISTS_SQL: &str = "SELECT Name FROM Artist LIMIT 3;";
const ARTISTS_ANSWER: &str = "The top 3 artists are A, B, and C.";

fn artists_result() -> QueryResult {
    QueryResult::with_data(
        vec![ColumnInfo::new("Name", "VARCHAR")],
        vec![
            vec![Value::from("A")],
            vec![Value::from("B")],
            vec![Value::from("C")],
        ],
    )
}

async fn connected_session(llm: MockLlmClient) -> Session {
    let mut session = Session::new(Box::new(llm));
    session
        .attach(
            Box::new(MockDatabaseClient::chinook().with_result(ARTISTS_SQL, artists_result())),
            "chinook @ localhost:3306",
        )
        .await;
    session
}

#[tokio::test]
async fn test_sql_generation_failure_reads_as_error_text() {
    let llm = MockLlmClient::failing("API key not valid");
    let log = ConversationLog::new();

    let result = generate_sql(&llm, "CREATE TABLE Artist (...)", &log, "Name 3 artists").await;
    assert!(result.is_err());

    let text = fail_closed(result);
    assert!(text.starts_with("An error occurred:"), "got: {text}");
}

#[tokio::test]
async fn test_empty_generation_reads_as_no_response() {
    let llm = MockLlmClient::empty();
    let log = ConversationLog::new();

    let text = fail_closed(generate_sql(&llm, "", &log, "Name 3 artists").await);
    assert_eq!(text, "no response generated");
}

#[tokio::test]
async fn test_successful_questions_alternate_turns() {
    let mut session = connected_session(MockLlmClient::new()).await;
    let questions = ["Name some artists", "How many artists are there?", "List albums"];

    for question in questions {
        let outcome = session.ask(question).await;
        assert!(
            matches!(outcome, AskOutcome::Answered { .. }),
            "{question}: {outcome:?}"
        );
    }

    let log = session.log();
    assert_eq!(log.len(), 1 + 2 * questions.len());

    let roles: Vec<Role> = log.turns().iter().map(|t| t.role).collect();
    assert_eq!(roles[0], Role::Assistant);
    for (i, role) in roles.iter().enumerate().skip(1) {
        let expected = if i % 2 == 1 { Role::Human } else { Role::Assistant };
        assert_eq!(*role, expected, "turn {i}");
    }
}

#[tokio::test]
async fn test_failure_mid_sequence_leaves_unanswered_question() {
    let mut session = connected_session(MockLlmClient::new()).await;
    assert!(matches!(
        session.ask("Name some artists").await,
        AskOutcome::Answered { .. }
    ));

    session
        .attach(
            Box::new(FailingDatabaseClient::new(
                "ERROR 1146 (42S02): Table 'chinook.Artists' doesn't exist",
            )),
            "chinook @ localhost:3306",
        )
        .await;

    let mut app = App::new(&ConnectionConfig::default());
    let before = app.messages.len();

    let outcome = session.ask("Name 3 artists").await;
    app.finish_ask(&outcome);

    let log = session.log();
    assert_eq!(log.len(), 1 + 2 + 1);
    assert_eq!(log.last().map(|t| t.role), Some(Role::Human));
    assert_eq!(log.last().map(|t| t.content.as_str()), Some("Name 3 artists"));

    assert_eq!(
        app.messages[before..].to_vec(),
        vec![
            ChatMessage::Warning(APOLOGY_WARNING.to_string()),
            ChatMessage::Warning(TIP_WARNING.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_name_three_artists_end_to_end() {
    let llm = MockLlmClient::new()
        .with_response(ARTISTS_SQL)
        .with_response(ARTISTS_ANSWER);
    let mut session = connected_session(llm).await;
    let mut app = App::new(&ConnectionConfig::default());

    let outcome = session.ask("Name 3 artists").await;
    app.finish_ask(&outcome);

    let tail = &app.messages[app.messages.len() - 2..];
    assert_eq!(tail[0], ChatMessage::Assistant(ARTISTS_ANSWER.to_string()));
    assert_eq!(tail[1], ChatMessage::Sql(ARTISTS_SQL.to_string()));
    assert_eq!(
        session.log().last().map(|t| t.content.as_str()),
        Some(ARTISTS_ANSWER)
    );
}

#[tokio::test]
async fn test_narration_prompt_receives_result_tuples() {
    let llm = MockLlmClient::new().with_response(ARTISTS_SQL);
    let mut session = connected_session(llm).await;

    match session.ask("Name 3 artists").await {
        AskOutcome::Answered { response, .. } => {
            assert_eq!(response, "Here is what I found: [('A',), ('B',), ('C',)]");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_blank_question_changes_nothing() {
    let mut session = connected_session(MockLlmClient::new()).await;

    assert!(matches!(session.ask("").await, AskOutcome::Ignored));
    assert!(matches!(session.ask(" \t ").await, AskOutcome::Ignored));
    assert_eq!(session.log().len(), 1);
}

#[tokio::test]
async fn test_mock_backend_rejects_invalid_form() {
    let mut session = Session::with_mock_llm().with_backend(DbBackend::Mock);
    let config = ConnectionConfig::new("localhost", "3306", "root", "", "");

    let status = session.connect(&config).await;
    assert!(!status.is_connected());
    assert_eq!(status.text(), "Database name is required");
    assert!(!session.is_connected());
}

async fn ask_with_failing_narration(llm: MockLlmClient) -> (AskOutcome, Session) {
    let mut session = connected_session(llm.with_response(ARTISTS_SQL)).await;
    let outcome = session.ask("Name some artists").await;
    (outcome, session)
}

#[tokio::test]
async fn test_narration_error_becomes_the_answer() {
    let (outcome, session) =
        ask_with_failing_narration(MockLlmClient::failing("quota exceeded")).await;

    match outcome {
        AskOutcome::Answered { response, sql } => {
            assert_eq!(response, "An error occurred: quota exceeded");
            assert_eq!(sql, ARTISTS_SQL);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(session.log().len(), 3);
    let last = session.log().last().expect("assistant turn");
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.content, "An error occurred: quota exceeded");
}

#[tokio::test]
async fn test_empty_narration_becomes_the_answer() {
    let (outcome, session) = ask_with_failing_narration(MockLlmClient::empty()).await;

    match outcome {
        AskOutcome::Answered { response, .. } => assert_eq!(response, "no response generated"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(session.log().len(), 3);
    assert_eq!(
        session.log().last().map(|t| t.content.as_str()),
        Some("no response generated")
    );
}
