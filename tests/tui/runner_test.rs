//! In-process headless runner tests.

use chat_mysql::app::{DbBackend, Session};
use chat_mysql::config::ConnectionConfig;
use chat_mysql::db::{ColumnInfo, MockDatabaseClient, QueryResult, Value};
use chat_mysql::llm::MockLlmClient;
use chat_mysql::tui::headless::{HeadlessConfig, HeadlessRunner};

fn config() -> HeadlessConfig {
    HeadlessConfig {
        width: 120,
        height: 40,
        ..Default::default()
    }
}

fn prefill() -> ConnectionConfig {
    ConnectionConfig::new("localhost", "3306", "root", "hunter2", "chinook")
}

#[tokio::test]
async fn test_password_is_masked_on_screen() {
    let session = Session::with_mock_llm().with_backend(DbBackend::Mock);
    let mut runner = HeadlessRunner::new(config(), &prefill(), session).unwrap();
    runner.load_events("assert:not-contains:hunter2").unwrap();

    let result = runner.run().await.unwrap();

    assert_eq!(result.assertions_failed, 0);
    assert!(result.screen.contains("*******"));
}

#[tokio::test]
async fn test_connect_failure_shows_status() {
    let session = Session::with_mock_llm().with_backend(DbBackend::Mock);
    let mut runner = HeadlessRunner::new(config(), &prefill(), session).unwrap();
    // Clear the port field, then connect.
    runner
        .load_events("key:tab,key:ctrl+u,key:tab,key:tab,key:tab,key:tab,key:enter")
        .unwrap();

    let result = runner.run().await.unwrap();

    assert!(result.screen.contains("Invalid port ''"), "{}", result.screen);
    assert!(!result.state.is_connected);
    assert_eq!(result.state.focus, "Connect");
}

#[tokio::test]
async fn test_answer_and_caption_are_rendered() {
    let sql = "SELECT Name FROM Artist LIMIT 3;";
    let llm = MockLlmClient::new()
        .with_response(sql)
        .with_response("The top 3 artists are A, B, and C.");
    let mut session = Session::new(Box::new(llm));
    session
        .attach(
            Box::new(MockDatabaseClient::chinook().with_result(
                sql,
                QueryResult::with_data(
                    vec![ColumnInfo::new("Name", "VARCHAR")],
                    vec![vec![Value::from("A")], vec![Value::from("B")], vec![Value::from("C")]],
                ),
            )),
            "chinook @ localhost:3306",
        )
        .await;

    let mut runner = HeadlessRunner::new(config(), &prefill(), session).unwrap();
    runner
        .load_events(
            "key:backtab,key:backtab,type:Name 3 artists,key:enter,\
             assert:contains-exact:The top 3 artists are A,\
             assert:contains-exact:SELECT Name FROM Artist LIMIT 3;",
        )
        .unwrap();

    let result = runner.run().await.unwrap();

    assert_eq!(result.assertions_passed, 2, "{}", result.screen);
    assert_eq!(result.assertions_failed, 0);
    assert_eq!(result.state.input_text, "");
    assert!(!result.state.is_processing);
    // Greeting, question, answer, caption.
    assert_eq!(result.state.message_count, 4);
}

#[tokio::test]
async fn test_ctrl_c_stops_the_script() {
    let session = Session::with_mock_llm();
    let mut runner = HeadlessRunner::new(config(), &prefill(), session).unwrap();
    runner.load_events("key:ctrl+c,key:tab,key:tab").unwrap();

    let result = runner.run().await.unwrap();

    assert_eq!(result.events_executed, 1);
    assert!(!result.state.running);
    assert_eq!(result.exit_code(), 0);
}
