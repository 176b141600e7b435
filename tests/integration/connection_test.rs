//! Connection integration tests.
//!
//! Tests MySQL connectivity and how connect failures are reported.

use chat_mysql::config::ConnectionConfig;
use chat_mysql::connection::ConnectionManager;
use chat_mysql::db::{DatabaseClient, MySqlClient};
use chat_mysql::error::ChatError;

/// Helper to get the test database config from the environment.
fn get_test_config() -> Option<ConnectionConfig> {
    let url = std::env::var("DATABASE_URL").ok()?;
    ConnectionConfig::from_connection_string(&url).ok()
}

#[tokio::test]
async fn test_connect_with_valid_credentials() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let mut manager = ConnectionManager::new();
    manager.connect(&config).await.unwrap();

    assert!(manager.is_connected());
    assert!(!manager.schema_text().await.unwrap().is_empty());
    assert_eq!(manager.run("SELECT 1").await.unwrap().row_count(), 1);

    manager.close().await.unwrap();
}

#[tokio::test]
async fn test_wrong_password_keeps_previous_connection() {
    let Some(config) = get_test_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let mut manager = ConnectionManager::new();
    manager.connect(&config).await.unwrap();
    let label = manager.current_label().map(str::to_string);

    let bad = ConnectionConfig {
        password: format!("{}-wrong", config.password),
        ..config.clone()
    };
    let err = manager.connect(&bad).await.unwrap_err();

    assert!(matches!(err, ChatError::Connection(_)));
    assert_eq!(manager.current_label().map(str::to_string), label);
    assert!(manager.run("SELECT 1").await.is_ok());

    manager.close().await.unwrap();
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_invalid_host() {
    let config = ConnectionConfig::new(
        "invalid.host.that.does.not.exist.local",
        "3306",
        "root",
        "secret",
        "chinook",
    );

    let result = MySqlClient::connect(&config).await;
    match result {
        Err(ChatError::Connection(msg)) => assert!(!msg.is_empty()),
        Err(other) => panic!("Expected connection error, got: {other}"),
        Ok(client) => {
            client.close().await.ok();
            panic!("Connecting to an unresolvable host should fail");
        }
    }
}

#[tokio::test]
async fn test_connect_rejects_invalid_port_before_dialing() {
    let config = ConnectionConfig::new("localhost", "99999", "root", "", "chinook");

    let mut manager = ConnectionManager::new();
    let err = manager.connect(&config).await.unwrap_err();

    assert!(matches!(err, ChatError::Connection(_)));
    assert!(!manager.is_connected());
}
