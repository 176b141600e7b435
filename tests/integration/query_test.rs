//! Query and schema integration tests against a live MySQL server.

use chat_mysql::config::ConnectionConfig;
use chat_mysql::db::{DatabaseClient, MySqlClient, Value};
use chat_mysql::error::ChatError;

async fn get_test_client() -> Option<MySqlClient> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    MySqlClient::connect(&config).await.ok()
}

#[tokio::test]
async fn test_select_values() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = client
        .execute_query("SELECT 1 AS one, 'AC/DC' AS name, NULL AS nothing")
        .await
        .unwrap();

    assert_eq!(result.columns.len(), 3);
    assert_eq!(result.columns[0].name, "one");
    assert_eq!(result.rows[0][0], Value::Int(1));
    assert_eq!(result.rows[0][1], Value::String("AC/DC".to_string()));
    assert!(result.rows[0][2].is_null());
    assert_eq!(result.format_for_llm(), "[(1, 'AC/DC', None)]");

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_syntax_error_is_query_error() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let err = client.execute_query("SELEC 1").await.unwrap_err();
    match err {
        ChatError::Query(msg) => assert!(msg.contains("1064"), "got: {msg}"),
        other => panic!("Expected query error, got: {other}"),
    }

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_introspect_schema() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let table = "chat_mysql_schema_probe";
    client
        .execute_query(&format!("DROP TABLE IF EXISTS {table}"))
        .await
        .unwrap();
    client
        .execute_query(&format!(
            "CREATE TABLE {table} (id INT PRIMARY KEY, label VARCHAR(20) NOT NULL)"
        ))
        .await
        .unwrap();
    client
        .execute_query(&format!("INSERT INTO {table} VALUES (1, 'first')"))
        .await
        .unwrap();

    let schema = client.introspect_schema().await.unwrap();
    let probe = schema
        .tables
        .iter()
        .find(|t| t.name == table)
        .expect("probe table should be introspected");

    assert_eq!(probe.primary_key, vec!["id".to_string()]);
    assert!(schema.format_for_llm().contains(table));

    client
        .execute_query(&format!("DROP TABLE {table}"))
        .await
        .unwrap();
    client.close().await.unwrap();
}
