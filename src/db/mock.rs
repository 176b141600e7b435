//! Mock database clients for testing.
//!
//! Provides an in-memory database implementation for headless runs and tests.

use super::{Column, ColumnInfo, DatabaseClient, ForeignKey, QueryResult, Schema, Table, Value};
use crate::error::{ChatError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A mock database client that returns predefined results.
///
/// Results registered with [`MockDatabaseClient::with_result`] are matched
/// on the trimmed SQL text. Unregistered SQL falls back to a one-row result
/// for `SELECT` and an empty result for everything else.
pub struct MockDatabaseClient {
    schema: Schema,
    results: HashMap<String, QueryResult>,
    executed: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl MockDatabaseClient {
    /// Creates a new mock database client with an empty schema.
    pub fn new() -> Self {
        Self::with_schema(Schema::default())
    }

    /// Creates a new mock database client with the given schema.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            results: HashMap::new(),
            executed: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a mock that looks like a small slice of the Chinook sample database.
    pub fn chinook() -> Self {
        let schema = Schema {
            tables: vec![
                Table::new("Album")
                    .column(Column::new("AlbumId", "int").nullable(false))
                    .column(Column::new("Title", "varchar(160)").nullable(false))
                    .column(Column::new("ArtistId", "int").nullable(false))
                    .primary_key(&["AlbumId"])
                    .with_samples(vec![
                        vec![Value::Int(1), "For Those About To Rock We Salute You".into(), Value::Int(1)],
                        vec![Value::Int(2), "Balls to the Wall".into(), Value::Int(2)],
                        vec![Value::Int(3), "Restless and Wild".into(), Value::Int(2)],
                    ]),
                Table::new("Artist")
                    .column(Column::new("ArtistId", "int").nullable(false))
                    .column(Column::new("Name", "varchar(120)"))
                    .primary_key(&["ArtistId"])
                    .with_samples(vec![
                        vec![Value::Int(1), "AC/DC".into()],
                        vec![Value::Int(2), "Accept".into()],
                        vec![Value::Int(3), "Aerosmith".into()],
                    ]),
            ],
            foreign_keys: vec![ForeignKey::new(
                "Album",
                vec!["ArtistId".to_string()],
                "Artist",
                vec!["ArtistId".to_string()],
            )],
        };
        Self::with_schema(schema)
    }

    /// Registers the result returned for an exact SQL text.
    pub fn with_result(mut self, sql: impl Into<String>, result: QueryResult) -> Self {
        self.results.insert(sql.into().trim().to_string(), result);
        self
    }

    /// Returns every SQL text executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|sqls| sqls.clone())
            .unwrap_or_default()
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        Ok(self.schema.clone())
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }

        if let Some(result) = self.results.get(sql.trim()) {
            return Ok(result.clone());
        }

        if sql.trim_start().to_uppercase().starts_with("SELECT") {
            let columns = vec![ColumnInfo::new("result", "VARCHAR")];
            let rows = vec![vec![Value::String(format!("Mock result for: {}", sql))]];
            Ok(QueryResult::with_data(columns, rows).with_execution_time(Duration::from_millis(1)))
        } else {
            Ok(QueryResult::new().with_execution_time(Duration::from_millis(1)))
        }
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A database client whose queries always fail.
pub struct FailingDatabaseClient {
    schema: Schema,
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a client that fails every query with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            schema: Schema::default(),
            message: message.into(),
        }
    }

    /// Sets the schema reported by introspection.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        Ok(self.schema.clone())
    }

    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(ChatError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
