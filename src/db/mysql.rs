//! MySQL database client implementation.
//!
//! Provides the `MySqlClient` struct that implements the `DatabaseClient` trait
//! for MySQL databases using sqlx.

use crate::config::ConnectionConfig;
use crate::db::{
    Column, ColumnInfo, DatabaseClient, ForeignKey, QueryResult, Row, Schema, Table, Value,
    SAMPLE_ROWS_PER_TABLE,
};
use crate::error::{ChatError, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlDatabaseError, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column as SqlxColumn, Decode, Row as SqlxRow, Type, TypeInfo};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long to wait for the server when opening the connection.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// MySQL database client.
///
/// Holds a pool capped at a single connection: one session, one socket.
#[derive(Debug)]
pub struct MySqlClient {
    pool: MySqlPool,
}

impl MySqlClient {
    /// Opens a connection to the database described by `config`.
    ///
    /// The connection is established eagerly so bad credentials, unreachable
    /// hosts and unknown databases are reported here.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;
        debug!("Connecting to {}", config.display_string());

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .connect(&conn_str)
            .await
            .map_err(|e| map_connection_error(e, config))?;

        debug!("Successfully connected to database");
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        let start = Instant::now();
        let mut tables = self.fetch_tables().await?;
        for table in &mut tables {
            table.sample_rows = self.fetch_sample_rows(&table.name).await;
        }
        let foreign_keys = self.fetch_foreign_keys().await?;

        debug!(
            table_count = tables.len(),
            duration_ms = start.elapsed().as_millis(),
            "Introspected schema"
        );

        Ok(Schema {
            tables,
            foreign_keys,
        })
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let result = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ChatError::query(format_query_error(e)))?;

        let execution_time = start.elapsed();

        let columns: Vec<ColumnInfo> = result
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Row> = result.iter().map(convert_row).collect();

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

impl MySqlClient {
    /// Fetches all base tables of the current database with their columns.
    async fn fetch_tables(&self) -> Result<Vec<Table>> {
        let table_names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT CAST(TABLE_NAME AS CHAR)
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ChatError::query(format!("Failed to fetch tables: {e}")))?;

        let mut tables = Vec::with_capacity(table_names.len());
        for name in table_names {
            let (columns, primary_key) = self.fetch_columns(&name).await?;
            tables.push(Table {
                name,
                columns,
                primary_key,
                sample_rows: Vec::new(),
            });
        }

        Ok(tables)
    }

    /// Fetches columns and primary key columns for a specific table.
    async fn fetch_columns(&self, table_name: &str) -> Result<(Vec<Column>, Vec<String>)> {
        let rows: Vec<(String, String, String, Option<String>, String)> = sqlx::query_as(
            r#"
            SELECT
                CAST(COLUMN_NAME AS CHAR),
                CAST(COLUMN_TYPE AS CHAR),
                CAST(IS_NULLABLE AS CHAR),
                CAST(COLUMN_DEFAULT AS CHAR),
                CAST(COLUMN_KEY AS CHAR)
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
            "#,
        )
        .bind(table_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            ChatError::query(format!("Failed to fetch columns for {table_name}: {e}"))
        })?;

        let primary_key = rows
            .iter()
            .filter(|(_, _, _, _, key)| key == "PRI")
            .map(|(name, ..)| name.clone())
            .collect();

        let columns = rows
            .into_iter()
            .map(|(name, data_type, is_nullable, default, _)| Column {
                name,
                data_type,
                is_nullable: is_nullable == "YES",
                default,
            })
            .collect();

        Ok((columns, primary_key))
    }

    /// Fetches a few rows of a table. Failures only cost the samples.
    async fn fetch_sample_rows(&self, table_name: &str) -> Vec<Row> {
        let sql = format!(
            "SELECT * FROM {} LIMIT {SAMPLE_ROWS_PER_TABLE}",
            quote_identifier(table_name)
        );

        match sqlx::query(&sql).fetch_all(&self.pool).await {
            Ok(rows) => rows.iter().map(convert_row).collect(),
            Err(e) => {
                warn!("Failed to fetch sample rows for {table_name}: {e}");
                Vec::new()
            }
        }
    }

    /// Fetches all foreign key relationships of the current database.
    async fn fetch_foreign_keys(&self) -> Result<Vec<ForeignKey>> {
        let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
            r#"
            SELECT
                CAST(CONSTRAINT_NAME AS CHAR),
                CAST(TABLE_NAME AS CHAR),
                CAST(COLUMN_NAME AS CHAR),
                CAST(REFERENCED_TABLE_NAME AS CHAR),
                CAST(REFERENCED_COLUMN_NAME AS CHAR)
            FROM information_schema.KEY_COLUMN_USAGE
            WHERE TABLE_SCHEMA = DATABASE() AND REFERENCED_TABLE_NAME IS NOT NULL
            ORDER BY TABLE_NAME, CONSTRAINT_NAME, ORDINAL_POSITION
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ChatError::query(format!("Failed to fetch foreign keys: {e}")))?;

        Ok(group_foreign_keys(rows))
    }
}

/// Groups `(constraint, from_table, from_column, to_table, to_column)` rows
/// into one `ForeignKey` per constraint, keeping the input order.
fn group_foreign_keys(rows: Vec<(String, String, String, String, String)>) -> Vec<ForeignKey> {
    let mut grouped: Vec<(String, ForeignKey)> = Vec::new();

    for (constraint, from_table, from_column, to_table, to_column) in rows {
        match grouped
            .iter_mut()
            .find(|(name, fk)| name == &constraint && fk.from_table == from_table)
        {
            Some((_, fk)) => {
                fk.from_columns.push(from_column);
                fk.to_columns.push(to_column);
            }
            None => grouped.push((
                constraint,
                ForeignKey::new(from_table, vec![from_column], to_table, vec![to_column]),
            )),
        }
    }

    grouped.into_iter().map(|(_, fk)| fk).collect()
}

/// Quotes a MySQL identifier with backticks.
fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Decodes a nullable column, treating decode failures as absent.
fn decode<'r, T>(row: &'r MySqlRow, index: usize) -> Option<T>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get::<Option<T>, _>(index).ok().flatten()
}

/// Converts a single column value from a MySqlRow to our Value type.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    let typed = match type_name.to_uppercase().as_str() {
        "BOOLEAN" => decode::<bool>(row, index).map(Value::Bool),
        "TINYINT" => decode::<i8>(row, index).map(|v| Value::Int(v as i64)),
        "SMALLINT" => decode::<i16>(row, index).map(|v| Value::Int(v as i64)),
        "MEDIUMINT" | "INT" => decode::<i32>(row, index).map(|v| Value::Int(v as i64)),
        "BIGINT" => decode::<i64>(row, index).map(Value::Int),
        "TINYINT UNSIGNED" => decode::<u8>(row, index).map(|v| Value::Int(v as i64)),
        "SMALLINT UNSIGNED" => decode::<u16>(row, index).map(|v| Value::Int(v as i64)),
        "MEDIUMINT UNSIGNED" | "INT UNSIGNED" => {
            decode::<u32>(row, index).map(|v| Value::Int(v as i64))
        }
        "BIGINT UNSIGNED" => decode::<u64>(row, index).map(|v| match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Number(v.to_string()),
        }),
        "FLOAT" => decode::<f32>(row, index).map(|v| Value::Float(v as f64)),
        "DOUBLE" => decode::<f64>(row, index).map(Value::Float),
        "DECIMAL" => {
            decode::<rust_decimal::Decimal>(row, index).map(|v| Value::Number(v.to_string()))
        }
        "DATE" => decode::<chrono::NaiveDate>(row, index).map(|v| Value::Number(v.to_string())),
        "TIME" => decode::<chrono::NaiveTime>(row, index).map(|v| Value::Number(v.to_string())),
        "DATETIME" => {
            decode::<chrono::NaiveDateTime>(row, index).map(|v| Value::Number(v.to_string()))
        }
        "TIMESTAMP" => decode::<chrono::DateTime<chrono::Utc>>(row, index)
            .map(|v| Value::Number(v.to_string())),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            decode::<Vec<u8>>(row, index).map(Value::Bytes)
        }
        _ => None,
    };

    typed.or_else(|| decode_text(row, index)).unwrap_or(Value::Null)
}

/// Falls back to reading the column as text.
fn decode_text(row: &MySqlRow, index: usize) -> Option<Value> {
    decode::<String>(row, index).map(Value::String).or_else(|| {
        decode::<Vec<u8>>(row, index)
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    })
}

/// Maps sqlx connection errors to messages for the sidebar.
///
/// The driver's own text is kept; a hint is appended for common causes.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> ChatError {
    let raw = error.to_string();
    let lower = raw.to_lowercase();

    let hint = if lower.contains("access denied") {
        Some(format!(
            "Authentication failed for user '{}'. Check your credentials.",
            config.user
        ))
    } else if lower.contains("unknown database") {
        Some(format!("Database '{}' does not exist.", config.database))
    } else if lower.contains("connection refused") {
        Some(format!(
            "Cannot connect to {}:{}. Check that the server is running.",
            config.host, config.port
        ))
    } else if lower.contains("timed out") || lower.contains("timeout") {
        Some(format!(
            "Connection to {}:{} timed out. The server may be unreachable.",
            config.host, config.port
        ))
    } else {
        None
    };

    match hint {
        Some(hint) => ChatError::connection(format!("{raw}\n{hint}")),
        None => ChatError::connection(raw),
    }
}

/// Formats a query error the way the mysql client prints it.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    match db_error.try_downcast_ref::<MySqlDatabaseError>() {
        Some(my_error) => match my_error.code() {
            Some(state) => format!(
                "ERROR {} ({}): {}",
                my_error.number(),
                state,
                my_error.message()
            ),
            None => format!("ERROR {}: {}", my_error.number(), my_error.message()),
        },
        None => format!("ERROR: {}", db_error.message()),
    }
}
