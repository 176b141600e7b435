//! Connection manager for database lifecycle and switching.

use crate::config::ConnectionConfig;
use crate::db::{DatabaseClient, QueryResult};
use crate::error::{ChatError, Result};
use tracing::{debug, info, warn};

/// An active database connection with its metadata.
pub struct ActiveConnection {
    /// Human-readable target, e.g. `chinook @ localhost:3306`.
    pub label: String,
    /// Database client.
    pub db: Box<dyn DatabaseClient>,
}

/// Manages the session's database connection.
///
/// At most one connection is active. A new connection replaces the old one
/// only after it has been opened successfully.
#[derive(Default)]
pub struct ConnectionManager {
    active: Option<ActiveConnection>,
}

impl ConnectionManager {
    /// Creates a new connection manager with no connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a connection manager with an existing connection.
    pub fn with_connection(db: Box<dyn DatabaseClient>, label: impl Into<String>) -> Self {
        Self {
            active: Some(ActiveConnection {
                label: label.into(),
                db,
            }),
        }
    }

    /// Connect to a MySQL database using the given configuration.
    ///
    /// On failure the previous connection, if any, is left in place.
    pub async fn connect(&mut self, config: &ConnectionConfig) -> Result<()> {
        let db = crate::db::connect(config).await?;
        self.replace(db, config.display_string()).await;
        info!("Connected to {}", config.display_string());
        Ok(())
    }

    /// Installs an already-opened client, closing the previous one.
    pub async fn replace(&mut self, db: Box<dyn DatabaseClient>, label: impl Into<String>) {
        if let Some(old) = self.active.take() {
            debug!("Closing previous connection to {}", old.label);
            if let Err(e) = old.db.close().await {
                warn!("Failed to close previous connection: {e}");
            }
        }

        self.active = Some(ActiveConnection {
            label: label.into(),
            db,
        });
    }

    /// Introspects the connected database and renders the schema text.
    ///
    /// The schema is read fresh on every call.
    pub async fn schema_text(&self) -> Result<String> {
        let schema = self.require()?.db.introspect_schema().await?;
        Ok(schema.format_for_llm())
    }

    /// Executes SQL text on the connected database.
    pub async fn run(&self, sql: &str) -> Result<QueryResult> {
        self.require()?.db.execute_query(sql).await
    }

    /// Get the label of the current connection.
    pub fn current_label(&self) -> Option<&str> {
        self.active.as_ref().map(|c| c.label.as_str())
    }

    /// Check if there's an active connection.
    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// Close the active connection.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.active.take() {
            conn.db.close().await?;
        }
        Ok(())
    }

    fn require(&self) -> Result<&ActiveConnection> {
        self.active
            .as_ref()
            .ok_or_else(|| ChatError::connection("Not connected to a database"))
    }
}
