//! The single database session shared by every tool call.
//!
//! [`Connection`] owns at most one live [`Session`]. The session is created by a
//! [`Connector`] on [`Connection::connect`] and released on [`Connection::close`];
//! there is no pool and no automatic reconnect. All access goes through an
//! async mutex because the underlying session cannot be used concurrently.

use crate::error::{DbError, DbResult};
use crate::models::{ConnectionConfig, MutationOutcome, QueryResult, RowSet};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// A live session with the database.
#[async_trait]
pub trait Session: Send {
    /// Run a statement expected to return rows.
    async fn query(&mut self, sql: &str) -> DbResult<RowSet>;

    /// Run a statement expected to change rows or schema.
    async fn execute(&mut self, sql: &str) -> DbResult<MutationOutcome>;

    async fn begin(&mut self) -> DbResult<()>;

    async fn commit(&mut self) -> DbResult<()>;

    async fn rollback(&mut self) -> DbResult<()>;

    /// Liveness probe.
    async fn ping(&mut self) -> DbResult<()>;

    async fn close(self: Box<Self>) -> DbResult<()>;
}

/// Opens sessions for a [`Connection`].
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, config: &ConnectionConfig) -> DbResult<Box<dyn Session>>;
}

pub struct Connection {
    config: ConnectionConfig,
    connector: Arc<dyn Connector>,
    /// Some iff `connect` succeeded and `close` has not been called since.
    session: Mutex<Option<Box<dyn Session>>>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Create a connection that talks to StarRocks over the MySQL protocol.
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_connector(config, Arc::new(crate::db::mysql::MySqlConnector))
    }

    /// Create a connection that obtains its session from `connector`.
    pub fn with_connector(config: ConnectionConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            config,
            connector,
            session: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Establish the session.
    ///
    /// Any session left over from an earlier call is closed and replaced.
    pub async fn connect(&self) -> DbResult<()> {
        let target = self.config.target();
        let session = match self.connector.connect(&self.config).await {
            Ok(session) => session,
            Err(e) => {
                error!(target_db = %target, error = %e, "Failed to connect to StarRocks");
                return Err(e);
            }
        };

        let previous = self.session.lock().await.replace(session);
        if let Some(previous) = previous {
            if let Err(e) = previous.close().await {
                warn!(error = %e, "Failed to close replaced session");
            }
        }

        info!(target_db = %target, "Connected to StarRocks");
        Ok(())
    }

    /// Run a statement expected to return rows.
    ///
    /// Database-level failures come back as [`QueryResult::Failure`]; only a
    /// missing session is an `Err`.
    pub async fn query(&self, sql: &str) -> DbResult<QueryResult> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(DbError::NotEstablished)?;

        match session.query(sql).await {
            Ok(rows) => Ok(QueryResult::Rows(rows)),
            Err(e) => Ok(failure_result("query", e)),
        }
    }

    /// Run a statement expected to change rows or schema.
    ///
    /// Same failure policy as [`Connection::query`].
    pub async fn execute(&self, sql: &str) -> DbResult<QueryResult> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(DbError::NotEstablished)?;

        match session.execute(sql).await {
            Ok(outcome) => Ok(QueryResult::Mutation(outcome)),
            Err(e) => Ok(failure_result("execute", e)),
        }
    }

    pub async fn begin_transaction(&self) -> DbResult<()> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(DbError::NotEstablished)?;
        session.begin().await?;
        debug!("Transaction started");
        Ok(())
    }

    pub async fn commit(&self) -> DbResult<()> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(DbError::NotEstablished)?;
        session.commit().await?;
        debug!("Transaction committed");
        Ok(())
    }

    pub async fn rollback(&self) -> DbResult<()> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(DbError::NotEstablished)?;
        session.rollback().await?;
        debug!("Transaction rolled back");
        Ok(())
    }

    /// Release the session. Calling this again is a no-op.
    pub async fn close(&self) {
        let Some(session) = self.session.lock().await.take() else {
            return;
        };

        match session.close().await {
            Ok(()) => info!("Database connection closed"),
            Err(e) => warn!(error = %e, "Error while closing database connection"),
        }
    }

    /// Probe the session. Never fails: a missing or dead session is `false`.
    pub async fn ping(&self) -> bool {
        let mut guard = self.session.lock().await;
        let Some(session) = guard.as_mut() else {
            return false;
        };

        match session.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Ping failed");
                false
            }
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.ping().await
    }

    /// Whether a session handle is held, without touching the network.
    pub async fn is_established(&self) -> bool {
        self.session.lock().await.is_some()
    }
}

fn failure_result(operation: &str, err: DbError) -> QueryResult {
    warn!(operation = operation, code = ?err.code(), error = %err, "Statement failed");
    if let Some(hint) = err.code().and_then(sql_error_hint) {
        debug!(hint = hint, "Statement failure hint");
    }
    QueryResult::failure(err.detail())
}

/// Hint for common SQLSTATE classes, used in diagnostics only.
fn sql_error_hint(sql_state: &str) -> Option<&'static str> {
    match sql_state {
        "42000" => Some("Check the SQL syntax and access privileges"),
        "42S02" => Some("Table does not exist, check the table name"),
        "42S22" => Some("Column does not exist, check the column name"),
        "23000" => Some("Duplicate entry violates a uniqueness constraint"),
        "22001" => Some("Data is too long for the column"),
        "21S01" => Some("Column count does not match value count"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_error_hint_known_states() {
        assert!(sql_error_hint("42S02").unwrap().contains("Table"));
        assert!(sql_error_hint("42S22").unwrap().contains("Column"));
        assert!(sql_error_hint("23000").unwrap().contains("Duplicate"));
        assert!(sql_error_hint("HY000").is_none());
    }

    #[test]
    fn test_failure_result_uses_database_message() {
        let result = failure_result(
            "query",
            DbError::database("Unknown table 'x'", Some("42S02".to_string())),
        );
        assert_eq!(result, QueryResult::failure("Unknown table 'x'"));
    }
}
