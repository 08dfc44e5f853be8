//! Statement execution.
//!
//! [`QueryExecutor`] picks the connection primitive for an [`ExecutionMode`]
//! and records how long the statement took. Result shaping is done by the
//! connection; the executor never inspects the SQL.

use crate::db::connection::Connection;
use crate::error::DbResult;
use crate::models::{ExecutionMode, QueryResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Runs statements against the shared connection.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    connection: Arc<Connection>,
}

impl QueryExecutor {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    /// Run one statement.
    ///
    /// A statement the database rejects comes back as [`QueryResult::Failure`];
    /// `Err` means the statement never reached the database.
    pub async fn run(&self, sql: &str, mode: ExecutionMode) -> DbResult<QueryResult> {
        let start = Instant::now();
        debug!(sql = %sql, mode = %mode, "Executing statement");

        let result = match mode {
            ExecutionMode::Rows => self.connection.query(sql).await?,
            ExecutionMode::Mutation => self.connection.execute(sql).await?,
        };

        debug!(
            mode = %mode,
            success = result.is_success(),
            row_count = result.row_count(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Statement finished"
        );

        Ok(result)
    }
}
