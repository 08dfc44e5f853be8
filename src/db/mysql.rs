//! StarRocks session over the MySQL wire protocol.
//!
//! StarRocks FE nodes speak the MySQL protocol, so the session is a single
//! sqlx `MySqlConnection`. Statements are sent as plain strings, which keeps
//! them on the text protocol and lets one call carry several statements.

use crate::db::connection::{Connector, Session};
use crate::db::types::{column_names, row_to_json};
use crate::error::{DbError, DbResult};
use crate::models::{ConnectionConfig, MutationOutcome, RowSet};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection as _, Executor as _, Row as _, Statement as _};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Opens [`MySqlSession`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

impl MySqlConnector {
    fn connect_options(config: &ConnectionConfig) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .statement_cache_capacity(0)
            // StarRocks rejects the sql_mode sqlx would otherwise set
            .pipes_as_concat(false)
            .no_engine_substitution(false)
            .timezone(config.timezone.clone());

        if let Some(database) = &config.database {
            options = options.database(database);
        }
        if let Some(charset) = &config.charset {
            options = options.charset(charset);
        }

        options
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(&self, config: &ConnectionConfig) -> DbResult<Box<dyn Session>> {
        let options = Self::connect_options(config);
        let connect_timeout = config.connect_timeout;

        debug!(
            target_db = %config.target(),
            timeout_secs = connect_timeout.as_secs(),
            "Opening StarRocks session"
        );

        let mut conn = timeout(connect_timeout, MySqlConnection::connect_with(&options))
            .await
            .map_err(|_| DbError::timeout("connect", connect_timeout.as_secs()))?
            .map_err(|e| {
                DbError::connection(format!("Failed to connect: {}", e), connection_suggestion(&e))
            })?;

        if let Some(idle) = config.idle_timeout {
            let statement = format!("SET wait_timeout = {}", idle.as_secs());
            if let Err(e) = conn.execute(statement.as_str()).await {
                warn!(error = %e, "Failed to apply idle timeout");
            }
        }

        Ok(Box::new(MySqlSession { conn }))
    }
}

/// Generate a helpful suggestion for connection errors.
fn connection_suggestion(error: &sqlx::Error) -> String {
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") {
        return "Check that the StarRocks FE is running and the query port is reachable"
            .to_string();
    }

    if error_str.contains("access denied") || error_str.contains("password") {
        return "Verify STARROCKS_USER and STARROCKS_PASSWORD".to_string();
    }

    if error_str.contains("unknown database") || error_str.contains("does not exist") {
        return "Check that STARROCKS_DATABASE names an existing database".to_string();
    }

    if error_str.contains("tls") || error_str.contains("ssl") {
        return "Check TLS/SSL configuration or try disabling it".to_string();
    }

    "Verify STARROCKS_HOST and STARROCKS_PORT point at a StarRocks FE (default port 9030)"
        .to_string()
}

pub struct MySqlSession {
    conn: MySqlConnection,
}

impl MySqlSession {
    /// Column names from the statement metadata, for results without rows.
    ///
    /// Preparing does not run the statement. A statement the server cannot
    /// prepare leaves the columns empty.
    async fn describe_columns(&mut self, sql: &str) -> Vec<String> {
        match self.conn.prepare(sql).await {
            Ok(statement) => column_names(statement.columns()),
            Err(e) => {
                debug!(error = %e, "Could not describe columns of empty result");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl Session for MySqlSession {
    async fn query(&mut self, sql: &str) -> DbResult<RowSet> {
        let rows = self.conn.fetch_all(sql).await?;

        let columns = match rows.first() {
            Some(row) => column_names(row.columns()),
            None => self.describe_columns(sql).await,
        };
        let rows = rows.iter().map(row_to_json).collect();
        Ok(RowSet::new(columns, rows))
    }

    async fn execute(&mut self, sql: &str) -> DbResult<MutationOutcome> {
        let result = self.conn.execute(sql).await?;

        let last_insert_id = Some(result.last_insert_id()).filter(|id| *id != 0);
        Ok(MutationOutcome {
            affected_rows: result.rows_affected(),
            last_insert_id,
            message: None,
        })
    }

    async fn begin(&mut self) -> DbResult<()> {
        self.conn.execute("BEGIN").await?;
        Ok(())
    }

    async fn commit(&mut self) -> DbResult<()> {
        self.conn.execute("COMMIT").await?;
        Ok(())
    }

    async fn rollback(&mut self) -> DbResult<()> {
        self.conn.execute("ROLLBACK").await?;
        Ok(())
    }

    async fn ping(&mut self) -> DbResult<()> {
        self.conn.ping().await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> DbResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}
