//! Tool dispatch.
//!
//! Every tool takes a single `query` string. [`ToolRouter::dispatch`] runs the
//! same pipeline for all of them: resolve the tool name, validate the argument,
//! apply the tool's statement check, execute, and render. Any failure along the
//! way becomes an `Error: ...` text response; nothing escapes as a protocol
//! error.

use crate::db::QueryExecutor;
use crate::error::{DbError, DbResult};
use crate::models::ExecutionMode;
use crate::tools::format::{ToolResponse, render_success};
use crate::tools::sql_validator::is_select;
use serde_json::{Map, Value as JsonValue};
use std::str::FromStr;
use tracing::{debug, error, info};

/// The fixed tool catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    RunSqlQuery,
    CreateTable,
    InsertData,
    UpdateData,
    DeleteData,
    ExecuteSql,
}

impl ToolName {
    /// Catalog order as advertised to clients.
    pub const ALL: [ToolName; 6] = [
        Self::RunSqlQuery,
        Self::CreateTable,
        Self::InsertData,
        Self::UpdateData,
        Self::DeleteData,
        Self::ExecuteSql,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RunSqlQuery => "run_sql_query",
            Self::CreateTable => "create_table",
            Self::InsertData => "insert_data",
            Self::UpdateData => "update_data",
            Self::DeleteData => "delete_data",
            Self::ExecuteSql => "execute_sql",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::RunSqlQuery => "Run a read-only SQL query (SELECT statements only)",
            Self::CreateTable => "Create a new table in the StarRocks database",
            Self::InsertData => "Insert data into a StarRocks table",
            Self::UpdateData => "Update data in a StarRocks table",
            Self::DeleteData => "Delete data from a StarRocks table",
            Self::ExecuteSql => {
                "Execute any non-SELECT SQL statement (such as ALTER TABLE or DROP)"
            }
        }
    }

    /// Description of the `query` argument.
    pub fn query_description(&self) -> &'static str {
        match self {
            Self::RunSqlQuery => "The SQL SELECT statement to run",
            Self::CreateTable => "The SQL CREATE TABLE statement to execute",
            Self::InsertData => "The SQL INSERT INTO statement to execute",
            Self::UpdateData => "The SQL UPDATE statement to execute",
            Self::DeleteData => "The SQL DELETE FROM statement to execute",
            Self::ExecuteSql => "The SQL statement to execute",
        }
    }

    /// Whether the statement must classify as SELECT before it may run.
    pub fn requires_select(&self) -> bool {
        matches!(self, Self::RunSqlQuery)
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        match self {
            Self::RunSqlQuery => ExecutionMode::Rows,
            _ => ExecutionMode::Mutation,
        }
    }

    /// Error text used when the database rejects a statement without a message.
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            Self::RunSqlQuery => "Query execution failed",
            Self::CreateTable => "Table creation failed",
            Self::InsertData => "Data insertion failed",
            Self::UpdateData => "Data update failed",
            Self::DeleteData => "Data deletion failed",
            Self::ExecuteSql => "SQL execution failed",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| DbError::unknown_tool(s))
    }
}

/// Routes tool calls to the executor.
#[derive(Debug, Clone)]
pub struct ToolRouter {
    executor: QueryExecutor,
}

impl ToolRouter {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    /// Handle one tool call. Never fails: errors are rendered into the response.
    pub async fn dispatch(&self, name: &str, args: &Map<String, JsonValue>) -> ToolResponse {
        match self.try_dispatch(name, args).await {
            Ok(text) => ToolResponse::text(text),
            Err(e) => {
                error!(tool = %name, error = %e, "Tool call failed");
                ToolResponse::error(&e)
            }
        }
    }

    async fn try_dispatch(&self, name: &str, args: &Map<String, JsonValue>) -> DbResult<String> {
        let tool: ToolName = name.parse()?;
        let sql = extract_query(args)?;

        if tool.requires_select() && !is_select(sql) {
            return Err(DbError::policy_violation(
                "Only SELECT queries are allowed for this tool",
            ));
        }

        debug!(tool = %tool, "Dispatching tool call");
        let result = self.executor.run(sql, tool.execution_mode()).await?;
        let text = render_success(tool, &result)?;

        info!(tool = %tool, row_count = result.row_count(), "Tool call succeeded");
        Ok(text)
    }
}

fn extract_query(args: &Map<String, JsonValue>) -> DbResult<&str> {
    match args.get("query") {
        Some(JsonValue::String(sql)) if !sql.is_empty() => Ok(sql.as_str()),
        _ => Err(DbError::invalid_argument(
            "Query parameter is required and must be a string",
        )),
    }
}
