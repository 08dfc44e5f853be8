//! Query-related data models.
//!
//! This module defines the uniform result shape produced for every statement,
//! whether it returned rows, changed rows, or was rejected by the database.

use serde::ser::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// A single result row keyed by column name, in column order.
pub type Row = serde_json::Map<String, JsonValue>;

/// How a statement is expected to report its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// The statement returns a row set (SELECT).
    Rows,
    /// The statement reports an affected-row count (DML, DDL, anything else).
    Mutation,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rows => write!(f, "rows"),
            Self::Mutation => write!(f, "mutation"),
        }
    }
}

/// Rows returned by a statement together with their column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }
}

/// Outcome of a mutating statement.
///
/// Which fields are present depends on the statement and the server; an
/// absent field is not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationOutcome {
    pub affected_rows: u64,
    pub last_insert_id: Option<u64>,
    pub message: Option<String>,
}

impl MutationOutcome {
    pub fn affected(affected_rows: u64) -> Self {
        Self {
            affected_rows,
            ..Self::default()
        }
    }
}

/// Result of running one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Rows(RowSet),
    Mutation(MutationOutcome),
    /// The database rejected the statement.
    Failure { message: String },
}

impl QueryResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failure { .. })
    }

    /// Number of rows returned or affected; zero for failures.
    pub fn row_count(&self) -> u64 {
        match self {
            Self::Rows(set) => set.rows.len() as u64,
            Self::Mutation(outcome) => outcome.affected_rows,
            Self::Failure { .. } => 0,
        }
    }
}

/// JSON form of a result as seen by MCP clients.
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultEnvelope<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a [Row]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    columns: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    affected_rows: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    insert_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let envelope = match self {
            Self::Rows(set) => ResultEnvelope {
                success: true,
                data: Some(&set.rows),
                columns: Some(&set.columns),
                affected_rows: None,
                insert_id: None,
                message: None,
                error: None,
            },
            Self::Mutation(outcome) => ResultEnvelope {
                success: true,
                data: None,
                columns: None,
                affected_rows: Some(outcome.affected_rows),
                insert_id: outcome.last_insert_id,
                message: outcome.message.as_deref(),
                error: None,
            },
            Self::Failure { message } => ResultEnvelope {
                success: false,
                data: None,
                columns: None,
                affected_rows: None,
                insert_id: None,
                message: None,
                error: Some(message),
            },
        };
        envelope.serialize(serializer)
    }
}
