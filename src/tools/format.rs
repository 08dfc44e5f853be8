//! Response formatting for MCP tools.
//!
//! Every tool answers with a single text block. Successful results are
//! rendered per tool; errors render as `Error: {message}`.

use crate::error::{DbError, DbResult};
use crate::models::QueryResult;
use crate::tools::router::ToolName;
use serde::Serialize;

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text",
            text: text.into(),
        }
    }
}

/// The uniform tool response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    pub content: Vec<TextBlock>,
    /// Reported to MCP as `isError`; not part of the envelope itself.
    #[serde(skip)]
    pub is_error: bool,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextBlock::new(text)],
            is_error: false,
        }
    }

    pub fn error(err: &DbError) -> Self {
        Self {
            content: vec![TextBlock::new(format!("Error: {}", err))],
            is_error: true,
        }
    }

    /// Text of the first block, or "" for an empty response.
    pub fn first_text(&self) -> &str {
        self.content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default()
    }
}

/// Render a statement result for `tool`.
///
/// A failure-shaped result becomes an execution error carrying the database
/// message, or the tool's fallback text when the database gave none.
pub fn render_success(tool: ToolName, result: &QueryResult) -> DbResult<String> {
    if let QueryResult::Failure { message } = result {
        let message = if message.is_empty() {
            tool.failure_fallback()
        } else {
            message.as_str()
        };
        return Err(DbError::execution(message));
    }

    let text = match tool {
        ToolName::RunSqlQuery => serde_json::to_string_pretty(result)
            .map_err(|e| DbError::internal(format!("Failed to serialize result: {}", e)))?,
        ToolName::CreateTable => format!("Table created successfully. {}", message_of(result)),
        ToolName::InsertData => format!(
            "Data inserted successfully. Affected rows: {}",
            result.row_count()
        ),
        ToolName::UpdateData => format!(
            "Data updated successfully. Affected rows: {}",
            result.row_count()
        ),
        ToolName::DeleteData => format!(
            "Data deleted successfully. Affected rows: {}",
            result.row_count()
        ),
        ToolName::ExecuteSql => format!("SQL executed successfully. {}", message_of(result)),
    };

    Ok(text)
}

fn message_of(result: &QueryResult) -> &str {
    match result {
        QueryResult::Mutation(outcome) => outcome.message.as_deref().unwrap_or_default(),
        _ => "",
    }
}
