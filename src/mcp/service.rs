//! MCP service implementation using rmcp.
//!
//! `StarRocksService` advertises the fixed tool catalog and hands every call to
//! the [`ToolRouter`]. The handler is written by hand rather than with the
//! rmcp tool macros so that unknown tool names and malformed arguments are
//! answered with the text envelope instead of a protocol error.

use crate::db::{Connection, QueryExecutor};
use crate::error::DbResult;
use crate::tools::format::ToolResponse;
use crate::tools::router::{ToolName, ToolRouter};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool,
    },
    service::RequestContext,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct StarRocksService {
    /// The single shared database connection
    connection: Arc<Connection>,
    router: ToolRouter,
}

impl StarRocksService {
    pub fn new(connection: Arc<Connection>) -> Self {
        let router = ToolRouter::new(QueryExecutor::new(connection.clone()));
        Self { connection, router }
    }

    /// Open the database session. Must succeed before serving.
    pub async fn initialize(&self) -> DbResult<()> {
        self.connection.connect().await?;
        info!(
            target_db = %self.connection.config().target(),
            "StarRocks MCP service initialized"
        );
        Ok(())
    }

    /// Close the database session. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.connection.close().await;
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Tool definitions in catalog order.
    pub fn tool_catalog() -> Vec<Tool> {
        ToolName::ALL
            .into_iter()
            .map(|tool| Tool::new(tool.as_str(), tool.description(), query_schema(tool)))
            .collect()
    }
}

/// Input schema shared by every tool: a single required `query` string.
fn query_schema(tool: ToolName) -> Arc<JsonObject> {
    let schema = json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": tool.query_description(),
            }
        },
        "required": ["query"],
    });

    match schema {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

impl From<ToolResponse> for CallToolResult {
    fn from(response: ToolResponse) -> Self {
        let content = response
            .content
            .into_iter()
            .map(|block| Content::text(block.text))
            .collect();

        if response.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

impl ServerHandler for StarRocksService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "starrocks-mcp-server".to_owned(),
                title: Some("StarRocks MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "SQL tools for a StarRocks analytics database.\n\
                \n\
                Every tool takes a single `query` argument holding one SQL statement.\n\
                \n\
                ## Tools\n\
                - `run_sql_query`: SELECT statements only; returns rows and column names as JSON\n\
                - `create_table`: CREATE TABLE statements\n\
                - `insert_data`, `update_data`, `delete_data`: return the affected row count\n\
                - `execute_sql`: any other statement, such as ALTER TABLE or DROP\n\
                \n\
                ## Errors\n\
                Failures are returned as text starting with `Error: `."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(Self::tool_catalog()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "Received tool call");
        let args = request.arguments.unwrap_or_default();
        let response = self.router.dispatch(&request.name, &args).await;
        Ok(response.into())
    }
}
