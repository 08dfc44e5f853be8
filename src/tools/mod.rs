//! MCP tool implementations.
//!
//! - `sql_validator`: statement classification by leading keyword
//! - `router`: the tool catalog and per-call dispatch
//! - `format`: the text response envelope

pub mod format;
pub mod router;
pub mod sql_validator;

pub use format::{TextBlock, ToolResponse};
pub use router::{ToolName, ToolRouter};
pub use sql_validator::SqlKind;
