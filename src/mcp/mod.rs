//! MCP server integration module.
//!
//! This module binds the tool router to the MCP protocol using the rmcp
//! framework.

pub mod service;

pub use service::StarRocksService;
