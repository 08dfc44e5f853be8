//! StarRocks MCP Server Library
//!
//! This library exposes a StarRocks database to AI assistants as a small set
//! of MCP tools: read-only queries, table creation, data changes and arbitrary
//! statements, all running over one shared session.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::StarRocksService;
