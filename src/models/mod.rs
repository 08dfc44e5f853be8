//! Data models for the StarRocks MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod query;

// Re-export commonly used types
pub use connection::{ConnectionConfig, ConnectionConfigError};
pub use query::{ExecutionMode, MutationOutcome, QueryResult, Row, RowSet};
