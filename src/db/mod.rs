//! Database access layer.
//!
//! This module provides database access functionality:
//! - The single shared connection and its session traits
//! - The StarRocks session over the MySQL protocol
//! - Statement execution
//! - Row decoding

pub mod connection;
pub mod executor;
pub mod mysql;
pub mod types;

pub use connection::{Connection, Connector, Session};
pub use executor::QueryExecutor;
pub use mysql::{MySqlConnector, MySqlSession};
