//! Configuration handling for the StarRocks MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment variables.

use crate::models::{ConnectionConfig, ConnectionConfigError};
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9030;
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_CHARSET: &str = "utf8mb4";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 60;

/// Time zone value that leaves the server's session time zone untouched.
pub const LOCAL_TIMEZONE: &str = "local";

/// Configuration for the StarRocks MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "starrocks-mcp-server",
    about = "MCP server for StarRocks - exposes SQL query and data management tools to AI assistants",
    version,
    author
)]
pub struct Config {
    /// StarRocks FE host
    #[arg(long, default_value = DEFAULT_HOST, env = "STARROCKS_HOST")]
    pub host: String,

    /// StarRocks FE query port (MySQL protocol)
    #[arg(long, default_value_t = DEFAULT_PORT, env = "STARROCKS_PORT")]
    pub port: u16,

    #[arg(long, default_value = DEFAULT_USER, env = "STARROCKS_USER")]
    pub user: String,

    /// Password (sensitive - not logged)
    #[arg(long, default_value = "", env = "STARROCKS_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Default database for the session
    #[arg(long, env = "STARROCKS_DATABASE")]
    pub database: Option<String>,

    #[arg(long, default_value = DEFAULT_CHARSET, env = "STARROCKS_CHARSET")]
    pub charset: String,

    /// Session time zone such as "+08:00"; "local" keeps the server setting
    #[arg(long, default_value = LOCAL_TIMEZONE, env = "STARROCKS_TIMEZONE")]
    pub timezone: String,

    /// Connection timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        env = "STARROCKS_CONNECT_TIMEOUT"
    )]
    pub connect_timeout: u64,

    /// Session idle timeout in seconds, applied as wait_timeout
    #[arg(long, env = "STARROCKS_IDLE_TIMEOUT")]
    pub idle_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,

    /// Enable logging output on stderr (disabled by default)
    #[arg(long, env = "MCP_ENABLE_LOGS")]
    pub enable_logs: bool,
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            database: None,
            charset: DEFAULT_CHARSET.to_string(),
            timezone: LOCAL_TIMEZONE.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            idle_timeout: None,
            log_level: "info".to_string(),
            json_logs: false,
            enable_logs: false,
        }
    }

    /// Get the connection timeout as a Duration.
    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Build the validated session configuration.
    ///
    /// Empty database, charset and time zone values count as unset.
    pub fn connection_config(&self) -> Result<ConnectionConfig, ConnectionConfigError> {
        let mut config = ConnectionConfig::new(
            &self.host,
            self.port,
            &self.user,
            &self.password,
            self.connect_timeout_duration(),
        )?;

        if let Some(database) = non_empty(self.database.as_deref()) {
            config = config.with_database(database);
        }
        if let Some(charset) = non_empty(Some(&self.charset)) {
            config = config.with_charset(charset);
        }
        if let Some(timezone) = non_empty(Some(&self.timezone))
            .filter(|tz| !tz.eq_ignore_ascii_case(LOCAL_TIMEZONE))
        {
            config = config.with_timezone(timezone);
        }
        if let Some(secs) = self.idle_timeout.filter(|secs| *secs > 0) {
            config = config.with_idle_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
