//! Connection-related data models.
//!
//! This module defines the configuration for the single StarRocks session.
//! Defaults are applied by the caller (see [`crate::config`]); everything optional
//! here stays unset unless explicitly provided.

use serde::Serialize;
use std::time::Duration;

/// Configuration for the database session.
#[derive(Clone, Serialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Contains sensitive data - never log
    #[serde(skip_serializing)]
    pub password: String,
    pub database: Option<String>,
    pub charset: Option<String>,
    /// Session time zone such as `+08:00`. None leaves the server setting untouched.
    pub timezone: Option<String>,
    pub connect_timeout: Duration,
    /// Applied as the session `wait_timeout` when set.
    pub idle_timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Create a new connection configuration.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, ConnectionConfigError> {
        let host = host.into();
        let user = user.into();

        if host.trim().is_empty() {
            return Err(ConnectionConfigError::EmptyHost);
        }
        if port == 0 {
            return Err(ConnectionConfigError::InvalidPort);
        }
        if user.is_empty() {
            return Err(ConnectionConfigError::EmptyUser);
        }
        if connect_timeout.is_zero() {
            return Err(ConnectionConfigError::ZeroConnectTimeout);
        }

        Ok(Self {
            host,
            port,
            user,
            password: password.into(),
            database: None,
            charset: None,
            timezone: None,
            connect_timeout,
            idle_timeout: None,
        })
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = Some(idle_timeout);
        self
    }

    /// Display-safe description of the target, e.g. `root@127.0.0.1:9030/sales`.
    pub fn target(&self) -> String {
        match &self.database {
            Some(db) => format!("{}@{}:{}/{}", self.user, self.host, self.port, db),
            None => format!("{}@{}:{}", self.user, self.host, self.port),
        }
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .field("database", &self.database)
            .field("charset", &self.charset)
            .field("timezone", &self.timezone)
            .field("connect_timeout", &self.connect_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}

/// Errors that can occur when creating a connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionConfigError {
    #[error("Database host cannot be empty")]
    EmptyHost,

    #[error("Database port must be greater than 0")]
    InvalidPort,

    #[error("Database user cannot be empty")]
    EmptyUser,

    #[error("Connect timeout must be greater than 0")]
    ZeroConnectTimeout,
}
