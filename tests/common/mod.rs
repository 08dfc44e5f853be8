//! Shared test helpers: a scripted in-memory session that records every call.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use starrocks_mcp_server::db::{Connection, Connector, QueryExecutor, Session};
use starrocks_mcp_server::error::{DbError, DbResult};
use starrocks_mcp_server::models::{ConnectionConfig, MutationOutcome, Row, RowSet};
use starrocks_mcp_server::tools::ToolRouter;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A call observed by the spy session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect,
    Query(String),
    Execute(String),
    Begin,
    Commit,
    Rollback,
    Ping,
    Close,
}

#[derive(Default)]
struct SpyState {
    calls: Vec<Call>,
    query_results: VecDeque<DbResult<RowSet>>,
    execute_results: VecDeque<DbResult<MutationOutcome>>,
    connect_error: Option<DbError>,
    ping_fails: bool,
    close_fails: bool,
    statement_delay: Option<Duration>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Handle for scripting results and inspecting calls.
#[derive(Clone, Default)]
pub struct Spy {
    state: Arc<Mutex<SpyState>>,
}

impl Spy {
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that reached an open session, ignoring connect.
    pub fn session_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| *call != Call::Connect)
            .collect()
    }

    pub fn push_rows(&self, columns: &[&str], rows: Vec<JsonValue>) {
        let rows = rows
            .into_iter()
            .map(|row| match row {
                JsonValue::Object(map) => map,
                _ => Row::new(),
            })
            .collect();
        let columns = columns.iter().map(|c| c.to_string()).collect();
        self.state
            .lock()
            .unwrap()
            .query_results
            .push_back(Ok(RowSet::new(columns, rows)));
    }

    pub fn push_query_error(&self, err: DbError) {
        self.state.lock().unwrap().query_results.push_back(Err(err));
    }

    pub fn push_mutation(&self, outcome: MutationOutcome) {
        self.state
            .lock()
            .unwrap()
            .execute_results
            .push_back(Ok(outcome));
    }

    pub fn push_execute_error(&self, err: DbError) {
        self.state.lock().unwrap().execute_results.push_back(Err(err));
    }

    pub fn fail_connect_with(&self, err: DbError) {
        self.state.lock().unwrap().connect_error = Some(err);
    }

    pub fn fail_ping(&self) {
        self.state.lock().unwrap().ping_fails = true;
    }

    pub fn fail_close(&self) {
        self.state.lock().unwrap().close_fails = true;
    }

    /// Make every query and execute take `delay` before answering.
    pub fn delay_statements(&self, delay: Duration) {
        self.state.lock().unwrap().statement_delay = Some(delay);
    }

    /// Highest number of statements seen running at once.
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    async fn run_statement(&self) {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            state.statement_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.state.lock().unwrap().in_flight -= 1;
    }
}

pub struct SpyConnector {
    spy: Spy,
}

#[async_trait]
impl Connector for SpyConnector {
    async fn connect(&self, _config: &ConnectionConfig) -> DbResult<Box<dyn Session>> {
        self.spy.record(Call::Connect);
        if let Some(err) = self.spy.state.lock().unwrap().connect_error.take() {
            return Err(err);
        }
        Ok(Box::new(SpySession {
            spy: self.spy.clone(),
        }))
    }
}

struct SpySession {
    spy: Spy,
}

#[async_trait]
impl Session for SpySession {
    async fn query(&mut self, sql: &str) -> DbResult<RowSet> {
        self.spy.record(Call::Query(sql.to_string()));
        self.spy.run_statement().await;
        self.spy
            .state
            .lock()
            .unwrap()
            .query_results
            .pop_front()
            .unwrap_or_else(|| Ok(RowSet::default()))
    }

    async fn execute(&mut self, sql: &str) -> DbResult<MutationOutcome> {
        self.spy.record(Call::Execute(sql.to_string()));
        self.spy.run_statement().await;
        self.spy
            .state
            .lock()
            .unwrap()
            .execute_results
            .pop_front()
            .unwrap_or_else(|| Ok(MutationOutcome::default()))
    }

    async fn begin(&mut self) -> DbResult<()> {
        self.spy.record(Call::Begin);
        Ok(())
    }

    async fn commit(&mut self) -> DbResult<()> {
        self.spy.record(Call::Commit);
        Ok(())
    }

    async fn rollback(&mut self) -> DbResult<()> {
        self.spy.record(Call::Rollback);
        Ok(())
    }

    async fn ping(&mut self) -> DbResult<()> {
        self.spy.record(Call::Ping);
        if self.spy.state.lock().unwrap().ping_fails {
            return Err(DbError::connection("Lost connection", "Reconnect"));
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> DbResult<()> {
        self.spy.record(Call::Close);
        if self.spy.state.lock().unwrap().close_fails {
            return Err(DbError::connection("Broken pipe", "None"));
        }
        Ok(())
    }
}

pub fn test_config() -> ConnectionConfig {
    ConnectionConfig::new("127.0.0.1", 9030, "root", "", Duration::from_secs(1)).unwrap()
}

/// A connection backed by a fresh spy. Not yet connected.
pub fn spy_connection() -> (Arc<Connection>, Spy) {
    let spy = Spy::default();
    let connector = Arc::new(SpyConnector { spy: spy.clone() });
    let connection = Arc::new(Connection::with_connector(test_config(), connector));
    (connection, spy)
}

/// A router over a spy connection, optionally connected first.
pub async fn spy_router(connected: bool) -> (ToolRouter, Arc<Connection>, Spy) {
    let (connection, spy) = spy_connection();
    if connected {
        connection.connect().await.unwrap();
    }
    let router = ToolRouter::new(QueryExecutor::new(connection.clone()));
    (router, connection, spy)
}

/// Build a tool argument map from a JSON object literal.
pub fn args(value: JsonValue) -> serde_json::Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}
