//! Integration tests for the shared connection lifecycle.

mod common;

use common::{Call, spy_connection};
use serde_json::json;
use starrocks_mcp_server::db::QueryExecutor;
use starrocks_mcp_server::error::DbError;
use starrocks_mcp_server::models::{ExecutionMode, MutationOutcome, QueryResult};

#[tokio::test]
async fn test_operations_before_connect_fail_not_established() {
    let (conn, spy) = spy_connection();

    assert!(!conn.is_established().await);
    assert!(matches!(conn.query("SELECT 1").await, Err(DbError::NotEstablished)));
    assert!(matches!(
        conn.execute("INSERT INTO t VALUES (1)").await,
        Err(DbError::NotEstablished)
    ));
    assert!(matches!(conn.begin_transaction().await, Err(DbError::NotEstablished)));
    assert!(matches!(conn.commit().await, Err(DbError::NotEstablished)));
    assert!(matches!(conn.rollback().await, Err(DbError::NotEstablished)));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_ping_before_connect_is_false() {
    let (conn, spy) = spy_connection();

    assert!(!conn.ping().await);
    assert!(!conn.is_connected().await);
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_connect_then_ping() {
    let (conn, spy) = spy_connection();

    conn.connect().await.unwrap();

    assert!(conn.is_established().await);
    assert!(conn.ping().await);
    assert_eq!(spy.calls(), vec![Call::Connect, Call::Ping]);
}

#[tokio::test]
async fn test_failed_ping_reports_false() {
    let (conn, spy) = spy_connection();
    conn.connect().await.unwrap();
    spy.fail_ping();

    assert!(!conn.is_connected().await);
    // The handle is kept; there is no automatic reconnect
    assert!(conn.is_established().await);
}

#[tokio::test]
async fn test_connect_failure_leaves_no_session() {
    let (conn, spy) = spy_connection();
    spy.fail_connect_with(DbError::connection(
        "Failed to connect: Connection refused",
        "Check that the StarRocks FE is running",
    ));

    let err = conn.connect().await.unwrap_err();

    assert!(matches!(err, DbError::Connection { .. }));
    assert_eq!(err.suggestion(), Some("Check that the StarRocks FE is running"));
    assert!(!conn.is_established().await);
}

#[tokio::test]
async fn test_reconnect_closes_previous_session() {
    let (conn, spy) = spy_connection();

    conn.connect().await.unwrap();
    conn.connect().await.unwrap();

    assert_eq!(spy.calls(), vec![Call::Connect, Call::Connect, Call::Close]);
    assert!(conn.is_established().await);
}

#[tokio::test]
async fn test_double_close_is_noop() {
    let (conn, spy) = spy_connection();
    conn.connect().await.unwrap();

    conn.close().await;
    conn.close().await;

    assert_eq!(spy.calls(), vec![Call::Connect, Call::Close]);
    assert!(!conn.is_established().await);
    assert!(matches!(conn.query("SELECT 1").await, Err(DbError::NotEstablished)));
}

#[tokio::test]
async fn test_close_before_connect_is_noop() {
    let (conn, spy) = spy_connection();

    conn.close().await;

    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_close_error_is_swallowed() {
    let (conn, spy) = spy_connection();
    conn.connect().await.unwrap();
    spy.fail_close();

    conn.close().await;

    assert!(!conn.is_established().await);
}

#[tokio::test]
async fn test_database_error_becomes_failure_result() {
    let (conn, spy) = spy_connection();
    conn.connect().await.unwrap();
    spy.push_query_error(DbError::database(
        "Getting syntax error at line 1",
        Some("42000".to_string()),
    ));

    let result = conn.query("SELEC 1").await.unwrap();

    assert_eq!(result, QueryResult::failure("Getting syntax error at line 1"));
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"success": false, "error": "Getting syntax error at line 1"})
    );
}

#[tokio::test]
async fn test_transaction_primitives_delegate() {
    let (conn, spy) = spy_connection();
    conn.connect().await.unwrap();

    conn.begin_transaction().await.unwrap();
    conn.execute("INSERT INTO t VALUES (1)").await.unwrap();
    conn.rollback().await.unwrap();
    conn.begin_transaction().await.unwrap();
    conn.commit().await.unwrap();

    assert_eq!(
        spy.session_calls(),
        vec![
            Call::Begin,
            Call::Execute("INSERT INTO t VALUES (1)".into()),
            Call::Rollback,
            Call::Begin,
            Call::Commit,
        ]
    );
}

#[tokio::test]
async fn test_executor_selects_primitive_by_mode() {
    let (conn, spy) = spy_connection();
    conn.connect().await.unwrap();
    spy.push_rows(&["n"], vec![json!({"n": 5})]);
    spy.push_mutation(MutationOutcome {
        affected_rows: 1,
        last_insert_id: Some(10),
        message: None,
    });
    let executor = QueryExecutor::new(conn.clone());

    let rows = executor.run("SELECT 5 AS n", ExecutionMode::Rows).await.unwrap();
    let mutation = executor
        .run("INSERT INTO t VALUES (1)", ExecutionMode::Mutation)
        .await
        .unwrap();

    assert_eq!(rows.row_count(), 1);
    assert_eq!(
        serde_json::to_value(&mutation).unwrap(),
        json!({"success": true, "affectedRows": 1, "insertId": 10})
    );
    assert_eq!(
        spy.session_calls(),
        vec![
            Call::Query("SELECT 5 AS n".into()),
            Call::Execute("INSERT INTO t VALUES (1)".into()),
        ]
    );
}

#[tokio::test]
async fn test_executor_propagates_not_established() {
    let (conn, _spy) = spy_connection();
    let executor = QueryExecutor::new(conn);

    let err = executor.run("SELECT 1", ExecutionMode::Rows).await.unwrap_err();

    assert_eq!(err.to_string(), "Database connection not established");
}
