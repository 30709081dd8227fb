//! Shared helpers for router-level integration tests
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p realty-server -- --ignored

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use realty_server::{build_router, AppState, Database, ServerConfig};

/// Route server logs through the test harness; repeat calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("realty_server=debug")
        .with_test_writer()
        .try_init();
}

pub fn app(pool: PgPool) -> Router {
    init_tracing();
    build_router(
        AppState::new(Database::from_pool(pool)),
        &ServerConfig::default(),
    )
}

/// Send one request and decode the JSON body (`Value::Null` when empty).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn insert_user(pool: &PgPool, full_name: &str, email: &str) -> i32 {
    sqlx::query_scalar("INSERT INTO users (full_name, email) VALUES ($1, $2) RETURNING user_id")
        .bind(full_name)
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_rows(pool: &PgPool, table: &str, house_id: i32) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE house_id = $1", table))
        .bind(house_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_all(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}
