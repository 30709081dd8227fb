//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Open pooled connections
    pub connections: u32,
    /// Open connections not checked out
    pub idle_connections: usize,
}

/// GET /health - liveness plus pool occupancy; never touches the database
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let pool = state.db.pool();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        connections: pool.size(),
        idle_connections: pool.num_idle(),
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
