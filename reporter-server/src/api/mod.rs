//! HTTP API
//!
//! Two surfaces: a health probe and the synchronous CreateFile entry point
//! that validates a report request and publishes it onto the job queue.

pub mod report_file;

use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/v1/report_file", post(report_file::create_file))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<ServerState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "broker_connected": state.publisher.is_connected(),
    }))
}
