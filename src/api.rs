//! HTTP API endpoints.
//!
//! Read-only views for dashboards and load balancers; every mutation goes
//! through the WebSocket protocol.

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::state::{AppState, ChatSummary};

/// List open chats.
///
/// GET /api/chats
pub async fn list_open_chats(State(state): State<Arc<AppState>>) -> Json<Vec<ChatSummary>> {
    Json(state.open_chats().await)
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chats", get(list_open_chats))
        .route("/health", get(health))
}
