//! Support-chat coordinator: routes one client and at most one admin per
//! chat over WebSocket, keeping history for replay while the chat is open.

pub mod api;
pub mod config;
pub mod error;
pub mod protocol;
pub mod state;
pub mod types;
pub mod ws;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the full HTTP/WebSocket router for a state
pub fn app(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(api::routes());

    if state.config.cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
