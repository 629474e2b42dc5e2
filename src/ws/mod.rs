mod admin;
mod chat;
mod client;
pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use std::sync::Arc;

use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub role: Option<String>,
}

impl WsQuery {
    /// Role declared up front by the page; anything unrecognised leaves it open
    pub fn declared_role(&self) -> Option<Role> {
        match self.role.as_deref() {
            Some("client") => Some(Role::Client),
            Some("admin") => Some(Role::Admin),
            _ => None,
        }
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request: role={:?}", params.role);

    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

async fn send_json(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    match msg.to_json() {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            tracing::error!("Failed to serialize {:?}: {}", msg, e);
            Ok(())
        }
    }
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, params: WsQuery, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let role = params.declared_role();
    let (conn, mut outbound) = state.connect(role).await;

    tracing::info!("WebSocket {} connected with role: {:?}", conn, role);

    let welcome = ServerMessage::Welcome {
        connection_id: conn.clone(),
        role,
        server_now: chrono::Utc::now().to_rfc3339(),
    };
    if send_json(&mut sender, &welcome).await.is_err() {
        tracing::error!("Failed to send welcome message");
        state.disconnect(&conn).await;
        return;
    }

    loop {
        tokio::select! {
            // Frames queued by the dispatcher (broadcasts, notices)
            queued = outbound.recv() => {
                match queued {
                    Some(msg) => {
                        if send_json(&mut sender, &msg).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // Handle client messages
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message from {}: {}", conn, text.as_str());

                        if let Some(reply) = handlers::handle_frame(text.as_str(), &conn, &state).await {
                            if send_json(&mut sender, &reply).await.is_err() {
                                tracing::error!("Failed to send response");
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket {} closed", conn);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    state.disconnect(&conn).await;
    tracing::info!("WebSocket connection closed for {} ({:?})", conn, role);
}
