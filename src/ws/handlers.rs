//! WebSocket message dispatch
//!
//! The single decision point for every chat mutation. Each action takes the
//! state lock, runs to completion including its fan-out, and only then
//! releases it. Failures become an `error` frame for the sender alone.

use crate::error::ChatError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use std::sync::Arc;

use super::{admin, chat, client};

/// Parse a raw text frame and handle it
pub async fn handle_frame(text: &str, conn: &str, state: &Arc<AppState>) -> Option<ServerMessage> {
    match ClientMessage::parse(text) {
        Ok(msg) => handle_message(msg, conn, state).await,
        Err(e) => {
            tracing::warn!("Failed to parse frame from {}: {}", conn, e);
            Some(e.into())
        }
    }
}

/// Handle client messages and return optional response for the sender
pub async fn handle_message(
    msg: ClientMessage,
    conn: &str,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    let mut guard = state.lock().await;
    let chat_state = &mut *guard;

    if !chat_state.connections.contains(conn) {
        tracing::warn!("Ignoring message from unregistered connection {}", conn);
        return Some(ChatError::DispatchFailure(conn.to_string()).into());
    }

    let result = match msg {
        ClientMessage::CreateChat { chat_id, login } => {
            client::handle_create_chat(chat_state, conn, chat_id, login)
        }

        ClientMessage::ListUserChats { login } => {
            client::handle_list_user_chats(chat_state, &state.config, login)
        }

        ClientMessage::JoinChat { chat_id } => admin::handle_join_chat(chat_state, conn, chat_id),

        ClientMessage::ListChats => admin::handle_list_chats(chat_state, conn),

        ClientMessage::SendMessage {
            chat_id,
            message,
            role,
        } => chat::handle_send_message(chat_state, conn, chat_id, message, role),

        ClientMessage::CloseChat { chat_id } => chat::handle_close_chat(chat_state, conn, chat_id),
    };

    match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Rejected action from {}: {}", conn, e);
            Some(e.into())
        }
    }
}
