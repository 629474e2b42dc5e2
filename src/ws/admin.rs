//! Admin message handlers
//!
//! Both handlers declare the caller as admin; a client connection gets a
//! role conflict instead.

use crate::error::ChatResult;
use crate::protocol::ServerMessage;
use crate::state::ChatState;
use crate::types::*;

pub fn handle_join_chat(
    chat: &mut ChatState,
    conn: &str,
    chat_id: SessionId,
) -> ChatResult<Option<ServerMessage>> {
    tracing::info!("Admin {} joining chat {}", conn, chat_id);
    chat.sessions.get(&chat_id)?;
    chat.connections.declare_role(conn, Role::Admin)?;
    chat.attach(conn, &chat_id, Role::Admin)?;

    let history = chat.sessions.get(&chat_id)?.history.clone();
    tracing::debug!("Replaying {} messages of chat {}", history.len(), chat_id);
    Ok(Some(ServerMessage::ChatHistory { history }))
}

pub fn handle_list_chats(chat: &mut ChatState, conn: &str) -> ChatResult<Option<ServerMessage>> {
    chat.connections.declare_role(conn, Role::Admin)?;
    let chats = chat.sessions.open_ids();
    tracing::info!("Listing {} open chats", chats.len());
    Ok(Some(ServerMessage::ListChats { chats }))
}
