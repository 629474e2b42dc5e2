//! Handlers shared by both roles: relaying lines and closing chats

use crate::error::{ChatError, ChatResult};
use crate::protocol::ServerMessage;
use crate::state::ChatState;
use crate::types::*;
use std::collections::BTreeSet;

pub fn handle_send_message(
    chat: &mut ChatState,
    conn: &str,
    chat_id: SessionId,
    text: String,
    role: Option<Role>,
) -> ChatResult<Option<ServerMessage>> {
    let session = chat.sessions.get(&chat_id)?;

    if text.trim().is_empty() {
        tracing::debug!("Ignoring empty message for chat {}", chat_id);
        return Ok(None);
    }

    let slot = session
        .participants
        .role_of(conn)
        .ok_or_else(|| ChatError::NotAttached(chat_id.clone()))?;
    if let Some(claimed) = role {
        if claimed != slot {
            return Err(ChatError::RoleConflict {
                declared: slot,
                requested: claimed,
            });
        }
    }

    let message = ChatMessage::new(text, slot);
    chat.sessions.append_message(&chat_id, message.clone())?;
    let delivered = chat.send_to_session(&chat_id, ServerMessage::Message(message));
    tracing::info!(
        "Relayed {} message in chat {} to {} connections",
        slot,
        chat_id,
        delivered
    );
    Ok(None)
}

pub fn handle_close_chat(
    chat: &mut ChatState,
    conn: &str,
    chat_id: SessionId,
) -> ChatResult<Option<ServerMessage>> {
    let participants = chat.sessions.close(&chat_id)?;
    for attached in participants.connections() {
        chat.connections.untrack_session(attached, &chat_id);
    }

    let mut targets: BTreeSet<ConnectionId> = participants.connections().cloned().collect();
    targets.extend(chat.connections.all_admins());
    targets.remove(conn);

    let notified = chat.send_to_all(
        targets.into_iter().collect(),
        ServerMessage::ChatClosed {
            chat_id: chat_id.clone(),
        },
    );
    tracing::info!("Chat {} closed by {}, notified {}", chat_id, conn, notified);
    Ok(None)
}
