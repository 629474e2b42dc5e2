//! Client message handlers
//!
//! Opening chats and finding the ones a login created earlier. A chat id can
//! be reopened by someone else after it closes, so only open chats that the
//! login itself created are listed unless closed ones are asked for.

use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult};
use crate::protocol::ServerMessage;
use crate::state::ChatState;
use crate::types::*;

pub fn handle_create_chat(
    chat: &mut ChatState,
    conn: &str,
    chat_id: SessionId,
    login: Option<Identity>,
) -> ChatResult<Option<ServerMessage>> {
    tracing::info!("Create chat {} (login: {:?})", chat_id, login);
    if chat_id.trim().is_empty() {
        return Err(ChatError::ProtocolError(
            "chat_id must not be empty".to_string(),
        ));
    }

    chat.connections.declare_role(conn, Role::Client)?;
    let login = login.filter(|l| !l.trim().is_empty());
    let (session, created) = chat.sessions.create(&chat_id);
    if created {
        session.creator = login.clone();
    }
    chat.attach(conn, &chat_id, Role::Client)?;

    if let Some(login) = login {
        chat.directory.record(&login, &chat_id);
    }

    if created {
        let notified = chat.send_to_admins(ServerMessage::NewChat {
            chat_id: chat_id.clone(),
        });
        tracing::debug!("Notified {} admins about chat {}", notified, chat_id);
    }

    let history = chat.sessions.get(&chat_id)?.history.clone();
    Ok(Some(ServerMessage::ChatHistory { history }))
}

pub fn handle_list_user_chats(
    chat: &ChatState,
    config: &ChatConfig,
    login: Identity,
) -> ChatResult<Option<ServerMessage>> {
    let chats: Vec<SessionId> = chat
        .directory
        .lookup(&login)
        .iter()
        .filter(|id| {
            config.list_closed_user_chats
                || chat.sessions.get(id).is_ok_and(|s| s.created_by(&login))
        })
        .cloned()
        .collect();
    tracing::info!("Login {} has {} chats", login, chats.len());
    Ok(Some(ServerMessage::ListUserChats { chats }))
}
