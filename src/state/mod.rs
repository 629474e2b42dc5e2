mod connection;
mod directory;
mod dispatch;
mod session;

pub use connection::{Connection, ConnectionRegistry, OutboundReceiver, OutboundSender};
pub use directory::ParticipantDirectory;
pub use session::{Session, SessionStore};

use crate::config::ChatConfig;
use crate::error::ChatResult;
use crate::types::*;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Everything the router mutates. Only ever touched through the lock in
/// [`AppState`], so one action runs to completion before the next starts.
#[derive(Debug, Default)]
pub struct ChatState {
    pub sessions: SessionStore,
    pub connections: ConnectionRegistry,
    pub directory: ParticipantDirectory,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `conn` into the chat's slot for `role`, evicting whoever held it
    pub fn attach(&mut self, conn: &str, session: &str, role: Role) -> ChatResult<()> {
        let displaced = match role {
            Role::Client => self.sessions.attach_client(session, conn)?,
            Role::Admin => self.sessions.attach_admin(session, conn)?,
        };
        if let Some(previous) = displaced {
            tracing::info!(
                "Connection {} takes over {} slot of chat {} from {}",
                conn,
                role,
                session,
                previous
            );
            self.connections.untrack_session(&previous, session);
        }
        self.connections.track_session(conn, session);
        Ok(())
    }
}

/// Summary of an open chat for the HTTP API
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatSummary {
    pub chat_id: SessionId,
    pub messages: usize,
    pub has_client: bool,
    pub has_admin: bool,
    pub created_at: String,
}

impl From<&Session> for ChatSummary {
    fn from(s: &Session) -> Self {
        Self {
            chat_id: s.id.clone(),
            messages: s.history.len(),
            has_client: s.participants.client.is_some(),
            has_admin: s.participants.admin.is_some(),
            created_at: s.created_at.clone(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<Mutex<ChatState>>,
    pub config: Arc<ChatConfig>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(ChatConfig::default())
    }

    pub fn with_config(config: ChatConfig) -> Self {
        Self {
            chat: Arc::new(Mutex::new(ChatState::new())),
            config: Arc::new(config),
        }
    }

    /// Exclusive access to the coordinator state
    pub async fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.chat.lock().await
    }

    /// Accept hook: register a fresh connection, optionally with a role
    /// already declared by the transport.
    pub async fn connect(&self, role: Option<Role>) -> (ConnectionId, OutboundReceiver) {
        let mut chat = self.lock().await;
        let (id, rx) = chat.connections.register(role);
        tracing::info!(
            "Connection {} registered ({} live: {} clients, {} admins, {} undeclared)",
            id,
            chat.connections.len(),
            chat.connections.count_by_role(Some(Role::Client)),
            chat.connections.count_by_role(Some(Role::Admin)),
            chat.connections.count_by_role(None)
        );
        (id, rx)
    }

    /// Disconnect hook: forget the connection and free its chat slots
    pub async fn disconnect(&self, conn: &str) {
        self.lock().await.drop_connection(conn);
        tracing::info!("Connection {} disconnected", conn);
    }

    pub async fn open_chats(&self) -> Vec<ChatSummary> {
        self.lock()
            .await
            .sessions
            .iter()
            .filter(|s| s.is_open())
            .map(ChatSummary::from)
            .collect()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let state = AppState::new();
        let (conn, _rx) = state.connect(Some(Role::Client)).await;
        {
            let mut chat = state.lock().await;
            chat.sessions.create("room1");
            chat.attach(&conn, "room1", Role::Client).unwrap();
        }

        state.disconnect(&conn).await;

        let chat = state.lock().await;
        assert!(chat.connections.is_empty());
        let session = chat.sessions.get("room1").unwrap();
        assert!(session.is_open());
        assert_eq!(session.participants.client, None);
    }

    #[tokio::test]
    async fn test_takeover_untracks_previous_connection() {
        let state = AppState::new();
        let (first, _rx1) = state.connect(Some(Role::Client)).await;
        let (second, _rx2) = state.connect(Some(Role::Client)).await;

        let mut chat = state.lock().await;
        chat.sessions.create("room1");
        chat.attach(&first, "room1", Role::Client).unwrap();
        chat.attach(&second, "room1", Role::Client).unwrap();

        assert!(chat.connections.get(&first).unwrap().sessions.is_empty());
        assert!(chat
            .connections
            .get(&second)
            .unwrap()
            .sessions
            .contains("room1"));

        // Dropping the displaced connection must not clear the new occupant
        chat.drop_connection(&first);
        let session = chat.sessions.get("room1").unwrap();
        assert_eq!(session.participants.client.as_deref(), Some(second.as_str()));
    }

    #[tokio::test]
    async fn test_open_chats_summary() {
        let state = AppState::new();
        {
            let mut chat = state.lock().await;
            chat.sessions.create("b");
            chat.sessions.create("a");
            chat.sessions
                .append_message("a", ChatMessage::new("hi", Role::Client))
                .unwrap();
        }

        let summaries = state.open_chats().await;
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].chat_id, "a");
        assert_eq!(summaries[0].messages, 1);
        assert!(!summaries[0].has_client);
    }
}
