//! Session store
//!
//! Sole owner of every open chat: its history, state and participant slots.

use crate::error::{ChatError, ChatResult};
use crate::types::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub history: Vec<ChatMessage>,
    pub participants: Participants,
    pub state: SessionState,
    /// Login that opened the chat, if one was given
    pub creator: Option<Identity>,
    pub created_at: String,
}

impl Session {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            history: Vec::new(),
            participants: Participants::default(),
            state: SessionState::Open,
            creator: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn created_by(&self, login: &str) -> bool {
        self.creator.as_deref() == Some(login)
    }

    fn ensure_open(&self) -> ChatResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ChatError::Closed(self.id.clone()))
        }
    }

    fn append(&mut self, message: ChatMessage) -> ChatResult<()> {
        self.ensure_open()?;
        self.history.push(message);
        Ok(())
    }

    /// OPEN -> CLOSED. Closing twice is an error.
    fn close(&mut self) -> ChatResult<()> {
        self.ensure_open()?;
        self.state = SessionState::Closed;
        self.participants = Participants::default();
        Ok(())
    }
}

/// Open chats keyed by id, iterated in id order
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: BTreeMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the session if absent. Returns the session and whether it was new.
    pub fn create(&mut self, id: &str) -> (&mut Session, bool) {
        let created = !self.sessions.contains_key(id);
        if created {
            tracing::info!("Opening chat {}", id);
        }
        let session = self
            .sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id.to_string()));
        (session, created)
    }

    pub fn get(&self, id: &str) -> ChatResult<&Session> {
        self.sessions
            .get(id)
            .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> ChatResult<&mut Session> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))
    }

    pub fn append_message(&mut self, id: &str, message: ChatMessage) -> ChatResult<()> {
        self.get_mut(id)?.append(message)
    }

    /// Put `conn` in the client slot. Returns the connection it displaced, if any.
    pub fn attach_client(&mut self, id: &str, conn: &str) -> ChatResult<Option<ConnectionId>> {
        let session = self.get_mut(id)?;
        session.ensure_open()?;
        Ok(replace_slot(&mut session.participants.client, conn))
    }

    /// Put `conn` in the admin slot. Returns the connection it displaced, if any.
    pub fn attach_admin(&mut self, id: &str, conn: &str) -> ChatResult<Option<ConnectionId>> {
        let session = self.get_mut(id)?;
        session.ensure_open()?;
        Ok(replace_slot(&mut session.participants.admin, conn))
    }

    /// Clear `conn` from one session's slots
    pub fn detach(&mut self, id: &str, conn: &str) {
        if let Some(session) = self.sessions.get_mut(id) {
            let participants = &mut session.participants;
            if participants.client.as_deref() == Some(conn) {
                participants.client = None;
            }
            if participants.admin.as_deref() == Some(conn) {
                participants.admin = None;
            }
        }
    }

    /// Close and evict. The returned session carries the participants that
    /// were attached at close time; its history is dropped with it.
    pub fn close(&mut self, id: &str) -> ChatResult<Participants> {
        let mut session = self
            .sessions
            .remove(id)
            .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))?;
        let participants = session.participants.clone();
        session.close()?;
        tracing::info!(
            "Closed chat {} after {} messages",
            id,
            session.history.len()
        );
        Ok(participants)
    }

    /// Ids of all open sessions, sorted
    pub fn open_ids(&self) -> Vec<SessionId> {
        self.sessions
            .values()
            .filter(|s| s.is_open())
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn replace_slot(slot: &mut Option<ConnectionId>, conn: &str) -> Option<ConnectionId> {
    match slot.replace(conn.to_string()) {
        Some(previous) if previous != conn => Some(previous),
        _ => None,
    }
}
