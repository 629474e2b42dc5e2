//! Connection registry
//!
//! Tracks every live socket, the role it declared and the chats it sits in.
//! The socket itself stays with the transport task; the registry only keeps
//! the sending half of that task's outbound queue.

use crate::error::{ChatError, ChatResult};
use crate::protocol::ServerMessage;
use crate::types::*;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::mpsc;

pub type OutboundSender = mpsc::UnboundedSender<ServerMessage>;
pub type OutboundReceiver = mpsc::UnboundedReceiver<ServerMessage>;

#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    /// `None` until the first role-bearing action
    pub role: Option<Role>,
    /// Chats this connection currently occupies a slot in
    pub sessions: BTreeSet<SessionId>,
    sender: OutboundSender,
}

impl Connection {
    /// Queue a frame for the socket task. Fails only if the task is gone.
    pub fn send(&self, msg: ServerMessage) -> ChatResult<()> {
        self.sender
            .send(msg)
            .map_err(|_| ChatError::DispatchFailure(self.id.clone()))
    }
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and hand back the receiving end of its queue
    pub fn register(&mut self, role: Option<Role>) -> (ConnectionId, OutboundReceiver) {
        let id = ulid::Ulid::new().to_string();
        let (sender, receiver) = mpsc::unbounded_channel();
        self.connections.insert(
            id.clone(),
            Connection {
                id: id.clone(),
                role,
                sessions: BTreeSet::new(),
                sender,
            },
        );
        (id, receiver)
    }

    pub fn get(&self, id: &str) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.connections.contains_key(id)
    }

    /// Declare the connection's role. A role never changes once set.
    pub fn declare_role(&mut self, id: &str, role: Role) -> ChatResult<()> {
        let Some(conn) = self.connections.get_mut(id) else {
            return Err(ChatError::DispatchFailure(id.to_string()));
        };
        match conn.role {
            Some(declared) if declared != role => Err(ChatError::RoleConflict {
                declared,
                requested: role,
            }),
            Some(_) => Ok(()),
            None => {
                tracing::debug!("Connection {} declared as {}", id, role);
                conn.role = Some(role);
                Ok(())
            }
        }
    }

    pub fn track_session(&mut self, id: &str, session: &str) {
        if let Some(conn) = self.connections.get_mut(id) {
            conn.sessions.insert(session.to_string());
        }
    }

    pub fn untrack_session(&mut self, id: &str, session: &str) {
        if let Some(conn) = self.connections.get_mut(id) {
            conn.sessions.remove(session);
        }
    }

    /// Ids of every connection that declared itself admin
    pub fn all_admins(&self) -> Vec<ConnectionId> {
        self.connections
            .values()
            .filter(|c| c.role == Some(Role::Admin))
            .map(|c| c.id.clone())
            .collect()
    }

    /// Drop the connection. Returns it so the caller can clear its session slots.
    pub fn remove(&mut self, id: &str) -> Option<Connection> {
        self.connections.remove(id)
    }

    pub fn count_by_role(&self, role: Option<Role>) -> usize {
        self.connections.values().filter(|c| c.role == role).count()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
