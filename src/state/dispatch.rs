//! Outbound delivery: one connection, one chat, or every admin.
//!
//! Sends never fail the action that triggered them. A connection whose
//! socket task has gone away is logged, dropped from the registry and
//! cleared out of its chat slots.

use super::ChatState;
use crate::error::ChatError;
use crate::protocol::ServerMessage;
use crate::types::*;

impl ChatState {
    /// Unicast. Returns whether the frame was queued.
    pub fn send_to(&mut self, conn: &str, msg: ServerMessage) -> bool {
        let result = match self.connections.get(conn) {
            Some(c) => c.send(msg),
            None => Err(ChatError::DispatchFailure(conn.to_string())),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dropping frame: {}", e);
                self.drop_connection(conn);
                false
            }
        }
    }

    /// Send to every connection attached to the chat. Returns how many got it.
    pub fn send_to_session(&mut self, session: &str, msg: ServerMessage) -> usize {
        let targets: Vec<ConnectionId> = match self.sessions.get(session) {
            Ok(s) => s.participants.connections().cloned().collect(),
            Err(_) => return 0,
        };
        self.send_to_all(targets, msg)
    }

    /// Send to every admin connection. Returns how many got it.
    pub fn send_to_admins(&mut self, msg: ServerMessage) -> usize {
        let targets = self.connections.all_admins();
        self.send_to_all(targets, msg)
    }

    pub fn send_to_all(&mut self, targets: Vec<ConnectionId>, msg: ServerMessage) -> usize {
        let mut delivered = 0;
        for conn in targets {
            if self.send_to(&conn, msg.clone()) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Forget a connection and free any chat slots it held. The chats stay open.
    pub fn drop_connection(&mut self, conn: &str) {
        let Some(connection) = self.connections.remove(conn) else {
            return;
        };
        for session in &connection.sessions {
            self.sessions.detach(session, conn);
        }
        tracing::debug!(
            "Connection {} removed, detached from {} chats",
            conn,
            connection.sessions.len()
        );
    }
}
