//! Participant directory: login -> chats that login created
//!
//! Entries are never pruned; callers decide whether closed chats are shown.

use crate::types::*;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ParticipantDirectory {
    entries: HashMap<Identity, Vec<SessionId>>,
}

impl ParticipantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `identity` created `session`. Repeats are ignored.
    pub fn record(&mut self, identity: &str, session: &str) {
        let sessions = self.entries.entry(identity.to_string()).or_default();
        if !sessions.iter().any(|s| s == session) {
            sessions.push(session.to_string());
        }
    }

    /// Chats created by `identity`, oldest first
    pub fn lookup(&self, identity: &str) -> &[SessionId] {
        self.entries
            .get(identity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lookup() {
        let mut directory = ParticipantDirectory::new();
        directory.record("alice", "a1");
        directory.record("alice", "a2");
        directory.record("alice", "a1");
        directory.record("bob", "b1");

        assert_eq!(directory.lookup("alice"), ["a1", "a2"]);
        assert_eq!(directory.lookup("bob"), ["b1"]);
        assert!(directory.lookup("carol").is_empty());
    }
}
