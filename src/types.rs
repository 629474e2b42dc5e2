use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type SessionId = String;
pub type ConnectionId = String;
pub type Identity = String;

/// Role a connection plays for its whole lifetime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => f.write_str("client"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Open,
    Closed,
}

/// One line of a session's history.
///
/// Serialized as `{message, role}`, which is also the shape of the live
/// broadcast, so a replayed history and live traffic look identical to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    #[serde(rename = "message")]
    pub text: String,
    pub role: Role,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }
}

/// Current occupants of a session's two slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participants {
    pub client: Option<ConnectionId>,
    pub admin: Option<ConnectionId>,
}

impl Participants {
    /// Attached connections, client first
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionId> {
        self.client.iter().chain(self.admin.iter())
    }

    /// Which slot (if any) the connection occupies
    pub fn role_of(&self, conn: &str) -> Option<Role> {
        if self.client.as_deref() == Some(conn) {
            Some(Role::Client)
        } else if self.admin.as_deref() == Some(conn) {
            Some(Role::Admin)
        } else {
            None
        }
    }
}
