//! Errors raised by the chat coordinator
//!
//! None of these are fatal: the router turns them into an `error` frame for
//! the originating connection and carries on.

use crate::protocol::ServerMessage;
use crate::types::{ConnectionId, Role, SessionId};

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("Chat {0} not found")]
    SessionNotFound(SessionId),

    #[error("Chat {0} is closed")]
    Closed(SessionId),

    #[error("Invalid message format: {0}")]
    ProtocolError(String),

    #[error("Connection is not attached to chat {0}")]
    NotAttached(SessionId),

    #[error("Connection already declared as {declared}, cannot act as {requested}")]
    RoleConflict { declared: Role, requested: Role },

    #[error("Connection {0} is gone")]
    DispatchFailure(ConnectionId),
}

impl ChatError {
    /// Stable code sent to clients in `error` frames
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            ChatError::Closed(_) => "SESSION_CLOSED",
            ChatError::ProtocolError(_) => "PROTOCOL_ERROR",
            ChatError::NotAttached(_) => "NOT_ATTACHED",
            ChatError::RoleConflict { .. } => "ROLE_CONFLICT",
            ChatError::DispatchFailure(_) => "DISPATCH_FAILURE",
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::ProtocolError(e.to_string())
    }
}

impl From<ChatError> for ServerMessage {
    fn from(e: ChatError) -> Self {
        ServerMessage::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_frame_conversion() {
        let msg: ServerMessage = ChatError::SessionNotFound("room1".to_string()).into();
        match msg {
            ServerMessage::Error { code, msg } => {
                assert_eq!(code, "SESSION_NOT_FOUND");
                assert!(msg.contains("room1"));
            }
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_is_protocol_error() {
        let err: ChatError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "PROTOCOL_ERROR");
    }
}
