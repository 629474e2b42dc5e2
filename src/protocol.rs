use crate::types::*;
use serde::{Deserialize, Serialize};

/// Inbound frames, discriminated by `action`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Open a chat (or re-attach to an open one) as its client
    CreateChat {
        chat_id: SessionId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        login: Option<Identity>,
    },
    /// Attach as the chat's admin and receive its history
    JoinChat {
        chat_id: SessionId,
    },
    SendMessage {
        chat_id: SessionId,
        message: String,
        /// Informational; the stored role comes from the sender's slot
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<Role>,
    },
    CloseChat {
        chat_id: SessionId,
    },
    /// Admin-only: every open chat id
    ListChats,
    /// Chats created under a login, for reconnect discovery
    ListUserChats {
        login: Identity,
    },
}

impl ClientMessage {
    /// Parse a raw text frame
    pub fn parse(text: &str) -> Result<Self, crate::error::ChatError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Outbound frames
///
/// Every frame carries an `action` tag except the live chat line, which goes
/// out as a bare `{message, role}` object.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        connection_id: ConnectionId,
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<Role>,
        server_now: String,
    },
    ChatHistory {
        history: Vec<ChatMessage>,
    },
    ListChats {
        chats: Vec<SessionId>,
    },
    ListUserChats {
        chats: Vec<SessionId>,
    },
    /// Sent to admins when a chat id is opened for the first time
    NewChat {
        chat_id: SessionId,
    },
    /// Sent to admins and the remaining participant when a chat is closed
    ChatClosed {
        chat_id: SessionId,
    },
    Error {
        code: String,
        msg: String,
    },
    #[serde(untagged)]
    Message(ChatMessage),
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_create_chat() {
        let msg = ClientMessage::parse(r#"{"action":"create_chat","chat_id":"room1"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::CreateChat {
                chat_id: "room1".to_string(),
                login: None
            }
        );

        let msg = ClientMessage::parse(
            r#"{"action":"create_chat","chat_id":"room1","login":"alice"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::CreateChat {
                chat_id: "room1".to_string(),
                login: Some("alice".to_string())
            }
        );
    }

    #[test]
    fn test_parse_send_message_without_role() {
        let msg = ClientMessage::parse(
            r#"{"action":"send_message","chat_id":"room1","message":"hi"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::SendMessage {
                chat_id: "room1".to_string(),
                message: "hi".to_string(),
                role: None
            }
        );
    }

    #[test]
    fn test_parse_list_chats_ignores_extra_fields() {
        let msg = ClientMessage::parse(r#"{"action":"list_chats","chat_id":""}"#).unwrap();
        assert_eq!(msg, ClientMessage::ListChats);
    }

    #[test]
    fn test_parse_rejects_malformed_frames() {
        assert!(ClientMessage::parse("not json").is_err());
        assert!(ClientMessage::parse(r#"{"chat_id":"room1"}"#).is_err());
        assert!(ClientMessage::parse(r#"{"action":"teleport"}"#).is_err());
        assert!(ClientMessage::parse(r#"{"action":"join_chat"}"#).is_err());
        assert!(ClientMessage::parse(
            r#"{"action":"send_message","chat_id":"a","message":"x","role":"root"}"#
        )
        .is_err());
    }

    #[test]
    fn test_chat_line_is_untagged() {
        let msg = ServerMessage::Message(ChatMessage::new("hi", Role::Client));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"message": "hi", "role": "client"}));
    }

    #[test]
    fn test_tagged_frames() {
        let history = ServerMessage::ChatHistory {
            history: vec![ChatMessage::new("hi", Role::Admin)],
        };
        assert_eq!(
            serde_json::to_value(&history).unwrap(),
            json!({"action": "chat_history", "history": [{"message": "hi", "role": "admin"}]})
        );

        let list = ServerMessage::ListUserChats {
            chats: vec!["a".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            json!({"action": "list_user_chats", "chats": ["a"]})
        );
    }
}
