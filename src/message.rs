//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enums
//! for type-safe serialization/deserialization.
//!
//! `Message` is the record exchanged with clients and stored in room logs.
//! It is a tagged variant rather than one loose record with optional
//! fields, so each kind carries only the fields it needs.

use serde::{Deserialize, Serialize};

/// A chat-system message as seen by clients and room logs
///
/// Immutable once constructed. `enter`/`leave` and broadcast `chat`
/// messages are appended to the room log; `typing` never is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// A user entered the room
    Enter {
        name: String,
        #[serde(rename = "roomName")]
        room_name: String,
    },
    /// A user left the room
    Leave {
        name: String,
        #[serde(rename = "roomName")]
        room_name: String,
    },
    /// A user is typing (transient, never logged)
    Typing {
        name: String,
        #[serde(rename = "roomName")]
        room_name: String,
    },
    /// A user-authored (or bot-authored) chat line
    Chat {
        name: String,
        data: String,
        #[serde(rename = "roomName")]
        room_name: String,
    },
}

impl Message {
    /// Name of the sender (or the system actor) on this message
    pub fn name(&self) -> &str {
        match self {
            Message::Enter { name, .. }
            | Message::Leave { name, .. }
            | Message::Typing { name, .. }
            | Message::Chat { name, .. } => name,
        }
    }

    /// Room this message belongs to
    pub fn room_name(&self) -> &str {
        match self {
            Message::Enter { room_name, .. }
            | Message::Leave { room_name, .. }
            | Message::Typing { room_name, .. }
            | Message::Chat { room_name, .. } => room_name,
        }
    }
}

/// Client → Server event
///
/// All events from client to server. Uses an adjacently tagged enum
/// mirroring the `(event, payload)` shape of the wire protocol.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Send a chat line (may carry an `@addressee` prefix)
    ChatMessage { data: String },
    /// The client started typing
    Typing,
}

/// Server → Client event
///
/// All events from server to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A routed chat-system message
    ChatMessage(Message),
    /// Room history replay, sent once to a newly joined client
    Log(Vec<Message>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_deserialize() {
        let json = r#"{"event": "chat_message", "payload": {"data": "hello"}}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        match event {
            ClientEvent::ChatMessage { data } => assert_eq!(data, "hello"),
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_typing_event_deserialize() {
        let json = r#"{"event": "typing"}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, ClientEvent::Typing));
    }

    #[test]
    fn test_message_wire_format() {
        let msg = Message::Chat {
            name: "alice".to_string(),
            data: "hello".to_string(),
            room_name: "main".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"chat\""));
        assert!(json.contains("\"name\":\"alice\""));
        assert!(json.contains("\"data\":\"hello\""));
        assert!(json.contains("\"roomName\":\"main\""));
    }

    #[test]
    fn test_enter_has_no_data_field() {
        let msg = Message::Enter {
            name: "alice".to_string(),
            room_name: "main".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"enter\""));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_server_event_serialize() {
        let event = ServerEvent::Log(vec![Message::Enter {
            name: "alice".to_string(),
            room_name: "main".to_string(),
        }]);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"log\""));
        assert!(json.contains("\"type\":\"enter\""));
    }
}
