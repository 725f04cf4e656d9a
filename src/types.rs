//! Basic type definitions for the chat relay
//!
//! Provides newtype wrappers for type safety:
//! - `ClientId`: UUID-based unique connection identifier
//! - `RoomName`: client-chosen room name with a `"main"` default

use uuid::Uuid;

/// Room used when the client does not name one at connection time.
pub const DEFAULT_ROOM: &str = "main";

/// Unique connection identifier (newtype pattern)
///
/// Wraps a UUID v4 for type-safe connection identification.
/// Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Create a new random client ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name chosen by clients
///
/// Rooms are addressed by name; an empty or missing name falls back
/// to [`DEFAULT_ROOM`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(pub String);

impl RoomName {
    /// Create a RoomName, falling back to the default room when the
    /// supplied name is empty or whitespace.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            Self(DEFAULT_ROOM.to_string())
        } else {
            Self(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoomName {
    fn default() -> Self {
        Self(DEFAULT_ROOM.to_string())
    }
}

impl std::fmt::Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_unique() {
        let id1 = ClientId::new();
        let id2 = ClientId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_room_name_default() {
        assert_eq!(RoomName::default().as_str(), "main");
        assert_eq!(RoomName::new("").as_str(), "main");
        assert_eq!(RoomName::new("  ").as_str(), "main");
    }

    #[test]
    fn test_room_name_kept() {
        assert_eq!(RoomName::new("lobby").as_str(), "lobby");
    }
}
