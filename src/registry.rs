//! Connection registry
//!
//! Maps an opaque connection handle to its user identity and current room.
//! A connection has exactly one name and one room at any instant; the room
//! binding is rebound in place during a room switch.

use std::collections::HashMap;

use crate::error::AppError;
use crate::types::{ClientId, RoomName};

/// Identity bound to a live connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Display name supplied by the client at connection time
    pub name: String,
    /// Room the connection currently belongs to
    pub room: RoomName,
}

/// Registry of live connections
///
/// Leaf component: no dependency on rooms or routing. Callers are
/// responsible for room admission after a successful registration.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    bindings: HashMap<ClientId, Identity>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a connection to an identity.
    ///
    /// Fails with [`AppError::InvalidIdentity`] when the name is empty;
    /// such connections are rejected before any room logic runs.
    pub fn register(
        &mut self,
        client_id: ClientId,
        name: &str,
        room: RoomName,
    ) -> Result<&Identity, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidIdentity);
        }
        let identity = Identity {
            name: name.to_string(),
            room,
        };
        Ok(self.bindings.entry(client_id).or_insert(identity))
    }

    /// Remove the binding for a connection.
    ///
    /// Idempotent: safe to call repeatedly, and safe even if registration
    /// never completed. Returns the identity that was bound, if any.
    pub fn unregister(&mut self, client_id: ClientId) -> Option<Identity> {
        self.bindings.remove(&client_id)
    }

    /// Look up the identity bound to a connection
    pub fn get(&self, client_id: ClientId) -> Option<&Identity> {
        self.bindings.get(&client_id)
    }

    /// Point a connection at a different room (room switch).
    ///
    /// No-op for unknown connections.
    pub fn rebind_room(&mut self, client_id: ClientId, room: RoomName) {
        if let Some(identity) = self.bindings.get_mut(&client_id) {
            identity.room = room;
        }
    }

    /// Number of live bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = ConnectionRegistry::new();
        let id = ClientId::new();

        registry.register(id, "alice", RoomName::default()).unwrap();

        let identity = registry.get(id).unwrap();
        assert_eq!(identity.name, "alice");
        assert_eq!(identity.room, RoomName::default());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = ConnectionRegistry::new();
        let id = ClientId::new();

        assert!(matches!(
            registry.register(id, "", RoomName::default()),
            Err(AppError::InvalidIdentity)
        ));
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn test_unregister_idempotent() {
        let mut registry = ConnectionRegistry::new();
        let id = ClientId::new();
        registry.register(id, "alice", RoomName::default()).unwrap();

        assert!(registry.unregister(id).is_some());
        assert!(registry.unregister(id).is_none());
        // Never-registered handle is also fine
        assert!(registry.unregister(ClientId::new()).is_none());
    }

    #[test]
    fn test_rebind_room() {
        let mut registry = ConnectionRegistry::new();
        let id = ClientId::new();
        registry.register(id, "alice", RoomName::default()).unwrap();

        registry.rebind_room(id, RoomName::new("lobby"));

        assert_eq!(registry.get(id).unwrap().room, RoomName::new("lobby"));
        assert_eq!(registry.get(id).unwrap().name, "alice");
    }
}
