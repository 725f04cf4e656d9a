//! Room struct definition
//!
//! A room owns its membership and a bounded append-only log of past
//! enter/leave/broadcast-chat messages, replayed to late joiners.

use std::collections::VecDeque;

use crate::message::Message;
use crate::types::{ClientId, RoomName};

/// Maximum number of log entries retained per room.
///
/// The log behaves as a ring buffer: once full, appending evicts the
/// oldest entry. Keeps replay useful for late joiners without letting a
/// long-lived room grow without bound.
pub const ROOM_LOG_CAP: usize = 256;

/// A named chat room
///
/// Members are kept in join order (`list` replies and broadcasts follow
/// it). A name maps to exactly one connection; joining with a name that
/// is already present silently takes over that entry, keeping its
/// original position.
#[derive(Debug)]
pub struct Room {
    /// Name this room is addressed by
    pub name: RoomName,
    /// Join-ordered membership: display name -> connection
    members: Vec<(String, ClientId)>,
    /// Bounded history of logged messages, oldest first
    log: VecDeque<Message>,
}

impl Room {
    /// Create an empty room
    pub fn new(name: RoomName) -> Self {
        Self {
            name,
            members: Vec::new(),
            log: VecDeque::new(),
        }
    }

    /// Insert a member, overwriting any existing entry for the same name.
    ///
    /// Overwrite keeps the original join position (silent takeover
    /// semantics for duplicate names).
    pub fn insert_member(&mut self, name: &str, client_id: ClientId) {
        if let Some(entry) = self.members.iter_mut().find(|(n, _)| n == name) {
            entry.1 = client_id;
        } else {
            self.members.push((name.to_string(), client_id));
        }
    }

    /// Remove a member by name, returning its connection if it was present
    pub fn remove_member(&mut self, name: &str) -> Option<ClientId> {
        let idx = self.members.iter().position(|(n, _)| n == name)?;
        Some(self.members.remove(idx).1)
    }

    /// Connection currently bound to a member name
    pub fn member(&self, name: &str) -> Option<ClientId> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, id)| id)
    }

    /// Whether a name is currently a member
    pub fn contains(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// Member names in join order
    pub fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Connections of all current members, in join order
    pub fn connections(&self) -> Vec<ClientId> {
        self.members.iter().map(|&(_, id)| id).collect()
    }

    /// Number of current members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Append a message to the log, evicting the oldest entry at capacity
    pub fn append_log(&mut self, message: Message) {
        if self.log.len() == ROOM_LOG_CAP {
            self.log.pop_front();
        }
        self.log.push_back(message);
    }

    /// Snapshot of the log in insertion order
    pub fn log_snapshot(&self) -> Vec<Message> {
        self.log.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(n: u32) -> Message {
        Message::Chat {
            name: "alice".to_string(),
            data: format!("msg {n}"),
            room_name: "main".to_string(),
        }
    }

    #[test]
    fn test_members_in_join_order() {
        let mut room = Room::new(RoomName::default());
        room.insert_member("alice", ClientId::new());
        room.insert_member("bob", ClientId::new());
        room.insert_member("carol", ClientId::new());

        assert_eq!(room.member_names(), vec!["alice", "bob", "carol"]);
        assert_eq!(room.member_count(), 3);
    }

    #[test]
    fn test_duplicate_name_takes_over_keeping_position() {
        let mut room = Room::new(RoomName::default());
        let first = ClientId::new();
        let second = ClientId::new();
        room.insert_member("alice", first);
        room.insert_member("bob", ClientId::new());
        room.insert_member("alice", second);

        // Last write wins, position preserved, no duplicate entry
        assert_eq!(room.member("alice"), Some(second));
        assert_eq!(room.member_names(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_remove_member() {
        let mut room = Room::new(RoomName::default());
        let id = ClientId::new();
        room.insert_member("alice", id);

        assert_eq!(room.remove_member("alice"), Some(id));
        assert_eq!(room.remove_member("alice"), None);
        assert!(!room.contains("alice"));
    }

    #[test]
    fn test_log_order_preserved() {
        let mut room = Room::new(RoomName::default());
        for n in 0..5 {
            room.append_log(chat(n));
        }

        let log = room.log_snapshot();
        assert_eq!(log.len(), 5);
        assert_eq!(log[0], chat(0));
        assert_eq!(log[4], chat(4));
    }

    #[test]
    fn test_log_evicts_oldest_at_cap() {
        let mut room = Room::new(RoomName::default());
        for n in 0..(ROOM_LOG_CAP as u32 + 3) {
            room.append_log(chat(n));
        }

        let log = room.log_snapshot();
        assert_eq!(log.len(), ROOM_LOG_CAP);
        assert_eq!(log[0], chat(3));
        assert_eq!(log[ROOM_LOG_CAP - 1], chat(ROOM_LOG_CAP as u32 + 2));
    }
}
