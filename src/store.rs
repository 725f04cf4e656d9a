//! Room store
//!
//! Owns every room: membership sets and the per-room bounded log.
//! Rooms are created lazily on first join and intentionally never
//! destroyed: an empty room is cheap and keeps its log for the next
//! joiner for the lifetime of the process.

use std::collections::HashMap;

use tracing::debug;

use crate::message::Message;
use crate::presence;
use crate::room::Room;
use crate::types::{ClientId, RoomName};

/// All rooms known to the relay
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<RoomName, Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member to a room, creating the room if needed.
    ///
    /// Overwrite semantics for duplicate names (no collision error).
    /// Appends the `enter` announcement to the room log and returns it
    /// for broadcast.
    pub fn join(&mut self, room: &RoomName, name: &str, client_id: ClientId) -> Message {
        let entry = self
            .rooms
            .entry(room.clone())
            .or_insert_with(|| {
                debug!("Room '{}' created", room);
                Room::new(room.clone())
            });
        entry.insert_member(name, client_id);

        let enter = presence::announce_enter(room, name);
        entry.append_log(enter.clone());
        enter
    }

    /// Remove a member from a room by name.
    ///
    /// Returns the `leave` announcement (appended to the log) only if the
    /// name was actually a member, so a duplicate leave on disconnect for
    /// a user who already switched rooms is a no-op. The room itself is
    /// retained even when it becomes empty.
    pub fn leave(&mut self, room: &RoomName, name: &str) -> Option<Message> {
        let entry = self.rooms.get_mut(room)?;
        entry.remove_member(name)?;

        let leave = presence::announce_leave(room, name);
        entry.append_log(leave.clone());
        Some(leave)
    }

    /// Full log replay for a newly joined client, in insertion order.
    ///
    /// An unknown room replays as empty.
    pub fn log_snapshot(&self, room: &RoomName) -> Vec<Message> {
        self.rooms
            .get(room)
            .map(Room::log_snapshot)
            .unwrap_or_default()
    }

    /// Current member names of a room, in join order
    pub fn member_names(&self, room: &RoomName) -> Vec<String> {
        self.rooms
            .get(room)
            .map(Room::member_names)
            .unwrap_or_default()
    }

    /// Whether `name` is currently a member of `room`
    pub fn has_member(&self, room: &RoomName, name: &str) -> bool {
        self.rooms.get(room).is_some_and(|r| r.contains(name))
    }

    /// Connection bound to a member name, if present
    pub fn member_connection(&self, room: &RoomName, name: &str) -> Option<ClientId> {
        self.rooms.get(room)?.member(name)
    }

    /// Connections of every current member of a room
    pub fn connections(&self, room: &RoomName) -> Vec<ClientId> {
        self.rooms
            .get(room)
            .map(Room::connections)
            .unwrap_or_default()
    }

    /// Append a message to a room's log.
    ///
    /// Used for broadcast chat; typing events are excluded by contract.
    /// No-op for unknown rooms.
    pub fn append_log(&mut self, room: &RoomName, message: Message) {
        if let Some(entry) = self.rooms.get_mut(room) {
            entry.append_log(message);
        }
    }

    /// Number of rooms (empty rooms included)
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
