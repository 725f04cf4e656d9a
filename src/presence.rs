//! Presence notifications
//!
//! Constructs the system messages announcing a user entering, leaving or
//! typing in a room. Enter/leave messages are logged and broadcast
//! room-wide; typing is broadcast to everyone but the originator and is
//! never logged.

use crate::message::Message;
use crate::types::RoomName;

/// Build the `enter` announcement for a user joining a room
pub fn announce_enter(room: &RoomName, name: &str) -> Message {
    Message::Enter {
        name: name.to_string(),
        room_name: room.to_string(),
    }
}

/// Build the `leave` announcement for a user leaving a room
pub fn announce_leave(room: &RoomName, name: &str) -> Message {
    Message::Leave {
        name: name.to_string(),
        room_name: room.to_string(),
    }
}

/// Build the `typing` notification for a user
pub fn announce_typing(room: &RoomName, name: &str) -> Message {
    Message::Typing {
        name: name.to_string(),
        room_name: room.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcements_carry_room_and_name() {
        let room = RoomName::new("lobby");

        assert_eq!(
            announce_enter(&room, "alice"),
            Message::Enter {
                name: "alice".to_string(),
                room_name: "lobby".to_string(),
            }
        );
        assert_eq!(
            announce_leave(&room, "alice"),
            Message::Leave {
                name: "alice".to_string(),
                room_name: "lobby".to_string(),
            }
        );
        assert_eq!(
            announce_typing(&room, "alice"),
            Message::Typing {
                name: "alice".to_string(),
                room_name: "lobby".to_string(),
            }
        );
    }
}
