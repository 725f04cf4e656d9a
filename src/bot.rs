//! Bot command interpreter
//!
//! Stateless handler for messages addressed to the reserved `bot` name.
//! Bot traffic is never broadcast and never logged; the single reply (if
//! any) goes back to the sender alone.

use chrono::Local;

use crate::types::RoomName;

/// Reserved addressee name that routes to the bot instead of a member
pub const BOT_NAME: &str = "bot";

/// A recognized bot command
///
/// Anything that does not parse to one of these is silently ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Reply with the current server time
    Date,
    /// Reply with the comma-joined member names of the sender's room
    List,
    /// Switch the sender to another room (no reply)
    Join(RoomName),
}

impl BotCommand {
    /// Parse the payload of a `@bot` message.
    ///
    /// Returns `None` for an empty payload or an unknown command, both of
    /// which produce no reply.
    pub fn parse(payload: &str) -> Option<Self> {
        let payload = payload.trim();
        let (cmd, args) = payload
            .split_once([' ', '　'])
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((payload, ""));

        match (cmd, args) {
            ("date", "") => Some(BotCommand::Date),
            ("list", "") => Some(BotCommand::List),
            ("join", room) if !room.is_empty() => Some(BotCommand::Join(RoomName::new(room))),
            _ => None,
        }
    }
}

/// Reply text for the `date` command
pub fn date_reply() -> String {
    Local::now().format("%a %b %d %Y %H:%M:%S %Z").to_string()
}

/// Reply text for the `list` command
pub fn list_reply(member_names: &[String]) -> String {
    format!("現在の入室者は {}", member_names.join(", "))
}

/// Notice sent back to the sender when a direct addressee is not in the room
pub fn unknown_addressee_reply(name: &str) -> String {
    format!("{name} さんはいません")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(BotCommand::parse("date"), Some(BotCommand::Date));
        assert_eq!(BotCommand::parse("list"), Some(BotCommand::List));
        assert_eq!(
            BotCommand::parse("join lobby"),
            Some(BotCommand::Join(RoomName::new("lobby")))
        );
    }

    #[test]
    fn test_parse_full_width_separator() {
        assert_eq!(
            BotCommand::parse("join　lobby"),
            Some(BotCommand::Join(RoomName::new("lobby")))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_empty() {
        assert_eq!(BotCommand::parse(""), None);
        assert_eq!(BotCommand::parse("   "), None);
        assert_eq!(BotCommand::parse("dance"), None);
        assert_eq!(BotCommand::parse("join"), None);
        // Trailing arguments make the command unrecognized
        assert_eq!(BotCommand::parse("date now"), None);
        assert_eq!(BotCommand::parse("list all"), None);
    }

    #[test]
    fn test_list_reply_joins_names_in_order() {
        let names = vec!["alice".to_string(), "bob".to_string()];
        assert_eq!(list_reply(&names), "現在の入室者は alice, bob");
    }

    #[test]
    fn test_unknown_addressee_reply() {
        assert_eq!(unknown_addressee_reply("dave"), "dave さんはいません");
    }
}
