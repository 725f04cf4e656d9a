//! Message router
//!
//! Classifies each inbound chat event (bot command, whisper, broadcast,
//! room switch) and computes the set of outbound deliveries. All state
//! lives in the [`RoomStore`] and [`ConnectionRegistry`] passed in by the
//! server actor; routing itself never fails. Edge cases degrade to a
//! no-op or a bot-authored notice to the sender.

use tracing::debug;

use crate::bot::{self, BotCommand, BOT_NAME};
use crate::message::{Message, ServerEvent};
use crate::presence;
use crate::registry::ConnectionRegistry;
use crate::store::RoomStore;
use crate::types::{ClientId, RoomName};

/// One outbound delivery computed by the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ClientId,
    pub event: ServerEvent,
}

impl Delivery {
    fn chat(to: ClientId, message: Message) -> Self {
        Self {
            to,
            event: ServerEvent::ChatMessage(message),
        }
    }
}

/// Route an inbound chat line from `sender`.
///
/// In order: address parsing, bot dispatch, direct delivery, unknown
/// addressee notice, room-wide broadcast. Unknown senders produce no
/// deliveries.
pub fn route_chat(
    store: &mut RoomStore,
    registry: &mut ConnectionRegistry,
    sender: ClientId,
    data: &str,
) -> Vec<Delivery> {
    let Some(identity) = registry.get(sender) else {
        debug!("Dropping chat from unregistered connection {}", sender);
        return Vec::new();
    };
    let sender_name = identity.name.clone();
    let room = identity.room.clone();

    match parse_address(data) {
        // Bot traffic: never broadcast, never logged
        Some((target, payload)) if target == BOT_NAME => {
            bot_dispatch(store, registry, sender, &sender_name, &room, payload)
        }
        Some((addressee, payload)) => {
            if let Some(target) = store.member_connection(&room, addressee) {
                // Whisper: sender + addressee only, excluded from the log
                let message = Message::Chat {
                    name: sender_name,
                    data: payload.to_string(),
                    room_name: room.to_string(),
                };
                let mut deliveries = vec![Delivery::chat(sender, message.clone())];
                if target != sender {
                    deliveries.push(Delivery::chat(target, message));
                }
                deliveries
            } else {
                debug!("Addressee '{}' not in room '{}'", addressee, room);
                let notice = Message::Chat {
                    name: BOT_NAME.to_string(),
                    data: bot::unknown_addressee_reply(addressee),
                    room_name: room.to_string(),
                };
                vec![Delivery::chat(sender, notice)]
            }
        }
        None => {
            let message = Message::Chat {
                name: sender_name,
                data: data.to_string(),
                room_name: room.to_string(),
            };
            store.append_log(&room, message.clone());
            broadcast(store, &room, message)
        }
    }
}

/// Route a typing notification: everyone in the sender's room except the
/// originator, never logged.
pub fn route_typing(
    store: &RoomStore,
    registry: &ConnectionRegistry,
    sender: ClientId,
) -> Vec<Delivery> {
    let Some(identity) = registry.get(sender) else {
        return Vec::new();
    };
    let message = presence::announce_typing(&identity.room, &identity.name);
    store
        .connections(&identity.room)
        .into_iter()
        .filter(|&id| id != sender)
        .map(|id| Delivery::chat(id, message.clone()))
        .collect()
}

/// Dispatch a `@bot` payload. A single reply (if any) goes to the sender;
/// unknown commands and empty payloads are silently ignored.
fn bot_dispatch(
    store: &mut RoomStore,
    registry: &mut ConnectionRegistry,
    sender: ClientId,
    sender_name: &str,
    room: &RoomName,
    payload: &str,
) -> Vec<Delivery> {
    match BotCommand::parse(payload) {
        Some(BotCommand::Date) => {
            vec![Delivery::chat(sender, bot_message(room, bot::date_reply()))]
        }
        Some(BotCommand::List) => {
            let names = store.member_names(room);
            vec![Delivery::chat(
                sender,
                bot_message(room, bot::list_reply(&names)),
            )]
        }
        Some(BotCommand::Join(new_room)) => {
            switch_room(store, registry, sender, sender_name, room, &new_room)
        }
        None => {
            debug!("Ignoring unrecognized bot payload from {}", sender_name);
            Vec::new()
        }
    }
}

/// Move `sender` from `old_room` to `new_room`.
///
/// Leaves the old room (leave announced to the remaining members and
/// logged), rebinds the connection, replays the target room's pre-join
/// log to the switcher, then joins (enter announced room-wide, switcher
/// included, and logged). The switcher gets no direct reply for the
/// switch itself.
fn switch_room(
    store: &mut RoomStore,
    registry: &mut ConnectionRegistry,
    sender: ClientId,
    sender_name: &str,
    old_room: &RoomName,
    new_room: &RoomName,
) -> Vec<Delivery> {
    debug!("'{}' switching room '{}' -> '{}'", sender_name, old_room, new_room);

    let mut deliveries = Vec::new();
    if let Some(leave) = store.leave(old_room, sender_name) {
        // Sender is already out of the member list, so this reaches only
        // the remaining members.
        deliveries.extend(broadcast(store, old_room, leave));
    }

    registry.rebind_room(sender, new_room.clone());

    // Replay precedes the switcher's own enter announcement
    deliveries.push(Delivery {
        to: sender,
        event: ServerEvent::Log(store.log_snapshot(new_room)),
    });

    let enter = store.join(new_room, sender_name, sender);
    deliveries.extend(broadcast(store, new_room, enter));
    deliveries
}

fn broadcast(store: &RoomStore, room: &RoomName, message: Message) -> Vec<Delivery> {
    store
        .connections(room)
        .into_iter()
        .map(|id| Delivery::chat(id, message.clone()))
        .collect()
}

fn bot_message(room: &RoomName, data: String) -> Message {
    Message::Chat {
        name: BOT_NAME.to_string(),
        data,
        room_name: room.to_string(),
    }
}

/// Split an `@<addressee> <payload>` prefix off a chat line.
///
/// Only the first separator counts; the separator may be an ASCII or a
/// full-width space. A line with no `@`, an empty addressee, or nothing
/// after the separator has no addressee and is plain broadcast text.
fn parse_address(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('@')?;
    let idx = rest.find([' ', '　'])?;
    let sep = rest[idx..].chars().next()?;
    let target = &rest[..idx];
    let payload = &rest[idx + sep.len_utf8()..];
    if target.is_empty() || payload.is_empty() {
        return None;
    }
    Some((target, payload))
}
