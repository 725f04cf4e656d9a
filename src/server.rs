//! ChatServer Actor implementation
//!
//! The central actor owning all relay state: the connection registry, the
//! room store, and the outbound channel per connection. Uses the Actor
//! pattern with mpsc channels for message passing, so every inbound event
//! (connect, chat, typing, disconnect) is fully processed before the next
//! begins and no locking is needed.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::message::ServerEvent;
use crate::registry::ConnectionRegistry;
use crate::router::{self, Delivery};
use crate::store::RoomStore;
use crate::types::{ClientId, RoomName};

/// Commands sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected with its identity metadata
    Connect {
        client_id: ClientId,
        name: String,
        room: RoomName,
        sender: mpsc::Sender<ServerEvent>,
    },
    /// Inbound chat line
    Chat { client_id: ClientId, data: String },
    /// Client started typing
    Typing { client_id: ClientId },
    /// Client disconnected
    Disconnect { client_id: ClientId },
}

/// The main ChatServer actor
pub struct ChatServer {
    /// Outbound channel per connection: ClientId -> sender
    clients: HashMap<ClientId, mpsc::Sender<ServerEvent>>,
    /// Connection handle -> identity + current room
    registry: ConnectionRegistry,
    /// All rooms: membership and bounded logs
    store: RoomStore,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            clients: HashMap::new(),
            registry: ConnectionRegistry::new(),
            store: RoomStore::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are
    /// dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect {
                client_id,
                name,
                room,
                sender,
            } => {
                self.handle_connect(client_id, name, room, sender).await;
            }
            ServerCommand::Chat { client_id, data } => {
                self.handle_chat(client_id, data).await;
            }
            ServerCommand::Typing { client_id } => {
                self.handle_typing(client_id).await;
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id).await;
            }
        }
    }

    /// Handle a new connection: register, replay the room log, join
    async fn handle_connect(
        &mut self,
        client_id: ClientId,
        name: String,
        room: RoomName,
        sender: mpsc::Sender<ServerEvent>,
    ) {
        if self
            .registry
            .register(client_id, &name, room.clone())
            .is_err()
        {
            // Handlers reject empty names before sending Connect; an
            // unregistered connection simply gets no room admission.
            warn!("Rejected connection {} with empty name", client_id);
            return;
        }
        self.clients.insert(client_id, sender);

        info!("'{}' ({}) entered room '{}'", name, client_id, room);

        // Replay is the history as of before this join, so it ends with
        // the last pre-join entry; the client's own enter arrives next as
        // a room-wide broadcast.
        let replay = self.store.log_snapshot(&room);
        self.send_to(client_id, ServerEvent::Log(replay)).await;

        let enter = self.store.join(&room, &name, client_id);
        let recipients = self.store.connections(&room);
        for id in recipients {
            self.send_to(id, ServerEvent::ChatMessage(enter.clone()))
                .await;
        }

        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.store.room_count()
        );
    }

    /// Handle an inbound chat line
    async fn handle_chat(&mut self, client_id: ClientId, data: String) {
        let deliveries = router::route_chat(&mut self.store, &mut self.registry, client_id, &data);
        self.dispatch(deliveries).await;
    }

    /// Handle a typing notification
    async fn handle_typing(&mut self, client_id: ClientId) {
        let deliveries = router::route_typing(&self.store, &self.registry, client_id);
        self.dispatch(deliveries).await;
    }

    /// Handle client disconnection
    ///
    /// Idempotent: a repeated disconnect for the same handle is a no-op.
    async fn handle_disconnect(&mut self, client_id: ClientId) {
        self.clients.remove(&client_id);

        let Some(identity) = self.registry.unregister(client_id) else {
            return;
        };
        info!(
            "'{}' ({}) left room '{}'",
            identity.name, client_id, identity.room
        );

        if let Some(leave) = self.store.leave(&identity.room, &identity.name) {
            // Departed connection is already gone from both the member
            // list and the clients map, so this reaches the others only.
            let recipients = self.store.connections(&identity.room);
            for id in recipients {
                self.send_to(id, ServerEvent::ChatMessage(leave.clone()))
                    .await;
            }
        }

        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.store.room_count()
        );
    }

    /// Send every computed delivery to its connection's outbound channel
    async fn dispatch(&self, deliveries: Vec<Delivery>) {
        for delivery in deliveries {
            self.send_to(delivery.to, delivery.event).await;
        }
    }

    /// Best-effort send; a closed channel means the client is on its way
    /// out and its Disconnect will clean up.
    async fn send_to(&self, client_id: ClientId, event: ServerEvent) {
        if let Some(sender) = self.clients.get(&client_id) {
            if sender.send(event).await.is_err() {
                debug!("Dropped event for disconnecting client {}", client_id);
            }
        }
    }
}
