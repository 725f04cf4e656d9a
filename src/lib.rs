//! Multi-Room WebSocket Chat Relay Library
//!
//! A chat relay where clients declare a display name and a room at
//! connection time, exchange broadcast and whisper messages, observe
//! typing indicators, and receive a replay of recent room history on
//! join. A reserved `bot` addressee answers `date` and `list` and
//! performs room switches via `join <room>`.
//!
//! # Features
//! - Lazy room creation with a `"main"` default room
//! - Room-wide broadcast with bounded per-room history replay
//! - `@name` whispers (sender + addressee only, never logged)
//! - `@bot date` / `@bot list` / `@bot join <room>` commands
//! - Enter/leave/typing presence notifications
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the connection registry
//!   and the room store
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing,
//!   so every inbound event is fully processed before the next begins
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod bot;
pub mod error;
pub mod handler;
pub mod message;
pub mod presence;
pub mod registry;
pub mod room;
pub mod router;
pub mod server;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use bot::{BotCommand, BOT_NAME};
pub use error::AppError;
pub use handler::handle_connection;
pub use message::{ClientEvent, Message, ServerEvent};
pub use registry::{ConnectionRegistry, Identity};
pub use room::{Room, ROOM_LOG_CAP};
pub use router::Delivery;
pub use server::{ChatServer, ServerCommand};
pub use store::RoomStore;
pub use types::{ClientId, RoomName, DEFAULT_ROOM};
