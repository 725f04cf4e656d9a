//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake with
//! identity metadata in the query string (`?userName=...&roomName=...`),
//! message parsing, and bidirectional communication with the ChatServer.
//! Connections without a user name are closed before any room logic runs.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::message::{ClientEvent, ServerEvent};
use crate::server::ServerCommand;
use crate::types::{ClientId, RoomName};

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, extracts the identity metadata from
/// the upgrade request, and manages the connection lifecycle.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake, capturing the upgrade request's query string
    let mut query: Option<String> = None;
    let ws_stream = tokio_tungstenite::accept_hdr_async(stream, |req: &Request, resp: Response| {
        query = req.uri().query().map(str::to_string);
        Ok(resp)
    })
    .await?;

    let user_name = query
        .as_deref()
        .and_then(|q| query_param(q, "userName"))
        .filter(|name| !name.trim().is_empty());

    // Reject identity-less connections before any room logic runs
    let Some(user_name) = user_name else {
        info!("Disconnected {}: user name not found", peer_addr);
        let mut ws_stream = ws_stream;
        let _ = ws_stream.close(None).await;
        return Ok(());
    };

    let room = RoomName::new(
        query
            .as_deref()
            .and_then(|q| query_param(q, "roomName"))
            .unwrap_or_default(),
    );

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let client_id = ClientId::new();
    info!(
        "Client {} connected from {} as '{}' (room '{}')",
        client_id, peer_addr, user_name, room
    );

    // Create channel for server -> client events
    let (event_tx, mut event_rx) = mpsc::channel::<ServerEvent>(32);

    // Register with ChatServer
    if cmd_tx
        .send(ServerCommand::Connect {
            client_id,
            name: user_name,
            room,
            sender: event_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", client_id);
        return Err(AppError::ChannelSend);
    }

    // Clone cmd_tx for read task
    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (WebSocket -> ServerCommand)
    let read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            let cmd = client_event_to_command(client_id, event);
                            if cmd_tx_read.send(cmd).await.is_err() {
                                debug!("Server closed, ending read task for {}", client_id);
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Invalid JSON from {}: {}", client_id, e);
                            // Malformed frames are dropped; the relay never
                            // fails a connection over them.
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", client_id);
                    break;
                }
                Ok(Message::Ping(data)) => {
                    debug!("Ping from {}", client_id);
                    // Pong is handled automatically by tungstenite
                    let _ = data;
                }
                Ok(Message::Pong(_)) => {
                    debug!("Pong from {}", client_id);
                }
                Ok(_) => {
                    // Binary or other message types - ignore
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", client_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", client_id);
    });

    // Spawn write task (ServerEvent -> WebSocket)
    let write_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize event: {}", e);
                    // Continue - don't break on serialization errors
                }
            }
        }
        debug!("Write task ended for client");

        // Send close frame when done
        let _ = ws_sender.close().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", client_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", client_id);
        }
    }

    // Send disconnect command (idempotent on the server side)
    let _ = cmd_tx.send(ServerCommand::Disconnect { client_id }).await;

    info!("Client {} disconnected", client_id);

    Ok(())
}

/// Convert a ClientEvent to a ServerCommand
fn client_event_to_command(client_id: ClientId, event: ClientEvent) -> ServerCommand {
    match event {
        ClientEvent::ChatMessage { data } => ServerCommand::Chat { client_id, data },
        ClientEvent::Typing => ServerCommand::Typing { client_id },
    }
}

/// Extract a single query-string parameter, percent-decoded
fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| percent_decode(v))
}

/// Minimal application/x-www-form-urlencoded decoding for query values
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if let Some(byte) = value
                    .get(i + 1..i + 3)
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                {
                    out.push(byte);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_extraction() {
        let query = "userName=alice&roomName=lobby";
        assert_eq!(query_param(query, "userName").as_deref(), Some("alice"));
        assert_eq!(query_param(query, "roomName").as_deref(), Some("lobby"));
        assert_eq!(query_param(query, "missing"), None);
    }

    #[test]
    fn test_query_param_percent_decoding() {
        assert_eq!(
            query_param("userName=a%20b", "userName").as_deref(),
            Some("a b")
        );
        assert_eq!(
            query_param("userName=%E3%81%82", "userName").as_deref(),
            Some("あ")
        );
        assert_eq!(query_param("userName=a+b", "userName").as_deref(), Some("a b"));
        // Malformed escapes pass through
        assert_eq!(query_param("userName=a%2", "userName").as_deref(), Some("a%2"));
    }
}
