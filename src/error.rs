//! Error types for the chat relay
//!
//! Defines application-level errors. The routing core itself never fails:
//! every routing edge case is expressed as a no-op or a bot-authored notice,
//! so the variants here cover the connection boundary only.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers fatal transport errors (connection termination) and the
/// identity rejection raised before any room logic runs.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Connection supplied an empty or missing user name
    #[error("Invalid identity: user name is empty or missing")]
    InvalidIdentity,
}
