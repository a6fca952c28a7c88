//! Transport channels
//!
//! Owns the network connection to the AirTrack receiver. Two interchangeable
//! bindings present the same contract: a persistent WebSocket stream and a
//! connectionless UDP datagram socket. Sends are fire-and-forget; a channel
//! that is not connected drops the message and says so, because replaying
//! stale motion after a reconnect would be worse than losing it.

pub mod udp;
pub mod websocket;

pub use udp::UdpTransport;
pub use websocket::WebSocketTransport;

use crate::protocol::OutboundMessage;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

/// Errors surfaced by a transport channel.
///
/// None of these are fatal to the pipeline: connect failures reschedule a
/// retry and send failures drop the message.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("not connected; message dropped")]
    NotConnected,

    #[error("message encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Connection lifecycle state, surfaced to the rendering layer for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// Contract shared by both transport bindings.
///
/// The binding is selected by configuration; nothing downstream branches on
/// which one is in use.
#[async_trait]
pub trait TransportChannel: Send + Sync {
    /// Short identifier for logs (e.g. "websocket", "udp").
    fn id(&self) -> &str;

    /// Current connection state.
    fn state(&self) -> ConnectionState;

    /// Subscribe to connection state transitions.
    fn watch_state(&self) -> watch::Receiver<ConnectionState>;

    /// Start the connection lifecycle. The channel keeps retrying a dropped
    /// connection on a fixed delay until [`close`](Self::close) is called.
    async fn connect(&mut self) -> TransportResult<()>;

    /// Best-effort, non-blocking send. Drops the message with a log line when
    /// the channel is not connected; there is no outbound queue.
    fn send(&self, message: &OutboundMessage) -> TransportResult<()>;

    /// Tear down the connection and cancel any pending reconnect. Idempotent.
    async fn close(&mut self);
}
