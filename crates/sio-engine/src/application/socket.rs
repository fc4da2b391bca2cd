//! The socket port: one bidirectional, message-oriented text channel.

use async_trait::async_trait;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors raised by a [`Socket`] or [`Transport`](crate::application::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The read or write deadline passed.
    #[error("transport operation timed out")]
    Timeout,

    /// The peer closed the channel, or it was closed locally.
    #[error("transport closed")]
    Closed,

    /// No registered transport has this name.
    #[error("unsupported transport: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[source] Box<tungstenite::Error>),

    /// A binary message was not valid UTF-8.
    #[error("received a message that is not valid UTF-8")]
    InvalidUtf8,
}

impl From<tungstenite::Error> for TransportError {
    fn from(e: tungstenite::Error) -> Self {
        match e {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                TransportError::Closed
            }
            tungstenite::Error::Io(io) => TransportError::Io(io),
            other => TransportError::WebSocket(Box::new(other)),
        }
    }
}

/// A message-oriented text channel.
///
/// Every call to `send` delivers exactly one message and every call to
/// `receive` returns exactly one.  Methods take `&self` so a reader and any
/// number of writers can share the socket; implementations must keep the
/// read and write sides independent so a pending `receive` never blocks a
/// `send`.
#[async_trait]
pub trait Socket: Send + Sync {
    /// Waits for the next message.
    async fn receive(&self) -> Result<String, TransportError>;

    /// Writes one message.
    async fn send(&self, message: &str) -> Result<(), TransportError>;

    /// Closes the channel.  Later calls may fail with
    /// [`TransportError::Closed`].
    async fn close(&self) -> Result<(), TransportError>;
}
