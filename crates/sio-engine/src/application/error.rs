//! Connection-level and handshake error types.

use sio_core::{DecodeError, EncodeError};
use thiserror::Error;

use crate::application::socket::TransportError;

/// Errors returned while establishing a client connection with `dial`.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The handshake request returned a non-success HTTP status.
    #[error("invalid handshake status: {0}")]
    BadStatus(String),

    /// The handshake body is not `sid:heartbeat:close:transports`, or its
    /// session id is empty.  Unparseable timeouts are not an error; they
    /// read as "none".
    #[error("invalid handshake: {0:?}")]
    InvalidHandshake(String),

    /// The server does not offer the WebSocket transport.
    #[error("server does not support websockets (offers {0:?})")]
    UnsupportedTransport(Vec<String>),

    /// The first packet after the upgrade was not Connect.
    #[error("unexpected connect message: {0}")]
    UnexpectedPacket(String),

    /// The base URL is not `http://`.
    #[error("unsupported URL scheme in {0:?} (only http is supported)")]
    UnsupportedScheme(String),

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP exchange failed.
    #[error("handshake request failed: {0}")]
    Http(#[from] hyper::Error),

    /// The TCP connection for the handshake request could not be opened.
    #[error("failed to connect for handshake: {0}")]
    Connect(#[source] std::io::Error),
}

/// Errors returned by a [`Connection`](crate::application::Connection).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    /// Read or write failed or timed out.  The connection is terminated.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed input was discarded.  The connection stays usable.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// An outbound packet could not be encoded.  Nothing was written.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// The peer sent Disconnect.  Orderly end of the connection.
    #[error("end of stream")]
    EndOfStream,

    /// The connection was already terminated.
    #[error("connection closed")]
    Closed,
}

impl EngineError {
    /// `true` for the orderly end of a connection (peer Disconnect).
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, EngineError::EndOfStream)
    }
}
