//! Connection lifecycle events.
//!
//! A [`Connection`](crate::application::Connection) never logs directly.  It
//! reports what happened as a [`ConnectionEvent`] to the observer it was
//! built with, and the observer decides whether to log, count, or forward it.

/// Something a connection did or saw that the caller of `receive` does not
/// get back as a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The initial Connect packet was sent (server side).
    Accepted,
    /// A heartbeat arrived and was answered.
    HeartbeatReceived,
    /// Answering a heartbeat failed.  The failed write has already
    /// terminated the connection.
    HeartbeatReplyFailed { reason: String },
    /// A bare ack was sent for packet `id`.
    AutoAcked { id: u64 },
    /// Sending the bare ack for packet `id` failed.
    AutoAckFailed { id: u64, reason: String },
    /// A packet that `receive` does not surface (ack, error, noop).
    Unhandled { summary: String },
    /// A packet with an unknown kind code was skipped.
    UnknownKind { code: u32 },
    /// Malformed input was discarded.
    DecodeFailed { reason: String },
    /// A read or write timed out or the transport failed.
    TransportFailed { reason: String },
    /// The connection terminated.  `remote` is `true` when the peer sent
    /// Disconnect.
    Disconnected { remote: bool },
}

impl ConnectionEvent {
    /// Short stable name for structured log fields.
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionEvent::Accepted => "accepted",
            ConnectionEvent::HeartbeatReceived => "heartbeat",
            ConnectionEvent::HeartbeatReplyFailed { .. } => "heartbeat_reply_failed",
            ConnectionEvent::AutoAcked { .. } => "auto_ack",
            ConnectionEvent::AutoAckFailed { .. } => "auto_ack_failed",
            ConnectionEvent::Unhandled { .. } => "unhandled",
            ConnectionEvent::UnknownKind { .. } => "unknown_kind",
            ConnectionEvent::DecodeFailed { .. } => "decode_failed",
            ConnectionEvent::TransportFailed { .. } => "transport_failed",
            ConnectionEvent::Disconnected { .. } => "disconnected",
        }
    }
}
