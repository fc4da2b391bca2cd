//! Observers receive a connection's lifecycle events.
//!
//! Two observers ship with the crate:
//!
//! - [`TracingObserver`] – writes each event to the `tracing` log (default).
//! - [`ChannelObserver`] – forwards each event over a tokio channel so the
//!   application (or a test) can react to it.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::events::ConnectionEvent;

/// Receives lifecycle events from a connection.
///
/// `observe` is called inline from the receive and send paths, so it must
/// not block.
pub trait ConnectionObserver: Send + Sync {
    fn observe(&self, session_id: &str, event: &ConnectionEvent);
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ConnectionObserver for TracingObserver {
    fn observe(&self, session_id: &str, event: &ConnectionEvent) {
        match event {
            ConnectionEvent::Accepted => info!(session_id, "connection accepted"),
            ConnectionEvent::HeartbeatReceived => debug!(session_id, "received heartbeat"),
            ConnectionEvent::AutoAcked { id } => debug!(session_id, id, "automatically acked"),
            ConnectionEvent::Disconnected { remote } => {
                info!(session_id, remote, "disconnected")
            }
            ConnectionEvent::Unhandled { summary } => {
                warn!(session_id, "ignoring packet: {summary}")
            }
            ConnectionEvent::UnknownKind { code } => {
                warn!(session_id, code, "skipping packet of unknown kind")
            }
            ConnectionEvent::HeartbeatReplyFailed { reason }
            | ConnectionEvent::AutoAckFailed { reason, .. }
            | ConnectionEvent::DecodeFailed { reason }
            | ConnectionEvent::TransportFailed { reason } => {
                warn!(session_id, event = event.name(), "{reason}")
            }
        }
    }
}

/// One event as delivered by a [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedEvent {
    pub session_id: String,
    pub event: ConnectionEvent,
}

/// Forwards events to an unbounded tokio channel.
///
/// Events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ObservedEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ObservedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ConnectionObserver for ChannelObserver {
    fn observe(&self, session_id: &str, event: &ConnectionEvent) {
        let _ = self.tx.send(ObservedEvent {
            session_id: session_id.to_string(),
            event: event.clone(),
        });
    }
}
