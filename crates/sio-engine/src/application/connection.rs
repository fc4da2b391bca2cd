//! The Socket.IO connection engine.
//!
//! A [`Connection`] sits on top of one [`Socket`] and turns its text
//! messages into [`Packet`]s and back.
//!
//! # Receive loop
//!
//! [`Connection::receive`] hands back only the packets an application cares
//! about (Connect, Event, Text, Json).  Everything else is handled inline:
//!
//! | Packet             | Handling                                        |
//! |--------------------|-------------------------------------------------|
//! | Heartbeat          | answered with a Heartbeat, loop continues       |
//! | Disconnect         | socket closed, returns [`EngineError::EndOfStream`] |
//! | Error / Ack / Noop | reported to the observer, loop continues        |
//! | unknown kind       | reported to the observer, loop continues        |
//! | Event / Text / Json with an id but no `+` | bare ack sent, then returned |
//!
//! # Concurrency
//!
//! - Only one task reads at a time.  The decoder sits behind an async mutex,
//!   so a second concurrent `receive` waits for the first.
//! - Any number of tasks may send.  The writer mutex serializes physical
//!   writes and owns the scratch buffer they encode into.
//! - Reading and writing never block each other.
//!
//! Every blocking step is bounded: `receive` by the read timeout, `send` by
//! the write timeout (which includes waiting for the writer mutex).  The read
//! deadline restarts whenever a message arrives, so a peer that only sends
//! heartbeats keeps a pending `receive` alive.  A
//! timeout or transport failure terminates the connection; after that every
//! call fails with [`EngineError::Closed`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use sio_core::protocol::packet::to_args;
use sio_core::{encode_frame, Decoder, Packet, PacketIdAllocator, Payload};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, timeout_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::application::error::EngineError;
use crate::application::observer::{ConnectionObserver, TracingObserver};
use crate::application::socket::{Socket, TransportError};
use crate::domain::config::EngineConfig;
use crate::domain::events::ConnectionEvent;

// ── Options ───────────────────────────────────────────────────────────────────

/// Per-connection settings.
#[derive(Clone)]
pub struct ConnectionOptions {
    /// Namespace the connection emits on.  Empty means the default namespace.
    pub endpoint: String,
    /// Bound on one `receive` call.
    pub read_timeout: Duration,
    /// Bound on one `send` call, including the wait for the writer mutex.
    pub write_timeout: Duration,
    /// Transports the client may use, in order of preference.
    pub transports: Vec<String>,
    pub observer: Arc<dyn ConnectionObserver>,
}

impl ConnectionOptions {
    /// Derives the timeouts from `config`; default endpoint, tracing observer.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            endpoint: String::new(),
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout,
            transports: config.transports.clone(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Uses `timeout` for both reads and writes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self.write_timeout = timeout;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_transports(mut self, transports: Vec<String>) -> Self {
        self.transports = transports;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ConnectionObserver>) -> Self {
        self.observer = observer;
        self
    }
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl std::fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("endpoint", &self.endpoint)
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .field("transports", &self.transports)
            .finish_non_exhaustive()
    }
}

// ── Connection ────────────────────────────────────────────────────────────────

/// One live Socket.IO session over a [`Socket`].
pub struct Connection {
    session_id: String,
    endpoint: String,
    socket: Box<dyn Socket>,
    /// Accumulates inbound text; the lock is the single-reader guard.
    decoder: Mutex<Decoder>,
    /// Scratch buffer for outbound frames; the lock serializes writes.
    writer: Mutex<String>,
    ids: PacketIdAllocator,
    read_timeout: Duration,
    write_timeout: Duration,
    closed: AtomicBool,
    observer: Arc<dyn ConnectionObserver>,
}

impl Connection {
    /// Wraps an already-open socket.  Sends nothing.
    pub fn new(
        session_id: impl Into<String>,
        socket: Box<dyn Socket>,
        options: ConnectionOptions,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            endpoint: options.endpoint,
            socket,
            decoder: Mutex::new(Decoder::new()),
            writer: Mutex::new(String::new()),
            ids: PacketIdAllocator::new(),
            read_timeout: options.read_timeout,
            write_timeout: options.write_timeout,
            closed: AtomicBool::new(false),
            observer: options.observer,
        }
    }

    /// Server side: wraps an upgraded socket and sends the initial Connect
    /// packet (`1::`).
    ///
    /// # Errors
    ///
    /// Returns the send error; the socket is closed in that case.
    pub async fn accept(
        session_id: impl Into<String>,
        socket: Box<dyn Socket>,
        options: ConnectionOptions,
    ) -> Result<Self, EngineError> {
        let conn = Self::new(session_id, socket, options);
        conn.send(&Packet::connect()).await?;
        conn.observe(ConnectionEvent::Accepted);
        Ok(conn)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `true` once the connection has been closed or has failed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Waits for the next application packet.
    ///
    /// Returns Connect, Event, Text and Json packets; see the module docs for
    /// everything handled inline.
    ///
    /// # Errors
    ///
    /// - [`EngineError::EndOfStream`] when the peer sent Disconnect.
    /// - [`EngineError::Transport`] on timeout or transport failure; the
    ///   connection is terminated.
    /// - [`EngineError::Decode`] on malformed input; the buffered input is
    ///   discarded and the connection stays usable.
    /// - [`EngineError::Closed`] if the connection was already terminated,
    ///   or is closed while this call waits.
    pub async fn receive(&self) -> Result<Packet, EngineError> {
        self.ensure_open()?;
        let mut deadline = Instant::now() + self.read_timeout;
        let mut decoder = self.decoder.lock().await;

        loop {
            let packet = match decoder.decode() {
                Ok(Some(packet)) => packet,
                Ok(None) => {
                    self.ensure_open()?;
                    let message = match timeout_at(deadline, self.socket.receive()).await {
                        Ok(Ok(message)) => message,
                        Ok(Err(e)) => return Err(self.fail(e).await),
                        Err(_) => return Err(self.fail(TransportError::Timeout).await),
                    };
                    deadline = Instant::now() + self.read_timeout;
                    decoder.write(&message);
                    continue;
                }
                Err(e) if e.is_recoverable() => {
                    if let sio_core::DecodeError::UnknownKind(code) = e {
                        self.observe(ConnectionEvent::UnknownKind { code });
                    }
                    continue;
                }
                Err(e) => {
                    decoder.reset();
                    self.observe(ConnectionEvent::DecodeFailed {
                        reason: e.to_string(),
                    });
                    return Err(e.into());
                }
            };

            match packet.payload() {
                Payload::Heartbeat => {
                    self.observe(ConnectionEvent::HeartbeatReceived);
                    if let Err(e) = self.send(&Packet::heartbeat()).await {
                        self.observe(ConnectionEvent::HeartbeatReplyFailed {
                            reason: e.to_string(),
                        });
                    }
                }
                Payload::Disconnect => {
                    self.closed.store(true, Ordering::Release);
                    let _ = timeout(self.write_timeout, self.socket.close()).await;
                    self.observe(ConnectionEvent::Disconnected { remote: true });
                    return Err(EngineError::EndOfStream);
                }
                Payload::Connect { .. } => return Ok(packet),
                Payload::Error { .. } | Payload::Ack { .. } | Payload::Noop => {
                    self.observe(ConnectionEvent::Unhandled {
                        summary: packet.summary(),
                    });
                }
                Payload::Event { .. } | Payload::Text(_) | Payload::Json(_) => {
                    if packet.id() != 0 && !packet.requires_ack() {
                        self.auto_ack(&packet).await;
                    }
                    return Ok(packet);
                }
            }
        }
    }

    /// Writes one packet as one transport message.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Encode`] if the packet cannot be encoded; nothing is
    ///   written and the connection stays usable.
    /// - [`EngineError::Transport`] on timeout or transport failure; the
    ///   connection is terminated.
    /// - [`EngineError::Closed`] if the connection was already terminated.
    pub async fn send(&self, packet: &Packet) -> Result<(), EngineError> {
        self.send_all(std::slice::from_ref(packet)).await
    }

    /// Writes several packets as one framed transport message.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send); an empty slice is an encode error.
    pub async fn send_all(&self, packets: &[Packet]) -> Result<(), EngineError> {
        self.ensure_open()?;
        self.write_frame(packets).await
    }

    /// Sends an event on the connection's endpoint and returns its id.
    ///
    /// `args` must serialize to a JSON array (a tuple, slice or `Vec`); `&()`
    /// sends no arguments.  With `requires_ack` the peer is expected to answer
    /// with a data ack; without it the peer acks receipt automatically.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).  An argument that is not a sequence is an
    /// encode error.
    pub async fn emit<A: Serialize + ?Sized>(
        &self,
        requires_ack: bool,
        name: &str,
        args: &A,
    ) -> Result<u64, EngineError> {
        let args = to_args(args)?;
        let id = self.ids.next();
        let packet = Packet::event(name, args)
            .with_id(id, requires_ack)
            .with_endpoint(self.endpoint.clone());
        self.send(&packet).await?;
        Ok(id)
    }

    /// Acknowledges `original` on its endpoint.
    ///
    /// Non-empty `args` make a data ack; `&()` makes a bare ack.
    pub async fn reply<A: Serialize + ?Sized>(
        &self,
        original: &Packet,
        args: &A,
    ) -> Result<(), EngineError> {
        let args = to_args(args)?;
        let ack = Packet::ack(original.id(), args).with_endpoint(original.endpoint());
        self.send(&ack).await
    }

    /// Sends a Disconnect (best effort) and closes the socket.
    ///
    /// Calling `close` again, or after the connection failed, does nothing.
    pub async fn close(&self) -> Result<(), EngineError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        if let Err(e) = self.write_frame(&[Packet::disconnect()]).await {
            debug!("{}: disconnect not delivered: {e}", self.session_id);
        }
        let result = match timeout(self.write_timeout, self.socket.close()).await {
            Ok(Ok(())) | Ok(Err(TransportError::Closed)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(TransportError::Timeout.into()),
        };
        self.observe(ConnectionEvent::Disconnected { remote: false });
        result
    }

    /// Sends a Heartbeat every `period` until a send fails or the
    /// connection terminates.
    ///
    /// The first heartbeat goes out after one full `period`.
    pub fn spawn_heartbeat(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let conn = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if conn.is_closed() {
                    break;
                }
                if let Err(e) = conn.send(&Packet::heartbeat()).await {
                    debug!("{}: heartbeat task stopping: {e}", conn.session_id);
                    break;
                }
            }
        })
    }

    /// Marks the connection terminated and closes the socket without
    /// sending Disconnect.  Used when a handshake is abandoned.
    pub(crate) async fn abort(&self) {
        self.closed.store(true, Ordering::Release);
        let _ = timeout(self.write_timeout, self.socket.close()).await;
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn ensure_open(&self) -> Result<(), EngineError> {
        if self.is_closed() {
            Err(EngineError::Closed)
        } else {
            Ok(())
        }
    }

    fn observe(&self, event: ConnectionEvent) {
        self.observer.observe(&self.session_id, &event);
    }

    async fn auto_ack(&self, packet: &Packet) {
        let ack = Packet::ack(packet.id(), Vec::new()).with_endpoint(packet.endpoint());
        match self.send(&ack).await {
            Ok(()) => self.observe(ConnectionEvent::AutoAcked { id: packet.id() }),
            Err(e) => self.observe(ConnectionEvent::AutoAckFailed {
                id: packet.id(),
                reason: e.to_string(),
            }),
        }
    }

    /// Encodes `packets` into the scratch buffer and writes it.  Does not
    /// check whether the connection is open, so `close` can use it.
    async fn write_frame(&self, packets: &[Packet]) -> Result<(), EngineError> {
        let deadline = Instant::now() + self.write_timeout;
        let mut scratch = match timeout_at(deadline, self.writer.lock()).await {
            Ok(guard) => guard,
            Err(_) => return Err(self.fail(TransportError::Timeout).await),
        };

        scratch.clear();
        encode_frame(packets, &mut scratch)?;

        match timeout_at(deadline, self.socket.send(&scratch)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(self.fail(e).await),
            Err(_) => Err(self.fail(TransportError::Timeout).await),
        }
    }

    /// Terminates the connection after a transport failure.
    ///
    /// A failure on a connection that was already terminated (typically a
    /// pending read woken by `close`) is reported as [`EngineError::Closed`].
    async fn fail(&self, error: TransportError) -> EngineError {
        if self.closed.swap(true, Ordering::AcqRel) {
            return EngineError::Closed;
        }
        self.observe(ConnectionEvent::TransportFailed {
            reason: error.to_string(),
        });
        let _ = timeout(self.write_timeout, self.socket.close()).await;
        EngineError::Transport(error)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("endpoint", &self.endpoint)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
