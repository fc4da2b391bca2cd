//! Client-side connection setup.
//!
//! [`dial`] performs the whole client handshake:
//!
//! ```text
//! GET http://host/socket.io/1        →  "sid:15:25:websocket,xhr-polling"
//! ws://host/socket.io/1/websocket/sid   (WebSocket upgrade, Origin header)
//! receive()                           →  must be Connect ("1::")
//! ```
//!
//! Each network step is bounded by the connection's read timeout.  Once the
//! WebSocket is open, any failure closes it before the error is returned.

use std::time::Duration;

use hyper::Uri;
use sio_core::{HandshakeResponse, Packet, PacketKind, PROTOCOL_VERSION};
use tokio::time::timeout;
use tracing::info;

use crate::application::connection::{Connection, ConnectionOptions};
use crate::application::error::{EngineError, HandshakeError};
use crate::application::socket::TransportError;
use crate::application::transport::TransportRegistry;
use crate::infrastructure::http::fetch_handshake;
use crate::infrastructure::websocket::{self, WEBSOCKET};

/// Connects to the Socket.IO server at `base_url` (e.g.
/// `http://localhost:8080/socket.io/`) with `timeout` for every step and
/// every later read and write.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), sio_engine::application::EngineError> {
/// let conn = sio_engine::dial("http://localhost:8080/socket.io/", "http://localhost", Duration::from_secs(5)).await?;
/// conn.emit(false, "hello", &("world",)).await?;
/// let packet = conn.receive().await?;
/// println!("{}", packet.summary());
/// conn.close().await?;
/// # Ok(())
/// # }
/// ```
pub async fn dial(
    base_url: &str,
    origin: &str,
    timeout: Duration,
) -> Result<Connection, EngineError> {
    dial_with(
        base_url,
        origin,
        ConnectionOptions::default().with_timeout(timeout),
    )
    .await
}

/// Like [`dial`], with full control over the connection options.
///
/// When `options.endpoint` is non-empty the client also joins that
/// namespace by sending a Connect packet for it.  Only the transports named
/// in `options.transports` are considered; of those, the client can open a
/// WebSocket.
///
/// # Errors
///
/// - [`HandshakeError`] (wrapped in [`EngineError::Handshake`]) when the
///   handshake request, its body, the transport list or the first packet is
///   not acceptable.  `UnsupportedTransport` also covers a server offer that
///   shares no usable transport with `options.transports`.
/// - [`EngineError::Transport`] when a step times out or the WebSocket
///   fails.
pub async fn dial_with(
    base_url: &str,
    origin: &str,
    options: ConnectionOptions,
) -> Result<Connection, EngineError> {
    let base = base_url.trim_end_matches('/');
    if !base
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http://"))
    {
        return Err(HandshakeError::UnsupportedScheme(base_url.to_string()).into());
    }

    // ── 1. Handshake request ─────────────────────────────────────────────────
    let handshake_url = format!("{base}/{PROTOCOL_VERSION}");
    let uri = handshake_url
        .parse::<Uri>()
        .map_err(|e| HandshakeError::InvalidUrl {
            url: handshake_url.clone(),
            reason: e.to_string(),
        })?;
    let body = timeout(options.read_timeout, fetch_handshake(&uri))
        .await
        .map_err(|_| TransportError::Timeout)??;

    // ── 2. Body and transport list ───────────────────────────────────────────
    let handshake = HandshakeResponse::parse(&body)
        .map_err(|_| HandshakeError::InvalidHandshake(body.clone()))?;
    // The first locally enabled transport the server also offers.
    let chosen = TransportRegistry::global()
        .enabled(&options.transports)
        .into_iter()
        .find(|t| handshake.supports(t.name()));
    match chosen {
        Some(t) if t.name() == WEBSOCKET => {}
        _ => return Err(HandshakeError::UnsupportedTransport(handshake.transports).into()),
    }

    // ── 3. Upgrade ───────────────────────────────────────────────────────────
    // "http://h/p" → "ws://h/p/1/websocket/<sid>"
    let ws_url = format!(
        "ws{}/{PROTOCOL_VERSION}/{WEBSOCKET}/{}",
        &base[4..],
        handshake.session_id
    );
    let socket = timeout(options.read_timeout, websocket::connect(&ws_url, origin))
        .await
        .map_err(|_| TransportError::Timeout)??;

    let endpoint = options.endpoint.clone();
    let conn = Connection::new(handshake.session_id, Box::new(socket), options);

    // ── 4. First packet must be Connect ──────────────────────────────────────
    let first = match conn.receive().await {
        Ok(packet) => packet,
        Err(e) => {
            conn.abort().await;
            return Err(e);
        }
    };
    if first.kind() != PacketKind::Connect {
        conn.abort().await;
        return Err(HandshakeError::UnexpectedPacket(first.summary()).into());
    }

    // ── 5. Join the namespace ────────────────────────────────────────────────
    if !endpoint.is_empty() {
        if let Err(e) = conn.send(&Packet::connect().with_endpoint(endpoint)).await {
            conn.abort().await;
            return Err(e);
        }
    }

    info!(
        session_id = conn.session_id(),
        endpoint = conn.endpoint(),
        "connected to {base}"
    );
    Ok(conn)
}
