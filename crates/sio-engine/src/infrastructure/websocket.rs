//! WebSocket transport built on tokio-tungstenite.
//!
//! Server side, [`WebSocketTransport::upgrade`] performs the RFC 6455
//! handshake on an accepted TCP stream.  Client side, [`connect`] opens a
//! WebSocket to an upgrade URL.  Both produce a [`WebSocketSocket`], which
//! maps one Socket.IO transport message to one WebSocket text message.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{accept_hdr_async, connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::application::socket::{Socket, TransportError};
use crate::application::transport::{Transport, TransportKind, Upgraded};

/// Transport name in handshake lists and upgrade paths.
pub const WEBSOCKET: &str = "websocket";

// ── Socket ────────────────────────────────────────────────────────────────────

/// A [`Socket`] over one WebSocket.
///
/// The stream is split so that a pending `receive` never holds up a `send`.
pub struct WebSocketSocket<S> {
    sink: Mutex<SplitSink<WebSocketStream<S>, Message>>,
    stream: Mutex<SplitStream<WebSocketStream<S>>>,
}

impl<S> WebSocketSocket<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(ws: WebSocketStream<S>) -> Self {
        let (sink, stream) = ws.split();
        Self {
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        }
    }
}

#[async_trait]
impl<S> Socket for WebSocketSocket<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    async fn receive(&self) -> Result<String, TransportError> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Binary(data))) => {
                    return String::from_utf8(data).map_err(|_| TransportError::InvalidUtf8)
                }
                // Control frames are answered by tungstenite itself.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Ok(Message::Close(frame))) => {
                    debug!("websocket: close frame received: {frame:?}");
                    return Err(TransportError::Closed);
                }
                Some(Err(e)) => return Err(e.into()),
                None => return Err(TransportError::Closed),
            }
        }
    }

    async fn send(&self, message: &str) -> Result<(), TransportError> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(message.to_string())).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        let mut sink = self.sink.lock().await;
        sink.close().await?;
        Ok(())
    }
}

// ── Transport ─────────────────────────────────────────────────────────────────

/// The `websocket` transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketTransport;

#[async_trait]
impl Transport for WebSocketTransport {
    fn name(&self) -> &'static str {
        WEBSOCKET
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Streaming
    }

    async fn upgrade(&self, stream: TcpStream) -> Result<Upgraded, TransportError> {
        let mut path = String::new();
        let ws = accept_hdr_async(stream, |request: &Request, response: Response| {
            path = request.uri().path().to_string();
            Ok::<Response, ErrorResponse>(response)
        })
        .await?;

        Ok(Upgraded {
            socket: Box::new(WebSocketSocket::new(ws)),
            path,
        })
    }
}

// ── Client connect ────────────────────────────────────────────────────────────

/// Opens a WebSocket to `url` (`ws://…`), sending `origin` as the `Origin`
/// header unless it is empty.
///
/// # Errors
///
/// Returns [`TransportError`] if the URL or origin is invalid, the TCP
/// connection fails, or the server rejects the upgrade.
pub async fn connect(
    url: &str,
    origin: &str,
) -> Result<WebSocketSocket<MaybeTlsStream<TcpStream>>, TransportError> {
    let mut request = url.into_client_request()?;
    if !origin.is_empty() {
        let value = HeaderValue::from_str(origin).map_err(|e| {
            TransportError::WebSocket(Box::new(tungstenite::Error::HttpFormat(e.into())))
        })?;
        request.headers_mut().insert(ORIGIN, value);
    }

    let (ws, response) = connect_async(request).await?;
    debug!("websocket: connected to {url} ({})", response.status());
    Ok(WebSocketSocket::new(ws))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accepts one connection on a loopback listener and upgrades it.
    async fn loopback() -> (
        WebSocketSocket<MaybeTlsStream<TcpStream>>,
        Upgraded,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            WebSocketTransport.upgrade(stream).await.unwrap()
        });
        let url = format!("ws://{addr}/socket.io/1/websocket/abc");
        let client = connect(&url, "http://example.com").await.unwrap();
        (client, server.await.unwrap())
    }

    #[test]
    fn test_transport_descriptor() {
        assert_eq!(WebSocketTransport.name(), "websocket");
        assert_eq!(WebSocketTransport.kind(), TransportKind::Streaming);
        assert!(!WebSocketTransport.post_encoded());
    }

    #[tokio::test]
    async fn test_upgrade_records_path_and_exchanges_text() {
        // Arrange
        let (client, upgraded) = loopback().await;

        // Act
        client.send("2::").await.unwrap();
        let at_server = upgraded.socket.receive().await.unwrap();
        upgraded.socket.send("1::").await.unwrap();
        let at_client = client.receive().await.unwrap();

        // Assert
        assert_eq!(upgraded.path, "/socket.io/1/websocket/abc");
        assert_eq!(at_server, "2::");
        assert_eq!(at_client, "1::");
    }

    #[tokio::test]
    async fn test_close_is_seen_as_closed_by_peer() {
        let (client, upgraded) = loopback().await;

        client.close().await.unwrap();

        assert!(matches!(
            upgraded.socket.receive().await,
            Err(TransportError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = connect("not a url", "").await;
        assert!(result.is_err());
    }
}
