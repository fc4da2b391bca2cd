//! End-to-end tests for `dial` against a loopback server.
//!
//! The server answers the handshake GET with hyper on the first accepted TCP
//! connection, then upgrades the second one through the global transport
//! registry, the same path a real server would take.

use std::convert::Infallible;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use sio_core::handshake::parse_transport_path;
use sio_core::{Packet, PacketKind};
use sio_engine::application::{Socket, TransportError, TransportRegistry, Upgraded};
use sio_engine::domain::EngineConfig;
use sio_engine::infrastructure::WEBSOCKET;
use sio_engine::{dial, dial_with, Connection, ConnectionOptions, EngineError, HandshakeError};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const TIMEOUT: Duration = Duration::from_secs(2);

/// Starts a server that answers `GET /socket.io/1` with `status` and `body`
/// and upgrades the next connection to a WebSocket.
async fn start_server(status: StatusCode, body: &'static str) -> (String, JoinHandle<Upgraded>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| async move {
                let (status, body) = if req.uri().path() == "/socket.io/1" {
                    (status, body)
                } else {
                    (StatusCode::NOT_FOUND, "wrong path")
                };
                Ok::<_, Infallible>(
                    Response::builder()
                        .status(status)
                        .body(Full::new(Bytes::from_static(body.as_bytes())))
                        .unwrap(),
                )
            });
            let _ = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await;
        });

        let (stream, _) = listener.accept().await.unwrap();
        TransportRegistry::global()
            .hijack(WEBSOCKET, stream, |upgraded| async move { upgraded })
            .await
            .unwrap()
    });

    (format!("http://{addr}/socket.io/"), handle)
}

/// Runs `dial` in the background so the test can play the server side.
fn spawn_dial(base_url: String, options: ConnectionOptions) -> JoinHandle<Result<Connection, EngineError>> {
    tokio::spawn(async move { dial_with(&base_url, "http://localhost", options).await })
}

fn client_options() -> ConnectionOptions {
    ConnectionOptions::default().with_timeout(TIMEOUT)
}

// ── Success ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dial_handshakes_upgrades_and_exchanges_events() {
    // Arrange
    let (base_url, server) = start_server(StatusCode::OK, "abc123:15:25:websocket,xhr-polling").await;
    let client = spawn_dial(base_url, client_options());
    let upgraded = server.await.unwrap();
    let path = upgraded.path.clone();
    let server = Connection::accept("abc123", upgraded.socket, client_options())
        .await
        .unwrap();

    // Act
    let client = client.await.unwrap().unwrap();
    client.emit(false, "hello", &("from client",)).await.unwrap();
    let at_server = server.receive().await.unwrap();
    server.emit(false, "welcome", &()).await.unwrap();
    let at_client = client.receive().await.unwrap();

    // Assert
    assert_eq!(
        parse_transport_path(&path),
        Some((1, "websocket".to_string(), "abc123".to_string()))
    );
    assert_eq!(client.session_id(), "abc123");
    assert_eq!(at_server.kind(), PacketKind::Event);
    assert_eq!(at_server.id(), 1);
    // The server's auto-ack for id 1 was consumed by the client engine.
    assert_eq!(at_client.kind(), PacketKind::Event);
    assert_eq!(at_client.id(), 1);

    client.close().await.unwrap();
    assert!(server.receive().await.unwrap_err().is_end_of_stream());
}

#[tokio::test]
async fn test_dial_without_trailing_slash() {
    let (base_url, server) = start_server(StatusCode::OK, "sid:::websocket").await;
    let client = spawn_dial(base_url.trim_end_matches('/').to_string(), client_options());
    let upgraded = server.await.unwrap();
    let _server = Connection::accept("sid", upgraded.socket, client_options())
        .await
        .unwrap();

    let client = client.await.unwrap().unwrap();

    assert_eq!(client.session_id(), "sid");
}

#[tokio::test]
async fn test_dial_with_endpoint_joins_namespace() {
    // Arrange
    let (base_url, server) = start_server(StatusCode::OK, "sid:15:25:websocket").await;
    let client = spawn_dial(base_url, client_options().with_endpoint("/chat"));
    let upgraded = server.await.unwrap();
    let server = Connection::accept("sid", upgraded.socket, client_options())
        .await
        .unwrap();

    // Act
    let client = client.await.unwrap().unwrap();
    let join = server.receive().await.unwrap();

    // Assert
    assert_eq!(client.endpoint(), "/chat");
    assert_eq!(join, Packet::connect().with_endpoint("/chat"));
}

// ── Handshake failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dial_bad_status() {
    let (base_url, server) = start_server(StatusCode::SERVICE_UNAVAILABLE, "").await;

    let result = dial(&base_url, "", TIMEOUT).await;
    server.abort();

    match result {
        Err(EngineError::Handshake(HandshakeError::BadStatus(status))) => {
            assert_eq!(status, "503 Service Unavailable");
        }
        other => panic!("expected BadStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dial_short_body_is_invalid_handshake() {
    let (base_url, server) = start_server(StatusCode::OK, "abc:15").await;

    let result = dial(&base_url, "", TIMEOUT).await;
    server.abort();

    assert!(matches!(
        result,
        Err(EngineError::Handshake(HandshakeError::InvalidHandshake(body))) if body == "abc:15"
    ));
}

#[tokio::test]
async fn test_dial_requires_websocket_transport() {
    let (base_url, server) = start_server(StatusCode::OK, "abc:15:25:xhr-polling,jsonp-polling").await;

    let result = dial(&base_url, "", TIMEOUT).await;
    server.abort();

    assert!(matches!(
        result,
        Err(EngineError::Handshake(HandshakeError::UnsupportedTransport(_)))
    ));
}

#[tokio::test]
async fn test_dial_only_uses_enabled_transports() {
    // Arrange – the server offers websocket, the config does not enable it
    let (base_url, server) = start_server(StatusCode::OK, "abc:15:25:websocket,xhr-polling").await;
    let config = EngineConfig::from_toml_str("transports = [\"xhr-polling\", \"flashsocket\"]\n").unwrap();
    let options = ConnectionOptions::from_config(&config).with_timeout(TIMEOUT);

    // Act
    let result = dial_with(&base_url, "", options).await;
    server.abort();

    // Assert
    assert!(matches!(
        result,
        Err(EngineError::Handshake(HandshakeError::UnsupportedTransport(offered)))
            if offered == vec!["websocket".to_string(), "xhr-polling".to_string()]
    ));
}

#[tokio::test]
async fn test_dial_skips_unknown_enabled_names() {
    let (base_url, server) = start_server(StatusCode::OK, "abc:15:25:websocket").await;
    let options = client_options().with_transports(vec!["bogus".to_string(), "websocket".to_string()]);
    let client = spawn_dial(base_url, options);
    let upgraded = server.await.unwrap();
    let _server = Connection::accept("abc", upgraded.socket, client_options())
        .await
        .unwrap();

    let client = client.await.unwrap().unwrap();

    assert_eq!(client.session_id(), "abc");
}

#[tokio::test]
async fn test_dial_unexpected_first_packet_closes_socket() {
    // Arrange
    let (base_url, server) = start_server(StatusCode::OK, "abc:15:25:websocket").await;
    let client = spawn_dial(base_url, client_options());
    let upgraded = server.await.unwrap();

    // Act – greet with a message instead of Connect
    upgraded.socket.send("3:::not a connect").await.unwrap();
    let result = client.await.unwrap();

    // Assert
    assert!(matches!(
        result,
        Err(EngineError::Handshake(HandshakeError::UnexpectedPacket(_)))
    ));
    let after = tokio::time::timeout(TIMEOUT, upgraded.socket.receive())
        .await
        .expect("client must close the socket");
    assert!(matches!(after, Err(TransportError::Closed)));
}

#[tokio::test]
async fn test_dial_times_out_without_connect_and_closes_socket() {
    // Arrange
    let (base_url, server) = start_server(StatusCode::OK, "abc:15:25:websocket").await;
    let client = spawn_dial(
        base_url,
        ConnectionOptions::default().with_timeout(Duration::from_millis(200)),
    );
    let upgraded = server.await.unwrap();

    // Act – say nothing
    let result = client.await.unwrap();

    // Assert
    assert!(matches!(
        result,
        Err(EngineError::Transport(TransportError::Timeout))
    ));
    let after = tokio::time::timeout(TIMEOUT, upgraded.socket.receive())
        .await
        .expect("client must close the socket");
    assert!(matches!(after, Err(TransportError::Closed)));
}
