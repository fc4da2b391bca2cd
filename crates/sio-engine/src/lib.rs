//! sio-engine library crate.
//!
//! A Socket.IO (protocol v1) connection engine.  It performs the client
//! handshake, runs the receive loop (heartbeats, auto-acks, disconnects) and
//! serializes concurrent senders over one transport.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Application code (emit / receive / reply)
//!         ↕
//! [sio-engine]
//!   ├── domain/           Pure types: EngineConfig, ConnectionEvent
//!   ├── application/      Connection engine, Socket + Transport ports, observers
//!   └── infrastructure/
//!         ├── websocket/  WebSocket transport (tokio-tungstenite)
//!         ├── memory/     In-process socket pair
//!         ├── http/       Handshake GET (hyper)
//!         └── client/     dial(): handshake → upgrade → Connect
//!         ↕
//! [sio-core]  packet model and text codec
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O, no async and no frameworks.
//! - `application` depends on `domain` and `sio-core`; it sees the network
//!   only through the [`Socket`](application::Socket) trait.
//! - `infrastructure` implements the ports with real sockets.

/// Domain layer: configuration and lifecycle events (no I/O).
pub mod domain;

/// Application layer: the connection engine and its ports.
pub mod application;

/// Infrastructure layer: transports, the handshake client and `dial`.
pub mod infrastructure;

pub use application::{Connection, ConnectionOptions, EngineError, HandshakeError};
pub use infrastructure::{dial, dial_with};
