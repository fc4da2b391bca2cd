//! Infrastructure layer for sio-engine.
//!
//! Everything that touches the network lives here.
//!
//! # Responsibilities
//!
//! - The WebSocket transport and socket (tokio-tungstenite)
//! - An in-memory socket pair for tests and in-process embedding
//! - The HTTP/1.1 handshake request (hyper)
//! - `dial`, which ties the handshake, the upgrade and the first receive
//!   together into a client [`Connection`](crate::application::Connection)
//!
//! # What does NOT belong here?
//!
//! - Packet classification, auto-ack or heartbeat handling (application)

pub mod client;
pub mod http;
pub mod memory;
pub mod websocket;

use std::sync::Arc;

use crate::application::transport::TransportRegistry;

pub use client::{dial, dial_with};
pub use memory::MemorySocket;
pub use websocket::{WebSocketSocket, WebSocketTransport, WEBSOCKET};

impl Default for TransportRegistry {
    /// The transports this crate implements: WebSocket only.
    fn default() -> Self {
        TransportRegistry::new(vec![Arc::new(WebSocketTransport)])
    }
}
