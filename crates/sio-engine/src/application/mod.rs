//! Application layer for sio-engine.
//!
//! The application layer holds the connection engine and the ports it runs
//! on.  It knows *what* a Socket.IO connection does (classify packets,
//! auto-ack, answer heartbeats, correlate ids) and delegates *how* bytes move
//! to a [`Socket`] supplied by the infrastructure layer.
//!
//! # Responsibilities
//!
//! - The [`Socket`] and [`Transport`] ports and the process-wide
//!   [`TransportRegistry`]
//! - The [`Connection`] engine (receive loop, send path, lifecycle)
//! - The [`ConnectionObserver`] seam for lifecycle events
//! - The [`EngineError`] and [`HandshakeError`] types
//!
//! # What does NOT belong here?
//!
//! - Opening sockets, HTTP requests or WebSocket framing (infrastructure)

pub mod connection;
pub mod error;
pub mod observer;
pub mod socket;
pub mod transport;

pub use connection::{Connection, ConnectionOptions};
pub use error::{EngineError, HandshakeError};
pub use observer::{ChannelObserver, ConnectionObserver, ObservedEvent, TracingObserver};
pub use socket::{Socket, TransportError};
pub use transport::{Transport, TransportKind, TransportRegistry, Upgraded};
