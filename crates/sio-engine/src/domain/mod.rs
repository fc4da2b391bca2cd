//! Domain layer for sio-engine.
//!
//! Pure types with no I/O: the runtime configuration and the lifecycle
//! events a connection reports to its observer.
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `TcpStream`, or WebSocket types
//! - Anything that could block or fail due to external state (the one
//!   exception is [`EngineConfig::load`], a thin file-read wrapper)

pub mod config;
pub mod events;

pub use config::{ConfigError, EngineConfig};
pub use events::ConnectionEvent;
