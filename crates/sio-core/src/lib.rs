//! # sio-core
//!
//! Shared library for the Socket.IO engine containing the packet model, the
//! text wire codec, the packet-id allocator and the handshake body types.
//!
//! It has no dependencies on sockets, async runtimes or HTTP stacks, so every
//! piece of it can be tested with plain strings.
//!
//! # Architecture overview (for beginners)
//!
//! A Socket.IO session starts with an HTTP request (the *handshake*) that
//! hands out a session id and lists the transports the server supports.  The
//! client then opens a persistent transport (a WebSocket here) and both sides
//! exchange *packets* as short text strings such as `5:1+::{"name":"hi"}`.
//!
//! - **`protocol`** – The packet model ([`Packet`], [`Payload`]) and the
//!   codec that turns packets into wire text and back.  One WebSocket
//!   message may carry several packets; the [`Decoder`] hands them out one
//!   at a time.
//!
//! - **`handshake`** – The `sid:heartbeat:close:transports` body returned by
//!   the handshake request, for both the client (parse) and server (render)
//!   side.

pub mod handshake;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `sio_core::Packet` instead of `sio_core::protocol::packet::Packet`.
pub use handshake::{HandshakeParseError, HandshakeResponse};
pub use protocol::codec::{encode_frame, encode_packet, DecodeError, Decoder, EncodeError};
pub use protocol::ids::PacketIdAllocator;
pub use protocol::packet::{ErrorAdvice, ErrorReason, Packet, PacketKind, Payload};
pub use protocol::PROTOCOL_VERSION;
