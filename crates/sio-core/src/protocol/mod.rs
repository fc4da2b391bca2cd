//! Protocol module containing the packet model and the text codec.

pub mod codec;
pub mod ids;
pub mod packet;

pub use codec::{encode_frame, encode_packet, DecodeError, Decoder, EncodeError};
pub use ids::PacketIdAllocator;
pub use packet::*;

/// Socket.IO protocol revision spoken by this crate.
///
/// Appears in the handshake URL (`/socket.io/1`) and in every transport
/// upgrade path (`/socket.io/1/websocket/<sid>`).
pub const PROTOCOL_VERSION: u8 = 1;

/// Delimiter used to frame several packets into one transport message.
pub const FRAME_DELIMITER: char = '\u{FFFD}';
