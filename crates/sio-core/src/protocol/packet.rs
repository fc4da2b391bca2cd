//! All Socket.IO packet types.
//!
//! A packet is the unit of exchange between client and server.  On the wire
//! it looks like `kind:id[+]:endpoint[:data]`; in memory it is a [`Packet`]
//! whose [`Payload`] is one of the nine kinds the protocol defines.

use serde::Serialize;
use serde_json::Value;

use crate::protocol::codec::EncodeError;

// ── Packet kind codes ─────────────────────────────────────────────────────────

/// Numeric kind codes as they appear in the first field of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketKind {
    Disconnect = 0,
    Connect = 1,
    Heartbeat = 2,
    Text = 3,
    Json = 4,
    Event = 5,
    Ack = 6,
    Error = 7,
    Noop = 8,
}

impl TryFrom<u8> for PacketKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0 => Ok(PacketKind::Disconnect),
            1 => Ok(PacketKind::Connect),
            2 => Ok(PacketKind::Heartbeat),
            3 => Ok(PacketKind::Text),
            4 => Ok(PacketKind::Json),
            5 => Ok(PacketKind::Event),
            6 => Ok(PacketKind::Ack),
            7 => Ok(PacketKind::Error),
            8 => Ok(PacketKind::Noop),
            _ => Err(()),
        }
    }
}

impl PacketKind {
    /// Lower-case name used in log output.
    pub fn name(self) -> &'static str {
        match self {
            PacketKind::Disconnect => "disconnect",
            PacketKind::Connect => "connect",
            PacketKind::Heartbeat => "heartbeat",
            PacketKind::Text => "message",
            PacketKind::Json => "json",
            PacketKind::Event => "event",
            PacketKind::Ack => "ack",
            PacketKind::Error => "error",
            PacketKind::Noop => "noop",
        }
    }
}

// ── Error packet tables ───────────────────────────────────────────────────────

/// Reason carried by an error packet.
///
/// Encoded on the wire as its index in the reference client's reason table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    TransportNotSupported,
    ClientNotHandshaken,
    Unauthorized,
}

impl ErrorReason {
    pub(crate) fn index(self) -> u8 {
        match self {
            ErrorReason::TransportNotSupported => 0,
            ErrorReason::ClientNotHandshaken => 1,
            ErrorReason::Unauthorized => 2,
        }
    }

    pub(crate) fn from_index(index: &str) -> Option<Self> {
        match index {
            "0" => Some(ErrorReason::TransportNotSupported),
            "1" => Some(ErrorReason::ClientNotHandshaken),
            "2" => Some(ErrorReason::Unauthorized),
            _ => None,
        }
    }
}

/// Advice carried by an error packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAdvice {
    Reconnect,
}

impl ErrorAdvice {
    pub(crate) fn index(self) -> u8 {
        match self {
            ErrorAdvice::Reconnect => 0,
        }
    }

    pub(crate) fn from_index(index: &str) -> Option<Self> {
        match index {
            "0" => Some(ErrorAdvice::Reconnect),
            _ => None,
        }
    }
}

// ── Payload ───────────────────────────────────────────────────────────────────

/// Kind-specific content of a packet.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Close the connection (or leave the endpoint).
    Disconnect,
    /// Session (or endpoint) established; `query` is the optional query string.
    Connect { query: String },
    /// Liveness probe; answered with another heartbeat.
    Heartbeat,
    /// Plain text message.
    Text(String),
    /// Arbitrary JSON message.
    Json(Value),
    /// Named event with positional arguments.
    Event { name: String, args: Vec<Value> },
    /// Acknowledgement of the packet whose id is `ack_id`.
    ///
    /// An empty `args` list is a *bare* ack (receipt only).
    Ack { ack_id: u64, args: Vec<Value> },
    /// Protocol-level error report.
    Error {
        reason: Option<ErrorReason>,
        advice: Option<ErrorAdvice>,
    },
    /// Placeholder packet used by polling transports to close a request.
    Noop,
}

impl Payload {
    /// Returns the wire kind of this payload.
    pub fn kind(&self) -> PacketKind {
        match self {
            Payload::Disconnect => PacketKind::Disconnect,
            Payload::Connect { .. } => PacketKind::Connect,
            Payload::Heartbeat => PacketKind::Heartbeat,
            Payload::Text(_) => PacketKind::Text,
            Payload::Json(_) => PacketKind::Json,
            Payload::Event { .. } => PacketKind::Event,
            Payload::Ack { .. } => PacketKind::Ack,
            Payload::Error { .. } => PacketKind::Error,
            Payload::Noop => PacketKind::Noop,
        }
    }
}

// ── Packet ────────────────────────────────────────────────────────────────────

/// One Socket.IO packet.
///
/// Packets are immutable once built.  The builder methods consume `self`, so a
/// packet handed to the codec or to a connection can no longer change.
///
/// # Invariant
///
/// A packet with `id == 0` never requests an acknowledgement:
///
/// ```rust
/// use sio_core::Packet;
///
/// let p = Packet::text("hi").with_id(0, true);
/// assert!(!p.requires_ack());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    id: u64,
    requires_ack: bool,
    endpoint: String,
    payload: Payload,
}

impl Packet {
    /// Creates a packet on the default endpoint with no id.
    pub fn new(payload: Payload) -> Self {
        Self {
            id: 0,
            requires_ack: false,
            endpoint: String::new(),
            payload,
        }
    }

    pub fn disconnect() -> Self {
        Self::new(Payload::Disconnect)
    }

    pub fn connect() -> Self {
        Self::new(Payload::Connect {
            query: String::new(),
        })
    }

    pub fn heartbeat() -> Self {
        Self::new(Payload::Heartbeat)
    }

    pub fn noop() -> Self {
        Self::new(Payload::Noop)
    }

    pub fn text(data: impl Into<String>) -> Self {
        Self::new(Payload::Text(data.into()))
    }

    pub fn json(value: Value) -> Self {
        Self::new(Payload::Json(value))
    }

    pub fn event(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::new(Payload::Event {
            name: name.into(),
            args,
        })
    }

    /// Acknowledges packet `ack_id`.  Pass an empty `args` for a bare ack.
    pub fn ack(ack_id: u64, args: Vec<Value>) -> Self {
        Self::new(Payload::Ack { ack_id, args })
    }

    pub fn error(reason: Option<ErrorReason>, advice: Option<ErrorAdvice>) -> Self {
        Self::new(Payload::Error { reason, advice })
    }

    /// Sets the correlation id.  `requires_ack` is ignored when `id` is 0.
    pub fn with_id(mut self, id: u64, requires_ack: bool) -> Self {
        self.id = id;
        self.requires_ack = id != 0 && requires_ack;
        self
    }

    /// Scopes the packet to `endpoint` (a namespace such as `/chat`).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn kind(&self) -> PacketKind {
        self.payload.kind()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// `true` when the sender expects an application-level reply rather than
    /// an automatic bare ack.
    pub fn requires_ack(&self) -> bool {
        self.requires_ack
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Short human-readable description used in diagnostics.
    ///
    /// Never includes payload data.
    pub fn summary(&self) -> String {
        let mut out = format!("{}(id={}", self.kind().name(), self.id);
        if self.requires_ack {
            out.push('+');
        }
        if !self.endpoint.is_empty() {
            out.push_str(", endpoint=");
            out.push_str(&self.endpoint);
        }
        match &self.payload {
            Payload::Event { name, args } => {
                out.push_str(&format!(", name={name}, args={}", args.len()));
            }
            Payload::Ack { ack_id, args } => {
                out.push_str(&format!(", ack_id={ack_id}, args={}", args.len()));
            }
            _ => {}
        }
        out.push(')');
        out
    }
}

// ── Argument conversion ───────────────────────────────────────────────────────

/// Converts a serializable sequence into event or ack arguments.
///
/// Tuples, arrays, slices and `Vec`s become one argument per element; `()`
/// becomes an empty list.
///
/// # Errors
///
/// Returns [`EncodeError::Json`] if `args` cannot be serialized and
/// [`EncodeError::ArgsNotSequence`] if it serializes to something other than
/// a JSON array.
///
/// # Examples
///
/// ```rust
/// use sio_core::protocol::packet::to_args;
///
/// let args = to_args(&("hello", 42)).unwrap();
/// assert_eq!(args, vec![serde_json::json!("hello"), serde_json::json!(42)]);
/// assert!(to_args(&()).unwrap().is_empty());
/// ```
pub fn to_args<A: Serialize + ?Sized>(args: &A) -> Result<Vec<Value>, EncodeError> {
    match serde_json::to_value(args).map_err(|e| EncodeError::Json(e.to_string()))? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(EncodeError::ArgsNotSequence(json_type_name(&other))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
