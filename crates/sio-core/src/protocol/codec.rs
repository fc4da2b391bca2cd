//! Text codec for encoding and decoding Socket.IO packets.
//!
//! Packet grammar:
//! ```text
//! kind ":" [id ["+"]] ":" endpoint [":" data]
//! ```
//! `kind` is a single decimal code (see [`PacketKind`]), `id` is an optional
//! decimal correlation id and a trailing `+` on it asks for a data ack.
//!
//! Several packets can share one transport message.  Each is then prefixed
//! with its length in UTF-16 code units between two U+FFFD characters:
//! ```text
//! \u{FFFD}3\u{FFFD}2::\u{FFFD}7\u{FFFD}3:::hey
//! ```
//! A message without the leading delimiter is exactly one packet.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::protocol::packet::{ErrorAdvice, ErrorReason, Packet, PacketKind, Payload};
use crate::protocol::FRAME_DELIMITER;

/// Errors that can occur while decoding wire text.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// The packet header or data could not be interpreted.
    #[error("malformed packet: {0}")]
    Malformed(String),

    /// The multi-packet length prefix is not a valid length.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// The JSON body of a JSON, event or ack packet is invalid.
    #[error("invalid JSON in {kind} packet: {reason}")]
    InvalidJson { kind: &'static str, reason: String },

    /// A well-formed packet carries a kind code outside the known range.
    ///
    /// The packet has already been consumed from the decoder buffer, so the
    /// stream is still in sync.
    #[error("unknown packet kind: {0}")]
    UnknownKind(u32),
}

impl DecodeError {
    /// Returns `true` when the decoder is still in sync after this error and
    /// the next call to [`Decoder::decode`] can proceed without a reset.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DecodeError::UnknownKind(_))
    }
}

/// Errors that can occur while encoding packets.
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    /// [`encode_frame`] was called with no packets.
    #[error("cannot encode an empty frame")]
    EmptyFrame,

    /// The endpoint would break the `:`-separated header.
    #[error("endpoint must not contain ':' (got {0:?})")]
    InvalidEndpoint(String),

    /// Event or ack arguments did not serialize to a JSON array.
    #[error("arguments must serialize to a JSON array, got {0}")]
    ArgsNotSequence(&'static str),

    /// A payload value could not be serialized to JSON.
    #[error("JSON serialization failed: {0}")]
    Json(String),
}

// ── Event body (JSON) ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct EventBodyRef<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "no_args")]
    args: &'a [Value],
}

fn no_args(args: &&[Value]) -> bool {
    args.is_empty()
}

#[derive(Deserialize)]
struct EventBody {
    name: String,
    #[serde(default)]
    args: Vec<Value>,
}

// ── Public API: encoding ──────────────────────────────────────────────────────

/// Encodes one packet into its wire text.
///
/// # Errors
///
/// Returns [`EncodeError`] if the endpoint contains `:` or the payload cannot
/// be serialized.
///
/// # Examples
///
/// ```rust
/// use sio_core::{encode_packet, Packet};
///
/// assert_eq!(encode_packet(&Packet::heartbeat()).unwrap(), "2::");
/// let ack = Packet::ack(5, vec![]);
/// assert_eq!(encode_packet(&ack).unwrap(), "6:::5");
/// ```
pub fn encode_packet(packet: &Packet) -> Result<String, EncodeError> {
    if packet.endpoint().contains(':') {
        return Err(EncodeError::InvalidEndpoint(packet.endpoint().to_string()));
    }

    let data = encode_data(packet.payload())?;

    let mut out = String::with_capacity(8 + data.as_ref().map_or(0, String::len));
    out.push(char::from(b'0' + packet.kind() as u8));
    out.push(':');
    if packet.id() != 0 {
        out.push_str(&packet.id().to_string());
        if packet.requires_ack() {
            out.push('+');
        }
    }
    out.push(':');
    out.push_str(packet.endpoint());
    if let Some(data) = data {
        out.push(':');
        out.push_str(&data);
    }
    Ok(out)
}

/// Appends the wire text of `packets` to `out` as one transport message.
///
/// A single packet is written as-is; two or more are length-prefixed.  On
/// error nothing is written.
///
/// # Errors
///
/// Returns [`EncodeError::EmptyFrame`] for an empty slice, or the first error
/// from [`encode_packet`].
pub fn encode_frame(packets: &[Packet], out: &mut String) -> Result<(), EncodeError> {
    match packets {
        [] => Err(EncodeError::EmptyFrame),
        [single] => {
            out.push_str(&encode_packet(single)?);
            Ok(())
        }
        many => {
            let encoded = many
                .iter()
                .map(encode_packet)
                .collect::<Result<Vec<_>, _>>()?;
            for text in encoded {
                out.push(FRAME_DELIMITER);
                out.push_str(&text.encode_utf16().count().to_string());
                out.push(FRAME_DELIMITER);
                out.push_str(&text);
            }
            Ok(())
        }
    }
}

fn encode_data(payload: &Payload) -> Result<Option<String>, EncodeError> {
    let data = match payload {
        Payload::Disconnect | Payload::Heartbeat | Payload::Noop => None,
        Payload::Connect { query } => non_empty(query),
        Payload::Text(text) => non_empty(text),
        Payload::Json(value) => Some(to_json(value)?),
        Payload::Event { name, args } => Some(to_json(&EventBodyRef { name, args })?),
        Payload::Ack { ack_id, args } => {
            if args.is_empty() {
                Some(ack_id.to_string())
            } else {
                Some(format!("{ack_id}+{}", to_json(args)?))
            }
        }
        Payload::Error { reason, advice } => match (reason, advice) {
            (None, None) => None,
            (reason, advice) => {
                let mut data = reason.map(|r| r.index().to_string()).unwrap_or_default();
                if let Some(advice) = advice {
                    data.push('+');
                    data.push_str(&advice.index().to_string());
                }
                Some(data)
            }
        },
    };
    Ok(data)
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, EncodeError> {
    serde_json::to_string(value).map_err(|e| EncodeError::Json(e.to_string()))
}

// ── Public API: decoding ──────────────────────────────────────────────────────

/// Buffered decoder that hands out packets one at a time.
///
/// Transport messages are appended with [`write`](Decoder::write); each call
/// to [`decode`](Decoder::decode) then consumes at most one packet from the
/// front of the buffer.
///
/// # Three-way result
///
/// | Return            | Meaning                                        |
/// |-------------------|------------------------------------------------|
/// | `Ok(Some(p))`     | a packet is ready                              |
/// | `Ok(None)`        | the buffer holds no complete packet            |
/// | `Err(e)`          | malformed input; call [`reset`](Decoder::reset) unless `e.is_recoverable()` |
///
/// # Examples
///
/// ```rust
/// use sio_core::{Decoder, PacketKind};
///
/// let mut decoder = Decoder::new();
/// assert_eq!(decoder.decode().unwrap(), None);
///
/// decoder.write("\u{FFFD}3\u{FFFD}2::\u{FFFD}3\u{FFFD}8::");
/// assert_eq!(decoder.decode().unwrap().unwrap().kind(), PacketKind::Heartbeat);
/// assert_eq!(decoder.decode().unwrap().unwrap().kind(), PacketKind::Noop);
/// assert_eq!(decoder.decode().unwrap(), None);
/// ```
#[derive(Debug, Default)]
pub struct Decoder {
    buf: String,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends freshly received transport text.  Does not decode.
    pub fn write(&mut self, data: &str) {
        self.buf.push_str(data);
    }

    /// Discards everything buffered so the next message starts clean.
    pub fn reset(&mut self) {
        if !self.buf.is_empty() {
            debug!("decoder: discarding {} buffered bytes", self.buf.len());
        }
        self.buf.clear();
    }

    /// Number of buffered bytes not yet decoded.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Consumes and returns the next packet in the buffer, if complete.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the front of the buffer is not a valid
    /// packet.  See the type-level docs for recovery.
    pub fn decode(&mut self) -> Result<Option<Packet>, DecodeError> {
        if self.buf.is_empty() {
            return Ok(None);
        }

        if !self.buf.starts_with(FRAME_DELIMITER) {
            // Unframed message: the whole buffer is one packet.
            let raw = std::mem::take(&mut self.buf);
            return decode_packet(&raw).map(Some);
        }

        let Some((start, end)) = locate_framed_packet(&self.buf)? else {
            return Ok(None);
        };
        let raw = self.buf[start..end].to_string();
        self.buf.drain(..end);
        decode_packet(&raw).map(Some)
    }
}

/// Finds the byte range of the first length-prefixed packet in `buf`.
///
/// `buf` must start with [`FRAME_DELIMITER`].  Returns `Ok(None)` while the
/// prefix or the body is still incomplete.
fn locate_framed_packet(buf: &str) -> Result<Option<(usize, usize)>, DecodeError> {
    let delimiter_len = FRAME_DELIMITER.len_utf8();
    let after_open = &buf[delimiter_len..];

    let Some(digits_len) = after_open.find(FRAME_DELIMITER) else {
        if after_open.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(None);
        }
        return Err(DecodeError::MalformedFrame(format!(
            "length prefix is not numeric: {:?}",
            preview(after_open)
        )));
    };

    let digits = &after_open[..digits_len];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::MalformedFrame(format!(
            "length prefix is not numeric: {:?}",
            preview(digits)
        )));
    }
    let declared: usize = digits
        .parse()
        .map_err(|_| DecodeError::MalformedFrame(format!("length prefix too large: {digits}")))?;

    let body_start = delimiter_len + digits_len + delimiter_len;
    let mut units = 0usize;
    let mut body_end = body_start;
    for ch in buf[body_start..].chars() {
        if units >= declared {
            break;
        }
        units += ch.len_utf16();
        body_end += ch.len_utf8();
    }

    match units.cmp(&declared) {
        std::cmp::Ordering::Less => Ok(None),
        std::cmp::Ordering::Equal => Ok(Some((body_start, body_end))),
        std::cmp::Ordering::Greater => Err(DecodeError::MalformedFrame(format!(
            "declared length {declared} splits a character"
        ))),
    }
}

/// Decodes one complete packet.
fn decode_packet(raw: &str) -> Result<Packet, DecodeError> {
    let mut fields = raw.splitn(4, ':');
    let kind_field = fields.next().unwrap_or_default();
    let (Some(id_field), Some(endpoint)) = (fields.next(), fields.next()) else {
        return Err(DecodeError::Malformed(format!(
            "missing header fields in {:?}",
            preview(raw)
        )));
    };
    let data = fields.next();

    if kind_field.is_empty() || !kind_field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::Malformed(format!(
            "invalid packet kind {:?}",
            preview(kind_field)
        )));
    }
    let code: u32 = kind_field
        .parse()
        .map_err(|_| DecodeError::Malformed(format!("packet kind out of range: {kind_field}")))?;
    let kind = u8::try_from(code)
        .ok()
        .and_then(|c| PacketKind::try_from(c).ok())
        .ok_or(DecodeError::UnknownKind(code))?;

    let (id_digits, ack_requested) = match id_field.strip_suffix('+') {
        Some(digits) => (digits, true),
        None => (id_field, false),
    };
    let id = parse_optional_u64(id_digits)
        .ok_or_else(|| DecodeError::Malformed(format!("invalid packet id {id_field:?}")))?;

    let payload = decode_data(kind, data)?;
    Ok(Packet::new(payload)
        .with_id(id, ack_requested)
        .with_endpoint(endpoint))
}

fn decode_data(kind: PacketKind, data: Option<&str>) -> Result<Payload, DecodeError> {
    let data = data.unwrap_or("");
    let payload = match kind {
        PacketKind::Disconnect => Payload::Disconnect,
        PacketKind::Connect => Payload::Connect {
            query: data.to_string(),
        },
        PacketKind::Heartbeat => Payload::Heartbeat,
        PacketKind::Noop => Payload::Noop,
        PacketKind::Text => Payload::Text(data.to_string()),
        PacketKind::Json => Payload::Json(from_json(kind, data)?),
        PacketKind::Event => {
            let body: EventBody = from_json(kind, data)?;
            Payload::Event {
                name: body.name,
                args: body.args,
            }
        }
        PacketKind::Ack => decode_ack(data)?,
        PacketKind::Error => {
            let (reason, advice) = match data.split_once('+') {
                Some((reason, advice)) => (reason, advice),
                None => (data, ""),
            };
            Payload::Error {
                reason: ErrorReason::from_index(reason),
                advice: ErrorAdvice::from_index(advice),
            }
        }
    };
    Ok(payload)
}

fn decode_ack(data: &str) -> Result<Payload, DecodeError> {
    let digits_len = data
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(data.len());
    let ack_id: u64 = data[..digits_len]
        .parse()
        .map_err(|_| DecodeError::Malformed(format!("invalid ack id in {:?}", preview(data))))?;

    let rest = &data[digits_len..];
    let args = match rest.strip_prefix('+') {
        None if rest.is_empty() => Vec::new(),
        None => {
            return Err(DecodeError::Malformed(format!(
                "unexpected data after ack id: {:?}",
                preview(rest)
            )))
        }
        Some("") => Vec::new(),
        Some(json) => from_json(PacketKind::Ack, json)?,
    };
    Ok(Payload::Ack { ack_id, args })
}

fn from_json<T: for<'de> Deserialize<'de>>(kind: PacketKind, data: &str) -> Result<T, DecodeError> {
    serde_json::from_str(data).map_err(|e| DecodeError::InvalidJson {
        kind: kind.name(),
        reason: e.to_string(),
    })
}

fn parse_optional_u64(digits: &str) -> Option<u64> {
    if digits.is_empty() {
        return Some(0);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// First few characters of `s`, for error messages.
fn preview(s: &str) -> String {
    s.chars().take(32).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_one(text: &str) -> Result<Option<Packet>, DecodeError> {
        let mut decoder = Decoder::new();
        decoder.write(text);
        decoder.decode()
    }

    fn round_trip(packet: &Packet) -> Packet {
        let encoded = encode_packet(packet).expect("encode failed");
        decode_one(&encoded)
            .expect("decode failed")
            .expect("packet should be complete")
    }

    // ── Exact wire text ───────────────────────────────────────────────────────

    #[test]
    fn test_encode_heartbeat() {
        assert_eq!(encode_packet(&Packet::heartbeat()).unwrap(), "2::");
    }

    #[test]
    fn test_encode_disconnect_with_endpoint() {
        let p = Packet::disconnect().with_endpoint("/chat");
        assert_eq!(encode_packet(&p).unwrap(), "0::/chat");
    }

    #[test]
    fn test_encode_text_with_id() {
        let p = Packet::text("hello").with_id(1, false);
        assert_eq!(encode_packet(&p).unwrap(), "3:1::hello");
    }

    #[test]
    fn test_encode_event_with_data_ack() {
        let p = Packet::event("news", vec![json!("a"), json!(1)]).with_id(4, true);
        assert_eq!(
            encode_packet(&p).unwrap(),
            r#"5:4+::{"name":"news","args":["a",1]}"#
        );
    }

    #[test]
    fn test_encode_event_without_args_omits_args_key() {
        let p = Packet::event("ping", vec![]);
        assert_eq!(encode_packet(&p).unwrap(), r#"5:::{"name":"ping"}"#);
    }

    #[test]
    fn test_encode_ack_with_args() {
        let p = Packet::ack(12, vec![json!("ok")]);
        assert_eq!(encode_packet(&p).unwrap(), r#"6:::12+["ok"]"#);
    }

    #[test]
    fn test_encode_error_reason_and_advice() {
        let p = Packet::error(Some(ErrorReason::Unauthorized), Some(ErrorAdvice::Reconnect));
        assert_eq!(encode_packet(&p).unwrap(), "7:::2+0");
    }

    #[test]
    fn test_encode_connect_with_query() {
        let p = Packet::new(Payload::Connect {
            query: "?token=abc".to_string(),
        })
        .with_endpoint("/chat");
        assert_eq!(encode_packet(&p).unwrap(), "1::/chat:?token=abc");
    }

    #[test]
    fn test_encode_rejects_endpoint_with_colon() {
        let p = Packet::noop().with_endpoint("a:b");
        assert!(matches!(
            encode_packet(&p),
            Err(EncodeError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_decode_text_keeps_colons_in_data() {
        let p = decode_one("3:::a:b:c").unwrap().unwrap();
        assert_eq!(p.payload(), &Payload::Text("a:b:c".to_string()));
    }

    #[test]
    fn test_decode_plus_without_id_does_not_request_ack() {
        let p = decode_one("3:+::x").unwrap().unwrap();
        assert_eq!(p.id(), 0);
        assert!(!p.requires_ack());
    }

    #[test]
    fn test_decode_event_without_args_field() {
        let p = decode_one(r#"5:::{"name":"tick"}"#).unwrap().unwrap();
        assert_eq!(
            p.payload(),
            &Payload::Event {
                name: "tick".to_string(),
                args: vec![]
            }
        );
    }

    #[test]
    fn test_decode_error_with_unknown_indices() {
        let p = decode_one("7:::9+9").unwrap().unwrap();
        assert_eq!(
            p.payload(),
            &Payload::Error {
                reason: None,
                advice: None
            }
        );
    }

    // ── Round trips (every kind, including empty payloads) ────────────────────

    #[test]
    fn test_round_trip_every_kind() {
        let packets = vec![
            Packet::disconnect(),
            Packet::connect(),
            Packet::heartbeat(),
            Packet::text(""),
            Packet::text("with:colon").with_id(9, false),
            Packet::json(json!({"a": [1, 2, {"b": null}]})).with_endpoint("/ns"),
            Packet::json(json!(null)),
            Packet::event("multi", vec![json!(1), json!("two"), json!({"three": 3})]).with_id(2, true),
            Packet::event("bare", vec![]),
            Packet::ack(3, vec![]),
            Packet::ack(3, vec![json!([1]), json!(false)]),
            Packet::error(None, None),
            Packet::error(Some(ErrorReason::ClientNotHandshaken), None),
            Packet::error(None, Some(ErrorAdvice::Reconnect)),
            Packet::noop(),
        ];
        for packet in packets {
            assert_eq!(round_trip(&packet), packet, "round trip of {}", packet.summary());
        }
    }

    // ── Framing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_encode_frame_single_packet_is_unframed() {
        let mut out = String::new();
        encode_frame(&[Packet::heartbeat()], &mut out).unwrap();
        assert_eq!(out, "2::");
    }

    #[test]
    fn test_encode_frame_multiple_packets_uses_length_prefix() {
        let mut out = String::new();
        encode_frame(&[Packet::heartbeat(), Packet::text("hey")], &mut out).unwrap();
        assert_eq!(out, "\u{FFFD}3\u{FFFD}2::\u{FFFD}7\u{FFFD}3:::hey");
    }

    #[test]
    fn test_encode_frame_length_counts_utf16_units() {
        // "😀" is one char but two UTF-16 code units.
        let mut out = String::new();
        encode_frame(&[Packet::text("😀"), Packet::noop()], &mut out).unwrap();
        assert!(out.starts_with("\u{FFFD}6\u{FFFD}3:::😀"));

        let mut decoder = Decoder::new();
        decoder.write(&out);
        assert_eq!(decoder.decode().unwrap().unwrap(), Packet::text("😀"));
        assert_eq!(decoder.decode().unwrap().unwrap(), Packet::noop());
    }

    #[test]
    fn test_encode_frame_empty_is_error() {
        let mut out = String::new();
        assert_eq!(encode_frame(&[], &mut out), Err(EncodeError::EmptyFrame));
    }

    #[test]
    fn test_encode_frame_failure_writes_nothing() {
        let mut out = String::from("keep");
        let result = encode_frame(
            &[Packet::heartbeat(), Packet::noop().with_endpoint("bad:endpoint")],
            &mut out,
        );
        assert!(result.is_err());
        assert_eq!(out, "keep");
    }

    #[test]
    fn test_multi_packet_frame_preserves_order() {
        let packets = vec![
            Packet::event("first", vec![json!(1)]).with_id(1, false),
            Packet::heartbeat(),
            Packet::text("third"),
            Packet::ack(1, vec![]),
        ];
        let mut out = String::new();
        encode_frame(&packets, &mut out).unwrap();

        let mut decoder = Decoder::new();
        decoder.write(&out);
        let mut decoded = Vec::new();
        while let Some(p) = decoder.decode().unwrap() {
            decoded.push(p);
        }
        assert_eq!(decoded, packets);
    }

    // ── Partial input ─────────────────────────────────────────────────────────

    #[test]
    fn test_decode_empty_buffer_needs_more() {
        assert_eq!(Decoder::new().decode(), Ok(None));
    }

    #[test]
    fn test_decode_partial_length_prefix_needs_more() {
        assert_eq!(decode_one("\u{FFFD}1"), Ok(None));
    }

    #[test]
    fn test_decode_partial_body_needs_more_then_completes() {
        // Arrange
        let mut decoder = Decoder::new();
        decoder.write("\u{FFFD}7\u{FFFD}3::");

        // Act / Assert: body incomplete
        assert_eq!(decoder.decode(), Ok(None));

        // Act: remainder arrives in the next transport message
        decoder.write(":hey");

        // Assert
        assert_eq!(decoder.decode().unwrap().unwrap(), Packet::text("hey"));
        assert_eq!(decoder.buffered(), 0);
    }

    // ── Malformed input ───────────────────────────────────────────────────────

    #[test]
    fn test_decode_missing_header_fields_is_malformed() {
        assert!(matches!(decode_one("3"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode_one("3:1"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_non_numeric_kind_is_malformed() {
        assert!(matches!(decode_one("x::"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_non_numeric_id_is_malformed() {
        assert!(matches!(decode_one("3:abc::"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_invalid_event_json() {
        let result = decode_one("5:::{not json");
        assert!(matches!(
            result,
            Err(DecodeError::InvalidJson { kind: "event", .. })
        ));
    }

    #[test]
    fn test_decode_ack_without_id_is_malformed() {
        assert!(matches!(decode_one("6:::+[1]"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_bad_length_prefix_is_malformed() {
        let result = decode_one("\u{FFFD}x\u{FFFD}2::");
        assert!(matches!(result, Err(DecodeError::MalformedFrame(_))));
    }

    #[test]
    fn test_decode_unknown_kind_is_recoverable_and_consumed() {
        // Arrange: an unknown kind followed by a heartbeat in one frame
        let mut decoder = Decoder::new();
        decoder.write("\u{FFFD}3\u{FFFD}9::\u{FFFD}3\u{FFFD}2::");

        // Act
        let first = decoder.decode();
        let second = decoder.decode();

        // Assert
        let err = first.unwrap_err();
        assert_eq!(err, DecodeError::UnknownKind(9));
        assert!(err.is_recoverable());
        assert_eq!(second.unwrap().unwrap(), Packet::heartbeat());
    }

    #[test]
    fn test_reset_allows_resync_on_next_message() {
        // Arrange
        let mut decoder = Decoder::new();
        decoder.write("\u{FFFD}zz");
        assert!(decoder.decode().is_err());

        // Act
        decoder.reset();
        decoder.write("2::");

        // Assert
        assert_eq!(decoder.decode().unwrap().unwrap(), Packet::heartbeat());
    }
}
