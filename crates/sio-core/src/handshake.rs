//! Handshake response body and transport upgrade paths.
//!
//! The handshake is a plain `GET /socket.io/1` whose response body has four
//! colon-separated fields:
//!
//! ```text
//! 4d4f185e96a7b:15:10:websocket,xhr-polling
//! └─ session id └─ heartbeat timeout (s) └─ close timeout (s) └─ transports
//! ```
//!
//! A timeout that is empty or not a whole number of seconds means "none".

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::protocol::PROTOCOL_VERSION;

#[derive(Debug, Error, PartialEq)]
pub enum HandshakeParseError {
    #[error("invalid handshake response: {0:?}")]
    Invalid(String),
}

/// Parsed handshake response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResponse {
    pub session_id: String,
    pub heartbeat_timeout: Option<Duration>,
    pub close_timeout: Option<Duration>,
    pub transports: Vec<String>,
}

impl HandshakeResponse {
    /// Parses a handshake body.
    ///
    /// # Errors
    ///
    /// Returns [`HandshakeParseError::Invalid`] when the body has fewer than
    /// four fields or the session id is empty.  The session id becomes part
    /// of the upgrade path, so an empty one cannot be used.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sio_core::HandshakeResponse;
    ///
    /// let hs = HandshakeResponse::parse("abc:15:10:websocket,flashsocket").unwrap();
    /// assert_eq!(hs.session_id, "abc");
    /// assert!(hs.supports("websocket"));
    /// ```
    pub fn parse(body: &str) -> Result<Self, HandshakeParseError> {
        let invalid = || HandshakeParseError::Invalid(body.to_string());

        let fields: Vec<&str> = body.trim_end().splitn(4, ':').collect();
        let [session_id, heartbeat, close, transports] = fields[..] else {
            return Err(invalid());
        };
        if session_id.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            session_id: session_id.to_string(),
            heartbeat_timeout: parse_seconds(heartbeat),
            close_timeout: parse_seconds(close),
            transports: transports
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    /// Creates a response with a fresh random session id.
    pub fn generate(
        heartbeat_timeout: Option<Duration>,
        close_timeout: Option<Duration>,
        transports: Vec<String>,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4().simple().to_string(),
            heartbeat_timeout,
            close_timeout,
            transports,
        }
    }

    /// `true` if the server listed `transport` (exact match).
    pub fn supports(&self, transport: &str) -> bool {
        self.transports.iter().any(|t| t == transport)
    }
}

/// Renders the response body, the inverse of [`HandshakeResponse::parse`].
impl fmt::Display for HandshakeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = |d: Option<Duration>| d.map(|d| d.as_secs().to_string()).unwrap_or_default();
        write!(
            f,
            "{}:{}:{}:{}",
            self.session_id,
            secs(self.heartbeat_timeout),
            secs(self.close_timeout),
            self.transports.join(",")
        )
    }
}

fn parse_seconds(field: &str) -> Option<Duration> {
    field.parse::<u64>().ok().map(Duration::from_secs)
}

/// Splits a transport upgrade path into `(version, transport, session id)`.
///
/// Accepts any prefix, so both `/socket.io/1/websocket/abc` and
/// `/1/websocket/abc` parse.  Returns `None` unless the version is
/// [`PROTOCOL_VERSION`].
///
/// ```rust
/// use sio_core::handshake::parse_transport_path;
///
/// let (v, t, sid) = parse_transport_path("/socket.io/1/websocket/abc").unwrap();
/// assert_eq!((v, t.as_str(), sid.as_str()), (1, "websocket", "abc"));
/// ```
pub fn parse_transport_path(path: &str) -> Option<(u8, String, String)> {
    let path = path.split('?').next().unwrap_or(path);
    let mut parts = path.trim_end_matches('/').rsplit('/');
    let sid = parts.next().filter(|s| !s.is_empty())?;
    let transport = parts.next().filter(|s| !s.is_empty())?;
    let version: u8 = parts.next()?.parse().ok()?;
    if version != PROTOCOL_VERSION {
        return None;
    }
    Some((version, transport.to_string(), sid.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_body() {
        let hs = HandshakeResponse::parse("sid123:15:25:websocket,xhr-polling").unwrap();
        assert_eq!(hs.session_id, "sid123");
        assert_eq!(hs.heartbeat_timeout, Some(Duration::from_secs(15)));
        assert_eq!(hs.close_timeout, Some(Duration::from_secs(25)));
        assert_eq!(hs.transports, vec!["websocket", "xhr-polling"]);
    }

    #[test]
    fn test_parse_empty_timeouts_are_none() {
        let hs = HandshakeResponse::parse("sid::websocket").unwrap_err();
        assert!(matches!(hs, HandshakeParseError::Invalid(_)));

        let hs = HandshakeResponse::parse("sid:::websocket").unwrap();
        assert_eq!(hs.heartbeat_timeout, None);
        assert_eq!(hs.close_timeout, None);
    }

    #[test]
    fn test_parse_rejects_short_body() {
        assert!(HandshakeResponse::parse("sid:15:10").is_err());
        assert!(HandshakeResponse::parse("").is_err());
    }

    #[test]
    fn test_parse_non_numeric_timeout_is_none() {
        // Arrange / Act
        let hs = HandshakeResponse::parse("sid:soon:10:websocket").unwrap();

        // Assert
        assert_eq!(hs.heartbeat_timeout, None);
        assert_eq!(hs.close_timeout, Some(Duration::from_secs(10)));
        assert!(hs.supports("websocket"));
    }

    #[test]
    fn test_parse_rejects_empty_session_id() {
        assert!(HandshakeResponse::parse(":15:10:websocket").is_err());
    }

    #[test]
    fn test_supports_is_exact_match() {
        let hs = HandshakeResponse::parse("sid:1:1:flashsocket, websocket").unwrap();
        assert!(hs.supports("websocket"));
        assert!(!hs.supports("socket"));
        assert!(!hs.supports("xhr-polling"));
    }

    #[test]
    fn test_display_is_inverse_of_parse() {
        let hs = HandshakeResponse::generate(
            Some(Duration::from_secs(60)),
            None,
            vec!["websocket".to_string()],
        );
        let body = hs.to_string();
        assert!(body.ends_with(":60::websocket"));
        assert_eq!(HandshakeResponse::parse(&body).unwrap(), hs);
    }

    #[test]
    fn test_generate_uses_distinct_session_ids() {
        let a = HandshakeResponse::generate(None, None, vec![]);
        let b = HandshakeResponse::generate(None, None, vec![]);
        assert_ne!(a.session_id, b.session_id);
        assert!(!a.session_id.contains(':'));
    }

    #[test]
    fn test_parse_transport_path() {
        assert_eq!(
            parse_transport_path("/socket.io/1/websocket/abc?t=1"),
            Some((1, "websocket".to_string(), "abc".to_string()))
        );
        assert_eq!(parse_transport_path("/socket.io/2/websocket/abc"), None);
        assert_eq!(parse_transport_path("/websocket/abc"), None);
        assert_eq!(parse_transport_path("/socket.io/1/websocket/"), None);
    }
}
