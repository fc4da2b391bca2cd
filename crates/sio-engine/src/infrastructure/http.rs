//! HTTP/1.1 handshake request.
//!
//! The handshake is a single `GET` on a fresh connection, so this uses
//! hyper's low-level `client::conn::http1` API directly: open a TCP stream,
//! run the HTTP/1.1 handshake, send one request, collect the body.

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::HOST;
use hyper::{Request, Uri};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tracing::debug;

use crate::application::error::HandshakeError;

/// Sends `GET url` and returns the response body.
///
/// # Errors
///
/// - [`HandshakeError::UnsupportedScheme`] unless `url` is `http://`.
/// - [`HandshakeError::InvalidUrl`] if `url` has no host.
/// - [`HandshakeError::Connect`] / [`HandshakeError::Http`] on network failure.
/// - [`HandshakeError::BadStatus`] for a non-2xx status.
/// - [`HandshakeError::InvalidHandshake`] if the body is not UTF-8.
pub async fn fetch_handshake(url: &Uri) -> Result<String, HandshakeError> {
    if !url
        .scheme_str()
        .is_some_and(|s| s.eq_ignore_ascii_case("http"))
    {
        return Err(HandshakeError::UnsupportedScheme(url.to_string()));
    }
    let host = url.host().ok_or_else(|| HandshakeError::InvalidUrl {
        url: url.to_string(),
        reason: "missing host".to_string(),
    })?;
    let port = url.port_u16().unwrap_or(80);
    let authority = url.authority().map_or(host, |a| a.as_str());
    let path = url.path_and_query().map_or("/", |p| p.as_str());

    let ip_host = host.trim_start_matches('[').trim_end_matches(']');
    let stream = TcpStream::connect((ip_host, port))
        .await
        .map_err(HandshakeError::Connect)?;

    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!("handshake connection ended with error: {e}");
        }
    });

    let request = Request::builder()
        .uri(path)
        .header(HOST, authority)
        .body(Empty::<Bytes>::new())
        .map_err(|e| HandshakeError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = sender.send_request(request).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(HandshakeError::BadStatus(status.to_string()));
    }

    let body = response.into_body().collect().await?.to_bytes();
    debug!("handshake {url}: {status}, {} bytes", body.len());
    String::from_utf8(body.to_vec())
        .map_err(|e| HandshakeError::InvalidHandshake(String::from_utf8_lossy(e.as_bytes()).into_owned()))
}
