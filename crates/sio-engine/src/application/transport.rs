//! Transport descriptors and the process-wide transport registry.
//!
//! A [`Transport`] knows how to turn an accepted inbound TCP connection into
//! a [`Socket`].  Transports are stateless; every session state lives in the
//! socket they produce.
//!
//! The set of transports is fixed at process start.  Call
//! [`TransportRegistry::install`] once before serving, or rely on
//! [`TransportRegistry::global`], which falls back to the default set (the
//! WebSocket transport).

use std::future::Future;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;

use crate::application::socket::{Socket, TransportError};

static GLOBAL: OnceLock<TransportRegistry> = OnceLock::new();

/// How a transport delivers server-to-client messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// One request per batch of messages (XHR / JSONP polling).
    Polling,
    /// One long-lived bidirectional channel (WebSocket).
    Streaming,
}

/// The result of a successful upgrade.
pub struct Upgraded {
    pub socket: Box<dyn Socket>,
    /// Request path of the upgrade, e.g. `/socket.io/1/websocket/<sid>`.
    pub path: String,
}

impl std::fmt::Debug for Upgraded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upgraded").field("path", &self.path).finish_non_exhaustive()
    }
}

/// A named way of carrying Socket.IO packets.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Name used in the handshake transport list and the upgrade path.
    fn name(&self) -> &'static str;

    fn kind(&self) -> TransportKind;

    /// `true` when outbound data must be form-encoded (JSONP polling).
    fn post_encoded(&self) -> bool {
        false
    }

    /// Performs the transport handshake on `stream`.
    async fn upgrade(&self, stream: TcpStream) -> Result<Upgraded, TransportError>;
}

/// Ordered, immutable set of transports.
#[derive(Clone)]
pub struct TransportRegistry {
    transports: Vec<Arc<dyn Transport>>,
}

impl TransportRegistry {
    /// Builds a registry.  When two transports share a name the first wins.
    pub fn new(transports: Vec<Arc<dyn Transport>>) -> Self {
        let mut unique: Vec<Arc<dyn Transport>> = Vec::with_capacity(transports.len());
        for t in transports {
            if unique.iter().any(|u| u.name() == t.name()) {
                debug!("transport registry: ignoring duplicate {:?}", t.name());
                continue;
            }
            unique.push(t);
        }
        Self { transports: unique }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Transport>> {
        self.transports.iter().find(|t| t.name() == name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.transports.iter().map(|t| t.name()).collect()
    }

    /// The registered transports named in `names`, in the order given there.
    /// Unknown names are skipped.
    pub fn enabled(&self, names: &[String]) -> Vec<Arc<dyn Transport>> {
        names
            .iter()
            .filter_map(|n| self.get(n).cloned())
            .collect()
    }

    /// Upgrades `stream` with the transport called `name` and runs `proceed`
    /// with the resulting socket.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unsupported`] for an unknown name, or the
    /// transport's upgrade error.  `proceed` is not called on error.
    pub async fn hijack<F, Fut, T>(
        &self,
        name: &str,
        stream: TcpStream,
        proceed: F,
    ) -> Result<T, TransportError>
    where
        F: FnOnce(Upgraded) -> Fut,
        Fut: Future<Output = T>,
    {
        let transport = self
            .get(name)
            .ok_or_else(|| TransportError::Unsupported(name.to_string()))?;
        let upgraded = transport.upgrade(stream).await?;
        debug!("{} upgrade complete for {}", name, upgraded.path);
        Ok(proceed(upgraded).await)
    }

    /// Installs the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns the registry back if one was already installed (including the
    /// default installed by an earlier call to [`global`](Self::global)).
    pub fn install(registry: TransportRegistry) -> Result<(), TransportRegistry> {
        GLOBAL.set(registry)
    }

    /// The process-wide registry; the default set if none was installed.
    pub fn global() -> &'static TransportRegistry {
        GLOBAL.get_or_init(TransportRegistry::default)
    }
}

impl std::fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
