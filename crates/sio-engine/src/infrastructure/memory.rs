//! In-process socket pair.
//!
//! [`MemorySocket::pair`] returns two connected sockets: whatever one sends
//! the other receives, in order.  It runs a [`Connection`] without any
//! network, in tests or when both peers live in the same process.
//!
//! [`Connection`]: crate::application::Connection

use async_trait::async_trait;
use tokio::sync::{mpsc, watch, Mutex};

use crate::application::socket::{Socket, TransportError};

/// One end of an in-memory duplex channel.
#[derive(Debug)]
pub struct MemorySocket {
    tx: Mutex<Option<mpsc::UnboundedSender<String>>>,
    rx: Mutex<mpsc::UnboundedReceiver<String>>,
    closed: watch::Sender<bool>,
}

impl MemorySocket {
    pub fn pair() -> (MemorySocket, MemorySocket) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (Self::new(a_tx, a_rx), Self::new(b_tx, b_rx))
    }

    fn new(tx: mpsc::UnboundedSender<String>, rx: mpsc::UnboundedReceiver<String>) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            tx: Mutex::new(Some(tx)),
            rx: Mutex::new(rx),
            closed,
        }
    }

    fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

#[async_trait]
impl Socket for MemorySocket {
    async fn receive(&self) -> Result<String, TransportError> {
        let mut closed = self.closed.subscribe();
        if *closed.borrow_and_update() {
            return Err(TransportError::Closed);
        }
        let mut rx = self.rx.lock().await;
        tokio::select! {
            biased;
            message = rx.recv() => message.ok_or(TransportError::Closed),
            _ = closed.changed() => Err(TransportError::Closed),
        }
    }

    async fn send(&self, message: &str) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let tx = self.tx.lock().await;
        match tx.as_ref() {
            Some(tx) => tx
                .send(message.to_string())
                .map_err(|_| TransportError::Closed),
            None => Err(TransportError::Closed),
        }
    }

    /// Closes this end.  The peer's `receive` fails with
    /// [`TransportError::Closed`] once it has drained what was sent.
    async fn close(&self) -> Result<(), TransportError> {
        self.closed.send_replace(true);
        self.tx.lock().await.take();
        Ok(())
    }
}
