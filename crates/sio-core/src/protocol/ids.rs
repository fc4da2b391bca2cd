//! Thread-safe allocator for packet correlation ids.
//!
//! # What is a packet id? (for beginners)
//!
//! A packet that expects an answer carries a numeric id.  The peer quotes the
//! same number in its ack packet, which lets the sender match replies to
//! requests even when several are in flight.  Id `0` means "no id", so the
//! allocator never hands it out.
//!
//! # Thread safety
//!
//! Many tasks may emit on the same connection at once.  The allocator is an
//! `AtomicU64`, so concurrent callers always receive distinct ids without
//! taking a lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out packet ids `1, 2, 3, …`, unique for the life of a connection.
///
/// # Examples
///
/// ```rust
/// use sio_core::PacketIdAllocator;
///
/// let ids = PacketIdAllocator::new();
/// assert_eq!(ids.next(), 1);
/// assert_eq!(ids.next(), 2);
/// ```
#[derive(Debug)]
pub struct PacketIdAllocator {
    /// Last id handed out; `0` before the first call.
    last: AtomicU64,
}

impl PacketIdAllocator {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Returns a fresh non-zero id.
    ///
    /// On `u64::MAX` the counter wraps and skips `0`.
    pub fn next(&self) -> u64 {
        loop {
            let id = self.last.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
            if id != 0 {
                return id;
            }
        }
    }

    /// Returns the last id handed out without allocating a new one.
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

impl Default for PacketIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
