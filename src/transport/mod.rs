//! Tracker transport
//!
//! Receives tracker datagrams over UDP and feeds decoded notifications to
//! the translator. Wire-format parsing is delegated to a [`FrameDecoder`]
//! implementation supplied by the embedding application; this layer owns the
//! socket, the receive task and the connect/disconnect lifecycle.

use crate::protocol::Notification;
use std::net::SocketAddr;
use thiserror::Error;

pub mod udp;

pub use udp::UdpReceiver;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Transport error types
#[derive(Error, Debug)]
pub enum TransportError {
    /// Could not bind the tracking endpoint
    #[error("failed to bind tracking endpoint {addr}: {source}")]
    Bind {
        /// Requested listening endpoint
        addr: SocketAddr,
        /// Underlying socket error
        source: std::io::Error,
    },

    /// Socket error after binding
    #[error("tracking socket error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns one received datagram into decoded notifications.
///
/// Implementations own all wire-format concerns. A malformed datagram is the
/// decoder's problem: return whatever parsed cleanly and drop the rest, with
/// any diagnostics the implementation sees fit. The receive loop never
/// inspects datagram bytes itself.
pub trait FrameDecoder: Send + 'static {
    /// Decode a single datagram into zero or more notifications, in the
    /// order they should reach the translator.
    fn decode(&mut self, datagram: &[u8]) -> Vec<Notification>;
}
