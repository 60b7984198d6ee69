//! UDP receive loop
//!
//! One [`UdpReceiver`] per gateway instance. The spawned receive task is the
//! single logical thread of control for the translator it owns: every
//! identity-map and registry mutation happens on it, which is what lets the
//! core run lock-free.

use crate::tracking::EventTranslator;
use crate::transport::{FrameDecoder, Result, TransportError};
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Largest UDP payload a tracker datagram can occupy.
const MAX_DATAGRAM: usize = 65_535;

/// UDP transport for tracker notifications.
///
/// `connect` binds the endpoint and spawns the receive task; `disconnect`
/// stops it and does not return until no further notification can arrive.
/// Both operations are idempotent.
pub struct UdpReceiver {
    listen_addr: SocketAddr,
    active: Option<ActiveReceiver>,
}

struct ActiveReceiver {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl UdpReceiver {
    /// Create a receiver for the given listening endpoint.
    ///
    /// Nothing is bound until [`connect`](Self::connect).
    pub fn new(listen_addr: SocketAddr) -> Self {
        UdpReceiver {
            listen_addr,
            active: None,
        }
    }

    /// Bind the endpoint and start receiving.
    ///
    /// The receive task takes ownership of `decoder` and `translator`:
    /// datagram → decode → one `translator.handle()` call per notification.
    /// A second `connect` while already connected is a no-op (the supplied
    /// decoder and translator are dropped).
    pub async fn connect<D: FrameDecoder>(
        &mut self,
        decoder: D,
        translator: EventTranslator,
    ) -> Result<()> {
        if self.active.is_some() {
            debug!("tracking transport already connected");
            return Ok(());
        }

        let socket = UdpSocket::bind(self.listen_addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: self.listen_addr,
                source,
            })?;
        let local_addr = socket.local_addr()?;
        info!("tracking transport listening on {}", local_addr);

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(receive_loop(socket, decoder, translator, shutdown_rx));

        self.active = Some(ActiveReceiver {
            shutdown,
            task,
            local_addr,
        });
        Ok(())
    }

    /// Stop receiving.
    ///
    /// Signals the receive task and awaits its completion; when this returns
    /// no further notification from this transport can arrive. Remaining
    /// active entities are ended by the task on the way out. A `disconnect`
    /// while not connected is a no-op.
    pub async fn disconnect(&mut self) {
        let Some(active) = self.active.take() else {
            debug!("tracking transport already disconnected");
            return;
        };

        let _ = active.shutdown.send(true);
        if let Err(err) = active.task.await {
            error!("tracking receive task panicked: {}", err);
        }
        info!("tracking transport on {} disconnected", active.local_addr);
    }

    /// Whether the receive task is running
    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// Actual bound endpoint while connected.
    ///
    /// Differs from the configured endpoint when binding port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.active.as_ref().map(|a| a.local_addr)
    }
}

async fn receive_loop<D: FrameDecoder>(
    socket: UdpSocket,
    mut decoder: D,
    mut translator: EventTranslator,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut buf = vec![0u8; MAX_DATAGRAM];

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            received = socket.recv_from(&mut buf) => {
                match received {
                    Ok((len, peer)) => {
                        for notification in decoder.decode(&buf[..len]) {
                            if let Err(err) = translator.handle(notification) {
                                // Consumer failure, not protocol noise.
                                error!("{}; event lost (peer {})", err, peer);
                            }
                        }
                    }
                    Err(err) => {
                        warn!("tracking receive failed: {}", err);
                    }
                }
            }
        }
    }

    if let Err(err) = translator.flush_active() {
        error!("{}; final cleanup events lost", err);
    }
    debug!(
        "tracking receive loop exited after {} notifications ({} dropped)",
        translator.notifications_processed(),
        translator.notifications_dropped()
    );
}
