//! Gateway orchestration
//!
//! [`TuioGateway`] wires the subsystems together for the common embedding:
//!
//! ```text
//! TuioGateway
//!   ├─> UdpReceiver (tracker datagrams, owns the translator while connected)
//!   ├─> EventTranslator (session identity → durable identity)
//!   ├─> CursorRegistry (shared collaborator, passed in by the application)
//!   ├─> EventSink (ordered outbound queue)
//!   └─> EventDispatcher (consumer thread, optional)
//! ```
//!
//! The registry is accepted as an `Arc` collaborator rather than created
//! internally: the application shares it with its own subsystems (picking,
//! hit-testing) and several independent gateways can coexist in one process,
//! one per listening endpoint.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::{EventDispatcher, TrackerListener};
use crate::tracking::{
    CursorIdAllocator, CursorRegistry, EventSink, EventTranslator, Viewport,
};
use crate::transport::{self, FrameDecoder, UdpReceiver};

/// Tracking-event gateway for one listening endpoint.
pub struct TuioGateway {
    /// Shared pool of active entities, owned by the application
    registry: Arc<CursorRegistry>,

    /// Outbound event queue
    sink: Arc<EventSink>,

    /// Durable-identifier allocator, kept across reconnects
    allocator: Arc<CursorIdAllocator>,

    /// UDP transport
    receiver: UdpReceiver,

    /// Viewport snapshot taken at construction
    viewport: Viewport,
}

impl TuioGateway {
    /// Create a gateway from validated configuration and a shared registry.
    pub fn new(config: Config, registry: Arc<CursorRegistry>) -> Result<Self> {
        config.validate().context("Invalid gateway configuration")?;
        let listen_addr = config.listen_addr()?;

        let sink = Arc::new(match config.sink.capacity {
            Some(capacity) => EventSink::bounded(capacity),
            None => EventSink::unbounded(),
        });

        Ok(TuioGateway {
            registry,
            sink,
            allocator: Arc::new(CursorIdAllocator::new()),
            receiver: UdpReceiver::new(listen_addr),
            viewport: config.viewport(),
        })
    }

    /// Bind the endpoint and start translating tracker notifications.
    ///
    /// Idempotent; a gateway that is already connected stays connected.
    pub async fn connect<D: FrameDecoder>(&mut self, decoder: D) -> transport::Result<()> {
        let translator = self.new_translator();
        self.receiver.connect(decoder, translator).await
    }

    /// Stop the transport.
    ///
    /// Completes only once no further notification can arrive; remaining
    /// active entities receive their final `Ended` events first.
    pub async fn disconnect(&mut self) {
        self.receiver.disconnect().await;
    }

    /// Whether the transport is currently connected
    pub fn is_connected(&self) -> bool {
        self.receiver.is_connected()
    }

    /// Bound endpoint while connected
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.receiver.local_addr()
    }

    /// The outbound event queue
    pub fn sink(&self) -> Arc<EventSink> {
        Arc::clone(&self.sink)
    }

    /// The shared entity pool
    pub fn registry(&self) -> Arc<CursorRegistry> {
        Arc::clone(&self.registry)
    }

    /// Start the consumer thread delivering events to `listener`.
    ///
    /// At most one dispatcher may run per gateway at a time.
    pub fn spawn_dispatcher<L: TrackerListener + 'static>(&self, listener: L) -> EventDispatcher {
        EventDispatcher::spawn(self.sink(), listener)
    }

    /// Build a translator against this gateway's registry, sink and
    /// viewport.
    ///
    /// For applications that embed their own transport and call
    /// [`EventTranslator::handle`] directly instead of using
    /// [`connect`](Self::connect). Translators built here share the
    /// gateway's identifier allocator, so durable identifiers stay unique
    /// across both paths.
    pub fn new_translator(&self) -> EventTranslator {
        EventTranslator::with_allocator(
            Arc::clone(&self.registry),
            Arc::clone(&self.sink),
            self.viewport,
            Arc::clone(&self.allocator),
        )
    }
}
