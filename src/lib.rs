//! # lamco-tuio-gateway
//!
//! Tracking-event gateway for tabletop and multitouch surfaces.
//!
//! Ingests the event stream of a TUIO-style tracker (point cursors and
//! fiducial-marker objects addressed by transient session identifiers) and
//! republishes it as a stable stream of lifecycle events addressed by
//! durable, locally-issued identifiers:
//!
//! - **[`EventTranslator`]** - session-identity translation and the
//!   per-class lifecycle state machine; absorbs duplicate, late and
//!   out-of-order notifications
//! - **[`CursorRegistry`]** - shared pool of active entities, visible to
//!   application subsystems synchronously with every change
//! - **[`EventSink`]** / **[`EventDispatcher`](dispatch::EventDispatcher)** -
//!   ordered producer/consumer queue and its consumer thread
//! - **[`UdpReceiver`](transport::UdpReceiver)** - UDP transport with a
//!   pluggable [`FrameDecoder`](transport::FrameDecoder) wire-format seam
//! - **[`TuioGateway`]** - facade wiring the above from a [`Config`]
//!
//! ## Quick Start
//!
//! ```rust
//! use lamco_tuio_gateway::protocol::{Notification, SessionId};
//! use lamco_tuio_gateway::tracking::{
//!     CursorRegistry, EventSink, EventTranslator, Viewport,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> lamco_tuio_gateway::tracking::Result<()> {
//! let registry = Arc::new(CursorRegistry::new());
//! let sink = Arc::new(EventSink::unbounded());
//! let mut translator =
//!     EventTranslator::new(registry.clone(), sink.clone(), Viewport::new(1920, 1080));
//!
//! translator.handle(Notification::CursorAdd {
//!     session: SessionId(7),
//!     x: 0.5,
//!     y: 0.5,
//! })?;
//!
//! for event in sink.drain() {
//!     println!("{:?} cursor {}", event.kind(), event.cursor_id());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The translator runs on the transport's notification thread and owns all
//! identity state; the registry and the sink are the only concurrently
//! shared structures. One gateway instance serves one listening endpoint;
//! several can coexist in a process by sharing one registry.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dispatch;
pub mod gateway;
pub mod protocol;
pub mod tracking;
pub mod transport;

pub use config::Config;
pub use gateway::TuioGateway;
pub use protocol::{MarkerPose, Notification, SessionId};
pub use tracking::{
    CursorId, CursorRegistry, EntityClass, EntitySnapshot, EventKind, EventSink, EventTranslator,
    LifecycleEvent, MarkerState, Position, TrackedEntity, TrackingError, Viewport,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::dispatch::{EventDispatcher, TrackerListener};
    pub use crate::gateway::TuioGateway;
    pub use crate::protocol::{MarkerPose, Notification, SessionId};
    pub use crate::tracking::{
        CursorId, CursorRegistry, EntityClass, EntitySnapshot, EventKind, EventSink,
        EventTranslator, LifecycleEvent, TrackingError, Viewport,
    };
    pub use crate::transport::{FrameDecoder, UdpReceiver};
}
