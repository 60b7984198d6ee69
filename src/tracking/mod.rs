//! Session-Identity Translation Core
//!
//! Turns the tracker's transient, reusable session identifiers into a stable
//! stream of lifecycle events addressed by durable cursor identifiers.
//!
//! # Architecture
//!
//! ```text
//! Decoded Notifications
//!       ↓
//! ┌─────────────────────────┐
//! │  EventTranslator        │ ← lifecycle state machine per entity class
//! │  - drop/no-op policy    │
//! └─────────────────────────┘
//!    ↓           ↓           ↓
//! ┌──────────┐ ┌──────────┐ ┌───────────────┐
//! │ Identity │ │  Cursor  │ │  Coordinate   │
//! │ Maps ×2  │ │ Registry │ │  Projector    │
//! └──────────┘ └──────────┘ └───────────────┘
//!       ↓
//! ┌──────────┐
//! │EventSink │ → drained by the dispatch consumer
//! └──────────┘
//! ```
//!
//! The translator and both identity maps live on the transport's
//! notification thread and need no locking. The registry and sink are the
//! two shared boundaries: the registry so other application subsystems can
//! observe active entities synchronously, the sink so a separate consumer
//! thread can drain events.

pub mod entity;
pub mod error;
pub mod events;
pub mod identity;
pub mod projector;
pub mod registry;
pub mod sink;
pub mod translator;

pub use entity::{CursorId, EntityClass, MarkerState, Position, TrackedEntity};
pub use error::{Result, TrackingError};
pub use events::{EntitySnapshot, EventKind, LifecycleEvent};
pub use identity::{CursorIdAllocator, IdentityMap};
pub use projector::{CoordinateProjector, Viewport};
pub use registry::CursorRegistry;
pub use sink::EventSink;
pub use translator::EventTranslator;
