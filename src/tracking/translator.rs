//! Event Translator
//!
//! Consumes decoded tracker notifications and republishes them as lifecycle
//! events addressed by durable identifiers. This is where transient session
//! identity is translated and where the delivery anomalies of a UDP tracking
//! protocol (late updates, double removes, reused sessions) are absorbed.
//!
//! ```text
//! Notification                 EventTranslator                    Consumer
//! ━━━━━━━━━━━━                 ━━━━━━━━━━━━━━━                    ━━━━━━━━
//!
//! CursorAdd ─────────────────> IdentityMap (point)
//!   session=7, (0.1, 0.2)           │ bind → cursor 0
//!                                   ├─> CoordinateProjector
//!                                   │     (0.1, 0.2) → (100, 100)
//!                                   ├─> CursorRegistry::create
//!                                   └─> EventSink ──────────────> Started
//!
//! ObjectUpdate ──────────────> IdentityMap (marker)
//!   session=7, pose                 │ resolve → cursor 1
//!                                   ├─> CursorRegistry::update
//!                                   └─> EventSink ──────────────> Updated
//! ```
//!
//! Each entity class runs the same three-transition state machine over its
//! own identity map; both maps draw durable identifiers from one shared
//! allocator. All anomalies degrade to drop-and-log so the stream keeps
//! flowing; the only error [`EventTranslator::handle`] returns is
//! [`TrackingError::SinkOverflow`], which indicates consumer failure rather
//! than protocol noise.

use crate::protocol::{MarkerPose, Notification, SessionId};
use crate::tracking::entity::{CursorId, EntityClass, MarkerState, TrackedEntity};
use crate::tracking::error::{Result, TrackingError};
use crate::tracking::events::{EntitySnapshot, LifecycleEvent};
use crate::tracking::identity::{CursorIdAllocator, IdentityMap};
use crate::tracking::projector::{CoordinateProjector, Viewport};
use crate::tracking::registry::CursorRegistry;
use crate::tracking::sink::EventSink;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Per-class lifecycle state machine over the identity maps and registry.
///
/// The translator runs on a single logical thread of control: the thread
/// that receives decoded notifications from the transport. Identity maps are
/// owned exclusively; the registry and sink are shared collaborators passed
/// in at construction.
pub struct EventTranslator {
    /// Session bindings for the point cursor class
    cursors: IdentityMap,

    /// Session bindings for the marker class
    markers: IdentityMap,

    /// Shared pool of active entities
    registry: Arc<CursorRegistry>,

    /// Outbound event queue
    sink: Arc<EventSink>,

    /// Normalized-to-absolute projection, viewport captured at construction
    projector: CoordinateProjector,

    /// Latest time-sync timestamp, reserved for future ordering use
    last_time_sync: Option<u64>,

    /// Total notifications handled
    processed: u64,

    /// Notifications dropped by policy (duplicates, unknown sessions, desyncs)
    dropped: u64,
}

impl EventTranslator {
    /// Create a translator with a fresh durable-identifier allocator.
    pub fn new(registry: Arc<CursorRegistry>, sink: Arc<EventSink>, viewport: Viewport) -> Self {
        Self::with_allocator(registry, sink, viewport, Arc::new(CursorIdAllocator::new()))
    }

    /// Create a translator sharing an existing allocator.
    ///
    /// The gateway passes the same allocator across reconnects so durable
    /// identifiers stay monotonic for the process lifetime.
    pub fn with_allocator(
        registry: Arc<CursorRegistry>,
        sink: Arc<EventSink>,
        viewport: Viewport,
        allocator: Arc<CursorIdAllocator>,
    ) -> Self {
        EventTranslator {
            cursors: IdentityMap::new(EntityClass::Point, allocator.clone()),
            markers: IdentityMap::new(EntityClass::Marker, allocator),
            registry,
            sink,
            projector: CoordinateProjector::new(viewport),
            last_time_sync: None,
            processed: 0,
            dropped: 0,
        }
    }

    /// Process one decoded notification.
    ///
    /// Emits at most one lifecycle event. Protocol anomalies are dropped and
    /// logged here; the only returned error is
    /// [`TrackingError::SinkOverflow`].
    pub fn handle(&mut self, notification: Notification) -> Result<()> {
        self.processed += 1;

        match notification {
            Notification::CursorAdd { session, x, y } => self.cursor_add(session, x, y),
            Notification::CursorUpdate { session, x, y } => self.cursor_update(session, x, y),
            Notification::CursorRemove { session, .. } => self.remove(EntityClass::Point, session),
            Notification::ObjectAdd { session, pose } => self.object_add(session, pose),
            Notification::ObjectUpdate { session, pose } => self.object_update(session, pose),
            Notification::ObjectRemove { session } => self.remove(EntityClass::Marker, session),
            Notification::TimeSync { timestamp_us } => {
                trace!("time sync tick at {}us", timestamp_us);
                self.last_time_sync = Some(timestamp_us);
                Ok(())
            }
        }
    }

    fn cursor_add(&mut self, session: SessionId, x: f32, y: f32) -> Result<()> {
        let cursor = match self.cursors.bind(session) {
            Ok(cursor) => cursor,
            Err(err) => {
                // Stale session not yet cleared. Idempotent no-op: the live
                // binding and its entity stay untouched.
                self.dropped += 1;
                warn!("{}; cursor-add dropped", err);
                return Ok(());
            }
        };

        let position = self.projector.project(x, y);
        let entity = TrackedEntity::point(cursor, position);
        self.registry.create(entity.clone());
        self.sink
            .push(LifecycleEvent::Started(EntitySnapshot::of(&entity)))
    }

    fn object_add(&mut self, session: SessionId, pose: MarkerPose) -> Result<()> {
        let cursor = match self.markers.bind(session) {
            Ok(cursor) => cursor,
            Err(err) => {
                self.dropped += 1;
                warn!("{}; object-add dropped", err);
                return Ok(());
            }
        };

        let position = self.projector.project(pose.x, pose.y);
        let entity = TrackedEntity::marker(cursor, position, MarkerState::from_pose(&pose));
        self.registry.create(entity.clone());
        self.sink
            .push(LifecycleEvent::Started(EntitySnapshot::of(&entity)))
    }

    fn cursor_update(&mut self, session: SessionId, x: f32, y: f32) -> Result<()> {
        let Some(cursor) = self.cursors.resolve(session) else {
            // Removed or never added; a late update must not resurrect.
            self.dropped += 1;
            trace!(
                "{}",
                TrackingError::UnknownSession {
                    class: EntityClass::Point,
                    session,
                    kind: "cursor-update",
                }
            );
            return Ok(());
        };

        let position = self.projector.project(x, y);
        match self.registry.update(cursor, |e| e.position = position) {
            Some(entity) => self
                .sink
                .push(LifecycleEvent::Updated(EntitySnapshot::of(&entity))),
            None => {
                self.purge_stale(EntityClass::Point, session, cursor);
                Ok(())
            }
        }
    }

    fn object_update(&mut self, session: SessionId, pose: MarkerPose) -> Result<()> {
        let Some(cursor) = self.markers.resolve(session) else {
            self.dropped += 1;
            trace!(
                "{}",
                TrackingError::UnknownSession {
                    class: EntityClass::Marker,
                    session,
                    kind: "object-update",
                }
            );
            return Ok(());
        };

        let position = self.projector.project(pose.x, pose.y);
        let state = MarkerState::from_pose(&pose);
        match self.registry.update(cursor, |e| {
            e.position = position;
            e.marker = Some(state);
        }) {
            Some(entity) => self
                .sink
                .push(LifecycleEvent::Updated(EntitySnapshot::of(&entity))),
            None => {
                self.purge_stale(EntityClass::Marker, session, cursor);
                Ok(())
            }
        }
    }

    fn remove(&mut self, class: EntityClass, session: SessionId) -> Result<()> {
        let (map, kind) = match class {
            EntityClass::Point => (&mut self.cursors, "cursor-remove"),
            EntityClass::Marker => (&mut self.markers, "object-remove"),
        };

        // Resolve and unbind in one step; the map entry is the leak risk and
        // is purged no matter what the registry says.
        let Some(cursor) = map.unbind(session) else {
            // Double remove or remove without add.
            self.dropped += 1;
            debug!(
                "{}",
                TrackingError::UnknownSession {
                    class,
                    session,
                    kind,
                }
            );
            return Ok(());
        };

        match self.registry.remove(cursor) {
            // The Ended event carries the last pose recorded in the
            // registry, not whatever the remove notification repeated.
            Some(entity) => self
                .sink
                .push(LifecycleEvent::Ended(EntitySnapshot::of(&entity))),
            None => {
                self.dropped += 1;
                warn!(
                    "{}; remove dropped",
                    TrackingError::RegistryDesync {
                        class,
                        session,
                        cursor,
                    }
                );
                Ok(())
            }
        }
    }

    /// Drop a binding whose durable identifier no longer resolves in the
    /// registry. Nothing is emitted for an entity that does not exist.
    fn purge_stale(&mut self, class: EntityClass, session: SessionId, cursor: CursorId) {
        let map = match class {
            EntityClass::Point => &mut self.cursors,
            EntityClass::Marker => &mut self.markers,
        };
        map.unbind(session);
        self.dropped += 1;
        warn!(
            "{}; stale binding purged",
            TrackingError::RegistryDesync {
                class,
                session,
                cursor,
            }
        );
    }

    /// Forced cleanup: end every still-active entity.
    ///
    /// Emits one `Ended` per entity and leaves both identity maps and the
    /// registry entries owned by this translator empty. Called when the
    /// transport disconnects so consumers never see orphaned entities.
    pub fn flush_active(&mut self) -> Result<()> {
        for (session, cursor) in self.cursors.drain() {
            self.end_for_flush(EntityClass::Point, session, cursor)?;
        }
        for (session, cursor) in self.markers.drain() {
            self.end_for_flush(EntityClass::Marker, session, cursor)?;
        }
        Ok(())
    }

    fn end_for_flush(
        &mut self,
        class: EntityClass,
        session: SessionId,
        cursor: CursorId,
    ) -> Result<()> {
        match self.registry.remove(cursor) {
            Some(entity) => self
                .sink
                .push(LifecycleEvent::Ended(EntitySnapshot::of(&entity))),
            None => {
                warn!(
                    "{}; flush skipped entity",
                    TrackingError::RegistryDesync {
                        class,
                        session,
                        cursor,
                    }
                );
                Ok(())
            }
        }
    }

    /// Total notifications handled
    pub fn notifications_processed(&self) -> u64 {
        self.processed
    }

    /// Notifications dropped by policy
    pub fn notifications_dropped(&self) -> u64 {
        self.dropped
    }

    /// Latest time-sync timestamp received, in microseconds
    pub fn last_time_sync(&self) -> Option<u64> {
        self.last_time_sync
    }

    /// Live bindings for one entity class
    pub fn active_bindings(&self, class: EntityClass) -> usize {
        match class {
            EntityClass::Point => self.cursors.len(),
            EntityClass::Marker => self.markers.len(),
        }
    }
}
