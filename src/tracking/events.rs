//! Lifecycle events emitted to consumers
//!
//! The consumer-facing side of the gateway: an ordered stream of
//! [`LifecycleEvent`]s addressed by durable identifiers. Each event carries
//! an [`EntitySnapshot`], a point-in-time copy of the entity state. Snapshots
//! are plain values; holding one grants no access to registry state.

use crate::tracking::entity::{CursorId, EntityClass, MarkerState, Position, TrackedEntity};

/// Point-in-time copy of a tracked entity carried inside an event.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    /// Entity class
    pub class: EntityClass,
    /// Durable identifier
    pub cursor_id: CursorId,
    /// Absolute position at emission time
    pub position: Position,
    /// Marker kinematics as last reported; `None` for point cursors
    pub marker: Option<MarkerState>,
}

impl EntitySnapshot {
    /// Snapshot the current state of a registry entity.
    pub fn of(entity: &TrackedEntity) -> Self {
        EntitySnapshot {
            class: entity.class,
            cursor_id: entity.id,
            position: entity.position,
            marker: entity.marker,
        }
    }
}

/// Lifecycle event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Entity became active
    Started,
    /// Entity state changed
    Updated,
    /// Entity is no longer tracked
    Ended,
}

/// One lifecycle event.
///
/// For every accepted add, exactly one `Started`; one `Updated` per accepted
/// update; exactly one `Ended` on remove or forced cleanup, all carrying the
/// same durable identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// Entity became active
    Started(EntitySnapshot),
    /// Entity state changed
    Updated(EntitySnapshot),
    /// Entity is no longer tracked
    Ended(EntitySnapshot),
}

impl LifecycleEvent {
    /// Event kind
    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::Started(_) => EventKind::Started,
            LifecycleEvent::Updated(_) => EventKind::Updated,
            LifecycleEvent::Ended(_) => EventKind::Ended,
        }
    }

    /// The snapshot carried by this event
    pub fn snapshot(&self) -> &EntitySnapshot {
        match self {
            LifecycleEvent::Started(s) | LifecycleEvent::Updated(s) | LifecycleEvent::Ended(s) => s,
        }
    }

    /// Durable identifier of the entity this event concerns
    pub fn cursor_id(&self) -> CursorId {
        self.snapshot().cursor_id
    }
}
