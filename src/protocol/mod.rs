//! Decoded tracking protocol notifications
//!
//! Vocabulary shared between the transport layer and the event translator.
//! A [`Notification`] is one decoded message from the tracker: the transport
//! collaborator produces them (one per wire message, already parsed down to
//! floating-point pose fields) and the translator consumes them.
//!
//! Session identifiers are transient and scoped per profile: the tracker may
//! reuse the same number for a point cursor and a fiducial marker at the same
//! time, and will recycle numbers over the lifetime of a connection. Nothing
//! downstream of the translator ever sees a [`SessionId`].

use std::fmt;

/// Transient session identifier assigned by the tracker.
///
/// Valid only between the add and remove notifications of one tracked entity,
/// and only within one entity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SessionId {
    fn from(raw: i64) -> Self {
        SessionId(raw)
    }
}

/// Pose and kinematics reported for a fiducial marker.
///
/// Coordinates are normalized to `[0, 1]`; velocities and accelerations are
/// in normalized units as reported by the tracker and are passed through to
/// consumers without recomputation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPose {
    /// Fiducial symbol identifier (which physical marker this is)
    pub symbol_id: i32,
    /// Normalized X position
    pub x: f32,
    /// Normalized Y position
    pub y: f32,
    /// Orientation angle in radians
    pub angle: f32,
    /// Normalized X velocity
    pub x_velocity: f32,
    /// Normalized Y velocity
    pub y_velocity: f32,
    /// Rotation velocity
    pub rotation_velocity: f32,
    /// Motion acceleration
    pub motion_acceleration: f32,
    /// Rotation acceleration
    pub rotation_acceleration: f32,
}

/// One decoded notification from the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    /// A point cursor appeared on the surface
    CursorAdd {
        /// Tracker session identifier (cursor class)
        session: SessionId,
        /// Normalized X position
        x: f32,
        /// Normalized Y position
        y: f32,
    },

    /// A point cursor moved
    CursorUpdate {
        /// Tracker session identifier (cursor class)
        session: SessionId,
        /// Normalized X position
        x: f32,
        /// Normalized Y position
        y: f32,
    },

    /// A point cursor left the surface.
    ///
    /// The pose fields repeat the last reported position; the translator
    /// emits the registry's recorded pose instead, so these are accepted at
    /// the interface but do not contribute to the outgoing event.
    CursorRemove {
        /// Tracker session identifier (cursor class)
        session: SessionId,
        /// Normalized X position as repeated by the tracker
        x: f32,
        /// Normalized Y position as repeated by the tracker
        y: f32,
    },

    /// A fiducial marker appeared on the surface
    ObjectAdd {
        /// Tracker session identifier (marker class)
        session: SessionId,
        /// Full pose and kinematics report
        pose: MarkerPose,
    },

    /// A fiducial marker moved or rotated
    ObjectUpdate {
        /// Tracker session identifier (marker class)
        session: SessionId,
        /// Full pose and kinematics report
        pose: MarkerPose,
    },

    /// A fiducial marker was lifted off the surface.
    ///
    /// Marker removes carry no pose on the wire.
    ObjectRemove {
        /// Tracker session identifier (marker class)
        session: SessionId,
    },

    /// Periodic time synchronization tick.
    ///
    /// Carries no entity identity and drives no state transition.
    TimeSync {
        /// Tracker timestamp in microseconds
        timestamp_us: u64,
    },
}

impl Notification {
    /// Short name of the notification kind, for log context.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::CursorAdd { .. } => "cursor-add",
            Notification::CursorUpdate { .. } => "cursor-update",
            Notification::CursorRemove { .. } => "cursor-remove",
            Notification::ObjectAdd { .. } => "object-add",
            Notification::ObjectUpdate { .. } => "object-update",
            Notification::ObjectRemove { .. } => "object-remove",
            Notification::TimeSync { .. } => "time-sync",
        }
    }

    /// Session identifier carried by this notification, if any.
    pub fn session(&self) -> Option<SessionId> {
        match self {
            Notification::CursorAdd { session, .. }
            | Notification::CursorUpdate { session, .. }
            | Notification::CursorRemove { session, .. }
            | Notification::ObjectAdd { session, .. }
            | Notification::ObjectUpdate { session, .. }
            | Notification::ObjectRemove { session } => Some(*session),
            Notification::TimeSync { .. } => None,
        }
    }
}
