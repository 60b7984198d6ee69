//! Tracked entity types
//!
//! A [`TrackedEntity`] is one live cursor or marker, addressed by a durable
//! [`CursorId`] and owned exclusively by the registry. Consumers only ever
//! see [`EntitySnapshot`](crate::tracking::events::EntitySnapshot) copies.

use crate::protocol::MarkerPose;
use std::fmt;

/// Durable cursor identifier.
///
/// Process-unique and monotonically issued from a single allocator shared by
/// both entity classes, so a point cursor and a marker never carry the same
/// identifier at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CursorId(u32);

impl CursorId {
    /// Construct from a raw value. Intended for tests and persistence glue;
    /// live identifiers come from the allocator.
    pub const fn from_raw(raw: u32) -> Self {
        CursorId(raw)
    }

    /// Raw numeric value
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entity class a tracker session belongs to.
///
/// The tracker issues session identifiers per class, so the same number can
/// denote one point cursor and one marker simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    /// Point cursor (finger or stylus contact)
    Point,
    /// Fiducial marker object
    Marker,
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityClass::Point => write!(f, "point"),
            EntityClass::Marker => write!(f, "marker"),
        }
    }
}

/// Absolute position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Absolute X coordinate
    pub x: f32,
    /// Absolute Y coordinate
    pub y: f32,
}

impl Position {
    /// Origin fallback used when no pose was ever recorded for an entity.
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    /// Construct a position
    pub const fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }
}

/// Kinematic state of a fiducial marker, as last reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerState {
    /// Fiducial symbol identifier
    pub symbol_id: i32,
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

impl MarkerState {
    /// Extract the kinematic fields from a full pose report.
    pub fn from_pose(pose: &MarkerPose) -> Self {
        MarkerState {
            symbol_id: pose.symbol_id,
            angle: pose.angle,
            x_velocity: pose.x_velocity,
            y_velocity: pose.y_velocity,
            rotation_velocity: pose.rotation_velocity,
            motion_acceleration: pose.motion_acceleration,
            rotation_acceleration: pose.rotation_acceleration,
        }
    }
}

/// One live tracked entity.
///
/// Created when the translator accepts an add notification, mutated in place
/// on updates, removed from the registry exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEntity {
    /// Durable identifier
    pub id: CursorId,
    /// Entity class
    pub class: EntityClass,
    /// Current absolute position
    pub position: Position,
    /// Marker kinematics; `None` for point cursors
    pub marker: Option<MarkerState>,
}

impl TrackedEntity {
    /// Create a point cursor entity
    pub fn point(id: CursorId, position: Position) -> Self {
        TrackedEntity {
            id,
            class: EntityClass::Point,
            position,
            marker: None,
        }
    }

    /// Create a fiducial marker entity
    pub fn marker(id: CursorId, position: Position, state: MarkerState) -> Self {
        TrackedEntity {
            id,
            class: EntityClass::Marker,
            position,
            marker: Some(state),
        }
    }
}
