//! Tracking Error Types
//!
//! Error taxonomy for the identity translation core. All variants except
//! [`TrackingError::SinkOverflow`] are recoverable-by-policy at the
//! translator boundary: the translator converts them into drop-and-log
//! decisions and keeps processing, so they never reach the event stream.

use crate::protocol::SessionId;
use crate::tracking::entity::{CursorId, EntityClass};
use thiserror::Error;

/// Result type for tracking operations
pub type Result<T> = std::result::Result<T, TrackingError>;

/// Tracking core error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackingError {
    /// Add notification for a session that is already bound in its class
    #[error("duplicate session: {class} session {session} is already bound")]
    DuplicateSession {
        /// Entity class of the colliding binding
        class: EntityClass,
        /// Session identifier the tracker reused without a remove
        session: SessionId,
    },

    /// Update or remove notification for a session with no live binding
    #[error("unknown session: no {class} binding for session {session} ({kind})")]
    UnknownSession {
        /// Entity class the notification addressed
        class: EntityClass,
        /// Unbound session identifier
        session: SessionId,
        /// Notification kind that referenced the session
        kind: &'static str,
    },

    /// Identity map and registry disagree about a durable identifier
    #[error("registry desync: {class} cursor {cursor} for session {session} missing from registry")]
    RegistryDesync {
        /// Entity class of the stale binding
        class: EntityClass,
        /// Session identifier of the stale binding
        session: SessionId,
        /// Durable identifier that failed to resolve
        cursor: CursorId,
    },

    /// Bounded event sink is full; the consumer is not keeping pace
    #[error("event sink overflow: capacity {capacity} reached")]
    SinkOverflow {
        /// Configured sink capacity
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_context() {
        let err = TrackingError::DuplicateSession {
            class: EntityClass::Marker,
            session: SessionId(3),
        };
        let msg = err.to_string();
        assert!(msg.contains("marker"));
        assert!(msg.contains('3'));

        let err = TrackingError::UnknownSession {
            class: EntityClass::Point,
            session: SessionId(42),
            kind: "cursor-remove",
        };
        let msg = err.to_string();
        assert!(msg.contains("point"));
        assert!(msg.contains("cursor-remove"));
    }

    #[test]
    fn test_sink_overflow_display() {
        let err = TrackingError::SinkOverflow { capacity: 128 };
        assert!(err.to_string().contains("128"));
    }
}
