//! Identity Map
//!
//! Association between transient tracker session identifiers and durable
//! cursor identifiers, scoped to one entity class. The translator owns two
//! instances, one per class, both drawing durable identifiers from a single
//! shared [`CursorIdAllocator`] so the identifier space never collides
//! across classes.
//!
//! Invariant: at most one live entry per session identifier; an entry exists
//! exactly between an accepted add and its matching remove (or forced
//! cleanup).

use crate::protocol::SessionId;
use crate::tracking::entity::{CursorId, EntityClass};
use crate::tracking::error::{Result, TrackingError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Issues durable cursor identifiers, monotonically, process-wide.
///
/// Shared between both per-class identity maps and kept alive across
/// transport reconnects so identifiers are never reused within a process.
#[derive(Debug)]
pub struct CursorIdAllocator {
    next: AtomicU32,
}

impl CursorIdAllocator {
    /// Create an allocator starting at identifier 0
    pub fn new() -> Self {
        CursorIdAllocator {
            next: AtomicU32::new(0),
        }
    }

    /// Issue the next durable identifier
    pub fn issue(&self) -> CursorId {
        CursorId::from_raw(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of identifiers issued so far
    pub fn issued(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for CursorIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Session-to-durable-identifier map for one entity class.
pub struct IdentityMap {
    class: EntityClass,
    bindings: HashMap<SessionId, CursorId>,
    allocator: Arc<CursorIdAllocator>,
}

impl IdentityMap {
    /// Create an empty map for the given class
    pub fn new(class: EntityClass, allocator: Arc<CursorIdAllocator>) -> Self {
        IdentityMap {
            class,
            bindings: HashMap::new(),
            allocator,
        }
    }

    /// Entity class this map is scoped to
    pub fn class(&self) -> EntityClass {
        self.class
    }

    /// Issue a new durable identifier and bind it to `session`.
    ///
    /// This is the only point in the system where durable identifiers are
    /// issued. Fails with [`TrackingError::DuplicateSession`] if the session
    /// already has a live binding; the existing binding is left untouched.
    pub fn bind(&mut self, session: SessionId) -> Result<CursorId> {
        if self.bindings.contains_key(&session) {
            return Err(TrackingError::DuplicateSession {
                class: self.class,
                session,
            });
        }

        let cursor = self.allocator.issue();
        self.bindings.insert(session, cursor);
        Ok(cursor)
    }

    /// Look up the durable identifier bound to `session`
    pub fn resolve(&self, session: SessionId) -> Option<CursorId> {
        self.bindings.get(&session).copied()
    }

    /// Whether `session` currently has a live binding
    pub fn is_bound(&self, session: SessionId) -> bool {
        self.bindings.contains_key(&session)
    }

    /// Remove the binding for `session`, returning the durable identifier
    /// for registry cleanup.
    pub fn unbind(&mut self, session: SessionId) -> Option<CursorId> {
        self.bindings.remove(&session)
    }

    /// Remove and return all live bindings (forced cleanup).
    pub fn drain(&mut self) -> Vec<(SessionId, CursorId)> {
        self.bindings.drain().collect()
    }

    /// Number of live bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the map has no live bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(class: EntityClass) -> IdentityMap {
        IdentityMap::new(class, Arc::new(CursorIdAllocator::new()))
    }

    #[test]
    fn test_bind_resolve_unbind() {
        let mut m = map(EntityClass::Point);
        let id = m.bind(SessionId(7)).unwrap();

        assert_eq!(m.resolve(SessionId(7)), Some(id));
        assert!(m.is_bound(SessionId(7)));
        assert_eq!(m.len(), 1);

        assert_eq!(m.unbind(SessionId(7)), Some(id));
        assert_eq!(m.resolve(SessionId(7)), None);
        assert!(m.is_empty());
    }

    #[test]
    fn test_duplicate_bind_fails_and_preserves_binding() {
        let mut m = map(EntityClass::Marker);
        let first = m.bind(SessionId(3)).unwrap();

        let err = m.bind(SessionId(3)).unwrap_err();
        assert_eq!(
            err,
            TrackingError::DuplicateSession {
                class: EntityClass::Marker,
                session: SessionId(3),
            }
        );
        assert_eq!(m.resolve(SessionId(3)), Some(first));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_unbind_unknown_session() {
        let mut m = map(EntityClass::Point);
        assert_eq!(m.unbind(SessionId(99)), None);
    }

    #[test]
    fn test_shared_allocator_never_collides_across_classes() {
        let allocator = Arc::new(CursorIdAllocator::new());
        let mut points = IdentityMap::new(EntityClass::Point, allocator.clone());
        let mut markers = IdentityMap::new(EntityClass::Marker, allocator.clone());

        // Same numeric session in both classes: independent bindings,
        // distinct durable identifiers.
        let p = points.bind(SessionId(5)).unwrap();
        let m = markers.bind(SessionId(5)).unwrap();

        assert_ne!(p, m);
        assert_eq!(points.resolve(SessionId(5)), Some(p));
        assert_eq!(markers.resolve(SessionId(5)), Some(m));
        assert_eq!(allocator.issued(), 2);
    }

    #[test]
    fn test_identifiers_are_monotonic() {
        let mut m = map(EntityClass::Point);
        let a = m.bind(SessionId(1)).unwrap();
        let b = m.bind(SessionId(2)).unwrap();
        m.unbind(SessionId(1));
        let c = m.bind(SessionId(1)).unwrap();

        assert!(a < b);
        assert!(b < c, "identifiers must not be reused after unbind");
    }

    #[test]
    fn test_drain_empties_map() {
        let mut m = map(EntityClass::Marker);
        m.bind(SessionId(1)).unwrap();
        m.bind(SessionId(2)).unwrap();

        let drained = m.drain();
        assert_eq!(drained.len(), 2);
        assert!(m.is_empty());
    }
}
