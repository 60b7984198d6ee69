//! Cursor Registry
//!
//! Process-wide pool of currently active tracked entities, shared across
//! both entity classes and across application subsystems (the same pool the
//! application consults for hit-testing). The registry is passed to each
//! gateway instance as an explicit `Arc` collaborator, never reached through
//! a hidden singleton, so several independent gateways can coexist in one
//! process.
//!
//! Every successful `create`/`remove` changes the set of active entities
//! observable by any caller synchronously with the call.

use crate::tracking::entity::{CursorId, TrackedEntity};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::warn;

/// Shared pool of active tracked entities, keyed by durable identifier.
#[derive(Debug, Default)]
pub struct CursorRegistry {
    entities: RwLock<HashMap<CursorId, TrackedEntity>>,
}

impl CursorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        CursorRegistry {
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a newly tracked entity.
    ///
    /// Durable identifiers are issued monotonically, so an occupied slot
    /// indicates a caller bug; the existing record is replaced and logged.
    pub fn create(&self, entity: TrackedEntity) {
        let mut entities = self.entities.write();
        if let Some(previous) = entities.insert(entity.id, entity) {
            warn!(
                cursor = %previous.id,
                class = %previous.class,
                "registry create replaced a live entity"
            );
        }
    }

    /// Copy of the entity with this identifier, if active
    pub fn get(&self, id: CursorId) -> Option<TrackedEntity> {
        self.entities.read().get(&id).cloned()
    }

    /// Apply an in-place mutation to the entity, if it exists.
    ///
    /// Returns a copy of the post-update state, or `None` if the identifier
    /// is not active. Never inserts; a missing entity stays missing.
    pub fn update<F>(&self, id: CursorId, mutator: F) -> Option<TrackedEntity>
    where
        F: FnOnce(&mut TrackedEntity),
    {
        let mut entities = self.entities.write();
        let entity = entities.get_mut(&id)?;
        mutator(entity);
        Some(entity.clone())
    }

    /// Remove the entity with this identifier, returning its final state
    pub fn remove(&self, id: CursorId) -> Option<TrackedEntity> {
        self.entities.write().remove(&id)
    }

    /// Whether an entity with this identifier is active
    pub fn contains(&self, id: CursorId) -> bool {
        self.entities.read().contains_key(&id)
    }

    /// Number of active entities
    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    /// Whether the registry has no active entities
    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    /// Identifiers of all active entities, in no particular order
    pub fn active_ids(&self) -> Vec<CursorId> {
        self.entities.read().keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::entity::Position;
    use std::sync::Arc;

    fn point(id: u32, x: f32, y: f32) -> TrackedEntity {
        TrackedEntity::point(CursorId::from_raw(id), Position::new(x, y))
    }

    #[test]
    fn test_create_get_remove() {
        let registry = CursorRegistry::new();
        registry.create(point(1, 10.0, 20.0));

        let entity = registry.get(CursorId::from_raw(1)).unwrap();
        assert_eq!(entity.position, Position::new(10.0, 20.0));
        assert_eq!(registry.len(), 1);

        let removed = registry.remove(CursorId::from_raw(1)).unwrap();
        assert_eq!(removed.position, Position::new(10.0, 20.0));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_update_mutates_in_place() {
        let registry = CursorRegistry::new();
        registry.create(point(2, 0.0, 0.0));

        let updated = registry
            .update(CursorId::from_raw(2), |e| {
                e.position = Position::new(5.0, 6.0);
            })
            .unwrap();

        assert_eq!(updated.position, Position::new(5.0, 6.0));
        assert_eq!(
            registry.get(CursorId::from_raw(2)).unwrap().position,
            Position::new(5.0, 6.0)
        );
    }

    #[test]
    fn test_update_missing_never_resurrects() {
        let registry = CursorRegistry::new();
        let result = registry.update(CursorId::from_raw(9), |e| {
            e.position = Position::new(1.0, 1.0);
        });

        assert!(result.is_none());
        assert!(!registry.contains(CursorId::from_raw(9)));
    }

    #[test]
    fn test_remove_missing() {
        let registry = CursorRegistry::new();
        assert!(registry.remove(CursorId::from_raw(4)).is_none());
    }

    #[test]
    fn test_visibility_is_synchronous_across_threads() {
        let registry = Arc::new(CursorRegistry::new());
        registry.create(point(1, 1.0, 1.0));

        let observer = Arc::clone(&registry);
        let handle = std::thread::spawn(move || observer.contains(CursorId::from_raw(1)));
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_get_returns_a_copy() {
        let registry = CursorRegistry::new();
        registry.create(point(3, 1.0, 2.0));

        let mut copy = registry.get(CursorId::from_raw(3)).unwrap();
        copy.position = Position::new(99.0, 99.0);

        assert_eq!(
            registry.get(CursorId::from_raw(3)).unwrap().position,
            Position::new(1.0, 2.0)
        );
    }
}
