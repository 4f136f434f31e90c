//! In-memory graph store.
//!
//! The reference implementation of `GraphStore`: one `GraphState` behind a
//! single `parking_lot::RwLock`.
//!
//! ## Properties
//!
//! - **Coarse locking**: every mutation takes the write lock for its whole
//!   duration, so a batch insert or a media removal is never half-visible.
//! - **Process lifetime**: nothing is persisted; `shutdown()` only logs.
//! - **Full scans**: search and stats walk the whole state on every call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::{debug, info};

use crate::model::*;
use crate::Result;
use super::{Batch, CommitReport, GraphState, GraphStore, Removal};

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory media graph storage. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    state: RwLock<GraphState>,
    next_entity_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        info!("opening in-memory media graph store");
        Self {
            inner: Arc::new(MemoryInner {
                state: RwLock::new(GraphState::new()),
                next_entity_id: AtomicU64::new(1),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// GraphStore impl
// ============================================================================

impl GraphStore for MemoryStore {
    type Snapshot<'a> = RwLockReadGuard<'a, GraphState>;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn shutdown(&self) -> Result<()> {
        let state = self.inner.state.read();
        info!(
            entities = state.entity_count(),
            relationships = state.relationship_count(),
            "closing in-memory media graph store"
        );
        Ok(())
    }

    fn snapshot(&self) -> RwLockReadGuard<'_, GraphState> {
        self.inner.state.read()
    }

    fn commit_with<F>(&self, prepare: F) -> Result<CommitReport>
    where
        F: FnOnce(&mut dyn FnMut() -> EntityId) -> Batch,
    {
        let mut state = self.inner.state.write();
        let counter = &self.inner.next_entity_id;
        let batch = prepare(&mut || EntityId(counter.fetch_add(1, Ordering::Relaxed)));
        let media_id = batch.media_id.clone();
        let report = state.insert_batch(batch);
        drop(state);
        debug!(
            %media_id,
            entities = report.entities_created,
            relationships = report.relationships_created,
            "committed batch"
        );
        Ok(report)
    }

    fn put_relationship(&self, rel: EntityRelationship) -> Result<bool> {
        Ok(self.inner.state.write().insert_relationship(rel))
    }

    fn remove_media(&self, media_id: &str) -> Result<Removal> {
        let removal = self.inner.state.write().remove_media(media_id);
        debug!(
            %media_id,
            entities = removal.entities_removed,
            relationships = removal.relationships_removed,
            "removed media"
        );
        Ok(removal)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_and_shared_between_clones() {
        let store = MemoryStore::new();
        let clone = store.clone();
        let first = store.put_entities("a", vec![EntityDraft::default(), EntityDraft::default()]).unwrap();
        let second = clone.put_entities("b", vec![EntityDraft::default()]).unwrap();
        assert_eq!(first, vec![EntityId(1), EntityId(2)]);
        assert_eq!(second, vec![EntityId(3)]);
        assert_eq!(store.entity_count(), 3);
    }

    #[test]
    fn test_ids_follow_commit_order() {
        let store = MemoryStore::new();
        let report = store
            .commit_with(|next_id| {
                let entities = vec![
                    MediaEntity::from_draft(next_id(), "m", EntityDraft::new("object", "x")),
                    MediaEntity::from_draft(next_id(), "m", EntityDraft::new("object", "y")),
                ];
                let relationships = vec![EntityRelationship::new(entities[0].id, entities[1].id, "follows", 1.0)];
                Batch { media_id: "m".into(), entities, relationships }
            })
            .unwrap();
        assert_eq!(report, CommitReport { entities_created: 2, relationships_created: 1 });

        let later = store.put_entities("n", vec![EntityDraft::default()]).unwrap();
        assert_eq!(later, vec![EntityId(3)]);
        let order: Vec<String> = store.snapshot().entities().map(|e| e.media_id.clone()).collect();
        assert_eq!(order, vec!["m", "m", "n"]);
    }

    #[test]
    fn test_put_entities_and_get_by_media() {
        let store = MemoryStore::new();
        let ids = store
            .put_entities("clip-1", vec![
                EntityDraft::new("object", "red brick"),
                EntityDraft::new("person", "builder"),
            ])
            .unwrap();

        assert_eq!(ids.len(), 2);
        let entities = store.get_by_media("clip-1");
        assert_eq!(entities.iter().map(|e| e.id).collect::<Vec<_>>(), ids);
        assert_eq!(entities[0].media_id, "clip-1");
        assert!(store.get_by_media("clip-2").is_empty());
        assert_eq!(store.relationship_count(), 0);
    }

    #[test]
    fn test_put_relationship_between_existing_entities() {
        let store = MemoryStore::new();
        let ids = store
            .put_entities("clip-1", vec![EntityDraft::new("person", "host"), EntityDraft::new("audio", "hello")])
            .unwrap();

        let added = store
            .put_relationship(EntityRelationship::new(ids[1], ids[0], RelationshipType::SpokenBy, 1.0))
            .unwrap();
        assert!(added);

        let dangling = store
            .put_relationship(EntityRelationship::new(ids[0], EntityId(999), "depicts", 1.0))
            .unwrap();
        assert!(!dangling);
        assert_eq!(store.relationship_count(), 1);
    }

    #[test]
    fn test_remove_media_through_store() {
        let store = MemoryStore::new();
        let ids = store
            .put_entities("clip-1", vec![EntityDraft::new("object", "a"), EntityDraft::new("object", "b")])
            .unwrap();
        store
            .put_relationship(EntityRelationship::new(ids[0], ids[1], RelationshipType::Follows, 1.0))
            .unwrap();

        let removal = store.remove_media("clip-1").unwrap();
        assert_eq!(removal.entities_removed, 2);
        assert_eq!(removal.relationships_removed, 1);
        assert!(store.get_entity(ids[0]).is_none());
        assert_eq!(store.entity_count(), 0);
    }
}
