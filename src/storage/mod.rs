//! # Graph Store Trait
//!
//! The contract between the façade and whatever holds the graph.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | Process-lifetime store behind one `RwLock` |
//!
//! ## Consistency
//!
//! Entities, relationships and the media index are one unit of shared
//! state. A store must apply `commit` and `remove_media` atomically and hand
//! out snapshots that never observe either half-done. The trait is
//! synchronous: snapshots are lock guards and must not be held across an
//! `.await`.

pub mod memory;
pub mod state;

use std::ops::Deref;

use crate::model::*;
use crate::Result;

pub use memory::MemoryStore;
pub use state::{Batch, CommitReport, GraphState, Removal};

// ============================================================================
// GraphStore Trait
// ============================================================================

/// The storage contract for media graphs.
pub trait GraphStore: Send + Sync + 'static {
    /// Consistent read view over the whole graph.
    type Snapshot<'a>: Deref<Target = GraphState>
    where
        Self: 'a;

    /// Short backend name for health reporting and logs.
    fn name(&self) -> &'static str;

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Flush and close. Called once at process teardown.
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Take a read snapshot. Writers are excluded while it is alive.
    fn snapshot(&self) -> Self::Snapshot<'_>;

    /// Get one entity. `None` if unknown.
    fn get_entity(&self, id: EntityId) -> Option<MediaEntity> {
        self.snapshot().entity(id).cloned()
    }

    /// All entities of a media item. Empty for an unknown media id.
    fn get_by_media(&self, media_id: &str) -> Vec<MediaEntity> {
        self.snapshot().media_entities(media_id).cloned().collect()
    }

    fn entity_count(&self) -> usize {
        self.snapshot().entity_count()
    }

    fn relationship_count(&self) -> usize {
        self.snapshot().relationship_count()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Atomically build and insert a batch of entities with its edges.
    ///
    /// `prepare` runs while writers are excluded and receives the id
    /// allocator, so ids are never reused and their numeric order is commit
    /// order.
    fn commit_with<F>(&self, prepare: F) -> Result<CommitReport>
    where
        F: FnOnce(&mut dyn FnMut() -> EntityId) -> Batch;

    /// Append one edge. `Ok(false)` when an endpoint does not exist.
    fn put_relationship(&self, rel: EntityRelationship) -> Result<bool>;

    /// Atomically remove a media item, its entities and every edge touching
    /// them.
    fn remove_media(&self, media_id: &str) -> Result<Removal>;

    /// Store drafts for a media item without any edges.
    ///
    /// Default: commit an edge-less batch.
    fn put_entities(&self, media_id: &str, drafts: Vec<EntityDraft>) -> Result<Vec<EntityId>> {
        let mut ids = Vec::new();
        self.commit_with(|next_id| {
            let entities: Vec<MediaEntity> = drafts
                .into_iter()
                .map(|d| MediaEntity::from_draft(next_id(), media_id, d))
                .collect();
            ids = entities.iter().map(|e| e.id).collect();
            Batch {
                media_id: media_id.to_owned(),
                entities,
                relationships: Vec::new(),
            }
        })?;
        Ok(ids)
    }
}
