//! The graph's durable state model: entities, relationships, media index.
//!
//! `GraphState` is plain data with no locking of its own. Backends wrap one
//! instance behind a single lock so that every mutation below is observed
//! as a whole or not at all.

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::model::*;

/// One ingestion call's worth of entities and the edges inferred for them.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub media_id: String,
    pub entities: Vec<MediaEntity>,
    pub relationships: Vec<EntityRelationship>,
}

/// What a committed batch actually wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub entities_created: usize,
    pub relationships_created: usize,
}

/// What `remove_media` deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub entities_removed: usize,
    pub relationships_removed: usize,
}

/// Entities keyed by id (iteration is creation order), the edge list in
/// insertion order, and `media_id → entity ids`.
#[derive(Debug, Clone, Default)]
pub struct GraphState {
    entities: BTreeMap<EntityId, MediaEntity>,
    relationships: Vec<EntityRelationship>,
    media_index: HashMap<String, Vec<EntityId>>,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn entity(&self, id: EntityId) -> Option<&MediaEntity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// All entities, oldest first.
    pub fn entities(&self) -> impl Iterator<Item = &MediaEntity> {
        self.entities.values()
    }

    pub fn relationships(&self) -> &[EntityRelationship] {
        &self.relationships
    }

    /// Entity ids for one media item in ingestion order. Empty when unknown.
    pub fn media_entity_ids(&self, media_id: &str) -> &[EntityId] {
        self.media_index.get(media_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn media_entities<'a>(&'a self, media_id: &str) -> impl Iterator<Item = &'a MediaEntity> + use<'a> {
        self.media_entity_ids(media_id)
            .iter()
            .filter_map(|id| self.entities.get(id))
    }

    pub fn media_count(&self) -> usize {
        self.media_index.len()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Insert a batch: entities, their media index entries, then edges.
    ///
    /// Edges whose endpoints are unknown after the entities land are dropped.
    pub fn insert_batch(&mut self, batch: Batch) -> CommitReport {
        let Batch { media_id, entities, relationships } = batch;
        let mut report = CommitReport::default();

        if !entities.is_empty() {
            let index = self.media_index.entry(media_id).or_default();
            for entity in entities {
                index.push(entity.id);
                self.entities.insert(entity.id, entity);
                report.entities_created += 1;
            }
        }

        for rel in relationships {
            if self.insert_relationship(rel) {
                report.relationships_created += 1;
            }
        }

        report
    }

    /// Append an edge. Returns false (and stores nothing) when either
    /// endpoint does not exist.
    pub fn insert_relationship(&mut self, rel: EntityRelationship) -> bool {
        if !self.contains(rel.source_id) || !self.contains(rel.target_id) {
            return false;
        }
        self.relationships.push(rel);
        true
    }

    /// Remove a media item's entities, every edge touching them, and its
    /// index entry.
    pub fn remove_media(&mut self, media_id: &str) -> Removal {
        let Some(ids) = self.media_index.remove(media_id) else {
            return Removal::default();
        };
        let doomed: HashSet<EntityId> = ids.iter().copied().collect();

        let before = self.relationships.len();
        self.relationships
            .retain(|r| !doomed.contains(&r.source_id) && !doomed.contains(&r.target_id));

        for id in &ids {
            self.entities.remove(id);
        }

        Removal {
            entities_removed: ids.len(),
            relationships_removed: before - self.relationships.len(),
        }
    }
}
