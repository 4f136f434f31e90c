//! # media-graph: Media Knowledge Graph
//!
//! An in-memory knowledge graph over time-anchored media entities (objects,
//! scenes, transcript lines, actions) with automatic timeline relationships
//! and graph-expansion search.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `GraphStore` is the contract between the façade and storage
//! 2. **Clean DTOs**: `MediaEntity`, `EntityRelationship` cross all boundaries
//! 3. **Pure algorithms**: inference and queries are functions over a `GraphState` snapshot
//! 4. **Local first**: external enrichment never changes or blocks the local result
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use media_graph::{EntityDraft, MediaGraph, SearchRequest};
//!
//! # async fn example() -> media_graph::Result<()> {
//! let graph = MediaGraph::open_memory().await?;
//!
//! graph.add_to_graph("clip-1", vec![
//!     EntityDraft::new("scene", "workshop").with_span(0, 10_000),
//!     EntityDraft::new("object", "red brick").with_span(1_000, 2_000),
//! ], true).await?;
//!
//! let result = graph.search(&SearchRequest::new("brick")).await;
//! for entity in &result.entities {
//!     println!("{} {:?}", entity.content, result.score(entity.id));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | (default) | Library: model, store, inference, queries |
//! | `http` | axum router over the façade |
//! | `remote-enricher` | `RemoteEnricher` (reqwest) |
//! | `server` | `media-graph-server` binary |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod inference;
pub mod query;
pub mod ingest;
pub mod enrich;
pub mod config;
#[cfg(feature = "http")]
pub mod http;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    EntityDraft, EntityId, EntityRelationship, EntityType, MediaEntity, Metadata,
    RelationshipType,
};

// ============================================================================
// Re-exports: Storage, queries, ingestion
// ============================================================================

pub use storage::{GraphStore, MemoryStore, GraphState};
pub use query::{GraphStats, SearchFilters, SearchRequest, SearchResult, Subgraph};
pub use ingest::{IngestSummary, IngestText};
pub use enrich::{Enricher, Enrichment, NoopEnricher};
pub use config::GraphConfig;

// ============================================================================
// Top-level MediaGraph handle
// ============================================================================

/// The primary entry point. A `MediaGraph` owns a store and an enricher and
/// exposes the public graph operations.
///
/// Construct one at process start and share it (e.g. behind an `Arc`) with
/// every request handler; call `shutdown()` on the way out.
pub struct MediaGraph<S: GraphStore = MemoryStore> {
    store: S,
    enricher: Arc<dyn Enricher>,
    config: GraphConfig,
}

impl<S: GraphStore> MediaGraph<S> {
    /// Create a MediaGraph over the given store.
    pub fn with_store(store: S, config: GraphConfig) -> Result<Self> {
        config.validate()?;
        info!(store = store.name(), max_batch_size = config.max_batch_size, "media graph ready");
        Ok(Self {
            store,
            enricher: Arc::new(NoopEnricher),
            config,
        })
    }

    /// Replace the enrichment backend.
    pub fn with_enricher(mut self, enricher: impl Enricher) -> Self {
        info!(enricher = enricher.name(), "enrichment backend attached");
        self.enricher = Arc::new(enricher);
        self
    }

    /// Access the underlying store (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn enricher_name(&self) -> &str {
        self.enricher.name()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Store a batch of entities for `media_id`, inferring timeline edges
    /// among them when `auto_relate` is set.
    ///
    /// Entities and edges become visible together. Fails only when the
    /// batch exceeds `max_batch_size`, in which case nothing is stored.
    pub async fn add_to_graph(
        &self,
        media_id: &str,
        drafts: Vec<EntityDraft>,
        auto_relate: bool,
    ) -> Result<IngestSummary> {
        let started = Instant::now();

        if drafts.len() > self.config.max_batch_size {
            warn!(%media_id, size = drafts.len(), max = self.config.max_batch_size, "rejecting oversized batch");
            return Err(Error::BatchTooLarge {
                size: drafts.len(),
                max: self.config.max_batch_size,
            });
        }

        let mut entities = Vec::new();
        let report = self.store.commit_with(|next_id| {
            let batch = ingest::prepare_batch(next_id, media_id, drafts, auto_relate);
            entities = batch.entities.clone();
            batch
        })?;

        self.enrich(Enrichment::Ingest { media_id, entities: &entities }).await;

        Ok(IngestSummary {
            media_id: media_id.to_owned(),
            entities_created: report.entities_created,
            relationships_created: report.relationships_created,
            processing_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }

    /// Store one synthesized entity from raw text and relate it.
    pub async fn ingest_text(&self, request: IngestText) -> Result<IngestSummary> {
        let (media_id, draft) = request.into_draft();
        self.add_to_graph(&media_id, vec![draft], true).await
    }

    /// Add a producer-declared edge. `Ok(None)` when either endpoint is
    /// unknown.
    pub async fn relate(
        &self,
        source_id: EntityId,
        target_id: EntityId,
        relationship_type: impl Into<RelationshipType>,
        weight: f64,
        metadata: Metadata,
    ) -> Result<Option<EntityRelationship>> {
        if !weight.is_finite() {
            return Err(Error::InvalidWeight(weight));
        }
        let rel = EntityRelationship::new(source_id, target_id, relationship_type, weight)
            .with_metadata(metadata);
        if self.store.put_relationship(rel.clone())? {
            debug!(%source_id, %target_id, rel_type = %rel.relationship_type, "relationship added");
            Ok(Some(rel))
        } else {
            Ok(None)
        }
    }

    /// Remove a media item with all its entities and every edge touching
    /// them. Returns the number of entities removed (0 when unknown).
    pub async fn remove_media(&self, media_id: &str) -> Result<usize> {
        Ok(self.store.remove_media(media_id)?.entities_removed)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Lexical search expanded through the graph. Never fails.
    pub async fn search(&self, request: &SearchRequest) -> SearchResult {
        self.enrich(Enrichment::Search { query: &request.query, limit: request.limit }).await;
        query::search(&self.store.snapshot(), request)
    }

    /// Neighbours of `entity_id` by total incident edge weight.
    pub async fn find_similar(&self, entity_id: EntityId, limit: usize) -> Vec<MediaEntity> {
        query::find_similar(&self.store.snapshot(), entity_id, limit)
    }

    pub async fn get_entity(&self, entity_id: EntityId) -> Option<MediaEntity> {
        self.store.get_entity(entity_id)
    }

    pub async fn get_media_entities(&self, media_id: &str) -> Vec<MediaEntity> {
        self.store.get_by_media(media_id)
    }

    pub async fn get_subgraph(&self, media_id: &str) -> Subgraph {
        query::subgraph(&self.store.snapshot(), media_id)
    }

    pub async fn get_stats(&self) -> GraphStats {
        query::stats(&self.store.snapshot())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Flush and close the store.
    pub async fn shutdown(&self) -> Result<()> {
        info!(store = self.store.name(), "shutting down media graph");
        self.store.shutdown()
    }

    async fn enrich(&self, request: Enrichment<'_>) {
        if let Err(e) = self.enricher.enrich(request).await {
            warn!(enricher = self.enricher.name(), kind = request.kind(), error = %e, "enrichment failed, continuing with local result");
        }
    }
}

/// In-memory graph for testing and embedding.
impl MediaGraph<MemoryStore> {
    pub async fn open_memory() -> Result<Self> {
        Self::with_store(MemoryStore::new(), GraphConfig::default())
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Batch too large: {size} entities exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Invalid relationship weight: {0}")]
    InvalidWeight(f64),

    #[error("Enrichment error: {0}")]
    Enrichment(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
