//! Route handlers. Thin: decode, call the façade, encode.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::*;
use crate::query::{DEFAULT_SIMILAR_LIMIT, GraphStats, SearchRequest, SearchResult, Subgraph};
use crate::{GraphStore, IngestSummary, IngestText};
use super::{ApiError, AppState, SERVICE_NAME, VERSION};

// ============================================================================
// Request / response bodies
// ============================================================================

fn yes() -> bool { true }
fn default_similar_limit() -> usize { DEFAULT_SIMILAR_LIMIT }
fn default_weight() -> f64 { 1.0 }

#[derive(Debug, Deserialize)]
pub struct AddToGraphRequest {
    pub media_id: String,
    pub entities: Vec<EntityDraft>,
    #[serde(default = "yes")]
    pub auto_relate: bool,
}

#[derive(Debug, Deserialize)]
pub struct SimilarRequest {
    pub entity_id: EntityId,
    #[serde(default = "default_similar_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct RelateRequest {
    pub source_id: EntityId,
    pub target_id: EntityId,
    #[serde(alias = "type")]
    pub relationship_type: RelationshipType,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct RelateResponse {
    pub created: bool,
    pub relationship: Option<EntityRelationship>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub removed: usize,
    pub media_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
    pub enricher: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Service
// ============================================================================

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": SERVICE_NAME,
        "version": VERSION,
        "description": "Knowledge graph over time-anchored media entities",
        "endpoints": {
            "health": "GET /health",
            "add": "POST /graph/add",
            "search": "POST /graph/search",
            "similar": "POST /graph/similar",
            "relate": "POST /graph/relate",
            "stats": "GET /graph/stats",
            "entities": "GET /media/{media_id}/entities",
            "subgraph": "GET /media/{media_id}/subgraph",
            "remove": "DELETE /media/{media_id}",
            "ingest_text": "POST /ingest/text",
        },
    }))
}

pub async fn health<S: GraphStore>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
        store: state.graph.store().name(),
        enricher: state.graph.enricher_name().to_owned(),
        timestamp: Utc::now(),
    })
}

// ============================================================================
// Graph
// ============================================================================

pub async fn add_to_graph<S: GraphStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<AddToGraphRequest>,
) -> Result<Json<IngestSummary>, ApiError> {
    let summary = state.graph.add_to_graph(&req.media_id, req.entities, req.auto_relate).await?;
    Ok(Json(summary))
}

pub async fn search<S: GraphStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResult> {
    Json(state.graph.search(&req).await)
}

pub async fn find_similar<S: GraphStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<SimilarRequest>,
) -> Json<Vec<MediaEntity>> {
    Json(state.graph.find_similar(req.entity_id, req.limit).await)
}

pub async fn relate<S: GraphStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<RelateRequest>,
) -> Result<Json<RelateResponse>, ApiError> {
    let relationship = state
        .graph
        .relate(req.source_id, req.target_id, req.relationship_type, req.weight, req.metadata)
        .await?;
    Ok(Json(RelateResponse {
        created: relationship.is_some(),
        relationship,
    }))
}

pub async fn stats<S: GraphStore>(State(state): State<AppState<S>>) -> Json<GraphStats> {
    Json(state.graph.get_stats().await)
}

// ============================================================================
// Media
// ============================================================================

pub async fn media_entities<S: GraphStore>(
    State(state): State<AppState<S>>,
    Path(media_id): Path<String>,
) -> Json<Vec<MediaEntity>> {
    Json(state.graph.get_media_entities(&media_id).await)
}

pub async fn subgraph<S: GraphStore>(
    State(state): State<AppState<S>>,
    Path(media_id): Path<String>,
) -> Json<Subgraph> {
    Json(state.graph.get_subgraph(&media_id).await)
}

pub async fn remove_media<S: GraphStore>(
    State(state): State<AppState<S>>,
    Path(media_id): Path<String>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let removed = state.graph.remove_media(&media_id).await?;
    Ok(Json(RemoveResponse { removed, media_id }))
}

// ============================================================================
// Ingest
// ============================================================================

pub async fn ingest_text<S: GraphStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<IngestText>,
) -> Result<Json<IngestSummary>, ApiError> {
    Ok(Json(state.graph.ingest_text(req).await?))
}
