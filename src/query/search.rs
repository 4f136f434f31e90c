//! Lexical seeding plus bounded graph expansion.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::model::*;
use crate::storage::GraphState;

/// Multiplier applied per hop on top of the edge weight.
pub const EXPANSION_DECAY: f64 = 0.5;

pub const DEFAULT_DEPTH: usize = 2;
pub const DEFAULT_LIMIT: usize = 20;

fn default_depth() -> usize { DEFAULT_DEPTH }
fn default_limit() -> usize { DEFAULT_LIMIT }

/// Seed filters. They restrict which lexical hits become seeds; entities
/// reached by expansion are admitted regardless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub media_id: Option<String>,
    #[serde(rename = "type", default)]
    pub entity_type: Option<EntityType>,
}

impl SearchFilters {
    pub fn media(media_id: impl Into<String>) -> Self {
        Self { media_id: Some(media_id.into()), entity_type: None }
    }

    pub fn of_type(entity_type: impl Into<EntityType>) -> Self {
        Self { media_id: None, entity_type: Some(entity_type.into()) }
    }

    fn admits(&self, entity: &MediaEntity) -> bool {
        if let Some(media_id) = self.media_id.as_deref().filter(|m| !m.is_empty()) {
            if entity.media_id != media_id {
                return false;
            }
        }
        if let Some(kind) = self.entity_type.as_ref().filter(|k| !k.as_str().is_empty()) {
            if &entity.entity_type != kind {
                return false;
            }
        }
        true
    }
}

/// A graph search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
    #[serde(default = "default_depth")]
    pub depth: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: None,
            depth: DEFAULT_DEPTH,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Ranked entities (truncated to `limit`), every edge among the admitted
/// set, and the score of every admitted entity (not truncated).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub entities: Vec<MediaEntity>,
    pub relationships: Vec<EntityRelationship>,
    pub relevance_scores: HashMap<EntityId, f64>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relevance_scores.is_empty()
    }

    pub fn score(&self, id: EntityId) -> Option<f64> {
        self.relevance_scores.get(&id).copied()
    }
}

/// Lower-cased whitespace tokens of a query.
pub fn tokenize(query: &str) -> SmallVec<[String; 4]> {
    query.to_lowercase().split_whitespace().map(str::to_owned).collect()
}

/// Share of query tokens found as substrings of `content`.
pub fn lexical_score(tokens: &[String], content: &str) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let content = content.to_lowercase();
    let per_token = 1.0 / tokens.len() as f64;
    tokens
        .iter()
        .filter(|t| content.contains(t.as_str()))
        .map(|_| per_token)
        .sum()
}

/// Run a search against one consistent state snapshot.
///
/// 1. Seeds: every entity with a positive lexical score that passes the
///    filters, in creation order.
/// 2. Expansion, `depth` passes over the edge list: an edge whose source is
///    admitted and whose target is not admits the target with
///    `source_score * weight * EXPANSION_DECAY`. The first score assigned to
///    an entity is kept.
/// 3. Edges with both endpoints admitted are returned.
/// 4. Entities are ranked by score (stable) and cut to `limit`.
pub fn search(state: &GraphState, request: &SearchRequest) -> SearchResult {
    let tokens = tokenize(&request.query);
    if tokens.is_empty() {
        return SearchResult::default();
    }

    let mut admitted: Vec<EntityId> = Vec::new();
    let mut scores: HashMap<EntityId, f64> = HashMap::new();

    for entity in state.entities() {
        let score = lexical_score(&tokens, &entity.content);
        if score <= 0.0 {
            continue;
        }
        if let Some(filters) = &request.filters {
            if !filters.admits(entity) {
                continue;
            }
        }
        admitted.push(entity.id);
        scores.insert(entity.id, score);
    }
    let seeds = admitted.len();

    for _ in 0..request.depth {
        let before = admitted.len();
        for rel in state.relationships() {
            let Some(&source_score) = scores.get(&rel.source_id) else {
                continue;
            };
            if scores.contains_key(&rel.target_id) || !state.contains(rel.target_id) {
                continue;
            }
            scores.insert(rel.target_id, source_score * rel.weight * EXPANSION_DECAY);
            admitted.push(rel.target_id);
        }
        if admitted.len() == before {
            break;
        }
    }

    let relationships: Vec<EntityRelationship> = state
        .relationships()
        .iter()
        .filter(|r| scores.contains_key(&r.source_id) && scores.contains_key(&r.target_id))
        .cloned()
        .collect();

    let mut ranked: Vec<(EntityId, f64)> = admitted.iter().map(|id| (*id, scores[id])).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(request.limit);

    let entities = ranked
        .iter()
        .filter_map(|(id, _)| state.entity(*id).cloned())
        .collect();

    debug!(
        query = %request.query,
        seeds,
        expanded = admitted.len() - seeds,
        relationships = relationships.len(),
        "search complete"
    );

    SearchResult {
        entities,
        relationships,
        relevance_scores: scores,
    }
}
