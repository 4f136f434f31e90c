//! Per-media visualization view.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::model::*;
use crate::storage::GraphState;

/// Display labels are cut to this many characters.
pub const LABEL_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphNode {
    pub id: EntityId,
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphEdge {
    pub source: EntityId,
    pub target: EntityId,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subgraph {
    pub nodes: Vec<SubgraphNode>,
    pub edges: Vec<SubgraphEdge>,
}

/// Nodes of one media item and the edges with both endpoints inside it.
pub fn subgraph(state: &GraphState, media_id: &str) -> Subgraph {
    let members: HashSet<EntityId> = state.media_entity_ids(media_id).iter().copied().collect();
    if members.is_empty() {
        return Subgraph::default();
    }

    let nodes = state
        .media_entities(media_id)
        .map(|e| SubgraphNode {
            id: e.id,
            label: e.content.chars().take(LABEL_MAX_CHARS).collect(),
            entity_type: e.entity_type.clone(),
        })
        .collect();

    let edges = state
        .relationships()
        .iter()
        .filter(|r| members.contains(&r.source_id) && members.contains(&r.target_id))
        .map(|r| SubgraphEdge {
            source: r.source_id,
            target: r.target_id,
            relationship_type: r.relationship_type.clone(),
            weight: r.weight,
        })
        .collect();

    Subgraph { nodes, edges }
}
