//! Whole-graph aggregates, recomputed on every call.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::storage::GraphState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_entities: usize,
    pub total_relationships: usize,
    pub entity_types: HashMap<String, usize>,
    pub relationship_types: HashMap<String, usize>,
}

pub fn stats(state: &GraphState) -> GraphStats {
    let mut entity_types: HashMap<String, usize> = HashMap::new();
    for entity in state.entities() {
        *entity_types.entry_ref(entity.entity_type.as_str()).or_insert(0) += 1;
    }

    let mut relationship_types: HashMap<String, usize> = HashMap::new();
    for rel in state.relationships() {
        *relationship_types.entry_ref(rel.relationship_type.as_str()).or_insert(0) += 1;
    }

    GraphStats {
        total_entities: state.entity_count(),
        total_relationships: state.relationship_count(),
        entity_types,
        relationship_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::storage::Batch;

    #[test]
    fn test_histograms() {
        let mut state = GraphState::new();
        let entities = vec![
            MediaEntity::from_draft(EntityId(1), "m", EntityDraft::new("scene", "kitchen")),
            MediaEntity::from_draft(EntityId(2), "m", EntityDraft::new("object", "pan")),
            MediaEntity::from_draft(EntityId(3), "m", EntityDraft::new("object", "knife")),
        ];
        let relationships = vec![
            EntityRelationship::new(EntityId(1), EntityId(2), RelationshipType::Contains, 0.9),
            EntityRelationship::new(EntityId(2), EntityId(3), RelationshipType::Follows, 1.0),
        ];
        state.insert_batch(Batch { media_id: "m".into(), entities, relationships });

        let stats = stats(&state);
        assert_eq!(stats.total_entities, 3);
        assert_eq!(stats.total_relationships, 2);
        assert_eq!(stats.entity_types["object"], 2);
        assert_eq!(stats.entity_types["scene"], 1);
        assert_eq!(stats.relationship_types["contains"], 1);
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(stats(&GraphState::new()), GraphStats::default());
    }
}
