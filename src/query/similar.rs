//! Structural similarity: neighbours ranked by total incident edge weight.

use hashbrown::HashMap;

use crate::model::*;
use crate::storage::GraphState;

pub const DEFAULT_SIMILAR_LIMIT: usize = 10;

/// Neighbours of `entity_id` ordered by the summed weight of every edge
/// between them, in either direction. Outbound and inbound ends are counted
/// separately, so a self-loop adds its weight twice. Ties keep first-seen
/// order. Empty for an unknown entity.
pub fn find_similar(state: &GraphState, entity_id: EntityId, limit: usize) -> Vec<MediaEntity> {
    if !state.contains(entity_id) {
        return Vec::new();
    }

    let mut order: Vec<EntityId> = Vec::new();
    let mut totals: HashMap<EntityId, f64> = HashMap::new();
    for rel in state.relationships() {
        let ends = [(rel.source_id, rel.target_id), (rel.target_id, rel.source_id)];
        for (near, neighbour) in ends {
            if near != entity_id {
                continue;
            }
            let total = totals.entry(neighbour).or_insert_with(|| {
                order.push(neighbour);
                0.0
            });
            *total += rel.weight;
        }
    }

    let mut ranked: Vec<(EntityId, f64)> = order.into_iter().map(|id| (id, totals[&id])).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(limit)
        .filter_map(|(id, _)| state.entity(id).cloned())
        .collect()
}
