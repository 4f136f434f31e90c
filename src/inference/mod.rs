//! # Relationship Inference
//!
//! Derives timeline edges among the entities of one ingestion batch.
//!
//! | Edge | Condition | Weight |
//! |------|-----------|--------|
//! | `follows` | consecutive in timeline order | 1.0 |
//! | `related_to` | half-open intervals intersect | 0.8 |
//! | `contains` | source is a scene, target nested inside it | 0.9 |
//!
//! Inference only looks at the batch it is given; entities stored by an
//! earlier call for the same media item are not revisited. The overlap and
//! containment scans are pairwise, so cost grows with the square of the
//! batch size. `GraphConfig::max_batch_size` bounds it.

use crate::model::*;

pub const FOLLOWS_WEIGHT: f64 = 1.0;
pub const OVERLAP_WEIGHT: f64 = 0.8;
pub const CONTAINS_WEIGHT: f64 = 0.9;

/// Infer edges for a freshly created batch.
///
/// Entities are ordered by `start_ms` (missing as 0, stable for ties). For
/// each entity in that order the edges are emitted as: `follows` from its
/// predecessor, `related_to` to every later overlapping entity, then
/// `contains` to every nested entity if it is a scene. Search expansion
/// scans edges in insertion order, so this order is observable.
pub fn infer_relationships(batch: &[MediaEntity]) -> Vec<EntityRelationship> {
    let mut ordered: Vec<&MediaEntity> = batch.iter().collect();
    ordered.sort_by_key(|e| e.timeline_key());

    let mut edges = Vec::new();
    for (i, current) in ordered.iter().enumerate() {
        if i > 0 {
            edges.push(EntityRelationship::new(
                ordered[i - 1].id,
                current.id,
                RelationshipType::Follows,
                FOLLOWS_WEIGHT,
            ));
        }

        for later in &ordered[i + 1..] {
            if current.overlaps(later) {
                edges.push(EntityRelationship::new(
                    current.id,
                    later.id,
                    RelationshipType::RelatedTo,
                    OVERLAP_WEIGHT,
                ));
            }
        }

        if current.entity_type == EntityType::Scene {
            for other in &ordered {
                if other.id != current.id && current.encloses(other) {
                    edges.push(EntityRelationship::new(
                        current.id,
                        other.id,
                        RelationshipType::Contains,
                        CONTAINS_WEIGHT,
                    ));
                }
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entity(id: u64, kind: &str, span: Option<(i64, i64)>) -> MediaEntity {
        let mut draft = EntityDraft::new(kind, format!("entity {id}"));
        if let Some((start, end)) = span {
            draft = draft.with_span(start, end);
        }
        MediaEntity::from_draft(EntityId(id), "clip", draft)
    }

    fn summary(edges: &[EntityRelationship]) -> Vec<(u64, u64, &str)> {
        edges
            .iter()
            .map(|r| (r.source_id.0, r.target_id.0, r.relationship_type.as_str()))
            .collect()
    }

    #[test]
    fn test_single_entity_yields_nothing() {
        assert!(infer_relationships(&[entity(1, "object", Some((0, 10)))]).is_empty());
        assert!(infer_relationships(&[]).is_empty());
    }

    #[test]
    fn test_untimed_batch_is_a_chain() {
        let batch: Vec<_> = (1..=5).map(|i| entity(i, "transcript", None)).collect();
        let edges = infer_relationships(&batch);
        assert_eq!(
            summary(&edges),
            vec![(1, 2, "follows"), (2, 3, "follows"), (3, 4, "follows"), (4, 5, "follows")]
        );
        assert!(edges.iter().all(|e| e.weight == FOLLOWS_WEIGHT));
    }

    #[test]
    fn test_sorts_by_start_before_chaining() {
        let batch = vec![
            entity(1, "object", Some((500, 600))),
            entity(2, "object", Some((0, 100))),
            entity(3, "object", None),
        ];
        // id 3 has no start and sorts as 0, after id 2 (stable).
        let edges = infer_relationships(&batch);
        assert_eq!(summary(&edges), vec![(2, 3, "follows"), (3, 1, "follows")]);
    }

    #[test]
    fn test_overlap_and_touching() {
        let batch = vec![
            entity(1, "object", Some((0, 100))),
            entity(2, "object", Some((50, 150))),
            entity(3, "object", Some((150, 200))),
        ];
        let edges = infer_relationships(&batch);
        assert_eq!(
            summary(&edges),
            vec![(1, 2, "related_to"), (1, 2, "follows"), (2, 3, "follows")]
        );
        assert_eq!(edges[0].weight, OVERLAP_WEIGHT);
    }

    #[test]
    fn test_scene_contains_nested_entities() {
        let batch = vec![
            entity(1, "scene", Some((0, 1000))),
            entity(2, "object", Some((100, 200))),
        ];
        let edges = infer_relationships(&batch);
        assert_eq!(
            summary(&edges),
            vec![(1, 2, "related_to"), (1, 2, "contains"), (1, 2, "follows")]
        );
        let contains = edges.iter().find(|e| e.relationship_type == RelationshipType::Contains).unwrap();
        assert_eq!(contains.weight, CONTAINS_WEIGHT);
    }

    #[test]
    fn test_identical_intervals_overlap() {
        let batch = vec![
            entity(1, "object", Some((10, 20))),
            entity(2, "object", Some((10, 20))),
        ];
        assert_eq!(summary(&infer_relationships(&batch)), vec![(1, 2, "related_to"), (1, 2, "follows")]);
    }

    #[test]
    fn test_zero_length_intervals_only_chain() {
        let batch = vec![
            entity(1, "object", Some((10, 10))),
            entity(2, "object", Some((10, 10))),
        ];
        assert_eq!(summary(&infer_relationships(&batch)), vec![(1, 2, "follows")]);
    }

    #[test]
    fn test_missing_or_inverted_bounds_never_overlap_or_nest() {
        let mut half_open = entity(2, "object", None);
        half_open.start_ms = Some(100);
        let batch = vec![
            entity(1, "scene", Some((0, 1000))),
            half_open,
            entity(3, "object", Some((400, 300))),
        ];
        let edges = infer_relationships(&batch);
        assert!(edges.iter().all(|e| e.relationship_type == RelationshipType::Follows));
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_entity_nested_in_two_scenes() {
        let batch = vec![
            entity(1, "scene", Some((0, 1000))),
            entity(2, "scene", Some((0, 500))),
            entity(3, "action", Some((100, 200))),
        ];
        let edges = infer_relationships(&batch);
        let contains: Vec<_> = summary(&edges)
            .into_iter()
            .filter(|(_, _, t)| *t == "contains")
            .collect();
        assert_eq!(contains, vec![(1, 2, "contains"), (1, 3, "contains"), (2, 3, "contains")]);
    }
}
