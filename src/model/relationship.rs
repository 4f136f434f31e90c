//! Relationship (edge) between two media entities.

use std::fmt;

use serde::{Deserialize, Serialize};
use super::{EntityId, Metadata};

/// Edge type.
///
/// `Follows`, `RelatedTo` and `Contains` are produced by inference. The rest
/// only arrive through explicit calls; unrecognised names are kept in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipType {
    Follows,
    RelatedTo,
    Contains,
    PartOf,
    Depicts,
    SpokenBy,
    Other(String),
}

impl RelationshipType {
    pub fn as_str(&self) -> &str {
        match self {
            RelationshipType::Follows => "follows",
            RelationshipType::RelatedTo => "related_to",
            RelationshipType::Contains => "contains",
            RelationshipType::PartOf => "part_of",
            RelationshipType::Depicts => "depicts",
            RelationshipType::SpokenBy => "spoken_by",
            RelationshipType::Other(s) => s,
        }
    }

    /// Types the inference engine emits.
    pub fn is_inferred(&self) -> bool {
        matches!(
            self,
            RelationshipType::Follows | RelationshipType::RelatedTo | RelationshipType::Contains
        )
    }
}

impl From<&str> for RelationshipType {
    fn from(s: &str) -> Self {
        match s {
            "follows" => RelationshipType::Follows,
            "related_to" => RelationshipType::RelatedTo,
            "contains" => RelationshipType::Contains,
            "part_of" => RelationshipType::PartOf,
            "depicts" => RelationshipType::Depicts,
            "spoken_by" => RelationshipType::SpokenBy,
            other => RelationshipType::Other(other.to_owned()),
        }
    }
}

impl From<String> for RelationshipType {
    fn from(s: String) -> Self {
        match RelationshipType::from(s.as_str()) {
            RelationshipType::Other(_) => RelationshipType::Other(s),
            known => known,
        }
    }
}

impl From<RelationshipType> for String {
    fn from(t: RelationshipType) -> Self {
        match t {
            RelationshipType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, weighted edge.
///
/// The weight is a decay multiplier for search expansion, conventionally in
/// `[0, 1]` but not clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRelationship {
    pub source_id: EntityId,
    pub target_id: EntityId,
    pub relationship_type: RelationshipType,
    pub weight: f64,
    #[serde(default)]
    pub metadata: Metadata,
}

impl EntityRelationship {
    pub fn new(
        source_id: EntityId,
        target_id: EntityId,
        relationship_type: impl Into<RelationshipType>,
        weight: f64,
    ) -> Self {
        Self {
            source_id,
            target_id,
            relationship_type: relationship_type.into(),
            weight,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_type_serializes_as_plain_string() {
        let rel = EntityRelationship::new(EntityId(1), EntityId(2), RelationshipType::RelatedTo, 0.8);
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json["relationship_type"], "related_to");
        assert_eq!(json["source_id"], 1);

        let back: EntityRelationship = serde_json::from_value(json).unwrap();
        assert_eq!(back, rel);
    }

    #[test]
    fn test_only_timeline_types_are_inferred() {
        assert!(RelationshipType::Contains.is_inferred());
        assert!(!RelationshipType::SpokenBy.is_inferred());
        assert!(!RelationshipType::from("mentions").is_inferred());
    }
}
