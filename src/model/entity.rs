//! Media entity, a time-anchored fact extracted from a media item.

use std::fmt;

use serde::{Deserialize, Serialize};
use super::Metadata;

/// Opaque entity identifier.
///
/// Allocated by the store from a monotonic counter, so numeric order is
/// creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// EntityType
// ============================================================================

/// Producer-declared entity kind.
///
/// The named variants cover what the annotators emit today; anything else
/// is carried verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Scene,
    #[default]
    Object,
    Person,
    Action,
    Audio,
    Transcript,
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Scene => "scene",
            EntityType::Object => "object",
            EntityType::Person => "person",
            EntityType::Action => "action",
            EntityType::Audio => "audio",
            EntityType::Transcript => "transcript",
            EntityType::Other(s) => s,
        }
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        match s {
            "scene" => EntityType::Scene,
            "object" => EntityType::Object,
            "person" => EntityType::Person,
            "action" => EntityType::Action,
            "audio" => EntityType::Audio,
            "transcript" => EntityType::Transcript,
            other => EntityType::Other(other.to_owned()),
        }
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        match EntityType::from(s.as_str()) {
            EntityType::Other(_) => EntityType::Other(s),
            known => known,
        }
    }
}

impl From<EntityType> for String {
    fn from(t: EntityType) -> Self {
        match t {
            EntityType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// EntityDraft (producer input)
// ============================================================================

/// An entity as handed over by an upstream annotator, before it has an id.
///
/// Deserialization is lenient: missing fields take defaults and unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDraft {
    #[serde(rename = "type", alias = "entity_type", default)]
    pub entity_type: EntityType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub start_ms: Option<i64>,
    #[serde(default)]
    pub end_ms: Option<i64>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl EntityDraft {
    pub fn new(entity_type: impl Into<EntityType>, content: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_span(mut self, start_ms: i64, end_ms: i64) -> Self {
        self.start_ms = Some(start_ms);
        self.end_ms = Some(end_ms);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// MediaEntity
// ============================================================================

/// A stored entity. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEntity {
    pub id: EntityId,
    pub media_id: String,
    pub entity_type: EntityType,
    pub content: String,
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
    pub metadata: Metadata,
}

impl MediaEntity {
    pub fn from_draft(id: EntityId, media_id: impl Into<String>, draft: EntityDraft) -> Self {
        Self {
            id,
            media_id: media_id.into(),
            entity_type: draft.entity_type,
            content: draft.content,
            start_ms: draft.start_ms,
            end_ms: draft.end_ms,
            metadata: draft.metadata,
        }
    }

    /// Temporal extent `(start, end)`. `None` when either bound is missing
    /// or the bounds are inverted.
    pub fn span(&self) -> Option<(i64, i64)> {
        match (self.start_ms, self.end_ms) {
            (Some(start), Some(end)) if end >= start => Some((start, end)),
            _ => None,
        }
    }

    /// Key used to order a batch on the timeline. Missing start sorts as 0.
    pub fn timeline_key(&self) -> i64 {
        self.start_ms.unwrap_or(0)
    }

    /// Half-open interval intersection: `a.start < b.end && b.start < a.end`.
    pub fn overlaps(&self, other: &MediaEntity) -> bool {
        match (self.span(), other.span()) {
            (Some((a_start, a_end)), Some((b_start, b_end))) => a_start < b_end && b_start < a_end,
            _ => false,
        }
    }

    /// Whether `other`'s interval is nested inside this one (bounds inclusive).
    pub fn encloses(&self, other: &MediaEntity) -> bool {
        match (self.span(), other.span()) {
            (Some((a_start, a_end)), Some((b_start, b_end))) => a_start <= b_start && a_end >= b_end,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: u64, start: Option<i64>, end: Option<i64>) -> MediaEntity {
        MediaEntity {
            id: EntityId(id),
            media_id: "m".into(),
            entity_type: EntityType::Object,
            content: String::new(),
            start_ms: start,
            end_ms: end,
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_entity_type_round_trips_through_strings() {
        assert_eq!(EntityType::from("scene"), EntityType::Scene);
        assert_eq!(EntityType::from("caption"), EntityType::Other("caption".into()));
        assert_eq!(String::from(EntityType::Transcript), "transcript");
        assert_eq!(String::from(EntityType::Other("caption".into())), "caption");
    }

    #[test]
    fn test_draft_defaults_from_sparse_json() {
        let draft: EntityDraft = serde_json::from_str(r#"{"label": "ignored"}"#).unwrap();
        assert_eq!(draft.entity_type, EntityType::Object);
        assert_eq!(draft.content, "");
        assert!(draft.start_ms.is_none());
        assert!(draft.metadata.is_empty());

        let draft: EntityDraft =
            serde_json::from_str(r#"{"type": "scene", "content": "kitchen", "start_ms": 0, "end_ms": 10}"#).unwrap();
        assert_eq!(draft.entity_type, EntityType::Scene);
        assert_eq!(draft.end_ms, Some(10));
    }

    #[test]
    fn test_inverted_span_has_no_extent() {
        assert_eq!(entity(1, Some(100), Some(50)).span(), None);
        assert_eq!(entity(1, Some(100), None).span(), None);
        assert_eq!(entity(1, Some(50), Some(50)).span(), Some((50, 50)));
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        let a = entity(1, Some(0), Some(100));
        let b = entity(2, Some(50), Some(150));
        let c = entity(3, Some(100), Some(200));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_inverted_span_is_never_enclosed() {
        let scene = entity(1, Some(0), Some(1000));
        let inverted = entity(2, Some(500), Some(100));
        assert!(!scene.encloses(&inverted));
        assert!(scene.encloses(&entity(3, Some(0), Some(1000))));
    }
}
