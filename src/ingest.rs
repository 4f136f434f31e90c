//! Ingestion DTOs and batch preparation.

use serde::{Deserialize, Serialize};

use crate::inference::infer_relationships;
use crate::model::*;
use crate::storage::Batch;

/// Outcome of one `add_to_graph` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub media_id: String,
    pub entities_created: usize,
    pub relationships_created: usize,
    pub processing_time_ms: u64,
}

fn default_text_type() -> EntityType { EntityType::Transcript }

/// Raw text to be stored as a single entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestText {
    pub media_id: String,
    pub text: String,
    #[serde(default = "default_text_type")]
    pub text_type: EntityType,
    #[serde(default)]
    pub start_ms: Option<i64>,
    #[serde(default)]
    pub end_ms: Option<i64>,
}

impl IngestText {
    pub fn new(media_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            media_id: media_id.into(),
            text: text.into(),
            text_type: default_text_type(),
            start_ms: None,
            end_ms: None,
        }
    }

    /// The single draft this text becomes.
    pub fn into_draft(self) -> (String, EntityDraft) {
        let draft = EntityDraft {
            entity_type: self.text_type,
            content: self.text,
            start_ms: self.start_ms,
            end_ms: self.end_ms,
            metadata: Metadata::new(),
        }
        .with_metadata("source", "text_ingest");
        (self.media_id, draft)
    }
}

/// Give drafts ids from `next_id` and, when `auto_relate` is set, infer
/// edges among them. Nothing is written; meant to run inside
/// `GraphStore::commit_with`.
pub fn prepare_batch(
    next_id: &mut dyn FnMut() -> EntityId,
    media_id: &str,
    drafts: Vec<EntityDraft>,
    auto_relate: bool,
) -> Batch {
    let entities: Vec<MediaEntity> = drafts
        .into_iter()
        .map(|d| MediaEntity::from_draft(next_id(), media_id, d))
        .collect();
    let relationships = if auto_relate {
        infer_relationships(&entities)
    } else {
        Vec::new()
    };
    Batch {
        media_id: media_id.to_owned(),
        entities,
        relationships,
    }
}
