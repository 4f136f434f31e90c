//! # Media Graph Model
//!
//! Plain DTOs shared by storage, inference, query and transport.
//!
//! Design rule: this module is pure data: no I/O, no state, no async.

pub mod entity;
pub mod relationship;
pub mod metadata;

pub use entity::{EntityDraft, EntityId, EntityType, MediaEntity};
pub use relationship::{EntityRelationship, RelationshipType};
pub use metadata::Metadata;
