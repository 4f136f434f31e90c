//! Metadata: the opaque key-value payload on entities and relationships.

use std::collections::HashMap;

/// Producer-supplied attributes (bounding boxes, confidences, model names).
/// Never interpreted by the graph.
pub type Metadata = HashMap<String, serde_json::Value>;
