//! # Graph Queries
//!
//! Read-side operations. Every function here takes a `&GraphState`
//! snapshot, so each runs against one consistent view of the graph.
//!
//! | Operation | Module |
//! |-----------|--------|
//! | lexical search + bounded expansion | `search` |
//! | neighbours by incident weight | `similar` |
//! | per-media view | `subgraph` |
//! | aggregates | `stats` |

pub mod search;
pub mod similar;
pub mod subgraph;
pub mod stats;

pub use search::{
    search, tokenize, lexical_score, SearchFilters, SearchRequest, SearchResult,
    DEFAULT_DEPTH, DEFAULT_LIMIT, EXPANSION_DECAY,
};
pub use similar::{find_similar, DEFAULT_SIMILAR_LIMIT};
pub use subgraph::{subgraph, Subgraph, SubgraphEdge, SubgraphNode, LABEL_MAX_CHARS};
pub use stats::{stats, GraphStats};
