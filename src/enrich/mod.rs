//! # Enrichment
//!
//! Optional hand-off to an external cognition backend. Enrichment is
//! best-effort: the façade calls the enricher on every ingest and search,
//! logs any error, and carries on with its own local result. Absence of a
//! backend is modelled as `NoopEnricher`, so the façade's control flow is
//! the same whether an enricher is wired or not.
//!
//! | Enricher | Feature | Description |
//! |----------|---------|-------------|
//! | `NoopEnricher` | (default) | Accepts everything, does nothing |
//! | `RemoteEnricher` | `remote-enricher` | JSON over HTTP to a cognition service |

#[cfg(feature = "remote-enricher")]
pub mod remote;

use async_trait::async_trait;

use crate::model::MediaEntity;
use crate::Result;

#[cfg(feature = "remote-enricher")]
pub use remote::RemoteEnricher;

/// What the façade is about to do or has just done.
#[derive(Debug, Clone, Copy)]
pub enum Enrichment<'a> {
    /// A batch was committed for `media_id`.
    Ingest { media_id: &'a str, entities: &'a [MediaEntity] },
    /// A search is about to run locally.
    Search { query: &'a str, limit: usize },
}

impl Enrichment<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Enrichment::Ingest { .. } => "ingest",
            Enrichment::Search { .. } => "search",
        }
    }
}

/// A semantic enrichment backend. Any error is treated as "no enrichment".
#[async_trait]
pub trait Enricher: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn enrich(&self, request: Enrichment<'_>) -> Result<()>;
}

/// The always-available fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnricher;

#[async_trait]
impl Enricher for NoopEnricher {
    fn name(&self) -> &str {
        "none"
    }

    async fn enrich(&self, _request: Enrichment<'_>) -> Result<()> {
        Ok(())
    }
}
