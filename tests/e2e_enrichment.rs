//! Enrichment backends observe ingest and search but never change results.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use media_graph::{EntityDraft, Enricher, Enrichment, Error, IngestText, MediaGraph, Result, SearchRequest};

#[derive(Default, Clone)]
struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Enricher for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    async fn enrich(&self, request: Enrichment<'_>) -> Result<()> {
        let line = match request {
            Enrichment::Ingest { media_id, entities } => format!("ingest {media_id} {}", entities.len()),
            Enrichment::Search { query, limit } => format!("search {query} {limit}"),
        };
        self.calls.lock().push(line);
        Ok(())
    }
}

struct Unreachable;

#[async_trait]
impl Enricher for Unreachable {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn enrich(&self, _request: Enrichment<'_>) -> Result<()> {
        Err(Error::Enrichment("connection refused".into()))
    }
}

fn drafts() -> Vec<EntityDraft> {
    vec![
        EntityDraft::new("object", "red brick").with_span(0, 100),
        EntityDraft::new("object", "mortar").with_span(100, 200),
    ]
}

#[tokio::test]
async fn test_enricher_sees_every_ingest_and_search() {
    let recorder = Recorder::default();
    let graph = MediaGraph::open_memory().await.unwrap().with_enricher(recorder.clone());
    assert_eq!(graph.enricher_name(), "recorder");

    graph.add_to_graph("clip-1", drafts(), true).await.unwrap();
    graph.ingest_text(IngestText::new("clip-2", "hello")).await.unwrap();
    graph.search(&SearchRequest::new("brick").with_limit(5)).await;

    assert_eq!(
        *recorder.calls.lock(),
        vec!["ingest clip-1 2", "ingest clip-2 1", "search brick 5"]
    );
}

#[tokio::test]
async fn test_failing_enricher_does_not_change_local_results() {
    let plain = MediaGraph::open_memory().await.unwrap();
    let degraded = MediaGraph::open_memory().await.unwrap().with_enricher(Unreachable);

    let expected = plain.add_to_graph("clip-1", drafts(), true).await.unwrap();
    let actual = degraded.add_to_graph("clip-1", drafts(), true).await.unwrap();
    assert_eq!(actual.entities_created, expected.entities_created);
    assert_eq!(actual.relationships_created, expected.relationships_created);

    let request = SearchRequest::new("brick");
    assert_eq!(degraded.search(&request).await, plain.search(&request).await);
    assert_eq!(degraded.get_stats().await, plain.get_stats().await);
}

#[tokio::test]
async fn test_default_enricher_is_noop() {
    let graph = MediaGraph::open_memory().await.unwrap();
    assert_eq!(graph.enricher_name(), "none");
}
