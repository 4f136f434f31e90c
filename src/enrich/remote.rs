//! HTTP client for an external cognition service.
//!
//! Ingested text goes to `POST {base}/add` followed by `POST {base}/cognify`
//! for dataset `media_{media_id}`; searches are mirrored to
//! `POST {base}/search`. Responses are not read beyond their status.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::{Error, Result};
use super::{Enricher, Enrichment};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cognition backend reached over HTTP.
#[derive(Clone)]
pub struct RemoteEnricher {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct AddRequest<'a> {
    dataset: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct CognifyRequest<'a> {
    dataset: &'a str,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
}

impl RemoteEnricher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("enricher client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<()> {
        let response = self.client
            .post(format!("{}/{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Enrichment(format!("{path}: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Enrichment(format!("{path} returned {status}: {body}")));
        }
        Ok(())
    }
}

/// Dataset name used for one media item.
pub fn dataset_name(media_id: &str) -> String {
    format!("media_{media_id}")
}

#[async_trait]
impl Enricher for RemoteEnricher {
    fn name(&self) -> &str {
        "remote"
    }

    async fn enrich(&self, request: Enrichment<'_>) -> Result<()> {
        match request {
            Enrichment::Ingest { media_id, entities } => {
                let text = entities
                    .iter()
                    .map(|e| e.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                let dataset = dataset_name(media_id);
                self.post("add", &AddRequest { dataset: &dataset, text: &text }).await?;
                self.post("cognify", &CognifyRequest { dataset: &dataset }).await?;
                debug!(%dataset, entities = entities.len(), "pushed batch to cognition backend");
            }
            Enrichment::Search { query, limit } => {
                self.post("search", &SearchRequest { query, limit }).await?;
            }
        }
        Ok(())
    }
}
