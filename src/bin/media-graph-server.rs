//! media-graph-server: HTTP front for the media knowledge graph.
//!
//! Builds one `MediaGraph` at startup, serves it until Ctrl+C, then shuts
//! the store down.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use media_graph::enrich::RemoteEnricher;
use media_graph::{GraphConfig, MediaGraph, MemoryStore};

#[derive(Debug, Parser)]
#[command(name = "media-graph-server", version, about = "Media knowledge graph over HTTP")]
struct Args {
    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8001")]
    port: u16,

    /// Largest entity batch accepted per add call
    #[arg(long, env = "MEDIA_GRAPH_MAX_BATCH", default_value_t = media_graph::config::DEFAULT_MAX_BATCH_SIZE)]
    max_batch_size: usize,

    /// Base URL of an external cognition service (enrichment is off when unset)
    #[arg(long, env = "ENRICHER_URL")]
    enricher_url: Option<String>,

    /// Enricher request timeout in seconds
    #[arg(long, env = "ENRICHER_TIMEOUT_SECS", default_value = "30")]
    enricher_timeout_secs: u64,
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "media_graph=info,media_graph_server=info,tower_http=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = GraphConfig::default().with_max_batch_size(args.max_batch_size);
    let mut graph = MediaGraph::with_store(MemoryStore::new(), config)?;

    if let Some(url) = &args.enricher_url {
        let enricher = RemoteEnricher::new(url, Duration::from_secs(args.enricher_timeout_secs))?;
        graph = graph.with_enricher(enricher);
    }

    let graph = Arc::new(graph);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;

    media_graph::http::serve(Arc::clone(&graph), addr)
        .await
        .context("HTTP server failed")?;

    graph.shutdown().await?;
    Ok(())
}
