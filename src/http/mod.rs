//! # HTTP Transport
//!
//! Axum router exposing the `MediaGraph` façade as JSON endpoints.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/` | service descriptor |
//! | GET | `/health` | liveness + backend names |
//! | POST | `/graph/add` | `add_to_graph` |
//! | POST | `/graph/search` | `search` |
//! | POST | `/graph/similar` | `find_similar` |
//! | POST | `/graph/relate` | `relate` |
//! | GET | `/graph/stats` | `get_stats` |
//! | GET | `/media/{media_id}/entities` | `get_media_entities` |
//! | GET | `/media/{media_id}/subgraph` | `get_subgraph` |
//! | DELETE | `/media/{media_id}` | `remove_media` |
//! | POST | `/ingest/text` | `ingest_text` |

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{Error, GraphStore, MediaGraph};

pub const SERVICE_NAME: &str = "media-graph";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// State
// ============================================================================

/// Application state shared across handlers.
pub struct AppState<S: GraphStore> {
    pub graph: Arc<MediaGraph<S>>,
}

impl<S: GraphStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self { graph: Arc::clone(&self.graph) }
    }
}

impl<S: GraphStore> AppState<S> {
    pub fn new(graph: Arc<MediaGraph<S>>) -> Self {
        Self { graph }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Façade error rendered as `{ "detail": ... }`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::BatchTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::InvalidWeight(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "detail": self.0.to_string() }))).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create the application router.
pub fn create_router<S: GraphStore>(graph: Arc<MediaGraph<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health::<S>))
        // Graph
        .route("/graph/add", post(handlers::add_to_graph::<S>))
        .route("/graph/search", post(handlers::search::<S>))
        .route("/graph/similar", post(handlers::find_similar::<S>))
        .route("/graph/relate", post(handlers::relate::<S>))
        .route("/graph/stats", get(handlers::stats::<S>))
        // Media
        .route("/media/{media_id}/entities", get(handlers::media_entities::<S>))
        .route("/media/{media_id}/subgraph", get(handlers::subgraph::<S>))
        .route("/media/{media_id}", delete(handlers::remove_media::<S>))
        // Ingest
        .route("/ingest/text", post(handlers::ingest_text::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState::new(graph))
}

/// Serve until Ctrl+C. The caller owns the graph and shuts it down after.
pub async fn serve<S: GraphStore>(graph: Arc<MediaGraph<S>>, addr: SocketAddr) -> std::io::Result<()> {
    let app = create_router(graph);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("media graph listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
