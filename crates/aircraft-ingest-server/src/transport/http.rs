//! HTTP transport: download/prepare triggers and /health.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use aircraft_ingest::{Acquirer, ContentStore, HttpClient, IngestConfig};

use crate::types::{ApiResult, DownloadParams, STATUS_OK};

/// Shared server state passed to all handlers via axum State.
///
/// Read-only: every request runs against the same configuration and clients
/// and keeps its own run state.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub config: IngestConfig,
    pub client: HttpClient,
    pub store: ContentStore,
}

impl ServerState {
    pub fn new(config: IngestConfig, client: HttpClient, store: ContentStore) -> Self {
        Self {
            config,
            client,
            store,
        }
    }

    /// Build clients for the given configuration.
    pub fn from_config(config: IngestConfig) -> aircraft_ingest::IngestResult<Self> {
        let client = HttpClient::from_config(&config)?;
        let store = ContentStore::from_backend(&config.store)?;
        Ok(Self::new(config, client, store))
    }
}

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/s4/aircraft/download", post(handle_download))
        .route("/api/s4/aircraft/prepare", post(handle_prepare))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP server wrapper.
pub struct HttpTransport {
    state: Arc<ServerState>,
}

impl HttpTransport {
    pub fn new(state: ServerState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Run the HTTP server on the given address until it stops.
    pub async fn run(&self, addr: &str) -> anyhow::Result<()> {
        let app = router(self.state.clone());
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!(
            store = self.state.store.label(),
            source = %self.state.config.source_url,
            "HTTP transport listening on http://{addr}"
        );

        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Acquire up to `file_limit` snapshots into the content store.
async fn handle_download(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<DownloadParams>,
) -> ApiResult<Json<&'static str>> {
    Acquirer::new(&state.config, &state.client, &state.store)
        .run(params.file_limit)
        .await?;
    Ok(Json(STATUS_OK))
}

/// Stage the raw prefix into the local prepared directory.
async fn handle_prepare(State(state): State<Arc<ServerState>>) -> ApiResult<Json<&'static str>> {
    aircraft_ingest::prepare(&state.config, &state.store).await?;
    Ok(Json(STATUS_OK))
}

/// Health check endpoint.
async fn handle_health(State(state): State<Arc<ServerState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.store.label(),
    }))
}
