//! Onboarding API server using axum
//!
//! Exposes the setup operations over HTTP for the web onboarding UI:
//! dataset discovery, and access validation plus table aggregation in one
//! round-trip. Discovery failures are domain outcomes, so the discovery
//! endpoint always answers 200 with the structured result.

use anyhow::{Context, Result};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use dock_bigquery::{discovery, ClientOptions, TokenProvider};
use dock_core::{AccessPartition, CompactTable, DatasetId, DiscoveryResult};
use dock_flow::{BigQueryBackend, ConnectionParams, SetupBackend};
use dock_warehouse::AggregateOptions;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::cli::{GlobalArgs, ServeArgs};
use crate::context::RuntimeContext;

/// Shared server state: connection-independent knobs. Credentials arrive
/// with each request and never live in the state.
struct AppState {
    token_provider: Arc<dyn TokenProvider>,
    client_options: ClientOptions,
    aggregate_options: AggregateOptions,
}

/// POST /api/discovery request body
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscoveryRequest {
    project_id: String,
    credentials: String,
}

/// POST /api/tables request body
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TablesRequest {
    project_id: String,
    credentials: String,
    dataset_ids: Vec<DatasetId>,
}

/// POST /api/tables response body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TablesResponse {
    partition: AccessPartition,
    tables: Vec<CompactTable>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    let state = Arc::new(AppState {
        token_provider: ctx.token_provider()?,
        client_options: ctx.client_options(),
        aggregate_options: ctx.aggregate_options(),
    });

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid host:port")?;

    println!("Serving onboarding API at http://{}:{}", args.host, args.port);
    println!("Press Ctrl+C to stop.\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}:{}", args.host, args.port))?;
    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Build the API router over shared state
fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(get_health))
        .route("/api/discovery", post(post_discovery))
        .route("/api/tables", post(post_tables))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// GET /api/health
async fn get_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /api/discovery
///
/// Always 200: the body's `success` flag carries the outcome.
async fn post_discovery(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DiscoveryRequest>,
) -> Json<DiscoveryResult> {
    let result = discovery::discover(
        &req.project_id,
        &req.credentials,
        Arc::clone(&state.token_provider),
        &state.client_options,
    )
    .await;
    Json(result)
}

/// POST /api/tables
///
/// Validates access to the requested datasets, then aggregates tables
/// across the accessible subset.
async fn post_tables(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TablesRequest>,
) -> Json<TablesResponse> {
    let backend = BigQueryBackend::new(
        Arc::clone(&state.token_provider),
        state.client_options.clone(),
        state.aggregate_options.clone(),
    );
    let conn = ConnectionParams::new(req.project_id, req.credentials);

    let partition = backend.validate(&conn, &req.dataset_ids).await;
    let tables = backend.list_tables(&conn, &partition.accessible).await;

    Json(TablesResponse { partition, tables })
}

#[cfg(test)]
#[path = "serve_test.rs"]
mod tests;
