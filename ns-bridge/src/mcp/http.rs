//! JSON-RPC over HTTP.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::tools::AppState;

/// Create the HTTP router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/mcp", post(mcp))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process stops.
pub async fn serve_http(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving MCP over HTTP at /mcp");
    axum::serve(listener, create_router(state)).await
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// One JSON-RPC message per POST; notifications are acknowledged with 202.
async fn mcp(State(state): State<AppState>, body: String) -> Response {
    match super::handle_request(&state, &body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
