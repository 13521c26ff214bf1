//! Health check endpoint.
//!
//! The console holds no connections of its own, so it is healthy whenever it
//! is serving; the response reports the registry size for quick inspection.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    modules: usize,
    enabled_modules: usize,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.registry();
    Json(HealthResponse {
        status: "healthy",
        modules: registry.len(),
        enabled_modules: registry.list_enabled().len(),
    })
}

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
