//! HTTP route handlers.

pub mod health;
pub mod module_api;
pub mod navigation;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::assign_request_id;
use crate::state::AppState;

/// Build the application router with request-id propagation and tracing.
///
/// CORS is environment specific and layered on by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(module_api::router())
        .merge(navigation::router())
        // TraceLayer → request id → routes
        .layer(axum::middleware::from_fn(assign_request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
