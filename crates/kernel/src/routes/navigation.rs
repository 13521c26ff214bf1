//! Navigation endpoint.
//!
//! `POST /api/navigation` composes the menu for the session supplied by the
//! authentication layer and renders it against the current route.

use autotemu_sdk::api::{ApiResponse, BusinessCode, FieldError};
use autotemu_sdk::types::Session;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::Deserialize;

use crate::error::{AppError, ErrorResponse};
use crate::menu::{MenuComposer, NavEntry, render_navigation};
use crate::middleware::RequestId;
use crate::state::AppState;

/// Navigation request body.
#[derive(Debug, Default, Deserialize)]
pub struct NavigationRequest {
    /// Caller session; absent when there is no session at all.
    #[serde(default)]
    pub session: Option<Session>,
    /// Route being displayed, used to mark active entries.
    #[serde(default)]
    pub current_path: Option<String>,
}

/// Compose and render the navigation for a session.
async fn navigation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<NavigationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<NavEntry>>>, ErrorResponse> {
    let fail = |e: AppError| {
        e.exposing_detail(state.expose_error_detail())
            .request_id(request_id.0.clone())
    };

    let Json(request) = body.map_err(|rejection| {
        fail(AppError::validation(vec![
            FieldError::new("body", rejection.body_text()).kind("json_invalid"),
        ]))
    })?;

    let composer = MenuComposer::new(state.registry(), state.checks());
    let entries = composer.compose(request.session.as_ref()).map_err(|e| {
        fail(AppError::System {
            code: BusinessCode::InternalError,
            message: None,
            detail: Some(e.to_string()),
        })
    })?;

    let nav = render_navigation(&entries, request.current_path.as_deref());
    Ok(Json(ApiResponse::ok(nav).request_id(request_id.0)))
}

/// Create the navigation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/navigation", post(navigation))
}
