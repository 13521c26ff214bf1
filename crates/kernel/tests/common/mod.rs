#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! [`TestApp`] wraps the REAL kernel router and state, not a mock. Each test
//! builds its own app from a module list, so tests never share state.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use autotemu_kernel::modules::{ModuleRegistry, builtin_modules};
use autotemu_kernel::permissions::AccessChecks;
use autotemu_kernel::routes;
use autotemu_kernel::state::AppState;
use autotemu_sdk::types::ModuleDescriptor;

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// App serving the built-in modules with no access checks.
    pub fn new() -> Self {
        Self::with_modules(builtin_modules(), AccessChecks::new())
    }

    /// App serving `modules` with the given checks.
    pub fn with_modules(modules: Vec<ModuleDescriptor>, checks: AccessChecks) -> Self {
        Self::build(modules, checks, false)
    }

    /// Like [`TestApp::with_modules`] but with error detail exposed.
    pub fn exposing_detail(modules: Vec<ModuleDescriptor>, checks: AccessChecks) -> Self {
        Self::build(modules, checks, true)
    }

    fn build(modules: Vec<ModuleDescriptor>, checks: AccessChecks, expose: bool) -> Self {
        let registry = ModuleRegistry::new(modules).expect("Failed to build module registry");
        let state =
            AppState::from_parts(registry, checks, expose).expect("Failed to initialize AppState");

        // Must match main.rs (minus CORS)
        let router = routes::router(state.clone());

        Self { router, state }
    }

    /// Make a request to the app.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }

    /// GET `uri`.
    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST a JSON body to `uri`.
    pub async fn post_json(&self, uri: &str, body: &Value) -> Response {
        self.request(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

/// Read a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}
