//! Observability HTTP Routes
//!
//! Health check, reporting the server version and the current
//! configuration version.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::registry::ObjectRegistry;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub config_version: u64,
    pub objects: usize,
}

/// Health check route, mounted at the root
pub fn health_routes(registry: Arc<ObjectRegistry>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(registry)
}

/// Health check handler
async fn health_handler(State(registry): State<Arc<ObjectRegistry>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        config_version: registry.version(),
        objects: registry.len(),
    };

    (StatusCode::OK, Json(response))
}
