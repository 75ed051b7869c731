// src/handlers/health.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

/// Liveness probe. Public.
#[utoipa::path(get, path = "/api/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
