//! Health checks and admin diagnostics.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;

use quillpad_api::{ApiError, ApiResponse};

use crate::extract::CurrentUser;
use crate::state::AppState;

use super::storage_error;

/// GET /healthz — liveness.
pub async fn healthz() -> Response {
    ApiResponse::ok("ok", json!({"status": "up"})).into_response()
}

/// GET /readyz — readiness: the primary store must answer.
pub async fn readyz(State(state): State<AppState>) -> Result<Response, ApiError> {
    let notes = state.notes.count().await.map_err(storage_error)?;
    let users = state.users.count().await.map_err(storage_error)?;

    Ok(ApiResponse::ok("ready", json!({"notes": notes, "users": users})).into_response())
}

/// GET /api/admin/cache/stats — read-only cache counters. Admin role is
/// enforced by the route policy; the extractor is here for the audit log.
pub async fn cache_stats(State(state): State<AppState>, admin: CurrentUser) -> Response {
    let stats = state.cache.stats();
    tracing::debug!(admin = %admin.0.subject, "cache stats read");

    ApiResponse::ok(
        "Cache statistics",
        json!({
            "hits": stats.hits,
            "misses": stats.misses,
            "hit_rate": stats.hit_rate(),
        }),
    )
    .into_response()
}
