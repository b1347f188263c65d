//! User administration endpoints. Admin role enforced by the route policy.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use quillpad_api::{ApiError, ApiResponse};

use crate::extract::{CurrentUser, Query};
use crate::handlers::notes::ListParams;
use crate::state::AppState;

use super::storage_error;

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    _admin: CurrentUser,
) -> Result<Response, ApiError> {
    let result = state
        .users
        .list(params.to_page())
        .await
        .map_err(storage_error)?;
    Ok(ApiResponse::ok("Users fetched", result).into_response())
}
