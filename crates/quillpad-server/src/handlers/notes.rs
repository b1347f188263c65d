//! Note CRUD endpoints.
//!
//! Reads go through the cache-aside store; writes go to the primary store and
//! then invalidate the affected cache entries before the success response is
//! returned, so a client that writes and immediately re-reads never sees its
//! own write missing.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use quillpad_api::{ApiError, ApiResponse};
use quillpad_storage::{DEFAULT_PAGE_SIZE, NewNote, Note, NoteUpdate, Page, PageResult, StorageError};

use crate::cache::{CacheKey, InvalidationTags};
use crate::extract::{CurrentUser, Json, Path, Query};
use crate::state::AppState;

use super::storage_error;

/// Pagination query parameters, normalized through [`Page::new`] so that the
/// same logical query always produces the same cache key.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListParams {
    pub(crate) fn to_page(&self) -> Page {
        Page::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// GET /api/notes
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    _user: CurrentUser,
) -> Result<Response, ApiError> {
    let page = params.to_page();
    let key = CacheKey::note_list(page);

    let result: PageResult<Note> = state
        .cache
        .read(&key, state.config.list_ttl(), || async {
            state.notes.list(page).await
        })
        .await
        .map_err(storage_error)?;

    Ok(ApiResponse::ok("Notes fetched", result).into_response())
}

/// GET /api/notes/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: CurrentUser,
) -> Result<Response, ApiError> {
    let key = CacheKey::note_item(id);

    let note: Note = state
        .cache
        .read(&key, state.config.item_ttl(), || async {
            // A missing note is an error, not a cacheable value; otherwise a
            // negative entry would mask the note after it is created.
            state
                .notes
                .get(id)
                .await?
                .ok_or_else(|| StorageError::not_found("note", id.to_string()))
        })
        .await
        .map_err(storage_error)?;

    Ok(ApiResponse::ok("Note fetched", note).into_response())
}

/// POST /api/notes
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<NewNote>,
) -> Result<Response, ApiError> {
    validate_title(&req.title)?;

    let note = state
        .notes
        .create(&user.0.subject, req)
        .await
        .map_err(storage_error)?;

    state
        .cache
        .invalidate(&InvalidationTags::note_write(note.id))
        .await;

    tracing::info!(note_id = %note.id, author = %user.0.subject, "note created");
    Ok(ApiResponse::created("Note created", note).into_response())
}

/// PUT /api/notes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: CurrentUser,
    Json(req): Json<NoteUpdate>,
) -> Result<Response, ApiError> {
    if let Some(title) = &req.title {
        validate_title(title)?;
    }

    let note = state.notes.update(id, req).await.map_err(storage_error)?;

    state
        .cache
        .invalidate(&InvalidationTags::note_write(id))
        .await;

    tracing::info!(note_id = %id, editor = %user.0.subject, "note updated");
    Ok(ApiResponse::ok("Note updated", note).into_response())
}

/// DELETE /api/notes/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: CurrentUser,
) -> Result<Response, ApiError> {
    state.notes.delete(id).await.map_err(storage_error)?;

    state
        .cache
        .invalidate(&InvalidationTags::note_write(id))
        .await;

    tracing::info!(note_id = %id, editor = %user.0.subject, "note deleted");
    Ok(ApiResponse::ok("Note deleted", serde_json::json!({})).into_response())
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::validation("Title must not be empty"));
    }
    Ok(())
}
