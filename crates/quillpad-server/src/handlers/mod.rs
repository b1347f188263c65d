//! Request handlers.

pub mod auth;
pub mod notes;
pub mod pages;
pub mod system;
pub mod users;

use quillpad_api::ApiError;
use quillpad_storage::StorageError;

/// Maps a primary-store failure to the wire error taxonomy.
pub(crate) fn storage_error(err: StorageError) -> ApiError {
    match err {
        StorageError::NotFound { kind, id } => {
            ApiError::not_found(format!("{kind} {id} not found"))
        }
        StorageError::AlreadyExists { kind, .. } => {
            ApiError::validation(format!("{kind} already exists"))
        }
        StorageError::Invalid { message } => ApiError::validation(message),
        StorageError::Backend { message } => ApiError::database(message),
    }
}
