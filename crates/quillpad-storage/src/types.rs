//! Domain types stored in the primary store.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Default page size for collection reads.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on page size; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// Notes
// =============================================================================

/// A note as stored in the primary store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    /// Subject ID of the identity that created the note.
    pub author_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields for creating a note.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub body: String,
}

/// Fields for updating a note; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
}

// =============================================================================
// Users
// =============================================================================

/// A user account.
///
/// `password_hash` never leaves the storage layer; API-facing types carry
/// only the public fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role name as serialized into tokens ("ADMIN", "USER", "EDITOR").
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

// =============================================================================
// Pagination
// =============================================================================

/// Pagination parameters for collection reads.
///
/// Pages are 1-based; out-of-range values are normalized so that identical
/// logical queries always carry identical parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    /// Creates a normalized page: number at least 1, size clamped to
    /// `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Offset of the first item on this page.
    ///
    /// Computed in `usize` so a large client-supplied page number cannot
    /// overflow the `u32` arithmetic.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.number as usize - 1) * self.size as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of a collection plus the total count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}
