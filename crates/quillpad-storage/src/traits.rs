//! Primary-store traits.
//!
//! All backends must be safe for concurrent use (`Send + Sync`); the server
//! holds them as `Arc<dyn NoteStore>` / `Arc<dyn UserStore>` constructed at
//! startup and injected where needed.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageError;
use crate::types::{NewNote, NewUser, Note, NoteUpdate, Page, PageResult, User};

/// CRUD plus paginated listing for notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Total number of notes.
    async fn count(&self) -> Result<u64, StorageError>;

    /// One page of notes, newest first.
    async fn list(&self, page: Page) -> Result<PageResult<Note>, StorageError>;

    /// Reads a note by ID. Returns `None` if it does not exist; errors are
    /// reserved for infrastructure failures.
    async fn get(&self, id: Uuid) -> Result<Option<Note>, StorageError>;

    /// Creates a note owned by `author_id`.
    async fn create(&self, author_id: &str, note: NewNote) -> Result<Note, StorageError>;

    /// Applies a partial update.
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` if the note does not exist.
    async fn update(&self, id: Uuid, update: NoteUpdate) -> Result<Note, StorageError>;

    /// Deletes a note.
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` if the note does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), StorageError>;
}

/// User account persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Total number of users.
    async fn count(&self) -> Result<u64, StorageError>;

    /// One page of users, newest first.
    async fn list(&self, page: Page) -> Result<PageResult<User>, StorageError>;

    /// Looks a user up by email. Returns `None` if no such user exists.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Looks a user up by ID. Returns `None` if no such user exists.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError>;

    /// Creates a user.
    ///
    /// # Errors
    /// Returns `StorageError::AlreadyExists` if the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, StorageError>;
}
