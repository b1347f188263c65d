//! In-memory primary store.
//!
//! Backs the server in development and tests. Lock-free concurrent access
//! via `DashMap`; an atomic insertion sequence gives listings a stable
//! newest-first order even when timestamps collide.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use quillpad_storage::{
    NewNote, NewUser, Note, NoteStore, NoteUpdate, Page, PageResult, StorageError, User, UserStore,
};

// =============================================================================
// Notes
// =============================================================================

/// In-memory note store.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: DashMap<Uuid, (u64, Note)>,
    seq: AtomicU64,
}

impl MemoryNoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Snapshot of all notes, newest first.
    fn sorted(&self) -> Vec<Note> {
        let mut entries: Vec<(u64, Note)> = self
            .notes
            .iter()
            .map(|e| (e.value().0, e.value().1.clone()))
            .collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        entries.into_iter().map(|(_, note)| note).collect()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn count(&self) -> Result<u64, StorageError> {
        Ok(self.notes.len() as u64)
    }

    async fn list(&self, page: Page) -> Result<PageResult<Note>, StorageError> {
        let all = self.sorted();
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.size as usize)
            .collect();

        Ok(PageResult {
            items,
            total,
            page: page.number,
            per_page: page.size,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Note>, StorageError> {
        Ok(self.notes.get(&id).map(|e| e.value().1.clone()))
    }

    async fn create(&self, author_id: &str, note: NewNote) -> Result<Note, StorageError> {
        let now = OffsetDateTime::now_utc();
        let note = Note {
            id: Uuid::new_v4(),
            title: note.title,
            body: note.body,
            author_id: author_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(note.id, (self.next_seq(), note.clone()));
        Ok(note)
    }

    async fn update(&self, id: Uuid, update: NoteUpdate) -> Result<Note, StorageError> {
        let mut entry = self
            .notes
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found("note", id.to_string()))?;

        let note = &mut entry.value_mut().1;
        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(body) = update.body {
            note.body = body;
        }
        note.updated_at = OffsetDateTime::now_utc();

        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        self.notes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("note", id.to_string()))
    }
}

// =============================================================================
// Users
// =============================================================================

/// In-memory user store.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, (u64, User)>,
    seq: AtomicU64,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn count(&self) -> Result<u64, StorageError> {
        Ok(self.users.len() as u64)
    }

    async fn list(&self, page: Page) -> Result<PageResult<User>, StorageError> {
        let mut entries: Vec<(u64, User)> = self
            .users
            .iter()
            .map(|e| (e.value().0, e.value().1.clone()))
            .collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));

        let total = entries.len() as u64;
        let items = entries
            .into_iter()
            .map(|(_, user)| user)
            .skip(page.offset())
            .take(page.size as usize)
            .collect();

        Ok(PageResult {
            items,
            total,
            page: page.number,
            per_page: page.size,
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .iter()
            .find(|e| e.value().1.email == email)
            .map(|e| e.value().1.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.users.get(&id).map(|e| e.value().1.clone()))
    }

    async fn create(&self, user: NewUser) -> Result<User, StorageError> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(StorageError::already_exists("user", user.email));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: OffsetDateTime::now_utc(),
        };
        self.users
            .insert(user.id, (self.seq.fetch_add(1, Ordering::SeqCst), user.clone()));
        Ok(user)
    }
}

// =============================================================================
// Tests
// =============================================================================
