//! Shared scaffolding for the integration tests: an app wired against the
//! in-memory stores, plus request/response helpers.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use serde_json::Value;
use uuid::Uuid;

use quillpad_auth::Role;
use quillpad_db_memory::{MemoryNoteStore, MemoryUserStore};
use quillpad_server::cache::{KvCache, MemoryCache};
use quillpad_server::config::AppConfig;
use quillpad_server::routes::build_router;
use quillpad_server::state::AppState;
use quillpad_storage::{
    NewNote, Note, NoteStore, NoteUpdate, Page, PageResult, StorageError, UserStore,
};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.secret = Some(TEST_SECRET.to_string());
    cfg.auth.cookie.secure = false;
    cfg
}

pub fn build_app_with(
    notes: Arc<dyn NoteStore>,
    users: Arc<dyn UserStore>,
    backend: Arc<dyn KvCache>,
) -> TestApp {
    let state = AppState::new(test_config(), notes, users, backend).unwrap();
    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

pub fn build_app() -> TestApp {
    build_app_with(
        Arc::new(MemoryNoteStore::new()),
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryCache::new()),
    )
}

/// Mints a valid token straight from the app's codec.
pub fn token_for(app: &TestApp, subject: &str, email: &str, role: Role) -> String {
    app.state.codec.issue(subject, email, role).unwrap()
}

/// Mints an already-expired token signed with the app's secret.
pub fn expired_token_for(app: &TestApp, subject: &str, role: Role) -> String {
    use quillpad_auth::TokenCodec;
    use std::time::Duration;

    TokenCodec::from_secret(TEST_SECRET)
        .unwrap()
        .with_validity(Duration::ZERO)
        .issue(subject, "expired@example.com", role)
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn put_json(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn delete_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<axum::body::Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Instrumented store
// =============================================================================

/// A note store that counts primary-store reads, so tests can assert whether
/// a request was served from the cache or fell through to the loader.
#[derive(Default)]
pub struct CountingNoteStore {
    inner: MemoryNoteStore,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl CountingNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NoteStore for CountingNoteStore {
    async fn count(&self) -> Result<u64, StorageError> {
        self.inner.count().await
    }

    async fn list(&self, page: Page) -> Result<PageResult<Note>, StorageError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list(page).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<Note>, StorageError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn create(&self, author_id: &str, note: NewNote) -> Result<Note, StorageError> {
        self.inner.create(author_id, note).await
    }

    async fn update(&self, id: Uuid, update: NoteUpdate) -> Result<Note, StorageError> {
        self.inner.update(id, update).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), StorageError> {
        self.inner.delete(id).await
    }
}
