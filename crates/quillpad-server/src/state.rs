//! Shared application state.
//!
//! Everything a handler needs is constructed once at startup and injected
//! through this struct; there are no module-level globals. All members are
//! immutable after construction (the cache mutates internally but its handle
//! is not swapped).

use std::sync::Arc;

use quillpad_auth::{AuthError, AuthorityGate, EdgeGate, RoutePolicy, TokenCodec};
use quillpad_storage::{NoteStore, UserStore};

use crate::cache::{KvCache, ReadThroughCache};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub codec: Arc<TokenCodec>,
    pub policy: Arc<RoutePolicy>,
    pub edge: Arc<EdgeGate>,
    pub authority: Arc<AuthorityGate>,
    pub notes: Arc<dyn NoteStore>,
    pub users: Arc<dyn UserStore>,
    pub cache: Arc<ReadThroughCache>,
}

impl AppState {
    /// Wires the state from configuration and injected collaborators.
    ///
    /// # Errors
    /// Fails if the signing secret is missing or empty; the caller treats
    /// this as fatal at startup.
    pub fn new(
        config: AppConfig,
        notes: Arc<dyn NoteStore>,
        users: Arc<dyn UserStore>,
        cache_backend: Arc<dyn KvCache>,
    ) -> Result<Self, AuthError> {
        let secret = config.auth.secret.clone().unwrap_or_default();
        let codec = Arc::new(TokenCodec::from_secret(&secret)?.with_validity(config.token_validity()));
        let policy = Arc::new(RoutePolicy::default_table());

        let edge = Arc::new(EdgeGate::new(Arc::clone(&policy)));
        let authority = Arc::new(AuthorityGate::new(Arc::clone(&codec), Arc::clone(&policy)));

        Ok(Self {
            config: Arc::new(config),
            codec,
            policy,
            edge,
            authority,
            notes,
            users,
            cache: Arc::new(ReadThroughCache::new(cache_backend)),
        })
    }

    /// Name of the session cookie.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.config.auth.cookie.name
    }
}
