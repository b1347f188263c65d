//! Server construction and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;

use quillpad_db_memory::{MemoryNoteStore, MemoryUserStore};
use quillpad_storage::{NoteStore, UserStore};

use crate::bootstrap::seed_admin;
use crate::cache::create_cache_backend;
use crate::config::AppConfig;
use crate::routes::build_router;
use crate::state::AppState;

pub struct QuillpadServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    config: AppConfig,
    notes: Option<Arc<dyn NoteStore>>,
    users: Option<Arc<dyn UserStore>>,
}

impl ServerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            notes: None,
            users: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    /// Overrides the primary stores. Defaults to the in-memory backend.
    #[must_use]
    pub fn with_stores(mut self, notes: Arc<dyn NoteStore>, users: Arc<dyn UserStore>) -> Self {
        self.notes = Some(notes);
        self.users = Some(users);
        self
    }

    /// Wires the state, seeds bootstrap data, and assembles the router.
    ///
    /// # Errors
    /// Fails on invalid auth configuration or a failing bootstrap write.
    pub async fn build(self) -> anyhow::Result<QuillpadServer> {
        let addr = self.config.addr();

        let notes = self
            .notes
            .unwrap_or_else(|| Arc::new(MemoryNoteStore::new()));
        let users = self
            .users
            .unwrap_or_else(|| Arc::new(MemoryUserStore::new()));

        let cache_backend = create_cache_backend(&self.config.redis);

        seed_admin(&users, &self.config.bootstrap).await?;

        let state = AppState::new(self.config, notes, users, cache_backend)?;
        let app = build_router(state);

        Ok(QuillpadServer { addr, app })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuillpadServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
