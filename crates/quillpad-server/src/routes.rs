//! Router assembly.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, notes, pages, system, users};
use crate::middleware as app_middleware;
use crate::state::AppState;

/// Builds the application router with the full middleware stack.
///
/// Layers apply outermost-last: the request-id layer wraps the edge gate,
/// which wraps the authority gate, which wraps the handlers. The edge gate
/// therefore always runs before the authority gate.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        // Pages
        .route("/", get(pages::index))
        .route("/login", get(pages::login))
        .route("/signup", get(pages::signup))
        .route("/notes", get(pages::notes))
        // Health
        .route("/healthz", get(system::healthz))
        .route("/readyz", get(system::readyz))
        // Auth API
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Notes API
        .route("/api/notes", get(notes::list).post(notes::create))
        .route(
            "/api/notes/{id}",
            get(notes::get).put(notes::update).delete(notes::remove),
        )
        // Admin API
        .route("/api/users", get(users::list))
        .route("/api/admin/cache/stats", get(system::cache_stats))
        // Middleware stack
        .layer(middleware::from_fn_with_state(
            state.clone(),
            app_middleware::authority_gate,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            app_middleware::edge_gate,
        ))
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(TraceLayer::new_for_http())
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
