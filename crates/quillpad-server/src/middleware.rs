//! HTTP middleware: request IDs and the two authorization gate stages.
//!
//! Layer order (outermost first): request id, edge gate, authority gate.
//! The edge gate rejects token-less requests to protected routes without any
//! cryptography; the authority gate verifies whatever token is present and
//! attaches the resulting [`Identity`] to the request extensions.

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use quillpad_auth::{AuthError, Gate, HeaderCredentials, RouteKind};

use crate::state::AppState;

static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Assigns each request an ID, honoring one supplied by an upstream proxy,
/// and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let header_value = HeaderValue::from_str(&id)
        .unwrap_or_else(|_| HeaderValue::from_static("invalid"));
    req.extensions_mut().insert(header_value.clone());

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER.clone(), header_value);
    response
}

/// The presence-only stage. Runs outermost of the two gates so anonymous
/// requests to protected routes are turned away before any verification work.
pub async fn edge_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let creds = HeaderCredentials::new(req.headers(), state.cookie_name());

    match state.edge.evaluate(&path, &creds) {
        Ok(_) => next.run(req).await,
        Err(err) => reject(&state, &path, err),
    }
}

/// The verification stage. On success the verified identity is attached to
/// the request extensions; handlers read it via the `CurrentUser` extractor
/// without re-verifying.
pub async fn authority_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let creds = HeaderCredentials::new(req.headers(), state.cookie_name());

    match state.authority.evaluate(&path, &creds) {
        Ok(Some(identity)) => {
            req.extensions_mut().insert(identity);
        }
        Ok(None) => {}
        Err(err) => return reject(&state, &path, err),
    }
    next.run(req).await
}

/// Renders a gate failure for the route's audience: browsers navigating page
/// routes are sent to the login form with a `next` parameter preserving their
/// destination; API callers get the structured error envelope. Authorization
/// failures (wrong role) render as envelopes everywhere, since logging in
/// again would not help.
fn reject(state: &AppState, path: &str, err: AuthError) -> Response {
    let route = state.policy.classify(path);
    if route.kind == RouteKind::Page && err.is_authentication_error() {
        let target = format!(
            "{}?next={}",
            state.policy.login_path(),
            urlencoding::encode(path)
        );
        return Redirect::to(&target).into_response();
    }
    err.into_response()
}
