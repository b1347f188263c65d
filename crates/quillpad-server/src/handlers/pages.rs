//! HTML page handlers.
//!
//! The pages are a deliberately thin host shell around the API: enough to
//! exercise the page-route side of the gates (login redirect with `next`) and
//! the cached note list. Rendering strategy is out of scope, so this is plain
//! string templating with escaping, no template engine.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use quillpad_api::ApiError;
use quillpad_storage::{Note, Page, PageResult};

use crate::cache::CacheKey;
use crate::extract::CurrentUser;
use crate::state::AppState;

use super::storage_error;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(
        "<!doctype html><title>Quillpad</title>\
         <h1>Quillpad</h1>\
         <p><a href=\"/notes\">Your notes</a> · <a href=\"/login\">Log in</a> · \
         <a href=\"/signup\">Sign up</a></p>",
    )
}

#[derive(Debug, Deserialize)]
pub struct LoginPageParams {
    pub next: Option<String>,
}

/// GET /login
pub async fn login(Query(params): Query<LoginPageParams>) -> Html<String> {
    let next = params.next.as_deref().unwrap_or("/notes");
    Html(format!(
        "<!doctype html><title>Log in — Quillpad</title>\
         <h1>Log in</h1>\
         <form method=\"post\" action=\"/api/auth/login?next={}\">\
         <input name=\"email\" type=\"email\" placeholder=\"Email\" required>\
         <input name=\"password\" type=\"password\" placeholder=\"Password\" required>\
         <button>Log in</button></form>",
        urlencoding::encode(next)
    ))
}

/// GET /signup
pub async fn signup() -> Html<&'static str> {
    Html(
        "<!doctype html><title>Sign up — Quillpad</title>\
         <h1>Sign up</h1>\
         <form method=\"post\" action=\"/api/auth/signup\">\
         <input name=\"email\" type=\"email\" placeholder=\"Email\" required>\
         <input name=\"password\" type=\"password\" placeholder=\"Password\" required>\
         <button>Create account</button></form>",
    )
}

/// GET /notes — the authenticated note list, read through the same cache as
/// the API so both surfaces observe the same entries.
pub async fn notes(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Html<String>, ApiError> {
    let page = Page::default();
    let key = CacheKey::note_list(page);

    let result: PageResult<Note> = state
        .cache
        .read(&key, state.config.list_ttl(), || async {
            state.notes.list(page).await
        })
        .await
        .map_err(storage_error)?;

    let mut items = String::new();
    for note in &result.items {
        items.push_str(&format!(
            "<li><strong>{}</strong> — {}</li>",
            escape(&note.title),
            escape(&note.body)
        ));
    }

    Ok(Html(format!(
        "<!doctype html><title>Notes — Quillpad</title>\
         <h1>Notes</h1><p>Signed in as {}</p><ul>{}</ul><p>{} total</p>",
        escape(&user.0.email),
        items,
        result.total
    )))
}

/// Minimal HTML escaping for user-controlled text.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
