//! Request extractors.
//!
//! Besides [`CurrentUser`], this module wraps axum's `Json`, `Path`, and
//! `Query` extractors so a malformed ID, query string, or body renders the
//! structured error envelope instead of axum's plain-text rejection.

use axum::extract::{Form, FromRequest, FromRequestParts, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use quillpad_api::ApiError;
use quillpad_auth::Identity;

/// The verified identity the authority gate attached to this request.
///
/// Handlers take this as an argument instead of re-verifying the token. The
/// rejection only fires if a handler behind an authenticated route somehow
/// runs without the gate having stored an identity, which indicates a wiring
/// bug rather than a client error.
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// JSON body whose rejection is a `VALIDATION_ERROR` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

/// Path parameters whose rejection is a `VALIDATION_ERROR` envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// Query parameters whose rejection is a `VALIDATION_ERROR` envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// Request body decoded as JSON or as an HTML form, by content type.
///
/// The auth endpoints take this so the host pages' plain `<form>` posts work
/// alongside JSON API clients.
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            Ok(Self(value))
        } else {
            let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
            Ok(Self(value))
        }
    }
}
