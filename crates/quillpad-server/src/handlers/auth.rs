//! Authentication endpoints: signup, login, logout, and the current session.
//!
//! Issued tokens are returned in the response body for API clients and in the
//! session cookie for browsers; both carry the same token. Passwords are
//! hashed with Argon2 and never leave this module in any other form.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use quillpad_api::{ApiError, ApiResponse};
use quillpad_auth::Role;
use quillpad_storage::{NewUser, User};

use crate::extract::{CurrentUser, JsonOrForm};
use crate::state::AppState;

use super::storage_error;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Password hashing
// =============================================================================

pub(crate) fn hash_password(password: &str) -> Result<String, ApiError> {
    use argon2::password_hash::{SaltString, rand_core::OsRng};
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::unknown(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/auth/signup
///
/// Accepts JSON from API clients and form posts from the signup page.
pub async fn signup(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<SignupRequest>,
) -> Result<Response, ApiError> {
    let email = req.email.trim().to_ascii_lowercase();
    if !email.contains('@') {
        return Err(ApiError::validation("A valid email address is required"));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .users
        .create(NewUser {
            email,
            password_hash,
            role: Role::User.as_str().to_string(),
        })
        .await
        .map_err(storage_error)?;

    tracing::info!(user_id = %user.id, "user registered");
    issue_session(&state, &user, true)
}

/// POST /api/auth/login
///
/// Accepts JSON from API clients and form posts from the login page.
pub async fn login(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<LoginRequest>,
) -> Result<Response, ApiError> {
    let email = req.email.trim().to_ascii_lowercase();

    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(storage_error)?;

    // One rejection path for unknown email and wrong password, so responses
    // don't reveal which accounts exist.
    let user = match user {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        _ => {
            tracing::debug!(email = %email, "login rejected");
            return Err(ApiError::unauthorized("Invalid email or password"));
        }
    };

    tracing::info!(user_id = %user.id, "user logged in");
    issue_session(&state, &user, false)
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> Response {
    tracing::info!(subject = %user.0.subject, "user logged out");

    let clear = state.config.auth.cookie.build_clear_cookie();
    let body = ApiResponse::ok("Logged out", json!({}));
    ([(SET_COOKIE, clear)], body).into_response()
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> Response {
    let identity = user.0;
    ApiResponse::ok(
        "Authenticated",
        json!({
            "id": identity.subject,
            "email": identity.email,
            "role": identity.role.as_str(),
        }),
    )
    .into_response()
}

/// Issues a token for `user` and renders the session response: token plus
/// public user fields in the body, the same token in the session cookie.
fn issue_session(state: &AppState, user: &User, created: bool) -> Result<Response, ApiError> {
    let role: Role = user
        .role
        .parse()
        .map_err(|()| ApiError::unknown(format!("user {} has unknown role {:?}", user.id, user.role)))?;

    let token = state
        .codec
        .issue(user.id.to_string(), &user.email, role)
        .map_err(|e| ApiError::unknown(e.to_string()))?;

    let cookie = state
        .config
        .auth
        .cookie
        .build_cookie(&token, state.codec.validity().as_secs());

    let data = json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "role": user.role,
        },
    });
    let body = if created {
        ApiResponse::created("Account created", data)
    } else {
        ApiResponse::ok("Logged in", data)
    };

    Ok(([(SET_COOKIE, cookie)], body).into_response())
}
