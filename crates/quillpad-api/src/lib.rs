//! Response envelopes and error codes for the Quillpad API.
//!
//! Every JSON body produced by the server is one of two envelopes:
//!
//! ```json
//! {"success": true,  "message": "...", "data": { ... }, "timestamp": "..."}
//! {"success": false, "message": "...", "error": {"code": "..."}, "timestamp": "..."}
//! ```
//!
//! The `code` field is a stable machine-readable identifier clients branch
//! on; the `message` field is human-readable and may change between releases.
//! Timestamps are RFC 3339 in UTC.

use std::fmt;

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// =============================================================================
// Error Codes
// =============================================================================

/// Stable machine-readable error codes carried in the error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No credentials were presented.
    Unauthorized,
    /// A structurally valid token whose expiry has elapsed.
    TokenExpired,
    /// A token that failed signature or structural validation.
    InvalidToken,
    /// A valid identity with an insufficient role.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request payload failed validation.
    ValidationError,
    /// The primary store reported a failure.
    DatabaseError,
    /// Catch-all for unexpected failures.
    UnknownError,
}

impl ErrorCode {
    /// Returns the wire representation of this code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Returns the HTTP status this code maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::InvalidToken | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::DatabaseError | Self::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Error Envelope
// =============================================================================

/// An API error carrying a stable code, a user-facing message, and an
/// optional internal detail that is logged but never sent to clients in
/// release builds.
#[derive(Debug)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    internal: Option<String>,
}

impl ApiError {
    /// Creates an error with the given code and user-facing message.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            internal: None,
        }
    }

    /// Creates an `UNAUTHORIZED` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a `TOKEN_EXPIRED` error.
    #[must_use]
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired, "Token has expired")
    }

    /// Creates an `INVALID_TOKEN` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidToken, message)
    }

    /// Creates a `FORBIDDEN` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Creates a `NOT_FOUND` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Creates a `VALIDATION_ERROR`.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Creates a `DATABASE_ERROR` whose detail is suppressed outside debug
    /// builds. The detail is always logged.
    #[must_use]
    pub fn database(detail: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::DatabaseError,
            message: "Internal server error".to_string(),
            internal: Some(detail.into()),
        }
    }

    /// Creates an `UNKNOWN_ERROR` whose detail is suppressed outside debug
    /// builds. The detail is always logged.
    #[must_use]
    pub fn unknown(detail: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::UnknownError,
            message: "Internal server error".to_string(),
            internal: Some(detail.into()),
        }
    }

    /// Returns the JSON body of the error envelope.
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        let message = match &self.internal {
            Some(detail) if cfg!(debug_assertions) => detail.clone(),
            _ => self.message.clone(),
        };
        json!({
            "success": false,
            "message": message,
            "error": { "code": self.code.as_str() },
            "timestamp": timestamp(),
        })
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();

        if let Some(detail) = &self.internal {
            tracing::error!(code = %self.code, detail = %detail, "request failed");
        }

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            let www_auth = format!(
                "Bearer realm=\"quillpad\", error=\"{}\"",
                self.code.as_str().to_ascii_lowercase()
            );
            if let Ok(value) = HeaderValue::from_str(&www_auth) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        (status, headers, Json(self.to_body())).into_response()
    }
}

// =============================================================================
// Success Envelope
// =============================================================================

/// The success envelope wrapping a handler's payload.
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a 200 response.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            status: StatusCode::OK,
        }
    }

    /// Creates a 201 response.
    #[must_use]
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            status: StatusCode::CREATED,
        }
    }

    /// Returns the JSON body of the success envelope.
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        json!({
            "success": true,
            "message": self.message,
            "data": self.data,
            "timestamp": timestamp(),
        })
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.to_body())).into_response()
    }
}

/// Current time as an RFC 3339 string in UTC.
#[must_use]
pub fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::new())
}

// =============================================================================
// Tests
// =============================================================================
