//! Authentication and authorization error types.
//!
//! Gate failures are terminal: they are never retried and never reach a
//! handler. `IntoResponse` renders the structured error envelope so a failed
//! extractor or middleware short-circuits with the right status and code.

use axum::response::{IntoResponse, Response};
use quillpad_api::{ApiError, ErrorCode};

/// Errors produced by the authentication and authorization gates.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials were presented.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The token is structurally valid but its expiry has elapsed.
    #[error("Token expired")]
    TokenExpired,

    /// The token failed signature or structural validation.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The authenticated identity lacks the required role.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of why access is forbidden.
        message: String,
    },

    /// The auth configuration is invalid (fatal at startup).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns the stable error code this error maps to.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized { .. } => ErrorCode::Unauthorized,
            Self::TokenExpired => ErrorCode::TokenExpired,
            Self::InvalidToken { .. } => ErrorCode::InvalidToken,
            Self::Forbidden { .. } => ErrorCode::Forbidden,
            Self::Configuration { .. } => ErrorCode::UnknownError,
        }
    }

    /// Returns `true` if this is an authentication failure (who are you).
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::TokenExpired | Self::InvalidToken { .. }
        )
    }

    /// Returns `true` if this is an authorization failure (what may you do).
    #[must_use]
    pub fn is_authorization_error(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let api_error = match self {
            Self::Unauthorized { message } => ApiError::unauthorized(message),
            Self::TokenExpired => ApiError::token_expired(),
            Self::InvalidToken { message } => ApiError::invalid_token(message),
            Self::Forbidden { message } => ApiError::forbidden(message),
            Self::Configuration { message } => ApiError::unknown(message),
        };
        api_error.into_response()
    }
}
