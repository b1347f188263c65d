//! Token encoding and verification.
//!
//! Tokens are JWTs signed with HMAC-SHA256 using a process-wide secret from
//! configuration. The issuing authority owns the secret; bearers own only the
//! token value. A missing secret is a fatal startup condition, enforced here
//! by [`TokenCodec::from_secret`] and again by config validation.

use std::time::Duration;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use time::OffsetDateTime;

use crate::claims::{IdentityClaims, Role};
use crate::error::AuthError;

/// Fixed validity window for issued tokens.
pub const TOKEN_VALIDITY: Duration = Duration::from_secs(3600);

// =============================================================================
// Verification Errors
// =============================================================================

/// Errors from [`TokenCodec::verify`].
///
/// Callers must distinguish the two variants: an expired token means the
/// client should re-authenticate, a malformed token means the client is
/// misbehaving or the token was tampered with.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Structurally valid and correctly signed, but the expiry has elapsed.
    #[error("Token expired")]
    Expired,

    /// Signature failure or structural corruption.
    #[error("Malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(err.to_string()),
        }
    }
}

// =============================================================================
// Token Codec
// =============================================================================

/// Encodes and verifies signed identity claims.
///
/// Thread-safe (`Send + Sync`); shared across request handlers as an `Arc`.
/// Verification is CPU-bound and performs no I/O or side effects, so
/// verifying the same token twice yields the same result.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl TokenCodec {
    /// Creates a codec from the configured signing secret.
    ///
    /// # Errors
    /// Returns a configuration error if the secret is empty. Callers treat
    /// this as fatal at startup.
    pub fn from_secret(secret: &str) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::configuration(
                "auth signing secret must not be empty",
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validity: TOKEN_VALIDITY,
        })
    }

    /// Overrides the validity window. Used by tests to mint short-lived
    /// tokens without waiting an hour.
    #[must_use]
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Returns the validity window applied to issued tokens.
    #[must_use]
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Issues a signed token for the given subject.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn issue(
        &self,
        subject: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = IdentityClaims {
            sub: subject.into(),
            email: email.into(),
            role,
            iat: now,
            exp: now + self.validity.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::configuration(format!("failed to encode token: {e}")))
    }

    /// Verifies a token's signature and expiry and returns its claims.
    ///
    /// # Errors
    /// `VerifyError::Expired` for a valid but time-expired token,
    /// `VerifyError::Malformed` for anything else.
    pub fn verify(&self, token: &str) -> Result<IdentityClaims, VerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against IdentityClaims::is_expired_at, so
        // the boundary is exactly `exp <= now` with no leeway. The `exp`
        // claim itself must still be present.
        validation.validate_exp = false;

        let data = decode::<IdentityClaims>(token, &self.decoding_key, &validation)?;

        let now = OffsetDateTime::now_utc().unix_timestamp();
        if data.claims.is_expired_at(now) {
            return Err(VerifyError::Expired);
        }
        Ok(data.claims)
    }
}

// =============================================================================
// Bearer Header Parsing
// =============================================================================

/// Extracts the token from an `Authorization` header value of the exact form
/// `"Bearer <token>"`: case-insensitive scheme, a single space, and a
/// non-empty remainder. Anything else returns `None`.
#[must_use]
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    if rest.is_empty() || rest.starts_with(' ') {
        return None;
    }
    Some(rest)
}

// =============================================================================
// Tests
// =============================================================================
