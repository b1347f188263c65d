//! The two-stage authorization gate.
//!
//! [`EdgeGate`] and [`AuthorityGate`] implement the same [`Gate`] interface
//! and run in sequence: cheap filtering first, expensive correctness second.
//! Obviously-anonymous traffic is rejected at the edge without touching the
//! codec; a forged-but-present token travels one stage further and is
//! rejected exactly once, by the authority gate.

use std::sync::Arc;

use crate::claims::Identity;
use crate::codec::{TokenCodec, VerifyError};
use crate::credentials::AuthCredentialSource;
use crate::error::AuthError;
use crate::policy::{Access, RoutePolicy};

/// One stage of the authorization pipeline.
///
/// `Ok(None)` means the stage passes the request through without attaching an
/// identity (public route, or a presence-only stage). `Ok(Some(identity))`
/// attaches a verified identity. Errors are terminal.
pub trait Gate: Send + Sync {
    fn evaluate(
        &self,
        path: &str,
        creds: &dyn AuthCredentialSource,
    ) -> Result<Option<Identity>, AuthError>;
}

// =============================================================================
// Edge Gate
// =============================================================================

/// Presence-only check for protected routes.
///
/// Runs with only locally available data: the route table and the raw
/// credential values. It never verifies a signature, so a pass here proves
/// nothing about authenticity.
pub struct EdgeGate {
    policy: Arc<RoutePolicy>,
}

impl EdgeGate {
    #[must_use]
    pub fn new(policy: Arc<RoutePolicy>) -> Self {
        Self { policy }
    }
}

impl Gate for EdgeGate {
    fn evaluate(
        &self,
        path: &str,
        creds: &dyn AuthCredentialSource,
    ) -> Result<Option<Identity>, AuthError> {
        let route = self.policy.classify(path);

        if route.access == Access::Public {
            return Ok(None);
        }

        if creds.token().is_none() {
            tracing::debug!(path = %path, "edge gate rejected request without token");
            return Err(AuthError::unauthorized("Authentication required"));
        }

        // Some token is present. Whether it is authentic is decided later.
        Ok(None)
    }
}

// =============================================================================
// Authority Gate
// =============================================================================

/// Full verification and role enforcement.
///
/// The single source of truth for "is this request authenticated and
/// authorized". Verification is pure: no side effects on the token or any
/// store, so re-evaluating the same request yields the same identity.
pub struct AuthorityGate {
    codec: Arc<TokenCodec>,
    policy: Arc<RoutePolicy>,
}

impl AuthorityGate {
    #[must_use]
    pub fn new(codec: Arc<TokenCodec>, policy: Arc<RoutePolicy>) -> Self {
        Self { codec, policy }
    }
}

impl Gate for AuthorityGate {
    fn evaluate(
        &self,
        path: &str,
        creds: &dyn AuthCredentialSource,
    ) -> Result<Option<Identity>, AuthError> {
        let route = self.policy.classify(path);

        if route.access == Access::Public {
            return Ok(None);
        }

        let token = creds
            .token()
            .ok_or_else(|| AuthError::unauthorized("Authentication required"))?;

        let claims = self.codec.verify(&token).map_err(|e| match e {
            VerifyError::Expired => AuthError::TokenExpired,
            VerifyError::Malformed(message) => {
                tracing::debug!(path = %path, error = %message, "token failed verification");
                AuthError::invalid_token("Token is invalid")
            }
        })?;

        if let Access::Role(required) = route.access
            && claims.role != required
        {
            tracing::debug!(
                path = %path,
                subject = %claims.sub,
                role = %claims.role,
                required = %required,
                "role check failed"
            );
            return Err(AuthError::forbidden(format!(
                "{required} role required"
            )));
        }

        let identity = Identity::from(claims);
        tracing::debug!(
            path = %path,
            subject = %identity.subject,
            role = %identity.role,
            "request authorized"
        );

        Ok(Some(identity))
    }
}

// =============================================================================
// Tests
// =============================================================================
