//! Identity claim types.
//!
//! An [`IdentityClaims`] is the signed, time-bounded assertion carried inside
//! a token. It is immutable once signed; changing any field means issuing a
//! new token. The [`Identity`] is the verified view handlers work with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// The role a caller holds, as asserted by the issuing authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
    Editor,
}

impl Role {
    /// Returns the wire representation of this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::Editor => "EDITOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            "EDITOR" => Ok(Self::Editor),
            _ => Err(()),
        }
    }
}

// =============================================================================
// Claims
// =============================================================================

/// The claims encoded into a signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (opaque user identifier).
    pub sub: String,

    /// Email of the subject at issue time.
    pub email: String,

    /// Role of the subject at issue time.
    pub role: Role,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl IdentityClaims {
    /// Returns `true` if the expiry has elapsed relative to `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

// =============================================================================
// Identity
// =============================================================================

/// A verified identity attached to a request by the authority gate.
///
/// Handlers read this from request extensions; its presence means the token
/// was verified for this request, so no handler re-verifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    /// Returns `true` if this identity holds the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Returns `true` if this identity is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<IdentityClaims> for Identity {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            subject: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
