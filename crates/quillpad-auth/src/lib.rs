//! Authentication and authorization for Quillpad.
//!
//! Requests pass through two cooperating stages of one pipeline:
//!
//! 1. The [`gate::EdgeGate`] checks only that *some* token is present on
//!    protected routes. It is signature-blind by design and never touches
//!    the codec, so it can run in a constrained environment.
//! 2. The [`gate::AuthorityGate`] performs full signature and expiry
//!    verification via the [`codec::TokenCodec`] and enforces the role the
//!    [`policy::RoutePolicy`] requires for the route.
//!
//! A request that clears the edge gate is not yet proven authentic; only the
//! authority gate attaches a verified [`claims::Identity`].

pub mod claims;
pub mod codec;
pub mod cookie;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod policy;

pub use claims::{Identity, IdentityClaims, Role};
pub use codec::{TokenCodec, VerifyError, parse_bearer};
pub use cookie::CookieSettings;
pub use credentials::{AuthCredentialSource, HeaderCredentials};
pub use error::AuthError;
pub use gate::{AuthorityGate, EdgeGate, Gate};
pub use policy::{Access, RouteKind, RouteMatch, RoutePolicy, RouteRule};
