//! Route classification.
//!
//! A static table maps path prefixes to an access policy and a route kind.
//! Both gates consult the same table: the edge gate to decide whether a token
//! must be present (and whether to redirect or return JSON on failure), the
//! authority gate to learn which role the route requires.
//!
//! The table is built once at startup and shared as an `Arc`; it is read-only
//! thereafter.

use std::str::FromStr;

use crate::claims::Role;

/// Whether a route serves HTML pages or the JSON API.
///
/// Page routes redirect unauthenticated users to the login page; API routes
/// answer with the structured error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Page,
    Api,
}

/// The access policy a route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No credentials needed.
    Public,
    /// Any authenticated identity.
    Authenticated,
    /// An authenticated identity holding exactly this role.
    Role(Role),
}

/// One entry of the route table.
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub prefix: String,
    pub kind: RouteKind,
    pub access: Access,
}

/// The classification result for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch {
    pub kind: RouteKind,
    pub access: Access,
}

/// The static route policy table.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
    login_path: String,
}

impl RoutePolicy {
    /// Creates an empty policy with the given login path for page redirects.
    #[must_use]
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            login_path: login_path.into(),
        }
    }

    /// Adds a rule. Longer prefixes win over shorter ones regardless of
    /// insertion order.
    #[must_use]
    pub fn rule(mut self, prefix: impl Into<String>, kind: RouteKind, access: Access) -> Self {
        self.rules.push(RouteRule {
            prefix: prefix.into(),
            kind,
            access,
        });
        self
    }

    /// The path unauthenticated page requests are redirected to.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Classifies a request path.
    ///
    /// The longest matching prefix wins; prefixes match only at path-segment
    /// boundaries, so `/api/notes` matches `/api/notes/7` but not
    /// `/api/notesX`. Unmatched paths fail closed as authenticated API.
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteMatch {
        let mut best: Option<&RouteRule> = None;

        for rule in &self.rules {
            if !prefix_matches(&rule.prefix, path) {
                continue;
            }
            match best {
                Some(current) if current.prefix.len() >= rule.prefix.len() => {}
                _ => best = Some(rule),
            }
        }

        match best {
            Some(rule) => RouteMatch {
                kind: rule.kind,
                access: rule.access,
            },
            // Fail closed: an unlisted path requires authentication.
            None => RouteMatch {
                kind: RouteKind::Api,
                access: Access::Authenticated,
            },
        }
    }

    /// The default Quillpad route table.
    #[must_use]
    pub fn default_table() -> Self {
        Self::new("/login")
            // Public pages and health checks
            .rule("/", RouteKind::Page, Access::Public)
            .rule("/login", RouteKind::Page, Access::Public)
            .rule("/signup", RouteKind::Page, Access::Public)
            .rule("/healthz", RouteKind::Api, Access::Public)
            .rule("/readyz", RouteKind::Api, Access::Public)
            // Public auth endpoints
            .rule("/api/auth/login", RouteKind::Api, Access::Public)
            .rule("/api/auth/signup", RouteKind::Api, Access::Public)
            // Authenticated surface
            .rule("/api/auth/logout", RouteKind::Api, Access::Authenticated)
            .rule("/api/auth/me", RouteKind::Api, Access::Authenticated)
            .rule("/notes", RouteKind::Page, Access::Authenticated)
            .rule("/api/notes", RouteKind::Api, Access::Authenticated)
            // Admin-only surface
            .rule("/api/users", RouteKind::Api, Access::Role(Role::Admin))
            .rule("/api/admin", RouteKind::Api, Access::Role(Role::Admin))
    }
}

/// Prefix match constrained to path-segment boundaries.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        // Root matches only the root page itself, not every path.
        return path == "/";
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

impl FromStr for RouteKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(Self::Page),
            "api" => Ok(Self::Api),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RoutePolicy {
        RoutePolicy::default_table()
    }

    #[test]
    fn test_public_routes() {
        let p = policy();
        assert_eq!(p.classify("/healthz").access, Access::Public);
        assert_eq!(p.classify("/login").access, Access::Public);
        assert_eq!(p.classify("/api/auth/login").access, Access::Public);
        assert_eq!(p.classify("/api/auth/signup").access, Access::Public);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let p = policy();
        // /api/auth/login is public even though /api/* generally is not.
        assert_eq!(p.classify("/api/auth/login").access, Access::Public);
        // But logout under the same /api/auth tree is authenticated.
        assert_eq!(p.classify("/api/auth/logout").access, Access::Authenticated);
    }

    #[test]
    fn test_protected_routes() {
        let p = policy();
        assert_eq!(p.classify("/api/notes").access, Access::Authenticated);
        assert_eq!(p.classify("/api/notes/42").access, Access::Authenticated);
        assert_eq!(p.classify("/notes").kind, RouteKind::Page);
    }

    #[test]
    fn test_admin_routes() {
        let p = policy();
        assert_eq!(p.classify("/api/users").access, Access::Role(Role::Admin));
        assert_eq!(
            p.classify("/api/users/123").access,
            Access::Role(Role::Admin)
        );
        assert_eq!(
            p.classify("/api/admin/stats").access,
            Access::Role(Role::Admin)
        );
    }

    #[test]
    fn test_segment_boundary_matching() {
        let p = policy();
        // /api/notesX must not match the /api/notes rule; it falls through
        // to the fail-closed default.
        let m = p.classify("/api/notesX");
        assert_eq!(m.access, Access::Authenticated);
        assert_eq!(m.kind, RouteKind::Api);
    }

    #[test]
    fn test_root_matches_only_root() {
        let p = policy();
        assert_eq!(p.classify("/").access, Access::Public);
        assert_eq!(p.classify("/unknown").access, Access::Authenticated);
    }

    #[test]
    fn test_unknown_path_fails_closed() {
        let p = policy();
        let m = p.classify("/internal/debug");
        assert_eq!(m.access, Access::Authenticated);
        assert_eq!(m.kind, RouteKind::Api);
    }

    #[test]
    fn test_login_path() {
        assert_eq!(policy().login_path(), "/login");
    }
}
