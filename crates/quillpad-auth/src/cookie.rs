//! Session cookie settings.
//!
//! The cookie carries the same token as the bearer header for browser
//! sessions: `HttpOnly`, `Secure` in production, `SameSite`, and a `Max-Age`
//! matching token validity. Logout clears it with `Max-Age=0`.

use serde::{Deserialize, Serialize};

/// Configuration for the token cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieSettings {
    /// Cookie name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Whether to set the `Secure` attribute. On in production.
    #[serde(default = "default_secure")]
    pub secure: bool,

    /// Whether to set the `HttpOnly` attribute.
    #[serde(default = "default_http_only")]
    pub http_only: bool,

    /// `SameSite` attribute value (`Strict`, `Lax`, or `None`).
    #[serde(default = "default_same_site")]
    pub same_site: String,

    /// Cookie path.
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_name() -> String {
    "token".into()
}
fn default_secure() -> bool {
    true
}
fn default_http_only() -> bool {
    true
}
fn default_same_site() -> String {
    "Lax".into()
}
fn default_path() -> String {
    "/".into()
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: default_name(),
            secure: default_secure(),
            http_only: default_http_only(),
            same_site: default_same_site(),
            path: default_path(),
        }
    }
}

impl CookieSettings {
    /// Builds a `Set-Cookie` value carrying `token` for `max_age_secs`.
    #[must_use]
    pub fn build_cookie(&self, token: &str, max_age_secs: u64) -> String {
        let mut cookie = format!(
            "{}={}; Max-Age={}; Path={}; SameSite={}",
            self.name, token, max_age_secs, self.path, self.same_site
        );
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Builds a `Set-Cookie` value that clears the token cookie.
    #[must_use]
    pub fn build_clear_cookie(&self) -> String {
        self.build_cookie("", 0)
    }
}
