//! Credential extraction from requests.
//!
//! Gate logic depends only on [`AuthCredentialSource`], never on a concrete
//! request type. [`HeaderCredentials`] is the production implementation over
//! an HTTP header map; tests substitute fixed values.

use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};

use crate::codec::parse_bearer;

/// Where a request's token may be found.
///
/// The bearer header is preferred; the cookie is the browser fallback.
pub trait AuthCredentialSource {
    /// Token from the `Authorization: Bearer <token>` header, if the header
    /// is present and well-formed.
    fn bearer_token(&self) -> Option<String>;

    /// Token from the session cookie, if present and non-empty.
    fn cookie_token(&self) -> Option<String>;

    /// The token to use: bearer preferred, cookie fallback.
    fn token(&self) -> Option<String> {
        self.bearer_token().or_else(|| self.cookie_token())
    }
}

/// Credential source backed by request headers.
pub struct HeaderCredentials<'a> {
    headers: &'a HeaderMap,
    cookie_name: &'a str,
}

impl<'a> HeaderCredentials<'a> {
    /// Wraps a header map, looking for the token cookie under `cookie_name`.
    #[must_use]
    pub fn new(headers: &'a HeaderMap, cookie_name: &'a str) -> Self {
        Self {
            headers,
            cookie_name,
        }
    }
}

impl AuthCredentialSource for HeaderCredentials<'_> {
    fn bearer_token(&self) -> Option<String> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_bearer)
            .map(ToString::to_string)
    }

    fn cookie_token(&self) -> Option<String> {
        let cookie_header = self.headers.get(COOKIE)?.to_str().ok()?;

        for cookie in cookie_header.split(';') {
            let cookie = cookie.trim();
            if let Some((name, value)) = cookie.split_once('=')
                && name.trim() == self.cookie_name
            {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(auth: Option<&str>, cookie: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(v) = auth {
            map.insert(AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        }
        if let Some(v) = cookie {
            map.insert(COOKIE, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn test_bearer_token_extraction() {
        let map = headers(Some("Bearer tok123"), None);
        let creds = HeaderCredentials::new(&map, "token");
        assert_eq!(creds.bearer_token(), Some("tok123".to_string()));
        assert_eq!(creds.cookie_token(), None);
        assert_eq!(creds.token(), Some("tok123".to_string()));
    }

    #[test]
    fn test_malformed_bearer_is_ignored() {
        let map = headers(Some("Basic dXNlcg=="), None);
        let creds = HeaderCredentials::new(&map, "token");
        assert_eq!(creds.bearer_token(), None);
    }

    #[test]
    fn test_cookie_token_extraction() {
        let map = headers(None, Some("theme=dark; token=cook456; lang=en"));
        let creds = HeaderCredentials::new(&map, "token");
        assert_eq!(creds.cookie_token(), Some("cook456".to_string()));
    }

    #[test]
    fn test_empty_cookie_value_is_ignored() {
        let map = headers(None, Some("token=; theme=dark"));
        let creds = HeaderCredentials::new(&map, "token");
        assert_eq!(creds.cookie_token(), None);
    }

    #[test]
    fn test_bearer_preferred_over_cookie() {
        let map = headers(Some("Bearer from-header"), Some("token=from-cookie"));
        let creds = HeaderCredentials::new(&map, "token");
        assert_eq!(creds.token(), Some("from-header".to_string()));
    }

    #[test]
    fn test_no_credentials() {
        let map = headers(None, None);
        let creds = HeaderCredentials::new(&map, "token");
        assert_eq!(creds.token(), None);
    }
}
