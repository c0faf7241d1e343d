//! Authenticated API session shared between pipeline stages.
//!
//! The browser login produces an `ApiSession`; the pipeline turns it into a
//! reqwest client that replays the harvested cookies on every request.

pub mod browser;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER};
use std::collections::HashMap;

/// Cookies and request headers harvested from a browser login, enough to
/// impersonate the logged-in tab against the internal wordlist API.
#[derive(Debug, Clone)]
pub struct ApiSession {
    /// Domain the session was established against.
    pub domain: String,
    cookies: HashMap<String, String>,
    referer: String,
}

impl ApiSession {
    pub fn new(domain: &str, referer: &str) -> Self {
        Self {
            domain: domain.to_string(),
            cookies: HashMap::new(),
            referer: referer.to_string(),
        }
    }

    pub fn add_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub fn cookie_count(&self) -> usize {
        self.cookies.len()
    }

    /// Format cookies as a `Cookie` header value, sorted by name so the
    /// header is deterministic.
    pub fn cookie_header(&self) -> String {
        let mut pairs: Vec<_> = self.cookies.iter().collect();
        pairs.sort_by_key(|(name, _)| (*name).clone());
        pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Build a reqwest client that sends the session cookies plus the
    /// browser-like headers the wordlist API expects on every request.
    pub fn client(&self) -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(
            "x-requested-with",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&self.referer).context("referer header value")?,
        );
        if !self.cookies.is_empty() {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&self.cookie_header()).context("cookie header value")?,
            );
        }

        reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("building session HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_sorted() {
        let mut session = ApiSession::new("example.com", "https://example.com/saved");
        session.add_cookie("session_id", "abc123");
        session.add_cookie("csrftoken", "xyz789");

        // Sorted by name: csrftoken comes before session_id.
        assert_eq!(
            session.cookie_header(),
            "csrftoken=xyz789; session_id=abc123"
        );
    }

    #[test]
    fn test_cookie_header_empty() {
        let session = ApiSession::new("example.com", "https://example.com/");
        assert_eq!(session.cookie_header(), "");
    }

    #[test]
    fn test_add_cookie_overwrites() {
        let mut session = ApiSession::new("example.com", "https://example.com/");
        session.add_cookie("sid", "old");
        session.add_cookie("sid", "new");
        assert_eq!(session.cookie_count(), 1);
        assert_eq!(session.cookie_header(), "sid=new");
    }

    #[test]
    fn test_client_builds_with_cookies() {
        let mut session = ApiSession::new("example.com", "https://example.com/saved");
        session.add_cookie("sid", "value");
        assert!(session.client().is_ok());
    }
}
