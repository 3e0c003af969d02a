//! Fetch host abstraction.
//!
//! The runtime issues two kinds of GET requests: partial templates (no
//! timeout) and SPA page fetches (custom header, timeout). Hosts decide how
//! bytes move; the runtime only sees [`Request`] and [`Response`].
//!
//! Timeouts are part of the request. A host must give up once
//! `Request::timeout` elapses and report [`FetchError::Timeout`].

#[cfg(not(target_arch = "wasm32"))]
mod fs;

#[cfg(not(target_arch = "wasm32"))]
pub use fs::FsFetcher;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// A GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            url,
            headers: Vec::new(),
            timeout: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response with its body read as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `200 OK` with `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Transport-level failure. HTTP error statuses are not errors here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {}ms", .timeout.as_millis())]
    Timeout { url: Url, timeout: Duration },

    #[error("request to {url} failed: {message}")]
    Network { url: Url, message: String },

    #[error("failed to read `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can perform GET requests.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        (**self).fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let url = Url::parse("https://example.com/about/").unwrap();
        let request = Request::get(url)
            .header("X-Requested-With", "spa")
            .timeout(Duration::from_secs(8));

        assert_eq!(request.header_value("x-requested-with"), Some("spa"));
        assert_eq!(request.header_value("accept"), None);
        assert_eq!(request.timeout, Some(Duration::from_secs(8)));
    }

    #[test]
    fn test_response_success_range() {
        assert!(Response::ok("").is_success());
        assert!(Response::new(204, "").is_success());
        assert!(!Response::new(304, "").is_success());
        assert!(!Response::new(500, "").is_success());
    }

    #[test]
    fn test_timeout_message() {
        let err = FetchError::Timeout {
            url: Url::parse("https://example.com/slow/").unwrap(),
            timeout: Duration::from_millis(8000),
        };
        assert_eq!(
            err.to_string(),
            "request to https://example.com/slow/ timed out after 8000ms"
        );
    }
}
