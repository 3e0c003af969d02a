//! Shared test helpers: a scripted fetcher and page fixtures.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use url::Url;

use crate::fetch::{Fetch, FetchError, Request, Response};

pub const ORIGIN: &str = "https://acme.test";

/// Absolute URL on the test origin.
pub fn url(path: &str) -> Url {
    Url::parse(ORIGIN)
        .and_then(|origin| origin.join(path))
        .unwrap()
}

#[derive(Debug, Clone)]
enum Route {
    Respond(Response),
    Timeout,
    Stall,
    Fail(String),
}

/// Fetcher answering from a table keyed by URL path. Unknown paths get 404.
#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: RefCell<FxHashMap<String, Route>>,
    requests: RefCell<Vec<Request>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `200` with `body` at `path`.
    pub fn page(&self, path: &str, body: impl Into<String>) {
        self.route(path, Route::Respond(Response::ok(body)));
    }

    pub fn status(&self, path: &str, status: u16) {
        self.route(path, Route::Respond(Response::new(status, "error page")));
    }

    /// Requests with a timeout time out; requests without one fail.
    pub fn timeout(&self, path: &str) {
        self.route(path, Route::Timeout);
    }

    /// Never answers. Requests with a timeout run out their deadline on the
    /// tokio clock; requests without one fail.
    pub fn stall(&self, path: &str) {
        self.route(path, Route::Stall);
    }

    pub fn fail(&self, path: &str, message: &str) {
        self.route(path, Route::Fail(message.to_string()));
    }

    fn route(&self, path: &str, route: Route) {
        self.routes.borrow_mut().insert(path.to_string(), route);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    /// Number of requests made for `path`.
    pub fn count(&self, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }
}

impl Fetch for MockFetcher {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        self.requests.borrow_mut().push(request.clone());
        let route = self.routes.borrow().get(request.url.path()).cloned();

        match route {
            Some(Route::Respond(response)) => Ok(response),
            Some(Route::Timeout) => match request.timeout {
                Some(timeout) => Err(FetchError::Timeout {
                    url: request.url,
                    timeout,
                }),
                None => Err(FetchError::Network {
                    url: request.url,
                    message: "connection stalled".to_string(),
                }),
            },
            Some(Route::Stall) => match request.timeout {
                Some(timeout) => {
                    let stalled = std::future::pending::<Response>();
                    tokio::time::timeout(timeout, stalled)
                        .await
                        .map_err(|_| FetchError::Timeout {
                            url: request.url,
                            timeout,
                        })
                }
                None => Err(FetchError::Network {
                    url: request.url,
                    message: "connection stalled".to_string(),
                }),
            },
            Some(Route::Fail(message)) => Err(FetchError::Network {
                url: request.url,
                message,
            }),
            None => Ok(Response::new(404, "not found")),
        }
    }
}

pub mod fixtures {
    /// Header partial using the base placeholder.
    pub const HEADER: &str = r#"<nav><a href="{{base}}index.html">Home</a><a href="{{base}}work/">Work</a></nav>"#;

    pub const FOOTER: &str = r#"<p>&copy; Acme <a href="{{base}}contact/">Contact</a></p>"#;

    /// A full document with the standard page skeleton.
    pub fn page(title: &str, content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html><head><title>{title}</title></head>
<body><div class="page"><header class="site-header"></header><main class="page-content">{content}</main><footer class="footer"></footer></div></body></html>"#
        )
    }

    /// Same skeleton without header/footer containers.
    pub fn bare_page(title: &str, content: &str) -> String {
        format!(
            r#"<html><head><title>{title}</title></head>
<body><div class="page"><main class="page-content">{content}</main></div></body></html>"#
        )
    }
}
