//! SPA navigation.
//!
//! # Module Structure
//!
//! ```text
//! nav/
//! ├── link.rs     # click interception decision
//! ├── history.rs  # Window trait, HistoryState, MemoryWindow
//! └── mod.rs      # Navigator: fetch plan, content swap, state (this file)
//! ```
//!
//! # States
//!
//! ```text
//! Idle ──fetch──▶ Fetching ──ok──▶ Swapped ──done──▶ Idle
//!                    │
//!                    └──status/timeout/network/no content──▶ Failed ──assign──▶ Idle
//! ```
//!
//! The page-level sequence after a swap (base, partials, history, widgets,
//! scroll) lives in `Runtime::navigate`.

mod history;
mod link;

pub use history::{HistoryState, MemoryWindow, Window};
pub use link::{Anchor, LinkDecision, NativeReason, decide};

use std::cell::Cell;

use thiserror::Error;
use url::Url;

use crate::config::NavConfig;
use crate::dom::{Dom, ParsedPage};
use crate::fetch::{Fetch, FetchError, Request};

/// Observable navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Idle,
    Fetching,
    Swapped,
    Failed,
}

/// Why a navigation falls back to a full page load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackReason {
    #[error("server answered {0}")]
    Status(u16),

    #[error("no response within {0}ms")]
    Timeout(u128),

    #[error("network error: {0}")]
    Network(String),

    #[error("document has no `{0}` region")]
    NoContent(String),

    #[error("page has no `{0}` region to swap into")]
    NoTarget(String),
}

impl From<FetchError> for FallbackReason {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout { timeout, .. } => Self::Timeout(timeout.as_millis()),
            other => Self::Network(other.to_string()),
        }
    }
}

/// How a navigation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Swapped,
    FullReload(FallbackReason),
}

#[derive(Debug)]
pub struct Navigator {
    config: NavConfig,
    state: Cell<NavState>,
}

impl Navigator {
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            state: Cell::new(NavState::Idle),
        }
    }

    #[inline]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> NavState {
        self.state.get()
    }

    /// Page request: SPA marker header plus the navigation timeout.
    pub fn request(&self, url: &Url) -> Request {
        Request::get(url.clone())
            .header(&self.config.header_name, &self.config.header_value)
            .timeout(self.config.timeout())
    }

    /// Fetch and parse `url` without touching the live page.
    pub async fn plan<F: Fetch>(
        &self,
        fetcher: &F,
        url: &Url,
    ) -> Result<ParsedPage, FallbackReason> {
        self.state.set(NavState::Fetching);
        let result = self.fetch_page(fetcher, url).await;
        if result.is_err() {
            self.state.set(NavState::Failed);
        }
        result
    }

    async fn fetch_page<F: Fetch>(
        &self,
        fetcher: &F,
        url: &Url,
    ) -> Result<ParsedPage, FallbackReason> {
        let response = fetcher.fetch(self.request(url)).await?;
        if !response.is_success() {
            return Err(FallbackReason::Status(response.status));
        }
        ParsedPage::extract(&response.body, &self.config.content)
            .ok_or_else(|| FallbackReason::NoContent(self.config.content.clone()))
    }

    /// Replace the live content region and title with `page`.
    pub fn swap<D: Dom>(&self, dom: &D, page: &ParsedPage) -> Result<(), FallbackReason> {
        let Some(target) = dom.query(&self.config.content) else {
            self.state.set(NavState::Failed);
            return Err(FallbackReason::NoTarget(self.config.content.clone()));
        };

        dom.set_inner_html(&target, &page.content);
        if let Some(title) = &page.title {
            dom.set_title(title);
        }
        self.state.set(NavState::Swapped);
        Ok(())
    }

    /// Back to idle once the page-level steps ran.
    pub fn finish(&self) {
        self.state.set(NavState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::dom::MemoryDom;
    use crate::test_utils::{MockFetcher, fixtures, url};

    fn navigator() -> Navigator {
        Navigator::new(NavConfig::default())
    }

    #[test]
    fn test_request_carries_marker_and_timeout() {
        let request = navigator().request(&url("/about/"));
        assert_eq!(request.header_value("X-Requested-With"), Some("spa"));
        assert_eq!(request.timeout, Some(Duration::from_millis(8000)));
    }

    #[tokio::test]
    async fn test_plan_success() {
        let fetcher = MockFetcher::new();
        fetcher.page("/about/", fixtures::page("About", "<h1>About</h1>"));
        let nav = navigator();

        let page = nav.plan(&fetcher, &url("/about/")).await.unwrap();
        assert_eq!(page.content, "<h1>About</h1>");
        assert_eq!(page.title.as_deref(), Some("About"));
        assert_eq!(nav.state(), NavState::Fetching);
    }

    #[tokio::test]
    async fn test_plan_fallbacks() {
        let fetcher = MockFetcher::new();
        fetcher.status("/broken/", 500);
        fetcher.timeout("/slow/");
        fetcher.fail("/offline/", "dns");
        fetcher.page("/plain/", "<html><body><p>no region</p></body></html>");
        let nav = navigator();

        let cases = [
            ("/broken/", FallbackReason::Status(500)),
            ("/slow/", FallbackReason::Timeout(8000)),
            ("/missing/", FallbackReason::Status(404)),
            ("/plain/", FallbackReason::NoContent(".page-content".to_string())),
        ];
        for (path, expected) in cases {
            assert_eq!(nav.plan(&fetcher, &url(path)).await, Err(expected), "{path}");
            assert_eq!(nav.state(), NavState::Failed);
        }

        let err = nav.plan(&fetcher, &url("/offline/")).await.unwrap_err();
        assert!(matches!(err, FallbackReason::Network(msg) if msg.contains("dns")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_page_times_out_at_limit() {
        let fetcher = MockFetcher::new();
        fetcher.stall("/slow/");
        let nav = navigator();

        let started = tokio::time::Instant::now();
        let result = nav.plan(&fetcher, &url("/slow/")).await;
        let elapsed = started.elapsed();

        assert_eq!(result, Err(FallbackReason::Timeout(8000)));
        assert!(elapsed >= Duration::from_millis(8000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(8100), "{elapsed:?}");
        assert_eq!(nav.state(), NavState::Failed);
    }

    #[test]
    fn test_swap_replaces_content_and_title() {
        let dom = MemoryDom::parse(&fixtures::page("Home", "<h1>Home</h1>"));
        let nav = navigator();
        let page = ParsedPage {
            content: "<h1>Work</h1>".to_string(),
            title: Some("Work".to_string()),
        };

        nav.swap(&dom, &page).unwrap();
        let content = dom.query(".page-content").unwrap();
        assert_eq!(dom.inner_html(&content), "<h1>Work</h1>");
        assert_eq!(dom.title(), "Work");
        assert_eq!(nav.state(), NavState::Swapped);

        nav.finish();
        assert_eq!(nav.state(), NavState::Idle);
    }

    #[test]
    fn test_swap_keeps_title_when_missing() {
        let dom = MemoryDom::parse(&fixtures::page("Home", ""));
        let page = ParsedPage {
            content: "x".to_string(),
            title: None,
        };
        navigator().swap(&dom, &page).unwrap();
        assert_eq!(dom.title(), "Home");
    }

    #[test]
    fn test_swap_without_live_region() {
        let dom = MemoryDom::parse("<main></main>");
        let page = ParsedPage {
            content: "x".to_string(),
            title: None,
        };
        let nav = navigator();
        assert!(matches!(nav.swap(&dom, &page), Err(FallbackReason::NoTarget(_))));
        assert_eq!(nav.state(), NavState::Failed);
    }
}
