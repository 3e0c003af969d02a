//! Page runtime: owns the hosts and the components, runs startup and
//! dispatches events.
//!
//! ```text
//! new()   base prefix, header/footer containers (located once)
//! boot()  partials ─▶ widgets ─▶ Subscriptions { click, popstate, scroll }
//!
//! click ──▶ on_click ──▶ navigate(url, push = true)
//! popstate ──────────▶ navigate(state.url | location, push = false)
//! scroll ──▶ on_scroll ──(frame)──▶ on_frame ──▶ header class
//! ```
//!
//! `navigate` after a successful swap: base prefix, partials, history,
//! widgets, scroll to top. Any failure before the swap is a full browser
//! navigation to the same URL.

use url::Url;

use crate::config::SiteConfig;
use crate::context::NavContext;
use crate::core::SiteRoot;
use crate::dom::Dom;
use crate::fetch::Fetch;
use crate::nav::{Anchor, FallbackReason, HistoryState, NavOutcome, Navigator, Window, decide};
use crate::partial::{Containers, PartialCache, PartialLoader, RefreshReport};
use crate::scroll::{HeaderVisibility, ScrollDirector};
use crate::widgets::{CaseLibrary, CaseViewer, ViewerOutcome};

/// Event kinds the host has to wire after `boot`. Registered once, never
/// torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Subscriptions {
    pub click: bool,
    pub popstate: bool,
    pub scroll: bool,
}

pub struct Runtime<D: Dom, F, W> {
    config: SiteConfig,
    dom: D,
    containers: Containers<D::Element>,
    fetcher: F,
    window: W,
    ctx: NavContext,
    partials: PartialLoader,
    scroll: ScrollDirector,
    nav: Navigator,
    library: CaseLibrary,
    viewer: CaseViewer,
}

impl<D: Dom, F: Fetch, W: Window> Runtime<D, F, W> {
    pub fn new(config: SiteConfig, dom: D, fetcher: F, window: W, root: SiteRoot) -> Self {
        let ctx = NavContext::new(
            root,
            window.location(),
            PartialCache::new(config.partials.cache),
        );
        let partials = PartialLoader::new(config.partials.clone());
        let containers = partials.ensure_targets(&dom);

        crate::debug!("nav"; "root {} base `{}`", ctx.root(), ctx.base().as_str());
        Self {
            scroll: ScrollDirector::new(&config.scroll).with_offset(window.scroll_y()),
            nav: Navigator::new(config.nav.clone()),
            library: CaseLibrary::new(config.cases.clone()),
            viewer: CaseViewer::new(config.cases.clone()),
            partials,
            ctx,
            config,
            containers,
            dom,
            fetcher,
            window,
        }
    }

    #[inline]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[inline]
    pub fn dom(&self) -> &D {
        &self.dom
    }

    #[inline]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[inline]
    pub fn window(&self) -> &W {
        &self.window
    }

    #[inline]
    pub fn context(&self) -> &NavContext {
        &self.ctx
    }

    #[inline]
    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    #[inline]
    pub fn viewer(&self) -> &CaseViewer {
        &self.viewer
    }

    // ------------------------------------------------------------------------
    // startup
    // ------------------------------------------------------------------------

    /// Inject partials, run widgets and report what the host should listen to.
    pub async fn boot(&self) -> Subscriptions {
        self.start().await.0
    }

    /// `boot`, also returning the partial results.
    pub async fn start(&self) -> (Subscriptions, RefreshReport) {
        let report = self.refresh_partials().await;
        self.init_widgets(&self.ctx.page());

        let spa = self.config.nav.spa && self.dom.query(&self.config.nav.content).is_some();
        let scroll = self.containers.header.is_some();
        let subscriptions = Subscriptions {
            click: spa,
            popstate: spa,
            scroll,
        };
        crate::debug!("nav"; "booted: {:?}", subscriptions);
        (subscriptions, report)
    }

    async fn refresh_partials(&self) -> RefreshReport {
        self.partials
            .refresh(&self.dom, &self.fetcher, &self.ctx, &self.containers)
            .await
    }

    fn init_widgets(&self, url: &Url) -> ViewerOutcome {
        self.library.reset(&self.dom);
        self.viewer.resolve(&self.dom, url, self.ctx.root())
    }

    // ------------------------------------------------------------------------
    // events
    // ------------------------------------------------------------------------

    /// Click decision. `Some(url)` means prevent default and navigate to it.
    pub fn on_click(&self, anchor: &Anchor) -> Option<Url> {
        if !self.config.nav.spa {
            return None;
        }
        decide(anchor, &self.window.location()).intercepted().cloned()
    }

    /// Click decision plus navigation. `None` when the browser keeps the click.
    pub async fn click(&self, anchor: &Anchor) -> Option<NavOutcome> {
        let url = self.on_click(anchor)?;
        Some(self.navigate(&url, true).await)
    }

    /// Back/forward: load the state's URL (or the location) without pushing.
    pub async fn on_popstate(&self, state: Option<HistoryState>) -> NavOutcome {
        let url = HistoryState::target(state.as_ref(), &self.window.location());
        self.navigate(&url, false).await
    }

    /// Returns `true` when the host should request an animation frame.
    pub fn on_scroll(&self) -> bool {
        self.scroll.on_scroll()
    }

    /// Evaluate the scroll position and update the header class.
    pub fn on_frame(&self) -> Option<HeaderVisibility> {
        let visibility = self.scroll.on_frame(self.window.scroll_y())?;
        if let Some(header) = &self.containers.header {
            let hidden = visibility == HeaderVisibility::Hidden;
            self.dom.set_class(header, &self.config.scroll.hidden_class, hidden);
        }
        Some(visibility)
    }

    /// Case library filter button clicked.
    pub fn on_filter(&self, filter: &str) -> usize {
        self.library.apply(&self.dom, filter)
    }

    // ------------------------------------------------------------------------
    // navigation
    // ------------------------------------------------------------------------

    /// Replace the page content with `url` in place, or fall back to a full
    /// navigation.
    pub async fn navigate(&self, url: &Url, push_history: bool) -> NavOutcome {
        let page = match self.nav.plan(&self.fetcher, url).await {
            Ok(page) => page,
            Err(reason) => return self.fall_back(url, reason),
        };
        if let Err(reason) = self.nav.swap(&self.dom, &page) {
            return self.fall_back(url, reason);
        }

        self.ctx.set_page(url.clone());
        self.refresh_partials().await;
        if push_history {
            self.window.push_state(&HistoryState::new(url), url);
        }
        self.init_widgets(url);
        self.window.scroll_to_top();

        self.nav.finish();
        crate::debug!("nav"; "swapped {} (base `{}`)", url, self.ctx.base().as_str());
        NavOutcome::Swapped
    }

    fn fall_back(&self, url: &Url, reason: FallbackReason) -> NavOutcome {
        crate::log!("nav"; "full navigation to {}: {}", url, reason);
        self.window.assign(url);
        self.nav.finish();
        NavOutcome::FullReload(reason)
    }
}

#[cfg(test)]
mod tests;
