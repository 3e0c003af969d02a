//! Shared partial injection (header/footer).
//!
//! ```text
//! load(path, target)
//!   ├── target has data-static="true"  -> untouched
//!   ├── cache hit                      -> substitute, inject (no request)
//!   └── GET {base}{path}
//!         ├── 2xx   -> cache raw template, substitute, inject
//!         └── else  -> log, target untouched
//! ```
//!
//! The cache holds raw templates, so a cached partial is re-substituted
//! with whatever the base prefix is at load time.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use thiserror::Error;
use url::Url;

use crate::config::PartialsConfig;
use crate::context::NavContext;
use crate::core::BasePrefix;
use crate::dom::{Dom, Placement, ensure_container};
use crate::fetch::{Fetch, FetchError, Request};

// ============================================================================
// cache
// ============================================================================

/// Raw partial templates keyed by partial path. Never evicted.
#[derive(Debug, Default)]
pub struct PartialCache {
    enabled: bool,
    entries: RefCell<FxHashMap<String, String>>,
}

impl PartialCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RefCell::default(),
        }
    }

    pub fn get(&self, path: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.entries.borrow().get(path).cloned()
    }

    pub fn insert(&self, path: &str, template: String) {
        if self.enabled {
            self.entries.borrow_mut().insert(path.to_string(), template);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// substitution
// ============================================================================

/// Placeholder values for one injection.
struct BaseVars<'a> {
    placeholder: &'a str,
    base: &'a BasePrefix,
}

impl BaseVars<'_> {
    fn apply(&self, template: &str) -> String {
        template.replace(self.placeholder, self.base.as_str())
    }
}

// ============================================================================
// loader
// ============================================================================

#[derive(Debug, Error)]
pub enum PartialError {
    #[error("invalid partial url `{path}`: {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{url} answered {status}")]
    Status { url: Url, status: u16 },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// What a successful load did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Injected; `cached` when no request was made.
    Injected { cached: bool },
    /// Target is pre-rendered (`data-static="true"`).
    Static,
    /// The page has no container for this partial.
    NoTarget,
}

/// Which shared partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialKind {
    Header,
    Footer,
}

impl PartialKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }
}

/// Per-partial results of one refresh.
#[derive(Debug)]
pub struct RefreshReport {
    pub header: Result<LoadOutcome, PartialError>,
    pub footer: Result<LoadOutcome, PartialError>,
}

impl RefreshReport {
    pub fn is_ok(&self) -> bool {
        self.header.is_ok() && self.footer.is_ok()
    }

    pub fn failures(&self) -> impl Iterator<Item = (PartialKind, &PartialError)> {
        [
            (PartialKind::Header, self.header.as_ref().err()),
            (PartialKind::Footer, self.footer.as_ref().err()),
        ]
        .into_iter()
        .filter_map(|(kind, err)| err.map(|e| (kind, e)))
    }
}

/// Header and footer elements, located once per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Containers<E> {
    pub header: Option<E>,
    pub footer: Option<E>,
}

impl<E> Containers<E> {
    pub fn get(&self, kind: PartialKind) -> Option<&E> {
        match kind {
            PartialKind::Header => self.header.as_ref(),
            PartialKind::Footer => self.footer.as_ref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PartialLoader {
    config: PartialsConfig,
}

impl PartialLoader {
    pub fn new(config: PartialsConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &PartialsConfig {
        &self.config
    }

    /// Path and target selector of a partial.
    pub fn slot(&self, kind: PartialKind) -> (&str, &str) {
        match kind {
            PartialKind::Header => (&self.config.header, &self.config.header_target),
            PartialKind::Footer => (&self.config.footer, &self.config.footer_target),
        }
    }

    /// Locate header/footer containers, creating missing ones as plain `div`s
    /// under the page wrapper (header first, footer last).
    ///
    /// Partials are only ever injected into the returned handles, so markup
    /// inside swapped content that matches a target selector is left alone.
    pub fn ensure_targets<D: Dom>(&self, dom: &D) -> Containers<D::Element> {
        Containers {
            header: self.ensure_target(dom, PartialKind::Header, Placement::First),
            footer: self.ensure_target(dom, PartialKind::Footer, Placement::Last),
        }
    }

    fn ensure_target<D: Dom>(
        &self,
        dom: &D,
        kind: PartialKind,
        placement: Placement,
    ) -> Option<D::Element> {
        let (_, target) = self.slot(kind);
        let el = ensure_container(dom, target, "div", &self.config.page, placement);
        if el.is_none() {
            crate::debug!(
                "partial";
                "no {} container and no `{}` to attach one",
                kind.name(),
                self.config.page
            );
        }
        el
    }

    /// Inject the partial at `path` into `target`.
    ///
    /// Failures are logged and leave `target` as it was.
    pub async fn load<D: Dom, F: Fetch>(
        &self,
        dom: &D,
        fetcher: &F,
        ctx: &NavContext,
        path: &str,
        target: &D::Element,
    ) -> Result<LoadOutcome, PartialError> {
        if dom.attribute(target, &self.config.static_attr).as_deref() == Some("true") {
            return Ok(LoadOutcome::Static);
        }

        let result = self.template(fetcher, ctx, path).await;
        match result {
            Ok((template, cached)) => {
                let base = ctx.base().clone();
                let vars = BaseVars {
                    placeholder: &self.config.placeholder,
                    base: &base,
                };
                dom.set_inner_html(target, &vars.apply(&template));
                Ok(LoadOutcome::Injected { cached })
            }
            Err(err) => {
                crate::log!("partial"; "failed to load {}: {}", path, err);
                Err(err)
            }
        }
    }

    /// Load one shared partial into its container.
    pub async fn load_slot<D: Dom, F: Fetch>(
        &self,
        dom: &D,
        fetcher: &F,
        ctx: &NavContext,
        containers: &Containers<D::Element>,
        kind: PartialKind,
    ) -> Result<LoadOutcome, PartialError> {
        let (path, _) = self.slot(kind);
        match containers.get(kind) {
            Some(target) => self.load(dom, fetcher, ctx, path, target).await,
            None => Ok(LoadOutcome::NoTarget),
        }
    }

    /// Load header and footer concurrently. Resolves once both settled.
    pub async fn refresh<D: Dom, F: Fetch>(
        &self,
        dom: &D,
        fetcher: &F,
        ctx: &NavContext,
        containers: &Containers<D::Element>,
    ) -> RefreshReport {
        let (header, footer) = tokio::join!(
            self.load_slot(dom, fetcher, ctx, containers, PartialKind::Header),
            self.load_slot(dom, fetcher, ctx, containers, PartialKind::Footer),
        );
        RefreshReport { header, footer }
    }

    /// Raw template for `path`, from cache or network.
    async fn template<F: Fetch>(
        &self,
        fetcher: &F,
        ctx: &NavContext,
        path: &str,
    ) -> Result<(String, bool), PartialError> {
        if let Some(template) = ctx.cache().get(path) {
            return Ok((template, true));
        }

        let url = ctx.resolve(path).map_err(|source| PartialError::Url {
            path: path.to_string(),
            source,
        })?;
        let response = fetcher.fetch(Request::get(url.clone())).await?;
        if !response.is_success() {
            return Err(PartialError::Status {
                url,
                status: response.status,
            });
        }

        ctx.cache().insert(path, response.body.clone());
        Ok((response.body, false))
    }
}
