//! Navigation context shared by every component.
//!
//! Created once at startup. The site root never changes afterwards; the
//! page URL and the base prefix derived from it move together on every
//! navigation.

use std::cell::{Ref, RefCell};

use url::Url;

use crate::core::{BasePrefix, SiteRoot};
use crate::partial::PartialCache;

#[derive(Debug)]
pub struct NavContext {
    root: SiteRoot,
    page: RefCell<Url>,
    base: RefCell<BasePrefix>,
    cache: PartialCache,
}

impl NavContext {
    pub fn new(root: SiteRoot, page: Url, cache: PartialCache) -> Self {
        let base = BasePrefix::for_url(&page, &root);
        Self {
            root,
            page: RefCell::new(page),
            base: RefCell::new(base),
            cache,
        }
    }

    #[inline]
    pub fn root(&self) -> &SiteRoot {
        &self.root
    }

    /// URL the current base prefix was computed from.
    pub fn page(&self) -> Url {
        self.page.borrow().clone()
    }

    pub fn base(&self) -> Ref<'_, BasePrefix> {
        self.base.borrow()
    }

    #[inline]
    pub fn cache(&self) -> &PartialCache {
        &self.cache
    }

    /// Move to `url` and recompute the base prefix. Returns the new prefix.
    pub fn set_page(&self, url: Url) -> BasePrefix {
        let base = BasePrefix::for_url(&url, &self.root);
        *self.base.borrow_mut() = base.clone();
        *self.page.borrow_mut() = url;
        base
    }

    /// Resolve a root-relative asset path through the base prefix.
    ///
    /// `assets/partials/header.html` on `/work/acme/` -> `/work/acme/../../assets/...`,
    /// which the URL parser normalizes to `/assets/partials/header.html`.
    pub fn resolve(&self, relative: &str) -> Result<Url, url::ParseError> {
        let href = format!("{}{}", self.base().as_str(), relative);
        self.page.borrow().join(&href)
    }
}
