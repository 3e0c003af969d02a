//! Link interception decision.
//!
//! A click is taken over only when every condition holds; the first one
//! that fails names why the browser keeps it:
//!
//! | Check                         | Native reason   |
//! |-------------------------------|-----------------|
//! | anchor has `href`             | `NoHref`        |
//! | `target` empty or `_self`     | `Target`        |
//! | no `download` attribute       | `Download`      |
//! | no opt-out attribute          | `OptOut`        |
//! | `href` resolves               | `InvalidUrl`    |
//! | same origin as the page       | `CrossOrigin`   |
//! | no non-empty fragment         | `Fragment`      |

use url::Url;

use crate::dom::Dom;

/// The attributes of a clicked anchor that matter for interception.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub href: Option<String>,
    pub target: Option<String>,
    pub download: bool,
    pub opt_out: bool,
}

impl Anchor {
    /// Read an anchor element through the DOM host.
    pub fn from_element<D: Dom>(dom: &D, el: &D::Element, opt_out_attr: &str) -> Self {
        Self {
            href: dom.attribute(el, "href"),
            target: dom.attribute(el, "target"),
            download: dom.has_attribute(el, "download"),
            opt_out: dom.has_attribute(el, opt_out_attr),
        }
    }

    /// Plain same-tab link.
    pub fn href(href: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            ..Self::default()
        }
    }
}

/// Why a link is left to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeReason {
    NoHref,
    Target,
    Download,
    OptOut,
    InvalidUrl,
    CrossOrigin,
    Fragment,
}

impl NativeReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoHref => "no href",
            Self::Target => "opens in another browsing context",
            Self::Download => "download link",
            Self::OptOut => "opted out",
            Self::InvalidUrl => "unparseable href",
            Self::CrossOrigin => "cross-origin",
            Self::Fragment => "in-page fragment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDecision {
    /// Prevent default and navigate in place.
    Intercept(Url),
    /// Let the browser handle the click.
    Native(NativeReason),
}

impl LinkDecision {
    pub fn intercepted(&self) -> Option<&Url> {
        match self {
            Self::Intercept(url) => Some(url),
            Self::Native(_) => None,
        }
    }
}

/// Decide whether a click on `anchor` at `location` becomes SPA navigation.
pub fn decide(anchor: &Anchor, location: &Url) -> LinkDecision {
    use LinkDecision::Native;

    let Some(href) = anchor.href.as_deref() else {
        return Native(NativeReason::NoHref);
    };
    if anchor
        .target
        .as_deref()
        .is_some_and(|t| !t.is_empty() && t != "_self")
    {
        return Native(NativeReason::Target);
    }
    if anchor.download {
        return Native(NativeReason::Download);
    }
    if anchor.opt_out {
        return Native(NativeReason::OptOut);
    }

    let Ok(url) = location.join(href.trim()) else {
        return Native(NativeReason::InvalidUrl);
    };
    if url.origin() != location.origin() {
        return Native(NativeReason::CrossOrigin);
    }
    if url.fragment().is_some_and(|f| !f.is_empty()) {
        return Native(NativeReason::Fragment);
    }

    LinkDecision::Intercept(url)
}
