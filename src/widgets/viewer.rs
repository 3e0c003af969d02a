//! Case viewer: frames one case study named by the `case` query parameter.
//!
//! Only paths under the case library prefix are framed:
//!
//! ```text
//! ?case=cases/library/foo/index.html           -> {root}cases/library/foo/index.html
//! ?case=%2Fwebsites%2Facme%2Fcases%2Flibrary%2Fx -> {root}cases/library/x
//! ?case=../../etc/passwd                        -> inline error
//! ?case=cases/library/../../secret              -> inline error
//! ```

use thiserror::Error;
use url::Url;

use crate::config::CasesConfig;
use crate::core::{SiteRoot, encode_segment};
use crate::dom::Dom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CaseError {
    #[error("no case parameter")]
    Missing,

    #[error("case path is outside the case library")]
    OutsidePrefix,

    #[error("case path climbs out of the case library")]
    Traversal,
}

/// A validated case path, relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRequest {
    relative: String,
}

impl CaseRequest {
    /// Read and validate the case parameter of `url`.
    pub fn from_url(url: &Url, param: &str, prefix: &str) -> Result<Self, CaseError> {
        let value = url
            .query_pairs()
            .find(|(key, _)| key == param)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.trim().is_empty())
            .ok_or(CaseError::Missing)?;
        Self::parse(&value, prefix)
    }

    /// Validate an already-decoded case value.
    pub fn parse(value: &str, prefix: &str) -> Result<Self, CaseError> {
        let normalized = value.trim().replace('\\', "/");
        let start = normalized.find(prefix).ok_or(CaseError::OutsidePrefix)?;
        let relative = &normalized[start..];

        if relative.split('/').any(|segment| segment == "..") {
            return Err(CaseError::Traversal);
        }
        Ok(Self {
            relative: relative.to_string(),
        })
    }

    #[inline]
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Absolute URL path of the case under `root`.
    pub fn src(&self, root: &SiteRoot) -> String {
        let encoded: Vec<String> = self.relative.split('/').map(encode_segment).collect();
        root.join(&encoded.join("/"))
    }
}

/// What the viewer did with the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerOutcome {
    /// Page has no viewer frame.
    NoViewer,
    /// Frame source set to this path.
    Framed(String),
    /// Inline error shown.
    Rejected(CaseError),
}

#[derive(Debug, Clone)]
pub struct CaseViewer {
    config: CasesConfig,
}

impl CaseViewer {
    pub fn new(config: CasesConfig) -> Self {
        Self { config }
    }

    /// Validate the case parameter of `url` without touching the DOM.
    pub fn request(&self, url: &Url) -> Result<CaseRequest, CaseError> {
        CaseRequest::from_url(url, &self.config.param, &self.config.prefix)
    }

    /// Point the viewer at the case named by `url`, or show why it can't.
    pub fn resolve<D: Dom>(&self, dom: &D, url: &Url, root: &SiteRoot) -> ViewerOutcome {
        let config = &self.config;
        let Some(frame) = dom.query(&config.frame) else {
            return ViewerOutcome::NoViewer;
        };
        let error = dom.query(&config.error);

        match self.request(url) {
            Ok(case) => {
                let src = case.src(root);
                dom.set_attribute(&frame, "src", &src);
                if let Some(link) = dom.query(&config.link) {
                    dom.set_attribute(&link, "href", &src);
                }
                if let Some(error) = error {
                    dom.add_class(&error, &config.hidden_class);
                }
                ViewerOutcome::Framed(src)
            }
            Err(reason) => {
                crate::debug!("viewer"; "not framing {}: {}", url, reason);
                dom.remove_attribute(&frame, "src");
                if let Some(error) = error {
                    let message = match reason {
                        CaseError::Missing => &config.missing_message,
                        _ => &config.rejected_message,
                    };
                    dom.set_text(&error, message);
                    dom.remove_class(&error, &config.hidden_class);
                }
                ViewerOutcome::Rejected(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    const PREFIX: &str = "cases/library/";

    const VIEWER: &str = r##"<div class="viewer">
<p data-case-error class="is-hidden"></p>
<iframe data-case-frame></iframe>
<a data-case-link href="#">Open directly</a>
</div>"##;

    fn page(query: &str) -> Url {
        Url::parse("https://acme.test/websites/acme/cases/viewer.html")
            .unwrap()
            .join(query)
            .unwrap()
    }

    fn viewer() -> (MemoryDom, CaseViewer, SiteRoot) {
        (
            MemoryDom::parse(VIEWER),
            CaseViewer::new(CasesConfig::default()),
            SiteRoot::new("/websites/acme/"),
        )
    }

    #[test]
    fn test_parse_valid() {
        let case = CaseRequest::parse("cases/library/foo/index.html", PREFIX).unwrap();
        assert_eq!(case.relative(), "cases/library/foo/index.html");
    }

    #[test]
    fn test_parse_truncates_to_prefix() {
        let case = CaseRequest::parse("/websites/acme/cases/library/foo/", PREFIX).unwrap();
        assert_eq!(case.relative(), "cases/library/foo/");

        let case = CaseRequest::parse(r"..\cases\library\bar\index.html", PREFIX).unwrap();
        assert_eq!(case.relative(), "cases/library/bar/index.html");
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(
            CaseRequest::parse("../../etc/passwd", PREFIX),
            Err(CaseError::OutsidePrefix)
        );
        assert_eq!(
            CaseRequest::parse("cases/library/../../secret.html", PREFIX),
            Err(CaseError::Traversal)
        );
        assert_eq!(
            CaseRequest::parse(r"cases\library\..\x", PREFIX),
            Err(CaseError::Traversal)
        );
    }

    #[test]
    fn test_from_url_decodes() {
        let url = page("?case=%2Fwebsites%2Facme%2Fcases%2Flibrary%2Fmy%20case%2F");
        let case = CaseRequest::from_url(&url, "case", PREFIX).unwrap();
        assert_eq!(case.relative(), "cases/library/my case/");
        assert_eq!(
            case.src(&SiteRoot::new("/websites/acme/")),
            "/websites/acme/cases/library/my%20case/"
        );
    }

    #[test]
    fn test_from_url_missing() {
        for query in ["", "?other=1", "?case=", "?case=%20"] {
            assert_eq!(
                CaseRequest::from_url(&page(query), "case", PREFIX),
                Err(CaseError::Missing),
                "{query}"
            );
        }
    }

    #[test]
    fn test_resolve_frames_case() {
        let (dom, viewer, root) = viewer();
        let outcome = viewer.resolve(&dom, &page("?case=cases/library/foo/index.html"), &root);

        let src = "/websites/acme/cases/library/foo/index.html";
        assert_eq!(outcome, ViewerOutcome::Framed(src.to_string()));

        let frame = dom.query("[data-case-frame]").unwrap();
        let link = dom.query("[data-case-link]").unwrap();
        let error = dom.query("[data-case-error]").unwrap();
        assert_eq!(dom.attribute(&frame, "src").as_deref(), Some(src));
        assert_eq!(dom.attribute(&link, "href").as_deref(), Some(src));
        assert!(dom.has_class(&error, "is-hidden"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (dom, viewer, root) = viewer();
        let outcome = viewer.resolve(&dom, &page("?case=../../etc/passwd"), &root);
        assert_eq!(outcome, ViewerOutcome::Rejected(CaseError::OutsidePrefix));

        let frame = dom.query("[data-case-frame]").unwrap();
        let error = dom.query("[data-case-error]").unwrap();
        assert!(!dom.has_attribute(&frame, "src"));
        assert!(!dom.has_class(&error, "is-hidden"));
        assert_eq!(dom.text(&error), "This case cannot be displayed here.");
    }

    #[test]
    fn test_resolve_missing_param_message() {
        let (dom, viewer, root) = viewer();
        viewer.resolve(&dom, &page(""), &root);
        let error = dom.query("[data-case-error]").unwrap();
        assert_eq!(dom.text(&error), "No case selected.");
    }

    #[test]
    fn test_resolve_without_frame() {
        let dom = MemoryDom::parse("<main></main>");
        let viewer = CaseViewer::new(CasesConfig::default());
        let outcome = viewer.resolve(&dom, &page("?case=cases/library/x/"), &SiteRoot::default());
        assert_eq!(outcome, ViewerOutcome::NoViewer);
    }
}
