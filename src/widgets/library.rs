//! Case library tag filter.
//!
//! Buttons carry `data-filter="<tag>"`, cards carry `data-tags="a b, c"`.
//! Applying a filter marks its button active and hides every card whose
//! tags don't include it. The `all` filter shows everything.

use crate::config::CasesConfig;
use crate::dom::Dom;

#[derive(Debug, Clone)]
pub struct CaseLibrary {
    config: CasesConfig,
}

impl CaseLibrary {
    pub fn new(config: CasesConfig) -> Self {
        Self { config }
    }

    /// Apply `filter`. Returns the number of visible cards.
    pub fn apply<D: Dom>(&self, dom: &D, filter: &str) -> usize {
        let config = &self.config;
        let filter = filter.trim();
        let show_all = filter.eq_ignore_ascii_case(&config.all);

        for button in dom.query_all(&format!("[{}]", config.filter_attr)) {
            let value = dom.attribute(&button, &config.filter_attr).unwrap_or_default();
            dom.set_class(&button, &config.active_class, value.trim() == filter);
        }

        let mut visible = 0;
        for card in dom.query_all(&format!("[{}]", config.tags_attr)) {
            let tags = dom.attribute(&card, &config.tags_attr).unwrap_or_default();
            let shown = show_all || has_tag(&tags, filter);
            dom.set_class(&card, &config.hidden_class, !shown);
            visible += usize::from(shown);
        }
        visible
    }

    /// Back to the unfiltered view.
    pub fn reset<D: Dom>(&self, dom: &D) -> usize {
        self.apply(dom, &self.config.all)
    }

    /// Filter value of a clicked button, if it is one.
    pub fn filter_of<D: Dom>(&self, dom: &D, el: &D::Element) -> Option<String> {
        dom.attribute(el, &self.config.filter_attr)
    }
}

/// Whether a whitespace/comma separated tag list contains `tag`.
fn has_tag(tags: &str, tag: &str) -> bool {
    tags.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .any(|t| t.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    const LIBRARY: &str = r#"<div class="filters">
<button data-filter="all" class="is-active">All</button>
<button data-filter="brand">Brand</button>
<button data-filter="web">Web</button>
</div>
<article id="a" data-tags="brand web"></article>
<article id="b" data-tags="web,motion"></article>
<article id="c" data-tags="Brand"></article>"#;

    fn library() -> (MemoryDom, CaseLibrary) {
        (MemoryDom::parse(LIBRARY), CaseLibrary::new(CasesConfig::default()))
    }

    fn hidden(dom: &MemoryDom) -> Vec<String> {
        dom.query_all("article")
            .iter()
            .filter(|el| dom.has_class(el, "is-hidden"))
            .filter_map(|el| dom.attribute(el, "id"))
            .collect()
    }

    fn active(dom: &MemoryDom) -> Vec<String> {
        dom.query_all("button")
            .iter()
            .filter(|el| dom.has_class(el, "is-active"))
            .filter_map(|el| dom.attribute(el, "data-filter"))
            .collect()
    }

    #[test]
    fn test_apply_filter() {
        let (dom, library) = library();
        assert_eq!(library.apply(&dom, "web"), 2);
        assert_eq!(hidden(&dom), ["c"]);
        assert_eq!(active(&dom), ["web"]);
    }

    #[test]
    fn test_tags_case_insensitive() {
        let (dom, library) = library();
        assert_eq!(library.apply(&dom, "brand"), 2);
        assert_eq!(hidden(&dom), ["b"]);
    }

    #[test]
    fn test_reset_shows_all() {
        let (dom, library) = library();
        library.apply(&dom, "motion");
        assert_eq!(hidden(&dom), ["a", "c"]);

        assert_eq!(library.reset(&dom), 3);
        assert!(hidden(&dom).is_empty());
        assert_eq!(active(&dom), ["all"]);
    }

    #[test]
    fn test_unknown_filter_hides_everything() {
        let (dom, library) = library();
        assert_eq!(library.apply(&dom, "print"), 0);
        assert!(active(&dom).is_empty());
    }

    #[test]
    fn test_page_without_library() {
        let dom = MemoryDom::parse("<main></main>");
        assert_eq!(CaseLibrary::new(CasesConfig::default()).reset(&dom), 0);
    }

    #[test]
    fn test_has_tag() {
        assert!(has_tag("brand, web  motion", "web"));
        assert!(!has_tag("webdesign", "web"));
        assert!(!has_tag("", ""));
    }
}
