//! Content extraction from a fetched page.

use super::{Dom, MemoryDom};

/// The parts of a fetched document that replace the live page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// Inner HTML of the content region.
    pub content: String,

    /// Document title, `None` when absent or blank.
    pub title: Option<String>,
}

impl ParsedPage {
    /// Parse `html` and pull out the region matching `content_selector`.
    ///
    /// Returns `None` when the document has no such region.
    pub fn extract(html: &str, content_selector: &str) -> Option<Self> {
        let doc = MemoryDom::parse(html);
        let region = doc.query(content_selector)?;
        let title = doc.title();

        Some(Self {
            content: doc.inner_html(&region),
            title: (!title.is_empty()).then_some(title),
        })
    }
}
