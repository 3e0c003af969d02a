//! `Dom` over the live document.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::dom::Dom;

#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for WebDom {
    type Element = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn create_element(&self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn prepend(&self, parent: &Element, child: &Element) {
        parent.prepend_with_node_1(child).ok();
    }

    fn append(&self, parent: &Element, child: &Element) {
        parent.append_with_node_1(child).ok();
    }

    fn set_inner_html(&self, el: &Element, html: &str) {
        el.set_inner_html(html);
    }

    fn inner_html(&self, el: &Element) -> String {
        el.inner_html()
    }

    fn set_text(&self, el: &Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn text(&self, el: &Element) -> String {
        el.text_content().unwrap_or_default()
    }

    fn attribute(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&self, el: &Element, name: &str, value: &str) {
        el.set_attribute(name, value).ok();
    }

    fn remove_attribute(&self, el: &Element, name: &str) {
        el.remove_attribute(name).ok();
    }

    fn has_attribute(&self, el: &Element, name: &str) -> bool {
        el.has_attribute(name)
    }

    fn add_class(&self, el: &Element, class: &str) {
        el.class_list().add_1(class).ok();
    }

    fn remove_class(&self, el: &Element, class: &str) {
        el.class_list().remove_1(class).ok();
    }

    fn has_class(&self, el: &Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn title(&self) -> String {
        self.document.title()
    }

    fn set_title(&self, title: &str) {
        self.document.set_title(title);
    }
}
