//! DOM host abstraction.
//!
//! Components never hold a concrete document. They talk to a [`Dom`], which
//! is `web_sys` in the browser and [`MemoryDom`] everywhere else.
//!
//! # Module Structure
//!
//! ```text
//! dom/
//! ├── selector.rs   # selector subset for MemoryDom
//! ├── memory.rs     # arena DOM parsed with tl
//! ├── page.rs       # ParsedPage: content region + title of a fetched page
//! └── mod.rs        # Dom trait, container helpers (this file)
//! ```
//!
//! All methods take `&self`: implementations use interior mutability, and no
//! borrow outlives a call.

mod memory;
mod page;
pub mod selector;

pub use memory::{MemoryDom, NodeId};
pub use page::ParsedPage;

use selector::Selector;

/// Minimal document surface the runtime needs.
pub trait Dom {
    /// Cheap handle to a live element.
    type Element: Clone;

    /// First element matching `selector` in document order.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// Every element matching `selector` in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// New detached element. `None` if the host refuses.
    fn create_element(&self, tag: &str) -> Option<Self::Element>;

    fn prepend(&self, parent: &Self::Element, child: &Self::Element);
    fn append(&self, parent: &Self::Element, child: &Self::Element);

    fn set_inner_html(&self, el: &Self::Element, html: &str);
    fn inner_html(&self, el: &Self::Element) -> String;

    /// Replace children with a single text node.
    fn set_text(&self, el: &Self::Element, text: &str);
    fn text(&self, el: &Self::Element) -> String;

    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&self, el: &Self::Element, name: &str, value: &str);
    fn remove_attribute(&self, el: &Self::Element, name: &str);

    fn has_attribute(&self, el: &Self::Element, name: &str) -> bool {
        self.attribute(el, name).is_some()
    }

    fn add_class(&self, el: &Self::Element, class: &str);
    fn remove_class(&self, el: &Self::Element, class: &str);
    fn has_class(&self, el: &Self::Element, class: &str) -> bool;

    /// Toggle `class` on or off.
    fn set_class(&self, el: &Self::Element, class: &str, on: bool) {
        if on {
            self.add_class(el, class);
        } else {
            self.remove_class(el, class);
        }
    }

    fn title(&self) -> String;
    fn set_title(&self, title: &str);
}

/// Where a created container goes inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    First,
    Last,
}

/// Find the element for `selector`, creating it under `parent_selector` if
/// it is missing.
///
/// The created element takes its tag, id and classes from the first compound
/// of `selector` (`tag` is the fallback tag). Returns `None` when neither the
/// element nor the parent exists.
pub fn ensure_container<D: Dom>(
    dom: &D,
    selector: &str,
    tag: &str,
    parent_selector: &str,
    placement: Placement,
) -> Option<D::Element> {
    if let Some(existing) = dom.query(selector) {
        return Some(existing);
    }

    let parent = dom.query(parent_selector)?;
    let compound = Selector::parse(selector).ok()?.groups().first()?.clone();
    let el = dom.create_element(compound.tag.as_deref().unwrap_or(tag))?;

    if let Some(id) = &compound.id {
        dom.set_attribute(&el, "id", id);
    }
    for class in &compound.classes {
        dom.add_class(&el, class);
    }
    for attr in &compound.attrs {
        dom.set_attribute(&el, &attr.name, attr.value.as_deref().unwrap_or_default());
    }

    match placement {
        Placement::First => dom.prepend(&parent, &el),
        Placement::Last => dom.append(&parent, &el),
    }
    crate::debug!("dom"; "created `{}` under `{}`", selector, parent_selector);
    Some(el)
}
