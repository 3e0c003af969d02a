//! Arena-backed DOM for headless use.
//!
//! Documents are parsed with `tl` and copied into a flat node arena. Element
//! handles are plain indices, so they stay valid across mutations; nodes cut
//! loose by `set_inner_html` simply become unreachable from the root.
//!
//! Text nodes keep their source form (entities are not decoded), which makes
//! `inner_html` a faithful round trip of what was parsed.

use std::cell::RefCell;

use super::Dom;
use super::selector::Selector;
use crate::utils::html::{escape, escape_attr, is_raw_text_element, is_void_element, unescape};

/// Handle to a node in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

#[derive(Debug)]
enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
pub struct MemoryDom {
    nodes: RefCell<Vec<Node>>,
    title: RefCell<String>,
}

impl MemoryDom {
    /// Parse a full document (or a fragment, which becomes the root's children).
    pub fn parse(html: &str) -> Self {
        let dom = Self {
            nodes: RefCell::new(vec![Node {
                kind: NodeKind::Element {
                    tag: "#document".to_string(),
                    attrs: Vec::new(),
                },
                parent: None,
                children: Vec::new(),
            }]),
            title: RefCell::new(String::new()),
        };
        dom.insert_html(ROOT, html);

        let title = dom
            .query("title")
            .map(|el| dom.text_content(&el).trim().to_string())
            .unwrap_or_default();
        *dom.title.borrow_mut() = title;
        dom
    }

    /// Serialized document (children of the synthetic root).
    pub fn html(&self) -> String {
        self.inner_html(&ROOT)
    }

    /// Element tag name, lowercase.
    pub fn tag(&self, el: &NodeId) -> Option<String> {
        match &self.nodes.borrow().get(el.0)?.kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    /// Parent element, `None` for the root and detached nodes.
    pub fn parent(&self, el: &NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(el.0)?.parent
    }

    /// Nearest inclusive ancestor with the given tag.
    pub fn closest(&self, el: &NodeId, tag: &str) -> Option<NodeId> {
        let mut current = Some(*el);
        while let Some(id) = current {
            if self.tag(&id).is_some_and(|t| t == tag) {
                return Some(id);
            }
            current = self.parent(&id);
        }
        None
    }

    /// Decoded text of all descendant text nodes.
    pub fn text_content(&self, el: &NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        collect_text(&nodes, *el, &mut out);
        out
    }

    // ------------------------------------------------------------------------
    // arena internals
    // ------------------------------------------------------------------------

    fn push(&self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }

    fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.borrow().get(id.0).map(|n| &n.kind),
            Some(NodeKind::Element { .. })
        )
    }

    fn insert_html(&self, parent: NodeId, html: &str) {
        let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
            // tl only fails on pathological input; keep it as text
            let text = self.push(NodeKind::Text(html.to_string()), Some(parent));
            self.nodes.borrow_mut()[parent.0].children.push(text);
            return;
        };

        let parser = dom.parser();
        for handle in dom.children() {
            self.import(*handle, parser, parent);
        }
    }

    fn import(&self, handle: tl::NodeHandle, parser: &tl::Parser, parent: NodeId) {
        let Some(node) = handle.get(parser) else {
            return;
        };

        let id = match node {
            tl::Node::Tag(tag) => {
                let name = tag.name().as_utf8_str().to_lowercase();
                if name.starts_with('!') {
                    for child in tag.children().top().iter() {
                        self.import(*child, parser, parent);
                    }
                    return;
                }
                // tl shifts the name of an attribute that follows a valueless one
                let attrs = start_tag_attributes(&tag.raw().as_utf8_str());

                let id = self.push(NodeKind::Element { tag: name, attrs }, Some(parent));
                for child in tag.children().top().iter() {
                    self.import(*child, parser, id);
                }
                id
            }
            tl::Node::Raw(bytes) => {
                let text = bytes.as_utf8_str().to_string();
                self.push(NodeKind::Text(text), Some(parent))
            }
            tl::Node::Comment(_) => return,
        };

        self.nodes.borrow_mut()[parent.0].children.push(id);
    }

    fn find_all(&self, selector: &Selector, first_only: bool) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = nodes[ROOT.0].children.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let node = &nodes[id.0];
            if let NodeKind::Element { tag, attrs } = &node.kind {
                let lookup = |name: &str| {
                    attrs
                        .iter()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| v.as_str())
                };
                if selector.matches(tag, lookup) {
                    found.push(id);
                    if first_only {
                        break;
                    }
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
        found
    }

    fn parse_selector(selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(sel) => Some(sel),
            Err(err) => {
                crate::debug!("dom"; "unsupported selector `{}`: {}", selector, err);
                None
            }
        }
    }

    fn with_attrs<R>(
        &self,
        el: &NodeId,
        f: impl FnOnce(&mut Vec<(String, String)>) -> R,
    ) -> Option<R> {
        let mut nodes = self.nodes.borrow_mut();
        match &mut nodes.get_mut(el.0)?.kind {
            NodeKind::Element { attrs, .. } => Some(f(attrs)),
            NodeKind::Text(_) => None,
        }
    }

    fn replace_children(&self, el: &NodeId) {
        let old = std::mem::take(&mut self.nodes.borrow_mut()[el.0].children);
        let mut nodes = self.nodes.borrow_mut();
        for child in old {
            nodes[child.0].parent = None;
        }
    }

    fn class_list(&self, el: &NodeId) -> Vec<String> {
        self.attribute(el, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// Dom impl
// ============================================================================

impl Dom for MemoryDom {
    type Element = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        let selector = Self::parse_selector(selector)?;
        self.find_all(&selector, true).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        match Self::parse_selector(selector) {
            Some(selector) => self.find_all(&selector, false),
            None => Vec::new(),
        }
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        let kind = NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        };
        Some(self.push(kind, None))
    }

    fn prepend(&self, parent: &NodeId, child: &NodeId) {
        if !self.is_element(*parent) {
            return;
        }
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(*parent);
        nodes[parent.0].children.insert(0, *child);
    }

    fn append(&self, parent: &NodeId, child: &NodeId) {
        if !self.is_element(*parent) {
            return;
        }
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(*parent);
        nodes[parent.0].children.push(*child);
    }

    fn set_inner_html(&self, el: &NodeId, html: &str) {
        if !self.is_element(*el) {
            return;
        }
        self.replace_children(el);
        self.insert_html(*el, html);
    }

    fn inner_html(&self, el: &NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        if let Some(node) = nodes.get(el.0) {
            for child in &node.children {
                serialize(&nodes, *child, &mut out);
            }
        }
        out
    }

    fn set_text(&self, el: &NodeId, text: &str) {
        if !self.is_element(*el) {
            return;
        }
        self.replace_children(el);
        let id = self.push(NodeKind::Text(escape(text).into_owned()), Some(*el));
        self.nodes.borrow_mut()[el.0].children.push(id);
    }

    fn text(&self, el: &NodeId) -> String {
        self.text_content(el)
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        match &nodes.get(el.0)?.kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone()),
            NodeKind::Text(_) => None,
        }
    }

    fn set_attribute(&self, el: &NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        self.with_attrs(el, |attrs| match attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((name, value.to_string())),
        });
    }

    fn remove_attribute(&self, el: &NodeId, name: &str) {
        self.with_attrs(el, |attrs| attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name)));
    }

    fn add_class(&self, el: &NodeId, class: &str) {
        let mut classes = self.class_list(el);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.set_attribute(el, "class", &classes.join(" "));
        }
    }

    fn remove_class(&self, el: &NodeId, class: &str) {
        let mut classes = self.class_list(el);
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            self.set_attribute(el, "class", &classes.join(" "));
        }
    }

    fn has_class(&self, el: &NodeId, class: &str) -> bool {
        self.class_list(el).iter().any(|c| c == class)
    }

    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }
}

// ============================================================================
// attributes
// ============================================================================

/// Attributes of the start tag at the beginning of `raw`, names lowercased,
/// values entity-decoded. Later duplicates are dropped.
fn start_tag_attributes(raw: &str) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = Vec::new();
    let Some(rest) = raw.strip_prefix('<') else {
        return attrs;
    };
    let mut rest = rest.trim_start_matches(|c: char| !c.is_whitespace() && c != '>' && c != '/');

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() || rest.starts_with('>') {
            return attrs;
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let mut value = String::new();
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (raw_value, tail) = match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    match body.find(quote) {
                        Some(end) => (&body[..end], &body[end + 1..]),
                        None => (body, ""),
                    }
                }
                _ => {
                    let end = after_eq
                        .find(|c: char| c.is_whitespace() || c == '>')
                        .unwrap_or(after_eq.len());
                    after_eq.split_at(end)
                }
            };
            value = unescape(raw_value).into_owned();
            rest = tail;
        }

        if !name.is_empty() && !attrs.iter().any(|(key, _)| *key == name) {
            attrs.push((name, value));
        }
    }
}

// ============================================================================
// serialization
// ============================================================================

fn serialize(nodes: &[Node], id: NodeId, out: &mut String) {
    let node = &nodes[id.0];
    match &node.kind {
        NodeKind::Text(text) => out.push_str(text),
        NodeKind::Element { tag, attrs } => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in attrs {
                out.push(' ');
                out.push_str(key);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(tag) {
                return;
            }
            for child in &node.children {
                serialize(nodes, *child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn collect_text(nodes: &[Node], id: NodeId, out: &mut String) {
    let Some(node) = nodes.get(id.0) else {
        return;
    };
    match &node.kind {
        NodeKind::Text(text) => out.push_str(&unescape(text)),
        NodeKind::Element { tag, .. } if is_raw_text_element(tag) => {}
        NodeKind::Element { .. } => {
            for child in &node.children {
                collect_text(nodes, *child, out);
            }
        }
    }
}

// ============================================================================
// tests
// ============================================================================
