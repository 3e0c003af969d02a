//! Window host: location, history and scrolling.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};
use url::Url;

/// History entry state pushed on SPA navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub url: String,
}

impl HistoryState {
    pub fn new(url: &Url) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a state value. Anything that isn't `{ "url": string }` is `None`.
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// URL to load on popstate: the state's URL, else the current location.
    pub fn target(state: Option<&Self>, location: &Url) -> Url {
        state
            .and_then(|s| location.join(&s.url).ok())
            .unwrap_or_else(|| location.clone())
    }
}

/// Browser window surface used by navigation.
pub trait Window {
    /// Current location.
    fn location(&self) -> Url;

    /// Full browser navigation to `url`.
    fn assign(&self, url: &Url);

    /// Add a history entry for `url` without loading it.
    fn push_state(&self, state: &HistoryState, url: &Url);

    /// Jump to the top of the page, no smooth scrolling.
    fn scroll_to_top(&self);

    /// Current vertical scroll offset.
    fn scroll_y(&self) -> f64;
}

// ============================================================================
// MemoryWindow
// ============================================================================

#[derive(Debug, Clone)]
struct Entry {
    url: Url,
    state: Option<HistoryState>,
}

/// Headless window with a back/forward history stack.
#[derive(Debug)]
pub struct MemoryWindow {
    current: RefCell<Entry>,
    back: RefCell<Vec<Entry>>,
    forward: RefCell<Vec<Entry>>,
    assigned: RefCell<Vec<Url>>,
    scroll: Cell<f64>,
}

impl MemoryWindow {
    pub fn new(url: Url) -> Self {
        Self {
            current: RefCell::new(Entry { url, state: None }),
            back: RefCell::default(),
            forward: RefCell::default(),
            assigned: RefCell::default(),
            scroll: Cell::new(0.0),
        }
    }

    /// Number of entries in the session history (`history.length`).
    pub fn history_len(&self) -> usize {
        self.back.borrow().len() + 1 + self.forward.borrow().len()
    }

    /// Last full navigation requested, if any.
    pub fn assigned(&self) -> Option<Url> {
        self.assigned.borrow().last().cloned()
    }

    pub fn set_scroll(&self, y: f64) {
        self.scroll.set(y);
    }

    /// Step back. Returns the entry's state, as a popstate event would carry.
    pub fn back(&self) -> Option<Option<HistoryState>> {
        let prev = self.back.borrow_mut().pop()?;
        let current = self.current.replace(prev.clone());
        self.forward.borrow_mut().push(current);
        Some(prev.state)
    }

    /// Step forward. Same shape as [`MemoryWindow::back`].
    pub fn forward(&self) -> Option<Option<HistoryState>> {
        let next = self.forward.borrow_mut().pop()?;
        let current = self.current.replace(next.clone());
        self.back.borrow_mut().push(current);
        Some(next.state)
    }
}

impl Window for MemoryWindow {
    fn location(&self) -> Url {
        self.current.borrow().url.clone()
    }

    fn assign(&self, url: &Url) {
        self.assigned.borrow_mut().push(url.clone());
    }

    fn push_state(&self, state: &HistoryState, url: &Url) {
        let entry = Entry {
            url: url.clone(),
            state: Some(state.clone()),
        };
        let previous = self.current.replace(entry);
        self.back.borrow_mut().push(previous);
        self.forward.borrow_mut().clear();
    }

    fn scroll_to_top(&self) {
        self.scroll.set(0.0);
    }

    fn scroll_y(&self) -> f64 {
        self.scroll.get()
    }
}
