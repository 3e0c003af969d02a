//! `Window` over the browser window and its history.

use url::Url;
use wasm_bindgen::JsValue;

use super::js_error;
use crate::nav::{HistoryState, Window};

#[derive(Debug, Clone)]
pub struct WebWindow {
    window: web_sys::Window,
    /// Location at startup, used if `location.href` ever fails to parse.
    initial: Url,
}

impl WebWindow {
    pub fn new(window: web_sys::Window) -> Result<Self, JsValue> {
        let href = window.location().href()?;
        let initial = Url::parse(&href).map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self { window, initial })
    }

    #[inline]
    pub fn inner(&self) -> &web_sys::Window {
        &self.window
    }
}

impl Window for WebWindow {
    fn location(&self) -> Url {
        self.window
            .location()
            .href()
            .ok()
            .and_then(|href| Url::parse(&href).ok())
            .unwrap_or_else(|| self.initial.clone())
    }

    fn assign(&self, url: &Url) {
        if let Err(err) = self.window.location().assign(url.as_str()) {
            crate::log!("error"; "location.assign({}) failed: {}", url, js_error(&err));
        }
    }

    fn push_state(&self, state: &HistoryState, url: &Url) {
        let result = self.window.history().and_then(|history| {
            let state = js_sys::JSON::parse(&state.to_json())?;
            history.push_state_with_url(&state, "", Some(url.as_str()))
        });
        if let Err(err) = result {
            crate::log!("error"; "history.pushState({}) failed: {}", url, js_error(&err));
        }
    }

    fn scroll_to_top(&self) {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(web_sys::ScrollBehavior::Instant);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}
