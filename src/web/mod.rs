//! Browser host: `web-sys` implementations of the host traits and the wasm
//! entry point.
//!
//! # Module Structure
//!
//! ```text
//! web/
//! ├── dom.rs     # WebDom
//! ├── fetch.rs   # WebFetcher (AbortController timeouts)
//! ├── window.rs  # WebWindow (location, history, scroll)
//! └── mod.rs     # #[wasm_bindgen(start)], listener wiring (this file)
//! ```
//!
//! Listeners are registered once after `boot` and live as long as the page,
//! so their closures are leaked with `Closure::forget`.

mod dom;
mod fetch;
mod window;

pub use dom::WebDom;
pub use fetch::WebFetcher;
pub use window::WebWindow;

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, MouseEvent, PopStateEvent};

use crate::config::{INLINE_CONFIG_ID, SiteConfig};
use crate::core::SiteRoot;
use crate::dom::Dom;
use crate::nav::{Anchor, HistoryState};
use crate::runtime::{Runtime, Subscriptions};

type WebRuntime = Runtime<WebDom, WebFetcher, WebWindow>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = inline_config(&document);
    let root = site_root(&document, &config);
    let runtime = Rc::new(Runtime::new(
        config,
        WebDom::new(document),
        WebFetcher::new(window.clone()),
        WebWindow::new(window)?,
        root,
    ));

    spawn_local(async move {
        let subscriptions = runtime.boot().await;
        if let Err(err) = subscribe(&runtime, subscriptions) {
            crate::log!("error"; "failed to register listeners: {}", js_error(&err));
        }
    });
    Ok(())
}

/// Config from the inline JSON block, defaults when absent, malformed or
/// failing validation.
fn inline_config(document: &Document) -> SiteConfig {
    let Some(json) = document
        .get_element_by_id(INLINE_CONFIG_ID)
        .and_then(|el| el.text_content())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            crate::log!("config"; "ignoring #{}: {}", INLINE_CONFIG_ID, err);
            SiteConfig::default()
        }
    }
}

/// Site root from config, else from the loader script's URL.
fn site_root(document: &Document, config: &SiteConfig) -> SiteRoot {
    let selector = format!("script[src$=\"{}\"]", config.site.script);
    let script_path = document
        .current_script()
        .and_then(|el| el.get_attribute("src"))
        .or_else(|| {
            document
                .query_selector(&selector)
                .ok()
                .flatten()
                .and_then(|el| el.get_attribute("src"))
        })
        .and_then(|src| {
            let base = document.url().ok()?;
            url::Url::parse(&base).ok()?.join(&src).ok()
        })
        .map(|url| url.path().to_string());

    config.site.site_root(script_path.as_deref())
}

// ============================================================================
// listeners
// ============================================================================

fn subscribe(runtime: &Rc<WebRuntime>, subscriptions: Subscriptions) -> Result<(), JsValue> {
    let document = runtime.dom().document().clone();
    let window = runtime.window().inner().clone();

    // Filter buttons work with or without SPA navigation
    on_click(&document, runtime.clone(), subscriptions.click)?;
    if subscriptions.popstate {
        on_popstate(&window, runtime.clone())?;
    }
    if subscriptions.scroll {
        on_scroll(&window, runtime.clone())?;
    }
    Ok(())
}

fn on_click(document: &Document, runtime: Rc<WebRuntime>, spa: bool) -> Result<(), JsValue> {
    let listener = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        if event.default_prevented() || event.button() != 0 {
            return;
        }
        if event.meta_key() || event.ctrl_key() || event.shift_key() || event.alt_key() {
            return;
        }
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };

        let dom = runtime.dom();
        let filter_attr = format!("[{}]", runtime.config().cases.filter_attr);
        if let Ok(Some(button)) = target.closest(&filter_attr) {
            if let Some(filter) = dom.attribute(&button, &runtime.config().cases.filter_attr) {
                runtime.on_filter(&filter);
            }
            return;
        }

        if !spa {
            return;
        }
        let Ok(Some(link)) = target.closest("a") else {
            return;
        };
        let anchor = Anchor::from_element(dom, &link, &runtime.config().nav.opt_out);
        if let Some(url) = runtime.on_click(&anchor) {
            event.prevent_default();
            let runtime = runtime.clone();
            spawn_local(async move {
                runtime.navigate(&url, true).await;
            });
        }
    });
    document.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
    listener.forget();
    Ok(())
}

fn on_popstate(window: &web_sys::Window, runtime: Rc<WebRuntime>) -> Result<(), JsValue> {
    let listener = Closure::<dyn FnMut(PopStateEvent)>::new(move |event: PopStateEvent| {
        let state = js_sys::JSON::stringify(&event.state())
            .ok()
            .and_then(|json| json.as_string())
            .and_then(|json| HistoryState::from_json(&json));
        let runtime = runtime.clone();
        spawn_local(async move {
            runtime.on_popstate(state).await;
        });
    });
    window.add_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref())?;
    listener.forget();
    Ok(())
}

fn on_scroll(window: &web_sys::Window, runtime: Rc<WebRuntime>) -> Result<(), JsValue> {
    let frame = {
        let runtime = runtime.clone();
        Closure::<dyn FnMut()>::new(move || {
            runtime.on_frame();
        })
    };

    let frame_window = window.clone();
    let listener = Closure::<dyn FnMut()>::new(move || {
        if runtime.on_scroll() {
            frame_window
                .request_animation_frame(frame.as_ref().unchecked_ref())
                .ok();
        }
    });
    window.add_event_listener_with_callback("scroll", listener.as_ref().unchecked_ref())?;
    listener.forget();
    Ok(())
}

/// Best-effort message of a thrown JS value.
pub(crate) fn js_error(err: &JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    err.dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .unwrap_or_else(|| format!("{err:?}"))
}
