//! Vitrine - client-side navigation runtime for static sites.
//!
//! Shared header/footer partials with a depth-aware `{{base}}` prefix,
//! SPA-style link interception with a full-navigation fallback, a
//! scroll-aware header and the case library widgets, written against small
//! host traits so the same code runs in the browser (`web` feature) and
//! headless.

#[macro_use]
pub mod logger;

pub mod config;
pub mod context;
pub mod core;
pub mod dom;
pub mod fetch;
pub mod nav;
pub mod partial;
pub mod runtime;
pub mod scroll;
pub mod utils;
pub mod widgets;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;

#[cfg(test)]
mod test_utils;

pub use config::SiteConfig;
pub use runtime::{Runtime, Subscriptions};
