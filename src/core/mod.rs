//! Core types - pure path abstractions shared across the codebase.
//!
//! Nothing here touches the DOM or the network.

mod base;
mod url;

pub use base::{BasePrefix, SiteRoot};
pub use url::{LocationPath, decode, encode_segment};
