//! `[nav]` configuration for SPA navigation.
//!
//! # Example
//!
//! ```toml
//! [nav]
//! spa = true
//! timeout = 8000                    # page fetch timeout (ms)
//! content = ".page-content"         # swapped content region
//! header_name = "X-Requested-With"  # request header marking SPA fetches
//! header_value = "spa"
//! opt_out = "data-no-spa"           # links with this attribute are left alone
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// SPA navigation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Enable SPA navigation (link interception + content swap).
    pub spa: bool,

    /// Page fetch timeout in milliseconds.
    pub timeout: u64,

    /// Selector of the content region.
    pub content: String,

    /// Request header sent with page fetches.
    pub header_name: String,

    /// Value of `header_name`.
    pub header_value: String,

    /// Attribute that opts a link out of interception.
    pub opt_out: String,
}

impl NavConfig {
    pub const TIMEOUT: FieldPath = FieldPath::new("nav.timeout");
    pub const CONTENT: FieldPath = FieldPath::new("nav.content");
    pub const HEADER_NAME: FieldPath = FieldPath::new("nav.header_name");
    pub const OPT_OUT: FieldPath = FieldPath::new("nav.opt_out");

    /// Page fetch timeout as a `Duration`.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.timeout == 0 {
            diag.error_with_hint(
                Self::TIMEOUT,
                "must be greater than zero",
                "pages that never answer would block navigation, try 8000",
            );
        }
        diag.require_selector(Self::CONTENT, &self.content);
        diag.require_non_empty(Self::HEADER_NAME, &self.header_name);
        diag.require_non_empty(Self::OPT_OUT, &self.opt_out);
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            spa: true,
            timeout: 8000,
            content: ".page-content".to_string(),
            header_name: "X-Requested-With".to_string(),
            header_value: "spa".to_string(),
            opt_out: "data-no-spa".to_string(),
        }
    }
}
