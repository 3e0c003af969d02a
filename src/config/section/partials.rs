//! `[partials]` section configuration.
//!
//! Shared HTML fragments injected into every page.
//!
//! # Example
//!
//! ```toml
//! [partials]
//! header = "assets/partials/header.html"
//! footer = "assets/partials/footer.html"
//! placeholder = "{{base}}"     # replaced with the base prefix
//! cache = true                 # reuse fetched templates across navigations
//! header_target = ".site-header"
//! footer_target = ".footer"
//! page = ".page"               # where missing targets are attached
//! static_attr = "data-static"  # `data-static="true"` skips injection
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Shared partial settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialsConfig {
    /// Header partial path, relative to the site root.
    pub header: String,

    /// Footer partial path, relative to the site root.
    pub footer: String,

    /// Token replaced with the base prefix in fetched partials.
    pub placeholder: String,

    /// Keep fetched templates for the page lifetime.
    pub cache: bool,

    /// Selector of the header container.
    pub header_target: String,

    /// Selector of the footer container.
    pub footer_target: String,

    /// Selector of the page wrapper that receives created containers.
    pub page: String,

    /// Attribute marking a pre-rendered container.
    pub static_attr: String,
}

impl PartialsConfig {
    pub const HEADER: FieldPath = FieldPath::new("partials.header");
    pub const FOOTER: FieldPath = FieldPath::new("partials.footer");
    pub const PLACEHOLDER: FieldPath = FieldPath::new("partials.placeholder");
    pub const HEADER_TARGET: FieldPath = FieldPath::new("partials.header_target");
    pub const FOOTER_TARGET: FieldPath = FieldPath::new("partials.footer_target");
    pub const PAGE: FieldPath = FieldPath::new("partials.page");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        diag.require_non_empty(Self::HEADER, &self.header);
        diag.require_non_empty(Self::FOOTER, &self.footer);
        diag.require_selector(Self::HEADER_TARGET, &self.header_target);
        diag.require_selector(Self::FOOTER_TARGET, &self.footer_target);
        diag.require_selector(Self::PAGE, &self.page);
        if self.placeholder.is_empty() {
            diag.error_with_hint(
                Self::PLACEHOLDER,
                "must not be empty",
                "the default token is `{{base}}`",
            );
        }
    }
}

impl Default for PartialsConfig {
    fn default() -> Self {
        Self {
            header: "assets/partials/header.html".to_string(),
            footer: "assets/partials/footer.html".to_string(),
            placeholder: "{{base}}".to_string(),
            cache: true,
            header_target: ".site-header".to_string(),
            footer_target: ".footer".to_string(),
            page: ".page".to_string(),
            static_attr: "data-static".to_string(),
        }
    }
}
