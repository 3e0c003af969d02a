//! `[scroll]` section configuration.
//!
//! ```toml
//! [scroll]
//! top = 10.0                 # always show the header above this offset
//! delta = 5.0                # dead zone between samples
//! hidden_class = "is-hidden"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Scroll-aware header settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub top: f64,
    pub delta: f64,
    pub hidden_class: String,
}

impl ScrollConfig {
    pub const DELTA: FieldPath = FieldPath::new("scroll.delta");
    pub const HIDDEN_CLASS: FieldPath = FieldPath::new("scroll.hidden_class");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.delta < 0.0 {
            diag.error(Self::DELTA, "must not be negative");
        }
        diag.require_non_empty(Self::HIDDEN_CLASS, &self.hidden_class);
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            top: 10.0,
            delta: 5.0,
            hidden_class: "is-hidden".to_string(),
        }
    }
}
