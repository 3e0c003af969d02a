//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! root = "/websites/acme/"   # explicit site root (URL path)
//! script = "assets/main.js"  # loader script path relative to the root
//! ```
//!
//! Without `root`, the site root is derived once from the loader script's
//! own URL by stripping `script` from its path.

use serde::{Deserialize, Serialize};

use crate::core::SiteRoot;

/// Site root resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Explicit site root URL path. Wins over script-based detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Loader script path relative to the site root.
    pub script: String,
}

impl SiteSectionConfig {
    /// Site root for this page: explicit `root`, else derived from the loader
    /// script's URL path, else `/`.
    pub fn site_root(&self, script_path: Option<&str>) -> SiteRoot {
        match (&self.root, script_path) {
            (Some(root), _) => SiteRoot::new(root),
            (None, Some(script)) => SiteRoot::from_script(script, &self.script),
            (None, None) => SiteRoot::default(),
        }
    }
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            root: None,
            script: "assets/main.js".to_string(),
        }
    }
}
