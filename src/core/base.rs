//! Site root and base prefix resolution.
//!
//! The base prefix is the string of `../` tokens that leads from the current
//! page's directory back to the site root, so that `prefix + "assets/x"`
//! resolves correctly from any nesting depth.
//!
//! ```text
//! root:     /websites/acme/
//! location: /websites/acme/work/brand/index.html
//! dir:      [websites, acme, work, brand]
//! common:   [websites, acme]           -> depth 2 -> "../../"
//! ```

use std::fmt;

use super::url::{LocationPath, encode_segment};

// ============================================================================
// SiteRoot
// ============================================================================

/// Directory that anchors depth computation. Resolved once per page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SiteRoot {
    segments: Vec<String>,
}

impl SiteRoot {
    /// Root from an explicit directory path. A file-like last segment still
    /// counts as a directory here: the value names the root itself.
    pub fn new(path: &str) -> Self {
        Self {
            segments: LocationPath::parse(path).segments().to_vec(),
        }
    }

    /// Root from the loader script's own URL path.
    ///
    /// `/websites/acme/assets/main.js` with `assets/main.js` -> `/websites/acme/`.
    /// When the script doesn't live at `script_rel`, its directory is the root.
    pub fn from_script(script_path: &str, script_rel: &str) -> Self {
        let script = LocationPath::parse(script_path);
        let rel = LocationPath::parse(script_rel);

        let segments = if script.ends_with(&rel) {
            let keep = script.segments().len() - rel.segments().len();
            script.segments()[..keep].to_vec()
        } else {
            script.dir_segments().to_vec()
        };
        Self { segments }
    }

    /// Decoded root segments.
    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Absolute URL path of the root, always ending with `/`.
    pub fn url_path(&self) -> String {
        let mut path = String::from("/");
        for segment in &self.segments {
            path.push_str(&encode_segment(segment));
            path.push('/');
        }
        path
    }

    /// Absolute URL path of `relative` under the root.
    ///
    /// `relative` must already be URL-safe (it is appended verbatim).
    pub fn join(&self, relative: &str) -> String {
        format!("{}{}", self.url_path(), relative.trim_start_matches('/'))
    }
}

impl fmt::Display for SiteRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url_path())
    }
}

// ============================================================================
// BasePrefix
// ============================================================================

/// Relative prefix from the current page directory to the site root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasePrefix {
    depth: usize,
    prefix: String,
}

impl BasePrefix {
    /// Base prefix for `location` relative to `root`.
    ///
    /// Depth is the number of directory segments left after the longest
    /// common prefix with the root. Depth 0 yields the empty prefix.
    pub fn resolve(location: &LocationPath, root: &SiteRoot) -> Self {
        let dir = location.dir_segments();
        let common = dir
            .iter()
            .zip(root.segments())
            .take_while(|(a, b)| a == b)
            .count();
        Self::with_depth(dir.len() - common)
    }

    /// Base prefix for a full URL.
    #[inline]
    pub fn for_url(url: &url::Url, root: &SiteRoot) -> Self {
        Self::resolve(&LocationPath::from_url(url), root)
    }

    /// Prefix made of exactly `depth` `../` tokens.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            prefix: "../".repeat(depth),
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }
}

impl fmt::Display for BasePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)
    }
}

// ============================================================================
// tests
// ============================================================================
