//! Dotted config field path.

use std::fmt;

/// A config field path such as `nav.timeout`, used in diagnostics.
///
/// Each section exposes its paths as associated constants:
///
/// ```ignore
/// diag.error(NavConfig::TIMEOUT, "must be greater than zero");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldPath(&'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Section part: `nav` for `nav.timeout`.
    pub fn section(&self) -> &'static str {
        self.0.split_once('.').map_or(self.0, |(section, _)| section)
    }

    /// Key inside the section: `timeout` for `nav.timeout`.
    pub fn key(&self) -> &'static str {
        self.0.split_once('.').map_or("", |(_, key)| key)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_and_key() {
        let path = FieldPath::new("partials.header_target");
        assert_eq!(path.section(), "partials");
        assert_eq!(path.key(), "header_target");

        let bare = FieldPath::new("site");
        assert_eq!(bare.section(), "site");
        assert_eq!(bare.key(), "");
    }
}
