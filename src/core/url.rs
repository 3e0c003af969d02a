//! Location path type for depth computation.
//!
//! - Internal representation: always decoded (human-readable) segments
//! - Browser boundary: decode on input, encode on output

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped when a decoded segment goes back into a URL path.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Decoded location path split into segments.
///
/// Invariants:
/// - Segments are percent-decoded and never contain `/`
/// - Backslashes are normalized to `/` before splitting
/// - `is_directory` is true when the path ends with `/` (or is empty)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationPath {
    segments: Vec<String>,
    is_directory: bool,
}

impl LocationPath {
    /// Parse a browser path (may be percent-encoded, may carry query/fragment).
    pub fn parse(raw: &str) -> Self {
        let path = raw.split(['?', '#']).next().unwrap_or(raw);
        let normalized = decode(path).replace('\\', "/");

        let is_directory = normalized.is_empty() || normalized.ends_with('/');
        let segments = normalized
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            segments,
            is_directory,
        }
    }

    /// Location path of a parsed URL.
    #[inline]
    pub fn from_url(url: &url::Url) -> Self {
        Self::parse(url.path())
    }

    /// All decoded segments.
    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether the last segment is a directory level.
    #[inline]
    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Segments of the containing directory.
    ///
    /// `/a/b/page.html` -> `[a, b]`, `/a/b/` -> `[a, b]`
    pub fn dir_segments(&self) -> &[String] {
        if self.is_directory {
            &self.segments
        } else {
            &self.segments[..self.segments.len().saturating_sub(1)]
        }
    }

    /// Whether the path ends with `suffix` segment-wise (file paths only).
    pub fn ends_with(&self, suffix: &LocationPath) -> bool {
        !self.is_directory
            && !suffix.segments.is_empty()
            && self.segments.ends_with(&suffix.segments)
    }
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))?;
        if self.is_directory && !self.segments.is_empty() {
            write!(f, "/")?;
        }
        Ok(())
    }
}

/// Percent-decode, keeping the raw input when it isn't valid UTF-8.
pub fn decode(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Encode one decoded segment for use in a URL path.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

// ============================================================================
// tests
// ============================================================================
