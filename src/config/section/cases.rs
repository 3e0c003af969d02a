//! `[cases]` section configuration.
//!
//! Covers the two page widgets re-run after every navigation: the case
//! library filter and the case viewer.
//!
//! # Example
//!
//! ```toml
//! [cases]
//! param = "case"              # query parameter read by the viewer
//! prefix = "cases/library/"   # only paths under this prefix are framed
//! frame = "[data-case-frame]"
//! link = "[data-case-link]"
//! error = "[data-case-error]"
//! filter_attr = "data-filter"
//! tags_attr = "data-tags"
//! all = "all"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Case library and viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasesConfig {
    /// Viewer query parameter.
    pub param: String,

    /// Allowed path prefix for framed cases.
    pub prefix: String,

    /// Selector of the viewer iframe.
    pub frame: String,

    /// Selector of the "open directly" fallback link.
    pub link: String,

    /// Selector of the inline error element.
    pub error: String,

    /// Message shown when the parameter is missing.
    pub missing_message: String,

    /// Message shown when the parameter points outside `prefix`.
    pub rejected_message: String,

    /// Attribute on filter buttons.
    pub filter_attr: String,

    /// Attribute on library cards.
    pub tags_attr: String,

    /// Filter value that shows every card.
    pub all: String,

    /// Class of the selected filter button.
    pub active_class: String,

    /// Class of hidden cards and of the idle error element.
    pub hidden_class: String,
}

impl CasesConfig {
    pub const PARAM: FieldPath = FieldPath::new("cases.param");
    pub const PREFIX: FieldPath = FieldPath::new("cases.prefix");
    pub const FRAME: FieldPath = FieldPath::new("cases.frame");
    pub const LINK: FieldPath = FieldPath::new("cases.link");
    pub const ERROR: FieldPath = FieldPath::new("cases.error");
    pub const FILTER_ATTR: FieldPath = FieldPath::new("cases.filter_attr");
    pub const TAGS_ATTR: FieldPath = FieldPath::new("cases.tags_attr");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        diag.require_non_empty(Self::PARAM, &self.param);
        diag.require_selector(Self::FRAME, &self.frame);
        diag.require_selector(Self::LINK, &self.link);
        diag.require_selector(Self::ERROR, &self.error);
        diag.require_non_empty(Self::FILTER_ATTR, &self.filter_attr);
        diag.require_non_empty(Self::TAGS_ATTR, &self.tags_attr);
        if self.prefix.trim_matches('/').is_empty() {
            diag.error(Self::PREFIX, "must name a directory");
        } else if !self.prefix.ends_with('/') {
            diag.error_with_hint(
                Self::PREFIX,
                "must end with `/`",
                format!("use \"{}/\"", self.prefix),
            );
        }
    }
}

impl Default for CasesConfig {
    fn default() -> Self {
        Self {
            param: "case".to_string(),
            prefix: "cases/library/".to_string(),
            frame: "[data-case-frame]".to_string(),
            link: "[data-case-link]".to_string(),
            error: "[data-case-error]".to_string(),
            missing_message: "No case selected.".to_string(),
            rejected_message: "This case cannot be displayed here.".to_string(),
            filter_attr: "data-filter".to_string(),
            tags_attr: "data-tags".to_string(),
            all: "all".to_string(),
            active_class: "is-active".to_string(),
            hidden_class: "is-hidden".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_cases_prefix_needs_trailing_slash() {
        let config = test_parse_config("[cases]\nprefix = \"work\"");
        let mut diag = ConfigDiagnostics::new();
        config.cases.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].hint.as_deref(), Some("use \"work/\""));
    }

    #[test]
    fn test_cases_frame_selector_checked() {
        let config = test_parse_config("[cases]\nframe = \"main iframe\"");
        let mut diag = ConfigDiagnostics::new();
        config.cases.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, super::CasesConfig::FRAME);
    }

    #[test]
    fn test_cases_prefix_root_rejected() {
        let config = test_parse_config("[cases]\nprefix = \"/\"");
        let mut diag = ConfigDiagnostics::new();
        config.cases.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
