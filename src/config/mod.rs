//! Runtime configuration (`vitrine.toml` or page-embedded JSON).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── site       # [site]
//! │   ├── partials   # [partials]
//! │   ├── nav        # [nav]
//! │   ├── scroll     # [scroll]
//! │   └── cases      # [cases]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # config file lookup
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                           |
//! |--------------|---------------------------------------------------|
//! | `[site]`     | Site root resolution                              |
//! | `[partials]` | Shared header/footer fragments and their targets  |
//! | `[nav]`      | SPA link interception and page fetch              |
//! | `[scroll]`   | Header hide-on-scroll thresholds                  |
//! | `[cases]`    | Case library filter and case viewer               |
//!
//! In the browser the same structure is read from an inline
//! `<script type="application/json" id="vitrine-config">` block.

pub mod section;
pub mod types;
mod util;

pub use section::{CasesConfig, NavConfig, PartialsConfig, ScrollConfig, SiteSectionConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Id of the inline JSON config block.
pub const INLINE_CONFIG_ID: &str = "vitrine-config";

/// Default config file name.
pub const CONFIG_FILE: &str = "vitrine.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing vitrine.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site root resolution
    pub site: SiteSectionConfig,

    /// Shared partials
    pub partials: PartialsConfig,

    /// SPA navigation
    pub nav: NavConfig,

    /// Scroll-aware header
    pub scroll: ScrollConfig,

    /// Case library and viewer widgets
    pub cases: CasesConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Parse and validate configuration from the page-embedded JSON block.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    ///
    /// Unknown fields are reported as warnings, never as errors.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load `vitrine.toml` if one is found upward from cwd, defaults otherwise.
    pub fn load(config_name: &Path) -> Result<Self, ConfigError> {
        match find_config_file(config_name) {
            Some(path) => Self::from_path(&path),
            None => {
                crate::debug!("config"; "no {} found, using defaults", config_name.display());
                Ok(Self::default())
            }
        }
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        crate::log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            crate::log!("warning"; "- {}", field);
        }
    }

    /// Validate all sections, collecting every problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.partials.validate(&mut diag);
        self.nav.validate(&mut diag);
        self.scroll.validate(&mut diag);
        self.cases.validate(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Default configuration rendered as TOML.
    pub fn template() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Parse a TOML snippet in tests, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
