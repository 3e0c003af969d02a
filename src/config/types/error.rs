//! Configuration errors and validation diagnostics.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use owo_colors::{OwoColorize, Stream::Stderr, Style};
use thiserror::Error;

use super::FieldPath;
use crate::dom::selector::Selector;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid config file")]
    Toml(#[from] toml::de::Error),

    #[error("invalid inline config")]
    Json(#[from] serde_json::Error),

    // No #[from]: source() would print the diagnostics twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One problem with one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

/// Every problem found by `SiteConfig::validate`.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message: message.into(),
            hint: None,
        });
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.errors.push(ConfigDiagnostic {
            field,
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    /// Blank attribute names, header names and paths.
    pub fn require_non_empty(&mut self, field: FieldPath, value: &str) {
        if value.trim().is_empty() {
            self.error(field, "must not be empty");
        }
    }

    /// Selectors must stay within what the headless DOM can match, so
    /// `vitrine check` sees the same elements as the browser.
    pub fn require_selector(&mut self, field: FieldPath, value: &str) {
        if let Err(err) = Selector::parse(value) {
            self.error_with_hint(
                field,
                format!("invalid selector `{value}`: {err}"),
                "use tags, #id, .class, [attr] or [attr=\"value\"], comma separated",
            );
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Diagnostics grouped by section, fields in declaration order.
    fn by_section(&self) -> BTreeMap<&'static str, Vec<&ConfigDiagnostic>> {
        let mut sections: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for diag in &self.errors {
            sections.entry(diag.field.section()).or_default().push(diag);
        }
        sections
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dim = |s: &'static str| s.if_supports_color(Stderr, |s| s.dimmed()).to_string();
        write!(
            f,
            "{}",
            "config validation failed:"
                .if_supports_color(Stderr, |s| s.style(Style::new().red().bold()))
        )?;
        for (section, diags) in self.by_section() {
            write!(
                f,
                "\n\n{}{}{}",
                dim("["),
                section.if_supports_color(Stderr, |s| s.cyan()),
                dim("]")
            )?;
            for diag in diags {
                write!(
                    f,
                    "\n{} {} {}",
                    "→".if_supports_color(Stderr, |s| s.red()),
                    diag.field.key(),
                    diag.message
                )?;
                if let Some(hint) = &diag.hint {
                    let label = "hint:".if_supports_color(Stderr, |s| s.yellow());
                    write!(f, "\n  {} {}", label, hint)?;
                }
            }
        }
        if self.errors.len() > 1 {
            let count = self.errors.len().to_string();
            write!(
                f,
                "\n\n{} {} {}",
                dim("found"),
                count.if_supports_color(Stderr, |s| s.style(Style::new().red().bold())),
                dim("errors")
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("vitrine.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert_eq!(io_err.to_string(), "failed to read `vitrine.toml`");
    }

    #[test]
    fn test_require_non_empty() {
        let mut diag = ConfigDiagnostics::new();
        diag.require_non_empty(FieldPath::new("nav.opt_out"), "  ");
        diag.require_non_empty(FieldPath::new("nav.header_name"), "X-Requested-With");
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "nav.opt_out");
    }

    #[test]
    fn test_require_selector() {
        let mut diag = ConfigDiagnostics::new();
        diag.require_selector(FieldPath::new("nav.content"), "main.page-content");
        diag.require_selector(FieldPath::new("cases.frame"), "[data-case-frame]");
        assert!(diag.is_empty());

        diag.require_selector(FieldPath::new("nav.content"), "");
        diag.require_selector(FieldPath::new("partials.page"), "body > .page");
        assert_eq!(diag.len(), 2);
        assert!(diag.errors()[1].message.contains("body > .page"));
        assert!(diag.errors()[1].hint.is_some());
    }

    #[test]
    fn test_diagnostics_grouped_by_section() {
        owo_colors::set_override(false);
        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("nav.timeout"), "must be greater than zero");
        diag.error_with_hint(FieldPath::new("cases.prefix"), "must end with `/`", "use \"work/\"");
        diag.error(FieldPath::new("nav.content"), "must not be empty");

        let display = diag.to_string();
        let cases = display.find("[cases]").unwrap();
        let nav = display.find("[nav]").unwrap();
        assert!(cases < nav);
        assert!(display.contains("→ timeout must be greater than zero"));
        assert!(display.contains("hint: use \"work/\""));
        assert!(display.ends_with("found 3 errors"));
    }
}
