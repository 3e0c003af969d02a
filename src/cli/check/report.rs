//! Check report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::{OwoColorize, Stream::Stderr, Style};

use crate::utils::plural::{plural_count, plural_s};

/// A single problem found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// The partial, selector or link concerned.
    pub target: String,
    pub reason: String,
}

type Section = BTreeMap<String, Vec<Issue>>;

/// Problems grouped by kind, then by page (path relative to the site dir).
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Partials that failed to load.
    pub partials: Section,
    /// Pages SPA navigation cannot swap into.
    pub content: Section,
    /// Intercepted links that would fall back to a full navigation.
    pub links: Section,
    /// Case viewer links the viewer would reject.
    pub cases: Section,
    /// Number of pages booted.
    pub pages: usize,
}

impl CheckReport {
    pub fn add_partial(&mut self, page: &str, partial: &str, reason: String) {
        Self::add(&mut self.partials, page, partial, reason);
    }

    pub fn add_content(&mut self, page: &str, selector: &str) {
        Self::add(&mut self.content, page, selector, "not found".to_string());
    }

    pub fn add_link(&mut self, page: &str, href: &str, reason: String) {
        Self::add(&mut self.links, page, href, reason);
    }

    pub fn add_case(&mut self, page: &str, href: &str, reason: String) {
        Self::add(&mut self.cases, page, href, reason);
    }

    fn add(section: &mut Section, page: &str, target: &str, reason: String) {
        section.entry(page.to_string()).or_default().push(Issue {
            target: target.to_string(),
            reason,
        });
    }

    fn sections(&self) -> [(&'static str, &Section); 4] {
        [
            ("partials", &self.partials),
            ("content", &self.content),
            ("links", &self.links),
            ("cases", &self.cases),
        ]
    }

    /// Total issue count.
    pub fn issue_count(&self) -> usize {
        self.sections()
            .iter()
            .flat_map(|(_, section)| section.values())
            .map(Vec::len)
            .sum()
    }

    /// Number of distinct pages with at least one issue.
    pub fn page_count(&self) -> usize {
        let mut pages: Vec<&String> = self
            .sections()
            .iter()
            .flat_map(|(_, section)| section.keys())
            .collect();
        pages.sort();
        pages.dedup();
        pages.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }

    /// Print every section to stderr.
    pub fn print(&self) {
        for (name, section) in self.sections() {
            print_section(name, section);
        }
    }
}

fn print_section(name: &str, section: &Section) {
    if section.is_empty() {
        return;
    }
    eprintln!();

    let issue_count: usize = section.values().map(Vec::len).sum();
    let counts = format!(
        "({}, {})",
        plural_count(section.len(), "page"),
        plural_count(issue_count, "issue")
    );
    eprintln!(
        "{} {}",
        name.if_supports_color(Stderr, |n| n.style(Style::new().red().bold())),
        counts.if_supports_color(Stderr, |c| c.dimmed())
    );

    for (page, issues) in section {
        eprintln!(
            "{}{}{}",
            "[".if_supports_color(Stderr, |b| b.dimmed()),
            page.if_supports_color(Stderr, |p| p.cyan()),
            "]".if_supports_color(Stderr, |b| b.dimmed())
        );
        for issue in issues {
            eprintln!(
                "{} {} {}",
                "→".if_supports_color(Stderr, |a| a.red()),
                issue.target,
                issue.reason.if_supports_color(Stderr, |r| r.dimmed())
            );
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.issue_count();
        if total == 0 {
            let pages = plural_count(self.pages, "page");
            write!(
                f,
                "{} {}",
                pages.if_supports_color(Stderr, |p| p.dimmed()),
                "ok".if_supports_color(Stderr, |ok| ok.green())
            )
        } else {
            let count = total.to_string();
            let issues = format!("issue{}", plural_s(total));
            let pages = format!("on {}", plural_count(self.page_count(), "page"));
            write!(
                f,
                "{} {} {} {}",
                "found".if_supports_color(Stderr, |w| w.dimmed()),
                count.if_supports_color(Stderr, |c| c.style(Style::new().red().bold())),
                issues.if_supports_color(Stderr, |w| w.dimmed()),
                pages.if_supports_color(Stderr, |w| w.dimmed())
            )
        }
    }
}
