//! `vitrine check`: boot the headless runtime on every page of a built site.
//!
//! Each HTML file is loaded into a [`MemoryDom`] at the URL it is served
//! from, booted like a browser would, then every link the runtime would
//! intercept is planned against the site directory. Reported:
//!
//! - partials that fail to load,
//! - pages without a content region to swap into,
//! - intercepted links whose navigation would fall back to a full reload,
//! - case viewer links whose parameter the viewer rejects.

mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;
use rustc_hash::{FxHashMap, FxHashSet};
use url::Url;

use crate::cli::CheckArgs;
use crate::config::SiteConfig;
use crate::core::SiteRoot;
use crate::dom::{Dom, MemoryDom};
use crate::fetch::FsFetcher;
use crate::nav::{Anchor, MemoryWindow, Navigator, Window};
use crate::runtime::Runtime;
use crate::utils::plural::plural_count;

pub use report::{CheckReport, Issue};

pub async fn check_command(args: &CheckArgs, config: &SiteConfig) -> Result<()> {
    let origin = Url::parse(&args.origin)
        .with_context(|| format!("invalid origin `{}`", args.origin))?;
    let report = check_site(&args.dir, &origin, config).await?;

    if report.pages == 0 {
        log!("check"; "no html files in {}", args.dir.display());
        return Ok(());
    }

    report.print();
    if report.is_clean() || args.warn_only {
        log!("check"; "{}", report);
        return Ok(());
    }
    anyhow::bail!(
        "found {} on {}",
        plural_count(report.issue_count(), "issue"),
        plural_count(report.page_count(), "page")
    )
}

/// Check every HTML page under `dir`, served at `origin` + site root.
pub async fn check_site(dir: &Path, origin: &Url, config: &SiteConfig) -> Result<CheckReport> {
    let root = config.site.site_root(None);
    let mount = origin
        .join(&root.url_path())
        .with_context(|| format!("cannot mount {} at {}", root, origin))?;
    let fetcher = FsFetcher::new(dir, mount);

    let partials = [config.partials.header.as_str(), config.partials.footer.as_str()];
    let pages = collect_pages(dir, &partials);
    log!("check"; "checking {}", plural_count(pages.len(), "page"));

    let mut checker = Checker {
        config,
        root,
        fetcher: &fetcher,
        navigator: Navigator::new(config.nav.clone()),
        planned: FxHashMap::default(),
        report: CheckReport::default(),
    };
    for page in &pages {
        checker.check_page(page).await?;
    }
    Ok(checker.report)
}

/// HTML files under `dir` except the partials themselves, sorted.
fn collect_pages(dir: &Path, partials: &[&str]) -> Vec<PathBuf> {
    let partials: Vec<PathBuf> = partials
        .iter()
        .map(|partial| dir.join(partial.trim_start_matches('/')))
        .collect();
    let mut pages: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "html"))
        .filter(|path| !partials.contains(path))
        .collect();
    pages.sort();
    pages
}

struct Checker<'a> {
    config: &'a SiteConfig,
    root: SiteRoot,
    fetcher: &'a FsFetcher,
    navigator: Navigator,
    /// Fallback reason per planned URL (`None` = would swap).
    planned: FxHashMap<Url, Option<String>>,
    report: CheckReport,
}

impl Checker<'_> {
    async fn check_page(&mut self, file: &Path) -> Result<()> {
        let Some(url) = self.fetcher.url_for(file) else {
            return Ok(());
        };
        let source = file
            .strip_prefix(self.fetcher.dir())
            .unwrap_or(file)
            .to_string_lossy()
            .replace('\\', "/");
        let html = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?;
        crate::debug!("check"; "{} at {}", source, url);

        let runtime = Runtime::new(
            self.config.clone(),
            MemoryDom::parse(&html),
            self.fetcher,
            MemoryWindow::new(url),
            self.root.clone(),
        );
        let (subscriptions, partials) = runtime.start().await;
        self.report.pages += 1;

        for (kind, err) in partials.failures() {
            self.report.add_partial(&source, kind.name(), err.to_string());
        }
        let config = self.config;
        let nav = &config.nav;
        if nav.spa && !subscriptions.click {
            self.report.add_content(&source, &nav.content);
        }

        let dom = runtime.dom();
        let mut seen = FxHashSet::default();
        for link in dom.query_all("a") {
            let anchor = Anchor::from_element(dom, &link, &nav.opt_out);
            let Some(href) = anchor.href.clone() else {
                continue;
            };
            if !seen.insert(href.clone()) {
                continue;
            }

            if let Ok(target) = runtime.window().location().join(&href)
                && target.query_pairs().any(|(key, _)| key == config.cases.param)
                && let Err(err) = runtime.viewer().request(&target)
            {
                self.report.add_case(&source, &href, err.to_string());
            }

            if let Some(target) = runtime.on_click(&anchor)
                && let Some(reason) = self.plan(target).await
            {
                self.report.add_link(&source, &href, reason);
            }
        }
        Ok(())
    }

    /// Why navigating to `url` would fall back, memoized across pages.
    async fn plan(&mut self, mut url: Url) -> Option<String> {
        url.set_fragment(None);
        if let Some(reason) = self.planned.get(&url) {
            return reason.clone();
        }
        let reason = self
            .navigator
            .plan(self.fetcher, &url)
            .await
            .err()
            .map(|reason| reason.to_string());
        self.navigator.finish();
        self.planned.insert(url, reason.clone());
        reason
    }
}
