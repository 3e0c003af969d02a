//! `vitrine base`: base prefix of a single URL.

use anyhow::{Context, Result};
use url::Url;

use crate::config::SiteConfig;
use crate::core::{BasePrefix, LocationPath, SiteRoot};

/// Base prefix for `input`, a full URL or a bare URL path.
pub fn base_for(input: &str, root: &SiteRoot) -> Result<BasePrefix> {
    let location = if input.contains("://") {
        let url = Url::parse(input).with_context(|| format!("invalid url `{input}`"))?;
        LocationPath::from_url(&url)
    } else {
        LocationPath::parse(input)
    };
    Ok(BasePrefix::resolve(&location, root))
}

pub fn print_base(input: &str, root: Option<&str>, config: &SiteConfig) -> Result<()> {
    let root = match root.or(config.site.root.as_deref()) {
        Some(root) => SiteRoot::new(root),
        None => SiteRoot::default(),
    };
    let base = base_for(input, &root)?;
    crate::debug!("base"; "root {} depth {}", root, base.depth());
    println!("{base}");
    Ok(())
}
