//! Static-site directory as a fetch host.
//!
//! URLs under the mount point map onto files under the site directory,
//! with `index.html` for directories. Anything else answers 404, which is
//! what a static file server would do.

use std::path::{Path, PathBuf};

use url::Url;

use super::{Fetch, FetchError, Request, Response};
use crate::core::{LocationPath, encode_segment};

#[derive(Debug, Clone)]
pub struct FsFetcher {
    dir: PathBuf,
    mount: Url,
}

impl FsFetcher {
    /// Serve `dir` at `mount` (a URL whose path names the site root).
    pub fn new(dir: impl Into<PathBuf>, mut mount: Url) -> Self {
        if !mount.path().ends_with('/') {
            let path = format!("{}/", mount.path());
            mount.set_path(&path);
        }
        Self {
            dir: dir.into(),
            mount,
        }
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[inline]
    pub fn mount(&self) -> &Url {
        &self.mount
    }

    /// URL under which `file` (inside the site directory) is served.
    pub fn url_for(&self, file: &Path) -> Option<Url> {
        let relative = file.strip_prefix(&self.dir).ok()?;
        let encoded: Vec<String> = relative
            .components()
            .map(|c| encode_segment(&c.as_os_str().to_string_lossy()))
            .collect();
        self.mount.join(&encoded.join("/")).ok()
    }

    /// File that answers `url`, if any.
    ///
    /// Rejects other origins, paths outside the mount, `..` segments and
    /// symlinks escaping the site directory.
    pub async fn resolve(&self, url: &Url) -> Option<PathBuf> {
        if url.origin() != self.mount.origin() {
            return None;
        }
        let rest = url.path().strip_prefix(self.mount.path()).or_else(|| {
            // `/websites/acme` itself
            (format!("{}/", url.path()) == self.mount.path()).then_some("")
        })?;

        let location = LocationPath::parse(rest);
        if location.segments().iter().any(|s| s == "..") {
            return None;
        }

        let local = location
            .segments()
            .iter()
            .fold(self.dir.clone(), |path, segment| path.join(segment));
        let canonical = tokio::fs::canonicalize(&local).await.ok()?;
        let root = tokio::fs::canonicalize(&self.dir).await.ok()?;
        if !canonical.starts_with(&root) {
            return None;
        }

        let meta = tokio::fs::metadata(&canonical).await.ok()?;
        if meta.is_file() {
            return Some(canonical);
        }
        if meta.is_dir() {
            let index = canonical.join("index.html");
            if tokio::fs::metadata(&index).await.is_ok_and(|m| m.is_file()) {
                return Some(index);
            }
        }
        None
    }

    async fn read(&self, url: &Url) -> Result<Response, FetchError> {
        let Some(path) = self.resolve(url).await else {
            return Ok(Response::new(404, ""));
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(Response::ok(body)),
            Err(source) => Err(FetchError::Io { path, source }),
        }
    }
}

impl Fetch for FsFetcher {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        match request.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.read(&request.url))
                .await
                .map_err(|_| FetchError::Timeout {
                    url: request.url.clone(),
                    timeout,
                })?,
            None => self.read(&request.url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, FsFetcher) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("work/acme")).unwrap();
        fs::write(dir.path().join("index.html"), "home").unwrap();
        fs::write(dir.path().join("work/acme/index.html"), "acme").unwrap();
        fs::write(dir.path().join("work/my page.html"), "spaced").unwrap();

        let mount = Url::parse("http://localhost/websites/acme").unwrap();
        let fetcher = FsFetcher::new(dir.path(), mount);
        (dir, fetcher)
    }

    fn url(path: &str) -> Url {
        Url::parse(&format!("http://localhost{path}")).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_file_and_index() {
        let (_dir, fetcher) = site();

        let home = fetcher.fetch(Request::get(url("/websites/acme/"))).await.unwrap();
        assert_eq!(home.body, "home");

        let acme = fetcher.fetch(Request::get(url("/websites/acme/work/acme/"))).await.unwrap();
        assert_eq!(acme.body, "acme");

        let spaced = fetcher
            .fetch(Request::get(url("/websites/acme/work/my%20page.html")))
            .await
            .unwrap();
        assert_eq!(spaced.body, "spaced");
    }

    #[tokio::test]
    async fn test_fetch_missing_is_404() {
        let (_dir, fetcher) = site();
        let response = fetcher.fetch(Request::get(url("/websites/acme/nope.html"))).await.unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_resolve_rejects_escapes() {
        let (_dir, fetcher) = site();
        assert!(fetcher.resolve(&url("/websites/acme/work/..%5Cindex.html")).await.is_none());
        assert!(fetcher.resolve(&url("/other/index.html")).await.is_none());
        let foreign = Url::parse("https://elsewhere.com/websites/acme/").unwrap();
        assert!(fetcher.resolve(&foreign).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_mount_without_slash() {
        let (_dir, fetcher) = site();
        assert!(fetcher.resolve(&url("/websites/acme")).await.is_some());
    }

    #[test]
    fn test_url_for() {
        let (dir, fetcher) = site();
        let page = dir.path().join("work").join("my page.html");
        assert_eq!(
            fetcher.url_for(&page).unwrap().as_str(),
            "http://localhost/websites/acme/work/my%20page.html"
        );
    }
}
