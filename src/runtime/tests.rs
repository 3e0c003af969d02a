use super::*;
use crate::dom::MemoryDom;
use crate::nav::{MemoryWindow, NavState};
use crate::test_utils::{MockFetcher, fixtures, url};

const HEADER_PATH: &str = "/assets/partials/header.html";
const FOOTER_PATH: &str = "/assets/partials/footer.html";

type TestRuntime = Runtime<MemoryDom, MockFetcher, MemoryWindow>;

fn runtime_with(config: SiteConfig, page: &str, html: &str) -> TestRuntime {
    let fetcher = MockFetcher::new();
    fetcher.page(HEADER_PATH, fixtures::HEADER);
    fetcher.page(FOOTER_PATH, fixtures::FOOTER);
    Runtime::new(
        config,
        MemoryDom::parse(html),
        fetcher,
        MemoryWindow::new(url(page)),
        SiteRoot::new("/"),
    )
}

fn runtime(page: &str) -> TestRuntime {
    runtime_with(
        SiteConfig::default(),
        page,
        &fixtures::page("Home", "<h1>Home</h1>"),
    )
}

fn content(rt: &TestRuntime) -> String {
    let dom = rt.dom();
    dom.inner_html(&dom.query(".page-content").unwrap())
}

fn header(rt: &TestRuntime) -> String {
    let dom = rt.dom();
    dom.inner_html(&dom.query(".site-header").unwrap())
}

#[tokio::test]
async fn test_boot_injects_partials_and_subscribes() {
    let rt = runtime("/index.html");
    let (subscriptions, report) = rt.start().await;

    assert!(report.is_ok());
    assert_eq!(
        subscriptions,
        Subscriptions {
            click: true,
            popstate: true,
            scroll: true,
        }
    );
    assert!(header(&rt).contains(r#"href="index.html""#));
    assert!(rt.dom().html().contains("Contact"));
}

#[tokio::test]
async fn test_boot_plain_document() {
    let rt = runtime_with(
        SiteConfig::default(),
        "/index.html",
        "<html><head><title>Plain</title></head><body><p>plain</p></body></html>",
    );
    assert_eq!(rt.boot().await, Subscriptions::default());
    assert_eq!(rt.fetcher().requests().len(), 0);
}

#[tokio::test]
async fn test_boot_bare_page_creates_containers() {
    let rt = runtime_with(
        SiteConfig::default(),
        "/index.html",
        &fixtures::bare_page("Home", "<h1>Home</h1>"),
    );
    let subscriptions = rt.boot().await;
    assert!(subscriptions.scroll);
    assert!(header(&rt).contains("Work"));
}

#[tokio::test]
async fn test_click_swaps_content() {
    let rt = runtime("/index.html");
    rt.boot().await;
    rt.fetcher()
        .page("/work/acme/", fixtures::page("Acme case", "<h1>Acme</h1>"));
    rt.window().set_scroll(640.0);

    let outcome = rt.click(&Anchor::href("work/acme/")).await;
    assert_eq!(outcome, Some(NavOutcome::Swapped));

    assert_eq!(content(&rt), "<h1>Acme</h1>");
    assert_eq!(rt.dom().title(), "Acme case");
    assert_eq!(rt.window().location(), url("/work/acme/"));
    assert_eq!(rt.window().history_len(), 2);
    assert_eq!(rt.window().scroll_y(), 0.0);
    assert!(rt.window().assigned().is_none());
    assert_eq!(rt.navigator().state(), NavState::Idle);

    // One page fetch, marked as SPA
    assert_eq!(rt.fetcher().count("/work/acme/"), 1);
    let request = rt
        .fetcher()
        .requests()
        .into_iter()
        .find(|r| r.url.path() == "/work/acme/")
        .unwrap();
    assert_eq!(request.header_value("X-Requested-With"), Some("spa"));

    // Partials re-rendered with the new base, template from cache
    assert_eq!(rt.context().base().as_str(), "../../");
    assert!(header(&rt).contains(r#"href="../../index.html""#));
    assert_eq!(rt.fetcher().count(HEADER_PATH), 1);
}

#[tokio::test]
async fn test_click_without_cache_refetches_partials() {
    let mut config = SiteConfig::default();
    config.partials.cache = false;
    let rt = runtime_with(config, "/index.html", &fixtures::page("Home", ""));
    rt.boot().await;
    rt.fetcher().page("/about/", fixtures::page("About", "<h1>About</h1>"));

    rt.click(&Anchor::href("/about/")).await;
    assert_eq!(rt.fetcher().count(HEADER_PATH), 2);
    assert_eq!(rt.fetcher().count(FOOTER_PATH), 2);
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let rt = runtime("/index.html");
    rt.boot().await;
    rt.fetcher().status("/broken/", 500);

    let outcome = rt.click(&Anchor::href("/broken/")).await;
    assert_eq!(
        outcome,
        Some(NavOutcome::FullReload(FallbackReason::Status(500)))
    );
    assert_eq!(rt.window().assigned(), Some(url("/broken/")));
    assert_eq!(content(&rt), "<h1>Home</h1>");
    assert_eq!(rt.dom().title(), "Home");
    assert_eq!(rt.window().history_len(), 1);
    assert_eq!(rt.navigator().state(), NavState::Idle);
}

#[tokio::test]
async fn test_timeout_falls_back() {
    let rt = runtime("/index.html");
    rt.fetcher().timeout("/slow/");

    let outcome = rt.navigate(&url("/slow/"), true).await;
    assert_eq!(outcome, NavOutcome::FullReload(FallbackReason::Timeout(8000)));
    assert_eq!(rt.window().assigned(), Some(url("/slow/")));
    assert_eq!(content(&rt), "<h1>Home</h1>");
}

#[tokio::test]
async fn test_response_without_content_region_falls_back() {
    let rt = runtime("/index.html");
    rt.fetcher().page("/raw.pdf", "%PDF-1.7");

    let outcome = rt.navigate(&url("/raw.pdf"), true).await;
    assert!(matches!(
        outcome,
        NavOutcome::FullReload(FallbackReason::NoContent(_))
    ));
    assert_eq!(rt.window().assigned(), Some(url("/raw.pdf")));
}

#[tokio::test]
async fn test_popstate_restores_previous_page() {
    let rt = runtime("/index.html");
    rt.boot().await;
    rt.fetcher().page("/index.html", fixtures::page("Home", "<h1>Home again</h1>"));
    rt.fetcher().page("/work/", fixtures::page("Work", "<h1>Work</h1>"));

    rt.click(&Anchor::href("/work/")).await;
    assert_eq!(content(&rt), "<h1>Work</h1>");

    let state = rt.window().back().unwrap();
    assert!(state.is_none());
    assert_eq!(rt.on_popstate(state).await, NavOutcome::Swapped);
    assert_eq!(content(&rt), "<h1>Home again</h1>");
    assert_eq!(rt.window().history_len(), 2);

    let state = rt.window().forward().unwrap();
    assert_eq!(state, Some(HistoryState::new(&url("/work/"))));
    rt.on_popstate(state).await;
    assert_eq!(content(&rt), "<h1>Work</h1>");
    assert_eq!(rt.window().history_len(), 2);
}

#[tokio::test]
async fn test_native_links_not_intercepted() {
    let rt = runtime("/index.html");
    rt.boot().await;

    let external = Anchor::href("https://elsewhere.test/");
    let fragment = Anchor::href("#team");
    let new_tab = Anchor {
        target: Some("_blank".to_string()),
        ..Anchor::href("/work/")
    };
    for anchor in [external, fragment, new_tab] {
        assert!(rt.on_click(&anchor).is_none(), "{anchor:?}");
        assert!(rt.click(&anchor).await.is_none());
    }
    assert_eq!(rt.fetcher().count("/work/"), 0);
}

#[tokio::test]
async fn test_spa_disabled() {
    let mut config = SiteConfig::default();
    config.nav.spa = false;
    let rt = runtime_with(config, "/index.html", &fixtures::page("Home", ""));

    let subscriptions = rt.boot().await;
    assert!(!subscriptions.click);
    assert!(!subscriptions.popstate);
    assert!(subscriptions.scroll);
    assert!(rt.on_click(&Anchor::href("/work/")).is_none());
}

#[tokio::test]
async fn test_scroll_toggles_header_class() {
    let rt = runtime("/index.html");
    rt.boot().await;
    let header = rt.dom().query(".site-header").unwrap();

    rt.window().set_scroll(300.0);
    assert!(rt.on_scroll());
    assert!(!rt.on_scroll());
    assert_eq!(rt.on_frame(), Some(HeaderVisibility::Hidden));
    assert!(rt.dom().has_class(&header, "is-hidden"));

    rt.window().set_scroll(302.0);
    assert_eq!(rt.on_frame(), None);
    assert!(rt.dom().has_class(&header, "is-hidden"));

    rt.window().set_scroll(120.0);
    assert_eq!(rt.on_frame(), Some(HeaderVisibility::Visible));
    assert!(!rt.dom().has_class(&header, "is-hidden"));
}

#[tokio::test]
async fn test_partials_skip_lookalikes_in_new_content() {
    let rt = runtime("/index.html");
    rt.boot().await;
    let card = r#"<article><header class="site-header">card title</header><div class="footer">card meta</div></article>"#;
    rt.fetcher().page("/work/", fixtures::page("Work", card));

    let outcome = rt.navigate(&url("/work/"), true).await;
    assert_eq!(outcome, NavOutcome::Swapped);
    assert_eq!(content(&rt), card);

    // The page's own containers got the partials
    let html = rt.dom().html();
    assert!(html.contains(r#"href="../contact/""#));
    assert!(html.contains(r#"href="../index.html""#));

    // and the header class lands on the page header, not the card
    rt.window().set_scroll(300.0);
    rt.on_scroll();
    assert_eq!(rt.on_frame(), Some(HeaderVisibility::Hidden));
    let headers = rt.dom().query_all(".site-header");
    assert_eq!(headers.len(), 2);
    assert!(rt.dom().has_class(&headers[0], "is-hidden"));
    assert!(!rt.dom().has_class(&headers[1], "is-hidden"));
}

#[tokio::test]
async fn test_viewer_runs_after_navigation() {
    let rt = runtime("/index.html");
    rt.boot().await;
    let viewer = r#"<p data-case-error class="is-hidden"></p><iframe data-case-frame></iframe>"#;
    rt.fetcher()
        .page("/cases/viewer.html", fixtures::page("Viewer", viewer));

    let target = url("/cases/viewer.html?case=cases/library/acme/index.html");
    assert_eq!(rt.navigate(&target, true).await, NavOutcome::Swapped);

    let frame = rt.dom().query("[data-case-frame]").unwrap();
    assert_eq!(
        rt.dom().attribute(&frame, "src").as_deref(),
        Some("/cases/library/acme/index.html")
    );
}

#[tokio::test]
async fn test_filter_after_navigation() {
    let rt = runtime("/index.html");
    rt.boot().await;
    let library = r#"<button data-filter="all">All</button><button data-filter="web">Web</button>
<article data-tags="web"></article><article data-tags="print"></article>"#;
    rt.fetcher()
        .page("/cases/", fixtures::page("Cases", library));

    rt.navigate(&url("/cases/"), true).await;
    assert_eq!(rt.on_filter("web"), 1);
    assert_eq!(rt.on_filter("all"), 2);
}
