//! End-to-end resolution over HTTP with the file cache

use std::sync::Arc;
use std::time::{Duration, Instant};

use mockito::{Matcher, Server};
use tempfile::TempDir;
use tokio::net::TcpListener;

use upstream_version::version::aggregator::{Aggregator, Mode};
use upstream_version::version::cache::FileCache;
use upstream_version::version::fetcher::HttpFetcher;
use upstream_version::version::registry::{Category, Entry, NameMatcher, ResolverRegistry};
use upstream_version::version::strategies::{GitTagsStrategy, PhraseStrategy, TagApiStrategy};

const TAGS: &str = r#"[
    {"name": "v2.1.0"},
    {"name": "v2.0.9"},
    {"name": "v2.1.0-rc1"}
]"#;

const REFS: &str = "001e# service=git-upload-pack\n\
0000\
003f1111111111111111111111111111111111111111 refs/heads/master\n\
003f2222222222222222222222222222222222222222 refs/tags/v1.2.4\n\
00423333333333333333333333333333333333333333 refs/tags/v1.2.4^{}\n\
003f4444444444444444444444444444444444444444 refs/tags/v1.2.5\n\
0000";

fn fetcher(dir: &TempDir, ttl: Duration) -> Arc<HttpFetcher> {
    let cache = FileCache::new(dir.path(), ttl).unwrap();
    Arc::new(HttpFetcher::new(Arc::new(cache), Duration::from_secs(5)).unwrap())
}

fn registry(base: &str) -> ResolverRegistry {
    ResolverRegistry::new(vec![
        Category::new(
            "tags",
            vec![Entry::new(
                NameMatcher::exact("tool"),
                TagApiStrategy::new(&format!("{}/tags", base)).marker("v"),
            )],
        ),
        Category::new(
            "git",
            vec![Entry::new(
                NameMatcher::exact("libc"),
                GitTagsStrategy::new(&format!("{}/libc.git/", base)).marker("v"),
            )],
        ),
        Category::new(
            "page",
            vec![Entry::new(
                NameMatcher::exact("lang"),
                PhraseStrategy::new(&format!("{}/download", base), "Latest release: {version}"),
            )],
        ),
    ])
}

#[tokio::test(flavor = "multi_thread")]
async fn resolves_each_upstream_shape() {
    let mut server = Server::new_async().await;
    let _tags = server
        .mock("GET", "/tags")
        .with_body(TAGS)
        .create_async()
        .await;
    let _refs = server
        .mock("GET", "/libc.git/info/refs")
        .match_query(Matcher::UrlEncoded(
            "service".into(),
            "git-upload-pack".into(),
        ))
        .with_body(REFS)
        .create_async()
        .await;
    let _page = server
        .mock("GET", "/download")
        .with_body("<p>Latest release: 1.23.4</p>")
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let aggregator = Aggregator::new(
        Arc::new(registry(&server.url())),
        fetcher(&dir, Duration::from_secs(3600)),
    );

    let results = aggregator
        .resolve(
            &["tool".to_string(), "libc".to_string(), "lang".to_string()],
            Mode::Concurrent,
        )
        .await
        .unwrap();

    let versions: Vec<_> = results
        .iter()
        .map(|r| (r.package.as_str(), r.version.as_deref()))
        .collect();
    assert_eq!(
        versions,
        vec![
            ("lang", Some("1.23.4")),
            ("libc", Some("1.2.5")),
            ("tool", Some("2.1.0")),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn second_run_within_ttl_is_served_from_cache() {
    let mut server = Server::new_async().await;
    let tags = server
        .mock("GET", "/tags")
        .with_body(TAGS)
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let aggregator = Aggregator::new(
        Arc::new(registry(&server.url())),
        fetcher(&dir, Duration::from_secs(3600)),
    );
    let requested = vec!["tool".to_string()];

    let first = aggregator.resolve(&requested, Mode::Serial).await.unwrap();
    let second = aggregator.resolve(&requested, Mode::Serial).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].version.as_deref(), Some("2.1.0"));
    tags.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn server_errors_leave_package_absent_and_uncached() {
    let mut server = Server::new_async().await;
    let page = server
        .mock("GET", "/download")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let aggregator = Aggregator::new(
        Arc::new(registry(&server.url())),
        fetcher(&dir, Duration::from_secs(3600)),
    );
    let requested = vec!["lang".to_string()];

    for _ in 0..2 {
        let results = aggregator.resolve(&requested, Mode::Serial).await.unwrap();
        assert!(results[0].is_absent());
    }
    page.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn cache_clear_forces_refetch() {
    let mut server = Server::new_async().await;
    let tags = server
        .mock("GET", "/tags")
        .with_body(TAGS)
        .expect(2)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let aggregator = Aggregator::new(
        Arc::new(registry(&server.url())),
        fetcher(&dir, Duration::from_secs(3600)),
    );
    let requested = vec!["tool".to_string()];

    aggregator.resolve(&requested, Mode::Serial).await.unwrap();
    let removed = FileCache::new(dir.path(), Duration::from_secs(3600))
        .unwrap()
        .clear()
        .unwrap();
    aggregator.resolve(&requested, Mode::Serial).await.unwrap();

    assert_eq!(removed, 1);
    tags.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn unresponsive_upstream_times_out_to_absent() {
    // Accepts connections and never writes a byte
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(dir.path(), Duration::from_secs(3600)).unwrap();
    let fetcher = HttpFetcher::new(Arc::new(cache), Duration::from_millis(300)).unwrap();
    let aggregator = Aggregator::new(
        Arc::new(registry(&format!("http://{}", addr))),
        Arc::new(fetcher),
    );

    let started = Instant::now();
    let results = aggregator
        .resolve(&["tool".to_string()], Mode::Concurrent)
        .await
        .unwrap();

    assert!(results[0].is_absent());
    assert!(started.elapsed() < Duration::from_secs(5));
}
