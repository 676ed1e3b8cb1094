//! Fetch + normalize integration tests against a local mock feed host.

use jobfeed_common::{FeedFormatKind, ImportError};
use jobfeed_ingest::fetch::{FeedFetcher, FetchConfig, BROWSER_USER_AGENT, FEED_ACCEPT};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RSS_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example Jobs</title>
    <item>
      <guid>job-1</guid>
      <title>Site Reliability Engineer</title>
      <description>On-call and observability</description>
      <link>https://boards.example/jobs/1</link>
      <pubDate>Mon, 03 Aug 2026 08:00:00 +0000</pubDate>
    </item>
    <item>
      <guid>job-2</guid>
      <title>Backend Engineer</title>
      <link>https://boards.example/jobs/2</link>
    </item>
  </channel>
</rss>"#;

fn fetcher() -> FeedFetcher {
    FeedFetcher::new(&FetchConfig::default()).expect("client builds")
}

fn format_kind(err: ImportError) -> FeedFormatKind {
    match err {
        ImportError::FeedFormat { kind, .. } => kind,
        other => panic!("expected FeedFormat, got {other:?}"),
    }
}

#[tokio::test]
async fn fetches_and_normalizes_a_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs.rss"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RSS_BODY))
        .mount(&server)
        .await;

    let url = format!("{}/jobs.rss", server.uri());
    let candidates = fetcher().fetch_jobs(&url).await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].external_id, "job-1");
    assert_eq!(candidates[1].external_id, "job-2");
    assert!(candidates.iter().all(|c| c.source_url == url));
}

#[tokio::test]
async fn sends_browser_like_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs.rss"))
        .and(header("user-agent", BROWSER_USER_AGENT))
        .and(header("accept", FEED_ACCEPT))
        .respond_with(ResponseTemplate::new(200).set_body_string(RSS_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/jobs.rss", server.uri());
    fetcher().fetch_jobs(&url).await.unwrap();
}

#[tokio::test]
async fn http_error_status_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs.rss"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let url = format!("{}/jobs.rss", server.uri());
    let err = fetcher().fetch_jobs(&url).await.unwrap_err();
    assert_eq!(err.classification(), "FEED_FETCH_ERROR");
}

#[tokio::test]
async fn empty_body_is_empty_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs.rss"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let url = format!("{}/jobs.rss", server.uri());
    let err = fetcher().fetch_jobs(&url).await.unwrap_err();
    assert_eq!(format_kind(err), FeedFormatKind::EmptyFeed);
}

#[tokio::test]
async fn html_block_page_is_html_not_xml() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs.rss"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<!DOCTYPE html><html><body>Please enable JavaScript</body></html>"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/jobs.rss", server.uri());
    let err = fetcher().fetch_jobs(&url).await.unwrap_err();
    assert_eq!(format_kind(err), FeedFormatKind::HtmlNotXml);
}

#[tokio::test]
async fn normalizing_identical_bytes_twice_is_stable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs.rss"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RSS_BODY))
        .mount(&server)
        .await;

    let url = format!("{}/jobs.rss", server.uri());
    let fetcher = fetcher();
    let first = fetcher.fetch_jobs(&url).await.unwrap();
    let second = fetcher.fetch_jobs(&url).await.unwrap();

    let first_ids: Vec<_> = first.iter().map(|c| c.external_id.clone()).collect();
    let second_ids: Vec<_> = second.iter().map(|c| c.external_id.clone()).collect();
    assert_eq!(first_ids, second_ids);
}
