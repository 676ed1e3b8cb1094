//! HTTP acquisition of feed documents.
//!
//! Feed hosts routinely reject default client identifiers, so requests go
//! out with a browser-like User-Agent, a feed-oriented Accept header and a
//! Referer pointing at the feed's own origin. Timeouts and redirect counts
//! are bounded; there is no retry here, callers own retry policy.

use std::time::Duration;

use jobfeed_common::{ImportError, JobCandidate, Result};
use reqwest::header::{ACCEPT, REFERER};
use reqwest::redirect::Policy;

use crate::normalize::normalize_feed;

/// User-Agent presented to feed hosts.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept header for feed requests.
pub const FEED_ACCEPT: &str = "application/xml, text/xml, application/rss+xml, */*";

/// Outbound fetch limits.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_redirects: 5,
        }
    }
}

/// HTTP client for feed sources.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// GET a URL as text. Accepts 2xx and 3xx statuses, mirroring how
    /// browsers treat feed endpoints; everything else is a fetch failure.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let mut request = self.client.get(url).header(ACCEPT, FEED_ACCEPT);
        if let Some(referer) = origin_referer(url) {
            request = request.header(REFERER, referer);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ImportError::fetch(url, err.to_string()))?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(ImportError::fetch(
                url,
                format!("unexpected HTTP status {status}"),
            ));
        }

        response
            .text()
            .await
            .map_err(|err| ImportError::fetch(url, err.to_string()))
    }

    /// Fetch one source and normalize it into candidates.
    pub async fn fetch_jobs(&self, source_url: &str) -> Result<Vec<JobCandidate>> {
        let body = self.fetch_text(source_url).await?;
        let candidates = normalize_feed(&body, source_url)?;
        tracing::debug!(
            source_url,
            candidates = candidates.len(),
            "feed normalized"
        );
        Ok(candidates)
    }
}

fn origin_referer(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let origin = parsed.origin().ascii_serialization();
    // opaque origins serialize to "null", which is worse than no Referer
    (origin != "null").then(|| format!("{origin}/"))
}
