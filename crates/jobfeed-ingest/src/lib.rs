//! Feed acquisition and normalization for jobfeed.
//!
//! Turns third-party RSS 2.0 / Atom job feeds into canonical
//! [`JobCandidate`](jobfeed_common::JobCandidate) lists:
//!
//! - **fetch**: HTTP acquisition with timeout, bounded redirects and
//!   browser-like headers (some feed hosts reject default client agents)
//! - **feed**: tolerant XML parsing that survives the tag-casing and
//!   structure drift real-world feeds exhibit
//! - **normalize**: alias-based field extraction and length capping
//! - **identity**: stable external-id derivation used for deduplication
//!
//! # Example
//!
//! ```no_run
//! use jobfeed_ingest::fetch::{FeedFetcher, FetchConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = FeedFetcher::new(&FetchConfig::default())?;
//!     let candidates = fetcher.fetch_jobs("https://example.com/jobs.rss").await?;
//!     println!("{} candidates", candidates.len());
//!     Ok(())
//! }
//! ```

pub mod feed;
pub mod fetch;
pub mod identity;
pub mod normalize;

pub use fetch::{FeedFetcher, FetchConfig};
pub use normalize::normalize_feed;
