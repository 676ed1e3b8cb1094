//! jobfeed-ingest - feed inspection tool
//!
//! Fetches a feed URL, runs it through the normalizer, and prints what an
//! import would see, without touching the queue or the store.

use anyhow::Result;
use clap::Parser;
use jobfeed_common::logging::{init_logging, LogConfig, LogLevel};
use jobfeed_ingest::fetch::{FeedFetcher, FetchConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "jobfeed-ingest")]
#[command(author, version, about = "Fetch and normalize a job feed without importing it")]
struct Cli {
    /// Feed URL to inspect
    url: String,

    /// Print every candidate as one JSON line
    #[arg(long)]
    json: bool,

    /// Candidates to show in summary mode
    #[arg(short, long, default_value_t = 5)]
    limit: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::for_binary("jobfeed-ingest", "jobfeed_ingest=info")?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)?;

    let fetcher = FeedFetcher::new(&FetchConfig::default())?;

    match fetcher.fetch_jobs(&cli.url).await {
        Ok(candidates) => {
            info!(total = candidates.len(), url = %cli.url, "feed normalized");
            if cli.json {
                for candidate in &candidates {
                    println!("{}", serde_json::to_string(candidate)?);
                }
            } else {
                for candidate in candidates.iter().take(cli.limit) {
                    println!(
                        "{} | {} | {} | {}",
                        candidate.external_id, candidate.title, candidate.company, candidate.link
                    );
                }
                if candidates.len() > cli.limit {
                    println!("... and {} more", candidates.len() - cli.limit);
                }
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}: {}", err.classification(), err);
            std::process::exit(1);
        }
    }
}
