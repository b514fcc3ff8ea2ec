//! Crawler module for front page polling and article downloads
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a per-host connection ceiling
//! - Front page and comment page parsing
//! - The per-article download pipeline
//! - Crawl cycle coordination with launch pacing
//! - The polling loop

mod coordinator;
mod fetcher;
mod limiter;
mod monitor;
mod pacer;
mod parser;
mod pipeline;

pub use coordinator::{Coordinator, CycleReport};
pub use fetcher::{
    build_http_client, extension_for, FetchMode, FetchResult, Fetcher, HttpFetcher, Payload,
    RATE_LIMIT_MESSAGE,
};
pub use limiter::HostLimiter;
pub use monitor::{monitor, run_bounded};
pub use pacer::Pacer;
pub use parser::{parse_comment_links, parse_front_page, Article};
pub use pipeline::ArticlePipeline;

use crate::config::CrawlerConfig;
use crate::CrawlError;
use tokio_util::sync::CancellationToken;

/// Runs the crawler until `shutdown` is cancelled
///
/// This is the main entry point for the crawler. It will:
/// 1. Build the HTTP fetcher and the disk persister
/// 2. Create the output directory
/// 3. Poll the front page every `config.interval`
///
/// # Returns
///
/// * `Ok(())` - The crawler was shut down
/// * `Err(CrawlError)` - The crawler could not start
///
/// # Example
///
/// ```no_run
/// use tokio_util::sync::CancellationToken;
/// use ycrawler::config::CrawlerConfig;
/// use ycrawler::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let shutdown = CancellationToken::new();
/// crawl(CrawlerConfig::default(), shutdown).await?;
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: CrawlerConfig, shutdown: CancellationToken) -> Result<(), CrawlError> {
    tokio::fs::create_dir_all(&config.output_dir).await?;

    let interval = config.interval;
    let coordinator = Coordinator::new(config)?;
    monitor(&coordinator, interval, shutdown).await;

    Ok(())
}
