//! YCrawler: an incremental news front-page crawler
//!
//! This crate periodically polls a news front page, discovers new articles
//! and downloads each article body together with its comment page and every
//! link found in the comments. The output directory is the only state: an
//! article whose directory already holds an `article.*` file is never
//! fetched again.

pub mod config;
pub mod crawler;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Rate limited by upstream at {url}")]
    RateLimited { url: String },

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Can't save file {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Front page fetch failed: {0}")]
    FrontPage(Box<CrawlError>),

    #[error("Crawl cycle exceeded {0:?}")]
    CycleTimeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CrawlError {
    /// Returns true for failures raised while talking to the upstream site
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Connect { .. }
                | Self::Http { .. }
                | Self::Status { .. }
                | Self::RateLimited { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::CrawlerConfig;
pub use crawler::{
    monitor, Article, ArticlePipeline, Coordinator, CycleReport, FetchMode, FetchResult, Fetcher,
    HttpFetcher, Pacer, Payload,
};
pub use storage::{DiskPersister, Persister};
