//! Configuration module for YCrawler
//!
//! All design constants of the crawler live in one [`CrawlerConfig`]. The
//! binary only overrides the output directory and the polling interval from
//! the command line; everything else keeps its default.
//!
//! # Example
//!
//! ```
//! use ycrawler::config::{validate, CrawlerConfig};
//! use std::time::Duration;
//!
//! let config = CrawlerConfig {
//!     interval: Duration::from_secs(30),
//!     ..CrawlerConfig::default()
//! };
//! validate(&config).unwrap();
//! assert_eq!(config.item_url("42"), "https://news.ycombinator.com/item?id=42");
//! ```

mod types;
mod validation;

pub use types::{
    CrawlerConfig, DEFAULT_INTERVAL, DEFAULT_MAX_HOST_CONNECTIONS, DEFAULT_OUTPUT_DIR,
    DEFAULT_PACING_DELAY, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SITE_ROOT, DEFAULT_USER_AGENT,
};
pub use validation::validate;
